// A stderr logger for the `log` crate. Filtering is left entirely to the
// global max level, which main sets from RUST_LOG.

use log::{LevelFilter, Log, Metadata, Record};

#[derive(Debug)]
pub struct Logger(());

static LOGGER: Logger = Logger(());

impl Logger {
    /// Install this logger as the global logger. This fails if some other
    /// logger was installed first.
    pub fn init() -> Result<(), log::SetLoggerError> {
        log::set_logger(&LOGGER)
    }
}

/// Parse the value of RUST_LOG. Only bare level names are supported.
pub fn level(name: &str) -> anyhow::Result<LevelFilter> {
    Ok(match name {
        "" | "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{}'", unk),
    })
}

impl Log for Logger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("{}:{}", file, line),
            (Some(file), None) => file.to_string(),
            _ => String::new(),
        };
        if location.is_empty() {
            eprintln!("{}|{}: {}", record.level(), record.target(), record.args());
        } else {
            eprintln!(
                "{}|{}|{}: {}",
                record.level(),
                record.target(),
                location,
                record.args(),
            );
        }
    }

    fn flush(&self) {}
}
