use std::{env, io::Write};

mod args;
mod cmd;
mod logger;
mod util;

fn main() -> anyhow::Result<()> {
    let level = match env::var("RUST_LOG") {
        Err(_) => log::LevelFilter::Off,
        Ok(name) => logger::level(&name)?,
    };
    logger::Logger::init()?;
    log::set_max_level(level);

    if let Err(err) = cmd::run(&mut lexopt::Parser::from_env()) {
        let mut stderr = std::io::stderr();
        let backtrace = env::var("RUST_BACKTRACE").map_or(false, |v| v == "1");
        let _ = if backtrace {
            writeln!(stderr, "{:?}", err)
        } else {
            writeln!(stderr, "{:#}", err)
        };
        std::process::exit(1);
    }
    Ok(())
}
