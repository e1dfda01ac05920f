use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

/// Run `f` and report how long it took.
pub fn timeit<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let t = f();
    (t, start.elapsed())
}

/// Like `timeit`, but for fallible operations. The time is only reported on
/// success.
pub fn timeitr<T, E>(
    f: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Duration), E> {
    match timeit(f) {
        (Ok(t), time) => Ok((t, time)),
        (Err(err), _) => Err(err),
    }
}

/// Labeled values printed as two right aligned columns.
///
/// Values are rendered with their `Debug` impl when they are added.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<(&'static str, String)>,
}

impl Table {
    pub fn empty() -> Table {
        Table::default()
    }

    pub fn add(&mut self, label: &'static str, value: impl std::fmt::Debug) {
        self.rows.push((label, format!("{:?}", value)));
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .alignment(tabwriter::Alignment::Right);
        for &(label, ref value) in self.rows.iter() {
            writeln!(wtr, "{}:\t{}", label, value)?;
        }
        wtr.flush()
    }
}
