use lexopt::{Arg, Parser};

use crate::args::{self, Configurable, Usage};

/// Flags selecting the part of the haystack to search.
#[derive(Debug, Default)]
pub struct Config {
    start: Option<usize>,
    length: Option<usize>,
}

impl Config {
    /// Returns the window as a start index and a length for a haystack of
    /// `len` units. Out of range values are passed through untouched so that
    /// the library reports them.
    pub fn get(&self, len: usize) -> (usize, usize) {
        let start = self.start.unwrap_or(0);
        let length = self.length.unwrap_or_else(|| len.saturating_sub(start));
        (start, length)
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("start") => {
                self.start = Some(args::parse(p, "--start")?);
            }
            Arg::Long("length") => {
                self.length = Some(args::parse(p, "--length")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "--start <index>",
                "Start searching at this offset.",
                r#"
The offset at which the search window starts. For text haystacks, this is in
UTF-16 code units. With --bytes, it is in bytes. The default is 0.
"#,
            ),
            Usage::new(
                "--length <units>",
                "Search at most this many units.",
                r#"
The length of the search window, in the same units as --start. The default is
the rest of the haystack.
"#,
            ),
        ];
        USAGES
    }
}
