use lexopt::{Arg, Parser};

use crate::args::{Configurable, Usage};

/// Flags that control how much a command prints.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub no_table: bool,
}

impl Config {
    pub fn table(&self) -> bool {
        !self.no_table
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("no-table") => {
                self.no_table = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Only print spans, not the text they cover.",
                r#"
Suppresses the text matched by each group. Only the spans are printed.
"#,
            ),
            Usage::new(
                "--no-table",
                "Omit the table of timings and properties.",
                r#"
Commands print a table of timings and properties of the regex before their
results. Passing this flag suppresses that table.
"#,
            ),
        ];
        USAGES
    }
}
