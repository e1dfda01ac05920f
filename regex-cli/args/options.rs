use lexopt::{Arg, Parser};

use regex_utf16::RegexOptions;

use crate::args::{Configurable, Usage};

/// Flags that map onto `RegexOptions` bits.
#[derive(Debug, Default)]
pub struct Config {
    options: RegexOptions,
}

impl Config {
    pub fn options(&self) -> RegexOptions {
        self.options
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        let flag = match *arg {
            Arg::Short('i') | Arg::Long("ignore-case") => {
                RegexOptions::IGNORE_CASE
            }
            Arg::Short('m') | Arg::Long("multi-line") => {
                RegexOptions::MULTILINE
            }
            Arg::Short('s') | Arg::Long("dot-matches-new-line") => {
                RegexOptions::SINGLELINE
            }
            Arg::Short('U') | Arg::Long("swap-greed") => RegexOptions::UNGREEDY,
            Arg::Short('x') | Arg::Long("ignore-whitespace") => {
                RegexOptions::IGNORE_PATTERN_WHITESPACE
            }
            Arg::Long("literal") => RegexOptions::LITERAL,
            Arg::Long("ascii") => RegexOptions::ASCII,
            Arg::Long("latin1") => RegexOptions::LATIN1,
            Arg::Long("single-capture") => RegexOptions::SINGLE_CAPTURE,
            _ => return Ok(false),
        };
        self.options |= flag;
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "-i, --ignore-case",
                "Enable case insensitive matching.",
                r#"
Letters match regardless of case. In ASCII and Latin-1 mode, only ASCII
letters are case folded.
"#,
            ),
            Usage::new(
                "-m, --multi-line",
                "Make ^ and $ match at line boundaries.",
                r#"
Enables multi-line mode, where ^ and $ also match at the beginning and end of
every line.
"#,
            ),
            Usage::new(
                "-s, --dot-matches-new-line",
                "Make . match \\n.",
                r#"
Makes the . meta character match any character, including \n.
"#,
            ),
            Usage::new(
                "-U, --swap-greed",
                "Swap greedy and lazy repetitions.",
                r#"
Makes repetitions lazy by default. A trailing ? then makes them greedy.
"#,
            ),
            Usage::new(
                "-x, --ignore-whitespace",
                "Ignore whitespace and allow # comments.",
                r#"
Whitespace in the pattern is ignored and # starts a comment that runs to the
end of the line. This has no effect together with --literal.
"#,
            ),
            Usage::new(
                "--literal",
                "Match the pattern literally.",
                r#"
Every character in the pattern, including meta characters, matches itself.
"#,
            ),
            Usage::new(
                "--ascii",
                "Encode the pattern and haystack as ASCII.",
                r#"
Encodes the pattern and haystack as ASCII instead of UTF-8. Text with any
code unit above 0x7F is rejected.
"#,
            ),
            Usage::new(
                "--latin1",
                "Encode the pattern and haystack as Latin-1.",
                r#"
Encodes the pattern and haystack as Latin-1 instead of UTF-8. Text with any
code unit above 0xFF is rejected. This takes precedence over --ascii.
"#,
            ),
            Usage::new(
                "--single-capture",
                "Only report the overall match.",
                r#"
Only the span of the overall match is computed. Capture groups in the pattern
still group, but are not reported.
"#,
            ),
        ];
        USAGES
    }
}
