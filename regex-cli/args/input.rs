use {
    anyhow::Context,
    bstr::{BString, ByteSlice, ByteVec},
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// The positional pattern and haystack, plus how to interpret the haystack.
///
/// Both are given inline on the command line and support escape sequences,
/// e.g., `'a\xFF\t'`.
#[derive(Debug, Default)]
pub struct Config {
    pattern: Option<BString>,
    haystack: Option<BString>,
    bytes: bool,
    skip_pattern: bool,
}

/// A haystack ready to be searched.
#[derive(Debug)]
pub enum Haystack {
    Text(Vec<u16>),
    Bytes(Vec<u8>),
}

impl Haystack {
    pub fn len(&self) -> usize {
        match *self {
            Haystack::Text(ref units) => units.len(),
            Haystack::Bytes(ref bytes) => bytes.len(),
        }
    }

    /// Render `haystack[range]` for display.
    pub fn show(&self, range: std::ops::Range<usize>) -> String {
        match *self {
            Haystack::Text(ref units) => {
                format!("{:?}", String::from_utf16_lossy(&units[range]))
            }
            Haystack::Bytes(ref bytes) => format!("{:?}", bytes[range].as_bstr()),
        }
    }
}

impl Config {
    /// A configuration whose only positional argument is the haystack.
    pub fn only_haystack() -> Config {
        Config { skip_pattern: true, ..Config::default() }
    }

    /// The pattern as UTF-16 code units. Invalid UTF-8 left behind by escape
    /// sequences is replaced with U+FFFD.
    pub fn pattern(&self) -> anyhow::Result<Vec<u16>> {
        let pattern = self.pattern.as_ref().context("a pattern is required")?;
        Ok(utf16(pattern))
    }

    pub fn haystack(&self) -> anyhow::Result<Haystack> {
        let hay = self.haystack.as_ref().context("a haystack is required")?;
        Ok(if self.bytes {
            Haystack::Bytes(hay.to_vec())
        } else {
            Haystack::Text(utf16(hay))
        })
    }
}

fn utf16(s: &BString) -> Vec<u16> {
    s.to_str_lossy().encode_utf16().collect()
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("bytes") => {
                self.bytes = true;
            }
            Arg::Value(ref mut v) => {
                let v = std::mem::take(v)
                    .string()
                    .context("positional arguments must be valid UTF-8")?;
                let v = BString::from(Vec::unescape_bytes(&v));
                if !self.skip_pattern && self.pattern.is_none() {
                    self.pattern = Some(v);
                } else if self.haystack.is_none() {
                    self.haystack = Some(v);
                } else {
                    anyhow::bail!("too many positional arguments");
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[Usage::new(
            "--bytes",
            "Search the haystack as raw bytes.",
            r#"
Searches the haystack bytes as given, after unescaping, instead of converting
them to UTF-16 text first. Offsets are then byte offsets, and nothing is
translated.
"#,
        )];
        USAGES
    }
}
