use bitflags::bitflags;

use crate::{codec::Encoding, error::Error};

bitflags! {
    /// Options that control how a pattern is compiled and how haystacks are
    /// encoded before they are handed to the matching engine.
    ///
    /// Two option sets are equal if and only if their bits are equal. The
    /// regex cache keys on the full 32-bit value.
    ///
    /// Options that correspond to inline flags may also be toggled inside
    /// the pattern itself, e.g., `(?i)` or `(?-s:.)`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct RegexOptions: u32 {
        /// Letters match both their upper and lower case variants. (`i`)
        const IGNORE_CASE = 1 << 0;
        /// `^` and `$` match at the beginning and end of lines. (`m`)
        const MULTILINE = 1 << 1;
        /// `.` matches `\n`. (`s`)
        const SINGLELINE = 1 << 2;
        /// Swaps the meaning of greedy and lazy repetitions. (`U`)
        const UNGREEDY = 1 << 3;
        /// The pattern is matched literally. No character in it is special.
        const LITERAL = 1 << 4;
        /// Whitespace in the pattern is ignored and `#` starts a comment
        /// that runs to the end of the line. (`x`)
        const IGNORE_PATTERN_WHITESPACE = 1 << 5;
        /// Patterns and haystacks are encoded as ASCII. Text containing any
        /// code unit above `0x7F` is rejected.
        const ASCII = 1 << 8;
        /// Patterns and haystacks are encoded as Latin-1 (ISO-8859-1). Text
        /// containing any code unit above `0xFF` is rejected. This overrides
        /// `ASCII` when both are set.
        const LATIN1 = 1 << 9;
        /// Only the overall match is reported. Capture groups in the pattern
        /// still group, but their positions are never computed.
        const SINGLE_CAPTURE = 1 << 10;
    }
}

impl RegexOptions {
    /// Returns the encoding used for patterns and haystacks under these
    /// options.
    pub fn encoding(&self) -> Encoding {
        if self.contains(RegexOptions::LATIN1) {
            Encoding::Latin1
        } else if self.contains(RegexOptions::ASCII) {
            Encoding::Ascii
        } else {
            Encoding::Utf8
        }
    }

    /// Returns true when every UTF-16 code unit maps to exactly one byte,
    /// in which case no offset translation is needed.
    pub fn is_single_byte(&self) -> bool {
        self.intersects(RegexOptions::ASCII | RegexOptions::LATIN1)
    }

    /// Rejects option sets that carry bits outside of the defined flags.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.bits() & !RegexOptions::all().bits() != 0 {
            return Err(Error::range(
                "options",
                "specified argument was outside the range of valid \
                 option values",
            ));
        }
        Ok(())
    }
}
