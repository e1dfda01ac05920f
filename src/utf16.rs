/*!
Translation between UTF-16 code unit offsets and UTF-8 byte offsets.

This is only needed when a regex uses UTF-8. ASCII and Latin-1 buffers, and
raw byte haystacks, are already one byte per code unit.

Every routine here walks the buffer one UTF-8 sequence at a time, classifying
each sequence by its leading byte: sequences of one, two or three bytes are a
single UTF-16 code unit, while a four byte sequence is a surrogate pair and
therefore two code units.

The buffers we walk are normally produced by our own encoder and are always
valid UTF-8. For anything else, the behavior is still defined: a byte that
cannot start a sequence (a stray continuation byte, or `0xF8..=0xFF`) counts
as one code unit, and no walk ever moves past the end of the buffer.
*/

use core::cmp;

/// Returns the byte length of the UTF-8 sequence starting with `lead`, and
/// the number of UTF-16 code units that sequence encodes to.
#[inline(always)]
fn sequence(lead: u8) -> (usize, usize) {
    if lead <= 0x7F {
        (1, 1)
    } else if lead & 0b1110_0000 == 0b1100_0000 {
        (2, 1)
    } else if lead & 0b1111_0000 == 0b1110_0000 {
        (3, 1)
    } else if lead & 0b1111_1000 == 0b1111_0000 {
        (4, 2)
    } else {
        (1, 1)
    }
}

/// Count the UTF-16 code units encoded by `buf[start..end]`.
///
/// `start` must be at a sequence boundary. If `end` falls inside a sequence,
/// that whole sequence is counted.
fn units_between(buf: &[u8], start: usize, end: usize) -> usize {
    let end = cmp::min(end, buf.len());
    let (mut at, mut units) = (start, 0);
    while at < end {
        let (len, n) = sequence(buf[at]);
        at += len;
        units += n;
    }
    units
}

/// Convert a UTF-16 code unit offset into a byte offset in `buf`.
///
/// An offset that falls between the two halves of a surrogate pair is
/// rounded up to the end of the pair. Offsets beyond the end of the buffer
/// are clamped to `buf.len()`.
pub fn utf16_to_byte_offset(buf: &[u8], utf16_offset: usize) -> usize {
    Utf16Cursor::start().advance_units(buf, utf16_offset).byte()
}

/// Convert a byte offset in `buf` into a UTF-16 code unit offset.
///
/// Offsets beyond the end of the buffer are clamped to `buf.len()`.
pub fn byte_to_utf16_offset(buf: &[u8], byte_offset: usize) -> usize {
    Utf16Cursor::start().seek(buf, byte_offset).unit()
}

/// A position in a UTF-8 buffer, tracked both as a byte offset and as the
/// UTF-16 code unit offset of the same point.
///
/// A cursor is an accumulator for translating many offsets against the same
/// buffer. Each translation starts from wherever the previous one ended, so
/// translating a sequence of nearby offsets costs time proportional to the
/// distance between them instead of the distance from the start of the
/// buffer.
///
/// A cursor is only meaningful for the buffer it was created for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Utf16Cursor {
    byte: usize,
    unit: usize,
}

impl Utf16Cursor {
    /// A cursor at the beginning of a buffer.
    pub fn start() -> Utf16Cursor {
        Utf16Cursor { byte: 0, unit: 0 }
    }

    /// A cursor at a known pair of offsets. The caller must ensure that
    /// `unit` really is the code unit offset of `byte`.
    pub fn new(byte: usize, unit: usize) -> Utf16Cursor {
        Utf16Cursor { byte, unit }
    }

    /// The byte offset of this cursor.
    pub fn byte(&self) -> usize {
        self.byte
    }

    /// The UTF-16 code unit offset of this cursor.
    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Move this cursor to the given byte offset, in either direction.
    ///
    /// `byte` should be at a sequence boundary, which is always true of
    /// offsets reported by the matching engine in UTF-8 mode.
    pub fn seek(self, buf: &[u8], byte: usize) -> Utf16Cursor {
        let byte = cmp::min(byte, buf.len());
        let unit = if byte >= self.byte {
            self.unit + units_between(buf, self.byte, byte)
        } else {
            self.unit.saturating_sub(units_between(buf, byte, self.byte))
        };
        Utf16Cursor { byte, unit }
    }

    /// Move this cursor forward by the given number of UTF-16 code units.
    ///
    /// If the last step lands between the halves of a surrogate pair, the
    /// cursor ends up after the pair, so `unit()` may exceed the requested
    /// position by one.
    pub fn advance_units(self, buf: &[u8], units: usize) -> Utf16Cursor {
        let Utf16Cursor { mut byte, mut unit } = self;
        let target = self.unit + units;
        while unit < target && byte < buf.len() {
            let (len, n) = sequence(buf[byte]);
            byte = cmp::min(byte + len, buf.len());
            unit += n;
        }
        Utf16Cursor { byte, unit }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{QuickCheck, Testable};

    use super::*;

    fn qc<T: Testable>(t: T) {
        QuickCheck::new().tests(2_000).max_tests(4_000).quickcheck(t);
    }

    #[test]
    fn ascii_is_identity() {
        let buf = b"abcdef";
        for i in 0..=buf.len() {
            assert_eq!(i, utf16_to_byte_offset(buf, i));
            assert_eq!(i, byte_to_utf16_offset(buf, i));
        }
    }

    #[test]
    fn mixed_widths() {
        // a (1 byte), é (2 bytes), ☃ (3 bytes), 𝗮 (4 bytes, 2 units), b
        let s = "a\u{E9}\u{2603}\u{1D5EE}b";
        let buf = s.as_bytes();
        assert_eq!(11, buf.len());
        let expected = [(0, 0), (1, 1), (2, 3), (3, 6), (5, 10), (6, 11)];
        for &(unit, byte) in expected.iter() {
            assert_eq!(byte, utf16_to_byte_offset(buf, unit), "unit {unit}");
            assert_eq!(unit, byte_to_utf16_offset(buf, byte), "byte {byte}");
        }
    }

    #[test]
    fn surrogate_pair_symmetry() {
        let buf = "\u{10000}".as_bytes();
        assert_eq!(4, utf16_to_byte_offset(buf, 2));
        assert_eq!(2, byte_to_utf16_offset(buf, 4));
        // Halfway into the pair rounds up to the end of it.
        assert_eq!(4, utf16_to_byte_offset(buf, 1));
    }

    #[test]
    fn clamps_to_buffer() {
        assert_eq!(3, utf16_to_byte_offset(b"abc", 10));
        assert_eq!(3, byte_to_utf16_offset(b"abc", 10));
        assert_eq!(0, utf16_to_byte_offset(b"", 1));
    }

    #[test]
    fn malformed_input_terminates() {
        assert_eq!(3, byte_to_utf16_offset(b"\x80\x80a", 3));
        assert_eq!(1, utf16_to_byte_offset(b"\xFF", 5));
        // A truncated four byte sequence is clamped to the buffer.
        assert_eq!(2, utf16_to_byte_offset(b"\xF0\x9D", 2));
    }

    #[test]
    fn cursor_moves_both_ways() {
        let buf = "\u{1D5EE}x\u{E9}y".as_bytes();
        let cur = Utf16Cursor::start().seek(buf, 7);
        assert_eq!(Utf16Cursor::new(7, 4), cur);
        let back = cur.seek(buf, 4);
        assert_eq!(Utf16Cursor::new(4, 2), back);
        let fwd = back.advance_units(buf, 2);
        assert_eq!(Utf16Cursor::new(7, 4), fwd);
    }

    #[test]
    fn prop_offset_roundtrip() {
        fn p(s: String, offset: usize) -> bool {
            let units: Vec<u16> = s.encode_utf16().collect();
            let mut o = offset % (units.len() + 1);
            // Offsets inside a surrogate pair are not reachable.
            if o > 0 && o < units.len() && (0xDC00..=0xDFFF).contains(&units[o])
            {
                o -= 1;
            }
            let buf = s.as_bytes();
            let byte = utf16_to_byte_offset(buf, o);
            s.is_char_boundary(byte) && byte_to_utf16_offset(buf, byte) == o
        }
        qc(p as fn(String, usize) -> bool);
    }

    #[test]
    fn prop_cursor_agrees_with_scan() {
        fn p(s: String, a: usize, b: usize) -> bool {
            let buf = s.as_bytes();
            let bounds: Vec<usize> = (0..=buf.len())
                .filter(|&i| s.is_char_boundary(i))
                .collect();
            let a = bounds[a % bounds.len()];
            let b = bounds[b % bounds.len()];
            let cur = Utf16Cursor::start().seek(buf, a).seek(buf, b);
            cur.unit() == byte_to_utf16_offset(buf, b)
                && cur.unit() == s[..b].encode_utf16().count()
        }
        qc(p as fn(String, usize, usize) -> bool);
    }
}
