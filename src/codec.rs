/*!
Conversions between UTF-16 code units and the byte encodings understood by
the matching engine.

UTF-8 can represent every UTF-16 string (unpaired surrogates are replaced
with U+FFFD, which keeps one code unit per replaced unit). ASCII and Latin-1
cannot, so encoding into them is checked: the produced bytes are decoded
back and compared with the input, and any difference is an error.
*/

use crate::error::Error;

/// The byte encoding a regex uses for its pattern and haystacks.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// UTF-8. The default, and the only multi-byte encoding.
    Utf8,
    /// 7-bit ASCII. Every code unit maps to exactly one byte.
    Ascii,
    /// ISO-8859-1. Every code unit maps to exactly one byte.
    Latin1,
}

impl Encoding {
    /// Returns true if every code unit in this encoding is one byte.
    pub fn is_single_byte(&self) -> bool {
        !matches!(*self, Encoding::Utf8)
    }

    /// The largest code unit representable in a single byte encoding.
    fn max_unit(&self) -> u16 {
        match *self {
            Encoding::Utf8 => u16::MAX,
            Encoding::Ascii => 0x7F,
            Encoding::Latin1 => 0xFF,
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let name = match *self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Ascii => "ASCII",
            Encoding::Latin1 => "Latin-1",
        };
        f.write_str(name)
    }
}

/// Encode UTF-16 text into a byte buffer in the given encoding.
///
/// Empty text always encodes to an empty buffer. UTF-8 never fails.
///
/// # Errors
///
/// When `encoding` is ASCII or Latin-1 and `text` contains a code unit that
/// the encoding cannot represent.
pub fn encode(text: &[u16], encoding: Encoding) -> Result<Vec<u8>, Error> {
    encode_argument(text, encoding, "text")
}

/// Like `encode`, but names the argument that failed in the error.
pub(crate) fn encode_argument(
    text: &[u16],
    encoding: Encoding,
    argument: &'static str,
) -> Result<Vec<u8>, Error> {
    if text.is_empty() {
        return Ok(vec![]);
    }
    if !encoding.is_single_byte() {
        return Ok(encode_utf8(text));
    }
    let max = encoding.max_unit();
    let bytes: Vec<u8> = text
        .iter()
        .map(|&unit| if unit <= max { unit as u8 } else { b'?' })
        .collect();
    // The substitution above is lossy, so the only reliable check is
    // whether the bytes decode back to exactly what we were given.
    if !decode_units(&bytes, encoding).eq(text.iter().copied()) {
        return Err(Error::encoding(argument, encoding));
    }
    Ok(bytes)
}

/// Decode a byte buffer back into UTF-16 code units.
///
/// Invalid UTF-8 is decoded lossily, with each invalid sequence replaced
/// by U+FFFD. The same replacement is used for ASCII bytes above `0x7F`.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Vec<u16> {
    match encoding {
        Encoding::Utf8 => {
            String::from_utf8_lossy(bytes).encode_utf16().collect()
        }
        Encoding::Ascii | Encoding::Latin1 => {
            decode_units(bytes, encoding).collect()
        }
    }
}

/// Decode a byte buffer into a Rust string. This is used for rendering
/// fragments of patterns in error messages.
pub fn decode_to_string(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Ascii | Encoding::Latin1 => {
            String::from_utf16_lossy(&decode(bytes, encoding))
        }
    }
}

/// Widen each byte of a single byte encoding into a code unit.
fn decode_units(
    bytes: &[u8],
    encoding: Encoding,
) -> impl Iterator<Item = u16> + '_ {
    debug_assert!(encoding.is_single_byte());
    let max = encoding.max_unit();
    bytes.iter().map(move |&b| {
        let unit = u16::from(b);
        if unit <= max {
            unit
        } else {
            0xFFFD
        }
    })
}

fn encode_utf8(text: &[u16]) -> Vec<u8> {
    // One code unit needs at most three bytes. A surrogate pair is two
    // code units and needs four.
    let mut buf = Vec::with_capacity(text.len() * 3);
    let mut scratch = [0; 4];
    for result in char::decode_utf16(text.iter().copied()) {
        let ch = result.unwrap_or(char::REPLACEMENT_CHARACTER);
        buf.extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
    }
    buf
}

#[cfg(test)]
mod tests {
    use quickcheck::{QuickCheck, Testable};

    use crate::error::ErrorKind;

    use super::*;

    fn qc<T: Testable>(t: T) {
        QuickCheck::new().tests(2_000).max_tests(4_000).quickcheck(t);
    }

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn empty_always_encodes() {
        for &enc in &[Encoding::Utf8, Encoding::Ascii, Encoding::Latin1] {
            assert_eq!(Vec::<u8>::new(), encode(&[], enc).unwrap());
        }
    }

    #[test]
    fn utf8_surrogate_pair_is_four_bytes() {
        let text = utf16("\u{1D5EE}");
        assert_eq!(2, text.len());
        let bytes = encode(&text, Encoding::Utf8).unwrap();
        assert_eq!(b"\xF0\x9D\x97\xAE", &*bytes);
    }

    #[test]
    fn utf8_unpaired_surrogate_is_replaced() {
        let bytes = encode(&[0x61, 0xD800, 0x62], Encoding::Utf8).unwrap();
        assert_eq!(b"a\xEF\xBF\xBDb", &*bytes);
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        let err = encode(&utf16("caf\u{E9}"), Encoding::Ascii).unwrap_err();
        assert_eq!(
            &ErrorKind::Encoding { argument: "text", encoding: Encoding::Ascii },
            err.kind(),
        );
        // A literal '?' must survive, even though it is also the
        // substitution byte.
        assert_eq!(b"a?b", &*encode(&utf16("a?b"), Encoding::Ascii).unwrap());
    }

    #[test]
    fn latin1_accepts_upper_half() {
        let text = utf16("caf\u{E9}\u{FF}");
        let bytes = encode(&text, Encoding::Latin1).unwrap();
        assert_eq!(b"caf\xE9\xFF", &*bytes);
        assert_eq!(text, decode(&bytes, Encoding::Latin1));
        assert!(encode(&utf16("\u{100}"), Encoding::Latin1).is_err());
    }

    #[test]
    fn decode_strings() {
        assert_eq!("caf\u{E9}", decode_to_string(b"caf\xE9", Encoding::Latin1));
        assert_eq!("a\u{FFFD}", decode_to_string(b"a\xFF", Encoding::Utf8));
        assert_eq!("a\u{FFFD}", decode_to_string(b"a\xFF", Encoding::Ascii));
    }

    #[test]
    fn prop_utf8_roundtrip() {
        fn p(s: String) -> bool {
            let text = utf16(&s);
            let bytes = encode(&text, Encoding::Utf8).unwrap();
            bytes == s.as_bytes() && decode(&bytes, Encoding::Utf8) == text
        }
        qc(p as fn(String) -> bool);
    }

    #[test]
    fn prop_single_byte_fails_iff_out_of_range() {
        fn check(text: &[u16], enc: Encoding, max: u16) -> bool {
            let representable = text.iter().all(|&u| u <= max);
            match encode(text, enc) {
                Ok(bytes) => representable && decode(&bytes, enc) == text,
                Err(_) => !representable,
            }
        }
        fn p(text: Vec<u16>, narrow: Vec<u8>) -> bool {
            // Arbitrary u16s are almost never in range, so also try text
            // drawn from the single byte range.
            let narrow: Vec<u16> = narrow.into_iter().map(u16::from).collect();
            check(&text, Encoding::Ascii, 0x7F)
                && check(&text, Encoding::Latin1, 0xFF)
                && check(&narrow, Encoding::Ascii, 0x7F)
                && check(&narrow, Encoding::Latin1, 0xFF)
        }
        qc(p as fn(Vec<u16>, Vec<u8>) -> bool);
    }
}
