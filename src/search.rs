/*!
Orchestrates a single search: validate the window, encode the haystack,
translate the window into bytes, probe the engine once and translate every
reported byte span back into UTF-16 code units.

Translation back to UTF-16 is incremental. A `Utf16Cursor` starts at the
beginning of the search window and is threaded through the groups in index
order, so resolving `g` groups costs time proportional to the bytes between
consecutive group boundaries instead of `g` scans from the start of the
haystack.
*/

use std::borrow::Cow;

use regex_automata::util::primitives::NonMaxUsize;

use crate::{
    captures::{Match, Span},
    codec,
    error::Error,
    regex::Regex,
    utf16::Utf16Cursor,
};

/// A haystack as given by the caller.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Haystack<'h> {
    /// UTF-16 text. It is encoded per the regex options before searching.
    Text(&'h [u16]),
    /// Raw bytes. These are searched as is, and offsets are byte offsets.
    Bytes(&'h [u8]),
}

impl<'h> Haystack<'h> {
    fn len(&self) -> usize {
        match *self {
            Haystack::Text(text) => text.len(),
            Haystack::Bytes(bytes) => bytes.len(),
        }
    }
}

/// Everything the engine needs for one probe.
///
/// The buffer lives exactly as long as this value, which never escapes the
/// search routine that created it.
#[derive(Debug)]
struct Prepared<'h> {
    buf: Cow<'h, [u8]>,
    /// The byte range to search.
    window: core::ops::Range<usize>,
    /// Where the window starts, in both bytes and code units. This is `None`
    /// when byte offsets already are the offsets reported to the caller.
    cursor: Option<Utf16Cursor>,
}

/// Find the leftmost-first match of `re` in `haystack[start..start+length]`.
pub(crate) fn find(
    re: &Regex,
    haystack: Haystack<'_>,
    start: usize,
    length: usize,
) -> Result<Match, Error> {
    let prepared = prepare(re, haystack, start, length)?;
    let mut slots = vec![None; re.captures_len() * 2];
    let found = re.engine().probe(
        &prepared.buf,
        prepared.window.clone(),
        false,
        &mut slots,
    );
    if !found {
        return Ok(Match::empty());
    }
    Ok(Match::new(resolve(&prepared.buf, prepared.cursor, &slots)))
}

/// Returns true if `re` matches anywhere in
/// `haystack[start..start+length]`.
pub(crate) fn is_match(
    re: &Regex,
    haystack: Haystack<'_>,
    start: usize,
    length: usize,
) -> Result<bool, Error> {
    let prepared = prepare(re, haystack, start, length)?;
    Ok(re.engine().is_match(&prepared.buf, prepared.window))
}

/// Check the window against the haystack. This runs before anything is
/// allocated or searched.
fn validate(
    haystack: Haystack<'_>,
    start: usize,
    length: usize,
) -> Result<(), Error> {
    let len = haystack.len();
    if start > len {
        return Err(Error::range(
            "startIndex",
            "start index cannot be greater than input length",
        ));
    }
    if length > len {
        return Err(Error::range(
            "length",
            "length cannot be greater than input length",
        ));
    }
    if length > len - start {
        return Err(Error::range(
            "startIndex, length",
            "start index and length combined cannot be greater than \
             input length",
        ));
    }
    if let Haystack::Text(text) = haystack {
        if start > 0 && start < len && bisects_pair(text, start) {
            return Err(Error::invalid_start_index(start));
        }
    }
    Ok(())
}

/// Returns true if `text[at]` is the low half of a surrogate pair.
fn bisects_pair(text: &[u16], at: usize) -> bool {
    let is_high = |u: u16| (0xD800..=0xDBFF).contains(&u);
    let is_low = |u: u16| (0xDC00..=0xDFFF).contains(&u);
    is_low(text[at]) && is_high(text[at - 1])
}

fn prepare<'h>(
    re: &Regex,
    haystack: Haystack<'h>,
    start: usize,
    length: usize,
) -> Result<Prepared<'h>, Error> {
    validate(haystack, start, length)?;
    let text = match haystack {
        Haystack::Bytes(bytes) => {
            return Ok(Prepared {
                buf: Cow::Borrowed(bytes),
                window: start..start + length,
                cursor: None,
            });
        }
        Haystack::Text(text) => text,
    };
    let encoding = re.options().encoding();
    let buf = codec::encode_argument(text, encoding, "input")?;
    if encoding.is_single_byte() {
        return Ok(Prepared {
            buf: Cow::Owned(buf),
            window: start..start + length,
            cursor: None,
        });
    }
    let begin = Utf16Cursor::start().advance_units(&buf, start);
    let end = begin.advance_units(&buf, length);
    trace!(
        "UTF-16 window {}..{} is byte window {}..{}",
        start,
        start + length,
        begin.byte(),
        end.byte(),
    );
    Ok(Prepared {
        buf: Cow::Owned(buf),
        window: begin.byte()..end.byte(),
        cursor: Some(begin),
    })
}

/// Convert engine slots into group spans, in group index order.
///
/// When `cursor` is `None`, byte offsets are reported as is. Otherwise each
/// group is translated starting from where the previous group's translation
/// ended.
fn resolve(
    buf: &[u8],
    mut cursor: Option<Utf16Cursor>,
    slots: &[Option<NonMaxUsize>],
) -> Vec<Option<Span>> {
    let mut groups = Vec::with_capacity(slots.len() / 2);
    for pair in slots.chunks_exact(2) {
        let (start, end) = match (pair[0], pair[1]) {
            (Some(start), Some(end)) => (start.get(), end.get()),
            _ => {
                groups.push(None);
                continue;
            }
        };
        let span = match cursor {
            None => Span::new(start, end - start),
            Some(at) => {
                let (span, next) = translate_span(buf, at, start, end);
                cursor = Some(next);
                span
            }
        };
        groups.push(Some(span));
    }
    groups
}

/// Translate one byte span into code units, walking from `at`. Returns the
/// span and a cursor positioned at the end of the span.
fn translate_span(
    buf: &[u8],
    at: Utf16Cursor,
    start: usize,
    end: usize,
) -> (Span, Utf16Cursor) {
    let first = at.seek(buf, start);
    let last = first.seek(buf, end);
    (Span::new(first.unit(), last.unit() - first.unit()), last)
}

#[cfg(test)]
mod tests {
    use quickcheck::{QuickCheck, Testable};

    use crate::{error::ErrorKind, utf16::byte_to_utf16_offset};

    use super::*;

    fn qc<T: Testable>(t: T) {
        QuickCheck::new().tests(1_000).max_tests(2_000).quickcheck(t);
    }

    fn slot(offset: usize) -> Option<NonMaxUsize> {
        NonMaxUsize::new(offset)
    }

    #[test]
    fn validation_order() {
        let text: Vec<u16> = "a\u{1F600}b".encode_utf16().collect();
        let hay = Haystack::Text(&text);
        let kind = |r: Result<(), Error>| r.unwrap_err().kind().clone();

        assert!(matches!(
            kind(validate(hay, 5, 0)),
            ErrorKind::Range { argument: "startIndex", .. }
        ));
        assert!(matches!(
            kind(validate(hay, 0, 5)),
            ErrorKind::Range { argument: "length", .. }
        ));
        assert!(matches!(
            kind(validate(hay, 2, 3)),
            ErrorKind::Range { argument: "startIndex, length", .. }
        ));
        assert_eq!(
            ErrorKind::InvalidStartIndex { index: 2 },
            kind(validate(hay, 2, 1)),
        );
        assert!(validate(hay, 1, 3).is_ok());
        assert!(validate(hay, 4, 0).is_ok());
        // Byte haystacks have no surrogates to bisect.
        assert!(validate(Haystack::Bytes(b"\xDC\xDC\xDC"), 1, 1).is_ok());
    }

    #[test]
    fn lone_low_surrogate_is_a_valid_start() {
        let text = [0x61, 0xDC00, 0x62];
        assert!(validate(Haystack::Text(&text), 1, 2).is_ok());
    }

    #[test]
    fn resolve_identity() {
        let slots = [slot(2), slot(5), None, None, slot(3), slot(3)];
        let groups = resolve(b"unused", None, &slots);
        assert_eq!(
            vec![Some(Span::new(2, 3)), None, Some(Span::new(3, 0))],
            groups,
        );
    }

    #[test]
    fn resolve_handles_groups_out_of_order() {
        // x 𝗮 y z, where group 2 starts before group 1.
        let buf = "x\u{1D5EE}yz".as_bytes();
        let slots = [slot(0), slot(7), slot(5), slot(6), slot(1), slot(5)];
        let groups = resolve(buf, Some(Utf16Cursor::start()), &slots);
        assert_eq!(
            vec![
                Some(Span::new(0, 5)),
                Some(Span::new(3, 1)),
                Some(Span::new(1, 2)),
            ],
            groups,
        );
    }

    #[test]
    fn prop_incremental_matches_naive() {
        fn p(s: String, offsets: Vec<(usize, usize)>) -> bool {
            let buf = s.as_bytes();
            let bounds: Vec<usize> = (0..=buf.len())
                .filter(|&i| s.is_char_boundary(i))
                .collect();
            let mut slots = vec![];
            for &(a, b) in offsets.iter() {
                let a = bounds[a % bounds.len()];
                let b = bounds[b % bounds.len()];
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                slots.push(slot(a));
                slots.push(slot(b));
            }
            let got = resolve(buf, Some(Utf16Cursor::start()), &slots);
            let want: Vec<Option<Span>> = slots
                .chunks_exact(2)
                .map(|pair| {
                    let start = byte_to_utf16_offset(buf, pair[0]?.get());
                    let end = byte_to_utf16_offset(buf, pair[1]?.get());
                    Some(Span::new(start, end - start))
                })
                .collect();
            got == want
        }
        qc(p as fn(String, Vec<(usize, usize)>) -> bool);
    }
}
