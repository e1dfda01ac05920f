/*!
This crate runs regular expressions over UTF-16 text.

The matching engine underneath, the meta regex from `regex-automata`, only
understands bytes. This crate sits at the boundary: it encodes patterns and
haystacks into UTF-8, ASCII or Latin-1, runs exactly one search per call, and
translates every position the engine reports back into UTF-16 code units.
Surrogate pairs count as two code units, just like they do in the haystack.

Compiled regexes can be shared through a [`RegexCache`], a bounded least
recently used cache keyed by pattern and options. A process wide instance
backs the free functions [`is_match`], [`find`] and friends.

# Example

```
use regex_utf16::{Regex, Span};

let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();

let re = Regex::new(&utf16(r"(\p{L}+)")).unwrap();
// U+1F600 is two code units, so the word starts at offset 3.
let hay = utf16("\u{1F600} caf\u{E9}");
let m = re.find(&hay).unwrap();
assert_eq!(Some(Span::new(3, 4)), m.span());
assert_eq!(Some(Span::new(3, 4)), m.get(1));
```

# Positions

Every search takes a window, given as a start index and a length in code
units. Positions in results are always relative to the start of the whole
haystack. The window is validated before anything else happens: a start or
length beyond the haystack is an [`ErrorKind::Range`] error, and a start that
points at the second half of a surrogate pair is an
[`ErrorKind::InvalidStartIndex`] error.

A search that finds nothing returns [`Match::empty`], which is distinct from
a match of length zero.

# Crate features

* **logging** - Enables the `log` crate to emit messages about cache hits,
misses and evictions, pattern compilation, and window translation. This also
enables logging inside `regex-automata`. Disabled by default.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub use crate::{
    cache::{
        cache_capacity, find, find_bytes, find_bytes_with, find_with, is_match,
        is_match_bytes, is_match_bytes_with, is_match_with, matches,
        matches_with, set_cache_capacity, RegexCache, DEFAULT_CACHE_CAPACITY,
    },
    captures::{Match, Matches, Span},
    codec::{decode, decode_to_string, encode, Encoding},
    error::{CompileError, CompileErrorCode, Error, ErrorKind},
    options::RegexOptions,
    regex::{Regex, RegexBuilder, DEFAULT_MEMORY_BUDGET},
    utf16::{byte_to_utf16_offset, utf16_to_byte_offset, Utf16Cursor},
};

#[macro_use]
mod macros;

mod cache;
mod captures;
mod codec;
mod engine;
mod error;
mod options;
mod regex;
mod search;
mod utf16;
