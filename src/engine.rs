/*!
The boundary with the matching engine.

This is the only module that talks to `regex-automata`. Everything the rest of
the crate needs from the engine goes through `Engine`: compile a pattern given
as bytes in some encoding, probe a byte window for one match while filling in
capture slots, and answer questions about capture groups.

The engine itself is the meta regex from `regex-automata`. It picks among its
own internal strategies (prefilters, lazy DFA, one-pass DFA, PikeVM and so
on) and guarantees linear time searching. We only configure it.
*/

use core::ops::Range;

use regex_automata::{
    meta,
    util::{primitives::NonMaxUsize, syntax},
    Anchored, Input, MatchKind, PatternID,
};
use regex_syntax::{ast, hir};

use crate::{
    codec::{self, Encoding},
    error::{CompileError, CompileErrorCode},
    options::RegexOptions,
};

/// The settings used to compile one pattern.
#[derive(Clone, Debug)]
pub(crate) struct EngineConfig {
    options: RegexOptions,
    memory_budget: usize,
}

impl EngineConfig {
    pub(crate) fn new(
        options: RegexOptions,
        memory_budget: usize,
    ) -> EngineConfig {
        EngineConfig { options, memory_budget }
    }

    fn encoding(&self) -> Encoding {
        self.options.encoding()
    }

    fn has(&self, flag: RegexOptions) -> bool {
        self.options.contains(flag)
    }

    fn syntax(&self) -> syntax::Config {
        let unicode = !self.encoding().is_single_byte();
        syntax::Config::new()
            .case_insensitive(self.has(RegexOptions::IGNORE_CASE))
            .multi_line(self.has(RegexOptions::MULTILINE))
            .dot_matches_new_line(self.has(RegexOptions::SINGLELINE))
            .swap_greed(self.has(RegexOptions::UNGREEDY))
            .ignore_whitespace(
                self.has(RegexOptions::IGNORE_PATTERN_WHITESPACE)
                    && !self.has(RegexOptions::LITERAL),
            )
            .unicode(unicode)
            .utf8(unicode)
    }

    fn meta(&self) -> meta::Config {
        meta::Config::new()
            .match_kind(MatchKind::LeftmostFirst)
            .utf8_empty(!self.encoding().is_single_byte())
            .nfa_size_limit(Some(self.memory_budget))
    }
}

/// A compiled pattern owned by exactly one `Regex`.
///
/// The underlying meta regex keeps a thread safe pool of search caches, so
/// an `Engine` may be probed from many threads at once.
#[derive(Debug)]
pub(crate) struct Engine {
    re: meta::Regex,
}

impl Engine {
    /// Compile a pattern that has already been encoded per the config's
    /// encoding.
    pub(crate) fn compile(
        pattern: &[u8],
        config: &EngineConfig,
    ) -> Result<Engine, CompileError> {
        let syntax = Syntax::new(pattern, config)?;
        let result = meta::Builder::new()
            .configure(config.meta())
            .syntax(config.syntax())
            .build(&syntax.text);
        match result {
            Ok(re) => Ok(Engine { re }),
            Err(err) => Err(classify(&err, &syntax)),
        }
    }

    /// Search `haystack[range]` for the leftmost-first match, writing the
    /// start and end of each capture group into `slots`.
    ///
    /// `slots` holds two entries per group that should be resolved, so its
    /// length determines how many groups are reported. Offsets are always
    /// relative to the start of `haystack`, not the start of `range`.
    pub(crate) fn probe(
        &self,
        haystack: &[u8],
        range: Range<usize>,
        anchored: bool,
        slots: &mut [Option<NonMaxUsize>],
    ) -> bool {
        let anchored = if anchored { Anchored::Yes } else { Anchored::No };
        let input = Input::new(haystack).range(range).anchored(anchored);
        self.re.search_slots(&input, slots).is_some()
    }

    /// Returns true if there is any match in `haystack[range]`.
    pub(crate) fn is_match(&self, haystack: &[u8], range: Range<usize>) -> bool {
        self.re.is_match(Input::new(haystack).range(range))
    }

    /// The number of capture groups, including the implicit group for the
    /// whole match.
    pub(crate) fn captures_len(&self) -> usize {
        self.re.captures_len()
    }

    /// Returns the index of the group with the given name, if one exists.
    pub(crate) fn group_index(&self, name: &str) -> Option<usize> {
        self.re.group_info().to_index(PatternID::ZERO, name)
    }

    /// Returns the name of every group in index order. Unnamed groups,
    /// including group 0, are `None`.
    pub(crate) fn group_names(&self) -> Vec<Option<String>> {
        self.re
            .group_info()
            .pattern_names(PatternID::ZERO)
            .map(|name| name.map(|name| name.to_string()))
            .collect()
    }
}

/// The concrete syntax the engine parses, along with the pattern bytes it was
/// derived from.
///
/// For UTF-8 this is the pattern itself, or its escaped form in literal mode.
/// For single byte encodings, Unicode mode is off and bytes at or above
/// `0x80` are written as `\xHH` escapes, each of which matches exactly that
/// one byte. Literal mode escapes every meta character.
#[derive(Debug)]
struct Syntax<'p> {
    pattern: &'p [u8],
    encoding: Encoding,
    text: String,
    /// For single byte encodings, the index of the pattern byte that produced
    /// each byte of `text`, followed by the pattern length.
    origin: Option<Vec<usize>>,
}

impl<'p> Syntax<'p> {
    fn new(
        pattern: &'p [u8],
        config: &EngineConfig,
    ) -> Result<Syntax<'p>, CompileError> {
        let literal = config.has(RegexOptions::LITERAL);
        let encoding = config.encoding();
        if !encoding.is_single_byte() {
            let text = core::str::from_utf8(pattern).map_err(|err| {
                let bad = &pattern[err.valid_up_to()..];
                CompileError::new(
                    CompileErrorCode::BadUtf8,
                    String::from_utf8_lossy(bad).into_owned(),
                )
            })?;
            let text = if literal {
                regex_syntax::escape(text)
            } else {
                text.to_string()
            };
            return Ok(Syntax { pattern, encoding, text, origin: None });
        }
        let mut text = String::with_capacity(pattern.len());
        let mut origin = Vec::with_capacity(pattern.len() + 1);
        // Whether the previous byte is a backslash that still needs
        // something to escape.
        let mut escaping = false;
        for (i, &b) in pattern.iter().enumerate() {
            if b >= 0x80 {
                if escaping {
                    return Err(CompileError::new(
                        CompileErrorCode::BadEscape,
                        codec::decode_to_string(&pattern[i - 1..=i], encoding),
                    ));
                }
                text.push_str(&format!("\\x{:02X}", b));
            } else if literal && regex_syntax::is_meta_character(char::from(b))
            {
                text.push('\\');
                text.push(char::from(b));
            } else {
                text.push(char::from(b));
            }
            escaping = !literal && !escaping && b == b'\\';
            origin.resize(text.len(), i);
        }
        origin.push(pattern.len());
        Ok(Syntax { pattern, encoding, text, origin: Some(origin) })
    }

    /// The whole pattern, decoded in its own encoding.
    fn whole(&self) -> String {
        codec::decode_to_string(self.pattern, self.encoding)
    }

    /// The part of the pattern covered by `span`, which points into `text`.
    /// Falls back to the whole pattern when the span is empty or does not
    /// line up with the pattern.
    fn fragment(&self, span: &ast::Span) -> String {
        let (start, end) = (span.start.offset, span.end.offset);
        let fragment = match self.origin {
            None => self.text.get(start..end).map(|s| s.to_string()),
            Some(ref origin) => {
                let from = origin.get(start).copied();
                let to = match end.checked_sub(1) {
                    None => Some(0),
                    Some(last) => origin.get(last).map(|&i| i + 1),
                };
                match (from, to) {
                    (Some(from), Some(to)) if from <= to => {
                        let bytes = self.pattern.get(from..to);
                        bytes.map(|b| codec::decode_to_string(b, self.encoding))
                    }
                    _ => None,
                }
            }
        };
        match fragment {
            Some(fragment) if !fragment.is_empty() => fragment,
            _ => self.whole(),
        }
    }
}

/// Map a build failure onto our compile error taxonomy, along with the
/// fragment of the pattern that caused it.
fn classify(err: &meta::BuildError, syntax: &Syntax<'_>) -> CompileError {
    if let Some(_limit) = err.size_limit() {
        debug!("pattern exceeded its memory budget of {} bytes", _limit);
        return CompileError::new(
            CompileErrorCode::PatternTooLarge,
            syntax.whole(),
        );
    }
    let (code, fragment) = match err.syntax_error() {
        Some(regex_syntax::Error::Parse(e)) => {
            (parse_code(e.kind()), syntax.fragment(e.span()))
        }
        Some(regex_syntax::Error::Translate(e)) => {
            (translate_code(e.kind()), syntax.fragment(e.span()))
        }
        _ => (CompileErrorCode::Internal, syntax.whole()),
    };
    CompileError::new(code, fragment)
}

fn parse_code(kind: &ast::ErrorKind) -> CompileErrorCode {
    use self::CompileErrorCode::*;
    use regex_syntax::ast::ErrorKind as K;

    match *kind {
        K::CaptureLimitExceeded | K::NestLimitExceeded { .. } => {
            PatternTooLarge
        }
        K::ClassEscapeInvalid => BadEscape,
        K::ClassRangeInvalid | K::ClassRangeLiteral => BadCharRange,
        K::ClassUnclosed => MissingBracket,
        K::DecimalEmpty | K::DecimalInvalid => RepeatSize,
        K::EscapeHexEmpty
        | K::EscapeHexInvalid
        | K::EscapeHexInvalidDigit
        | K::EscapeUnrecognized => BadEscape,
        K::EscapeUnexpectedEof => TrailingBackslash,
        K::FlagDanglingNegation
        | K::FlagDuplicate { .. }
        | K::FlagRepeatedNegation { .. }
        | K::FlagUnexpectedEof
        | K::FlagUnrecognized => BadPerlOp,
        K::GroupNameDuplicate { .. }
        | K::GroupNameEmpty
        | K::GroupNameInvalid
        | K::GroupNameUnexpectedEof => BadNamedCapture,
        K::GroupUnclosed | K::GroupUnopened => MissingParen,
        K::RepetitionCountInvalid
        | K::RepetitionCountDecimalEmpty
        | K::RepetitionCountUnclosed => RepeatSize,
        K::RepetitionMissing => RepeatArgument,
        K::UnicodeClassInvalid => BadCharClass,
        K::UnsupportedBackreference | K::UnsupportedLookAround => BadPerlOp,
        _ => Internal,
    }
}

fn translate_code(kind: &hir::ErrorKind) -> CompileErrorCode {
    use self::CompileErrorCode::*;
    use regex_syntax::hir::ErrorKind as K;

    match *kind {
        K::InvalidUtf8 => BadUtf8,
        K::UnicodeNotAllowed
        | K::UnicodePropertyNotFound
        | K::UnicodePropertyValueNotFound
        | K::UnicodePerlClassNotFound => BadCharClass,
        _ => Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str, options: RegexOptions) -> Engine {
        let config = EngineConfig::new(options, 10 * (1 << 20));
        Engine::compile(pattern.as_bytes(), &config).unwrap()
    }

    fn compile_err(pattern: &[u8], options: RegexOptions) -> CompileError {
        let config = EngineConfig::new(options, 10 * (1 << 20));
        Engine::compile(pattern, &config).unwrap_err()
    }

    #[test]
    fn probe_reports_absolute_offsets() {
        let engine = compile(r"a(b)?c", RegexOptions::empty());
        assert_eq!(2, engine.captures_len());
        let mut slots = vec![None; 4];
        assert!(engine.probe(b"xxacxabc", 1..8, false, &mut slots));
        let got: Vec<Option<usize>> =
            slots.iter().map(|s| s.map(|s| s.get())).collect();
        assert_eq!(vec![Some(2), Some(4), None, None], got);
        assert!(!engine.probe(b"xxacxabc", 1..8, true, &mut slots));
    }

    #[test]
    fn single_byte_patterns_match_bytes() {
        let engine = compile_bytes(b"caf\xE9", RegexOptions::LATIN1);
        assert!(engine.is_match(b"un caf\xE9", 0..7));
        assert!(!engine.is_match("un caf\u{E9}".as_bytes(), 0..8));
    }

    fn compile_bytes(pattern: &[u8], options: RegexOptions) -> Engine {
        let config = EngineConfig::new(options, 10 * (1 << 20));
        Engine::compile(pattern, &config).unwrap()
    }

    #[test]
    fn literal_mode_escapes() {
        let engine = compile(r"a.b(", RegexOptions::LITERAL);
        assert!(engine.is_match(b"xa.b(", 0..5));
        assert!(!engine.is_match(b"xaxb(", 0..5));
        let engine = compile(r"a.b(", RegexOptions::LITERAL | RegexOptions::ASCII);
        assert!(engine.is_match(b"xa.b(", 0..5));
    }

    #[test]
    fn group_names() {
        let engine = compile(r"(?P<year>\d+)-(\d+)", RegexOptions::empty());
        assert_eq!(Some(1), engine.group_index("year"));
        assert_eq!(None, engine.group_index("month"));
        assert_eq!(
            vec![None, Some("year".to_string()), None],
            engine.group_names(),
        );
    }

    #[test]
    fn classification() {
        let err = compile_err(b"a(b", RegexOptions::empty());
        assert_eq!(CompileErrorCode::MissingParen, err.code());
        let err = compile_err(b"[a", RegexOptions::empty());
        assert_eq!(CompileErrorCode::MissingBracket, err.code());
        let err = compile_err(b"*a", RegexOptions::empty());
        assert_eq!(CompileErrorCode::RepeatArgument, err.code());
        let err = compile_err(b"[z-a]", RegexOptions::empty());
        assert_eq!(CompileErrorCode::BadCharRange, err.code());
        assert_eq!("z-a", err.fragment());
        let err = compile_err(b"\\", RegexOptions::empty());
        assert_eq!(CompileErrorCode::TrailingBackslash, err.code());
        let err = compile_err(b"(?P<n>a)(?P<n>b)", RegexOptions::empty());
        assert_eq!(CompileErrorCode::BadNamedCapture, err.code());
        let err = compile_err(b"\xFF", RegexOptions::empty());
        assert_eq!(CompileErrorCode::BadUtf8, err.code());
    }

    #[test]
    fn memory_budget_is_enforced() {
        let config = EngineConfig::new(RegexOptions::empty(), 100);
        let err = Engine::compile(br"\w{100}", &config).unwrap_err();
        assert_eq!(CompileErrorCode::PatternTooLarge, err.code());
        assert_eq!(r"\w{100}", err.fragment());
    }

    #[test]
    fn single_byte_backslash_before_upper_half_byte() {
        let err = compile_err(b"a\\\xE9", RegexOptions::LATIN1);
        assert_eq!(CompileErrorCode::BadEscape, err.code());
        assert_eq!("\\\u{E9}", err.fragment());
        let err = compile_err(b"[\\\xE9]", RegexOptions::LATIN1);
        assert_eq!(CompileErrorCode::BadEscape, err.code());

        // An escaped backslash does not escape what follows it.
        let engine = compile_bytes(b"a\\\\\xE9", RegexOptions::LATIN1);
        assert!(engine.is_match(b"a\\\xE9", 0..3));
        assert!(!engine.is_match(b"a\\xE9", 0..5));

        let engine = compile_bytes(
            b"a\\\xE9",
            RegexOptions::LATIN1 | RegexOptions::LITERAL,
        );
        assert!(engine.is_match(b"a\\\xE9", 0..3));
    }

    #[test]
    fn single_byte_escapes_and_classes() {
        let engine = compile_bytes(br"\x41\.\d", RegexOptions::ASCII);
        assert!(engine.is_match(b"A.1", 0..3));
        assert!(!engine.is_match(b"AB1", 0..3));

        let engine = compile_bytes(b"^[\xE0-\xFF]+$", RegexOptions::LATIN1);
        assert!(engine.is_match(b"\xE0\xE9\xFF", 0..3));
        assert!(!engine.is_match(b"\xE0\xC9\xFF", 0..3));
        let engine = compile_bytes(b"[^\xE0-\xFF]", RegexOptions::LATIN1);
        assert!(engine.is_match(b"\xE9a", 0..2));
        assert!(!engine.is_match(b"\xE9\xEA", 0..2));
    }

    #[test]
    fn single_byte_error_fragments_come_from_the_pattern() {
        let err = compile_err(b"[\xE9-a]", RegexOptions::LATIN1);
        assert_eq!(CompileErrorCode::BadCharRange, err.code());
        assert_eq!("\u{E9}-a", err.fragment());

        let err = compile_err(b"(?P<caf\xE9>x)", RegexOptions::LATIN1);
        assert_eq!(CompileErrorCode::BadNamedCapture, err.code());
        assert!(err.fragment().contains('\u{E9}'), "{:?}", err.fragment());
        assert!(!err.fragment().contains("\\x"), "{:?}", err.fragment());
    }
}
