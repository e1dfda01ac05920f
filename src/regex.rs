use std::sync::Arc;

use crate::{
    captures::{Match, Matches},
    codec::{self, Encoding},
    engine::{Engine, EngineConfig},
    error::Error,
    options::RegexOptions,
    search::{self, Haystack},
};

/// The memory budget, in bytes, given to regexes that don't set one
/// explicitly. This is also the budget of every regex built by a
/// [`RegexCache`](crate::RegexCache).
pub const DEFAULT_MEMORY_BUDGET: usize = 8 << 20;

/// A compiled regular expression for searching UTF-16 haystacks.
///
/// A `Regex` owns everything it was built from: the pattern as UTF-16 code
/// units, its options and its memory budget, along with the compiled
/// matching engine. None of these ever change after construction.
///
/// All positions reported by a `Regex` are UTF-16 code unit offsets into the
/// haystack given. Internally, every haystack is first encoded into the
/// regex's [`Encoding`], searched, and every byte offset reported by the
/// engine is translated back.
///
/// Each of the search routines also has a byte form, e.g.,
/// [`Regex::find_bytes`], that searches a byte slice as is. Offsets reported
/// by those routines are byte offsets.
///
/// A `Regex` can be searched from many threads simultaneously.
///
/// # Example
///
/// ```
/// use regex_utf16::{Regex, Span};
///
/// let pattern: Vec<u16> = r"a(b)c".encode_utf16().collect();
/// let hay: Vec<u16> = "xxabcxx".encode_utf16().collect();
///
/// let re = Regex::new(&pattern).unwrap();
/// let m = re.find(&hay).unwrap();
/// assert_eq!(Some(Span::new(2, 3)), m.span());
/// assert_eq!(Some(Span::new(3, 1)), m.get(1));
/// ```
pub struct Regex {
    pattern: Arc<[u16]>,
    options: RegexOptions,
    memory_budget: usize,
    engine: Engine,
    group_count: usize,
}

impl core::fmt::Display for Regex {
    /// Shows the original pattern, with unpaired surrogates replaced.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", String::from_utf16_lossy(&self.pattern))
    }
}

impl core::fmt::Debug for Regex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &String::from_utf16_lossy(&self.pattern))
            .field("options", &self.options)
            .field("memory_budget", &self.memory_budget)
            .finish()
    }
}

/// Construction and introspection.
impl Regex {
    /// Compiles a regular expression with default options and the default
    /// memory budget.
    ///
    /// # Errors
    ///
    /// If the pattern is invalid, or if the compiled regex would exceed its
    /// memory budget, then an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_utf16::Regex;
    ///
    /// let pattern: Vec<u16> = r"foo(bar".encode_utf16().collect();
    /// assert!(Regex::new(&pattern).is_err());
    /// ```
    pub fn new(pattern: &[u16]) -> Result<Regex, Error> {
        RegexBuilder::new(pattern).build()
    }

    /// Compiles a regular expression with the given options and the default
    /// memory budget.
    ///
    /// # Errors
    ///
    /// In addition to the errors reported by [`Regex::new`], this returns an
    /// error if `options` contains unknown bits, or if the pattern cannot be
    /// encoded in the encoding selected by `options`.
    pub fn with_options(
        pattern: &[u16],
        options: RegexOptions,
    ) -> Result<Regex, Error> {
        RegexBuilder::new(pattern).options(options).build()
    }

    /// Returns the pattern this regex was compiled from.
    #[inline]
    pub fn pattern(&self) -> &[u16] {
        &self.pattern
    }

    pub(crate) fn shared_pattern(&self) -> &Arc<[u16]> {
        &self.pattern
    }

    /// Returns the options this regex was compiled with.
    #[inline]
    pub fn options(&self) -> RegexOptions {
        self.options
    }

    /// Returns the memory budget, in bytes, this regex was compiled with.
    #[inline]
    pub fn memory_budget(&self) -> usize {
        self.memory_budget
    }

    /// Returns the encoding that patterns and haystacks are converted to.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.options.encoding()
    }

    /// Returns the number of groups reported for every match, including the
    /// implicit group `0` for the overall match.
    ///
    /// When the regex was built with [`RegexOptions::SINGLE_CAPTURE`], this
    /// is always `1`.
    #[inline]
    pub fn captures_len(&self) -> usize {
        self.group_count
    }

    /// Returns the index of the capture group with the given name, or `None`
    /// if there is no such group.
    ///
    /// The index is the group's position in the pattern, even when the regex
    /// only reports the overall match.
    ///
    /// # Errors
    ///
    /// If `name` cannot be encoded in this regex's encoding.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_utf16::Regex;
    ///
    /// let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
    /// let re = Regex::new(&utf16(r"(?P<y>\d{4})-(?P<m>\d{2})")).unwrap();
    /// assert_eq!(Some(2), re.group_number_from_name(&utf16("m")).unwrap());
    /// assert_eq!(None, re.group_number_from_name(&utf16("d")).unwrap());
    /// ```
    pub fn group_number_from_name(
        &self,
        name: &[u16],
    ) -> Result<Option<usize>, Error> {
        let encoding = self.encoding();
        let bytes = codec::encode_argument(name, encoding, "name")?;
        let name = codec::decode_to_string(&bytes, encoding);
        Ok(self.engine.group_index(&name))
    }

    /// Returns the name of every capture group in the pattern, in index
    /// order. Group `0` and unnamed groups are `None`.
    pub fn group_names(&self) -> Vec<Option<String>> {
        self.engine.group_names()
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Searching UTF-16 text.
impl Regex {
    /// Returns true if and only if there is a match anywhere in `input`.
    ///
    /// # Errors
    ///
    /// If `input` cannot be encoded in this regex's encoding.
    pub fn is_match(&self, input: &[u16]) -> Result<bool, Error> {
        self.is_match_at(input, 0)
    }

    /// Returns true if and only if there is a match in `input` at or after
    /// `start`.
    ///
    /// Look-around assertions such as `\b` and `^` still see the text before
    /// `start`.
    ///
    /// # Errors
    ///
    /// If `start > input.len()`, if `start` points at the second code unit
    /// of a surrogate pair, or if `input` cannot be encoded in this regex's
    /// encoding.
    pub fn is_match_at(
        &self,
        input: &[u16],
        start: usize,
    ) -> Result<bool, Error> {
        let length = input.len().saturating_sub(start);
        search::is_match(self, Haystack::Text(input), start, length)
    }

    /// Returns the leftmost-first match in `input`, or [`Match::empty`] if
    /// there is none.
    ///
    /// # Errors
    ///
    /// If `input` cannot be encoded in this regex's encoding.
    pub fn find(&self, input: &[u16]) -> Result<Match, Error> {
        self.find_at(input, 0)
    }

    /// Returns the leftmost-first match in `input` that starts at or after
    /// `start`.
    ///
    /// # Errors
    ///
    /// The same as for [`Regex::is_match_at`].
    pub fn find_at(&self, input: &[u16], start: usize) -> Result<Match, Error> {
        let length = input.len().saturating_sub(start);
        self.find_in(input, start, length)
    }

    /// Returns the leftmost-first match within the window
    /// `input[start..start + length]`.
    ///
    /// Positions in the returned match are relative to the beginning of
    /// `input`, not the beginning of the window.
    ///
    /// # Errors
    ///
    /// If the window does not fit in `input`, if `start` points at the
    /// second code unit of a surrogate pair, or if `input` cannot be encoded
    /// in this regex's encoding. The window is always checked before
    /// anything is encoded or searched.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_utf16::{Regex, Span};
    ///
    /// let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
    /// let re = Regex::new(&utf16(r"\d+")).unwrap();
    /// let hay = utf16("1 22 333");
    /// let m = re.find_in(&hay, 1, 4).unwrap();
    /// assert_eq!(Some(Span::new(2, 2)), m.span());
    /// ```
    pub fn find_in(
        &self,
        input: &[u16],
        start: usize,
        length: usize,
    ) -> Result<Match, Error> {
        search::find(self, Haystack::Text(input), start, length)
    }

    /// Returns every match in `input` as a collection. A search always runs
    /// the engine once, so this has at most one element.
    pub fn matches(&self, input: &[u16]) -> Result<Matches, Error> {
        self.matches_at(input, 0)
    }

    /// Like [`Regex::matches`], but the search starts at `start`.
    pub fn matches_at(
        &self,
        input: &[u16],
        start: usize,
    ) -> Result<Matches, Error> {
        self.find_at(input, start).map(Matches::new)
    }
}

/// Searching raw bytes.
///
/// Byte haystacks are never encoded or validated against the regex's
/// encoding, and offsets in them are never translated. A UTF-8 regex may
/// still only match valid UTF-8 in them.
impl Regex {
    /// Returns true if and only if there is a match anywhere in `input`.
    pub fn is_match_bytes(&self, input: &[u8]) -> bool {
        // The window is the whole haystack, so validation cannot fail.
        self.is_match_bytes_at(input, 0).unwrap_or(false)
    }

    /// Returns true if and only if there is a match in `input` at or after
    /// `start`.
    ///
    /// # Errors
    ///
    /// If `start > input.len()`.
    pub fn is_match_bytes_at(
        &self,
        input: &[u8],
        start: usize,
    ) -> Result<bool, Error> {
        let length = input.len().saturating_sub(start);
        search::is_match(self, Haystack::Bytes(input), start, length)
    }

    /// Returns the leftmost-first match in `input`, or [`Match::empty`] if
    /// there is none.
    pub fn find_bytes(&self, input: &[u8]) -> Match {
        self.find_bytes_at(input, 0).unwrap_or_default()
    }

    /// Returns the leftmost-first match in `input` that starts at or after
    /// `start`.
    ///
    /// # Errors
    ///
    /// If `start > input.len()`.
    pub fn find_bytes_at(
        &self,
        input: &[u8],
        start: usize,
    ) -> Result<Match, Error> {
        let length = input.len().saturating_sub(start);
        self.find_bytes_in(input, start, length)
    }

    /// Returns the leftmost-first match within the window
    /// `input[start..start + length]`.
    ///
    /// # Errors
    ///
    /// If the window does not fit in `input`.
    pub fn find_bytes_in(
        &self,
        input: &[u8],
        start: usize,
        length: usize,
    ) -> Result<Match, Error> {
        search::find(self, Haystack::Bytes(input), start, length)
    }

    /// Returns every match in `input` as a collection of at most one
    /// element.
    pub fn matches_bytes(&self, input: &[u8]) -> Matches {
        Matches::new(self.find_bytes(input))
    }
}

/// A configurable builder for a [`Regex`].
///
/// # Example
///
/// ```
/// use regex_utf16::{RegexBuilder, RegexOptions};
///
/// let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
/// let re = RegexBuilder::new(&utf16("caf\u{E9}"))
///     .options(RegexOptions::LATIN1 | RegexOptions::IGNORE_CASE)
///     .memory_budget(1 << 20)
///     .build()
///     .unwrap();
/// // Case folding is ASCII only in single byte encodings.
/// assert!(re.is_match(&utf16("CAF\u{E9}")).unwrap());
/// assert!(!re.is_match(&utf16("CAF\u{C9}")).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: Vec<u16>,
    options: RegexOptions,
    memory_budget: usize,
}

impl RegexBuilder {
    /// Create a new builder with default options and the default memory
    /// budget for the given pattern.
    pub fn new(pattern: &[u16]) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_vec(),
            options: RegexOptions::empty(),
            memory_budget: DEFAULT_MEMORY_BUDGET,
        }
    }

    /// Set the options to compile the pattern with. This replaces any
    /// options set previously.
    pub fn options(&mut self, options: RegexOptions) -> &mut RegexBuilder {
        self.options = options;
        self
    }

    /// Set the approximate number of bytes the compiled regex may use.
    ///
    /// Patterns whose compiled form exceeds this are rejected with
    /// [`CompileErrorCode::PatternTooLarge`](crate::CompileErrorCode).
    ///
    /// The default is [`DEFAULT_MEMORY_BUDGET`].
    pub fn memory_budget(&mut self, bytes: usize) -> &mut RegexBuilder {
        self.memory_budget = bytes;
        self
    }

    /// Compiles the pattern with the configuration set on this builder.
    ///
    /// # Errors
    ///
    /// If the options contain unknown bits, if the pattern cannot be encoded
    /// in the selected encoding, or if the engine rejects the pattern.
    pub fn build(&self) -> Result<Regex, Error> {
        self.options.validate()?;
        let encoding = self.options.encoding();
        let bytes = codec::encode_argument(&self.pattern, encoding, "pattern")?;
        debug!(
            "compiling {:?} with options {:?} as {}",
            String::from_utf16_lossy(&self.pattern),
            self.options,
            encoding,
        );
        let config = EngineConfig::new(self.options, self.memory_budget);
        let engine = Engine::compile(&bytes, &config).map_err(|err| {
            let pattern = String::from_utf16_lossy(&self.pattern);
            Error::compile(err.with_pattern(pattern))
        })?;
        let group_count = if self.options.contains(RegexOptions::SINGLE_CAPTURE)
        {
            1
        } else {
            engine.captures_len()
        };
        Ok(Regex {
            pattern: Arc::from(self.pattern.as_slice()),
            options: self.options,
            memory_budget: self.memory_budget,
            engine,
            group_count,
        })
    }
}
