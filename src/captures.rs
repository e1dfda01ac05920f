/// A span of UTF-16 code units in a haystack.
///
/// All positions reported by this crate for text haystacks are in UTF-16
/// code units relative to the start of the entire haystack, regardless of
/// the window that was searched. For byte haystacks, they are byte offsets.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span {
    start: usize,
    len: usize,
}

impl Span {
    /// Create a span from a starting offset and a length.
    #[inline]
    pub fn new(start: usize, len: usize) -> Span {
        Span { start, len }
    }

    /// The offset of the first code unit in this span.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The offset immediately following the last code unit in this span.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The number of code units in this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this span has length zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The range of code units covered by this span. It is always valid to
    /// slice the haystack that was searched with it.
    #[inline]
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end()
    }
}

impl core::fmt::Debug for Span {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl From<Span> for core::ops::Range<usize> {
    fn from(span: Span) -> core::ops::Range<usize> {
        span.range()
    }
}

/// The result of a single search.
///
/// A `Match` either represents a successful match, in which case it carries
/// the span of the whole match (group `0`) and of every capture group, or it
/// is the distinguished empty value returned by [`Match::empty`] when nothing
/// matched.
///
/// The empty value is different from a match of length zero at offset zero:
/// the former has no groups at all, while the latter has a group `0` whose
/// span is `0..0`.
///
/// A capture group that did not participate in the match is `None`. That too
/// is different from a group that matched the empty string.
///
/// A `Match` owns all of its data. It never refers back to the haystack or to
/// any intermediate buffer used while searching.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Match {
    groups: Vec<Option<Span>>,
}

impl Match {
    /// The value representing "no match".
    #[inline]
    pub const fn empty() -> Match {
        Match { groups: Vec::new() }
    }

    pub(crate) fn new(groups: Vec<Option<Span>>) -> Match {
        debug_assert!(groups.first().map_or(false, |g| g.is_some()));
        Match { groups }
    }

    /// Returns true if this represents a successful match.
    #[inline]
    pub fn is_match(&self) -> bool {
        !self.groups.is_empty()
    }

    /// The span of the whole match, or `None` when nothing matched.
    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.get(0)
    }

    /// The starting offset of the whole match. This is `0` when nothing
    /// matched; use [`Match::is_match`] to tell the two apart.
    #[inline]
    pub fn start(&self) -> usize {
        self.span().map_or(0, |s| s.start())
    }

    /// The ending offset of the whole match. This is `0` when nothing
    /// matched.
    #[inline]
    pub fn end(&self) -> usize {
        self.span().map_or(0, |s| s.end())
    }

    /// The length of the whole match. This is `0` when nothing matched.
    #[inline]
    pub fn len(&self) -> usize {
        self.span().map_or(0, |s| s.len())
    }

    /// Returns the span of the capture group at index `i`.
    ///
    /// This returns `None` if nothing matched, if `i` is not a group that was
    /// resolved for this match, or if the group did not participate in the
    /// match.
    #[inline]
    pub fn get(&self, i: usize) -> Option<Span> {
        self.groups.get(i).copied().flatten()
    }

    /// The number of groups resolved for this match, including group `0`.
    /// This is `0` for the empty value.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.groups.len()
    }

    /// An iterator over every resolved group in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<Span>> + '_ {
        self.groups.iter().copied()
    }
}

/// A sequence of matches produced by a single search.
///
/// Since every search runs the engine exactly once, this yields either zero
/// or one [`Match`]. It exists to adapt a search result to code that expects
/// a collection.
#[derive(Clone, Debug)]
pub struct Matches {
    next: Option<Match>,
}

impl Matches {
    pub(crate) fn new(m: Match) -> Matches {
        Matches { next: if m.is_match() { Some(m) } else { None } }
    }
}

impl Iterator for Matches {
    type Item = Match;

    #[inline]
    fn next(&mut self) -> Option<Match> {
        self.next.take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.next.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for Matches {}

impl core::iter::FusedIterator for Matches {}
