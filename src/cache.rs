/*!
A bounded cache of compiled regexes, keyed by pattern and options.

The cache keeps its entries in recency order. A lookup that hits promotes
the entry to most recently used, and a miss that finds the cache full evicts
the least recently used entry. Every operation on the cache runs under one
lock, including compilation on a miss, so a key is never compiled twice
while it is resident.

Entries are handed out as `Arc<Regex>`. Evicting an entry only drops the
cache's reference: a caller still holding the `Arc` keeps a usable regex,
and the engine behind it is released when the last reference goes away.
*/

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, OnceLock},
};

use crate::{
    captures::{Match, Matches},
    error::Error,
    options::RegexOptions,
    regex::{Regex, RegexBuilder},
};

/// The capacity of the process wide cache returned by [`RegexCache::global`]
/// until it is changed.
pub const DEFAULT_CACHE_CAPACITY: usize = 15;

/// The identity of a cache entry. Two keys are equal only if both the full
/// pattern and every option bit are equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct CacheKey {
    pattern: Arc<[u16]>,
    options: RegexOptions,
}

impl CacheKey {
    fn new(pattern: &[u16], options: RegexOptions) -> CacheKey {
        CacheKey { pattern: Arc::from(pattern), options }
    }

    fn of(re: &Regex) -> CacheKey {
        CacheKey {
            pattern: Arc::clone(re.shared_pattern()),
            options: re.options(),
        }
    }
}

/// A bounded, least recently used cache of compiled regexes.
///
/// Every regex built by a cache uses [`DEFAULT_MEMORY_BUDGET`] as its memory
/// budget.
///
/// A capacity of zero disables storage: every lookup compiles a fresh regex
/// and nothing is kept.
///
/// [`DEFAULT_MEMORY_BUDGET`]: crate::DEFAULT_MEMORY_BUDGET
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use regex_utf16::{RegexCache, RegexOptions};
///
/// let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
/// let cache = RegexCache::new(2);
/// let a = cache.find_or_create(&utf16("a+"), RegexOptions::empty()).unwrap();
/// let b = cache.find_or_create(&utf16("a+"), RegexOptions::empty()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(1, cache.len());
/// ```
#[derive(Debug)]
pub struct RegexCache {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    map: HashMap<CacheKey, Arc<Regex>>,
    /// Oldest first. Holds exactly the values of `map`.
    recency: VecDeque<Arc<Regex>>,
}

impl Inner {
    fn get(&mut self, key: &CacheKey) -> Option<Arc<Regex>> {
        let re = Arc::clone(self.map.get(key)?);
        let i = self.recency.iter().rposition(|x| Arc::ptr_eq(x, &re))?;
        if i + 1 != self.recency.len() {
            if let Some(entry) = self.recency.remove(i) {
                self.recency.push_back(entry);
            }
        }
        Some(re)
    }

    fn insert(&mut self, key: CacheKey, re: Arc<Regex>) {
        if self.capacity == 0 {
            return;
        }
        self.shrink_to(self.capacity - 1);
        self.map.insert(key, Arc::clone(&re));
        self.recency.push_back(re);
    }

    fn shrink_to(&mut self, len: usize) {
        while self.recency.len() > len {
            let oldest = match self.recency.pop_front() {
                None => break,
                Some(oldest) => oldest,
            };
            debug!("regex cache evicting {}", oldest);
            self.map.remove(&CacheKey::of(&oldest));
        }
    }
}

impl RegexCache {
    /// Create an empty cache that holds at most `capacity` regexes.
    pub fn new(capacity: usize) -> RegexCache {
        let inner = Inner {
            capacity,
            map: HashMap::new(),
            recency: VecDeque::new(),
        };
        RegexCache { inner: Mutex::new(inner) }
    }

    /// Returns the process wide cache used by the free functions in this
    /// crate, such as [`is_match`](crate::is_match).
    ///
    /// It is created on first use with a capacity of
    /// [`DEFAULT_CACHE_CAPACITY`].
    pub fn global() -> &'static RegexCache {
        static GLOBAL: OnceLock<RegexCache> = OnceLock::new();
        GLOBAL.get_or_init(|| RegexCache::new(DEFAULT_CACHE_CAPACITY))
    }

    /// Returns the cached regex for `pattern` and `options`, compiling and
    /// caching it first if necessary.
    ///
    /// A hit marks the entry as most recently used. A miss inserts the new
    /// regex as most recently used, evicting the least recently used entry
    /// if the cache is full.
    ///
    /// # Errors
    ///
    /// Any error reported by [`Regex::with_options`]. Nothing is inserted or
    /// evicted in that case.
    pub fn find_or_create(
        &self,
        pattern: &[u16],
        options: RegexOptions,
    ) -> Result<Arc<Regex>, Error> {
        let key = CacheKey::new(pattern, options);
        let mut inner = self.lock();
        if let Some(re) = inner.get(&key) {
            debug!("regex cache hit for {}", re);
            return Ok(re);
        }
        debug!(
            "regex cache miss for {:?} ({} of {} entries in use)",
            String::from_utf16_lossy(pattern),
            inner.recency.len(),
            inner.capacity,
        );
        let re = Arc::new(RegexBuilder::new(pattern).options(options).build()?);
        inner.insert(key, Arc::clone(&re));
        Ok(re)
    }

    /// Returns the maximum number of regexes this cache holds.
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    /// Set the maximum number of regexes this cache holds.
    ///
    /// Shrinking evicts least recently used entries until the cache fits.
    /// Growing never evicts anything.
    pub fn set_capacity(&self, capacity: usize) {
        let mut inner = self.lock();
        debug!(
            "regex cache capacity changing from {} to {}",
            inner.capacity,
            capacity,
        );
        inner.shrink_to(capacity);
        inner.capacity = capacity;
    }

    /// Returns the number of regexes currently in this cache.
    pub fn len(&self) -> usize {
        self.lock().recency.len()
    }

    /// Returns true if this cache holds no regexes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a regex for `pattern` and `options` is resident. This
    /// does not change recency order.
    pub fn contains(&self, pattern: &[u16], options: RegexOptions) -> bool {
        self.lock().map.contains_key(&CacheKey::new(pattern, options))
    }

    /// Remove every entry from this cache. The capacity is unchanged.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.recency.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation leaves both structures in sync before anything can
        // panic, so a poisoned lock still guards a consistent cache.
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Returns the capacity of the process wide cache.
pub fn cache_capacity() -> usize {
    RegexCache::global().capacity()
}

/// Set the capacity of the process wide cache. Shrinking evicts the least
/// recently used entries.
pub fn set_cache_capacity(capacity: usize) {
    RegexCache::global().set_capacity(capacity)
}

/// Returns true if `pattern` matches anywhere in `input`, using a regex from
/// the process wide cache.
///
/// # Example
///
/// ```
/// let utf16 = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
/// assert!(regex_utf16::is_match(&utf16("abc"), &utf16(r"b")).unwrap());
/// ```
pub fn is_match(input: &[u16], pattern: &[u16]) -> Result<bool, Error> {
    is_match_with(input, pattern, RegexOptions::empty())
}

/// Like [`is_match`], but with the given options.
pub fn is_match_with(
    input: &[u16],
    pattern: &[u16],
    options: RegexOptions,
) -> Result<bool, Error> {
    RegexCache::global().find_or_create(pattern, options)?.is_match(input)
}

/// Returns the leftmost-first match of `pattern` in `input`, using a regex
/// from the process wide cache.
pub fn find(input: &[u16], pattern: &[u16]) -> Result<Match, Error> {
    find_with(input, pattern, RegexOptions::empty())
}

/// Like [`find`], but with the given options.
pub fn find_with(
    input: &[u16],
    pattern: &[u16],
    options: RegexOptions,
) -> Result<Match, Error> {
    RegexCache::global().find_or_create(pattern, options)?.find(input)
}

/// Returns every match of `pattern` in `input` as a collection, using a regex
/// from the process wide cache. The collection has at most one element.
pub fn matches(input: &[u16], pattern: &[u16]) -> Result<Matches, Error> {
    matches_with(input, pattern, RegexOptions::empty())
}

/// Like [`matches`], but with the given options.
pub fn matches_with(
    input: &[u16],
    pattern: &[u16],
    options: RegexOptions,
) -> Result<Matches, Error> {
    RegexCache::global().find_or_create(pattern, options)?.matches(input)
}

/// Returns true if `pattern` matches anywhere in the bytes `input`, using a
/// regex from the process wide cache.
pub fn is_match_bytes(input: &[u8], pattern: &[u16]) -> Result<bool, Error> {
    is_match_bytes_with(input, pattern, RegexOptions::empty())
}

/// Like [`is_match_bytes`], but with the given options.
pub fn is_match_bytes_with(
    input: &[u8],
    pattern: &[u16],
    options: RegexOptions,
) -> Result<bool, Error> {
    let re = RegexCache::global().find_or_create(pattern, options)?;
    Ok(re.is_match_bytes(input))
}

/// Returns the leftmost-first match of `pattern` in the bytes `input`, using
/// a regex from the process wide cache.
pub fn find_bytes(input: &[u8], pattern: &[u16]) -> Result<Match, Error> {
    find_bytes_with(input, pattern, RegexOptions::empty())
}

/// Like [`find_bytes`], but with the given options.
pub fn find_bytes_with(
    input: &[u8],
    pattern: &[u16],
    options: RegexOptions,
) -> Result<Match, Error> {
    let re = RegexCache::global().find_or_create(pattern, options)?;
    Ok(re.find_bytes(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn get(cache: &RegexCache, pattern: &str) -> Arc<Regex> {
        cache.find_or_create(&utf16(pattern), RegexOptions::empty()).unwrap()
    }

    /// Checks that the map and the recency list hold the same entries and
    /// that the cache fits its capacity.
    fn assert_consistent(cache: &RegexCache) {
        let inner = cache.lock();
        assert!(inner.recency.len() <= inner.capacity);
        assert_eq!(inner.map.len(), inner.recency.len());
        for re in inner.recency.iter() {
            let mapped = inner.map.get(&CacheKey::of(re)).unwrap();
            assert!(Arc::ptr_eq(mapped, re));
        }
    }

    fn resident(cache: &RegexCache) -> Vec<String> {
        cache.lock().recency.iter().map(|re| re.to_string()).collect()
    }

    #[test]
    fn hit_promotes() {
        let cache = RegexCache::new(2);
        get(&cache, "a");
        get(&cache, "b");
        get(&cache, "a");
        get(&cache, "c");
        assert_eq!(vec!["a", "c"], resident(&cache));
        assert_consistent(&cache);
    }

    #[test]
    fn shrink_evicts_oldest_first() {
        let cache = RegexCache::new(4);
        for p in ["a", "b", "c", "d"] {
            get(&cache, p);
        }
        cache.set_capacity(2);
        assert_eq!(vec!["c", "d"], resident(&cache));
        assert_consistent(&cache);
        cache.set_capacity(10);
        assert_eq!(2, cache.len());
        assert_eq!(10, cache.capacity());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = RegexCache::new(0);
        let a = get(&cache, "a");
        let b = get(&cache, "a");
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(cache.is_empty());
        assert_consistent(&cache);
    }

    #[test]
    fn failed_compile_leaves_cache_alone() {
        let cache = RegexCache::new(1);
        get(&cache, "a");
        let err = cache.find_or_create(&utf16("("), RegexOptions::empty());
        assert!(err.is_err());
        assert_eq!(vec!["a"], resident(&cache));
        assert_consistent(&cache);
    }

    #[test]
    fn options_are_part_of_the_key() {
        let cache = RegexCache::new(4);
        let plain = get(&cache, "a");
        let folded = cache
            .find_or_create(&utf16("a"), RegexOptions::IGNORE_CASE)
            .unwrap();
        assert!(!Arc::ptr_eq(&plain, &folded));
        assert!(cache.contains(&utf16("a"), RegexOptions::empty()));
        assert!(cache.contains(&utf16("a"), RegexOptions::IGNORE_CASE));
        assert!(!cache.contains(&utf16("a"), RegexOptions::MULTILINE));
        assert_eq!(2, cache.len());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(4, cache.capacity());
    }

    #[test]
    fn evicted_regex_stays_usable() {
        let cache = RegexCache::new(1);
        let a = get(&cache, "a");
        get(&cache, "b");
        assert!(!cache.contains(&utf16("a"), RegexOptions::empty()));
        assert!(a.is_match(&utf16("xa")).unwrap());
    }
}
