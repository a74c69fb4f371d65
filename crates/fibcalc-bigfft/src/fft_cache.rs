//! Thread-safe LRU cache for FFT transforms.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;
use parking_lot::Mutex;

/// Cache key for FFT transforms: an operand's bit length plus a
/// collision-resistant fingerprint of its words. Bit length is kept
/// alongside the hash (rather than folded into one value) so entries for
/// operands of different sizes that happen to hash-collide in the lower
/// bits still can't be confused.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub bit_len: usize,
    pub fingerprint: u128,
}

impl CacheKey {
    /// Derive a cache key for `value`, fingerprinting its full word
    /// representation with two independently-seeded hashers concatenated
    /// into a 128-bit digest (std's `SipHash` has no practical collisions
    /// at this width for a cache of this scale).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn for_operand(value: &BigUint) -> Self {
        let digits = value.to_u32_digits();
        let mut low = DefaultHasher::new();
        0xA5A5_A5A5_u32.hash(&mut low);
        digits.hash(&mut low);
        let mut high = DefaultHasher::new();
        0x5A5A_5A5A_u32.hash(&mut high);
        digits.hash(&mut high);
        let fingerprint = (u128::from(low.finish()) << 64) | u128::from(high.finish());
        Self {
            bit_len: value.bits() as usize,
            fingerprint,
        }
    }

    /// Derive a cache key for `value`'s forward transform under a specific
    /// choice of FFT parameters. Folding `piece_bits`/`fermat_shift` into the
    /// fingerprint (rather than just hashing the operand) means a cached
    /// transform can only ever be returned to a caller using the exact same
    /// parameters it was computed under — the same operand transformed under
    /// two different parameter choices gets two distinct, non-colliding keys.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn for_operand_with_params(value: &BigUint, piece_bits: usize, fermat_shift: usize) -> Self {
        let digits = value.to_u32_digits();
        let mut low = DefaultHasher::new();
        0xA5A5_A5A5_u32.hash(&mut low);
        digits.hash(&mut low);
        piece_bits.hash(&mut low);
        fermat_shift.hash(&mut low);
        let mut high = DefaultHasher::new();
        0x5A5A_5A5A_u32.hash(&mut high);
        digits.hash(&mut high);
        piece_bits.hash(&mut high);
        fermat_shift.hash(&mut high);
        let fingerprint = (u128::from(low.finish()) << 64) | u128::from(high.finish());
        Self {
            bit_len: value.bits() as usize,
            fingerprint,
        }
    }
}

/// The process-wide FFT transform cache (spec: "cache is a process-wide
/// resource"). Lazily sized on first use from whatever `configure` last set,
/// defaulting to 64 entries if never configured.
static CACHE_ENABLED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);
static CACHE_MIN_BIT_LEN: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(100_000);
static CACHE_MAX_ENTRIES: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(64);
static CACHE: std::sync::OnceLock<FFTCache> = std::sync::OnceLock::new();

/// Reconfigure the process-wide transform cache. `max_entries` only affects
/// the cache's capacity if called before the cache has been lazily created
/// by the first FFT call; `enabled`/`min_bit_len` take effect immediately.
pub fn configure(enabled: bool, max_entries: usize, min_bit_len: usize) {
    CACHE_ENABLED.store(enabled, std::sync::atomic::Ordering::Relaxed);
    CACHE_MIN_BIT_LEN.store(min_bit_len, std::sync::atomic::Ordering::Relaxed);
    CACHE_MAX_ENTRIES.store(max_entries, std::sync::atomic::Ordering::Relaxed);
}

/// Whether the cache should be consulted for an operand of `bit_len` bits.
#[must_use]
pub fn is_enabled_for(bit_len: usize) -> bool {
    CACHE_ENABLED.load(std::sync::atomic::Ordering::Relaxed)
        && bit_len >= CACHE_MIN_BIT_LEN.load(std::sync::atomic::Ordering::Relaxed)
}

/// The process-wide cache instance, created on first access.
pub fn global() -> &'static FFTCache {
    CACHE.get_or_init(|| FFTCache::new(CACHE_MAX_ENTRIES.load(std::sync::atomic::Ordering::Relaxed)))
}

/// Inner state protected by `FFTCache`'s mutex: the entry map plus an
/// explicit recency list (front = least recently used, back = most recently
/// used) since `HashMap` has no iteration order to exploit.
struct Inner {
    entries: HashMap<CacheKey, Vec<Vec<u64>>>,
    recency: Vec<CacheKey>,
}

impl Inner {
    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            let k = self.recency.remove(pos);
            self.recency.push(k);
        }
    }

    fn evict_lru(&mut self) {
        if !self.recency.is_empty() {
            let victim = self.recency.remove(0);
            self.entries.remove(&victim);
        }
    }
}

/// Thread-safe LRU cache for FFT root tables.
///
/// Evicts the single least-recently-used entry once `max_entries` is
/// reached, rather than clearing the whole cache — root tables for small
/// transform sizes are reused across nearly every doubling step and
/// shouldn't be thrown away just because a larger, one-off size was cached.
pub struct FFTCache {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl FFTCache {
    /// Create a new FFT cache with the given maximum entries.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: Vec::new(),
            }),
            max_entries,
        }
    }

    /// Get a cached transform, if available. A hit marks the entry as
    /// most-recently-used.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<Vec<u64>>> {
        let mut inner = self.inner.lock();
        let value = inner.entries.get(key).cloned();
        if value.is_some() {
            inner.touch(key);
        }
        value
    }

    /// Store a transform in the cache, evicting the least-recently-used
    /// entry first if the cache is full.
    pub fn put(&self, key: CacheKey, value: Vec<Vec<u64>>) {
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&key) {
            inner.entries.insert(key.clone(), value);
            inner.touch(&key);
            return;
        }
        if inner.entries.len() >= self.max_entries {
            inner.evict_lru();
        }
        inner.entries.insert(key.clone(), value);
        inner.recency.push(key);
    }

    /// Get the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Clear the cache.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.recency.clear();
    }
}

impl Default for FFTCache {
    fn default() -> Self {
        Self::new(64)
    }
}
