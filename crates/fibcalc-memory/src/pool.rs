//! BigInt pool with size classes for object reuse.

use std::collections::HashMap;

use num_bigint::BigUint;
use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

/// Clear a `BigUint` by setting it to zero.
///
/// `BigUint::ZERO` is the simplest approach -- num-bigint doesn't expose its
/// internal Vec, so we can't preserve capacity. The allocation cost is negligible
/// compared to computation.
fn clear_value(value: &mut BigUint) {
    *value = BigUint::ZERO;
}

/// Pool for `BigUint` objects, organized by size class (power of 4).
pub struct BigIntPool {
    pools: Mutex<HashMap<usize, Vec<BigUint>>>,
    max_bit_len: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl BigIntPool {
    /// Create a new pool.
    #[must_use]
    pub fn new(max_bit_len: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_bit_len,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Get a `BigUint` from the pool, or create a new one.
    pub fn acquire(&self, min_bits: usize) -> BigUint {
        let class = Self::size_class(min_bits);
        let mut pools = self.pools.lock();
        if let Some(pool) = pools.get_mut(&class) {
            if let Some(value) = pool.pop() {
                self.stats.record_hit();
                return value;
            }
        }
        self.stats.record_miss();
        BigUint::from(0u32)
    }

    /// Return a `BigUint` to the pool.
    #[allow(clippy::cast_possible_truncation)]
    pub fn release(&self, mut value: BigUint) {
        let bits = value.bits() as usize;
        if bits > self.max_bit_len {
            self.stats.record_eviction();
            return; // Too large to pool
        }

        let class = Self::size_class(bits);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        if pool.len() < self.max_per_class {
            clear_value(&mut value);
            pool.push(value);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Compute size class (round up to next power of 4).
    fn size_class(bits: usize) -> usize {
        if bits <= 64 {
            return 64;
        }
        let mut class = 64;
        while class < bits {
            class *= 4;
        }
        class
    }

    /// Get total number of pooled objects.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.pools.lock().values().map(Vec::len).sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Clear all pooled objects, releasing memory.
    pub fn clear(&self) {
        self.pools.lock().clear();
    }

    /// Drain all pooled objects for a given size class, returning them.
    pub fn drain_class(&self, min_bits: usize) -> Vec<BigUint> {
        let class = Self::size_class(min_bits);
        let mut pools = self.pools.lock();
        pools.remove(&class).unwrap_or_default()
    }

    /// Drain all pooled objects, returning them grouped by size class.
    pub fn drain_all(&self) -> HashMap<usize, Vec<BigUint>> {
        let mut pools = self.pools.lock();
        std::mem::take(&mut *pools)
    }

    /// Pre-populate a size class with the given number of entries.
    pub fn warm(&self, bits: usize, count: usize) {
        let class = Self::size_class(bits);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        let to_add = count
            .saturating_sub(pool.len())
            .min(self.max_per_class - pool.len());
        for _ in 0..to_add {
            pool.push(BigUint::from(0u32));
        }
    }
}

impl Default for BigIntPool {
    fn default() -> Self {
        Self::new(100_000_000, 32)
    }
}
