//! Pool warming: pre-populating `BigIntPool` size classes ahead of a
//! calculation based on a prediction of the operand sizes it will need.
//!
//! Fibonacci magnitude grows geometrically with `n` (`F(n)` has roughly
//! `n * log10(phi)` decimal digits, i.e. `O(n)` bits), so the doubling
//! algorithms' intermediate operands climb through a predictable sequence
//! of size classes on their way to the final result. Warming those classes
//! before the first iteration avoids the allocator churn of growing from
//! zero on every recursive doubling step.

use crate::pool::BigIntPool;

/// Bits per unit of `n` in the Fibonacci growth rate: `F(n) ~ phi^n / sqrt(5)`,
/// so `bits(F(n)) ~ n * log2(phi) ~ n * 0.6942`.
const BITS_PER_N: f64 = 0.6942;

/// Configuration for pool warming.
#[derive(Debug, Clone, Copy)]
pub struct WarmingConfig {
    /// Number of entries to pre-populate per size class.
    pub entries_per_class: usize,
    /// Number of size classes below the final result size to also warm,
    /// covering the doubling steps leading up to it.
    pub lookback_classes: usize,
}

impl Default for WarmingConfig {
    fn default() -> Self {
        Self {
            entries_per_class: 4,
            lookback_classes: 3,
        }
    }
}

/// A predicted size class and how many entries to warm it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePrediction {
    /// Bit length used to derive the size class.
    pub bits: usize,
    /// Number of entries to pre-populate.
    pub count: usize,
}

/// Estimate the bit length of `F(n)` via the golden-ratio growth rate.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_result_bits(n: u64) -> usize {
    ((n as f64) * BITS_PER_N).ceil() as usize + 1
}

/// Predict the size classes a calculation of `F(n)` will pass through,
/// from the final result size back through `lookback_classes` halvings
/// (each doubling step roughly halves the bit length of its operands
/// relative to the next).
#[must_use]
pub fn predict_sizes(n: u64, config: &WarmingConfig) -> Vec<SizePrediction> {
    let final_bits = estimate_result_bits(n);
    let mut sizes = Vec::with_capacity(config.lookback_classes + 1);
    let mut bits = final_bits;
    for _ in 0..=config.lookback_classes {
        sizes.push(SizePrediction {
            bits,
            count: config.entries_per_class,
        });
        if bits <= 64 {
            break;
        }
        bits /= 2;
    }
    sizes
}

/// Warm `pool`'s size classes for a calculation of `F(n)` using `config`.
pub fn warm_pool(pool: &BigIntPool, n: u64, config: &WarmingConfig) {
    for prediction in predict_sizes(n, config) {
        pool.warm(prediction.bits, prediction.count);
    }
}

/// Warm `pool` for `F(n)` using default warming parameters.
pub fn warm_pool_default(pool: &BigIntPool, n: u64) {
    warm_pool(pool, n, &WarmingConfig::default());
}
