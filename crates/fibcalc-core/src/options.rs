//! Calculation options and configuration.

use crate::constants::{
    DEFAULT_DYNAMIC_ADJUSTMENT_INTERVAL, DEFAULT_FFT_CACHE_MAX_ENTRIES,
    DEFAULT_FFT_CACHE_MIN_BIT_LEN, DEFAULT_FFT_THRESHOLD, DEFAULT_KARATSUBA_THRESHOLD,
    DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD, PARALLEL_FFT_THRESHOLD,
};

/// Options for Fibonacci calculation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Threshold (in bits) below which schoolbook multiplication is preferred
    /// over `num-bigint`'s Karatsuba.
    pub karatsuba_threshold: usize,
    /// Threshold (in bits) for parallel multiplication.
    pub parallel_threshold: usize,
    /// Threshold (in bits) above which per-step parallelism stays enabled
    /// even when FFT multiplication is active.
    pub parallel_fft_threshold: usize,
    /// Threshold (in bits) for FFT multiplication.
    pub fft_threshold: usize,
    /// Threshold (in bits) for Strassen matrix multiplication.
    pub strassen_threshold: usize,
    /// Whether the FFT transform cache is enabled.
    pub fft_cache_enabled: bool,
    /// Maximum number of entries retained in the FFT transform cache.
    pub fft_cache_max_entries: usize,
    /// Minimum operand bit length eligible for FFT transform caching.
    pub fft_cache_min_bit_len: usize,
    /// Whether the dynamic threshold controller is enabled.
    pub enable_dynamic_thresholds: bool,
    /// Number of completed iterations between dynamic threshold re-tuning passes.
    pub dynamic_adjustment_interval: usize,
    /// Memory limit in bytes (0 = unlimited).
    pub memory_limit: usize,
    /// Whether to show verbose output.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            karatsuba_threshold: DEFAULT_KARATSUBA_THRESHOLD,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            parallel_fft_threshold: PARALLEL_FFT_THRESHOLD,
            fft_threshold: DEFAULT_FFT_THRESHOLD,
            strassen_threshold: DEFAULT_STRASSEN_THRESHOLD,
            fft_cache_enabled: true,
            fft_cache_max_entries: DEFAULT_FFT_CACHE_MAX_ENTRIES,
            fft_cache_min_bit_len: DEFAULT_FFT_CACHE_MIN_BIT_LEN,
            enable_dynamic_thresholds: false,
            dynamic_adjustment_interval: DEFAULT_DYNAMIC_ADJUSTMENT_INTERVAL,
            memory_limit: 0,
            verbose: false,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.karatsuba_threshold == 0 {
            self.karatsuba_threshold = DEFAULT_KARATSUBA_THRESHOLD;
        }
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        if self.parallel_fft_threshold == 0 {
            self.parallel_fft_threshold = PARALLEL_FFT_THRESHOLD;
        }
        if self.fft_threshold == 0 {
            self.fft_threshold = DEFAULT_FFT_THRESHOLD;
        }
        if self.strassen_threshold == 0 {
            self.strassen_threshold = DEFAULT_STRASSEN_THRESHOLD;
        }
        if self.fft_cache_max_entries == 0 {
            self.fft_cache_max_entries = DEFAULT_FFT_CACHE_MAX_ENTRIES;
        }
        if self.fft_cache_min_bit_len == 0 {
            self.fft_cache_min_bit_len = DEFAULT_FFT_CACHE_MIN_BIT_LEN;
        }
        if self.dynamic_adjustment_interval == 0 {
            self.dynamic_adjustment_interval = DEFAULT_DYNAMIC_ADJUSTMENT_INTERVAL;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(opts.fft_threshold, DEFAULT_FFT_THRESHOLD);
        assert_eq!(opts.strassen_threshold, DEFAULT_STRASSEN_THRESHOLD);
        assert!(!opts.enable_dynamic_thresholds);
    }

    #[test]
    fn normalize_zero_thresholds() {
        let opts = Options {
            parallel_threshold: 0,
            fft_threshold: 0,
            strassen_threshold: 0,
            karatsuba_threshold: 0,
            ..Default::default()
        };
        let normalized = opts.normalize();
        assert_eq!(normalized.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(normalized.fft_threshold, DEFAULT_FFT_THRESHOLD);
        assert_eq!(normalized.strassen_threshold, DEFAULT_STRASSEN_THRESHOLD);
        assert_eq!(normalized.karatsuba_threshold, DEFAULT_KARATSUBA_THRESHOLD);
    }
}
