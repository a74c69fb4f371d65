//! Dynamic threshold management with ring buffer and hysteresis.

use crate::constants::{
    DEFAULT_FFT_THRESHOLD, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD,
    DYNAMIC_FFT_THRESHOLD_FLOOR, DYNAMIC_PARALLEL_THRESHOLD_FLOOR,
};
use crate::threshold_types::{
    DynamicThresholdConfig, IterationMetric, MultiplicationMethod, ThresholdAdjustment,
    ThresholdSnapshot, ThresholdStats,
};

/// Manager for dynamically adjusting multiplication thresholds.
///
/// Only `fft_threshold` and `parallel_threshold` are ever moved by
/// [`adjust`](Self::adjust) — `strassen_threshold` is tracked for snapshot
/// purposes and can be set directly (e.g. from a calibration profile) via
/// [`set_thresholds`](Self::set_thresholds), but the controller itself does
/// not retune it.
pub struct DynamicThresholdManager {
    config: DynamicThresholdConfig,
    metrics: Vec<IterationMetric>,
    ring_pos: usize,
    ring_full: bool,
    current_parallel: usize,
    current_fft: usize,
    current_strassen: usize,
    adjustment_count: usize,
    adjustment_history: Vec<ThresholdAdjustment>,
    /// Original fft threshold at construction/reset time; bounds the ceiling.
    baseline_fft: usize,
    /// Original parallel threshold at construction/reset time; bounds the ceiling.
    baseline_parallel: usize,
    calls_since_adjustment: usize,
}

impl DynamicThresholdManager {
    /// Create a new threshold manager with the given configuration.
    #[must_use]
    pub fn new(config: DynamicThresholdConfig) -> Self {
        let ring_size = config.ring_buffer_size;
        Self {
            config,
            metrics: Vec::with_capacity(ring_size),
            ring_pos: 0,
            ring_full: false,
            current_parallel: DEFAULT_PARALLEL_THRESHOLD,
            current_fft: DEFAULT_FFT_THRESHOLD,
            current_strassen: DEFAULT_STRASSEN_THRESHOLD,
            adjustment_count: 0,
            adjustment_history: Vec::new(),
            baseline_fft: DEFAULT_FFT_THRESHOLD,
            baseline_parallel: DEFAULT_PARALLEL_THRESHOLD,
            calls_since_adjustment: 0,
        }
    }

    /// Record a metric from an iteration.
    pub fn record(&mut self, metric: IterationMetric) {
        let ring_size = self.config.ring_buffer_size;
        if self.metrics.len() < ring_size {
            self.metrics.push(metric);
        } else {
            self.metrics[self.ring_pos] = metric;
            self.ring_full = true;
        }
        self.ring_pos = (self.ring_pos + 1) % ring_size;
        self.calls_since_adjustment += 1;
    }

    /// Get the number of recorded metrics.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Adjust thresholds if enough metrics have accumulated since the last
    /// adjustment (`min_metrics_for_adjustment`) and at least
    /// `adjustment_interval` calls to `record` have happened since the last
    /// adjustment attempt. No-op otherwise. Resets the interval counter
    /// regardless of whether an adjustment actually fired.
    pub fn maybe_adjust(&mut self, adjustment_interval: usize) {
        if self.calls_since_adjustment < adjustment_interval.max(1) {
            return;
        }
        self.calls_since_adjustment = 0;
        if self.metrics.len() < self.config.min_metrics_for_adjustment {
            return;
        }
        self.adjust();
    }

    /// Unconditionally adjust thresholds based on collected metrics.
    pub fn adjust(&mut self) {
        if self.metrics.is_empty() {
            return;
        }

        let stats = self.compute_stats();
        let dead_zone = self.config.dead_zone;
        let hysteresis = self.config.hysteresis_factor;
        let max_adj = self.config.max_adjustment;

        // FFT threshold adjustment: floor at DYNAMIC_FFT_THRESHOLD_FLOOR,
        // ceiling at 2x the original baseline.
        let fft_ceiling = self.baseline_fft.saturating_mul(2);
        if stats.fft_benefit > hysteresis && stats.fft_benefit.abs() > dead_zone {
            let old = self.current_fft;
            let factor = (1.0 - max_adj).max(0.5);
            self.current_fft = ((self.current_fft as f64) * factor) as usize;
            self.current_fft = self.current_fft.clamp(DYNAMIC_FFT_THRESHOLD_FLOOR, fft_ceiling);
            self.record_adjustment("fft", old, self.current_fft, stats.fft_benefit);
        } else if stats.fft_benefit < -hysteresis && stats.fft_benefit.abs() > dead_zone {
            let old = self.current_fft;
            let factor = (1.0 + max_adj).min(2.0);
            self.current_fft = ((self.current_fft as f64) * factor) as usize;
            self.current_fft = self.current_fft.clamp(DYNAMIC_FFT_THRESHOLD_FLOOR, fft_ceiling);
            self.record_adjustment("fft", old, self.current_fft, stats.fft_benefit);
        }

        // Parallel threshold adjustment: floor at DYNAMIC_PARALLEL_THRESHOLD_FLOOR,
        // ceiling at 4x the original baseline.
        let parallel_ceiling = self.baseline_parallel.saturating_mul(4);
        if stats.parallel_benefit > hysteresis && stats.parallel_benefit.abs() > dead_zone {
            let old = self.current_parallel;
            let factor = (1.0 - max_adj).max(0.5);
            self.current_parallel = ((self.current_parallel as f64) * factor) as usize;
            self.current_parallel = self
                .current_parallel
                .clamp(DYNAMIC_PARALLEL_THRESHOLD_FLOOR, parallel_ceiling);
            self.record_adjustment(
                "parallel",
                old,
                self.current_parallel,
                stats.parallel_benefit,
            );
        } else if stats.parallel_benefit < -hysteresis && stats.parallel_benefit.abs() > dead_zone {
            let old = self.current_parallel;
            let factor = (1.0 + max_adj).min(2.0);
            self.current_parallel = ((self.current_parallel as f64) * factor) as usize;
            self.current_parallel = self
                .current_parallel
                .clamp(DYNAMIC_PARALLEL_THRESHOLD_FLOOR, parallel_ceiling);
            self.record_adjustment(
                "parallel",
                old,
                self.current_parallel,
                stats.parallel_benefit,
            );
        }
    }

    fn record_adjustment(&mut self, name: &str, old: usize, new: usize, benefit: f64) {
        tracing::info!(threshold = name, old, new, benefit, "dynamic threshold retuned");
        self.adjustment_count += 1;
        self.adjustment_history.push(ThresholdAdjustment {
            threshold_name: name.to_string(),
            old_value: old,
            new_value: new,
            trigger_benefit: benefit,
        });
        // Keep only the last 64 adjustments
        if self.adjustment_history.len() > 64 {
            self.adjustment_history.remove(0);
        }
    }

    fn compute_stats(&self) -> ThresholdStats {
        let n = self.metrics.len() as f64;
        let avg_fft_benefit = self.metrics.iter().map(|m| m.fft_speedup).sum::<f64>() / n;
        let avg_parallel_benefit = self.metrics.iter().map(|m| m.parallel_speedup).sum::<f64>() / n;

        // Compute Strassen benefit from metrics at Strassen-relevant bit range.
        let strassen_metrics: Vec<&IterationMetric> = self
            .metrics
            .iter()
            .filter(|m| m.bit_length >= 1024 && m.bit_length < self.current_fft)
            .collect();
        let avg_strassen_benefit = if strassen_metrics.is_empty() {
            0.0
        } else {
            strassen_metrics.iter().map(|m| m.fft_speedup).sum::<f64>()
                / strassen_metrics.len() as f64
        };

        ThresholdStats {
            fft_benefit: avg_fft_benefit,
            parallel_benefit: avg_parallel_benefit,
            strassen_benefit: avg_strassen_benefit,
            sample_count: self.metrics.len(),
        }
    }

    /// Get current parallel threshold.
    #[must_use]
    pub fn parallel_threshold(&self) -> usize {
        self.current_parallel
    }

    /// Get current FFT threshold.
    #[must_use]
    pub fn fft_threshold(&self) -> usize {
        self.current_fft
    }

    /// Get current Strassen threshold.
    #[must_use]
    pub fn strassen_threshold(&self) -> usize {
        self.current_strassen
    }

    /// Get a serializable snapshot of current thresholds and history.
    #[must_use]
    pub fn snapshot(&self) -> ThresholdSnapshot {
        ThresholdSnapshot {
            parallel_threshold: self.current_parallel,
            fft_threshold: self.current_fft,
            strassen_threshold: self.current_strassen,
            adjustment_count: self.adjustment_count,
            adjustment_history: self.adjustment_history.clone(),
        }
    }

    /// Get computed statistics from the current metrics buffer.
    #[must_use]
    pub fn stats(&self) -> Option<ThresholdStats> {
        if self.metrics.is_empty() {
            return None;
        }
        Some(self.compute_stats())
    }

    /// Reset the manager to default thresholds and clear all metrics.
    pub fn reset(&mut self) {
        self.metrics.clear();
        self.ring_pos = 0;
        self.ring_full = false;
        self.current_parallel = DEFAULT_PARALLEL_THRESHOLD;
        self.current_fft = DEFAULT_FFT_THRESHOLD;
        self.current_strassen = DEFAULT_STRASSEN_THRESHOLD;
        self.adjustment_count = 0;
        self.adjustment_history.clear();
    }

    /// Whether the ring buffer is full (has wrapped around at least once).
    #[must_use]
    pub fn is_ring_full(&self) -> bool {
        self.ring_full
    }

    /// Number of threshold adjustments made so far.
    #[must_use]
    pub fn adjustment_count(&self) -> usize {
        self.adjustment_count
    }

    /// Set thresholds directly (e.g., from a loaded calibration profile).
    pub fn set_thresholds(&mut self, parallel: usize, fft: usize, strassen: usize) {
        self.current_parallel = parallel;
        self.current_fft = fft;
        self.current_strassen = strassen;
    }

    /// Record a directly-measured benefit sample — a real comparative
    /// timing between a threshold-gated method and its fallback, taken on
    /// live operands during a calculation — and run the periodic
    /// adjustment check.
    ///
    /// A sample at `bit_length` below the current FFT threshold feeds the
    /// informational Strassen benefit ([`ThresholdStats::strassen_benefit`]);
    /// at or above it, the benefit that [`adjust`](Self::adjust) actually
    /// retunes.
    #[allow(clippy::cast_precision_loss)]
    pub fn record_benefit_sample(
        &mut self,
        bit_length: usize,
        baseline_ns: u64,
        candidate_ns: u64,
        method: MultiplicationMethod,
        adjustment_interval: usize,
    ) {
        let speedup = baseline_ns as f64 / candidate_ns.max(1) as f64 - 1.0;
        self.record(IterationMetric {
            bit_length,
            fft_speedup: speedup,
            parallel_speedup: 0.0,
            duration_ns: candidate_ns.min(baseline_ns),
            method,
            bits_processed: bit_length as u64,
            cache_hit: false,
        });
        self.maybe_adjust(adjustment_interval);
    }
}

impl Default for DynamicThresholdManager {
    fn default() -> Self {
        Self::new(DynamicThresholdConfig::default())
    }
}
