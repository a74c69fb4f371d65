//! FFT-based Fibonacci calculator.
//!
//! Uses Fast Doubling with FFT multiplication for very large numbers.

use num_bigint::BigUint;

use crate::calculator::{CoreCalculator, FibError};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::{CancellationToken, ProgressUpdate};
use crate::strategy::{AdaptiveStrategy, DoublingStepExecutor};

/// FFT-based Fibonacci calculator.
///
/// Uses the Fast Doubling framework but with FFT multiplication
/// for operands exceeding the FFT threshold.
pub struct FFTBasedCalculator;

impl FFTBasedCalculator {
    /// Create a new FFT-based Fibonacci calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FFTBasedCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for FFTBasedCalculator {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        // Use the same doubling loop structure as FastDoubling,
        // but with FFT multiplication for large operands.
        let num_bits = 64 - n.leading_zeros();
        let mut fk = BigUint::ZERO;
        let mut fk1 = BigUint::from(1u32);

        let frozen = observer.freeze();
        let strategy = AdaptiveStrategy::new(opts.fft_threshold, opts.karatsuba_threshold);

        for i in (0..num_bits).rev() {
            if cancel.is_cancelled() {
                return Err(FibError::Cancelled);
            }

            // Doubling step with FFT multiplication for large operands
            let (f2k, f2k1) = strategy.execute_doubling_step(&fk, &fk1);
            fk = f2k;
            fk1 = f2k1;

            // Conditional addition
            if (n >> i) & 1 == 1 {
                let sum = &fk + &fk1;
                fk = std::mem::replace(&mut fk1, sum);
            }

            // Progress reporting
            let progress = 1.0 - (f64::from(i) / f64::from(num_bits));
            if frozen.should_report(progress) {
                frozen.update(progress);
                observer.on_progress(&ProgressUpdate::new(
                    calc_index,
                    "FFTBased",
                    progress,
                    u64::from(num_bits - i),
                    u64::from(num_bits),
                ));
            }
        }

        observer.on_progress(&ProgressUpdate::done(calc_index, "FFTBased"));
        Ok(fk)
    }

    fn name(&self) -> &'static str {
        "FFTBased"
    }
}
