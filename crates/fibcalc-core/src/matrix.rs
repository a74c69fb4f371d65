//! Matrix Exponentiation algorithm for Fibonacci computation.
//!
//! Computes F(n) via Q^n where Q = [[1,1],[1,0]].
//! Uses binary exponentiation (square-and-multiply).
//! Includes thread-local pooling of `MatrixState` objects.

use std::cell::RefCell;
use std::time::Instant;

use num_bigint::BigUint;
use parking_lot::Mutex;

use crate::calculator::{CoreCalculator, FibError};
use crate::dynamic_threshold::DynamicThresholdManager;
use crate::matrix_ops::{matrix_multiply, matrix_multiply_strassen, matrix_square};
use crate::matrix_types::MatrixState;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::{calc_work_progress, CancellationToken, ProgressUpdate};
use crate::threshold_types::{DynamicThresholdConfig, MultiplicationMethod};

/// Thread-safe pool of `MatrixState` objects.
pub struct MatrixStatePool {
    pool: Mutex<Vec<MatrixState>>,
    max_size: usize,
}

impl MatrixStatePool {
    /// Create a new pool with the given maximum size.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            pool: Mutex::new(Vec::with_capacity(max_size)),
            max_size,
        }
    }

    /// Acquire a `MatrixState` from the pool, or create a new one.
    /// The returned state is always reset and ready for use.
    pub fn acquire(&self) -> MatrixState {
        let mut pool = self.pool.lock();
        match pool.pop() {
            Some(mut state) => {
                state.reset();
                state
            }
            None => MatrixState::new(),
        }
    }

    /// Return a `MatrixState` to the pool for reuse.
    pub fn release(&self, state: MatrixState) {
        let mut pool = self.pool.lock();
        if pool.len() < self.max_size {
            pool.push(state);
        }
    }

    /// Get the number of states currently in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.pool.lock().len()
    }
}

impl Default for MatrixStatePool {
    fn default() -> Self {
        Self::new(4)
    }
}

thread_local! {
    static MATRIX_STATE_POOL: RefCell<Vec<MatrixState>> = const { RefCell::new(Vec::new()) };
}

const THREAD_LOCAL_POOL_MAX: usize = 4;

/// Acquire a `MatrixState` from the thread-local pool.
fn tl_acquire_state() -> MatrixState {
    MATRIX_STATE_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        match pool.pop() {
            Some(mut state) => {
                state.reset();
                state
            }
            None => MatrixState::new(),
        }
    })
}

/// Return a `MatrixState` to the thread-local pool.
fn tl_release_state(state: MatrixState) {
    MATRIX_STATE_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        if pool.len() < THREAD_LOCAL_POOL_MAX {
            pool.push(state);
        }
    });
}

/// Matrix Exponentiation calculator.
pub struct MatrixExponentiation;

impl MatrixExponentiation {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the matrix exponentiation loop.
    fn execute_matrix_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let num_bits = 64 - n.leading_zeros();
        let mut state = tl_acquire_state();

        let frozen = observer.freeze();
        let strassen_threshold = opts.strassen_threshold;

        // When enabled, a per-call controller observes measured
        // Strassen-vs-symmetric benefit from this calculation's own
        // operands. `adjust` never retunes strassen_threshold itself (it's
        // informational, per the controller's own contract) but the
        // measurements still flow into its snapshot/stats.
        let mut dyn_mgr = opts.enable_dynamic_thresholds.then(|| {
            let mut mgr = DynamicThresholdManager::new(DynamicThresholdConfig::default());
            mgr.set_thresholds(opts.parallel_threshold, opts.fft_threshold, strassen_threshold);
            mgr
        });

        let result = (|| {
            // Binary exponentiation: square-and-multiply
            for i in (0..num_bits).rev() {
                if cancel.is_cancelled() {
                    tracing::debug!(calc_index, i, "matrix exponentiation loop cancelled");
                    return Err(FibError::Cancelled);
                }

                // Square the result. Squaring still uses the cheaper
                // symmetric 3-multiply path regardless of threshold since
                // Strassen only pays off for general (asymmetric) products.
                state.result = matrix_square(&state.result);

                // Multiply by base if bit is set
                if (n >> i) & 1 == 1 {
                    let strassen_threshold_now = dyn_mgr.as_ref().map_or(
                        strassen_threshold,
                        DynamicThresholdManager::strassen_threshold,
                    );

                    if let Some(mgr) = dyn_mgr.as_mut() {
                        let max_bits = state.result.a.bits().max(state.base.a.bits()) as usize;
                        if max_bits >= strassen_threshold_now / 2
                            && max_bits <= strassen_threshold_now.saturating_mul(2)
                        {
                            let t0 = Instant::now();
                            let _ = matrix_multiply(&state.result, &state.base);
                            let symmetric_ns = t0.elapsed().as_nanos() as u64;
                            let t1 = Instant::now();
                            let _ = matrix_multiply_strassen(&state.result, &state.base, 0);
                            let strassen_ns = t1.elapsed().as_nanos() as u64;
                            mgr.record_benefit_sample(
                                max_bits,
                                symmetric_ns,
                                strassen_ns,
                                MultiplicationMethod::Strassen,
                                opts.dynamic_adjustment_interval,
                            );
                        }
                    }

                    state.result = matrix_multiply_strassen(
                        &state.result,
                        &state.base,
                        strassen_threshold_now,
                    );
                }

                // Progress reporting, weighted by the geometric cost model
                // since later iterations work on much larger operands.
                let progress = calc_work_progress(u64::from(num_bits - i), u64::from(num_bits));
                if frozen.should_report(progress) {
                    frozen.update(progress);
                    observer.on_progress(&ProgressUpdate::new(
                        calc_index,
                        "MatrixExponentiation",
                        progress,
                        u64::from(num_bits - i),
                        u64::from(num_bits),
                    ));
                }
            }

            // Extract F(n) = Q^n[0][1] (or [1][0])
            Ok(std::mem::take(&mut state.result.b))
        })();

        // Return state to pool regardless of success/failure
        tl_release_state(state);

        result
    }
}

impl Default for MatrixExponentiation {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for MatrixExponentiation {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let result = self.execute_matrix_loop(n, cancel, observer, calc_index, opts)?;
        observer.on_progress(&ProgressUpdate::done(calc_index, "MatrixExponentiation"));
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "MatrixExponentiation"
    }
}
