//! Progress tracking types and utilities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::calculator::FibError;

/// Progress update sent from calculators to observers.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Calculator index (for multi-calculator runs).
    pub calc_index: usize,
    /// Name of the algorithm producing this update.
    pub algorithm: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Current iteration/step number.
    pub current_step: u64,
    /// Total number of steps.
    pub total_steps: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub fn new(
        calc_index: usize,
        algorithm: &'static str,
        progress: f64,
        current: u64,
        total: u64,
    ) -> Self {
        Self {
            calc_index,
            algorithm,
            progress,
            current_step: current,
            total_steps: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            calc_index,
            algorithm,
            progress: 1.0,
            current_step: 0,
            total_steps: 0,
            done: true,
        }
    }
}

/// Calculate total work for a Fibonacci computation.
///
/// Uses a geometric model based on powers of 4 to estimate work.
/// Each doubling step roughly quadruples the number of digits.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn calc_total_work(n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let num_bits = 64 - u64::from(n.leading_zeros());
    let mut total = 0.0f64;
    for i in 0..num_bits {
        total += POWERS_OF_4[i as usize];
    }
    total
}

/// Fraction of total doubling work completed after `steps_done` of
/// `num_bits` iterations, weighted by the same geometric (4^i) model as
/// [`calc_total_work`].
///
/// The doubling loop runs from the most-significant bit down to the
/// least-significant one, so operand size roughly quadruples in cost every
/// iteration — a linear `steps_done / num_bits` fraction would report early
/// iterations (cheap, small operands) as making the same progress as late
/// ones (expensive, large operands), which is misleading for an ETA.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn calc_work_progress(steps_done: u64, num_bits: u64) -> f64 {
    if num_bits == 0 {
        return 1.0;
    }
    let steps_done = (steps_done as usize).min(num_bits as usize);
    let total: f64 = POWERS_OF_4[..num_bits as usize].iter().sum();
    let done: f64 = POWERS_OF_4[..steps_done].iter().sum();
    done / total
}

/// Precomputed powers of 4 for work estimation (4^0 through 4^63).
const POWERS_OF_4: [f64; 64] = {
    let mut table = [0.0f64; 64];
    table[0] = 1.0;
    let mut i = 1;
    while i < 64 {
        table[i] = table[i - 1] * 4.0;
        i += 1;
    }
    table
};

/// Cooperative cancellation token using atomic bool.
///
/// # Example
/// ```
/// use fibcalc_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicU64>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) != 0
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(1, Ordering::Relaxed);
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// Use this as a checkpoint in algorithm loops:
    /// ```
    /// use fibcalc_core::progress::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// // Not cancelled yet — returns Ok
    /// assert!(token.check_cancelled().is_ok());
    ///
    /// token.cancel();
    /// // Now cancelled — returns Err(FibError::Cancelled)
    /// assert!(token.check_cancelled().is_err());
    /// ```
    pub fn check_cancelled(&self) -> Result<(), FibError> {
        if self.is_cancelled() {
            Err(FibError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancellation token with a timeout.
///
/// Combines cooperative cancellation with an absolute deadline.
/// The token is considered cancelled if either `cancel()` was called
/// or the deadline has passed.
#[derive(Clone)]
pub struct TimeoutCancellationToken {
    inner: CancellationToken,
    deadline: Instant,
}

impl TimeoutCancellationToken {
    /// Create a new timeout cancellation token with the given duration.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: CancellationToken::new(),
            deadline: Instant::now() + timeout,
        }
    }

    /// Check if cancellation has been requested (either manual or timeout).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Request manual cancellation.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Check for cancellation (manual or timeout), returning an error if cancelled.
    pub fn check_cancelled(&self) -> Result<(), FibError> {
        if self.inner.is_cancelled() {
            return Err(FibError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(FibError::DeadlineExceeded(
                Instant::now().saturating_duration_since(self.deadline),
            ));
        }
        Ok(())
    }

    /// Get the remaining time before the deadline.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Get the inner `CancellationToken` for passing to APIs that don't support timeout.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.inner
    }
}

/// Helper to check cancellation at a checkpoint. Returns `Err(FibError::Cancelled)` if cancelled.
///
/// This is a convenience function for use in algorithm loops:
/// ```
/// use fibcalc_core::progress::{CancellationToken, check_cancellation};
///
/// let token = CancellationToken::new();
/// assert!(check_cancellation(&token).is_ok());
///
/// token.cancel();
/// assert!(check_cancellation(&token).is_err());
/// ```
#[inline]
pub fn check_cancellation(token: &CancellationToken) -> Result<(), FibError> {
    token.check_cancelled()
}
