//! Orchestration interfaces.

use std::time::Duration;

use num_bigint::BigUint;

use fibcalc_core::calculator::FibError;
use fibcalc_core::progress::ProgressUpdate;

/// Trait for reporting progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update.
    fn report(&self, update: &ProgressUpdate);

    /// Report completion.
    fn complete(&self);
}

/// Result of a single calculation: `{name, result, duration, error}`.
///
/// `value` and `error` are mutually exclusive rather than a single
/// `Result`, since a timed-out dispatch in a multi-algorithm run carries
/// only a textual error (the originating `FibError` doesn't survive the
/// rayon boundary cleanly) while a successful one carries only a value.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// Algorithm name.
    pub algorithm: String,
    /// The computed value, if the calculation succeeded.
    pub value: Option<BigUint>,
    /// Computation duration.
    pub duration: Duration,
    /// The error message, if the calculation failed.
    pub error: Option<String>,
}

impl CalculationResult {
    /// Build a result from a calculator's `Result<BigUint, FibError>` outcome.
    #[must_use]
    pub fn from_outcome(
        algorithm: String,
        outcome: Result<BigUint, FibError>,
        duration: Duration,
    ) -> Self {
        match outcome {
            Ok(value) => Self {
                algorithm,
                value: Some(value),
                duration,
                error: None,
            },
            Err(e) => Self {
                algorithm,
                value: None,
                duration,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn report(&self, _update: &ProgressUpdate) {}
    fn complete(&self) {}
}
