//! Error handling and exit codes.

use fibcalc_core::calculator::FibError;
use fibcalc_core::constants::exit_codes;

/// Map a calculation error to the appropriate process exit code.
#[allow(dead_code)]
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::ArithmeticFailure(_) | FibError::InvalidInput(_) => exit_codes::ERROR_GENERIC,
        FibError::AlgorithmUnavailable(_) | FibError::ProfileIO(_) => exit_codes::ERROR_CONFIG,
        FibError::Cancelled => exit_codes::ERROR_CANCELED,
        FibError::DeadlineExceeded(_) => exit_codes::ERROR_TIMEOUT,
        FibError::ResultMismatch(_) => exit_codes::ERROR_MISMATCH,
    }
}
