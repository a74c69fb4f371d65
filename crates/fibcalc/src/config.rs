//! Programmatic configuration for a calculation run.
//!
//! This mirrors the knobs a caller would otherwise pass on a command line,
//! but as a plain struct — argument parsing, environment variables, and
//! shell completions belong to whatever front end embeds this crate, not
//! to the facade itself.

use std::time::Duration;

/// Configuration for a single invocation of the calculator.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunConfig {
    /// Fibonacci index to compute.
    pub n: u64,

    /// Engine selector: `"fast"`, `"matrix"`, `"fft"`, or `"all"`.
    pub algo: String,

    /// Include timing and per-algorithm details in the result set.
    pub details: bool,

    /// Emit progress and diagnostic logging while computing.
    pub verbose: bool,

    /// Wall-clock budget for the whole run.
    pub timeout: Duration,

    /// Parallel multiplication threshold in bits (0 = use the default).
    pub threshold: usize,

    /// FFT multiplication threshold in bits (0 = use the default).
    pub fft_threshold: usize,

    /// Strassen multiplication threshold in bits (0 = use the default).
    pub strassen_threshold: usize,

    /// Memory budget string (e.g. "8G", "512M"); empty means unlimited.
    pub memory_limit: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n: 100_000_000,
            algo: "all".to_string(),
            details: false,
            verbose: false,
            timeout: Duration::from_secs(300),
            threshold: 0,
            fft_threshold: 0,
            strassen_threshold: 0,
            memory_limit: String::new(),
        }
    }
}
