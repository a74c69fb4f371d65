//! Calibration profile (serializable).

use serde::{Deserialize, Serialize};

use fibcalc_core::constants::{
    DEFAULT_FFT_THRESHOLD, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD,
};

/// Current profile format version.
pub const PROFILE_VERSION: u32 = 1;

/// A threshold set measured as optimal over a specific range of `n`.
///
/// Populated only by calibration runs that bucket measurements by `n`
/// (finer-grained than the single whole-profile threshold set); absent
/// from a plain auto/full calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min_n: u64,
    pub max_n: u64,
    pub fft_threshold: usize,
    pub parallel_threshold: usize,
    pub strassen_threshold: usize,
    pub confidence_score: f64,
    pub measurement_count: u32,
}

/// Calibration profile containing optimized thresholds, serialized with the
/// exact field names the calibration profile file format uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Profile format version for compatibility checking.
    #[serde(rename = "profile_version")]
    pub version: u32,
    /// Optimized parallel threshold.
    #[serde(rename = "optimal_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Optimized FFT threshold.
    #[serde(rename = "optimal_fft_threshold")]
    pub fft_threshold: usize,
    /// Optimized Strassen threshold.
    #[serde(rename = "optimal_strassen_threshold")]
    pub strassen_threshold: usize,
    /// CPU model used for calibration.
    pub cpu_model: String,
    /// Number of logical CPUs.
    #[serde(rename = "num_cpu")]
    pub num_cores: usize,
    /// Target architecture (`std::env::consts::ARCH`).
    pub arch: String,
    /// Target OS (`std::env::consts::OS`).
    pub os: String,
    /// Pointer width in bits.
    pub word_size: usize,
    /// The largest `n` exercised while producing this profile.
    pub calibration_n: u64,
    /// Calibration timestamp, RFC 3339.
    #[serde(rename = "calibrated_at")]
    pub timestamp: String,
    /// CPU fingerprint used for cache invalidation; not part of the
    /// documented format but harmless extra data for readers that ignore
    /// unknown keys.
    #[serde(default)]
    pub cpu_fingerprint: String,
    /// Optional per-range threshold measurements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds_by_range: Vec<ThresholdRange>,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            fft_threshold: DEFAULT_FFT_THRESHOLD,
            strassen_threshold: DEFAULT_STRASSEN_THRESHOLD,
            cpu_model: String::new(),
            num_cores: num_cpus(),
            arch: std::env::consts::ARCH.to_string(),
            os: std::env::consts::OS.to_string(),
            word_size: usize::BITS as usize,
            calibration_n: 0,
            timestamp: String::new(),
            cpu_fingerprint: String::new(),
            thresholds_by_range: Vec::new(),
        }
    }
}

impl CalibrationProfile {
    /// Check if this profile is compatible with the current version.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == PROFILE_VERSION
    }

    /// Check if this profile matches the current CPU.
    #[must_use]
    pub fn matches_cpu(&self, current_fingerprint: &str) -> bool {
        if self.cpu_fingerprint.is_empty() || current_fingerprint.is_empty() {
            return true; // can't verify, assume compatible
        }
        self.cpu_fingerprint == current_fingerprint
    }

    /// Validate that thresholds are within reasonable bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.parallel_threshold > 0
            && self.fft_threshold > 0
            && self.strassen_threshold > 0
            && self.fft_threshold >= self.strassen_threshold
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(4)
}

/// Get a CPU fingerprint based on model and core count.
#[must_use]
pub fn cpu_fingerprint() -> String {
    let cores = num_cpus();
    format!("cores={cores}")
}

/// Get the current CPU model string.
#[must_use]
pub fn cpu_model() -> String {
    use sysinfo::System;
    let sys = System::new_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().to_string())
        .unwrap_or_default()
}

/// Get the current timestamp formatted as RFC 3339 (UTC, second precision).
#[must_use]
pub fn current_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_rfc3339(secs)
}

/// Render Unix seconds as `YYYY-MM-DDTHH:MM:SSZ`, computing the civil
/// calendar date from the day count with Howard Hinnant's `civil_from_days`
/// algorithm (avoids pulling in a date/time crate for one formatter).
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn format_rfc3339(unix_secs: u64) -> String {
    let days = (unix_secs / 86400) as i64;
    let time_of_day = unix_secs % 86400;
    let (hour, minute, second) = (time_of_day / 3600, (time_of_day / 60) % 60, time_of_day % 60);

    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // [0, 399]
    let year = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let day = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let month = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if month <= 2 { year + 1 } else { year };

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}
