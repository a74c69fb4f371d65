//! Profile persistence (load/save).
//!
//! Default location is `${HOME}/.fibcalc_calibration.json`, saved with mode
//! 0600 since it records a hardware fingerprint specific to this machine.

use std::path::PathBuf;

use crate::profile::{self, CalibrationProfile};

const PROFILE_FILENAME: &str = ".fibcalc_calibration.json";

/// Load calibration profile from the standard location (`${HOME}/.fibcalc_calibration.json`),
/// falling back to the working directory if `HOME` isn't set.
#[must_use]
pub fn load_profile() -> Option<CalibrationProfile> {
    let path = default_profile_path();
    if path.exists() {
        return load_from_path(&path);
    }

    let path = cwd_profile_path();
    if path.exists() {
        return load_from_path(&path);
    }

    None
}

/// Load a profile and validate it against the current environment.
/// Returns `None` if the profile is incompatible, invalid, or for a different CPU.
pub fn load_validated_profile() -> Option<CalibrationProfile> {
    let p = load_profile()?;

    if !p.is_compatible() {
        tracing::info!("Profile version mismatch, ignoring cached profile");
        return None;
    }
    if !p.is_valid() {
        tracing::info!("Profile has invalid thresholds, ignoring cached profile");
        return None;
    }

    let current_fp = profile::cpu_fingerprint();
    if !p.matches_cpu(&current_fp) {
        tracing::info!("Profile CPU mismatch, ignoring cached profile");
        return None;
    }

    Some(p)
}

/// Save calibration profile to `${HOME}/.fibcalc_calibration.json`, falling
/// back to the working directory if `HOME` isn't set.
pub fn save_profile(p: &CalibrationProfile) -> std::io::Result<()> {
    let path = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(PROFILE_FILENAME))
        .unwrap_or_else(cwd_profile_path);

    save_to_path(p, &path)
}

/// Save profile to a specific path, restricting it to owner read/write
/// (mode 0600) on Unix since it records a machine-specific fingerprint.
pub fn save_to_path(p: &CalibrationProfile, path: &std::path::Path) -> std::io::Result<()> {
    let content = serde_json::to_string_pretty(p).map_err(std::io::Error::other)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Delete the saved profile if it exists.
pub fn delete_profile() -> std::io::Result<bool> {
    let path = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(PROFILE_FILENAME))
        .unwrap_or_else(cwd_profile_path);
    if path.exists() {
        std::fs::remove_file(&path)?;
        return Ok(true);
    }

    let path = cwd_profile_path();
    if path.exists() {
        std::fs::remove_file(&path)?;
        return Ok(true);
    }
    Ok(false)
}

fn load_from_path(path: &std::path::Path) -> Option<CalibrationProfile> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Default profile path: `${HOME}/.fibcalc_calibration.json`.
fn default_profile_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(PROFILE_FILENAME))
        .unwrap_or_else(cwd_profile_path)
}

/// Fallback profile path in the current working directory.
fn cwd_profile_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(PROFILE_FILENAME)
}
