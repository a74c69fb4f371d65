//! Facade entry points wiring configuration, orchestration, and calibration
//! together for an embedding front end.

use anyhow::Result;

use fibcalc_calibration::CalibrationProfile;
use fibcalc_core::options::Options;
use fibcalc_core::progress::CancellationToken;
use fibcalc_core::registry::DefaultFactory;
use fibcalc_orchestration::calculator_selection::get_calculators_to_run;
use fibcalc_orchestration::interfaces::CalculationResult;
use fibcalc_orchestration::orchestrator::{analyze_comparison_results, execute_calculations};

use crate::config::RunConfig;

/// Build `Options` from a `RunConfig`, validating the memory-limit string.
///
/// # Errors
///
/// Returns an error if the memory-limit string is malformed.
pub fn build_options(config: &RunConfig) -> Result<Options> {
    Ok(Options {
        parallel_threshold: config.threshold,
        fft_threshold: config.fft_threshold,
        strassen_threshold: config.strassen_threshold,
        memory_limit: if config.memory_limit.is_empty() {
            0
        } else {
            fibcalc_core::memory_budget::parse_memory_limit(&config.memory_limit).map_err(|e| {
                anyhow::anyhow!("invalid memory limit '{}': {e}", config.memory_limit)
            })?
        },
        verbose: config.verbose,
        ..Options::default()
    }
    .normalize())
}

/// Run a calculation per `config`, dispatching to one or all registered
/// engines and returning one result per engine.
///
/// # Errors
///
/// Returns an error if the memory estimate exceeds the configured limit,
/// the memory-limit string is malformed, or the requested algorithm name
/// is unknown.
pub fn run_calculation(config: &RunConfig) -> Result<Vec<CalculationResult>> {
    let opts = build_options(config)?;

    let estimate = fibcalc_core::memory_budget::MemoryEstimate::estimate(config.n);
    let limit = if opts.memory_limit == 0 {
        None
    } else {
        Some(opts.memory_limit)
    };
    if !estimate.fits_in(limit) {
        anyhow::bail!(
            "estimated memory ({} MB) exceeds limit ({} MB)",
            estimate.total_bytes / (1024 * 1024),
            opts.memory_limit / (1024 * 1024)
        );
    }

    let factory = DefaultFactory::new();
    let calculators = get_calculators_to_run(&config.algo, &factory)?;
    let cancel = CancellationToken::new();

    let results = execute_calculations(&calculators, config.n, &opts, &cancel, Some(config.timeout));

    if results.len() > 1 {
        if let Err(e) = analyze_comparison_results(&results) {
            tracing::warn!("{e}");
        }
    }

    Ok(results)
}

/// Run calibration and persist the resulting profile.
///
/// # Errors
///
/// Returns an error if calibration or profile persistence fails.
pub fn run_calibration(full: bool) -> Result<CalibrationProfile> {
    use fibcalc_calibration::calibration::{CalibrationEngine, CalibrationMode};

    let mode = if full {
        CalibrationMode::Full
    } else {
        CalibrationMode::Auto
    };

    let engine = CalibrationEngine::new(mode);
    let profile = engine.calibrate();
    fibcalc_calibration::io::save_profile(&profile)?;
    Ok(profile)
}
