//! End-to-end facade tests exercising `fibcalc_lib::app` directly.

use fibcalc_lib::app::{run_calculation, run_calibration};
use fibcalc_lib::config::RunConfig;

fn config(n: u64, algo: &str) -> RunConfig {
    RunConfig {
        n,
        algo: algo.to_string(),
        ..RunConfig::default()
    }
}

#[test]
fn compute_f100_fast() {
    let results = run_calculation(&config(100, "fast")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].value.as_ref().unwrap().to_string(),
        "354224848179261915075"
    );
}

#[test]
fn compute_f10_all_algos() {
    let results = run_calculation(&config(10, "all")).unwrap();
    assert!(results.len() > 1);
    for result in &results {
        assert_eq!(result.value.as_ref().unwrap().to_string(), "55");
    }
}

#[test]
fn compute_f0_and_f1() {
    assert_eq!(
        run_calculation(&config(0, "fast")).unwrap()[0]
            .value
            .as_ref()
            .unwrap()
            .to_string(),
        "0"
    );
    assert_eq!(
        run_calculation(&config(1, "fast")).unwrap()[0]
            .value
            .as_ref()
            .unwrap()
            .to_string(),
        "1"
    );
}

#[test]
fn invalid_algo_fails() {
    assert!(run_calculation(&config(100, "invalid")).is_err());
}

#[test]
fn compute_f1000() {
    let results = run_calculation(&config(1000, "fast")).unwrap();
    assert_eq!(
        results[0].value.as_ref().unwrap().to_string(),
        "43466557686937456435688527675040625802564"
    );
}

#[test]
fn matrix_algo() {
    let results = run_calculation(&config(500, "matrix")).unwrap();
    assert!(results[0].error.is_none());
}

#[test]
fn fft_algo() {
    let results = run_calculation(&config(500, "fft")).unwrap();
    assert!(results[0].error.is_none());
}

#[test]
fn memory_limit_sufficient() {
    let mut cfg = config(1000, "fast");
    cfg.memory_limit = "1G".to_string();
    let results = run_calculation(&cfg).unwrap();
    assert!(results[0].error.is_none());
}

#[test]
fn memory_limit_insufficient() {
    let mut cfg = config(1_000_000_000, "fast");
    cfg.memory_limit = "1K".to_string();
    assert!(run_calculation(&cfg).is_err());
}

/// Timeout is only checked between parallel calculator dispatches, not
/// mid-computation. A single-algorithm run completes regardless of the
/// timeout value. This test documents the current behaviour.
#[test]
fn timeout_too_short_single_algo_still_succeeds() {
    let mut cfg = config(100, "fast");
    cfg.timeout = std::time::Duration::from_millis(1);
    let results = run_calculation(&cfg).unwrap();
    assert!(results[0].error.is_none());
}

#[test]
fn calibration_auto() {
    let profile = run_calibration(false).unwrap();
    assert!(profile.parallel_threshold > 0);
}
