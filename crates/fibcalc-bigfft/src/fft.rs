//! Public FFT multiplication API.
//!
//! Routes to the NTT-based multiplication pipeline for large operands,
//! and falls back to standard num-bigint multiplication for small ones.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::fermat::{select_fft_params, FermatNum};
use crate::fft_cache::{self, CacheKey};
use crate::fft_core::{fft_forward, fft_inverse};
use crate::fft_poly::{pointwise_multiply, reassemble, Poly};

/// Forward-transform `value` under the given FFT parameters, consulting the
/// process-wide transform cache first. A cache hit skips the forward NTT
/// entirely; a miss computes it and stores the result for reuse by a later
/// call with the same operand and parameters (e.g. the same Fast-Doubling
/// scratch value used in both a multiply and a square within one step).
fn forward_transform_cached(
    value: &BigUint,
    poly_len: usize,
    piece_bits: usize,
    fermat_shift: usize,
) -> Vec<FermatNum> {
    let bit_len = value.bits() as usize;
    if !fft_cache::is_enabled_for(bit_len) {
        let poly = Poly::from_biguint(value, poly_len, piece_bits, fermat_shift);
        let mut coeffs = poly.coeffs;
        fft_forward(&mut coeffs, fermat_shift);
        return coeffs;
    }

    let key = CacheKey::for_operand_with_params(value, piece_bits, fermat_shift);
    let cache = fft_cache::global();
    if let Some(cached) = cache.get(&key) {
        return cached
            .into_iter()
            .map(|data| FermatNum { data, shift: fermat_shift })
            .collect();
    }

    let poly = Poly::from_biguint(value, poly_len, piece_bits, fermat_shift);
    let mut coeffs = poly.coeffs;
    fft_forward(&mut coeffs, fermat_shift);
    cache.put(key, coeffs.iter().map(|c| c.data.clone()).collect());
    coeffs
}

/// Threshold in bits above which FFT multiplication is used.
const FFT_BIT_THRESHOLD: usize = 10_000;

/// Multiply two `BigUints`, using FFT for large operands.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    let max_bits = a.bits().max(b.bits()) as usize;
    if max_bits >= FFT_BIT_THRESHOLD {
        fft_multiply(a, b)
    } else {
        a * b
    }
}

/// Square a `BigUint`, using FFT with transform reuse for large operands.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sqr(a: &BigUint) -> BigUint {
    let bits = a.bits() as usize;
    if bits >= FFT_BIT_THRESHOLD {
        fft_square(a)
    } else {
        a * a
    }
}

/// Multiply and store result in destination.
pub fn mul_to(dst: &mut BigUint, a: &BigUint, b: &BigUint) {
    *dst = mul(a, b);
}

/// Square and store result in destination.
pub fn sqr_to(dst: &mut BigUint, a: &BigUint) {
    *dst = sqr(a);
}

/// FFT multiplication core using Schönhage-Strassen NTT over Fermat ring.
#[allow(clippy::cast_possible_truncation)]
fn fft_multiply(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::ZERO;
    }

    let a_bits = a.bits() as usize;
    let b_bits = b.bits() as usize;
    let (piece_bits, n, fermat_shift) = select_fft_params(a_bits, b_bits);

    // Forward NTT, reusing a cached transform for either operand if one
    // exists for this exact parameter set.
    let coeffs_a = forward_transform_cached(a, n, piece_bits, fermat_shift);
    let coeffs_b = forward_transform_cached(b, n, piece_bits, fermat_shift);

    // Pointwise multiply in transform domain
    let mut result_coeffs = pointwise_multiply(&coeffs_a, &coeffs_b, fermat_shift);

    // Inverse NTT
    fft_inverse(&mut result_coeffs, fermat_shift);

    // Reassemble from polynomial coefficients
    reassemble(&result_coeffs, piece_bits)
}

/// FFT squaring with transform reuse optimization.
///
/// Only performs one forward NTT instead of two.
#[allow(clippy::cast_possible_truncation)]
fn fft_square(a: &BigUint) -> BigUint {
    if a.is_zero() {
        return BigUint::ZERO;
    }

    let a_bits = a.bits() as usize;
    let (piece_bits, n, fermat_shift) = select_fft_params(a_bits, a_bits);

    // Forward NTT (only once for squaring), reusing a cached transform if
    // this exact value was already transformed under these parameters.
    let mut coeffs = forward_transform_cached(a, n, piece_bits, fermat_shift);

    // Pointwise square in-place (reuse same transform, no new allocation)
    for coeff in &mut coeffs {
        let squared = coeff.fermat_mul(coeff);
        *coeff = squared;
    }

    // Inverse NTT
    fft_inverse(&mut coeffs, fermat_shift);

    // Reassemble
    reassemble(&coeffs, piece_bits)
}

/// Direct FFT multiply (always uses FFT, for testing purposes).
#[cfg(test)]
fn fft_multiply_direct(a: &BigUint, b: &BigUint) -> BigUint {
    fft_multiply(a, b)
}
