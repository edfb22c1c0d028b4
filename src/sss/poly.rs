//! Per-byte sharing polynomial generation.

use crate::gf::GfElement;
use rand::rngs::OsRng;
use rand::RngCore;

/// Draw the `degree` random coefficients of `x^1 .. x^degree` for a sharing
/// polynomial whose constant term is `secret_byte`. `coeffs[0]` holds
/// `secret_byte`; `coeffs[1..]` are uniformly random and nonzero is not
/// required (a zero high coefficient just lowers the effective degree,
/// which does not weaken the threshold property).
pub fn random_coefficients(secret_byte: u8, degree: usize) -> Vec<GfElement> {
    let mut coeffs = vec![0u8; degree + 1];
    coeffs[0] = secret_byte;
    if degree > 0 {
        OsRng.fill_bytes(&mut coeffs[1..]);
    }
    coeffs
}
