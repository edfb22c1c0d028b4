//! Arithmetic over GF(2^8), reduction polynomial `x^8 + x^4 + x^3 + x^2 + 1`
//! (`0x11D`), primitive element `alpha = 2`.
//!
//! The table-based operations (`add`, `mul`, `div`, `pow`, `inv`) are the
//! primary implementation used throughout the crate: `exp`/`log` lookup
//! tables are built once and never rebuilt. `mul_ct`/`inv_ct` are a fully
//! constant-time fallback (no data-dependent table index), available for
//! callers who need that property when handling secret material directly;
//! they are not wired into the RS/SSS pipelines by default.

use crate::error::FieldError;
use once_cell::sync::Lazy;

/// An element of GF(2^8), represented as its integer value in `[0, 255]`.
pub type GfElement = u8;

const REDUCTION_POLY: u16 = 0x11D;

struct Tables {
    /// `exp[i] = alpha^i`, duplicated across `[0, 510]` so `exp[a + b]` never
    /// needs an extra modulo when `a, b <= 255`.
    exp: [GfElement; 512],
    /// `log[x]` is the discrete log of `x` base `alpha`, for `x in [1, 255]`.
    /// `log[0]` is unused (zero has no logarithm).
    log: [u8; 256],
}

impl Tables {
    fn build() -> Tables {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];

        let mut x: u16 = 1;
        for i in 0..255usize {
            exp[i] = x as GfElement;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= REDUCTION_POLY;
            }
        }
        for i in 255..512usize {
            exp[i] = exp[i - 255];
        }

        Tables { exp, log }
    }
}

static TABLES: Lazy<Tables> = Lazy::new(Tables::build);

/// `a XOR b`. Addition and subtraction coincide in characteristic 2.
#[inline]
pub fn add(a: GfElement, b: GfElement) -> GfElement {
    a ^ b
}

/// Alias of [`add`]; subtraction is addition in GF(2^8).
#[inline]
pub fn sub(a: GfElement, b: GfElement) -> GfElement {
    add(a, b)
}

/// Field multiplication via the `exp`/`log` tables. Total: never fails.
#[inline]
pub fn mul(a: GfElement, b: GfElement) -> GfElement {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = &*TABLES;
    let sum = t.log[a as usize] as usize + t.log[b as usize] as usize;
    t.exp[sum]
}

/// Field division `a / b`. Fails when `b == 0`.
pub fn div(a: GfElement, b: GfElement) -> Result<GfElement, FieldError> {
    if b == 0 {
        return Err(FieldError::DivideByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let t = &*TABLES;
    let diff = 255 + t.log[a as usize] as i32 - t.log[b as usize] as i32;
    Ok(t.exp[(diff % 255) as usize])
}

/// `a^n` for a non-negative integer exponent `n`. `a^0 = 1` for all `a`
/// including `a == 0`, matching the conventional empty-product definition.
pub fn pow(a: GfElement, n: u32) -> GfElement {
    if n == 0 {
        return 1;
    }
    if a == 0 {
        return 0;
    }
    let t = &*TABLES;
    let exponent = (t.log[a as usize] as u64 * n as u64) % 255;
    t.exp[exponent as usize]
}

/// Multiplicative inverse of `a`. Fails when `a == 0`.
pub fn inv(a: GfElement) -> Result<GfElement, FieldError> {
    if a == 0 {
        return Err(FieldError::InverseOfZero);
    }
    let t = &*TABLES;
    Ok(t.exp[255 - t.log[a as usize] as usize])
}

/// Evaluate a polynomial (coefficients in ascending degree order, `coeffs[0]`
/// is the constant term) at `x` using Horner's method.
pub fn horner_eval(coeffs: &[GfElement], x: GfElement) -> GfElement {
    coeffs.iter().rev().fold(0, |acc, &c| add(mul(acc, x), c))
}

/// A fully constant-time multiply: peasant multiplication with reduction
/// folded into the loop, no table lookup.
pub fn mul_ct(a: GfElement, b: GfElement) -> GfElement {
    let mut yj: u16 = a as u16;
    let mut xj: u16 = b as u16;
    let mut z: u16 = 0;

    for _ in 0..8 {
        z ^= 0u16.wrapping_sub(xj & 1) & yj;
        xj >>= 1;
        yj <<= 1;
        yj ^= 0u16.wrapping_sub(yj >> 8) & 0x11b;
    }

    z as GfElement
}

/// Constant-time inverse built from [`mul_ct`]: `a^254 = a^-1` in GF(2^8),
/// computed via square-and-multiply without branching on `a`'s value.
/// Returns `0` for `a == 0`.
pub fn inv_ct(a: GfElement) -> GfElement {
    let mut j = mul_ct(a, a);
    for _ in 0..6 {
        j = mul_ct(j, a);
        j = mul_ct(j, j);
    }
    j
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_xor_and_self_inverse() {
        let a: GfElement = 0xbe;
        let b: GfElement = 0x6c;
        assert_eq!(a ^ b, add(a, b));
        assert_eq!(0, add(a, a));
    }

    #[test]
    fn mul_zero_absorbing() {
        assert_eq!(0, mul(0, 200));
        assert_eq!(0, mul(200, 0));
    }

    #[test]
    fn mul_matches_constant_time_variant() {
        for a in 0..=255u8 {
            for b in (0..=255u8).step_by(17) {
                assert_eq!(mul(a, b), mul_ct(a, b), "a={a} b={b}");
            }
        }
    }

    #[test]
    fn mul_inv_roundtrip() {
        for a in 1..=255u8 {
            let inverse = inv(a).unwrap();
            assert_eq!(1, mul(a, inverse), "a={a}");
            assert_eq!(inv_ct(a), inverse, "a={a}");
        }
    }

    #[test]
    fn inv_of_zero_fails() {
        assert_eq!(Err(FieldError::InverseOfZero), inv(0));
    }

    #[test]
    fn div_by_zero_fails() {
        assert_eq!(Err(FieldError::DivideByZero), div(5, 0));
    }

    #[test]
    fn div_is_mul_by_inverse() {
        for a in 0..=255u8 {
            for b in 1..=255u8 {
                assert_eq!(mul(a, inv(b).unwrap()), div(a, b).unwrap());
            }
        }
    }

    #[test]
    fn exp_log_roundtrip() {
        for x in 1..=255u8 {
            let l = TABLES.log[x as usize];
            assert_eq!(x, TABLES.exp[l as usize]);
        }
    }

    #[test]
    fn pow_matches_repeated_mul() {
        for a in [1u8, 2, 3, 0x53, 0xff] {
            let mut acc = 1u8;
            for n in 0..16u32 {
                assert_eq!(acc, pow(a, n), "a={a} n={n}");
                acc = mul(acc, a);
            }
        }
        assert_eq!(1, pow(0, 0));
        assert_eq!(0, pow(0, 1));
    }

    #[test]
    fn horner_matches_direct_eval() {
        let coeffs = [3u8, 7, 0xaa, 1];
        for x in 0..=255u8 {
            let mut direct = 0u8;
            for (i, &c) in coeffs.iter().enumerate() {
                direct = add(direct, mul(c, pow(x, i as u32)));
            }
            assert_eq!(direct, horner_eval(&coeffs, x), "x={x}");
        }
    }
}
