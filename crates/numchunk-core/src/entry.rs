//! Exact decimal values as (mantissa, exponent) pairs.

use serde::{Deserialize, Serialize};

/// Powers of ten that are exactly representable as `f64`.
const F64_POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// A numeric value held exactly as `mantissa * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericEntry {
    /// Signed decimal mantissa.
    pub mantissa: i64,
    /// Power-of-ten exponent.
    pub exponent: i32,
}

impl NumericEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(mantissa: i64, exponent: i32) -> Self {
        Self { mantissa, exponent }
    }

    /// Returns the canonical form of this value.
    ///
    /// Zero always has exponent zero. Otherwise trailing decimal zeros are
    /// moved from the mantissa into the exponent, so `(2300, -2)` becomes
    /// `(23, 0)`.
    #[must_use]
    pub fn canonical(self) -> Self {
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        if mantissa == 0 {
            return Self::new(0, 0);
        }
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent = exponent.saturating_add(1);
        }
        Self::new(mantissa, exponent)
    }

    /// Returns the value rescaled to an integer count of `10^target` units.
    ///
    /// `None` when `target` is above this entry's exponent (the result would
    /// be fractional) or when the result does not fit in an `i64`.
    #[must_use]
    pub fn rescaled(self, target: i32) -> Option<i64> {
        let shift = i64::from(self.exponent) - i64::from(target);
        if self.mantissa == 0 {
            return Some(0);
        }
        if shift < 0 {
            return None;
        }
        let factor = pow10_i64(u32::try_from(shift).ok()?)?;
        self.mantissa.checked_mul(factor)
    }

    /// Converts to the nearest `f64`.
    ///
    /// Correctly rounded when the mantissa is below 2^53 and the exponent is
    /// within ±22.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        scale_f64(self.mantissa as f64, self.exponent)
    }
}

impl From<(i64, i32)> for NumericEntry {
    fn from((mantissa, exponent): (i64, i32)) -> Self {
        Self::new(mantissa, exponent)
    }
}

/// `10^exp` as an `i64`, or `None` if it overflows.
#[must_use]
pub fn pow10_i64(exp: u32) -> Option<i64> {
    10i64.checked_pow(exp)
}

/// `10^exp` as the nearest `f64`.
#[must_use]
pub fn pow10_f64(exp: i32) -> f64 {
    match exp {
        0..=22 => F64_POW10[exp as usize],
        -22..=-1 => 1.0 / F64_POW10[(-exp) as usize],
        _ => 10f64.powi(exp),
    }
}

/// Computes `value * 10^exp` with a single rounding where possible.
///
/// Negative exponents divide by an exact power of ten instead of multiplying
/// by an inexact reciprocal, so `120 * 10^-2` yields exactly `1.2`.
#[must_use]
pub fn scale_f64(value: f64, exp: i32) -> f64 {
    match exp {
        0..=22 => value * F64_POW10[exp as usize],
        -22..=-1 => value / F64_POW10[(-exp) as usize],
        _ => value * 10f64.powi(exp),
    }
}
