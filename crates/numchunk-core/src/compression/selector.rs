//! Single-pass analysis of a chunk and the layout decision table.
//!
//! Every entry is canonicalized, then rescaled to the smallest exponent seen
//! (`xmin`) so the whole chunk becomes a run of integers counting `10^xmin`
//! units. Their bounds decide the narrowest layout that holds them exactly.

use crate::encoding::{EncodingKind, SCALE_EXPONENT_RANGE};
use crate::entry::NumericEntry;

/// Largest span an `f32` mantissa holds exactly (2^23 - 1).
pub const MAX_FLOAT_MANTISSA: i128 = 0x7F_FFFF;

/// Decimal exponents a chunk may use and still be stored as `f32`.
pub const FLOAT_EXPONENT_RANGE: std::ops::RangeInclusive<i32> = -35..=35;

/// Rescaling by more than this many decimal digits disables biased layouts.
pub const MAX_RESCALE_DIGITS: u32 = 9;

/// Exclusive span limit of 1-byte layouts; offsets live in `[0, 254]`.
pub const BYTE_SPAN: i128 = 255;

/// Exclusive span limit of 2-byte layouts; offsets live in `[0, 65534]`.
pub const SHORT_SPAN: i128 = 65_535;

/// Bounds of one chunk at its common decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkAnalysis {
    /// Number of entries analyzed.
    pub rows: usize,
    /// Smallest canonical exponent (0 for an empty or all-zero chunk).
    pub xmin: i32,
    /// Minimum entry, in units of `10^xmin`.
    pub lemin: i128,
    /// Maximum entry, in units of `10^xmin`.
    pub lemax: i128,
    /// Set when rescaling shifted more than [`MAX_RESCALE_DIGITS`] digits or
    /// a bound left the `i64` range.
    pub overflow: bool,
    /// True when both bounds fit in an `i64`.
    pub fits_i64: bool,
}

/// The layout chosen for a chunk with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Chosen layout.
    pub kind: EncodingKind,
    /// Bias subtracted from every entry (0 for unbiased layouts).
    pub bias: i32,
    /// Decimal exponent of the scale (0 for unscaled layouts).
    pub exponent: i32,
}

impl Selection {
    const fn plain(kind: EncodingKind) -> Self {
        Self {
            kind,
            bias: 0,
            exponent: 0,
        }
    }

    const fn biased(kind: EncodingKind, bias: i32, exponent: i32) -> Self {
        Self {
            kind,
            bias,
            exponent,
        }
    }
}

/// Multiplies by `10^shift`, saturating at the `i128` bounds.
fn shift_saturating(value: i128, shift: u32) -> i128 {
    10i128
        .checked_pow(shift)
        .and_then(|factor| value.checked_mul(factor))
        .unwrap_or(match value.signum() {
            0 => 0,
            1 => i128::MAX,
            _ => i128::MIN,
        })
}

impl ChunkAnalysis {
    /// Analyzes parallel mantissa/exponent columns in one pass.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    #[must_use]
    pub fn analyze(mantissas: &[i64], exponents: &[i32]) -> Self {
        assert_eq!(
            mantissas.len(),
            exponents.len(),
            "mantissa and exponent columns must have equal length"
        );

        let mut xmin: Option<i32> = None;
        let mut lemin: i128 = 0;
        let mut lemax: i128 = 0;
        let mut overflow = false;

        for (&m, &x) in mantissas.iter().zip(exponents) {
            let entry = NumericEntry::new(m, x).canonical();
            let le = match xmin {
                None => {
                    xmin = Some(entry.exponent);
                    lemin = i128::from(entry.mantissa);
                    lemax = lemin;
                    continue;
                }
                Some(current) if entry.exponent < current => {
                    let shift = current.abs_diff(entry.exponent);
                    if shift > MAX_RESCALE_DIGITS {
                        overflow = true;
                    }
                    lemin = shift_saturating(lemin, shift);
                    lemax = shift_saturating(lemax, shift);
                    xmin = Some(entry.exponent);
                    i128::from(entry.mantissa)
                }
                Some(current) => {
                    shift_saturating(i128::from(entry.mantissa), entry.exponent.abs_diff(current))
                }
            };
            lemin = lemin.min(le);
            lemax = lemax.max(le);
        }

        let fits_i64 = lemin >= i128::from(i64::MIN) && lemax <= i128::from(i64::MAX);
        Self {
            rows: mantissas.len(),
            xmin: xmin.unwrap_or(0),
            lemin,
            lemax,
            overflow: overflow || !fits_i64,
            fits_i64,
        }
    }

    /// `lemax - lemin`.
    #[must_use]
    pub fn range(&self) -> i128 {
        self.lemax.saturating_sub(self.lemin)
    }

    /// `lemin` as a header bias, if it fits the 4-byte field.
    fn bias(&self) -> Option<i32> {
        i32::try_from(self.lemin).ok()
    }

    /// Applies the decision table; the first matching row wins.
    ///
    /// Scaled biased rows also need `xmin` in [`SCALE_EXPONENT_RANGE`] so the
    /// header scale reads back exactly.
    #[must_use]
    pub fn select(&self) -> Selection {
        let range = self.range();

        if self.xmin != 0 {
            if !self.overflow && SCALE_EXPONENT_RANGE.contains(&self.xmin) {
                if let Some(bias) = self.bias() {
                    if range < BYTE_SPAN {
                        return Selection::biased(EncodingKind::BiasedByte, bias, self.xmin);
                    }
                    if range < SHORT_SPAN {
                        return Selection::biased(EncodingKind::BiasedShort, bias, self.xmin);
                    }
                }
            }
            if range <= MAX_FLOAT_MANTISSA && FLOAT_EXPONENT_RANGE.contains(&self.xmin) {
                return Selection::plain(EncodingKind::Float);
            }
            return Selection::plain(EncodingKind::Double);
        }

        // Integers too large for any integer slot
        if !self.fits_i64 {
            return Selection::plain(EncodingKind::Double);
        }

        if range < BYTE_SPAN {
            if self.lemin >= 0 && self.lemax < BYTE_SPAN {
                return Selection::plain(EncodingKind::Byte);
            }
            if let Some(bias) = self.bias() {
                return Selection::biased(EncodingKind::BiasedByte, bias, 0);
            }
        }

        if range < SHORT_SPAN {
            if self.lemin >= -32_767 && self.lemax <= 32_767 {
                return Selection::plain(EncodingKind::Short);
            }
            if let Some(bias) = self.bias() {
                return Selection::biased(EncodingKind::BiasedShort, bias, 0);
            }
        }

        if self.lemin > i128::from(i32::MIN) && self.lemax <= i128::from(i32::MAX) {
            return Selection::plain(EncodingKind::Int);
        }

        Selection::plain(EncodingKind::Long)
    }
}
