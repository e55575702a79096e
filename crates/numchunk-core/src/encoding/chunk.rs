//! Read-only encoded chunks.
//!
//! An [`EncodedChunk`] wraps the packed bytes of one chunk together with the
//! parameters needed to decode them. Instances are never mutated after
//! construction, so any number of readers may decode one concurrently.

use bytes::Bytes;

use super::kind::{ByteOrder, EncodingKind, BIASED_HEADER_LEN, SCALE_EXPONENT_RANGE};
use crate::entry::{pow10_f64, pow10_i64, scale_f64};
use crate::error::{Error, Result};

/// Packed fixed-width slots, optionally preceded by a header.
#[derive(Debug, Clone, PartialEq)]
pub struct Slots {
    mem: Bytes,
    order: ByteOrder,
    start: usize,
    width: usize,
    len: usize,
}

impl Slots {
    fn new(mem: Bytes, order: ByteOrder, start: usize, width: usize) -> Self {
        let len = (mem.len() - start) / width;
        Self {
            mem,
            order,
            start,
            width,
            len,
        }
    }

    /// Bytes of the slot for `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= len`.
    #[inline]
    fn slot(&self, row: usize) -> &[u8] {
        assert!(
            row < self.len,
            "row {row} out of bounds for chunk of {} rows",
            self.len
        );
        let off = self.start + row * self.width;
        &self.mem[off..off + self.width]
    }
}

/// Per-chunk bias and decimal scale of the biased layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct Biased {
    slots: Slots,
    bias: i32,
    scale: f64,
    /// `scale == 10^exponent`.
    exponent: i32,
}

impl Biased {
    #[inline]
    fn raw(&self, row: usize) -> i64 {
        let slot = self.slots.slot(row);
        let offset = if self.slots.width == 1 {
            i64::from(slot[0])
        } else {
            i64::from(self.slots.order.get_u16(slot))
        };
        offset + i64::from(self.bias)
    }

    fn double_value(&self, row: usize) -> f64 {
        scale_f64(self.raw(row) as f64, self.exponent)
    }

    fn integer_value(&self, row: usize) -> Result<i64> {
        let value = self.raw(row);
        let exact = if self.exponent >= 0 {
            pow10_i64(self.exponent.unsigned_abs()).and_then(|f| value.checked_mul(f))
        } else {
            match pow10_i64(self.exponent.unsigned_abs()) {
                Some(d) if value % d == 0 => Some(value / d),
                Some(_) => None,
                None if value == 0 => Some(0),
                None => None,
            }
        };
        exact.ok_or_else(|| Error::UnsupportedConversion {
            row,
            value: self.double_value(row),
        })
    }
}

/// One chunk in one of the fixed-width layouts of [`EncodingKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedChunk {
    /// Unbiased 1-byte slots.
    Byte(Slots),
    /// Biased 1-byte slots with a scale/bias header.
    BiasedByte(Biased),
    /// Unbiased signed 2-byte slots.
    Short(Slots),
    /// Biased 2-byte slots with a scale/bias header.
    BiasedShort(Biased),
    /// Unbiased signed 4-byte slots.
    Int(Slots),
    /// Unbiased signed 8-byte slots.
    Long(Slots),
    /// Single precision floats.
    Float(Slots),
    /// Double precision floats.
    Double(Slots),
}

impl EncodedChunk {
    /// Builds an unbiased chunk over already packed slots.
    pub(crate) fn plain(kind: EncodingKind, order: ByteOrder, mem: Bytes) -> Self {
        debug_assert!(!kind.is_biased());
        let slots = Slots::new(mem, order, 0, kind.slot_width());
        match kind {
            EncodingKind::Byte => Self::Byte(slots),
            EncodingKind::Short => Self::Short(slots),
            EncodingKind::Int => Self::Int(slots),
            EncodingKind::Long => Self::Long(slots),
            EncodingKind::Float => Self::Float(slots),
            _ => Self::Double(slots),
        }
    }

    /// Builds a biased chunk whose header already holds `bias` and `10^exponent`.
    pub(crate) fn biased(
        kind: EncodingKind,
        order: ByteOrder,
        mem: Bytes,
        bias: i32,
        exponent: i32,
    ) -> Self {
        debug_assert!(kind.is_biased());
        let biased = Biased {
            slots: Slots::new(mem, order, BIASED_HEADER_LEN, kind.slot_width()),
            bias,
            scale: pow10_f64(exponent),
            exponent,
        };
        if kind == EncodingKind::BiasedByte {
            Self::BiasedByte(biased)
        } else {
            Self::BiasedShort(biased)
        }
    }

    /// Reconstructs a chunk from bytes produced by [`EncodedChunk::serialize`].
    ///
    /// The header of biased layouts is decoded here, before any row is read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptChunk`] if the buffer length does not match
    /// the layout or the header scale is not a power of ten in
    /// [`SCALE_EXPONENT_RANGE`].
    pub fn deserialize(kind: EncodingKind, order: ByteOrder, mem: Bytes) -> Result<Self> {
        let header = kind.header_len();
        let width = kind.slot_width();
        if mem.len() < header || (mem.len() - header) % width != 0 {
            return Err(Error::CorruptChunk(format!(
                "{kind} chunk of {} bytes does not hold a {header}-byte header and {width}-byte slots",
                mem.len()
            )));
        }

        if !kind.is_biased() {
            return Ok(Self::plain(kind, order, mem));
        }

        let scale = order.get_f64(&mem[0..8]);
        let bias = order.get_i32(&mem[8..12]);
        let exponent = SCALE_EXPONENT_RANGE
            .clone()
            .find(|&e| pow10_f64(e) == scale)
            .ok_or_else(|| {
                Error::CorruptChunk(format!(
                    "scale {scale} is not a power of ten between 1e-22 and 1e22"
                ))
            })?;
        Ok(Self::biased(kind, order, mem, bias, exponent))
    }

    /// Layout of this chunk.
    #[must_use]
    pub fn kind(&self) -> EncodingKind {
        match self {
            Self::Byte(_) => EncodingKind::Byte,
            Self::BiasedByte(_) => EncodingKind::BiasedByte,
            Self::Short(_) => EncodingKind::Short,
            Self::BiasedShort(_) => EncodingKind::BiasedShort,
            Self::Int(_) => EncodingKind::Int,
            Self::Long(_) => EncodingKind::Long,
            Self::Float(_) => EncodingKind::Float,
            Self::Double(_) => EncodingKind::Double,
        }
    }

    fn slots(&self) -> &Slots {
        match self {
            Self::BiasedByte(b) | Self::BiasedShort(b) => &b.slots,
            Self::Byte(s)
            | Self::Short(s)
            | Self::Int(s)
            | Self::Long(s)
            | Self::Float(s)
            | Self::Double(s) => s,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots().len
    }

    /// True if the chunk has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte order of the packed buffer.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.slots().order
    }

    /// Bias added to every raw slot (0 for unbiased layouts).
    #[must_use]
    pub fn bias(&self) -> i32 {
        match self {
            Self::BiasedByte(b) | Self::BiasedShort(b) => b.bias,
            _ => 0,
        }
    }

    /// Decimal scale applied after the bias (1.0 for unscaled layouts).
    #[must_use]
    pub fn scale(&self) -> f64 {
        match self {
            Self::BiasedByte(b) | Self::BiasedShort(b) => b.scale,
            _ => 1.0,
        }
    }

    /// Size of the serialized form in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.slots().mem.len()
    }

    /// Decodes `row` as a double.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[must_use]
    pub fn double_value(&self, row: usize) -> f64 {
        match self {
            Self::Byte(s) => f64::from(s.slot(row)[0]),
            Self::BiasedByte(b) | Self::BiasedShort(b) => b.double_value(row),
            Self::Short(s) => f64::from(s.order.get_i16(s.slot(row))),
            Self::Int(s) => f64::from(s.order.get_i32(s.slot(row))),
            Self::Long(s) => s.order.get_i64(s.slot(row)) as f64,
            Self::Float(s) => f64::from(s.order.get_f32(s.slot(row))),
            Self::Double(s) => s.order.get_f64(s.slot(row)),
        }
    }

    /// Decodes `row` as an exact integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedConversion`] if the stored value has a
    /// fractional part or lies outside the `i64` range.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    pub fn integer_value(&self, row: usize) -> Result<i64> {
        match self {
            Self::Byte(s) => Ok(i64::from(s.slot(row)[0])),
            Self::BiasedByte(b) | Self::BiasedShort(b) => b.integer_value(row),
            Self::Short(s) => Ok(i64::from(s.order.get_i16(s.slot(row)))),
            Self::Int(s) => Ok(i64::from(s.order.get_i32(s.slot(row)))),
            Self::Long(s) => Ok(s.order.get_i64(s.slot(row))),
            Self::Float(_) | Self::Double(_) => {
                let value = self.double_value(row);
                float_to_i64(value).ok_or(Error::UnsupportedConversion { row, value })
            }
        }
    }

    /// Serialized form: header plus packed slots, exactly as stored.
    #[must_use]
    pub fn serialize(&self) -> Bytes {
        self.slots().mem.clone()
    }

    /// Iterates every row as a double.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |row| self.double_value(row))
    }

    /// Decodes every row as a double.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter_f64().collect()
    }
}

/// Exact conversion of an integral float, `None` if fractional or out of range.
fn float_to_i64(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}
