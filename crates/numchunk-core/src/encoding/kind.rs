//! Encoding identifiers and byte order.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

/// Length of the biased header: 8-byte `scale` followed by 4-byte `bias`.
pub const BIASED_HEADER_LEN: usize = 8 + 4;

/// Exponents a biased header scale may carry.
///
/// Every `10^x` in this range is an exact `f64`, so the header scale maps
/// back to one exponent on any platform.
pub const SCALE_EXPONENT_RANGE: std::ops::RangeInclusive<i32> = -22..=22;

/// Byte order shared by every slot and header field of an encoded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Least significant byte first (default).
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// The closed set of fixed-width chunk layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingKind {
    /// Unbiased 1-byte slots holding values in `[0, 254]`.
    Byte,
    /// Biased 1-byte slots, `value = (slot + bias) * scale`.
    BiasedByte,
    /// Unbiased signed 2-byte slots.
    Short,
    /// Biased 2-byte slots, `value = (slot + bias) * scale`.
    BiasedShort,
    /// Unbiased signed 4-byte slots.
    Int,
    /// Unbiased signed 8-byte slots.
    Long,
    /// IEEE-754 single precision slots.
    Float,
    /// IEEE-754 double precision slots.
    Double,
}

impl EncodingKind {
    /// All kinds, narrowest first.
    pub const ALL: [Self; 8] = [
        Self::Byte,
        Self::BiasedByte,
        Self::Short,
        Self::BiasedShort,
        Self::Int,
        Self::Float,
        Self::Long,
        Self::Double,
    ];

    /// Width of one row slot in bytes.
    #[must_use]
    pub const fn slot_width(self) -> usize {
        match self {
            Self::Byte | Self::BiasedByte => 1,
            Self::Short | Self::BiasedShort => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    /// Length of the per-chunk header preceding the slots.
    #[must_use]
    pub const fn header_len(self) -> usize {
        if self.is_biased() {
            BIASED_HEADER_LEN
        } else {
            0
        }
    }

    /// True for the layouts carrying a bias/scale header.
    #[must_use]
    pub const fn is_biased(self) -> bool {
        matches!(self, Self::BiasedByte | Self::BiasedShort)
    }

    /// True for the two IEEE-754 layouts.
    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Stable one-byte tag used when a chunk is stored.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Byte => 1,
            Self::BiasedByte => 2,
            Self::Short => 3,
            Self::BiasedShort => 4,
            Self::Int => 5,
            Self::Long => 6,
            Self::Float => 7,
            Self::Double => 8,
        }
    }

    /// Inverse of [`EncodingKind::tag`].
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Byte),
            2 => Some(Self::BiasedByte),
            3 => Some(Self::Short),
            4 => Some(Self::BiasedShort),
            5 => Some(Self::Int),
            6 => Some(Self::Long),
            7 => Some(Self::Float),
            8 => Some(Self::Double),
            _ => None,
        }
    }

    /// Encoded size in bytes for `rows` entries.
    #[must_use]
    pub const fn encoded_len(self, rows: usize) -> usize {
        self.header_len() + rows * self.slot_width()
    }
}

impl std::fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Byte => "byte",
            Self::BiasedByte => "biased_byte",
            Self::Short => "short",
            Self::BiasedShort => "biased_short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}

impl ByteOrder {
    pub(crate) fn put_u16<B: BufMut>(self, buf: &mut B, v: u16) {
        match self {
            Self::Little => buf.put_u16_le(v),
            Self::Big => buf.put_u16(v),
        }
    }

    pub(crate) fn put_i16<B: BufMut>(self, buf: &mut B, v: i16) {
        match self {
            Self::Little => buf.put_i16_le(v),
            Self::Big => buf.put_i16(v),
        }
    }

    pub(crate) fn put_i32<B: BufMut>(self, buf: &mut B, v: i32) {
        match self {
            Self::Little => buf.put_i32_le(v),
            Self::Big => buf.put_i32(v),
        }
    }

    pub(crate) fn put_i64<B: BufMut>(self, buf: &mut B, v: i64) {
        match self {
            Self::Little => buf.put_i64_le(v),
            Self::Big => buf.put_i64(v),
        }
    }

    pub(crate) fn put_f32<B: BufMut>(self, buf: &mut B, v: f32) {
        match self {
            Self::Little => buf.put_f32_le(v),
            Self::Big => buf.put_f32(v),
        }
    }

    pub(crate) fn put_f64<B: BufMut>(self, buf: &mut B, v: f64) {
        match self {
            Self::Little => buf.put_f64_le(v),
            Self::Big => buf.put_f64(v),
        }
    }

    pub(crate) fn get_u16(self, mut src: &[u8]) -> u16 {
        match self {
            Self::Little => src.get_u16_le(),
            Self::Big => src.get_u16(),
        }
    }

    pub(crate) fn get_i16(self, mut src: &[u8]) -> i16 {
        match self {
            Self::Little => src.get_i16_le(),
            Self::Big => src.get_i16(),
        }
    }

    pub(crate) fn get_i32(self, mut src: &[u8]) -> i32 {
        match self {
            Self::Little => src.get_i32_le(),
            Self::Big => src.get_i32(),
        }
    }

    pub(crate) fn get_i64(self, mut src: &[u8]) -> i64 {
        match self {
            Self::Little => src.get_i64_le(),
            Self::Big => src.get_i64(),
        }
    }

    pub(crate) fn get_f32(self, mut src: &[u8]) -> f32 {
        match self {
            Self::Little => src.get_f32_le(),
            Self::Big => src.get_f32(),
        }
    }

    pub(crate) fn get_f64(self, mut src: &[u8]) -> f64 {
        match self {
            Self::Little => src.get_f64_le(),
            Self::Big => src.get_f64(),
        }
    }
}
