//! Fixed-width chunk encodings.
//!
//! Every chunk is stored in exactly one of eight layouts:
//!
//! | Kind | Header | Slot | Decode |
//! |------|--------|------|--------|
//! | `Byte` | none | u8 | `slot` |
//! | `BiasedByte` | scale f64 + bias i32 | u8 | `(slot + bias) * scale` |
//! | `Short` | none | i16 | `slot` |
//! | `BiasedShort` | scale f64 + bias i32 | u16 | `(slot + bias) * scale` |
//! | `Int` | none | i32 | `slot` |
//! | `Long` | none | i64 | `slot` |
//! | `Float` | none | f32 | `slot` |
//! | `Double` | none | f64 | `slot` |
//!
//! All multi-byte fields of one chunk share a single [`ByteOrder`].

mod chunk;
mod kind;

pub use chunk::{Biased, EncodedChunk, Slots};
pub use kind::{ByteOrder, EncodingKind, BIASED_HEADER_LEN, SCALE_EXPONENT_RANGE};

#[cfg(test)]
mod tests;
