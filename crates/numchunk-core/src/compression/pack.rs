//! Materializes a [`Selection`] into packed slot bytes.

use bytes::BytesMut;

use super::selector::Selection;
use crate::encoding::{ByteOrder, EncodedChunk, EncodingKind};
use crate::entry::{pow10_f64, NumericEntry};
use crate::error::{Error, Result};

/// Packs every entry into the layout described by `selection`.
///
/// # Errors
///
/// Returns [`Error::Internal`] if an entry does not fit the selected layout,
/// which means the selection did not come from an analysis of these entries.
pub(crate) fn pack(
    selection: Selection,
    order: ByteOrder,
    mantissas: &[i64],
    exponents: &[i32],
) -> Result<EncodedChunk> {
    let kind = selection.kind;
    let mut buf = BytesMut::with_capacity(kind.encoded_len(mantissas.len()));

    if kind.is_biased() {
        order.put_f64(&mut buf, pow10_f64(selection.exponent));
        order.put_i32(&mut buf, selection.bias);
    }

    for (row, (&m, &x)) in mantissas.iter().zip(exponents).enumerate() {
        let entry = NumericEntry::new(m, x).canonical();
        match kind {
            EncodingKind::Float => order.put_f32(&mut buf, entry.to_f64() as f32),
            EncodingKind::Double => order.put_f64(&mut buf, entry.to_f64()),
            _ => {
                let offset = entry
                    .rescaled(selection.exponent)
                    .and_then(|le| le.checked_sub(i64::from(selection.bias)))
                    .ok_or_else(|| misfit(row, entry, kind))?;
                put_integer(&mut buf, kind, order, offset)
                    .ok_or_else(|| misfit(row, entry, kind))?;
            }
        }
    }

    let mem = buf.freeze();
    Ok(if kind.is_biased() {
        EncodedChunk::biased(kind, order, mem, selection.bias, selection.exponent)
    } else {
        EncodedChunk::plain(kind, order, mem)
    })
}

/// Writes one integer slot, `None` if `value` does not fit the slot.
fn put_integer(buf: &mut BytesMut, kind: EncodingKind, order: ByteOrder, value: i64) -> Option<()> {
    match kind {
        EncodingKind::Byte | EncodingKind::BiasedByte => {
            let slot = u8::try_from(value).ok().filter(|&v| v < u8::MAX)?;
            buf.extend_from_slice(&[slot]);
        }
        EncodingKind::BiasedShort => {
            let slot = u16::try_from(value).ok().filter(|&v| v < u16::MAX)?;
            order.put_u16(buf, slot);
        }
        EncodingKind::Short => order.put_i16(buf, i16::try_from(value).ok()?),
        EncodingKind::Int => order.put_i32(buf, i32::try_from(value).ok()?),
        EncodingKind::Long => order.put_i64(buf, value),
        EncodingKind::Float | EncodingKind::Double => return None,
    }
    Some(())
}

fn misfit(row: usize, entry: NumericEntry, kind: EncodingKind) -> Error {
    Error::Internal(format!(
        "row {row} ({}e{}) does not fit selected {kind} layout",
        entry.mantissa, entry.exponent
    ))
}
