//! Tests for the encoded chunk layouts.

use super::*;
use crate::error::Error;
use bytes::{BufMut, Bytes, BytesMut};

fn biased_header(order: ByteOrder, scale: f64, bias: i32) -> BytesMut {
    let mut buf = BytesMut::new();
    match order {
        ByteOrder::Little => {
            buf.put_f64_le(scale);
            buf.put_i32_le(bias);
        }
        ByteOrder::Big => {
            buf.put_f64(scale);
            buf.put_i32(bias);
        }
    }
    buf
}

// ========== Kind metadata ==========

#[test]
fn test_kind_tags_round_trip() {
    for kind in EncodingKind::ALL {
        assert_eq!(EncodingKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(EncodingKind::from_tag(0), None);
    assert_eq!(EncodingKind::from_tag(9), None);
}

#[test]
fn test_kind_widths_and_headers() {
    assert_eq!(EncodingKind::Byte.slot_width(), 1);
    assert_eq!(EncodingKind::BiasedShort.slot_width(), 2);
    assert_eq!(EncodingKind::Float.slot_width(), 4);
    assert_eq!(EncodingKind::Double.slot_width(), 8);

    assert_eq!(EncodingKind::BiasedByte.header_len(), BIASED_HEADER_LEN);
    assert_eq!(EncodingKind::Long.header_len(), 0);
    assert_eq!(EncodingKind::BiasedByte.encoded_len(10), 22);
    assert_eq!(EncodingKind::Int.encoded_len(10), 40);
}

// ========== Unbiased integer layouts ==========

#[test]
fn test_byte_decodes_unsigned_slots() {
    let chunk =
        EncodedChunk::deserialize(EncodingKind::Byte, ByteOrder::Little, Bytes::from_static(&[0, 7, 254]))
            .expect("valid");

    assert_eq!(chunk.len(), 3);
    assert_eq!(chunk.integer_value(2).unwrap(), 254);
    assert_eq!(chunk.to_f64_vec(), vec![0.0, 7.0, 254.0]);
    assert_eq!(chunk.bias(), 0);
    assert_eq!(chunk.scale(), 1.0);
}

#[test]
fn test_short_decodes_signed_slots() {
    let mut buf = BytesMut::new();
    buf.put_i16_le(-32767);
    buf.put_i16_le(32767);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::Short, ByteOrder::Little, buf.freeze()).unwrap();

    assert_eq!(chunk.integer_value(0).unwrap(), -32767);
    assert_eq!(chunk.integer_value(1).unwrap(), 32767);
}

#[test]
fn test_int_and_long_extremes() {
    let mut ints = BytesMut::new();
    ints.put_i32(i32::MAX);
    ints.put_i32(i32::MIN + 1);
    let chunk = EncodedChunk::deserialize(EncodingKind::Int, ByteOrder::Big, ints.freeze()).unwrap();
    assert_eq!(chunk.integer_value(0).unwrap(), i64::from(i32::MAX));
    assert_eq!(chunk.integer_value(1).unwrap(), i64::from(i32::MIN + 1));

    let mut longs = BytesMut::new();
    longs.put_i64_le(i64::MIN);
    longs.put_i64_le(i64::MAX);
    let chunk =
        EncodedChunk::deserialize(EncodingKind::Long, ByteOrder::Little, longs.freeze()).unwrap();
    assert_eq!(chunk.integer_value(0).unwrap(), i64::MIN);
    assert_eq!(chunk.integer_value(1).unwrap(), i64::MAX);
}

// ========== Biased layouts ==========

#[test]
fn test_biased_byte_scaled_decode() {
    let mut buf = biased_header(ByteOrder::Little, 0.01, 34);
    buf.put_u8(86); // 120 -> 1.20
    buf.put_u8(0); // 34 -> 0.34
    buf.put_u8(254); // 288 -> 2.88

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze())
            .unwrap();

    assert_eq!(chunk.kind(), EncodingKind::BiasedByte);
    assert_eq!(chunk.bias(), 34);
    assert_eq!(chunk.scale(), 0.01);
    assert_eq!(chunk.to_f64_vec(), vec![1.2, 0.34, 2.88]);
}

#[test]
fn test_biased_fractional_integer_read_fails() {
    let mut buf = biased_header(ByteOrder::Little, 0.01, 34);
    buf.put_u8(86);
    buf.put_u8(66); // 100 -> 1.00

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze())
            .unwrap();

    let err = chunk.integer_value(0).unwrap_err();
    assert!(matches!(err, Error::UnsupportedConversion { row: 0, .. }));
    assert_eq!(chunk.integer_value(1).unwrap(), 1);
}

#[test]
fn test_biased_short_unsigned_offsets_big_endian() {
    let mut buf = biased_header(ByteOrder::Big, 1.0, -40_000);
    buf.put_u16(0);
    buf.put_u16(65_534);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedShort, ByteOrder::Big, buf.freeze()).unwrap();

    assert_eq!(chunk.integer_value(0).unwrap(), -40_000);
    assert_eq!(chunk.integer_value(1).unwrap(), 25_534);
    assert_eq!(chunk.double_value(1), 25_534.0);
}

#[test]
fn test_biased_positive_exponent_is_integral() {
    let mut buf = biased_header(ByteOrder::Little, 1000.0, 5);
    buf.put_u8(2);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze())
            .unwrap();

    assert_eq!(chunk.integer_value(0).unwrap(), 7000);
    assert_eq!(chunk.double_value(0), 7000.0);
}

// ========== Floating layouts ==========

#[test]
fn test_float_integer_read() {
    let mut buf = BytesMut::new();
    buf.put_f32_le(1.5);
    buf.put_f32_le(-3.0);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::Float, ByteOrder::Little, buf.freeze()).unwrap();

    assert!(matches!(
        chunk.integer_value(0),
        Err(Error::UnsupportedConversion { row: 0, .. })
    ));
    assert_eq!(chunk.integer_value(1).unwrap(), -3);
    assert_eq!(chunk.double_value(0), 1.5);
}

#[test]
fn test_double_out_of_range_integer_read() {
    let mut buf = BytesMut::new();
    buf.put_f64_le(1e300);
    buf.put_f64_le(-0.25);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::Double, ByteOrder::Little, buf.freeze()).unwrap();

    assert!(chunk.integer_value(0).is_err());
    assert!(chunk.integer_value(1).is_err());
    assert_eq!(chunk.double_value(0), 1e300);
}

// ========== Serialization ==========

#[test]
fn test_serialize_returns_exact_bytes() {
    let mut buf = biased_header(ByteOrder::Big, 0.1, 7);
    buf.put_u16(3);
    let bytes = buf.freeze();

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedShort, ByteOrder::Big, bytes.clone()).unwrap();

    assert_eq!(chunk.serialize(), bytes);
    assert_eq!(chunk.encoded_len(), 14);
}

#[test]
fn test_byte_orders_encode_differently_decode_equally() {
    let mut le = BytesMut::new();
    le.put_i32_le(123_456);
    let mut be = BytesMut::new();
    be.put_i32(123_456);
    assert_ne!(le, be);

    let a = EncodedChunk::deserialize(EncodingKind::Int, ByteOrder::Little, le.freeze()).unwrap();
    let b = EncodedChunk::deserialize(EncodingKind::Int, ByteOrder::Big, be.freeze()).unwrap();

    assert_eq!(a.integer_value(0).unwrap(), b.integer_value(0).unwrap());
}

#[test]
fn test_deserialize_rejects_ragged_length() {
    let result =
        EncodedChunk::deserialize(EncodingKind::Short, ByteOrder::Little, Bytes::from_static(&[1, 2, 3]));

    assert!(matches!(result, Err(Error::CorruptChunk(_))));
}

#[test]
fn test_deserialize_rejects_truncated_header() {
    let result = EncodedChunk::deserialize(
        EncodingKind::BiasedByte,
        ByteOrder::Little,
        Bytes::from_static(&[0; 11]),
    );

    assert!(matches!(result, Err(Error::CorruptChunk(_))));
}

#[test]
fn test_deserialize_rejects_non_power_of_ten_scale() {
    let mut buf = biased_header(ByteOrder::Little, 3.0, 0);
    buf.put_u8(1);

    let result =
        EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze());

    assert!(matches!(result, Err(Error::CorruptChunk(_))));
}

#[test]
fn test_deserialize_accepts_every_scale_in_range() {
    for exponent in SCALE_EXPONENT_RANGE {
        let mut buf = biased_header(ByteOrder::Big, crate::entry::pow10_f64(exponent), 7);
        buf.put_u8(3);

        let chunk =
            EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Big, buf.freeze())
                .unwrap();

        assert_eq!(chunk.double_value(0), crate::entry::scale_f64(10.0, exponent));
    }
}

#[test]
fn test_deserialize_rejects_scale_outside_range() {
    for scale in [1e23, 1e-23, 0.0, f64::INFINITY] {
        let mut buf = biased_header(ByteOrder::Little, scale, 0);
        buf.put_u8(1);

        let result =
            EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze());

        assert!(matches!(result, Err(Error::CorruptChunk(_))), "scale {scale}");
    }
}

#[test]
fn test_deserialize_rejects_nan_scale() {
    let buf = biased_header(ByteOrder::Little, f64::NAN, 0);

    let result =
        EncodedChunk::deserialize(EncodingKind::BiasedByte, ByteOrder::Little, buf.freeze());

    assert!(matches!(result, Err(Error::CorruptChunk(_))));
}

#[test]
fn test_empty_biased_chunk_has_no_rows() {
    let buf = biased_header(ByteOrder::Little, 1.0, 0);

    let chunk =
        EncodedChunk::deserialize(EncodingKind::BiasedShort, ByteOrder::Little, buf.freeze())
            .unwrap();

    assert!(chunk.is_empty());
    assert_eq!(chunk.iter_f64().count(), 0);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_row_out_of_bounds_panics() {
    let chunk =
        EncodedChunk::deserialize(EncodingKind::Byte, ByteOrder::Little, Bytes::from_static(&[1]))
            .unwrap();

    let _ = chunk.double_value(1);
}
