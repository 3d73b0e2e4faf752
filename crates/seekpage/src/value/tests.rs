use crate::{
    test_support::arb_value,
    value::{
        ByteReader, CodecError, TaggedValueCodec, Value, ValueCodec, ValueEnum, ValueTag,
        canonical_cmp, strict_order_cmp,
    },
};
use chrono::{DateTime, TimeDelta};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    TaggedValueCodec.encode_value(value, &mut out);
    out
}

fn decode_all(bytes: &[u8]) -> Result<Value, CodecError> {
    let mut reader = ByteReader::new(bytes);
    let value = TaggedValueCodec.decode_value(&mut reader)?;
    assert!(reader.is_exhausted(), "decode must consume the whole payload");

    Ok(value)
}

// ---- tags --------------------------------------------------------------

#[test]
fn tag_bytes_are_dense_and_resolve_back() {
    for (index, tag) in ValueTag::ALL.iter().enumerate() {
        assert_eq!(usize::from(tag.to_u8()), index + 1);
        assert_eq!(ValueTag::from_u8(tag.to_u8()), Some(*tag));
    }

    assert_eq!(ValueTag::from_u8(0), None);
    assert_eq!(ValueTag::from_u8(0xff), None);
}

// ---- codec -------------------------------------------------------------

#[test]
fn null_encodes_as_bare_tag() {
    assert_eq!(encode(&Value::Null), vec![ValueTag::Null.to_u8()]);
}

#[test]
fn text_encodes_with_big_endian_length_prefix() {
    assert_eq!(
        encode(&Value::text("AB")),
        vec![ValueTag::Text.to_u8(), 0, 0, 0, 2, b'A', b'B']
    );
}

#[test]
fn decode_rejects_unknown_tag() {
    let err = decode_all(&[0x7f, 0, 0]).expect_err("unknown tag should be rejected");
    assert_eq!(
        err,
        CodecError::UnknownTag {
            tag: 0x7f,
            position: 0
        }
    );
}

#[test]
fn decode_rejects_truncated_fixed_width_payload() {
    let mut bytes = encode(&Value::Int64(42));
    bytes.pop();

    let err = decode_all(&bytes).expect_err("truncated payload should be rejected");
    assert_eq!(
        err,
        CodecError::UnexpectedEof {
            needed: 8,
            remaining: 7
        }
    );
}

#[test]
fn decode_rejects_text_length_past_end_without_allocating() {
    let bytes = [ValueTag::Text.to_u8(), 0xff, 0xff, 0xff, 0xff, b'x'];
    let err = decode_all(&bytes).expect_err("oversized text length should be rejected");
    assert!(matches!(err, CodecError::UnexpectedEof { .. }));
}

#[test]
fn decode_rejects_invalid_scalar_payloads() {
    assert_eq!(
        decode_all(&[ValueTag::Bool.to_u8(), 2]),
        Err(CodecError::InvalidBool(2))
    );
    assert_eq!(
        decode_all(&[ValueTag::Char.to_u8(), 0x00, 0x00, 0xd8, 0x00]),
        Err(CodecError::InvalidChar(0xd800))
    );
    assert_eq!(
        decode_all(&[ValueTag::Text.to_u8(), 0, 0, 0, 1, 0xff]),
        Err(CodecError::InvalidUtf8)
    );

    let mut decimal = encode(&Value::Decimal(Decimal::new(5, 1)));
    decimal[3] = 29;
    assert!(matches!(
        decode_all(&decimal),
        Err(CodecError::InvalidDecimal(_))
    ));
}

#[test]
fn decode_rejects_duration_with_conflicting_signs() {
    let mut bytes = vec![ValueTag::Duration.to_u8()];
    bytes.extend_from_slice(&5i64.to_be_bytes());
    bytes.extend_from_slice(&(-1i32).to_be_bytes());

    assert!(matches!(
        decode_all(&bytes),
        Err(CodecError::InvalidDuration { seconds: 5, nanos: -1 })
    ));
}

#[test]
fn negative_sub_second_duration_survives_round_trip() {
    let value = Value::Duration(TimeDelta::milliseconds(-1_500));
    assert_eq!(decode_all(&encode(&value)), Ok(value));
}

#[test]
fn nan_payload_round_trips_and_compares_equal() {
    let value = Value::Float64(f64::NAN);
    let decoded = decode_all(&encode(&value)).expect("NaN should decode");

    assert_eq!(decoded, value);
}

proptest! {
    #[test]
    fn every_supported_value_round_trips(value in arb_value()) {
        let bytes = encode(&value);
        prop_assert_eq!(bytes[0], value.tag().to_u8());

        let decoded = decode_all(&bytes).expect("encoded value should decode");
        prop_assert_eq!(decoded.tag(), value.tag());
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn every_strict_prefix_is_rejected(value in arb_value()) {
        let bytes = encode(&value);
        for len in 0..bytes.len() {
            prop_assert!(decode_all(&bytes[..len]).is_err());
        }
    }
}

// ---- ordering ----------------------------------------------------------

#[test]
fn null_ranks_below_every_other_variant() {
    for value in [
        Value::Bool(false),
        Value::Int8(i8::MIN),
        Value::Text(String::new()),
        Value::Duration(TimeDelta::MIN),
    ] {
        assert_eq!(canonical_cmp(&Value::Null, &value), Ordering::Less);
    }
}

#[test]
fn same_number_in_different_widths_is_not_equal() {
    assert_ne!(Value::Int32(1), Value::Int64(1));
    assert_eq!(strict_order_cmp(&Value::Int32(1), &Value::Int64(1)), None);
}

#[test]
fn text_orders_ordinally() {
    assert_eq!(
        canonical_cmp(&Value::text("B"), &Value::text("a")),
        Ordering::Less
    );
}

#[test]
fn enums_order_by_type_then_discriminant() {
    let a1 = Value::Enum(ValueEnum::new("a::Status", 1));
    let a2 = Value::Enum(ValueEnum::new("a::Status", 2));
    let b0 = Value::Enum(ValueEnum::new("b::Status", 0));

    assert!(a1 < a2);
    assert!(a2 < b0);
}

#[test]
fn timestamps_order_chronologically() {
    let early = DateTime::from_timestamp(0, 1).expect("valid timestamp");
    let late = DateTime::from_timestamp(1, 0).expect("valid timestamp");

    assert!(Value::Timestamp(early) < Value::Timestamp(late));
}

#[test]
fn option_conversion_maps_none_to_null() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some(3i32)), Value::Int32(3));
}
