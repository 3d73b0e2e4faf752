//! Shared proptest strategies for unit tests.

use crate::value::{Value, ValueEnum, ValueTag};
use chrono::{DateTime, TimeDelta};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

pub(crate) fn arb_value_for_tag(tag: ValueTag) -> BoxedStrategy<Value> {
    match tag {
        ValueTag::Null => Just(Value::Null).boxed(),
        ValueTag::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        ValueTag::Int8 => any::<i8>().prop_map(Value::Int8).boxed(),
        ValueTag::Int16 => any::<i16>().prop_map(Value::Int16).boxed(),
        ValueTag::Int32 => any::<i32>().prop_map(Value::Int32).boxed(),
        ValueTag::Int64 => any::<i64>().prop_map(Value::Int64).boxed(),
        ValueTag::Uint8 => any::<u8>().prop_map(Value::Uint8).boxed(),
        ValueTag::Uint16 => any::<u16>().prop_map(Value::Uint16).boxed(),
        ValueTag::Uint32 => any::<u32>().prop_map(Value::Uint32).boxed(),
        ValueTag::Uint64 => any::<u64>().prop_map(Value::Uint64).boxed(),
        ValueTag::Float32 => any::<f32>().prop_map(Value::Float32).boxed(),
        ValueTag::Float64 => any::<f64>().prop_map(Value::Float64).boxed(),
        ValueTag::Decimal => (any::<i64>(), 0u32..=28)
            .prop_map(|(mantissa, scale)| Value::Decimal(Decimal::new(mantissa, scale)))
            .boxed(),
        ValueTag::Text => ".{0,24}".prop_map(Value::Text).boxed(),
        ValueTag::Char => any::<char>().prop_map(Value::Char).boxed(),
        ValueTag::Enum => ("[A-Za-z:]{1,16}", any::<i64>())
            .prop_map(|(path, discriminant)| Value::Enum(ValueEnum::new(path, discriminant)))
            .boxed(),
        ValueTag::Uuid => any::<u128>()
            .prop_map(|raw| Value::Uuid(Uuid::from_u128(raw)))
            .boxed(),
        ValueTag::Timestamp => (-62_135_596_800i64..253_402_300_799, 0u32..1_000_000_000)
            .prop_filter_map("timestamp in range", |(secs, nanos)| {
                DateTime::from_timestamp(secs, nanos).map(Value::Timestamp)
            })
            .boxed(),
        ValueTag::Duration => (-1_000_000_000_000i64..1_000_000_000_000)
            .prop_map(|micros| Value::Duration(TimeDelta::microseconds(micros)))
            .boxed(),
    }
}

pub(crate) fn arb_tag() -> impl Strategy<Value = ValueTag> {
    prop::sample::select(ValueTag::ALL.to_vec())
}

pub(crate) fn arb_value() -> impl Strategy<Value = Value> {
    arb_tag().prop_flat_map(arb_value_for_tag)
}

/// A non-empty column schema with matching boundary values.
pub(crate) fn arb_tagged_row(max_columns: usize) -> impl Strategy<Value = Vec<(ValueTag, Value)>> {
    prop::collection::vec(arb_tag(), 1..=max_columns).prop_flat_map(|tags| {
        tags.into_iter()
            .map(|tag| arb_value_for_tag(tag).prop_map(move |value| (tag, value)))
            .collect::<Vec<_>>()
    })
}
