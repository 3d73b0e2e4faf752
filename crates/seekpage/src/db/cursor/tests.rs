use crate::{
    HASH_DIGEST_LEN,
    config::TokenOptions,
    db::cursor::{
        ColumnSchema, ContinuationToken, MIN_HASHED_LEN, TokenCodec, TokenError, TokenErrorKind,
        TokenSchema,
    },
    test_support::arb_tagged_row,
    value::{Value, ValueTag},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

fn name_id_schema() -> TokenSchema {
    TokenSchema::new(vec![
        ColumnSchema::new("last_name", ValueTag::Text, false),
        ColumnSchema::new("id", ValueTag::Int64, false),
    ])
}

fn name_id_token(name: &str, id: i64) -> ContinuationToken {
    ContinuationToken::Boundary(vec![Value::text(name), Value::Int64(id)])
}

fn all_options() -> [TokenOptions; 4] {
    let base = TokenOptions::default();

    [
        base.with_hash(false).with_compression(false),
        base.with_hash(true).with_compression(false),
        base.with_hash(false).with_compression(true),
        base.with_hash(true).with_compression(true),
    ]
}

fn schema_for(row: &[(ValueTag, Value)]) -> TokenSchema {
    TokenSchema::new(
        row.iter()
            .enumerate()
            .map(|(index, (tag, _))| ColumnSchema::new(format!("c{index}"), *tag, false))
            .collect(),
    )
}

// ---- sentinels ---------------------------------------------------------

#[test]
fn none_token_serializes_to_empty_string() {
    for options in all_options() {
        let codec = TokenCodec::new(name_id_schema(), options);
        let text = codec
            .serialize(&ContinuationToken::None)
            .expect("none token should serialize");

        assert_eq!(text, "");
        assert_eq!(codec.deserialize(""), Ok(ContinuationToken::None));
        assert_eq!(codec.try_deserialize(""), Some(ContinuationToken::None));
    }
}

#[test]
fn whitespace_is_not_an_empty_token() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let err = codec
        .deserialize("   ")
        .expect_err("whitespace token should be rejected");

    assert_eq!(err.kind(), TokenErrorKind::Malformed);
}

// ---- round trip --------------------------------------------------------

#[test]
fn scenario_boundary_round_trips_under_every_option_set() {
    let token = name_id_token("A", 2);
    for options in all_options() {
        let codec = TokenCodec::new(name_id_schema(), options);
        let text = codec.serialize(&token).expect("token should serialize");

        assert!(!text.is_empty());
        assert_eq!(codec.deserialize(&text), Ok(token.clone()));
    }
}

#[test]
fn hashed_layout_is_digest_then_payload() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let bare = TokenCodec::new(name_id_schema(), TokenOptions::default().with_hash(false));
    let token = name_id_token("A", 2);

    let hashed = STANDARD
        .decode(codec.serialize(&token).expect("hashed token should serialize"))
        .expect("hashed token should be base64");
    let payload = STANDARD
        .decode(bare.serialize(&token).expect("bare token should serialize"))
        .expect("bare token should be base64");

    assert_eq!(&hashed[HASH_DIGEST_LEN..], payload.as_slice());
    assert_eq!(&hashed[..HASH_DIGEST_LEN], md5::compute(&payload).0.as_slice());
    assert_eq!(payload[0], ValueTag::Text.to_u8());
}

proptest! {
    #[test]
    fn any_schema_round_trips(row in arb_tagged_row(5), hash in any::<bool>(), compress in any::<bool>()) {
        let options = TokenOptions::default().with_hash(hash).with_compression(compress);
        let codec = TokenCodec::new(schema_for(&row), options);
        let token = ContinuationToken::Boundary(row.into_iter().map(|(_, value)| value).collect());

        let text = codec.serialize(&token).expect("token should serialize");
        prop_assert_eq!(codec.deserialize(&text), Ok(token));
    }

    #[test]
    fn flipping_any_byte_of_a_hashed_token_is_detected(
        row in arb_tagged_row(4),
        compress in any::<bool>(),
        flip in 1u8..=255,
    ) {
        let options = TokenOptions::default().with_compression(compress);
        let codec = TokenCodec::new(schema_for(&row), options);
        let token = ContinuationToken::Boundary(row.into_iter().map(|(_, value)| value).collect());
        let raw = STANDARD
            .decode(codec.serialize(&token).expect("token should serialize"))
            .expect("token should be base64");

        for index in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[index] ^= flip;
            let text = STANDARD.encode(&tampered);

            prop_assert_eq!(codec.try_deserialize(&text), None);
            prop_assert_eq!(codec.deserialize(&text), Err(TokenError::HashMismatch));
        }
    }
}

#[test]
fn replacing_any_character_of_a_hashed_token_fails() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let text = codec
        .serialize(&name_id_token("Ames", 42))
        .expect("token should serialize");

    for (index, original) in text.char_indices() {
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut tampered = text.clone();
        tampered.replace_range(index..=index, &replacement.to_string());

        assert_eq!(codec.try_deserialize(&tampered), None, "index {index}");
    }
}

// ---- rejection ---------------------------------------------------------

#[test]
fn non_base64_text_is_malformed() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());

    assert_eq!(codec.try_deserialize("not-base64!!"), None);
    let err = codec
        .deserialize("not-base64!!")
        .expect_err("non-base64 token should be rejected");
    assert_eq!(err.kind(), TokenErrorKind::Malformed);
}

#[test]
fn short_hashed_token_has_insufficient_length() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let text = STANDARD.encode([0u8; HASH_DIGEST_LEN]);

    assert_eq!(
        codec.deserialize(&text),
        Err(TokenError::InsufficientLength {
            len: HASH_DIGEST_LEN,
            min: MIN_HASHED_LEN,
        })
    );
}

#[test]
fn oversized_text_is_rejected_before_decoding() {
    let options = TokenOptions {
        max_token_len: 16,
        ..TokenOptions::default()
    };
    let codec = TokenCodec::new(name_id_schema(), options);
    let err = codec
        .deserialize(&"A".repeat(20))
        .expect_err("oversized token should be rejected");

    assert!(matches!(err, TokenError::Malformed { reason } if reason.contains("max length")));
}

#[test]
fn wide_key_serializes_and_round_trips_under_a_covering_limit() {
    let token = name_id_token(&"x".repeat(7_000), 1);
    let options = TokenOptions {
        max_token_len: 16 * 1024,
        ..TokenOptions::default()
    };
    let codec = TokenCodec::new(name_id_schema(), options);

    let text = codec.serialize(&token).expect("wide key should serialize");
    assert!(text.len() > TokenOptions::default().max_token_len);
    assert_eq!(codec.deserialize(&text), Ok(token));
}

#[test]
fn serialize_ignores_the_decode_side_text_limit() {
    let options = TokenOptions {
        max_token_len: 16,
        ..TokenOptions::default()
    };
    let codec = TokenCodec::new(name_id_schema(), options);
    let text = codec
        .serialize(&name_id_token("Ames", 1))
        .expect("well-formed token should always serialize");

    assert!(text.len() > 16);
    assert_eq!(
        codec.deserialize(&text).map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );
}

#[test]
fn truncated_and_trailing_payloads_are_malformed() {
    let bare = TokenCodec::new(name_id_schema(), TokenOptions::default().with_hash(false));
    let raw = STANDARD
        .decode(bare.serialize(&name_id_token("Ames", 7)).expect("serialize"))
        .expect("base64");

    let truncated = STANDARD.encode(&raw[..raw.len() - 1]);
    assert_eq!(
        bare.deserialize(&truncated).map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );

    let mut trailing = raw;
    trailing.push(0xee);
    assert_eq!(
        bare.deserialize(&STANDARD.encode(&trailing))
            .map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );
}

#[test]
fn bytes_after_the_deflate_stream_are_malformed() {
    let compressed = TokenCodec::new(
        name_id_schema(),
        TokenOptions::default()
            .with_hash(false)
            .with_compression(true),
    );
    let mut raw = STANDARD
        .decode(
            compressed
                .serialize(&name_id_token("Ames", 7))
                .expect("serialize"),
        )
        .expect("base64");
    raw.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    assert_eq!(
        compressed
            .deserialize(&STANDARD.encode(&raw))
            .map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );

    // Re-seal the padded stream so the digest check passes.
    let hashed = TokenCodec::new(name_id_schema(), TokenOptions::default().with_compression(true));
    let mut sealed = md5::compute(&raw).0.to_vec();
    sealed.extend_from_slice(&raw);

    assert_eq!(
        hashed
            .deserialize(&STANDARD.encode(&sealed))
            .map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );
}

#[test]
fn token_wider_than_column_model_is_malformed() {
    let reader = TokenCodec::new(
        TokenSchema::new(vec![ColumnSchema::new("last_name", ValueTag::Text, false)]),
        TokenOptions::default(),
    );
    let text = TokenCodec::new(name_id_schema(), TokenOptions::default())
        .serialize(&name_id_token("Ames", 1))
        .expect("token should serialize");

    assert_eq!(
        reader.deserialize(&text).map_err(|err| err.kind()),
        Err(TokenErrorKind::Malformed)
    );
}

#[test]
fn token_from_other_column_model_is_a_schema_mismatch() {
    let one_column = TokenSchema::new(vec![ColumnSchema::new("id", ValueTag::Int64, false)]);
    let issuer = TokenCodec::new(one_column, TokenOptions::default());
    let text = issuer
        .serialize(&ContinuationToken::Boundary(vec![Value::Int64(9)]))
        .expect("token should serialize");

    let reader = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let err = reader
        .deserialize(&text)
        .expect_err("arity mismatch should be rejected");
    assert_eq!(err.kind(), TokenErrorKind::SchemaMismatch);

    let swapped = TokenSchema::new(vec![
        ColumnSchema::new("id", ValueTag::Int64, false),
        ColumnSchema::new("last_name", ValueTag::Text, false),
    ]);
    let swapped_reader = TokenCodec::new(swapped, TokenOptions::default());
    let text = reader
        .serialize(&name_id_token("Ames", 1))
        .expect("token should serialize");
    assert_eq!(
        swapped_reader.deserialize(&text).map_err(|err| err.kind()),
        Err(TokenErrorKind::SchemaMismatch)
    );
}

#[test]
fn serialize_rejects_values_that_do_not_fit_the_schema() {
    let codec = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let wrong = ContinuationToken::Boundary(vec![Value::text("A"), Value::Int32(2)]);

    assert_eq!(
        codec.serialize(&wrong).map_err(|err| err.kind()),
        Err(TokenErrorKind::SchemaMismatch)
    );
}

#[test]
fn nullable_column_accepts_null_boundary() {
    let schema = TokenSchema::new(vec![
        ColumnSchema::new("nickname", ValueTag::Text, true),
        ColumnSchema::new("id", ValueTag::Int64, false),
    ]);
    let codec = TokenCodec::new(schema, TokenOptions::default());
    let token = ContinuationToken::Boundary(vec![Value::Null, Value::Int64(3)]);
    let text = codec.serialize(&token).expect("null boundary should serialize");

    assert_eq!(codec.deserialize(&text), Ok(token));
}

#[test]
fn hashed_token_does_not_decode_under_hashless_codec() {
    let hashed = TokenCodec::new(name_id_schema(), TokenOptions::default());
    let bare = TokenCodec::new(name_id_schema(), TokenOptions::default().with_hash(false));
    let text = hashed
        .serialize(&name_id_token("Ames", 5))
        .expect("token should serialize");

    assert!(bare.deserialize(&text).is_err());
}
