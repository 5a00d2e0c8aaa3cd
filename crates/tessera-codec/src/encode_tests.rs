use tessera_core::{GenericExtension, GenericRecord, GenericUnion, SchemaArena, SchemaId, Value};

use super::*;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::fixtures::{linked_list, list_json, list_of, outer};

fn encode_err(arena: &SchemaArena, schema: SchemaId, value: &Value) -> String {
    encoder_for(arena, schema)
        .unwrap()
        .encode(value)
        .unwrap_err()
        .to_string()
}

fn inner_value(inner: SchemaId) -> Value {
    GenericRecord::new(
        inner,
        [("c1", Value::Signed16(1)), ("c2", Value::Float32(2.0))],
    )
    .into()
}

#[test]
fn kind_mismatch_carries_path() {
    let mut arena = SchemaArena::new();
    let (outer_id, inner_id) = outer(&mut arena);
    let value: Value = GenericRecord::new(
        outer_id,
        [
            ("a", Value::from("x")),
            ("b", Value::from("not a boolean")),
            ("c", inner_value(inner_id)),
        ],
    )
    .into();

    let err = encoder_for(&arena, outer_id)
        .unwrap()
        .encode(&value)
        .unwrap_err();
    assert_eq!(
        err,
        CodecError::TypeMismatch {
            path: "b".into(),
            expected: tessera_core::Kind::Boolean,
            found: "string",
        }
    );
    insta::assert_snapshot!(err, @"at `b`: expected boolean value, found string");

    insta::assert_snapshot!(
        encode_err(&arena, SchemaId::SIGNED_32, &Value::Signed64(1)),
        @"expected signed_32 value, found signed_64"
    );
}

#[test]
fn record_fields_must_match() {
    let mut arena = SchemaArena::new();
    let (outer_id, inner_id) = outer(&mut arena);

    let missing: Value = GenericRecord::new(
        outer_id,
        [("a", Value::from("x")), ("c", inner_value(inner_id))],
    )
    .into();
    insta::assert_snapshot!(encode_err(&arena, outer_id, &missing), @"missing field `b`");

    let extra: Value = GenericRecord::new(
        outer_id,
        [
            ("a", Value::from("x")),
            ("b", Value::from(true)),
            ("c", inner_value(inner_id)),
            ("d", Value::from(1i32)),
        ],
    )
    .into();
    insta::assert_snapshot!(encode_err(&arena, outer_id, &extra), @"unexpected field `d`");
}

#[test]
fn field_order_follows_schema() {
    let mut arena = SchemaArena::new();
    let (outer_id, inner_id) = outer(&mut arena);
    let value: Value = GenericRecord::new(
        outer_id,
        [
            ("c", inner_value(inner_id)),
            ("b", Value::from(false)),
            ("a", Value::from("x")),
        ],
    )
    .into();
    let json = encoder_for(&arena, outer_id)
        .unwrap()
        .encode_json(&value)
        .unwrap();
    insta::assert_snapshot!(json, @r#"{"a":"x","b":false,"c":{"c1":1,"c2":2.0}}"#);
}

#[test]
fn optional_fields_encode_null() {
    let mut arena = SchemaArena::new();
    let list = linked_list(&mut arena);
    let value: Value =
        GenericRecord::new(list, [("head", Value::from("only")), ("tail", Value::none())]).into();
    let node = encoder_for(&arena, list).unwrap().encode(&value).unwrap();
    assert_eq!(node.get("tail"), Some(&Node::Null));
    insta::assert_snapshot!(node.to_json_string(), @r#"{"head":"only","tail":null}"#);
}

#[test]
fn enum_symbol_must_exist() {
    let mut arena = SchemaArena::new();
    let suit = arena.enumeration("Suit", ["HEARTS", "SPADES"]).unwrap();
    insta::assert_snapshot!(
        encode_err(&arena, suit, &Value::enum_symbol("CLUBS")),
        @"`CLUBS` is not a symbol of enum `Suit`"
    );
    insta::assert_snapshot!(
        encode_err(&arena, suit, &Value::from("HEARTS")),
        @"expected enum value, found string"
    );
}

#[test]
fn fixed_size_length() {
    let mut arena = SchemaArena::new();
    let fixed = arena.fixed_size_array(SchemaId::STRING, 2).unwrap();
    insta::assert_snapshot!(
        encode_err(&arena, fixed, &Value::Array(vec![Value::from("a")])),
        @"expected 2 elements, found 1"
    );
}

#[test]
fn union_branch_index() {
    let mut arena = SchemaArena::new();
    let union = arena.union([SchemaId::STRING, SchemaId::BOOLEAN]).unwrap();
    let encoder = encoder_for(&arena, union).unwrap();

    let json = encoder
        .encode_json(&GenericUnion::new(union, 1, true).into())
        .unwrap();
    insta::assert_snapshot!(json, @r#"{"branch_index":1,"value":true}"#);

    let err = encoder
        .encode(&GenericUnion::new(union, 5, true).into())
        .unwrap_err();
    insta::assert_snapshot!(err, @"branch index 5 out of range for union of 2");

    let err = encoder
        .encode(&GenericUnion::new(union, 0, true).into())
        .unwrap_err();
    insta::assert_snapshot!(err, @"at `value`: expected string value, found boolean");
}

#[test]
fn element_paths() {
    let mut arena = SchemaArena::new();
    let array = arena.array(SchemaId::SIGNED_16);
    let value = Value::Array(vec![Value::Signed16(1), Value::Signed32(2)]);
    insta::assert_snapshot!(
        encode_err(&arena, array, &value),
        @"at `[1]`: expected signed_16 value, found signed_32"
    );

    let map = arena.map(SchemaId::STRING, SchemaId::BOOLEAN);
    let value = Value::Map([(Value::from("k"), Value::from("v"))].into_iter().collect());
    insta::assert_snapshot!(
        encode_err(&arena, map, &value),
        @"at `[0].v`: expected boolean value, found string"
    );
}

#[test]
fn binary_encoding() {
    let mut arena = SchemaArena::new();
    let ext = arena.extension(SchemaId::SIGNED_32);
    let value: Value = GenericExtension::new(ext, 7i32, b"hi".to_vec()).into();

    let native = encoder_for(&arena, ext).unwrap().encode(&value).unwrap();
    assert_eq!(native.get("value"), Some(&Node::Binary(b"hi".to_vec())));

    let base64 = TreeCodecFactory::new(CodecConfig::default().with_binary(BinaryEncoding::Base64));
    let node = base64.encoder_for(&arena, ext).unwrap().encode(&value).unwrap();
    assert_eq!(node.get("value"), Some(&Node::text("aGk=")));

    // Native payloads still render as base64 text in JSON
    assert_eq!(native.to_json_string(), node.to_json_string());
}

#[test]
fn depth_limit() {
    let mut arena = SchemaArena::new();
    let nested = arena.array(SchemaId::BOOLEAN);
    let nested = arena.array(nested);
    let nested = arena.array(nested);
    let factory = TreeCodecFactory::new(CodecConfig::default().with_max_depth(3));
    let encoder = factory.encoder_for(&arena, nested).unwrap();

    let shallow = Value::Array(vec![Value::Array(vec![])]);
    assert!(encoder.encode(&shallow).is_ok());

    let deep = Value::Array(vec![Value::Array(vec![Value::Array(vec![Value::from(true)])])]);
    assert_eq!(
        encoder.encode(&deep).unwrap_err(),
        CodecError::RecursionLimitExceeded { limit: 3 }
    );
}

#[test]
fn default_depth_limit_on_test_thread() {
    let mut arena = SchemaArena::new();
    let list = linked_list(&mut arena);
    let limit = DEFAULT_MAX_DEPTH as usize;

    let json = encoder_for(&arena, list)
        .unwrap()
        .encode_json(&list_of(list, limit - 1))
        .unwrap();
    assert_eq!(json, list_json(limit - 1));

    let deep = list_of(list, limit);
    assert_eq!(
        encoder_for(&arena, list).unwrap().encode(&deep).unwrap_err(),
        CodecError::RecursionLimitExceeded {
            limit: DEFAULT_MAX_DEPTH
        }
    );
    let roomy = TreeCodecFactory::new(CodecConfig::default().with_max_depth(DEFAULT_MAX_DEPTH + 1));
    assert!(roomy.encoder_for(&arena, list).unwrap().encode(&deep).is_ok());
}

#[test]
fn float_32_keeps_its_shortest_form() {
    let arena = SchemaArena::new();
    let encoder = encoder_for(&arena, SchemaId::FLOAT_32).unwrap();
    insta::assert_snapshot!(encoder.encode_json(&Value::Float32(0.1)).unwrap(), @"0.1");

    let decoded = decoder_for(&arena, SchemaId::FLOAT_32)
        .unwrap()
        .decode_json("0.1")
        .unwrap();
    assert_eq!(decoded, Value::Float32(0.1));
}
