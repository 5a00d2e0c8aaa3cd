use super::*;
use crate::{Primitive, SchemaArena, SchemaBuilder, SchemaId};

#[test]
fn primitives_render_as_kind_names() {
    let arena = SchemaArena::new();
    let names: Vec<String> = Primitive::ALL
        .into_iter()
        .map(|p| render(&arena, SchemaId::primitive(p)))
        .collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    unsigned_8
    unsigned_16
    unsigned_32
    unsigned_64
    unsigned_big
    signed_8
    signed_16
    signed_32
    signed_64
    signed_big
    float_32
    float_64
    float_big
    boolean
    string
    ");
}

#[test]
fn containers_render_their_parameters() {
    let mut arena = SchemaArena::new();
    let set = arena.set(SchemaId::SIGNED_16);
    let opt = arena.optional(set);
    let ext = arena.extension(SchemaId::STRING);
    let fixed = arena.fixed_size_array(ext, 8).unwrap();
    let map = arena.map(SchemaId::STRING, fixed);
    let union = arena.union([opt, map]).unwrap();
    insta::assert_snapshot!(
        arena.display(union).to_string(),
        @"union<optional<set<signed_16>>, map<string, fixed_size_array<extension<string>, 8>>>"
    );
}

#[test]
fn records_nested_and_recursive() {
    let mut arena = SchemaArena::new();
    let mut builder = SchemaBuilder::record("RecursiveTwice");
    let this = builder.placeholder(&mut arena).unwrap();
    let tail = arena.optional(this);
    builder
        .set_field_schema("head", SchemaId::SIGNED_32)
        .unwrap()
        .set_field_schema("tail_one", tail)
        .unwrap()
        .set_field_schema("tail_two", tail)
        .unwrap();
    let twice = builder.build(&mut arena).unwrap();

    let empty = arena.record("Empty", Vec::<(&str, SchemaId)>::new()).unwrap();
    let outer = arena
        .record("outer", [("twice", twice), ("empty", empty)])
        .unwrap();

    let expected = "record outer { twice: record RecursiveTwice { head: signed_32, \
        tail_one: optional<RecursiveTwice>, tail_two: optional<RecursiveTwice> }, \
        empty: record Empty {} }";
    assert_eq!(render(&arena, outer), expected);
}

#[test]
fn unfilled_placeholder_renders_without_fields() {
    let mut arena = SchemaArena::new();
    let mut builder = SchemaBuilder::record("Later");
    let id = builder.placeholder(&mut arena).unwrap();
    insta::assert_snapshot!(render(&arena, id), @"record Later { .. }");
}

#[test]
fn memo_tracks_visit_state() {
    let mut memo: Memo<SchemaId, String> = Memo::new();
    memo.enter(SchemaId::STRING);
    assert_eq!(memo.get(&SchemaId::STRING), Some(&Visit::InProgress));
    let out = memo.finish(SchemaId::STRING, "string".to_owned());
    assert_eq!(out, "string");
    assert_eq!(
        memo.get(&SchemaId::STRING),
        Some(&Visit::Done("string".to_owned()))
    );
}
