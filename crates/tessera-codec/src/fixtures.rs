//! Schemas shared by the codec tests.

use tessera_core::{GenericRecord, SchemaArena, SchemaBuilder, SchemaId, Value};

/// `record LinkedList { head: string, tail: optional<LinkedList> }`
pub(crate) fn linked_list(arena: &mut SchemaArena) -> SchemaId {
    let mut builder = SchemaBuilder::record("LinkedList");
    let this = builder.placeholder(arena).unwrap();
    let tail = arena.optional(this);
    builder
        .set_field_schema("head", SchemaId::STRING)
        .unwrap()
        .set_field_schema("tail", tail)
        .unwrap();
    builder.build(arena).unwrap()
}

/// `LinkedList` value of `len` records, heads counting up from `0`.
pub(crate) fn list_of(schema: SchemaId, len: usize) -> Value {
    assert!(len > 0, "a list value holds at least one record");
    let mut tail = Value::none();
    for i in (1..len).rev() {
        let record = GenericRecord::new(
            schema,
            [("head", Value::from(i.to_string())), ("tail", tail)],
        );
        tail = Value::some(record);
    }
    GenericRecord::new(schema, [("head", Value::from("0")), ("tail", tail)]).into()
}

/// JSON text of [`list_of`].
pub(crate) fn list_json(len: usize) -> String {
    let mut json = String::from("null");
    for i in (0..len).rev() {
        json = format!(r#"{{"head":"{i}","tail":{json}}}"#);
    }
    json
}

/// `One { head: string, tail: optional<Two> }` and
/// `Two { head: signed_32, tail: optional<One> }`.
pub(crate) fn one_two(arena: &mut SchemaArena) -> (SchemaId, SchemaId) {
    let mut one = SchemaBuilder::record("One");
    let mut two = SchemaBuilder::record("Two");
    let one_id = one.placeholder(arena).unwrap();
    let two_id = two.placeholder(arena).unwrap();
    let to_two = arena.optional(two_id);
    let to_one = arena.optional(one_id);
    one.set_field_schema("head", SchemaId::STRING)
        .unwrap()
        .set_field_schema("tail", to_two)
        .unwrap();
    two.set_field_schema("head", SchemaId::SIGNED_32)
        .unwrap()
        .set_field_schema("tail", to_one)
        .unwrap();
    one.build(arena).unwrap();
    two.build(arena).unwrap();
    (one_id, two_id)
}

/// A record with two recursive fields.
pub(crate) fn recursive_twice(arena: &mut SchemaArena) -> SchemaId {
    let mut builder = SchemaBuilder::record("RecursiveTwice");
    let this = builder.placeholder(arena).unwrap();
    let tail = arena.optional(this);
    builder
        .set_field_schema("head", SchemaId::SIGNED_64)
        .unwrap()
        .set_field_schema("tail_one", tail)
        .unwrap()
        .set_field_schema("tail_two", tail)
        .unwrap();
    builder.build(arena).unwrap()
}

/// `outer { a: string, b: boolean, c: inner { c1: signed_16, c2: float_32 } }`,
/// returned as `(outer, inner)`.
pub(crate) fn outer(arena: &mut SchemaArena) -> (SchemaId, SchemaId) {
    let inner = arena
        .record("inner", [("c1", SchemaId::SIGNED_16), ("c2", SchemaId::FLOAT_32)])
        .unwrap();
    let outer = arena
        .record(
            "outer",
            [("a", SchemaId::STRING), ("b", SchemaId::BOOLEAN), ("c", inner)],
        )
        .unwrap();
    (outer, inner)
}
