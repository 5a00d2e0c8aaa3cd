use super::*;
use crate::{SchemaArena, SchemaBuilder, SchemaId};

fn linked_list(arena: &mut SchemaArena) -> SchemaId {
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

#[test]
fn hashing_terminates_on_recursive_records() {
    let mut arena = SchemaArena::new();
    let list = linked_list(&mut arena);
    let wrapped = arena.array(list);
    assert_eq!(hash(&arena, list), hash(&arena, list));
    assert_ne!(hash(&arena, list), hash(&arena, wrapped));
}

#[test]
fn equal_schemas_hash_alike() {
    let mut left = SchemaArena::new();
    let mut right = SchemaArena::new();
    let a = linked_list(&mut left);
    let b = linked_list(&mut right);
    assert_eq!(hash(&left, a), hash(&right, b));

    let tail = right.optional(b);
    let unrolled = right
        .record("LinkedList", [("tail", tail), ("head", SchemaId::STRING)])
        .unwrap();
    assert!(equal(&left, a, &right, unrolled));
    assert_eq!(hash(&left, a), right.structural_hash(unrolled));
}

#[test]
fn enum_symbol_order_does_not_affect_hash() {
    let mut arena = SchemaArena::new();
    let a = arena.enumeration("E", ["A", "B", "C"]).unwrap();
    let b = arena.enumeration("E", ["C", "A", "B"]).unwrap();
    assert_eq!(arena.structural_hash(a), arena.structural_hash(b));
}

#[test]
fn different_shapes_hash_differently() {
    let mut arena = SchemaArena::new();
    let strings = arena.map(SchemaId::STRING, SchemaId::STRING);
    let flags = arena.map(SchemaId::STRING, SchemaId::BOOLEAN);
    assert_ne!(hash(&arena, SchemaId::STRING), hash(&arena, SchemaId::BOOLEAN));
    assert_ne!(hash(&arena, strings), hash(&arena, flags));
}
