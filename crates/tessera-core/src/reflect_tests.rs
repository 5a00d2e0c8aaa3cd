use indoc::indoc;

use super::reflect::*;
use super::*;

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

fn round_trip(arena: &mut SchemaArena, meta: SchemaId, id: SchemaId) -> SchemaId {
    let description = describe(arena, meta, id).unwrap();
    let mut target = SchemaArena::new();
    let rebuilt = rebuild(&mut target, &description).unwrap();
    assert!(graph::equal(arena, id, &target, rebuilt));
    rebuild(arena, &description).unwrap()
}

#[test]
fn schema_schema_fields() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let record = arena.get(meta).as_record().unwrap();
    assert_eq!(record.name(), SCHEMA_RECORD_NAME);

    let names: Vec<&str> = record.fields().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        names.join("\n"),
        indoc! {"
            type
            name
            enum_symbols
            tag_schema
            size
            key_schema
            value_schema
            branch_schemas
            field_schemas
            element_schema"}
    );

    let fields = record.fields().unwrap();
    let map = arena.get(fields["field_schemas"]).element().unwrap();
    let map = arena.get(map).as_map().unwrap();
    assert_eq!(map.key(), SchemaId::STRING);
    assert_eq!(map.value(), meta);
    let kind = arena.get(fields["type"]).as_enum().unwrap();
    assert_eq!(kind.name(), KIND_ENUM_NAME);
    assert_eq!(kind.symbols().len(), 24);
    assert!(kind.contains("FIXED_SIZE_ARRAY"));
}

#[test]
fn describe_primitive() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let d = describe(&arena, meta, SchemaId::SIGNED_16).unwrap();
    assert_eq!(d.schema(), meta);
    assert_eq!(d.get("type").unwrap().as_enum(), Ok("SIGNED_16"));
    for (name, value) in d.fields().iter().skip(1) {
        assert_eq!(value, &Value::none(), "{name}");
    }
}

#[test]
fn describe_recursive_record_emits_reference() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let list = linked_list(&mut arena);

    let d = describe(&arena, meta, list).unwrap();
    assert_eq!(d.get("type").unwrap().as_enum(), Ok("RECORD"));
    let fields = d.get("field_schemas").unwrap().as_optional().unwrap().unwrap();
    let tail = fields.as_map().unwrap().get(&Value::from("tail")).unwrap();
    let tail = tail.as_record().unwrap();
    assert_eq!(tail.get("type").unwrap().as_enum(), Ok("OPTIONAL"));

    let element = tail.get("element_schema").unwrap().as_optional().unwrap().unwrap();
    let element = element.as_record().unwrap();
    assert_eq!(element.get("type").unwrap().as_enum(), Ok("RECORD"));
    assert_eq!(element.get("name").unwrap(), &Value::some("LinkedList"));
    assert_eq!(element.get("field_schemas").unwrap(), &Value::none());
}

#[test]
fn rebuild_recursive_records() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();

    let list = linked_list(&mut arena);
    let rebuilt = round_trip(&mut arena, meta, list);
    assert_ne!(rebuilt, list);
    let element = arena.get(rebuilt).as_record().unwrap().fields().unwrap()["tail"];
    assert_eq!(arena.get(element).element(), Ok(rebuilt));

    let mut one = SchemaBuilder::record("One");
    let mut two = SchemaBuilder::record("Two");
    let one_id = one.placeholder(&mut arena).unwrap();
    let two_id = two.placeholder(&mut arena).unwrap();
    let to_two = arena.array(two_id);
    let to_one = arena.set(one_id);
    one.set_field_schema("next", to_two).unwrap();
    two.set_field_schema("next", to_one).unwrap();
    one.build(&mut arena).unwrap();
    two.build(&mut arena).unwrap();
    round_trip(&mut arena, meta, one_id);
}

#[test]
fn rebuild_every_parameterized_kind() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();

    let suit = arena.enumeration("Suit", ["HEARTS", "SPADES"]).unwrap();
    let ext = arena.extension(SchemaId::STRING);
    let fixed = arena.fixed_size_array(SchemaId::FLOAT_32, 3).unwrap();
    let map = arena.map(suit, ext);
    let union = arena.union([fixed, map, SchemaId::SIGNED_BIG]).unwrap();
    let record = arena
        .record("Everything", [("choice", union), ("flag", SchemaId::BOOLEAN)])
        .unwrap();

    let rebuilt = round_trip(&mut arena, meta, record);
    insta::assert_snapshot!(
        arena.display(rebuilt),
        @"record Everything { choice: union<fixed_size_array<float_32, 3>, map<enum Suit { HEARTS, SPADES }, extension<string>>, signed_big>, flag: boolean }"
    );
}

#[test]
fn schema_schema_describes_itself() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    round_trip(&mut arena, meta, meta);
}

#[test]
fn unknown_kind_is_rejected() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let mut fields = describe(&arena, meta, SchemaId::STRING)
        .unwrap()
        .into_fields();
    fields.insert("type".to_owned(), Value::enum_symbol("TUPLE"));
    let d = GenericRecord::new(meta, fields);

    let err = rebuild(&mut arena, &d).unwrap_err();
    insta::assert_snapshot!(err, @"unknown schema kind `TUPLE`");
}

#[test]
fn dangling_reference_is_rejected() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let mut fields = describe(&arena, meta, SchemaId::STRING)
        .unwrap()
        .into_fields();
    fields.insert("type".to_owned(), Value::enum_symbol("RECORD"));
    fields.insert("name".to_owned(), Value::some("Ghost"));
    let d = GenericRecord::new(meta, fields);

    let err = rebuild(&mut arena, &d).unwrap_err();
    insta::assert_snapshot!(err, @"no enclosing record named `Ghost`");
}

#[test]
fn missing_required_attribute_is_rejected() {
    let mut arena = SchemaArena::new();
    let meta = schema_schema(&mut arena).unwrap();
    let array = arena.array(SchemaId::STRING);
    let mut fields = describe(&arena, meta, array).unwrap().into_fields();
    fields.insert("element_schema".to_owned(), Value::none());
    let d = GenericRecord::new(meta, fields);

    let err = rebuild(&mut arena, &d).unwrap_err();
    insta::assert_snapshot!(err, @"array schema requires element schema");
}

/// `X { inner: optional<X' { back: optional<X>, n: string }>, m: boolean }`
/// where `X'` is a distinct record that is also named `X`.
fn shadowing_records(arena: &mut SchemaArena) -> (SchemaId, SchemaId) {
    let mut outer = SchemaBuilder::record("X");
    let outer_id = outer.placeholder(arena).unwrap();
    let back = arena.optional(outer_id);
    let inner = arena
        .record("X", [("back", back), ("n", SchemaId::STRING)])
        .unwrap();
    let inner_opt = arena.optional(inner);
    outer
        .set_field_schema("inner", inner_opt)
        .unwrap()
        .set_field_schema("m", SchemaId::BOOLEAN)
        .unwrap();
    outer.build(arena).unwrap();
    (outer_id, inner)
}

#[test]
fn shadowed_reference_is_rejected() {
    let mut arena = SchemaArena::new();
    let (outer, inner) = shadowing_records(&mut arena);
    let meta = schema_schema(&mut arena).unwrap();

    let err = describe(&arena, meta, outer).unwrap_err();
    insta::assert_snapshot!(
        err,
        @"reference to record `X` is shadowed by a nested record of the same name"
    );
    assert!(describe(&arena, meta, inner).is_err());
}

#[test]
fn same_name_without_back_reference_round_trips() {
    let mut arena = SchemaArena::new();
    let inner = arena.record("X", [("n", SchemaId::STRING)]).unwrap();
    let inner_opt = arena.optional(inner);
    let mut outer = SchemaBuilder::record("X");
    let outer_id = outer.placeholder(&mut arena).unwrap();
    let tail = arena.optional(outer_id);
    outer
        .set_field_schema("inner", inner_opt)
        .unwrap()
        .set_field_schema("tail", tail)
        .unwrap();
    outer.build(&mut arena).unwrap();
    let meta = schema_schema(&mut arena).unwrap();

    round_trip(&mut arena, meta, outer_id);
}
