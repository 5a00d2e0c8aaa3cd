use std::str::FromStr;

use serde_json::json;
use tessera_core::{BigDecimal, BigInt};

use super::*;
use crate::node::json_nesting;

#[test]
fn json_scalars() {
    assert_eq!(Node::from_json(&json!(null)), Node::Null);
    assert_eq!(Node::from_json(&json!(true)), Node::Bool(true));
    assert_eq!(Node::from_json(&json!(-3)), Node::Int(-3));
    assert_eq!(Node::from_json(&json!(1.25)), Node::Float(1.25));
    assert_eq!(Node::from_json(&json!("x")), Node::text("x"));
    assert_eq!(
        Node::from_json(&json!(u64::MAX)),
        Node::BigInt(BigInt::from(u64::MAX))
    );
}

#[test]
fn object_order_is_preserved() {
    let node: Node = r#"{"z":1,"a":[true,null],"m":{"k":"v"}}"#.parse().unwrap();
    let Node::Object(members) = &node else {
        panic!("expected an object");
    };
    assert_eq!(members.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    assert_eq!(node.get("m").and_then(|m| m.get("k")), Some(&Node::text("v")));
    assert_eq!(node.get("missing"), None);
    insta::assert_snapshot!(node.to_json_string(), @r#"{"z":1,"a":[true,null],"m":{"k":"v"}}"#);
}

#[test]
fn rich_nodes_render_as_json_text() {
    let node = Node::object([
        ("bytes", Node::Binary(vec![0xde, 0xad, 0xbe, 0xef])),
        ("small", Node::BigInt(BigInt::from(42))),
        (
            "huge",
            Node::BigInt(BigInt::from_str("100000000000000000000").unwrap()),
        ),
        ("dec", Node::Decimal(BigDecimal::from_str("3.14").unwrap())),
        ("nan", Node::Float(f64::NAN)),
        ("inf", Node::Float(f64::NEG_INFINITY)),
    ]);
    insta::assert_snapshot!(
        node.to_json_string(),
        @r#"{"bytes":"3q2+7w==","small":42,"huge":"100000000000000000000","dec":"3.14","nan":"NaN","inf":"-inf"}"#
    );
}

#[test]
fn kind_names() {
    assert_eq!(Node::Null.kind_name(), "null");
    assert_eq!(Node::Binary(vec![]).kind_name(), "binary");
    assert_eq!(Node::Decimal(BigDecimal::from(1)).kind_name(), "decimal");
    assert!(Node::Null.is_null());
    assert!(!Node::Int(0).is_null());
}

#[test]
fn malformed_text() {
    assert!(Node::from_json_str("[1,").is_err());
    assert!("nope".parse::<Node>().is_err());
}

#[test]
fn nesting_ignores_brackets_in_text() {
    assert_eq!(json_nesting("1"), 0);
    assert_eq!(json_nesting(r#"[{"a":[1]},[]]"#), 3);
    assert_eq!(json_nesting(r#"["[[[", "\"{{"]"#), 1);
}

#[test]
fn nesting_beyond_serde_default() {
    let deep = format!("{}{}", "[".repeat(300), "]".repeat(300));
    let node = Node::from_json_str(&deep).unwrap();
    let mut depth = 0;
    let mut cursor = &node;
    while let Node::Array(items) = cursor {
        depth += 1;
        match items.first() {
            Some(inner) => cursor = inner,
            None => break,
        }
    }
    assert_eq!(depth, 300);

    assert!(Node::from_json_str_nested(&deep, 299).is_err());
    assert!(Node::from_json_str_nested(&deep, 300).is_ok());
}
