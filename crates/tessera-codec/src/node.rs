//! Tree nodes.
//!
//! A [`Node`] is the JSON-like tree that codecs write to and read from. It is
//! richer than JSON: big numbers and byte strings have their own variants so
//! nothing is lost before a caller picks a text rendering. Conversion to and
//! from [`serde_json::Value`] is provided for that last step.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::ToPrimitive;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Number, Value as Json};

use crate::config::DEFAULT_MAX_DEPTH;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    Binary(Vec<u8>),
    Array(Vec<Node>),
    Object(IndexMap<String, Node>),
}

impl Node {
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    /// Name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Int(_) => "integer",
            Node::BigInt(_) => "big integer",
            Node::Float(_) => "float",
            Node::Decimal(_) => "decimal",
            Node::Text(_) => "text",
            Node::Binary(_) => "binary",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Member of an object node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(members) => members.get(key),
            _ => None,
        }
    }

    /// Render as a JSON value.
    ///
    /// Binary payloads become base64 text. Big integers become numbers when
    /// they fit 64 bits and decimal strings otherwise; decimals always become
    /// strings. Non-finite floats become the strings `NaN`, `inf` and `-inf`.
    pub fn to_json(&self) -> Json {
        match self {
            Node::Null => Json::Null,
            Node::Bool(b) => Json::Bool(*b),
            Node::Int(i) => Json::Number((*i).into()),
            Node::BigInt(b) => match b.to_i64() {
                Some(i) => Json::Number(i.into()),
                None => Json::String(b.to_string()),
            },
            Node::Float(f) => match Number::from_f64(*f) {
                Some(n) => Json::Number(n),
                None => Json::String(f.to_string()),
            },
            Node::Decimal(d) => Json::String(d.to_string()),
            Node::Text(s) => Json::String(s.clone()),
            Node::Binary(bytes) => Json::String(STANDARD.encode(bytes)),
            Node::Array(items) => Json::Array(items.iter().map(Node::to_json).collect()),
            Node::Object(members) => Json::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Json>>(),
            ),
        }
    }

    /// Read a JSON value. Integers that fit 64 bits become [`Node::Int`],
    /// larger ones [`Node::BigInt`]; all other numbers become [`Node::Float`].
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Node::BigInt(BigInt::from(u))
                } else {
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Node::Text(s.clone()),
            Json::Array(items) => Node::Array(items.iter().map(Node::from_json).collect()),
            Json::Object(members) => Node::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Node::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse JSON text nested at most twice the default codec depth.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        Node::from_json_str_nested(s, json_nesting_limit(DEFAULT_MAX_DEPTH))
    }

    /// Parse JSON text whose arrays and objects nest at most `max_nesting`
    /// deep.
    pub fn from_json_str_nested(s: &str, max_nesting: usize) -> Result<Self, serde_json::Error> {
        if json_nesting(s) > max_nesting {
            return Err(serde_json::Error::custom(format_args!(
                "JSON nests deeper than {max_nesting} levels"
            )));
        }
        let mut de = serde_json::Deserializer::from_str(s);
        de.disable_recursion_limit();
        let json = Json::deserialize(&mut de)?;
        de.end()?;
        Ok(Node::from_json(&json))
    }
}

/// JSON nesting a codec of depth `max_depth` can produce. Map entries take
/// two levels: the entry list and the entry object.
pub(crate) fn json_nesting_limit(max_depth: u32) -> usize {
    (max_depth as usize).saturating_mul(2)
}

/// Deepest array or object nesting in JSON text, ignoring brackets in strings.
pub(crate) fn json_nesting(text: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

impl From<Json> for Node {
    fn from(json: Json) -> Self {
        Node::from_json(&json)
    }
}

impl From<&Node> for Json {
    fn from(node: &Node) -> Self {
        node.to_json()
    }
}

impl FromStr for Node {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Node::from_json_str(s)
    }
}
