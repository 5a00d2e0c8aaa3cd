//! Tree-to-value decoding.

use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use indexmap::{IndexMap, IndexSet};
use tessera_core::{
    BigInt, GenericExtension, GenericRecord, GenericUnion, Kind, SchemaId, Value, ValueMap,
    ValueSet,
};

use crate::error::{CodecError, DecodeError, DecodeErrorKind};
use crate::node::{Node, json_nesting, json_nesting_limit};
use crate::plan::{
    ENUM_NAME, ENUM_VALUE, EXTENSION_TAG, EXTENSION_VALUE, MAP_KEY, MAP_VALUE, Plan, SlotId, Step,
    UNION_BRANCH, UNION_VALUE,
};

/// Decodes tree nodes into values of one schema.
///
/// Cheap to clone; clones share the synthesized plan.
#[derive(Clone, Debug)]
pub struct Decoder {
    plan: Arc<Plan>,
    schema: SchemaId,
}

impl Decoder {
    pub(crate) fn new(plan: Arc<Plan>, schema: SchemaId) -> Self {
        Self { plan, schema }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Whether both decoders run the same synthesized plan.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.plan, &other.plan)
    }

    pub fn decode(&self, node: &Node) -> Result<Value, CodecError> {
        let plan: &Plan = &self.plan;
        Decoding {
            plan,
            path: String::new(),
            depth: 0,
        }
        .value(plan.root(), node)
    }

    /// Parse JSON text and decode it.
    ///
    /// Text nested deeper than this decoder could accept is rejected before
    /// parsing.
    pub fn decode_json(&self, json: &str) -> Result<Value, CodecError> {
        let limit = self.plan.config().max_depth;
        let max_nesting = json_nesting_limit(limit);
        if json_nesting(json) > max_nesting {
            return Err(CodecError::RecursionLimitExceeded { limit });
        }
        let node = Node::from_json_str_nested(json, max_nesting).map_err(|e| {
            DecodeError::new(
                "",
                DecodeErrorKind::WrongNode {
                    expected: "JSON text",
                    found: json_error_class(&e),
                },
            )
        })?;
        self.decode(&node)
    }
}

fn json_error_class(e: &serde_json::Error) -> &'static str {
    match e.classify() {
        serde_json::error::Category::Io => "unreadable input",
        serde_json::error::Category::Syntax => "malformed JSON",
        serde_json::error::Category::Data => "unrepresentable JSON",
        serde_json::error::Category::Eof => "truncated JSON",
    }
}

/// Decoding state. On error the path is left at the failing position.
struct Decoding<'p> {
    plan: &'p Plan,
    path: String,
    depth: u32,
}

type Members = IndexMap<String, Node>;

impl<'p> Decoding<'p> {
    fn fail(&self, kind: DecodeErrorKind) -> CodecError {
        DecodeError::new(&self.path, kind).into()
    }

    fn wrong(&self, expected: &'static str, found: &Node) -> CodecError {
        self.fail(DecodeErrorKind::WrongNode {
            expected,
            found: found.kind_name(),
        })
    }

    /// Append `segment` to the path and return the length to truncate back to.
    fn push(&mut self, segment: fmt::Arguments<'_>) -> usize {
        let mark = self.path.len();
        let _ = self.path.write_fmt(segment);
        mark
    }

    fn value(&mut self, slot: SlotId, node: &Node) -> Result<Value, CodecError> {
        let plan = self.plan;
        let step = plan.step(slot);
        // Optionals wrap their element in place and add no level
        if let Step::Optional { element } = step {
            return match node {
                Node::Null => Ok(Value::none()),
                _ => Ok(Value::Optional(Some(Box::new(self.value(*element, node)?)))),
            };
        }
        let limit = plan.config().max_depth;
        if self.depth >= limit {
            return Err(CodecError::RecursionLimitExceeded { limit });
        }
        self.depth += 1;
        let result = self.step(step, node);
        self.depth -= 1;
        result
    }

    fn step(&mut self, step: &'p Step, node: &Node) -> Result<Value, CodecError> {
        match step {
            Step::Signed16 => Ok(Value::Signed16(self.narrow(node, Kind::Signed16)?)),
            Step::Signed32 => Ok(Value::Signed32(self.narrow(node, Kind::Signed32)?)),
            Step::Signed64 => Ok(Value::Signed64(self.integer(node, Kind::Signed64)?)),
            Step::SignedBig => self.signed_big(node).map(Value::SignedBig),
            Step::Float32 => self.float(node).map(|f| Value::Float32(f as f32)),
            Step::Float64 => self.float(node).map(Value::Float64),
            Step::FloatBig => self.float_big(node).map(Value::FloatBig),
            Step::Boolean => match node {
                Node::Bool(b) => Ok(Value::Boolean(*b)),
                other => Err(self.wrong("boolean", other)),
            },
            Step::String => match node {
                Node::Text(s) => Ok(Value::String(s.clone())),
                other => Err(self.wrong("text", other)),
            },
            Step::Enum { name, symbols } => self.enumeration(name, symbols, node),
            Step::Extension { schema, tag } => self.extension(*schema, *tag, node),
            Step::Array { element } => self.array(None, *element, node),
            Step::FixedSizeArray { size, element } => self.array(Some(*size), *element, node),
            Step::Set { element } => self.set(*element, node),
            Step::Map { key, value } => self.map(*key, *value, node),
            Step::Union { schema, branches } => self.union(*schema, branches, node),
            Step::Optional { .. } => unreachable!("optional handled before the depth check"),
            Step::Record { schema, fields } => self.record(*schema, fields, node),
            Step::Pending => unreachable!("pending slot survived synthesis"),
        }
    }

    #[inline(never)]
    fn enumeration(
        &mut self,
        name: &str,
        symbols: &IndexSet<String>,
        node: &Node,
    ) -> Result<Value, CodecError> {
        let members = self.members(node, &[ENUM_NAME, ENUM_VALUE])?;
        let found = self.text_member(members, ENUM_NAME)?;
        if found != name {
            return Err(self.fail(DecodeErrorKind::EnumNameMismatch {
                expected: name.to_owned(),
                found: found.to_owned(),
            }));
        }
        let symbol = self.text_member(members, ENUM_VALUE)?;
        if !symbols.contains(symbol) {
            return Err(self.fail(DecodeErrorKind::UnknownSymbol {
                name: name.to_owned(),
                symbol: symbol.to_owned(),
            }));
        }
        Ok(Value::Enum(symbol.to_owned()))
    }

    #[inline(never)]
    fn extension(&mut self, schema: SchemaId, tag: SlotId, node: &Node) -> Result<Value, CodecError> {
        let members = self.members(node, &[EXTENSION_TAG, EXTENSION_VALUE])?;
        let tag_node = self.member(members, EXTENSION_TAG)?;
        let payload_node = self.member(members, EXTENSION_VALUE)?;

        let mark = self.push(format_args!(".{EXTENSION_TAG}"));
        let tag = self.value(tag, tag_node)?;
        self.path.truncate(mark);

        let mark = self.push(format_args!(".{EXTENSION_VALUE}"));
        let payload = self.payload(payload_node)?;
        self.path.truncate(mark);

        Ok(Value::Extension(GenericExtension::new(schema, tag, payload)))
    }

    #[inline(never)]
    fn array(
        &mut self,
        size: Option<usize>,
        element: SlotId,
        node: &Node,
    ) -> Result<Value, CodecError> {
        let items = self.items(node)?;
        if let Some(size) = size
            && items.len() != size
        {
            return Err(self.fail(DecodeErrorKind::LengthMismatch {
                expected: size,
                actual: items.len(),
            }));
        }
        self.elements(element, items).map(Value::Array)
    }

    #[inline(never)]
    fn set(&mut self, element: SlotId, node: &Node) -> Result<Value, CodecError> {
        let items = self.items(node)?;
        let set: ValueSet = self.elements(element, items)?.into_iter().collect();
        Ok(Value::Set(set))
    }

    #[inline(never)]
    fn map(&mut self, key: SlotId, value: SlotId, node: &Node) -> Result<Value, CodecError> {
        let items = self.items(node)?;
        let mut map = ValueMap::new();
        for (i, entry) in items.iter().enumerate() {
            let entry_mark = self.push(format_args!("[{i}]"));
            let members = self.members(entry, &[MAP_KEY, MAP_VALUE])?;
            let k_node = self.member(members, MAP_KEY)?;
            let v_node = self.member(members, MAP_VALUE)?;

            let mark = self.push(format_args!(".{MAP_KEY}"));
            let k = self.value(key, k_node)?;
            self.path.truncate(mark);

            let mark = self.push(format_args!(".{MAP_VALUE}"));
            let v = self.value(value, v_node)?;
            self.path.truncate(mark);

            self.path.truncate(entry_mark);
            // Later entries win
            map.insert(k, v);
        }
        Ok(Value::Map(map))
    }

    #[inline(never)]
    fn union(
        &mut self,
        schema: SchemaId,
        branches: &[SlotId],
        node: &Node,
    ) -> Result<Value, CodecError> {
        let members = self.members(node, &[UNION_BRANCH, UNION_VALUE])?;
        let index_node = self.member(members, UNION_BRANCH)?;
        let value_node = self.member(members, UNION_VALUE)?;
        let index = match index_node {
            Node::Int(i) => *i,
            other => {
                self.push(format_args!(".{UNION_BRANCH}"));
                return Err(self.wrong("integer", other));
            }
        };
        let Some(&branch) = usize::try_from(index).ok().and_then(|i| branches.get(i)) else {
            return Err(self.fail(DecodeErrorKind::BranchOutOfRange {
                index,
                branches: branches.len(),
            }));
        };

        let mark = self.push(format_args!(".{UNION_VALUE}"));
        let value = self.value(branch, value_node)?;
        self.path.truncate(mark);

        Ok(Value::Union(GenericUnion::new(schema, index as usize, value)))
    }

    #[inline(never)]
    fn record(
        &mut self,
        schema: SchemaId,
        fields: &[(String, SlotId)],
        node: &Node,
    ) -> Result<Value, CodecError> {
        let Node::Object(members) = node else {
            return Err(self.wrong("object", node));
        };
        let mut values = IndexMap::with_capacity(fields.len());
        for (name, field) in fields {
            let field_node = self.member(members, name)?;
            let mark = self.push(format_args!(".{name}"));
            let value = self.value(*field, field_node)?;
            self.path.truncate(mark);
            values.insert(name.clone(), value);
        }
        if let Some(extra) = members.keys().find(|k| !values.contains_key(k.as_str())) {
            return Err(self.fail(DecodeErrorKind::UnexpectedField(extra.clone())));
        }
        Ok(Value::Record(GenericRecord::new(schema, values)))
    }

    fn elements(&mut self, element: SlotId, items: &[Node]) -> Result<Vec<Value>, CodecError> {
        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let mark = self.push(format_args!("[{i}]"));
            values.push(self.value(element, item)?);
            self.path.truncate(mark);
        }
        Ok(values)
    }

    fn items<'n>(&self, node: &'n Node) -> Result<&'n [Node], CodecError> {
        match node {
            Node::Array(items) => Ok(items),
            other => Err(self.wrong("array", other)),
        }
    }

    /// Members of a wrapper object that may only carry `allowed` keys.
    fn members<'n>(&self, node: &'n Node, allowed: &[&str]) -> Result<&'n Members, CodecError> {
        let Node::Object(members) = node else {
            return Err(self.wrong("object", node));
        };
        if let Some(extra) = members.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(self.fail(DecodeErrorKind::UnexpectedField(extra.clone())));
        }
        Ok(members)
    }

    fn member<'n>(&self, members: &'n Members, key: &str) -> Result<&'n Node, CodecError> {
        members
            .get(key)
            .ok_or_else(|| self.fail(DecodeErrorKind::MissingField(key.to_owned())))
    }

    fn text_member<'n>(&mut self, members: &'n Members, key: &str) -> Result<&'n str, CodecError> {
        match self.member(members, key)? {
            Node::Text(s) => Ok(s),
            other => {
                self.push(format_args!(".{key}"));
                Err(self.wrong("text", other))
            }
        }
    }

    fn integer(&self, node: &Node, kind: Kind) -> Result<i64, CodecError> {
        match node {
            Node::Int(i) => Ok(*i),
            Node::BigInt(b) => b.to_i64().ok_or_else(|| {
                self.fail(DecodeErrorKind::OutOfRange {
                    kind,
                    value: b.to_string(),
                })
            }),
            other => Err(self.wrong("integer", other)),
        }
    }

    fn narrow<T: TryFrom<i64>>(&self, node: &Node, kind: Kind) -> Result<T, CodecError> {
        let i = self.integer(node, kind)?;
        T::try_from(i).map_err(|_| {
            self.fail(DecodeErrorKind::OutOfRange {
                kind,
                value: i.to_string(),
            })
        })
    }

    fn signed_big(&self, node: &Node) -> Result<BigInt, CodecError> {
        match node {
            Node::Int(i) => Ok(BigInt::from(*i)),
            Node::BigInt(b) => Ok(b.clone()),
            Node::Text(s) => BigInt::from_str(s)
                .map_err(|_| self.fail(DecodeErrorKind::InvalidNumber(s.clone()))),
            other => Err(self.wrong("integer", other)),
        }
    }

    fn float(&self, node: &Node) -> Result<f64, CodecError> {
        let invalid = |s: String| self.fail(DecodeErrorKind::InvalidNumber(s));
        match node {
            Node::Float(f) => Ok(*f),
            Node::Int(i) => Ok(*i as f64),
            Node::BigInt(b) => b.to_f64().ok_or_else(|| invalid(b.to_string())),
            Node::Decimal(d) => d.to_f64().ok_or_else(|| invalid(d.to_string())),
            Node::Text(s) => f64::from_str(s).map_err(|_| invalid(s.clone())),
            other => Err(self.wrong("number", other)),
        }
    }

    fn float_big(&self, node: &Node) -> Result<BigDecimal, CodecError> {
        let invalid = |s: String| self.fail(DecodeErrorKind::InvalidNumber(s));
        match node {
            Node::Decimal(d) => Ok(d.clone()),
            Node::Int(i) => Ok(BigDecimal::from(*i)),
            Node::BigInt(b) => Ok(BigDecimal::new(b.clone(), 0)),
            Node::Float(f) => BigDecimal::from_f64(*f).ok_or_else(|| invalid(f.to_string())),
            Node::Text(s) => BigDecimal::from_str(s).map_err(|_| invalid(s.clone())),
            other => Err(self.wrong("number", other)),
        }
    }

    fn payload(&self, node: &Node) -> Result<Vec<u8>, CodecError> {
        match node {
            Node::Binary(bytes) => Ok(bytes.clone()),
            Node::Text(s) => STANDARD
                .decode(s)
                .map_err(|e| self.fail(DecodeErrorKind::InvalidBase64(e.to_string()))),
            other => Err(self.wrong("binary or base64 text", other)),
        }
    }
}
