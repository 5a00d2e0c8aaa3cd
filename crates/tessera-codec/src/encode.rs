//! Value-to-tree encoding.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use tessera_core::{
    GenericExtension, GenericRecord, GenericUnion, SchemaId, Value, ValueMap, ValueSet,
};

use crate::config::BinaryEncoding;
use crate::error::{CodecError, DecodeError, DecodeErrorKind, format_path};
use crate::node::Node;
use crate::plan::{
    ENUM_NAME, ENUM_VALUE, EXTENSION_TAG, EXTENSION_VALUE, MAP_KEY, MAP_VALUE, Plan, SlotId, Step,
    UNION_BRANCH, UNION_VALUE,
};

/// Encodes values of one schema into tree nodes.
///
/// Cheap to clone; clones share the synthesized plan.
#[derive(Clone, Debug)]
pub struct Encoder {
    plan: Arc<Plan>,
    schema: SchemaId,
}

impl Encoder {
    pub(crate) fn new(plan: Arc<Plan>, schema: SchemaId) -> Self {
        Self { plan, schema }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Whether both encoders run the same synthesized plan.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.plan, &other.plan)
    }

    pub fn encode(&self, value: &Value) -> Result<Node, CodecError> {
        let plan: &Plan = &self.plan;
        Encoding {
            plan,
            path: String::new(),
            depth: 0,
        }
        .node(plan.root(), value)
    }

    /// Encode and render as compact JSON text.
    pub fn encode_json(&self, value: &Value) -> Result<String, CodecError> {
        Ok(self.encode(value)?.to_json_string())
    }
}

/// Encoding state. On error the path is left at the failing position.
struct Encoding<'p> {
    plan: &'p Plan,
    path: String,
    depth: u32,
}

impl<'p> Encoding<'p> {
    fn fail(&self, kind: DecodeErrorKind) -> CodecError {
        DecodeError::new(&self.path, kind).into()
    }

    fn mismatch(&self, step: &Step, value: &Value) -> CodecError {
        CodecError::TypeMismatch {
            path: format_path(&self.path),
            expected: step.kind(),
            found: value.kind_name(),
        }
    }

    /// Append `segment` to the path and return the length to truncate back to.
    fn push(&mut self, segment: fmt::Arguments<'_>) -> usize {
        let mark = self.path.len();
        let _ = self.path.write_fmt(segment);
        mark
    }

    fn node(&mut self, slot: SlotId, value: &Value) -> Result<Node, CodecError> {
        let plan = self.plan;
        let step = plan.step(slot);
        // Optionals wrap their element in place and add no level
        if let (Step::Optional { element }, Value::Optional(inner)) = (step, value) {
            return match inner {
                None => Ok(Node::Null),
                Some(inner) => self.node(*element, inner),
            };
        }
        let limit = plan.config().max_depth;
        if self.depth >= limit {
            return Err(CodecError::RecursionLimitExceeded { limit });
        }
        self.depth += 1;
        let result = self.step(step, value);
        self.depth -= 1;
        result
    }

    fn step(&mut self, step: &'p Step, value: &Value) -> Result<Node, CodecError> {
        match (step, value) {
            (Step::Signed16, Value::Signed16(v)) => Ok(Node::Int(i64::from(*v))),
            (Step::Signed32, Value::Signed32(v)) => Ok(Node::Int(i64::from(*v))),
            (Step::Signed64, Value::Signed64(v)) => Ok(Node::Int(*v)),
            (Step::SignedBig, Value::SignedBig(v)) => Ok(Node::BigInt(v.clone())),
            (Step::Float32, Value::Float32(v)) => Ok(Node::Float(widen(*v))),
            (Step::Float64, Value::Float64(v)) => Ok(Node::Float(*v)),
            (Step::FloatBig, Value::FloatBig(v)) => Ok(Node::Decimal(v.clone())),
            (Step::Boolean, Value::Boolean(v)) => Ok(Node::Bool(*v)),
            (Step::String, Value::String(v)) => Ok(Node::Text(v.clone())),
            (Step::Enum { name, symbols }, Value::Enum(symbol)) => {
                if !symbols.contains(symbol) {
                    return Err(self.fail(DecodeErrorKind::UnknownSymbol {
                        name: name.clone(),
                        symbol: symbol.clone(),
                    }));
                }
                Ok(Node::object([
                    (ENUM_NAME, Node::text(name.as_str())),
                    (ENUM_VALUE, Node::text(symbol.as_str())),
                ]))
            }
            (Step::Extension { tag, .. }, Value::Extension(ext)) => self.extension(*tag, ext),
            (Step::Array { element }, Value::Array(items)) => self.array(None, *element, items),
            (Step::FixedSizeArray { size, element }, Value::Array(items)) => {
                self.array(Some(*size), *element, items)
            }
            (Step::Set { element }, Value::Set(set)) => self.set(*element, set),
            (Step::Map { key, value: value_slot }, Value::Map(map)) => {
                self.map(*key, *value_slot, map)
            }
            (Step::Union { branches, .. }, Value::Union(union)) => self.union(branches, union),
            (Step::Record { fields, .. }, Value::Record(record)) => self.record(fields, record),
            (Step::Pending, _) => unreachable!("pending slot survived synthesis"),
            (step, value) => Err(self.mismatch(step, value)),
        }
    }

    #[inline(never)]
    fn extension(&mut self, tag: SlotId, ext: &GenericExtension) -> Result<Node, CodecError> {
        let mark = self.push(format_args!(".{EXTENSION_TAG}"));
        let tag = self.node(tag, ext.tag())?;
        self.path.truncate(mark);
        let payload = match self.plan.config().binary {
            BinaryEncoding::Native => Node::Binary(ext.payload().to_vec()),
            BinaryEncoding::Base64 => Node::Text(STANDARD.encode(ext.payload())),
        };
        Ok(Node::object([(EXTENSION_TAG, tag), (EXTENSION_VALUE, payload)]))
    }

    #[inline(never)]
    fn array(
        &mut self,
        size: Option<usize>,
        element: SlotId,
        items: &[Value],
    ) -> Result<Node, CodecError> {
        if let Some(size) = size
            && items.len() != size
        {
            return Err(self.fail(DecodeErrorKind::LengthMismatch {
                expected: size,
                actual: items.len(),
            }));
        }
        self.elements(element, items)
    }

    #[inline(never)]
    fn set(&mut self, element: SlotId, set: &ValueSet) -> Result<Node, CodecError> {
        let mut nodes = Vec::with_capacity(set.len());
        for (i, item) in set.iter().enumerate() {
            let mark = self.push(format_args!("[{i}]"));
            nodes.push(self.node(element, item)?);
            self.path.truncate(mark);
        }
        Ok(Node::Array(nodes))
    }

    #[inline(never)]
    fn map(&mut self, key: SlotId, value: SlotId, map: &ValueMap) -> Result<Node, CodecError> {
        let mut entries = Vec::with_capacity(map.len());
        for (i, (k, v)) in map.iter().enumerate() {
            let entry_mark = self.push(format_args!("[{i}]"));

            let mark = self.push(format_args!(".{MAP_KEY}"));
            let k = self.node(key, k)?;
            self.path.truncate(mark);

            let mark = self.push(format_args!(".{MAP_VALUE}"));
            let v = self.node(value, v)?;
            self.path.truncate(mark);

            self.path.truncate(entry_mark);
            entries.push(Node::object([(MAP_KEY, k), (MAP_VALUE, v)]));
        }
        Ok(Node::Array(entries))
    }

    #[inline(never)]
    fn union(&mut self, branches: &[SlotId], union: &GenericUnion) -> Result<Node, CodecError> {
        let index = union.branch_index();
        let Some(&branch) = branches.get(index) else {
            return Err(self.fail(DecodeErrorKind::BranchOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                branches: branches.len(),
            }));
        };
        let mark = self.push(format_args!(".{UNION_VALUE}"));
        let inner = self.node(branch, union.value())?;
        self.path.truncate(mark);
        Ok(Node::object([
            (UNION_BRANCH, Node::Int(index as i64)),
            (UNION_VALUE, inner),
        ]))
    }

    #[inline(never)]
    fn record(
        &mut self,
        fields: &[(String, SlotId)],
        record: &GenericRecord,
    ) -> Result<Node, CodecError> {
        let values = record.fields();
        let mut members = IndexMap::with_capacity(fields.len());
        for (name, field) in fields {
            let Some(field_value) = values.get(name) else {
                return Err(self.fail(DecodeErrorKind::MissingField(name.clone())));
            };
            let mark = self.push(format_args!(".{name}"));
            let node = self.node(*field, field_value)?;
            self.path.truncate(mark);
            members.insert(name.clone(), node);
        }
        if let Some(extra) = values.keys().find(|k| !members.contains_key(k.as_str())) {
            return Err(self.fail(DecodeErrorKind::UnexpectedField(extra.clone())));
        }
        Ok(Node::Object(members))
    }

    fn elements(&mut self, element: SlotId, items: &[Value]) -> Result<Node, CodecError> {
        let mut nodes = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let mark = self.push(format_args!("[{i}]"));
            nodes.push(self.node(element, item)?);
            self.path.truncate(mark);
        }
        Ok(Node::Array(nodes))
    }
}

/// Widen through the shortest decimal form so `0.1f32` stays `0.1`.
fn widen(f: f32) -> f64 {
    f.to_string().parse().unwrap_or(f64::from(f))
}
