//! Generic values.
//!
//! Schema-agnostic runtime values that codecs produce and consume. A [`Value`]
//! carries its own runtime tag; pairing it with a schema gives a
//! [`GenericValue`].
//!
//! Floats compare and hash by their bit patterns, so `NaN` equals itself and
//! `0.0` differs from `-0.0`. This keeps equality an equivalence relation,
//! which sets and map keys rely on.

use std::hash::{DefaultHasher, Hash, Hasher};

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, BigUint};
use indexmap::{IndexMap, IndexSet};

use crate::arena::{SchemaArena, SchemaId};
use crate::error::ValueError;
use crate::kind::Kind;

/// A runtime value, tagged by variant.
///
/// Fixed-size arrays use [`Value::Array`]; the schema carries the size.
#[derive(Clone, Debug)]
pub enum Value {
    Unsigned8(u8),
    Unsigned16(u16),
    Unsigned32(u32),
    Unsigned64(u64),
    UnsignedBig(BigUint),
    Signed8(i8),
    Signed16(i16),
    Signed32(i32),
    Signed64(i64),
    SignedBig(BigInt),
    Float32(f32),
    Float64(f64),
    FloatBig(BigDecimal),
    Boolean(bool),
    String(String),
    /// A symbol of an enum schema.
    Enum(String),
    Array(Vec<Value>),
    Set(ValueSet),
    Map(ValueMap),
    Optional(Option<Box<Value>>),
    Union(GenericUnion),
    Record(GenericRecord),
    Extension(GenericExtension),
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        pub fn $name(&self) -> Result<&$ty, ValueError> {
            match self {
                Value::$variant(v) => Ok(v),
                other => Err(other.mismatch($expected)),
            }
        }
    };
}

impl Value {
    pub fn none() -> Self {
        Value::Optional(None)
    }

    pub fn some(value: impl Into<Value>) -> Self {
        Value::Optional(Some(Box::new(value.into())))
    }

    pub fn enum_symbol(symbol: impl Into<String>) -> Self {
        Value::Enum(symbol.into())
    }

    /// Name of the runtime tag, matching [`Kind::name`] where one applies.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unsigned8(_) => "unsigned_8",
            Value::Unsigned16(_) => "unsigned_16",
            Value::Unsigned32(_) => "unsigned_32",
            Value::Unsigned64(_) => "unsigned_64",
            Value::UnsignedBig(_) => "unsigned_big",
            Value::Signed8(_) => "signed_8",
            Value::Signed16(_) => "signed_16",
            Value::Signed32(_) => "signed_32",
            Value::Signed64(_) => "signed_64",
            Value::SignedBig(_) => "signed_big",
            Value::Float32(_) => "float_32",
            Value::Float64(_) => "float_64",
            Value::FloatBig(_) => "float_big",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Optional(_) => "optional",
            Value::Union(_) => "union",
            Value::Record(_) => "record",
            Value::Extension(_) => "extension",
        }
    }

    /// Whether the runtime tag is the one used for values of `kind`.
    pub fn matches_kind(&self, kind: Kind) -> bool {
        match self {
            Value::Array(_) => matches!(kind, Kind::Array | Kind::FixedSizeArray),
            _ => self.kind_name() == kind.name(),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.kind_name(),
        }
    }

    accessor!(as_signed_16, Signed16, i16, "signed_16");
    accessor!(as_signed_32, Signed32, i32, "signed_32");
    accessor!(as_signed_64, Signed64, i64, "signed_64");
    accessor!(as_signed_big, SignedBig, BigInt, "signed_big");
    accessor!(as_float_32, Float32, f32, "float_32");
    accessor!(as_float_64, Float64, f64, "float_64");
    accessor!(as_float_big, FloatBig, BigDecimal, "float_big");
    accessor!(as_boolean, Boolean, bool, "boolean");
    accessor!(as_array, Array, Vec<Value>, "array");
    accessor!(as_set, Set, ValueSet, "set");
    accessor!(as_map, Map, ValueMap, "map");
    accessor!(as_union, Union, GenericUnion, "union");
    accessor!(as_record, Record, GenericRecord, "record");
    accessor!(as_extension, Extension, GenericExtension, "extension");

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_enum(&self) -> Result<&str, ValueError> {
        match self {
            Value::Enum(s) => Ok(s),
            other => Err(other.mismatch("enum")),
        }
    }

    /// Contents of an optional: `Ok(None)` when absent.
    pub fn as_optional(&self) -> Result<Option<&Value>, ValueError> {
        match self {
            Value::Optional(v) => Ok(v.as_deref()),
            other => Err(other.mismatch("optional")),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unsigned8(a), Value::Unsigned8(b)) => a == b,
            (Value::Unsigned16(a), Value::Unsigned16(b)) => a == b,
            (Value::Unsigned32(a), Value::Unsigned32(b)) => a == b,
            (Value::Unsigned64(a), Value::Unsigned64(b)) => a == b,
            (Value::UnsignedBig(a), Value::UnsignedBig(b)) => a == b,
            (Value::Signed8(a), Value::Signed8(b)) => a == b,
            (Value::Signed16(a), Value::Signed16(b)) => a == b,
            (Value::Signed32(a), Value::Signed32(b)) => a == b,
            (Value::Signed64(a), Value::Signed64(b)) => a == b,
            (Value::SignedBig(a), Value::SignedBig(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::FloatBig(a), Value::FloatBig(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Optional(a), Value::Optional(b)) => a == b,
            (Value::Union(a), Value::Union(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Extension(a), Value::Extension(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Unsigned8(v) => v.hash(state),
            Value::Unsigned16(v) => v.hash(state),
            Value::Unsigned32(v) => v.hash(state),
            Value::Unsigned64(v) => v.hash(state),
            Value::UnsignedBig(v) => v.hash(state),
            Value::Signed8(v) => v.hash(state),
            Value::Signed16(v) => v.hash(state),
            Value::Signed32(v) => v.hash(state),
            Value::Signed64(v) => v.hash(state),
            Value::SignedBig(v) => v.hash(state),
            Value::Float32(v) => v.to_bits().hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::FloatBig(v) => v.hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::String(v) | Value::Enum(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
            Value::Set(v) => v.hash(state),
            Value::Map(v) => v.hash(state),
            Value::Optional(v) => v.hash(state),
            Value::Union(v) => v.hash(state),
            Value::Record(v) => v.hash(state),
            Value::Extension(v) => v.hash(state),
        }
    }
}

/// Hash of a collection whose equality ignores order.
fn hash_unordered<T: Hash, H: Hasher>(items: impl ExactSizeIterator<Item = T>, state: &mut H) {
    items.len().hash(state);
    let sum = items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    });
    sum.hash(state);
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Signed16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Signed32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Signed64(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::SignedBig(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::FloatBig(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<GenericRecord> for Value {
    fn from(v: GenericRecord) -> Self {
        Value::Record(v)
    }
}

impl From<GenericUnion> for Value {
    fn from(v: GenericUnion) -> Self {
        Value::Union(v)
    }
}

impl From<GenericExtension> for Value {
    fn from(v: GenericExtension) -> Self {
        Value::Extension(v)
    }
}

impl From<ValueSet> for Value {
    fn from(v: ValueSet) -> Self {
        Value::Set(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Unordered collection of distinct values.
///
/// Iteration follows first insertion. Equality ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueSet {
    items: IndexSet<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless an equal value is present. Returns whether it was
    /// inserted.
    pub fn insert(&mut self, value: Value) -> bool {
        self.items.insert(value)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.items.iter()
    }
}

impl Hash for ValueSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_unordered(self.items.iter(), state);
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Map from values to values with unique keys.
///
/// Inserting an existing key replaces its value in place. Equality ignores
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: IndexMap<Value, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }
}

impl Hash for ValueMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_unordered(self.entries.iter(), state);
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Composite values
// ============================================================================

/// Record value: named field values under a record schema.
///
/// Field order is kept for iteration but ignored by equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericRecord {
    schema: SchemaId,
    fields: IndexMap<String, Value>,
}

impl GenericRecord {
    pub fn new<I, S>(schema: SchemaId, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            schema,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn get(&self, name: &str) -> Result<&Value, ValueError> {
        self.fields
            .get(name)
            .ok_or_else(|| ValueError::MissingField(name.to_owned()))
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl Hash for GenericRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);
        hash_unordered(self.fields.iter(), state);
    }
}

/// Union value: the chosen branch index and the value for that branch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericUnion {
    schema: SchemaId,
    branch: usize,
    value: Box<Value>,
}

impl GenericUnion {
    pub fn new(schema: SchemaId, branch: usize, value: impl Into<Value>) -> Self {
        Self {
            schema,
            branch,
            value: Box::new(value.into()),
        }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn branch_index(&self) -> usize {
        self.branch
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Extension value: a typed tag plus an opaque byte payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericExtension {
    schema: SchemaId,
    tag: Box<Value>,
    payload: Vec<u8>,
}

impl GenericExtension {
    pub fn new(schema: SchemaId, tag: impl Into<Value>, payload: Vec<u8>) -> Self {
        Self {
            schema,
            tag: Box::new(tag.into()),
            payload,
        }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn tag(&self) -> &Value {
        &self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A value paired with the schema it is meant to conform to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericValue {
    schema: SchemaId,
    value: Value,
}

impl GenericValue {
    pub fn new(schema: SchemaId, value: impl Into<Value>) -> Self {
        Self {
            schema,
            value: value.into(),
        }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Whether the runtime tag fits the kind of the schema. Only the top
    /// level is checked.
    pub fn kind_matches(&self, arena: &SchemaArena) -> bool {
        self.value.matches_kind(arena.kind(self.schema))
    }

    /// Like [`kind_matches`](Self::kind_matches), reported as an error.
    pub fn check_kind(&self, arena: &SchemaArena) -> Result<(), ValueError> {
        let kind = arena.kind(self.schema);
        if self.value.matches_kind(kind) {
            Ok(())
        } else {
            Err(ValueError::TypeMismatch {
                expected: kind.name(),
                found: self.value.kind_name(),
            })
        }
    }
}
