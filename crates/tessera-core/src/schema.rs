//! Schema nodes.
//!
//! A `Schema` is one node of a schema graph. Children are referenced by
//! [`SchemaId`] into the owning [`SchemaArena`](crate::SchemaArena), which is
//! what lets a record refer back to itself.

use indexmap::{IndexMap, IndexSet};

use crate::arena::SchemaId;
use crate::error::{BuilderStateError, Result, SchemaError};
use crate::kind::{Kind, Primitive};

/// A schema node: one variant per kind family.
#[derive(Clone, Debug)]
pub enum Schema {
    Primitive(Primitive),
    Enum(EnumSchema),
    Extension(ExtensionSchema),
    Array(ArraySchema),
    FixedSizeArray(FixedSizeArraySchema),
    Set(SetSchema),
    Map(MapSchema),
    Union(UnionSchema),
    Optional(OptionalSchema),
    Record(RecordSchema),
}

#[derive(Clone, Debug)]
pub struct EnumSchema {
    pub(crate) name: String,
    pub(crate) symbols: IndexSet<String>,
}

#[derive(Clone, Debug)]
pub struct ExtensionSchema {
    pub(crate) tag: SchemaId,
}

#[derive(Clone, Debug)]
pub struct ArraySchema {
    pub(crate) element: SchemaId,
}

#[derive(Clone, Debug)]
pub struct FixedSizeArraySchema {
    pub(crate) element: SchemaId,
    pub(crate) size: usize,
}

#[derive(Clone, Debug)]
pub struct SetSchema {
    pub(crate) element: SchemaId,
}

#[derive(Clone, Debug)]
pub struct MapSchema {
    pub(crate) key: SchemaId,
    pub(crate) value: SchemaId,
}

#[derive(Clone, Debug)]
pub struct UnionSchema {
    pub(crate) branches: Vec<SchemaId>,
}

#[derive(Clone, Debug)]
pub struct OptionalSchema {
    pub(crate) element: SchemaId,
}

/// A named record.
///
/// `fields` is `None` while the record is an unfilled placeholder.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    pub(crate) name: String,
    pub(crate) fields: Option<IndexMap<String, SchemaId>>,
}

impl Schema {
    pub fn kind(&self) -> Kind {
        match self {
            Schema::Primitive(p) => p.kind(),
            Schema::Enum(_) => Kind::Enum,
            Schema::Extension(_) => Kind::Extension,
            Schema::Array(_) => Kind::Array,
            Schema::FixedSizeArray(_) => Kind::FixedSizeArray,
            Schema::Set(_) => Kind::Set,
            Schema::Map(_) => Kind::Map,
            Schema::Union(_) => Kind::Union,
            Schema::Optional(_) => Kind::Optional,
            Schema::Record(_) => Kind::Record,
        }
    }

    /// Name of an enum or record schema; `None` for every other kind.
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Enum(e) => Some(&e.name),
            Schema::Record(r) => Some(&r.name),
            _ => None,
        }
    }

    fn mismatch(&self, expected: Kind) -> SchemaError {
        SchemaError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_enum(&self) -> Result<&EnumSchema> {
        match self {
            Schema::Enum(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Enum)),
        }
    }

    pub fn as_extension(&self) -> Result<&ExtensionSchema> {
        match self {
            Schema::Extension(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Extension)),
        }
    }

    pub fn as_array(&self) -> Result<&ArraySchema> {
        match self {
            Schema::Array(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    pub fn as_fixed_size_array(&self) -> Result<&FixedSizeArraySchema> {
        match self {
            Schema::FixedSizeArray(s) => Ok(s),
            _ => Err(self.mismatch(Kind::FixedSizeArray)),
        }
    }

    pub fn as_set(&self) -> Result<&SetSchema> {
        match self {
            Schema::Set(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Set)),
        }
    }

    pub fn as_map(&self) -> Result<&MapSchema> {
        match self {
            Schema::Map(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Map)),
        }
    }

    pub fn as_union(&self) -> Result<&UnionSchema> {
        match self {
            Schema::Union(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Union)),
        }
    }

    pub fn as_optional(&self) -> Result<&OptionalSchema> {
        match self {
            Schema::Optional(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Optional)),
        }
    }

    pub fn as_record(&self) -> Result<&RecordSchema> {
        match self {
            Schema::Record(s) => Ok(s),
            _ => Err(self.mismatch(Kind::Record)),
        }
    }

    /// Element schema of an array, fixed-size array, set or optional.
    pub fn element(&self) -> Result<SchemaId> {
        match self {
            Schema::Array(s) => Ok(s.element),
            Schema::FixedSizeArray(s) => Ok(s.element),
            Schema::Set(s) => Ok(s.element),
            Schema::Optional(s) => Ok(s.element),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    /// Direct child schemas in declaration order.
    ///
    /// An unfilled record placeholder has no children yet.
    pub fn children(&self) -> Vec<SchemaId> {
        match self {
            Schema::Primitive(_) | Schema::Enum(_) => Vec::new(),
            Schema::Extension(s) => vec![s.tag],
            Schema::Array(s) => vec![s.element],
            Schema::FixedSizeArray(s) => vec![s.element],
            Schema::Set(s) => vec![s.element],
            Schema::Map(s) => vec![s.key, s.value],
            Schema::Union(s) => s.branches.clone(),
            Schema::Optional(s) => vec![s.element],
            Schema::Record(s) => s
                .fields
                .as_ref()
                .map(|f| f.values().copied().collect())
                .unwrap_or_default(),
        }
    }
}

impl EnumSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbols in declaration order. Order carries no meaning for equality.
    pub fn symbols(&self) -> &IndexSet<String> {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }
}

impl ExtensionSchema {
    pub fn tag(&self) -> SchemaId {
        self.tag
    }
}

impl ArraySchema {
    pub fn element(&self) -> SchemaId {
        self.element
    }
}

impl FixedSizeArraySchema {
    pub fn element(&self) -> SchemaId {
        self.element
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl SetSchema {
    pub fn element(&self) -> SchemaId {
        self.element
    }
}

impl MapSchema {
    pub fn key(&self) -> SchemaId {
        self.key
    }

    pub fn value(&self) -> SchemaId {
        self.value
    }
}

impl UnionSchema {
    pub fn branches(&self) -> &[SchemaId] {
        &self.branches
    }
}

impl OptionalSchema {
    pub fn element(&self) -> SchemaId {
        self.element
    }
}

impl RecordSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_filled(&self) -> bool {
        self.fields.is_some()
    }

    /// Field schemas in declaration order.
    ///
    /// Fails while the record is still a placeholder.
    pub fn fields(&self) -> Result<&IndexMap<String, SchemaId>> {
        self.fields
            .as_ref()
            .ok_or_else(|| BuilderStateError::Unfilled(self.name.clone()).into())
    }
}
