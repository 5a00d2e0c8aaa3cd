//! Schema builders.
//!
//! A [`SchemaBuilder`] accumulates the attributes of one schema node and checks
//! them against its kind. Record builders can hand out a placeholder id before
//! their fields are known; descendants reference the placeholder and
//! [`SchemaBuilder::build`] fills it in.
//!
//! ```
//! use tessera_core::{Kind, SchemaArena, SchemaBuilder, SchemaId};
//!
//! let mut arena = SchemaArena::new();
//! let mut list = SchemaBuilder::record("LinkedList");
//! let this = list.placeholder(&mut arena)?;
//! let tail = arena.optional(this);
//! list.set_field_schema("head", SchemaId::STRING)?
//!     .set_field_schema("tail", tail)?;
//! let list = list.build(&mut arena)?;
//! assert_eq!(arena.kind(list), Kind::Record);
//! # Ok::<(), tessera_core::SchemaError>(())
//! ```

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::arena::{SchemaArena, SchemaId};
use crate::error::{Attribute, BuilderStateError, Result};
use crate::graph;
use crate::kind::{Kind, Primitive};
use crate::schema::{
    ArraySchema, EnumSchema, ExtensionSchema, FixedSizeArraySchema, MapSchema, OptionalSchema,
    RecordSchema, Schema, SetSchema, UnionSchema,
};

/// Accumulates attributes for one schema node of a fixed kind.
#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    kind: Kind,
    name: Option<String>,
    symbols: Option<IndexSet<String>>,
    tag: Option<SchemaId>,
    element: Option<SchemaId>,
    size: Option<usize>,
    key: Option<SchemaId>,
    value: Option<SchemaId>,
    branches: Vec<SchemaId>,
    fields: IndexMap<String, SchemaId>,
    placeholder: Option<SchemaId>,
    distinct_branches: bool,
}

impl SchemaBuilder {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            name: None,
            symbols: None,
            tag: None,
            element: None,
            size: None,
            key: None,
            value: None,
            branches: Vec::new(),
            fields: IndexMap::new(),
            placeholder: None,
            distinct_branches: false,
        }
    }

    /// Record builder with its name already set.
    pub fn record(name: impl Into<String>) -> Self {
        let mut builder = Self::new(Kind::Record);
        builder.name = Some(name.into());
        builder
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn check(&self, attribute: Attribute) -> Result<()> {
        if attribute.applies_to(self.kind) {
            Ok(())
        } else {
            Err(BuilderStateError::Foreign {
                kind: self.kind,
                attribute,
            }
            .into())
        }
    }

    fn set_once<T>(kind: Kind, slot: &mut Option<T>, attribute: Attribute, value: T) -> Result<()> {
        if slot.is_some() {
            return Err(BuilderStateError::AlreadySet { kind, attribute }.into());
        }
        *slot = Some(value);
        Ok(())
    }

    fn required<T: Copy>(&self, slot: Option<T>, attribute: Attribute) -> Result<T> {
        slot.ok_or_else(|| {
            BuilderStateError::Missing {
                kind: self.kind,
                attribute,
            }
            .into()
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.check(Attribute::Name)?;
        Self::set_once(self.kind, &mut self.name, Attribute::Name, name.into())?;
        Ok(self)
    }

    pub fn set_symbols<I, S>(&mut self, symbols: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check(Attribute::Symbols)?;
        let mut set = IndexSet::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if set.contains(&symbol) {
                return Err(BuilderStateError::DuplicateSymbol(symbol).into());
            }
            set.insert(symbol);
        }
        Self::set_once(self.kind, &mut self.symbols, Attribute::Symbols, set)?;
        Ok(self)
    }

    pub fn set_tag_schema(&mut self, tag: SchemaId) -> Result<&mut Self> {
        self.check(Attribute::TagSchema)?;
        Self::set_once(self.kind, &mut self.tag, Attribute::TagSchema, tag)?;
        Ok(self)
    }

    pub fn set_element_schema(&mut self, element: SchemaId) -> Result<&mut Self> {
        self.check(Attribute::ElementSchema)?;
        Self::set_once(self.kind, &mut self.element, Attribute::ElementSchema, element)?;
        Ok(self)
    }

    /// Size of a fixed-size array. Must be positive and fit a signed 32-bit
    /// integer.
    pub fn set_size(&mut self, size: i64) -> Result<&mut Self> {
        self.check(Attribute::Size)?;
        if size <= 0 || size > i64::from(i32::MAX) {
            return Err(BuilderStateError::InvalidSize(size).into());
        }
        Self::set_once(self.kind, &mut self.size, Attribute::Size, size as usize)?;
        Ok(self)
    }

    pub fn set_key_schema(&mut self, key: SchemaId) -> Result<&mut Self> {
        self.check(Attribute::KeySchema)?;
        Self::set_once(self.kind, &mut self.key, Attribute::KeySchema, key)?;
        Ok(self)
    }

    pub fn set_value_schema(&mut self, value: SchemaId) -> Result<&mut Self> {
        self.check(Attribute::ValueSchema)?;
        Self::set_once(self.kind, &mut self.value, Attribute::ValueSchema, value)?;
        Ok(self)
    }

    /// Append a union branch. Branch indices follow call order.
    pub fn add_branch_schema(&mut self, branch: SchemaId) -> Result<&mut Self> {
        self.check(Attribute::BranchSchemas)?;
        self.branches.push(branch);
        Ok(self)
    }

    /// Reject unions whose branches are structurally equal to each other.
    pub fn require_distinct_branches(&mut self, distinct: bool) -> Result<&mut Self> {
        self.check(Attribute::BranchSchemas)?;
        self.distinct_branches = distinct;
        Ok(self)
    }

    /// Set one record field. Each name may be set once; declaration order is
    /// kept.
    pub fn set_field_schema(
        &mut self,
        name: impl Into<String>,
        schema: SchemaId,
    ) -> Result<&mut Self> {
        self.check(Attribute::FieldSchemas)?;
        let name = name.into();
        if self.fields.contains_key(&name) {
            return Err(BuilderStateError::DuplicateField(name).into());
        }
        self.fields.insert(name, schema);
        Ok(self)
    }

    /// Id under which this record will be published.
    ///
    /// The first call allocates an unfilled record node; later calls return the
    /// same id. Reading its fields before [`build`](Self::build) fails.
    pub fn placeholder(&mut self, arena: &mut SchemaArena) -> Result<SchemaId> {
        self.check(Attribute::Placeholder)?;
        if let Some(id) = self.placeholder {
            return Ok(id);
        }
        let Some(name) = self.name.clone() else {
            return Err(BuilderStateError::Missing {
                kind: self.kind,
                attribute: Attribute::Name,
            }
            .into());
        };
        let id = arena.alloc_placeholder(name);
        self.placeholder = Some(id);
        Ok(id)
    }

    /// Validate the accumulated attributes and publish the schema.
    ///
    /// Primitive kinds resolve to their shared instance. A record that issued
    /// a placeholder is published under the placeholder's id.
    pub fn build(self, arena: &mut SchemaArena) -> Result<SchemaId> {
        let schema = match self.kind {
            Kind::Enum => {
                let name = self.required_name()?;
                let symbols = self.symbols.clone().ok_or(BuilderStateError::Missing {
                    kind: Kind::Enum,
                    attribute: Attribute::Symbols,
                })?;
                Schema::Enum(EnumSchema { name, symbols })
            }
            Kind::Extension => Schema::Extension(ExtensionSchema {
                tag: self.required(self.tag, Attribute::TagSchema)?,
            }),
            Kind::Array => Schema::Array(ArraySchema {
                element: self.required(self.element, Attribute::ElementSchema)?,
            }),
            Kind::FixedSizeArray => Schema::FixedSizeArray(FixedSizeArraySchema {
                element: self.required(self.element, Attribute::ElementSchema)?,
                size: self.required(self.size, Attribute::Size)?,
            }),
            Kind::Set => Schema::Set(SetSchema {
                element: self.required(self.element, Attribute::ElementSchema)?,
            }),
            Kind::Map => Schema::Map(MapSchema {
                key: self.required(self.key, Attribute::KeySchema)?,
                value: self.required(self.value, Attribute::ValueSchema)?,
            }),
            Kind::Union => {
                self.check_branches(arena)?;
                Schema::Union(UnionSchema {
                    branches: self.branches,
                })
            }
            Kind::Optional => Schema::Optional(OptionalSchema {
                element: self.required(self.element, Attribute::ElementSchema)?,
            }),
            Kind::Record => return self.build_record(arena),
            kind => {
                // Every remaining kind is a primitive
                return Primitive::from_kind(kind)
                    .map(SchemaId::primitive)
                    .ok_or_else(|| crate::SchemaError::UnknownKind(kind.name().to_owned()));
            }
        };
        Ok(arena.alloc(schema))
    }

    fn required_name(&self) -> Result<String> {
        self.name.clone().ok_or_else(|| {
            BuilderStateError::Missing {
                kind: self.kind,
                attribute: Attribute::Name,
            }
            .into()
        })
    }

    fn check_branches(&self, arena: &SchemaArena) -> Result<()> {
        if self.branches.len() < 2 {
            return Err(BuilderStateError::TooFewBranches(self.branches.len()).into());
        }
        if !self.distinct_branches {
            return Ok(());
        }
        for (i, &a) in self.branches.iter().enumerate() {
            for (j, &b) in self.branches.iter().enumerate().skip(i + 1) {
                if graph::equal(arena, a, arena, b) {
                    return Err(BuilderStateError::DuplicateBranch {
                        first: i,
                        second: j,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn build_record(self, arena: &mut SchemaArena) -> Result<SchemaId> {
        let name = self.required_name()?;
        let Some(id) = self.placeholder else {
            return Ok(arena.alloc(Schema::Record(RecordSchema {
                name,
                fields: Some(self.fields),
            })));
        };

        for (field, &schema) in &self.fields {
            if reaches_directly(arena, schema, id) {
                return Err(BuilderStateError::DirectSelfReference {
                    record: name,
                    field: field.clone(),
                }
                .into());
            }
        }

        arena.fill_placeholder(id, self.fields)?;
        Ok(id)
    }
}

/// Whether `from` leads to `target` without passing a kind that admits a
/// finite value on its own.
fn reaches_directly(arena: &SchemaArena, from: SchemaId, target: SchemaId) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            continue;
        }
        let schema = arena.get(id);
        if schema.kind().breaks_recursion() {
            continue;
        }
        stack.extend(schema.children());
    }
    false
}

// ============================================================================
// Shorthands for schemas whose construction cannot fail
// ============================================================================

impl SchemaArena {
    pub fn primitive(&self, p: Primitive) -> SchemaId {
        SchemaId::primitive(p)
    }

    pub fn array(&mut self, element: SchemaId) -> SchemaId {
        self.alloc(Schema::Array(ArraySchema { element }))
    }

    pub fn set(&mut self, element: SchemaId) -> SchemaId {
        self.alloc(Schema::Set(SetSchema { element }))
    }

    pub fn optional(&mut self, element: SchemaId) -> SchemaId {
        self.alloc(Schema::Optional(OptionalSchema { element }))
    }

    pub fn map(&mut self, key: SchemaId, value: SchemaId) -> SchemaId {
        self.alloc(Schema::Map(MapSchema { key, value }))
    }

    pub fn extension(&mut self, tag: SchemaId) -> SchemaId {
        self.alloc(Schema::Extension(ExtensionSchema { tag }))
    }

    pub fn fixed_size_array(&mut self, element: SchemaId, size: i64) -> Result<SchemaId> {
        let mut builder = SchemaBuilder::new(Kind::FixedSizeArray);
        builder.set_element_schema(element)?.set_size(size)?;
        builder.build(self)
    }

    pub fn union(&mut self, branches: impl IntoIterator<Item = SchemaId>) -> Result<SchemaId> {
        let mut builder = SchemaBuilder::new(Kind::Union);
        for branch in branches {
            builder.add_branch_schema(branch)?;
        }
        builder.build(self)
    }

    pub fn enumeration<I, S>(&mut self, name: impl Into<String>, symbols: I) -> Result<SchemaId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = SchemaBuilder::new(Kind::Enum);
        builder.set_name(name)?.set_symbols(symbols)?;
        builder.build(self)
    }

    /// Non-recursive record in one call.
    pub fn record<I, S>(&mut self, name: impl Into<String>, fields: I) -> Result<SchemaId>
    where
        I: IntoIterator<Item = (S, SchemaId)>,
        S: Into<String>,
    {
        let mut builder = SchemaBuilder::record(name);
        for (field, schema) in fields {
            builder.set_field_schema(field, schema)?;
        }
        builder.build(self)
    }
}
