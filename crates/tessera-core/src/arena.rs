//! Schema storage.
//!
//! All schema nodes live in a [`SchemaArena`] and refer to each other by
//! [`SchemaId`]. Ids are never reused and nodes are never removed, so an id
//! stays valid for the life of its arena. The only mutation after allocation
//! is filling a record placeholder, which happens exactly once.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::error::{BuilderStateError, Result};
use crate::kind::{Kind, Primitive};
use crate::schema::{RecordSchema, Schema};

/// Handle to a schema node inside a [`SchemaArena`].
///
/// Ids 0-14 are the primitive singletons, in kind order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SchemaId(u32);

impl SchemaId {
    pub const UNSIGNED_8: Self = Self::primitive(Primitive::Unsigned8);
    pub const UNSIGNED_16: Self = Self::primitive(Primitive::Unsigned16);
    pub const UNSIGNED_32: Self = Self::primitive(Primitive::Unsigned32);
    pub const UNSIGNED_64: Self = Self::primitive(Primitive::Unsigned64);
    pub const UNSIGNED_BIG: Self = Self::primitive(Primitive::UnsignedBig);
    pub const SIGNED_8: Self = Self::primitive(Primitive::Signed8);
    pub const SIGNED_16: Self = Self::primitive(Primitive::Signed16);
    pub const SIGNED_32: Self = Self::primitive(Primitive::Signed32);
    pub const SIGNED_64: Self = Self::primitive(Primitive::Signed64);
    pub const SIGNED_BIG: Self = Self::primitive(Primitive::SignedBig);
    pub const FLOAT_32: Self = Self::primitive(Primitive::Float32);
    pub const FLOAT_64: Self = Self::primitive(Primitive::Float64);
    pub const FLOAT_BIG: Self = Self::primitive(Primitive::FloatBig);
    pub const BOOLEAN: Self = Self::primitive(Primitive::Boolean);
    pub const STRING: Self = Self::primitive(Primitive::String);

    /// The shared instance of a primitive kind.
    pub const fn primitive(p: Primitive) -> Self {
        Self(p as u32)
    }

    #[inline]
    pub fn is_primitive(self) -> bool {
        self.0 <= Primitive::String as u32
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of an arena, distinct for every arena created in the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ArenaId(u64);

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(0);

impl ArenaId {
    fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Owner of every schema node of one or more schema graphs.
#[derive(Debug)]
pub struct SchemaArena {
    id: ArenaId,
    nodes: Vec<Schema>,
}

impl Default for SchemaArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaArena {
    /// A clone gets its own identity: the two arenas diverge as soon as either
    /// allocates.
    fn clone(&self) -> Self {
        Self {
            id: ArenaId::next(),
            nodes: self.nodes.clone(),
        }
    }
}

impl SchemaArena {
    pub fn new() -> Self {
        let mut arena = Self {
            id: ArenaId::next(),
            nodes: Vec::new(),
        };

        // Pre-register primitives at their fixed ids
        for p in Primitive::ALL {
            let id = arena.alloc(Schema::Primitive(p));
            debug_assert_eq!(id, SchemaId::primitive(p));
        }

        arena
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Number of nodes, primitives included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: primitives are present from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: SchemaId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn try_get(&self, id: SchemaId) -> Option<&Schema> {
        self.nodes.get(id.index())
    }

    /// Schema node for `id`.
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn get(&self, id: SchemaId) -> &Schema {
        self.ensure_schema(id)
    }

    pub fn kind(&self, id: SchemaId) -> Kind {
        self.get(id).kind()
    }

    pub fn name(&self, id: SchemaId) -> Option<&str> {
        self.get(id).name()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SchemaId, &Schema)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, s)| (SchemaId(i as u32), s))
    }

    pub(crate) fn alloc(&mut self, schema: Schema) -> SchemaId {
        let id = SchemaId(self.nodes.len() as u32);
        self.nodes.push(schema);
        id
    }

    /// Reserve an unfilled record node for a recursive record.
    pub(crate) fn alloc_placeholder(&mut self, name: String) -> SchemaId {
        tracing::trace!(record = %name, "allocating record placeholder");
        self.alloc(Schema::Record(RecordSchema { name, fields: None }))
    }

    /// Publish the fields of a placeholder allocated by
    /// [`alloc_placeholder`](Self::alloc_placeholder).
    pub(crate) fn fill_placeholder(
        &mut self,
        id: SchemaId,
        fields: IndexMap<String, SchemaId>,
    ) -> Result<()> {
        self.ensure_schema(id);
        let record = match &mut self.nodes[id.index()] {
            Schema::Record(r) => r,
            other => {
                return Err(crate::SchemaError::TypeMismatch {
                    expected: Kind::Record,
                    found: other.kind(),
                });
            }
        };
        if record.fields.is_some() {
            return Err(BuilderStateError::AlreadyFilled(record.name.clone()).into());
        }
        tracing::trace!(record = %record.name, fields = fields.len(), "filled record placeholder");
        record.fields = Some(fields);
        Ok(())
    }
}
