//! Codec plans.
//!
//! A codec is synthesized once per schema into a [`Plan`]: a flat table of
//! steps, one per distinct schema node reached, where children are referenced
//! by [`SlotId`]. Encoders and decoders interpret the same plan shape.
//!
//! Synthesis walks the schema graph depth-first with a memo from schema to
//! slot. Every non-leaf node reserves its slot (as [`Step::Pending`]) and
//! registers it before descending, so a record that reaches itself finds its
//! own slot instead of recursing forever. The slot is filled once the
//! children are known; no pending slot survives synthesis.

use std::collections::HashMap;

use indexmap::IndexSet;
use tessera_core::{Kind, Schema, SchemaArena, SchemaId};

use crate::config::CodecConfig;
use crate::error::CodecError;

/// Index of a step in a [`Plan`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub(crate) struct SlotId(u32);

impl SlotId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Step {
    Signed16,
    Signed32,
    Signed64,
    SignedBig,
    Float32,
    Float64,
    FloatBig,
    Boolean,
    String,
    Enum {
        name: String,
        symbols: IndexSet<String>,
    },
    Extension {
        schema: SchemaId,
        tag: SlotId,
    },
    Array {
        element: SlotId,
    },
    FixedSizeArray {
        size: usize,
        element: SlotId,
    },
    Set {
        element: SlotId,
    },
    Map {
        key: SlotId,
        value: SlotId,
    },
    Union {
        schema: SchemaId,
        branches: Vec<SlotId>,
    },
    Optional {
        element: SlotId,
    },
    Record {
        schema: SchemaId,
        fields: Vec<(String, SlotId)>,
    },
    /// Reserved slot whose children are still being synthesized.
    Pending,
}

impl Step {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Step::Signed16 => Kind::Signed16,
            Step::Signed32 => Kind::Signed32,
            Step::Signed64 => Kind::Signed64,
            Step::SignedBig => Kind::SignedBig,
            Step::Float32 => Kind::Float32,
            Step::Float64 => Kind::Float64,
            Step::FloatBig => Kind::FloatBig,
            Step::Boolean => Kind::Boolean,
            Step::String => Kind::String,
            Step::Enum { .. } => Kind::Enum,
            Step::Extension { .. } => Kind::Extension,
            Step::Array { .. } => Kind::Array,
            Step::FixedSizeArray { .. } => Kind::FixedSizeArray,
            Step::Set { .. } => Kind::Set,
            Step::Map { .. } => Kind::Map,
            Step::Union { .. } => Kind::Union,
            Step::Optional { .. } => Kind::Optional,
            Step::Record { .. } => Kind::Record,
            Step::Pending => unreachable!("pending slot survived synthesis"),
        }
    }
}

// ============================================================================
// Tree layout
// ============================================================================

pub(crate) const ENUM_NAME: &str = "name";
pub(crate) const ENUM_VALUE: &str = "value";
pub(crate) const EXTENSION_TAG: &str = "tag";
pub(crate) const EXTENSION_VALUE: &str = "value";
pub(crate) const UNION_BRANCH: &str = "branch_index";
pub(crate) const UNION_VALUE: &str = "value";
pub(crate) const MAP_KEY: &str = "k";
pub(crate) const MAP_VALUE: &str = "v";

/// Synthesized codec program for one root schema.
#[derive(Debug)]
pub(crate) struct Plan {
    steps: Vec<Step>,
    root: SlotId,
    config: CodecConfig,
}

impl Plan {
    /// Synthesize the plan for `schema`.
    pub(crate) fn synthesize(
        arena: &SchemaArena,
        schema: SchemaId,
        config: CodecConfig,
    ) -> Result<Self, CodecError> {
        let mut synth = Synthesizer {
            arena,
            steps: Vec::new(),
            memo: HashMap::new(),
        };
        let root = synth.slot_for(schema)?;
        debug_assert!(
            synth.steps.iter().all(|s| !matches!(s, Step::Pending)),
            "pending slot survived synthesis"
        );
        let plan = Self {
            steps: synth.steps,
            root,
            config,
        };
        tracing::debug!(
            schema = %arena.display(schema),
            steps = plan.len(),
            "synthesized codec plan"
        );
        Ok(plan)
    }

    pub(crate) fn root(&self) -> SlotId {
        self.root
    }

    pub(crate) fn step(&self, slot: SlotId) -> &Step {
        &self.steps[slot.index()]
    }

    pub(crate) fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

struct Synthesizer<'a> {
    arena: &'a SchemaArena,
    steps: Vec<Step>,
    memo: HashMap<SchemaId, SlotId>,
}

impl Synthesizer<'_> {
    fn push(&mut self, step: Step) -> SlotId {
        let slot = SlotId(self.steps.len() as u32);
        self.steps.push(step);
        slot
    }

    /// Reserve and register a slot for `schema` before its children exist.
    fn reserve(&mut self, schema: SchemaId) -> SlotId {
        let slot = self.push(Step::Pending);
        self.memo.insert(schema, slot);
        slot
    }

    fn fill(&mut self, slot: SlotId, step: Step) {
        debug_assert!(matches!(self.steps[slot.index()], Step::Pending));
        self.steps[slot.index()] = step;
    }

    fn slot_for(&mut self, id: SchemaId) -> Result<SlotId, CodecError> {
        if let Some(&slot) = self.memo.get(&id) {
            return Ok(slot);
        }

        let arena = self.arena;
        let schema = arena.get(id);
        let leaf = match schema.kind() {
            Kind::Signed16 => Some(Step::Signed16),
            Kind::Signed32 => Some(Step::Signed32),
            Kind::Signed64 => Some(Step::Signed64),
            Kind::SignedBig => Some(Step::SignedBig),
            Kind::Float32 => Some(Step::Float32),
            Kind::Float64 => Some(Step::Float64),
            Kind::FloatBig => Some(Step::FloatBig),
            Kind::Boolean => Some(Step::Boolean),
            Kind::String => Some(Step::String),
            kind if kind.is_primitive() => return Err(CodecError::UnsupportedKind(kind)),
            _ => None,
        };
        if let Some(step) = leaf {
            let slot = self.push(step);
            self.memo.insert(id, slot);
            return Ok(slot);
        }

        let slot = self.reserve(id);
        let step = match schema {
            Schema::Enum(e) => Step::Enum {
                name: e.name().to_owned(),
                symbols: e.symbols().clone(),
            },
            Schema::Extension(e) => Step::Extension {
                schema: id,
                tag: self.slot_for(e.tag())?,
            },
            Schema::Array(a) => Step::Array {
                element: self.slot_for(a.element())?,
            },
            Schema::FixedSizeArray(a) => Step::FixedSizeArray {
                size: a.size(),
                element: self.slot_for(a.element())?,
            },
            Schema::Set(s) => Step::Set {
                element: self.slot_for(s.element())?,
            },
            Schema::Map(m) => Step::Map {
                key: self.slot_for(m.key())?,
                value: self.slot_for(m.value())?,
            },
            Schema::Union(u) => Step::Union {
                schema: id,
                branches: u
                    .branches()
                    .iter()
                    .map(|&b| self.slot_for(b))
                    .collect::<Result<_, _>>()?,
            },
            Schema::Optional(o) => Step::Optional {
                element: self.slot_for(o.element())?,
            },
            Schema::Record(r) => {
                tracing::trace!(record = r.name(), "registered record slot");
                let mut fields = Vec::new();
                for (name, &field) in r.fields()? {
                    fields.push((name.clone(), self.slot_for(field)?));
                }
                tracing::trace!(record = r.name(), "filled record slot");
                Step::Record { schema: id, fields }
            }
            Schema::Primitive(p) => return Err(CodecError::UnsupportedKind(p.kind())),
        };
        self.fill(slot, step);
        Ok(slot)
    }
}
