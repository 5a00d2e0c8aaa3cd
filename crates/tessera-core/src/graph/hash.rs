//! Structural hashing of schema graphs.
//!
//! Consistent with [`equal`](super::equal): structurally equal schemas hash
//! alike. A record contributes its name and its sorted field names but does
//! not descend into field schemas. Equality treats a recursive record and its
//! unrolling as equal, and their field subgraphs differ in depth, so any
//! descent through a record could tell them apart. Stopping at records also
//! breaks every cycle.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::arena::{SchemaArena, SchemaId};
use crate::schema::Schema;

use super::{Memo, Visit};

pub fn hash(arena: &SchemaArena, id: SchemaId) -> u64 {
    Hashing {
        arena,
        memo: Memo::new(),
    }
    .hash(id)
}

struct Hashing<'a> {
    arena: &'a SchemaArena,
    memo: Memo<SchemaId, u64>,
}

impl Hashing<'_> {
    fn hash(&mut self, id: SchemaId) -> u64 {
        if let Some(Visit::Done(h)) = self.memo.get(&id) {
            return *h;
        }

        let arena = self.arena;
        let schema = arena.get(id);
        let mut state = DefaultHasher::new();
        schema.kind().hash(&mut state);

        match schema {
            Schema::Primitive(_) => {}
            Schema::Enum(e) => {
                e.name.hash(&mut state);
                let mut symbols: Vec<&String> = e.symbols.iter().collect();
                symbols.sort();
                symbols.hash(&mut state);
            }
            Schema::Extension(e) => self.hash(e.tag).hash(&mut state),
            Schema::Array(a) => self.hash(a.element).hash(&mut state),
            Schema::FixedSizeArray(a) => {
                a.size.hash(&mut state);
                self.hash(a.element).hash(&mut state);
            }
            Schema::Set(s) => self.hash(s.element).hash(&mut state),
            Schema::Map(m) => {
                self.hash(m.key).hash(&mut state);
                self.hash(m.value).hash(&mut state);
            }
            Schema::Union(u) => {
                for &branch in &u.branches {
                    self.hash(branch).hash(&mut state);
                }
            }
            Schema::Optional(o) => self.hash(o.element).hash(&mut state),
            Schema::Record(r) => {
                r.name.hash(&mut state);
                if let Some(fields) = &r.fields {
                    let mut names: Vec<&String> = fields.keys().collect();
                    names.sort();
                    names.hash(&mut state);
                }
            }
        }

        self.memo.finish(id, state.finish())
    }
}

impl SchemaArena {
    pub fn structural_hash(&self, id: SchemaId) -> u64 {
        hash(self, id)
    }
}
