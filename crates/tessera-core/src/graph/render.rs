//! Human-readable rendering of schema graphs.
//!
//! A record met again while it is being rendered prints as its bare name, so
//! recursive schemas render finitely.

use std::fmt;

use crate::arena::{SchemaArena, SchemaId};
use crate::schema::Schema;

use super::{Memo, Visit};

pub fn render(arena: &SchemaArena, id: SchemaId) -> String {
    Renderer {
        arena,
        memo: Memo::new(),
    }
    .render(id)
}

/// [`fmt::Display`] adapter returned by [`SchemaArena::display`].
pub struct SchemaDisplay<'a> {
    arena: &'a SchemaArena,
    id: SchemaId,
}

impl fmt::Display for SchemaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self.arena, self.id))
    }
}

impl SchemaArena {
    pub fn display(&self, id: SchemaId) -> SchemaDisplay<'_> {
        SchemaDisplay { arena: self, id }
    }
}

struct Renderer<'a> {
    arena: &'a SchemaArena,
    memo: Memo<SchemaId, String>,
}

impl Renderer<'_> {
    fn render(&mut self, id: SchemaId) -> String {
        let arena = self.arena;
        let schema = arena.get(id);
        match self.memo.get(&id) {
            Some(Visit::InProgress) => {
                return schema
                    .name()
                    .unwrap_or_else(|| schema.kind().name())
                    .to_owned();
            }
            Some(Visit::Done(s)) => return s.clone(),
            None => {}
        }

        self.memo.enter(id);
        let out = match schema {
            Schema::Primitive(p) => p.to_string(),
            Schema::Enum(e) => {
                let symbols: Vec<&str> = e.symbols.iter().map(String::as_str).collect();
                format!("enum {} {{ {} }}", e.name, symbols.join(", "))
            }
            Schema::Extension(e) => format!("extension<{}>", self.render(e.tag)),
            Schema::Array(a) => format!("array<{}>", self.render(a.element)),
            Schema::FixedSizeArray(a) => {
                format!("fixed_size_array<{}, {}>", self.render(a.element), a.size)
            }
            Schema::Set(s) => format!("set<{}>", self.render(s.element)),
            Schema::Map(m) => {
                let key = self.render(m.key);
                let value = self.render(m.value);
                format!("map<{key}, {value}>")
            }
            Schema::Union(u) => {
                let branches: Vec<String> = u.branches.iter().map(|&b| self.render(b)).collect();
                format!("union<{}>", branches.join(", "))
            }
            Schema::Optional(o) => format!("optional<{}>", self.render(o.element)),
            Schema::Record(r) => match &r.fields {
                None => format!("record {} {{ .. }}", r.name),
                Some(fields) if fields.is_empty() => format!("record {} {{}}", r.name),
                Some(fields) => {
                    let fields: Vec<String> = fields
                        .iter()
                        .map(|(name, &f)| format!("{name}: {}", self.render(f)))
                        .collect();
                    format!("record {} {{ {} }}", r.name, fields.join(", "))
                }
            },
        };
        self.memo.finish(id, out)
    }
}
