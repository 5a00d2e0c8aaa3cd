//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::arena::{SchemaArena, SchemaId};
use crate::schema::Schema;

impl SchemaArena {
    pub(crate) fn ensure_schema(&self, id: SchemaId) -> &Schema {
        self.try_get(id).unwrap_or_else(|| {
            panic!(
                "SchemaArena: schema {id} not found \
                 (ids must come from the arena they are used with)"
            )
        })
    }
}
