//! Structural equality of schema graphs.
//!
//! Two schemas are equal when they have the same kind and pairwise equal
//! parameters. Cycles are handled coinductively: a pair met again while it is
//! still being compared is assumed equal, which makes a recursive record equal
//! to any finite unrolling of itself.

use crate::arena::{SchemaArena, SchemaId};
use crate::schema::Schema;

use super::{Memo, Visit};

/// Structural equality of `left` (in `left_arena`) and `right` (in
/// `right_arena`). The arenas may be the same.
pub fn equal(
    left_arena: &SchemaArena,
    left: SchemaId,
    right_arena: &SchemaArena,
    right: SchemaId,
) -> bool {
    Equality {
        left: left_arena,
        right: right_arena,
        memo: Memo::new(),
    }
    .eq(left, right)
}

struct Equality<'a> {
    left: &'a SchemaArena,
    right: &'a SchemaArena,
    memo: Memo<(SchemaId, SchemaId), bool>,
}

impl Equality<'_> {
    fn eq(&mut self, l: SchemaId, r: SchemaId) -> bool {
        let key = (l, r);
        match self.memo.get(&key) {
            Some(Visit::InProgress) => return true,
            Some(Visit::Done(result)) => return *result,
            None => {}
        }

        let (left, right) = (self.left, self.right);
        let ls = left.get(l);
        let rs = right.get(r);
        if ls.kind() != rs.kind() {
            return self.memo.finish(key, false);
        }

        self.memo.enter(key);
        let result = self.eq_same_kind(ls, rs);
        self.memo.finish(key, result)
    }

    fn eq_same_kind(&mut self, ls: &Schema, rs: &Schema) -> bool {
        match (ls, rs) {
            (Schema::Primitive(a), Schema::Primitive(b)) => a == b,
            (Schema::Enum(a), Schema::Enum(b)) => a.name == b.name && a.symbols == b.symbols,
            (Schema::Extension(a), Schema::Extension(b)) => self.eq(a.tag, b.tag),
            (Schema::Array(a), Schema::Array(b)) => self.eq(a.element, b.element),
            (Schema::FixedSizeArray(a), Schema::FixedSizeArray(b)) => {
                a.size == b.size && self.eq(a.element, b.element)
            }
            (Schema::Set(a), Schema::Set(b)) => self.eq(a.element, b.element),
            (Schema::Map(a), Schema::Map(b)) => self.eq(a.key, b.key) && self.eq(a.value, b.value),
            (Schema::Union(a), Schema::Union(b)) => {
                a.branches.len() == b.branches.len()
                    && a.branches
                        .iter()
                        .zip(&b.branches)
                        .all(|(&x, &y)| self.eq(x, y))
            }
            (Schema::Optional(a), Schema::Optional(b)) => self.eq(a.element, b.element),
            (Schema::Record(a), Schema::Record(b)) => {
                if a.name != b.name {
                    return false;
                }
                match (&a.fields, &b.fields) {
                    // Unfilled placeholders only have their names
                    (None, None) => true,
                    (Some(af), Some(bf)) => {
                        af.len() == bf.len()
                            && af.keys().all(|k| bf.contains_key(k))
                            && af.iter().all(|(name, &x)| self.eq(x, bf[name]))
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl SchemaArena {
    /// Structural equality of two schemas of this arena.
    pub fn structurally_equal(&self, a: SchemaId, b: SchemaId) -> bool {
        equal(self, a, self, b)
    }
}
