//! Cycle-safe algorithms over schema graphs.
//!
//! Schema graphs may contain cycles through records, so every traversal here
//! carries a [`Memo`] that marks nodes as in progress on entry and records the
//! result on exit. Meeting an in-progress node breaks the recursion with a
//! per-algorithm neutral result.

mod equality;
mod hash;
mod memo;
mod render;

#[cfg(test)]
mod hash_tests;
#[cfg(test)]
mod render_tests;

pub use equality::equal;
pub use hash::hash;
pub use render::{SchemaDisplay, render};

pub(crate) use memo::{Memo, Visit};
