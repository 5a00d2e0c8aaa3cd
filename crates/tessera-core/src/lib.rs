#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Schema graphs for Tessera.
//!
//! A schema describes the shape of a value. Schemas form a graph: containers
//! point at element schemas, records point at field schemas, and a record may
//! reach itself again through an optional, array, set, map or union.
//!
//! - [`SchemaArena`] owns the nodes; [`SchemaId`] addresses them.
//! - [`SchemaBuilder`] checks attributes per kind and ties recursive knots
//!   through record placeholders.
//! - [`graph`] holds the cycle-safe equality, hashing and rendering.
//! - [`value`] holds the generic values codecs produce and consume.
//! - [`reflect`] describes schemas as values of a schema-of-schemas.

pub mod arena;
pub mod builder;
pub mod error;
pub mod graph;
pub mod kind;
pub mod reflect;
pub mod schema;
pub mod value;

mod invariants;

#[cfg(test)]
mod reflect_tests;

pub use arena::{ArenaId, SchemaArena, SchemaId};
pub use builder::SchemaBuilder;
pub use error::{Attribute, BuilderStateError, Result, SchemaError, ValueError};
pub use kind::{Kind, Primitive};
pub use schema::{
    ArraySchema, EnumSchema, ExtensionSchema, FixedSizeArraySchema, MapSchema, OptionalSchema,
    RecordSchema, Schema, SetSchema, UnionSchema,
};
pub use value::{
    GenericExtension, GenericRecord, GenericUnion, GenericValue, Value, ValueMap, ValueSet,
};

/// Re-exported numeric types used by big-number values.
pub use bigdecimal::BigDecimal;
pub use bigdecimal::num_bigint::{BigInt, BigUint};
