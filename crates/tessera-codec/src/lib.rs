#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Schema-driven codecs between generic values and trees.
//!
//! Given a schema from a [`SchemaArena`](tessera_core::SchemaArena), a factory
//! synthesizes an [`Encoder`] turning [`Value`](tessera_core::Value)s into
//! [`Node`] trees and a [`Decoder`] going the other way. Recursive schemas
//! produce finite codecs: each distinct schema node becomes one step of a
//! shared plan.
//!
//! Tree layout per kind:
//! - enum: `{"name": <enum name>, "value": <symbol>}`
//! - extension: `{"tag": <tag>, "value": <bytes or base64 text>}`
//! - array, fixed-size array, set: array of elements
//! - map: array of `{"k": <key>, "v": <value>}` entries
//! - union: `{"branch_index": <index>, "value": <branch value>}`
//! - optional: `null` or the element's own encoding
//! - record: object keyed by field name
//!
//! Unsigned integers and `signed_8` have no encoding; requesting a codec for a
//! schema that reaches them fails.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod factory;
pub mod node;

mod plan;

#[cfg(test)]
mod encode_tests;
#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod node_tests;

pub use config::{BinaryEncoding, CodecConfig};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{CodecError, DecodeError, DecodeErrorKind};
pub use factory::{CachedCodecFactory, CodecFactory, TreeCodecFactory, decoder_for, encoder_for};
pub use node::Node;
