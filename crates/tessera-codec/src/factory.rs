//! Codec factories.
//!
//! [`TreeCodecFactory`] synthesizes a fresh plan on every request.
//! [`CachedCodecFactory`] wraps any factory and keeps completed codecs per
//! schema so repeated requests share one plan.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tessera_core::{ArenaId, SchemaArena, SchemaId};

use crate::config::CodecConfig;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::CodecError;
use crate::plan::Plan;

/// Source of encoders and decoders for schemas of an arena.
pub trait CodecFactory {
    fn encoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Encoder, CodecError>;

    fn decoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Decoder, CodecError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TreeCodecFactory {
    config: CodecConfig,
}

impl TreeCodecFactory {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl CodecFactory for TreeCodecFactory {
    fn encoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Encoder, CodecError> {
        let plan = Plan::synthesize(arena, schema, self.config)?;
        Ok(Encoder::new(Arc::new(plan), schema))
    }

    fn decoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Decoder, CodecError> {
        let plan = Plan::synthesize(arena, schema, self.config)?;
        Ok(Decoder::new(Arc::new(plan), schema))
    }
}

type CacheKey = (ArenaId, SchemaId);

/// Memoizing wrapper around another factory.
///
/// Only successfully synthesized codecs are stored. Two threads asking for
/// the same schema at once may both synthesize; the first to finish is kept.
#[derive(Debug, Default)]
pub struct CachedCodecFactory<F> {
    inner: F,
    encoders: Mutex<HashMap<CacheKey, Encoder>>,
    decoders: Mutex<HashMap<CacheKey, Decoder>>,
}

impl<F: CodecFactory> CachedCodecFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            encoders: Mutex::new(HashMap::new()),
            decoders: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Number of cached encoders and decoders.
    pub fn cached_counts(&self) -> (usize, usize) {
        let encoders = self.encoders.lock().unwrap_or_else(PoisonError::into_inner);
        let decoders = self.decoders.lock().unwrap_or_else(PoisonError::into_inner);
        (encoders.len(), decoders.len())
    }
}

fn cached<T: Clone>(
    cache: &Mutex<HashMap<CacheKey, T>>,
    key: CacheKey,
    make: impl FnOnce() -> Result<T, CodecError>,
) -> Result<T, CodecError> {
    {
        let map = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = map.get(&key) {
            return Ok(hit.clone());
        }
    }

    // Synthesize outside the lock
    let made = make()?;
    let mut map = cache.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(map.entry(key).or_insert(made).clone())
}

impl<F: CodecFactory> CodecFactory for CachedCodecFactory<F> {
    fn encoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Encoder, CodecError> {
        cached(&self.encoders, (arena.id(), schema), || {
            self.inner.encoder_for(arena, schema)
        })
    }

    fn decoder_for(&self, arena: &SchemaArena, schema: SchemaId) -> Result<Decoder, CodecError> {
        cached(&self.decoders, (arena.id(), schema), || {
            self.inner.decoder_for(arena, schema)
        })
    }
}

/// Encoder for `schema` with the default configuration.
pub fn encoder_for(arena: &SchemaArena, schema: SchemaId) -> Result<Encoder, CodecError> {
    TreeCodecFactory::default().encoder_for(arena, schema)
}

/// Decoder for `schema` with the default configuration.
pub fn decoder_for(arena: &SchemaArena, schema: SchemaId) -> Result<Decoder, CodecError> {
    TreeCodecFactory::default().decoder_for(arena, schema)
}
