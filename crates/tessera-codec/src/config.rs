//! Codec configuration.

use serde::Deserialize;

/// How extension payloads are written to the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryEncoding {
    /// [`Node::Binary`](crate::Node::Binary), for trees that carry bytes.
    #[default]
    Native,
    /// Standard base64 text, for trees bound for plain JSON.
    Base64,
}

/// Settings shared by every codec a factory synthesizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub binary: BinaryEncoding,
    /// Maximum nesting accepted while encoding or decoding. Every kind except
    /// optional adds one level.
    pub max_depth: u32,
}

pub const DEFAULT_MAX_DEPTH: u32 = 256;

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            binary: BinaryEncoding::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    pub fn with_binary(mut self, binary: BinaryEncoding) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
