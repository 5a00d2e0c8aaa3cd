//! Codec errors.
//!
//! Paths point at the offending node in the tree, e.g. `c.c1` or `items[2].k`.

use tessera_core::{Kind, SchemaError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// The schema reaches a kind that has no tree encoding.
    #[error("schema type: '{0}' is unsupported by the tree codec")]
    UnsupportedKind(Kind),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A value's runtime tag does not fit the schema it is encoded with.
    #[error("{}expected {expected} value, found {found}", location(.path))]
    TypeMismatch {
        path: String,
        expected: Kind,
        found: &'static str,
    },

    #[error("nesting depth limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: u32 },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A tree or value that does not conform to the schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}{kind}", location(.path))]
pub struct DecodeError {
    pub path: String,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(path: &str, kind: DecodeErrorKind) -> Self {
        Self {
            path: format_path(path),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("expected {expected}, found {found}")]
    WrongNode {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected {expected} elements, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("branch index {index} out of range for union of {branches}")]
    BranchOutOfRange { index: i64, branches: usize },

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("unexpected field `{0}`")]
    UnexpectedField(String),

    #[error("`{symbol}` is not a symbol of enum `{name}`")]
    UnknownSymbol { name: String, symbol: String },

    #[error("expected enum `{expected}`, found `{found}`")]
    EnumNameMismatch { expected: String, found: String },

    #[error("{value} is out of range for {kind}")]
    OutOfRange { kind: Kind, value: String },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Strip the leading separator of a traversal path.
pub(crate) fn format_path(path: &str) -> String {
    path.strip_prefix('.').unwrap_or(path).to_owned()
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("at `{path}`: ")
    }
}
