//! Error types for schema construction, schema access and generic values.

use std::fmt;

use crate::kind::Kind;

/// Errors raised while building or inspecting schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A kind-specific accessor was used on a schema of another kind.
    #[error("type mismatch: expected {expected} schema, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error(transparent)]
    BuilderState(#[from] BuilderStateError),

    /// A self-description named a kind that does not exist.
    #[error("unknown schema kind `{0}`")]
    UnknownKind(String),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A builder was used in a way its kind does not allow, or a placeholder was
/// used before or after its time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderStateError {
    #[error("{attribute} is not an attribute of {kind} schemas")]
    Foreign { kind: Kind, attribute: Attribute },

    #[error("{attribute} of {kind} schema is already set")]
    AlreadySet { kind: Kind, attribute: Attribute },

    #[error("{kind} schema requires {attribute}")]
    Missing { kind: Kind, attribute: Attribute },

    #[error("field `{0}` is already set")]
    DuplicateField(String),

    #[error("duplicate enum symbol `{0}`")]
    DuplicateSymbol(String),

    #[error("union requires at least two branch schemas, got {0}")]
    TooFewBranches(usize),

    #[error("union branches {first} and {second} are structurally equal")]
    DuplicateBranch { first: usize, second: usize },

    #[error("fixed size array size must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidSize(i64),

    #[error("record `{record}` reaches itself through field `{field}` without an optional, array, set, map or union in between")]
    DirectSelfReference { record: String, field: String },

    #[error("fields of record `{0}` read before its placeholder was filled")]
    Unfilled(String),

    #[error("placeholder of record `{0}` is already filled")]
    AlreadyFilled(String),

    #[error("no enclosing record named `{0}`")]
    DanglingReference(String),

    #[error("reference to record `{0}` is shadowed by a nested record of the same name")]
    ShadowedReference(String),
}

/// Settable attributes of a schema builder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Attribute {
    Name,
    Symbols,
    TagSchema,
    ElementSchema,
    Size,
    KeySchema,
    ValueSchema,
    BranchSchemas,
    FieldSchemas,
    Placeholder,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Symbols => "enum symbols",
            Attribute::TagSchema => "tag schema",
            Attribute::ElementSchema => "element schema",
            Attribute::Size => "size",
            Attribute::KeySchema => "key schema",
            Attribute::ValueSchema => "value schema",
            Attribute::BranchSchemas => "branch schemas",
            Attribute::FieldSchemas => "field schemas",
            Attribute::Placeholder => "placeholder",
        }
    }

    /// Whether builders of `kind` accept this attribute.
    pub fn applies_to(self, kind: Kind) -> bool {
        match self {
            Attribute::Name => kind.is_named(),
            Attribute::Symbols => kind == Kind::Enum,
            Attribute::TagSchema => kind == Kind::Extension,
            Attribute::ElementSchema => kind.has_element(),
            Attribute::Size => kind == Kind::FixedSizeArray,
            Attribute::KeySchema | Attribute::ValueSchema => kind == Kind::Map,
            Attribute::BranchSchemas => kind == Kind::Union,
            Attribute::FieldSchemas | Attribute::Placeholder => kind == Kind::Record,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by typed access to generic values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("type mismatch: expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("record has no field `{0}`")]
    MissingField(String),
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
