//! Schema kinds.
//!
//! Every schema node has exactly one kind. The first fifteen are leaf kinds
//! with no parameters; the rest are parameterized by names, symbols, sizes or
//! child schemas.

use std::fmt;

/// The closed set of schema kinds.
///
/// Discriminants are stable and follow declaration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    Unsigned8 = 0,
    Unsigned16 = 1,
    Unsigned32 = 2,
    Unsigned64 = 3,
    UnsignedBig = 4,
    Signed8 = 5,
    Signed16 = 6,
    Signed32 = 7,
    Signed64 = 8,
    SignedBig = 9,
    Float32 = 10,
    Float64 = 11,
    FloatBig = 12,
    Boolean = 13,
    String = 14,
    Enum = 15,
    Extension = 16,
    Array = 17,
    FixedSizeArray = 18,
    Set = 19,
    Map = 20,
    Union = 21,
    Optional = 22,
    Record = 23,
}

impl Kind {
    pub const ALL: [Kind; 24] = [
        Kind::Unsigned8,
        Kind::Unsigned16,
        Kind::Unsigned32,
        Kind::Unsigned64,
        Kind::UnsignedBig,
        Kind::Signed8,
        Kind::Signed16,
        Kind::Signed32,
        Kind::Signed64,
        Kind::SignedBig,
        Kind::Float32,
        Kind::Float64,
        Kind::FloatBig,
        Kind::Boolean,
        Kind::String,
        Kind::Enum,
        Kind::Extension,
        Kind::Array,
        Kind::FixedSizeArray,
        Kind::Set,
        Kind::Map,
        Kind::Union,
        Kind::Optional,
        Kind::Record,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    /// Lower-case name used when rendering schemas.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Unsigned8 => "unsigned_8",
            Kind::Unsigned16 => "unsigned_16",
            Kind::Unsigned32 => "unsigned_32",
            Kind::Unsigned64 => "unsigned_64",
            Kind::UnsignedBig => "unsigned_big",
            Kind::Signed8 => "signed_8",
            Kind::Signed16 => "signed_16",
            Kind::Signed32 => "signed_32",
            Kind::Signed64 => "signed_64",
            Kind::SignedBig => "signed_big",
            Kind::Float32 => "float_32",
            Kind::Float64 => "float_64",
            Kind::FloatBig => "float_big",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Enum => "enum",
            Kind::Extension => "extension",
            Kind::Array => "array",
            Kind::FixedSizeArray => "fixed_size_array",
            Kind::Set => "set",
            Kind::Map => "map",
            Kind::Union => "union",
            Kind::Optional => "optional",
            Kind::Record => "record",
        }
    }

    /// Upper-case symbol used by the self-describing `type` enum.
    pub fn symbol(self) -> &'static str {
        match self {
            Kind::Unsigned8 => "UNSIGNED_8",
            Kind::Unsigned16 => "UNSIGNED_16",
            Kind::Unsigned32 => "UNSIGNED_32",
            Kind::Unsigned64 => "UNSIGNED_64",
            Kind::UnsignedBig => "UNSIGNED_BIG",
            Kind::Signed8 => "SIGNED_8",
            Kind::Signed16 => "SIGNED_16",
            Kind::Signed32 => "SIGNED_32",
            Kind::Signed64 => "SIGNED_64",
            Kind::SignedBig => "SIGNED_BIG",
            Kind::Float32 => "FLOAT_32",
            Kind::Float64 => "FLOAT_64",
            Kind::FloatBig => "FLOAT_BIG",
            Kind::Boolean => "BOOLEAN",
            Kind::String => "STRING",
            Kind::Enum => "ENUM",
            Kind::Extension => "EXTENSION",
            Kind::Array => "ARRAY",
            Kind::FixedSizeArray => "FIXED_SIZE_ARRAY",
            Kind::Set => "SET",
            Kind::Map => "MAP",
            Kind::Union => "UNION",
            Kind::Optional => "OPTIONAL",
            Kind::Record => "RECORD",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.symbol() == symbol)
    }

    pub fn is_primitive(self) -> bool {
        (self as u8) <= Kind::String as u8
    }

    /// Enum and record schemas carry a name.
    pub fn is_named(self) -> bool {
        matches!(self, Kind::Enum | Kind::Record)
    }

    /// Kinds parameterized by a single element schema.
    pub fn has_element(self) -> bool {
        matches!(
            self,
            Kind::Array | Kind::FixedSizeArray | Kind::Set | Kind::Optional
        )
    }

    /// Kinds through which a record may legally reach itself again.
    ///
    /// Each of these admits a finite value (absent, empty, or another branch)
    /// so a recursive record built through them still has finite instances.
    pub fn breaks_recursion(self) -> bool {
        matches!(
            self,
            Kind::Optional | Kind::Array | Kind::Set | Kind::Map | Kind::Union
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fifteen parameterless leaf kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Primitive {
    Unsigned8 = 0,
    Unsigned16 = 1,
    Unsigned32 = 2,
    Unsigned64 = 3,
    UnsignedBig = 4,
    Signed8 = 5,
    Signed16 = 6,
    Signed32 = 7,
    Signed64 = 8,
    SignedBig = 9,
    Float32 = 10,
    Float64 = 11,
    FloatBig = 12,
    Boolean = 13,
    String = 14,
}

impl Primitive {
    pub const ALL: [Primitive; 15] = [
        Primitive::Unsigned8,
        Primitive::Unsigned16,
        Primitive::Unsigned32,
        Primitive::Unsigned64,
        Primitive::UnsignedBig,
        Primitive::Signed8,
        Primitive::Signed16,
        Primitive::Signed32,
        Primitive::Signed64,
        Primitive::SignedBig,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::FloatBig,
        Primitive::Boolean,
        Primitive::String,
    ];

    /// Primitive and kind discriminants coincide.
    pub fn kind(self) -> Kind {
        Kind::ALL[self as usize]
    }

    pub fn from_kind(kind: Kind) -> Option<Self> {
        Self::ALL.get(kind as usize).copied()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().name())
    }
}
