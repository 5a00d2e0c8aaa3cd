//! Schemas described as values.
//!
//! [`schema_schema`] builds a recursive record schema whose instances describe
//! arbitrary schemas, so a schema graph can be encoded with the same codecs as
//! any other value. [`describe`] turns a schema into such an instance and
//! [`rebuild`] turns it back.
//!
//! A record that is already being described further up is emitted as a
//! reference: kind `RECORD` with its name and no `field_schemas`. Rebuilding
//! resolves a reference to the nearest enclosing record of that name, so a
//! record cannot be described when a nested record of the same name stands
//! between it and a reference to it.

use crate::arena::{SchemaArena, SchemaId};
use crate::builder::SchemaBuilder;
use crate::error::{Attribute, BuilderStateError, Result, SchemaError};
use crate::kind::{Kind, Primitive};
use crate::schema::Schema;
use crate::value::{GenericRecord, Value, ValueMap, ValueSet};

pub const SCHEMA_RECORD_NAME: &str = "schema";
pub const KIND_ENUM_NAME: &str = "type";

const FIELD_TYPE: &str = "type";
const FIELD_NAME: &str = "name";
const FIELD_ENUM_SYMBOLS: &str = "enum_symbols";
const FIELD_TAG_SCHEMA: &str = "tag_schema";
const FIELD_SIZE: &str = "size";
const FIELD_KEY_SCHEMA: &str = "key_schema";
const FIELD_VALUE_SCHEMA: &str = "value_schema";
const FIELD_BRANCH_SCHEMAS: &str = "branch_schemas";
const FIELD_FIELD_SCHEMAS: &str = "field_schemas";
const FIELD_ELEMENT_SCHEMA: &str = "element_schema";

/// Build the schema that describes schemas.
pub fn schema_schema(arena: &mut SchemaArena) -> Result<SchemaId> {
    let mut builder = SchemaBuilder::record(SCHEMA_RECORD_NAME);
    let this = builder.placeholder(arena)?;

    let kind = arena.enumeration(KIND_ENUM_NAME, Kind::ALL.iter().map(|k| k.symbol()))?;
    let name = arena.optional(SchemaId::STRING);
    let symbols = arena.set(SchemaId::STRING);
    let symbols = arena.optional(symbols);
    let child = arena.optional(this);
    let size = arena.optional(SchemaId::SIGNED_32);
    let branches = arena.array(this);
    let branches = arena.optional(branches);
    let fields = arena.map(SchemaId::STRING, this);
    let fields = arena.optional(fields);

    builder
        .set_field_schema(FIELD_TYPE, kind)?
        .set_field_schema(FIELD_NAME, name)?
        .set_field_schema(FIELD_ENUM_SYMBOLS, symbols)?
        .set_field_schema(FIELD_TAG_SCHEMA, child)?
        .set_field_schema(FIELD_SIZE, size)?
        .set_field_schema(FIELD_KEY_SCHEMA, child)?
        .set_field_schema(FIELD_VALUE_SCHEMA, child)?
        .set_field_schema(FIELD_BRANCH_SCHEMAS, branches)?
        .set_field_schema(FIELD_FIELD_SCHEMAS, fields)?
        .set_field_schema(FIELD_ELEMENT_SCHEMA, child)?;
    builder.build(arena)
}

/// Describe `id` as an instance of `meta`, the result of [`schema_schema`].
pub fn describe(arena: &SchemaArena, meta: SchemaId, id: SchemaId) -> Result<GenericRecord> {
    Describer {
        arena,
        meta,
        open: Vec::new(),
    }
    .describe(id)
}

/// Rebuild a schema in `arena` from a description produced by [`describe`].
pub fn rebuild(arena: &mut SchemaArena, description: &GenericRecord) -> Result<SchemaId> {
    Rebuilder { open: Vec::new() }.rebuild(arena, description)
}

// ============================================================================
// Describe
// ============================================================================

struct Describer<'a> {
    arena: &'a SchemaArena,
    meta: SchemaId,
    /// Records whose description is under way, outermost first.
    open: Vec<SchemaId>,
}

#[derive(Default)]
struct Description {
    name: Option<Value>,
    enum_symbols: Option<Value>,
    tag_schema: Option<Value>,
    size: Option<Value>,
    key_schema: Option<Value>,
    value_schema: Option<Value>,
    branch_schemas: Option<Value>,
    field_schemas: Option<Value>,
    element_schema: Option<Value>,
}

impl Describer<'_> {
    fn child(&mut self, id: SchemaId) -> Result<Option<Value>> {
        Ok(Some(Value::Record(self.describe(id)?)))
    }

    fn describe(&mut self, id: SchemaId) -> Result<GenericRecord> {
        let arena = self.arena;
        let schema = arena.get(id);
        let mut d = Description::default();

        match schema {
            Schema::Primitive(_) => {}
            Schema::Enum(e) => {
                d.name = Some(Value::from(e.name()));
                let symbols: ValueSet = e
                    .symbols()
                    .iter()
                    .map(|s| Value::from(s.as_str()))
                    .collect();
                d.enum_symbols = Some(Value::Set(symbols));
            }
            Schema::Extension(e) => d.tag_schema = self.child(e.tag())?,
            Schema::Array(_) | Schema::Set(_) | Schema::Optional(_) => {
                d.element_schema = self.child(schema.element()?)?;
            }
            Schema::FixedSizeArray(a) => {
                d.size = Some(Value::Signed32(i32::try_from(a.size()).unwrap_or(i32::MAX)));
                d.element_schema = self.child(a.element())?;
            }
            Schema::Map(m) => {
                d.key_schema = self.child(m.key())?;
                d.value_schema = self.child(m.value())?;
            }
            Schema::Union(u) => {
                let branches = u
                    .branches()
                    .iter()
                    .map(|&b| self.describe(b).map(Value::Record))
                    .collect::<Result<Vec<_>>>()?;
                d.branch_schemas = Some(Value::Array(branches));
            }
            Schema::Record(r) => {
                d.name = Some(Value::from(r.name()));
                if self.open.contains(&id) {
                    // References resolve to the nearest enclosing record of that name
                    let nearest = self
                        .open
                        .iter()
                        .rev()
                        .find(|&&open| arena.name(open) == Some(r.name()));
                    if nearest != Some(&id) {
                        let name = r.name().to_owned();
                        return Err(BuilderStateError::ShadowedReference(name).into());
                    }
                } else {
                    self.open.push(id);
                    let mut fields = ValueMap::new();
                    for (name, &field) in r.fields()? {
                        let field = self.describe(field)?;
                        fields.insert(Value::from(name.as_str()), Value::Record(field));
                    }
                    self.open.pop();
                    d.field_schemas = Some(Value::Map(fields));
                }
            }
        }

        let optional = |v: Option<Value>| Value::Optional(v.map(Box::new));
        Ok(GenericRecord::new(
            self.meta,
            [
                (FIELD_TYPE, Value::Enum(schema.kind().symbol().to_owned())),
                (FIELD_NAME, optional(d.name)),
                (FIELD_ENUM_SYMBOLS, optional(d.enum_symbols)),
                (FIELD_TAG_SCHEMA, optional(d.tag_schema)),
                (FIELD_SIZE, optional(d.size)),
                (FIELD_KEY_SCHEMA, optional(d.key_schema)),
                (FIELD_VALUE_SCHEMA, optional(d.value_schema)),
                (FIELD_BRANCH_SCHEMAS, optional(d.branch_schemas)),
                (FIELD_FIELD_SCHEMAS, optional(d.field_schemas)),
                (FIELD_ELEMENT_SCHEMA, optional(d.element_schema)),
            ],
        ))
    }
}

// ============================================================================
// Rebuild
// ============================================================================

struct Rebuilder {
    /// Builders of the records enclosing the current description, outermost
    /// first.
    open: Vec<SchemaBuilder>,
}

/// Value of an optional field of a description, `None` when absent.
fn attribute<'a>(description: &'a GenericRecord, field: &str) -> Result<Option<&'a Value>> {
    Ok(description.get(field)?.as_optional()?)
}

fn required<'a>(
    description: &'a GenericRecord,
    field: &str,
    kind: Kind,
    missing: Attribute,
) -> Result<&'a Value> {
    attribute(description, field)?.ok_or_else(|| {
        BuilderStateError::Missing {
            kind,
            attribute: missing,
        }
        .into()
    })
}

impl Rebuilder {
    fn child(&mut self, arena: &mut SchemaArena, value: &Value) -> Result<SchemaId> {
        self.rebuild(arena, value.as_record()?)
    }

    fn rebuild(
        &mut self,
        arena: &mut SchemaArena,
        description: &GenericRecord,
    ) -> Result<SchemaId> {
        let symbol = description.get(FIELD_TYPE)?.as_enum()?;
        let kind = Kind::from_symbol(symbol)
            .ok_or_else(|| SchemaError::UnknownKind(symbol.to_owned()))?;
        if let Some(p) = Primitive::from_kind(kind) {
            return Ok(SchemaId::primitive(p));
        }
        if kind == Kind::Record {
            return self.rebuild_record(arena, description);
        }

        let mut builder = SchemaBuilder::new(kind);
        if let Some(name) = attribute(description, FIELD_NAME)? {
            builder.set_name(name.as_str()?)?;
        }
        if let Some(symbols) = attribute(description, FIELD_ENUM_SYMBOLS)? {
            let symbols = symbols
                .as_set()?
                .iter()
                .map(|s| s.as_str().map(str::to_owned))
                .collect::<Result<Vec<_>, _>>()?;
            builder.set_symbols(symbols)?;
        }
        if let Some(tag) = attribute(description, FIELD_TAG_SCHEMA)? {
            let tag = self.child(arena, tag)?;
            builder.set_tag_schema(tag)?;
        }
        if let Some(size) = attribute(description, FIELD_SIZE)? {
            builder.set_size(i64::from(*size.as_signed_32()?))?;
        }
        if let Some(key) = attribute(description, FIELD_KEY_SCHEMA)? {
            let key = self.child(arena, key)?;
            builder.set_key_schema(key)?;
        }
        if let Some(value) = attribute(description, FIELD_VALUE_SCHEMA)? {
            let value = self.child(arena, value)?;
            builder.set_value_schema(value)?;
        }
        if let Some(branches) = attribute(description, FIELD_BRANCH_SCHEMAS)? {
            for branch in branches.as_array()? {
                let branch = self.child(arena, branch)?;
                builder.add_branch_schema(branch)?;
            }
        }
        if let Some(element) = attribute(description, FIELD_ELEMENT_SCHEMA)? {
            let element = self.child(arena, element)?;
            builder.set_element_schema(element)?;
        }
        builder.build(arena)
    }

    fn rebuild_record(
        &mut self,
        arena: &mut SchemaArena,
        description: &GenericRecord,
    ) -> Result<SchemaId> {
        let name = required(description, FIELD_NAME, Kind::Record, Attribute::Name)?.as_str()?;

        let Some(fields) = attribute(description, FIELD_FIELD_SCHEMAS)? else {
            // Reference to an enclosing record
            let Some(depth) = self.open.iter().rposition(|b| b.name() == Some(name)) else {
                return Err(BuilderStateError::DanglingReference(name.to_owned()).into());
            };
            return self.open[depth].placeholder(arena);
        };

        let depth = self.open.len();
        self.open.push(SchemaBuilder::record(name));
        for (field, schema) in fields.as_map()?.iter() {
            let field = field.as_str()?;
            let schema = self.child(arena, schema)?;
            self.open[depth].set_field_schema(field, schema)?;
        }
        self.open.remove(depth).build(arena)
    }
}
