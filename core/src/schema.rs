//! Schema resolution for entity types.
//!
//! A [`Schema`] is the ordered list of [`FieldDescriptor`]s for one table.
//! It is built once per table binding, either from the descriptors an
//! entity lists itself or by parsing its annotated attributes:
//!
//! | Annotation    | Validator              | Effect                     |
//! |---------------|------------------------|----------------------------|
//! | `name`        | non-empty identifier   | column name; required      |
//! | `primary_key` | `"true"` / `"false"`   | primary-key flag           |
//! | `null`        | `"true"` / `"false"`   | nullable flag              |
//! | `length`      | positive integer       | CHAR length; required for strings |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Attribute, AttributeKind, Entity, SchemaSource};
use crate::error::{ModelError, Result};
use crate::field::{FieldDescriptor, LogicalType};

const KNOWN_ANNOTATIONS: &[&str] = &["name", "primary_key", "null", "length"];

/// Checks that a table or column name is a plain SQL identifier.
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ModelError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Double-quotes a validated identifier, so reserved words like `group`
/// work as names.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{name}\"")
}

/// Ordered column descriptors bound to a table name.
///
/// Deserialization runs the same checks as [`Schema::from_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct Schema {
    table: String,
    fields: Vec<FieldDescriptor>,
}

#[derive(Deserialize)]
struct RawSchema {
    table: String,
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<RawSchema> for Schema {
    type Error = ModelError;

    fn try_from(raw: RawSchema) -> Result<Self> {
        Self::from_fields(raw.table, raw.fields)
    }
}

impl Schema {
    /// Resolves the schema for an entity type.
    ///
    /// # Errors
    ///
    /// See [`from_fields`](Self::from_fields) and
    /// [`from_attributes`](Self::from_attributes).
    pub fn extract<E: Entity>() -> Result<Self> {
        let table = E::table_name();
        let schema = match E::schema_source() {
            SchemaSource::Explicit(fields) => Self::from_fields(table, fields)?,
            SchemaSource::Annotated(attributes) => Self::from_attributes(table, &attributes)?,
        };
        debug!(
            table = %schema.table,
            fields = schema.fields.len(),
            primary_keys = schema.primary_keys().count(),
            "Resolved schema"
        );
        Ok(schema)
    }

    /// Builds a schema from an explicit descriptor list.
    ///
    /// No primary key is required in this mode.
    ///
    /// # Errors
    ///
    /// [`ModelError::NoFieldsDeclared`] for an empty list,
    /// [`ModelError::DuplicateColumn`] for repeated column names, and
    /// [`ModelError::InvalidIdentifier`] for unsafe table or column names.
    pub fn from_fields(table: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let table = table.into();
        validate_identifier(&table)?;
        if fields.is_empty() {
            return Err(ModelError::NoFieldsDeclared(table));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            validate_identifier(field.name())?;
            if !seen.insert(field.name()) {
                return Err(ModelError::DuplicateColumn(field.name().to_string()));
            }
        }

        Ok(Self { table, fields })
    }

    /// Builds a schema by parsing annotated attributes.
    ///
    /// Attributes without a non-empty `name` annotation are skipped.
    ///
    /// # Errors
    ///
    /// Everything [`from_fields`](Self::from_fields) reports, plus
    /// [`ModelError::UnsupportedFieldType`], [`ModelError::InvalidOptionValue`],
    /// and [`ModelError::MissingPrimaryKey`].
    pub fn from_attributes(table: impl Into<String>, attributes: &[Attribute]) -> Result<Self> {
        let table = table.into();
        let mut fields = Vec::new();
        for attribute in attributes {
            if let Some(field) = parse_attribute(attribute)? {
                fields.push(field);
            }
        }

        let schema = Self::from_fields(table, fields)?;
        if schema.primary_keys().next().is_none() {
            return Err(ModelError::MissingPrimaryKey(schema.table));
        }
        Ok(schema)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Primary-key fields in schema order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_primary_key())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldDescriptor::name).collect()
    }

    /// Finds a field by column name, falling back to attribute id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownColumn`] when neither matches.
    pub fn resolve(&self, column: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name() == column)
            .or_else(|| self.fields.iter().find(|f| f.id() == column))
            .ok_or_else(|| ModelError::UnknownColumn {
                table: self.table.clone(),
                column: column.to_string(),
            })
    }
}

fn parse_attribute(attribute: &Attribute) -> Result<Option<FieldDescriptor>> {
    let name = match attribute.annotation("name") {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(None),
    };

    for (key, value) in &attribute.annotations {
        if !KNOWN_ANNOTATIONS.contains(&key.as_str()) {
            return Err(invalid_option(attribute, key, value, "unknown annotation"));
        }
    }

    let logical_type = match attribute.kind {
        AttributeKind::Integer => LogicalType::Int,
        AttributeKind::Unsigned64 => LogicalType::Uint64,
        AttributeKind::Text => LogicalType::Char,
        AttributeKind::Boolean => LogicalType::Bool,
        AttributeKind::Float32 => LogicalType::Float,
        AttributeKind::DateTime => LogicalType::DateTime,
        AttributeKind::Other(kind) => {
            return Err(ModelError::UnsupportedFieldType {
                attribute: attribute.id.clone(),
                kind: kind.to_string(),
            });
        }
    };

    let mut field = FieldDescriptor::new(name, logical_type).with_id(attribute.id.as_str());

    if let Some(value) = attribute.annotation("primary_key") {
        field = field.primary_key(parse_bool(attribute, "primary_key", value)?);
    }
    if let Some(value) = attribute.annotation("null") {
        field = field.nullable(parse_bool(attribute, "null", value)?);
    }
    match attribute.annotation("length") {
        Some(value) => field = field.with_length(parse_length(attribute, value)?),
        None if logical_type == LogicalType::Char => {
            return Err(invalid_option(
                attribute,
                "length",
                "",
                "string columns require an explicit length",
            ));
        }
        None => {}
    }

    Ok(Some(field))
}

fn parse_bool(attribute: &Attribute, option: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_option(attribute, option, value, "expected \"true\" or \"false\"")),
    }
}

fn parse_length(attribute: &Attribute, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(length) if length > 0 => Ok(length),
        _ => Err(invalid_option(attribute, "length", value, "expected a positive integer")),
    }
}

fn invalid_option(attribute: &Attribute, option: &str, value: &str, reason: &str) -> ModelError {
    ModelError::InvalidOptionValue {
        attribute: attribute.id.clone(),
        option: option.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
