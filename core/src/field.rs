//! Field descriptors and the logical type system.
//!
//! A [`FieldDescriptor`] describes one column of a mapped table: which
//! entity attribute it reads from and writes to, the column name, the
//! [`LogicalType`], and its length, nullability, and primary-key flags.
//! Descriptors are immutable once built; the builder methods take `self`
//! and return a new descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column length used for CHAR fields when none is configured.
pub const DEFAULT_CHAR_LENGTH: u32 = 100;

/// Dialect-independent column type.
///
/// # Examples
///
/// ```
/// use rowbind_core::LogicalType;
///
/// assert_eq!(LogicalType::Uint64.to_string(), "UINT64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Signed integer.
    Int,
    /// 64-bit unsigned integer.
    Uint64,
    /// 32-bit floating point.
    Float,
    /// Fixed-length character string.
    Char,
    /// Boolean.
    Bool,
    /// Date and time without timezone.
    DateTime,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Int => "INT",
            LogicalType::Uint64 => "UINT64",
            LogicalType::Float => "FLOAT",
            LogicalType::Char => "CHAR",
            LogicalType::Bool => "BOOL",
            LogicalType::DateTime => "DATETIME",
        };
        f.write_str(name)
    }
}

/// Description of a single column.
///
/// `id` is the attribute name used with [`Entity::get`](crate::Entity::get)
/// and [`Entity::set`](crate::Entity::set); `name` is the SQL column name.
/// The two are equal unless set otherwise with [`with_id`](Self::with_id).
///
/// # Examples
///
/// ```
/// use rowbind_core::{FieldDescriptor, LogicalType};
///
/// let id = FieldDescriptor::int("id").primary_key(true);
/// assert!(id.is_primary_key());
///
/// let name = FieldDescriptor::char("username", 20).nullable(false);
/// assert_eq!(name.logical_type(), LogicalType::Char);
/// assert_eq!(name.length(), 20);
/// assert!(!name.is_nullable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    id: String,
    name: String,
    logical_type: LogicalType,
    length: u32,
    nullable: bool,
    primary_key: bool,
}

impl FieldDescriptor {
    /// Creates a nullable, non-key descriptor whose attribute id equals the
    /// column name.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            logical_type,
            length: DEFAULT_CHAR_LENGTH,
            nullable: true,
            primary_key: false,
        }
    }

    /// INT column.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, LogicalType::Int)
    }

    /// BIGINT column backed by a `u64` attribute.
    pub fn uint64(name: impl Into<String>) -> Self {
        Self::new(name, LogicalType::Uint64)
    }

    /// FLOAT column.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, LogicalType::Float)
    }

    /// `CHAR(length)` column.
    pub fn char(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, LogicalType::Char).with_length(length)
    }

    /// BOOL column.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, LogicalType::Bool)
    }

    /// DATETIME column.
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, LogicalType::DateTime)
    }

    /// Sets the attribute id used to access the entity.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the CHAR length. Ignored by other logical types when rendering.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Sets whether the column accepts NULL.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks the column as part of the primary key.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Attribute id on the entity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// SQL column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let field = FieldDescriptor::new("age", LogicalType::Float);
        assert_eq!(field.id(), "age");
        assert_eq!(field.name(), "age");
        assert_eq!(field.length(), DEFAULT_CHAR_LENGTH);
        assert!(field.is_nullable());
        assert!(!field.is_primary_key());
    }

    #[test]
    fn test_builders_produce_new_descriptor() {
        let base = FieldDescriptor::char("username", 20);
        let renamed = base.clone().with_id("user_name").nullable(false);
        assert_eq!(base.id(), "username");
        assert!(base.is_nullable());
        assert_eq!(renamed.id(), "user_name");
        assert_eq!(renamed.name(), "username");
        assert!(!renamed.is_nullable());
    }

    #[test]
    fn test_serde_roundtrip_preserves_flags() {
        let field = FieldDescriptor::uint64("count").primary_key(true);
        let json = serde_json::to_string(&field).unwrap();
        let back: FieldDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
