//! Error types for schema construction and statement building.
//!
//! Every failure detected while resolving a schema, reading an entity, or
//! materializing a statement is reported through [`ModelError`]. None of
//! them are recoverable inside the crate; they are returned to the caller.

use thiserror::Error;

/// Errors raised by the mapping model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An annotated attribute has a type with no logical-type mapping.
    #[error("unsupported type '{kind}' of attribute '{attribute}'")]
    UnsupportedFieldType {
        /// Attribute id.
        attribute: String,
        /// Name of the offending Rust type.
        kind: String,
    },

    /// A per-attribute annotation failed its validator.
    #[error("invalid value '{value}' for option '{option}' of attribute '{attribute}': {reason}")]
    InvalidOptionValue {
        /// Attribute id.
        attribute: String,
        /// Annotation key (e.g. `length`).
        option: String,
        /// Raw annotation value.
        value: String,
        /// What the validator expected.
        reason: String,
    },

    /// The schema resolved to zero fields.
    #[error("no fields declared for table '{0}'")]
    NoFieldsDeclared(String),

    /// An annotated schema has no primary key, or a row-targeting statement
    /// was requested on a schema without one.
    #[error("table '{0}' has no primary key")]
    MissingPrimaryKey(String),

    /// Two fields share the same column name.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A table or column name is not a plain SQL identifier.
    #[error("invalid identifier '{0}': must start with a letter or underscore and contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// A filter or ordering references a column the schema does not have.
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name or attribute id as given by the caller.
        column: String,
    },

    /// The entity does not expose an attribute the schema refers to.
    #[error("entity for table '{table}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// Table name.
        table: String,
        /// Attribute id.
        attribute: String,
    },

    /// A value could not be stored in an entity attribute.
    #[error("attribute '{attribute}' expects {expected}, found {found}")]
    TypeMismatch {
        /// Attribute id.
        attribute: String,
        /// Expected value kind.
        expected: String,
        /// Received value kind.
        found: String,
    },

    /// A result row does not line up with the schema.
    #[error("table '{table}' row has {found} columns, schema declares {expected}")]
    ColumnCountMismatch {
        /// Table name.
        table: String,
        /// Number of schema fields.
        expected: usize,
        /// Number of columns in the row.
        found: usize,
    },
}

/// Convenience alias for results with [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;
