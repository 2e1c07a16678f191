//! Logical type to SQL column type rendering.

use crate::field::{FieldDescriptor, LogicalType};
use crate::schema::quote_identifier;

/// Renders the bare SQL type keyword for a logical type.
///
/// This is the form SQLite reports back from `PRAGMA table_info`.
pub fn render_type(logical_type: LogicalType, length: u32) -> String {
    match logical_type {
        LogicalType::Int => "INT".to_string(),
        LogicalType::Uint64 => "BIGINT".to_string(),
        LogicalType::Float => "FLOAT".to_string(),
        LogicalType::Char => format!("CHAR({length})"),
        LogicalType::Bool => "BOOL".to_string(),
        LogicalType::DateTime => "DATETIME".to_string(),
    }
}

/// Renders the column type of a descriptor including its nullability suffix.
///
/// Primary-key columns are always `NOT NULL`, whatever their nullable flag.
///
/// # Examples
///
/// ```
/// use rowbind_core::{FieldDescriptor, render};
///
/// assert_eq!(render(&FieldDescriptor::char("name", 20)), "CHAR(20) NULL");
/// assert_eq!(render(&FieldDescriptor::int("id").primary_key(true)), "INT NOT NULL");
/// ```
pub fn render(field: &FieldDescriptor) -> String {
    let suffix = if field.is_primary_key() || !field.is_nullable() {
        "NOT NULL"
    } else {
        "NULL"
    };
    format!(
        "{} {suffix}",
        render_type(field.logical_type(), field.length())
    )
}

/// Renders `"<name>" <type>` for use inside `CREATE TABLE`.
pub fn column_definition(field: &FieldDescriptor) -> String {
    format!("{} {}", quote_identifier(field.name()), render(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(render(&FieldDescriptor::int("a")), "INT NULL");
        assert_eq!(render(&FieldDescriptor::uint64("a")), "BIGINT NULL");
        assert_eq!(render(&FieldDescriptor::float("a")), "FLOAT NULL");
        assert_eq!(render(&FieldDescriptor::boolean("a")), "BOOL NULL");
        assert_eq!(render(&FieldDescriptor::datetime("a")), "DATETIME NULL");
    }

    #[test]
    fn test_char_embeds_length() {
        assert_eq!(render(&FieldDescriptor::char("a", 50)), "CHAR(50) NULL");
        assert_eq!(
            render(&FieldDescriptor::new("a", LogicalType::Char)),
            "CHAR(100) NULL"
        );
    }

    #[test]
    fn test_not_null() {
        let field = FieldDescriptor::boolean("active").nullable(false);
        assert_eq!(render(&field), "BOOL NOT NULL");
    }

    #[test]
    fn test_primary_key_is_never_null() {
        for nullable in [true, false] {
            let field = FieldDescriptor::char("code", 8)
                .nullable(nullable)
                .primary_key(true);
            assert!(render(&field).ends_with("NOT NULL"));
        }
    }

    #[test]
    fn test_column_definition() {
        let field = FieldDescriptor::int("id").primary_key(true);
        assert_eq!(column_definition(&field), r#""id" INT NOT NULL"#);

        let group = FieldDescriptor::int("group");
        assert_eq!(column_definition(&group), r#""group" INT NULL"#);
    }
}
