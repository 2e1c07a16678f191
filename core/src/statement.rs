//! Parameterized SQL generation for schema-bound entities.
//!
//! Every builder reads values from the entity through the schema's
//! descriptors and returns the SQL text with `?` placeholders alongside the
//! parameters in placeholder order. No builder touches a database.

use crate::entity::Entity;
use crate::error::{ModelError, Result};
use crate::field::FieldDescriptor;
use crate::mapper::column_definition;
use crate::schema::{Schema, quote_identifier};
use crate::value::Value;

/// SQL text with positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Renders `CREATE TABLE` for a schema.
///
/// # Examples
///
/// ```
/// use rowbind_core::{FieldDescriptor, Schema, build_create};
///
/// let schema = Schema::from_fields(
///     "User",
///     vec![FieldDescriptor::int("id").primary_key(true), FieldDescriptor::char("name", 20)],
/// )
/// .unwrap();
/// assert_eq!(
///     build_create(&schema, true),
///     r#"CREATE TABLE IF NOT EXISTS "User" ("id" INT NOT NULL, "name" CHAR(20) NULL, PRIMARY KEY("id"))"#
/// );
/// ```
pub fn build_create(schema: &Schema, if_not_exists: bool) -> String {
    let mut columns: Vec<String> = schema.fields().iter().map(column_definition).collect();

    let keys: Vec<String> = schema
        .primary_keys()
        .map(|f| quote_identifier(f.name()))
        .collect();
    if !keys.is_empty() {
        columns.push(format!("PRIMARY KEY({})", keys.join(",")));
    }

    format!(
        "CREATE TABLE {}{} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_identifier(schema.table()),
        columns.join(", ")
    )
}

/// Renders `DROP TABLE` for a schema.
pub fn build_drop(schema: &Schema, if_exists: bool) -> String {
    format!(
        "DROP TABLE {}{}",
        if if_exists { "IF EXISTS " } else { "" },
        quote_identifier(schema.table())
    )
}

/// `INSERT` of every field, values in schema order.
pub fn build_insert<E: Entity>(schema: &Schema, instance: &E) -> Result<Statement> {
    let params = read_values(schema, instance, schema.fields().iter())?;
    let placeholders = vec!["?"; params.len()];
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(schema.table()),
            quoted_columns(schema).join(", "),
            placeholders.join(", ")
        ),
        params,
    })
}

/// `UPDATE` of every field, restricted to the row's primary key.
///
/// Parameters are the SET values followed by the key values. Key values are
/// assumed not to change across an update.
pub fn build_update<E: Entity>(schema: &Schema, instance: &E) -> Result<Statement> {
    let (condition, key_params) = key_condition(schema, instance)?;
    let mut params = read_values(schema, instance, schema.fields().iter())?;
    params.extend(key_params);

    let assignments: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| format!("{} = ?", quote_identifier(f.name())))
        .collect();

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {condition}",
            quote_identifier(schema.table()),
            assignments.join(", ")
        ),
        params,
    })
}

/// `DELETE` of the row identified by the instance's primary key.
pub fn build_delete<E: Entity>(schema: &Schema, instance: &E) -> Result<Statement> {
    let (condition, params) = key_condition(schema, instance)?;
    Ok(Statement {
        sql: format!("DELETE FROM {} WHERE {condition}", quote_identifier(schema.table())),
        params,
    })
}

/// `SELECT COUNT(*)` of rows sharing the instance's primary key.
pub fn build_count<E: Entity>(schema: &Schema, instance: &E) -> Result<Statement> {
    let (condition, params) = key_condition(schema, instance)?;
    Ok(Statement {
        sql: format!(
            "SELECT COUNT(*) FROM {} WHERE {condition}",
            quote_identifier(schema.table())
        ),
        params,
    })
}

fn key_condition<E: Entity>(schema: &Schema, instance: &E) -> Result<(String, Vec<Value>)> {
    let keys: Vec<&FieldDescriptor> = schema.primary_keys().collect();
    if keys.is_empty() {
        return Err(ModelError::MissingPrimaryKey(schema.table().to_string()));
    }
    let condition = keys
        .iter()
        .map(|f| format!("{} = ?", quote_identifier(f.name())))
        .collect::<Vec<_>>()
        .join(" AND ");
    let params = read_values(schema, instance, keys.into_iter())?;
    Ok((condition, params))
}

fn quoted_columns(schema: &Schema) -> Vec<String> {
    schema
        .fields()
        .iter()
        .map(|f| quote_identifier(f.name()))
        .collect()
}

fn read_values<'a, E: Entity>(
    schema: &Schema,
    instance: &E,
    fields: impl Iterator<Item = &'a FieldDescriptor>,
) -> Result<Vec<Value>> {
    fields
        .map(|f| {
            instance.get(f.id()).ok_or_else(|| ModelError::MissingAttribute {
                table: schema.table().to_string(),
                attribute: f.id().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SchemaSource;
    use crate::value::convert;

    #[derive(Debug, Default)]
    struct Membership {
        user_id: i64,
        group_id: i64,
        role: String,
    }

    impl Entity for Membership {
        fn schema_source() -> SchemaSource {
            SchemaSource::Explicit(vec![
                FieldDescriptor::int("user_id").primary_key(true),
                FieldDescriptor::int("group_id").primary_key(true),
                FieldDescriptor::char("role", 16).nullable(false),
            ])
        }

        fn get(&self, id: &str) -> Option<Value> {
            match id {
                "user_id" => Some(Value::Int(self.user_id)),
                "group_id" => Some(Value::Int(self.group_id)),
                "role" => Some(Value::Text(self.role.clone())),
                _ => None,
            }
        }

        fn set(&mut self, id: &str, value: Value) -> Result<()> {
            match id {
                "user_id" => self.user_id = convert(id, &value)?,
                "group_id" => self.group_id = convert(id, &value)?,
                "role" => self.role = convert(id, &value)?,
                _ => {}
            }
            Ok(())
        }
    }

    fn membership() -> (Schema, Membership) {
        let schema = Schema::extract::<Membership>().unwrap();
        let row = Membership {
            user_id: 7,
            group_id: 3,
            role: "admin".into(),
        };
        (schema, row)
    }

    #[test]
    fn test_create_with_composite_key() {
        let (schema, _) = membership();
        assert_eq!(
            build_create(&schema, false),
            "CREATE TABLE \"Membership\" (\"user_id\" INT NOT NULL, \"group_id\" INT NOT NULL, \
             \"role\" CHAR(16) NOT NULL, PRIMARY KEY(\"user_id\",\"group_id\"))"
        );
    }

    #[test]
    fn test_create_without_key_has_no_constraint() {
        let schema = Schema::from_fields("Log", vec![FieldDescriptor::int("level")]).unwrap();
        assert_eq!(build_create(&schema, false), r#"CREATE TABLE "Log" ("level" INT NULL)"#);
    }

    #[test]
    fn test_drop() {
        let (schema, _) = membership();
        assert_eq!(build_drop(&schema, true), r#"DROP TABLE IF EXISTS "Membership""#);
        assert_eq!(build_drop(&schema, false), r#"DROP TABLE "Membership""#);
    }

    #[test]
    fn test_insert() {
        let (schema, row) = membership();
        let stmt = build_insert(&schema, &row).unwrap();
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "Membership" ("user_id", "group_id", "role") VALUES (?, ?, ?)"#
        );
        assert_eq!(
            stmt.params,
            vec![Value::Int(7), Value::Int(3), Value::Text("admin".into())]
        );
    }

    #[test]
    fn test_update_params_follow_placeholders() {
        let (schema, row) = membership();
        let stmt = build_update(&schema, &row).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE \"Membership\" SET \"user_id\" = ?, \"group_id\" = ?, \"role\" = ? \
             WHERE \"user_id\" = ? AND \"group_id\" = ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Value::Int(7),
                Value::Int(3),
                Value::Text("admin".into()),
                Value::Int(7),
                Value::Int(3),
            ]
        );
    }

    #[test]
    fn test_delete_and_count_use_keys_only() {
        let (schema, row) = membership();
        let delete = build_delete(&schema, &row).unwrap();
        assert_eq!(
            delete.sql,
            r#"DELETE FROM "Membership" WHERE "user_id" = ? AND "group_id" = ?"#
        );
        assert_eq!(delete.params, vec![Value::Int(7), Value::Int(3)]);

        let count = build_count(&schema, &row).unwrap();
        assert_eq!(
            count.sql,
            r#"SELECT COUNT(*) FROM "Membership" WHERE "user_id" = ? AND "group_id" = ?"#
        );
        assert_eq!(count.params, delete.params);
    }

    #[test]
    fn test_row_statements_need_a_key() {
        let schema = Schema::from_fields("Membership", vec![FieldDescriptor::char("role", 16)])
            .unwrap();
        let row = Membership::default();
        assert_eq!(
            build_delete(&schema, &row).unwrap_err(),
            ModelError::MissingPrimaryKey("Membership".into())
        );
        assert!(build_insert(&schema, &row).is_ok());
    }

    #[test]
    fn test_missing_attribute() {
        let schema = Schema::from_fields("Membership", vec![FieldDescriptor::int("ghost")]).unwrap();
        let err = build_insert(&schema, &Membership::default()).unwrap_err();
        assert!(matches!(err, ModelError::MissingAttribute { ref attribute, .. } if attribute == "ghost"));
    }

    #[test]
    fn test_reserved_words_are_quoted() {
        let schema = Schema::from_fields(
            "Order",
            vec![FieldDescriptor::int("id").primary_key(true), FieldDescriptor::int("group")],
        )
        .unwrap();
        assert_eq!(
            build_create(&schema, false),
            r#"CREATE TABLE "Order" ("id" INT NOT NULL, "group" INT NULL, PRIMARY KEY("id"))"#
        );
    }
}
