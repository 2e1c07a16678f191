//! Record-to-table mapping model.
//!
//! This crate defines everything needed to turn a Rust record type into a
//! relational table description and into parameterized SQL, without
//! touching a database:
//!
//! - [`FieldDescriptor`] and [`LogicalType`]: one column's metadata.
//! - [`render`]: logical type to SQL column type.
//! - [`Entity`]: the contract a mapped record implements, with the
//!   [`entity!`] macro for annotated structs.
//! - [`Schema`]: ordered descriptors for a table, resolved from an
//!   explicit list or from annotated attributes.
//! - [`build_create`], [`build_insert`], [`build_update`], [`build_delete`],
//!   [`build_count`]: statement builders.
//! - [`QuerySpec`]: chainable filter/order/limit/offset accumulator.
//!
//! Execution lives in `rowbind-sqlite`.
//!
//! # Example
//!
//! ```
//! use rowbind_core::*;
//!
//! rowbind_core::entity! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct User {
//!         pub id: i32 => [name = "id", primary_key = "true"],
//!         pub username: String => [name = "username", length = "20"],
//!         pub active: bool => [name = "active", null = "false"],
//!     }
//! }
//!
//! let schema = Schema::extract::<User>().unwrap();
//! assert_eq!(
//!     build_create(&schema, false),
//!     r#"CREATE TABLE "User" ("id" INT NOT NULL, "username" CHAR(20) NULL, "active" BOOL NOT NULL, PRIMARY KEY("id"))"#
//! );
//!
//! let user = User { id: 1, username: "ann".into(), active: true };
//! let insert = build_insert(&schema, &user).unwrap();
//! assert_eq!(insert.params.len(), 3);
//! ```

mod entity;
mod error;
mod field;
mod mapper;
mod query;
mod schema;
mod statement;
mod value;

pub use entity::{Attribute, AttributeKind, Entity, FieldKind, SchemaSource};
pub use error::{ModelError, Result};
pub use field::{DEFAULT_CHAR_LENGTH, FieldDescriptor, LogicalType};
pub use mapper::{column_definition, render, render_type};
pub use query::{DEFAULT_LIMIT, Direction, Operator, Ordering, Predicate, QuerySpec};
pub use schema::Schema;
pub use statement::{
    Statement, build_count, build_create, build_delete, build_drop, build_insert, build_update,
};
pub use value::{FromValue, IntoValue, Value, convert};
