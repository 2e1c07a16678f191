//! SQLite execution backend for rowbind.
//!
//! This crate runs the statements built by `rowbind-core` against a
//! [`rusqlite::Connection`] and hydrates query results back into entities.
//!
//! # Architecture
//!
//! - **`table`**: [`Table`] binds an entity type to a connection and runs
//!   create/insert/update/delete/count/upsert, each in its own unit of work
//! - **`filter`**: [`FilterSet`] chains filters, ordering, limit, and
//!   offset, then loads matching rows
//! - **`convert`**: model values ↔ SQLite storage values
//! - **`inspect`**: table listing and column metadata of a live database
//! - **`config`**: YAML connection settings
//!
//! # Quick start
//!
//! ```
//! use rowbind_sqlite::{DatabaseConfig, Table};
//!
//! rowbind_core::entity! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Account {
//!         pub id: i64 => [name = "id", primary_key = "true"],
//!         pub owner: String => [name = "owner", length = "40"],
//!         pub balance: f32 => [name = "balance"],
//!     }
//! }
//!
//! let conn = DatabaseConfig::default().open().unwrap();
//! let accounts = Table::<Account>::new(&conn).unwrap();
//! accounts.create(true).unwrap();
//!
//! for id in 1..=3 {
//!     accounts
//!         .insert(&Account { id, owner: format!("owner{id}"), balance: 10.0 })
//!         .unwrap();
//! }
//!
//! let richest_first = accounts.query().order_by(["-id"]).limit(2).all().unwrap();
//! assert_eq!(richest_first.len(), 2);
//! assert_eq!(richest_first[0].id, 3);
//! ```
//!
//! # Concurrency
//!
//! Calls block until SQLite returns. Each mutating call is its own
//! transaction; there is no multi-statement transaction scope, so
//! [`Table::upsert`] is not atomic with respect to other writers.

mod config;
mod convert;
mod error;
mod filter;
mod inspect;
mod table;

pub use config::{DatabaseConfig, IN_MEMORY};
pub use convert::DATETIME_FORMAT;
pub use error::{Result, SqliteError};
pub use filter::FilterSet;
pub use inspect::{ColumnInfo, list_tables, row_count, table_exists, table_info};
pub use table::{Table, UpsertOutcome};
