//! Table bindings: one entity type mapped onto one SQLite table.
//!
//! A [`Table`] resolves its entity's [`Schema`] once and keeps it for its
//! whole lifetime. Every statement it runs goes through the same unit of
//! work: begin a transaction, prepare, execute, release the statement,
//! commit. Both the statement and the transaction are dropped on every
//! exit path; a transaction dropped before commit rolls back.
//!
//! # Example
//!
//! ```
//! use rowbind_core::Predicate;
//! use rowbind_sqlite::Table;
//! use rusqlite::Connection;
//!
//! rowbind_core::entity! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct User {
//!         pub id: i32 => [name = "id", primary_key = "true"],
//!         pub username: String => [name = "username", length = "20"],
//!     }
//! }
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let users = Table::<User>::new(&conn).unwrap();
//! users.create(true).unwrap();
//!
//! let mut ann = User { id: 1, username: "ann".into() };
//! users.insert(&ann).unwrap();
//! assert!(users.exists(&ann).unwrap());
//!
//! ann.username = "anne".into();
//! users.update(&ann).unwrap();
//!
//! let found = users.filter([Predicate::eq("id", 1)]).all().unwrap();
//! assert_eq!(found, vec![ann.clone()]);
//!
//! users.delete(&ann).unwrap();
//! assert_eq!(users.count(&ann).unwrap(), 0);
//! ```

use std::marker::PhantomData;

use rowbind_core::{
    Entity, ModelError, Predicate, QuerySpec, Schema, Statement, build_count, build_create,
    build_delete, build_drop, build_insert, build_update,
};
use rusqlite::{Connection, Row, params_from_iter};
use tracing::debug;

use crate::convert::{row_to_values, to_sql_params};
use crate::error::{Result, SqliteError};
use crate::filter::FilterSet;

/// What [`Table::upsert`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// An entity type bound to a connection.
///
/// The binding borrows the connection, so it cannot outlive it and cannot
/// be shared across threads. The schema is immutable after construction.
pub struct Table<'c, E: Entity> {
    conn: &'c Connection,
    schema: Schema,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> Table<'c, E> {
    /// Binds `E` to the connection, resolving its schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Model`] when the schema cannot be resolved.
    pub fn new(conn: &'c Connection) -> Result<Self> {
        let schema = Schema::extract::<E>()?;
        Ok(Self::with_schema(conn, schema))
    }

    /// Binds `E` using an already resolved schema, e.g. one with a
    /// different table name.
    pub fn with_schema(conn: &'c Connection, schema: Schema) -> Self {
        Self {
            conn,
            schema,
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.schema.table()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }

    /// Creates the table.
    ///
    /// With `if_not_exists = false`, creating an existing table fails with
    /// the database's own error so callers can tell it apart from other
    /// DDL failures.
    pub fn create(&self, if_not_exists: bool) -> Result<()> {
        let stmt = Statement {
            sql: build_create(&self.schema, if_not_exists),
            params: Vec::new(),
        };
        self.execute(&stmt)?;
        Ok(())
    }

    /// Drops the table.
    pub fn drop_table(&self, if_exists: bool) -> Result<()> {
        let stmt = Statement {
            sql: build_drop(&self.schema, if_exists),
            params: Vec::new(),
        };
        self.execute(&stmt)?;
        Ok(())
    }

    /// Inserts the instance as a new row.
    pub fn insert(&self, instance: &E) -> Result<()> {
        self.execute(&build_insert(&self.schema, instance)?)?;
        Ok(())
    }

    /// Overwrites every column of the row addressed by the instance's
    /// primary key.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::RowNotFound`] if no such row exists.
    pub fn update(&self, instance: &E) -> Result<()> {
        self.ensure_exists(instance)?;
        self.execute(&build_update(&self.schema, instance)?)?;
        Ok(())
    }

    /// Deletes the row addressed by the instance's primary key.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::RowNotFound`] if nothing was deleted.
    pub fn delete(&self, instance: &E) -> Result<()> {
        let affected = self.execute(&build_delete(&self.schema, instance)?)?;
        if affected == 0 {
            return Err(self.row_not_found());
        }
        Ok(())
    }

    /// Counts rows sharing the instance's primary key.
    pub fn count(&self, instance: &E) -> Result<u64> {
        let stmt = build_count(&self.schema, instance)?;
        let counts = self.run_query(&stmt, None, |row| Ok(row.get::<_, i64>(0)?))?;
        let count = counts.first().copied().unwrap_or(0);
        u64::try_from(count)
            .map_err(|_| SqliteError::ConversionError(format!("negative row count {count}")))
    }

    /// Whether a row with the instance's primary key exists.
    pub fn exists(&self, instance: &E) -> Result<bool> {
        Ok(self.count(instance)? > 0)
    }

    /// Like [`exists`](Self::exists), but reports absence as
    /// [`SqliteError::RowNotFound`].
    pub fn ensure_exists(&self, instance: &E) -> Result<()> {
        if self.exists(instance)? {
            Ok(())
        } else {
            Err(self.row_not_found())
        }
    }

    /// Updates the row if it exists, inserts it otherwise.
    ///
    /// The existence check and the write are separate units of work, so a
    /// concurrent writer on the same key can slip in between them.
    pub fn upsert(&self, instance: &E) -> Result<UpsertOutcome> {
        if self.exists(instance)? {
            self.execute(&build_update(&self.schema, instance)?)?;
            Ok(UpsertOutcome::Updated)
        } else {
            self.insert(instance)?;
            Ok(UpsertOutcome::Inserted)
        }
    }

    /// Starts a filter set with the given predicates.
    pub fn filter(&self, predicates: impl IntoIterator<Item = Predicate>) -> FilterSet<'_, 'c, E> {
        let mut set = FilterSet::new(self);
        set.filter(predicates);
        set
    }

    /// Starts an empty filter set.
    pub fn query(&self) -> FilterSet<'_, 'c, E> {
        FilterSet::new(self)
    }

    /// Loads every row.
    pub fn all(&self) -> Result<Vec<E>> {
        self.fetch(&QuerySpec::new())
    }

    /// Materializes a specification and hydrates the matching rows.
    pub(crate) fn fetch(&self, spec: &QuerySpec) -> Result<Vec<E>> {
        let stmt = spec.to_select(&self.schema)?;
        let fields = self.schema.fields();
        self.run_query(&stmt, Some(fields.len()), |row| {
            let values = row_to_values(fields, row)?;
            let mut instance = E::default();
            for (field, value) in fields.iter().zip(values) {
                instance.set(field.id(), value)?;
            }
            Ok(instance)
        })
    }

    fn row_not_found(&self) -> SqliteError {
        SqliteError::RowNotFound {
            table: self.schema.table().to_string(),
        }
    }

    /// Runs a statement that returns no rows inside its own transaction.
    fn execute(&self, stmt: &Statement) -> Result<usize> {
        debug!(table = %self.name(), sql = %stmt.sql, params = stmt.params.len(), "Executing statement");
        let params = to_sql_params(&stmt.params)?;
        let tx = self.conn.unchecked_transaction()?;
        let affected = {
            let mut prepared = tx.prepare(&stmt.sql)?;
            prepared.execute(params_from_iter(params.iter()))?
        };
        tx.commit()?;
        Ok(affected)
    }

    /// Runs a row-returning statement inside its own transaction.
    ///
    /// When `expected_columns` is given, a result set of a different width
    /// is rejected before any row is read.
    fn run_query<T>(
        &self,
        stmt: &Statement,
        expected_columns: Option<usize>,
        mut map: impl FnMut(&Row<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        debug!(table = %self.name(), sql = %stmt.sql, params = stmt.params.len(), "Querying");
        let params = to_sql_params(&stmt.params)?;
        let tx = self.conn.unchecked_transaction()?;
        let results = {
            let mut prepared = tx.prepare(&stmt.sql)?;
            if let Some(expected) = expected_columns {
                let found = prepared.column_count();
                if found != expected {
                    return Err(ModelError::ColumnCountMismatch {
                        table: self.name().to_string(),
                        expected,
                        found,
                    }
                    .into());
                }
            }
            let mut rows = prepared.query(params_from_iter(params.iter()))?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(map(row)?);
            }
            results
        };
        tx.commit()?;
        Ok(results)
    }
}
