//! Read-query specification.
//!
//! [`QuerySpec`] accumulates predicates, orderings, a limit, and an offset
//! through chained `&mut self` calls. Nothing is checked until
//! [`QuerySpec::to_select`] materializes it against a schema.
//!
//! ```
//! use rowbind_core::{FieldDescriptor, Predicate, QuerySpec, Schema, Value};
//!
//! let schema = Schema::from_fields(
//!     "User",
//!     vec![FieldDescriptor::int("id").primary_key(true), FieldDescriptor::char("name", 20)],
//! )
//! .unwrap();
//!
//! let mut spec = QuerySpec::new();
//! spec.filter([Predicate::eq("name", "ann")]).order_by(["-id"]).limit(5);
//!
//! let stmt = spec.to_select(&schema).unwrap();
//! assert_eq!(
//!     stmt.sql,
//!     r#"SELECT * FROM "User" WHERE "name" = ? ORDER BY "id" DESC LIMIT 5"#
//! );
//! assert_eq!(stmt.params, vec![Value::Text("ann".into())]);
//! ```

use std::fmt;

use crate::error::Result;
use crate::schema::{Schema, quote_identifier};
use crate::statement::Statement;
use crate::value::{IntoValue, Value};

/// Limit emitted when an offset is set without a limit.
pub const DEFAULT_LIMIT: i64 = 10;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
        };
        f.write_str(op)
    }
}

/// A single `column <op> ?` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column name or attribute id.
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl IntoValue) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into_value(),
        }
    }

    /// Equality predicate, the default comparison.
    pub fn eq(column: impl Into<String>, value: impl IntoValue) -> Self {
        Self::new(column, Operator::Eq, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub direction: Direction,
}

impl Ordering {
    /// Parses `name` (ascending) or `-name` (descending).
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(column) => Self {
                column: column.to_string(),
                direction: Direction::Desc,
            },
            None => Self {
                column: spec.to_string(),
                direction: Direction::Asc,
            },
        }
    }
}

/// Chainable accumulator for a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    predicates: Vec<Predicate>,
    orderings: Vec<Ordering>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends AND-combined predicates.
    pub fn filter(&mut self, predicates: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.predicates.extend(predicates);
        self
    }

    /// Appends orderings; a leading `-` sorts descending.
    pub fn order_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.orderings
            .extend(columns.into_iter().map(|c| Ordering::parse(c.as_ref())));
        self
    }

    /// Sets the row limit. Non-positive values are ignored.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        if n > 0 {
            self.limit = Some(n);
        }
        self
    }

    /// Sets the row offset. Non-positive values are ignored.
    pub fn offset(&mut self, n: i64) -> &mut Self {
        if n > 0 {
            self.offset = Some(n);
        }
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Renders the SELECT for `schema`.
    ///
    /// The statement selects `*`; callers bind result columns positionally
    /// to the schema's descriptors and must reject rows of another width.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownColumn`](crate::ModelError::UnknownColumn)
    /// when a predicate or ordering names a column the schema lacks.
    pub fn to_select(&self, schema: &Schema) -> Result<Statement> {
        let mut sql = format!("SELECT * FROM {}", quote_identifier(schema.table()));
        let mut params = Vec::with_capacity(self.predicates.len());

        if !self.predicates.is_empty() {
            let mut conditions = Vec::with_capacity(self.predicates.len());
            for predicate in &self.predicates {
                let field = schema.resolve(&predicate.column)?;
                conditions.push(format!(
                    "{} {} ?",
                    quote_identifier(field.name()),
                    predicate.operator
                ));
                params.push(predicate.value.clone());
            }
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.orderings.is_empty() {
            let mut terms = Vec::with_capacity(self.orderings.len());
            for ordering in &self.orderings {
                let field = schema.resolve(&ordering.column)?;
                let dir = match ordering.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                terms.push(format!("{} {dir}", quote_identifier(field.name())));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        let limit = match (self.limit, self.offset) {
            (Some(limit), _) => Some(limit),
            (None, Some(_)) => Some(DEFAULT_LIMIT),
            (None, None) => None,
        };
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(Statement { sql, params })
    }
}
