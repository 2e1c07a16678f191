//! Filter sets: query specifications bound to a table.
//!
//! A [`FilterSet`] is built by [`Table::filter`] or [`Table::query`],
//! refined with chained calls, and materialized with [`FilterSet::all`].
//! Running `all` again re-executes the same query; the refinements stay as
//! they were.

use rowbind_core::{Entity, Predicate, QuerySpec, Result as ModelResult, Statement};

use crate::error::Result;
use crate::table::Table;

/// Chainable read query over one table.
///
/// Owned by the caller for one logical query; refinements accumulate, so a
/// fresh set is needed for each distinct query.
pub struct FilterSet<'t, 'c, E: Entity> {
    table: &'t Table<'c, E>,
    spec: QuerySpec,
}

impl<'t, 'c, E: Entity> FilterSet<'t, 'c, E> {
    pub(crate) fn new(table: &'t Table<'c, E>) -> Self {
        Self {
            table,
            spec: QuerySpec::new(),
        }
    }

    /// Adds AND-combined predicates.
    pub fn filter(&mut self, predicates: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.spec.filter(predicates);
        self
    }

    /// Adds orderings; `-column` sorts descending.
    pub fn order_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.spec.order_by(columns);
        self
    }

    /// Sets the limit; ignored when `n <= 0`.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.spec.limit(n);
        self
    }

    /// Sets the offset; ignored when `n <= 0`.
    pub fn offset(&mut self, n: i64) -> &mut Self {
        self.spec.offset(n);
        self
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// The SELECT this set would run.
    pub fn to_statement(&self) -> ModelResult<Statement> {
        self.spec.to_select(self.table.schema())
    }

    /// Runs the query and hydrates every matching row.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn all(&self) -> Result<Vec<E>> {
        self.table.fetch(&self.spec)
    }

    /// Runs the query limited to one row.
    pub fn first(&self) -> Result<Option<E>> {
        let mut spec = self.spec.clone();
        spec.limit(1);
        Ok(self.table.fetch(&spec)?.into_iter().next())
    }
}
