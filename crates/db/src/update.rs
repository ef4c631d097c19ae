//! Parameterized `UPDATE ... SET` construction for partial updates.
//!
//! Column names only ever come from `&'static str` values: assignments go
//! through the [`Assignment`] trait, which is implemented for closed enums
//! such as [`ProjectChange`]. Values are always emitted as positional
//! placeholders, and [`UpdateStatement::binds`] lists them in placeholder
//! order with the row selectors last.

use coder_core::project::ProjectChange;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;
use uuid::Uuid;

/// A value bound to one positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Json(serde_json::Value),
    Uuid(Uuid),
}

/// One `column = value` pair drawn from a statically known column set.
pub trait Assignment {
    /// Column written by this assignment.
    fn column(&self) -> &'static str;
    /// Value written to [`Assignment::column`].
    fn value(&self) -> BindValue;
}

impl Assignment for ProjectChange {
    fn column(&self) -> &'static str {
        match self {
            ProjectChange::Name(_) => "name",
            ProjectChange::Description(_) => "description",
            ProjectChange::Status(_) => "status",
            ProjectChange::Settings(_) => "settings",
        }
    }

    fn value(&self) -> BindValue {
        match self {
            ProjectChange::Name(v) | ProjectChange::Description(v) => BindValue::Text(v.clone()),
            ProjectChange::Status(status) => BindValue::Text(status.as_str().to_string()),
            ProjectChange::Settings(v) => BindValue::Json(v.clone()),
        }
    }
}

/// Returned when an update is built with no assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("update requires at least one field")]
pub struct EmptyUpdate;

/// A finished statement and its bind values in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Builder for a single-table partial update.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<(&'static str, BindValue)>,
    touched: Vec<&'static str>,
    selectors: Vec<(&'static str, BindValue)>,
    fixed_conditions: Vec<&'static str>,
    returning: Option<&'static str>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            touched: Vec::new(),
            selectors: Vec::new(),
            fixed_conditions: Vec::new(),
            returning: None,
        }
    }

    /// Add one assignment.
    pub fn set<A: Assignment>(mut self, assignment: &A) -> Self {
        self.assignments
            .push((assignment.column(), assignment.value()));
        self
    }

    /// Add assignments in iteration order.
    pub fn set_all<'a, A, I>(self, assignments: I) -> Self
    where
        A: Assignment + 'a,
        I: IntoIterator<Item = &'a A>,
    {
        assignments.into_iter().fold(self, |b, a| b.set(a))
    }

    /// Append `column = GREATEST(column, NOW())` after the caller's
    /// assignments. The timestamp never moves backwards even when an older
    /// transaction commits after a newer one. Does not count as an
    /// assignment for the empty-update check.
    pub fn touch(mut self, column: &'static str) -> Self {
        self.touched.push(column);
        self
    }

    /// Constrain the row with `column = $n`.
    pub fn filter(mut self, column: &'static str, value: BindValue) -> Self {
        self.selectors.push((column, value));
        self
    }

    /// Constrain the row with a literal condition that carries no values.
    pub fn filter_fixed(mut self, condition: &'static str) -> Self {
        self.fixed_conditions.push(condition);
        self
    }

    pub fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    /// Render the statement.
    ///
    /// Fails with [`EmptyUpdate`] when no assignment was added, so a
    /// statement with an empty `SET` list can never be produced.
    pub fn build(self) -> Result<UpdateStatement, EmptyUpdate> {
        if self.assignments.is_empty() {
            return Err(EmptyUpdate);
        }

        let mut binds = Vec::with_capacity(self.assignments.len() + self.selectors.len());
        let mut set_clauses = Vec::with_capacity(self.assignments.len() + self.touched.len());

        for (column, value) in self.assignments {
            binds.push(value);
            set_clauses.push(format!("{column} = ${}", binds.len()));
        }
        for column in self.touched {
            set_clauses.push(format!("{column} = GREATEST({column}, NOW())"));
        }

        let mut conditions = Vec::with_capacity(self.selectors.len() + self.fixed_conditions.len());
        for (column, value) in self.selectors {
            binds.push(value);
            conditions.push(format!("{column} = ${}", binds.len()));
        }
        conditions.extend(self.fixed_conditions.iter().map(|c| c.to_string()));

        let mut sql = format!("UPDATE {} SET {}", self.table, set_clauses.join(", "));
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if let Some(returning) = self.returning {
            sql.push_str(" RETURNING ");
            sql.push_str(returning);
        }

        Ok(UpdateStatement { sql, binds })
    }
}

/// Attach bind values to a query in order.
pub(crate) fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    binds: Vec<BindValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::Json(v) => query.bind(v),
            BindValue::Uuid(v) => query.bind(v),
        };
    }
    query
}
