//! Query builder collaborator surface
//!
//! The filter engine and repositories never talk to a database directly. They
//! accumulate transformations on a [`QueryBuilder`] and hand the finished
//! query to a [`crate::core::store::RecordStore`] for execution. Anything that
//! can record predicates, joins and an ORDER BY expression can act as a
//! builder.

use serde_json::Value;

/// Comparison operators available to predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Substring match on string fields
    Like,
    /// Membership in a list of values
    In,
}

/// Mutable, per-request query builder
///
/// A builder is bound to exactly one entity table and lives for a single
/// request. The trait is object-safe so filter predicates can be written
/// against `&mut dyn QueryBuilder` without knowing the storage backend.
pub trait QueryBuilder: Send {
    /// Table name of the bound entity
    fn table(&self) -> &str;

    /// Add a WHERE predicate
    fn where_clause(&mut self, column: &str, op: Comparison, value: Value);

    /// Inner equi-join another table on `left_column = right_column`
    fn join(&mut self, table: &str, left_column: &str, right_column: &str);

    /// Set the raw ORDER BY expression for the query
    ///
    /// Called at most once per filter application, with all sort tokens
    /// already joined into a single expression.
    fn order_by_raw(&mut self, expression: &str);

    /// Deduplicate the result set
    fn distinct(&mut self);

    /// Shorthand for an equality predicate
    fn where_eq(&mut self, column: &str, value: Value) {
        self.where_clause(column, Comparison::Eq, value);
    }
}
