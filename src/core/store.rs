//! Record store collaborator
//!
//! Execution lives here: a store takes a finished query builder and runs it.
//! The crate ships an in-memory implementation for tests and development
//! (`crate::storage::InMemoryStore`); production backends implement this
//! trait over their own query type.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::core::filter::SortDirection;
use crate::core::pagination::{Page, PageRequest};
use crate::core::query::QueryBuilder;

/// Failures surfaced by a storage backend
///
/// These never reach clients directly; the repository boundary converts them
/// into the domain taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Backend(String),
}

/// Storage backend executing queries over one entity table
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The builder type this store executes
    type Query: QueryBuilder + Send;

    /// A fresh builder bound to the store's entity table
    fn query(&self) -> Self::Query;

    /// Run the query and return all matching records
    async fn fetch(&self, query: Self::Query) -> Result<Vec<Value>, StoreError>;

    /// Run the query and return one page of records
    async fn paginate(
        &self,
        query: Self::Query,
        page: PageRequest,
    ) -> Result<Page<Value>, StoreError>;

    /// Look up a record by id
    async fn find(&self, id: &Uuid) -> Result<Option<Value>, StoreError>;

    /// Insert a record and return it as stored
    async fn insert(&self, payload: Value) -> Result<Value, StoreError>;

    /// Apply a partial update and return the fresh record
    async fn update(&self, id: &Uuid, payload: Value) -> Result<Value, StoreError>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<(), StoreError>;

    /// Distinct values of one column, sorted
    async fn distinct_values(
        &self,
        column: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>, StoreError>;
}
