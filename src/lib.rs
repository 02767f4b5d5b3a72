//! # Quarry
//!
//! Generic CRUD repositories for building RESTful APIs in Rust, with
//! query-string filtering, pagination and uniform JSON response envelopes.
//!
//! ## Features
//!
//! - **Repository trait**: the five CRUD operations with validation hooks,
//!   overridable commit seams and uniform error conversion
//! - **Filter engine**: explicit predicate registries per entity, idempotent
//!   joins and whitelisted `sort_by` handling
//! - **Response envelopes**: one `{status, success, data, message, meta}`
//!   shape for every success and failure
//! - **Error taxonomy**: typed CRUD failures that always reach the client as
//!   well-formed envelopes with the right status code
//! - **Localized messages**: English, French and Portuguese catalogs with
//!   entity-name substitution
//! - **In-memory store**: inspectable query builder and store for tests and
//!   development
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quarry::prelude::*;
//!
//! struct UserRepository {
//!     store: InMemoryStore,
//!     config: RepositoryConfig,
//!     filters: FilterSet,
//! }
//!
//! impl Repository for UserRepository {
//!     type Store = InMemoryStore;
//!
//!     fn store(&self) -> &InMemoryStore { &self.store }
//!     fn config(&self) -> &RepositoryConfig { &self.config }
//!     fn entity_name(&self) -> &str { "User" }
//!     fn filters(&self) -> Option<&FilterSet> { Some(&self.filters) }
//!
//!     fn create_rules(&self) -> RuleSet {
//!         RuleSet::new().field("email", vec![rules::required(), rules::email()])
//!     }
//! }
//!
//! // In an axum handler:
//! let result = repo.index(Some(&request), &[]).await;
//! Responder::new(Locale::En).respond(result, Action::Index, "User")
//! ```

pub mod config;
pub mod core;
pub mod repository;
pub mod response;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{FieldErrors, RepositoryError},
        filter::{FilterContext, FilterRequest, FilterSet, ParamValue, SortDirection, SortToken},
        pagination::{Page, PageMeta, PageRequest},
        query::{Comparison, QueryBuilder},
        store::{RecordStore, StoreError},
        validation::{Rule, RuleSet, rules},
    };

    // === Repository ===
    pub use crate::repository::{Repository, collapse_references};

    // === Response ===
    pub use crate::response::{Action, Envelope, Locale, Meta, Outcome, Responder};

    // === Config ===
    pub use crate::config::RepositoryConfig;

    // === Storage ===
    pub use crate::storage::{InMemoryStore, MemoryQuery};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use uuid::Uuid;
}
