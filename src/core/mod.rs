//! Core module containing the filter engine, pagination, error taxonomy,
//! validation and the query/store collaborator traits

pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{FieldErrors, RepositoryError};
pub use filter::{FilterContext, FilterRequest, FilterSet, ParamValue, SortDirection, SortToken};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageMeta, PageRequest};
pub use query::{Comparison, QueryBuilder};
pub use store::{RecordStore, StoreError};
pub use validation::{Rule, RuleSet};
