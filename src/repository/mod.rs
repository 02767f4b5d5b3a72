//! Generic CRUD repository behavior
//!
//! A repository ties one entity to a store, a filter set and per-operation
//! validation rules, and provides the five CRUD operations with uniform
//! error conversion: storage failures become domain errors carrying catalog
//! messages, validation failures short-circuit before any store call, and
//! nothing storage-specific ever escapes.
//!
//! The `commit_*` seams are overridable for business logic; the outer
//! operations keep the validation and error-conversion contract.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RepositoryConfig;
use crate::core::error::RepositoryError;
use crate::core::filter::{FilterRequest, FilterSet, SortToken};
use crate::core::query::QueryBuilder;
use crate::core::store::{RecordStore, StoreError};
use crate::core::validation::RuleSet;
use crate::response::messages;
use crate::response::{Action, Outcome};

/// Generic repository over one entity
#[async_trait]
pub trait Repository: Send + Sync {
    type Store: RecordStore;

    fn store(&self) -> &Self::Store;

    fn config(&self) -> &RepositoryConfig;

    /// Entity name substituted into catalog messages (e.g. "User")
    fn entity_name(&self) -> &str;

    /// The entity's filter set; default filters nothing
    fn filters(&self) -> Option<&FilterSet> {
        None
    }

    fn create_rules(&self) -> RuleSet {
        RuleSet::new()
    }

    fn update_rules(&self) -> RuleSet {
        RuleSet::new()
    }

    fn delete_rules(&self) -> RuleSet {
        RuleSet::new()
    }

    /// List records, filtered and optionally paginated
    ///
    /// Paginates when the request carries a `page` parameter; otherwise
    /// returns the full distinct collection.
    async fn index(
        &self,
        request: Option<&FilterRequest>,
        route_params: &[(&str, &str)],
    ) -> Result<Outcome, RepositoryError> {
        let mut query = self.store().query();

        if let Some(filters) = self.filters() {
            let empty = FilterRequest::new();
            filters.apply(&mut query, request.unwrap_or(&empty), route_params);
        }

        let page = request.and_then(|r| r.page_request(self.config().default_page_size));

        match page {
            Some(page) => {
                let page = self
                    .store()
                    .paginate(query, page)
                    .await
                    .map_err(|e| self.operation_error(Action::Index, &e))?;

                Ok(Outcome::Page(page))
            }
            None => {
                query.distinct();

                let records = self
                    .store()
                    .fetch(query)
                    .await
                    .map_err(|e| self.operation_error(Action::Index, &e))?;

                Ok(Outcome::Collection(records))
            }
        }
    }

    /// Distinct values per column, from a `"col.asc,col2.desc"` selector
    async fn distinct_index(
        &self,
        columns_with_sort: &str,
    ) -> Result<IndexMap<String, Vec<Value>>, RepositoryError> {
        let mut columns = IndexMap::new();

        for token in SortToken::parse_list(columns_with_sort) {
            let values = self
                .store()
                .distinct_values(&token.column, token.direction)
                .await
                .map_err(|e| self.operation_error(Action::Index, &e))?;

            columns.insert(token.column, values);
        }

        Ok(columns)
    }

    /// Fetch one record; a missing record is a 404 domain error
    async fn show(&self, id: &uuid::Uuid) -> Result<Value, RepositoryError> {
        match self.store().find(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(RepositoryError::read(
                messages::not_found(self.config().locale, self.entity_name()),
                None,
            )),
            Err(e) => Err(RepositoryError::read(
                messages::error(self.config().locale, Action::Show, self.entity_name()),
                self.debug_detail(&e),
            )),
        }
    }

    /// Validate and insert a new record
    async fn create(&self, payload: Value) -> Result<Value, RepositoryError> {
        self.validate(&self.create_rules(), &payload)?;

        let payload = collapse_references(payload);

        self.commit_create(payload)
            .await
            .map_err(|e| self.operation_error(Action::Store, &e))
    }

    /// Validate and update an existing record
    async fn update(&self, id: &uuid::Uuid, payload: Value) -> Result<Value, RepositoryError> {
        self.validate(&self.update_rules(), &payload)?;

        let payload = collapse_references(payload);

        self.commit_update(id, payload)
            .await
            .map_err(|e| self.operation_error(Action::Update, &e))
    }

    /// Validate and delete a record
    ///
    /// `payload` is the request body the delete rules run against; pass an
    /// empty object when the endpoint takes none.
    async fn destroy(&self, id: &uuid::Uuid, payload: Value) -> Result<(), RepositoryError> {
        self.validate(&self.delete_rules(), &payload)?;

        self.commit_destroy(id)
            .await
            .map_err(|e| self.operation_error(Action::Destroy, &e))
    }

    /// Insert seam; override to add business logic
    async fn commit_create(&self, payload: Value) -> Result<Value, StoreError> {
        self.store().insert(payload).await
    }

    /// Update seam; override to add business logic
    async fn commit_update(&self, id: &uuid::Uuid, payload: Value) -> Result<Value, StoreError> {
        self.store().update(id, payload).await
    }

    /// Delete seam; override to add business logic
    async fn commit_destroy(&self, id: &uuid::Uuid) -> Result<(), StoreError> {
        self.store().delete(id).await
    }

    /// Run a rule set, converting failures into the validation error
    fn validate(&self, rules: &RuleSet, payload: &Value) -> Result<(), RepositoryError> {
        rules.check(payload).map_err(|errors| {
            RepositoryError::validation(
                messages::validation_failed(self.config().locale),
                errors,
            )
        })
    }

    /// Convert a storage failure into the matching domain error
    fn operation_error(&self, action: Action, err: &StoreError) -> RepositoryError {
        let message = messages::error(self.config().locale, action, self.entity_name());
        let detail = self.debug_detail(err);

        match action {
            Action::Index => RepositoryError::index(message, detail),
            Action::Store => RepositoryError::create(message, detail),
            Action::Show => RepositoryError::read(message, detail),
            Action::Update => RepositoryError::update(message, detail),
            Action::Destroy => RepositoryError::delete(message, detail),
        }
    }

    /// Debug payload attached to operation errors outside production
    fn debug_detail(&self, err: &StoreError) -> Option<Value> {
        self.config()
            .debug_enabled()
            .then(|| serde_json::json!({ "source": err.to_string() }))
    }
}

/// Collapse referenced objects in a payload to foreign-key fields
///
/// Any object value carrying an `id` key is reduced to `<key>_id: <id>`, so
/// clients may submit either `{"company": {"id": 7, ...}}` or
/// `{"company_id": 7}` interchangeably.
pub fn collapse_references(payload: Value) -> Value {
    let entries = match payload {
        Value::Object(entries) => entries,
        other => return other,
    };

    let mut collapsed = serde_json::Map::with_capacity(entries.len());

    for (key, value) in entries {
        let reference_id = match &value {
            Value::Object(object) => object.get("id").cloned(),
            _ => None,
        };

        match reference_id {
            Some(id) => {
                collapsed.insert(format!("{key}_id"), id);
            }
            None => {
                collapsed.insert(key, value);
            }
        }
    }

    Value::Object(collapsed)
}
