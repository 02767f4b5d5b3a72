//! Integration tests for the generic repository over the in-memory store
//!
//! These tests verify that:
//! - Listings filter, paginate and fall back to distinct collections
//! - Validation short-circuits before any store call
//! - Storage failures surface as domain errors, never raw
//! - Reference payloads collapse to foreign-key fields

use async_trait::async_trait;
use axum::http::StatusCode;
use quarry::prelude::*;
use serde_json::Value;

// =============================================================================
// Test Repository
// =============================================================================

struct UserRepository {
    store: InMemoryStore,
    config: RepositoryConfig,
    filters: FilterSet,
}

impl UserRepository {
    fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    fn with_config(config: RepositoryConfig) -> Self {
        let filters = FilterSet::builder()
            .predicate("status", |ctx, values| {
                ctx.builder().where_eq("status", json!(values[0]));
            })
            .predicate("company_id", |ctx, values| {
                ctx.builder().where_eq("company_id", json!(values[0]));
            })
            .sortable(["name"])
            .build();

        Self {
            store: InMemoryStore::new("users"),
            config,
            filters,
        }
    }

    async fn seed_users(&self) -> Vec<Value> {
        self.store
            .seed(vec![
                json!({"name": "Ada", "email": "ada@example.com", "status": "active"}),
                json!({"name": "Grace", "email": "grace@example.com", "status": "active"}),
                json!({"name": "Edsger", "email": "edsger@example.com", "status": "inactive"}),
            ])
            .await
            .unwrap()
    }
}

impl Repository for UserRepository {
    type Store = InMemoryStore;

    fn store(&self) -> &InMemoryStore {
        &self.store
    }

    fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn entity_name(&self) -> &str {
        "User"
    }

    fn filters(&self) -> Option<&FilterSet> {
        Some(&self.filters)
    }

    fn create_rules(&self) -> RuleSet {
        RuleSet::new()
            .field("name", vec![rules::required()])
            .field("email", vec![rules::required(), rules::email()])
    }

    fn update_rules(&self) -> RuleSet {
        RuleSet::new().field("email", vec![rules::email()])
    }
}

fn record_id(record: &Value) -> Uuid {
    Uuid::parse_str(record["id"].as_str().unwrap()).unwrap()
}

// =============================================================================
// Index
// =============================================================================

mod index_tests {
    use super::*;

    #[tokio::test]
    async fn test_unpaginated_index_returns_full_collection() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let outcome = repo.index(None, &[]).await.unwrap();

        match outcome {
            Outcome::Collection(records) => assert_eq!(records.len(), 3),
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_param_switches_to_pagination() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let request = FilterRequest::from_pairs([("page", "1"), ("size", "2")]);
        let outcome = repo.index(Some(&request), &[]).await.unwrap();

        match outcome {
            Outcome::Page(page) => {
                assert_eq!(page.items.len(), 2);
                assert_eq!(page.meta.current_page, 1);
                assert_eq!(page.meta.page_size, 2);
                assert!(!page.meta.last_page);
                assert_eq!(page.meta.total, 3);
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_filters_narrow_the_listing() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let request = FilterRequest::from_pairs([("status", "active")]);
        let outcome = repo.index(Some(&request), &[]).await.unwrap();

        match outcome {
            Outcome::Collection(records) => {
                assert_eq!(records.len(), 2);
                assert!(records.iter().all(|r| r["status"] == json!("active")));
            }
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_filter_params_are_ignored() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let request = FilterRequest::from_pairs([("favorite_color", "teal")]);
        let outcome = repo.index(Some(&request), &[]).await.unwrap();

        match outcome {
            Outcome::Collection(records) => assert_eq!(records.len(), 3),
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sorted_index() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let request = FilterRequest::from_pairs([("sort_by", "name.asc")]);
        let outcome = repo.index(Some(&request), &[]).await.unwrap();

        match outcome {
            Outcome::Collection(records) => {
                let names: Vec<&str> =
                    records.iter().map(|r| r["name"].as_str().unwrap()).collect();
                assert_eq!(names, ["Ada", "Edsger", "Grace"]);
            }
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_route_params_scope_the_listing() {
        let repo = UserRepository::new();
        repo.store
            .seed(vec![
                json!({"name": "Ada", "company_id": 1}),
                json!({"name": "Grace", "company_id": 2}),
            ])
            .await
            .unwrap();

        let outcome = repo.index(None, &[("company_id", "2")]).await.unwrap();

        match outcome {
            Outcome::Collection(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0]["name"], json!("Grace"));
            }
            other => panic!("expected collection, got {other:?}"),
        }
    }
}

// =============================================================================
// Show
// =============================================================================

mod show_tests {
    use super::*;

    #[tokio::test]
    async fn test_show_existing_record() {
        let repo = UserRepository::new();
        let seeded = repo.seed_users().await;

        let record = repo.show(&record_id(&seeded[0])).await.unwrap();
        assert_eq!(record["name"], json!("Ada"));
    }

    #[tokio::test]
    async fn test_show_missing_record_is_404() {
        let repo = UserRepository::new();

        let err = repo.show(&Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "User not found");
    }
}

// =============================================================================
// Create
// =============================================================================

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_valid_record() {
        let repo = UserRepository::new();

        let record = repo
            .create(json!({"name": "Ada", "email": "ada@example.com"}))
            .await
            .unwrap();

        assert!(record.get("id").is_some());
        assert_eq!(record["name"], json!("Ada"));
    }

    #[tokio::test]
    async fn test_validation_failure_short_circuits() {
        let repo = UserRepository::new();

        let err = repo.create(json!({"name": "Ada"})).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Validation failed");
        assert_eq!(
            err.errors_payload(),
            Some(json!({"email": ["required"]}))
        );

        // Nothing reached the store.
        match repo.index(None, &[]).await.unwrap() {
            Outcome::Collection(records) => assert!(records.is_empty()),
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_collapses_references() {
        let repo = UserRepository::new();

        let record = repo
            .create(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "company": {"id": 7, "name": "Acme"},
            }))
            .await
            .unwrap();

        assert_eq!(record["company_id"], json!(7));
        assert!(record.get("company").is_none());
    }
}

// =============================================================================
// Update / Destroy
// =============================================================================

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_changes_fields() {
        let repo = UserRepository::new();
        let seeded = repo.seed_users().await;
        let id = record_id(&seeded[0]);

        let updated = repo
            .update(&id, json!({"status": "inactive"}))
            .await
            .unwrap();

        assert_eq!(updated["status"], json!("inactive"));
        assert_eq!(updated["name"], json!("Ada"));
    }

    #[tokio::test]
    async fn test_update_missing_record_is_operation_error() {
        let repo = UserRepository::new();

        let err = repo
            .update(&Uuid::new_v4(), json!({"status": "x"}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Error updating User");
    }

    #[tokio::test]
    async fn test_update_validation_runs_first() {
        let repo = UserRepository::new();
        let seeded = repo.seed_users().await;
        let id = record_id(&seeded[0]);

        let err = repo
            .update(&id, json!({"email": "not-an-email"}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_destroy_removes_record() {
        let repo = UserRepository::new();
        let seeded = repo.seed_users().await;
        let id = record_id(&seeded[0]);

        repo.destroy(&id, json!({})).await.unwrap();

        let err = repo.show(&id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_destroy_missing_record_is_operation_error() {
        let repo = UserRepository::new();

        let err = repo.destroy(&Uuid::new_v4(), json!({})).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Error deleting User");
    }
}

// =============================================================================
// Distinct Index
// =============================================================================

mod distinct_index_tests {
    use super::*;

    #[tokio::test]
    async fn test_distinct_values_per_column() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let columns = repo.distinct_index("status.asc").await.unwrap();

        assert_eq!(
            columns.get("status"),
            Some(&vec![json!("active"), json!("inactive")])
        );
    }

    #[tokio::test]
    async fn test_malformed_selector_yields_no_columns() {
        let repo = UserRepository::new();
        repo.seed_users().await;

        let columns = repo.distinct_index("status").await.unwrap();
        assert!(columns.is_empty());
    }
}

// =============================================================================
// Storage Failure Conversion
// =============================================================================

/// Store whose every operation fails, for exercising error conversion
struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    type Query = MemoryQuery;

    fn query(&self) -> MemoryQuery {
        MemoryQuery::new("users")
    }

    async fn fetch(&self, _query: MemoryQuery) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn paginate(
        &self,
        _query: MemoryQuery,
        _page: PageRequest,
    ) -> Result<Page<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn find(&self, _id: &Uuid) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn insert(&self, _payload: Value) -> Result<Value, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn update(&self, _id: &Uuid, _payload: Value) -> Result<Value, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn delete(&self, _id: &Uuid) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn distinct_values(
        &self,
        _column: &str,
        _direction: SortDirection,
    ) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

struct FailingRepository {
    store: FailingStore,
    config: RepositoryConfig,
}

impl Repository for FailingRepository {
    type Store = FailingStore;

    fn store(&self) -> &FailingStore {
        &self.store
    }

    fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn entity_name(&self) -> &str {
        "User"
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_store_failure_surfaces_as_index_error() {
        let repo = FailingRepository {
            store: FailingStore,
            config: RepositoryConfig::default(),
        };

        let err = repo.index(None, &[]).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Error listing User");
        // Production config leaks no debug detail.
        assert_eq!(err.errors_payload(), None);
    }

    #[tokio::test]
    async fn test_debug_detail_outside_production() {
        let repo = FailingRepository {
            store: FailingStore,
            config: RepositoryConfig {
                environment: "dev".to_string(),
                ..RepositoryConfig::default()
            },
        };

        let err = repo.create(json!({})).await.unwrap_err();

        assert_eq!(
            err.errors_payload(),
            Some(json!({"source": "connection refused"}))
        );
    }

    #[tokio::test]
    async fn test_read_failure_maps_to_404_taxonomy() {
        let repo = FailingRepository {
            store: FailingStore,
            config: RepositoryConfig::default(),
        };

        let err = repo.show(&Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Error showing User");
    }
}
