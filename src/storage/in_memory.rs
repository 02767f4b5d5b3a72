//! In-memory implementation of the store collaborators for testing and
//! development
//!
//! Records are plain JSON objects keyed by uuid. `MemoryQuery` records every
//! builder operation and exposes it for inspection, so tests can assert on
//! the exact predicates, joins and ORDER BY expression a filter produced;
//! `InMemoryStore` then honors those operations when executing. Uses RwLock
//! for thread-safe access.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::core::filter::SortDirection;
use crate::core::pagination::{Page, PageMeta, PageRequest};
use crate::core::query::{Comparison, QueryBuilder};
use crate::core::store::{RecordStore, StoreError};

/// One recorded WHERE predicate
#[derive(Debug, Clone)]
pub struct WhereClause {
    pub column: String,
    pub op: Comparison,
    pub value: Value,
}

/// One recorded join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub table: String,
    pub left_column: String,
    pub right_column: String,
}

/// Recording query builder over in-memory rows
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    table: String,
    predicates: Vec<WhereClause>,
    joins: Vec<JoinClause>,
    order_by: Option<String>,
    distinct: bool,
}

impl MemoryQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            joins: Vec::new(),
            order_by: None,
            distinct: false,
        }
    }

    pub fn predicates(&self) -> &[WhereClause] {
        &self.predicates
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Whether a row satisfies every recorded predicate
    fn matches(&self, row: &Value) -> bool {
        self.predicates.iter().all(|clause| {
            let value = field(row, &clause.column);
            predicate_holds(value, clause.op, &clause.value)
        })
    }

    /// Comparator built from the recorded ORDER BY expression
    fn sort_rows(&self, rows: &mut [Value]) {
        let Some(expression) = &self.order_by else {
            return;
        };

        let keys: Vec<(String, SortDirection)> = expression
            .split(", ")
            .filter_map(|token| {
                let (column, direction) = token.rsplit_once(' ')?;
                let direction = match direction {
                    "ASC" => SortDirection::Asc,
                    "DESC" => SortDirection::Desc,
                    _ => return None,
                };
                Some((column.to_string(), direction))
            })
            .collect();

        rows.sort_by(|a, b| {
            for (column, direction) in &keys {
                let ordering = compare_values(field(a, column), field(b, column));
                let ordering = match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

impl QueryBuilder for MemoryQuery {
    fn table(&self) -> &str {
        &self.table
    }

    fn where_clause(&mut self, column: &str, op: Comparison, value: Value) {
        self.predicates.push(WhereClause {
            column: column.to_string(),
            op,
            value,
        });
    }

    fn join(&mut self, table: &str, left_column: &str, right_column: &str) {
        self.joins.push(JoinClause {
            table: table.to_string(),
            left_column: left_column.to_string(),
            right_column: right_column.to_string(),
        });
    }

    fn order_by_raw(&mut self, expression: &str) {
        self.order_by = Some(expression.to_string());
    }

    fn distinct(&mut self) {
        self.distinct = true;
    }
}

/// Look up a column on a row, ignoring any `table.` qualifier
fn field<'a>(row: &'a Value, column: &str) -> &'a Value {
    let key = column.rsplit_once('.').map_or(column, |(_, name)| name);
    row.get(key).unwrap_or(&Value::Null)
}

/// Loose equality: query parameters arrive as strings, rows may store numbers
fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => s
            .parse::<f64>()
            .is_ok_and(|parsed| n.as_f64() == Some(parsed)),
        _ => false,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        // Mixed types: compare through their string rendering
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn predicate_holds(value: &Value, op: Comparison, expected: &Value) -> bool {
    match op {
        Comparison::Eq => loosely_equal(value, expected),
        Comparison::Ne => !loosely_equal(value, expected),
        Comparison::Gt => compare_coerced(value, expected) == Some(Ordering::Greater),
        Comparison::Gte => matches!(
            compare_coerced(value, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Comparison::Lt => compare_coerced(value, expected) == Some(Ordering::Less),
        Comparison::Lte => matches!(
            compare_coerced(value, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Comparison::Like => match (value.as_str(), expected.as_str()) {
            (Some(haystack), Some(needle)) => {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => false,
        },
        Comparison::In => match expected {
            Value::Array(candidates) => candidates
                .iter()
                .any(|candidate| loosely_equal(value, candidate)),
            _ => false,
        },
    }
}

/// Ordering comparison with string-to-number coercion on either side
fn compare_coerced(a: &Value, b: &Value) -> Option<Ordering> {
    let as_number = |v: &Value| -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    };

    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

/// In-memory record store
#[derive(Clone)]
pub struct InMemoryStore {
    table: String,
    rows: Arc<RwLock<IndexMap<Uuid, Value>>>,
}

impl InMemoryStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Insert a batch of records, returning them as stored
    pub async fn seed(&self, records: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        let mut stored = Vec::with_capacity(records.len());

        for record in records {
            stored.push(self.insert(record).await?);
        }

        Ok(stored)
    }

    fn filtered(&self, query: &MemoryQuery) -> Result<Vec<Value>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {e}")))?;

        let mut matching: Vec<Value> = rows
            .values()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();

        query.sort_rows(&mut matching);

        if query.is_distinct() {
            let mut seen = std::collections::HashSet::new();
            matching.retain(|row| seen.insert(row.to_string()));
        }

        Ok(matching)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    type Query = MemoryQuery;

    fn query(&self) -> MemoryQuery {
        MemoryQuery::new(&self.table)
    }

    async fn fetch(&self, query: MemoryQuery) -> Result<Vec<Value>, StoreError> {
        self.filtered(&query)
    }

    async fn paginate(
        &self,
        query: MemoryQuery,
        page: PageRequest,
    ) -> Result<Page<Value>, StoreError> {
        let matching = self.filtered(&query)?;
        let total = matching.len() as u64;

        let start = ((page.page - 1) * page.size) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page.size as usize)
            .collect();

        Ok(Page {
            items,
            meta: PageMeta::new(page.page, page.size, total),
        })
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Value>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {e}")))?;

        Ok(rows.get(id).cloned())
    }

    async fn insert(&self, payload: Value) -> Result<Value, StoreError> {
        let Value::Object(mut record) = payload else {
            return Err(StoreError::Backend(
                "record payload must be a JSON object".to_string(),
            ));
        };

        let id = record
            .get("id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .unwrap_or_else(Uuid::new_v4);

        let now = Utc::now().to_rfc3339();
        record.insert("id".to_string(), Value::String(id.to_string()));
        record.insert("created_at".to_string(), Value::String(now.clone()));
        record.insert("updated_at".to_string(), Value::String(now));

        let stored = Value::Object(record);

        let mut rows = self
            .rows
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {e}")))?;

        rows.insert(id, stored.clone());

        Ok(stored)
    }

    async fn update(&self, id: &Uuid, payload: Value) -> Result<Value, StoreError> {
        let Value::Object(changes) = payload else {
            return Err(StoreError::Backend(
                "record payload must be a JSON object".to_string(),
            ));
        };

        let mut rows = self
            .rows
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {e}")))?;

        let row = rows.get_mut(id).ok_or(StoreError::NotFound)?;

        if let Value::Object(record) = row {
            for (key, value) in changes {
                if key != "id" && key != "created_at" {
                    record.insert(key, value);
                }
            }
            record.insert(
                "updated_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }

        Ok(row.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {e}")))?;

        rows.shift_remove(id).ok_or(StoreError::NotFound)?;

        Ok(())
    }

    async fn distinct_values(
        &self,
        column: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {e}")))?;

        let mut seen = std::collections::HashSet::new();
        let mut values: Vec<Value> = rows
            .values()
            .map(|row| field(row, column).clone())
            .filter(|value| !value.is_null())
            .filter(|value| seen.insert(value.to_string()))
            .collect();

        values.sort_by(compare_values);
        if direction == SortDirection::Desc {
            values.reverse();
        }

        Ok(values)
    }
}
