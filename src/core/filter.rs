//! Query-string filter engine
//!
//! Translates untyped request parameters into ordered query-builder
//! operations. Each entity declares a [`FilterSet`]: a registry of named
//! predicate handlers plus a whitelist of sortable columns. Applying the set
//! walks the request parameters in order, dispatches known names to their
//! handlers, turns `sort_by` tokens into a single ORDER BY expression and
//! ignores everything else.
//!
//! Unknown parameter names and malformed sort tokens are silently dropped:
//! applying a filter never fails, it degrades to a no-op for the offending
//! parameter.
//!
//! # Example
//!
//! ```rust,ignore
//! let filters = FilterSet::builder()
//!     .predicate("status", |ctx, values| {
//!         ctx.builder().where_eq("status", json!(values[0]));
//!     })
//!     .predicate("company", |ctx, values| {
//!         ctx.join_once("companies", "users.company_id", "companies.id");
//!         ctx.builder().where_eq("companies.slug", json!(values[0]));
//!     })
//!     .sortable(["name", "created_at"])
//!     .build();
//!
//! filters.apply(&mut query, &request, &[]);
//! ```

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::core::pagination::PageRequest;
use crate::core::query::QueryBuilder;

/// Parameter names intercepted before predicate dispatch
pub const RESERVED_PARAMS: [&str; 4] = ["page", "size", "with", "sort_by"];

/// Value of a single request parameter
///
/// Multi-select widgets submit the same name several times, which surfaces
/// here as `Many`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// View the value as a slice regardless of arity
    pub fn values(&self) -> &[String] {
        match self {
            ParamValue::Single(value) => std::slice::from_ref(value),
            ParamValue::Many(values) => values,
        }
    }

    /// An empty string or an empty list places no constraint
    fn is_blank(&self) -> bool {
        match self {
            ParamValue::Single(value) => value.is_empty(),
            ParamValue::Many(values) => values.is_empty(),
        }
    }
}

/// Ordered request parameters, as parsed from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    params: IndexMap<String, ParamValue>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, preserving order
    ///
    /// A repeated name upgrades the parameter to a multi-value entry.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new();

        for (name, value) in pairs {
            request.push(name.into(), value.into());
        }

        request
    }

    /// Append one parameter occurrence
    pub fn push(&mut self, name: String, value: String) {
        match self.params.entry(name) {
            indexmap::map::Entry::Occupied(mut entry) => {
                let upgraded = match entry.get_mut() {
                    ParamValue::Single(first) => {
                        ParamValue::Many(vec![std::mem::take(first), value])
                    }
                    ParamValue::Many(values) => {
                        values.push(value);
                        return;
                    }
                };
                entry.insert(upgraded);
            }
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// First occurrence of a parameter, if any
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|value| value.values().first())
            .map(String::as_str)
    }

    /// Capture the pagination parameters, if the request paginates
    pub fn page_request(&self, default_size: u64) -> Option<PageRequest> {
        PageRequest::from_params(self.first("page"), self.first("size"), default_size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Sort direction parsed from a `sort_by` token suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One `<column>.<asc|desc>` token from a `sort_by` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortToken {
    pub column: String,
    pub direction: SortDirection,
}

impl SortToken {
    /// Parse a comma-separated token list
    ///
    /// Tokens without a recognized `.asc`/`.desc` suffix are dropped.
    pub fn parse_list(raw: &str) -> Vec<SortToken> {
        raw.split(',')
            .filter_map(|token| Self::parse(token.trim()))
            .collect()
    }

    fn parse(token: &str) -> Option<SortToken> {
        let (column, suffix) = token.rsplit_once('.')?;

        if column.is_empty() {
            return None;
        }

        let direction = match suffix {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };

        Some(SortToken {
            column: column.to_string(),
            direction,
        })
    }
}

/// Per-application filter state handed to predicate handlers
///
/// Wraps the builder for one `apply` call and owns the join registry and the
/// ordered sort buffer. Both are discarded when the application returns.
pub struct FilterContext<'a> {
    builder: &'a mut dyn QueryBuilder,
    joined: HashSet<String>,
    sorts: Vec<String>,
}

impl<'a> FilterContext<'a> {
    fn new(builder: &'a mut dyn QueryBuilder) -> Self {
        Self {
            builder,
            joined: HashSet::new(),
            sorts: Vec::new(),
        }
    }

    /// The query builder being filtered
    pub fn builder(&mut self) -> &mut dyn QueryBuilder {
        &mut *self.builder
    }

    /// Join a table at most once per filter application
    ///
    /// Predicate handlers may run once per value of a multi-select parameter;
    /// repeated calls for the same table must not stack duplicate joins.
    pub fn join_once(&mut self, table: &str, left_column: &str, right_column: &str) {
        if self.joined.insert(table.to_string()) {
            self.builder.join(table, left_column, right_column);
        }
    }

    fn flush_sorts(&mut self) {
        if !self.sorts.is_empty() {
            let expression = self.sorts.join(", ");
            self.builder.order_by_raw(&expression);
        }
    }
}

/// Predicate handler registered under a parameter name
pub type Predicate = Box<dyn Fn(&mut FilterContext<'_>, &[String]) + Send + Sync>;

/// An entity's filter registry: predicate handlers plus the sort whitelist
///
/// Handlers are registered explicitly under the exact parameter name they
/// serve; there is no name mangling or reflection involved. A default set
/// filters nothing and allows no sort columns.
#[derive(Default)]
pub struct FilterSet {
    predicates: IndexMap<String, Predicate>,
    sortable: HashSet<String>,
    table_prefix: Option<String>,
}

impl FilterSet {
    pub fn builder() -> FilterSetBuilder {
        FilterSetBuilder::default()
    }

    /// Whether a column may appear in a generated ORDER BY clause
    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable.contains(column)
    }

    /// Apply the registered filters to a query builder
    ///
    /// Walks `request` in parameter order: reserved names are intercepted
    /// (`sort_by` feeds the sort buffer, the rest are skipped), blank values
    /// place no constraint, known names run their handler and unknown names
    /// are ignored. Route-path parameters are then dispatched the same way,
    /// each wrapped in a single-element slice. Finally the buffered sort
    /// tokens are collapsed into one ORDER BY expression.
    pub fn apply(
        &self,
        builder: &mut dyn QueryBuilder,
        request: &FilterRequest,
        route_params: &[(&str, &str)],
    ) {
        let mut ctx = FilterContext::new(builder);

        for (name, value) in request.iter() {
            match name.as_str() {
                "page" | "size" | "with" => continue,
                "sort_by" => {
                    for raw in value.values() {
                        self.buffer_sorts(&mut ctx, raw);
                    }
                    continue;
                }
                _ => {}
            }

            if value.is_blank() {
                continue;
            }

            if let Some(predicate) = self.predicates.get(name.as_str()) {
                predicate(&mut ctx, value.values());
            }
        }

        for (name, value) in route_params {
            if let Some(predicate) = self.predicates.get(*name) {
                let values = [(*value).to_string()];
                predicate(&mut ctx, &values);
            }
        }

        ctx.flush_sorts();
    }

    /// Buffer the whitelisted tokens of one `sort_by` value
    fn buffer_sorts(&self, ctx: &mut FilterContext<'_>, raw: &str) {
        for token in SortToken::parse_list(raw) {
            if !self.sortable.contains(&token.column) {
                continue;
            }

            let prefix = self.table_prefix.as_deref().unwrap_or("");
            let table = ctx.builder.table().to_string();

            ctx.sorts.push(format!(
                "{prefix}{table}.{column} {direction}",
                column = token.column,
                direction = token.direction.as_sql(),
            ));
        }
    }
}

/// Builder for [`FilterSet`]
#[derive(Default)]
pub struct FilterSetBuilder {
    predicates: IndexMap<String, Predicate>,
    sortable: HashSet<String>,
    table_prefix: Option<String>,
}

impl FilterSetBuilder {
    /// Register a predicate handler under a parameter name
    pub fn predicate<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut FilterContext<'_>, &[String]) + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Box::new(handler));
        self
    }

    /// Declare the columns allowed in ORDER BY clauses
    pub fn sortable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Prefix generated `table.column` sort expressions with a schema prefix
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> FilterSet {
        FilterSet {
            predicates: self.predicates,
            sortable: self.sortable,
            table_prefix: self.table_prefix,
        }
    }
}
