//! Controller abstraction over the persistence layer
//!
//! The [`Controller`] trait is the seam between the generated views and the
//! ORM: object-safe, with items crossing as [`serde_json::Value`] so a
//! resource can be wired without the router knowing the model type.
//! `adminkit-seaorm` provides the SeaORM-backed implementation.

use crate::display::Choice;
use crate::error::{AdminError, AdminResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Default page size when neither controller nor query specify one.
pub const DEFAULT_PER_PAGE: u64 = 25;

/// Parameters of a list request.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u64,
    /// Page size override
    pub per_page: Option<u64>,
    /// Column to sort by; a leading `-` means descending
    pub order_by: Option<String>,
    /// Filter key/value pairs, in query-string order. Unknown keys are
    /// ignored by controllers.
    pub filters: IndexMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: None,
            order_by: None,
            filters: IndexMap::new(),
        }
    }
}

impl ListQuery {
    /// Build from raw query parameters, splitting reserved keys
    /// (`page`, `per_page`, `order_by`, `then`) from filter values.
    pub fn from_params(params: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "page" => {
                    query.page = value.parse().unwrap_or(1).max(1);
                }
                "per_page" => {
                    query.per_page = value.parse().ok();
                }
                "order_by" => {
                    if !value.is_empty() {
                        query.order_by = Some(value);
                    }
                }
                "then" => {}
                _ => {
                    if !value.is_empty() {
                        query.filters.insert(key, value);
                    }
                }
            }
        }
        query
    }
}

/// One page of items plus paging totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemPage {
    /// Items as JSON objects
    pub items: Vec<Value>,
    /// Total matching items, ignoring paging
    pub total: u64,
    /// 1-based page number
    pub page: u64,
    /// Total page count
    pub pages: u64,
}

/// Declarative description of one registered filter, for the UI.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterSpec {
    /// Query-string key
    pub key: String,
    /// Display label
    pub label: String,
    /// Input control
    #[serde(flatten)]
    pub input: FilterInput,
}

/// Input control a filter renders as.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum FilterInput {
    /// Free-text search box
    Search,
    /// Select with a fixed choice list
    Select { choices: Vec<Choice> },
}

/// Mediates between the generated views and the persistence layer.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Human-readable resource name, used in error messages.
    fn resource(&self) -> &str;

    /// Name of the primary-key field in item JSON.
    fn pk_field(&self) -> &str {
        "id"
    }

    /// Default page size.
    fn per_page(&self) -> u64 {
        DEFAULT_PER_PAGE
    }

    /// Return a page of items matching the query.
    async fn list(&self, query: &ListQuery) -> AdminResult<ItemPage>;

    /// Return a single item by primary key, `None` when missing.
    async fn get(&self, pk: &str) -> AdminResult<Option<Value>>;

    /// Create a new item from a JSON payload.
    async fn create(&self, payload: Value) -> AdminResult<Value>;

    /// Update an existing item from a JSON payload.
    async fn update(&self, pk: &str, payload: Value) -> AdminResult<Value>;

    /// Delete an item by primary key.
    async fn delete(&self, pk: &str) -> AdminResult<()>;

    /// Declarative filter descriptions for the list UI.
    fn filter_specs(&self) -> Vec<FilterSpec> {
        Vec::new()
    }

    /// Names of registered bulk actions, in registration order.
    fn action_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Run a bulk action over the given primary keys, returning the number
    /// of affected items.
    async fn execute_action(&self, action: &str, ids: &[String]) -> AdminResult<u64> {
        let _ = ids;
        Err(AdminError::UnknownAction {
            name: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_params_splits_reserved_keys() {
        let query = ListQuery::from_params(vec![
            ("page".to_string(), "3".to_string()),
            ("order_by".to_string(), "-name".to_string()),
            ("search".to_string(), "blue".to_string()),
            ("then".to_string(), "again".to_string()),
        ]);
        assert_eq!(query.page, 3);
        assert_eq!(query.order_by.as_deref(), Some("-name"));
        assert_eq!(query.filters.get("search").map(String::as_str), Some("blue"));
        assert!(!query.filters.contains_key("then"));
        assert!(!query.filters.contains_key("page"));
    }

    #[test]
    fn from_params_clamps_page() {
        let query = ListQuery::from_params(vec![("page".to_string(), "0".to_string())]);
        assert_eq!(query.page, 1);
        let query = ListQuery::from_params(vec![("page".to_string(), "junk".to_string())]);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn from_params_drops_empty_filter_values() {
        let query = ListQuery::from_params(vec![("kind".to_string(), String::new())]);
        assert!(query.filters.is_empty());
    }
}
