//! Integration tests for the mounted admin router
//!
//! Drives a full admin tree (group -> resource -> components) backed by an
//! in-memory controller, through the axum router, with `tower::ServiceExt`.

use adminkit::{
    Admin, AdminConfig, AdminResult, Controller, Display, FieldSpec, FilterInput, FilterSpec,
    Group, HeaderRoles, ItemPage, ListQuery, Resource, ViewNode, Widget,
};
use adminkit::error::AdminError;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

// ===== In-memory controller =====

#[derive(Default)]
struct MemoryController {
    items: RwLock<BTreeMap<u64, Value>>,
    next_id: RwLock<u64>,
}

impl MemoryController {
    fn parse_pk(pk: &str) -> AdminResult<u64> {
        pk.parse().map_err(|_| AdminError::InvalidKey {
            key: pk.to_string(),
            details: "expected an integer".to_string(),
        })
    }
}

#[async_trait]
impl Controller for MemoryController {
    fn resource(&self) -> &str {
        "Widget"
    }

    async fn list(&self, query: &ListQuery) -> AdminResult<ItemPage> {
        let items = self.items.read();
        let matching: Vec<Value> = items
            .values()
            .filter(|item| match query.filters.get("search") {
                Some(needle) => item["name"]
                    .as_str()
                    .is_some_and(|name| name.contains(needle.as_str())),
                None => true,
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let per_page = query.per_page.unwrap_or(self.per_page());
        let start = ((query.page - 1) * per_page) as usize;
        let page_items: Vec<Value> = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Ok(ItemPage {
            items: page_items,
            total,
            page: query.page,
            pages: total.div_ceil(per_page),
        })
    }

    async fn get(&self, pk: &str) -> AdminResult<Option<Value>> {
        let pk = Self::parse_pk(pk)?;
        Ok(self.items.read().get(&pk).cloned())
    }

    async fn create(&self, mut payload: Value) -> AdminResult<Value> {
        let mut next = self.next_id.write();
        *next += 1;
        payload["id"] = json!(*next);
        self.items.write().insert(*next, payload.clone());
        Ok(payload)
    }

    async fn update(&self, pk: &str, payload: Value) -> AdminResult<Value> {
        let key = Self::parse_pk(pk)?;
        let mut items = self.items.write();
        let item = items
            .get_mut(&key)
            .ok_or_else(|| AdminError::not_found("Widget", pk))?;
        if let (Some(target), Some(source)) = (item.as_object_mut(), payload.as_object()) {
            for (field, value) in source {
                target.insert(field.clone(), value.clone());
            }
        }
        Ok(item.clone())
    }

    async fn delete(&self, pk: &str) -> AdminResult<()> {
        let key = Self::parse_pk(pk)?;
        if self.items.write().remove(&key).is_none() {
            return Err(AdminError::not_found("Widget", pk));
        }
        Ok(())
    }

    fn filter_specs(&self) -> Vec<FilterSpec> {
        vec![FilterSpec {
            key: "search".to_string(),
            label: "Search".to_string(),
            input: FilterInput::Search,
        }]
    }

    fn action_names(&self) -> Vec<String> {
        vec!["purge".to_string()]
    }

    async fn execute_action(&self, action: &str, ids: &[String]) -> AdminResult<u64> {
        if action != "purge" {
            return Err(AdminError::UnknownAction {
                name: action.to_string(),
            });
        }
        let mut affected = 0;
        let mut items = self.items.write();
        for id in ids {
            if items.remove(&Self::parse_pk(id)?).is_some() {
                affected += 1;
            }
        }
        Ok(affected)
    }
}

// ===== Fixtures =====

fn widget_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "minLength": 1 }
        },
        "required": ["name"]
    })
}

fn build_router() -> Router {
    let fields = [
        FieldSpec::new("name", Widget::Text),
        FieldSpec::new("active", Widget::Checkbox),
    ];
    let resource = Resource::new("Widget", Arc::new(MemoryController::default()))
        .with_display(Display::scaffold(&fields))
        .with_schema(widget_schema());
    let root = Group::new("Admin").register(resource);
    Admin::new(root)
        .with_config(AdminConfig::default())
        .into_router()
        .expect("mount")
}

fn build_restricted_router() -> Router {
    let resource = Resource::new("Widget", Arc::new(MemoryController::default()));
    let root = Group::new("Admin").register(resource);
    Admin::new(root)
        .with_role_provider(HeaderRoles::default())
        .into_router()
        .expect("mount")
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body, location)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_req(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_widget(router: &Router, name: &str) -> Value {
    let (status, body, _) = send(router, post_req("/admin/widget/create", json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// ===== Tests =====

#[tokio::test]
async fn landing_serves_menu_and_roles() {
    let router = build_router();
    let (status, body, _) = send(&router, get_req("/admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Admin");
    assert_eq!(body["menu"]["children"][0]["title"], "Widget");
    assert_eq!(body["menu"]["children"][0]["endpoint"], "widget:list");
    assert_eq!(body["menu"]["children"][0]["url"], "/admin/widget");
    assert_eq!(body["roles"]["list"][0], "widget:list");
}

#[tokio::test]
async fn list_returns_items_rules_and_filters() {
    let router = build_router();
    create_widget(&router, "blue").await;
    create_widget(&router, "red").await;

    let (status, body, _) = send(&router, get_req("/admin/widget")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["rules"][0]["kind"], "field");
    assert_eq!(body["filters"][0]["key"], "search");
    assert_eq!(body["actions"][0], "purge");
}

#[tokio::test]
async fn list_applies_search_filter() {
    let router = build_router();
    create_widget(&router, "blue").await;
    create_widget(&router, "red").await;

    let (status, body, _) = send(&router, get_req("/admin/widget?search=blu")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "blue");
}

#[tokio::test]
async fn create_returns_201_with_location() {
    let router = build_router();
    let (status, body, location) = send(
        &router,
        post_req("/admin/widget/create", json!({ "name": "gizmo" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "gizmo");
    assert_eq!(location.as_deref(), Some("/admin/widget"));
}

#[tokio::test]
async fn create_then_again_points_back_at_create() {
    let router = build_router();
    let (_, _, location) = send(
        &router,
        post_req("/admin/widget/create?then=again", json!({ "name": "gizmo" })),
    )
    .await;
    assert_eq!(location.as_deref(), Some("/admin/widget/create"));
}

#[tokio::test]
async fn create_rejects_invalid_payload_with_422() {
    let router = build_router();
    let (status, body, _) = send(
        &router,
        post_req("/admin/widget/create", json!({ "active": true })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["title"], "Validation Failed");
    assert!(!body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_form_describes_fields_and_schema() {
    let router = build_router();
    let (status, body, _) = send(&router, get_req("/admin/widget/create")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rules"][0]["name"], "name");
    assert_eq!(body["schema"]["required"][0], "name");
    assert!(body.get("item").is_none());
}

#[tokio::test]
async fn read_returns_item_or_404() {
    let router = build_router();
    let created = create_widget(&router, "gizmo").await;
    let id = created["id"].as_u64().unwrap();

    let (status, body, _) = send(&router, get_req(&format!("/admin/widget/read/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["name"], "gizmo");

    let (status, body, _) = send(&router, get_req("/admin/widget/read/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Widget Not Found");
}

#[tokio::test]
async fn update_merges_fields_and_honors_continue() {
    let router = build_router();
    let created = create_widget(&router, "gizmo").await;
    let id = created["id"].as_u64().unwrap();

    let (status, body, location) = send(
        &router,
        post_req(
            &format!("/admin/widget/update/{id}?then=continue"),
            json!({ "name": "doohickey" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "doohickey");
    assert_eq!(
        location.as_deref(),
        Some(format!("/admin/widget/update/{id}").as_str())
    );
}

#[tokio::test]
async fn update_missing_item_is_404() {
    let router = build_router();
    let (status, _, _) = send(
        &router,
        post_req("/admin/widget/update/999", json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_confirm_then_delete() {
    let router = build_router();
    let created = create_widget(&router, "gizmo").await;
    let id = created["id"].as_u64().unwrap();

    // confirm view carries the confirmation marker
    let (status, body, _) = send(&router, get_req(&format!("/admin/widget/delete/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let rules = body["rules"].as_array().unwrap();
    assert_eq!(rules.last().unwrap()["kind"], "confirm");

    let (status, _, _) = send(
        &router,
        post_req(&format!("/admin/widget/delete/{id}"), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&router, get_req(&format!("/admin/widget/read/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_action_executes_and_reports_count() {
    let router = build_router();
    let a = create_widget(&router, "a").await;
    let b = create_widget(&router, "b").await;
    create_widget(&router, "c").await;

    let ids = vec![a["id"].to_string(), b["id"].to_string()];
    let (status, body, _) = send(
        &router,
        post_req("/admin/widget", json!({ "action": "purge", "ids": ids })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 2);

    let (_, body, _) = send(&router, get_req("/admin/widget")).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn unknown_bulk_action_is_400() {
    let router = build_router();
    let (status, body, _) = send(
        &router,
        post_req("/admin/widget", json!({ "action": "explode", "ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Unknown Action");
}

#[tokio::test]
async fn invalid_pk_is_400() {
    let router = build_router();
    let (status, body, _) = send(&router, get_req("/admin/widget/read/not-a-number")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Invalid Key");
}

#[tokio::test]
async fn custom_view_mounts_into_the_tree() {
    let stats = ViewNode::new(
        "Stats",
        axum::routing::get(|| async { axum::Json(json!({ "ok": true })) }),
    );
    let root = Group::new("Admin").register(stats);
    let router = Admin::new(root).into_router().expect("mount");

    let (status, body, _) = send(&router, get_req("/admin/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, body, _) = send(&router, get_req("/admin")).await;
    assert_eq!(body["menu"]["children"][0]["endpoint"], "stats");
    assert_eq!(body["menu"]["children"][0]["url"], "/admin/stats");
}

#[tokio::test]
async fn restricted_router_rejects_missing_roles() {
    let router = build_restricted_router();
    let (status, _, _) = send(&router, get_req("/admin/widget")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn restricted_router_honors_granted_roles() {
    let router = build_restricted_router();
    let request = Request::builder()
        .uri("/admin/widget")
        .header("x-admin-roles", "widget:list")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    // granted list does not imply delete
    let request = Request::builder()
        .method("POST")
        .uri("/admin/widget/delete/1")
        .header("x-admin-roles", "widget:list")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn restricted_landing_filters_menu() {
    let router = build_restricted_router();
    let request = Request::builder()
        .uri("/admin")
        .header("x-admin-roles", "home, widget:list")
        .body(Body::empty())
        .unwrap();
    let (status, body, _) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu"]["children"][0]["endpoint"], "widget:list");
    assert_eq!(body["roles"]["list"][0], "widget:list");
    // ungranted roles come back empty
    assert!(body["roles"]["delete"].as_array().unwrap().is_empty());
}
