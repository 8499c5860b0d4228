//! Per-role CRUD components
//!
//! Each role is a pair of handlers: GET renders (items plus the display
//! rules the frontend feeds to its macros), POST mutates. Every handler
//! authorizes first, then delegates to the resource's controller; domain
//! errors surface as RFC-9457 problems.

use crate::controller::{FilterSpec, ItemPage, ListQuery};
use crate::crud::{AdminState, CrudContext};
use crate::display::Rule;
use crate::error::{AdminError, Problem};
use crate::validate::validate_against_schema;
use axum::{
    extract::{Extension, Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

/// CRUD role of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    List,
    Create,
    Read,
    Update,
    Delete,
}

impl Role {
    /// All roles, in the order a resource registers them by default.
    pub const ALL: [Role; 5] = [
        Role::List,
        Role::Create,
        Role::Read,
        Role::Update,
        Role::Delete,
    ];

    /// Endpoint-name suffix for the role.
    pub fn slug(self) -> &'static str {
        match self {
            Role::List => "list",
            Role::Create => "create",
            Role::Read => "read",
            Role::Update => "update",
            Role::Delete => "delete",
        }
    }

    /// URL suffix of the role below the resource URL.
    pub(crate) fn url_suffix(self) -> &'static str {
        match self {
            Role::List => "",
            Role::Create => "create",
            Role::Read => "read/{pk}",
            Role::Update => "update/{pk}",
            Role::Delete => "delete/{pk}",
        }
    }
}

// ===== Response DTOs =====

/// List view response: one page of items plus everything the list UI needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPage {
    /// Resource name
    pub resource: String,

    #[serde(flatten)]
    pub page: ItemPage,

    /// Rendering rules for the list role
    pub rules: Vec<Rule>,

    /// Registered filters
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,

    /// Registered bulk actions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    /// Echo of the requested ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

/// Create/Update form description.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormView {
    /// Resource name
    pub resource: String,

    /// Rendering rules for the form
    pub rules: Vec<Rule>,

    /// JSON Schema the payload must satisfy, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    /// Current item values (update forms only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
}

/// Read/Delete item view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemView {
    /// Resource name
    pub resource: String,

    /// Primary key as requested
    pub pk: String,

    /// The item
    pub item: Value,

    /// Rendering rules for the role
    pub rules: Vec<Rule>,
}

/// Bulk action request posted to the list endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActionRequest {
    /// Registered action name
    pub action: String,

    /// Primary keys to act on
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Bulk action result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionOutcome {
    /// Action name
    pub action: String,

    /// Number of affected items
    pub affected: u64,
}

/// Success-redirect selector on create/update.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ThenParams {
    pub then: Option<String>,
}

// ===== Permission check =====

async fn authorize(
    state: &AdminState,
    ctx: &CrudContext,
    role: Role,
    headers: &HeaderMap,
) -> Result<(), Problem> {
    let endpoint = ctx
        .endpoint(role)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| format!("{}:{}", ctx.name, role.slug()));
    let grant = state.guard.granted(headers).await;
    if grant.allows(&endpoint) {
        Ok(())
    } else {
        Err(Problem::from(AdminError::PermissionDenied { endpoint }))
    }
}

// ===== List =====

pub(crate) async fn list_get(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ListPage>, Problem> {
    authorize(&state, &ctx, Role::List, &headers).await?;

    let mut query = ListQuery::from_params(params);
    if let Some(per_page) = query.per_page {
        query.per_page = Some(per_page.clamp(1, state.config.max_per_page));
    }

    let page = ctx.controller.list(&query).await?;
    Ok(Json(ListPage {
        resource: ctx.name.clone(),
        page,
        rules: ctx.display.rules(Role::List).to_vec(),
        filters: ctx.controller.filter_specs(),
        actions: ctx.controller.action_names(),
        order_by: query.order_by,
    }))
}

pub(crate) async fn list_post(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Json(req): Json<ActionRequest>,
) -> Result<Json<ActionOutcome>, Problem> {
    authorize(&state, &ctx, Role::List, &headers).await?;

    let affected = ctx.controller.execute_action(&req.action, &req.ids).await?;
    tracing::info!(
        resource = %ctx.name,
        action = %req.action,
        affected,
        "bulk action executed"
    );
    Ok(Json(ActionOutcome {
        action: req.action,
        affected,
    }))
}

// ===== Create =====

pub(crate) async fn create_get(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
) -> Result<Json<FormView>, Problem> {
    authorize(&state, &ctx, Role::Create, &headers).await?;

    Ok(Json(FormView {
        resource: ctx.name.clone(),
        rules: ctx.display.rules(Role::Create).to_vec(),
        schema: ctx.schema.clone(),
        item: None,
    }))
}

pub(crate) async fn create_post(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Query(params): Query<ThenParams>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    authorize(&state, &ctx, Role::Create, &headers).await?;

    if let Some(schema) = &ctx.schema {
        validate_against_schema(&payload, schema)?;
    }
    let item = ctx.controller.create(payload).await?;
    let location = ctx.success_location(params.then.as_deref(), Some(&item));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    )
        .into_response())
}

// ===== Read =====

pub(crate) async fn read_get(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Path(pk): Path<String>,
) -> Result<Json<ItemView>, Problem> {
    authorize(&state, &ctx, Role::Read, &headers).await?;

    let item = ctx
        .controller
        .get(&pk)
        .await?
        .ok_or_else(|| Problem::from(AdminError::not_found(ctx.name.clone(), pk.clone())))?;
    Ok(Json(ItemView {
        resource: ctx.name.clone(),
        pk,
        item,
        rules: ctx.display.rules(Role::Read).to_vec(),
    }))
}

// ===== Update =====

pub(crate) async fn update_get(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Path(pk): Path<String>,
) -> Result<Json<FormView>, Problem> {
    authorize(&state, &ctx, Role::Update, &headers).await?;

    let item = ctx
        .controller
        .get(&pk)
        .await?
        .ok_or_else(|| Problem::from(AdminError::not_found(ctx.name.clone(), pk.clone())))?;
    Ok(Json(FormView {
        resource: ctx.name.clone(),
        rules: ctx.display.rules(Role::Update).to_vec(),
        schema: ctx.schema.clone(),
        item: Some(item),
    }))
}

pub(crate) async fn update_post(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Path(pk): Path<String>,
    Query(params): Query<ThenParams>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    authorize(&state, &ctx, Role::Update, &headers).await?;

    if let Some(schema) = &ctx.schema {
        validate_against_schema(&payload, schema)?;
    }
    let item = ctx.controller.update(&pk, payload).await?;
    let location = ctx.success_location(params.then.as_deref(), Some(&item));
    Ok((StatusCode::OK, [(header::LOCATION, location)], Json(item)).into_response())
}

// ===== Delete =====

pub(crate) async fn delete_get(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Path(pk): Path<String>,
) -> Result<Json<ItemView>, Problem> {
    authorize(&state, &ctx, Role::Delete, &headers).await?;

    let item = ctx
        .controller
        .get(&pk)
        .await?
        .ok_or_else(|| Problem::from(AdminError::not_found(ctx.name.clone(), pk.clone())))?;
    Ok(Json(ItemView {
        resource: ctx.name.clone(),
        pk,
        item,
        rules: ctx.display.rules(Role::Delete).to_vec(),
    }))
}

pub(crate) async fn delete_post(
    Extension(state): Extension<Arc<AdminState>>,
    Extension(ctx): Extension<Arc<CrudContext>>,
    headers: HeaderMap,
    Path(pk): Path<String>,
) -> Result<StatusCode, Problem> {
    authorize(&state, &ctx, Role::Delete, &headers).await?;

    ctx.controller.delete(&pk).await?;
    tracing::info!(resource = %ctx.name, pk = %pk, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}
