//! Resource and group composition
//!
//! A [`Resource`] binds a controller and display rules to a set of CRUD
//! components; a [`Group`] nests resources, custom views, and other groups.
//! [`Admin`] mounts the tree: a single walk derives every endpoint's
//! absolute URL and name from the ancestor path, registers the routes flat
//! on an [`axum::Router`], and collects the navigation menu and role map
//! served by landing endpoints.

use crate::auth::{AllowAll, RoleProvider};
use crate::component::{self, Role};
use crate::config::AdminConfig;
use crate::controller::Controller;
use crate::display::Display;
use crate::error::MountError;
use crate::tree::{concat_urls, slugify, MenuNode};
use axum::{
    extract::Extension,
    http::HeaderMap,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use utoipa::ToSchema;

/// Role slug -> endpoint names holding that role, for the whole tree.
pub type RoleMap = BTreeMap<String, Vec<String>>;

/// Name and absolute URL of one mounted endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRef {
    pub name: String,
    pub url: String,
}

/// Per-resource context injected into component handlers.
pub struct CrudContext {
    pub name: String,
    pub controller: Arc<dyn Controller>,
    pub display: Display,
    pub schema: Option<Value>,
    endpoints: HashMap<Role, EndpointRef>,
    list_url: String,
}

impl CrudContext {
    /// Endpoint reference for a role, when the resource mounts it.
    pub fn endpoint(&self, role: Role) -> Option<&EndpointRef> {
        self.endpoints.get(&role)
    }

    /// Where a successful mutation should send the client next.
    ///
    /// `then=again` points at the create endpoint, `then=continue` at the
    /// update endpoint of the touched item; the default is the list URL.
    pub fn success_location(&self, then: Option<&str>, item: Option<&Value>) -> String {
        match then {
            Some("again") => self.endpoint(Role::Create).map(|e| e.url.clone()),
            Some("continue") => item
                .and_then(|item| item.get(self.controller.pk_field()))
                .map(|pk| match pk {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .and_then(|pk| {
                    self.endpoint(Role::Update)
                        .map(|e| e.url.replace("{pk}", &pk))
                }),
            _ => None,
        }
        .unwrap_or_else(|| self.list_url.clone())
    }
}

/// Tree-wide state layered onto the mounted router.
pub struct AdminState {
    pub title: String,
    pub menu: MenuNode,
    pub roles: RoleMap,
    pub guard: Arc<dyn RoleProvider>,
    pub config: AdminConfig,
}

/// Landing view response: the navigation menu and role map, both filtered
/// down to what the caller's grant allows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingPage {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuNode>,
    pub roles: RoleMap,
}

pub(crate) async fn landing(
    Extension(state): Extension<Arc<AdminState>>,
    headers: HeaderMap,
) -> Json<LandingPage> {
    let grant = state.guard.granted(&headers).await;
    let roles: RoleMap = state
        .roles
        .iter()
        .map(|(role, endpoints)| {
            let granted = endpoints
                .iter()
                .filter(|endpoint| grant.allows(endpoint))
                .cloned()
                .collect();
            (role.clone(), granted)
        })
        .collect();
    Json(LandingPage {
        title: state.title.clone(),
        menu: state.menu.restrict(&grant),
        roles,
    })
}

// ===== Tree nodes =====

/// A CRUD resource: controller + display rules + component subset.
pub struct Resource {
    name: String,
    url: String,
    controller: Arc<dyn Controller>,
    display: Display,
    schema: Option<Value>,
    components: Vec<Role>,
}

impl Resource {
    /// New resource with all five components and a URL slug derived from
    /// the name.
    pub fn new(name: impl Into<String>, controller: Arc<dyn Controller>) -> Self {
        let name = name.into();
        let url = slugify(&name);
        Self {
            name,
            url,
            controller,
            display: Display::default(),
            schema: None,
            components: Role::ALL.to_vec(),
        }
    }

    /// Override the URL segment.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set display rules.
    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Attach a JSON Schema that create/update payloads must satisfy.
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Mount only a subset of components.
    #[must_use]
    pub fn with_components(mut self, components: Vec<Role>) -> Self {
        self.components = components;
        self
    }
}

/// A custom view mounted into the tree alongside resources.
pub struct ViewNode {
    name: String,
    url: String,
    handler: MethodRouter,
}

impl ViewNode {
    pub fn new(name: impl Into<String>, handler: MethodRouter) -> Self {
        let name = name.into();
        let url = slugify(&name);
        Self { name, url, handler }
    }

    /// Override the URL segment.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Any child of a group.
pub enum Node {
    Group(Group),
    Resource(Box<Resource>),
    View(ViewNode),
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Resource> for Node {
    fn from(resource: Resource) -> Self {
        Node::Resource(Box::new(resource))
    }
}

impl From<ViewNode> for Node {
    fn from(view: ViewNode) -> Self {
        Node::View(view)
    }
}

/// A named subtree with a landing endpoint.
pub struct Group {
    name: String,
    url: String,
    children: Vec<Node>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let url = slugify(&name);
        Self {
            name,
            url,
            children: Vec::new(),
        }
    }

    /// Override the URL segment.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Register a child node.
    #[must_use]
    pub fn register(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }
}

// ===== Mounting =====

/// Entry point: mounts a group tree onto an axum router.
pub struct Admin {
    root: Group,
    guard: Arc<dyn RoleProvider>,
    config: AdminConfig,
}

impl Admin {
    pub fn new(root: Group) -> Self {
        Self {
            root,
            guard: Arc::new(AllowAll),
            config: AdminConfig::default(),
        }
    }

    /// Use a role provider instead of the default allow-all.
    #[must_use]
    pub fn with_role_provider(mut self, provider: impl RoleProvider + 'static) -> Self {
        self.guard = Arc::new(provider);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: AdminConfig) -> Self {
        self.config = config;
        self
    }

    /// Walk the tree and register every endpoint.
    pub fn into_router(self) -> Result<Router, MountError> {
        let mut walk = Walk {
            router: Router::new(),
            roles: RoleMap::new(),
            seen: HashSet::new(),
        };
        let root_urls = vec![self.root.url.clone()];
        let menu = mount_group(self.root, Vec::new(), root_urls, &mut walk)?;

        tracing::info!(endpoints = walk.seen.len(), "admin tree mounted");

        let state = Arc::new(AdminState {
            title: self.config.title.clone(),
            menu,
            roles: walk.roles,
            guard: self.guard,
            config: self.config,
        });
        Ok(walk.router.layer(Extension(state)))
    }
}

struct Walk {
    router: Router,
    roles: RoleMap,
    seen: HashSet<String>,
}

impl Walk {
    fn claim(&mut self, name: &str) -> Result<(), MountError> {
        if self.seen.insert(name.to_string()) {
            Ok(())
        } else {
            Err(MountError::DuplicateEndpoint {
                name: name.to_string(),
            })
        }
    }

    fn route(&mut self, path: &str, method_router: MethodRouter) {
        self.router = std::mem::take(&mut self.router).route(path, method_router);
    }
}

/// Mount a group. `names` holds the ancestor slugs including this group's
/// own (empty for the root group, which is excluded from names); `urls`
/// holds the ancestor URL segments including this group's own.
fn mount_group(
    group: Group,
    names: Vec<String>,
    urls: Vec<String>,
    walk: &mut Walk,
) -> Result<MenuNode, MountError> {
    let landing_name = if names.is_empty() {
        "home".to_string()
    } else {
        names.join(":")
    };
    let landing_url = concat_urls(&urls);
    walk.claim(&landing_name)?;
    walk.route(&landing_url, get(landing));
    tracing::debug!(endpoint = %landing_name, url = %landing_url, "mounted landing");

    let mut menu = MenuNode {
        title: group.name,
        endpoint: Some(landing_name),
        url: Some(landing_url),
        children: Vec::new(),
    };

    for child in group.children {
        match child {
            Node::Group(sub) => {
                let mut child_names = names.clone();
                child_names.push(slugify(&sub.name));
                let mut child_urls = urls.clone();
                child_urls.push(sub.url.clone());
                menu.children
                    .push(mount_group(sub, child_names, child_urls, walk)?);
            }
            Node::Resource(resource) => {
                menu.children
                    .push(mount_resource(*resource, &names, &urls, walk)?);
            }
            Node::View(view) => {
                let mut view_names = names.clone();
                view_names.push(slugify(&view.name));
                let name = view_names.join(":");
                let url = concat_urls(urls.iter().map(String::as_str).chain([view.url.as_str()]));
                walk.claim(&name)?;
                walk.route(&url, view.handler);
                menu.children.push(MenuNode::leaf(view.name, name, url));
            }
        }
    }
    Ok(menu)
}

fn mount_resource(
    resource: Resource,
    parent_names: &[String],
    parent_urls: &[String],
    walk: &mut Walk,
) -> Result<MenuNode, MountError> {
    if resource.components.is_empty() {
        return Err(MountError::EmptyResource {
            name: resource.name,
        });
    }

    let mut names = parent_names.to_vec();
    names.push(slugify(&resource.name));
    let abs_name = names.join(":");

    let mut endpoints = HashMap::new();
    for role in &resource.components {
        let name = format!("{abs_name}:{}", role.slug());
        walk.claim(&name)?;
        let url = concat_urls(
            parent_urls
                .iter()
                .map(String::as_str)
                .chain([resource.url.as_str(), role.url_suffix()]),
        );
        walk.roles
            .entry(role.slug().to_string())
            .or_default()
            .push(name.clone());
        endpoints.insert(*role, EndpointRef { name, url });
    }

    let list_url = endpoints
        .get(&Role::List)
        .map(|e| e.url.clone())
        .unwrap_or_else(|| {
            concat_urls(
                parent_urls
                    .iter()
                    .map(String::as_str)
                    .chain([resource.url.as_str()]),
            )
        });
    // the menu points at the list component when present, else the first one
    let main = endpoints
        .get(&Role::List)
        .or_else(|| resource.components.first().and_then(|r| endpoints.get(r)))
        .map(|e| e.name.clone())
        .unwrap_or_else(|| abs_name.clone());
    let menu = MenuNode::leaf(resource.name.clone(), main, list_url.clone());

    let components = resource.components.clone();
    let ctx = Arc::new(CrudContext {
        name: resource.name,
        controller: resource.controller,
        display: resource.display,
        schema: resource.schema,
        endpoints,
        list_url,
    });

    for role in components {
        let Some(endpoint) = ctx.endpoint(role) else {
            continue;
        };
        let url = endpoint.url.clone();
        let name = endpoint.name.clone();
        let method_router = match role {
            Role::List => get(component::list_get).post(component::list_post),
            Role::Create => get(component::create_get).post(component::create_post),
            Role::Read => get(component::read_get),
            Role::Update => get(component::update_get).post(component::update_post),
            Role::Delete => get(component::delete_get).post(component::delete_post),
        }
        .layer(Extension(ctx.clone()));
        walk.route(&url, method_router);
        tracing::debug!(endpoint = %name, url = %url, "mounted component");
    }

    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ItemPage, ListQuery};
    use crate::error::AdminResult;
    use async_trait::async_trait;

    struct NullController;

    #[async_trait]
    impl Controller for NullController {
        fn resource(&self) -> &str {
            "null"
        }

        async fn list(&self, _query: &ListQuery) -> AdminResult<ItemPage> {
            Ok(ItemPage {
                items: Vec::new(),
                total: 0,
                page: 1,
                pages: 0,
            })
        }

        async fn get(&self, _pk: &str) -> AdminResult<Option<Value>> {
            Ok(None)
        }

        async fn create(&self, payload: Value) -> AdminResult<Value> {
            Ok(payload)
        }

        async fn update(&self, _pk: &str, payload: Value) -> AdminResult<Value> {
            Ok(payload)
        }

        async fn delete(&self, _pk: &str) -> AdminResult<()> {
            Ok(())
        }
    }

    fn resource(name: &str) -> Resource {
        Resource::new(name, Arc::new(NullController))
    }

    #[test]
    fn mount_rejects_duplicate_endpoints() {
        let root = Group::new("Admin")
            .register(resource("Tag"))
            .register(resource("Tag"));
        let err = Admin::new(root).into_router().unwrap_err();
        assert!(matches!(err, MountError::DuplicateEndpoint { name } if name == "tag:list"));
    }

    #[test]
    fn mount_rejects_empty_resource() {
        let root = Group::new("Admin").register(resource("Tag").with_components(Vec::new()));
        let err = Admin::new(root).into_router().unwrap_err();
        assert!(matches!(err, MountError::EmptyResource { .. }));
    }

    #[test]
    fn mount_accepts_nested_groups() {
        let root = Group::new("Admin")
            .register(Group::new("Tagging").register(resource("Tag")))
            .register(resource("User"));
        assert!(Admin::new(root).into_router().is_ok());
    }

    #[test]
    fn success_location_honors_then_param() {
        let endpoints = HashMap::from([
            (
                Role::Create,
                EndpointRef {
                    name: "tag:create".to_string(),
                    url: "/admin/tag/create".to_string(),
                },
            ),
            (
                Role::Update,
                EndpointRef {
                    name: "tag:update".to_string(),
                    url: "/admin/tag/update/{pk}".to_string(),
                },
            ),
        ]);
        let ctx = CrudContext {
            name: "Tag".to_string(),
            controller: Arc::new(NullController),
            display: Display::default(),
            schema: None,
            endpoints,
            list_url: "/admin/tag".to_string(),
        };
        let item = serde_json::json!({ "id": 7 });

        assert_eq!(ctx.success_location(None, Some(&item)), "/admin/tag");
        assert_eq!(
            ctx.success_location(Some("again"), Some(&item)),
            "/admin/tag/create"
        );
        assert_eq!(
            ctx.success_location(Some("continue"), Some(&item)),
            "/admin/tag/update/7"
        );
        // unknown selector falls back to the list
        assert_eq!(ctx.success_location(Some("weird"), Some(&item)), "/admin/tag");
    }
}
