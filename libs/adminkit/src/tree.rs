//! URL/name derivation for the admin route tree
//!
//! Nodes in the admin hierarchy are identified two ways:
//! - an absolute URL: the `/`-joined URL segments of every ancestor,
//! - an absolute name: the `:`-joined slugs of every ancestor, excluding
//!   the root group (the root landing endpoint is simply `home`).
//!
//! Both are pure functions of the node's position; the mount walk in
//! [`crate::crud`] carries the ancestor path down the tree and derives them
//! for every endpoint it registers.

use crate::auth::Grant;
use serde::Serialize;
use utoipa::ToSchema;

/// Turn a display name into a URL/endpoint slug.
///
/// CamelCase boundaries become underscores and spaces collapse into
/// underscores: `"TagKind"` -> `"tag_kind"`, `"My CRUD"` -> `"my_crud"`.
pub fn slugify(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let boundary = match chars.get(i.wrapping_sub(1)).filter(|_| i > 0) {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                // acronym end: "HTTPServer" -> "http_server"
                Some(p) if p.is_uppercase() => {
                    chars.get(i + 1).is_some_and(|n| n.is_lowercase())
                }
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Join URL segments into a normalized absolute path.
///
/// Empty segments are dropped, separators are collapsed, the result has a
/// leading slash and no trailing slash. No segments at all yields `/`.
pub fn concat_urls<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: Vec<String> = parts
        .into_iter()
        .map(|p| p.as_ref().trim_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// One node of the navigation menu served by landing endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuNode {
    /// Display title
    pub title: String,

    /// Endpoint name, when the node is routable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Absolute URL, when the node is routable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Child menu entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// A leaf entry pointing at an endpoint.
    pub fn leaf(title: impl Into<String>, endpoint: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            endpoint: Some(endpoint.into()),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    /// Filter the menu down to entries the grant allows.
    ///
    /// A node survives when its own endpoint is granted or any child
    /// survives; pruned subtrees disappear entirely.
    pub fn restrict(&self, grant: &Grant) -> Option<MenuNode> {
        let children: Vec<MenuNode> = self
            .children
            .iter()
            .filter_map(|child| child.restrict(grant))
            .collect();
        let self_allowed = self
            .endpoint
            .as_deref()
            .is_some_and(|endpoint| grant.allows(endpoint));
        if self_allowed || !children.is_empty() {
            Some(MenuNode {
                title: self.title.clone(),
                endpoint: self.endpoint.clone(),
                url: self.url.clone(),
                children,
            })
        } else {
            None
        }
    }
}
