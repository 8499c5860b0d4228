//! Role-based visibility
//!
//! Every component endpoint carries a name (`tag:list`, `tag:create`, ...);
//! a [`RoleProvider`] resolves which of those the caller holds. Components
//! refuse with 401 when their own endpoint name is missing from the grant,
//! and landing views filter the navigation menu to granted entries.

use async_trait::async_trait;
use axum::http::HeaderMap;
use std::collections::HashSet;

/// The set of endpoint names a caller may use.
#[derive(Debug, Clone)]
pub enum Grant {
    /// Unrestricted access
    All,
    /// Access limited to the named endpoints
    Endpoints(HashSet<String>),
}

impl Grant {
    /// Check whether an endpoint name is granted.
    pub fn allows(&self, endpoint: &str) -> bool {
        match self {
            Self::All => true,
            Self::Endpoints(names) => names.contains(endpoint),
        }
    }
}

/// Resolves the caller's grant from the request.
///
/// Implementations bridge whatever session or token system hosts the admin;
/// the crate ships [`AllowAll`] (development) and [`HeaderRoles`] (roles
/// forwarded by an authenticating proxy).
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Resolve the grant for a request.
    async fn granted(&self, headers: &HeaderMap) -> Grant;
}

/// Grants everything. The default provider.
#[derive(Debug, Clone, Default)]
pub struct AllowAll;

#[async_trait]
impl RoleProvider for AllowAll {
    async fn granted(&self, _headers: &HeaderMap) -> Grant {
        Grant::All
    }
}

/// Reads granted endpoint names from a comma-separated request header.
///
/// Intended for deployments where an authenticating reverse proxy resolves
/// the user's roles and forwards them; a missing header grants nothing.
#[derive(Debug, Clone)]
pub struct HeaderRoles {
    header: String,
}

impl HeaderRoles {
    /// Read grants from the given header name.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for HeaderRoles {
    fn default() -> Self {
        Self::new("x-admin-roles")
    }
}

#[async_trait]
impl RoleProvider for HeaderRoles {
    async fn granted(&self, headers: &HeaderMap) -> Grant {
        let names = headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();
        Grant::Endpoints(names)
    }
}
