//! Admin error types and RFC-9457 Problem Details mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result alias used across the admin layers.
pub type AdminResult<T> = Result<T, AdminError>;

/// Transport-agnostic admin errors.
///
/// Raised by controllers and components; the HTTP edge maps them to
/// Problem Details via [`map_admin_error`].
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Item or resource not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource name (e.g. the model name)
        resource: String,
        /// Primary key or identifier
        id: String,
    },

    /// Caller lacks the role required by an endpoint
    #[error("permission denied for {endpoint}")]
    PermissionDenied {
        /// Endpoint name the caller is missing
        endpoint: String,
    },

    /// Payload failed validation
    #[error("validation failed: {}", errors.join(", "))]
    Validation {
        /// One message per failed check
        errors: Vec<String>,
    },

    /// Bulk action name is not registered
    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    /// Primary key string could not be parsed
    #[error("invalid key '{key}': {details}")]
    InvalidKey { key: String, details: String },

    /// Conflicting state (duplicate, constraint violation)
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Persistence layer failure
    #[error("database error: {0}")]
    Database(anyhow::Error),
}

impl AdminError {
    /// Wrap a persistence-layer error.
    pub fn database(err: impl Into<anyhow::Error>) -> Self {
        Self::Database(err.into())
    }

    /// Shorthand for a not-found error.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

/// Errors raised while mounting an admin tree onto a router.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// Two nodes derived the same endpoint name
    #[error("duplicate endpoint name: {name}")]
    DuplicateEndpoint { name: String },

    /// A resource was registered without any components
    #[error("resource '{name}' has no components")]
    EmptyResource { name: String },
}

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Per-field validation messages, when the problem is a validation failure
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            errors: Vec::new(),
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach validation messages
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map admin errors to HTTP Problem Details
pub fn map_admin_error(error: AdminError) -> Problem {
    match error {
        AdminError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{resource} Not Found"))
                .with_detail(format!("{resource} with id '{id}' was not found"))
        }

        AdminError::PermissionDenied { endpoint } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Permission Denied")
                .with_detail(format!("missing role for '{endpoint}'"))
        }

        AdminError::Validation { errors } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed").with_errors(errors)
        }

        AdminError::UnknownAction { name } => Problem::new(StatusCode::BAD_REQUEST, "Unknown Action")
            .with_detail(format!("action '{name}' is not registered")),

        AdminError::InvalidKey { key, details } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Key")
                .with_detail(format!("invalid key '{key}': {details}"))
        }

        AdminError::Conflict { reason } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(reason)
        }

        AdminError::Database(err) => {
            tracing::error!("database error: {err:?}");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

impl From<AdminError> for Problem {
    fn from(error: AdminError) -> Self {
        map_admin_error(error)
    }
}
