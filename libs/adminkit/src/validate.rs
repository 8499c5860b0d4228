//! JSON Schema validation of mutation payloads
//!
//! A resource may carry a JSON Schema; create/update payloads validate
//! against it before reaching the controller, so the frontend gets a 422
//! with per-check messages to re-render the form with.

use crate::error::{AdminError, AdminResult};
use jsonschema::Validator;
use serde_json::Value;

/// Validate a payload against a JSON Schema.
pub fn validate_against_schema(data: &Value, schema: &Value) -> AdminResult<()> {
    let validator = Validator::new(schema).map_err(|e| AdminError::Validation {
        errors: vec![format!("invalid JSON Schema: {e}")],
    })?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminError::Validation { errors })
    }
}
