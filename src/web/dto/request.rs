//! Request DTOs for the HTTP API.

use serde::Deserialize;

/// Description update request (PATCH /files/:id).
#[derive(Debug, Deserialize)]
pub struct UpdateDescriptionRequest {
    /// New description. Required, may be empty.
    #[serde(default)]
    pub description: Option<String>,
}
