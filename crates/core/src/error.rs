use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by an external collaborator (API client, upload service).
///
/// Kept `Clone + Serialize` so the same value can sit in the error bag that
/// renderers read and be returned to the caller. Serialized as
/// `{ "kind": ..., "detail": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Listing {0} not found")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
