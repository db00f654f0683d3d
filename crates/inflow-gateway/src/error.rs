//! Error types for gateway key-management calls.

use thiserror::Error;

/// Gateway client errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("key ID wasn't included in the response")]
    MissingKeyId,
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
