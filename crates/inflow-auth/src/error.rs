//! Error types for token signing and verification.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid signing secret: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("token has expired")]
    TokenExpired,

    #[error("token not valid yet")]
    TokenNotYetValid,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;
