//! Inflow Auth
//!
//! JWT signing helpers for service-to-service calls. Services share a
//! base64-encoded HS256 secret; the caller mints a short-lived token
//! with system reach and the callee verifies it.
//!
//! # Usage
//!
//! ```no_run
//! use inflow_auth::ServiceAuth;
//!
//! # fn main() -> inflow_auth::Result<()> {
//! let auth = ServiceAuth::from_base64_secret("c2hhcmVkLXNlY3JldA==")?;
//!
//! let token = auth.system_token()?;
//! let claims = auth.verify(&token)?;
//! assert!(claims.is_system());
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod error;
pub mod service;
pub mod signer;
pub mod token;

pub use claims::{PrincipalClaims, DEFAULT_TOKEN_LIFETIME, SYSTEM_REACH};
pub use error::{AuthError, Result};
pub use service::ServiceAuth;
pub use signer::Signer;
pub use token::{TokenBuilder, TokenBuilderFactory};
