//! Inflow Gateway
//!
//! REST client for the fronting gateway's key-management API. The
//! gateway enforces rate limits and quotas per auth key; this crate
//! provisions and maintains those keys.
//!
//! # Usage
//!
//! ```no_run
//! use inflow_gateway::{GatewayClient, KeyApi, Session};
//!
//! # async fn example() -> inflow_gateway::Result<()> {
//! let client = GatewayClient::new("http://gateway:8080", "admin-secret");
//!
//! let session = Session::new()
//!     .set_jwt_secret("jwt-secret")
//!     .add_access("payments-api", &["v1"]);
//!
//! let key_id = client.create_key(&session).await?;
//! client.delete_key(&key_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::{GatewayClient, KeyApi, StubKeyApi, AUTH_HEADER};
pub use error::{GatewayError, Result};
pub use models::{AllowedUrl, ApiAccessRules, JwtData, Session};
