//! Inflow Web
//!
//! HTTP plumbing shared by Inflow services: correlation IDs, request
//! logging, dependency health checking, gateway-aware CORS, and request
//! field validators.
//!
//! # Middleware ordering
//!
//! Correlation must wrap logging so log lines carry the request's
//! correlation ID:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/health", get(health_handler))
//!     .with_state(registry)
//!     .layer(RequestLogLayer::new())
//!     .layer(CorrelationLayer::new())
//!     .layer(PreflightCorsLayer::permissive());
//! ```

pub mod correlation;
pub mod cors;
pub mod health;
pub mod logging;
pub mod validators;

pub use correlation::{CorrelationId, CorrelationLayer, CORRELATION_ID_HEADER};
pub use cors::PreflightCorsLayer;
pub use health::{
    health_handler, liveness_handler, HealthCheck, HealthRegistry, HealthReport,
    DEFAULT_CHECK_TIMEOUT, MAX_FAILURES_IN_A_ROW,
};
pub use logging::RequestLogLayer;
pub use validators::{LineItemPrice, OnlyLetters, Price, ValidationError};
