//! Correlation ID Middleware
//!
//! Assigns every request a correlation ID so log lines from different
//! services can be tied to one originating call. An incoming
//! `inflow-correlation-id` header is forwarded as-is; otherwise a fresh
//! UUID is generated. The ID is stored in the request extensions and
//! echoed on the response header.
//!
//! ## Usage
//!
//! ```ignore
//! use inflow_web::correlation::CorrelationLayer;
//!
//! let app = Router::new()
//!     .route("/orders", post(create_order))
//!     .layer(CorrelationLayer::new());
//! ```

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Name of the correlation ID header.
pub const CORRELATION_ID_HEADER: &str = "inflow-correlation-id";

/// Correlation ID assigned to a request, available via request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layer that applies [`CorrelationMiddleware`] to a service.
#[derive(Debug, Clone, Default)]
pub struct CorrelationLayer;

impl CorrelationLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CorrelationLayer {
    type Service = CorrelationMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationMiddleware { inner }
    }
}

/// Middleware that forwards or generates the correlation ID.
#[derive(Debug, Clone)]
pub struct CorrelationMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let correlation_id = request
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        request
            .extensions_mut()
            .insert(CorrelationId(correlation_id.clone()));

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo_correlation(Extension(id): Extension<CorrelationId>) -> String {
        id.to_string()
    }

    fn test_router() -> Router {
        Router::new()
            .route("/", get(echo_correlation))
            .layer(CorrelationLayer::new())
    }

    #[tokio::test]
    async fn test_generates_id_when_header_missing() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        let header = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .unwrap();
        assert_eq!(header.len(), 36, "expected a UUID, got {:?}", header);

        // The handler saw the same ID via extensions.
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_forwards_incoming_id() {
        let request = Request::builder()
            .uri("/")
            .header(CORRELATION_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(CORRELATION_ID_HEADER).unwrap(),
            "req-42"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"req-42");
    }
}
