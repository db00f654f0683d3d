//! Preflight CORS Middleware
//!
//! Applies CORS handling to OPTIONS requests only. The fronting gateway
//! adds CORS headers to every other response, so answering non-preflight
//! requests here would duplicate them. Use this when the gateway has
//! CORS enabled with OPTIONS passthrough.

use std::task::{ready, Context, Poll};

use axum::{extract::Request, http::Method, response::Response};
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tower_http::cors::{Cors, CorsLayer};

/// Layer that applies [`PreflightCors`] to a service.
#[derive(Debug, Clone)]
pub struct PreflightCorsLayer {
    cors: CorsLayer,
}

impl PreflightCorsLayer {
    /// Wrap an existing CORS policy.
    pub fn new(cors: CorsLayer) -> Self {
        Self { cors }
    }

    /// Allow any origin, method, and header on preflight.
    pub fn permissive() -> Self {
        Self::new(CorsLayer::permissive())
    }
}

impl<S> Layer<S> for PreflightCorsLayer
where
    S: Clone,
{
    type Service = PreflightCors<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PreflightCors {
            cors: self.cors.layer(inner.clone()),
            inner,
        }
    }
}

/// Middleware that routes OPTIONS requests through CORS handling and
/// passes everything else straight to the inner service.
#[derive(Debug, Clone)]
pub struct PreflightCors<S> {
    cors: Cors<S>,
    inner: S,
}

impl<S> Service<Request> for PreflightCors<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        ready!(self.cors.poll_ready(cx))?;
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Handle only OPTIONS, the gateway handles the rest.
        if request.method() == Method::OPTIONS {
            return Box::pin(self.cors.call(request));
        }

        Box::pin(self.inner.call(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/orders", get(|| async { "ok" }))
            .layer(PreflightCorsLayer::permissive())
    }

    #[tokio::test]
    async fn test_preflight_gets_cors_headers() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/orders")
            .header("origin", "http://shop.example.com")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_other_methods_bypass_cors() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/orders")
            .header("origin", "http://shop.example.com")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }
}
