//! Request Logging Middleware
//!
//! Emits one structured log line per handled request: method, path with
//! query string, status code, latency, correlation ID, and client IP.
//! Responses with a 5xx status log at error level, everything else at
//! info. Header values are never logged, so tokens and other sensitive
//! headers stay out of log storage.

use std::task::{Context, Poll};
use std::time::Instant;

use axum::{extract::Request, http::HeaderMap, response::Response};
use futures::future::BoxFuture;
use tower::{Layer, Service};

use crate::correlation::CorrelationId;

/// Layer that applies [`RequestLogMiddleware`] to a service.
#[derive(Debug, Clone, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogMiddleware { inner }
    }
}

/// Middleware that logs every handled request.
#[derive(Debug, Clone)]
pub struct RequestLogMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestLogMiddleware<S>
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

    fn call(&mut self, request: Request) -> Self::Future {
        let start = Instant::now();

        let method = request.method().to_string();
        let path = match request.uri().query() {
            Some(query) => format!("{}?{}", request.uri().path(), query),
            None => request.uri().path().to_string(),
        };
        let client_ip = client_ip(request.headers());
        let correlation_id = request
            .extensions()
            .get::<CorrelationId>()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;

            let status_code = response.status().as_u16();
            let latency_ms = start.elapsed().as_millis() as u64;

            if status_code >= 500 {
                tracing::error!(
                    method = %method,
                    path = %path,
                    status_code,
                    correlation_id = %correlation_id,
                    latency_ms,
                    client_ip = %client_ip,
                    "[HTTP]"
                );
            } else {
                tracing::info!(
                    method = %method,
                    path = %path,
                    status_code,
                    correlation_id = %correlation_id,
                    latency_ms,
                    client_ip = %client_ip,
                    "[HTTP]"
                );
            }

            Ok(response)
        })
    }
}

/// Best-effort client IP: first `x-forwarded-for` entry, then
/// `x-real-ip`, then `-`.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = forwarded.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "-".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(client_ip(&headers), "10.0.0.2");
    }

    #[test]
    fn test_client_ip_defaults_to_dash() {
        assert_eq!(client_ip(&HeaderMap::new()), "-");
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let app = Router::new()
            .route("/items", get(|| async { "three items" }))
            .layer(RequestLogLayer::new());

        let request = Request::builder()
            .uri("/items?limit=3")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_error_responses_pass_through() {
        let app = Router::new()
            .route(
                "/broken",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .layer(RequestLogLayer::new());

        let request = Request::builder()
            .uri("/broken")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
