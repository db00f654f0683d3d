//! Inflow HTTP Service
//!
//! Entry point for the Inflow edge service. It wires the shared HTTP stack
//! together: request logging, correlation IDs, preflight CORS handling, and
//! the dependency health registry, with an optional reachability probe
//! against the API gateway.
//!
//! ## Configuration
//! All configuration is done via environment variables:
//!
//! - `INFLOW_HTTP_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `INFLOW_GATEWAY_URL`: Base URL of the API gateway. When unset, no
//!   gateway probe is registered and `/health` reports an empty set.
//! - `INFLOW_GATEWAY_SECRET`: Admin secret sent on gateway requests
//! - `INFLOW_LOG_FORMAT`: Set to `json` for JSON log output
//! - `RUST_LOG`: Log filter (default: info)
//!
//! ## Endpoints
//! - `GET /health`: Per-dependency health report (200, 500, or 503)
//! - `GET /live`: Liveness probe, always 200

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::get;
use axum::Router;
use inflow_gateway::{GatewayClient, GatewayError, KeyApi};
use inflow_web::{
    health_handler, liveness_handler, CorrelationLayer, HealthCheck, HealthRegistry,
    PreflightCorsLayer, RequestLogLayer,
};

/// How often the gateway reachability probe runs.
const GATEWAY_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Probes the gateway by asking it for a key that does not exist. Any HTTP
/// response proves the gateway is reachable; only transport failures count
/// against it.
struct GatewayReachability {
    api: Arc<dyn KeyApi>,
}

#[async_trait]
impl HealthCheck for GatewayReachability {
    async fn check(&self) -> bool {
        match self.api.retrieve_key("inflow-health-probe").await {
            Ok(_) | Err(GatewayError::Api { .. }) => true,
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    inflow_observability::init();

    // Configuration
    let bind_addr =
        std::env::var("INFLOW_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let gateway_url = std::env::var("INFLOW_GATEWAY_URL").ok();
    let gateway_secret = std::env::var("INFLOW_GATEWAY_SECRET").unwrap_or_default();

    // Health registry
    let registry = HealthRegistry::new();
    if let Some(url) = gateway_url {
        tracing::info!("Monitoring gateway reachability at {}", url);
        let api: Arc<dyn KeyApi> = Arc::new(GatewayClient::new(url, gateway_secret));
        registry
            .register(
                "gateway",
                true,
                GATEWAY_CHECK_INTERVAL,
                Arc::new(GatewayReachability { api }),
            )
            .await;
    }
    registry.start().await;

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(liveness_handler))
        .with_state(registry.clone())
        .layer(RequestLogLayer::new())
        .layer(CorrelationLayer::new())
        .layer(PreflightCorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Inflow server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            tracing::info!("📴 Received {}, initiating graceful shutdown...", signal);
        })
        .await?;

    registry.stop();
    tracing::info!("👋 Server shut down gracefully");

    Ok(())
}

/// Completes when SIGINT or SIGTERM is received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        "SIGINT (Ctrl+C)"
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    }
}
