//! Dependency Health Checking
//!
//! Tracks the health of service dependencies (databases, upstream APIs,
//! the fronting gateway) and serves the aggregate status over HTTP.
//!
//! Each registered dependency is re-checked on its own interval by a
//! background task. A dependency is only reported as down after
//! [`MAX_FAILURES_IN_A_ROW`] consecutive failed checks, so a single
//! blip does not flip the service to unhealthy. One successful check
//! resets the counter.
//!
//! ## Usage
//!
//! ```ignore
//! use inflow_web::health::{HealthRegistry, health_handler};
//!
//! let registry = HealthRegistry::new();
//! registry.register("gateway", true, Duration::from_secs(30), checker).await;
//! registry.start().await;
//!
//! let app = Router::new()
//!     .route("/health", get(health_handler))
//!     .with_state(registry.clone());
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, Json};
use tokio::sync::{watch, RwLock};
use tracing::{debug, error};

/// Per-check timeout; a check that runs longer counts as failed.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of consecutive failures after which a dependency is
/// considered broken.
pub const MAX_FAILURES_IN_A_ROW: u32 = 3;

/// A health check against one dependency.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns true when the dependency is reachable and behaving.
    async fn check(&self) -> bool;
}

/// A registered dependency and its consecutive-failure counter.
struct Dependency {
    name: String,
    critical: bool,
    interval: Duration,
    checker: Arc<dyn HealthCheck>,
    failures_in_a_row: RwLock<u32>,
}

impl Dependency {
    fn failures_are_negligible(failures: u32) -> bool {
        failures < MAX_FAILURES_IN_A_ROW
    }

    async fn run_check(&self, timeout: Duration) {
        let healthy_now = tokio::time::timeout(timeout, self.checker.check())
            .await
            .unwrap_or(false);

        let mut failures = self.failures_in_a_row.write().await;
        if healthy_now {
            *failures = 0;
        } else if Self::failures_are_negligible(*failures) {
            // Increment it so maybe it becomes non-negligible soon
            *failures += 1;
        }

        debug!(
            dependency = %self.name,
            healthy = healthy_now,
            failures_in_a_row = *failures,
            "Checked dependency health"
        );
    }

    async fn considered_healthy(&self) -> bool {
        Self::failures_are_negligible(*self.failures_in_a_row.read().await)
    }
}

/// Aggregate health of all registered dependencies.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Dependency name mapped to whether it is considered healthy.
    pub statuses: HashMap<String, bool>,
    /// Whether any dependency is failing.
    pub has_failure: bool,
    /// Whether any critical dependency is failing.
    pub has_critical_failure: bool,
}

impl HealthReport {
    /// HTTP status for this report: 503 when a critical dependency is
    /// down, 500 when only non-critical ones are, 200 otherwise.
    pub fn status_code(&self) -> StatusCode {
        if self.has_critical_failure {
            StatusCode::SERVICE_UNAVAILABLE
        } else if self.has_failure {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }
}

struct RegistryInner {
    check_timeout: Duration,
    dependencies: RwLock<Vec<Arc<Dependency>>>,
    shutdown_tx: watch::Sender<bool>,
}

/// Registry of health-checked dependencies.
///
/// Cheap to clone; clones share the same dependency state. Register
/// every dependency before calling [`start`](Self::start); later
/// registrations are reported but never re-checked in the background.
#[derive(Clone)]
pub struct HealthRegistry {
    inner: Arc<RegistryInner>,
}

impl HealthRegistry {
    /// Create a registry with the default per-check timeout.
    pub fn new() -> Self {
        Self::with_check_timeout(DEFAULT_CHECK_TIMEOUT)
    }

    /// Create a registry with a custom per-check timeout.
    pub fn with_check_timeout(check_timeout: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(RegistryInner {
                check_timeout,
                dependencies: RwLock::new(Vec::new()),
                shutdown_tx,
            }),
        }
    }

    /// Register a dependency to be health checked every `interval`.
    pub async fn register(
        &self,
        name: impl Into<String>,
        critical: bool,
        interval: Duration,
        checker: Arc<dyn HealthCheck>,
    ) {
        let mut dependencies = self.inner.dependencies.write().await;
        dependencies.push(Arc::new(Dependency {
            name: name.into(),
            critical,
            interval,
            checker,
            failures_in_a_row: RwLock::new(0),
        }));
    }

    /// Run one round of checks against every dependency.
    pub async fn check_now(&self) {
        let dependencies = self.inner.dependencies.read().await.clone();
        for dep in &dependencies {
            dep.run_check(self.inner.check_timeout).await;
        }
        log_failing(&dependencies).await;
    }

    /// Check every dependency once, then keep re-checking each on its
    /// own interval until [`stop`](Self::stop) is called.
    pub async fn start(&self) {
        self.check_now().await;

        let dependencies = self.inner.dependencies.read().await.clone();
        for dep in &dependencies {
            let dep = dep.clone();
            let all = dependencies.clone();
            let check_timeout = self.inner.check_timeout;
            let mut shutdown_rx = self.inner.shutdown_tx.subscribe();

            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(dep.interval);
                // The first tick completes immediately and would double
                // the initial check; consume it.
                ticker.tick().await;

                loop {
                    tokio::select! {
                        _ = shutdown_rx.changed() => return,
                        _ = ticker.tick() => {}
                    }

                    dep.run_check(check_timeout).await;
                    log_failing(&all).await;
                }
            });
        }
    }

    /// Stop the background checks. Safe to call more than once.
    pub fn stop(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }

    /// Current health of every dependency.
    pub async fn snapshot(&self) -> HealthReport {
        let dependencies = self.inner.dependencies.read().await;

        let mut statuses = HashMap::new();
        let mut has_failure = false;
        let mut has_critical_failure = false;

        for dep in dependencies.iter() {
            let healthy = dep.considered_healthy().await;
            if !healthy {
                has_failure = true;
                has_critical_failure = has_critical_failure || dep.critical;
            }
            statuses.insert(dep.name.clone(), healthy);
        }

        HealthReport {
            statuses,
            has_failure,
            has_critical_failure,
        }
    }

    /// Number of registered dependencies.
    pub async fn dependency_count(&self) -> usize {
        self.inner.dependencies.read().await.len()
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

async fn log_failing(dependencies: &[Arc<Dependency>]) {
    let mut failing = Vec::new();
    for dep in dependencies {
        if !dep.considered_healthy().await {
            failing.push(dep.name.clone());
        }
    }

    if !failing.is_empty() {
        error!(
            "Some service dependencies are failing: {}",
            failing.join(", ")
        );
    }
}

/// `GET /health`: dependency statuses as JSON, with the status code
/// from [`HealthReport::status_code`].
pub async fn health_handler(
    State(registry): State<HealthRegistry>,
) -> (StatusCode, Json<HashMap<String, bool>>) {
    let report = registry.snapshot().await;
    (report.status_code(), Json(report.statuses))
}

/// `GET /live`: plain liveness, no dependency checks.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}
