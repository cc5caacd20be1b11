//! Health Check Server - Liveness and Readiness Probes
//!
//! Exposes /live and /ready (plus /metrics) via axum 0.7. Readiness
//! means the deposit monitor completed a cycle recently.

use std::sync::{Arc, RwLock};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use super::prometheus::MetricsRegistry;

/// Shared health state updated by the deposit monitor.
#[derive(Debug)]
pub struct HealthState {
    /// Completion time of the last successful cycle.
    last_success: RwLock<Option<DateTime<Utc>>>,
    /// Maximum age of `last_success` for readiness.
    stale_after: Duration,
}

impl HealthState {
    /// Create a new health state (not ready until the first cycle).
    pub fn new(stale_after: std::time::Duration) -> Self {
        Self {
            last_success: RwLock::new(None),
            stale_after: Duration::from_std(stale_after).unwrap_or_else(|_| Duration::days(36_500)),
        }
    }

    /// Record a successful cycle.
    pub fn record_success(&self, at: DateTime<Utc>) {
        if let Ok(mut guard) = self.last_success.write() {
            *guard = Some(at);
        }
    }

    /// Completion time of the last successful cycle.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success.read().ok().and_then(|guard| *guard)
    }

    /// Ready if a cycle succeeded within `stale_after` of `now`.
    pub fn is_ready_at(&self, now: DateTime<Utc>) -> bool {
        self.last_success()
            .is_some_and(|at| now.signed_duration_since(at) <= self.stale_after)
    }
}

/// Axum-based health check HTTP server.
pub struct HealthServer {
    /// Health state shared with the monitor.
    state: Arc<HealthState>,
    /// Metrics mounted at /metrics.
    metrics: Option<MetricsRegistry>,
    /// Bind address.
    bind_address: String,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(
        state: Arc<HealthState>,
        metrics: Option<MetricsRegistry>,
        bind_address: String,
    ) -> Self {
        Self {
            state,
            metrics,
            bind_address,
        }
    }

    fn router(&self) -> Router {
        let probes = Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .with_state(Arc::clone(&self.state));

        match &self.metrics {
            Some(metrics) => probes.merge(metrics.router()),
            None => probes,
        }
    }

    /// Serve until shutdown.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;

        info!("Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: 200 only if a recent cycle succeeded.
    async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
        if state.is_ready_at(Utc::now()) {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}
