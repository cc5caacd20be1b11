//! Prometheus Metrics Registry - Watcher Observability
//!
//! Registers the `deposit_bot_*` metrics: cycle outcomes, RPC attempt
//! failures, notification outcomes, the last computed capacity and the
//! number of armed subscriptions.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{Encoder, Gauge, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Centralized Prometheus metrics for the deposit watcher.
#[derive(Clone)]
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Poll cycles by outcome (`success`, `failure`).
    pub cycles: IntCounterVec,
    /// Failed RPC attempts by vault value.
    pub rpc_failures: IntCounterVec,
    /// Notification dispatches by outcome (`delivered`, `failed`).
    pub notifications: IntCounterVec,
    /// Last computed capacity in dollars.
    pub capacity_usd: Gauge,
    /// Subscriptions with a threshold set.
    pub armed_subscriptions: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let cycles = IntCounterVec::new(
            Opts::new("deposit_bot_cycles_total", "Poll cycles by outcome"),
            &["outcome"],
        )?;

        let rpc_failures = IntCounterVec::new(
            Opts::new(
                "deposit_bot_rpc_failures_total",
                "Failed starknet_call attempts",
            ),
            &["value"],
        )?;

        let notifications = IntCounterVec::new(
            Opts::new(
                "deposit_bot_notifications_total",
                "Alert messages dispatched by outcome",
            ),
            &["outcome"],
        )?;

        let capacity_usd = Gauge::new(
            "deposit_bot_capacity_usd",
            "Last computed available deposit capacity in dollars",
        )?;

        let armed_subscriptions = IntGauge::new(
            "deposit_bot_armed_subscriptions",
            "Subscriptions with a threshold set",
        )?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(rpc_failures.clone()))?;
        registry.register(Box::new(notifications.clone()))?;
        registry.register(Box::new(capacity_usd.clone()))?;
        registry.register(Box::new(armed_subscriptions.clone()))?;

        Ok(Self {
            registry,
            cycles,
            rpc_failures,
            notifications,
            capacity_usd,
            armed_subscriptions,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Router serving `/metrics`.
    pub fn router(&self) -> Router {
        let metrics = self.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move {
                    metrics.render().map_err(|e| {
                        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                    })
                }
            }),
        )
    }
}
