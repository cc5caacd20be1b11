//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics export and health check endpoints
//! (/live, /ready, /metrics) served by one axum 0.7 server.

pub mod health;
pub mod prometheus;

pub use self::health::{HealthServer, HealthState};
pub use self::prometheus::MetricsRegistry;
