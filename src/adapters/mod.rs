//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients, file I/O). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `chain`: Starknet JSON-RPC reads with fixed-delay retry
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: JSON subscription file
//! - `telegram`: Bot API client and update long-polling

pub mod chain;
pub mod metrics;
pub mod persistence;
pub mod telegram;
