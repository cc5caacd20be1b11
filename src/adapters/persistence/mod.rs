//! Persistence Adapters - JSON File Storage
//!
//! Implements the AlertStore port with a single JSON document that
//! is rewritten atomically (tmp file, then rename) on every change.
//! No database dependency; the subscriber count is small.

pub mod json_store;

pub use json_store::JsonAlertStore;
