//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: read-only contract calls against the Starknet node
//! - `AlertStore`: subscription state with durable persistence
//! - `Messenger`: outgoing chat messages and callback acknowledgements

pub mod alert_store;
pub mod chain_client;
pub mod messenger;
