//! Chain Adapters - Starknet RPC Interaction Layer
//!
//! Provides read-only access to the Paradex Gigavault contract:
//! - JSON-RPC `starknet_call` client
//! - Fixed-delay retry policy shared by all calls
//! - Request/response wire types

pub mod retry;
pub mod starknet;
pub mod types;

pub use retry::{RetryPolicy, retry_fixed};
pub use starknet::StarknetRpcClient;
