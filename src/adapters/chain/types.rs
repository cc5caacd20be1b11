//! Starknet JSON-RPC Request/Response Types
//!
//! Only `starknet_call` is needed. Field names follow the
//! Starknet JSON-RPC v0.7 specification.

use serde::{Deserialize, Serialize};

/// JSON-RPC envelope for `starknet_call`.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest<'a> {
  pub id: u64,
  pub jsonrpc: &'static str,
  pub method: &'static str,
  pub params: CallParams<'a>,
}

/// `starknet_call` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CallParams<'a> {
  pub request: FunctionCall<'a>,
  /// Block tag (`pending`, `latest`) or hash.
  pub block_id: &'a str,
}

/// The view function being invoked.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCall<'a> {
  pub contract_address: &'a str,
  pub entry_point_selector: &'a str,
  pub calldata: Vec<String>,
}

impl<'a> CallRequest<'a> {
  /// Build a zero-argument view call.
  pub fn new(contract_address: &'a str, entry_point_selector: &'a str, block_id: &'a str) -> Self {
    Self {
      id: 1,
      jsonrpc: "2.0",
      method: "starknet_call",
      params: CallParams {
        request: FunctionCall {
          contract_address,
          entry_point_selector,
          calldata: Vec::new(),
        },
        block_id,
      },
    }
  }
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CallResponse {
  /// Returned felts on success.
  pub result: Option<Vec<String>>,
  /// Error object on failure.
  pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
  pub code: i64,
  pub message: String,
}
