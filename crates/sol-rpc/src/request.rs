//! JSON-RPC methods and the request envelope.

use std::fmt;

use serde_json::{json, Value};

/// The node methods this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcRequest {
    GetBalance,
    GetEpochInfo,
    GetLatestBlockhash,
    GetSignatureStatuses,
    GetTokenAccountsByOwner,
    SendTransaction,
}

impl RpcRequest {
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::GetBalance => "getBalance",
            RpcRequest::GetEpochInfo => "getEpochInfo",
            RpcRequest::GetLatestBlockhash => "getLatestBlockhash",
            RpcRequest::GetSignatureStatuses => "getSignatureStatuses",
            RpcRequest::GetTokenAccountsByOwner => "getTokenAccountsByOwner",
            RpcRequest::SendTransaction => "sendTransaction",
        }
    }

    /// Wrap `params` in a JSON-RPC 2.0 envelope.
    pub fn build_request_json(&self, id: u64, params: Value) -> Value {
        json!({
           "jsonrpc": "2.0",
           "id": id,
           "method": self.method(),
           "params": params,
        })
    }
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_json_envelope() {
        let request = RpcRequest::GetBalance.build_request_json(7, json!(["abc"]));
        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["id"], 7);
        assert_eq!(request["method"], "getBalance");
        assert_eq!(request["params"], json!(["abc"]));
    }

    #[test]
    fn empty_params_serialize_as_array() {
        let request = RpcRequest::GetEpochInfo.build_request_json(1, json!([]));
        assert_eq!(
            request.to_string(),
            r#"{"id":1,"jsonrpc":"2.0","method":"getEpochInfo","params":[]}"#
        );
    }

    #[test]
    fn display_is_method_name() {
        assert_eq!(
            RpcRequest::GetSignatureStatuses.to_string(),
            "getSignatureStatuses"
        );
        assert_eq!(
            RpcRequest::GetTokenAccountsByOwner.to_string(),
            "getTokenAccountsByOwner"
        );
    }
}
