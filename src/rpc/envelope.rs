//! JSON-RPC envelope codec.
//!
//! Builds outbound requests for the fixed set of Tendermint methods the
//! client speaks and decodes the node's two-branch `result | error`
//! response envelope.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RpcError;

const JSONRPC_VERSION: &str = "2.0";

/// Node methods consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcMethod {
    BroadcastTxSync,
    BroadcastTxAsync,
    BroadcastTxCommit,
    AbciQuery,
    Tx,
    TxSearch,
    Block,
    BlockResults,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::BroadcastTxSync => "broadcast_tx_sync",
            RpcMethod::BroadcastTxAsync => "broadcast_tx_async",
            RpcMethod::BroadcastTxCommit => "broadcast_tx_commit",
            RpcMethod::AbciQuery => "abci_query",
            RpcMethod::Tx => "tx",
            RpcMethod::TxSearch => "tx_search",
            RpcMethod::Block => "block",
            RpcMethod::BlockResults => "block_results",
        }
    }

    fn is_broadcast(&self) -> bool {
        matches!(
            self,
            RpcMethod::BroadcastTxSync | RpcMethod::BroadcastTxAsync | RpcMethod::BroadcastTxCommit
        )
    }
}

/// Outbound JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: RpcMethod,
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    fn new(method: RpcMethod, params: Map<String, Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params,
        }
    }

    /// Wraps raw transaction bytes for one of the `broadcast_tx_*` methods.
    ///
    /// The bytes travel base64-encoded in the `tx` param.
    pub fn wrap_tx_bytes(method: RpcMethod, tx_bytes: &[u8]) -> Self {
        debug_assert!(method.is_broadcast(), "{} is not a broadcast method", method.as_str());
        let mut params = Map::new();
        params.insert("tx".to_string(), Value::String(B64.encode(tx_bytes)));
        Self::new(method, params)
    }

    /// Wraps bytes as an `abci_query` against `path`.
    ///
    /// Tendermint expects `data` as hex.
    pub fn wrap_abci_query(path: &str, data: &[u8]) -> Self {
        let mut params = Map::new();
        params.insert("path".to_string(), Value::String(path.to_string()));
        params.insert("data".to_string(), Value::String(hex::encode(data)));
        params.insert("prove".to_string(), Value::Bool(false));
        Self::new(RpcMethod::AbciQuery, params)
    }

    /// Wraps a key/value parameter map for the query methods.
    pub fn wrap_base_query(method: RpcMethod, params: Map<String, Value>) -> Self {
        Self::new(method, params)
    }

    pub fn to_body(&self) -> Result<String, RpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Error branch of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    /// `data` as text; Tendermint sends a string but other values are tolerated.
    pub fn data_text(&self) -> Option<String> {
        match &self.data {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    pub fn into_error(self) -> RpcError {
        RpcError::Node {
            data: self.data_text(),
            code: self.code,
            message: self.message,
        }
    }
}

/// Inbound JSON-RPC response. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl<T> JsonRpcResponse<T> {
    /// Collapses the envelope into its result, turning an error branch into
    /// [`RpcError::Node`] and an empty envelope into [`RpcError::EmptyEnvelope`].
    pub fn into_result(self, method: RpcMethod) -> Result<T, RpcError> {
        if let Some(error) = self.error {
            return Err(error.into_error());
        }
        self.result.ok_or(RpcError::EmptyEnvelope {
            method: method.as_str(),
        })
    }
}

/// Decodes a response body into an envelope carrying `T`.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<JsonRpcResponse<T>, RpcError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_broadcast_request_carries_base64_tx() {
        let request = JsonRpcRequest::wrap_tx_bytes(RpcMethod::BroadcastTxCommit, &[0xde, 0xad, 0xbe, 0xef]);
        let value: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "broadcast_tx_commit");
        assert_eq!(value["params"], json!({ "tx": "3q2+7w==" }));
        assert!(value["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn test_abci_query_request_wraps_simulate_path() {
        let request = JsonRpcRequest::wrap_abci_query("app/simulate", &[0x01, 0xff]);
        let value: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();

        assert_eq!(value["method"], "abci_query");
        assert_eq!(value["params"]["path"], "app/simulate");
        assert_eq!(value["params"]["data"], "01ff");
    }

    #[test]
    fn test_method_serializes_as_wire_name() {
        for method in [
            RpcMethod::BroadcastTxSync,
            RpcMethod::BroadcastTxAsync,
            RpcMethod::BroadcastTxCommit,
            RpcMethod::AbciQuery,
            RpcMethod::Tx,
            RpcMethod::TxSearch,
            RpcMethod::Block,
            RpcMethod::BlockResults,
        ] {
            assert_eq!(serde_json::to_value(method).unwrap(), Value::String(method.as_str().into()));
        }
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = JsonRpcRequest::wrap_base_query(RpcMethod::Block, Map::new());
        let b = JsonRpcRequest::wrap_base_query(RpcMethod::Block, Map::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_parse_result_ignores_unknown_fields() {
        let body = r#"{"jsonrpc":"2.0","id":"x","result":{"n":1},"extra":true}"#;
        #[derive(Deserialize)]
        struct Shape {
            n: u32,
        }

        let shape = parse_envelope::<Shape>(body).unwrap().into_result(RpcMethod::Block).unwrap();
        assert_eq!(shape.n, 1);
    }

    #[test]
    fn test_parse_error_branch_prefers_data() {
        let body = r#"{"jsonrpc":"2.0","id":"x","error":{"code":-32603,"message":"Internal error","data":"tx not found"}}"#;

        let err = parse_envelope::<Value>(body)
            .unwrap()
            .into_result(RpcMethod::Tx)
            .unwrap_err();
        match &err {
            RpcError::Node { code, data, .. } => {
                assert_eq!(*code, -32603);
                assert_eq!(data.as_deref(), Some("tx not found"));
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "node error -32603: tx not found");
    }

    #[test]
    fn test_parse_empty_envelope_is_error() {
        let err = parse_envelope::<Value>(r#"{"jsonrpc":"2.0","id":"x"}"#)
            .unwrap()
            .into_result(RpcMethod::Block)
            .unwrap_err();
        assert!(matches!(err, RpcError::EmptyEnvelope { method: "block" }));
    }

    #[test]
    fn test_parse_malformed_json_is_error() {
        let err = parse_envelope::<Value>("<html>").unwrap_err();
        assert!(matches!(err, RpcError::InvalidEnvelope(_)));
    }
}
