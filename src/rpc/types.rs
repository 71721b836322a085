// Wire shapes returned by the node, and the typed results built from them.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::JsonRpcErrorObject;
use crate::error::RpcError;
use crate::events::Event;
use crate::msg::{StdTx, TransactionEnvelope};
use crate::utils::encoding::{de_i64, de_string, de_u32, de_u64, de_vec};

/// How long a broadcast waits before the node answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Returns once the transaction passed `CheckTx`.
    Sync,
    /// Returns as soon as the node received the transaction.
    Async,
    /// Returns once the transaction was included in a block.
    Commit,
}

impl Display for BroadcastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcastMode::Sync => write!(f, "sync"),
            BroadcastMode::Async => write!(f, "async"),
            BroadcastMode::Commit => write!(f, "commit"),
        }
    }
}

impl FromStr for BroadcastMode {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(BroadcastMode::Sync),
            "async" => Ok(BroadcastMode::Async),
            "commit" => Ok(BroadcastMode::Commit),
            _ => Err(RpcError::UnknownBroadcastMode(s.to_string())),
        }
    }
}

/// Execution result of one transaction (`ResponseDeliverTx` / `ExecTxResult`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxResult {
    #[serde(default, deserialize_with = "de_u32")]
    pub code: u32,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "de_string")]
    pub log: String,
    #[serde(default, deserialize_with = "de_string")]
    pub info: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub gas_wanted: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub gas_used: i64,
    #[serde(default, deserialize_with = "de_vec")]
    pub events: Vec<Event>,
    #[serde(default, deserialize_with = "de_string")]
    pub codespace: String,
}

/// `broadcast_tx_sync` / `broadcast_tx_async` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastTxResponse {
    #[serde(default, deserialize_with = "de_u32")]
    pub code: u32,
    #[serde(default, deserialize_with = "de_string")]
    pub log: String,
    #[serde(default, deserialize_with = "de_string")]
    pub codespace: String,
    #[serde(default, deserialize_with = "de_string")]
    pub hash: String,
}

/// `broadcast_tx_commit` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastTxCommitResponse {
    #[serde(default)]
    pub check_tx: TxResult,
    #[serde(default, alias = "tx_result")]
    pub deliver_tx: TxResult,
    #[serde(default, deserialize_with = "de_string")]
    pub hash: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub height: i64,
}

/// Outcome of a broadcast.
///
/// Code `0` with no error is the only success. Sync and async broadcasts
/// hand back rejections as a value; inspect [`is_success`](Self::is_success).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BroadcastResult {
    pub code: u32,
    pub log: String,
    pub codespace: String,
    pub hash: String,
    /// Inclusion height, commit mode only.
    pub height: Option<i64>,
    pub error: Option<JsonRpcErrorObject>,
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        self.code == 0 && self.error.is_none()
    }
}

impl From<BroadcastTxResponse> for BroadcastResult {
    fn from(resp: BroadcastTxResponse) -> Self {
        Self {
            code: resp.code,
            log: resp.log,
            codespace: resp.codespace,
            hash: resp.hash,
            height: None,
            error: None,
        }
    }
}

impl From<BroadcastTxCommitResponse> for BroadcastResult {
    /// The check phase is reported when it failed; delivery otherwise.
    fn from(resp: BroadcastTxCommitResponse) -> Self {
        let phase = if resp.check_tx.code != 0 {
            resp.check_tx
        } else {
            resp.deliver_tx
        };
        Self {
            code: phase.code,
            log: phase.log,
            codespace: phase.codespace,
            hash: resp.hash,
            height: Some(resp.height),
            error: None,
        }
    }
}

/// `abci_query` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultAbciQuery {
    #[serde(default)]
    pub response: Option<ResponseQuery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseQuery {
    #[serde(default, deserialize_with = "de_u32")]
    pub code: u32,
    #[serde(default, deserialize_with = "de_string")]
    pub log: String,
    #[serde(default, deserialize_with = "de_string")]
    pub info: String,
    /// Base64 payload.
    #[serde(default, deserialize_with = "de_string")]
    pub value: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub height: i64,
    #[serde(default, deserialize_with = "de_string")]
    pub codespace: String,
}

/// Gas estimate returned by a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasInfo {
    #[serde(default, deserialize_with = "de_u64")]
    pub gas_wanted: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub gas_used: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GasInfoWrap {
    pub gas_info: GasInfo,
}

/// One entry of a `tx` or `tx_search` result.
#[derive(Debug, Clone, Deserialize)]
pub struct TxResponse {
    #[serde(default, deserialize_with = "de_string")]
    pub hash: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub height: i64,
    #[serde(default, deserialize_with = "de_u32")]
    pub index: u32,
    #[serde(default)]
    pub tx_result: TxResult,
    /// Base64 of the raw transaction.
    #[serde(default, deserialize_with = "de_string")]
    pub tx: String,
}

/// `tx_search` result.
#[derive(Debug, Clone, Deserialize)]
pub struct TxSearchResponse {
    #[serde(default, deserialize_with = "de_vec")]
    pub txs: Vec<TxResponse>,
    #[serde(default, deserialize_with = "de_u64")]
    pub total_count: u64,
}

/// A transaction looked up by hash, with its block time.
#[derive(Debug, Serialize)]
pub struct ResultQueryTx {
    pub hash: String,
    pub height: i64,
    pub timestamp: DateTime<Utc>,
    pub result: TxResult,
    pub tx: TransactionEnvelope,
}

#[derive(Debug, Serialize)]
pub struct ResultSearchTxs {
    pub total: u64,
    /// In the order the node returned them.
    pub txs: Vec<ResultQueryTx>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartSetHeader {
    #[serde(default, deserialize_with = "de_u32")]
    pub total: u32,
    #[serde(default, deserialize_with = "de_string")]
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockId {
    #[serde(default, deserialize_with = "de_string")]
    pub hash: String,
    #[serde(default)]
    pub parts: PartSetHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, deserialize_with = "de_string")]
    pub chain_id: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub height: i64,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub last_block_id: BlockId,
    #[serde(default, deserialize_with = "de_string")]
    pub last_commit_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub data_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub validators_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub next_validators_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub consensus_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub app_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub last_results_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub evidence_hash: String,
    #[serde(default, deserialize_with = "de_string")]
    pub proposer_address: String,
}

/// `block` result as sent by the node, transactions still base64.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultBlockRpc {
    #[serde(default)]
    pub block_id: BlockId,
    pub block: BlockRpc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockRpc {
    pub header: Header,
    #[serde(default)]
    pub data: BlockDataRpc,
    #[serde(default)]
    pub evidence: Value,
    #[serde(default)]
    pub last_commit: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDataRpc {
    #[serde(default, deserialize_with = "de_vec")]
    pub txs: Vec<String>,
}

/// A block with every transaction reconstructed.
#[derive(Debug, Serialize)]
pub struct ResultBlock {
    pub block_id: BlockId,
    pub block: Block,
}

#[derive(Debug, Serialize)]
pub struct Block {
    pub header: Header,
    pub data: BlockData,
    pub evidence: Value,
    pub last_commit: Value,
}

#[derive(Debug, Serialize)]
pub struct BlockData {
    pub txs: Vec<StdTx>,
}

/// `block_results` result. Events are plain text once returned by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockResult {
    #[serde(default, deserialize_with = "de_i64")]
    pub height: i64,
    #[serde(default, deserialize_with = "de_vec")]
    pub txs_results: Vec<TxResult>,
    #[serde(default, deserialize_with = "de_vec")]
    pub begin_block_events: Vec<Event>,
    #[serde(default, deserialize_with = "de_vec")]
    pub end_block_events: Vec<Event>,
    #[serde(default, deserialize_with = "de_vec")]
    pub finalize_block_events: Vec<Event>,
    #[serde(default)]
    pub validator_updates: Value,
    #[serde(default)]
    pub consensus_param_updates: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_broadcast_mode_parses_case_insensitively() {
        assert_eq!("Commit".parse::<BroadcastMode>().unwrap(), BroadcastMode::Commit);
        assert_eq!("sync".parse::<BroadcastMode>().unwrap(), BroadcastMode::Sync);
        assert_eq!("ASYNC".parse::<BroadcastMode>().unwrap(), BroadcastMode::Async);
        assert!(matches!(
            "block".parse::<BroadcastMode>(),
            Err(RpcError::UnknownBroadcastMode(ref m)) if m == "block"
        ));
        assert!(matches!("".parse::<BroadcastMode>(), Err(RpcError::UnknownBroadcastMode(_))));
    }

    #[test]
    fn test_commit_result_reports_failed_check_phase() {
        let resp: BroadcastTxCommitResponse = serde_json::from_value(json!({
            "check_tx": { "code": 5, "log": "insufficient funds" },
            "deliver_tx": { "code": 0, "log": "" },
            "hash": "ABCD",
            "height": "0"
        }))
        .unwrap();

        let result = BroadcastResult::from(resp);

        assert_eq!(result.code, 5);
        assert_eq!(result.log, "insufficient funds");
        assert!(!result.is_success());
    }

    #[test]
    fn test_commit_result_accepts_tx_result_naming() {
        let resp: BroadcastTxCommitResponse = serde_json::from_value(json!({
            "check_tx": { "code": 0 },
            "tx_result": { "code": 11, "log": "out of gas" },
            "hash": "ABCD",
            "height": "12"
        }))
        .unwrap();

        let result = BroadcastResult::from(resp);

        assert_eq!(result.code, 11);
        assert_eq!(result.height, Some(12));
    }

    #[test]
    fn test_block_results_tolerate_null_lists() {
        let result: BlockResult = serde_json::from_value(json!({
            "height": "7",
            "txs_results": null,
            "begin_block_events": null,
            "validator_updates": null
        }))
        .unwrap();

        assert_eq!(result.height, 7);
        assert!(result.txs_results.is_empty());
        assert!(result.end_block_events.is_empty());
    }

    #[test]
    fn test_header_time_keeps_nanoseconds() {
        let header: Header = serde_json::from_value(json!({
            "chain_id": "irita",
            "height": "10",
            "time": "2021-05-10T08:11:11.123456789Z"
        }))
        .unwrap();

        assert_eq!(header.time.timestamp_subsec_nanos(), 123_456_789);
    }
}
