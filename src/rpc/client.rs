//! Query orchestrator for a Tendermint node.
//!
//! [`RpcClient`] composes the envelope codec, the transport, the message
//! registry and the event decoder into the public operations: broadcast,
//! simulate, transaction lookup and search, block and block results.
//!
//! # Example
//!
//! ```rust,no_run
//! use irita_rpc::rpc::{EventQueryBuilder, RpcClient};
//! use url::Url;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = RpcClient::new(Url::parse("http://localhost:26657")?)?;
//!
//! let found = client
//!     .query_txs(&EventQueryBuilder::new().eq("message.module", "nft"), 1, 20)
//!     .await?;
//! for tx in found.txs {
//!     println!("{} at {} ({} msgs)", tx.hash, tx.timestamp, tx.tx.msgs.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use log::{debug, info, warn};
use prost::Message;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use url::Url;

use super::envelope::{JsonRpcRequest, JsonRpcResponse, RpcMethod, parse_envelope};
use super::query::EventQueryBuilder;
use super::types::{
    Block, BlockData, BlockResult, BroadcastMode, BroadcastResult, BroadcastTxCommitResponse, BroadcastTxResponse,
    GasInfo, GasInfoWrap, ResultAbciQuery, ResultBlock, ResultBlockRpc, ResultQueryTx, ResultSearchTxs,
    TxResponse, TxSearchResponse,
};
use crate::error::RpcError;
use crate::events::decode_events;
use crate::http::{HttpClient, RpcTransport};
use crate::msg::proto::SimulateResponse;
use crate::msg::{MsgRegistry, StdTx, reconstruct};
use crate::utils::encoding::{decode_base64, hex_to_base64};

const SIMULATE_PATH: &str = "app/simulate";

/// Client for a single node endpoint.
///
/// Broadcasts are serialized: at most one broadcast request is in flight
/// per client, so submission order matches call order. Queries take no
/// lock and may run concurrently.
pub struct RpcClient {
    rpc_uri: Url,
    transport: Arc<dyn RpcTransport>,
    registry: Arc<MsgRegistry>,
    broadcast_lock: Mutex<()>,
}

impl RpcClient {
    /// Client over HTTP with default timeouts and the built-in message set.
    pub fn new(rpc_uri: Url) -> Result<Self, RpcError> {
        Ok(Self::with_transport(
            rpc_uri,
            Arc::new(HttpClient::new()?),
            Arc::new(MsgRegistry::with_defaults()),
        ))
    }

    pub fn with_transport(rpc_uri: Url, transport: Arc<dyn RpcTransport>, registry: Arc<MsgRegistry>) -> Self {
        Self {
            rpc_uri,
            transport,
            registry,
            broadcast_lock: Mutex::new(()),
        }
    }

    pub fn rpc_uri(&self) -> &Url {
        &self.rpc_uri
    }

    pub fn registry(&self) -> &MsgRegistry {
        &self.registry
    }

    async fn send<T: DeserializeOwned>(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse<T>, RpcError> {
        debug!(
            method = request.method.as_str(),
            id = &*request.id;
            "RPC: Sending request"
        );
        let body = self.transport.post(&self.rpc_uri, request.to_body()?).await?;
        parse_envelope(&body)
    }

    async fn call<T: DeserializeOwned>(&self, request: JsonRpcRequest) -> Result<T, RpcError> {
        let method = request.method;
        self.send(request).await?.into_result(method)
    }

    /// Submits raw transaction bytes in the given mode.
    ///
    /// `Commit` fails unless the transaction was included with code `0`.
    /// `Sync` and `Async` return the node's answer as is, rejections
    /// included; only transport and decode failures are errors.
    pub async fn broadcast_tx(&self, tx_bytes: &[u8], mode: BroadcastMode) -> Result<BroadcastResult, RpcError> {
        let _guard = self.broadcast_lock.lock().await;
        match mode {
            BroadcastMode::Sync => self.send_broadcast(tx_bytes, RpcMethod::BroadcastTxSync).await,
            BroadcastMode::Async => self.send_broadcast(tx_bytes, RpcMethod::BroadcastTxAsync).await,
            BroadcastMode::Commit => self.send_broadcast_commit(tx_bytes).await,
        }
    }

    pub async fn broadcast_tx_sync(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, RpcError> {
        self.broadcast_tx(tx_bytes, BroadcastMode::Sync).await
    }

    pub async fn broadcast_tx_async(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, RpcError> {
        self.broadcast_tx(tx_bytes, BroadcastMode::Async).await
    }

    pub async fn broadcast_tx_commit(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, RpcError> {
        self.broadcast_tx(tx_bytes, BroadcastMode::Commit).await
    }

    async fn send_broadcast(&self, tx_bytes: &[u8], method: RpcMethod) -> Result<BroadcastResult, RpcError> {
        info!(target: "audit", method = method.as_str(); "RPC: Broadcasting transaction");
        let response = self
            .send::<BroadcastTxResponse>(JsonRpcRequest::wrap_tx_bytes(method, tx_bytes))
            .await?;

        let result = match (response.result, response.error) {
            (_, Some(error)) => BroadcastResult {
                error: Some(error),
                ..Default::default()
            },
            (Some(result), None) => BroadcastResult::from(result),
            (None, None) => {
                return Err(RpcError::EmptyEnvelope {
                    method: method.as_str(),
                });
            },
        };

        if !result.is_success() {
            warn!(
                target: "audit",
                code = result.code,
                log = &*result.log;
                "RPC: Transaction not accepted"
            );
        }
        Ok(result)
    }

    async fn send_broadcast_commit(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, RpcError> {
        let method = RpcMethod::BroadcastTxCommit;
        info!(target: "audit", method = method.as_str(); "RPC: Broadcasting transaction");
        let response: BroadcastTxCommitResponse = self.call(JsonRpcRequest::wrap_tx_bytes(method, tx_bytes)).await?;

        let result = BroadcastResult::from(response);
        if result.code != 0 {
            warn!(
                target: "audit",
                code = result.code,
                hash = &*result.hash,
                log = &*result.log;
                "RPC: Transaction rejected"
            );
            return Err(RpcError::TxRejected {
                code: result.code,
                log: result.log,
                hash: result.hash,
            });
        }

        info!(target: "audit", hash = &*result.hash, height = result.height.unwrap_or_default(); "RPC: Transaction committed");
        Ok(result)
    }

    /// Estimates gas by running the transaction through `app/simulate`.
    ///
    /// An empty simulation value is a failure carrying the node's log.
    pub async fn simulate_tx(&self, tx_bytes: &[u8]) -> Result<GasInfo, RpcError> {
        let query: ResultAbciQuery = self
            .call(JsonRpcRequest::wrap_abci_query(SIMULATE_PATH, tx_bytes))
            .await?;
        let response = query.response.ok_or(RpcError::MissingResult {
            method: RpcMethod::AbciQuery.as_str(),
            field: "response",
        })?;

        let value = decode_base64("abci_query value", &response.value)?;
        if value.is_empty() {
            return Err(RpcError::SimulationFailed { log: response.log });
        }

        let gas_info = parse_gas_info(&value)?;
        debug!(gas_wanted = gas_info.gas_wanted, gas_used = gas_info.gas_used; "RPC: Simulation complete");
        Ok(gas_info)
    }

    /// Looks up a transaction by its hex hash.
    ///
    /// Costs two round trips: the `tx` lookup, then a `block` query at the
    /// transaction's height for the timestamp, which `tx` does not carry.
    pub async fn query_tx(&self, hash: &str) -> Result<ResultQueryTx, RpcError> {
        let mut params = Map::new();
        params.insert("hash".to_string(), Value::String(hex_to_base64(hash)?));
        params.insert("prove".to_string(), Value::Bool(true));

        debug!(hash = hash; "RPC: Querying transaction");
        let response: TxResponse = self
            .call(JsonRpcRequest::wrap_base_query(RpcMethod::Tx, params))
            .await?;
        self.parse_result_query_tx(response).await
    }

    /// Builds a [`ResultQueryTx`] from one `tx`/`tx_search` entry.
    ///
    /// Issues a `block` query for the timestamp.
    pub async fn parse_result_query_tx(&self, response: TxResponse) -> Result<ResultQueryTx, RpcError> {
        let raw = decode_base64("tx", &response.tx)?;
        let tx = reconstruct(&raw, &self.registry)?;

        let block = self.fetch_block(Some(response.height)).await?;

        let mut result = response.tx_result;
        decode_events(&mut result.events)?;

        Ok(ResultQueryTx {
            hash: response.hash,
            height: response.height,
            timestamp: block.block.header.time,
            result,
            tx,
        })
    }

    /// Searches transactions by event predicates, ascending by height.
    ///
    /// `page` and `size` are left to the node's defaults when not positive.
    /// Every match costs an extra `block` round trip for its timestamp.
    pub async fn query_txs(
        &self,
        builder: &EventQueryBuilder,
        page: i32,
        size: i32,
    ) -> Result<ResultSearchTxs, RpcError> {
        let query = builder.build();
        if query.is_empty() {
            return Err(RpcError::EmptyQuery);
        }

        let mut params = Map::new();
        params.insert("query".to_string(), Value::String(query.clone()));
        params.insert("prove".to_string(), Value::Bool(true));
        params.insert("order_by".to_string(), Value::String("asc".to_string()));
        if page > 0 {
            params.insert("page".to_string(), Value::String(page.to_string()));
        }
        if size > 0 {
            params.insert("per_page".to_string(), Value::String(size.to_string()));
        }

        debug!(query = &*query, page = page, size = size; "RPC: Searching transactions");
        let response: TxSearchResponse = self
            .call(JsonRpcRequest::wrap_base_query(RpcMethod::TxSearch, params))
            .await?;

        let mut txs = Vec::with_capacity(response.txs.len());
        for tx in response.txs {
            txs.push(self.parse_result_query_tx(tx).await?);
        }

        Ok(ResultSearchTxs {
            total: response.total_count,
            txs,
        })
    }

    /// Fetches a block and reconstructs all of its transactions.
    ///
    /// `None` asks for the latest block. Any transaction that fails to
    /// decode fails the whole call.
    pub async fn query_block(&self, height: Option<i64>) -> Result<ResultBlock, RpcError> {
        let rpc = self.fetch_block(height).await?;

        let txs = rpc
            .block
            .data
            .txs
            .iter()
            .map(|encoded| {
                let raw = decode_base64("block tx", encoded)?;
                StdTx::from_raw(&raw, &self.registry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResultBlock {
            block_id: rpc.block_id,
            block: Block {
                header: rpc.block.header,
                data: BlockData { txs },
                evidence: rpc.block.evidence,
                last_commit: rpc.block.last_commit,
            },
        })
    }

    async fn fetch_block(&self, height: Option<i64>) -> Result<ResultBlockRpc, RpcError> {
        debug!(height:? = height; "RPC: Querying block");
        self.call(JsonRpcRequest::wrap_base_query(RpcMethod::Block, height_params(height)))
            .await
    }

    /// Fetches execution results for a block, with all event attributes
    /// decoded to plain text.
    pub async fn query_block_result(&self, height: Option<i64>) -> Result<BlockResult, RpcError> {
        debug!(height:? = height; "RPC: Querying block results");
        let mut result: BlockResult = self
            .call(JsonRpcRequest::wrap_base_query(RpcMethod::BlockResults, height_params(height)))
            .await?;

        for tx_result in result.txs_results.iter_mut() {
            decode_events(&mut tx_result.events)?;
        }
        decode_events(&mut result.begin_block_events)?;
        decode_events(&mut result.end_block_events)?;
        decode_events(&mut result.finalize_block_events)?;
        Ok(result)
    }
}

fn height_params(height: Option<i64>) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(height) = height {
        params.insert("height".to_string(), Value::String(height.to_string()));
    }
    params
}

/// Older apps answer with a JSON `{"gas_info": ...}` document, newer ones
/// with a protobuf `SimulateResponse`.
fn parse_gas_info(value: &[u8]) -> Result<GasInfo, RpcError> {
    if value.first() == Some(&b'{') {
        let wrap: GasInfoWrap = serde_json::from_slice(value)?;
        return Ok(wrap.gas_info);
    }

    let response = SimulateResponse::decode(value).map_err(RpcError::MalformedSimulation)?;
    let gas_info = response.gas_info.ok_or(RpcError::MissingResult {
        method: RpcMethod::AbciQuery.as_str(),
        field: "gas_info",
    })?;
    Ok(GasInfo {
        gas_wanted: gas_info.gas_wanted,
        gas_used: gas_info.gas_used,
    })
}
