//! Tendermint JSON-RPC client.
//!
//! - [`envelope`] builds requests and decodes the `result | error` envelope.
//! - [`RpcClient`] runs the broadcast and query operations against a node.
//! - [`EventQueryBuilder`] composes `tx_search` query strings.

mod client;
pub mod envelope;
mod query;
pub mod types;

pub use client::RpcClient;
pub use envelope::{JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse, RpcMethod, parse_envelope};
pub use query::{Condition, EventQueryBuilder, Operator, QueryValue};
pub use types::{
    BlockResult, BroadcastMode, BroadcastResult, GasInfo, ResultBlock, ResultQueryTx, ResultSearchTxs, TxResult,
};
