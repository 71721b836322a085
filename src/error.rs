//! Error types for the RPC client.
//!
//! Every public operation on [`RpcClient`](crate::rpc::RpcClient) returns
//! [`RpcError`]. Nothing is recovered locally: a failure anywhere in the
//! pipeline is surfaced to the caller, and partially decoded results are
//! never returned.
//!
//! # Error Categories
//!
//! - **Usage errors**: [`UnknownBroadcastMode`](RpcError::UnknownBroadcastMode),
//!   [`EmptyQuery`](RpcError::EmptyQuery), [`EmptyMessage`](RpcError::EmptyMessage)
//! - **Protocol errors**: [`Node`](RpcError::Node),
//!   [`InvalidEnvelope`](RpcError::InvalidEnvelope),
//!   [`EmptyEnvelope`](RpcError::EmptyEnvelope),
//!   [`MissingResult`](RpcError::MissingResult),
//!   [`UnknownMessageType`](RpcError::UnknownMessageType),
//!   [`MessageDecode`](RpcError::MessageDecode), [`TxDecode`](RpcError::TxDecode),
//!   [`MalformedSimulation`](RpcError::MalformedSimulation)
//! - **Domain rejections**: [`TxRejected`](RpcError::TxRejected),
//!   [`SimulationFailed`](RpcError::SimulationFailed)
//! - **Encoding errors**: [`Base64`](RpcError::Base64), [`Hex`](RpcError::Hex),
//!   [`Utf8`](RpcError::Utf8), [`EmptyAttributeKey`](RpcError::EmptyAttributeKey)
//! - **Transport errors**: [`Transport`](RpcError::Transport)

use thiserror::Error;

use crate::http::HttpError;

#[derive(Debug, Error)]
pub enum RpcError {
    /// A broadcast mode name did not match `sync`, `async` or `commit`.
    #[error("unknown broadcast mode: {0}")]
    UnknownBroadcastMode(String),

    /// A transaction search was requested without any predicate.
    #[error("must declare at least one tag to search")]
    EmptyQuery,

    /// An opaque message had no type tag or no payload.
    #[error("message can not be empty")]
    EmptyMessage,

    /// A field the operation needs is absent from an otherwise valid result.
    #[error("{method}: response carries no {field}")]
    MissingResult {
        method: &'static str,
        field: &'static str,
    },

    /// The envelope has neither `result` nor `error`.
    #[error("{method}: response has neither result nor error")]
    EmptyEnvelope { method: &'static str },

    /// The node answered with a JSON-RPC error envelope.
    #[error("node error {code}: {}", node_detail(.message, .data))]
    Node {
        code: i64,
        message: String,
        data: Option<String>,
    },

    /// The response body was not a valid JSON-RPC envelope for the method.
    #[error("invalid JSON-RPC envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),

    /// No decoder is registered for the message type tag.
    #[error("unresolved message type: {0}")]
    UnknownMessageType(String),

    /// A registered decoder rejected the message payload.
    #[error("failed to decode message {type_url}: {source}")]
    MessageDecode {
        type_url: String,
        #[source]
        source: prost::DecodeError,
    },

    /// The raw transaction bytes are not a valid transaction envelope.
    #[error("failed to decode transaction: {0}")]
    TxDecode(#[source] prost::DecodeError),

    /// A commit broadcast was answered but not accepted by the chain.
    #[error("log: {log}\nhash: {hash}")]
    TxRejected { code: u32, log: String, hash: String },

    /// A simulation returned no gas estimate.
    #[error("simulation failed: {log}")]
    SimulationFailed { log: String },

    /// A simulation returned a value that is neither JSON nor a `SimulateResponse`.
    #[error("failed to decode simulation result: {0}")]
    MalformedSimulation(#[source] prost::DecodeError),

    #[error("invalid base64 in {field}: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid UTF-8 in {field}")]
    Utf8 { field: &'static str },

    /// An event attribute decoded to an empty key.
    #[error("event {event_type} has an attribute with an empty key")]
    EmptyAttributeKey { event_type: String },

    #[error(transparent)]
    Transport(#[from] HttpError),
}

/// Tendermint puts the useful text in `data`; `message` is usually just
/// "Internal error".
fn node_detail<'a>(message: &'a str, data: &'a Option<String>) -> &'a str {
    match data.as_deref() {
        Some(d) if !d.is_empty() => d,
        _ => message,
    }
}
