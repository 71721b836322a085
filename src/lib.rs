//! Client for Tendermint-based IRITA nodes over JSON-RPC.
//!
//! [`RpcClient`] broadcasts signed transactions, simulates them for gas, and
//! queries transactions, blocks and block results. Raw transactions are
//! rebuilt into typed messages through a [`MsgRegistry`], and event
//! attributes are decoded from base64 to plain text.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod log;
pub mod msg;
pub mod rpc;
pub mod utils;

pub use crate::error::RpcError;
pub use crate::msg::MsgRegistry;
pub use crate::rpc::{BroadcastMode, RpcClient};
