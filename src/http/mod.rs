//! HTTP transport for Tendermint JSON-RPC communication.
//!
//! The RPC layer only needs one capability from the network: post a JSON
//! body to the node's endpoint and get the response body back. That seam is
//! the [`RpcTransport`] trait, so the request pipeline can be exercised with
//! an in-process fake and run against a real node through [`HttpClient`].
//!
//! # Example
//!
//! ```rust,no_run
//! use irita_rpc::http::{HttpClient, RpcTransport};
//! use url::Url;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let transport = HttpClient::new()?;
//! let uri = Url::parse("http://localhost:26657")?;
//! let body = transport
//!     .post(&uri, r#"{"jsonrpc":"2.0","id":"1","method":"block","params":{}}"#.to_string())
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;

use async_trait::async_trait;
use url::Url;

pub use error::HttpError;
pub use http_client::HttpClient;

/// Posts a request body to a node and returns the raw response body.
///
/// Implementations own timeouts and connection management. Any body
/// returned as `Ok` is handed to the envelope decoder as JSON.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, uri: &Url, body: String) -> Result<String, HttpError>;
}
