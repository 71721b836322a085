//! Error types for the HTTP transport.
//!
//! This module defines the [`HttpError`] enum which covers every way a
//! JSON-RPC POST to a Tendermint node can fail before a response body is
//! available for decoding.

use thiserror::Error;

/// Errors that can occur while posting a request to the node.
///
/// These are transport failures only. A node that answers with a JSON-RPC
/// error envelope is not an `HttpError`; that case is decoded and reported
/// by the RPC layer.
///
/// # Error Categories
///
/// - **Network errors**: [`RequestFailed`](HttpError::RequestFailed)
/// - **Server errors**: [`ServerError`](HttpError::ServerError)
/// - **Client errors**: [`InvalidHeader`](HttpError::InvalidHeader)
///
/// # Example
///
/// ```rust,no_run
/// use irita_rpc::http::HttpError;
///
/// fn handle_error(err: HttpError) {
///     match err {
///         HttpError::ServerError { status, body } => {
///             eprintln!("Node returned {}: {}", status, body);
///         }
///         HttpError::RequestFailed(e) => {
///             eprintln!("Network error: {}", e);
///         }
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP request failed due to a network or connection error.
    ///
    /// This typically indicates connectivity issues such as:
    /// - Connection refused (node not running)
    /// - Connection timeout
    /// - DNS resolution failure
    /// - TLS/SSL handshake errors
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The node returned a non-success HTTP status code.
    ///
    /// Contains both the HTTP status code and the response body for debugging.
    #[error("Server error {status}: {body}")]
    ServerError {
        /// The HTTP status code returned by the node.
        status: reqwest::StatusCode,
        /// The response body, which may contain error details.
        body: String,
    },

    /// The configured project key cannot be sent as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
