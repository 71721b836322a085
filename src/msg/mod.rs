//! Transaction decoding.
//!
//! - [`proto`] declares the cosmos transaction envelope.
//! - [`MsgRegistry`] resolves opaque `Any` messages into typed values.
//! - [`reconstruct`] and [`StdTx`] rebuild whole transactions from raw bytes.

pub mod builtin;
pub mod proto;
mod registry;
mod tx;

pub use registry::{BoxedMessage, MsgDecoder, MsgRegistry, TypedMessage};
pub use tx::{StdTx, TransactionEnvelope, reconstruct};

#[cfg(test)]
pub(crate) use tx::tests as fixtures;
