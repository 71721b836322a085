//! Protobuf definitions for the cosmos transaction envelope.
//!
//! Only the fields the client reads are declared; prost skips the rest.

use serde::Serialize;

use crate::utils::encoding::{ser_base64, ser_base64_vec};

/// `cosmos.tx.v1beta1.Tx`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tx {
    #[prost(message, optional, tag = "1")]
    pub body: Option<TxBody>,
    #[prost(message, optional, tag = "2")]
    pub auth_info: Option<AuthInfo>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

/// `cosmos.tx.v1beta1.TxBody`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<OpaqueMessage>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

/// `google.protobuf.Any`: a type tag plus the encoded message it names.
#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct OpaqueMessage {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(serialize_with = "ser_base64")]
    pub value: Vec<u8>,
}

/// `cosmos.tx.v1beta1.AuthInfo`
#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

/// `cosmos.tx.v1beta1.SignerInfo`
#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<OpaqueMessage>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

/// `cosmos.tx.v1beta1.Fee`
#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// `cosmos.base.v1beta1.Coin`
#[derive(Clone, PartialEq, Eq, Serialize, ::prost::Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// `cosmos.tx.v1beta1.SimulateResponse`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SimulateResponse {
    #[prost(message, optional, tag = "1")]
    pub gas_info: Option<GasInfoProto>,
}

/// `cosmos.base.abci.v1beta1.GasInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GasInfoProto {
    #[prost(uint64, tag = "1")]
    pub gas_wanted: u64,
    #[prost(uint64, tag = "2")]
    pub gas_used: u64,
}

/// Signatures are kept for callers that re-verify; the client never does.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Signatures(#[serde(serialize_with = "ser_base64_vec")] pub Vec<Vec<u8>>);
