//! Hashing and serde helpers for the node's JSON encodings.
//!
//! Tendermint renders 64-bit integers as JSON strings and raw bytes as
//! base64. The deserializers here accept either form for numbers and treat
//! `null` as the empty value.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Deserializer, Serializer};
use sha2::{Digest, Sha256};

use crate::error::RpcError;

/// Lowercase hex of the SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn decode_base64(field: &'static str, encoded: &str) -> Result<Vec<u8>, RpcError> {
    B64.decode(encoded).map_err(|source| RpcError::Base64 { field, source })
}

/// Re-encodes a caller supplied hex hash as base64 for the `tx` endpoint.
pub fn hex_to_base64(hex_str: &str) -> Result<String, RpcError> {
    Ok(B64.encode(hex::decode(hex_str)?))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum<N> {
    Num(N),
    Str(String),
}

fn parse_num<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + std::str::FromStr + Default,
    N::Err: std::fmt::Display,
{
    match Option::<StrOrNum<N>>::deserialize(deserializer)? {
        None => Ok(N::default()),
        Some(StrOrNum::Num(n)) => Ok(n),
        Some(StrOrNum::Str(s)) if s.is_empty() => Ok(N::default()),
        Some(StrOrNum::Str(s)) => s.parse().map_err(serde::de::Error::custom),
    }
}

pub fn de_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    parse_num(deserializer)
}

pub fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse_num(deserializer)
}

pub fn de_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    parse_num(deserializer)
}

/// `null` and missing both become an empty string.
pub fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` and missing both become an empty list.
pub fn de_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn ser_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&B64.encode(bytes))
}

pub fn ser_base64_vec<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter().map(|b| B64.encode(b)))
}
