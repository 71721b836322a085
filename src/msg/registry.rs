//! Message type registry.
//!
//! Transaction bodies carry their messages as opaque `(type_url, bytes)`
//! pairs. [`MsgRegistry`] maps each type tag to the decoder that turns the
//! bytes into a concrete message, so new message kinds are supported by
//! registering them rather than by editing a closed match.
//!
//! The registry is built once at startup and owned by the
//! [`RpcClient`](crate::rpc::RpcClient); it is read-only afterwards.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::trace;
use prost::Name;
use serde::{Serialize, Serializer};

use crate::error::RpcError;

/// A decoded, strongly typed transaction message.
///
/// Implemented for every prost message that also implements [`Name`] and
/// [`Serialize`]. Use [`downcast_ref`](dyn TypedMessage::downcast_ref) to get
/// the concrete type back.
pub trait TypedMessage: fmt::Debug + Send + Sync + 'static {
    /// The wire type tag, with its leading `/`.
    fn type_url(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// JSON rendering of the message fields.
    fn to_json(&self) -> serde_json::Value;
}

impl<M> TypedMessage for M
where
    M: prost::Message + Name + Serialize + 'static,
{
    fn type_url(&self) -> String {
        <M as Name>::type_url()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl dyn TypedMessage {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Rendered as the message fields plus an `@type` key, the way cosmos JSON
/// shows `Any` values.
impl Serialize for dyn TypedMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = self.to_json();
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("@type".to_string(), serde_json::Value::String(self.type_url()));
        }
        value.serialize(serializer)
    }
}

pub type BoxedMessage = Box<dyn TypedMessage>;

pub type MsgDecoder = Arc<dyn Fn(&[u8]) -> Result<BoxedMessage, prost::DecodeError> + Send + Sync>;

/// Lookup table from type tag to decoder.
#[derive(Clone, Default)]
pub struct MsgRegistry {
    decoders: HashMap<String, MsgDecoder>,
}

impl fmt::Debug for MsgRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("MsgRegistry").field("types", &tags).finish()
    }
}

impl MsgRegistry {
    /// An empty registry. Every lookup fails until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in message set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::builtin::register_all(&mut registry);
        registry
    }

    /// Registers `M` under its protobuf full name.
    pub fn register<M>(&mut self) -> &mut Self
    where
        M: prost::Message + Name + Default + Serialize + 'static,
    {
        self.register_decoder(&M::full_name(), |bytes| {
            let msg = M::decode(bytes)?;
            Ok(Box::new(msg) as BoxedMessage)
        })
    }

    /// Registers an arbitrary decoder for `type_tag`, replacing any previous one.
    ///
    /// The tag may be given with or without its leading `/`.
    pub fn register_decoder<F>(&mut self, type_tag: &str, decoder: F) -> &mut Self
    where
        F: Fn(&[u8]) -> Result<BoxedMessage, prost::DecodeError> + Send + Sync + 'static,
    {
        let tag = normalize(type_tag).to_string();
        trace!(type_tag = &*tag; "Registering message decoder");
        self.decoders.insert(tag, Arc::new(decoder));
        self
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.decoders.contains_key(normalize(type_tag))
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decodes `value` as the message named by `type_url`.
    ///
    /// An empty tag or payload, an unregistered tag, and a payload the
    /// decoder rejects are all errors.
    pub fn decode(&self, type_url: &str, value: &[u8]) -> Result<BoxedMessage, RpcError> {
        if type_url.is_empty() || value.is_empty() {
            return Err(RpcError::EmptyMessage);
        }
        let tag = normalize(type_url);
        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| RpcError::UnknownMessageType(tag.to_string()))?;

        decoder(value).map_err(|source| RpcError::MessageDecode {
            type_url: tag.to_string(),
            source,
        })
    }
}

fn normalize(type_tag: &str) -> &str {
    type_tag.strip_prefix('/').unwrap_or(type_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::builtin::bank::MsgSend;
    use crate::msg::proto::Coin;
    use prost::Message;

    fn send() -> MsgSend {
        MsgSend {
            from_address: "iaa1from".to_string(),
            to_address: "iaa1to".to_string(),
            amount: vec![Coin {
                denom: "uirita".to_string(),
                amount: "10".to_string(),
            }],
        }
    }

    #[test]
    fn test_decode_strips_leading_separator() {
        let mut registry = MsgRegistry::new();
        registry.register::<MsgSend>();

        let msg = registry
            .decode("/cosmos.bank.v1beta1.MsgSend", &send().encode_to_vec())
            .unwrap();

        assert_eq!(msg.type_url(), "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(msg.downcast_ref::<MsgSend>(), Some(&send()));
        assert!(registry.contains("cosmos.bank.v1beta1.MsgSend"));
    }

    #[test]
    fn test_unknown_tag_names_the_tag() {
        let registry = MsgRegistry::new();

        let err = registry.decode("/x.y.MsgUnknown", &[0x0a, 0x01, 0x61]).unwrap_err();

        assert!(matches!(err, RpcError::UnknownMessageType(ref tag) if tag == "x.y.MsgUnknown"));
        assert_eq!(err.to_string(), "unresolved message type: x.y.MsgUnknown");
    }

    #[test]
    fn test_empty_tag_or_payload_is_rejected() {
        let registry = MsgRegistry::with_defaults();

        assert!(matches!(registry.decode("", &[0x0a]), Err(RpcError::EmptyMessage)));
        assert!(matches!(
            registry.decode("/cosmos.bank.v1beta1.MsgSend", &[]),
            Err(RpcError::EmptyMessage)
        ));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let registry = MsgRegistry::with_defaults();

        // field 1, length-delimited, claims 16 bytes but carries one
        let err = registry
            .decode("/cosmos.bank.v1beta1.MsgSend", &[0x0a, 0x10, 0x61])
            .unwrap_err();

        assert!(matches!(err, RpcError::MessageDecode { .. }));
    }

    #[test]
    fn test_custom_decoder_is_used() {
        let mut registry = MsgRegistry::new();
        registry.register_decoder("/custom.v1.MsgPing", |bytes| {
            Ok(Box::new(MsgSend {
                from_address: String::from_utf8_lossy(bytes).into_owned(),
                ..Default::default()
            }) as BoxedMessage)
        });

        let msg = registry.decode("/custom.v1.MsgPing", b"ping").unwrap();

        assert_eq!(msg.downcast_ref::<MsgSend>().unwrap().from_address, "ping");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let msg: BoxedMessage = Box::new(send());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["@type"], "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(json["from_address"], "iaa1from");
        assert_eq!(json["amount"][0]["denom"], "uirita");
    }

    #[test]
    fn test_defaults_cover_builtin_messages() {
        let registry = MsgRegistry::with_defaults();

        for tag in [
            "/cosmos.bank.v1beta1.MsgSend",
            "/cosmos.bank.v1beta1.MsgMultiSend",
            "/cosmos.staking.v1beta1.MsgDelegate",
            "/cosmos.staking.v1beta1.MsgUndelegate",
            "/cosmos.staking.v1beta1.MsgBeginRedelegate",
            "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward",
            "/irismod.nft.MsgIssueDenom",
            "/irismod.nft.MsgMintNFT",
            "/irismod.nft.MsgEditNFT",
            "/irismod.nft.MsgTransferNFT",
            "/irismod.nft.MsgBurnNFT",
        ] {
            assert!(registry.contains(tag), "{tag} not registered");
        }
    }
}
