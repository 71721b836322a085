//! Transaction reconstruction.
//!
//! Turns raw transaction bytes into a [`TransactionEnvelope`] whose messages
//! have all been resolved through the [`MsgRegistry`]. Reconstruction is
//! all-or-nothing: one message that fails to decode fails the transaction.

use prost::Message;
use serde::Serialize;

use super::proto::{self, AuthInfo, Fee, Signatures};
use super::registry::{BoxedMessage, MsgRegistry};
use crate::error::RpcError;
use crate::utils::encoding::sha256_hex;

/// A decoded transaction body plus its authorization info.
#[derive(Debug, Serialize)]
pub struct TransactionEnvelope {
    pub memo: String,
    pub timeout_height: u64,
    /// Messages in their original order.
    pub msgs: Vec<BoxedMessage>,
    pub auth_info: AuthInfo,
    pub signatures: Signatures,
}

/// A transaction as found in a block, identified by its content hash.
#[derive(Debug, Serialize)]
pub struct StdTx {
    pub msgs: Vec<BoxedMessage>,
    pub memo: String,
    pub fee: Option<Fee>,
    /// Lowercase hex SHA-256 of the raw transaction bytes.
    pub tx_hash: String,
}

/// Decodes `raw` and resolves every message through `registry`.
pub fn reconstruct(raw: &[u8], registry: &MsgRegistry) -> Result<TransactionEnvelope, RpcError> {
    let tx = proto::Tx::decode(raw).map_err(RpcError::TxDecode)?;
    let body = tx.body.unwrap_or_default();
    let msgs = resolve_messages(&body, registry)?;

    Ok(TransactionEnvelope {
        memo: body.memo,
        timeout_height: body.timeout_height,
        msgs,
        auth_info: tx.auth_info.unwrap_or_default(),
        signatures: Signatures(tx.signatures),
    })
}

impl StdTx {
    /// Builds a block entry from raw bytes. Blocks carry no per-transaction
    /// hash, so one is computed from the bytes.
    pub fn from_raw(raw: &[u8], registry: &MsgRegistry) -> Result<Self, RpcError> {
        let envelope = reconstruct(raw, registry)?;
        Ok(Self {
            msgs: envelope.msgs,
            memo: envelope.memo,
            fee: envelope.auth_info.fee,
            tx_hash: sha256_hex(raw),
        })
    }
}

fn resolve_messages(body: &proto::TxBody, registry: &MsgRegistry) -> Result<Vec<BoxedMessage>, RpcError> {
    body.messages
        .iter()
        .map(|any| registry.decode(&any.type_url, &any.value))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::msg::builtin::bank::MsgSend;
    use crate::msg::builtin::nft::MsgBurnNFT;
    use crate::msg::proto::{Coin, OpaqueMessage, TxBody};
    use prost::Name;

    pub(crate) fn pack<M: Message + Name>(msg: &M) -> OpaqueMessage {
        OpaqueMessage {
            type_url: M::type_url(),
            value: msg.encode_to_vec(),
        }
    }

    pub(crate) fn send(from: &str, amount: &str) -> MsgSend {
        MsgSend {
            from_address: from.to_string(),
            to_address: "iaa1to".to_string(),
            amount: vec![Coin {
                denom: "uirita".to_string(),
                amount: amount.to_string(),
            }],
        }
    }

    pub(crate) fn raw_tx(messages: Vec<OpaqueMessage>, memo: &str) -> Vec<u8> {
        proto::Tx {
            body: Some(TxBody {
                messages,
                memo: memo.to_string(),
                timeout_height: 99,
            }),
            auth_info: Some(AuthInfo {
                signer_infos: vec![],
                fee: Some(Fee {
                    amount: vec![Coin {
                        denom: "uirita".to_string(),
                        amount: "4".to_string(),
                    }],
                    gas_limit: 200_000,
                    payer: String::new(),
                    granter: String::new(),
                }),
            }),
            signatures: vec![vec![1, 2, 3]],
        }
        .encode_to_vec()
    }

    #[test]
    fn test_reconstruct_preserves_message_order() {
        let burn = MsgBurnNFT {
            id: "nft1".to_string(),
            denom_id: "denom".to_string(),
            sender: "iaa1b".to_string(),
        };
        let raw = raw_tx(vec![pack(&send("iaa1a", "1")), pack(&burn), pack(&send("iaa1c", "3"))], "hello");

        let envelope = reconstruct(&raw, &MsgRegistry::with_defaults()).unwrap();

        assert_eq!(envelope.memo, "hello");
        assert_eq!(envelope.timeout_height, 99);
        assert_eq!(envelope.msgs.len(), 3);
        assert_eq!(envelope.msgs[0].downcast_ref::<MsgSend>(), Some(&send("iaa1a", "1")));
        assert_eq!(envelope.msgs[1].downcast_ref::<MsgBurnNFT>(), Some(&burn));
        assert_eq!(envelope.msgs[2].downcast_ref::<MsgSend>(), Some(&send("iaa1c", "3")));
        assert_eq!(envelope.auth_info.fee.as_ref().map(|f| f.gas_limit), Some(200_000));
        assert_eq!(envelope.signatures.0, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_reconstruct_fails_whole_tx_on_unknown_message() {
        let unknown = OpaqueMessage {
            type_url: "/x.y.MsgUnknown".to_string(),
            value: vec![0x0a, 0x01, 0x61],
        };
        let raw = raw_tx(vec![pack(&send("iaa1a", "1")), unknown], "");

        let err = reconstruct(&raw, &MsgRegistry::with_defaults()).unwrap_err();

        assert!(matches!(err, RpcError::UnknownMessageType(ref tag) if tag == "x.y.MsgUnknown"));
    }

    #[test]
    fn test_reconstruct_rejects_garbage_bytes() {
        let err = reconstruct(&[0xff, 0xff, 0xff], &MsgRegistry::with_defaults()).unwrap_err();
        assert!(matches!(err, RpcError::TxDecode(_)));
    }

    #[test]
    fn test_std_tx_hash_is_hex_sha256_of_raw_bytes() {
        let raw = raw_tx(vec![pack(&send("iaa1a", "1"))], "memo");

        let std_tx = StdTx::from_raw(&raw, &MsgRegistry::with_defaults()).unwrap();

        assert_eq!(std_tx.tx_hash, sha256_hex(&raw));
        assert_eq!(std_tx.tx_hash.len(), 64);
        assert_eq!(std_tx.memo, "memo");
        assert_eq!(std_tx.fee.unwrap().amount[0].amount, "4");
        assert_eq!(std_tx.msgs.len(), 1);
    }
}
