//! ABCI event attribute decoding.
//!
//! Tendermint returns event attribute keys and values base64-encoded inside
//! JSON. Both transaction results and block results go through
//! [`decode_events`] before they reach a caller, so attributes are always
//! exposed as plain text.
//!
//! Keys are always decoded and must be non-empty afterwards. Values are
//! decoded only when the wire value is non-empty; an empty value is a
//! legitimate attribute and is left as is.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::utils::encoding::{de_string, de_vec, decode_base64};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default, deserialize_with = "de_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "de_vec")]
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    #[serde(default, deserialize_with = "de_string")]
    pub key: String,
    #[serde(default, deserialize_with = "de_string")]
    pub value: String,
    #[serde(default)]
    pub index: bool,
}

/// Decodes every attribute of every event in place.
///
/// Fails on the first attribute that is not valid base64 or UTF-8, or whose
/// key decodes to nothing.
pub fn decode_events(events: &mut [Event]) -> Result<(), RpcError> {
    for event in events.iter_mut() {
        for attribute in event.attributes.iter_mut() {
            decode_attribute(&event.kind, attribute)?;
        }
    }
    Ok(())
}

fn decode_attribute(event_type: &str, attribute: &mut EventAttribute) -> Result<(), RpcError> {
    let key = decode_text("event attribute key", &attribute.key)?;
    if key.is_empty() {
        return Err(RpcError::EmptyAttributeKey {
            event_type: event_type.to_string(),
        });
    }
    attribute.key = key;

    if !attribute.value.is_empty() {
        attribute.value = decode_text("event attribute value", &attribute.value)?;
    }
    Ok(())
}

fn decode_text(field: &'static str, encoded: &str) -> Result<String, RpcError> {
    String::from_utf8(decode_base64(field, encoded)?).map_err(|_| RpcError::Utf8 { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(key: &str, value: &str) -> EventAttribute {
        EventAttribute {
            key: key.to_string(),
            value: value.to_string(),
            index: true,
        }
    }

    #[test]
    fn test_decodes_keys_and_values() {
        // "sender" / "iaa1abc"
        let mut events = vec![Event {
            kind: "message".to_string(),
            attributes: vec![attr("c2VuZGVy", "aWFhMWFiYw=="), attr("YWN0aW9u", "c2VuZA==")],
        }];

        decode_events(&mut events).unwrap();

        assert_eq!(events[0].attributes[0], attr("sender", "iaa1abc"));
        assert_eq!(events[0].attributes[1], attr("action", "send"));
    }

    #[test]
    fn test_empty_value_stays_empty() {
        let mut events = vec![Event {
            kind: "transfer".to_string(),
            attributes: vec![attr("bWVtbw==", "")],
        }];

        decode_events(&mut events).unwrap();

        assert_eq!(events[0].attributes[0].key, "memo");
        assert_eq!(events[0].attributes[0].value, "");
    }

    #[test]
    fn test_value_with_non_base64_safe_bytes_changes() {
        // "a b/c" is not itself valid base64 text
        let mut events = vec![Event {
            kind: "k".to_string(),
            attributes: vec![attr("aw==", "YSBiL2M=")],
        }];

        decode_events(&mut events).unwrap();

        assert_eq!(events[0].attributes[0].value, "a b/c");
        assert_ne!(events[0].attributes[0].value, "YSBiL2M=");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let mut events = vec![Event {
            kind: "message".to_string(),
            attributes: vec![attr("", "dmFsdWU=")],
        }];

        let err = decode_events(&mut events).unwrap_err();
        assert!(matches!(err, RpcError::EmptyAttributeKey { ref event_type } if event_type == "message"));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let mut events = vec![Event {
            kind: "message".to_string(),
            attributes: vec![attr("not base64!", "")],
        }];

        assert!(matches!(
            decode_events(&mut events),
            Err(RpcError::Base64 {
                field: "event attribute key",
                ..
            })
        ));
    }

    #[test]
    fn test_null_value_on_wire_deserializes_as_empty() {
        let event: Event =
            serde_json::from_str(r#"{"type":"message","attributes":[{"key":"a2V5","value":null}]}"#).unwrap();
        assert_eq!(event.attributes[0].value, "");
    }
}
