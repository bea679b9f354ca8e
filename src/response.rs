//! Decoding of Vault response envelopes into flat string maps.

use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Which envelope shape a response body is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// KV v2 read: fields under `.data.data`, metadata under `.data.metadata`
    ReadKvV2,
    /// Auth login: fields under `.auth`, token under `client_token`
    Login,
}

/// Flat key/value view of one decoded response.
#[derive(Debug, Clone, Default)]
pub struct SecretPayload {
    /// Secret fields, or auth fields for login responses
    pub data: HashMap<String, String>,
    /// KV v2 metadata; empty for login responses
    pub metadata: HashMap<String, String>,
}

/// Decode a raw response body.
///
/// Null fields are dropped, string values are taken verbatim, anything
/// else is stringified as compact JSON. Malformed JSON or an unexpected
/// envelope yields an empty payload rather than an error; secret
/// consumers must degrade gracefully.
#[must_use]
pub fn decode(body: &str, operation: Operation) -> SecretPayload {
    let Ok(root) = serde_json::from_str::<Value>(body) else {
        warn!("response body is not valid JSON");
        return SecretPayload::default();
    };

    let mut payload = SecretPayload::default();
    match operation {
        Operation::Login => {
            if let Some(auth) = root.get("auth").and_then(Value::as_object) {
                collect_fields(auth, &mut payload.data);
            } else {
                warn!("login response has no auth object");
            }
        }
        Operation::ReadKvV2 => {
            let Some(data) = root.get("data").and_then(Value::as_object) else {
                warn!("read response has no data object");
                return payload;
            };
            if let Some(metadata) = data.get("metadata").and_then(Value::as_object) {
                collect_fields(metadata, &mut payload.metadata);
            }
            if let Some(fields) = data.get("data").and_then(Value::as_object) {
                collect_fields(fields, &mut payload.data);
            }
        }
    }
    payload
}

fn collect_fields(object: &serde_json::Map<String, Value>, map: &mut HashMap<String, String>) {
    for (name, value) in object {
        match value {
            Value::Null => {}
            Value::String(s) => {
                map.insert(name.clone(), s.clone());
            }
            other => {
                map.insert(name.clone(), other.to_string());
            }
        }
    }
}
