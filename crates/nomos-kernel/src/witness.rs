//! Deterministic finding identifiers and report digests.
//!
//! A finding id depends only on what was found, never on when:
//!
//! 1. build the canonical key `{schema, kind, target, rule, class, outcome, message}`
//! 2. serialize with JCS (RFC 8785): sorted keys, no whitespace
//! 3. `findingId = "f1_" || base32hex_lower(SHA256(keyBytes))`

use serde_json::Value;
use sha2::{Digest, Sha256};

const FINDING_KEY_SCHEMA: u64 = 1;

/// Fields of a finding that contribute to its id.
#[derive(Debug, Clone, Copy)]
pub struct FindingKey<'a> {
    pub kind: &'a str,
    pub target: &'a str,
    pub rule: &'a str,
    pub class: &'a str,
    pub outcome: &'a str,
    pub message: &'a str,
}

pub fn compute_finding_id(key: FindingKey<'_>) -> String {
    let mut map = serde_json::Map::new();
    map.insert("schema".to_string(), Value::from(FINDING_KEY_SCHEMA));
    map.insert("kind".to_string(), Value::from(key.kind));
    map.insert("target".to_string(), Value::from(key.target));
    map.insert("rule".to_string(), Value::from(key.rule));
    map.insert("class".to_string(), Value::from(key.class));
    map.insert("outcome".to_string(), Value::from(key.outcome));
    map.insert("message".to_string(), Value::from(key.message));
    let hash = Sha256::digest(jcs_serialize(&Value::Object(map)));
    format!("f1_{}", base32hex_lower_no_pad(&hash))
}

/// `sha256:<hex>` over the JCS form of `value`.
pub fn content_digest(value: &Value) -> String {
    let hash = Sha256::digest(jcs_serialize(value));
    let hex: String = hash.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("sha256:{hex}")
}

/// RFC 8785 canonical JSON. Numbers in reports are small integers, so
/// serde_json's integer formatting is already canonical.
pub fn jcs_serialize(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_canonical(value, &mut buf);
    buf
}

fn write_canonical(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            buf.extend_from_slice(value.to_string().as_bytes());
        }
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_canonical(item, buf);
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            buf.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(Value::from(key.as_str()).to_string().as_bytes());
                buf.push(b':');
                write_canonical(&map[key], buf);
            }
            buf.push(b'}');
        }
    }
}

/// RFC 4648 base32hex, lowercase, unpadded.
fn base32hex_lower_no_pad(data: &[u8]) -> String {
    const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut acc: u64 = 0;
    let mut bits: u32 = 0;
    for &byte in data {
        acc = (acc << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key<'a>(message: &'a str) -> FindingKey<'a> {
        FindingKey {
            kind: "naming",
            target: "README.md",
            rule: "naming.file-name",
            class: "rule_violation",
            outcome: "error",
            message,
        }
    }

    #[test]
    fn finding_id_is_deterministic_and_prefixed() {
        let a = compute_finding_id(key("bad"));
        let b = compute_finding_id(key("bad"));
        assert_eq!(a, b);
        assert!(a.starts_with("f1_"));
        // 256 bits in base32 is 52 characters.
        assert_eq!(a.len(), 3 + 52);
    }

    #[test]
    fn finding_id_changes_with_any_field() {
        assert_ne!(compute_finding_id(key("bad")), compute_finding_id(key("worse")));
    }

    #[test]
    fn jcs_sorts_keys_and_drops_whitespace() {
        let value = json!({"b": [1, {"d": null, "c": true}], "a": "x"});
        assert_eq!(
            String::from_utf8(jcs_serialize(&value)).expect("utf8"),
            r#"{"a":"x","b":[1,{"c":true,"d":null}]}"#
        );
    }

    #[test]
    fn base32hex_known_vectors() {
        // RFC 4648 §10 test vectors, lowercased, unpadded.
        assert_eq!(base32hex_lower_no_pad(b""), "");
        assert_eq!(base32hex_lower_no_pad(b"f"), "co");
        assert_eq!(base32hex_lower_no_pad(b"foobar"), "cpnmuoj1e8");
    }

    #[test]
    fn content_digest_ignores_key_order() {
        assert_eq!(
            content_digest(&json!({"a": 1, "b": 2})),
            content_digest(&json!({"b": 2, "a": 1}))
        );
    }
}
