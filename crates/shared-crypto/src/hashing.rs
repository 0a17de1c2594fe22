//! # Canonical Hashing
//!
//! Keccak-256 over a canonical JSON rendering of any serializable value.
//!
//! ## Canonical Form
//!
//! - Object keys sorted lexicographically, recursively
//! - Compact separators, no whitespace
//! - Array order preserved
//!
//! Two values that differ only in key order hash identically.

use serde::Serialize;
use serde_json::{Map, Value};
use sha3::{Digest, Keccak256};

use crate::CryptoError;

/// Keccak-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Recursively sort object keys of a JSON value.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, inner) in entries {
                sorted.insert(key, sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Render `value` as canonical JSON.
///
/// # Errors
///
/// Returns `CryptoError::Serialization` if the value cannot be represented
/// as JSON (for instance a map with non-string keys).
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CryptoError> {
    let json = serde_json::to_value(value).map_err(|e| CryptoError::Serialization(e.to_string()))?;
    serde_json::to_string(&sort_keys(json)).map_err(|e| CryptoError::Serialization(e.to_string()))
}

/// Keccak-256 of the canonical JSON of `value`.
pub fn canonical_keccak256<T: Serialize + ?Sized>(value: &T) -> Result<Hash, CryptoError> {
    Ok(keccak256(canonical_json(value)?.as_bytes()))
}

/// `0x`-prefixed hex of the Keccak-256 of the canonical JSON of `value`.
///
/// This is the string form used for content hashes and channel ids.
pub fn normalize_keccak256_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, CryptoError> {
    Ok(format!("0x{}", hex::encode(canonical_keccak256(value)?)))
}

/// Same as [`normalize_keccak256_hash`] for a value that is already JSON.
pub fn normalize_value_hash(value: &Value) -> String {
    let canonical = sort_keys(value.clone()).to_string();
    format!("0x{}", hex::encode(keccak256(canonical.as_bytes())))
}
