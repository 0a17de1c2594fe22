//! # Core Value Types
//!
//! ## Clusters
//!
//! - **Signatures**: `SignatureMethod`, `Signature`, `SignatureParameters`
//! - **Identities & Encryption**: `Identity`, `EncryptionParameters`, `ChannelKey`, `ChannelType`
//! - **Storage**: `Location`, `StorageMeta`

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::TypeError;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// Opaque identifier returned by the storage backend for a persisted block.
pub type Location = String;

/// Method tag written on the first transaction of an encrypted channel.
///
/// The part before the dash wraps the channel key for each recipient, the
/// part after it encrypts the transaction payloads.
pub const CHANNEL_ENCRYPTION_METHOD: &str = "ecies-aes256-gcm";

// =============================================================================
// CLUSTER A: SIGNATURES
// =============================================================================

/// Supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMethod {
    /// secp256k1 ECDSA over the Keccak-256 of the signed content.
    Ecdsa,
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureMethod::Ecdsa => write!(f, "ecdsa"),
        }
    }
}

/// A signature as persisted next to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Scheme used to produce `value`.
    pub method: SignatureMethod,
    /// `0x`-prefixed hex encoding of the signature bytes.
    pub value: String,
}

impl Signature {
    pub fn new(method: SignatureMethod, value: impl Into<String>) -> Self {
        Self {
            method,
            value: value.into(),
        }
    }
}

/// Signing material handed to the ledger when persisting a transaction.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParameters {
    /// Scheme to sign with.
    #[zeroize(skip)]
    pub method: SignatureMethod,
    /// `0x`-prefixed (or bare) hex encoding of the 32-byte private key.
    pub private_key: String,
}

impl SignatureParameters {
    pub fn ecdsa(private_key: impl Into<String>) -> Self {
        Self {
            method: SignatureMethod::Ecdsa,
            private_key: private_key.into(),
        }
    }
}

impl fmt::Debug for SignatureParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureParameters")
            .field("method", &self.method)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// CLUSTER B: IDENTITIES & ENCRYPTION
// =============================================================================

/// Kinds of identities a channel key can be wrapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityType {
    /// Ethereum-style address derived from a secp256k1 public key.
    EthereumAddress,
}

/// A stakeholder identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    /// Lower-case, `0x`-prefixed address.
    pub value: String,
}

impl Identity {
    /// Build an Ethereum address identity, normalizing its case.
    pub fn ethereum_address(value: impl AsRef<str>) -> Self {
        Self {
            identity_type: IdentityType::EthereumAddress,
            value: value.as_ref().to_lowercase(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Key-wrapping schemes for recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionMethod {
    /// ECIES over secp256k1.
    Ecies,
}

/// Public material used to wrap a channel key for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParameters {
    pub method: EncryptionMethod,
    /// Hex encoding of the recipient's SEC1 public key (compressed or not).
    pub key: String,
}

impl EncryptionParameters {
    pub fn ecies(public_key: impl Into<String>) -> Self {
        Self {
            method: EncryptionMethod::Ecies,
            key: public_key.into(),
        }
    }
}

/// Symmetric schemes a channel key can be used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKeyMethod {
    #[serde(rename = "aes256-gcm")]
    Aes256Gcm,
}

/// Decryption parameters of an encrypted channel.
///
/// Derived once from the first transaction of the channel and carried
/// forward to decode every later transaction.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChannelKey {
    #[zeroize(skip)]
    method: ChannelKeyMethod,
    key: [u8; 32],
}

impl ChannelKey {
    /// Length in bytes of an AES-256 key.
    pub const LENGTH: usize = 32;

    pub fn new(method: ChannelKeyMethod, key: [u8; 32]) -> Self {
        Self { method, key }
    }

    /// Build a key from an unwrapped byte slice.
    pub fn from_slice(method: ChannelKeyMethod, bytes: &[u8]) -> Result<Self, TypeError> {
        let key: [u8; 32] = bytes.try_into().map_err(|_| TypeError::InvalidKeyLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })?;
        Ok(Self { method, key })
    }

    pub fn method(&self) -> ChannelKeyMethod {
        self.method
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl fmt::Debug for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelKey")
            .field("method", &self.method)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// What is known about a channel's encryption while replaying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// No valid first transaction seen yet.
    #[default]
    Unknown,
    Clear,
    Encrypted,
}

// =============================================================================
// CLUSTER C: STORAGE
// =============================================================================

/// Kind of backend a block was read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    InMemory,
    File,
}

/// Metadata returned by the storage backend alongside a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageMeta {
    pub storage_type: StorageType,
    /// Size in bytes of the stored content.
    pub size: usize,
    /// Time the content was appended.
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_serializes_with_lowercase_method() {
        let signature = Signature::new(SignatureMethod::Ecdsa, "0x12345");
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, r#"{"method":"ecdsa","value":"0x12345"}"#);
    }

    #[test]
    fn test_signature_parameters_debug_is_redacted() {
        let params = SignatureParameters::ecdsa("0xdeadbeef");
        let printed = format!("{:?}", params);
        assert!(!printed.contains("deadbeef"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_identity_is_lowercased() {
        let identity = Identity::ethereum_address("0xAbCdEf");
        assert_eq!(identity.value, "0xabcdef");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, r#"{"type":"ethereumAddress","value":"0xabcdef"}"#);
    }

    #[test]
    fn test_channel_key_rejects_wrong_length() {
        let result = ChannelKey::from_slice(ChannelKeyMethod::Aes256Gcm, &[0u8; 16]);
        assert_eq!(
            result.unwrap_err(),
            TypeError::InvalidKeyLength {
                expected: 32,
                actual: 16
            }
        );
    }

    #[test]
    fn test_channel_key_debug_is_redacted() {
        let key = ChannelKey::new(ChannelKeyMethod::Aes256Gcm, [0xAB; 32]);
        assert!(!format!("{:?}", key).contains("171"));
    }

    #[test]
    fn test_channel_type_defaults_to_unknown() {
        assert_eq!(ChannelType::default(), ChannelType::Unknown);
    }

    #[test]
    fn test_storage_meta_camel_case() {
        let meta = StorageMeta {
            storage_type: StorageType::InMemory,
            size: 10,
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"storageType":"in-memory","size":10,"timestamp":1700000000}"#
        );
    }
}
