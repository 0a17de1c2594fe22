//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Ciphertext shorter than its fixed-size prefix
    #[error("Ciphertext too short: expected at least {minimum} bytes, got {actual}")]
    CiphertextTooShort {
        /// Minimum length in bytes
        minimum: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Invalid hex encoding
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid recovery id byte
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Public key recovery failed
    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Value could not be turned into canonical JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Decode a hex string, accepting an optional `0x` prefix.
pub(crate) fn decode_hex(input: &str) -> Result<Vec<u8>, CryptoError> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(trimmed).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}
