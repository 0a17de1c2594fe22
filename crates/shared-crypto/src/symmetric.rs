//! # Symmetric Encryption
//!
//! AES-256-GCM encryption of channel payloads.
//!
//! ## Wire Format
//!
//! `nonce (12 bytes) || ciphertext+tag`
//!
//! A fresh random nonce is drawn for every message.

use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroize;

/// AES-GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(key))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Encrypt plaintext with AES-256-GCM.
///
/// Returns `nonce || ciphertext`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_LENGTH];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt `nonce || ciphertext` with AES-256-GCM.
///
/// # Errors
///
/// Returns `CryptoError::CiphertextTooShort` when the nonce is truncated and
/// `CryptoError::DecryptionFailed` if authentication fails.
pub fn decrypt(key: &SecretKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < NONCE_LENGTH {
        return Err(CryptoError::CiphertextTooShort {
            minimum: NONCE_LENGTH,
            actual: data.len(),
        });
    }
    let (nonce, ciphertext) = data.split_at(NONCE_LENGTH);
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
