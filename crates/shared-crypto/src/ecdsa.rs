//! # ECDSA Signatures (secp256k1)
//!
//! Ethereum-style recoverable signatures over a 32-byte prehash.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2)
//! - Signature encoding `r || s || v` with `v = recovery id + 27`
//!
//! ## Use Cases
//!
//! - Transaction signing
//! - Signer recovery (address = last 20 bytes of Keccak-256 of the public key)

use crate::errors::decode_hex;
use crate::hashing::{keccak256, Hash};
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

/// Length of an encoded recoverable signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Recoverable ECDSA signature (65 bytes, `r || s || v`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1Signature([u8; SIGNATURE_LENGTH]);

impl Secp256k1Signature {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) hex encoding.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex(input)?;
        let bytes: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// `0x`-prefixed hex encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Recover the signer address from a prehash.
    pub fn recover_address(&self, message_hash: &Hash) -> Result<String, CryptoError> {
        let recovery_id = parse_recovery_id(self.0[64])?;
        let sig =
            Signature::from_slice(&self.0[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;

        let recovered = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
            .map_err(|_| CryptoError::RecoveryFailed)?;

        Ok(address_from_verifying_key(&recovered))
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a `0x`-prefixed (or bare) hex secret key.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex(input).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    /// Compressed SEC1 public key, hex encoded (no prefix).
    pub fn public_key_hex(&self) -> String {
        let point = self.signing_key.verifying_key().to_encoded_point(true);
        hex::encode(point.as_bytes())
    }

    /// Ethereum address of this key.
    pub fn address(&self) -> String {
        address_from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash (deterministic RFC 6979).
    pub fn sign_prehash(&self, message_hash: &Hash) -> Result<Secp256k1Signature, CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(message_hash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = recid.to_byte() + 27;
        Ok(Secp256k1Signature(bytes))
    }

    /// Access the underlying signing key (for key agreement).
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// `0x` + hex of the last 20 bytes of Keccak-256 over the uncompressed key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Ethereum address of a hex SEC1 public key (compressed or not).
pub fn address_from_public_key_hex(public_key: &str) -> Result<String, CryptoError> {
    let bytes = decode_hex(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let key = VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
    Ok(address_from_verifying_key(&key))
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };

    RecoveryId::from_byte(id).ok_or(CryptoError::InvalidRecoveryId(v))
}
