//! # ECIES Key Wrapping (secp256k1)
//!
//! Wraps a short secret (a channel key) for one recipient public key.
//!
//! ## Construction
//!
//! 1. Fresh ephemeral secp256k1 key per wrap
//! 2. ECDH with the recipient key, shared x-coordinate
//! 3. `key = SHA-256(ephemeral_pub_compressed || shared_x)`
//! 4. AES-256-GCM (see `symmetric`)
//!
//! ## Wire Format
//!
//! `ephemeral_pub (33 bytes, compressed) || nonce (12 bytes) || ciphertext+tag`

use crate::ecdsa::Secp256k1KeyPair;
use crate::errors::decode_hex;
use crate::symmetric::{self, SecretKey};
use crate::CryptoError;
use k256::ecdh::{diffie_hellman, EphemeralSecret};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use sha2::{Digest, Sha256};

/// Compressed SEC1 point length.
pub const EPHEMERAL_KEY_LENGTH: usize = 33;

/// Wrap `plaintext` for the holder of `recipient_public_key` (hex SEC1).
///
/// # Errors
///
/// Returns `CryptoError::InvalidPublicKey` if the key does not decode to a
/// curve point.
pub fn encrypt(recipient_public_key: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let recipient = parse_public_key(recipient_public_key)?;

    let ephemeral = EphemeralSecret::random(&mut rand::thread_rng());
    let ephemeral_public = ephemeral.public_key().to_encoded_point(true);
    let shared = ephemeral.diffie_hellman(&recipient);

    let key = derive_key(ephemeral_public.as_bytes(), shared.raw_secret_bytes());
    let sealed = symmetric::encrypt(&key, plaintext)?;

    let mut out = Vec::with_capacity(EPHEMERAL_KEY_LENGTH + sealed.len());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Unwrap data produced by [`encrypt`] with the recipient's keypair.
///
/// # Errors
///
/// Returns `CryptoError::CiphertextTooShort`, `CryptoError::InvalidPublicKey`
/// or `CryptoError::DecryptionFailed` on malformed or foreign input.
pub fn decrypt(keypair: &Secp256k1KeyPair, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < EPHEMERAL_KEY_LENGTH {
        return Err(CryptoError::CiphertextTooShort {
            minimum: EPHEMERAL_KEY_LENGTH,
            actual: data.len(),
        });
    }
    let (ephemeral_bytes, sealed) = data.split_at(EPHEMERAL_KEY_LENGTH);
    let ephemeral =
        PublicKey::from_sec1_bytes(ephemeral_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

    let shared = diffie_hellman(
        keypair.signing_key().as_nonzero_scalar(),
        ephemeral.as_affine(),
    );

    let key = derive_key(ephemeral_bytes, shared.raw_secret_bytes());
    symmetric::decrypt(&key, sealed)
}

fn parse_public_key(input: &str) -> Result<PublicKey, CryptoError> {
    let bytes = decode_hex(input).map_err(|_| CryptoError::InvalidPublicKey)?;
    PublicKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

fn derive_key(ephemeral_public: &[u8], shared_x: &[u8]) -> SecretKey {
    let mut hasher = Sha256::new();
    hasher.update(ephemeral_public);
    hasher.update(shared_x);
    SecretKey::from_bytes(hasher.finalize().into())
}
