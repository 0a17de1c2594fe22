//! # Shared Crypto - Ledger Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256 over canonical JSON | Content hashes, channel ids |
//! | `ecdsa` | secp256k1 | Transaction signing, signer recovery |
//! | `symmetric` | AES-256-GCM | Channel payload encryption |
//! | `ecies` | secp256k1 ECDH + SHA-256 + AES-256-GCM | Channel key wrapping |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization (EIP-2)
//! - **AES-256-GCM**: random 96-bit nonce per message, authenticated
//! - **ECIES**: fresh ephemeral key per recipient, key material zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod ecies;
pub mod errors;
pub mod hashing;
pub mod symmetric;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{canonical_json, keccak256, normalize_keccak256_hash, normalize_value_hash};
pub use symmetric::SecretKey;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
