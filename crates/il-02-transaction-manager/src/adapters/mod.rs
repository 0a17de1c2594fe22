//! # Adapters
//!
//! Implementations of the outbound ports.

pub mod decryption_provider;

pub use decryption_provider::EthereumPrivateKeyDecryptionProvider;
