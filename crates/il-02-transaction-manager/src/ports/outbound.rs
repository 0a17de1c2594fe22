//! # Outbound Ports (Driven Ports)
//!
//! Key custody the transaction parser depends on. The data-access API is
//! the other driven port; it comes from `il-01-data-access`.

use async_trait::async_trait;
use shared_types::Identity;

use crate::domain::DecryptionError;

/// Holder of the private keys able to unwrap channel keys.
///
/// Production: `EthereumPrivateKeyDecryptionProvider`
/// (`adapters/decryption_provider.rs`).
#[async_trait]
pub trait DecryptionProvider: Send + Sync {
    /// Unwrap `data` (ECIES) with the key of `identity`.
    async fn decrypt(&self, data: &[u8], identity: &Identity) -> Result<Vec<u8>, DecryptionError>;

    /// Whether this provider holds the key of `identity`.
    async fn is_identity_registered(&self, identity: &Identity) -> bool;
}
