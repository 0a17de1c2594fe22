//! In-process key custody: secp256k1 private keys indexed by Ethereum address.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_crypto::{ecies, Secp256k1KeyPair};
use shared_types::{Identity, IdentityType};
use std::collections::HashMap;

use crate::domain::DecryptionError;
use crate::ports::DecryptionProvider;

#[derive(Default)]
pub struct EthereumPrivateKeyDecryptionProvider {
    keys: RwLock<HashMap<String, Secp256k1KeyPair>>,
}

impl EthereumPrivateKeyDecryptionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a private key and return the identity it answers for.
    pub fn add_decryption_parameters(&self, private_key: &str) -> Result<Identity, DecryptionError> {
        let keypair =
            Secp256k1KeyPair::from_hex(private_key).map_err(|_| DecryptionError::InvalidPrivateKey)?;
        let identity = Identity::ethereum_address(keypair.address());
        self.keys.write().insert(identity.value.clone(), keypair);

        tracing::info!(identity = %identity, "Decryption identity registered");
        Ok(identity)
    }

    /// Forget an identity. Returns whether it was registered.
    pub fn remove_registered_identity(&self, identity: &Identity) -> bool {
        self.keys.write().remove(&normalized(identity)).is_some()
    }

    pub fn get_all_registered_identities(&self) -> Vec<Identity> {
        let mut identities: Vec<_> = self
            .keys
            .read()
            .keys()
            .map(Identity::ethereum_address)
            .collect();
        identities.sort_by(|a, b| a.value.cmp(&b.value));
        identities
    }
}

fn normalized(identity: &Identity) -> String {
    match identity.identity_type {
        IdentityType::EthereumAddress => identity.value.to_lowercase(),
    }
}

#[async_trait]
impl DecryptionProvider for EthereumPrivateKeyDecryptionProvider {
    async fn decrypt(&self, data: &[u8], identity: &Identity) -> Result<Vec<u8>, DecryptionError> {
        let keys = self.keys.read();
        let keypair = keys
            .get(&normalized(identity))
            .ok_or_else(|| DecryptionError::IdentityNotRegistered(identity.value.clone()))?;
        ecies::decrypt(keypair, data).map_err(|e| DecryptionError::Crypto(e.to_string()))
    }

    async fn is_identity_registered(&self, identity: &Identity) -> bool {
        self.keys.read().contains_key(&normalized(identity))
    }
}
