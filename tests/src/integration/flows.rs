//! # Integration Test Flows
//!
//! Channels written through the transaction manager, persisted on disk, and
//! replayed after a restart.
//!
//! ## Flows Tested
//!
//! 1. **Restart**: the topic index is rebuilt from `FileStorage` and encrypted
//!    channels decrypt again with the recipient key
//! 2. **Recipient isolation**: a node holding another key sees the channel as
//!    unknown and cannot append to it
//! 3. **Corruption**: a tampered block surfaces as `CorruptedStorage`

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use il_01_data_access::{
        DataAccessApi, DataAccessError, DataAccessService, FileStorage, FileStorageConfig,
        ManualTimeSource,
    };
    use il_02_transaction_manager::{
        DecryptionProvider, EthereumPrivateKeyDecryptionProvider, TransactionManager,
        TransactionManagerApi, TransactionManagerError,
    };
    use serde_json::json;
    use shared_crypto::{normalize_value_hash, Secp256k1KeyPair};
    use shared_types::{ChannelType, EncryptionParameters, SignatureParameters};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const PAYEE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const PAYER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const OUTSIDER_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

    type FileManager = TransactionManager<DataAccessService<FileStorage>>;

    async fn open_node(dir: &Path, identity_key: Option<&str>) -> FileManager {
        let storage = FileStorage::open_with_time_source(
            FileStorageConfig::new(dir),
            Arc::new(ManualTimeSource::new(1_650_000_000)),
        )
        .await
        .unwrap();
        let data_access = Arc::new(DataAccessService::new(Arc::new(storage)));
        data_access.initialize().await.unwrap();

        let provider = identity_key.map(|key| {
            let provider = EthereumPrivateKeyDecryptionProvider::new();
            provider.add_decryption_parameters(key).unwrap();
            Arc::new(provider) as Arc<dyn DecryptionProvider>
        });
        TransactionManager::new(data_access, provider)
    }

    fn stakeholders() -> Vec<EncryptionParameters> {
        [PAYEE_KEY, PAYER_KEY]
            .iter()
            .map(|key| {
                EncryptionParameters::ecies(Secp256k1KeyPair::from_hex(key).unwrap().public_key_hex())
            })
            .collect()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_encrypted_channel_survives_restart() {
        ledger_telemetry::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let create = json!({"action": "create", "amount": "1000", "currency": "EUR"});
        let channel_id = normalize_value_hash(&create);

        {
            let payee = open_node(dir.path(), Some(PAYEE_KEY)).await;
            payee
                .persist_transaction(
                    create.clone(),
                    &channel_id,
                    &["0xpayee".to_string()],
                    &stakeholders(),
                    &SignatureParameters::ecdsa(PAYEE_KEY),
                )
                .await
                .unwrap();
        }

        // Payer restarts on the same storage and appends
        let payer = open_node(dir.path(), Some(PAYER_KEY)).await;
        payer
            .persist_transaction(
                json!({"action": "accept"}),
                &channel_id,
                &[],
                &[],
                &SignatureParameters::ecdsa(PAYER_KEY),
            )
            .await
            .unwrap();

        let found = payer.get_transactions_by_channel_id(&channel_id).await.unwrap();
        assert_eq!(found.channel.channel_type, ChannelType::Encrypted);
        assert_eq!(found.channel.encryption_method.as_deref(), Some("ecies-aes256-gcm"));
        let actions: Vec<_> = found
            .channel
            .valid()
            .map(|t| t.data["action"].clone())
            .collect();
        assert_eq!(actions, vec![json!("create"), json!("accept")]);
        assert!(found.storage_metas.iter().all(|m| m.timestamp == 1_650_000_000));

        // Extra topic resolves to the first block only
        let by_topic = payer
            .data_access()
            .get_transactions_by_topic("0xpayee")
            .await
            .unwrap();
        assert_eq!(by_topic.locations, found.locations[..1].to_vec());
    }

    #[tokio::test]
    async fn test_outsider_cannot_read_or_append() {
        ledger_telemetry::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let create = json!({"action": "create", "amount": "42"});
        let channel_id = normalize_value_hash(&create);

        {
            let payee = open_node(dir.path(), Some(PAYEE_KEY)).await;
            payee
                .persist_transaction(
                    create,
                    &channel_id,
                    &[],
                    &stakeholders(),
                    &SignatureParameters::ecdsa(PAYEE_KEY),
                )
                .await
                .unwrap();
        }

        let outsider = open_node(dir.path(), Some(OUTSIDER_KEY)).await;
        let found = outsider.get_transactions_by_channel_id(&channel_id).await.unwrap();
        assert_eq!(found.channel.channel_type, ChannelType::Unknown);
        assert_eq!(found.channel.valid().count(), 0);
        assert_eq!(found.channel.ignored().count(), 1);

        let err = outsider
            .persist_transaction(
                json!({"action": "cancel"}),
                &channel_id,
                &[],
                &[],
                &SignatureParameters::ecdsa(OUTSIDER_KEY),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransactionManagerError::ChannelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_tampered_block_reported_as_corrupted() {
        ledger_telemetry::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let create = json!({"action": "create"});
        let channel_id = normalize_value_hash(&create);

        let node = open_node(dir.path(), None).await;
        let persisted = node
            .persist_transaction(
                create,
                &channel_id,
                &[],
                &[],
                &SignatureParameters::ecdsa(PAYEE_KEY),
            )
            .await
            .unwrap();

        let block_path = dir.path().join(format!("{}.json", persisted.location));
        tokio::fs::write(&block_path, b"{\"header\":{}}").await.unwrap();

        let err = node
            .get_transactions_by_channel_id(&channel_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionManagerError::DataAccess(DataAccessError::CorruptedStorage { .. })
        ));
    }
}
