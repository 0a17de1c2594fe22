//! # Data Access Service
//!
//! Application service implementing [`DataAccessApi`] over any
//! [`StorageBackend`].
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized ──initialize()──→ Initializing ──ok──→ Ready(LocationByTopic)
//!       ↑                              │
//!       └──────────── error ───────────┘
//! ```
//!
//! Only `Ready` serves reads and writes. The index lock is never held across
//! an `.await`; a persisted block is indexed only after its append succeeded.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use parking_lot::RwLock;
use shared_types::{Location, SignatureParameters, StorageMeta};
use std::sync::Arc;

use crate::domain::{
    Block, DataAccessConfig, DataAccessError, LocationByTopic, PersistResult, TopicTransactions,
    Transaction, TransactionContent,
};
use crate::ports::{DataAccessApi, StorageBackend};

enum ServiceState {
    Uninitialized,
    Initializing,
    Ready(LocationByTopic),
}

/// A block read back from storage, checked for well-formedness.
struct LoadedBlock {
    location: Location,
    block: Block,
    meta: StorageMeta,
}

/// Data-access service.
///
/// One instance owns one topic index. Several instances over the same
/// storage are not coordinated; each rebuilds its own index at startup.
pub struct DataAccessService<S: StorageBackend> {
    storage: Arc<S>,
    config: DataAccessConfig,
    state: RwLock<ServiceState>,
}

impl<S: StorageBackend> DataAccessService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_config(storage, DataAccessConfig::default())
    }

    pub fn with_config(storage: Arc<S>, config: DataAccessConfig) -> Self {
        Self {
            storage,
            config: config.normalized(),
            state: RwLock::new(ServiceState::Uninitialized),
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn is_initialized(&self) -> bool {
        matches!(*self.state.read(), ServiceState::Ready(_))
    }

    async fn read_block(&self, location: Location) -> Result<LoadedBlock, DataAccessError> {
        let read = self.storage.read(&location).await?;

        let parsed = Block::from_json(&read.content)
            .map_err(|e| e.to_string())
            .and_then(|block| block.validate().map(|()| block));

        match parsed {
            Ok(block) => Ok(LoadedBlock {
                location,
                block,
                meta: read.meta,
            }),
            Err(reason) => {
                tracing::error!(location = %location, reason = %reason, "Corrupted block");
                Err(DataAccessError::corrupted(location, reason))
            }
        }
    }

    /// Read `locations` with bounded concurrency, keeping their order.
    async fn read_blocks(&self, locations: Vec<Location>) -> Result<Vec<LoadedBlock>, DataAccessError> {
        stream::iter(locations)
            .map(|location| self.read_block(location))
            .buffered(self.config.read_concurrency)
            .try_collect()
            .await
    }

    async fn build_index(&self) -> Result<LocationByTopic, DataAccessError> {
        let locations = self.storage.get_all_locations().await?;
        let blocks = self.read_blocks(locations).await?;

        let mut index = LocationByTopic::new();
        for loaded in &blocks {
            index.push_location_indexed_with_block_topics(&loaded.location, loaded.block.topics());
        }
        tracing::info!(
            blocks = blocks.len(),
            topics = index.topic_count(),
            "Topic index rebuilt from storage"
        );
        Ok(index)
    }

    fn locations_for_topic(&self, topic: &str) -> Result<Vec<Location>, DataAccessError> {
        match &*self.state.read() {
            ServiceState::Ready(index) => Ok(index.get_locations_from_topic(topic)),
            _ => Err(DataAccessError::NotInitialized),
        }
    }

    fn ensure_ready(&self) -> Result<(), DataAccessError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(DataAccessError::NotInitialized)
        }
    }
}

#[async_trait]
impl<S: StorageBackend + 'static> DataAccessApi for DataAccessService<S> {
    async fn initialize(&self) -> Result<(), DataAccessError> {
        {
            let mut state = self.state.write();
            match *state {
                ServiceState::Uninitialized => *state = ServiceState::Initializing,
                _ => return Err(DataAccessError::AlreadyInitialized),
            }
        }

        tracing::info!("Initializing data access");
        match self.build_index().await {
            Ok(index) => {
                *self.state.write() = ServiceState::Ready(index);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Data access initialization failed");
                *self.state.write() = ServiceState::Uninitialized;
                Err(e)
            }
        }
    }

    async fn persist_transaction(
        &self,
        content: TransactionContent,
        signature_params: &SignatureParameters,
        topics: &[String],
    ) -> Result<PersistResult, DataAccessError> {
        self.ensure_ready()?;

        let transaction = Transaction::create(content, signature_params)?;
        let block = Block::empty()
            .push_transaction(transaction, topics)
            .map_err(|e| DataAccessError::Serialization(e.to_string()))?;
        let serialized = block
            .to_json()
            .map_err(|e| DataAccessError::Serialization(e.to_string()))?;

        let appended = self.storage.append(serialized).await?;

        match &mut *self.state.write() {
            ServiceState::Ready(index) => {
                index.push_location_indexed_with_block_topics(&appended.location, block.topics())
            }
            _ => return Err(DataAccessError::NotInitialized),
        }

        tracing::info!(
            location = %appended.location,
            topics = block.header.index.len(),
            "Transaction persisted"
        );

        Ok(PersistResult {
            location: appended.location,
            storage_meta: appended.meta,
            topics: block.topics().cloned().collect(),
        })
    }

    async fn get_transactions_by_topic(
        &self,
        topic: &str,
    ) -> Result<TopicTransactions, DataAccessError> {
        let locations = self.locations_for_topic(topic)?;
        let blocks = self.read_blocks(locations).await?;

        let mut result = TopicTransactions::default();
        for loaded in &blocks {
            let positions = loaded.block.positions_for_topic(topic);
            for transaction in loaded.block.transactions_by_positions(positions) {
                result.push(transaction, &loaded.location, &loaded.meta);
            }
        }

        tracing::debug!(
            topic = %topic,
            blocks = blocks.len(),
            transactions = result.len(),
            "Transactions retrieved by topic"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStorage, ManualTimeSource};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn params() -> SignatureParameters {
        SignatureParameters::ecdsa(PRIVATE_KEY)
    }

    fn topics(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    fn storage() -> Arc<InMemoryStorage> {
        Arc::new(InMemoryStorage::with_time_source(Arc::new(
            ManualTimeSource::new(1_000),
        )))
    }

    /// Formatted log output shared with the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    async fn ready_service() -> DataAccessService<InMemoryStorage> {
        let service = DataAccessService::new(storage());
        service.initialize().await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_operations_require_initialization() {
        let service = DataAccessService::new(storage());

        let persist = service
            .persist_transaction(TransactionContent::clear(json!({})), &params(), &[])
            .await;
        assert_eq!(persist.unwrap_err(), DataAccessError::NotInitialized);

        let read = service.get_transactions_by_topic("0xaaaa").await;
        assert_eq!(read.unwrap_err(), DataAccessError::NotInitialized);
    }

    #[tokio::test]
    async fn test_initialize_twice_fails() {
        let service = ready_service().await;
        assert_eq!(
            service.initialize().await.unwrap_err(),
            DataAccessError::AlreadyInitialized
        );
        assert!(service.is_initialized());
    }

    #[tokio::test]
    async fn test_persist_then_get_by_topic() {
        let service = ready_service().await;

        let persisted = service
            .persist_transaction(
                TransactionContent::clear(json!({"invoice": 1})),
                &params(),
                &topics(&["0xaaaa", "0xcccc"]),
            )
            .await
            .unwrap();

        assert_eq!(persisted.storage_meta.timestamp, 1_000);
        assert_eq!(persisted.topics.len(), 3);

        let found = service.get_transactions_by_topic("0xaaaa").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.locations, vec![persisted.location.clone()]);
        assert_eq!(found.storage_metas, vec![persisted.storage_meta.clone()]);
        assert_eq!(found.transactions[0].content.data, Some(json!({"invoice": 1})));
    }

    #[tokio::test]
    async fn test_transaction_retrievable_by_its_content_hash() {
        let service = ready_service().await;
        service
            .persist_transaction(TransactionContent::clear(json!({"x": 1})), &params(), &[])
            .await
            .unwrap();

        let all = service.get_transactions_by_topic("0xnothing").await.unwrap();
        assert!(all.is_empty());

        let content_hash = Transaction::create(TransactionContent::clear(json!({"x": 1})), &params())
            .unwrap()
            .content_hash()
            .unwrap();
        let found = service.get_transactions_by_topic(&content_hash).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_identical_persists_write_separate_blocks() {
        let storage = storage();
        let service = DataAccessService::new(Arc::clone(&storage));
        service.initialize().await.unwrap();

        let mut locations = Vec::new();
        for _ in 0..2 {
            let persisted = service
                .persist_transaction(
                    TransactionContent::clear(json!({"increase": 10})),
                    &params(),
                    &topics(&["0xchannel"]),
                )
                .await
                .unwrap();
            locations.push(persisted.location);
        }

        assert_ne!(locations[0], locations[1]);
        assert_eq!(storage.len(), 2);
        let found = service.get_transactions_by_topic("0xchannel").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.locations, locations);
    }

    #[tokio::test]
    async fn test_get_by_topic_concatenates_blocks_in_location_order() {
        let service = ready_service().await;
        for i in 0..5 {
            service
                .persist_transaction(
                    TransactionContent::clear(json!({"seq": i})),
                    &params(),
                    &topics(&["0xchannel"]),
                )
                .await
                .unwrap();
        }

        let found = service.get_transactions_by_topic("0xchannel").await.unwrap();
        let seqs: Vec<_> = found
            .transactions
            .iter()
            .map(|tx| tx.content.data.clone().unwrap()["seq"].clone())
            .collect();
        assert_eq!(seqs, (0..5).map(|i| json!(i)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_index_rebuilt_on_initialize() {
        let storage = storage();
        let first = DataAccessService::new(Arc::clone(&storage));
        first.initialize().await.unwrap();
        first
            .persist_transaction(
                TransactionContent::clear(json!({"a": 1})),
                &params(),
                &topics(&["0xaaaa"]),
            )
            .await
            .unwrap();

        let restarted = DataAccessService::new(storage);
        restarted.initialize().await.unwrap();

        let found = restarted.get_transactions_by_topic("0xaaaa").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_index_matches_stored_block_topics() {
        let storage = storage();
        let service = DataAccessService::new(Arc::clone(&storage));
        service.initialize().await.unwrap();

        let topic_sets = [
            topics(&["0xaaaa"]),
            topics(&["0xaaaa", "0xbbbb"]),
            topics(&["0xcccc"]),
        ];
        for (i, set) in topic_sets.iter().enumerate() {
            service
                .persist_transaction(TransactionContent::clear(json!({"i": i})), &params(), set)
                .await
                .unwrap();
        }

        for topic in ["0xaaaa", "0xbbbb", "0xcccc"] {
            let mut expected = BTreeSet::new();
            for location in storage.get_all_locations().await.unwrap() {
                let content = storage.read(&location).await.unwrap().content;
                let block = Block::from_json(&content).unwrap();
                if block.header.index.contains_key(topic) {
                    expected.insert(location);
                }
            }
            let indexed: BTreeSet<_> = service
                .locations_for_topic(topic)
                .unwrap()
                .into_iter()
                .collect();
            assert_eq!(indexed, expected, "topic {topic}");
        }
    }

    #[tokio::test]
    async fn test_corrupted_block_fails_initialize_and_rolls_back() {
        let storage = storage();
        storage.append("not a block".to_string()).await.unwrap();

        let service = DataAccessService::new(Arc::clone(&storage));
        let err = service.initialize().await.unwrap_err();
        assert!(matches!(err, DataAccessError::CorruptedStorage { .. }));
        assert!(!service.is_initialized());

        // Rolled back: a retry is attempted rather than rejected as a double init
        assert!(matches!(
            service.initialize().await.unwrap_err(),
            DataAccessError::CorruptedStorage { .. }
        ));
    }

    #[tokio::test]
    async fn test_block_missing_topics_is_corrupted() {
        let storage = storage();
        storage
            .append(r#"{"header":{"version":"0.1.0"},"transactions":[]}"#.to_string())
            .await
            .unwrap();

        let service = DataAccessService::new(storage);
        assert!(matches!(
            service.initialize().await,
            Err(DataAccessError::CorruptedStorage { .. })
        ));
    }

    #[tokio::test]
    async fn test_unparsable_and_invalid_blocks_are_both_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let unparsable = "not a block";
        let invalid = r#"{"header":{"version":"","index":{}},"transactions":[]}"#;
        for content in [unparsable, invalid] {
            let storage = storage();
            let location = storage.append(content.to_string()).await.unwrap().location;

            let service = DataAccessService::new(storage);
            assert!(matches!(
                service.initialize().await,
                Err(DataAccessError::CorruptedStorage { .. })
            ));

            let output = logs.contents();
            assert!(output.contains("Corrupted block"));
            assert!(output.contains(&format!("location={location}")), "{content}");
        }
    }

    #[tokio::test]
    async fn test_invalid_signing_key_is_reported() {
        let service = ready_service().await;
        let result = service
            .persist_transaction(
                TransactionContent::clear(json!({})),
                &SignatureParameters::ecdsa("0x00"),
                &[],
            )
            .await;
        assert!(matches!(result, Err(DataAccessError::Signing(_))));
    }

    #[tokio::test]
    async fn test_confirmed_transactions_carry_storage_timestamp() {
        let clock = Arc::new(ManualTimeSource::new(10));
        let storage = Arc::new(InMemoryStorage::with_time_source(clock.clone()));
        let service = DataAccessService::new(storage);
        service.initialize().await.unwrap();

        for ts in [10, 20] {
            clock.set(ts);
            service
                .persist_transaction(
                    TransactionContent::clear(json!({"ts": ts})),
                    &params(),
                    &topics(&["0xt"]),
                )
                .await
                .unwrap();
        }

        let confirmed = service
            .get_transactions_by_topic("0xt")
            .await
            .unwrap()
            .confirmed_transactions();
        let timestamps: Vec<_> = confirmed.iter().map(|c| c.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20]);
    }
}
