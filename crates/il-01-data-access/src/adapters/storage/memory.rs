use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Location, StorageMeta, StorageType};
use std::collections::HashMap;
use std::sync::Arc;

use super::block_location;
use crate::domain::StorageBackendError;
use crate::ports::{AppendResult, ReadResult, StorageBackend, SystemTimeSource, TimeSource};

#[derive(Default)]
struct Entries {
    content: HashMap<Location, (String, StorageMeta)>,
    order: Vec<Location>,
}

/// In-memory storage backend for unit tests and ephemeral nodes.
///
/// Append-ordered. Every append is a new entry, even for content that is
/// already stored.
pub struct InMemoryStorage {
    entries: RwLock<Entries>,
    time: Arc<dyn TimeSource>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            time,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn append(&self, content: String) -> Result<AppendResult, StorageBackendError> {
        let mut entries = self.entries.write();
        let location = block_location(entries.order.len() as u64, &content);

        let meta = StorageMeta {
            storage_type: StorageType::InMemory,
            size: content.len(),
            timestamp: self.time.now(),
        };
        entries
            .content
            .insert(location.clone(), (content, meta.clone()));
        entries.order.push(location.clone());

        Ok(AppendResult { location, meta })
    }

    async fn read(&self, location: &str) -> Result<ReadResult, StorageBackendError> {
        let entries = self.entries.read();
        let (content, meta) =
            entries
                .content
                .get(location)
                .ok_or_else(|| StorageBackendError::NotFound {
                    location: location.to_string(),
                })?;

        Ok(ReadResult {
            content: content.clone(),
            meta: meta.clone(),
        })
    }

    async fn get_all_locations(&self) -> Result<Vec<Location>, StorageBackendError> {
        Ok(self.entries.read().order.clone())
    }
}
