//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the data-access service.
//!
//! Production: `FileStorage` (`adapters/storage/file.rs`)
//! Testing: `InMemoryStorage` (`adapters/storage/memory.rs`)

use async_trait::async_trait;
use shared_types::{Location, StorageMeta, Timestamp};

use crate::domain::StorageBackendError;

/// Result of appending content to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendResult {
    pub location: Location,
    pub meta: StorageMeta,
}

/// Result of reading content back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub content: String,
    pub meta: StorageMeta,
}

/// Content-addressable append-only storage.
///
/// Any failure is fatal to the calling data-access operation; retries are
/// the backend's business.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `content` and return where it lives.
    async fn append(&self, content: String) -> Result<AppendResult, StorageBackendError>;

    /// Read the content stored at `location`.
    async fn read(&self, location: &str) -> Result<ReadResult, StorageBackendError>;

    /// Every known location, in append order.
    async fn get_all_locations(&self) -> Result<Vec<Location>, StorageBackendError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
