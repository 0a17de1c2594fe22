//! # Data Access (il-01)
//!
//! The append-only log and topic index of the ledger.
//!
//! ## Architecture
//!
//! ```text
//! persist_transaction(content, signer, topics)
//!     │  sign → Block::empty().push_transaction(tx, topics)
//!     ↓
//! StorageBackend::append(block json) ──→ location
//!     ↓
//! LocationByTopic += (block topics → location)
//!
//! get_transactions_by_topic(topic)
//!     │  LocationByTopic → locations
//!     ↓
//! StorageBackend::read(location)* → Block → positions under topic → transactions
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Self-indexing | Every transaction is indexed under its content hash |
//! | Immutability | Deriving a block never alters the source block |
//! | Index consistency | A topic lists a location iff that block indexes the topic |
//! | Write ordering | The index is updated only after the append succeeded |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Transaction, Block, LocationByTopic, errors, config
//! - `ports/` - `DataAccessApi` (inbound), `StorageBackend` + `TimeSource` (outbound)
//! - `adapters/` - in-memory and file storage, manual clock
//! - `service.rs` - `DataAccessService`
//!
//! ## Usage
//!
//! ```ignore
//! use il_01_data_access::{DataAccessApi, DataAccessService, InMemoryStorage};
//!
//! let service = DataAccessService::new(Arc::new(InMemoryStorage::new()));
//! service.initialize().await?;
//! service.persist_transaction(content, &signer, &topics).await?;
//! let found = service.get_transactions_by_topic(&topic).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{block_location, FileStorage, FileStorageConfig, InMemoryStorage, ManualTimeSource};
pub use domain::{
    Block, BlockHeader, ConfirmedTransaction, DataAccessConfig, DataAccessError, LocationByTopic,
    PersistResult, SigningError, StorageBackendError, TopicTransactions, Transaction,
    TransactionContent, CURRENT_VERSION,
};
pub use ports::{AppendResult, DataAccessApi, ReadResult, StorageBackend, SystemTimeSource, TimeSource};
pub use service::DataAccessService;
