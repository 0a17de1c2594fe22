//! # Adapters
//!
//! Implementations of the outbound ports.

pub mod storage;
pub mod time;

pub use storage::{block_location, FileStorage, FileStorageConfig, InMemoryStorage};
pub use time::ManualTimeSource;
