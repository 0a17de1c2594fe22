//! # Domain Errors
//!
//! Error types for the data-access layer.
//!
//! ## Design Principles
//!
//! - Storage and initialization failures are fatal to the calling operation
//! - Errors carry the location or reason needed to act on them
//! - No panics in domain logic (use Result instead)

use shared_types::Location;
use thiserror::Error;

/// Failures reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageBackendError {
    /// Nothing is stored at this location.
    #[error("No content stored at location {location}")]
    NotFound { location: Location },

    /// Location is not a well-formed identifier for this backend.
    #[error("Invalid location: {location}")]
    InvalidLocation { location: Location },

    /// Underlying I/O failure.
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// Backend bookkeeping is inconsistent.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StorageBackendError {
    fn from(err: std::io::Error) -> Self {
        StorageBackendError::Io(err.to_string())
    }
}

/// Failures while signing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// Private key is not a valid secp256k1 scalar.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Content could not be rendered canonically.
    #[error("Cannot serialize transaction content: {0}")]
    Serialization(String),

    /// Signature primitive failed.
    #[error("Signing failed: {0}")]
    Failed(String),
}

/// Errors surfaced by the data-access service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataAccessError {
    /// Operation attempted before `initialize()` completed.
    #[error("DataAccess must be initialized")]
    NotInitialized,

    /// `initialize()` called more than once.
    #[error("DataAccess already initialized")]
    AlreadyInitialized,

    /// A stored entry does not parse as a well-formed block.
    #[error("Corrupted block at location {location}: {reason}")]
    CorruptedStorage { location: Location, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageBackendError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Block could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DataAccessError {
    pub fn corrupted(location: impl Into<Location>, reason: impl ToString) -> Self {
        DataAccessError::CorruptedStorage {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
