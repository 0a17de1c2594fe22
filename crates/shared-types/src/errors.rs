//! Errors raised while building shared value types.

use thiserror::Error;

/// Construction errors for the value types in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}
