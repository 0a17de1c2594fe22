//! Storage backend adapters.
//!
//! Both adapters name an entry by the Keccak-256 (lower-case hex) of its
//! append sequence number followed by its content. Every append gets its own
//! location, identical content included.

mod file;
mod memory;

pub use file::{FileStorage, FileStorageConfig};
pub use memory::InMemoryStorage;

use shared_crypto::keccak256;
use shared_types::Location;

/// Location of the `sequence`-th append (zero-based) carrying `content`.
pub fn block_location(sequence: u64, content: &str) -> Location {
    let mut preimage = Vec::with_capacity(8 + content.len());
    preimage.extend_from_slice(&sequence.to_be_bytes());
    preimage.extend_from_slice(content.as_bytes());
    hex::encode(keccak256(&preimage))
}

/// Whether `location` could have been produced by [`block_location`].
pub(crate) fn is_valid_location(location: &str) -> bool {
    location.len() == 64
        && location
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
