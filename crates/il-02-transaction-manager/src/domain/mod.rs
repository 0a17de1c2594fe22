//! # Domain Layer
//!
//! Transaction decoding and channel reconstruction.
//!
//! No storage access happens here: the service feeds confirmed transactions
//! in, and key custody is reached through the `DecryptionProvider` port.

pub mod channel_parser;
pub mod entities;
pub mod errors;
pub mod transactions_factory;
pub mod transactions_parser;

pub use channel_parser::*;
pub use entities::*;
pub use errors::*;
pub use transactions_factory::*;
pub use transactions_parser::*;
