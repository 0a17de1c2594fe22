//! # Transaction Manager (il-02)
//!
//! Channels on top of the data-access log: persisting clear or encrypted
//! transactions into a channel and replaying a channel's history.
//!
//! ## Channel Model
//!
//! A channel is every transaction indexed under one channel id. The id is
//! the parsed hash (Keccak-256 of the canonical JSON payload) of the
//! channel's first transaction, which also fixes the channel type:
//!
//! | First transaction | Channel type | Later transactions |
//! |-------------------|--------------|--------------------|
//! | `data` | `Clear` | `data` only |
//! | `encryptedData` + `keys` + `encryptionMethod` | `Encrypted` | `encryptedData` + `hash` under the channel key |
//!
//! ## Reconstruction
//!
//! ```text
//! ConfirmedTransaction*  (append order)
//!     ↓ TransactionsParser   (decode with current type/key)
//!     ↓ ParsedTransaction::validate   (signature, payload, hash)
//!     ↓ first match fixes type/key; failures → IgnoredTransaction
//! CleanChannel { transactions[i] xor ignored_transactions[i] }
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - parsers, factory, entities, errors
//! - `ports/` - `TransactionManagerApi` (inbound), `DecryptionProvider` (outbound)
//! - `adapters/` - private-key decryption provider
//! - `service.rs` - `TransactionManager`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::EthereumPrivateKeyDecryptionProvider;
pub use domain::{
    ChannelParser, ChannelTransactions, ChannelTypeAndKey, CleanChannel, DecryptionError,
    EncryptionError, IgnoreReason, IgnoredTransaction, ParseError, ParseResult, ParsedTransaction,
    PersistTransactionResult, TransactionManagerError, TransactionsFactory, TransactionsParser,
    ValidTransaction, ValidatedData, ValidationError,
};
pub use ports::{DecryptionProvider, TransactionManagerApi};
pub use service::TransactionManager;
