//! # Domain Errors
//!
//! Error types for channel reconstruction and transaction management.
//!
//! `ParseError` and `ValidationError` are local to one transaction: the
//! channel parser folds them into ignored entries and never returns them.

use il_01_data_access::DataAccessError;
use thiserror::Error;

/// A persisted transaction could not be decoded in its channel context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Clear transactions are not allowed in encrypted channel")]
    ClearInEncryptedChannel,

    #[error("No other property than data is allowed in clear transaction")]
    ClearWithEncryptionProperties,

    #[error("Encrypted transactions are not allowed in clear channel")]
    EncryptedInClearChannel,

    #[error("the property \"hash\" is missing for the encrypted transaction")]
    MissingHash,

    #[error("the properties \"encryptionMethod\" and \"keys\" are needed to compute the channel key")]
    MissingChannelKeyProperties,

    #[error("the properties \"encryptionMethod\" and \"keys\" have been already given for this channel")]
    ChannelKeyPropertiesAlreadyGiven,

    #[error("Encryption method not supported: {0}")]
    UnsupportedEncryptionMethod(String),

    #[error("No decryption provider given")]
    NoDecryptionProvider,

    #[error("Impossible to decrypt the channel key from this transaction ({0})")]
    ChannelKeyDecryption(String),

    #[error("Impossible to decrypt the transaction data ({0})")]
    DataDecryption(String),

    #[error("Transaction must have a property \"data\" or \"encryptedData\"")]
    MissingData,
}

/// A decoded transaction fails its own consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Signature error: {0}")]
    InvalidSignature(String),

    #[error("Impossible to JSON parse the decrypted transaction data ({0})")]
    InvalidPayload(String),

    #[error("The given hash does not match the hash of the decrypted data")]
    HashMismatch,
}

/// Failures of a decryption provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionError {
    #[error("Identity not registered: {0}")]
    IdentityNotRegistered(String),

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Decryption failed: {0}")]
    Crypto(String),
}

/// Failures while building encrypted transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptionError {
    #[error("An encrypted channel needs at least one recipient")]
    NoRecipients,

    #[error("Invalid recipient public key: {0}")]
    InvalidRecipientKey(String),

    #[error("Encryption failed: {0}")]
    Crypto(String),

    #[error("Cannot serialize payload: {0}")]
    Serialization(String),
}

/// Errors surfaced by the transaction manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionManagerError {
    #[error("Impossible to retrieve the channel: {channel_id}")]
    ChannelNotFound { channel_id: String },

    #[error("Impossible to add new stakeholder to channel {channel_id}")]
    StakeholderChangeRejected { channel_id: String },

    #[error("Impossible to decrypt the channel key of: {channel_id}")]
    ChannelKeyUnavailable { channel_id: String },

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}
