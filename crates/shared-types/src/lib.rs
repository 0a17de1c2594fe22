//! # Shared Types Crate
//!
//! Value types exchanged between the ledger crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: signature, identity, encryption and storage
//!   metadata types are defined once and re-used by every layer.
//! - **Wire Compatibility**: serde representations match the persisted block
//!   format (`camelCase` field names, lower-case method tags).
//! - **Secret Hygiene**: key material is zeroized on drop and never printed
//!   by `Debug`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
