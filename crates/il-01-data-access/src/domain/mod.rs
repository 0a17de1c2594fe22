//! # Domain Layer
//!
//! Pure domain logic of the data-access layer: transactions, blocks and the
//! topic index.
//!
//! ## Hexagonal Architecture
//!
//! This module contains NO I/O dependencies. All external interactions
//! are abstracted through ports in the `ports` module.

pub mod block;
pub mod errors;
pub mod location_by_topic;
pub mod transaction;
pub mod value_objects;

pub use block::*;
pub use errors::*;
pub use location_by_topic::*;
pub use transaction::*;
pub use value_objects::*;
