//! # Ports (Hexagonal Architecture)
//!
//! - `inbound`: API offered to the transaction manager and hosts
//! - `outbound`: storage backend and clock the service depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
