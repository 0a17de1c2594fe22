//! # Ledger Telemetry
//!
//! Structured logging bootstrap shared by every ledger binary and test harness.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Spans and events from the ledger crates are now emitted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `IL_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `IL_SERVICE_NAME` | `invoice-ledger` | Service name attached to startup event |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInit(String),
}
