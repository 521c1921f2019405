//! # VR Telemetry
//!
//! Structured logging for Volunteer-Roster binaries and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vr_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `volunteer-roster` | Service name in logs |
//! | `VR_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `VR_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `VR_JSON_LOGS` | `false` | JSON lines instead of pretty output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(String),

    /// Level filter or other setting could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Install logging for a test, ignoring a subscriber installed by an
/// earlier test in the same binary.
pub fn init_for_tests() {
    let config = TelemetryConfig {
        log_level: "debug".to_string(),
        ..TelemetryConfig::from_env()
    };
    let _ = init_tracing(&config);
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use vr_telemetry::subsystem_span;
///
/// let _span = subsystem_span!("register", subsystem = "membership", event_id = "e1").entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
