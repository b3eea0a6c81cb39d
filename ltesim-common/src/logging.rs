//! Logging infrastructure for ltesim
//!
//! This module provides configurable logging using the `tracing` crate,
//! SAP primitive logging helpers, and hex formatting for PDU payloads.

use std::fmt;
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// Initialize the tracing subscriber with the specified log level.
///
/// This should be called once at application startup. The log level can be
/// overridden by the `RUST_LOG` environment variable.
///
/// # Example
///
/// ```no_run
/// use ltesim_common::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .init();
}

/// Initialize logging with a custom filter string.
///
/// # Example
///
/// ```no_run
/// use ltesim_common::logging::init_logging_with_filter;
///
/// // Default to info, but enable debug for the CCM
/// init_logging_with_filter("info,ltesim_ue::ccm=debug");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .init();
}

/// Direction of a SAP primitive relative to the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Upper layer invoking the lower layer (e.g. RRC -> CCM)
    Down,
    /// Lower layer invoking the upper layer (e.g. CCM -> RRC)
    Up,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Down => write!(f, "DOWN"),
            Direction::Up => write!(f, "UP"),
        }
    }
}

/// Log a SAP primitive invocation at debug level.
///
/// # Arguments
///
/// * `sap` - SAP name (e.g., "CCM-RRC", "MAC")
/// * `direction` - Whether the primitive travels down or up the stack
/// * `primitive` - Primitive name
/// * `detail` - Free-form detail (channel, carriers, ...)
///
/// # Example
///
/// ```
/// use ltesim_common::logging::{log_sap_primitive, Direction};
///
/// log_sap_primitive("CCM-RRC", Direction::Down, "AddLc", "lcid=3");
/// ```
pub fn log_sap_primitive(sap: &str, direction: Direction, primitive: &str, detail: &str) {
    tracing::debug!(
        sap = sap,
        direction = %direction,
        primitive = primitive,
        "{} {} {} {}",
        sap,
        direction,
        primitive,
        detail
    );
}

/// Log a PDU travelling through a SAP at trace level as a hex dump.
pub fn log_sap_pdu(sap: &str, direction: Direction, data: &[u8]) {
    tracing::trace!(
        sap = sap,
        direction = %direction,
        len = data.len(),
        hex = %HexDump(data),
        "{} {} PDU",
        sap,
        direction
    );
}

/// Wrapper for hex dump formatting
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
