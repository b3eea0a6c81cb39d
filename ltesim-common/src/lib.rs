//! Common types and utilities for ltesim
//!
//! This crate provides shared identifier types, configuration structures,
//! and logging utilities used across all ltesim crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{CcmAlgorithm, ComponentCarrierConfig, UeCcmConfig};
pub use error::Error;
pub use logging::{
    init_logging, init_logging_with_filter, log_sap_pdu, log_sap_primitive, Direction, HexDump,
    LogLevel,
};
pub use types::*;
