//! Core types and traits for the signal scanner.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries) and the indicator frames derived from them
//! - Signals, simulated trades and the instrument universe
//! - Core traits for indicators, pattern detectors, data sources and result sinks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScanError, ScanResult};
pub use types::*;
pub use traits::*;
