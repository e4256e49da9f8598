//! TOA5 Reader Library
//!
//! A Rust library for reading TOA5 files, the tabular text format written by
//! Campbell Scientific data loggers, and turning their wide data rows into
//! long-format records.
//!
//! This library provides tools for:
//! - Parsing and validating the four-line TOA5 header block
//! - Streaming data rows one value at a time with column metadata attached
//! - Tolerating malformed numeric cells (read as NaN)
//! - Timestamp parsing with a minute-precision fallback in a fixed UTC offset

pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod reader;
pub mod source;
pub mod timestamp;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::ReaderOptions;
pub use error::{Result, Toa5Error};
pub use header::Header;
pub use models::{Environment, ReadStats, Record};
pub use reader::{Reader, Records};
