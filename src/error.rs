//! Error handling for TOA5 reading operations.
//!
//! Construction errors (bad marker, short header, inconsistent widths) abort
//! reader creation. Read errors are terminal for the stream, except
//! [`Toa5Error::EmptyRecordName`] which only concerns a single cell.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Toa5Error {
    #[error("no TOA5 file: expected filetype marker \"TOA5\", found \"{found}\"")]
    NotToa5 { found: String },

    #[error("environment line has missing fields: expected {expected}, found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("no options provided")]
    NoOptionsProvided,

    #[error("header {line} line has {found} columns, field names line has {expected}")]
    HeaderWidthMismatch {
        line: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("data row at line {line} has {found} columns, header declares {expected}")]
    RowWidthMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("empty record name at column {column}")]
    EmptyRecordName { column: usize },

    #[error("invalid timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("end of stream")]
    EndOfStream,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Toa5Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timestamp error for a raw value
    pub fn timestamp(value: impl Into<String>, source: Option<chrono::ParseError>) -> Self {
        Self::Timestamp {
            value: value.into(),
            source,
        }
    }

    /// True when the stream has no more data rows
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// True for errors that leave the reader usable; the caller may read again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyRecordName { .. })
    }
}

pub type Result<T> = std::result::Result<T, Toa5Error>;
