//! Reader configuration and validation.
//!
//! Provides the options recognised when opening a TOA5 stream: the field
//! delimiter, the primary timestamp layout and the fixed UTC offset used to
//! interpret logger timestamps.

use crate::constants::{DEFAULT_DELIMITER, DEFAULT_TIME_LAYOUT};
use crate::error::{Result, Toa5Error};
use chrono::{FixedOffset, Offset, Utc};
use tracing::debug;

/// Options for opening a TOA5 stream
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Field separator character
    pub delimiter: char,

    /// Primary timestamp layout in chrono strftime syntax; empty means the default
    pub time_layout: String,

    /// Offset used to interpret logger timestamps
    pub time_location: FixedOffset,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            time_layout: DEFAULT_TIME_LAYOUT.to_string(),
            time_location: Utc.fix(),
        }
    }
}

impl ReaderOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }

    pub fn with_time_location(mut self, location: FixedOffset) -> Self {
        self.time_location = location;
        self
    }

    /// Primary layout, falling back to the default when none is configured
    pub fn effective_time_layout(&self) -> &str {
        if self.time_layout.is_empty() {
            DEFAULT_TIME_LAYOUT
        } else {
            &self.time_layout
        }
    }

    /// Delimiter as the single byte the tokenizer works with
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(Toa5Error::configuration(format!(
                "delimiter {:?} is not a single-byte ASCII character",
                self.delimiter
            )));
        }

        match self.delimiter {
            '"' | '\r' | '\n' => Err(Toa5Error::configuration(format!(
                "delimiter {:?} is reserved",
                self.delimiter
            ))),
            c => Ok(c as u8),
        }
    }

    /// Validate options before a reader is built
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        debug!(
            "Reader options: delimiter={:?}, time_layout={:?}, time_location={}",
            self.delimiter,
            self.effective_time_layout(),
            self.time_location
        );

        Ok(())
    }
}
