//! Core data structures for TOA5 reading.
//!
//! Defines the environment descriptor from the first header line, the
//! long-format record emitted per data cell, and running read statistics.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// First header line of a TOA5 file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub filetype: String,
    pub station: String,
    pub model: String,
    pub serial: String,
    pub os_version: String,
    pub program: String,
    pub signature: String,
    pub table: String,
}

/// A single value from a data row with its column metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
    pub name: String,
    pub unit: String,
    pub aggregation: String,
}

/// Counters kept while reading a stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    /// Data rows pulled from the source
    pub rows_read: usize,

    /// Records returned to the caller
    pub records_emitted: usize,

    /// Cells passed over because their column has no name
    pub empty_names_skipped: usize,

    /// Cells whose content was not numeric and became NaN
    pub malformed_cells: usize,
}

impl ReadStats {
    /// Percentage of emitted records holding a numeric value
    pub fn numeric_rate(&self) -> f64 {
        if self.records_emitted == 0 {
            0.0
        } else {
            let numeric = self.records_emitted.saturating_sub(self.malformed_cells);
            (numeric as f64 / self.records_emitted as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rate() {
        let stats = ReadStats {
            rows_read: 2,
            records_emitted: 4,
            empty_names_skipped: 10,
            malformed_cells: 1,
        };
        assert_eq!(stats.numeric_rate(), 75.0);
        assert_eq!(ReadStats::default().numeric_rate(), 0.0);
    }
}
