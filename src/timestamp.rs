//! Row timestamp normalization.
//!
//! Logger timestamps carry no zone information. They are parsed against an
//! ordered list of layouts and interpreted in a configured fixed offset.

use crate::constants::FALLBACK_TIME_LAYOUTS;
use crate::error::{Result, Toa5Error};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::debug;

/// Parses row timestamps with a primary layout and fixed fallbacks
#[derive(Debug, Clone)]
pub struct TimestampParser {
    layouts: Vec<String>,
    location: FixedOffset,
}

impl TimestampParser {
    pub fn new(primary_layout: impl Into<String>, location: FixedOffset) -> Self {
        let layouts = std::iter::once(primary_layout.into())
            .chain(FALLBACK_TIME_LAYOUTS.iter().map(|layout| layout.to_string()))
            .collect();

        Self { layouts, location }
    }

    /// Layouts in the order they are tried
    pub fn layouts(&self) -> &[String] {
        &self.layouts
    }

    pub fn location(&self) -> FixedOffset {
        self.location
    }

    /// Parse a raw timestamp, returning the error of the last layout tried
    pub fn parse(&self, value: &str) -> Result<DateTime<FixedOffset>> {
        let mut last_error = None;

        for (attempt, layout) in self.layouts.iter().enumerate() {
            match NaiveDateTime::parse_from_str(value, layout) {
                Ok(naive) => {
                    if attempt > 0 {
                        debug!("Timestamp '{}' parsed with fallback layout {}", value, layout);
                    }
                    return naive
                        .and_local_timezone(self.location)
                        .single()
                        .ok_or_else(|| Toa5Error::timestamp(value, None));
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(Toa5Error::timestamp(value, last_error))
    }
}
