//! TOA5 header parsing.
//!
//! The header block is four lines: the environment line describing the
//! logger and table, then column names, column units and column aggregation
//! methods. Column 0 of the metadata lines belongs to the timestamp.

use crate::constants::{ENVIRONMENT_FIELD_COUNT, TOA5_MARKER};
use crate::error::{Result, Toa5Error};
use crate::models::Environment;
use crate::source::DelimitedSource;
use std::io;
use tracing::debug;

/// Parsed header block of a TOA5 stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub environment: Environment,
    pub fields: Vec<String>,
    pub units: Vec<String>,
    pub aggregation: Vec<String>,
}

impl Header {
    /// Read the four header lines from the start of a stream
    pub fn read_from<R: io::Read>(source: &mut DelimitedSource<R>) -> Result<Self> {
        let environment = Environment::from_fields(&next_line(source)?)?;
        let fields = next_line(source)?;
        let units = next_line(source)?;
        let aggregation = next_line(source)?;

        let header = Self {
            environment,
            fields,
            units,
            aggregation,
        };
        header.check_widths()?;

        debug!(
            "Parsed TOA5 header: station={}, table={}, columns={}",
            header.environment.station,
            header.environment.table,
            header.width()
        );

        Ok(header)
    }

    /// Number of columns including the timestamp column
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    fn check_widths(&self) -> Result<()> {
        let expected = self.fields.len();
        for (line, values) in [("units", &self.units), ("aggregation", &self.aggregation)] {
            if values.len() != expected {
                return Err(Toa5Error::HeaderWidthMismatch {
                    line,
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}

impl Environment {
    /// Build the environment from the fields of header line 1
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        let filetype = fields.first().map(String::as_str).unwrap_or_default();
        if filetype != TOA5_MARKER {
            return Err(Toa5Error::NotToa5 {
                found: filetype.to_string(),
            });
        }

        if fields.len() < ENVIRONMENT_FIELD_COUNT {
            return Err(Toa5Error::TruncatedHeader {
                expected: ENVIRONMENT_FIELD_COUNT,
                found: fields.len(),
            });
        }

        Ok(Self {
            filetype: fields[0].clone(),
            station: fields[1].clone(),
            model: fields[2].clone(),
            serial: fields[3].clone(),
            os_version: fields[4].clone(),
            program: fields[5].clone(),
            signature: fields[6].clone(),
            table: fields[7].clone(),
        })
    }
}

fn next_line<R: io::Read>(source: &mut DelimitedSource<R>) -> Result<Vec<String>> {
    source.next_row()?.ok_or(Toa5Error::EndOfStream)
}
