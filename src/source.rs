//! Delimited line source backing the TOA5 reader.
//!
//! Splits each line of the input into fields with the `csv` tokenizer.
//! Record widths are not enforced here: the header lines and data rows of a
//! TOA5 file legitimately differ in width, so width checks happen in the
//! header parser and the row cursor.

use crate::error::Result;
use csv::StringRecord;
use std::io;

/// Forward-only source of field rows
#[derive(Debug)]
pub struct DelimitedSource<R> {
    inner: csv::Reader<R>,
    record: StringRecord,
}

impl<R: io::Read> DelimitedSource<R> {
    /// Create a source splitting fields on `delimiter`
    pub fn new(input: R, delimiter: u8) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(input);

        Self {
            inner,
            record: StringRecord::new(),
        }
    }

    /// Read the next row of fields with leading whitespace trimmed.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(None);
        }

        Ok(Some(
            self.record
                .iter()
                .map(|field| field.trim_start().to_string())
                .collect(),
        ))
    }

    /// Line number of the most recently read row (1-based, 0 before any read)
    pub fn line(&self) -> u64 {
        self.record.position().map(|pos| pos.line()).unwrap_or(0)
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}
