//! Streaming TOA5 reader.
//!
//! Turns each wide data row into a sequence of long-format [`Record`]s, one
//! per data column. The reader keeps a cursor over the current row; every
//! call to [`Reader::read`] moves the cursor one column to the right and
//! pulls the next row from the source once the current one is used up.
//!
//! Column 0 of a data row is the timestamp. It is consumed when the row is
//! loaded and never emitted as a record, so a row of width W yields W-1
//! results.
//!
//! ```rust
//! # fn main() -> toa5::Result<()> {
//! let input = "TOA5,Station,CR1000,S11,CR1000.Std.32.03,CPU:T1.CR1,4242,Table\n\
//!              TIMESTAMP,RECORD,Batt_V_Avg\n\
//!              TS,RN,Volts\n\
//!              ,,Avg\n\
//!              2020-06-07 23:45,0,12.52\n";
//!
//! let mut reader = toa5::Reader::new(input.as_bytes())?;
//! assert_eq!(reader.environment().station, "Station");
//!
//! let names: Vec<String> = reader
//!     .records()
//!     .map(|record| record.map(|r| r.name))
//!     .collect::<toa5::Result<_>>()?;
//! assert_eq!(names, ["RECORD", "Batt_V_Avg"]);
//! # Ok(())
//! # }
//! ```

use crate::config::ReaderOptions;
use crate::constants::TIMESTAMP_COLUMN;
use crate::error::{Result, Toa5Error};
use crate::header::Header;
use crate::models::{Environment, ReadStats, Record};
use crate::source::DelimitedSource;
use crate::timestamp::TimestampParser;
use chrono::{DateTime, FixedOffset};
use std::io;
use tracing::debug;

/// Reader for TOA5 streams
#[derive(Debug)]
pub struct Reader<R> {
    source: DelimitedSource<R>,
    options: ReaderOptions,
    timestamps: TimestampParser,
    header: Header,
    cursor: Cursor,
    stats: ReadStats,
}

/// Position of the reader within the data section
#[derive(Debug)]
enum Cursor {
    /// A data row is loaded and `column` is the last column handed out
    Row(RowCursor),
    /// The stream ended or failed; no further rows will be read
    Exhausted,
}

#[derive(Debug)]
struct RowCursor {
    cells: Vec<String>,
    column: usize,
    timestamp: DateTime<FixedOffset>,
    line: u64,
}

impl<R: io::Read> Reader<R> {
    /// Open a TOA5 stream with default options
    pub fn new(input: R) -> Result<Self> {
        Self::open(input, ReaderOptions::default())
    }

    /// Open a TOA5 stream with explicit options.
    ///
    /// Passing `None` fails with [`Toa5Error::NoOptionsProvided`].
    pub fn with_options(input: R, options: Option<ReaderOptions>) -> Result<Self> {
        let options = options.ok_or(Toa5Error::NoOptionsProvided)?;
        Self::open(input, options)
    }

    fn open(input: R, options: ReaderOptions) -> Result<Self> {
        options.validate()?;

        let mut source = DelimitedSource::new(input, options.delimiter_byte()?);
        let timestamps =
            TimestampParser::new(options.effective_time_layout(), options.time_location);
        let header = Header::read_from(&mut source)?;

        let mut reader = Self {
            source,
            options,
            timestamps,
            header,
            cursor: Cursor::Exhausted,
            stats: ReadStats::default(),
        };

        // The first data row is loaded up front so an empty data section or a
        // bad first timestamp is reported at construction.
        let first = reader.load_row()?;
        reader.cursor = Cursor::Row(first);

        Ok(reader)
    }

    /// Read the next record.
    ///
    /// Returns [`Toa5Error::EndOfStream`] once all rows are consumed, and on
    /// every call after that. [`Toa5Error::EmptyRecordName`] concerns only the
    /// current cell; reading again continues with the next one.
    pub fn read(&mut self) -> Result<Record> {
        let column = self.next_column()?;

        let Cursor::Row(row) = &self.cursor else {
            return Err(Toa5Error::EndOfStream);
        };

        let name = &self.header.fields[column];
        if name.is_empty() {
            self.stats.empty_names_skipped += 1;
            return Err(Toa5Error::EmptyRecordName { column });
        }

        let cell = &row.cells[column];
        let value = cell.parse::<f64>().unwrap_or_else(|_| {
            debug!(
                "Non-numeric cell '{}' at line {}, column {} ({}), using NaN",
                cell, row.line, column, name
            );
            self.stats.malformed_cells += 1;
            f64::NAN
        });

        self.stats.records_emitted += 1;

        Ok(Record {
            timestamp: row.timestamp,
            value,
            name: name.clone(),
            unit: self.header.units[column].clone(),
            aggregation: self.header.aggregation[column].clone(),
        })
    }

    /// Iterate over records, skipping unnamed columns and stopping at end of stream.
    ///
    /// Any other error is yielded once and ends the iteration.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Move to the next data column, crossing into the next row when needed
    fn next_column(&mut self) -> Result<usize> {
        loop {
            match &mut self.cursor {
                Cursor::Exhausted => return Err(Toa5Error::EndOfStream),
                Cursor::Row(row) => {
                    row.column += 1;
                    if row.column < row.cells.len() {
                        return Ok(row.column);
                    }
                }
            }

            self.advance_row()?;
        }
    }

    /// Replace the current row with the next one from the source.
    ///
    /// The new row starts at the timestamp column. Any failure exhausts the
    /// reader.
    fn advance_row(&mut self) -> Result<()> {
        match self.load_row() {
            Ok(row) => {
                self.cursor = Cursor::Row(row);
                Ok(())
            }
            Err(e) => {
                if !e.is_end_of_stream() {
                    debug!("Stopping after row error: {}", e);
                }
                self.cursor = Cursor::Exhausted;
                Err(e)
            }
        }
    }

    fn load_row(&mut self) -> Result<RowCursor> {
        let cells = self.source.next_row()?.ok_or(Toa5Error::EndOfStream)?;
        let line = self.source.line();

        let expected = self.header.width();
        if cells.len() != expected {
            return Err(Toa5Error::RowWidthMismatch {
                line,
                expected,
                found: cells.len(),
            });
        }

        let raw_timestamp = cells
            .get(TIMESTAMP_COLUMN)
            .map(String::as_str)
            .unwrap_or_default();
        let timestamp = self.timestamps.parse(raw_timestamp)?;

        self.stats.rows_read += 1;
        debug!("Loaded data row at line {} ({})", line, timestamp);

        Ok(RowCursor {
            cells,
            column: TIMESTAMP_COLUMN,
            timestamp,
            line,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.header.environment
    }

    pub fn fields(&self) -> &[String] {
        &self.header.fields
    }

    pub fn units(&self) -> &[String] {
        &self.header.units
    }

    pub fn aggregation(&self) -> &[String] {
        &self.header.aggregation
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    /// Give back the underlying input
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

/// Iterator over the records of a [`Reader`]
#[derive(Debug)]
pub struct Records<'r, R> {
    reader: &'r mut Reader<R>,
    done: bool,
}

impl<R: io::Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.read() {
                Ok(record) => return Some(Ok(record)),
                Err(e) if e.is_recoverable() => continue,
                Err(e) if e.is_end_of_stream() => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
