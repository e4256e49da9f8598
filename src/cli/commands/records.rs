//! Records command implementation
//!
//! Converts TOA5 files into long-format CSV with one value per line, tagged
//! with the station and table it came from.
//!
//! Each file is converted into a buffer and only written out once it has been
//! read to the end, so a file that fails part way leaves no rows behind.

use super::shared::{collect_inputs, open_reader};
use crate::cli::args::RecordsArgs;
use crate::config::ReaderOptions;
use crate::models::Record;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Column names of the long-format output, in `LongRow` field order
const LONG_COLUMNS: [&str; 7] = [
    "timestamp",
    "station",
    "table",
    "name",
    "unit",
    "aggregation",
    "value",
];

/// One line of long-format output
#[derive(Debug, Serialize)]
struct LongRow<'a> {
    timestamp: String,
    station: &'a str,
    table: &'a str,
    name: &'a str,
    unit: &'a str,
    aggregation: &'a str,
    value: f64,
}

impl<'a> LongRow<'a> {
    fn new(record: &'a Record, station: &'a str, table: &'a str) -> Self {
        Self {
            timestamp: record.timestamp.to_rfc3339(),
            station,
            table,
            name: &record.name,
            unit: &record.unit,
            aggregation: &record.aggregation,
            value: record.value,
        }
    }
}

pub fn run_records(args: RecordsArgs, quiet: bool) -> Result<()> {
    let options = args.reader.to_options()?;
    let files = collect_inputs(&args.inputs)?;
    info!("Converting {} TOA5 files", files.len());

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(LONG_COLUMNS)?;
    writer.flush()?;
    let mut writer = writer.into_inner().map_err(|e| e.into_error())?;

    let progress = if args.output.is_some() && !quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut total = 0usize;
    let mut failed = 0usize;
    for path in &files {
        if let Some(pb) = &progress {
            pb.set_message(path.display().to_string());
        }

        match convert_file(path, &options, &args, progress.as_ref()) {
            Ok((written, rows)) => {
                writer.write_all(&rows)?;
                info!("{}: {} records", path.display(), written);
                total += written;
            }
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {:#}", path.display(), e);
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush()?;

    if let Some(pb) = &progress {
        pb.finish_with_message(format!("from {} files", files.len() - failed));
    }

    info!(
        "Wrote {} records from {} files ({} failed)",
        total,
        files.len() - failed,
        failed
    );

    Ok(())
}

/// Convert one file into CSV rows without a header line.
///
/// Returns the number of records and the encoded rows.
fn convert_file(
    path: &Path,
    options: &ReaderOptions,
    args: &RecordsArgs,
    progress: Option<&ProgressBar>,
) -> Result<(usize, Vec<u8>)> {
    let mut reader = open_reader(path, options)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    let station = reader.environment().station.clone();
    let table = reader.environment().table.clone();

    let mut written = 0usize;
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        if args.skip_nan && record.value.is_nan() {
            continue;
        }

        writer.serialize(LongRow::new(&record, &station, &table))?;
        written += 1;

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let rows = writer.into_inner().map_err(|e| e.into_error())?;
    Ok((written, rows))
}
