//! Validate command implementation
//!
//! Reads every record of each input file and reports what the reader saw:
//! rows, emitted records, unnamed cells and non-numeric cells. A file fails
//! validation when its header or any data row cannot be read.

use super::shared::{collect_inputs, open_reader};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ReaderOptions;
use crate::models::ReadStats;
use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of validating one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub station: Option<String>,
    pub table: Option<String>,
    pub stats: ReadStats,
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let start_time = Instant::now();
    let options = args.reader.to_options()?;
    let files = collect_inputs(&args.inputs)?;
    info!("Validating {} TOA5 files", files.len());

    let reports: Vec<FileReport> = files
        .iter()
        .map(|path| validate_file(path, &options))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => write_human(&mut out, &reports)?,
        OutputFormat::Csv => write_csv(&mut out, &reports)?,
    }
    out.flush()?;

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    info!(
        "Validation completed in {:.2}s: {} files, {} failed",
        start_time.elapsed().as_secs_f64(),
        reports.len(),
        failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} files failed validation", failed, reports.len());
    }

    Ok(())
}

/// Read a whole file, capturing the first error instead of returning it
pub fn validate_file(path: &Path, options: &ReaderOptions) -> FileReport {
    let mut report = FileReport {
        path: path.to_path_buf(),
        station: None,
        table: None,
        stats: ReadStats::default(),
        error: None,
    };

    let mut reader = match open_reader(path, options) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("{}: {:#}", path.display(), e);
            report.error = Some(format!("{:#}", e));
            return report;
        }
    };

    report.station = Some(reader.environment().station.clone());
    report.table = Some(reader.environment().table.clone());

    if let Some(Err(e)) = reader.records().find(|record| record.is_err()) {
        warn!("{}: {}", path.display(), e);
        report.error = Some(e.to_string());
    }

    report.stats = reader.stats().clone();
    debug!("{}: {:?}", path.display(), report.stats);

    report
}

fn write_human(out: &mut impl Write, reports: &[FileReport]) -> Result<()> {
    for report in reports {
        let status = if report.is_valid() {
            "OK".bright_green().bold()
        } else {
            "FAILED".bright_red().bold()
        };
        writeln!(out, "{} {}", status, report.path.display())?;

        if let (Some(station), Some(table)) = (&report.station, &report.table) {
            writeln!(
                out,
                "    station {}, table {}",
                station.bright_cyan(),
                table.bright_cyan()
            )?;
            writeln!(
                out,
                "    {} rows, {} records, {} unnamed cells, {} non-numeric ({:.1}% numeric)",
                report.stats.rows_read,
                report.stats.records_emitted,
                report.stats.empty_names_skipped,
                report.stats.malformed_cells,
                report.stats.numeric_rate()
            )?;
        }

        if let Some(error) = &report.error {
            writeln!(out, "    {}", error.bright_red())?;
        }
    }

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    writeln!(out)?;
    writeln!(
        out,
        "{} files checked, {} valid, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    )?;

    Ok(())
}

fn write_csv(out: &mut impl Write, reports: &[FileReport]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "path",
        "station",
        "table",
        "rows_read",
        "records_emitted",
        "empty_names_skipped",
        "malformed_cells",
        "error",
    ])?;

    for report in reports {
        writer.write_record([
            report.path.display().to_string(),
            report.station.clone().unwrap_or_default(),
            report.table.clone().unwrap_or_default(),
            report.stats.rows_read.to_string(),
            report.stats.records_emitted.to_string(),
            report.stats.empty_names_skipped.to_string(),
            report.stats.malformed_cells.to_string(),
            report.error.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = "TOA5,Station,CR1000,S11,CR1000.Std.32.03,CPU:T1.CR1,4242,Table\n\
                         TIMESTAMP,RECORD,Batt_V_Avg,\n\
                         TS,RN,Volts,\n\
                         ,,Avg,\n\
                         2020-06-07 23:45,0,12.52,\n\
                         2020-06-08 00:00,1,12.56,\n";

    #[test]
    fn test_validate_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.dat");
        fs::write(&path, VALID).unwrap();

        let report = validate_file(&path, &ReaderOptions::default());
        assert!(report.is_valid(), "unexpected error: {:?}", report.error);
        assert_eq!(report.station.as_deref(), Some("Station"));
        assert_eq!(report.stats.rows_read, 2);
        assert_eq!(report.stats.records_emitted, 4);
        assert_eq!(report.stats.empty_names_skipped, 2);
        assert_eq!(report.stats.malformed_cells, 0);
    }

    #[test]
    fn test_validate_bad_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.dat");
        fs::write(&path, format!("{VALID}garbage,2,3,\n")).unwrap();

        let report = validate_file(&path, &ReaderOptions::default());
        assert!(!report.is_valid());
        assert!(report.error.unwrap().contains("garbage"));
        assert_eq!(report.stats.rows_read, 2);
    }

    #[test]
    fn test_validate_not_toa5() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.dat");
        fs::write(&path, "TOB1,Station,CR1000\n").unwrap();

        let report = validate_file(&path, &ReaderOptions::default());
        assert!(!report.is_valid());
        assert!(report.station.is_none());
    }

    #[test]
    fn test_write_csv_report() {
        let reports = vec![FileReport {
            path: PathBuf::from("a.dat"),
            station: Some("Station".to_string()),
            table: Some("Table".to_string()),
            stats: ReadStats {
                rows_read: 2,
                records_emitted: 4,
                empty_names_skipped: 2,
                malformed_cells: 1,
            },
            error: None,
        }];

        let mut out = Vec::new();
        write_csv(&mut out, &reports).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("a.dat,Station,Table,2,4,2,1,\n"));
    }
}
