//! Command-line argument definitions for the TOA5 tool
//!
//! This module defines the CLI interface using the clap derive API. Reader
//! options shared by every subcommand are grouped in [`ReaderArgs`].

use crate::config::ReaderOptions;
use crate::constants::{DEFAULT_DELIMITER, DEFAULT_TIME_LAYOUT};
use crate::{Result, Toa5Error};
use chrono::{FixedOffset, Offset, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the TOA5 reader
#[derive(Debug, Clone, Parser)]
#[command(
    name = "toa5",
    version,
    about = "Inspect and convert Campbell Scientific TOA5 data logger files",
    long_about = "Reads TOA5 files written by Campbell Scientific data loggers, shows their \
                  header metadata, and converts wide data rows into long-format CSV with one \
                  value per line."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show the header block of a TOA5 file
    Header(HeaderArgs),
    /// Convert TOA5 files to long-format CSV
    Records(RecordsArgs),
    /// Read every record and report per-file statistics
    Validate(ValidateArgs),
}

/// Options controlling how TOA5 input is tokenized and timestamps are parsed
#[derive(Debug, Clone, ClapArgs)]
pub struct ReaderArgs {
    /// Field delimiter (a single ASCII character, or "tab")
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = DEFAULT_DELIMITER,
        value_parser = parse_delimiter
    )]
    pub delimiter: char,

    /// Primary timestamp layout in strftime syntax
    ///
    /// Timestamps that do not match are retried without seconds.
    #[arg(long = "time-layout", value_name = "FORMAT", default_value = DEFAULT_TIME_LAYOUT)]
    pub time_layout: String,

    /// UTC offset of the logger clock, e.g. +01:00 or UTC
    #[arg(
        long = "utc-offset",
        value_name = "OFFSET",
        default_value = "UTC",
        value_parser = parse_utc_offset
    )]
    pub utc_offset: FixedOffset,
}

impl ReaderArgs {
    /// Build validated reader options from the command line
    pub fn to_options(&self) -> Result<ReaderOptions> {
        let options = ReaderOptions::default()
            .with_delimiter(self.delimiter)
            .with_time_layout(self.time_layout.clone())
            .with_time_location(self.utc_offset);
        options.validate()?;
        Ok(options)
    }
}

/// Arguments for the header command
#[derive(Debug, Clone, Parser)]
pub struct HeaderArgs {
    /// TOA5 file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the records command
#[derive(Debug, Clone, Parser)]
pub struct RecordsArgs {
    /// TOA5 files or directories (searched recursively for .dat files)
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write CSV to this file instead of standard output
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Leave out records whose value is not a number
    #[arg(long = "skip-nan")]
    pub skip_nan: bool,

    /// Skip files that cannot be read instead of stopping; none of their rows are written
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,

    #[command(flatten)]
    pub reader: ReaderArgs,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// TOA5 files or directories (searched recursively for .dat files)
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub reader: ReaderArgs,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Parse a delimiter argument
pub fn parse_delimiter(value: &str) -> std::result::Result<char, String> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("delimiter must be a single character, got '{}'", value)),
    }
}

/// Parse a UTC offset of the form `UTC`, `Z`, `+HH`, `+HH:MM` or `-HHMM`
pub fn parse_utc_offset(value: &str) -> std::result::Result<FixedOffset, String> {
    offset_from_str(value).map_err(|e| e.to_string())
}

fn offset_from_str(value: &str) -> Result<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    let invalid = || Toa5Error::configuration(format!("invalid UTC offset '{}'", value));

    let (sign, digits) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.as_str(), "0"),
        4 => digits.split_at(2),
        _ => return Err(invalid()),
    };

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
