//! Header command implementation
//!
//! Prints the environment line and the column metadata of a TOA5 file.

use super::shared::open_reader;
use crate::cli::args::{HeaderArgs, OutputFormat};
use crate::header::Header;
use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use tracing::info;

pub fn run_header(args: HeaderArgs) -> Result<()> {
    let options = args.reader.to_options()?;
    let reader = open_reader(&args.input, &options)?;
    info!("Read header of {}", args.input.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => write_human(&mut out, reader.header())?,
        OutputFormat::Csv => write_csv(&mut out, reader.header())?,
    }
    out.flush()?;

    Ok(())
}

fn write_human(out: &mut impl Write, header: &Header) -> Result<()> {
    let env = &header.environment;

    writeln!(out, "{}", "Environment".bright_green().bold())?;
    for (label, value) in [
        ("Filetype", &env.filetype),
        ("Station", &env.station),
        ("Model", &env.model),
        ("Serial", &env.serial),
        ("OS version", &env.os_version),
        ("Program", &env.program),
        ("Signature", &env.signature),
        ("Table", &env.table),
    ] {
        writeln!(out, "  {:<12} {}", label.bright_white(), value)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Columns ({})", header.width()).bright_green().bold()
    )?;

    let name_width = header
        .fields
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);
    let unit_width = header
        .units
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(
        out,
        "  {:>3}  {:<name_width$}  {:<unit_width$}  {}",
        "#".bright_black(),
        "Name".bright_black(),
        "Unit".bright_black(),
        "Aggregation".bright_black(),
    )?;

    for (index, name) in header.fields.iter().enumerate() {
        let display_name = if name.is_empty() {
            "-".bright_black().to_string()
        } else {
            name.bright_cyan().to_string()
        };
        // Padding is applied to the plain name; colour codes would skew it.
        let padding = name_width.saturating_sub(name.len().max(1));
        writeln!(
            out,
            "  {:>3}  {}{}  {:<unit_width$}  {}",
            index,
            display_name,
            " ".repeat(padding),
            header.units[index],
            header.aggregation[index],
        )?;
    }

    Ok(())
}

fn write_csv(out: &mut impl Write, header: &Header) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["index", "name", "unit", "aggregation"])?;

    for (index, name) in header.fields.iter().enumerate() {
        writer.write_record([
            index.to_string().as_str(),
            name.as_str(),
            header.units[index].as_str(),
            header.aggregation[index].as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
