//! Shared components for CLI commands
//!
//! Input discovery and reader construction used by more than one command.

use crate::config::ReaderOptions;
use crate::constants::TOA5_FILE_EXTENSION;
use crate::reader::Reader;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expand input paths into a sorted list of TOA5 files.
///
/// Files are taken as given; directories are walked recursively for files
/// with the `.dat` extension.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in walkdir::WalkDir::new(path) {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory {}", path.display()))?;
                if entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(TOA5_FILE_EXTENSION))
                {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            debug!("Found {} TOA5 files under {}", found.len(), path.display());
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Input path does not exist: {}", path.display());
        }
    }

    if files.is_empty() {
        anyhow::bail!("No TOA5 files found in the given inputs");
    }

    Ok(files)
}

/// Open a TOA5 file for reading
pub fn open_reader(path: &Path, options: &ReaderOptions) -> Result<Reader<BufReader<File>>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    Reader::with_options(BufReader::new(file), Some(options.clone()))
        .with_context(|| format!("Failed to read TOA5 header of {}", path.display()))
}
