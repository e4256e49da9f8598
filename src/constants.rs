//! Format constants for TOA5 files.
//!
//! Marker strings, header geometry and default parsing layouts shared by the
//! header parser, the row cursor and the command-line tool.

// =============================================================================
// Header Geometry
// =============================================================================

/// Literal filetype marker in the first field of the environment line
pub const TOA5_MARKER: &str = "TOA5";

/// Minimum number of fields on the environment line
pub const ENVIRONMENT_FIELD_COUNT: usize = 8;

/// Column holding the row timestamp in every data row
pub const TIMESTAMP_COLUMN: usize = 0;

// =============================================================================
// Parsing Defaults
// =============================================================================

/// Default field separator
pub const DEFAULT_DELIMITER: char = ',';

/// Default primary timestamp layout (chrono strftime syntax).
///
/// `%.f` accepts an optional fractional second, as written by sub-second tables.
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layouts tried in order after the primary layout fails.
///
/// Loggers configured for minute-resolution tables drop the seconds field.
pub const FALLBACK_TIME_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M"];

// =============================================================================
// Command-line Defaults
// =============================================================================

/// File extension used by loggers for TOA5 tables
pub const TOA5_FILE_EXTENSION: &str = "dat";
