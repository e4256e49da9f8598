//! Integration tests for the TOA5 reader
//!
//! These tests drive the public reader API end to end with in-memory input
//! and temporary files shaped like real CR1000 table output.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;
use toa5::{Environment, Reader, ReaderOptions, Record, Toa5Error};

const INPUT: &str = "TOA5,Station,CR1000,S11,CR1000.Std.32.03,CPU:T1.CR1,4242,Table
TIMESTAMP,RECORD,Batt_V_Avg,,,,,
TS,RN,Volts,,,,,
,,Avg,,,,,
2020-06-07 23:45,0,12.52,,,,,
2020-06-08 00:00,1,12.56,,,,,
";

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().fixed_offset()
}

fn open(input: &str) -> toa5::Result<Reader<Cursor<String>>> {
    Reader::new(Cursor::new(input.to_string()))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Purpose: Parse the environment line of a typical CR1000 table
/// Benefit: All eight metadata fields reach the caller unchanged
#[test]
fn test_environment() {
    let reader = open(INPUT).unwrap();

    assert_eq!(
        reader.environment(),
        &Environment {
            filetype: "TOA5".to_string(),
            station: "Station".to_string(),
            model: "CR1000".to_string(),
            serial: "S11".to_string(),
            os_version: "CR1000.Std.32.03".to_string(),
            program: "CPU:T1.CR1".to_string(),
            signature: "4242".to_string(),
            table: "Table".to_string(),
        }
    );
}

/// Purpose: Open a reader on empty input
/// Benefit: Missing header lines surface as end of stream, not a panic
#[test]
fn test_empty_input_is_end_of_stream() {
    let err = open("").unwrap_err();
    assert!(err.is_end_of_stream(), "unexpected error: {err:?}");
}

/// Purpose: Reject files whose marker is not TOA5
/// Benefit: Other Campbell formats fail before any field counting
#[test]
fn test_wrong_filetype() {
    let err = open("TOA3,Station,CR1000,S11,CR1000.Std.32.03,CPU:T1.CR1,4242,Table").unwrap_err();
    assert!(matches!(err, Toa5Error::NotToa5 { .. }));

    // Marker is checked regardless of field count
    let err = open("TOB1,Station").unwrap_err();
    assert!(matches!(err, Toa5Error::NotToa5 { found } if found == "TOB1"));
}

/// Purpose: Reject an environment line with fewer than eight fields
/// Benefit: Truncated files report how many fields were found
#[test]
fn test_partial_environment_line() {
    let err = open("TOA5,Station,CR1000,S11,CR1000.Std.32.03,").unwrap_err();
    assert!(matches!(
        err,
        Toa5Error::TruncatedHeader {
            expected: 8,
            found: 6
        }
    ));
}

/// Purpose: Expose field names, units and aggregation lines
/// Benefit: Trailing empty columns are kept so widths stay aligned
#[test]
fn test_metadata_lines() {
    let reader = open(INPUT).unwrap();

    assert_eq!(
        reader.fields(),
        strings(&["TIMESTAMP", "RECORD", "Batt_V_Avg", "", "", "", "", ""])
    );
    assert_eq!(
        reader.units(),
        strings(&["TS", "RN", "Volts", "", "", "", "", ""])
    );
    assert_eq!(
        reader.aggregation(),
        strings(&["", "", "Avg", "", "", "", "", ""])
    );
}

/// Purpose: Open a table that has a header but no data
/// Benefit: A table without rows fails at construction
#[test]
fn test_header_without_data_rows() {
    let header_only: String = INPUT.lines().take(4).map(|l| format!("{l}\n")).collect();
    let err = open(&header_only).unwrap_err();
    assert!(err.is_end_of_stream());
}

/// Purpose: Walk the cursor through both rows of the sample table
/// Benefit: Pins down the W-1 results per row and the unnamed-column skips
#[test]
fn test_read_sequence() {
    let mut reader = open(INPUT).unwrap();

    let expected_rows = [
        (utc(2020, 6, 7, 23, 45), 0.0, 12.52),
        (utc(2020, 6, 8, 0, 0), 1.0, 12.56),
    ];

    for (timestamp, record_number, battery) in expected_rows {
        assert_eq!(
            reader.read().unwrap(),
            Record {
                timestamp,
                value: record_number,
                name: "RECORD".to_string(),
                unit: "RN".to_string(),
                aggregation: "".to_string(),
            }
        );
        assert_eq!(
            reader.read().unwrap(),
            Record {
                timestamp,
                value: battery,
                name: "Batt_V_Avg".to_string(),
                unit: "Volts".to_string(),
                aggregation: "Avg".to_string(),
            }
        );

        for column in 3..8 {
            match reader.read() {
                Err(Toa5Error::EmptyRecordName { column: c }) => assert_eq!(c, column),
                other => panic!("expected empty record name at {column}, got {other:?}"),
            }
        }
    }

    assert!(reader.read().unwrap_err().is_end_of_stream());
    // No resurrection after end of stream
    assert!(reader.read().unwrap_err().is_end_of_stream());
    assert!(reader.read().unwrap_err().is_end_of_stream());
}

/// Purpose: Collect every record of a multi-row table
/// Benefit: Each record carries the timestamp of its own row
#[test]
fn test_records_share_row_timestamp() {
    let input = "TOA5,St,CR1000,1,OS,Prog,1,Tab
TIMESTAMP,RECORD,AirT_Avg,RH_Avg,WS_ms
TS,RN,Deg C,%,meters/second
,,Avg,Avg,Smp
2021-03-01 10:00:00,10,4.5,81.2,3.1
2021-03-01 10:10:00,11,4.7,80.9,2.8
2021-03-01 10:20:00,12,4.9,80.1,2.2
";
    let mut reader = open(input).unwrap();
    let records: Vec<Record> = reader.records().collect::<toa5::Result<_>>().unwrap();

    assert_eq!(records.len(), 3 * 4);
    for row in records.chunks(4) {
        assert!(row.iter().all(|r| r.timestamp == row[0].timestamp));
        let names: Vec<&str> = row.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["RECORD", "AirT_Avg", "RH_Avg", "WS_ms"]);
    }
    assert_eq!(records[5].value, 4.7);
    assert_eq!(records[11].unit, "meters/second");
    assert_eq!(records[8].timestamp, utc(2021, 3, 1, 10, 20));

    let stats = reader.stats();
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.records_emitted, 12);
    assert_eq!(stats.empty_names_skipped, 0);
}

/// Purpose: Read cells holding dashes, text and blanks
/// Benefit: Non-numeric values become NaN and are counted
#[test]
fn test_non_numeric_cells_become_nan() {
    let input = "TOA5,St,CR1000,1,OS,Prog,1,Tab
TIMESTAMP,RECORD,AirT_Avg,Status
TS,RN,Deg C,
,,Avg,Smp
2021-03-01 10:00:00,1,-,
2021-03-01 10:10:00,2,n/a,ok
";
    let mut reader = open(input).unwrap();
    let records: Vec<Record> = reader.records().collect::<toa5::Result<_>>().unwrap();

    assert_eq!(records.len(), 6);
    assert!(records[1].value.is_nan());
    assert!(records[2].value.is_nan());
    assert!(records[4].value.is_nan());
    assert!(records[5].value.is_nan());
    assert_eq!(records[3].value, 2.0);
    assert_eq!(reader.stats().malformed_cells, 4);
}

/// Purpose: Read quoted output as written by LoggerNet
/// Benefit: Quotes and leading spaces do not leak into names or values
#[test]
fn test_quoted_logger_output() {
    let input = r#""TOA5","CR1000_Site","CR1000","12345","CR1000.Std.32.03","CPU:met.CR1","33680","Table10"
"TIMESTAMP","RECORD","BattV_Min"
"TS","RN","Volts"
"","","Min"
"2021-03-01 10:00:00",1, 12.8
"#;
    let mut reader = open(input).unwrap();
    assert_eq!(reader.environment().table, "Table10");

    reader.read().unwrap();
    let record = reader.read().unwrap();
    assert_eq!(record.name, "BattV_Min");
    assert_eq!(record.value, 12.8);
    assert_eq!(record.aggregation, "Min");
}

/// Purpose: Append a data row narrower than the header
/// Benefit: The stream stops with the line number of the bad row
#[test]
fn test_row_width_mismatch() {
    let input = format!("{INPUT}2020-06-08 00:15,2,12.60\n");
    let mut reader = open(&input).unwrap();

    let err = reader
        .records()
        .find_map(|r| r.err())
        .expect("narrow row should fail");
    assert!(matches!(
        err,
        Toa5Error::RowWidthMismatch {
            line: 7,
            expected: 8,
            found: 3
        }
    ));
    assert!(reader.read().unwrap_err().is_end_of_stream());
}

/// Purpose: Construct a reader with no options
/// Benefit: Missing options are reported instead of defaulted
#[test]
fn test_no_options_provided() {
    let err = Reader::with_options(Cursor::new(INPUT.to_string()), None).unwrap_err();
    assert!(matches!(err, Toa5Error::NoOptionsProvided));
}

/// Purpose: Read a sub-second table with fractional timestamps
/// Benefit: Fast tables parse with the default layout
#[test]
fn test_fractional_second_rows() {
    let input = "TOA5,St,CR6,1,OS,Prog,1,Fast
TIMESTAMP,RECORD,Ux
TS,RN,m/s
,,Smp
2020-06-07 23:45:12.5,0,1.5
2020-06-07 23:45:12.75,1,1.6
2020-06-07 23:45:13,2,1.7
";
    let mut reader = open(input).unwrap();
    let records: Vec<Record> = reader.records().collect::<toa5::Result<_>>().unwrap();
    assert_eq!(records.len(), 6);

    let base = Utc.with_ymd_and_hms(2020, 6, 7, 23, 45, 12).unwrap();
    assert_eq!(records[1].value, 1.5);
    assert_eq!(records[1].timestamp, base + chrono::Duration::milliseconds(500));
    assert_eq!(records[3].timestamp, base + chrono::Duration::milliseconds(750));
    assert_eq!(records[5].timestamp, base + chrono::Duration::seconds(1));
}

/// Purpose: Read with a custom delimiter, layout and UTC offset
/// Benefit: Fallback layouts still apply after a custom primary layout
#[test]
fn test_custom_options() {
    let input = "TOA5;Station;CR1000;S11;OS;Prog;4242;Table
TIMESTAMP;AirT
TS;Deg C
;Avg
07/06/2020 23:45:30;18.5
2020-06-08 00:00;18.1
";
    let cest = FixedOffset::east_opt(2 * 3600).unwrap();
    let options = ReaderOptions::default()
        .with_delimiter(';')
        .with_time_layout("%d/%m/%Y %H:%M:%S")
        .with_time_location(cest);

    let mut reader = Reader::with_options(Cursor::new(input.to_string()), Some(options)).unwrap();

    let first = reader.read().unwrap();
    assert_eq!(first.value, 18.5);
    assert_eq!(first.timestamp.offset().local_minus_utc(), 7200);
    assert_eq!(
        first.timestamp,
        Utc.with_ymd_and_hms(2020, 6, 7, 21, 45, 30).unwrap()
    );

    // Falls back to the minute layout
    let second = reader.read().unwrap();
    assert_eq!(second.timestamp, utc(2020, 6, 7, 22, 0));
}

/// Purpose: Use the quote character as delimiter
/// Benefit: Unusable delimiters fail at construction
#[test]
fn test_invalid_delimiter_rejected() {
    let options = ReaderOptions::default().with_delimiter('"');
    let err = Reader::with_options(Cursor::new(INPUT.to_string()), Some(options)).unwrap_err();
    assert!(matches!(err, Toa5Error::Configuration { .. }));
}

/// Purpose: Put an unparseable timestamp in the first data row
/// Benefit: The raw value is kept in the error
#[test]
fn test_bad_first_timestamp_fails_construction() {
    let input = INPUT.replace("2020-06-07 23:45", "07.06.2020");
    let err = open(&input).unwrap_err();
    assert!(matches!(err, Toa5Error::Timestamp { value, .. } if value == "07.06.2020"));
}

/// Purpose: Read a table from a file on disk
/// Benefit: The reader works over buffered file input and returns it afterwards
#[test]
fn test_read_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", INPUT).unwrap();

    let file = std::fs::File::open(temp_file.path()).unwrap();
    let mut reader = Reader::new(std::io::BufReader::new(file)).unwrap();
    let count = reader.records().filter(|r| r.is_ok()).count();
    assert_eq!(count, 4);

    // The caller gets its input back once reading is done
    let _file = reader.into_inner();
}
