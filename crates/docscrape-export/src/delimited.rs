//! `;`-separated CSV export, UTF-8 with byte-order mark.
//!
//! The BOM and the semicolon make the file open correctly in spreadsheet
//! programs with a German locale.

use std::io::{Read, Write};

use docscrape_core::{Field, Record, StatusMarker};

use crate::error::ExportError;
use crate::table::Table;

pub const CSV_DELIMITER: u8 = b';';
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Writes `table` as CSV to `writer`, BOM first.
///
/// # Errors
///
/// Returns [`ExportError::Io`] or [`ExportError::Csv`] if writing fails.
pub fn write_csv<W: Write>(mut writer: W, table: &Table) -> Result<(), ExportError> {
    writer.write_all(UTF8_BOM.as_bytes())?;

    let mut out = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(writer);
    if !table.columns().is_empty() {
        out.write_record(table.header())?;
        for row in table.rows() {
            out.write_record(row)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// The CSV file as bytes.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if a row cannot be serialized.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table)?;
    Ok(buf)
}

/// Reads a file written by [`write_csv`] back into records.
///
/// A row whose name cell is a [`StatusMarker`] is degraded: its empty cells
/// are absent fields. On any other row an empty cell is a value (the empty
/// sentinel), except in the error column, which only degraded rows carry.
///
/// # Errors
///
/// - [`ExportError::Io`] / [`ExportError::Csv`] on malformed input.
/// - [`ExportError::Core`] if a header names no known column.
pub fn read_csv<R: Read>(mut reader: R) -> Result<Vec<Record>, ExportError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let body = raw
        .strip_prefix(UTF8_BOM.as_bytes())
        .unwrap_or(raw.as_slice());

    let mut rows = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_reader(body);
    let columns = rows
        .headers()?
        .iter()
        .map(Field::from_header)
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    for row in rows.records() {
        let row = row?;
        let degraded = columns
            .iter()
            .zip(row.iter())
            .any(|(field, value)| {
                *field == Field::Name && StatusMarker::from_label(value).is_some()
            });
        let fields = columns
            .iter()
            .zip(row.iter())
            .filter(|(field, value)| {
                let absent = degraded || **field == Field::Error;
                !(value.is_empty() && absent)
            })
            .map(|(field, value)| (*field, value.to_owned()));
        records.push(Record::from_fields(fields));
    }
    Ok(records)
}
