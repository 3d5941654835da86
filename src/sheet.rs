//! MobilePay Excel export parsing
//!
//! The export has one payment per row on the first worksheet, columns in a
//! fixed order:
//!
//! | A    | B    | C       | D      |
//! |------|------|---------|--------|
//! | date | name | message | amount |
//!
//! Rows that do not fit that shape (header rows, blank lines, totals) are
//! skipped and counted, not treated as errors.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("no rows with date, name and amount found")]
    NoRecords,
}

/// One payment row
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRecord {
    pub date: NaiveDateTime,
    pub name: String,
    pub message: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    /// Records in sheet order
    pub records: Vec<SheetRecord>,
    pub skipped_rows: usize,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Parses a workbook held in memory
pub fn parse_records_from_bytes(bytes: Vec<u8>) -> Result<ParsedSheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoWorksheet)??;
    collect_records(range.rows())
}

/// Parses a workbook on disk
pub fn parse_records_from_path(path: impl AsRef<Path>) -> Result<ParsedSheet, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoWorksheet)??;
    collect_records(range.rows())
}

fn collect_records<'a>(rows: impl Iterator<Item = &'a [Data]>) -> Result<ParsedSheet, SheetError> {
    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (idx, row) in rows.enumerate() {
        match parse_row(row) {
            Some(record) => records.push(record),
            None => {
                log::debug!("Skipping sheet row {}: {:?}", idx + 1, row);
                skipped_rows += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(SheetError::NoRecords);
    }

    Ok(ParsedSheet { records, skipped_rows })
}

fn parse_row(row: &[Data]) -> Option<SheetRecord> {
    let date = cell_datetime(row.first()?)?;
    let name = cell_text(row.get(1)?).filter(|n| !n.is_empty())?;
    let message = row.get(2).and_then(cell_text).unwrap_or_default();
    let amount = cell_amount(row.get(3)?)?;

    Some(SheetRecord {
        date,
        name,
        message,
        amount,
    })
}

fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_datetime_str(s),
        _ => None,
    }
}

fn parse_datetime_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Empty => Some(String::new()),
        _ => None,
    }
}

fn cell_amount(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        // Finnish exports may use a decimal comma
        Data::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|a| a.is_finite())
}
