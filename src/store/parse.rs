//! CSV field helpers shared by the record stores.
//!
//! Text fields are trimmed. Numeric fields are lenient: thousands separators
//! are stripped and an unparseable value becomes zero with a warning, so one
//! bad cell never aborts a whole file.

use std::fs::File;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Position of a row within its source, for error and log context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowContext<'a> {
    pub source_name: &'a str,
    pub line: u64,
}

impl<'a> RowContext<'a> {
    pub fn new(source_name: &'a str, record: &csv::StringRecord) -> Self {
        Self {
            source_name,
            line: record.position().map_or(0, |p| p.line()),
        }
    }

    /// Fails with `RowLength` unless the row has exactly `expected` fields.
    pub fn check_length(&self, record: &csv::StringRecord, expected: usize) -> EngineResult<()> {
        if record.len() == expected {
            Ok(())
        } else {
            Err(EngineError::RowLength {
                source_name: self.source_name.to_string(),
                line: self.line,
                expected,
                found: record.len(),
            })
        }
    }

    pub fn invalid(&self, field: &str, value: &str) -> EngineError {
        EngineError::InvalidRecord {
            source_name: self.source_name.to_string(),
            line: self.line,
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub(crate) fn get_string_field(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Parses a money amount such as `"90,000.00"`; zero when unparseable.
pub(crate) fn get_money_field(
    record: &csv::StringRecord,
    index: usize,
    field: &str,
    row: &RowContext<'_>,
) -> Decimal {
    let raw = record.get(index).unwrap_or_default();
    parse_money(raw).unwrap_or_else(|| {
        tracing::warn!(
            source = row.source_name,
            line = row.line,
            field,
            value = raw,
            "Unparseable amount, using 0"
        );
        Decimal::ZERO
    })
}

/// Parses an employee number; zero when unparseable.
pub(crate) fn get_employee_number(
    record: &csv::StringRecord,
    index: usize,
    row: &RowContext<'_>,
) -> u32 {
    let raw = record.get(index).unwrap_or_default();
    raw.trim().parse::<u32>().unwrap_or_else(|_| {
        tracing::warn!(
            source = row.source_name,
            line = row.line,
            value = raw,
            "Unparseable employee number, using 0"
        );
        0
    })
}

pub(crate) fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<Decimal>().ok()
}

/// Formats a money amount with thousands separators and two decimals.
pub(crate) fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub(crate) fn open_reader(path: &Path) -> EngineResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| data_source_error(path, e))
}

pub(crate) fn data_source_error(path: &Path, error: impl std::fmt::Display) -> EngineError {
    EngineError::DataSourceError {
        source_name: path.display().to_string(),
        message: error.to_string(),
    }
}
