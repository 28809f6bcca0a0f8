//! CSV-backed attendance store.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, parse_month_day};

use super::AttendanceStore;
use super::parse::{RowContext, data_source_error, get_employee_number, get_string_field, open_reader};

/// Number of fields in an attendance row:
/// `Employee #, Last Name, First Name, Date, Log In, Log Out`.
pub const ATTENDANCE_COLUMNS: usize = 6;

const TIME_FORMAT: &str = "%H:%M";

/// Attendance records held in a 6-column CSV file with a header row.
///
/// Dates in the file are `MM/DD` and are resolved against the payroll year
/// the store was created with.
#[derive(Debug, Clone)]
pub struct CsvAttendanceStore {
    path: PathBuf,
    year: i32,
}

impl CsvAttendanceStore {
    /// Creates a store over the file at `path` for the given payroll year.
    pub fn new<P: AsRef<Path>>(path: P, year: i32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            year,
        }
    }

    /// The payroll year dates are resolved against.
    pub fn year(&self) -> i32 {
        self.year
    }
}

impl AttendanceStore for CsvAttendanceStore {
    fn all_records(&self) -> EngineResult<Vec<AttendanceRecord>> {
        let source_name = self.path.display().to_string();
        let mut reader = open_reader(&self.path)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| data_source_error(&self.path, e))?;
            let row = RowContext::new(&source_name, &record);
            row.check_length(&record, ATTENDANCE_COLUMNS)?;

            let date_text = get_string_field(&record, 3);
            let date =
                parse_month_day(&date_text, self.year).map_err(|_| row.invalid("Date", &date_text))?;

            let time_in_text = get_string_field(&record, 4);
            let time_in = NaiveTime::parse_from_str(&time_in_text, TIME_FORMAT)
                .map_err(|_| row.invalid("Log In", &time_in_text))?;

            let time_out_text = get_string_field(&record, 5);
            let time_out = NaiveTime::parse_from_str(&time_out_text, TIME_FORMAT)
                .map_err(|_| row.invalid("Log Out", &time_out_text))?;

            records.push(AttendanceRecord {
                employee_id: get_employee_number(&record, 0, &row),
                date,
                time_in,
                time_out,
            });
        }

        tracing::debug!(source = %source_name, count = records.len(), "Read attendance records");
        Ok(records)
    }
}
