//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every structural failure the engine and its record stores can report.
//! Field-level numeric parse failures are not errors: stores recover them
//! locally by substituting zero.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound { employee_id: 10001 };
/// assert_eq!(error.to_string(), "Hourly rate not found for employee number: 10001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date range was constructed with its end before its start.
    #[error("End date {end} must be on or after the start date {start}")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A month number outside 1-12, or text that is not a month.
    #[error("Invalid month: {value}")]
    InvalidMonth {
        /// The offending input.
        value: String,
    },

    /// Month/day text that does not name a calendar day.
    #[error("Invalid date: {value} (expected MM/DD)")]
    InvalidDate {
        /// The offending input.
        value: String,
    },

    /// No hourly rate is on record for the employee.
    #[error("Hourly rate not found for employee number: {employee_id}")]
    EmployeeNotFound {
        /// The employee number that was looked up.
        employee_id: u32,
    },

    /// A deduction tier row was structurally invalid; the whole table load is aborted.
    #[error("Malformed deduction schedule row {line}: {message}")]
    MalformedScheduleRow {
        /// The 1-based line number in the source.
        line: u64,
        /// A description of what was wrong with the row.
        message: String,
    },

    /// A store row had the wrong number of fields.
    #[error("Invalid data length in '{source_name}' line {line}: expected {expected} fields but got {found}")]
    RowLength {
        /// The store (usually a file path) the row came from.
        source_name: String,
        /// The 1-based line number in the source.
        line: u64,
        /// The number of fields the store expects.
        expected: usize,
        /// The number of fields actually present.
        found: usize,
    },

    /// A store row had a date or time field that could not be parsed.
    #[error("Invalid {field} '{value}' in '{source_name}' line {line}")]
    InvalidRecord {
        /// The store the row came from.
        source_name: String,
        /// The 1-based line number in the source.
        line: u64,
        /// The name of the field that failed to parse.
        field: String,
        /// The raw field value.
        value: String,
    },

    /// A leave application was missing a leave type or had an unparseable date.
    #[error("Invalid leave application for employee number {employee_id}: {message}")]
    InvalidLeaveApplication {
        /// The applying employee.
        employee_id: u32,
        /// A description of what was wrong.
        message: String,
    },

    /// A record already exists for the given employee.
    #[error("Record already exists for employee number: {employee_id}")]
    DuplicateRecord {
        /// The employee number of the existing record.
        employee_id: u32,
    },

    /// An underlying data source could not be read or written.
    #[error("Data source error for '{source_name}': {message}")]
    DataSourceError {
        /// The store or file that failed.
        source_name: String,
        /// A description of the I/O or CSV failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_displays_both_dates() {
        let error = EngineError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "End date 2024-06-01 must be on or after the start date 2024-06-10"
        );
    }

    #[test]
    fn test_invalid_month_displays_value() {
        let error = EngineError::InvalidMonth {
            value: "13".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid month: 13");

        let error = EngineError::InvalidDate {
            value: "02/30".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid date: 02/30 (expected MM/DD)");
    }

    #[test]
    fn test_employee_not_found_displays_number() {
        let error = EngineError::EmployeeNotFound { employee_id: 99999 };
        assert_eq!(
            error.to_string(),
            "Hourly rate not found for employee number: 99999"
        );
    }

    #[test]
    fn test_malformed_schedule_row_displays_line_and_message() {
        let error = EngineError::MalformedScheduleRow {
            line: 4,
            message: "expected 3 columns but got 2".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed deduction schedule row 4: expected 3 columns but got 2"
        );
    }

    #[test]
    fn test_row_length_displays_counts() {
        let error = EngineError::RowLength {
            source_name: "attendance.csv".to_string(),
            line: 7,
            expected: 6,
            found: 5,
        };
        assert_eq!(
            error.to_string(),
            "Invalid data length in 'attendance.csv' line 7: expected 6 fields but got 5"
        );
    }

    #[test]
    fn test_duplicate_record_displays_number() {
        let error = EngineError::DuplicateRecord { employee_id: 10001 };
        assert_eq!(
            error.to_string(),
            "Record already exists for employee number: 10001"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound { employee_id: 1 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
