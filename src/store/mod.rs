//! Record stores for employees, attendance, and leave applications.
//!
//! The wage pipeline only needs two narrow capabilities, expressed as the
//! [`EmployeeStore`] and [`AttendanceStore`] traits. The CSV-backed stores
//! implement them over the flat files the payroll office maintains; plain
//! vectors implement them too, for callers that already hold the records.

mod csv_attendance;
mod csv_employee;
mod csv_leave;
mod parse;

pub use csv_attendance::{ATTENDANCE_COLUMNS, CsvAttendanceStore};
pub use csv_employee::{CsvEmployeeStore, EMPLOYEE_COLUMNS, EMPLOYEE_HEADER};
pub use csv_leave::{CsvLeaveStore, LEAVE_COLUMNS, LEAVE_HEADER};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Employee};

/// Looks up the hourly rate on record for an employee.
pub trait EmployeeStore {
    /// Returns the hourly rate, or `EmployeeNotFound` when there is no record.
    fn hourly_rate(&self, employee_id: u32) -> EngineResult<Decimal>;
}

/// Supplies every attendance record on file, in file order.
pub trait AttendanceStore {
    /// Returns all attendance records.
    fn all_records(&self) -> EngineResult<Vec<AttendanceRecord>>;
}

impl EmployeeStore for [Employee] {
    fn hourly_rate(&self, employee_id: u32) -> EngineResult<Decimal> {
        self.iter()
            .find(|e| e.employee_id == employee_id)
            .map(|e| e.hourly_rate)
            .ok_or(EngineError::EmployeeNotFound { employee_id })
    }
}

impl EmployeeStore for Vec<Employee> {
    fn hourly_rate(&self, employee_id: u32) -> EngineResult<Decimal> {
        self.as_slice().hourly_rate(employee_id)
    }
}

impl AttendanceStore for [AttendanceRecord] {
    fn all_records(&self) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self.to_vec())
    }
}

impl AttendanceStore for Vec<AttendanceRecord> {
    fn all_records(&self) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_employee_store_finds_rate() {
        let employees = vec![Employee {
            employee_id: 10001,
            hourly_rate: Decimal::new(53571, 2),
            ..Default::default()
        }];
        assert_eq!(employees.hourly_rate(10001).unwrap(), Decimal::new(53571, 2));
        assert!(matches!(
            employees.hourly_rate(99999),
            Err(EngineError::EmployeeNotFound { employee_id: 99999 })
        ));
    }

    #[test]
    fn test_vec_attendance_store_returns_all() {
        let records: Vec<AttendanceRecord> = Vec::new();
        assert!(records.all_records().unwrap().is_empty());
    }
}
