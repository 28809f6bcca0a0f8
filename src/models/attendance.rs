//! Attendance record model.
//!
//! This module defines the [`AttendanceRecord`] struct, one clock-in/clock-out
//! pair for one employee on one day, as produced by the attendance store.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single day of attendance for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee number the record belongs to.
    pub employee_id: u32,
    /// The day the record applies to.
    pub date: NaiveDate,
    /// The clock-in time.
    pub time_in: NaiveTime,
    /// The clock-out time.
    pub time_out: NaiveTime,
}

impl AttendanceRecord {
    /// Returns the worked hours for this record as a Decimal.
    ///
    /// There is no cross-midnight handling: a clock-out earlier than the
    /// clock-in yields a negative value, which callers must not clamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::AttendanceRecord;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let record = AttendanceRecord {
    ///     employee_id: 10001,
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ///     time_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     time_out: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
    /// };
    /// assert_eq!(record.worked_hours(), Decimal::new(95, 1)); // 9.5 hours
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        let worked_minutes = (self.time_out - self.time_in).num_minutes();
        Decimal::new(worked_minutes, 0) / Decimal::new(60, 0)
    }

    /// Returns true if the record belongs to the given employee.
    pub fn is_for(&self, employee_id: u32) -> bool {
        self.employee_id == employee_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_in: (u32, u32), time_out: (u32, u32)) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: 10001,
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            time_in: NaiveTime::from_hms_opt(time_in.0, time_in.1, 0).unwrap(),
            time_out: NaiveTime::from_hms_opt(time_out.0, time_out.1, 0).unwrap(),
        }
    }

    #[test]
    fn test_full_day_hours() {
        assert_eq!(record((8, 0), (17, 0)).worked_hours(), Decimal::new(9, 0));
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(
            record((8, 15), (17, 0)).worked_hours(),
            Decimal::new(875, 2)
        ); // 8.75
    }

    #[test]
    fn test_zero_duration_record() {
        assert_eq!(record((9, 0), (9, 0)).worked_hours(), Decimal::ZERO);
    }

    #[test]
    fn test_time_out_before_time_in_is_negative() {
        // 22:00 -> 06:00 in one record is not treated as an overnight shift
        assert_eq!(record((22, 0), (6, 0)).worked_hours(), Decimal::new(-16, 0));
    }

    #[test]
    fn test_is_for_matches_employee() {
        let r = record((8, 0), (17, 0));
        assert!(r.is_for(10001));
        assert!(!r.is_for(10002));
    }

    #[test]
    fn test_attendance_record_serialization() {
        let r = record((8, 5), (17, 2));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"date\":\"2024-06-03\""));
        assert!(json.contains("\"time_in\":\"08:05:00\""));
        let deserialized: AttendanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }
}
