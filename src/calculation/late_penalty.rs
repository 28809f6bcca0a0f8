//! Late arrival penalty calculation.
//!
//! This module flags clock-ins at or after the 08:11 cutoff and charges a
//! fixed amount per late minute.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::models::{AttendanceRecord, AuditStep, DateRange};

/// Hour component of the late cutoff.
pub const LATE_CUTOFF_HOUR: u32 = 8;

/// Minute component of the late cutoff.
pub const LATE_CUTOFF_MINUTE: u32 = 11;

/// Penalty charged per late minute.
pub const LATE_PENALTY_PER_MINUTE: Decimal = Decimal::from_parts(166, 0, 0, false, 2);

/// The result of computing late penalties for a pay period.
#[derive(Debug, Clone)]
pub struct LatePenaltyResult {
    /// Total penalty across all late records.
    pub penalty: Decimal,
    /// Number of records flagged late.
    pub late_records: usize,
    /// Sum of late minutes across flagged records.
    pub late_minutes: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns true when a clock-in is at or after the cutoff.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::arrived_late;
/// use chrono::NaiveTime;
///
/// assert!(!arrived_late(NaiveTime::from_hms_opt(8, 10, 0).unwrap()));
/// assert!(arrived_late(NaiveTime::from_hms_opt(8, 11, 0).unwrap()));
/// assert!(arrived_late(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
/// ```
pub fn arrived_late(time_in: NaiveTime) -> bool {
    let hour = time_in.hour();
    hour > LATE_CUTOFF_HOUR || (hour == LATE_CUTOFF_HOUR && time_in.minute() >= LATE_CUTOFF_MINUTE)
}

/// Returns the late minutes for a clock-in, or `None` if it was on time.
///
/// A clock-in exactly at the cutoff is late by zero minutes.
pub fn late_minutes(time_in: NaiveTime) -> Option<i64> {
    if !arrived_late(time_in) {
        return None;
    }
    let hours_past = i64::from(time_in.hour()) - i64::from(LATE_CUTOFF_HOUR);
    let minutes_past = i64::from(time_in.minute()) - i64::from(LATE_CUTOFF_MINUTE);
    Some(hours_past * 60 + minutes_past)
}

/// Sums the late penalty for an employee's records within a date range.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_late_penalty;
/// use payroll_engine::models::{AttendanceRecord, DateRange};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let range = DateRange::month_range(2024, 6).unwrap();
/// let records = vec![AttendanceRecord {
///     employee_id: 10001,
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     time_in: NaiveTime::from_hms_opt(8, 21, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
/// }];
///
/// let result = calculate_late_penalty(&records, 10001, &range, 1);
/// assert_eq!(result.late_minutes, 10);
/// assert_eq!(result.penalty, Decimal::new(166, 1)); // 16.6
/// ```
pub fn calculate_late_penalty(
    records: &[AttendanceRecord],
    employee_id: u32,
    range: &DateRange,
    step_number: u32,
) -> LatePenaltyResult {
    let mut late_records = 0;
    let mut total_late_minutes: i64 = 0;

    for record in records
        .iter()
        .filter(|r| r.is_for(employee_id) && range.contains(r.date))
    {
        if let Some(minutes) = late_minutes(record.time_in) {
            tracing::debug!(
                employee_id,
                date = %record.date,
                time_in = %record.time_in,
                minutes,
                "Late arrival"
            );
            late_records += 1;
            total_late_minutes += minutes;
        }
    }

    let penalty = Decimal::from(total_late_minutes) * LATE_PENALTY_PER_MINUTE;

    let audit_step = AuditStep {
        step_number,
        rule_id: "late_penalty".to_string(),
        rule_name: "Late Arrival Penalty".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "cutoff": format!("{:02}:{:02}", LATE_CUTOFF_HOUR, LATE_CUTOFF_MINUTE),
            "rate_per_minute": LATE_PENALTY_PER_MINUTE.to_string()
        }),
        output: serde_json::json!({
            "late_records": late_records,
            "late_minutes": total_late_minutes,
            "penalty": penalty.normalize().to_string()
        }),
        reasoning: format!(
            "{} late arrivals, {} minutes x {} = {}",
            late_records,
            total_late_minutes,
            LATE_PENALTY_PER_MINUTE,
            penalty.normalize()
        ),
    };

    LatePenaltyResult {
        penalty,
        late_records,
        late_minutes: total_late_minutes,
        audit_step,
    }
}
