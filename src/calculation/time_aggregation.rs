//! Worked-hours aggregation.
//!
//! This module sums attendance into worked hours for one employee over a
//! date range, and supplies the assumed-hours baseline used when an employee
//! has no attendance on file for the period.

use rust_decimal::Decimal;

use crate::models::{AttendanceRecord, AuditStep, AuditWarning, DateRange};

/// Hours assumed for every calendar day of a range without attendance.
pub const ASSUMED_HOURS_PER_DAY: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// The result of aggregating hours for a pay period.
#[derive(Debug, Clone)]
pub struct HoursAggregation {
    /// Sum of worked hours over matching records.
    pub hours_worked: Decimal,
    /// The assumed-hours baseline for the range.
    pub assumed_hours: Decimal,
    /// Hours to multiply the hourly rate by.
    pub hours_for_calculation: Decimal,
    /// Whether `assumed_hours` replaced `hours_worked`.
    pub used_assumed_hours: bool,
    /// Number of records that matched the employee and range.
    pub records_counted: usize,
    /// Warnings for records with a negative duration.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Sums worked hours for an employee's records within a date range.
///
/// Records for other employees or outside the range are skipped. Each
/// record contributes `time_out - time_in`; a negative contribution from a
/// clock-out earlier than the clock-in is kept, not clamped.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::total_hours_worked;
/// use payroll_engine::models::{AttendanceRecord, DateRange};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let range = DateRange::month_range(2024, 6).unwrap();
/// let records = vec![AttendanceRecord {
///     employee_id: 10001,
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     time_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
/// }];
///
/// assert_eq!(total_hours_worked(&records, 10001, &range), Decimal::new(85, 1));
/// assert_eq!(total_hours_worked(&records, 10002, &range), Decimal::ZERO);
/// ```
pub fn total_hours_worked(
    records: &[AttendanceRecord],
    employee_id: u32,
    range: &DateRange,
) -> Decimal {
    matching_records(records, employee_id, range)
        .map(AttendanceRecord::worked_hours)
        .sum()
}

/// Returns the assumed hours for a range: 9 hours per calendar day, both
/// endpoints included.
pub fn assumed_hours_worked(range: &DateRange) -> Decimal {
    ASSUMED_HOURS_PER_DAY * Decimal::from(range.inclusive_day_count())
}

/// Aggregates hours and decides which figure the gross wage is based on.
///
/// Aggregated hours are used as-is whenever they are positive, however small.
/// Otherwise (no matching attendance, or records netting to a non-positive
/// total) the assumed-hours baseline is used instead.
pub fn aggregate_hours(
    records: &[AttendanceRecord],
    employee_id: u32,
    range: &DateRange,
    step_number: u32,
) -> HoursAggregation {
    let mut hours_worked = Decimal::ZERO;
    let mut records_counted = 0;
    let mut warnings = Vec::new();

    for record in matching_records(records, employee_id, range) {
        let hours = record.worked_hours();
        if hours < Decimal::ZERO {
            tracing::warn!(
                employee_id,
                date = %record.date,
                time_in = %record.time_in,
                time_out = %record.time_out,
                "Attendance record has clock-out before clock-in"
            );
            warnings.push(AuditWarning {
                code: "NEGATIVE_RECORD_HOURS".to_string(),
                message: format!(
                    "Record on {} has time-out {} before time-in {}; {} hours counted",
                    record.date,
                    record.time_out.format("%H:%M"),
                    record.time_in.format("%H:%M"),
                    hours.round_dp(2)
                ),
                severity: "medium".to_string(),
            });
        }
        hours_worked += hours;
        records_counted += 1;
    }

    let assumed_hours = assumed_hours_worked(range);
    let used_assumed_hours = hours_worked <= Decimal::ZERO;
    let hours_for_calculation = if used_assumed_hours {
        assumed_hours
    } else {
        hours_worked
    };

    let reasoning = if used_assumed_hours {
        format!(
            "{} matching records totalling {} hours; using assumed {} days x {} hours = {} hours",
            records_counted,
            hours_worked.normalize(),
            range.inclusive_day_count(),
            ASSUMED_HOURS_PER_DAY,
            assumed_hours.normalize()
        )
    } else {
        format!(
            "{} matching records totalling {} hours",
            records_counted,
            hours_worked.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "hours_aggregation".to_string(),
        rule_name: "Hours Aggregation".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "start_date": range.start().to_string(),
            "end_date": range.end().to_string(),
            "records_scanned": records.len()
        }),
        output: serde_json::json!({
            "records_counted": records_counted,
            "hours_worked": hours_worked.normalize().to_string(),
            "assumed_hours": assumed_hours.normalize().to_string(),
            "hours_for_calculation": hours_for_calculation.normalize().to_string(),
            "used_assumed_hours": used_assumed_hours
        }),
        reasoning,
    };

    HoursAggregation {
        hours_worked,
        assumed_hours,
        hours_for_calculation,
        used_assumed_hours,
        records_counted,
        warnings,
        audit_step,
    }
}

fn matching_records<'a>(
    records: &'a [AttendanceRecord],
    employee_id: u32,
    range: &'a DateRange,
) -> impl Iterator<Item = &'a AttendanceRecord> {
    records
        .iter()
        .filter(move |r| r.is_for(employee_id) && range.contains(r.date))
}
