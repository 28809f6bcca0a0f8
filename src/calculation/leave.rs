//! Leave amount calculation.
//!
//! Credits a leave application with an amount per day of leave, depending on
//! the leave type. Only the amount for the applied type is set; the other two
//! are reset to zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveApplication, LeaveType};

/// Date format used by leave applications.
pub const LEAVE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Amount credited per day of sick or vacation leave.
pub const PAID_LEAVE_DAILY_AMOUNT: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);

/// Amount credited per day of emergency leave.
pub const EMERGENCY_LEAVE_DAILY_AMOUNT: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

impl LeaveType {
    /// The amount credited per day of this kind of leave.
    pub fn daily_amount(&self) -> Decimal {
        match self {
            LeaveType::Sick | LeaveType::Vacation => PAID_LEAVE_DAILY_AMOUNT,
            LeaveType::Emergency => EMERGENCY_LEAVE_DAILY_AMOUNT,
        }
    }
}

/// Returns the number of leave days, counting both endpoints.
///
/// Endpoints entered in reverse order count the same span.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::leave_days;
///
/// assert_eq!(leave_days(10001, "06/03/2024", "06/05/2024").unwrap(), 3);
/// assert_eq!(leave_days(10001, "06/05/2024", "06/03/2024").unwrap(), 3);
/// assert!(leave_days(10001, "June 3", "06/05/2024").is_err());
/// ```
pub fn leave_days(employee_id: u32, start_date: &str, end_date: &str) -> EngineResult<i64> {
    let start = parse_leave_date(employee_id, start_date)?;
    let end = parse_leave_date(employee_id, end_date)?;
    Ok((end - start).num_days().abs() + 1)
}

/// Fills in the leave amounts for an application.
pub fn calculate_leave_amounts(application: &LeaveApplication) -> EngineResult<LeaveApplication> {
    let leave_type = application
        .leave_type
        .ok_or_else(|| EngineError::InvalidLeaveApplication {
            employee_id: application.employee_id,
            message: "leave type is required".to_string(),
        })?;

    let days = leave_days(
        application.employee_id,
        &application.start_date,
        &application.end_date,
    )?;
    let amount = leave_type.daily_amount() * Decimal::from(days);

    let mut computed = application.clone();
    computed.sick_leave_amount = Decimal::ZERO;
    computed.vacation_leave_amount = Decimal::ZERO;
    computed.emergency_leave_amount = Decimal::ZERO;
    match leave_type {
        LeaveType::Sick => computed.sick_leave_amount = amount,
        LeaveType::Vacation => computed.vacation_leave_amount = amount,
        LeaveType::Emergency => computed.emergency_leave_amount = amount,
    }

    tracing::debug!(
        employee_id = application.employee_id,
        leave_type = leave_type.label(),
        days,
        amount = %amount,
        "Calculated leave amount"
    );

    Ok(computed)
}

fn parse_leave_date(employee_id: u32, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), LEAVE_DATE_FORMAT).map_err(|_| {
        EngineError::InvalidLeaveApplication {
            employee_id,
            message: format!("date '{}' is not in MM/DD/YYYY form", value),
        }
    })
}
