//! Request types for the payroll engine API.
//!
//! This module defines the JSON request bodies for the `/wage` and `/leave`
//! endpoints.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{DateRange, LeaveApplication, LeaveType};

/// Request body for the `/wage` endpoint.
///
/// The period is either a whole month or an explicit pair of endpoints:
///
/// ```json
/// { "employee_id": 10001, "month": "06" }
/// { "employee_id": 10001, "start_date": "06/03", "end_date": "06/07" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageRequest {
    /// The employee to calculate for.
    pub employee_id: u32,
    /// The period to calculate over.
    #[serde(flatten)]
    pub period: PeriodRequest,
}

/// The period of a wage request, in the payroll year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodRequest {
    /// A whole month, `"MM"`.
    Month {
        /// Month number, `1`–`12`.
        month: String,
    },
    /// Two inclusive `"MM/DD"` endpoints.
    Range {
        /// First day of the period.
        start_date: String,
        /// Last day of the period.
        end_date: String,
    },
}

impl PeriodRequest {
    /// Resolves the period to a date range in `year`.
    pub fn resolve(&self, year: i32) -> EngineResult<DateRange> {
        match self {
            PeriodRequest::Month { month } => DateRange::parse_month(month, year),
            PeriodRequest::Range {
                start_date,
                end_date,
            } => DateRange::parse_endpoints(start_date, end_date, year),
        }
    }
}

/// Request body for the `/leave` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The applying employee.
    pub employee_id: u32,
    /// `"Sick Leave"`, `"Vacation Leave"`, or `"Emergency Leave"`.
    pub leave_type: LeaveType,
    /// First day of leave, `MM/DD/YYYY`.
    pub start_date: String,
    /// Last day of leave, `MM/DD/YYYY`.
    pub end_date: String,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<LeaveRequest> for LeaveApplication {
    fn from(req: LeaveRequest) -> Self {
        LeaveApplication::new(
            req.employee_id,
            req.leave_type,
            req.start_date,
            req.end_date,
            req.reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "No reason provided".to_string()),
        )
    }
}
