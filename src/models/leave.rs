//! Leave application model.
//!
//! This module defines [`LeaveApplication`] and [`LeaveType`] as stored by the
//! leave store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kinds of leave an employee can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    /// Sick leave.
    #[serde(rename = "Sick Leave")]
    Sick,
    /// Vacation leave.
    #[serde(rename = "Vacation Leave")]
    Vacation,
    /// Emergency leave.
    #[serde(rename = "Emergency Leave")]
    Emergency,
}

impl LeaveType {
    /// The label used in the leave file.
    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Sick => "Sick Leave",
            LeaveType::Vacation => "Vacation Leave",
            LeaveType::Emergency => "Emergency Leave",
        }
    }

    /// Parses a label from the leave file; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Sick Leave" => Some(LeaveType::Sick),
            "Vacation Leave" => Some(LeaveType::Vacation),
            "Emergency Leave" => Some(LeaveType::Emergency),
            _ => None,
        }
    }
}

/// A leave application and the amounts credited for it.
///
/// Dates are kept in their `MM/DD/YYYY` text form, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// The employee applying for leave.
    pub employee_id: u32,
    /// The kind of leave; `None` for labels this engine does not recognise.
    pub leave_type: Option<LeaveType>,
    /// First day of leave (`MM/DD/YYYY`).
    pub start_date: String,
    /// Last day of leave (`MM/DD/YYYY`).
    pub end_date: String,
    /// Free-text reason.
    #[serde(default = "default_reason")]
    pub reason: String,
    /// Amount credited as sick leave.
    #[serde(default)]
    pub sick_leave_amount: Decimal,
    /// Amount credited as vacation leave.
    #[serde(default)]
    pub vacation_leave_amount: Decimal,
    /// Amount credited as emergency leave.
    #[serde(default)]
    pub emergency_leave_amount: Decimal,
}

fn default_reason() -> String {
    "No reason provided".to_string()
}

impl LeaveApplication {
    /// Creates an application with all amounts at zero.
    pub fn new(
        employee_id: u32,
        leave_type: LeaveType,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            employee_id,
            leave_type: Some(leave_type),
            start_date: start_date.into(),
            end_date: end_date.into(),
            reason: reason.into(),
            sick_leave_amount: Decimal::ZERO,
            vacation_leave_amount: Decimal::ZERO,
            emergency_leave_amount: Decimal::ZERO,
        }
    }
}
