//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod date_range;
mod employee;
mod leave;
mod wage_breakdown;

pub use attendance::AttendanceRecord;
pub use date_range::{DateRange, format_month_day, parse_month_day};
pub use employee::Employee;
pub use leave::{LeaveApplication, LeaveType};
pub use wage_breakdown::{AuditStep, AuditTrace, AuditWarning, WageBreakdown, WageCalculation};
