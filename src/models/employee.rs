//! Employee model.
//!
//! This module defines the Employee struct that mirrors one row of the
//! employee information file.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee record as held by the employee store.
///
/// Only `hourly_rate` feeds the wage calculation; the remaining fields are
/// carried so that records survive a read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee number.
    pub employee_id: u32,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Date of birth, if known.
    pub birthday: Option<NaiveDate>,
    /// Postal address.
    pub address: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Social-insurance membership number.
    pub sss_number: String,
    /// Health-insurance membership number.
    pub philhealth_number: String,
    /// Tax identification number.
    pub tin: String,
    /// Housing-fund membership number.
    pub pagibig_number: String,
    /// Employment status (e.g., "Regular", "Probationary").
    pub status: String,
    /// Job title.
    pub position: String,
    /// Name of the immediate supervisor.
    pub immediate_supervisor: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Monthly rice subsidy.
    pub rice_subsidy: Decimal,
    /// Monthly phone allowance.
    pub phone_allowance: Decimal,
    /// Monthly clothing allowance.
    pub clothing_allowance: Decimal,
    /// Gross semi-monthly rate.
    pub gross_semimonthly_rate: Decimal,
    /// Hourly rate used for gross wage.
    pub hourly_rate: Decimal,
}

impl Employee {
    /// Returns "First Last" for display and log fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    ///
    /// let employee = Employee {
    ///     employee_id: 10001,
    ///     last_name: "Garcia".to_string(),
    ///     first_name: "Manuel III".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(employee.full_name(), "Manuel III Garcia");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
