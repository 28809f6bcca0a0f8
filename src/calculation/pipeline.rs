//! Wage calculation pipeline.
//!
//! Chains hours aggregation, late penalty, and the four statutory deductions
//! into a [`WageCalculation`]. Every rule contributes one numbered audit step.

use crate::error::EngineResult;
use crate::models::{AuditTrace, DateRange, WageBreakdown, WageCalculation};
use crate::store::{AttendanceStore, EmployeeStore};

use super::contribution_rules::ContributionRule;
use super::late_penalty::calculate_late_penalty;
use super::social_insurance::DeductionSchedule;
use super::time_aggregation::aggregate_hours;
use super::withholding_tax::calculate_withholding_tax;

/// Computes wages against a resolved social-insurance schedule.
#[derive(Debug, Clone)]
pub struct WageCalculator<'a> {
    social_insurance: &'a DeductionSchedule,
    health_insurance: ContributionRule,
    housing_fund: ContributionRule,
}

impl<'a> WageCalculator<'a> {
    /// Creates a calculator with the standard health-insurance and housing-fund rules.
    pub fn new(social_insurance: &'a DeductionSchedule) -> Self {
        Self {
            social_insurance,
            health_insurance: ContributionRule::health_insurance(),
            housing_fund: ContributionRule::housing_fund(),
        }
    }

    /// Calculates one employee's wage for a date range.
    ///
    /// Fails before any computation when the employee has no hourly rate on
    /// record or the attendance store cannot be read.
    pub fn calculate_wage(
        &self,
        employees: &dyn EmployeeStore,
        attendance: &dyn AttendanceStore,
        employee_id: u32,
        range: &DateRange,
    ) -> EngineResult<WageCalculation> {
        let hourly_rate = employees.hourly_rate(employee_id)?;
        let records = attendance.all_records()?;

        let mut trace = AuditTrace::default();
        let mut step_number: u32 = 1;

        let hours = aggregate_hours(&records, employee_id, range, step_number);
        trace.steps.push(hours.audit_step);
        trace.warnings.extend(hours.warnings);
        step_number += 1;

        let gross_wage = hourly_rate * hours.hours_for_calculation;
        trace.steps.push(crate::models::AuditStep {
            step_number,
            rule_id: "gross_wage".to_string(),
            rule_name: "Gross Wage".to_string(),
            input: serde_json::json!({
                "hourly_rate": hourly_rate.normalize().to_string(),
                "hours": hours.hours_for_calculation.normalize().to_string()
            }),
            output: serde_json::json!({
                "gross_wage": gross_wage.normalize().to_string()
            }),
            reasoning: format!(
                "{} x {} hours = {}",
                hourly_rate.normalize(),
                hours.hours_for_calculation.round_dp(2).normalize(),
                gross_wage.round_dp(2).normalize()
            ),
        });
        step_number += 1;

        let late = calculate_late_penalty(&records, employee_id, range, step_number);
        trace.steps.push(late.audit_step);
        step_number += 1;

        let social = self.social_insurance.apply(gross_wage, step_number);
        trace.steps.push(social.audit_step);
        trace.warnings.extend(social.warning);
        step_number += 1;

        let health = self.health_insurance.apply(gross_wage, step_number);
        trace.steps.push(health.audit_step);
        step_number += 1;

        let housing = self.housing_fund.apply(gross_wage, step_number);
        trace.steps.push(housing.audit_step);
        step_number += 1;

        let tax = calculate_withholding_tax(
            gross_wage,
            self.social_insurance,
            &self.health_insurance,
            &self.housing_fund,
            step_number,
        );
        trace.steps.push(tax.audit_step);

        let breakdown = WageBreakdown::compose(
            gross_wage,
            social.amount,
            health.amount,
            housing.amount,
            tax.tax,
            late.penalty,
        );

        tracing::info!(
            employee_id,
            start = %range.start(),
            end = %range.end(),
            used_assumed_hours = hours.used_assumed_hours,
            gross_wage = %breakdown.gross_wage().round_dp(2),
            net_wage = %breakdown.net_wage().round_dp(2),
            warnings = trace.warnings.len(),
            "Wage calculation completed"
        );

        Ok(WageCalculation {
            employee_id,
            date_range: *range,
            hourly_rate,
            hours_worked: hours.hours_worked,
            hours_for_calculation: hours.hours_for_calculation,
            used_assumed_hours: hours.used_assumed_hours,
            breakdown,
            audit_trace: trace,
        })
    }
}

/// Calculates a wage with the standard rules; see [`WageCalculator::calculate_wage`].
pub fn calculate_wage(
    schedule: &DeductionSchedule,
    employees: &dyn EmployeeStore,
    attendance: &dyn AttendanceStore,
    employee_id: u32,
    range: &DateRange,
) -> EngineResult<WageCalculation> {
    WageCalculator::new(schedule).calculate_wage(employees, attendance, employee_id, range)
}
