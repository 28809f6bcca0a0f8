//! Wage calculation result models.
//!
//! This module contains the [`WageBreakdown`] produced by the wage pipeline,
//! and the [`WageCalculation`] envelope that pairs it with the hours used and
//! an audit trace of every rule that fired.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DateRange;

/// The eight-field result of a wage calculation.
///
/// A breakdown is composed in one step from the gross wage and the individual
/// deductions; the totals are derived, never set independently.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WageBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = WageBreakdown::compose(
///     Decimal::new(10000, 0), // gross
///     Decimal::new(500, 0),   // social insurance
///     Decimal::new(150, 0),   // health insurance
///     Decimal::new(100, 0),   // housing fund
///     Decimal::ZERO,          // withholding tax
///     Decimal::new(50, 0),    // late penalty
/// );
/// assert_eq!(breakdown.total_deductions(), Decimal::new(800, 0));
/// assert_eq!(breakdown.net_wage(), Decimal::new(9200, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageBreakdown {
    gross_wage: Decimal,
    social_insurance: Decimal,
    health_insurance: Decimal,
    housing_fund: Decimal,
    withholding_tax: Decimal,
    late_penalty: Decimal,
    total_deductions: Decimal,
    net_wage: Decimal,
}

impl WageBreakdown {
    /// Composes a breakdown, deriving the total deductions and the net wage.
    ///
    /// The net wage is floored at zero.
    pub fn compose(
        gross_wage: Decimal,
        social_insurance: Decimal,
        health_insurance: Decimal,
        housing_fund: Decimal,
        withholding_tax: Decimal,
        late_penalty: Decimal,
    ) -> Self {
        let total_deductions =
            social_insurance + health_insurance + housing_fund + withholding_tax + late_penalty;
        let net_wage = (gross_wage - total_deductions).max(Decimal::ZERO);

        Self {
            gross_wage,
            social_insurance,
            health_insurance,
            housing_fund,
            withholding_tax,
            late_penalty,
            total_deductions,
            net_wage,
        }
    }

    /// Hourly rate times the hours used for the period.
    pub fn gross_wage(&self) -> Decimal {
        self.gross_wage
    }

    /// Social-insurance contribution.
    pub fn social_insurance(&self) -> Decimal {
        self.social_insurance
    }

    /// Employee share of the health-insurance premium.
    pub fn health_insurance(&self) -> Decimal {
        self.health_insurance
    }

    /// Housing-fund contribution.
    pub fn housing_fund(&self) -> Decimal {
        self.housing_fund
    }

    /// Withholding tax on taxable income.
    pub fn withholding_tax(&self) -> Decimal {
        self.withholding_tax
    }

    /// Late-arrival penalty.
    pub fn late_penalty(&self) -> Decimal {
        self.late_penalty
    }

    /// Sum of all five deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.total_deductions
    }

    /// Gross wage minus total deductions, never negative.
    pub fn net_wage(&self) -> Decimal {
        self.net_wage
    }

    /// The breakdown in its fixed presentation order.
    pub fn as_ordered_fields(&self) -> [(&'static str, Decimal); 8] {
        [
            ("gross_wage", self.gross_wage),
            ("social_insurance", self.social_insurance),
            ("health_insurance", self.health_insurance),
            ("housing_fund", self.housing_fund),
            ("withholding_tax", self.withholding_tax),
            ("late_penalty", self.late_penalty),
            ("total_deductions", self.total_deductions),
            ("net_wage", self.net_wage),
        ]
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag data the engine used as-is but that deserves a second look,
/// such as a record whose clock-out precedes its clock-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The full outcome of one wage calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageCalculation {
    /// The employee the wage was calculated for.
    pub employee_id: u32,
    /// The period the wage covers.
    pub date_range: DateRange,
    /// The hourly rate on record.
    pub hourly_rate: Decimal,
    /// Hours aggregated from attendance records.
    pub hours_worked: Decimal,
    /// Hours actually used for gross wage (worked or assumed).
    pub hours_for_calculation: Decimal,
    /// Whether assumed hours replaced the aggregated hours.
    pub used_assumed_hours: bool,
    /// The wage breakdown.
    pub breakdown: WageBreakdown,
    /// Every rule decision made along the way.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_total_deductions_is_sum_of_parts() {
        let breakdown = WageBreakdown::compose(
            dec("27000"),
            dec("1125"),
            dec("405"),
            dec("100"),
            dec("5074"),
            dec("16.60"),
        );
        assert_eq!(breakdown.total_deductions(), dec("6720.60"));
        assert_eq!(breakdown.net_wage(), dec("20279.40"));
    }

    #[test]
    fn test_net_wage_floored_at_zero() {
        let breakdown = WageBreakdown::compose(
            dec("100"),
            dec("135"),
            dec("150"),
            dec("3"),
            dec("0"),
            dec("500"),
        );
        assert_eq!(breakdown.total_deductions(), dec("788"));
        assert_eq!(breakdown.net_wage(), Decimal::ZERO);
    }

    #[test]
    fn test_ordered_fields_follow_presentation_order() {
        let breakdown = WageBreakdown::compose(
            dec("1"),
            dec("2"),
            dec("3"),
            dec("4"),
            dec("5"),
            dec("6"),
        );
        let names: Vec<&str> = breakdown.as_ordered_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "gross_wage",
                "social_insurance",
                "health_insurance",
                "housing_fund",
                "withholding_tax",
                "late_penalty",
                "total_deductions",
                "net_wage",
            ]
        );
        assert_eq!(breakdown.as_ordered_fields()[6].1, dec("20"));
    }

    #[test]
    fn test_breakdown_serializes_all_eight_fields() {
        let breakdown = WageBreakdown::compose(
            dec("5000"),
            dec("225"),
            dec("150"),
            dec("100"),
            dec("0"),
            dec("0"),
        );
        let json = serde_json::to_value(&breakdown).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert_eq!(json["net_wage"].as_str().unwrap(), "4525");
    }
}
