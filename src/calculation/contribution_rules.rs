//! Closed-form contribution rules.
//!
//! Health insurance and the housing fund are both capped percentages of gross
//! wage. They share the [`GrossWageDeduction`] capability with the tiered
//! social-insurance schedule, and are expressed as variants of one
//! [`ContributionRule`] enum rather than separate calculators.

use rust_decimal::Decimal;

use crate::models::{AuditStep, AuditWarning};

/// A deduction that is a function of gross wage alone.
pub trait GrossWageDeduction {
    /// Returns the deduction owed on `gross_wage`.
    fn amount_for(&self, gross_wage: Decimal) -> Decimal;
}

/// The result of applying one deduction rule, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// The deduction amount.
    pub amount: Decimal,
    /// A warning raised while resolving the amount, if any.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// A capped-percentage contribution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionRule {
    /// A premium of `rate * gross` clamped to `[floor, ceiling]`, of which the
    /// employee pays `employee_share`.
    SharedPremium {
        /// Premium rate on gross wage.
        rate: Decimal,
        /// Minimum premium.
        floor: Decimal,
        /// Maximum premium.
        ceiling: Decimal,
        /// Fraction of the premium paid by the employee.
        employee_share: Decimal,
    },
    /// `gross * rate` capped at `cap`, with a lower rate at or below `threshold`.
    TieredRate {
        /// Gross wage at or below which `low_rate` applies.
        threshold: Decimal,
        /// Rate at or below the threshold.
        low_rate: Decimal,
        /// Rate above the threshold.
        high_rate: Decimal,
        /// Maximum contribution.
        cap: Decimal,
    },
}

impl ContributionRule {
    /// The health-insurance rule: 3% premium clamped to 300–1800, employee pays half.
    pub fn health_insurance() -> Self {
        ContributionRule::SharedPremium {
            rate: Decimal::new(3, 2),
            floor: Decimal::new(300, 0),
            ceiling: Decimal::new(1800, 0),
            employee_share: Decimal::new(5, 1),
        }
    }

    /// The housing-fund rule: 3% up to 1500 gross, 4% above, capped at 100.
    pub fn housing_fund() -> Self {
        ContributionRule::TieredRate {
            threshold: Decimal::new(1500, 0),
            low_rate: Decimal::new(3, 2),
            high_rate: Decimal::new(4, 2),
            cap: Decimal::new(100, 0),
        }
    }

    fn rule_id(&self) -> &'static str {
        match self {
            ContributionRule::SharedPremium { .. } => "health_insurance",
            ContributionRule::TieredRate { .. } => "housing_fund",
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            ContributionRule::SharedPremium { .. } => "Health Insurance",
            ContributionRule::TieredRate { .. } => "Housing Fund",
        }
    }

    /// Applies the rule to `gross_wage` and records an audit step.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::ContributionRule;
    /// use rust_decimal::Decimal;
    ///
    /// let result = ContributionRule::housing_fund().apply(Decimal::new(2000, 0), 1);
    /// assert_eq!(result.amount, Decimal::new(80, 0));
    /// ```
    pub fn apply(&self, gross_wage: Decimal, step_number: u32) -> DeductionResult {
        let amount = self.amount_for(gross_wage);

        let (output, reasoning) = match *self {
            ContributionRule::SharedPremium {
                rate,
                floor,
                ceiling,
                employee_share,
            } => {
                let premium = (gross_wage * rate).clamp(floor, ceiling);
                (
                    serde_json::json!({
                        "premium": premium.normalize().to_string(),
                        "employee_share": employee_share.normalize().to_string(),
                        "amount": amount.normalize().to_string()
                    }),
                    format!(
                        "premium clamp({} x {}, {}, {}) = {}; employee pays {} = {}",
                        gross_wage.normalize(),
                        rate.normalize(),
                        floor.normalize(),
                        ceiling.normalize(),
                        premium.normalize(),
                        employee_share.normalize(),
                        amount.normalize()
                    ),
                )
            }
            ContributionRule::TieredRate {
                threshold,
                low_rate,
                high_rate,
                cap,
            } => {
                let applied_rate = if gross_wage <= threshold {
                    low_rate
                } else {
                    high_rate
                };
                let cap_applied = gross_wage * applied_rate > cap;
                (
                    serde_json::json!({
                        "rate": applied_rate.normalize().to_string(),
                        "cap_applied": cap_applied,
                        "amount": amount.normalize().to_string()
                    }),
                    if cap_applied {
                        format!(
                            "{} x {} capped at {}",
                            gross_wage.normalize(),
                            applied_rate.normalize(),
                            cap.normalize()
                        )
                    } else {
                        format!(
                            "{} x {} = {}",
                            gross_wage.normalize(),
                            applied_rate.normalize(),
                            amount.normalize()
                        )
                    },
                )
            }
        };

        DeductionResult {
            amount,
            warning: None,
            audit_step: AuditStep {
                step_number,
                rule_id: self.rule_id().to_string(),
                rule_name: self.rule_name().to_string(),
                input: serde_json::json!({
                    "gross_wage": gross_wage.normalize().to_string()
                }),
                output,
                reasoning,
            },
        }
    }
}

impl GrossWageDeduction for ContributionRule {
    fn amount_for(&self, gross_wage: Decimal) -> Decimal {
        match *self {
            ContributionRule::SharedPremium {
                rate,
                floor,
                ceiling,
                employee_share,
            } => (gross_wage * rate).clamp(floor, ceiling) * employee_share,
            ContributionRule::TieredRate {
                threshold,
                low_rate,
                high_rate,
                cap,
            } => {
                let rate = if gross_wage <= threshold {
                    low_rate
                } else {
                    high_rate
                };
                (gross_wage * rate).min(cap)
            }
        }
    }
}
