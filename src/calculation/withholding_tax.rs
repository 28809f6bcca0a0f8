//! Withholding tax calculation.
//!
//! Taxable income is gross wage less the social-insurance, health-insurance
//! and housing-fund deductions. The rate of the highest bracket threshold the
//! income reaches is then applied flat to the whole taxable income; this is
//! not a graduated computation.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::contribution_rules::GrossWageDeduction;

/// A withholding-tax bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBracket {
    /// Minimum taxable income for the bracket (inclusive).
    pub threshold: Decimal,
    /// Rate applied to the whole taxable income.
    pub rate: Decimal,
}

/// The bracket table in ascending threshold order.
pub const TAX_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        threshold: Decimal::from_parts(20832, 0, 0, false, 0),
        rate: Decimal::from_parts(20, 0, 0, false, 2),
    },
    TaxBracket {
        threshold: Decimal::from_parts(33333, 0, 0, false, 0),
        rate: Decimal::from_parts(25, 0, 0, false, 2),
    },
    TaxBracket {
        threshold: Decimal::from_parts(66667, 0, 0, false, 0),
        rate: Decimal::from_parts(30, 0, 0, false, 2),
    },
    TaxBracket {
        threshold: Decimal::from_parts(166667, 0, 0, false, 0),
        rate: Decimal::from_parts(32, 0, 0, false, 2),
    },
    TaxBracket {
        threshold: Decimal::from_parts(666667, 0, 0, false, 0),
        rate: Decimal::from_parts(35, 0, 0, false, 2),
    },
];

/// The result of a withholding tax calculation.
#[derive(Debug, Clone)]
pub struct WithholdingTaxResult {
    /// Gross wage less the three statutory deductions, floored at zero.
    pub taxable_income: Decimal,
    /// The bracket applied, if the income reached any.
    pub bracket: Option<TaxBracket>,
    /// The tax owed.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns `max(gross - (social + health + housing), 0)`.
pub fn taxable_income(
    gross_wage: Decimal,
    social_insurance: Decimal,
    health_insurance: Decimal,
    housing_fund: Decimal,
) -> Decimal {
    (gross_wage - (social_insurance + health_insurance + housing_fund)).max(Decimal::ZERO)
}

/// Finds the bracket for a taxable income, scanning from the highest threshold down.
pub fn applicable_bracket(taxable_income: Decimal) -> Option<TaxBracket> {
    TAX_BRACKETS
        .iter()
        .rev()
        .find(|bracket| taxable_income >= bracket.threshold)
        .copied()
}

/// Returns the flat-rate tax on an already-derived taxable income.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::tax_on_taxable_income;
/// use rust_decimal::Decimal;
///
/// assert_eq!(tax_on_taxable_income(Decimal::ZERO), Decimal::ZERO);
/// assert_eq!(tax_on_taxable_income(Decimal::new(20000, 0)), Decimal::ZERO);
/// assert_eq!(tax_on_taxable_income(Decimal::new(500000, 0)), Decimal::new(160000, 0));
/// ```
pub fn tax_on_taxable_income(taxable_income: Decimal) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    applicable_bracket(taxable_income)
        .map(|bracket| taxable_income * bracket.rate)
        .unwrap_or(Decimal::ZERO)
}

/// Calculates withholding tax from gross wage.
///
/// The three statutory deductions are re-derived here from the same gross
/// wage through the supplied rules.
pub fn calculate_withholding_tax(
    gross_wage: Decimal,
    social_insurance: &dyn GrossWageDeduction,
    health_insurance: &dyn GrossWageDeduction,
    housing_fund: &dyn GrossWageDeduction,
    step_number: u32,
) -> WithholdingTaxResult {
    let social = social_insurance.amount_for(gross_wage);
    let health = health_insurance.amount_for(gross_wage);
    let housing = housing_fund.amount_for(gross_wage);

    let taxable_income = taxable_income(gross_wage, social, health, housing);
    let bracket = if taxable_income > Decimal::ZERO {
        applicable_bracket(taxable_income)
    } else {
        None
    };
    let tax = tax_on_taxable_income(taxable_income);

    let reasoning = match bracket {
        Some(b) => format!(
            "taxable {} - {} - {} - {} = {} reaches {} bracket; {} x {} = {}",
            gross_wage.normalize(),
            social.normalize(),
            health.normalize(),
            housing.normalize(),
            taxable_income.normalize(),
            b.threshold,
            taxable_income.normalize(),
            b.rate.normalize(),
            tax.normalize()
        ),
        None => format!(
            "taxable income {} is below the lowest bracket {}; no tax",
            taxable_income.normalize(),
            TAX_BRACKETS[0].threshold
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "withholding_tax".to_string(),
        rule_name: "Withholding Tax".to_string(),
        input: serde_json::json!({
            "gross_wage": gross_wage.normalize().to_string(),
            "social_insurance": social.normalize().to_string(),
            "health_insurance": health.normalize().to_string(),
            "housing_fund": housing.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "bracket_threshold": bracket.map(|b| b.threshold.to_string()),
            "rate": bracket.map(|b| b.rate.normalize().to_string()),
            "tax": tax.normalize().to_string()
        }),
        reasoning,
    };

    WithholdingTaxResult {
        taxable_income,
        bracket,
        tax,
        audit_step,
    }
}
