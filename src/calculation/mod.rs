//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions: worked-hours
//! aggregation with the assumed-hours fallback, late arrival penalties, the
//! social-insurance schedule lookup, health-insurance and housing-fund
//! contribution rules, withholding tax, leave amounts, and the pipeline that
//! chains them into a wage breakdown.

mod contribution_rules;
mod late_penalty;
mod leave;
mod pipeline;
mod social_insurance;
mod time_aggregation;
mod withholding_tax;

pub use contribution_rules::{ContributionRule, DeductionResult, GrossWageDeduction};
pub use late_penalty::{
    LATE_CUTOFF_HOUR, LATE_CUTOFF_MINUTE, LATE_PENALTY_PER_MINUTE, LatePenaltyResult,
    arrived_late, calculate_late_penalty, late_minutes,
};
pub use leave::{
    EMERGENCY_LEAVE_DAILY_AMOUNT, LEAVE_DATE_FORMAT, PAID_LEAVE_DAILY_AMOUNT,
    calculate_leave_amounts, leave_days,
};
pub use pipeline::{WageCalculator, calculate_wage};
pub use social_insurance::{
    DeductionSchedule, DeductionTier, SCHEDULE_COLUMNS, ScheduleBounds, TierMatch,
};
pub use time_aggregation::{
    ASSUMED_HOURS_PER_DAY, HoursAggregation, aggregate_hours, assumed_hours_worked,
    total_hours_worked,
};
pub use withholding_tax::{
    TAX_BRACKETS, TaxBracket, WithholdingTaxResult, applicable_bracket,
    calculate_withholding_tax, tax_on_taxable_income, taxable_income,
};
