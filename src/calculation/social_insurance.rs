//! Social-insurance deduction schedule.
//!
//! This module holds the tiered social-insurance table and the lookup that
//! maps a gross wage onto it. The table is read once from a three-column
//! CSV source (lower bound, upper bound, contribution) and then handed to the
//! wage pipeline as a resolved [`DeductionSchedule`].

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning};

use super::contribution_rules::{DeductionResult, GrossWageDeduction};

/// The number of fields every tier row must have.
pub const SCHEDULE_COLUMNS: usize = 3;

/// One row of the deduction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionTier {
    /// Lowest gross wage in the tier (inclusive).
    pub lower_bound: Decimal,
    /// Highest gross wage in the tier (inclusive).
    pub upper_bound: Decimal,
    /// Contribution owed for any wage in the tier.
    pub amount: Decimal,
}

impl DeductionTier {
    /// Returns true if `wage` lies within `[lower_bound, upper_bound]`.
    pub fn contains(&self, wage: Decimal) -> bool {
        wage >= self.lower_bound && wage <= self.upper_bound
    }
}

/// The fixed amounts that apply outside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBounds {
    /// Gross wages below this pay `floor_amount`.
    pub min_compensation: Decimal,
    /// Gross wages above this pay `ceiling_amount`.
    pub max_compensation: Decimal,
    /// Contribution below the table.
    pub floor_amount: Decimal,
    /// Contribution above the table.
    pub ceiling_amount: Decimal,
}

impl Default for ScheduleBounds {
    fn default() -> Self {
        Self {
            min_compensation: Decimal::new(3250, 0),
            max_compensation: Decimal::new(24750, 0),
            floor_amount: Decimal::new(135, 0),
            ceiling_amount: Decimal::new(1125, 0),
        }
    }
}

/// Where a gross wage landed in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMatch {
    /// Below the minimum compensation.
    Floor,
    /// Above the maximum compensation.
    Ceiling,
    /// Inside the tier at this index.
    Tier(usize),
    /// Inside the nominal range but covered by no tier.
    Gap,
}

/// A loaded social-insurance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionSchedule {
    tiers: Vec<DeductionTier>,
    bounds: ScheduleBounds,
}

impl DeductionSchedule {
    /// Creates a schedule from already-parsed tiers.
    pub fn new(tiers: Vec<DeductionTier>, bounds: ScheduleBounds) -> Self {
        Self { tiers, bounds }
    }

    /// Loads a schedule from a CSV file with a header row.
    pub fn from_path<P: AsRef<Path>>(path: P, bounds: ScheduleBounds) -> EngineResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EngineError::DataSourceError {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        let schedule = Self::from_reader(file, bounds)?;
        tracing::info!(
            path = %path.display(),
            tiers = schedule.tiers.len(),
            "Loaded social-insurance schedule"
        );
        Ok(schedule)
    }

    /// Loads a schedule from CSV text with a header row.
    ///
    /// Every data row must have exactly three numeric fields. The first
    /// malformed row aborts the load; a partial table is never returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::{DeductionSchedule, ScheduleBounds};
    ///
    /// let csv = "lower,upper,amount\n3250,3749.99,157.50\n3750,4249.99,180\n";
    /// let schedule = DeductionSchedule::from_reader(csv.as_bytes(), ScheduleBounds::default()).unwrap();
    /// assert_eq!(schedule.tiers().len(), 2);
    ///
    /// let bad = "lower,upper,amount\n3250,3749.99\n";
    /// assert!(DeductionSchedule::from_reader(bad.as_bytes(), ScheduleBounds::default()).is_err());
    /// ```
    pub fn from_reader<R: Read>(reader: R, bounds: ScheduleBounds) -> EngineResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut tiers = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| EngineError::DataSourceError {
                source_name: "deduction schedule".to_string(),
                message: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != SCHEDULE_COLUMNS {
                return Err(EngineError::MalformedScheduleRow {
                    line,
                    message: format!(
                        "expected {} columns but got {} in row: {}",
                        SCHEDULE_COLUMNS,
                        record.len(),
                        record.iter().collect::<Vec<_>>().join(",")
                    ),
                });
            }

            let parse = |index: usize| -> EngineResult<Decimal> {
                let raw = record.get(index).unwrap_or_default().trim();
                Decimal::from_str(raw).map_err(|_| EngineError::MalformedScheduleRow {
                    line,
                    message: format!("invalid number '{}' in column {}", raw, index + 1),
                })
            };

            tiers.push(DeductionTier {
                lower_bound: parse(0)?,
                upper_bound: parse(1)?,
                amount: parse(2)?,
            });
        }

        Ok(Self::new(tiers, bounds))
    }

    /// The tiers in table order.
    pub fn tiers(&self) -> &[DeductionTier] {
        &self.tiers
    }

    /// The floor/ceiling constants.
    pub fn bounds(&self) -> &ScheduleBounds {
        &self.bounds
    }

    /// Locates a gross wage in the schedule.
    ///
    /// Bounds are checked first; inside them the tiers are scanned in order
    /// and the first tier with `lower <= wage <= upper` wins.
    pub fn resolve(&self, gross_wage: Decimal) -> TierMatch {
        if gross_wage < self.bounds.min_compensation {
            return TierMatch::Floor;
        }
        if gross_wage > self.bounds.max_compensation {
            return TierMatch::Ceiling;
        }
        self.tiers
            .iter()
            .position(|tier| tier.contains(gross_wage))
            .map_or(TierMatch::Gap, TierMatch::Tier)
    }

    /// Lists the spans of `[min_compensation, max_compensation]` that no tier
    /// covers, at one-cent granularity.
    ///
    /// A complete table returns an empty list.
    pub fn coverage_gaps(&self) -> Vec<(Decimal, Decimal)> {
        let cent = Decimal::new(1, 2);
        let mut gaps = Vec::new();
        let mut covered_to = self.bounds.min_compensation - cent;

        let mut tiers = self.tiers.clone();
        tiers.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));

        for tier in &tiers {
            if tier.lower_bound > covered_to + cent {
                gaps.push((covered_to + cent, tier.lower_bound - cent));
            }
            covered_to = covered_to.max(tier.upper_bound);
        }
        if covered_to < self.bounds.max_compensation {
            gaps.push((covered_to + cent, self.bounds.max_compensation));
        }
        gaps
    }

    /// Applies the schedule to `gross_wage` and records an audit step.
    ///
    /// A wage that falls into a gap between tiers yields zero and a warning.
    pub fn apply(&self, gross_wage: Decimal, step_number: u32) -> DeductionResult {
        let matched = self.resolve(gross_wage);
        let amount = self.amount_for_match(matched);

        let (source, reasoning, warning) = match matched {
            TierMatch::Floor => (
                "floor".to_string(),
                format!(
                    "{} is below {}; floor contribution {}",
                    gross_wage.normalize(),
                    self.bounds.min_compensation.normalize(),
                    amount.normalize()
                ),
                None,
            ),
            TierMatch::Ceiling => (
                "ceiling".to_string(),
                format!(
                    "{} is above {}; ceiling contribution {}",
                    gross_wage.normalize(),
                    self.bounds.max_compensation.normalize(),
                    amount.normalize()
                ),
                None,
            ),
            TierMatch::Tier(index) => {
                let tier = &self.tiers[index];
                (
                    format!("tier_{}", index + 1),
                    format!(
                        "{} falls in {} - {}; contribution {}",
                        gross_wage.normalize(),
                        tier.lower_bound.normalize(),
                        tier.upper_bound.normalize(),
                        amount.normalize()
                    ),
                    None,
                )
            }
            TierMatch::Gap => {
                tracing::warn!(
                    gross_wage = %gross_wage,
                    "Gross wage matched no social-insurance tier; deducting zero"
                );
                (
                    "gap".to_string(),
                    format!(
                        "{} matched no tier; no contribution deducted",
                        gross_wage.normalize()
                    ),
                    Some(AuditWarning {
                        code: "SCHEDULE_GAP".to_string(),
                        message: format!(
                            "Gross wage {} is inside the social-insurance range but matched no tier",
                            gross_wage.normalize()
                        ),
                        severity: "high".to_string(),
                    }),
                )
            }
        };

        DeductionResult {
            amount,
            warning,
            audit_step: AuditStep {
                step_number,
                rule_id: "social_insurance".to_string(),
                rule_name: "Social Insurance".to_string(),
                input: serde_json::json!({
                    "gross_wage": gross_wage.normalize().to_string()
                }),
                output: serde_json::json!({
                    "source": source,
                    "amount": amount.normalize().to_string()
                }),
                reasoning,
            },
        }
    }

    fn amount_for_match(&self, matched: TierMatch) -> Decimal {
        match matched {
            TierMatch::Floor => self.bounds.floor_amount,
            TierMatch::Ceiling => self.bounds.ceiling_amount,
            TierMatch::Tier(index) => self.tiers[index].amount,
            TierMatch::Gap => Decimal::ZERO,
        }
    }
}

impl GrossWageDeduction for DeductionSchedule {
    fn amount_for(&self, gross_wage: Decimal) -> Decimal {
        self.amount_for_match(self.resolve(gross_wage))
    }
}
