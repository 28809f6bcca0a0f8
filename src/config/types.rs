//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `payroll.yaml`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::calculation::ScheduleBounds;

/// Top-level payroll configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// The calendar year attendance `MM/DD` dates belong to.
    pub payroll_year: i32,
    /// Locations of the data files.
    pub data: DataPaths,
    /// Floor and ceiling of the social-insurance schedule.
    #[serde(default)]
    pub social_insurance: ScheduleBounds,
}

/// Data file locations.
///
/// Relative paths are resolved against the configuration directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Employee information file.
    pub employees: PathBuf,
    /// Attendance file.
    pub attendance: PathBuf,
    /// Leave application file; created on first save.
    pub leave: PathBuf,
    /// Social-insurance tier table.
    pub social_insurance_table: PathBuf,
}
