//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from YAML and building the stores and schedule it names.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::calculation::{DeductionSchedule, calculate_wage};
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, WageCalculation};
use crate::store::{CsvAttendanceStore, CsvEmployeeStore, CsvLeaveStore};

use super::types::PayrollConfig;

/// The configuration file read from the configuration directory.
pub const CONFIG_FILE_NAME: &str = "payroll.yaml";

/// Loads and provides access to the payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── payroll.yaml                  # Payroll year, data paths, schedule bounds
/// └── data/
///     ├── employee_information.csv
///     ├── employee_attendance.csv
///     ├── leave_balances.csv        # Created on first save
///     └── sss_deduction.csv
/// ```
///
/// The social-insurance table is read the first time it is needed and
/// reused afterwards.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::DateRange;
///
/// let loader = ConfigLoader::load("./config")?;
/// let range = DateRange::month_range(loader.payroll_year(), 6)?;
/// let wage = loader.calculate_wage(10001, &range)?;
/// println!("Net wage: {}", wage.breakdown.net_wage());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
    base_dir: PathBuf,
    schedule: OnceCell<DeductionSchedule>,
    leave_store: CsvLeaveStore,
}

impl ConfigLoader {
    /// Loads `payroll.yaml` from the specified directory.
    ///
    /// Returns `ConfigNotFound` if the file is missing and `ConfigParseError`
    /// if it is not valid YAML for [`PayrollConfig`]. Data files are not
    /// touched until they are used.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<PayrollConfig>(&path.join(CONFIG_FILE_NAME))?;

        tracing::info!(
            path = %path.display(),
            payroll_year = config.payroll_year,
            "Loaded payroll configuration"
        );

        Ok(Self::from_config(config, path))
    }

    /// Wraps an already-built configuration; relative data paths resolve against `base_dir`.
    pub fn from_config<P: AsRef<Path>>(config: PayrollConfig, base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let leave_store = CsvLeaveStore::new(resolve_against(&base_dir, &config.data.leave));
        Self {
            config,
            base_dir,
            schedule: OnceCell::new(),
            leave_store,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the payroll year.
    pub fn payroll_year(&self) -> i32 {
        self.config.payroll_year
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        resolve_against(&self.base_dir, path)
    }

    /// Returns the social-insurance schedule, reading it on first use.
    ///
    /// A failed read is not cached; the next call tries again.
    pub fn deduction_schedule(&self) -> EngineResult<&DeductionSchedule> {
        self.schedule.get_or_try_init(|| {
            let path = self.resolve(&self.config.data.social_insurance_table);
            let schedule = DeductionSchedule::from_path(&path, self.config.social_insurance)?;
            for (from, to) in schedule.coverage_gaps() {
                tracing::warn!(
                    path = %path.display(),
                    from = %from,
                    to = %to,
                    "Social-insurance table does not cover wage range"
                );
            }
            Ok(schedule)
        })
    }

    /// Builds the employee store.
    pub fn employee_store(&self) -> CsvEmployeeStore {
        CsvEmployeeStore::new(self.resolve(&self.config.data.employees))
    }

    /// Builds the attendance store for the payroll year.
    pub fn attendance_store(&self) -> CsvAttendanceStore {
        CsvAttendanceStore::new(
            self.resolve(&self.config.data.attendance),
            self.config.payroll_year,
        )
    }

    /// Returns the leave store.
    ///
    /// Every caller gets the same store, so saves from concurrent requests
    /// are serialised.
    pub fn leave_store(&self) -> &CsvLeaveStore {
        &self.leave_store
    }

    /// Calculates a wage against the configured stores and schedule.
    pub fn calculate_wage(
        &self,
        employee_id: u32,
        range: &DateRange,
    ) -> EngineResult<WageCalculation> {
        let schedule = self.deduction_schedule()?;
        calculate_wage(
            schedule,
            &self.employee_store(),
            &self.attendance_store(),
            employee_id,
            range,
        )
    }
}

fn resolve_against(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn config_path() -> &'static str {
        "./config"
    }

    fn write_config(dir: &TempDir, table: &str) {
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "payroll_year: 2024\n\
             data:\n  \
               employees: employees.csv\n  \
               attendance: attendance.csv\n  \
               leave: leave.csv\n  \
               social_insurance_table: sss.csv\n",
        )
        .unwrap();
        fs::write(dir.path().join("sss.csv"), table).unwrap();
    }

    #[test]
    fn test_load_bundled_configuration() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.payroll_year(), 2024);
        let schedule = loader.deduction_schedule().unwrap();
        assert!(schedule.coverage_gaps().is_empty());
        assert_eq!(schedule.tiers().len(), 44);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("./config/does-not-exist");
        match result {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.ends_with("payroll.yaml")),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "payroll_year: [not a year").unwrap();
        assert!(matches!(
            ConfigLoader::load(dir.path()),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "lower,upper,amount\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.employee_store().path(), dir.path().join("employees.csv"));
        assert_eq!(loader.attendance_store().year(), 2024);
    }

    #[test]
    fn test_schedule_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "lower,upper,amount\n3250,24750,500\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();

        let first = loader.deduction_schedule().unwrap();
        fs::remove_file(dir.path().join("sss.csv")).unwrap();
        let second = loader.deduction_schedule().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.tiers()[0].amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_malformed_table_fails_and_is_not_cached() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "lower,upper,amount\n3250,3749.99\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();

        assert!(matches!(
            loader.deduction_schedule(),
            Err(EngineError::MalformedScheduleRow { line: 2, .. })
        ));

        fs::write(dir.path().join("sss.csv"), "lower,upper,amount\n3250,24750,500\n").unwrap();
        assert!(loader.deduction_schedule().is_ok());
    }
}
