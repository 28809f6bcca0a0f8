//! CSV-backed leave application store.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::calculation::calculate_leave_amounts;
use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveApplication, LeaveType};

use super::parse::{RowContext, data_source_error, get_employee_number, get_money_field, get_string_field, open_reader};

/// Number of fields in a leave row.
pub const LEAVE_COLUMNS: usize = 8;

/// Header row written on every save.
pub const LEAVE_HEADER: [&str; LEAVE_COLUMNS] = [
    "Employee Number",
    "Leave Type",
    "Start Date",
    "End Date",
    "Reason",
    "Sick Leave",
    "Vacation Leave",
    "Emergency Leave",
];

/// Leave applications held in an 8-column CSV file, one per employee.
///
/// Clones share one write lock, so concurrent saves through any of them are
/// serialised. The file is replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct CsvLeaveStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvLeaveStore {
    /// Creates a store over the file at `path`. The file need not exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads every application on file.
    ///
    /// A missing file holds no applications. Rows with fewer than eight
    /// fields are skipped.
    pub fn load_leave_applications(&self) -> EngineResult<Vec<LeaveApplication>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let source_name = self.path.display().to_string();
        let mut reader = open_reader(&self.path)?;

        let mut leaves = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| data_source_error(&self.path, e))?;
            let row = RowContext::new(&source_name, &record);
            if record.len() < LEAVE_COLUMNS {
                tracing::warn!(
                    source = %source_name,
                    line = row.line,
                    found = record.len(),
                    "Skipping short leave row"
                );
                continue;
            }

            let label = get_string_field(&record, 1);
            leaves.push(LeaveApplication {
                employee_id: get_employee_number(&record, 0, &row),
                leave_type: LeaveType::from_label(&label),
                start_date: get_string_field(&record, 2),
                end_date: get_string_field(&record, 3),
                reason: get_string_field(&record, 4),
                sick_leave_amount: get_money_field(&record, 5, LEAVE_HEADER[5], &row),
                vacation_leave_amount: get_money_field(&record, 6, LEAVE_HEADER[6], &row),
                emergency_leave_amount: get_money_field(&record, 7, LEAVE_HEADER[7], &row),
            });
        }

        Ok(leaves)
    }

    /// Returns the applications filed by one employee.
    pub fn leaves_for_employee(&self, employee_id: u32) -> EngineResult<Vec<LeaveApplication>> {
        Ok(self
            .load_leave_applications()?
            .into_iter()
            .filter(|l| l.employee_id == employee_id)
            .collect())
    }

    /// Computes the leave amounts for `application` and adds it to the file.
    ///
    /// Fails with `DuplicateRecord` when the employee already has an
    /// application on file. Returns the application as stored.
    pub fn save_leave_application(
        &self,
        application: &LeaveApplication,
    ) -> EngineResult<LeaveApplication> {
        let _guard = self.write_lock.lock();

        let mut leaves = self.load_leave_applications()?;
        if leaves.iter().any(|l| l.employee_id == application.employee_id) {
            return Err(EngineError::DuplicateRecord {
                employee_id: application.employee_id,
            });
        }

        let computed = calculate_leave_amounts(application)?;
        leaves.push(computed.clone());
        self.write_all(&leaves)?;

        tracing::info!(
            employee_id = computed.employee_id,
            leave_type = computed.leave_type.map(|t| t.label()),
            "Saved leave application"
        );
        Ok(computed)
    }

    /// Writes every application to a sibling temp file, then renames it over
    /// the store file.
    fn write_all(&self, leaves: &[LeaveApplication]) -> EngineResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|e| data_source_error(&self.path, e))?;

        {
            let mut writer = csv::Writer::from_writer(file.as_file_mut());
            writer
                .write_record(LEAVE_HEADER)
                .map_err(|e| data_source_error(&self.path, e))?;
            for leave in leaves {
                writer
                    .write_record([
                        leave.employee_id.to_string(),
                        leave.leave_type.map(|t| t.label()).unwrap_or_default().to_string(),
                        leave.start_date.clone(),
                        leave.end_date.clone(),
                        leave.reason.clone(),
                        leave.sick_leave_amount.round_dp(2).to_string(),
                        leave.vacation_leave_amount.round_dp(2).to_string(),
                        leave.emergency_leave_amount.round_dp(2).to_string(),
                    ])
                    .map_err(|e| data_source_error(&self.path, e))?;
            }
            writer.flush().map_err(|e| data_source_error(&self.path, e))?;
        }

        file.as_file_mut()
            .flush()
            .map_err(|e| data_source_error(&self.path, e))?;
        file.persist(&self.path)
            .map_err(|e| data_source_error(&self.path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CsvLeaveStore {
        CsvLeaveStore::new(dir.path().join("leave_balances.csv"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load_leave_applications().unwrap().is_empty());
    }

    #[test]
    fn test_save_computes_amounts_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let application =
            LeaveApplication::new(10002, LeaveType::Sick, "06/03/2024", "06/05/2024", "Flu");

        let saved = store.save_leave_application(&application).unwrap();
        assert_eq!(saved.sick_leave_amount, Decimal::new(4500, 0));

        let leaves = store.leaves_for_employee(10002).unwrap();
        assert_eq!(leaves, vec![saved]);
        assert!(store.leaves_for_employee(10003).unwrap().is_empty());
    }

    #[test]
    fn test_second_application_for_employee_is_duplicate() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let first =
            LeaveApplication::new(10002, LeaveType::Vacation, "07/01/2024", "07/02/2024", "Trip");
        store.save_leave_application(&first).unwrap();

        let second =
            LeaveApplication::new(10002, LeaveType::Sick, "08/01/2024", "08/01/2024", "Flu");
        assert!(matches!(
            store.save_leave_application(&second),
            Err(EngineError::DuplicateRecord { employee_id: 10002 })
        ));
        assert_eq!(store.load_leave_applications().unwrap().len(), 1);
    }

    #[test]
    fn test_short_rows_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(
            dir.path().join("leave_balances.csv"),
            "Employee Number,Leave Type,Start Date,End Date,Reason,Sick Leave,Vacation Leave,Emergency Leave\n\
             10001,Sick Leave,06/03/2024\n\
             10004,Emergency Leave,06/03/2024,06/03/2024,Flood,0,0,500.0\n",
        )
        .unwrap();

        let leaves = store.load_leave_applications().unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].employee_id, 10004);
        assert_eq!(leaves[0].leave_type, Some(LeaveType::Emergency));
        assert_eq!(leaves[0].emergency_leave_amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_invalid_application_is_not_written() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let application =
            LeaveApplication::new(10002, LeaveType::Sick, "June 3", "06/05/2024", "Flu");

        assert!(store.save_leave_application(&application).is_err());
        assert!(!dir.path().join("leave_balances.csv").exists());
    }

    #[test]
    fn test_concurrent_saves_keep_every_record() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let handles: Vec<_> = (0..16u32)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let application = LeaveApplication::new(
                        10001 + i,
                        LeaveType::Vacation,
                        "07/01/2024",
                        "07/02/2024",
                        "Trip",
                    );
                    store.save_leave_application(&application)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let mut ids: Vec<u32> = store
            .load_leave_applications()
            .unwrap()
            .iter()
            .map(|l| l.employee_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (10001..10017).collect::<Vec<_>>());
    }

    #[test]
    fn test_save_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let application =
            LeaveApplication::new(10002, LeaveType::Sick, "06/03/2024", "06/03/2024", "Flu");
        store.save_leave_application(&application).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("leave_balances.csv")]);
    }
}
