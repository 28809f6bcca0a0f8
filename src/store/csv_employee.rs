//! CSV-backed employee store.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

use super::EmployeeStore;
use super::parse::{
    RowContext, data_source_error, format_money, get_employee_number, get_money_field,
    get_string_field, open_reader,
};

/// Number of fields in an employee row.
pub const EMPLOYEE_COLUMNS: usize = 19;

/// Header row written by [`CsvEmployeeStore::write_employees`].
pub const EMPLOYEE_HEADER: [&str; EMPLOYEE_COLUMNS] = [
    "Employee #",
    "Last Name",
    "First Name",
    "Birthday",
    "Address",
    "Phone Number",
    "SSS #",
    "Philhealth #",
    "TIN #",
    "Pag-ibig #",
    "Status",
    "Position",
    "Immediate Supervisor",
    "Basic Salary",
    "Rice Subsidy",
    "Phone Allowance",
    "Clothing Allowance",
    "Gross Semi-monthly Rate",
    "Hourly Rate",
];

const BIRTHDAY_FORMAT: &str = "%m/%d/%Y";

/// Employee records held in a 19-column CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvEmployeeStore {
    path: PathBuf,
}

impl CsvEmployeeStore {
    /// Creates a store over the file at `path`. The file is read on demand.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every employee in file order.
    ///
    /// A row with other than 19 fields aborts the read with `RowLength`.
    pub fn read_employees(&self) -> EngineResult<Vec<Employee>> {
        let source_name = self.path.display().to_string();
        let mut reader = open_reader(&self.path)?;

        let mut employees = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| data_source_error(&self.path, e))?;
            let row = RowContext::new(&source_name, &record);
            row.check_length(&record, EMPLOYEE_COLUMNS)?;
            employees.push(employee_from_record(&record, &row)?);
        }

        tracing::debug!(source = %source_name, count = employees.len(), "Read employees");
        Ok(employees)
    }

    /// Replaces the file contents with a header and one row per employee.
    pub fn write_employees(&self, employees: &[Employee]) -> EngineResult<()> {
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| data_source_error(&self.path, e))?;

        writer
            .write_record(EMPLOYEE_HEADER)
            .map_err(|e| data_source_error(&self.path, e))?;
        for employee in employees {
            writer
                .write_record(employee_to_record(employee))
                .map_err(|e| data_source_error(&self.path, e))?;
        }
        writer.flush().map_err(|e| data_source_error(&self.path, e))?;

        tracing::info!(
            source = %self.path.display(),
            count = employees.len(),
            "Wrote employees"
        );
        Ok(())
    }

    /// Finds one employee by number.
    pub fn find_employee(&self, employee_id: u32) -> EngineResult<Option<Employee>> {
        Ok(self
            .read_employees()?
            .into_iter()
            .find(|e| e.employee_id == employee_id))
    }
}

impl EmployeeStore for CsvEmployeeStore {
    fn hourly_rate(&self, employee_id: u32) -> EngineResult<Decimal> {
        self.find_employee(employee_id)?
            .map(|e| e.hourly_rate)
            .ok_or(EngineError::EmployeeNotFound { employee_id })
    }
}

fn employee_from_record(
    record: &csv::StringRecord,
    row: &RowContext<'_>,
) -> EngineResult<Employee> {
    let birthday_text = get_string_field(record, 3);
    let birthday = if birthday_text.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(&birthday_text, BIRTHDAY_FORMAT)
                .map_err(|_| row.invalid("Birthday", &birthday_text))?,
        )
    };

    Ok(Employee {
        employee_id: get_employee_number(record, 0, row),
        last_name: get_string_field(record, 1),
        first_name: get_string_field(record, 2),
        birthday,
        address: get_string_field(record, 4),
        phone_number: get_string_field(record, 5),
        sss_number: get_string_field(record, 6),
        philhealth_number: get_string_field(record, 7),
        tin: get_string_field(record, 8),
        pagibig_number: get_string_field(record, 9),
        status: get_string_field(record, 10),
        position: get_string_field(record, 11),
        immediate_supervisor: get_string_field(record, 12),
        basic_salary: get_money_field(record, 13, EMPLOYEE_HEADER[13], row),
        rice_subsidy: get_money_field(record, 14, EMPLOYEE_HEADER[14], row),
        phone_allowance: get_money_field(record, 15, EMPLOYEE_HEADER[15], row),
        clothing_allowance: get_money_field(record, 16, EMPLOYEE_HEADER[16], row),
        gross_semimonthly_rate: get_money_field(record, 17, EMPLOYEE_HEADER[17], row),
        hourly_rate: get_money_field(record, 18, EMPLOYEE_HEADER[18], row),
    })
}

fn employee_to_record(employee: &Employee) -> [String; EMPLOYEE_COLUMNS] {
    [
        employee.employee_id.to_string(),
        employee.last_name.clone(),
        employee.first_name.clone(),
        employee
            .birthday
            .map(|d| d.format(BIRTHDAY_FORMAT).to_string())
            .unwrap_or_default(),
        employee.address.clone(),
        employee.phone_number.clone(),
        employee.sss_number.clone(),
        employee.philhealth_number.clone(),
        employee.tin.clone(),
        employee.pagibig_number.clone(),
        employee.status.clone(),
        employee.position.clone(),
        employee.immediate_supervisor.clone(),
        format_money(employee.basic_salary),
        format_money(employee.rice_subsidy),
        format_money(employee.phone_allowance),
        format_money(employee.clothing_allowance),
        format_money(employee.gross_semimonthly_rate),
        format_money(employee.hourly_rate),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const HEADER_LINE: &str = "Employee #,Last Name,First Name,Birthday,Address,Phone Number,SSS #,Philhealth #,TIN #,Pag-ibig #,Status,Position,Immediate Supervisor,Basic Salary,Rice Subsidy,Phone Allowance,Clothing Allowance,Gross Semi-monthly Rate,Hourly Rate";

    fn write_file(dir: &TempDir, body: &str) -> CsvEmployeeStore {
        let path = dir.path().join("employees.csv");
        fs::write(&path, format!("{}\n{}", HEADER_LINE, body)).unwrap();
        CsvEmployeeStore::new(path)
    }

    const GARCIA: &str = r#"10001,Garcia,Manuel III,10/11/1983,"Valero Carpark Building, Makati City",966-860-270,44-4506057-3,820126853951,442-605-657-000,691295330870,Regular,Chief Executive Officer,N/A,"90,000","1,500","2,000","1,000","45,000",535.71"#;

    #[test]
    fn test_read_parses_quoted_amounts() {
        let dir = TempDir::new().unwrap();
        let store = write_file(&dir, GARCIA);

        let employees = store.read_employees().unwrap();
        assert_eq!(employees.len(), 1);
        let garcia = &employees[0];
        assert_eq!(garcia.employee_id, 10001);
        assert_eq!(garcia.address, "Valero Carpark Building, Makati City");
        assert_eq!(garcia.birthday, NaiveDate::from_ymd_opt(1983, 10, 11));
        assert_eq!(garcia.basic_salary, dec("90000"));
        assert_eq!(garcia.gross_semimonthly_rate, dec("45000"));
        assert_eq!(garcia.hourly_rate, dec("535.71"));
    }

    #[test]
    fn test_hourly_rate_lookup() {
        let dir = TempDir::new().unwrap();
        let store = write_file(&dir, GARCIA);

        assert_eq!(store.hourly_rate(10001).unwrap(), dec("535.71"));
        assert!(matches!(
            store.hourly_rate(10002),
            Err(EngineError::EmployeeNotFound { employee_id: 10002 })
        ));
    }

    #[test]
    fn test_short_row_is_row_length_error() {
        let dir = TempDir::new().unwrap();
        let store = write_file(&dir, "10001,Garcia,Manuel III");

        let err = store.read_employees().unwrap_err();
        assert!(matches!(
            err,
            EngineError::RowLength { line: 2, expected: 19, found: 3, .. }
        ));
    }

    #[test]
    fn test_bad_amount_degrades_to_zero() {
        let dir = TempDir::new().unwrap();
        let row = GARCIA.replace("535.71", "unknown");
        let store = write_file(&dir, &row);

        assert_eq!(store.hourly_rate(10001).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let store = CsvEmployeeStore::new(dir.path().join("absent.csv"));
        assert!(matches!(
            store.read_employees(),
            Err(EngineError::DataSourceError { .. })
        ));
    }

    #[test]
    fn test_write_then_read_preserves_records() {
        let dir = TempDir::new().unwrap();
        let store = write_file(&dir, GARCIA);
        let mut employees = store.read_employees().unwrap();
        employees[0].position = "Chairman".to_string();
        employees.push(Employee {
            employee_id: 10002,
            last_name: "Lim".to_string(),
            first_name: "Antonio".to_string(),
            hourly_rate: dec("357.14"),
            basic_salary: dec("60000"),
            ..Default::default()
        });

        store.write_employees(&employees).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with(HEADER_LINE));
        assert!(text.contains("\"90,000.00\""));

        let reread = store.read_employees().unwrap();
        assert_eq!(reread, employees);
        assert_eq!(store.find_employee(10002).unwrap().unwrap().full_name(), "Antonio Lim");
    }
}
