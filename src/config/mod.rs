//! Configuration loading for the payroll engine.
//!
//! This module loads `payroll.yaml`, which names the payroll year, the data
//! files, and the social-insurance schedule bounds.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Payroll year: {}", config.payroll_year());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{DataPaths, PayrollConfig};
