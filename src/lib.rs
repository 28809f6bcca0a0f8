//! Payroll computation engine
//!
//! This crate computes an employee's periodic net wage from raw attendance
//! records: worked-hours aggregation, late-arrival penalties, and the chained
//! social-insurance, health-insurance, housing-fund and withholding-tax
//! deductions that turn gross wage into net wage. CSV-backed stores supply
//! employee, attendance and leave records, and an axum router exposes the
//! calculations over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
