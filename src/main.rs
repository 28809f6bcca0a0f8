//! HTTP server for the payroll engine.
//!
//! Reads the configuration directory from `PAYROLL_CONFIG` (default
//! `./config`) and binds to `PAYROLL_ADDR` (default `127.0.0.1:3000`).

use std::env;
use std::process::ExitCode;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::logging;

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config_dir = env::var("PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("PAYROLL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = match ConfigLoader::load(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(config_dir = %config_dir, error = %err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Load the tier table eagerly.
    if let Err(err) = config.deduction_schedule() {
        tracing::error!(error = %err, "Failed to load social-insurance schedule");
        return ExitCode::FAILURE;
    }

    let router = create_router(AppState::new(config));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %addr, error = %err, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(addr = %addr, "Payroll engine listening");
    if let Err(err) = axum::serve(listener, router).await {
        tracing::error!(error = %err, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
