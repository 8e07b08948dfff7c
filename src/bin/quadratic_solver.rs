//! Solves the quadratic scenario and logs the report.
//!
//! The backend can be chosen with the first argument (default: pumpkin).
use std::process::ExitCode;

use solver_demos::report::TracingSink;
use solver_demos::scenarios::{quadratic, DEFAULT_CP_BACKEND};

fn main() -> ExitCode {
    solver_demos::logging::init();
    let backend = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CP_BACKEND.to_string());
    match quadratic::run(&backend, &TracingSink::new("quadratic")) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "quadratic scenario failed");
            ExitCode::FAILURE
        }
    }
}
