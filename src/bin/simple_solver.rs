//! Solves the linear scenario and logs the report.
//!
//! The backend can be chosen with the first argument (default: microlp).
use std::process::ExitCode;

use solver_demos::report::TracingSink;
use solver_demos::scenarios::{linear, DEFAULT_LINEAR_BACKEND};

fn main() -> ExitCode {
    solver_demos::logging::init();
    let backend = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LINEAR_BACKEND.to_string());
    match linear::run(&backend, &TracingSink::new("linear")) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "linear scenario failed");
            ExitCode::FAILURE
        }
    }
}
