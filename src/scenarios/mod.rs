//! The two demonstration scenarios.
//!
//! Each scenario is split into a pure `model()` description and a `solve_and_report` step
//! writing to a [ReportSink]. `run` chains backend lookup, model building and reporting.
use crate::problem::Problem;
use crate::report::ReportSink;

pub mod linear;
pub mod quadratic;

/// Backend used by the linear scenario when none is given
pub const DEFAULT_LINEAR_BACKEND: &str = "microlp";
/// Backend used by the quadratic scenario when none is given
pub const DEFAULT_CP_BACKEND: &str = "pumpkin";

/// Writes every constraint, every product and the objective of a problem
fn echo_model(problem: &Problem, sink: &impl ReportSink) {
    sink.info("Constraints:");
    for constraint in problem.constraints() {
        sink.info(&format!("  {}", problem.display(constraint)));
    }
    for product in problem.products() {
        sink.info(&format!("  {}", problem.display(product)));
    }
    sink.info(&format!("Objective: {}", problem.display_objective()));
}

/// Counters the backend does not expose are shown as `n/a`
fn counter(value: Option<u64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |count| count.to_string())
}
