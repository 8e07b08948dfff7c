//! A small linear program over two continuous variables.
//!
//! ```text
//! maximise 3x + 4y
//! subject to
//!   x + 2y <= 14
//!   3x - y >= 0
//!   x - y  <= 2
//!   x, y   >= 0
//! ```
use crate::error::{Result, ScenarioError};
use crate::problem::{Problem, SolveOutcome};
use crate::report::ReportSink;
use crate::solvers::{Backend, ObjectiveDirection, SolutionStatus, SolveStatistics};
use crate::{variable, Solution, Variable};

use super::{counter, echo_model};

/// The linear program and the handles of its variables
#[derive(Clone, Debug)]
pub struct LinearModel {
    /// The full model
    pub problem: Problem,
    /// First decision variable
    pub x: Variable,
    /// Second decision variable
    pub y: Variable,
}

/// What the linear scenario found
#[derive(Clone, Debug, PartialEq)]
pub struct LinearReport {
    /// Always [SolutionStatus::Optimal]
    pub status: SolutionStatus,
    /// Value of `3x + 4y`
    pub objective_value: f64,
    /// Value of `x`
    pub x: f64,
    /// Value of `y`
    pub y: f64,
    /// Counters of the solve
    pub statistics: SolveStatistics,
}

/// Builds the linear program. Building has no side effect.
pub fn model() -> LinearModel {
    let mut vars = variables!();
    let x = vars.add(variable().min(0).name("x"));
    let y = vars.add(variable().min(0).name("y"));
    let problem = Problem::new(vars, ObjectiveDirection::Maximisation, 3 * x + 4 * y)
        .with(constraint!(x + 2 * y <= 14).set_name("c0"))
        .with(constraint!(3 * x - y >= 0).set_name("c1"))
        .with(constraint!(x - y <= 2).set_name("c2"));
    LinearModel { problem, x, y }
}

/// Looks up a linear backend by name, then builds, solves and reports the linear program.
///
/// Nothing about the model is written when the backend is unavailable.
pub fn run(backend_name: &str, sink: &impl ReportSink) -> Result<LinearReport> {
    sink.info("=== Linear Programming Example ===");
    let Some(backend) = Backend::linear(backend_name) else {
        sink.error(&format!("Could not create solver {}", backend_name));
        return Err(ScenarioError::BackendUnavailable(backend_name.to_string()));
    };
    solve_and_report(backend, &model(), sink)
}

/// Solves the model with `backend` and writes the report.
pub fn solve_and_report(
    backend: Backend,
    model: &LinearModel,
    sink: &impl ReportSink,
) -> Result<LinearReport> {
    let problem = &model.problem;
    sink.info(&format!("Number of variables = {}", problem.variables().len()));
    sink.info(&format!("Number of constraints = {}", problem.constraints().len()));
    echo_model(problem, sink);

    sink.info(&format!("Solving with {}...", backend));
    let outcome = backend.solve(problem)?;
    report(model, &outcome, sink)
}

/// Writes what `outcome` says about the model.
///
/// Only a proven optimum is a success. Any other status, [SolutionStatus::Feasible] included,
/// is written as an error and returned as [ScenarioError::NoSolution].
pub fn report(
    model: &LinearModel,
    outcome: &SolveOutcome,
    sink: &impl ReportSink,
) -> Result<LinearReport> {
    if outcome.status != SolutionStatus::Optimal {
        sink.error("The problem does not have an optimal solution!");
        sink.error(&format!("Status: {}", outcome.status));
        return Err(ScenarioError::NoSolution(outcome.status));
    }

    let objective_value = outcome
        .objective_value
        .unwrap_or_else(|| outcome.eval(model.problem.objective()));
    let report = LinearReport {
        status: outcome.status,
        objective_value,
        x: outcome.value(model.x),
        y: outcome.value(model.y),
        statistics: outcome.statistics,
    };
    sink.info("Solution found!");
    sink.info(&format!("Objective value = {}", report.objective_value));
    sink.info(&format!("x = {}", report.x));
    sink.info(&format!("y = {}", report.y));
    sink.info("Advanced usage:");
    sink.info(&format!(
        "Problem solved in {:.3} milliseconds",
        report.statistics.wall_time.as_secs_f64() * 1000.
    ));
    sink.info(&format!(
        "Problem solved in {} iterations",
        counter(report.statistics.iterations)
    ));
    Ok(report)
}
