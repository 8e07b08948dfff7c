#![cfg(feature = "pumpkin")]

use float_eq::assert_float_eq;

use solver_demos::error::ScenarioError;
use solver_demos::report::{Level, RecordingSink};
use solver_demos::scenarios::quadratic;
use solver_demos::solvers::Backend;
use solver_demos::{constraint, Solution, SolutionStatus};

#[test]
fn finds_the_closest_point() {
    let sink = RecordingSink::new();
    let report = quadratic::run("pumpkin", &sink).unwrap();
    assert!(report.status.has_solution());
    assert_eq!((report.x, report.y), (6, 4));
    assert_float_eq!(report.objective_value, 2., abs <= 1e-9);
    assert_eq!(report.recomputed_objective, 2);
    assert!(report.objective_matches());
    assert!(report.constraint_checks.iter().all(|check| check.holds));
    assert_eq!(report.statistics.branches, None);
    assert_eq!(report.statistics.conflicts, None);
}

#[test]
fn auxiliary_variables_are_consistent() {
    let model = quadratic::model();
    let outcome = Backend::Pumpkin.solve(&model.problem).unwrap();
    let (x, y) = (outcome.value(model.x), outcome.value(model.y));
    assert_eq!(outcome.value(model.x_diff), x - 5.);
    assert_eq!(outcome.value(model.y_diff), y - 3.);
    assert_eq!(outcome.value(model.x_squared), (x - 5.).powi(2));
    assert_eq!(outcome.value(model.y_squared), (y - 3.).powi(2));
    assert_eq!(outcome.objective_value, Some(2.));
}

#[test]
fn report_lists_checks_and_statistics() {
    let sink = RecordingSink::new();
    quadratic::run("Pumpkin", &sink).unwrap();
    let text = sink.text();
    assert!(text.contains(&"  x + y = 10 (>= 10? ✓)".to_string()));
    assert!(text.contains(&"  x + 2*y = 14 (<= 14? ✓)".to_string()));
    assert!(text.contains(&"Verification: (1)^2 + (1)^2 = 2 (matches)".to_string()));
    assert!(text.contains(&"  Branches: n/a".to_string()));
    let products = sink.position("xSquared = xDiff * xDiff").unwrap();
    let objective = sink.position("Objective: minimise xSquared + ySquared").unwrap();
    let solving = sink.position("Solving").unwrap();
    let statistics = sink.position("Solver statistics:").unwrap();
    assert!(products < objective && objective < solving && solving < statistics);
}

#[test]
fn resolving_gives_the_same_result() {
    let model = quadratic::model();
    let first = quadratic::solve_and_report(Backend::Pumpkin, &model, &RecordingSink::new()).unwrap();
    let second =
        quadratic::solve_and_report(Backend::Pumpkin, &model, &RecordingSink::new()).unwrap();
    assert_eq!(first.status, second.status);
    assert_eq!((first.x, first.y), (second.x, second.y));
    assert_eq!(first.objective_value, second.objective_value);
}

#[test]
fn unknown_backend_builds_nothing() {
    let sink = RecordingSink::new();
    let result = quadratic::run("CP-SAT", &sink);
    assert_eq!(
        result,
        Err(ScenarioError::BackendUnavailable("CP-SAT".to_string()))
    );
    assert!(!sink.contains("Constraints:"));
}

#[cfg(feature = "microlp")]
#[test]
fn backend_without_products_is_unavailable() {
    let result = quadratic::run("microlp", &RecordingSink::new());
    assert_eq!(
        result,
        Err(ScenarioError::BackendUnavailable("microlp".to_string()))
    );
}

#[cfg(feature = "microlp")]
#[test]
fn solving_products_with_a_linear_backend_is_an_error() {
    let model = quadratic::model();
    let result = quadratic::solve_and_report(Backend::Microlp, &model, &RecordingSink::new());
    assert!(matches!(result, Err(ScenarioError::Resolution(_))));
}

#[test]
fn contradictory_constraint_reports_the_status() {
    let mut model = quadratic::model();
    let (x, y) = (model.x, model.y);
    model.problem = model.problem.with(constraint!(x + y <= 1));
    let sink = RecordingSink::new();
    let result = quadratic::solve_and_report(Backend::Pumpkin, &model, &sink);
    assert_eq!(
        result,
        Err(ScenarioError::NoSolution(SolutionStatus::Infeasible))
    );
    assert!(sink
        .lines()
        .contains(&(Level::Error, "No solution found!".to_string())));
}

#[test]
fn single_variable_bound_against_the_polygon_is_infeasible() {
    let mut model = quadratic::model();
    let x = model.x;
    // x + 2y <= 14 and x + y >= 10 already force x >= 6
    model.problem = model.problem.with(constraint!(x <= 3));
    let sink = RecordingSink::new();
    let result = quadratic::solve_and_report(Backend::Pumpkin, &model, &sink);
    assert_eq!(
        result,
        Err(ScenarioError::NoSolution(SolutionStatus::Infeasible))
    );
    assert!(sink.contains("Status: INFEASIBLE"));
}
