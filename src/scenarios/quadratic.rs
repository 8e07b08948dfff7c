//! Finds the integer point closest to `(5, 3)` inside a small polygon.
//!
//! The squared distance is not given to the backend as a quadratic expression. Each axis gets
//! a difference variable tied by a linear equality, and a square variable tied to it by a
//! multiplication equality. The objective is the linear sum of the two squares.
//!
//! ```text
//! minimise xSquared + ySquared
//! subject to
//!   x + y  >= 10
//!   x + 2y <= 14
//!   xDiff = x - 5,  xSquared = xDiff * xDiff
//!   yDiff = y - 3,  ySquared = yDiff * yDiff
//!   x, y in [0, 10]
//! ```
use crate::constraint::square;
use crate::error::{Result, ScenarioError};
use crate::problem::{Problem, SolveOutcome};
use crate::report::ReportSink;
use crate::solvers::{Backend, ObjectiveDirection, SolutionStatus, SolveStatistics};
use crate::{variable, Solution, Variable};

use super::{counter, echo_model};

/// The point the solution should be close to
pub const CENTER: (i32, i32) = (5, 3);
/// Lower bound of `x + y`
pub const MIN_SUM: i32 = 10;
/// Upper bound of `x + 2y`
pub const MAX_WEIGHTED_SUM: i32 = 14;
/// Both `x` and `y` lie in `[0, UPPER]`
pub const UPPER: i32 = 10;

/// The model and the handles of all its variables
#[derive(Clone, Debug)]
pub struct QuadraticModel {
    /// The full model
    pub problem: Problem,
    /// First decision variable
    pub x: Variable,
    /// Second decision variable
    pub y: Variable,
    /// `x - 5`
    pub x_diff: Variable,
    /// `y - 3`
    pub y_diff: Variable,
    /// `xDiff * xDiff`
    pub x_squared: Variable,
    /// `yDiff * yDiff`
    pub y_squared: Variable,
}

/// One manual check of a linear constraint against the solution
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintCheck {
    /// The left hand side, as written in the report
    pub expression: &'static str,
    /// The bound, as written in the report
    pub bound: &'static str,
    /// Value of the left hand side in the solution
    pub value: i64,
    /// Whether the bound holds
    pub holds: bool,
}

/// What the quadratic scenario found
#[derive(Clone, Debug, PartialEq)]
pub struct QuadraticReport {
    /// [SolutionStatus::Optimal] or [SolutionStatus::Feasible]
    pub status: SolutionStatus,
    /// Value of `x`
    pub x: i64,
    /// Value of `y`
    pub y: i64,
    /// The objective value reported by the backend
    pub objective_value: f64,
    /// `(x - 5)² + (y - 3)²` computed from `x` and `y`
    pub recomputed_objective: i64,
    /// One entry per linear constraint on `x` and `y`
    pub constraint_checks: Vec<ConstraintCheck>,
    /// Counters of the solve
    pub statistics: SolveStatistics,
}

impl QuadraticReport {
    /// Whether the backend objective equals the manual recomputation
    pub fn objective_matches(&self) -> bool {
        (self.objective_value - self.recomputed_objective as f64).abs() < 1e-6
    }
}

/// Builds the model. Building has no side effect.
pub fn model() -> QuadraticModel {
    let (cx, cy) = CENTER;
    variables! {vars:
        0 <= x (integer) <= 10;
        0 <= y (integer) <= 10;
    }
    let x_diff = vars.add(
        variable()
            .integer()
            .clamp(-cx, UPPER - cx)
            .name("xDiff"),
    );
    let y_diff = vars.add(
        variable()
            .integer()
            .clamp(-cy, UPPER - cy)
            .name("yDiff"),
    );
    let max_square = |center: i32| center.max(UPPER - center).pow(2);
    let x_squared = vars.add(
        variable()
            .integer()
            .clamp(0, max_square(cx))
            .name("xSquared"),
    );
    let y_squared = vars.add(
        variable()
            .integer()
            .clamp(0, max_square(cy))
            .name("ySquared"),
    );

    let problem = Problem::new(vars, ObjectiveDirection::Minimisation, x_squared + y_squared)
        .with(constraint!(x + y >= MIN_SUM).set_name("min_sum"))
        .with(constraint!(x + 2 * y <= MAX_WEIGHTED_SUM).set_name("max_weighted_sum"))
        .with(constraint!(x_diff == x - cx).set_name("x_diff"))
        .with(constraint!(y_diff == y - cy).set_name("y_diff"))
        .with_product(square(x_squared, x_diff))
        .with_product(square(y_squared, y_diff));

    QuadraticModel {
        problem,
        x,
        y,
        x_diff,
        y_diff,
        x_squared,
        y_squared,
    }
}

/// Looks up a backend supporting multiplication equalities by name,
/// then builds, solves and reports the model.
///
/// Nothing about the model is written when the backend is unavailable.
pub fn run(backend_name: &str, sink: &impl ReportSink) -> Result<QuadraticReport> {
    sink.info("=== Quadratic Objective Example ===");
    sink.info(&format!(
        "Finding integer point closest to ({},{}) subject to constraints",
        CENTER.0, CENTER.1
    ));
    let Some(backend) = Backend::constraint_programming(backend_name) else {
        sink.error(&format!("Could not create solver {}", backend_name));
        return Err(ScenarioError::BackendUnavailable(backend_name.to_string()));
    };
    solve_and_report(backend, &model(), sink)
}

/// Solves the model with `backend` and writes the report.
pub fn solve_and_report(
    backend: Backend,
    model: &QuadraticModel,
    sink: &impl ReportSink,
) -> Result<QuadraticReport> {
    let problem = &model.problem;
    sink.info(&format!(
        "Number of variables = {}, constraints = {}, products = {}",
        problem.variables().len(),
        problem.constraints().len(),
        problem.products().len()
    ));
    echo_model(problem, sink);

    sink.info(&format!("Solving with {}...", backend));
    let outcome = backend.solve(problem)?;
    report(model, &outcome, sink)
}

/// Writes what `outcome` says about the model.
///
/// [SolutionStatus::Optimal] and [SolutionStatus::Feasible] are both a success. Any other
/// status is written as an error and returned as [ScenarioError::NoSolution].
pub fn report(
    model: &QuadraticModel,
    outcome: &SolveOutcome,
    sink: &impl ReportSink,
) -> Result<QuadraticReport> {
    if !outcome.has_solution() {
        sink.error("No solution found!");
        sink.error(&format!("Status: {}", outcome.status));
        return Err(ScenarioError::NoSolution(outcome.status));
    }

    let x = outcome.value(model.x).round() as i64;
    let y = outcome.value(model.y).round() as i64;
    let objective_value = outcome
        .objective_value
        .unwrap_or_else(|| outcome.eval(model.problem.objective()));
    let (dx, dy) = (x - i64::from(CENTER.0), y - i64::from(CENTER.1));
    let recomputed_objective = dx * dx + dy * dy;
    let constraint_checks = vec![
        ConstraintCheck {
            expression: "x + y",
            bound: ">= 10",
            value: x + y,
            holds: x + y >= i64::from(MIN_SUM),
        },
        ConstraintCheck {
            expression: "x + 2*y",
            bound: "<= 14",
            value: x + 2 * y,
            holds: x + 2 * y <= i64::from(MAX_WEIGHTED_SUM),
        },
    ];
    let report = QuadraticReport {
        status: outcome.status,
        x,
        y,
        objective_value,
        recomputed_objective,
        constraint_checks,
        statistics: outcome.statistics,
    };

    sink.info("Solution found!");
    sink.info(&format!("x = {}", report.x));
    sink.info(&format!("y = {}", report.y));
    sink.info(&format!("Objective value = {:.0}", report.objective_value));
    sink.info(&format!(
        "Verification: ({})^2 + ({})^2 = {} ({})",
        dx,
        dy,
        report.recomputed_objective,
        if report.objective_matches() {
            "matches"
        } else {
            "differs from the solver objective"
        }
    ));
    sink.info("Constraint verification:");
    for check in &report.constraint_checks {
        sink.info(&format!(
            "  {} = {} ({}? {})",
            check.expression,
            check.value,
            check.bound,
            if check.holds { "✓" } else { "✗" }
        ));
    }
    sink.info("Solver statistics:");
    sink.info(&format!("  Status: {}", report.status));
    sink.info(&format!(
        "  Wall time: {} seconds",
        report.statistics.wall_time.as_secs_f64()
    ));
    sink.info(&format!("  Branches: {}", counter(report.statistics.branches)));
    sink.info(&format!(
        "  Conflicts: {}",
        counter(report.statistics.conflicts)
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::error::ScenarioError;
    use crate::problem::SolveOutcome;
    use crate::report::{Level, RecordingSink};
    use crate::solvers::{SolutionStatus, SolveStatistics};

    use super::{model, report, CENTER, MAX_WEIGHTED_SUM, MIN_SUM, UPPER};

    /// An outcome placing the solution at `(x, y)` with consistent auxiliary values
    fn outcome_at(
        status: SolutionStatus,
        x: f64,
        y: f64,
        objective: Option<f64>,
    ) -> SolveOutcome {
        let (dx, dy) = (x - 5., y - 3.);
        SolveOutcome {
            status,
            objective_value: objective,
            values: vec![x, y, dx, dy, dx * dx, dy * dy],
            statistics: SolveStatistics {
                wall_time: Duration::from_millis(1),
                ..SolveStatistics::default()
            },
        }
    }

    #[test]
    fn feasible_outcome_is_accepted() {
        let sink = RecordingSink::new();
        let outcome = outcome_at(SolutionStatus::Feasible, 7., 3., Some(4.));
        let report = report(&model(), &outcome, &sink).unwrap();
        assert_eq!(report.status, SolutionStatus::Feasible);
        assert_eq!((report.x, report.y), (7, 3));
        assert_eq!(report.recomputed_objective, 4);
        assert!(report.objective_matches());
        assert!(report.constraint_checks.iter().all(|check| check.holds));
        assert!(sink.contains("  Status: FEASIBLE"));
        assert!(sink.contains("Solution found!"));
    }

    #[test]
    fn missing_backend_objective_is_evaluated() {
        let outcome = outcome_at(SolutionStatus::Optimal, 6., 4., None);
        let report = report(&model(), &outcome, &RecordingSink::new()).unwrap();
        assert_eq!(report.objective_value, 2.);
    }

    #[test]
    fn differing_objective_is_flagged() {
        let sink = RecordingSink::new();
        let outcome = outcome_at(SolutionStatus::Feasible, 6., 4., Some(3.));
        let report = report(&model(), &outcome, &sink).unwrap();
        assert!(!report.objective_matches());
        assert!(sink.contains("differs from the solver objective"));
    }

    #[test]
    fn unbounded_and_unknown_outcomes_are_failures() {
        for status in [SolutionStatus::Unbounded, SolutionStatus::Unknown] {
            let sink = RecordingSink::new();
            let outcome = SolveOutcome::without_solution(status, Duration::ZERO);
            let result = report(&model(), &outcome, &sink);
            assert_eq!(result, Err(ScenarioError::NoSolution(status)));
            assert_eq!(
                sink.lines(),
                vec![
                    (Level::Error, "No solution found!".to_string()),
                    (Level::Error, format!("Status: {}", status)),
                ]
            );
        }
    }

    #[test]
    fn auxiliary_domains_follow_the_center() {
        let model = model();
        let vars = model.problem.variables();
        let bounds = |v| {
            let def = vars.definition(v);
            (def.lower_bound(), def.upper_bound())
        };
        assert_eq!(bounds(model.x), (0., 10.));
        assert_eq!(bounds(model.x_diff), (-5., 5.));
        assert_eq!(bounds(model.y_diff), (-3., 7.));
        assert_eq!(bounds(model.x_squared), (0., 25.));
        assert_eq!(bounds(model.y_squared), (0., 49.));
        assert!(vars.iter_variables_with_def().all(|(_, def)| def.is_integer()));
    }

    #[test]
    fn model_is_rendered_with_names() {
        let model = model();
        let problem = &model.problem;
        let rendered: Vec<String> = problem
            .constraints()
            .iter()
            .map(|c| problem.display(c).to_string())
            .chain(problem.products().iter().map(|p| problem.display(p).to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "min_sum: -x - y <= -10",
                "max_weighted_sum: x + 2 y <= 14",
                "x_diff: -x + xDiff = -5",
                "y_diff: -y + yDiff = -3",
                "xSquared = xDiff * xDiff",
                "ySquared = yDiff * yDiff",
            ]
        );
        assert_eq!(
            problem.display_objective().to_string(),
            "minimise xSquared + ySquared"
        );
    }

    #[test]
    fn grid_optimum_is_six_four() {
        let mut best = None;
        for x in 0..=UPPER {
            for y in 0..=UPPER {
                if x + y >= MIN_SUM && x + 2 * y <= MAX_WEIGHTED_SUM {
                    let d = (x - CENTER.0).pow(2) + (y - CENTER.1).pow(2);
                    match best {
                        Some((_, _, best_d)) if best_d <= d => {}
                        _ => best = Some((x, y, d)),
                    }
                }
            }
        }
        assert_eq!(best, Some((6, 4, 2)));
    }
}
