//! The linear backend, on top of [microlp](https://docs.rs/microlp), a pure rust simplex solver.
//!
//! Only continuous variables are accepted. A model with an integer variable fails to solve
//! instead of silently returning the value of its relaxation.

use crate::constraint::ConstraintReference;
use crate::solvers::{ObjectiveDirection, ResolutionError, Solution, SolverModel};
use crate::variable::UnsolvedProblem;
use crate::{Constraint, Variable};

/// The [microlp](https://docs.rs/microlp) solver,
/// to be used with [UnsolvedProblem::using].
pub fn microlp(to_solve: UnsolvedProblem) -> MicroLpModel {
    let UnsolvedProblem {
        objective,
        direction,
        variables,
    } = to_solve;
    let mut problem = microlp::Problem::new(match direction {
        ObjectiveDirection::Maximisation => microlp::OptimizationDirection::Maximize,
        ObjectiveDirection::Minimisation => microlp::OptimizationDirection::Minimize,
    });
    let mut integer_variable = None;
    let mut columns = Vec::with_capacity(variables.len());
    for (var, def) in variables.iter_variables_with_def() {
        if def.is_integer() && integer_variable.is_none() {
            integer_variable = Some(var);
        }
        let cost = objective.linear.coefficients.get(&var).copied().unwrap_or(0.);
        columns.push(problem.add_var(cost, (def.lower_bound(), def.upper_bound())));
    }
    MicroLpModel {
        problem,
        columns,
        objective_constant: objective.constant,
        integer_variable,
        constraint_count: 0,
    }
}

/// A continuous linear program, ready for microlp
pub struct MicroLpModel {
    problem: microlp::Problem,
    /// One microlp column per variable, in creation order
    columns: Vec<microlp::Variable>,
    objective_constant: f64,
    integer_variable: Option<Variable>,
    constraint_count: usize,
}

impl SolverModel for MicroLpModel {
    type Solution = MicroLpSolution;
    type Error = ResolutionError;

    fn solve(self) -> Result<Self::Solution, Self::Error> {
        if let Some(var) = self.integer_variable {
            tracing::debug!(variable = var.index(), "microlp rejects integer variables");
            return Err(ResolutionError::Other(
                "the microlp backend only accepts continuous variables",
            ));
        }
        let solution = self.problem.solve().map_err(|error| match error {
            microlp::Error::Unbounded => ResolutionError::Unbounded,
            microlp::Error::Infeasible => ResolutionError::Infeasible,
            microlp::Error::InternalError(message) => ResolutionError::Str(message),
        })?;
        Ok(MicroLpSolution {
            solution,
            columns: self.columns,
            objective_constant: self.objective_constant,
        })
    }

    fn add_constraint(&mut self, constraint: Constraint) -> ConstraintReference {
        // expression <= 0 becomes linear part <= -constant
        let rhs = -constraint.expression.constant;
        let mut lhs = microlp::LinearExpr::empty();
        for (var, coeff) in constraint.expression.linear.coefficients {
            lhs.add(self.columns[var.index()], coeff);
        }
        let op = if constraint.is_equality {
            microlp::ComparisonOp::Eq
        } else {
            microlp::ComparisonOp::Le
        };
        self.problem.add_constraint(lhs, op, rhs);
        let reference = ConstraintReference {
            index: self.constraint_count,
        };
        self.constraint_count += 1;
        reference
    }

    fn name() -> &'static str {
        "Microlp"
    }
}

/// An optimal solution found by microlp
pub struct MicroLpSolution {
    solution: microlp::Solution,
    columns: Vec<microlp::Variable>,
    objective_constant: f64,
}

impl Solution for MicroLpSolution {
    fn value(&self, variable: Variable) -> f64 {
        self.solution[self.columns[variable.index()]]
    }

    fn objective_value(&self) -> Option<f64> {
        Some(self.solution.objective() + self.objective_constant)
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::microlp;
    use crate::{variable, ResolutionError, Solution, SolverModel};

    #[test]
    fn can_solve_easy() {
        let mut vars = variables!();
        let x = vars.add(variable().clamp(0, 2));
        let y = vars.add(variable().clamp(1, 3));
        let solution = vars
            .maximise(x + y)
            .using(microlp)
            .with((2 * x + y) << 4)
            .solve()
            .unwrap();
        assert_eq!((solution.value(x), solution.value(y)), (0.5, 3.))
    }

    #[test]
    fn reports_objective_with_its_constant() {
        let mut vars = variables!();
        let x = vars.add(variable().clamp(0, 4));
        let solution = vars
            .maximise(2 * x + 1)
            .using(microlp)
            .with(constraint!(x <= 3))
            .solve()
            .unwrap();
        assert_float_eq!(solution.objective_value().unwrap(), 7., abs <= 1e-9);
    }

    #[test]
    fn contradictory_constraints_are_infeasible() {
        let mut vars = variables!();
        let x = vars.add(variable().min(0));
        let result = vars
            .maximise(x)
            .using(microlp)
            .with(constraint!(x >= 10))
            .with(constraint!(x <= 1))
            .solve();
        assert!(matches!(result, Err(ResolutionError::Infeasible)));
    }

    #[test]
    fn missing_upper_bound_is_unbounded() {
        let mut vars = variables!();
        let x = vars.add(variable().min(0));
        let y = vars.add(variable().min(0));
        let result = vars
            .maximise(x + y)
            .using(microlp)
            .with(constraint!(x - y <= 2))
            .solve();
        assert!(matches!(result, Err(ResolutionError::Unbounded)));
    }

    #[test]
    fn integer_variables_are_rejected() {
        let mut vars = variables!();
        let x = vars.add(variable().clamp(0, 10));
        let n = vars.add(variable().integer().clamp(0, 3));
        let result = vars
            .maximise(x + n)
            .using(microlp)
            .with(constraint!(x + 2 * n <= 5))
            .solve();
        assert!(matches!(result, Err(ResolutionError::Other(_))));
    }
}
