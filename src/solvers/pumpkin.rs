//! A solver that uses the [`pumpkin_solver`](https://docs.rs/pumpkin-solver) crate,
//! a pure-Rust SAT+CP solver that supports integral constraints and branching.
//!
//! **Important**:
//! - Pumpkin only supports *integral* variables, constraints, and objective coefficients.
//! - We panic if a user tries non-integer bounds, non-integer coefficients, or infinite bounds.
//! - Multiplication equalities are posted as pumpkin `times` constraints.

use pumpkin_solver::constraints;
use std::io::Write;

use pumpkin_solver::results::{
    OptimisationResult, ProblemSolution, SatisfactionResult, Solution as PumpkinRawSolution,
};
use pumpkin_solver::statistics::configure_statistic_logging;
use pumpkin_solver::termination::Indefinite;
use pumpkin_solver::variables::{DomainId, TransformableVariable};
use pumpkin_solver::Solver as PumpkinSolver;

use crate::constraint::Product;
use crate::solvers::{
    ModelWithProducts, ObjectiveDirection, ResolutionError, Solution, SolutionStatus,
    SolverModel,
};
use crate::{
    constraint::ConstraintReference,
    expression::Expression,
    variable::{UnsolvedProblem, Variable},
    Constraint,
};

/// Construct a [`PumpkinProblem`] from a [`UnsolvedProblem`].
///
/// ```
/// use solver_demos::*;
/// use solver_demos::solvers::pumpkin::pumpkin;
///
/// let mut vars = variables!();
/// let a = vars.add(variable().integer().clamp(0, 10));
/// let b = vars.add(variable().integer().clamp(0, 10));
/// let solution = vars.maximise(a + b)
///     .using(pumpkin)
///     .with(constraint!(a + b <= 10))
///     .with(constraint!(a <= 3))
///     .solve()?;
/// assert_eq!(solution.value(a) + solution.value(b), 10.);
/// # Ok::<_, ResolutionError>(())
/// ```
pub fn pumpkin(to_solve: UnsolvedProblem) -> PumpkinProblem {
    PumpkinProblem::new(to_solve)
}

/// A [`SolverModel`](crate::solvers::SolverModel) implemented using Pumpkin.
///
/// Because Pumpkin only handles integer variables/coefficients, we:
/// - Panic on non-integer bounds or coefficients
/// - Panic on ±∞ bounds
///
/// For the objective, we create a hidden `obj_var` that must match
/// the user-provided linear expression, then do `maximise(obj_var)` or `minimise(obj_var)`.
pub struct PumpkinProblem {
    solver: PumpkinSolver,
    /// For each variable of the problem, which Pumpkin domain ID we use
    domain_ids: Vec<DomainId>,
    /// Integer bounds of each domain, used to size the objective variable
    bounds: Vec<(i32, i32)>,
    direction: ObjectiveDirection,
    objective: Expression,
    next_constraint_index: usize,
    /// Set when posting a constraint already proved the problem infeasible
    infeasible_at_root: bool,
}

impl PumpkinProblem {
    fn new(to_solve: UnsolvedProblem) -> Self {
        let UnsolvedProblem {
            objective,
            direction,
            variables,
        } = to_solve;

        let mut solver = PumpkinSolver::default();
        let mut domain_ids = Vec::with_capacity(variables.len());
        let mut bounds = Vec::with_capacity(variables.len());

        for (_, def) in variables.iter_variables_with_def() {
            if !def.is_integer {
                panic!(
                    "Pumpkin solver only supports integer variables, but got a non-integer definition: {:?}",
                    def.name
                );
            }
            if def.min.is_infinite() || def.max.is_infinite() {
                panic!(
                    "Pumpkin solver does not handle infinite bounds for variable {:?}",
                    def.name
                );
            }
            let lb = i32_or_panic(def.min, "variable lower bound");
            let ub = i32_or_panic(def.max, "variable upper bound");
            domain_ids.push(solver.new_bounded_integer(lb, ub));
            bounds.push((lb, ub));
        }

        PumpkinProblem {
            solver,
            domain_ids,
            bounds,
            direction,
            objective,
            next_constraint_index: 0,
            infeasible_at_root: false,
        }
    }

    /// Whether `coeff * domain <= rhs` (or `== rhs`) can hold within the current domain
    fn single_term_feasible(
        &self,
        domain: DomainId,
        coeff: i32,
        rhs: i32,
        is_equality: bool,
    ) -> bool {
        let (lb, ub) = (
            i64::from(self.solver.lower_bound(&domain)),
            i64::from(self.solver.upper_bound(&domain)),
        );
        let (coeff, rhs) = (i64::from(coeff), i64::from(rhs));
        let (low, high) = ((coeff * lb).min(coeff * ub), (coeff * lb).max(coeff * ub));
        if is_equality {
            rhs % coeff == 0 && low <= rhs && rhs <= high
        } else {
            low <= rhs
        }
    }

    fn next_reference(&mut self) -> ConstraintReference {
        let index = self.next_constraint_index;
        self.next_constraint_index += 1;
        ConstraintReference { index }
    }

    /// The range the objective expression can span given the variable bounds
    fn objective_range(&self) -> (i32, i32) {
        let constant = f64::from(i32_or_panic(self.objective.constant, "objective constant"));
        let (mut low, mut high) = (constant, constant);
        for (var, &coeff) in &self.objective.linear.coefficients {
            let coeff = f64::from(i32_or_panic(coeff, "objective coefficient"));
            let (lb, ub) = self.bounds[var.index()];
            let (a, b) = (coeff * f64::from(lb), coeff * f64::from(ub));
            low += a.min(b);
            high += a.max(b);
        }
        (
            i32_or_panic(low, "objective lower bound"),
            i32_or_panic(high, "objective upper bound"),
        )
    }
}

impl SolverModel for PumpkinProblem {
    type Solution = PumpkinSolution;
    type Error = ResolutionError;

    fn solve(mut self) -> Result<Self::Solution, Self::Error> {
        if self.infeasible_at_root {
            return Err(ResolutionError::Infeasible);
        }
        let mut brancher = self
            .solver
            .default_brancher_over_all_propositional_variables();
        let mut termination = Indefinite;
        // first configuration wins, later calls are no-ops
        configure_statistic_logging(
            "%%",
            None,
            None,
            Some(Box::new(StatisticsToTracing::default())),
        );

        if self.objective.linear.coefficients.is_empty() {
            let result = self.solver.satisfy(&mut brancher, &mut termination);
            self.solver.log_statistics();
            return match result {
                SatisfactionResult::Satisfiable(solution) => Ok(PumpkinSolution {
                    solution,
                    domain_ids: self.domain_ids,
                    objective: None,
                    status: SolutionStatus::Optimal,
                }),
                SatisfactionResult::Unsatisfiable => Err(ResolutionError::Infeasible),
                SatisfactionResult::Unknown => Err(ResolutionError::Other(
                    "Pumpkin: Unknown for feasibility check",
                )),
            };
        }

        // obj_var - sum(coeff_i * var_i) = constant
        let (lb, ub) = self.objective_range();
        let obj_var = self.solver.new_bounded_integer(lb, ub);
        let offset = i32_or_panic(self.objective.constant, "objective constant");
        let mut terms = vec![obj_var.scaled(1)];
        for (var, &coeff) in &self.objective.linear.coefficients {
            let coeff = i32_or_panic(coeff, "objective coefficient");
            terms.push(self.domain_ids[var.index()].scaled(-coeff));
        }
        if self
            .solver
            .add_constraint(constraints::equals(terms, offset))
            .post()
            .is_err()
        {
            return Err(ResolutionError::Infeasible);
        }

        let result = match self.direction {
            ObjectiveDirection::Maximisation => {
                self.solver
                    .maximise(&mut brancher, &mut termination, obj_var)
            }
            ObjectiveDirection::Minimisation => {
                self.solver
                    .minimise(&mut brancher, &mut termination, obj_var)
            }
        };
        // branch and conflict counters are only exposed through the solver's own log
        self.solver.log_statistics();

        let (solution, status) = match result {
            OptimisationResult::Optimal(solution) => (solution, SolutionStatus::Optimal),
            OptimisationResult::Satisfiable(solution) => (solution, SolutionStatus::Feasible),
            OptimisationResult::Unsatisfiable => return Err(ResolutionError::Infeasible),
            OptimisationResult::Unknown => {
                return Err(ResolutionError::Other(
                    "Pumpkin returned Unknown (no proof of optimality or infeasibility)",
                ))
            }
        };
        Ok(PumpkinSolution {
            solution,
            domain_ids: self.domain_ids,
            objective: Some(obj_var),
            status,
        })
    }

    fn add_constraint(&mut self, constraint: Constraint) -> ConstraintReference {
        if self.infeasible_at_root {
            return self.next_reference();
        }
        // sum_i (coeff_i * var_i) + constant <= 0 or = 0
        let rhs = i32_or_panic(-constraint.expression.constant, "constraint constant");
        let terms: Vec<(DomainId, i32)> = constraint
            .expression
            .linear
            .coefficients
            .iter()
            .map(|(var, &coeff)| {
                let coeff = i32_or_panic(coeff, "constraint coefficient");
                (self.domain_ids[var.index()], coeff)
            })
            .filter(|&(_, coeff)| coeff != 0)
            .collect();

        // pumpkin cannot post a bound that contradicts the current domain of a single variable
        let feasible = match terms.as_slice() {
            [] => rhs >= 0 && (!constraint.is_equality || rhs == 0),
            &[(domain, coeff)] => {
                self.single_term_feasible(domain, coeff, rhs, constraint.is_equality)
            }
            _ => true,
        };
        let posted = feasible && {
            let lhs_terms: Vec<_> = terms
                .into_iter()
                .map(|(domain, coeff)| domain.scaled(coeff))
                .collect();
            match (lhs_terms.is_empty(), constraint.is_equality) {
                (true, _) => true,
                (false, true) => self
                    .solver
                    .add_constraint(constraints::equals(lhs_terms, rhs))
                    .post()
                    .is_ok(),
                (false, false) => self
                    .solver
                    .add_constraint(constraints::less_than_or_equals(lhs_terms, rhs))
                    .post()
                    .is_ok(),
            }
        };
        if !posted {
            tracing::debug!(constraint = ?constraint.name, "constraint is infeasible at the root");
            self.infeasible_at_root = true;
        }
        self.next_reference()
    }

    fn name() -> &'static str {
        "Pumpkin Solver"
    }
}

impl ModelWithProducts for PumpkinProblem {
    fn add_product(&mut self, product: Product) -> ConstraintReference {
        if self.infeasible_at_root {
            return self.next_reference();
        }
        let result = self.domain_ids[product.result.index()];
        let left = self.domain_ids[product.left.index()];
        let right = self.domain_ids[product.right.index()];
        if self
            .solver
            .add_constraint(constraints::times(left, right, result))
            .post()
            .is_err()
        {
            tracing::debug!(?product, "product is infeasible at the root");
            self.infeasible_at_root = true;
        }
        self.next_reference()
    }
}

/// A solution from the Pumpkin solver
pub struct PumpkinSolution {
    solution: PumpkinRawSolution,
    domain_ids: Vec<DomainId>,
    /// The hidden variable holding the objective, when there is one
    objective: Option<DomainId>,
    status: SolutionStatus,
}

impl Solution for PumpkinSolution {
    fn value(&self, variable: Variable) -> f64 {
        let domain_id = self.domain_ids[variable.index()];
        self.solution.get_integer_value(domain_id) as f64
    }

    fn status(&self) -> SolutionStatus {
        self.status
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective
            .map(|obj_var| self.solution.get_integer_value(obj_var) as f64)
    }
}

/// Forwards the statistic lines pumpkin writes (`%% name=value`) to `tracing` at debug level
#[derive(Default)]
struct StatisticsToTracing {
    pending: Vec<u8>,
}

impl Write for StatisticsToTracing {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if !line.is_empty() {
                tracing::debug!(target: "solver_demos::pumpkin", "{}", line);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn i32_or_panic(value: f64, context: &str) -> i32 {
    if !value.is_finite() {
        panic!("Pumpkin solver: {} is infinite or NaN: {}", context, value);
    }
    let rounded = value.round();
    if (rounded - value).abs() > 1e-9 {
        panic!(
            "Pumpkin solver: {} must be integral, got: {}",
            context, value
        );
    }
    if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        panic!(
            "Pumpkin solver: {} is out of i32 range, got: {}",
            context, rounded
        );
    }
    rounded as i32
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{pumpkin, StatisticsToTracing};
    use crate::constraint::square;
    use crate::solvers::{ModelWithProducts, SolutionStatus};
    use crate::{variable, ResolutionError, Solution, SolverModel};

    #[test]
    fn can_solve_simple_problem() {
        let mut vars = variables!();
        let x = vars.add(variable().min(0).max(12).integer());
        let y = vars.add(variable().min(0).max(12).integer());

        let solution = vars
            .maximise(x + y)
            .using(pumpkin)
            .with(constraint!(x + y == 12))
            .solve()
            .unwrap();

        let sum = solution.value(x) + solution.value(y);
        assert!((sum - 12.0).abs() <= 1e-9, "x+y must be 12, got {}", sum);
        assert_eq!(solution.status(), SolutionStatus::Optimal);
        assert_eq!(solution.objective_value(), Some(12.));
    }

    #[test]
    fn can_solve_milp() {
        let mut vars = variables!();
        let x = vars.add(variable().integer().clamp(0, 10));
        let y = vars.add(variable().integer().clamp(0, 10));

        let sol = vars
            .maximise(3 * x + 2 * y)
            .using(pumpkin)
            .with(2 * x + 3 * y << 12)
            .with(x + y << 8)
            .solve()
            .unwrap();
        assert!(2.0 * sol.value(x) + 3.0 * sol.value(y) <= 12.0 + 1e-9);
        assert!(sol.value(x) + sol.value(y) <= 8.0 + 1e-9);
        assert_eq!(sol.objective_value(), Some(18.));
    }

    #[test]
    fn squares_a_negative_factor() {
        let mut vars = variables!();
        let d = vars.add(variable().integer().clamp(-4, 4));
        let sq = vars.add(variable().integer().clamp(0, 16));
        let mut model = vars
            .minimise(sq)
            .using(pumpkin)
            .with(constraint!(d <= -3));
        model.add_product(square(sq, d));
        let solution = model.solve().unwrap();
        assert_eq!(solution.value(d), -3.);
        assert_eq!(solution.value(sq), 9.);
    }

    #[test]
    fn contradictory_constraints_are_infeasible() {
        let mut vars = variables!();
        let x = vars.add(variable().integer().clamp(0, 10));
        let result = vars
            .maximise(x)
            .using(pumpkin)
            .with(constraint!(x >= 5))
            .with(constraint!(x <= 2))
            .solve();
        assert!(matches!(result, Err(ResolutionError::Infeasible)));
    }

    #[test]
    fn bound_below_a_propagated_domain_is_infeasible() {
        let mut vars = variables!();
        let x = vars.add(variable().integer().clamp(0, 10));
        let y = vars.add(variable().integer().clamp(0, 4));
        let mut model = vars
            .minimise(x)
            .using(pumpkin)
            .with(constraint!(x + y >= 10))
            .with(constraint!(x <= 3))
            .with(constraint!(x + y <= 12));
        model.add_product(square(x, y));
        assert!(matches!(model.solve(), Err(ResolutionError::Infeasible)));
    }

    #[test]
    fn scaled_single_variable_equality() {
        let mut vars = variables!();
        let x = vars.add(variable().integer().clamp(-5, 5));
        let solution = vars
            .maximise(x)
            .using(pumpkin)
            .with(constraint!(-3 * x == 6))
            .solve()
            .unwrap();
        assert_eq!(solution.value(x), -2.);
    }

    #[test]
    fn statistics_writer_keeps_partial_lines() {
        let mut writer = StatisticsToTracing::default();
        writer.write_all(b"%% numberOfDecisions=12\n%% numberOf").unwrap();
        assert_eq!(writer.pending, b"%% numberOf");
        writer.write_all(b"Conflicts=3\n").unwrap();
        assert!(writer.pending.is_empty());
    }
}
