//! Solver backends, and the traits they implement.
//!
//! Each backend lives in its own module behind a cargo feature. The [Backend] enum
//! lists the backends compiled into the crate and lets them be selected by name.
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::constraint::{ConstraintReference, Product};
use crate::problem::{Problem, SolveOutcome};
use crate::variable::UnsolvedProblem;
use crate::{Constraint, Expression, Variable};

#[cfg(feature = "microlp")]
pub mod microlp;
#[cfg(feature = "pumpkin")]
pub mod pumpkin;
#[cfg(feature = "scip")]
pub mod scip;

/// Whether to search for the variable values that give the highest
/// or the lowest value of the objective function.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum ObjectiveDirection {
    /// Find the highest value of the objective
    Maximisation,
    /// Find the lowest value of the objective
    Minimisation,
}

/// Represents an error that occurred when solving a problem
#[derive(Debug, PartialEq, Clone, Error)]
pub enum ResolutionError {
    /// The problem is [unbounded](https://www.matem.unam.mx/~omar/math340/unbounded.html).
    /// It doesn't have a finite optimal values for its variables.
    /// The objective can be made infinitely large without violating any constraints.
    #[error("Unbounded: the objective can be made infinitely large without violating any constraints")]
    Unbounded,
    ///  There exists no solution that satisfies all of the constraints
    #[error("Infeasible: the problem has no solution satisfying all of its constraints")]
    Infeasible,
    /// The backend cannot represent multiplication equalities
    #[error("{0} does not support multiplication constraints")]
    UnsupportedProducts(&'static str),
    /// Another error occurred
    #[error("An internal error occurred in the solver: {0}")]
    Other(&'static str),
    /// Another error occurred
    #[error("An internal error occurred in the solver: {0}")]
    Str(String),
}

/// The status reported together with a solve result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// The solution is proven to be optimal
    Optimal,
    /// The solution satisfies every constraint, but was not proven optimal
    Feasible,
    /// No assignment satisfies every constraint
    Infeasible,
    /// The objective can be improved without limit
    Unbounded,
    /// The solver stopped without reaching a conclusion
    Unknown,
}

impl SolutionStatus {
    /// Whether a solution came with this status
    pub fn has_solution(self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::Feasible)
    }
}

impl Display for SolutionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SolutionStatus::Optimal => "OPTIMAL",
            SolutionStatus::Feasible => "FEASIBLE",
            SolutionStatus::Infeasible => "INFEASIBLE",
            SolutionStatus::Unbounded => "UNBOUNDED",
            SolutionStatus::Unknown => "UNKNOWN",
        })
    }
}

/// Performance counters of a solve.
///
/// The wall time is always measured. The other counters are only filled
/// when the backend exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStatistics {
    /// Time spent solving
    pub wall_time: Duration,
    /// Simplex iterations
    pub iterations: Option<u64>,
    /// Branches, or branch-and-bound nodes
    pub branches: Option<u64>,
    /// Conflicts found during search
    pub conflicts: Option<u64>,
}

/// A solver's own representation of a model, to which constraints can be added.
pub trait SolverModel {
    /// The type of the solution to the problem
    type Solution: Solution;
    /// The error that can occur while solving the problem
    type Error;

    /// Takes a model and adds a constraint to it
    fn with(mut self, constraint: Constraint) -> Self
    where
        Self: Sized,
    {
        self.add_constraint(constraint);
        self
    }

    /// Adds all the given constraints
    fn with_all<I: IntoIterator<Item = Constraint>>(mut self, constraints: I) -> Self
    where
        Self: Sized,
    {
        for constraint in constraints {
            self.add_constraint(constraint);
        }
        self
    }

    /// Find the solution for the problem being modeled
    fn solve(self) -> Result<Self::Solution, Self::Error>;

    /// Adds a constraint to the Model and returns a reference to the index
    fn add_constraint(&mut self, c: Constraint) -> ConstraintReference;

    /// Name of the solver
    fn name() -> &'static str
    where
        Self: Sized;
}

/// A model that accepts multiplication equalities between integer variables
pub trait ModelWithProducts {
    /// Adds the constraint `result = left * right`
    fn add_product(&mut self, product: Product) -> ConstraintReference;
}

/// A problem solution
pub trait Solution {
    /// Get the optimal value of a variable of the problem
    fn value(&self, variable: Variable) -> f64;

    /// Evaluate an expression with the values of this solution
    fn eval<E: crate::IntoAffineExpression>(&self, expr: E) -> f64
    where
        Self: Sized,
    {
        expr.eval_with(self)
    }

    /// How good the solution is
    fn status(&self) -> SolutionStatus {
        SolutionStatus::Optimal
    }

    /// The objective value as reported by the solver, if it reports one
    fn objective_value(&self) -> Option<f64> {
        None
    }

    /// Counters reported by the solver
    fn statistics(&self) -> SolveStatistics {
        SolveStatistics::default()
    }
}

impl<N: Into<f64> + Clone> Solution for HashMap<Variable, N> {
    fn value(&self, variable: Variable) -> f64 {
        self[&variable].clone().into()
    }
}

/// The backends compiled into this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// [microlp](https://docs.rs/microlp), a pure rust simplex solver
    #[cfg(feature = "microlp")]
    Microlp,
    /// [pumpkin](https://docs.rs/pumpkin-solver), a pure rust constraint programming solver
    #[cfg(feature = "pumpkin")]
    Pumpkin,
    /// [SCIP](https://scipopt.org), through the russcip bindings
    #[cfg(feature = "scip")]
    Scip,
}

impl Backend {
    /// Every backend available in this build
    pub fn available() -> Vec<Backend> {
        let mut backends = Vec::new();
        #[cfg(feature = "microlp")]
        backends.push(Backend::Microlp);
        #[cfg(feature = "pumpkin")]
        backends.push(Backend::Pumpkin);
        #[cfg(feature = "scip")]
        backends.push(Backend::Scip);
        backends
    }

    /// Look a backend up by its name, ignoring case.
    /// Returns `None` if no backend with that name was compiled in.
    ///
    /// ```
    /// use solver_demos::solvers::Backend;
    /// assert_eq!(Backend::by_name("MICROLP"), Some(Backend::Microlp));
    /// assert_eq!(Backend::by_name("GLOP"), None);
    /// ```
    pub fn by_name(name: &str) -> Option<Backend> {
        Backend::available()
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(name.trim()))
    }

    /// A backend able to solve linear programs over continuous variables
    pub fn linear(name: &str) -> Option<Backend> {
        Backend::by_name(name).filter(|backend| backend.supports_continuous())
    }

    /// A backend able to handle integer variables and multiplication equalities
    pub fn constraint_programming(name: &str) -> Option<Backend> {
        Backend::by_name(name).filter(|backend| backend.supports_products())
    }

    /// The name used to select this backend
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "microlp")]
            Backend::Microlp => "microlp",
            #[cfg(feature = "pumpkin")]
            Backend::Pumpkin => "pumpkin",
            #[cfg(feature = "scip")]
            Backend::Scip => "scip",
        }
    }

    /// Whether continuous variables are accepted
    pub fn supports_continuous(self) -> bool {
        match self {
            #[cfg(feature = "microlp")]
            Backend::Microlp => true,
            #[cfg(feature = "pumpkin")]
            Backend::Pumpkin => false,
            #[cfg(feature = "scip")]
            Backend::Scip => true,
        }
    }

    /// Whether multiplication equalities are accepted
    pub fn supports_products(self) -> bool {
        match self {
            #[cfg(feature = "microlp")]
            Backend::Microlp => false,
            #[cfg(feature = "pumpkin")]
            Backend::Pumpkin => true,
            #[cfg(feature = "scip")]
            Backend::Scip => true,
        }
    }

    /// Build a fresh model of the problem for this backend, solve it,
    /// and collect the result.
    ///
    /// Infeasible and unbounded problems give an outcome with the matching status.
    /// Any other failure of the backend is returned as an error.
    pub fn solve(self, problem: &Problem) -> Result<SolveOutcome, ResolutionError> {
        tracing::debug!(
            backend = self.name(),
            variables = problem.variables().len(),
            constraints = problem.constraints().len(),
            products = problem.products().len(),
            "building model"
        );
        let start = Instant::now();
        let result = match self {
            #[cfg(feature = "microlp")]
            Backend::Microlp => solve_linear(problem, microlp::microlp),
            #[cfg(feature = "pumpkin")]
            Backend::Pumpkin => solve_with_products(problem, pumpkin::pumpkin),
            #[cfg(feature = "scip")]
            Backend::Scip => solve_with_products(problem, scip::scip),
        };
        let wall_time = start.elapsed();
        let outcome = match result {
            Ok(mut outcome) => {
                outcome.statistics.wall_time = wall_time;
                outcome
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::without_solution(SolutionStatus::Infeasible, wall_time)
            }
            Err(ResolutionError::Unbounded) => {
                SolveOutcome::without_solution(SolutionStatus::Unbounded, wall_time)
            }
            Err(other) => return Err(other),
        };
        tracing::debug!(
            backend = self.name(),
            status = %outcome.status,
            wall_time_ms = wall_time.as_secs_f64() * 1000.,
            "solve finished"
        );
        Ok(outcome)
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing the name of a backend that is not compiled in
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no solver backend named {0:?} is available")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::by_name(s).ok_or_else(|| UnknownBackend(s.to_string()))
    }
}

fn unsolved(problem: &Problem) -> UnsolvedProblem {
    problem
        .variables()
        .clone()
        .optimise(problem.direction(), problem.objective().clone())
}

fn solve_linear<S, M>(problem: &Problem, solver: S) -> Result<SolveOutcome, ResolutionError>
where
    S: FnOnce(UnsolvedProblem) -> M,
    M: SolverModel<Error = ResolutionError>,
{
    if !problem.products().is_empty() {
        return Err(ResolutionError::UnsupportedProducts(M::name()));
    }
    let solution = unsolved(problem)
        .using(solver)
        .with_all(problem.constraints().iter().cloned())
        .solve()?;
    Ok(collect(problem, problem.objective(), &solution))
}

fn solve_with_products<S, M>(problem: &Problem, solver: S) -> Result<SolveOutcome, ResolutionError>
where
    S: FnOnce(UnsolvedProblem) -> M,
    M: SolverModel<Error = ResolutionError> + ModelWithProducts,
{
    let mut model = unsolved(problem)
        .using(solver)
        .with_all(problem.constraints().iter().cloned());
    for &product in problem.products() {
        model.add_product(product);
    }
    let solution = model.solve()?;
    Ok(collect(problem, problem.objective(), &solution))
}

fn collect<S: Solution>(problem: &Problem, objective: &Expression, solution: &S) -> SolveOutcome {
    let values = problem
        .variables()
        .iter_variables_with_def()
        .map(|(var, _)| solution.value(var))
        .collect();
    let objective_value = solution
        .objective_value()
        .unwrap_or_else(|| objective.eval_with(solution));
    SolveOutcome {
        status: solution.status(),
        objective_value: Some(objective_value),
        values,
        statistics: solution.statistics(),
    }
}
