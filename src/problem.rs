//! A [Problem] is a complete model description: variables, objective, constraints and products.
//!
//! It is a plain value. Each call to [Backend::solve](crate::solvers::Backend::solve) builds a
//! fresh backend model from it, so the same problem can be solved any number of times.
use std::fmt::{Display, Formatter};

use crate::constraint::Product;
use crate::solvers::{ObjectiveDirection, Solution, SolutionStatus, SolveStatistics};
use crate::variable::{FormatWithVars, ProblemVariables};
use crate::{Constraint, Expression, IntoAffineExpression, Variable};

/// An optimization problem, ready to be handed to any backend.
///
/// ```
/// use solver_demos::*;
/// use solver_demos::solvers::ObjectiveDirection;
///
/// variables! {vars: 0 <= a <= 4; b >= 0;}
/// let problem = Problem::new(vars, ObjectiveDirection::Maximisation, a + b)
///     .with(constraint!(a + 2 * b <= 6).set_name("budget"));
/// assert_eq!(problem.display(&problem.constraints()[0]).to_string(), "budget: a + 2 b <= 6");
/// assert_eq!(problem.display_objective().to_string(), "maximise a + b");
/// ```
#[derive(Clone, Debug)]
pub struct Problem {
    variables: ProblemVariables,
    direction: ObjectiveDirection,
    objective: Expression,
    constraints: Vec<Constraint>,
    products: Vec<Product>,
}

impl Problem {
    /// Create a problem with an objective and no constraints
    pub fn new<E: IntoAffineExpression>(
        variables: ProblemVariables,
        direction: ObjectiveDirection,
        objective: E,
    ) -> Self {
        let objective = Expression::from_other_affine(objective);
        assert!(
            variables.contains_all(objective.linear.coefficients.keys()),
            "The objective uses variables from a different problem"
        );
        Problem {
            variables,
            direction,
            objective,
            constraints: vec![],
            products: vec![],
        }
    }

    /// Add a linear constraint.
    ///
    /// Panics if the constraint uses a variable that was not created with this problem's variables.
    pub fn with(mut self, constraint: Constraint) -> Self {
        assert!(
            self.variables
                .contains_all(constraint.expression.linear.coefficients.keys()),
            "The constraint {:?} uses variables from a different problem",
            constraint
        );
        self.constraints.push(constraint);
        self
    }

    /// Add a multiplication equality.
    ///
    /// Panics if the product uses a variable that was not created with this problem's variables.
    pub fn with_product(mut self, product: Product) -> Self {
        assert!(
            self.variables.contains_all(&product.variables()),
            "The product {:?} uses variables from a different problem",
            product
        );
        self.products.push(product);
        self
    }

    /// The variables of the problem
    pub fn variables(&self) -> &ProblemVariables {
        &self.variables
    }

    /// Whether the objective is maximised or minimised
    pub fn direction(&self) -> ObjectiveDirection {
        self.direction
    }

    /// The objective expression
    pub fn objective(&self) -> &Expression {
        &self.objective
    }

    /// The linear constraints, in insertion order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The multiplication equalities, in insertion order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Render a constraint or product using the variable names of this problem
    pub fn display<'a, V: FormatWithVars + Named>(&'a self, value: &'a V) -> impl Display + 'a {
        WithNames {
            variables: &self.variables,
            value,
        }
    }

    /// Render the objective with its direction, using the variable names of this problem
    pub fn display_objective(&self) -> impl Display + '_ {
        ObjectiveDisplay(self)
    }
}

/// Elements that may carry a name, shown before them when displayed
pub trait Named {
    /// The element name, if any
    fn label(&self) -> Option<&str> {
        None
    }
}

impl Named for Constraint {
    fn label(&self) -> Option<&str> {
        self.name()
    }
}

impl Named for Product {}

struct WithNames<'a, V> {
    variables: &'a ProblemVariables,
    value: &'a V,
}

impl<V: FormatWithVars + Named> Display for WithNames<'_, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(label) = self.value.label() {
            write!(f, "{}: ", label)?;
        }
        self.value
            .format_with(f, |f, var| write!(f, "{}", self.variables.name_of(var)))
    }
}

struct ObjectiveDisplay<'a>(&'a Problem);

impl Display for ObjectiveDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Problem {
            variables,
            direction,
            objective,
            ..
        } = self.0;
        f.write_str(match direction {
            ObjectiveDirection::Maximisation => "maximise ",
            ObjectiveDirection::Minimisation => "minimise ",
        })?;
        objective.format_with(f, |f, var| write!(f, "{}", variables.name_of(var)))
    }
}

/// The result of solving a [Problem] with a backend
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    /// How good the solution is, or why there is none
    pub status: SolutionStatus,
    /// The objective value, when a solution was found
    pub objective_value: Option<f64>,
    /// One value per variable, in creation order. Empty without a solution.
    pub(crate) values: Vec<f64>,
    /// Performance counters
    pub statistics: SolveStatistics,
}

impl SolveOutcome {
    pub(crate) fn without_solution(status: SolutionStatus, wall_time: std::time::Duration) -> Self {
        SolveOutcome {
            status,
            objective_value: None,
            values: vec![],
            statistics: SolveStatistics {
                wall_time,
                ..SolveStatistics::default()
            },
        }
    }

    /// Whether the backend returned a solution
    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }
}

/// Reading a variable of an outcome without a solution gives `NaN`
impl Solution for SolveOutcome {
    fn value(&self, variable: Variable) -> f64 {
        self.values
            .get(variable.index())
            .copied()
            .unwrap_or(f64::NAN)
    }

    fn status(&self) -> SolutionStatus {
        self.status
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    fn statistics(&self) -> SolveStatistics {
        self.statistics
    }
}
