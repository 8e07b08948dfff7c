//! Two small optimization scenarios built on a typed modeling layer.
//!
//! Problems are described with [variables], affine [Expression]s, linear [Constraint]s and
//! multiplication equalities ([constraint::Product]), then handed to an external solver
//! [Backend](solvers::Backend) selected by name.
//!
//! ```rust
//! use solver_demos::*;
//! use solver_demos::solvers::{Backend, ObjectiveDirection};
//!
//! variables! {vars: a >= 0; b >= 0;}
//! let problem = Problem::new(vars, ObjectiveDirection::Maximisation, 9. * (a * 2 + b / 3))
//!     .with(constraint!(a + 2 <= b))
//!     .with(constraint!(3 - a >= b));
//!
//! let outcome = Backend::by_name("microlp").unwrap().solve(&problem)?;
//! println!("a={}   b={}", outcome.value(a), outcome.value(b));
//! assert_eq!(outcome.status, SolutionStatus::Optimal);
//! # Ok::<_, ResolutionError>(())
//! ```

pub use affine_expression_trait::IntoAffineExpression;
pub use constraint::Constraint;
pub use expression::Expression;
pub use problem::{Problem, SolveOutcome};
pub use solvers::{Backend, ResolutionError, Solution, SolutionStatus, SolverModel};
pub use variable::{variable, ProblemVariables, Variable};

#[macro_use]
mod variables_macro;
#[macro_use]
pub mod constraint;
mod affine_expression_trait;
pub mod error;
mod expression;
pub mod logging;
pub mod problem;
pub mod report;
pub mod scenarios;
pub mod solvers;
pub mod variable;
