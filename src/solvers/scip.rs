//! A solver that uses [SCIP](https://scipopt.org), one
//! of the fastest non-commercial solvers for mixed integer programming.
//!
//! SCIP handles continuous and integer variables, and multiplication
//! equalities through its nonlinear constraint handler.

use std::collections::HashMap;

use russcip::model::Model;
use russcip::model::ModelWithProblem;
use russcip::model::ObjSense;
use russcip::model::ProblemCreated;
use russcip::model::Solved;
use russcip::variable::VarType;
use russcip::ProblemOrSolving;
use russcip::WithSolutions;

use crate::constraint::Product;
use crate::variable::{UnsolvedProblem, VariableDefinition};
use crate::{
    constraint::ConstraintReference,
    solvers::{
        ModelWithProducts, ObjectiveDirection, ResolutionError, Solution, SolutionStatus,
        SolveStatistics, SolverModel,
    },
};
use crate::{Constraint, Variable};

/// The [SCIP](https://scipopt.org) solver,
/// to be used with [UnsolvedProblem::using].
pub fn scip(to_solve: UnsolvedProblem) -> SCIPProblem {
    let mut model = Model::new()
        .hide_output()
        .include_default_plugins()
        .create_prob("problem")
        .set_obj_sense(match to_solve.direction {
            ObjectiveDirection::Maximisation => ObjSense::Maximize,
            ObjectiveDirection::Minimisation => ObjSense::Minimize,
        });
    let mut var_map = HashMap::new();

    for (
        var,
        &VariableDefinition {
            min,
            max,
            is_integer,
            ref name,
        },
    ) in to_solve.variables.iter_variables_with_def()
    {
        let coeff = *to_solve
            .objective
            .linear
            .coefficients
            .get(&var)
            .unwrap_or(&0.);
        let var_type = match is_integer {
            true => VarType::Integer,
            false => VarType::Continuous,
        };
        let id = model.add_var(min, max, coeff, name.as_str(), var_type);
        var_map.insert(var, id);
    }

    SCIPProblem {
        model,
        id_for_var: var_map,
        objective_constant: to_solve.objective.constant,
    }
}

/// A SCIP Model
pub struct SCIPProblem {
    // the underlying SCIP model representing the problem
    model: Model<ProblemCreated>,
    // map from problem variables to SCIP variable ids
    id_for_var: HashMap<Variable, russcip::Variable>,
    // SCIP objectives have no constant term
    objective_constant: f64,
}

impl SolverModel for SCIPProblem {
    type Solution = SCIPSolved;
    type Error = ResolutionError;

    fn solve(self) -> Result<Self::Solution, Self::Error> {
        let solved_model = self.model.solve();
        let status = match solved_model.status() {
            russcip::status::Status::Optimal => SolutionStatus::Optimal,
            russcip::Status::TimeLimit | russcip::Status::GapLimit
                if solved_model.best_sol().is_some() =>
            {
                SolutionStatus::Feasible
            }
            russcip::status::Status::Infeasible => return Err(ResolutionError::Infeasible),
            russcip::status::Status::Unbounded => return Err(ResolutionError::Unbounded),
            other_status => {
                return Err(ResolutionError::Str(format!(
                    "Unexpected status {:?}",
                    other_status
                )))
            }
        };
        Ok(SCIPSolved {
            status,
            solved_problem: solved_model,
            id_for_var: self.id_for_var,
            objective_constant: self.objective_constant,
        })
    }

    fn add_constraint(&mut self, c: Constraint) -> ConstraintReference {
        let constant = -c.expression.constant;
        let lhs = match c.is_equality {
            true => constant,
            false => -f64::INFINITY,
        };

        let n_vars_in_cons = c.expression.linear.coefficients.len();
        let mut vars_in_cons = Vec::with_capacity(n_vars_in_cons);
        let mut coeffs = Vec::with_capacity(n_vars_in_cons);
        for (&var, &coeff) in c.expression.linear.coefficients.iter() {
            vars_in_cons.push(&self.id_for_var[&var]);
            coeffs.push(coeff);
        }

        let index = self.model.n_conss() + 1;
        let name = c.name.unwrap_or_else(|| format!("c{}", index));
        self.model
            .add_cons(vars_in_cons, &coeffs, lhs, constant, name.as_str());

        ConstraintReference { index }
    }

    fn name() -> &'static str {
        "SCIP"
    }
}

impl ModelWithProducts for SCIPProblem {
    /// Adds `result - left * right = 0` as a quadratic constraint
    fn add_product(&mut self, product: Product) -> ConstraintReference {
        let Self {
            id_for_var, model, ..
        } = self;
        let index = model.n_conss() + 1;
        model.add_cons_quadratic(
            vec![&id_for_var[&product.result]],
            &mut [1.],
            vec![&id_for_var[&product.left]],
            vec![&id_for_var[&product.right]],
            &mut [-1.],
            0.,
            0.,
            format!("product{}", index).as_str(),
        );
        ConstraintReference { index }
    }
}

/// A wrapper to a solved SCIP problem
pub struct SCIPSolved {
    status: SolutionStatus,
    solved_problem: Model<Solved>,
    id_for_var: HashMap<Variable, russcip::Variable>,
    objective_constant: f64,
}

impl Solution for SCIPSolved {
    fn value(&self, var: Variable) -> f64 {
        self.solved_problem
            .best_sol()
            .map(|sol| sol.val(&self.id_for_var[&var]))
            .unwrap_or(f64::NAN)
    }

    fn status(&self) -> SolutionStatus {
        self.status
    }

    fn objective_value(&self) -> Option<f64> {
        Some(self.solved_problem.obj_val() + self.objective_constant)
    }

    fn statistics(&self) -> SolveStatistics {
        SolveStatistics {
            iterations: Some(self.solved_problem.n_lp_iterations() as u64),
            branches: Some(self.solved_problem.n_nodes() as u64),
            ..SolveStatistics::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::constraint::square;
    use crate::solvers::ModelWithProducts;
    use crate::{variable, Solution, SolverModel};

    use super::scip;

    #[test]
    fn can_solve_with_inequality() {
        let mut vars = variables!();
        let x = vars.add(variable().clamp(0, 2));
        let y = vars.add(variable().clamp(1, 3));
        let solution = vars
            .maximise(x + y)
            .using(scip)
            .with((2 * x + y) << 4)
            .solve()
            .unwrap();
        assert_eq!((solution.value(x), solution.value(y)), (0.5, 3.))
    }

    #[test]
    fn can_solve_with_equality() {
        let mut vars = variables!();
        let x = vars.add(variable().clamp(0, 2).integer());
        let y = vars.add(variable().clamp(1, 3).integer());
        let solution = vars
            .maximise(x + y)
            .using(scip)
            .with(constraint!(2 * x + y == 4))
            .with(constraint!(x + 2 * y <= 5))
            .solve()
            .unwrap();
        assert_eq!((solution.value(x), solution.value(y)), (1., 2.));
        assert!(solution.statistics().branches.is_some());
    }

    #[test]
    fn can_solve_with_a_square() {
        let mut vars = variables!();
        let d = vars.add(variable().integer().clamp(-4, 4));
        let sq = vars.add(variable().integer().clamp(0, 16));
        let mut model = vars
            .minimise(sq)
            .using(scip)
            .with(constraint!(d <= -3));
        model.add_product(square(sq, d));
        let solution = model.solve().unwrap();
        assert_eq!((solution.value(d), solution.value(sq)), (-3., 9.));
        assert_eq!(solution.objective_value(), Some(9.));
    }
}
