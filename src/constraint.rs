//! Constraints define the (in)equalities that must hold in the solution.
//!
//! A [Constraint] is linear. A [Product] ties a variable to the product of two others,
//! which lets integer backends represent squares without a quadratic objective.
use crate::expression::Expression;
use crate::variable::{FormatWithVars, Variable};
use core::fmt::{Debug, Formatter};
use std::ops::{Shl, Shr, Sub};

/// A constraint represents a single (in)equality that must hold in the solution.
#[derive(Clone)]
pub struct Constraint {
    /// The expression that is constrained to be null or negative
    pub(crate) expression: Expression,
    /// if is_equality, represents expression == 0, otherwise, expression <= 0
    pub(crate) is_equality: bool,
    /// Optional constraint name
    pub(crate) name: Option<String>,
}

impl Constraint {
    fn new(expression: Expression, is_equality: bool) -> Constraint {
        Constraint {
            expression,
            is_equality,
            name: None,
        }
    }

    /// set the constraint name
    pub fn set_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The constraint name, if one was set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this constraint is an equality rather than a `<=` inequality
    pub fn is_equality(&self) -> bool {
        self.is_equality
    }

    /// The variables appearing in the constraint, ordered by creation
    pub fn variables(&self) -> Vec<Variable> {
        self.expression.variables()
    }
}

impl FormatWithVars for Constraint {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        self.expression.linear.format_with(f, variable_format)?;
        write!(f, " {} ", if self.is_equality { "=" } else { "<=" })?;
        write!(f, "{}", -self.expression.constant + 0.)
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

/// equals
pub fn eq<B, A: Sub<B, Output = Expression>>(a: A, b: B) -> Constraint {
    Constraint::new(a - b, true)
}

/// less than or equal
pub fn leq<B, A: Sub<B, Output = Expression>>(a: A, b: B) -> Constraint {
    Constraint::new(a - b, false)
}

/// greater than or equal
pub fn geq<A, B: Sub<A, Output = Expression>>(a: A, b: B) -> Constraint {
    leq(b, a)
}

macro_rules! impl_shifts {
    ($($t:ty)*) => {$(
        impl< RHS> Shl<RHS> for $t where Self: Sub<RHS, Output=Expression> {
            type Output = Constraint;

            fn shl(self, rhs: RHS) -> Self::Output {
                leq(self, rhs)
            }
        }

        impl< RHS: Sub<Self, Output=Expression>> Shr<RHS> for $t {
            type Output = Constraint;

            fn shr(self, rhs: RHS) -> Self::Output {
                geq(self, rhs)
            }
        }
    )*}
}

impl_shifts!(Expression Variable);

/// This macro allows defining constraints using `a + b <= c + d`
/// instead of `(a + b).leq(c + d)` or `a + b << c + d`
///
/// # Example
///
/// ```
/// # use float_eq::assert_float_eq;
/// use solver_demos::*;
/// use solver_demos::solvers::microlp::microlp;
///
/// let mut vars = variables!();
/// let a = vars.add(variable().max(10));
/// let b = vars.add(variable());
/// let solution = vars
///     .maximise(a + b)
///     .using(microlp)
///     .with(constraint!(a - 5 <= b / 2))
///     .with(constraint!(b == a))
///     .solve().unwrap();
/// assert_float_eq!(10., solution.value(a), abs<=1e-8);
/// assert_float_eq!(10., solution.value(b), abs<=1e-8);
/// ```
#[macro_export]
macro_rules! constraint {
    ([$($left:tt)*] <= $($right:tt)*) => {
        $crate::constraint::leq($($left)*, $($right)*)
    };
    ([$($left:tt)*] >= $($right:tt)*) => {
        $crate::constraint::geq($($left)*, $($right)*)
    };
    ([$($left:tt)*] == $($right:tt)*) => {
        $crate::constraint::eq($($left)*, $($right)*)
    };
    // Stop condition: all token have been processed
    ([$($left:tt)*]) => {
        $($left)*
    };
    // The next token is not a special one
    ([$($left:tt)*] $next:tt $($right:tt)*) => {
        $crate::constraint!([$($left)* $next] $($right)*)
    };
    // Initial rule: start the recursive calls
    ($($all:tt)*) => {
        $crate::constraint!([] $($all)*)
    };
}

/// A multiplication equality: `result = left * right`.
///
/// Only backends implementing [ModelWithProducts](crate::solvers::ModelWithProducts)
/// accept it. Squaring a variable uses the same variable for both factors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Product {
    pub(crate) result: Variable,
    pub(crate) left: Variable,
    pub(crate) right: Variable,
}

impl Product {
    /// The three variables involved, result first
    pub fn variables(&self) -> [Variable; 3] {
        [self.result, self.left, self.right]
    }

    /// The variable holding the product
    pub fn result(&self) -> Variable {
        self.result
    }

    /// The two factors
    pub fn factors(&self) -> (Variable, Variable) {
        (self.left, self.right)
    }
}

impl FormatWithVars for Product {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, mut variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        variable_format(f, self.result)?;
        write!(f, " = ")?;
        variable_format(f, self.left)?;
        write!(f, " * ")?;
        variable_format(f, self.right)
    }
}

/// `result = left * right`
pub fn product(result: Variable, left: Variable, right: Variable) -> Product {
    Product {
        result,
        left,
        right,
    }
}

/// `result = factor * factor`
pub fn square(result: Variable, factor: Variable) -> Product {
    product(result, factor, factor)
}

#[derive(Clone, PartialEq, Debug)]
/// A constraint reference contains the sequence id of the constraint within the problem
pub struct ConstraintReference {
    pub(crate) index: usize,
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_leq() {
        let mut vars = variables!();
        let v0 = vars.add_variable();
        let v1 = vars.add_variable();
        let f = format!("{:?}", (3. - v0) >> v1);
        assert_eq!(f, "v0 + v1 <= 3");
    }

    #[test]
    fn geq_is_normalised_to_leq() {
        let mut vars = variables!();
        let x = vars.add_variable();
        let y = vars.add_variable();
        let c = constraint!(3 * x - y >= 0);
        assert!(!c.is_equality());
        assert_eq!(format!("{:?}", c), "-3 v0 + v1 <= 0");
    }

    #[test]
    fn equality_keeps_its_name() {
        let mut vars = variables!();
        let x = vars.add_variable();
        let d = vars.add_variable();
        let c = constraint!(d == x - 5).set_name("link");
        assert!(c.is_equality());
        assert_eq!(c.name(), Some("link"));
        assert_eq!(format!("{:?}", c), "-v0 + v1 = -5");
    }

    #[test]
    fn square_uses_the_factor_twice() {
        let mut vars = variables!();
        let diff = vars.add_variable();
        let squared = vars.add_variable();
        let p = super::square(squared, diff);
        assert_eq!(p.factors(), (diff, diff));
        assert_eq!(format!("{:?}", p), "Product { result: Variable { index: 1 }, left: Variable { index: 0 }, right: Variable { index: 0 } }");
        assert_eq!(p.variables(), [squared, diff, diff]);
    }
}
