use solver_demos::{constraint, variables, Expression};

#[test]
fn complex_expression() {
    let mut var1 = variables!();
    let a = var1.add_variable();
    let b = var1.add_variable();
    let c = var1.add_variable();
    let d = var1.add_variable();
    assert_eq!(
        9. * (a - b * 2.) + 4 * c / 2 - d,
        9. * a + (-18.) * b + 2. * c + (-1.) * d
    )
}

#[test]
fn large_sum() {
    let mut var1 = variables!();
    let var_vec: Vec<_> = (0..100_000).map(|_i| var1.add_variable()).collect();
    let sum_right: Expression = var_vec.iter().sum();
    let sum_reverse: Expression = var_vec.iter().rev().sum();
    assert_eq!(sum_right, sum_reverse)
}

#[test]
fn debug_format() {
    let mut vars = variables!();
    let a = vars.add_variable();
    let b = vars.add_variable();
    let expr_str = format!("{:?}", (9 * (1. + a + b / 3)).leq(a + 1));
    assert_eq!(expr_str, "8 v0 + 3 v1 <= -8");
}

#[test]
fn constraint_macro_matches_methods() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let y = vars.add_variable();
    assert_eq!(
        format!("{:?}", constraint!(x + 2 * y <= 14)),
        format!("{:?}", (x + 2 * y).leq(14))
    );
    assert_eq!(
        format!("{:?}", constraint!(3 * x - y >= 0)),
        format!("{:?}", (3 * x - y).geq(0))
    );
}

#[test]
#[cfg(feature = "pumpkin")]
fn variables_macro_integer() {
    use solver_demos::solvers::pumpkin::pumpkin;
    use solver_demos::{Solution, SolverModel};

    variables! {
        vars:
          -5 <= a (integer) <= 1;
           2 <= b (integer) <= 4;
    }
    let solution = vars
        .maximise(10 * (a - b / 5) - b)
        .using(pumpkin)
        .with(constraint!(a + 2 <= b))
        .with(constraint!(1 + a >= 4 - b))
        .solve()
        .expect("solve");
    assert_eq!(solution.value(a), 1.);
    assert_eq!(solution.value(b), 3.);
}

#[test]
#[cfg(feature = "microlp")]
fn variables_macro_continuous() {
    use solver_demos::solvers::microlp::microlp;
    use solver_demos::{Solution, SolverModel};

    variables! {
        vars:
               a <= 1;
          2 <= b <= 4;
    }
    let solution = vars
        .maximise(10 * (a - b / 5) - b)
        .using(microlp)
        .with(constraint!(a + 2 <= b))
        .with(constraint!(1 + a >= 4 - b))
        .solve()
        .expect("solve");
    float_eq::assert_float_eq!(solution.value(a), 1., abs <= 1e-5);
    float_eq::assert_float_eq!(solution.value(b), 3., abs <= 1e-5);
}
