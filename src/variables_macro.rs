/// Declares the variables of a problem.
///
/// `variables!()` creates an empty [ProblemVariables](crate::variable::ProblemVariables).
///
/// `variables!{ vars: ... }` creates a `ProblemVariables` named `vars` and one named
/// [Variable](crate::Variable) per declaration. Each declaration ends with `;` and may carry
/// bounds and an `(integer)` marker:
///
/// ```
/// use solver_demos::variables;
/// variables! {
///     vars:
///            a <= 1;
///       2 <= b (integer) <= 4;
///            c >= -8;
///            d;
/// }
/// assert_eq!(vars.len(), 4);
/// assert_eq!(vars.name_of(b), "b");
/// assert!(vars.definition(b).is_integer());
/// ```
#[macro_export]
macro_rules! variables {
    () => {
        $crate::variable::ProblemVariables::new()
    };
    ($vars:ident: $($declarations:tt)*) => {
        let mut $vars = $crate::variable::ProblemVariables::new();
        $crate::__declare_variables!($vars; $($declarations)*);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __declare_variables {
    ($vars:ident;) => {};
    ($vars:ident; $name:ident $(($kind:ident))?; $($rest:tt)*) => {
        let $name = $vars.add($crate::__integer_if!(
            $crate::variable().name(stringify!($name)) $(, $kind)?
        ));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $name:ident $(($kind:ident))? <= $max:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::__integer_if!(
            $crate::variable().name(stringify!($name)).max($max) $(, $kind)?
        ));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $name:ident $(($kind:ident))? >= $min:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::__integer_if!(
            $crate::variable().name(stringify!($name)).min($min) $(, $kind)?
        ));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $min:literal <= $name:ident $(($kind:ident))? <= $max:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::__integer_if!(
            $crate::variable().name(stringify!($name)).clamp($min, $max) $(, $kind)?
        ));
        $crate::__declare_variables!($vars; $($rest)*);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __integer_if {
    ($def:expr) => {
        $def
    };
    ($def:expr, integer) => {
        $def.integer()
    };
}
