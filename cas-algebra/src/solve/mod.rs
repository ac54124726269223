//! Equation solving.
//!
//! [`solve_equation`] finds the values of one variable that make an expression zero. It tries,
//! in order:
//!
//! 1. splitting products, quotients and powers into simpler equations (`f * g = 0` holds when
//!    either factor is zero);
//! 2. the closed forms for polynomials, see [`polynomial`];
//! 3. substituting a repeated subtree with a fresh variable, when that turns the equation into a
//!    polynomial of degree 2 or more (`sin(x)^2 + sin(x) - 2 = 0` becomes `t^2 + t - 2 = 0`);
//! 4. inverting the functions around the single occurrence of the variable, see [`invert`].
//!
//! If none of these finds a root and the [`ALLOW_NEWTON`] setting is on, Newton's method is run
//! from a grid of seeds in the complex plane, see [`newton`]. That search only covers the window
//! of the [`NEWTON_SOLVER`](crate::settings::NEWTON_SOLVER) setting and may miss roots.
//!
//! [`solve`] solves systems of equations by solving one equation at a time and substituting the
//! result into the others.

mod invert;
mod newton;
mod polynomial;
mod system;

pub use system::{solve, SystemSolution};

use crate::cancel::check_cancelled;
use crate::settings::{
    ALLOW_NEWTON,
    FLOAT_TO_RATIONAL_ITER_COUNT,
    MAX_EXPANSION_TERM_COUNT,
    PRECISION_ERROR_COMMON,
    PRECISION_ERROR_ZERO_RANGE,
};
use crate::symbolic::expr::{CompareOp, Domain, Entity, Node, SetOp};
use crate::symbolic::simplify::simplify;
use cas_error::Error;
use tracing::debug;

/// Turns an equation `l = r` into the expression `l - r`, which is zero exactly when the equation
/// holds. Any other expression is returned as is.
pub(crate) fn normalize(equation: &Entity) -> Entity {
    match equation.node() {
        Node::Compare(CompareOp::Equal, lhs, rhs) => lhs - rhs,
        _ => equation.clone(),
    }
}

/// Solves `equation = 0` for the variable `x`, or `lhs = rhs` if the equation is an
/// [`Entity::equation`].
///
/// Returns a finite set of simplified roots. Roots that only exist under some condition are
/// wrapped in [`Node::Provided`], and periodic roots contain fresh integer variables named
/// `n_1`, `n_2`, and so on. If the equation holds for every `x`, the set of complex numbers is
/// returned instead. If it holds for every `x` only under a condition, as `a*x + b = 0` does when
/// `a = 0` and `b = 0`, the result is the union of the finite set with the set of complex numbers
/// provided that condition. A set that is empty means that no root was found, not necessarily
/// that there is none.
///
/// Fails only if the computation is cancelled.
pub fn solve_equation(equation: &Entity, x: &str) -> Result<Entity, Error> {
    let _zero_range = PRECISION_ERROR_ZERO_RANGE.set(1e-12);
    let _rational = FLOAT_TO_RATIONAL_ITER_COUNT.set(0);
    let _expansion = MAX_EXPANSION_TERM_COUNT.set(50);

    let expr = simplify(&normalize(equation))?;
    debug!(equation = %expr, var = x, "solving equation");
    if expr.is_zero() {
        return Ok(Entity::domain(Domain::Complexes));
    }

    let roots = match solve_zero(&expr, x)? {
        Some(roots) if !roots.is_empty() => roots,
        _ if ALLOW_NEWTON.get() => newton::find_roots(&expr, x)?,
        found => found.unwrap_or_default(),
    };

    let (everywhere, roots): (Vec<_>, Vec<_>) = finalize(roots)?.into_iter().partition(holds_everywhere);
    debug!(count = roots.len(), conditional = everywhere.len(), var = x, "solved equation");
    Ok(everywhere.into_iter().fold(Entity::finite_set(roots), |set, branch| {
        Entity::set_op(SetOp::Union, set, branch)
    }))
}

/// Returns `true` for a root standing for every value under some condition.
fn holds_everywhere(root: &Entity) -> bool {
    match root.node() {
        Node::Provided(value, _) => holds_everywhere(value),
        Node::Domain(_) => true,
        _ => false,
    }
}

/// Finds roots of `expr = 0` with the analytic methods.
///
/// Returns [`None`] if none of the methods applies.
fn solve_zero(expr: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    check_cancelled()?;
    if !expr.contains_variable(x) {
        return Ok(Some(Vec::new()));
    }

    if let Some(roots) = split(expr, x)? {
        return Ok(Some(roots));
    }
    if let Some(roots) = polynomial::solve_polynomial(expr, x)? {
        return Ok(Some(roots));
    }
    if let Some(roots) = substitute(expr, x)? {
        return Ok(Some(roots));
    }
    invert::invert(expr, &Entity::integer(0), x)
}

/// Splits an expression whose root structure follows from its shape: products, quotients,
/// powers and conditional expressions.
fn split(expr: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    match expr.node() {
        Node::Product(factors) => {
            let mut roots = Vec::new();
            let mut solved_any = false;
            for factor in factors.iter().filter(|f| f.contains_variable(x)) {
                if let Some(found) = solve_zero(factor, x)? {
                    roots.extend(found);
                    solved_any = true;
                }
            }
            Ok(solved_any.then_some(roots))
        },
        Node::Divide(num, den) => {
            let Some(candidates) = solve_zero(num, x)? else {
                return Ok(None);
            };
            let mut roots = Vec::new();
            for root in candidates {
                if holds_everywhere(&root) {
                    roots.push(root);
                    continue;
                }
                let den_at_root = simplify(&den.substitute(x, &root))?;
                let vanishes = den_at_root.as_number().is_some_and(|n| n.is_effectively_zero());
                if !vanishes {
                    roots.push(root);
                }
            }
            Ok(Some(roots))
        },
        Node::Power(base, exp) if !exp.contains_variable(x) => match exp.as_number() {
            Some(n) if n.is_positive() => solve_zero(base, x),
            Some(n) if n.is_negative() => Ok(Some(Vec::new())),
            _ => Ok(None),
        },
        Node::Provided(value, condition) => Ok(solve_zero(value, x)?.map(|roots| {
            roots.into_iter()
                .map(|root| {
                    let condition = condition.substitute(x, &root);
                    Entity::provided(root, condition)
                })
                .collect()
        })),
        _ => Ok(None),
    }
}

/// Replaces the smallest subtree containing `x` that turns the expression into a polynomial of
/// degree 2 or more, solves that polynomial, then solves `subtree = root` for every root.
fn substitute(expr: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    let mut candidates = expr.nodes()
        .filter(|node| *node != expr && node.as_variable() != Some(x) && node.contains_variable(x))
        .cloned()
        .collect::<Vec<_>>();
    candidates.sort_by_key(Entity::size);
    candidates.dedup();

    let placeholder = expr.fresh_variable("t");
    let Some(name) = placeholder.as_variable() else {
        return Ok(None);
    };
    for candidate in candidates {
        let replaced = expr.replace(&candidate, &placeholder);
        if replaced.contains_variable(x) || !matches!(polynomial::degree(&replaced, name), Some(d) if d >= 2) {
            continue;
        }

        let Some(values) = polynomial::solve_polynomial(&replaced, name)? else {
            continue;
        };
        debug!(subtree = %candidate, "solving by substitution");
        let mut roots = Vec::new();
        for value in values.iter().filter(|value| !holds_everywhere(value)) {
            if let Some(found) = solve_zero(&(&candidate - value), x)? {
                roots.extend(found);
            }
        }
        return Ok(Some(roots));
    }

    Ok(None)
}

/// Simplifies the roots, drops the ones that are not finite numbers and merges duplicates, both
/// structural and numeric.
fn finalize(roots: Vec<Entity>) -> Result<Vec<Entity>, Error> {
    let tolerance = PRECISION_ERROR_COMMON.get();
    let mut merged: Vec<Entity> = Vec::new();
    for root in roots {
        let root = simplify(&root)?;
        if root.as_number().is_some_and(|n| n.is_nan() || !n.is_finite()) {
            continue;
        }

        let duplicate = merged.iter().any(|kept| match (kept.as_number(), root.as_number()) {
            (Some(a), Some(b)) => (a - b).abs().to_f64() < tolerance,
            _ => *kept == root,
        });
        if !duplicate {
            merged.push(root);
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::cancel::CancellationToken;
    use crate::error::Cancelled;
    use crate::numeric::Number;
    use crate::settings::{CANCELLATION, NEWTON_SOLVER, NewtonSetting};
    use crate::symbolic::eval::{evaluate, evaluate_with};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};
    use super::*;

    fn x() -> Entity {
        Entity::var("x")
    }

    fn roots_of(set: &Entity) -> Vec<Entity> {
        match set.node() {
            Node::FiniteSet(roots) => roots.clone(),
            _ => panic!("expected a finite set, got {}", set),
        }
    }

    /// `x^5 - x - 1`, which has no root in closed form.
    fn quintic() -> Entity {
        Entity::sum([Entity::pow(x(), Entity::integer(5)), -x(), Entity::integer(-1)])
    }

    #[test]
    fn symbolic_coefficients() {
        // a*x + b = 0
        let (a, b) = (Entity::var("a"), Entity::var("b"));
        let set = solve_equation(&(&a * &x() + &b), "x").unwrap();
        let Node::SetOp(SetOp::Union, finite, everywhere) = set.node() else {
            panic!("expected a union, got {}", set);
        };

        let roots = roots_of(finite);
        assert_eq!(roots.len(), 1);
        let Node::Provided(root, _) = roots[0].node() else {
            panic!("expected a conditional root, got {}", roots[0]);
        };
        let vars = HashMap::from([
            ("a".to_string(), Number::integer(2)),
            ("b".to_string(), Number::integer(-3)),
        ]);
        assert_eq!(evaluate_with(root, &vars).unwrap(), Number::rational(3, 2));

        let Node::Provided(domain, condition) = everywhere.node() else {
            panic!("expected a conditional domain, got {}", everywhere);
        };
        assert_eq!(domain, &Entity::domain(Domain::Complexes));
        assert!(condition.contains_variable("a") && condition.contains_variable("b"));
    }

    #[test]
    fn quadratics() {
        let square = Entity::pow(x(), Entity::integer(2));
        assert_eq!(
            solve_equation(&(&square - Entity::integer(1)), "x").unwrap(),
            Entity::finite_set([Entity::integer(1), Entity::integer(-1)]),
        );
        assert_eq!(
            solve_equation(&(&square + Entity::integer(1)), "x").unwrap(),
            Entity::finite_set([Entity::imaginary(1), Entity::imaginary(-1)]),
        );
    }

    #[test]
    fn linear() {
        let equation = Entity::equation(Entity::product([Entity::integer(3), x()]), Entity::integer(2));
        assert_eq!(
            solve_equation(&equation, "x").unwrap(),
            Entity::finite_set([Entity::rational(2, 3)]),
        );

        // `x - x = 0` holds everywhere, `x - x + 1 = 0` nowhere
        assert_eq!(solve_equation(&(x() - x()), "x").unwrap(), Entity::domain(Domain::Complexes));
        let never = x() - x() + Entity::integer(1);
        assert_eq!(solve_equation(&never, "x").unwrap(), Entity::empty_set());
    }

    #[test]
    fn rational_roots_of_cubics() {
        // (x - 1)(x - 2)(x + 3), expanded
        let cubic = Entity::sum([
            Entity::pow(x(), Entity::integer(3)),
            Entity::product([Entity::integer(-7), x()]),
            Entity::integer(6),
        ]);
        let roots = roots_of(&solve_equation(&cubic, "x").unwrap());
        assert_eq!(roots.len(), 3);
        for expected in [1, 2, -3] {
            assert!(roots.contains(&Entity::integer(expected)), "missing root {}", expected);
        }
    }

    #[test]
    fn zero_products_and_quotients() {
        let product = Entity::product([x() - Entity::integer(2), x() + Entity::integer(5)]);
        assert_eq!(
            solve_equation(&product, "x").unwrap(),
            Entity::finite_set([Entity::integer(2), Entity::integer(-5)]),
        );

        // the root `x = 1` of the numerator is a pole
        let quotient = Entity::div(
            Entity::pow(x(), Entity::integer(2)) - Entity::integer(1),
            x() - Entity::integer(1),
        );
        let roots = roots_of(&solve_equation(&quotient, "x").unwrap());
        assert!(!roots.contains(&Entity::integer(1)));
    }

    #[test]
    fn inversion() {
        let exponential = Entity::pow(Entity::integer(2), x()) - Entity::integer(8);
        assert_eq!(solve_equation(&exponential, "x").unwrap(), Entity::finite_set([Entity::integer(3)]));

        let reciprocal = Entity::div(Entity::integer(1), x()) - Entity::integer(4);
        assert_eq!(
            solve_equation(&reciprocal, "x").unwrap(),
            Entity::finite_set([Entity::rational(1, 4)]),
        );

        let periodic = roots_of(&solve_equation(&Entity::sin(x()), "x").unwrap());
        assert_eq!(periodic.len(), 2);
        assert!(periodic.iter().all(|root| root.contains_variable("n_1")));
    }

    #[test]
    fn substitution() {
        let s = Entity::sin(x());
        let equation = Entity::sum([Entity::pow(s.clone(), Entity::integer(2)), s, Entity::integer(-2)]);
        let roots = roots_of(&solve_equation(&equation, "x").unwrap());

        // `sin(x) = 1` or `sin(x) = -2`
        assert!(!roots.is_empty());
        let at_zero = roots.iter()
            .map(|root| {
                let vars = HashMap::from([("n_1".to_string(), Number::integer(0))]);
                evaluate_with(&Entity::sin(root.clone()), &vars).unwrap().to_f64_pair()
            })
            .collect::<Vec<_>>();
        assert!(at_zero.iter().any(|(re, im)| (re - 1.0).abs() < 1e-9 && im.abs() < 1e-9));
    }

    #[test]
    fn newton_fallback() {
        let without = ALLOW_NEWTON.run_with(false, || solve_equation(&quintic(), "x")).unwrap();
        assert_eq!(without, Entity::empty_set());

        let with = roots_of(&solve_equation(&quintic(), "x").unwrap());
        assert!(!with.is_empty());
        for root in with {
            let vars = HashMap::from([("x".to_string(), root.as_number().unwrap().clone())]);
            let value = evaluate_with(&quintic(), &vars).unwrap();
            assert_float_absolute_eq!(value.abs().to_f64(), 0.0, 1e-6);
        }
    }

    #[test]
    fn settings_are_scoped_per_thread() {
        let barrier = std::sync::Barrier::new(2);
        std::thread::scope(|scope| {
            let disabled = scope.spawn(|| {
                let _newton = ALLOW_NEWTON.set(false);
                barrier.wait();
                solve_equation(&quintic(), "x").unwrap()
            });
            let enabled = scope.spawn(|| {
                barrier.wait();
                solve_equation(&quintic(), "x").unwrap()
            });

            assert_eq!(disabled.join().unwrap(), Entity::empty_set());
            assert_ne!(enabled.join().unwrap(), Entity::empty_set());
        });

        assert!(ALLOW_NEWTON.get());
        assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 2000);
    }

    #[test]
    fn cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = CANCELLATION.run_with(Some(token), || solve_equation(&quintic(), "x")).unwrap_err();
        assert!(err.is::<Cancelled>());
        assert!(CANCELLATION.get().is_none());
    }

    #[test]
    fn cancelled_while_running() {
        let token = CancellationToken::new();
        let remote = token.clone();
        let wide = NewtonSetting { step_count: (400, 400), ..NewtonSetting::default() };

        let start = Instant::now();
        let result = std::thread::scope(|scope| {
            scope.spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                remote.cancel();
            });
            NEWTON_SOLVER.run_with(wide, || {
                CANCELLATION.run_with(Some(token), || solve_equation(&quintic(), "x"))
            })
        });

        assert!(result.unwrap_err().is::<Cancelled>());
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn numeric_roots_are_checked() {
        // `x + sin(x) = 0` only has the root `0`
        let equation = x() + Entity::sin(x());
        for root in roots_of(&solve_equation(&equation, "x").unwrap()) {
            let vars = HashMap::from([("x".to_string(), evaluate(&root).unwrap())]);
            let value = evaluate_with(&equation, &vars).unwrap();
            assert_float_absolute_eq!(value.abs().to_f64(), 0.0, 1e-6);
        }
    }
}
