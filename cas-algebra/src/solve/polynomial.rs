//! Roots of polynomials.
//!
//! Polynomials of degree 1 and 2 are solved with their closed forms. Before that, two
//! reductions bring higher degrees down:
//!
//! - a common power of `x` is factored out, which contributes the root `0`;
//! - if every power of `x` is a multiple of some `g > 1`, the polynomial is solved in `y = x^g`
//!   and every root of `y` is expanded into its `g` complex `g`-th roots.
//!
//! Anything of degree 3 or more with rational coefficients is searched for rational roots, which
//! are divided out one at a time. Any remaining factor of degree 2 or less is then solved in
//! closed form, and a remaining factor of higher degree is passed to the Newton fallback.

use crate::numeric::Number;
use crate::settings::ALLOW_NEWTON;
use crate::symbolic::expr::{Domain, Entity, ONE, PI, ZERO};
use crate::symbolic::poly::polynomial_coefficients;
use crate::symbolic::simplify::{fraction::with_coefficient, simplify};
use cas_error::Error;
use rug::{Integer, Rational};
use std::collections::BTreeMap;
use tracing::debug;
use super::newton;

/// Divisors larger than this are not enumerated by the rational root search.
const MAX_DIVISOR_SEARCH: u32 = 1_000_000;

/// A polynomial with simplified, non-zero coefficients, keyed by power.
type Sparse = BTreeMap<usize, Entity>;

fn sparse(expr: &Entity, x: &str) -> Result<Option<Sparse>, Error> {
    let Some(poly) = polynomial_coefficients(expr, x)? else {
        return Ok(None);
    };
    Ok(poly.into_iter()
        .map(|(power, coefficient)| Some((power.to_usize()?, coefficient)))
        .collect())
}

/// The degree of the expression as a polynomial in `x`, if it is one.
pub(super) fn degree(expr: &Entity, x: &str) -> Option<usize> {
    let poly = sparse(expr, x).ok()??;
    poly.keys().next_back().copied()
}

/// Solves `expr = 0`, where `expr` is a polynomial in `x`.
///
/// Returns [`None`] if the expression is not a polynomial, or if no root could be found.
pub(super) fn solve_polynomial(expr: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    match sparse(expr, x)? {
        Some(poly) if !poly.is_empty() => solve_sparse(poly, x),
        _ => Ok(None),
    }
}

fn solve_sparse(poly: Sparse, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    let (Some(&lowest), Some(&degree)) = (poly.keys().next(), poly.keys().next_back()) else {
        return Ok(None);
    };
    if degree == 0 {
        return Ok(Some(constant_roots(&coefficient(&poly, 0))));
    }

    if lowest > 0 {
        let shifted = poly.into_iter().map(|(power, c)| (power - lowest, c)).collect();
        let mut roots = vec![ZERO.clone()];
        roots.extend(solve_sparse(shifted, x)?.unwrap_or_default());
        return Ok(Some(roots));
    }

    let step = poly.keys().fold(0, |acc, &power| gcd(acc, power));
    if step > 1 {
        debug!(step, "solving in a power of the variable");
        let reduced = poly.into_iter().map(|(power, c)| (power / step, c)).collect();
        return Ok(solve_sparse(reduced, x)?.map(|roots| {
            roots.iter().flat_map(|root| nth_roots(root, step)).collect()
        }));
    }

    let leading = poly[&degree].clone();
    if leading.as_number().is_none() && !leading.variables().is_empty() {
        return solve_symbolic_leading(poly, degree, leading, x);
    }

    match degree {
        1 => Ok(Some(vec![linear_root(&poly)])),
        2 => Ok(Some(quadratic_roots(&poly))),
        _ => solve_rational(&poly, degree, x),
    }
}

/// The roots of `c = 0` for a constant `c`: every value provided `c = 0` if `c` has free
/// variables, and none otherwise.
fn constant_roots(constant: &Entity) -> Vec<Entity> {
    if constant.variables().is_empty() {
        return Vec::new();
    }
    let everywhere = Entity::domain(Domain::Complexes);
    vec![Entity::provided(everywhere, Entity::equation(constant.clone(), ZERO.clone()))]
}

/// Solves a polynomial whose leading coefficient `a` may be zero: the roots of the full
/// polynomial hold provided `a != 0`, and the roots of the remaining terms provided `a = 0`.
///
/// For `a*x + b`, the remaining term is `b`, so the second case is every value provided
/// `a = 0` and `b = 0`.
fn solve_symbolic_leading(mut poly: Sparse, degree: usize, leading: Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    let nonzero = Entity::not(Entity::equation(leading.clone(), ZERO.clone()));
    let full = match degree {
        1 => Some(vec![linear_root(&poly)]),
        2 => Some(quadratic_roots(&poly)),
        _ => None,
    };

    poly.remove(&degree);
    let lower = solve_sparse(poly, x)?;
    if full.is_none() && lower.is_none() {
        return Ok(None);
    }

    let zero = Entity::equation(leading, ZERO.clone());
    let roots = full.into_iter()
        .flatten()
        .map(|root| Entity::provided(root, nonzero.clone()))
        .chain(lower.into_iter().flatten().map(|root| Entity::provided(root, zero.clone())))
        .collect();
    Ok(Some(roots))
}

fn coefficient(poly: &Sparse, power: usize) -> Entity {
    poly.get(&power).cloned().unwrap_or_else(|| ZERO.clone())
}

/// `a*x + b = 0` when `x = -b/a`
fn linear_root(poly: &Sparse) -> Entity {
    let (a, b) = (coefficient(poly, 1), coefficient(poly, 0));
    Entity::div(-b, a)
}

/// `a*x^2 + b*x + c = 0` when `x = (-b ± sqrt(b^2 - 4ac)) / 2a`
fn quadratic_roots(poly: &Sparse) -> Vec<Entity> {
    let (a, b, c) = (coefficient(poly, 2), coefficient(poly, 1), coefficient(poly, 0));
    let discriminant = Entity::sum([
        Entity::pow(b.clone(), Entity::integer(2)),
        Entity::product([Entity::integer(-4), a.clone(), c]),
    ]);
    let root = Entity::sqrt(discriminant);
    let denominator = Entity::product([Entity::integer(2), a]);
    vec![
        Entity::div(-&b + &root, denominator.clone()),
        Entity::div(-&b - &root, denominator),
    ]
}

/// The `n` complex `n`-th roots of `value`: `value^(1/n) * (cos(2πk/n) + i sin(2πk/n))`.
pub(super) fn nth_roots(value: &Entity, n: usize) -> Vec<Entity> {
    let principal = Entity::pow(value.clone(), Entity::rational(1, n as i64));
    (0..n)
        .map(|k| {
            if k == 0 {
                return principal.clone();
            }
            let angle = with_coefficient(Number::rational(2 * k as i64, n as i64), PI.clone());
            let unit = Entity::cos(angle.clone()) + Entity::product([Entity::imaginary(1), Entity::sin(angle)]);
            Entity::product([principal.clone(), unit])
        })
        .collect()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// The positive divisors of `n`, or [`None`] if `n` is zero or too large to enumerate.
fn divisors(n: &Integer) -> Option<Vec<Integer>> {
    let n = n.clone().abs().to_u32().filter(|n| *n > 0 && *n <= MAX_DIVISOR_SEARCH)?;
    let mut found = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            found.push(Integer::from(d));
            if d * d != n {
                found.push(Integer::from(n / d));
            }
        }
        d += 1;
    }
    Some(found)
}

/// Evaluates the polynomial, with coefficients from the constant term up.
fn horner(coefficients: &[Rational], x: &Rational) -> Rational {
    coefficients.iter().rev().fold(Rational::new(), |acc, c| acc * x + c)
}

/// Divides the polynomial by `x - root`, discarding the remainder.
fn deflate(coefficients: &[Rational], root: &Rational) -> Vec<Rational> {
    let mut quotient = vec![Rational::new(); coefficients.len() - 1];
    let mut carry = Rational::new();
    for power in (1..coefficients.len()).rev() {
        carry = carry * root + &coefficients[power];
        quotient[power - 1] = carry.clone();
    }
    quotient
}

/// Searches the rational roots `±p/q` of a polynomial with rational coefficients, where `p`
/// divides the constant term and `q` divides the leading coefficient once both are scaled to
/// integers.
fn solve_rational(poly: &Sparse, degree: usize, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    let Some(mut coefficients) = (0..=degree)
        .map(|power| coefficient(poly, power).as_number().and_then(Number::as_rational))
        .collect::<Option<Vec<_>>>()
    else {
        return Ok(None);
    };

    let scale = coefficients.iter().fold(Integer::from(1), |acc, c| acc.lcm(c.denom()));
    let (Some(constant), Some(leading)) = (
        coefficients.first().map(|c| Rational::from(c * &scale)),
        coefficients.last().map(|c| Rational::from(c * &scale)),
    ) else {
        return Ok(None);
    };
    let (Some(ps), Some(qs)) = (divisors(constant.numer()), divisors(leading.numer())) else {
        return Ok(None);
    };

    let mut candidates = Vec::new();
    for p in &ps {
        for q in &qs {
            let candidate = Rational::from((p.clone(), q.clone()));
            candidates.push(Rational::from(-&candidate));
            candidates.push(candidate);
        }
    }
    candidates.sort();
    candidates.dedup();

    let mut roots = Vec::new();
    while coefficients.len() > 3 {
        let Some(root) = candidates.iter().find(|c| horner(&coefficients, c).cmp0().is_eq()) else {
            break;
        };
        coefficients = deflate(&coefficients, root);
        roots.push(Entity::number(Number::from_rational(root.clone())));
    }
    if roots.is_empty() {
        return Ok(None);
    }
    debug!(count = roots.len(), "found rational roots");

    let remaining = coefficients.into_iter()
        .enumerate()
        .filter(|(_, c)| !c.cmp0().is_eq())
        .map(|(power, c)| (power, Entity::number(Number::from_rational(c))))
        .collect::<Sparse>();
    match remaining.keys().next_back() {
        Some(1 | 2) => roots.extend(solve_sparse(remaining, x)?.unwrap_or_default()),
        Some(_) if ALLOW_NEWTON.get() => {
            let var = Entity::var(x);
            let rest = Entity::sum(remaining.into_iter().map(|(power, c)| {
                Entity::product([c, Entity::pow(var.clone(), Entity::integer(power as i64))])
            }));
            roots.extend(newton::find_roots(&simplify(&rest)?, x)?);
        },
        _ => {},
    }
    Ok(Some(roots))
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::Node;
    use pretty_assertions::assert_eq;
    use super::*;

    fn r(n: i64) -> Rational {
        Rational::from(n)
    }

    #[test]
    fn deflation() {
        // x^3 - 6x^2 + 11x - 6 = (x - 1)(x - 2)(x - 3)
        let cubic = vec![r(-6), r(11), r(-6), r(1)];
        assert_eq!(horner(&cubic, &r(2)), r(0));
        assert_eq!(deflate(&cubic, &r(1)), vec![r(6), r(-5), r(1)]);
    }

    #[test]
    fn divisor_enumeration() {
        let mut found = divisors(&Integer::from(-12)).unwrap();
        found.sort();
        assert_eq!(found, [1, 2, 3, 4, 6, 12].map(Integer::from).to_vec());
        assert_eq!(divisors(&Integer::new()), None);
    }

    #[test]
    fn degrees() {
        let x = Entity::var("x");
        let quartic = Entity::pow(x.clone(), Entity::integer(4)) + ONE.clone();
        assert_eq!(degree(&quartic, "x"), Some(4));
        assert_eq!(degree(&Entity::sin(x), "x"), None);
    }

    #[test]
    fn biquadratic() {
        // x^4 - 5x^2 + 4 = (x^2 - 1)(x^2 - 4)
        let x = Entity::var("x");
        let quartic = Entity::sum([
            Entity::pow(x.clone(), Entity::integer(4)),
            Entity::product([Entity::integer(-5), Entity::pow(x, Entity::integer(2))]),
            Entity::integer(4),
        ]);
        let roots = solve_polynomial(&quartic, "x").unwrap().unwrap();
        let mut values = roots.iter()
            .map(|root| simplify(root).unwrap().as_number().and_then(Number::to_i64).unwrap())
            .collect::<Vec<_>>();
        values.sort();
        assert_eq!(values, vec![-2, -1, 1, 2]);
    }

    #[test]
    fn symbolic_leading_coefficient() {
        // a*x + 1
        let (a, x) = (Entity::var("a"), Entity::var("x"));
        let roots = solve_polynomial(&(&a * &x + ONE.clone()), "x").unwrap().unwrap();
        assert_eq!(roots.len(), 1);
        assert!(matches!(roots[0].node(), Node::Provided(..)));
    }

    #[test]
    fn symbolic_linear_keeps_the_degenerate_case() {
        // a*x + b has the root -b/a if a != 0, and every x is a root if a = 0 and b = 0
        let (a, b, x) = (Entity::var("a"), Entity::var("b"), Entity::var("x"));
        let roots = solve_polynomial(&(&a * &x + &b), "x").unwrap().unwrap();
        assert_eq!(roots.len(), 2);

        let everywhere = Entity::provided(
            Entity::domain(Domain::Complexes),
            Entity::and(
                Entity::equation(b.clone(), ZERO.clone()),
                Entity::equation(a.clone(), ZERO.clone()),
            ),
        );
        assert_eq!(simplify(&roots[1]).unwrap(), simplify(&everywhere).unwrap());

        // a constant without free variables is never zero here
        assert_eq!(constant_roots(&Entity::integer(3)), vec![]);
    }
}
