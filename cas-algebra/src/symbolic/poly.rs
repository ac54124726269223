//! Extraction of polynomial coefficients.
//!
//! An expression is a polynomial in `x` if, once expanded, every one of its terms is a
//! coefficient free of `x` multiplied by a non-negative integer power of `x`. Terms in which `x`
//! is trapped inside something that cannot be expanded, like `sin(x)` or `2^x`, make the whole
//! expression a non-polynomial.

use crate::settings::MAX_EXPANSION_TERM_COUNT;
use crate::symbolic::expand::{linear_children, try_expand};
use crate::symbolic::expr::{Entity, Node, ONE, ZERO};
use crate::symbolic::simplify::simplify;
use cas_error::Error;
use rug::Integer;
use std::collections::BTreeMap;
use tracing::trace;

/// Returns the power of `x` carried by the term, and the rest of the term.
fn classify(term: &Entity, x: &str) -> Option<(Integer, Entity)> {
    if !term.contains_variable(x) {
        return Some((Integer::new(), term.clone()));
    }

    match term.node() {
        Node::Variable(_) => Some((Integer::from(1), ONE.clone())),
        Node::Power(base, exp) if base.as_variable() == Some(x) => {
            let n = exp.as_number()?.as_integer()?;
            n.cmp0().is_ge().then(|| (n.clone(), ONE.clone()))
        },
        Node::Product(factors) => {
            let mut power = Integer::new();
            let mut coefficient = Vec::new();
            for factor in factors {
                let (p, c) = classify(factor, x)?;
                power += p;
                if !c.is_one() {
                    coefficient.push(c);
                }
            }
            Some((power, Entity::product(coefficient)))
        },
        Node::Divide(num, den) if !den.contains_variable(x) => {
            let (power, coefficient) = classify(num, x)?;
            Some((power, Entity::div(coefficient, den.clone())))
        },
        _ => None,
    }
}

/// Extracts the coefficients of the expression as a polynomial in `x`, keyed by power.
///
/// Coefficients of the same power are summed but not simplified, and may turn out to be zero.
/// Returns [`None`] if the expression is not a polynomial in `x`, or if expanding it would exceed
/// the [`MAX_EXPANSION_TERM_COUNT`] setting.
pub fn try_polynomial(expr: &Entity, x: &str) -> Option<BTreeMap<Integer, Entity>> {
    let expanded = try_expand(expr, MAX_EXPANSION_TERM_COUNT.get()).ok()?;
    let mut powers: BTreeMap<Integer, Vec<Entity>> = BTreeMap::new();
    for term in linear_children(&expanded) {
        let Some((power, coefficient)) = classify(&term, x) else {
            trace!(term = %term, var = x, "term is not polynomial");
            return None;
        };
        powers.entry(power).or_default().push(coefficient);
    }

    Some(powers.into_iter().map(|(power, coefficients)| (power, Entity::sum(coefficients))).collect())
}

/// Like [`try_polynomial`], but with every coefficient simplified and the zero coefficients
/// removed. The polynomial `0` has no coefficients at all.
pub fn polynomial_coefficients(expr: &Entity, x: &str) -> Result<Option<BTreeMap<Integer, Entity>>, Error> {
    let Some(poly) = try_polynomial(expr, x) else {
        return Ok(None);
    };

    let mut simplified = BTreeMap::new();
    for (power, coefficient) in poly {
        let coefficient = simplify(&coefficient)?;
        if !coefficient.is_zero() {
            simplified.insert(power, coefficient);
        }
    }
    Ok(Some(simplified))
}

/// Returns the coefficients of the simplified polynomial, from the constant term up to
/// `x^degree`, or [`None`] if the polynomial has a higher degree.
fn dense_coefficients(expr: &Entity, x: &str, degree: u32) -> Result<Option<Vec<Entity>>, Error> {
    let Some(poly) = polynomial_coefficients(expr, x)? else {
        return Ok(None);
    };
    if poly.keys().any(|power| *power > degree) {
        return Ok(None);
    }

    Ok(Some((0..=degree)
        .map(|power| poly.get(&Integer::from(power)).cloned().unwrap_or_else(|| ZERO.clone()))
        .collect()))
}

/// Extracts `(a, b)` such that the expression is `a*x + b`, with simplified coefficients.
///
/// Returns `Ok(None)` if the expression is not a polynomial of degree at most 1 in `x`.
pub fn try_poly_linear(expr: &Entity, x: &str) -> Result<Option<(Entity, Entity)>, Error> {
    Ok(dense_coefficients(expr, x, 1)?.map(|mut c| {
        let a = c.pop().unwrap_or_else(|| ZERO.clone());
        let b = c.pop().unwrap_or_else(|| ZERO.clone());
        (a, b)
    }))
}

/// Extracts `(a, b, c)` such that the expression is `a*x^2 + b*x + c`, with simplified
/// coefficients.
///
/// Returns `Ok(None)` if the expression is not a polynomial of degree at most 2 in `x`.
pub fn try_poly_quadratic(expr: &Entity, x: &str) -> Result<Option<(Entity, Entity, Entity)>, Error> {
    Ok(dense_coefficients(expr, x, 2)?.map(|mut coefficients| {
        let a = coefficients.pop().unwrap_or_else(|| ZERO.clone());
        let b = coefficients.pop().unwrap_or_else(|| ZERO.clone());
        let c = coefficients.pop().unwrap_or_else(|| ZERO.clone());
        (a, b, c)
    }))
}

#[cfg(test)]
mod tests {
    use crate::numeric::Number;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use super::*;

    fn x() -> Entity {
        Entity::var("x")
    }

    #[test]
    fn expanded_square() {
        let square = Entity::pow(x() + Entity::integer(1), Entity::integer(2));
        assert_eq!(
            try_poly_quadratic(&square, "x").unwrap(),
            Some((Entity::integer(1), Entity::integer(2), Entity::integer(1))),
        );
    }

    #[test]
    fn symbolic_coefficients() {
        let y = Entity::var("y");
        let expr = Entity::product([x() + Entity::integer(1), y.clone()]);
        assert_eq!(try_poly_linear(&expr, "x").unwrap(), Some((y.clone(), y.clone())));

        let poly = try_polynomial(&expr, "y").unwrap();
        assert_eq!(poly.keys().cloned().collect::<Vec<_>>(), vec![Integer::from(1)]);
    }

    #[test]
    fn cancelled_terms_do_not_count() {
        let square = Entity::pow(x(), Entity::integer(2));
        let expr = Entity::sum([square.clone(), -&square, x()]);
        assert_eq!(try_poly_linear(&expr, "x").unwrap(), Some((Entity::integer(1), Entity::integer(0))));
    }

    #[test]
    fn non_polynomials() {
        assert_eq!(try_polynomial(&Entity::sin(x()), "x"), None);
        assert_eq!(try_polynomial(&Entity::sqrt(x()), "x"), None);
        assert_eq!(try_polynomial(&Entity::pow(x(), Entity::integer(-1)), "x"), None);
        assert_eq!(try_polynomial(&Entity::div(Entity::integer(1), x()), "x"), None);
        assert_eq!(try_poly_linear(&Entity::pow(x(), Entity::integer(2)), "x").unwrap(), None);

        // `sin(y)` is a constant with respect to `x`
        let constant = Entity::sin(Entity::var("y"));
        assert_eq!(try_poly_linear(&constant, "x").unwrap(), Some((ZERO.clone(), constant)));
    }

    #[test]
    fn expansion_limit() {
        let terms = (0..4).map(|i| Entity::var(format!("a{}", i)));
        let expr = Entity::pow(Entity::sum(terms.chain([x()])), Entity::integer(8));
        assert_eq!(try_polynomial(&expr, "x"), None);
    }

    fn rational() -> impl Strategy<Value = Number> {
        (-20i64..20, 1i64..6).prop_map(|(n, d)| Number::rational(n, d))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn quadratic_coefficients((a, b, c) in (rational(), rational(), rational())) {
            let expr = Entity::sum([
                Entity::product([Entity::number(a.clone()), Entity::pow(x(), Entity::integer(2))]),
                Entity::product([Entity::number(b.clone()), x()]),
                Entity::number(c.clone()),
            ]);
            let (qa, qb, qc) = try_poly_quadratic(&expr, "x").unwrap().unwrap();
            prop_assert_eq!(qa, Entity::number(a));
            prop_assert_eq!(qb, Entity::number(b));
            prop_assert_eq!(qc, Entity::number(c));
        }
    }
}
