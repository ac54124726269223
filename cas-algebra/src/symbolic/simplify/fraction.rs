//! Tools to help manipulate coefficients and fractions.

use crate::numeric::Number;
use crate::symbolic::expr::{Entity, Node, ONE, ZERO};

/// Splits a term into its numeric coefficient and the rest of the term.
///
/// - a number `n` is `n * 1`
/// - a product whose first factor is a number `n` is `n * rest`
/// - a division by a nonzero number `a / d` is `(c / d) * rest`, where `a = c * rest`
/// - anything else is `1 * term`
pub(crate) fn split_coefficient(term: &Entity) -> (Number, Entity) {
    match term.node() {
        Node::Number(n) => (n.clone(), ONE.clone()),
        Node::Product(factors) => match factors.split_first() {
            Some((first, rest)) => match first.as_number() {
                Some(n) => (n.clone(), Entity::product(rest.iter().cloned())),
                None => (Number::integer(1), term.clone()),
            },
            None => (Number::integer(1), term.clone()),
        },
        Node::Divide(num, den) => match den.as_number() {
            Some(d) if !d.is_zero() => {
                let (coefficient, rest) = split_coefficient(num);
                (&coefficient / d, rest)
            },
            _ => (Number::integer(1), term.clone()),
        },
        _ => (Number::integer(1), term.clone()),
    }
}

/// Builds `coefficient * rest`, without writing a coefficient of `1` or a factor of `1`.
pub(crate) fn with_coefficient(coefficient: Number, rest: Entity) -> Entity {
    if coefficient.is_exact() && coefficient.is_zero() {
        ZERO.clone()
    } else if rest.is_one() {
        Entity::number(coefficient)
    } else if coefficient.is_exact() && coefficient.is_one() {
        rest
    } else {
        Entity::product([Entity::number(coefficient), rest])
    }
}

/// Create an [`Entity`] representing a fraction with the given numerator and denominator.
pub(crate) fn make_fraction(numerator: Entity, denominator: Entity) -> Entity {
    if denominator.is_one() {
        numerator
    } else {
        Entity::div(numerator, denominator)
    }
}

/// Rewrites every product with a non-integer rational coefficient `p/q` into the division
/// `(p * rest) / q`, which is how people write such terms.
///
/// Returns [`None`] if there is no such product.
pub fn presentation(expr: &Entity) -> Option<Entity> {
    let rewritten = present(expr);
    (rewritten != *expr).then_some(rewritten)
}

fn present(expr: &Entity) -> Entity {
    let expr = expr.map_children(present);
    let Node::Product(factors) = expr.node() else {
        return expr;
    };
    let Some(r) = factors[0].as_number().and_then(Number::as_rational).filter(|r| !r.is_integer()) else {
        return expr;
    };

    let (numer, denom) = r.into_numer_denom();
    let rest = factors[1..].iter().cloned();
    let numerator = if numer == 1 {
        Entity::product(rest)
    } else {
        Entity::product(std::iter::once(Entity::number(Number::integer(numer))).chain(rest))
    };
    make_fraction(numerator, Entity::number(Number::integer(denom)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn coefficients() {
        let x = Entity::var("x");
        assert_eq!(split_coefficient(&Entity::integer(5)), (Number::integer(5), ONE.clone()));
        assert_eq!(
            split_coefficient(&Entity::product([Entity::integer(3), x.clone()])),
            (Number::integer(3), x.clone()),
        );
        let third = Entity::div(Entity::product([Entity::integer(2), x.clone()]), Entity::integer(3));
        assert_eq!(split_coefficient(&third), (Number::rational(2, 3), x.clone()));
        assert_eq!(split_coefficient(&Entity::sin(x.clone())), (Number::integer(1), Entity::sin(x)));
    }

    #[test]
    fn rebuild() {
        let x = Entity::var("x");
        assert_eq!(with_coefficient(Number::integer(0), x.clone()), ZERO.clone());
        assert_eq!(with_coefficient(Number::integer(1), x.clone()), x.clone());
        assert_eq!(with_coefficient(Number::integer(4), ONE.clone()), Entity::integer(4));
    }

    #[test]
    fn rational_coefficients_become_divisions() {
        let x = Entity::var("x");
        let expr = Entity::sum([
            Entity::product([Entity::rational(3, 2), x.clone()]),
            Entity::product([Entity::rational(1, 4), Entity::var("y")]),
        ]);
        let expected = Entity::sum([
            Entity::div(Entity::product([Entity::integer(3), x.clone()]), Entity::integer(2)),
            Entity::div(Entity::var("y"), Entity::integer(4)),
        ]);
        assert_eq!(presentation(&expr), Some(expected));
        assert_eq!(presentation(&x), None);
    }
}
