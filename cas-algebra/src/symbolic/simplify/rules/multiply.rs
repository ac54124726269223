//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::numeric::Number;
use crate::symbolic::{
    expr::{Entity, Node, ONE, ZERO},
    simplify::{pattern::{Rule, Tag}, step::Step},
};
use super::do_product;

/// Utility function to extract the base and exponent of an expression. If the expression is not
/// [`Node::Power`], the exponent is `1`.
///
/// - `a^b` -> `(a, b)`
/// - `a` -> `(a, 1)`
pub(crate) fn base_exponent(expr: &Entity) -> (Entity, Entity) {
    match expr.node() {
        Node::Power(base, exp) => (base.clone(), exp.clone()),
        _ => (expr.clone(), ONE.clone()),
    }
}

/// `0*a = 0`
/// `a*0 = 0`
///
/// Only applies once the numbers of the product have been folded into a single coefficient, so
/// that `0 * (1/0)` is NaN and not zero.
pub fn multiply_zero(expr: &Entity) -> Option<Entity> {
    do_product(expr, |factors| {
        let numbers = factors.iter().filter(|factor| factor.is_number()).count();
        (numbers == 1 && factors[0].is_zero()).then(|| ZERO.clone())
    })
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &Entity) -> Option<Entity> {
    do_product(expr, |factors| {
        if !factors.iter().any(Entity::is_one) {
            return None;
        }
        Some(Entity::product(factors.iter().filter(|factor| !factor.is_one()).cloned()))
    })
}

/// `a * (b/c) = (a*b)/c`
/// `(a/b) * (c/d) = (a*c)/(b*d)`
pub fn merge_divide(expr: &Entity) -> Option<Entity> {
    do_product(expr, |factors| {
        let mut numerators = Vec::new();
        let mut denominators = Vec::new();
        for factor in factors {
            match factor.node() {
                Node::Divide(num, den) => {
                    numerators.push(num.clone());
                    denominators.push(den.clone());
                },
                _ => numerators.push(factor.clone()),
            }
        }

        if denominators.is_empty() {
            return None;
        }
        Some(Entity::div(Entity::product(numerators), Entity::product(denominators)))
    })
}

/// Returns `true` if the factor is a power of a positive exact number, like `2^(1/2)`.
fn is_numeric_root(base: &Entity, exp: &Entity) -> bool {
    base.as_number().is_some_and(|n| n.is_exact() && n.is_positive())
        && exp.as_number().is_some_and(|n| n.is_exact() && n.as_integer().is_none())
}

/// Combines like factors.
///
/// `a^b*a^c = a^(b+c)`
/// `2^(1/2)*3^(1/2) = 6^(1/2)`
/// etc.
///
/// Bare numbers are left to numeric folding.
pub fn combine_like_factors(expr: &Entity) -> Option<Entity> {
    do_product(expr, |factors| {
        let mut groups: Vec<(Entity, Vec<Entity>)> = Vec::new();
        let mut numbers = Vec::new();
        for factor in factors {
            if factor.is_number() {
                numbers.push(factor.clone());
                continue;
            }

            let (base, exp) = base_exponent(factor);
            match groups.iter_mut().find(|(existing, _)| *existing == base) {
                Some((_, exps)) => exps.push(exp),
                None => groups.push((base, vec![exp])),
            }
        }

        let mut changed = groups.len() + numbers.len() < factors.len();
        let mut combined = groups.into_iter()
            .map(|(base, mut exps)| match exps.len() {
                1 => (base, exps.remove(0)),
                _ => (base, Entity::sum(exps)),
            })
            .collect::<Vec<_>>();

        // `a^c*b^c = (a*b)^c` for numeric bases
        let mut i = 0;
        while i < combined.len() {
            let mut j = i + 1;
            while j < combined.len() {
                let (base_i, exp_i) = &combined[i];
                let (base_j, exp_j) = &combined[j];
                if exp_i == exp_j && is_numeric_root(base_i, exp_i) && is_numeric_root(base_j, exp_j) {
                    let product = base_i.as_number().zip(base_j.as_number()).map(|(a, b)| a * b);
                    if let Some(product) = product {
                        combined[i].0 = Entity::number(product);
                        combined.remove(j);
                        changed = true;
                        continue;
                    }
                }
                j += 1;
            }
            i += 1;
        }

        if !changed {
            return None;
        }

        let rebuilt = combined.into_iter().map(|(base, exp)| {
            if exp.is_one() { base } else { Entity::pow(base, exp) }
        });
        Some(Entity::product(numbers.into_iter().chain(rebuilt)))
    })
}

/// Returns the rules for products.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("multiply_zero", Tag::Product, Step::MultiplyZero, multiply_zero),
        Rule::new("multiply_one", Tag::Product, Step::MultiplyOne, multiply_one),
        Rule::new("merge_divide", Tag::Product, Step::MergeDivide, merge_divide),
        Rule::new("combine_like_factors", Tag::Product, Step::CombineLikeFactors, combine_like_factors),
    ]
}

/// The numeric coefficient of a product, or `1`.
pub(crate) fn coefficient(expr: &Entity) -> Number {
    match expr.node() {
        Node::Number(n) => n.clone(),
        Node::Product(factors) => factors[0].as_number().cloned().unwrap_or_else(|| Number::integer(1)),
        _ => Number::integer(1),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn zero_and_one() {
        let x = Entity::var("x");
        assert_eq!(multiply_zero(&Entity::product([Entity::integer(0), x.clone()])), Some(ZERO.clone()));
        assert_eq!(multiply_one(&Entity::product([Entity::integer(1), x.clone()])), Some(x.clone()));
        assert_eq!(multiply_zero(&Entity::product([Entity::integer(2), x])), None);
    }

    #[test]
    fn like_factors() {
        let (a, b) = (Entity::var("a"), Entity::var("b"));
        let expr = Entity::product([
            a.clone(),
            b.clone(),
            Entity::pow(a.clone(), Entity::integer(3)),
        ]);
        assert_eq!(
            combine_like_factors(&expr),
            Some(Entity::product([
                Entity::pow(a.clone(), Entity::sum([Entity::integer(1), Entity::integer(3)])),
                b.clone(),
            ])),
        );
        assert_eq!(combine_like_factors(&Entity::product([Entity::integer(2), a, b])), None);
    }

    #[test]
    fn numeric_roots() {
        let expr = Entity::product([Entity::sqrt(Entity::integer(2)), Entity::sqrt(Entity::integer(3))]);
        assert_eq!(combine_like_factors(&expr), Some(Entity::sqrt(Entity::integer(6))));
    }

    #[test]
    fn divisions_merge() {
        let (a, b, c) = (Entity::var("a"), Entity::var("b"), Entity::var("c"));
        let expr = Entity::product([a.clone(), Entity::div(b.clone(), c.clone())]);
        assert_eq!(merge_divide(&expr), Some(Entity::div(Entity::product([a, b]), c)));
        assert_eq!(coefficient(&Entity::product([Entity::integer(3), Entity::var("x")])), Number::integer(3));
    }
}
