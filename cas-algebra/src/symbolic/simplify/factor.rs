//! Factoring of the common factors of the terms of sums.

use crate::numeric::Number;
use crate::symbolic::expr::{Entity, Node, ONE};
use super::{
    fraction::{split_coefficient, with_coefficient},
    rules::multiply::base_exponent,
};

/// Returns the factors of a term without its coefficient.
fn factors(rest: &Entity) -> Vec<(Entity, Entity)> {
    match rest.node() {
        Node::Product(factors) => factors.iter().map(base_exponent).collect(),
        _ if rest.is_one() => Vec::new(),
        _ => vec![base_exponent(rest)],
    }
}

/// Returns the exponent as an exact real number.
fn exact_exponent(exp: &Entity) -> Option<&Number> {
    exp.as_number().filter(|n| n.is_exact() && n.is_real())
}

/// A term of a sum, split into its coefficient and `(base, exponent)` factors.
struct Term {
    coefficient: Number,
    powers: Vec<(Entity, Entity)>,
}

impl Term {
    fn new(term: &Entity) -> Self {
        let (coefficient, rest) = split_coefficient(term);
        Self { coefficient, powers: factors(&rest) }
    }

    /// The numeric exponent of the given base in this term.
    fn exponent_of(&self, base: &Entity) -> Option<&Number> {
        self.powers.iter()
            .find(|(b, _)| b == base)
            .and_then(|(_, exp)| exact_exponent(exp))
    }

    /// Divides this term by `coefficient * base^exp * ...`.
    fn divide(mut self, coefficient: &Number, common: &[(Entity, Number)]) -> Entity {
        for (base, exp) in common {
            let Some(i) = self.powers.iter().position(|(b, _)| b == base) else {
                continue;
            };
            let remaining = exact_exponent(&self.powers[i].1)
                .map(|n| n - exp)
                .unwrap_or_else(|| Number::integer(0));
            if remaining.is_zero() {
                self.powers.remove(i);
            } else {
                self.powers[i].1 = Entity::number(remaining);
            }
        }

        let rest = Entity::product(self.powers.into_iter().map(|(base, exp)| {
            if exp.is_one() { base } else { Entity::pow(base, exp) }
        }));
        with_coefficient(&self.coefficient / coefficient, rest)
    }
}

/// Pulls the common numeric and symbolic factors out of the terms of a sum.
///
/// `2x + 4x^2 = 2x * (1 + 2x)`
fn factor_sum(terms: &[Entity]) -> Option<Entity> {
    let split = terms.iter().map(Term::new).collect::<Vec<_>>();

    let gcd = split.iter()
        .map(|term| Some(term.coefficient.clone()))
        .reduce(|a, b| a?.gcd(&b?))
        .flatten()
        .filter(|g| !g.is_zero() && g.is_positive())
        .unwrap_or_else(|| Number::integer(1));

    let (first, rest) = split.split_first()?;
    let common = first.powers.iter()
        .filter_map(|(base, exp)| {
            let mut min = exact_exponent(exp)?.clone();
            for term in rest {
                let exp = term.exponent_of(base)?;
                if exp.compare(&min).is_some_and(|o| o.is_lt()) {
                    min = exp.clone();
                }
            }
            min.is_positive().then(|| (base.clone(), min))
        })
        .collect::<Vec<_>>();

    if gcd.is_one() && common.is_empty() {
        return None;
    }

    let inner = Entity::sum(split.into_iter().map(|term| term.divide(&gcd, &common)));
    let outer = common.iter().map(|(base, exp)| {
        if exp.is_one() { base.clone() } else { Entity::pow(base.clone(), Entity::number(exp.clone())) }
    });
    Some(Entity::product(
        std::iter::once(Entity::number(gcd))
            .chain(outer)
            .chain(std::iter::once(inner))
            .filter(|factor| !factor.is_one()),
    ))
}

/// Factors the common factors out of every sum in the expression.
///
/// Returns [`None`] if no sum has a common factor.
pub fn factor_common(expr: &Entity) -> Option<Entity> {
    let rebuilt = expr.map_children(|child| factor_common(child).unwrap_or_else(|| child.clone()));
    let factored = match rebuilt.node() {
        Node::Sum(terms) => factor_sum(terms).unwrap_or(rebuilt),
        _ => rebuilt,
    };
    (factored != *expr).then_some(factored)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn numeric_and_symbolic_factors() {
        let x = Entity::var("x");
        let expr = Entity::sum([
            Entity::product([Entity::integer(2), x.clone()]),
            Entity::product([Entity::integer(4), Entity::pow(x.clone(), Entity::integer(2))]),
        ]);
        assert_eq!(
            factor_common(&expr),
            Some(Entity::product([
                Entity::integer(2),
                x.clone(),
                Entity::sum([ONE.clone(), Entity::product([Entity::integer(2), x.clone()])]),
            ])),
        );
    }

    #[test]
    fn nothing_in_common() {
        let (x, y) = (Entity::var("x"), Entity::var("y"));
        assert_eq!(factor_common(&Entity::sum([x.clone(), y.clone()])), None);
        assert_eq!(factor_common(&Entity::sum([x, Entity::integer(1)])), None);
    }
}
