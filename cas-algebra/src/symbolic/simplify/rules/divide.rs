//! Simplification rules for divisions.

use crate::numeric::Number;
use crate::symbolic::{
    expr::{Entity, Node, ONE, ZERO},
    simplify::{
        fraction::{make_fraction, with_coefficient},
        pattern::{Pat, Rule, Tag},
        step::Step,
    },
};
use super::{do_divide, multiply::base_exponent};

/// `a/1 = a`
pub fn divide_by_one(expr: &Entity) -> Option<Entity> {
    do_divide(expr, |num, _| Some(num.clone()))
}

/// `0/a = 0`
pub fn zero_numerator(_: &Entity) -> Option<Entity> {
    Some(ZERO.clone())
}

/// `a/a = 1`
pub fn divide_self(_: &Entity) -> Option<Entity> {
    Some(ONE.clone())
}

/// `(a/b)/c = a/(b*c)`
/// `a/(b/c) = (a*c)/b`
pub fn nested_divide(expr: &Entity) -> Option<Entity> {
    do_divide(expr, |num, den| match (num.node(), den.node()) {
        (Node::Divide(a, b), _) => Some(Entity::div(a.clone(), Entity::product([b.clone(), den.clone()]))),
        (_, Node::Divide(b, c)) => Some(Entity::div(Entity::product([num.clone(), c.clone()]), b.clone())),
        _ => None,
    })
}

/// A side of a fraction split into an exact coefficient and `(base, exponent)` factors.
struct Factors {
    coefficient: Number,
    powers: Vec<(Entity, Entity)>,
}

impl Factors {
    fn new(expr: &Entity) -> Self {
        let (coefficient, rest) = match expr.node() {
            Node::Number(n) => (n.clone(), &[][..]),
            Node::Product(factors) => match factors[0].as_number() {
                Some(n) => (n.clone(), &factors[1..]),
                None => (Number::integer(1), &factors[..]),
            },
            _ => (Number::integer(1), std::slice::from_ref(expr)),
        };
        Self {
            coefficient,
            powers: rest.iter().map(base_exponent).collect(),
        }
    }

    fn into_entity(self) -> Entity {
        let rest = Entity::product(self.powers.into_iter().map(|(base, exp)| {
            if exp.is_one() { base } else { Entity::pow(base, exp) }
        }));
        with_coefficient(self.coefficient, rest)
    }
}

/// Cancels the common numeric and symbolic factors of a fraction.
///
/// `6/4 * x = 3x/2`
/// `x^3/x = x^2`
/// `(2x)/(4xy) = 1/(2y)`
pub fn cancel_common_factors(expr: &Entity) -> Option<Entity> {
    do_divide(expr, |num, den| {
        let mut top = Factors::new(num);
        let mut bottom = Factors::new(den);
        let mut changed = false;

        if let (Some(a), Some(b)) = (top.coefficient.as_rational(), bottom.coefficient.as_rational()) {
            if !b.cmp0().is_eq() {
                let (numer, denom) = (a / &b).into_numer_denom();
                let (numer, denom) = (Number::integer(numer), Number::integer(denom));
                if numer != top.coefficient || denom != bottom.coefficient {
                    top.coefficient = numer;
                    bottom.coefficient = denom;
                    changed = true;
                }
            }
        }

        let mut i = 0;
        while i < top.powers.len() {
            let Some(j) = bottom.powers.iter().position(|(base, _)| *base == top.powers[i].0) else {
                i += 1;
                continue;
            };

            let (top_exp, bottom_exp) = (&top.powers[i].1, &bottom.powers[j].1);
            if top_exp == bottom_exp {
                top.powers.remove(i);
                bottom.powers.remove(j);
                changed = true;
                continue;
            }

            let difference = match (top_exp.as_number(), bottom_exp.as_number()) {
                (Some(a), Some(b)) if a.is_exact() && b.is_exact() && a.is_real() && b.is_real() => a - b,
                _ => {
                    i += 1;
                    continue;
                },
            };
            changed = true;
            let (base, _) = bottom.powers.remove(j);
            if difference.is_positive() {
                top.powers[i].1 = Entity::number(difference);
                i += 1;
            } else {
                top.powers.remove(i);
                bottom.powers.push((base, Entity::number(-difference)));
            }
        }

        if !changed {
            return None;
        }
        Some(make_fraction(top.into_entity(), bottom.into_entity()))
    })
}

/// Returns the rules for divisions.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("divide_by_one", Tag::Divide, Step::DivideByOne, divide_by_one)
            .children(vec![Pat::Any, Pat::Lit(ONE.clone())]),
        Rule::new("zero_numerator", Tag::Divide, Step::ZeroNumerator, zero_numerator)
            .children(vec![Pat::Lit(ZERO.clone()), Pat::Any])
            .when(|e| e.children().get(1).is_some_and(|den| !den.is_number())),
        Rule::new("divide_self", Tag::Divide, Step::DivideSelf, divide_self)
            .children(vec![Pat::Any, Pat::Same(0)])
            .when(|e| e.children().first().is_some_and(|num| !num.is_number())),
        Rule::new("nested_divide", Tag::Divide, Step::NestedDivide, nested_divide),
        Rule::new("cancel_common_factors", Tag::Divide, Step::ReduceFraction, cancel_common_factors),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn identities() {
        let x = Entity::var("x");
        let rules = rules();
        let apply = |expr: &Entity| rules.iter().find_map(|rule| rule.apply(expr));

        assert_eq!(apply(&Entity::div(x.clone(), Entity::integer(1))), Some(x.clone()));
        assert_eq!(apply(&Entity::div(Entity::integer(0), x.clone())), Some(ZERO.clone()));
        assert_eq!(apply(&Entity::div(x.clone(), x.clone())), Some(ONE.clone()));
        assert_eq!(apply(&Entity::div(x.clone(), Entity::integer(2))), None);
    }

    #[test]
    fn cancellation() {
        let (x, y) = (Entity::var("x"), Entity::var("y"));
        let expr = Entity::div(
            Entity::product([Entity::integer(6), Entity::pow(x.clone(), Entity::integer(3))]),
            Entity::product([Entity::integer(4), x.clone()]),
        );
        assert_eq!(
            cancel_common_factors(&expr),
            Some(Entity::div(
                Entity::product([Entity::integer(3), Entity::pow(x.clone(), Entity::integer(2))]),
                Entity::integer(2),
            )),
        );

        let expr = Entity::div(
            Entity::product([Entity::integer(2), x.clone()]),
            Entity::product([Entity::integer(4), x.clone(), y.clone()]),
        );
        assert_eq!(
            cancel_common_factors(&expr),
            Some(Entity::div(Entity::integer(1), Entity::product([Entity::integer(2), y.clone()]))),
        );
        assert_eq!(cancel_common_factors(&Entity::div(x, y)), None);
    }
}
