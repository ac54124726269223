//! Simplification rules for powers.

use crate::symbolic::{
    expr::{Entity, Node, ONE, ZERO},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};
use super::do_power;

/// Returns `true` if the entity is an integer.
fn is_integer(e: &Entity) -> bool {
    e.as_number().is_some_and(|n| n.as_integer().is_some())
}

/// `a^0 = 1`
pub fn power_zero(_: &Entity) -> Option<Entity> {
    Some(ONE.clone())
}

/// `0^a = 0`, for positive `a`
pub fn power_zero_left(_: &Entity) -> Option<Entity> {
    Some(ZERO.clone())
}

/// `1^a = 1`
pub fn power_one_left(_: &Entity) -> Option<Entity> {
    Some(ONE.clone())
}

/// `a^1 = a`
pub fn power_one(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, _| Some(base.clone()))
}

/// `(a^b)^c = a^(b*c)`, for integer `c`
pub fn power_power(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        if !is_integer(exp) {
            return None;
        }
        let Node::Power(inner_base, inner_exp) = base.node() else {
            return None;
        };
        Some(Entity::pow(inner_base.clone(), Entity::product([inner_exp.clone(), exp.clone()])))
    })
}

/// `(a*b)^c = a^c*b^c`
/// `(a/b)^c = a^c/b^c`
///
/// for integer `c`.
pub fn distribute_power(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        if !is_integer(exp) {
            return None;
        }
        match base.node() {
            Node::Product(factors) => Some(Entity::product(
                factors.iter().map(|factor| Entity::pow(factor.clone(), exp.clone())),
            )),
            Node::Divide(num, den) => Some(Entity::div(
                Entity::pow(num.clone(), exp.clone()),
                Entity::pow(den.clone(), exp.clone()),
            )),
            _ => None,
        }
    })
}

/// `a^(-n) = 1/a^n`
pub fn negative_exponent(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        let n = exp.as_number().filter(|n| n.is_real() && n.is_negative())?;
        let positive = Entity::number(-n);
        let denominator = if positive.is_one() {
            base.clone()
        } else {
            Entity::pow(base.clone(), positive)
        };
        Some(Entity::div(ONE.clone(), denominator))
    })
}

/// Returns the rules for powers.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("power_zero", Tag::Power, Step::PowerZero, power_zero)
            .children(vec![Pat::Any, Pat::Lit(ZERO.clone())]),
        Rule::new("power_one", Tag::Power, Step::PowerOne, power_one)
            .children(vec![Pat::Any, Pat::Lit(ONE.clone())]),
        Rule::new("power_one_left", Tag::Power, Step::PowerOneLeft, power_one_left)
            .children(vec![Pat::Lit(ONE.clone()), Pat::Any]),
        Rule::new("power_zero_left", Tag::Power, Step::PowerZeroLeft, power_zero_left)
            .children(vec![Pat::Lit(ZERO.clone()), Pat::Num])
            .when(|e| e.children().get(1)
                .and_then(|exp| exp.as_number())
                .is_some_and(|n| n.is_real() && n.is_positive())),
        Rule::new("power_power", Tag::Power, Step::PowerPower, power_power),
        Rule::new("distribute_power", Tag::Power, Step::DistributePower, distribute_power),
        Rule::new("negative_exponent", Tag::Power, Step::NegativeExponent, negative_exponent)
            .children(vec![Pat::Any, Pat::Num]),
    ]
}
