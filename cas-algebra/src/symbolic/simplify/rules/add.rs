//! Simplification rules for sums.

use crate::numeric::Number;
use crate::symbolic::{
    expr::{Entity, Node},
    simplify::{
        fraction::{split_coefficient, with_coefficient},
        pattern::{Rule, Tag},
        step::Step,
    },
};
use super::do_sum;

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Entity) -> Option<Entity> {
    do_sum(expr, |terms| {
        if !terms.iter().any(Entity::is_zero) {
            return None;
        }
        Some(Entity::sum(terms.iter().filter(|term| !term.is_zero()).cloned()))
    })
}

/// `a+a = 2a`
/// `2a+3a = 5a`
/// `a/2+a = 3a/2`
///
/// Terms are grouped by everything but their numeric coefficient; groups whose coefficients add
/// up to zero disappear.
pub fn combine_like_terms(expr: &Entity) -> Option<Entity> {
    do_sum(expr, |terms| {
        let mut groups: Vec<(Entity, Number)> = Vec::new();
        for term in terms {
            let (coefficient, rest) = split_coefficient(term);
            match groups.iter_mut().find(|(existing, _)| *existing == rest) {
                Some((_, total)) => *total = &*total + &coefficient,
                None => groups.push((rest, coefficient)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        Some(Entity::sum(
            groups.into_iter()
                .filter(|(_, coefficient)| !(coefficient.is_exact() && coefficient.is_zero()))
                .map(|(rest, coefficient)| with_coefficient(coefficient, rest)),
        ))
    })
}

/// `a/c + b/c = (a+b)/c`
pub fn same_denominator(expr: &Entity) -> Option<Entity> {
    do_sum(expr, |terms| {
        let mut groups: Vec<(Entity, Vec<Entity>)> = Vec::new();
        let mut rest = Vec::new();
        for term in terms {
            match term.node() {
                Node::Divide(num, den) => match groups.iter_mut().find(|(existing, _)| existing == den) {
                    Some((_, numerators)) => numerators.push(num.clone()),
                    None => groups.push((den.clone(), vec![num.clone()])),
                },
                _ => rest.push(term.clone()),
            }
        }

        if groups.iter().all(|(_, numerators)| numerators.len() < 2) {
            return None;
        }

        let merged = groups.into_iter()
            .map(|(den, numerators)| Entity::div(Entity::sum(numerators), den));
        Some(Entity::sum(rest.into_iter().chain(merged)))
    })
}

/// Returns the rules for sums.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("add_zero", Tag::Sum, Step::AddZero, add_zero),
        Rule::new("combine_like_terms", Tag::Sum, Step::CombineLikeTerms, combine_like_terms),
        Rule::new("same_denominator", Tag::Sum, Step::SameDenominator, same_denominator),
    ]
}
