//! Expansion of products and powers of sums.
//!
//! Expansion rewrites an expression into a sum of "linear children", terms that cannot be split
//! additively any further: `(x + 1)(x - 2)` becomes `x*x + x*(-2) + 1*x + 1*(-2)`. The terms are
//! not combined; that is left to the simplifier.
//!
//! The number of terms an expansion may produce is bounded by the
//! [`MAX_EXPANSION_TERM_COUNT`](crate::settings::MAX_EXPANSION_TERM_COUNT) setting. Expanding
//! `(a + b + c)^20` would otherwise produce billions of terms.

use crate::settings::MAX_EXPANSION_TERM_COUNT;
use crate::symbolic::expr::{Entity, Node};
use tracing::trace;

/// Returned when an expansion would exceed the term limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManyTerms;

/// Returns the additive children of the expression: the terms of a sum, or the expression itself.
pub fn linear_children(expr: &Entity) -> Vec<Entity> {
    match expr.node() {
        Node::Sum(terms) => terms.clone(),
        _ => vec![expr.clone()],
    }
}

/// Multiplies out the given factors, distributing over every sum among them.
fn distribute(factors: &[Entity], limit: usize) -> Result<Entity, TooManyTerms> {
    let mut terms: Vec<Vec<Entity>> = vec![Vec::new()];
    for factor in factors {
        let children = linear_children(factor);
        if terms.len() * children.len() > limit {
            return Err(TooManyTerms);
        }
        terms = terms.iter()
            .flat_map(|term| children.iter().map(move |child| {
                let mut term = term.clone();
                if !child.is_one() {
                    term.push(child.clone());
                }
                term
            }))
            .collect();
    }
    Ok(Entity::sum(terms.into_iter().map(Entity::product)))
}

/// Expands a node whose children are already expanded.
fn expand_node(expr: Entity, limit: usize) -> Result<Entity, TooManyTerms> {
    match expr.node() {
        Node::Product(factors) if factors.iter().any(|f| matches!(f.node(), Node::Sum(_))) => {
            distribute(factors, limit)
        },
        Node::Power(base, exp) => {
            let Some(n) = exp.as_number().and_then(|n| n.as_integer()).and_then(|n| n.to_usize()) else {
                return Ok(expr);
            };
            match base.node() {
                Node::Sum(terms) if n >= 2 => {
                    let estimate = terms.len().checked_pow(n as u32).ok_or(TooManyTerms)?;
                    if estimate > limit {
                        return Err(TooManyTerms);
                    }
                    distribute(&vec![base.clone(); n], limit)
                },
                Node::Product(factors) => {
                    let powers = factors.iter()
                        .map(|factor| Entity::pow(factor.clone(), exp.clone()))
                        .collect::<Vec<_>>();
                    Ok(Entity::product(powers))
                },
                _ => Ok(expr),
            }
        },
        Node::Divide(num, den) if matches!(num.node(), Node::Sum(_)) => {
            Ok(Entity::sum(linear_children(num).into_iter().map(|term| Entity::div(term, den.clone()))))
        },
        _ => Ok(expr),
    }
}

/// Expands the expression bottom-up.
pub fn try_expand(expr: &Entity, limit: usize) -> Result<Entity, TooManyTerms> {
    let mut failed = None;
    let expanded = expr.map_children(|child| match try_expand(child, limit) {
        Ok(child) => child,
        Err(err) => {
            failed = Some(err);
            child.clone()
        },
    });
    if let Some(err) = failed {
        return Err(err);
    }
    expand_node(expanded, limit)
}

/// Fully expands the expression, within the term limit of the current settings.
///
/// Returns [`None`] if there was nothing to expand, or if the expansion would exceed the limit.
pub fn expand(expr: &Entity) -> Option<Entity> {
    match try_expand(expr, MAX_EXPANSION_TERM_COUNT.get()) {
        Ok(expanded) => (expanded != *expr).then_some(expanded),
        Err(TooManyTerms) => {
            trace!(expr = %expr, "expansion exceeds the term limit");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn products_of_sums() {
        let (x, y) = (Entity::var("x"), Entity::var("y"));
        let expr = Entity::product([&x + Entity::integer(1), &y + Entity::integer(2)]);
        assert_eq!(
            expand(&expr),
            Some(Entity::sum([
                Entity::product([x.clone(), y.clone()]),
                Entity::product([x.clone(), Entity::integer(2)]),
                y.clone(),
                Entity::integer(2),
            ])),
        );
        assert_eq!(expand(&x), None);
    }

    #[test]
    fn powers_of_sums() {
        let x = Entity::var("x");
        let square = Entity::pow(&x + Entity::integer(1), Entity::integer(2));
        let expanded = expand(&square).unwrap();
        assert_eq!(linear_children(&expanded).len(), 4);
    }

    #[test]
    fn term_limit() {
        let terms = (0..5).map(|i| Entity::var(format!("x{}", i)));
        let expr = Entity::pow(Entity::sum(terms), Entity::integer(6));
        assert_eq!(try_expand(&expr, 2000), Err(TooManyTerms));
        assert_eq!(expand(&expr), None);
    }
}
