//! Implementation of many simplification rules.
//!
//! Each rule in this module is a [`Rule`]: a pattern over one node and its direct children, and a
//! function that takes the matching expression as an argument and returns `Some(expr)` with the
//! rewritten expression if the rule applies, or `None` if the rule does not apply.
//!
//! Rules are tried in the order of [`RULES`]; the first rule that changes a node wins.

pub mod add;
pub mod conditional;
pub mod divide;
pub mod fold;
pub mod log;
pub mod logic;
pub mod multiply;
pub mod power;
pub mod root;
pub mod set;
pub mod trigonometry;

use crate::symbolic::expr::{Entity, Func, Node};
use once_cell::sync::Lazy;
use super::pattern::Rule;

/// If the expression is a function call of the given function, calls the given transformation
/// function with the arguments.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    expr: &Entity,
    func: Func,
    f: impl FnOnce(&[Entity]) -> Option<Entity>,
) -> Option<Entity> {
    match expr.node() {
        Node::Function(target, args) if *target == func => f(args),
        _ => None,
    }
}

/// If the expression is a sum, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_sum(expr: &Entity, f: impl FnOnce(&[Entity]) -> Option<Entity>) -> Option<Entity> {
    match expr.node() {
        Node::Sum(terms) => f(terms),
        _ => None,
    }
}

/// If the expression is a product, calls the given transformation function with the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_product(expr: &Entity, f: impl FnOnce(&[Entity]) -> Option<Entity>) -> Option<Entity> {
    match expr.node() {
        Node::Product(factors) => f(factors),
        _ => None,
    }
}

/// If the expression is a power, calls the given transformation function with the base and the
/// exponent.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(
    expr: &Entity,
    f: impl FnOnce(&Entity, &Entity) -> Option<Entity>,
) -> Option<Entity> {
    match expr.node() {
        Node::Power(base, exp) => f(base, exp),
        _ => None,
    }
}

/// If the expression is a division, calls the given transformation function with the numerator
/// and the denominator.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_divide(
    expr: &Entity,
    f: impl FnOnce(&Entity, &Entity) -> Option<Entity>,
) -> Option<Entity> {
    match expr.node() {
        Node::Divide(num, den) => f(num, den),
        _ => None,
    }
}

/// Every rule, in priority order.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        conditional::rules(),
        fold::rules(),
        add::rules(),
        multiply::rules(),
        divide::rules(),
        power::rules(),
        root::rules(),
        log::rules(),
        trigonometry::rules(),
        logic::rules(),
        set::rules(),
    ]
        .into_iter()
        .flatten()
        .collect()
});

/// Applies the first rule that changes the given node, returning the rule and the rewritten node.
pub fn first_match(expr: &Entity) -> Option<(&'static Rule, Entity)> {
    RULES.iter().find_map(|rule| rule.apply(expr).map(|new| (rule, new)))
}
