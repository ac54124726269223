//! Isolation of a variable by inverting the operations around it.
//!
//! To solve `lhs = rhs` where `x` only occurs in `lhs`, the outermost operation of `lhs` is
//! undone on both sides: `2^f(x) = c` becomes `f(x) = log(2, c)`, `sin(f(x)) = c` becomes
//! `f(x) = arcsin(c) + 2πn` or `f(x) = π - arcsin(c) + 2πn`, and so on, until `lhs` is `x`
//! itself. Each step requires `x` to occur in exactly one operand.
//!
//! Periodic inverses introduce a fresh variable `n_k` standing for any integer.

use crate::cancel::check_cancelled;
use crate::symbolic::expr::{Entity, Func, Node, ONE, PI};
use cas_error::Error;
use super::polynomial::nth_roots;

/// Returns the only child containing `x` and the other children, or [`None`] if `x` occurs in
/// more than one child.
fn single_occurrence<'a>(children: &'a [Entity], x: &str) -> Option<(&'a Entity, Vec<Entity>)> {
    let mut containing = children.iter().filter(|child| child.contains_variable(x));
    let target = containing.next()?;
    if containing.next().is_some() {
        return None;
    }
    let rest = children.iter().filter(|child| !child.contains_variable(x)).cloned().collect();
    Some((target, rest))
}

/// Inverts every branch and unions the roots. Returns [`None`] only if no branch can be
/// inverted.
fn invert_branches(lhs: &Entity, branches: Vec<Entity>, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    let mut roots = Vec::new();
    let mut inverted_any = false;
    for rhs in branches {
        if let Some(found) = invert(lhs, &rhs, x)? {
            roots.extend(found);
            inverted_any = true;
        }
    }
    Ok(inverted_any.then_some(roots))
}

/// `base + period * n`
fn periodic(base: Entity, period: Entity, n: &Entity) -> Entity {
    base + Entity::product([period, n.clone()])
}

/// `2π`
fn full_turn() -> Entity {
    Entity::product([Entity::integer(2), PI.clone()])
}

/// Solves `lhs = rhs` for `x`, where `rhs` does not contain `x`.
///
/// Returns [`None`] if `x` cannot be isolated.
pub(super) fn invert(lhs: &Entity, rhs: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    check_cancelled()?;
    match lhs.node() {
        Node::Variable(name) if name == x => Ok(Some(vec![rhs.clone()])),
        Node::Sum(terms) => match single_occurrence(terms, x) {
            Some((target, rest)) => invert(target, &(rhs - &Entity::sum(rest)), x),
            None => Ok(None),
        },
        Node::Product(factors) => match single_occurrence(factors, x) {
            Some((target, rest)) => invert(target, &Entity::div(rhs.clone(), Entity::product(rest)), x),
            None => Ok(None),
        },
        Node::Divide(num, den) => match (num.contains_variable(x), den.contains_variable(x)) {
            (true, false) => invert(num, &(rhs * den), x),
            (false, true) => invert(den, &Entity::div(num.clone(), rhs.clone()), x),
            _ => Ok(None),
        },
        Node::Power(base, exp) => match (base.contains_variable(x), exp.contains_variable(x)) {
            (true, false) => {
                let branches = match exp.as_number().and_then(|n| n.to_i64()) {
                    Some(n) if n >= 2 => nth_roots(rhs, n as usize),
                    _ => vec![Entity::pow(rhs.clone(), Entity::div(ONE.clone(), exp.clone()))],
                };
                invert_branches(base, branches, x)
            },
            (false, true) => invert(exp, &Entity::log(base.clone(), rhs.clone()), x),
            _ => Ok(None),
        },
        Node::Function(func, args) => invert_function(lhs, *func, args, rhs, x),
        _ => Ok(None),
    }
}

fn invert_function(lhs: &Entity, func: Func, args: &[Entity], rhs: &Entity, x: &str) -> Result<Option<Vec<Entity>>, Error> {
    if func == Func::Log {
        return match (args[0].contains_variable(x), args[1].contains_variable(x)) {
            (false, true) => invert(&args[1], &Entity::pow(args[0].clone(), rhs.clone()), x),
            (true, false) => {
                let base = Entity::pow(args[1].clone(), Entity::div(ONE.clone(), rhs.clone()));
                invert(&args[0], &base, x)
            },
            _ => Ok(None),
        };
    }

    let [arg] = args else {
        return Ok(None);
    };
    let n = (lhs + rhs).fresh_variable("n");
    let branches = match func {
        Func::Sin => vec![
            periodic(Entity::arcsin(rhs.clone()), full_turn(), &n),
            periodic(PI.clone() - Entity::arcsin(rhs.clone()), full_turn(), &n),
        ],
        Func::Cos => vec![
            periodic(Entity::arccos(rhs.clone()), full_turn(), &n),
            periodic(-Entity::arccos(rhs.clone()), full_turn(), &n),
        ],
        Func::Tan => vec![periodic(Entity::arctan(rhs.clone()), PI.clone(), &n)],
        Func::Cotan => vec![periodic(Entity::arccotan(rhs.clone()), PI.clone(), &n)],
        Func::Sec => return invert(&Entity::cos(arg.clone()), &Entity::div(ONE.clone(), rhs.clone()), x),
        Func::Cosec => return invert(&Entity::sin(arg.clone()), &Entity::div(ONE.clone(), rhs.clone()), x),
        Func::Arcsin => vec![Entity::sin(rhs.clone())],
        Func::Arccos => vec![Entity::cos(rhs.clone())],
        Func::Arctan => vec![Entity::tan(rhs.clone())],
        Func::Arccotan => vec![Entity::cotan(rhs.clone())],
        Func::Abs => vec![rhs.clone(), -rhs],
        _ => return Ok(None),
    };
    invert_branches(arg, branches, x)
}
