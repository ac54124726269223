//! Simplification rules for boolean logic and comparisons.

use crate::symbolic::{
    expr::{CompareOp, Entity, LogicOp, Node, ZERO},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};

/// `not true = false`
/// `not (not a) = a`
pub fn not(expr: &Entity) -> Option<Entity> {
    let Node::Logic(LogicOp::Not, args) = expr.node() else {
        return None;
    };
    match args[0].node() {
        Node::Boolean(value) => Some(Entity::boolean(!value)),
        Node::Logic(LogicOp::Not, inner) => Some(inner[0].clone()),
        _ => None,
    }
}

/// Folds a binary operator where at least one operand is a boolean literal.
///
/// `true and a = a`
/// `false or a = a`
/// `true implies a = a`
/// `a implies false = not a`
pub fn logic_constant(expr: &Entity) -> Option<Entity> {
    let Node::Logic(op, args) = expr.node() else {
        return None;
    };
    let [a, b] = args.as_slice() else {
        return None;
    };

    let fold = |literal: bool, other: &Entity| -> Option<Entity> {
        match (op, literal) {
            (LogicOp::And, true) | (LogicOp::Or, false) | (LogicOp::Xor, false) => Some(other.clone()),
            (LogicOp::And, false) => Some(Entity::boolean(false)),
            (LogicOp::Or, true) => Some(Entity::boolean(true)),
            (LogicOp::Xor, true) => Some(Entity::not(other.clone())),
            _ => None,
        }
    };

    match (a.as_boolean(), b.as_boolean()) {
        (Some(a), Some(b)) => Some(Entity::boolean(match op {
            LogicOp::And => a && b,
            LogicOp::Or => a || b,
            LogicOp::Xor => a != b,
            LogicOp::Implies => !a || b,
            LogicOp::Not => return None,
        })),
        (Some(literal), None) => match (op, literal) {
            (LogicOp::Implies, true) => Some(b.clone()),
            (LogicOp::Implies, false) => Some(Entity::boolean(true)),
            _ => fold(literal, b),
        },
        (None, Some(literal)) => match (op, literal) {
            (LogicOp::Implies, true) => Some(Entity::boolean(true)),
            (LogicOp::Implies, false) => Some(Entity::not(a.clone())),
            _ => fold(literal, a),
        },
        (None, None) => None,
    }
}

/// `a and a = a`
/// `a or a = a`
/// `a xor a = false`
/// `a implies a = true`
pub fn logic_idempotent(expr: &Entity) -> Option<Entity> {
    let Node::Logic(op, args) = expr.node() else {
        return None;
    };
    match op {
        LogicOp::And | LogicOp::Or => Some(args[0].clone()),
        LogicOp::Xor => Some(Entity::boolean(false)),
        LogicOp::Implies => Some(Entity::boolean(true)),
        LogicOp::Not => None,
    }
}

/// `a = a` is true, and `a < a` is false.
pub fn compare_self(expr: &Entity) -> Option<Entity> {
    let Node::Compare(op, ..) = expr.node() else {
        return None;
    };
    Some(Entity::boolean(matches!(op, CompareOp::Equal | CompareOp::LessEq | CompareOp::GreaterEq)))
}

/// `0 < a` is rewritten to `a > 0`.
pub fn compare_flip(expr: &Entity) -> Option<Entity> {
    let Node::Compare(op, _, rhs) = expr.node() else {
        return None;
    };
    Some(Entity::compare(op.flip(), rhs.clone(), ZERO.clone()))
}

/// Returns `true` for a binary logical operator.
fn is_binary_logic(expr: &Entity) -> bool {
    matches!(expr.node(), Node::Logic(op, _) if *op != LogicOp::Not)
}

/// Returns the rules for logic and comparisons.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("not", Tag::Logic(LogicOp::Not), Step::LogicConstant, not),
        Rule::new("logic_constant", Tag::Any, Step::LogicConstant, logic_constant)
            .when(is_binary_logic),
        Rule::new("logic_idempotent", Tag::Any, Step::LogicIdempotent, logic_idempotent)
            .children(vec![Pat::Any, Pat::Same(0)])
            .when(is_binary_logic),
        Rule::new("compare_self", Tag::Compare, Step::CompareSelf, compare_self)
            .children(vec![Pat::Any, Pat::Same(0)])
            .when(|e| e.children().first().is_some_and(|lhs| !lhs.is_number())),
        Rule::new("compare_flip", Tag::Compare, Step::CompareFlip, compare_flip)
            .children(vec![Pat::Lit(ZERO.clone()), Pat::Any])
            .when(|e| e.children().get(1).is_some_and(|rhs| !rhs.is_zero())),
    ]
}
