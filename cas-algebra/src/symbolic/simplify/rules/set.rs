//! Simplification rules for sets and membership.

use crate::numeric::NumberKind;
use crate::symbolic::{
    expr::{Domain, Entity, Node, SetOp},
    simplify::{pattern::{Rule, Tag}, step::Step},
};
use std::cmp::Ordering;
use super::fold::real_less;

/// Decides whether `element` belongs to `set`, if that can be decided structurally.
pub(crate) fn member(element: &Entity, set: &Entity) -> Option<bool> {
    match set.node() {
        Node::FiniteSet(elements) => {
            if elements.contains(element) {
                return Some(true);
            }
            let n = element.as_number()?;
            let numbers = elements.iter().map(Entity::as_number).collect::<Option<Vec<_>>>()?;
            Some(numbers.into_iter().any(|m| m.approx_eq(n)))
        },
        Node::Domain(domain) => match (element.node(), domain) {
            (Node::Boolean(_), Domain::Booleans) => Some(true),
            (Node::Boolean(_), _) => Some(false),
            (Node::Number(_), Domain::Booleans) => Some(false),
            (Node::Number(n), Domain::Complexes) => Some(!n.is_nan()),
            (Node::Number(n), Domain::Reals) => Some(n.is_real() && !n.is_nan()),
            (Node::Number(n), Domain::Rationals) => Some(n.is_exact() && n.is_real()),
            (Node::Number(n), Domain::Integers) => Some(n.kind() == NumberKind::Integer),
            _ => None,
        },
        Node::Interval { left, left_closed, right, right_closed } => {
            let n = element.as_number().filter(|n| n.is_real())?;
            let (left, right) = (left.as_number()?, right.as_number()?);
            let above = match left.compare(n)? {
                Ordering::Less => true,
                Ordering::Equal => *left_closed,
                Ordering::Greater => false,
            };
            let below = match n.compare(right)? {
                Ordering::Less => true,
                Ordering::Equal => *right_closed,
                Ordering::Greater => false,
            };
            Some(above && below)
        },
        _ => None,
    }
}

/// Returns the elements of a finite set.
fn finite(set: &Entity) -> Option<&[Entity]> {
    match set.node() {
        Node::FiniteSet(elements) => Some(elements),
        _ => None,
    }
}

/// Keeps the elements of `a` whose membership in `b` is decided and equal to `keep`.
fn filter_members(a: &[Entity], b: &Entity, keep: bool) -> Option<Entity> {
    let decided = a.iter()
        .map(|element| member(element, b).map(|is_member| (element, is_member)))
        .collect::<Option<Vec<_>>>()?;
    Some(Entity::finite_set(
        decided.into_iter()
            .filter(|(_, is_member)| *is_member == keep)
            .map(|(element, _)| element.clone()),
    ))
}

/// `{1, 2} ∪ {2, 3} = {1, 2, 3}`
pub fn set_union(expr: &Entity) -> Option<Entity> {
    let Node::SetOp(SetOp::Union, a, b) = expr.node() else {
        return None;
    };
    let (a, b) = (finite(a)?, finite(b)?);
    Some(Entity::finite_set(a.iter().chain(b).cloned()))
}

/// `{1, 2} ∩ {2, 3} = {2}`
/// `{-1, 1} ∩ (0, oo) = {1}`
pub fn set_intersection(expr: &Entity) -> Option<Entity> {
    let Node::SetOp(SetOp::Intersection, a, b) = expr.node() else {
        return None;
    };
    match (finite(a), finite(b)) {
        (Some(elements), _) => filter_members(elements, b, true),
        (None, Some(elements)) => filter_members(elements, a, true),
        (None, None) => None,
    }
}

/// `{1, 2} \ {2, 3} = {1}`
pub fn set_minus(expr: &Entity) -> Option<Entity> {
    let Node::SetOp(SetOp::SetMinus, a, b) = expr.node() else {
        return None;
    };
    filter_members(finite(a)?, b, false)
}

/// `A ∪ A = A`
/// `A ∩ ∅ = ∅`
/// `A \ ∅ = A`
/// `∅ \ A = ∅`
pub fn set_identity(expr: &Entity) -> Option<Entity> {
    let Node::SetOp(op, a, b) = expr.node() else {
        return None;
    };
    let is_empty = |set: &Entity| finite(set).is_some_and(<[Entity]>::is_empty);

    match op {
        SetOp::Union | SetOp::Intersection if a == b => Some(a.clone()),
        SetOp::SetMinus if a == b => Some(Entity::empty_set()),
        SetOp::Union if is_empty(a) => Some(b.clone()),
        SetOp::Union if is_empty(b) => Some(a.clone()),
        SetOp::Intersection if is_empty(a) || is_empty(b) => Some(Entity::empty_set()),
        SetOp::SetMinus if is_empty(b) => Some(a.clone()),
        SetOp::SetMinus if is_empty(a) => Some(Entity::empty_set()),
        _ => None,
    }
}

/// `2 in {1, 2} = true`
/// `1/2 in Integers = false`
pub fn membership(expr: &Entity) -> Option<Entity> {
    let Node::In(element, set) = expr.node() else {
        return None;
    };
    member(element, set).map(Entity::boolean)
}

/// `[a, a] = {a}`
/// `(a, a] = ∅`
/// `[2, 1] = ∅`
pub fn degenerate_interval(expr: &Entity) -> Option<Entity> {
    let Node::Interval { left, left_closed, right, right_closed } = expr.node() else {
        return None;
    };
    if left == right {
        return Some(if *left_closed && *right_closed {
            Entity::finite_set([left.clone()])
        } else {
            Entity::empty_set()
        });
    }
    let (a, b) = (left.as_number()?, right.as_number()?);
    real_less(b, a).then(Entity::empty_set)
}

/// Returns the rules for sets.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("set_identity", Tag::Any, Step::SetIdentity, set_identity)
            .when(|e| matches!(e.node(), Node::SetOp(..))),
        Rule::new("set_union", Tag::SetOp(SetOp::Union), Step::SetUnion, set_union),
        Rule::new("set_intersection", Tag::SetOp(SetOp::Intersection), Step::SetIntersection, set_intersection),
        Rule::new("set_minus", Tag::SetOp(SetOp::SetMinus), Step::SetMinus, set_minus),
        Rule::new("membership", Tag::In, Step::Membership, membership),
        Rule::new("degenerate_interval", Tag::Interval, Step::DegenerateInterval, degenerate_interval),
    ]
}

#[cfg(test)]
mod tests {
    use crate::numeric::Number;
    use pretty_assertions::assert_eq;
    use super::*;

    fn set(elements: &[i64]) -> Entity {
        Entity::finite_set(elements.iter().map(|&n| Entity::integer(n)))
    }

    #[test]
    fn finite_sets() {
        let union = Entity::set_op(SetOp::Union, set(&[1, 2]), set(&[2, 3]));
        assert_eq!(set_union(&union), Some(set(&[1, 2, 3])));

        let intersection = Entity::set_op(SetOp::Intersection, set(&[1, 2]), set(&[2, 3]));
        assert_eq!(set_intersection(&intersection), Some(set(&[2])));

        let minus = Entity::set_op(SetOp::SetMinus, set(&[1, 2]), set(&[2, 3]));
        assert_eq!(set_minus(&minus), Some(set(&[1])));

        // membership of `x` in `{1}` is unknown
        let symbolic = Entity::finite_set([Entity::var("x"), Entity::integer(1)]);
        let minus = Entity::set_op(SetOp::SetMinus, symbolic, set(&[1]));
        assert_eq!(set_minus(&minus), None);
    }

    #[test]
    fn identities() {
        let a = Entity::var("A");
        let empty = Entity::empty_set();
        assert_eq!(set_identity(&Entity::set_op(SetOp::Union, a.clone(), a.clone())), Some(a.clone()));
        assert_eq!(set_identity(&Entity::set_op(SetOp::SetMinus, a.clone(), a.clone())), Some(empty.clone()));
        assert_eq!(set_identity(&Entity::set_op(SetOp::Union, empty.clone(), a.clone())), Some(a.clone()));
        assert_eq!(set_identity(&Entity::set_op(SetOp::Intersection, a.clone(), empty.clone())), Some(empty.clone()));
        assert_eq!(set_identity(&Entity::set_op(SetOp::SetMinus, empty.clone(), a.clone())), Some(empty));
    }

    #[test]
    fn domains() {
        let half = Entity::rational(1, 2);
        let reals = Entity::domain(Domain::Reals);
        assert_eq!(member(&half, &Entity::domain(Domain::Integers)), Some(false));
        assert_eq!(member(&half, &Entity::domain(Domain::Rationals)), Some(true));
        assert_eq!(member(&half, &reals), Some(true));
        assert_eq!(member(&Entity::number(Number::i()), &reals), Some(false));
        assert_eq!(member(&Entity::boolean(true), &Entity::domain(Domain::Booleans)), Some(true));
        assert_eq!(member(&Entity::integer(1), &Entity::domain(Domain::Booleans)), Some(false));
        assert_eq!(member(&Entity::var("x"), &reals), None);
    }

    #[test]
    fn intervals() {
        let half_open = Entity::interval(Entity::integer(0), true, Entity::integer(1), false);
        assert_eq!(member(&Entity::integer(0), &half_open), Some(true));
        assert_eq!(member(&Entity::integer(1), &half_open), Some(false));
        assert_eq!(member(&Entity::rational(1, 2), &half_open), Some(true));

        let positive = Entity::interval(Entity::integer(0), false, Entity::number(Number::infinity()), false);
        let solutions = Entity::set_op(SetOp::Intersection, set(&[-1, 1]), positive);
        assert_eq!(set_intersection(&solutions), Some(set(&[1])));

        let point = Entity::interval(Entity::integer(2), true, Entity::integer(2), true);
        assert_eq!(degenerate_interval(&point), Some(set(&[2])));
        let reversed = Entity::interval(Entity::integer(2), true, Entity::integer(1), true);
        assert_eq!(degenerate_interval(&reversed), Some(Entity::empty_set()));
        assert_eq!(degenerate_interval(&half_open), None);
    }
}
