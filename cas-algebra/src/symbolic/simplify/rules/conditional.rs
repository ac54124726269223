//! Simplification rules for conditional expressions, lambdas and unevaluated derivatives.

use crate::symbolic::{
    derivative::derivative,
    expr::{Entity, Func, Node, NAN},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};
use super::do_call;

/// `a provided true = a`
pub fn provided_true(expr: &Entity) -> Option<Entity> {
    match expr.node() {
        Node::Provided(value, _) => Some(value.clone()),
        _ => None,
    }
}

/// `a provided false = NaN`
pub fn provided_false(_: &Entity) -> Option<Entity> {
    Some(NAN.clone())
}

/// `(a provided b) provided c = a provided (b and c)`
pub fn provided_nested(expr: &Entity) -> Option<Entity> {
    let Node::Provided(outer, c) = expr.node() else {
        return None;
    };
    let Node::Provided(a, b) = outer.node() else {
        return None;
    };
    Some(Entity::provided(a.clone(), Entity::and(b.clone(), c.clone())))
}

/// Lifts the conditions of the children of an arithmetic node to the node itself.
///
/// `(a provided b) + c = (a + c) provided b`
pub fn provided_lift(expr: &Entity) -> Option<Entity> {
    let mut conditions = Vec::new();
    let rebuilt = expr.map_children(|child| match child.node() {
        Node::Provided(value, condition) => {
            conditions.push(condition.clone());
            value.clone()
        },
        _ => child.clone(),
    });

    let condition = conditions.into_iter().reduce(Entity::and)?;
    Some(Entity::provided(rebuilt, condition))
}

/// Returns `true` for the arithmetic nodes that [`provided_lift`] looks into.
fn is_arithmetic(expr: &Entity) -> bool {
    matches!(
        expr.node(),
        Node::Sum(_) | Node::Product(_) | Node::Power(..) | Node::Divide(..) | Node::Function(..)
    )
}

/// Drops cases whose condition is `false`, and every case after the first whose condition is
/// `true`.
pub fn piecewise_prune(expr: &Entity) -> Option<Entity> {
    let Node::Piecewise(cases) = expr.node() else {
        return None;
    };

    let mut kept = Vec::new();
    for (value, condition) in cases {
        match condition.as_boolean() {
            Some(false) => continue,
            Some(true) if kept.is_empty() => return Some(value.clone()),
            Some(true) => {
                kept.push((value.clone(), condition.clone()));
                break;
            },
            None => kept.push((value.clone(), condition.clone())),
        }
    }

    match kept.len() {
        0 => Some(NAN.clone()),
        1 => {
            let (value, condition) = kept.remove(0);
            Some(Entity::provided(value, condition))
        },
        _ => Some(Entity::piecewise(kept)),
    }
}

/// `(x -> body)(a) = body[x := a]`
pub fn beta_reduce(expr: &Entity) -> Option<Entity> {
    let Node::Application(func, arg) = expr.node() else {
        return None;
    };
    let Node::Lambda(var, body) = func.node() else {
        return None;
    };
    Some(body.substitute(var, arg))
}

/// Evaluates `derivative(f, x, n)` symbolically, for a non-negative integer order `n`.
pub fn evaluate_derivative(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Derivative, |args| {
        let var = args[1].as_variable()?;
        let order = args[2].as_number()?.to_i64().filter(|n| *n >= 0)?;
        (0..order).try_fold(args[0].clone(), |f, _| derivative(&f, var).ok())
    })
}

/// Returns the rules for conditionals.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("provided_true", Tag::Provided, Step::ProvidedTrue, provided_true)
            .children(vec![Pat::Any, Pat::Lit(Entity::boolean(true))]),
        Rule::new("provided_false", Tag::Provided, Step::ProvidedFalse, provided_false)
            .children(vec![Pat::Any, Pat::Lit(Entity::boolean(false))]),
        Rule::new("provided_nested", Tag::Provided, Step::ProvidedNested, provided_nested),
        Rule::new("provided_lift", Tag::Any, Step::ProvidedLift, provided_lift)
            .when(is_arithmetic),
        Rule::new("piecewise_prune", Tag::Piecewise, Step::PiecewisePrune, piecewise_prune),
        Rule::new("beta_reduce", Tag::Application, Step::BetaReduce, beta_reduce),
        Rule::new("evaluate_derivative", Tag::Function(Func::Derivative), Step::EvaluateDerivative, evaluate_derivative),
    ]
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::{CompareOp, ZERO};
    use pretty_assertions::assert_eq;
    use super::*;

    fn positive(x: &Entity) -> Entity {
        Entity::compare(CompareOp::Greater, x.clone(), ZERO.clone())
    }

    #[test]
    fn provided() {
        let x = Entity::var("x");
        let rules = rules();
        let apply = |expr: &Entity| rules.iter().find_map(|rule| rule.apply(expr));

        assert_eq!(apply(&Entity::provided(x.clone(), Entity::boolean(true))), Some(x.clone()));
        assert_eq!(apply(&Entity::provided(x.clone(), Entity::boolean(false))), Some(NAN.clone()));

        let lifted = Entity::sum([Entity::provided(x.clone(), positive(&x)), Entity::integer(1)]);
        assert_eq!(
            apply(&lifted),
            Some(Entity::provided(Entity::sum([x.clone(), Entity::integer(1)]), positive(&x))),
        );
    }

    #[test]
    fn piecewise() {
        let x = Entity::var("x");
        let cases = Entity::piecewise(vec![
            (Entity::integer(1), Entity::boolean(false)),
            (x.clone(), positive(&x)),
            (Entity::integer(2), Entity::boolean(true)),
            (Entity::integer(3), positive(&x)),
        ]);
        assert_eq!(
            piecewise_prune(&cases),
            Some(Entity::piecewise(vec![
                (x.clone(), positive(&x)),
                (Entity::integer(2), Entity::boolean(true)),
            ])),
        );

        let first = Entity::piecewise(vec![(x.clone(), Entity::boolean(true))]);
        assert_eq!(piecewise_prune(&first), Some(x.clone()));
        assert_eq!(
            piecewise_prune(&Entity::piecewise(vec![(x.clone(), Entity::boolean(false))])),
            Some(NAN.clone()),
        );
    }

    #[test]
    fn lambdas() {
        let x = Entity::var("x");
        let square = Entity::lambda("x", Entity::pow(x.clone(), Entity::integer(2)));
        assert_eq!(
            beta_reduce(&Entity::apply(square, Entity::integer(3))),
            Some(Entity::pow(Entity::integer(3), Entity::integer(2))),
        );
    }

    #[test]
    fn derivatives() {
        let x = Entity::var("x");
        assert_eq!(
            evaluate_derivative(&Entity::derivative(Entity::sin(x.clone()), "x", 0)),
            Some(Entity::sin(x.clone())),
        );
        assert!(evaluate_derivative(&Entity::derivative(Entity::sin(x.clone()), "x", 1)).is_some());
        assert_eq!(evaluate_derivative(&Entity::derivative(x, "x", -1)), None);
    }
}
