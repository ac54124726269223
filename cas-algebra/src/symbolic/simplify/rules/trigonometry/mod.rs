//! Simplification rules for trigonometric functions.

mod table;

use crate::consts::PI_NAME;
use crate::symbolic::{
    expr::{Entity, Func, Node, MINUS_ONE, ONE},
    simplify::{
        fraction::{split_coefficient, with_coefficient},
        pattern::{Rule, Tag},
        step::Step,
    },
};
use rug::Rational;
use super::do_call;

pub use table::{sin_of_turn, SIN_TABLE};

/// Returns `r` such that `arg = r * pi`, if `r` is rational.
fn pi_multiple(arg: &Entity) -> Option<Rational> {
    match arg.node() {
        Node::Number(n) if n.is_exact() && n.is_zero() => Some(Rational::new()),
        Node::Variable(name) if name == PI_NAME => Some(Rational::from(1)),
        Node::Product(factors) if factors.len() == 2 && factors[1].as_variable() == Some(PI_NAME) => {
            factors[0].as_number()?.as_rational()
        },
        Node::Divide(num, den) => {
            let den = den.as_number()?.as_rational().filter(|d| !d.cmp0().is_eq())?;
            Some(pi_multiple(num)? / den)
        },
        _ => None,
    }
}

/// Reduces an angle in turns to `[0, 1)`.
fn normalize(turn: Rational) -> Rational {
    let whole = turn.clone().floor();
    turn - whole
}

/// Apply normalization and compute the sine of the given angle.
///
/// For example, to compute `sin(pi/6)`, the normalized fraction is `(pi/6) / (2pi) = 1/12`, which
/// is then looked up in the table of known values.
fn sin_of(arg: &Entity) -> Option<Entity> {
    let turn = normalize(pi_multiple(arg)? / 2u32);
    sin_of_turn(&turn)
}

/// `cos(x) = sin(x + pi/2)`
fn cos_of(arg: &Entity) -> Option<Entity> {
    let turn = normalize(pi_multiple(arg)? / 2u32 + Rational::from((1, 4)));
    sin_of_turn(&turn)
}

/// `sin(x)`
pub fn sin(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Sin, |args| sin_of(&args[0]))
}

/// `cos(x)`
pub fn cos(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Cos, |args| cos_of(&args[0]))
}

/// `tan(x) = sin(x) / cos(x)`, where `cos(x)` is not zero.
pub fn tan(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Tan, |args| {
        let (sin, cos) = (sin_of(&args[0])?, cos_of(&args[0])?);
        (!cos.is_zero()).then(|| Entity::div(sin, cos))
    })
}

/// `cotan(x) = cos(x) / sin(x)`, where `sin(x)` is not zero.
pub fn cotan(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Cotan, |args| {
        let (sin, cos) = (sin_of(&args[0])?, cos_of(&args[0])?);
        (!sin.is_zero()).then(|| Entity::div(cos, sin))
    })
}

/// `sec(x) = 1 / cos(x)`, where `cos(x)` is not zero.
pub fn sec(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Sec, |args| {
        let cos = cos_of(&args[0])?;
        (!cos.is_zero()).then(|| Entity::div(ONE.clone(), cos))
    })
}

/// `cosec(x) = 1 / sin(x)`, where `sin(x)` is not zero.
pub fn cosec(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Cosec, |args| {
        let sin = sin_of(&args[0])?;
        (!sin.is_zero()).then(|| Entity::div(ONE.clone(), sin))
    })
}

/// Returns `-arg` if the argument carries a negative real coefficient.
fn negated_argument(arg: &Entity) -> Option<Entity> {
    let (coefficient, rest) = split_coefficient(arg);
    if !matches!(arg.node(), Node::Number(_) | Node::Product(_)) || !coefficient.is_real() || !coefficient.is_negative() {
        return None;
    }
    Some(with_coefficient(-coefficient, rest))
}

/// `sin(-x) = -sin(x)`
/// `cos(-x) = cos(x)`
pub fn trig_symmetry(expr: &Entity) -> Option<Entity> {
    let Node::Function(func, args) = expr.node() else {
        return None;
    };
    let odd = match func {
        Func::Sin | Func::Tan | Func::Cotan | Func::Cosec | Func::Arcsin | Func::Arctan => true,
        Func::Cos | Func::Sec => false,
        _ => return None,
    };

    let positive = Entity::func(*func, vec![negated_argument(&args[0])?]);
    if odd {
        Some(Entity::product([MINUS_ONE.clone(), positive]))
    } else {
        Some(positive)
    }
}

/// `sin(arcsin(x)) = x`
/// `cos(arccos(x)) = x`
/// `tan(arctan(x)) = x`
/// `cotan(arccotan(x)) = x`
pub fn inverse_trig(expr: &Entity) -> Option<Entity> {
    let Node::Function(outer, args) = expr.node() else {
        return None;
    };
    let Node::Function(inner, inner_args) = args[0].node() else {
        return None;
    };
    let inverse = match outer {
        Func::Sin => Func::Arcsin,
        Func::Cos => Func::Arccos,
        Func::Tan => Func::Arctan,
        Func::Cotan => Func::Arccotan,
        _ => return None,
    };
    (*inner == inverse).then(|| inner_args[0].clone())
}

/// Returns `true` if the function is a trigonometric function or its inverse.
fn is_trigonometric(expr: &Entity) -> bool {
    matches!(
        expr.node(),
        Node::Function(
            Func::Sin | Func::Cos | Func::Tan | Func::Cotan | Func::Sec | Func::Cosec
                | Func::Arcsin | Func::Arccos | Func::Arctan | Func::Arccotan,
            _,
        )
    )
}

/// Returns the rules for trigonometric functions.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("sin", Tag::Function(Func::Sin), Step::Sin, sin),
        Rule::new("cos", Tag::Function(Func::Cos), Step::Cos, cos),
        Rule::new("tan", Tag::Function(Func::Tan), Step::Tan, tan),
        Rule::new("cotan", Tag::Function(Func::Cotan), Step::Tan, cotan),
        Rule::new("sec", Tag::Function(Func::Sec), Step::Cos, sec),
        Rule::new("cosec", Tag::Function(Func::Cosec), Step::Sin, cosec),
        Rule::new("inverse_trig", Tag::Any, Step::InverseTrig, inverse_trig).when(is_trigonometric),
        Rule::new("trig_symmetry", Tag::Any, Step::TrigSymmetry, trig_symmetry).when(is_trigonometric),
    ]
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::{PI, ZERO};
    use pretty_assertions::assert_eq;
    use super::*;

    fn pi_over(n: i64) -> Entity {
        Entity::div(PI.clone(), Entity::integer(n))
    }

    #[test]
    fn known_values() {
        assert_eq!(sin(&Entity::sin(pi_over(6))), Some(Entity::rational(1, 2)));
        assert_eq!(sin(&Entity::sin(PI.clone())), Some(ZERO.clone()));
        assert_eq!(cos(&Entity::cos(PI.clone())), Some(Entity::integer(-1)));
        assert_eq!(
            cos(&Entity::cos(pi_over(4))),
            Some(Entity::div(Entity::sqrt(Entity::integer(2)), Entity::integer(2))),
        );

        // 7pi/6 is in the third quadrant
        let angle = Entity::product([Entity::rational(7, 6), PI.clone()]);
        assert_eq!(sin(&Entity::sin(angle)), Some(Entity::rational(-1, 2)));

        assert_eq!(sin(&Entity::sin(pi_over(7))), None);
        assert_eq!(sin(&Entity::sin(Entity::var("x"))), None);
    }

    #[test]
    fn undefined_values_are_left_alone() {
        assert_eq!(tan(&Entity::tan(pi_over(2))), None);
        assert_eq!(cotan(&Entity::cotan(ZERO.clone())), None);
        assert_eq!(
            tan(&Entity::tan(ZERO.clone())),
            Some(Entity::div(ZERO.clone(), ONE.clone())),
        );
    }

    #[test]
    fn symmetry() {
        let x = Entity::var("x");
        assert_eq!(
            trig_symmetry(&Entity::sin(-&x)),
            Some(Entity::product([MINUS_ONE.clone(), Entity::sin(x.clone())])),
        );
        assert_eq!(trig_symmetry(&Entity::cos(-&x)), Some(Entity::cos(x.clone())));
        assert_eq!(trig_symmetry(&Entity::sin(x.clone())), None);
        assert_eq!(inverse_trig(&Entity::sin(Entity::arcsin(x.clone()))), Some(x));
    }
}
