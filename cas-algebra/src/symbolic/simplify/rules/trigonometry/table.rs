//! Exact values of the sine at constructible angles.

use crate::symbolic::expr::{Entity, ONE, ONE_HALF, ZERO};
use once_cell::sync::Lazy;
use rug::Rational;
use std::collections::HashMap;

/// `sqrt(n)`
fn sqrt(n: i64) -> Entity {
    Entity::sqrt(Entity::integer(n))
}

/// `sqrt(6) - sqrt(2)` or `sqrt(6) + sqrt(2)`, over 4.
fn fifteen_degrees(sign: i64) -> Entity {
    Entity::div(
        Entity::sum([sqrt(6), Entity::product([Entity::integer(sign), sqrt(2)])]),
        Entity::integer(4),
    )
}

/// `sqrt(2 - sqrt(2)) / 2` or `sqrt(2 + sqrt(2)) / 2`.
fn half_of_forty_five(sign: i64) -> Entity {
    Entity::div(
        Entity::sqrt(Entity::sum([Entity::integer(2), Entity::product([Entity::integer(sign), sqrt(2)])])),
        Entity::integer(2),
    )
}

/// Sine of the angles in the first quadrant whose value is known exactly.
///
/// The keys are **turns**: fractions of a full circle, so `1/12` is `pi/6 rad` (30 deg). The
/// values of the other quadrants follow from symmetry.
pub static SIN_TABLE: Lazy<HashMap<Rational, Entity>> = Lazy::new(|| {
    let turn = |n: u32, d: u32| Rational::from((n, d));
    HashMap::from([
        (turn(0, 1), ZERO.clone()),
        (turn(1, 24), fifteen_degrees(-1)),
        (turn(1, 16), half_of_forty_five(-1)),
        (turn(1, 12), ONE_HALF.clone()),
        (turn(1, 8), Entity::div(sqrt(2), Entity::integer(2))),
        (turn(1, 6), Entity::div(sqrt(3), Entity::integer(2))),
        (turn(3, 16), half_of_forty_five(1)),
        (turn(5, 24), fifteen_degrees(1)),
        (turn(1, 4), ONE.clone()),
    ])
});

/// Looks up the exact sine of an angle given in turns, in `[0, 1)`.
pub fn sin_of_turn(turn: &Rational) -> Option<Entity> {
    let quarter = Rational::from((1, 4));
    let half = Rational::from((1, 2));
    if *turn <= quarter {
        SIN_TABLE.get(turn).cloned()
    } else if *turn <= half {
        SIN_TABLE.get(&Rational::from(&half - turn)).cloned()
    } else if *turn <= Rational::from((3, 4)) {
        SIN_TABLE.get(&Rational::from(turn - &half)).map(|value| -value)
    } else {
        SIN_TABLE.get(&(Rational::from(1) - turn)).map(|value| -value)
    }
}
