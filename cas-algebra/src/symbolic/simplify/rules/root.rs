//! Simplification rules for square, cube, and higher roots of numbers.

use crate::numeric::{func::prime_factorization, Number};
use crate::primitive::int;
use crate::symbolic::{
    expr::{Entity, I},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};
use rug::{Integer, Rational};
use super::do_power;

/// Radicands with more bits than this are not factored.
const MAX_RADICAND_BITS: u32 = 40;

/// Splits `n` into `(outside, inside)` such that `n = outside^root * inside` and `inside` has no
/// factor that is a perfect `root`-th power.
fn do_root(n: &Integer, root: u32) -> (Integer, Integer) {
    prime_factorization(n.clone())
        .into_iter()
        .fold((int(1), int(1)), |(outside, inside), (prime, count)| {
            let count = count as u32;
            (
                outside * Integer::from(prime.pow_ref(count / root)),
                inside * Integer::from(prime.pow_ref(count % root)),
            )
        })
}

/// Returns the base and the exponent `p/q` of a power of an exact number to a non-integer
/// rational exponent.
fn numeric_root(base: &Entity, exp: &Entity) -> Option<(Rational, Integer, u32)> {
    let base = base.as_number().filter(|n| n.is_exact())?.as_rational()?;
    let exp = exp.as_number()?.as_rational().filter(|r| !r.is_integer())?;
    let (p, q) = exp.into_numer_denom();
    Some((base, p, q.to_u32()?))
}

/// `sqrt(12) = 2*sqrt(3)`
/// `8^(2/3) = 4`
/// `sqrt(1/2) = sqrt(2)/2`
/// `2^(3/2) = 2*sqrt(2)`
pub fn extract_root(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        let (base, p, q) = numeric_root(base, exp)?;
        if base.cmp0().is_le() || p.cmp0().is_le() {
            return None;
        }
        let p = p.to_u32()?;

        // a/b = (a * b^(q-1)) / b^q
        let (a, b) = base.into_numer_denom();
        let radicand = a * Integer::from(b.pow_ref(q - 1));
        if radicand.significant_bits() > MAX_RADICAND_BITS {
            return None;
        }

        let (whole, rem) = (p / q, p % q);
        let (outside, inside) = do_root(&radicand, q);
        if whole == 0 && outside == 1 && b == 1 {
            return None;
        }

        let numerator = Integer::from(radicand.pow_ref(whole)) * Integer::from(outside.pow_ref(rem));
        let denominator = Integer::from(b.pow_ref(p));
        let coefficient = Entity::number(Number::from_rational(Rational::from((numerator, denominator))));
        if rem == 0 || inside == 1 {
            return Some(coefficient);
        }

        let root = Entity::pow(Entity::number(Number::integer(inside)), Entity::rational(rem as i64, q as i64));
        Some(Entity::product([coefficient, root]))
    })
}

/// `sqrt(-3) = i*sqrt(3)`
pub fn imaginary_root(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        let (base, p, q) = numeric_root(base, exp)?;
        if base.cmp0().is_ge() || p != 1 || q != 2 {
            return None;
        }
        let magnitude = Entity::number(Number::from_rational(-base));
        Some(Entity::product([I.clone(), Entity::sqrt(magnitude)]))
    })
}

/// `(-2)^(1/3) = -(2^(1/3))`
pub fn odd_root_of_negative(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        let (base, p, q) = numeric_root(base, exp)?;
        if base.cmp0().is_ge() || q % 2 == 0 {
            return None;
        }
        let sign = if p.is_even() { 1 } else { -1 };
        let magnitude = Entity::number(Number::from_rational(-base));
        Some(Entity::product([Entity::integer(sign), Entity::pow(magnitude, exp.clone())]))
    })
}

/// Returns the rules for roots.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("extract_root", Tag::Power, Step::ExtractRoot, extract_root)
            .children(vec![Pat::Num, Pat::Num]),
        Rule::new("imaginary_root", Tag::Power, Step::ImaginaryRoot, imaginary_root)
            .children(vec![Pat::Num, Pat::Num]),
        Rule::new("odd_root_of_negative", Tag::Power, Step::OddRootOfNegative, odd_root_of_negative)
            .children(vec![Pat::Num, Pat::Num]),
    ]
}
