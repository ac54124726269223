//! Mathematical constants. Each function returns a [`Float`] computed at the precision of the
//! active [`DecimalContext`](crate::settings::DecimalContext), so the values follow scoped changes
//! of precision.

use rug::{float::Constant, Float};
use super::primitive::float;

/// The name of the variable that stands for π in expressions.
pub const PI_NAME: &str = "pi";

/// The name of the variable that stands for Euler's number in expressions.
pub const E_NAME: &str = "e";

/// π.
pub fn pi() -> Float {
    float(Constant::Pi)
}

/// 2π.
pub fn tau() -> Float {
    float(Constant::Pi) * 2u32
}

/// Euler's number.
pub fn e() -> Float {
    float(1).exp()
}

/// Returns the value of the named constant, if `name` is one.
pub fn named(name: &str) -> Option<Float> {
    match name {
        PI_NAME => Some(pi()),
        E_NAME => Some(e()),
        _ => None,
    }
}
