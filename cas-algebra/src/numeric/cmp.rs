//! Equality, hashing and ordering of numbers.

use crate::settings::PRECISION_ERROR_COMMON;
use rug::Float;
use std::{cmp::Ordering, hash::{Hash, Hasher}};
use super::Number;

/// Structural equality: same tag, same value. Two NaNs are equal so that equality stays
/// reflexive, as the expression tree requires.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Complex(a), Self::Complex(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Number {}

/// Hashes the exact value of a float. The mantissa is normalized so that floats of different
/// precision holding the same value hash identically, matching [`Float`]'s equality.
fn hash_float<H: Hasher>(f: &Float, state: &mut H) {
    if f.is_nan() {
        0u8.hash(state);
    } else if f.is_infinite() {
        1u8.hash(state);
        f.is_sign_negative().hash(state);
    } else if f.is_zero() {
        2u8.hash(state);
    } else if let Some((mantissa, exp)) = f.to_integer_exp() {
        3u8.hash(state);
        let shift = mantissa.find_one(0).unwrap_or(0);
        (mantissa >> shift).hash(state);
        (exp as i64 + shift as i64).hash(state);
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(n) => n.hash(state),
            Self::Rational(r) => r.hash(state),
            Self::Real(f) => hash_float(f, state),
            Self::Complex(c) => {
                c.re.hash(state);
                c.im.hash(state);
            },
        }
    }
}

/// Compares the real values of two non-complex numbers, exactly when both are exact.
fn cmp_real(a: &Number, b: &Number) -> Option<Ordering> {
    match (a.as_rational(), b.as_rational()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => a.to_float().partial_cmp(&b.to_float()),
    }
}

impl Number {
    /// Returns `true` if the two numbers are equal within [`PRECISION_ERROR_COMMON`], regardless
    /// of their tags. Exact values are compared exactly.
    pub fn approx_eq(&self, other: &Number) -> bool {
        if self.is_exact() && other.is_exact() {
            return cmp_real(&self.re(), &other.re()) == Some(Ordering::Equal)
                && cmp_real(&self.im(), &other.im()) == Some(Ordering::Equal);
        }
        if self.is_nan() || other.is_nan() {
            return false;
        }

        let tolerance = PRECISION_ERROR_COMMON.get();
        let close = |a: Number, b: Number| {
            let (a, b) = (a.to_float(), b.to_float());
            if a.is_infinite() || b.is_infinite() {
                a == b
            } else {
                Float::with_val(a.prec().max(b.prec()), &a - &b).abs() < tolerance
            }
        };
        close(self.re(), other.re()) && close(self.im(), other.im())
    }

    /// Compares two real numbers, treating values within [`PRECISION_ERROR_COMMON`] as equal if
    /// either is inexact.
    ///
    /// Returns [`None`] if either number is complex or NaN.
    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        if !self.is_real() || !other.is_real() || self.is_nan() || other.is_nan() {
            return None;
        }
        if !(self.is_exact() && other.is_exact()) && self.approx_eq(other) {
            return Some(Ordering::Equal);
        }
        cmp_real(self, other)
    }

    /// A total order over all numbers, used to sort the children of commutative nodes: by real
    /// part, then by imaginary part, then by tag. NaN sorts after every other value.
    pub fn total_cmp(&self, other: &Number) -> Ordering {
        fn key(a: &Number, b: &Number) -> Ordering {
            match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => cmp_real(a, b).unwrap_or(Ordering::Equal),
            }
        }

        key(&self.re(), &other.re())
            .then_with(|| key(&self.im(), &other.im()))
            .then_with(|| self.kind().cmp(&other.kind()))
    }
}
