//! The numeric tower.
//!
//! Numbers are stored in one of four tags, ordered from most to least specific:
//!
//! | Tag                        | Value                                          |
//! | -------------------------- | ---------------------------------------------- |
//! | [`Number::Integer`]        | arbitrary-precision signed integer             |
//! | [`Number::Rational`]       | reduced fraction with a positive denominator   |
//! | [`Number::Real`]           | arbitrary-precision float, may be ±∞ or NaN    |
//! | [`Number::Complex`]        | pair of non-complex numbers                    |
//!
//! Every constructor and every arithmetic operation *downcasts* its result: the value is stored
//! in the most specific tag consistent with it. `4/1` is an integer, a real that is
//! indistinguishable from `1/3` becomes a rational, and a complex number with a (near) zero
//! imaginary part becomes real. Downcasting can be turned off for a scope with
//! [`DOWNCASTING_ENABLED`].
//!
//! ```
//! use cas_algebra::numeric::{Number, NumberKind};
//!
//! let half = Number::rational(1, 2);
//! let sum = &half + &half;
//! assert_eq!(sum.kind(), NumberKind::Integer);
//! assert_eq!(sum, Number::integer(1));
//! ```
//!
//! The [`PartialEq`] implementation is *structural*: two numbers are equal if they have the same
//! tag and exactly the same value. Tolerance-based comparison across tags is available through
//! [`Number::approx_eq`] and [`Number::compare`].

mod cmp;
mod fmt;
mod func;
mod ops;

use crate::approx::approximate_rational;
use crate::primitive::{complex, float, precision};
use crate::settings::{
    DECIMAL_PRECISION_CONTEXT,
    DOWNCASTING_ENABLED,
    FLOAT_TO_RATIONAL_ITER_COUNT,
    MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE,
    PRECISION_ERROR_ZERO_RANGE,
};
use rug::{float::Special, Complex, Float, Integer, Rational};
use std::cmp::Ordering;

/// The tag of a [`Number`], ordered from most to least specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberKind {
    Integer,
    Rational,
    Real,
    Complex,
}

/// A number in the numeric tower.
#[derive(Debug, Clone)]
pub enum Number {
    Integer(Integer),
    Rational(Rational),
    Real(Float),
    Complex(Box<ComplexNumber>),
}

/// The parts of a [`Number::Complex`]. Neither part is itself complex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexNumber {
    re: Number,
    im: Number,
}

impl ComplexNumber {
    /// The real part.
    pub fn re(&self) -> &Number {
        &self.re
    }

    /// The imaginary part.
    pub fn im(&self) -> &Number {
        &self.im
    }
}

impl Number {
    /// Creates an integer.
    pub fn integer(n: impl Into<Integer>) -> Self {
        Self::Integer(n.into())
    }

    /// Creates the rational `num / den`. A zero denominator follows the division rules of the
    /// tower (signed infinity, or NaN for `0/0`).
    pub fn rational(num: impl Into<Integer>, den: impl Into<Integer>) -> Self {
        let (num, den) = (num.into(), den.into());
        if den.is_zero() {
            return ops::division_by_zero(&Self::Integer(num));
        }
        Self::from_rational(Rational::from((num, den)))
    }

    /// Creates a number from a rational, coercing it to a real if its numerator or denominator
    /// exceeds [`MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE`].
    pub fn from_rational(r: Rational) -> Self {
        let max = MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE.get();
        if r.numer().cmp_abs(&max) == Ordering::Greater || r.denom().cmp_abs(&max) == Ordering::Greater {
            return Self::real(float(&r));
        }
        Self::Rational(r).downcast()
    }

    /// Creates a real, rounded to the active decimal context.
    pub fn real(f: Float) -> Self {
        Self::Real(round_to_context(f)).downcast()
    }

    /// Creates a real from an [`f64`].
    pub fn from_f64(value: f64) -> Self {
        Self::real(float(value))
    }

    /// Creates the complex number `re + im·i`.
    ///
    /// Panics if either part is itself complex.
    pub fn complex(re: Number, im: Number) -> Self {
        assert!(
            !matches!(re, Self::Complex(_)) && !matches!(im, Self::Complex(_)),
            "the parts of a complex number must be real",
        );
        Self::Complex(Box::new(ComplexNumber { re, im })).downcast()
    }

    /// Creates a number from a [`rug::Complex`].
    pub fn from_rug_complex(c: Complex) -> Self {
        let (re, im) = c.into_real_imag();
        Self::complex(Self::real(re), Self::real(im))
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::complex(Self::integer(0), Self::integer(1))
    }

    /// Not a number.
    pub fn nan() -> Self {
        Self::Real(float(Special::Nan))
    }

    /// Positive infinity.
    pub fn infinity() -> Self {
        Self::Real(float(Special::Infinity))
    }

    /// Negative infinity.
    pub fn neg_infinity() -> Self {
        Self::Real(float(Special::NegInfinity))
    }

    /// Re-applies the construction rules of the active scope to this value.
    pub fn create(self) -> Self {
        match self {
            Self::Rational(r) => Self::from_rational(r),
            Self::Real(f) => Self::real(f),
            other => other.downcast(),
        }
    }

    /// Stores the value in the most specific tag consistent with it, unless downcasting is
    /// disabled for the active scope.
    fn downcast(self) -> Self {
        if !DOWNCASTING_ENABLED.get() {
            return self;
        }

        match self {
            Self::Rational(r) if *r.denom() == 1 => Self::Integer(r.into_numer_denom().0),
            Self::Real(f) => downcast_real(f),
            Self::Complex(c) => {
                let ComplexNumber { re, im } = *c;
                let (re, im) = (re.downcast(), im.downcast());
                if im.is_effectively_zero() {
                    re
                } else {
                    Self::Complex(Box::new(ComplexNumber { re, im }))
                }
            },
            other => other,
        }
    }

    /// The tag of the number.
    pub fn kind(&self) -> NumberKind {
        match self {
            Self::Integer(_) => NumberKind::Integer,
            Self::Rational(_) => NumberKind::Rational,
            Self::Real(_) => NumberKind::Real,
            Self::Complex(_) => NumberKind::Complex,
        }
    }

    /// Returns `true` if the value is held exactly (no floating-point part).
    pub fn is_exact(&self) -> bool {
        match self {
            Self::Integer(_) | Self::Rational(_) => true,
            Self::Real(_) => false,
            Self::Complex(c) => c.re.is_exact() && c.im.is_exact(),
        }
    }

    /// Returns `true` if the number has no imaginary part.
    pub fn is_real(&self) -> bool {
        !matches!(self, Self::Complex(_))
    }

    /// Returns `true` if the number is exactly zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_zero(),
            Self::Rational(r) => r.numer().is_zero(),
            Self::Real(f) => f.is_zero(),
            Self::Complex(c) => c.re.is_zero() && c.im.is_zero(),
        }
    }

    /// Returns `true` if the number is within [`PRECISION_ERROR_ZERO_RANGE`] of zero.
    pub fn is_effectively_zero(&self) -> bool {
        match self {
            Self::Real(f) => f.is_finite() && f.clone().abs() < PRECISION_ERROR_ZERO_RANGE.get(),
            Self::Complex(c) => c.re.is_effectively_zero() && c.im.is_effectively_zero(),
            _ => self.is_zero(),
        }
    }

    /// Returns `true` if the number is exactly one.
    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 1,
            Self::Rational(r) => *r == 1,
            Self::Real(f) => *f == 1,
            Self::Complex(c) => c.re.is_one() && c.im.is_zero(),
        }
    }

    /// Returns `true` if the number is exactly minus one.
    pub fn is_minus_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == -1,
            Self::Rational(r) => *r == -1,
            Self::Real(f) => *f == -1,
            Self::Complex(c) => c.re.is_minus_one() && c.im.is_zero(),
        }
    }

    /// Returns `true` if the number is real and strictly negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => *n < 0,
            Self::Rational(r) => *r < 0,
            Self::Real(f) => *f < 0,
            Self::Complex(_) => false,
        }
    }

    /// Returns `true` if the number is real and strictly positive.
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Integer(n) => *n > 0,
            Self::Rational(r) => *r > 0,
            Self::Real(f) => *f > 0,
            Self::Complex(_) => false,
        }
    }

    /// Returns `true` if any part of the number is NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            Self::Real(f) => f.is_nan(),
            Self::Complex(c) => c.re.is_nan() || c.im.is_nan(),
            _ => false,
        }
    }

    /// Returns `true` if every part of the number is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Real(f) => f.is_finite(),
            Self::Complex(c) => c.re.is_finite() && c.im.is_finite(),
            _ => true,
        }
    }

    /// Returns the value as an integer, if it is stored as one.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value as an exact rational, if it is an integer or a rational.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Integer(n) => Some(Rational::from(n)),
            Self::Rational(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// Returns the value as an [`i64`], if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_integer()?.to_i64()
    }

    /// The real part.
    pub fn re(&self) -> Number {
        match self {
            Self::Complex(c) => c.re.clone(),
            real => real.clone(),
        }
    }

    /// The imaginary part.
    pub fn im(&self) -> Number {
        match self {
            Self::Complex(c) => c.im.clone(),
            _ => Self::Integer(Integer::new()),
        }
    }

    /// Returns the real part of the number as a [`Float`].
    pub fn to_float(&self) -> Float {
        match self {
            Self::Integer(n) => float(n),
            Self::Rational(r) => float(r),
            Self::Real(f) => Float::with_val(precision().max(f.prec()), f),
            Self::Complex(c) => c.re.to_float(),
        }
    }

    /// Returns the number as a [`rug::Complex`].
    pub fn to_rug_complex(&self) -> Complex {
        match self {
            Self::Complex(c) => complex((c.re.to_float(), c.im.to_float())),
            real => complex((real.to_float(), 0)),
        }
    }

    /// Returns the real part of the number as an [`f64`].
    pub fn to_f64(&self) -> f64 {
        self.to_float().to_f64()
    }

    /// Returns the real and imaginary parts as [`f64`]s.
    pub fn to_f64_pair(&self) -> (f64, f64) {
        (self.re().to_f64(), self.im().to_f64())
    }
}

/// Rounds a float to the precision and rounding mode of the active context, and flushes values
/// outside its exponent range to zero or infinity.
fn round_to_context(mut f: Float) -> Float {
    let context = DECIMAL_PRECISION_CONTEXT.get();
    f.set_prec_round(context.precision_bits(), context.rounding);
    if !f.is_finite() || f.is_zero() {
        return f;
    }

    let decimal_exponent = f.get_exp().map(|exp| (exp as f64 * std::f64::consts::LOG10_2) as i64);
    match decimal_exponent {
        Some(exp) if exp > context.max_exponent => {
            if f.is_sign_negative() {
                Float::with_val(f.prec(), Special::NegInfinity)
            } else {
                Float::with_val(f.prec(), Special::Infinity)
            }
        },
        Some(exp) if exp < context.min_exponent => Float::with_val(f.prec(), Special::Zero),
        _ => f,
    }
}

/// Finds the most specific tag for a finite real: an integer if the value is within
/// [`PRECISION_ERROR_ZERO_RANGE`] of one, otherwise a rational found by a bounded continued
/// fraction search.
fn downcast_real(f: Float) -> Number {
    if !f.is_finite() {
        return Number::Real(f);
    }

    let zero_range = PRECISION_ERROR_ZERO_RANGE.get();
    let nearest = Float::with_val(f.prec(), f.round_ref());
    if Float::with_val(f.prec(), &f - &nearest).abs() < zero_range {
        if let Some(n) = nearest.to_integer() {
            return Number::Integer(n);
        }
    }

    let terms = FLOAT_TO_RATIONAL_ITER_COUNT.get();
    if let Some(r) = approximate_rational(&f, terms, zero_range) {
        let max = MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE.get();
        if r.numer().cmp_abs(&max) != Ordering::Greater && r.denom().cmp_abs(&max) != Ordering::Greater {
            return Number::Rational(r).downcast();
        }
    }

    Number::Real(f)
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Self {
        Self::from_rational(r)
    }
}

impl From<Float> for Number {
    fn from(f: Float) -> Self {
        Self::real(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::{
        DOWNCASTING_ENABLED,
        FLOAT_TO_RATIONAL_ITER_COUNT,
        MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn integer_fraction_downcasts() {
        let n = Number::rational(4, 1);
        assert_eq!(n.kind(), NumberKind::Integer);
        assert_eq!(n, Number::integer(4));
    }

    #[test]
    fn rational_sum_downcasts() {
        let half = Number::rational(1, 2);
        assert_eq!(half.kind(), NumberKind::Rational);
        assert_eq!(&half + &half, Number::integer(1));
    }

    #[test]
    fn downcasting_disabled() {
        let _guard = DOWNCASTING_ENABLED.set(false);
        let half = Number::rational(1, 2);
        let sum = &half + &half;
        assert_eq!(sum.kind(), NumberKind::Rational);
        assert_eq!(sum.as_rational(), Some(Rational::from(1)));
        assert!(sum.approx_eq(&Number::integer(1)));
    }

    #[test]
    fn rational_is_reduced() {
        let n = Number::rational(6, -4);
        assert_eq!(n, Number::Rational(Rational::from((-3, 2))));
    }

    #[test]
    fn oversized_rational_is_real() {
        let _guard = MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE.set(Integer::from(1000));
        let n = Number::rational(1, 1001);
        assert_eq!(n.kind(), NumberKind::Real);
        assert!(n.approx_eq(&Number::from_f64(1.0 / 1001.0)));
    }

    #[test]
    fn real_snaps_to_integer_and_rational() {
        assert_eq!(Number::from_f64(3.0), Number::integer(3));
        assert_eq!(Number::from_f64(0.25), Number::rational(1, 4));

        let third = Number::real(float(1) / float(3));
        assert_eq!(third, Number::rational(1, 3));

        let _guard = FLOAT_TO_RATIONAL_ITER_COUNT.set(0);
        let third = Number::real(float(1) / float(3));
        assert_eq!(third.kind(), NumberKind::Real);
    }

    #[test]
    fn irrational_stays_real() {
        let root = Number::real(float(2).sqrt());
        assert_eq!(root.kind(), NumberKind::Real);

        for value in [float(2).sin(), float(3).ln(), float(8).cos(), float(12).atan(), float(5).exp()] {
            assert_eq!(Number::real(value).kind(), NumberKind::Real);
        }

        assert_eq!(Number::real(float(-22) / float(7)), Number::rational(-22, 7));
    }

    #[test]
    fn complex_with_zero_imaginary_part() {
        let n = Number::complex(Number::integer(3), Number::integer(0));
        assert_eq!(n, Number::integer(3));

        let i = Number::i();
        assert_eq!(i.kind(), NumberKind::Complex);
        assert_eq!(i.im(), Number::integer(1));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(Number::rational(3, 0), Number::infinity());
        assert_eq!(Number::rational(-3, 0), Number::neg_infinity());
        assert!(Number::rational(0, 0).is_nan());
    }
}
