//! Arithmetic over the numeric tower.
//!
//! Each operation lifts its operands to their least general common tag, computes there, and
//! downcasts the result. Exact operands stay exact; a single real operand makes the result real.

use crate::primitive::{complex, float};
use rug::{float::Special, ops::Pow, Integer, Rational};
use std::ops::{Add, Div, Mul, Neg, Sub};
use super::{ComplexNumber, Number};

/// Integer exponents whose result would need more bits than this are computed in floating point.
const MAX_EXACT_POWER_BITS: u64 = 1 << 20;

/// The result of dividing `a` by an exact zero: a signed infinity, or NaN if `a` is zero, NaN or
/// complex.
pub(super) fn division_by_zero(a: &Number) -> Number {
    if a.is_positive() {
        Number::infinity()
    } else if a.is_negative() {
        Number::neg_infinity()
    } else {
        Number::nan()
    }
}

/// Splits a number into its real and imaginary parts.
fn parts(n: &Number) -> (Number, Number) {
    match n {
        Number::Complex(c) => (c.re.clone(), c.im.clone()),
        real => (real.clone(), Number::Integer(Integer::new())),
    }
}

/// Returns `true` if the operation must be carried out in floating point.
fn any_real(a: &Number, b: &Number) -> bool {
    matches!(a, Number::Real(_)) || matches!(b, Number::Real(_))
}

fn add(a: &Number, b: &Number) -> Number {
    match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => Number::Integer(Integer::from(a + b)),
        (Number::Complex(_), _) | (_, Number::Complex(_)) => {
            let ((ar, ai), (br, bi)) = (parts(a), parts(b));
            Number::complex(add(&ar, &br), add(&ai, &bi))
        },
        _ if any_real(a, b) => Number::real(a.to_float() + b.to_float()),
        _ => exact_binary(a, b, |a, b| a + b),
    }
}

fn mul(a: &Number, b: &Number) -> Number {
    match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => Number::Integer(Integer::from(a * b)),
        (Number::Complex(_), _) | (_, Number::Complex(_)) => {
            let ((ar, ai), (br, bi)) = (parts(a), parts(b));
            let re = sub(&mul(&ar, &br), &mul(&ai, &bi));
            let im = add(&mul(&ar, &bi), &mul(&ai, &br));
            Number::complex(re, im)
        },
        _ if any_real(a, b) => Number::real(a.to_float() * b.to_float()),
        _ => exact_binary(a, b, |a, b| a * b),
    }
}

fn sub(a: &Number, b: &Number) -> Number {
    add(a, &neg(b))
}

fn div(a: &Number, b: &Number) -> Number {
    if b.is_exact() && b.is_zero() {
        return division_by_zero(a);
    }

    match (a, b) {
        (Number::Complex(_), _) | (_, Number::Complex(_)) => {
            // (a + bi) / (c + di) = ((ac + bd) + (bc - ad)i) / (c² + d²)
            let ((ar, ai), (br, bi)) = (parts(a), parts(b));
            let denom = add(&mul(&br, &br), &mul(&bi, &bi));
            let re = add(&mul(&ar, &br), &mul(&ai, &bi));
            let im = sub(&mul(&ai, &br), &mul(&ar, &bi));
            Number::complex(div(&re, &denom), div(&im, &denom))
        },
        _ if any_real(a, b) => Number::real(a.to_float() / b.to_float()),
        _ => exact_binary(a, b, |a, b| a / b),
    }
}

fn neg(a: &Number) -> Number {
    match a {
        Number::Integer(n) => Number::Integer(Integer::from(-n)),
        Number::Rational(r) => Number::Rational(Rational::from(-r)),
        Number::Real(f) => Number::Real(-f.clone()),
        Number::Complex(c) => Number::Complex(Box::new(ComplexNumber {
            re: neg(&c.re),
            im: neg(&c.im),
        })),
    }
}

/// Applies `op` to both operands as rationals.
fn exact_binary(a: &Number, b: &Number, op: impl FnOnce(Rational, Rational) -> Rational) -> Number {
    match (a.as_rational(), b.as_rational()) {
        (Some(a), Some(b)) => Number::from_rational(op(a, b)),
        _ => unreachable!("exact arithmetic on inexact operands"),
    }
}

/// Returns the exact `q`-th root of a non-negative integer, if it is a perfect power.
fn exact_root(n: &Integer, q: u32) -> Option<Integer> {
    if *n < 0 {
        return None;
    }
    let root = n.clone().root(q);
    (root.clone().pow(q) == *n).then_some(root)
}

/// Returns the exact `q`-th root of a non-negative rational.
fn exact_rational_root(r: &Rational, q: u32) -> Option<Rational> {
    let numer = exact_root(r.numer(), q)?;
    let denom = exact_root(r.denom(), q)?;
    Some(Rational::from((numer, denom)))
}

impl Number {
    /// Raises `self` to an integer power exactly, using binary exponentiation for complex bases.
    fn pow_integer(&self, exp: &Integer) -> Option<Number> {
        if !self.is_exact() {
            return None;
        }

        if exp.is_zero() {
            return Some(Number::Integer(Integer::from(1)));
        }
        if exp.cmp0().is_lt() {
            let positive = self.pow_integer(&Integer::from(-exp))?;
            return Some(&Number::Integer(Integer::from(1)) / &positive);
        }

        match self {
            Number::Integer(n) if n.is_zero() || *n == 1 => Some(self.clone()),
            Number::Integer(n) if *n == -1 => Some(if exp.is_even() { -self } else { self.clone() }),
            _ => {
                let bits = match self {
                    Number::Complex(c) => c.re.approx_bits().max(c.im.approx_bits()) + 1,
                    real => real.approx_bits(),
                };
                let e = exp.to_u32()?;
                if bits.saturating_mul(e as u64) > MAX_EXACT_POWER_BITS {
                    return None;
                }

                match self {
                    Number::Integer(n) => Some(Number::Integer(n.clone().pow(e))),
                    Number::Rational(r) => Some(Number::from_rational(r.clone().pow(e))),
                    _ => {
                        let mut result = Number::Integer(Integer::from(1));
                        let mut base = self.clone();
                        let mut e = e;
                        while e > 0 {
                            if e & 1 == 1 {
                                result = &result * &base;
                            }
                            base = &base * &base;
                            e >>= 1;
                        }
                        Some(result)
                    },
                }
            },
        }
    }

    /// A rough bit size of an exact real, used to bound exact exponentiation.
    fn approx_bits(&self) -> u64 {
        match self {
            Number::Integer(n) => n.significant_bits() as u64,
            Number::Rational(r) => r.numer().significant_bits().max(r.denom().significant_bits()) as u64,
            _ => 64,
        }
    }

    /// Computes `self ^ exp` exactly, returning [`None`] if the result cannot be represented
    /// exactly (for example `2^(1/2)`) or either operand is inexact.
    pub fn pow_exact(&self, exp: &Number) -> Option<Number> {
        if !self.is_exact() || !exp.is_exact() {
            return None;
        }

        match exp {
            Number::Integer(n) => self.pow_integer(n),
            Number::Rational(r) => {
                let q = r.denom().to_u32()?;
                let p = r.numer();
                let root = match self {
                    Number::Integer(_) | Number::Rational(_) => {
                        let base = self.as_rational()?;
                        if base.cmp0().is_ge() {
                            Number::from_rational(exact_rational_root(&base, q)?)
                        } else if q % 2 == 1 {
                            -&Number::from_rational(exact_rational_root(&Rational::from(-&base), q)?)
                        } else if q == 2 {
                            let magnitude = exact_rational_root(&Rational::from(-&base), 2)?;
                            Number::complex(Number::Integer(Integer::new()), Number::from_rational(magnitude))
                        } else {
                            return None;
                        }
                    },
                    _ => return None,
                };
                root.pow_integer(p)
            },
            _ => None,
        }
    }

    /// Computes `self ^ exp`, exactly if possible and in floating point otherwise.
    pub fn pow(&self, exp: &Number) -> Number {
        if let Some(exact) = self.pow_exact(exp) {
            return exact;
        }

        let exp_is_integral = match exp {
            Number::Integer(_) => true,
            Number::Real(f) => f.is_integer(),
            _ => false,
        };
        if self.is_real() && exp.is_real() && (!self.is_negative() || exp_is_integral) {
            return Number::real(self.to_float().pow(exp.to_float()));
        }
        if self.is_zero() {
            return if exp.re().is_positive() {
                Number::Integer(Integer::new())
            } else {
                Number::nan()
            };
        }

        Number::from_rug_complex(self.to_rug_complex().pow(exp.to_rug_complex()))
    }

    /// The absolute value (modulus for complex numbers).
    pub fn abs(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(Integer::from(n.abs_ref())),
            Number::Rational(r) => Number::Rational(Rational::from(r.abs_ref())),
            Number::Real(f) => Number::Real(f.clone().abs()),
            Number::Complex(c) => {
                let square = &(&c.re * &c.re) + &(&c.im * &c.im);
                square.pow(&Number::rational(1, 2))
            },
        }
    }

    /// The greatest common divisor of two exact reals. For rationals this is the largest
    /// rational dividing both into integers, `gcd(numerators) / lcm(denominators)`.
    pub fn gcd(&self, other: &Number) -> Option<Number> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(Number::Integer(a.clone().gcd(b))),
            _ => {
                let (a, b) = (self.as_rational()?, other.as_rational()?);
                let numer = a.numer().clone().gcd(b.numer());
                let denom = a.denom().clone().lcm(b.denom());
                Some(Number::from_rational(Rational::from((numer, denom))))
            },
        }
    }

    /// Returns the integer closest to the real part of the number, rounding half away from zero.
    pub fn round(&self) -> Option<Integer> {
        match self {
            Number::Integer(n) => Some(n.clone()),
            Number::Rational(r) => Some(r.clone().round().into_numer_denom().0),
            Number::Real(f) => f.clone().round().to_integer(),
            Number::Complex(c) => c.re.round(),
        }
    }

    /// Returns `self` as a [`Number::Real`] (or complex with real parts), discarding exactness.
    pub fn to_inexact(&self) -> Number {
        match self {
            Number::Complex(c) => Number::Complex(Box::new(ComplexNumber {
                re: c.re.to_inexact(),
                im: c.im.to_inexact(),
            })),
            real => Number::Real(real.to_float()),
        }
    }

    /// A special real value (infinity, NaN, signed zero).
    pub(super) fn special(kind: Special) -> Number {
        Number::Real(float(kind))
    }

    /// Creates a complex number from floating-point parts.
    pub(super) fn from_parts_f64(re: f64, im: f64) -> Number {
        Number::from_rug_complex(complex((re, im)))
    }
}

macro_rules! impl_binary {
    ($($trait:ident, $method:ident, $func:ident;)*) => {
        $(
            impl $trait<&Number> for &Number {
                type Output = Number;

                fn $method(self, rhs: &Number) -> Number {
                    $func(self, rhs)
                }
            }

            impl $trait for Number {
                type Output = Number;

                fn $method(self, rhs: Number) -> Number {
                    $func(&self, &rhs)
                }
            }
        )*
    };
}

impl_binary! {
    Add, add, add;
    Sub, sub, sub;
    Mul, mul, mul;
    Div, div, div;
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        neg(self)
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        neg(&self)
    }
}
