//! Elementary and special functions over the numeric tower.
//!
//! Each function computes in the reals when the argument is real and the function is real-valued
//! there, and switches to the complex plane otherwise. Results are downcast like any other
//! number, so `sin(0)` is the integer `0`, while `sin(2)` stays a real: only a value whose continued
//! fraction ends within rounding error becomes a rational.

use crate::consts;
use crate::primitive::int;
use rug::{Complex, Float, Integer};
use std::collections::HashMap;
use super::Number;

/// Largest argument of [`Number::factorial`] that is computed as an exact integer.
const MAX_EXACT_FACTORIAL: u32 = 1000;

/// Returns the prime factorization of the given integer. A negative input contributes the factor
/// `-1`.
pub fn prime_factorization(mut n: Integer) -> HashMap<Integer, usize> {
    let mut factors = HashMap::new();
    if n < 0 {
        factors.insert(int(-1), 1);
        n = -n;
    }

    let mut i = Integer::from(2);
    while Integer::from(&i * &i) <= n {
        while n.is_divisible(&i) {
            *factors.entry(i.clone()).or_insert(0) += 1;
            n /= &i;
        }
        i += 1;
    }
    if n > 1 {
        *factors.entry(n).or_insert(0) += 1;
    }

    factors
}

/// Builds a function that is computed with `$real` for arguments satisfying `$domain`, and with
/// `$complex` everywhere else.
macro_rules! real_or_complex {
    ($($(#[$meta:meta])* $name:ident: |$x:ident| $domain:expr, $real:expr, $complex:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Number {
                if self.is_real() {
                    let $x = self.to_float();
                    if $domain {
                        #[allow(clippy::redundant_closure_call)]
                        return Number::real(($real)($x));
                    }
                }
                #[allow(clippy::redundant_closure_call)]
                Number::from_rug_complex(($complex)(self.to_rug_complex()))
            }
        )*
    };
}

impl Number {
    real_or_complex! {
        /// The sine, in radians.
        sin: |x| true, |x: Float| x.sin(), |z: Complex| z.sin();

        /// The cosine, in radians.
        cos: |x| true, |x: Float| x.cos(), |z: Complex| z.cos();

        /// The tangent, in radians.
        tan: |x| true, |x: Float| x.tan(), |z: Complex| z.tan();

        /// The inverse sine, in radians.
        arcsin: |x| x.clone().abs() <= 1, |x: Float| x.asin(), |z: Complex| z.asin();

        /// The inverse cosine, in radians.
        arccos: |x| x.clone().abs() <= 1, |x: Float| x.acos(), |z: Complex| z.acos();

        /// The inverse tangent, in radians.
        arctan: |x| true, |x: Float| x.atan(), |z: Complex| z.atan();

        /// The natural exponential.
        exp: |x| true, |x: Float| x.exp(), |z: Complex| z.exp();

        /// The natural logarithm. The logarithm of a negative real is complex.
        ln: |x| !x.is_sign_negative() || x.is_zero(), |x: Float| x.ln(), |z: Complex| z.ln();
    }

    /// The cotangent, `1 / tan(x)`.
    pub fn cotan(&self) -> Number {
        &Number::integer(1) / &self.tan()
    }

    /// The secant, `1 / cos(x)`.
    pub fn sec(&self) -> Number {
        &Number::integer(1) / &self.cos()
    }

    /// The cosecant, `1 / sin(x)`.
    pub fn cosec(&self) -> Number {
        &Number::integer(1) / &self.sin()
    }

    /// The inverse cotangent, `arctan(1 / x)`, with `arccotan(0) = π/2`.
    pub fn arccotan(&self) -> Number {
        if self.is_zero() {
            return Number::real(consts::pi() / 2u32);
        }
        (&Number::integer(1) / self).arctan()
    }

    /// The logarithm of `self` in the given base.
    pub fn log(&self, base: &Number) -> Number {
        &self.ln() / &base.ln()
    }

    /// The square root.
    pub fn sqrt(&self) -> Number {
        self.pow(&Number::rational(1, 2))
    }

    /// The sign of a real number (`-1`, `0` or `1`), or `z / |z|` for a complex number.
    pub fn signum(&self) -> Number {
        if self.is_nan() {
            return Number::nan();
        }
        if self.is_real() {
            return Number::integer(match () {
                _ if self.is_positive() => 1,
                _ if self.is_negative() => -1,
                _ => 0,
            });
        }
        self / &self.abs()
    }

    /// The factorial. Non-negative integers give an exact integer; other reals use
    /// `Γ(x + 1)`, with poles at negative integers giving NaN.
    ///
    /// Returns [`None`] for complex arguments and for integers too large to compute exactly.
    pub fn factorial(&self) -> Option<Number> {
        match self {
            Number::Integer(n) if *n >= 0 => {
                let n = n.to_u32().filter(|n| *n <= MAX_EXACT_FACTORIAL)?;
                Some(Number::Integer(Integer::from(Integer::factorial(n))))
            },
            Number::Integer(_) => Some(Number::nan()),
            _ if self.is_real() => Some(Number::real((self.to_float() + 1u32).gamma())),
            _ => None,
        }
    }

    /// Euler's totient: the number of integers in `1..=n` coprime to `n`.
    ///
    /// Returns [`None`] unless `self` is a positive integer.
    pub fn phi(&self) -> Option<Number> {
        let n = self.as_integer().filter(|n| **n > 0)?;
        let mut result = n.clone();
        for prime in prime_factorization(n.clone()).into_keys() {
            result /= &prime;
            result *= Integer::from(&prime - 1);
        }
        Some(Number::Integer(result))
    }
}

/// Returns π at the active precision, as a number.
pub fn pi() -> Number {
    Number::Real(consts::pi())
}

/// Returns e at the active precision, as a number.
pub fn e() -> Number {
    Number::Real(consts::e())
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::numeric::NumberKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn factorization() {
        let factors = prime_factorization(int(-360));
        assert_eq!(factors.get(&int(-1)), Some(&1));
        assert_eq!(factors.get(&int(2)), Some(&3));
        assert_eq!(factors.get(&int(3)), Some(&2));
        assert_eq!(factors.get(&int(5)), Some(&1));
        assert_eq!(prime_factorization(int(97)).get(&int(97)), Some(&1));
    }

    #[test]
    fn trigonometry_snaps_to_exact() {
        assert_eq!(Number::integer(0).sin(), Number::integer(0));
        let third_pi = &pi() / &Number::integer(3);
        assert_eq!(third_pi.cos(), Number::rational(1, 2));
        assert_float_absolute_eq!(Number::integer(1).arctan().to_f64(), std::f64::consts::FRAC_PI_4, 1e-12);
    }

    #[test]
    fn complex_continuation() {
        let asin = Number::integer(2).arcsin();
        assert_eq!(asin.kind(), NumberKind::Complex);
        assert_float_absolute_eq!(asin.re().to_f64(), std::f64::consts::FRAC_PI_2, 1e-12);

        let ln = Number::integer(-1).ln();
        assert_eq!(ln.re(), Number::integer(0));
        assert_float_absolute_eq!(ln.im().to_f64(), std::f64::consts::PI, 1e-12);
    }

    #[test]
    fn logarithms() {
        assert_eq!(Number::integer(8).log(&Number::integer(2)), Number::integer(3));
        assert_eq!(Number::integer(0).ln(), Number::neg_infinity());
        assert_eq!(e().ln(), Number::integer(1));
    }

    #[test]
    fn special_functions() {
        assert_eq!(Number::integer(5).factorial(), Some(Number::integer(120)));
        assert!(Number::integer(-2).factorial().is_some_and(|n| n.is_nan()));
        assert_eq!(Number::rational(1, 2).factorial().map(|n| n.kind()), Some(NumberKind::Real));
        assert_eq!(Number::i().factorial(), None);

        assert_eq!(Number::integer(36).phi(), Some(Number::integer(12)));
        assert_eq!(Number::integer(13).phi(), Some(Number::integer(12)));
        assert_eq!(Number::integer(0).phi(), None);

        assert_eq!(Number::rational(-3, 4).signum(), Number::integer(-1));
        assert_eq!(Number::complex(Number::integer(0), Number::integer(5)).signum(), Number::i());
    }
}
