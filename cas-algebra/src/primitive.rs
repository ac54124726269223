//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.
//!
//! Floating-point values are created with the precision of the active
//! [`DecimalContext`](crate::settings::DecimalContext).

use crate::settings::DECIMAL_PRECISION_CONTEXT;
use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub fn precision() -> u32 {
    DECIMAL_PRECISION_CONTEXT.get().precision_bits()
}

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value, reduced to lowest terms.
///
/// Panics if the denominator is zero.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates an [`Integer`] from a [`Float`] by truncating the fractional part. Returns [`None`] for
/// NaN and infinities.
pub fn int_from_float(f: &Float) -> Option<Integer> {
    Float::with_val(f.prec(), f.trunc_ref()).to_integer()
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(precision(), n)
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(precision(), n)
}

#[cfg(test)]
mod tests {
    use crate::settings::{DecimalContext, DECIMAL_PRECISION_CONTEXT};
    use super::*;

    #[test]
    fn precision_follows_context() {
        assert_eq!(float(1).prec(), 333);
        let _guard = DECIMAL_PRECISION_CONTEXT.set(DecimalContext { digits: 20, ..Default::default() });
        assert_eq!(float(1).prec(), 67);
    }

    #[test]
    fn truncation() {
        assert_eq!(int_from_float(&float(-2.75)), Some(int(-2)));
        assert_eq!(int_from_float(&float(f64::NAN)), None);
        assert_eq!(rational((6, 4)), Rational::from((3, 2)));
    }
}
