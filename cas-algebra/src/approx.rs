//! Rational approximation of real numbers.

use rug::{Float, Integer, Rational};

/// Computes the [`Rational`] from the continued fraction form of a float.
fn rational_from_continued_fraction(continued_fraction_form: &[Integer]) -> Rational {
    let mut terms = continued_fraction_form.iter().rev();
    let mut rational = Rational::from(terms.next().cloned().unwrap_or_default());
    for term in terms {
        // every term after the integer part has magnitude of at least 1
        rational = rational.recip() + term;
    }
    rational
}

/// Approximates the given float as a rational fraction.
///
/// This function applies the continued fraction algorithm to the given float, computing at most
/// `max_terms` terms. The expansion of a rational number terminates, so the search succeeds once
/// the fractional remainder left after a term is below `tolerance`. It returns [`None`] if no
/// remainder within the bound is that small (or `n` is not finite).
///
/// A convergent being close to `n` is not enough: every irrational number has convergents within
/// any tolerance, and accepting them would turn `sin(2)` into a fraction.
///
/// We don't use [`Float::to_rational`] because it produces the exact binary value of the float,
/// which is rarely the fraction the float was meant to represent. The continued fraction
/// algorithm finds the simplest nearby fraction instead.
///
/// See
/// [Wikipedia](https://en.wikipedia.org/wiki/Continued_fraction#Calculating_continued_fraction_representations)
/// for more information.
pub fn approximate_rational(n: &Float, max_terms: u32, tolerance: f64) -> Option<Rational> {
    if !n.is_finite() {
        return None;
    }

    let prec = n.prec();
    let mut continued_fraction_form = Vec::new();
    let mut n = n.clone();
    for _ in 0..max_terms {
        let (integer, fractional) = n.trunc_fract(Float::new(prec));
        continued_fraction_form.push(integer.to_integer()?);

        // the expansion stops when nothing but rounding error is left
        if fractional.is_zero() || Float::with_val(prec, fractional.abs_ref()) < tolerance {
            return Some(rational_from_continued_fraction(&continued_fraction_form));
        }

        n = fractional.recip();
    }

    None
}

#[cfg(test)]
mod tests {
    use crate::primitive::float;
    use super::*;

    #[test]
    fn recovers_simple_fractions() {
        let third = float(1) / float(3);
        assert_eq!(approximate_rational(&third, 15, 1e-16), Some(Rational::from((1, 3))));

        let value = float(-22) / float(7);
        assert_eq!(approximate_rational(&value, 15, 1e-16), Some(Rational::from((-22, 7))));

        assert_eq!(approximate_rational(&float(0.375), 15, 1e-16), Some(Rational::from((3, 8))));
    }

    #[test]
    fn irrational_needs_more_terms() {
        let root = float(2).sqrt();
        assert_eq!(approximate_rational(&root, 15, 1e-16), None);
        assert_eq!(approximate_rational(&root, 0, 1e-16), None);
    }

    #[test]
    fn close_convergents_of_irrationals() {
        // the 6th convergent of sin(2) is within 1e-16 of it, but sin(2) is not rational
        for value in [float(2).sin(), float(3).ln(), float(8).cos(), float(12).atan()] {
            assert_eq!(approximate_rational(&value, 15, 1e-16), None, "{}", value);
        }
    }

    #[test]
    fn non_finite() {
        assert_eq!(approximate_rational(&float(f64::INFINITY), 15, 1e-16), None);
    }
}
