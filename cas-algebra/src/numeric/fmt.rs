use std::fmt;
use super::Number;

/// Writes a real number. Non-finite values are written as `NaN`, `+oo` and `-oo`.
fn fmt_real(n: &Number, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match n {
        Number::Integer(n) => write!(f, "{}", n),
        Number::Rational(r) => write!(f, "{}", r),
        Number::Real(x) if x.is_nan() => write!(f, "NaN"),
        Number::Real(x) if x.is_infinite() => {
            write!(f, "{}oo", if x.is_sign_negative() { "-" } else { "+" })
        },
        Number::Real(x) => write!(f, "{}", x.to_f64()),
        Number::Complex(c) => write!(f, "{}", c.re),
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Complex(c) = self else {
            return fmt_real(self, f);
        };

        let (re, im) = (&c.re, &c.im);
        if !re.is_zero() {
            fmt_real(re, f)?;
            write!(f, " {} ", if im.is_negative() { "-" } else { "+" })?;
        } else if im.is_negative() {
            write!(f, "-")?;
        }

        let magnitude = im.abs();
        if magnitude.is_one() {
            write!(f, "i")
        } else if matches!(magnitude, Number::Rational(_)) {
            write!(f, "({})i", magnitude)
        } else {
            write!(f, "{}i", magnitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Number::integer(-12).to_string(), "-12");
        assert_eq!(Number::rational(3, 4).to_string(), "3/4");
        assert_eq!(Number::infinity().to_string(), "+oo");
        assert_eq!(Number::nan().to_string(), "NaN");
        assert_eq!(Number::i().to_string(), "i");
        assert_eq!(Number::complex(Number::integer(0), Number::integer(-1)).to_string(), "-i");
        assert_eq!(Number::complex(Number::integer(2), Number::integer(-3)).to_string(), "2 - 3i");
        assert_eq!(
            Number::complex(Number::rational(1, 2), Number::rational(1, 2)).to_string(),
            "1/2 + (1/2)i",
        );
    }
}
