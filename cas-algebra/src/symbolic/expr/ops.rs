//! Operator overloads and shorthand constructors for [`Entity`].
//!
//! No simplification is done by any of these: `x + x` is a sum of two terms.

use crate::numeric::Number;
use std::ops::{Add, Div, Mul, Neg, Sub};
use super::{Entity, Func, MINUS_ONE};

/// Builds a shorthand constructor for each single-argument function.
macro_rules! unary_functions {
    ($($name:ident => $func:ident),* $(,)?) => {
        impl Entity {
            $(
                #[doc = concat!("Creates `", stringify!($name), "(x)`.")]
                pub fn $name(x: Entity) -> Entity {
                    Entity::func(Func::$func, vec![x])
                }
            )*
        }
    };
}

unary_functions! {
    sin => Sin,
    cos => Cos,
    tan => Tan,
    cotan => Cotan,
    sec => Sec,
    cosec => Cosec,
    arcsin => Arcsin,
    arccos => Arccos,
    arctan => Arctan,
    arccotan => Arccotan,
    abs => Abs,
    signum => Signum,
    factorial => Factorial,
    phi => Phi,
}

/// Negates an entity. Numbers are negated directly; anything else is multiplied by `-1`.
fn negate(e: &Entity) -> Entity {
    match e.as_number() {
        Some(n) => Entity::number(-n),
        None => Entity::product([MINUS_ONE.clone(), e.clone()]),
    }
}

macro_rules! impl_binary {
    ($($trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr;)*) => {
        $(
            impl $trait<&Entity> for &Entity {
                type Output = Entity;

                fn $method(self, rhs: &Entity) -> Entity {
                    let ($a, $b) = (self, rhs);
                    $body
                }
            }

            impl $trait for Entity {
                type Output = Entity;

                fn $method(self, rhs: Entity) -> Entity {
                    let ($a, $b) = (&self, &rhs);
                    $body
                }
            }

            impl $trait<&Entity> for Entity {
                type Output = Entity;

                fn $method(self, rhs: &Entity) -> Entity {
                    let ($a, $b) = (&self, rhs);
                    $body
                }
            }
        )*
    };
}

impl_binary! {
    Add, add, |a, b| Entity::sum([a.clone(), b.clone()]);
    Sub, sub, |a, b| Entity::sum([a.clone(), negate(b)]);
    Mul, mul, |a, b| Entity::product([a.clone(), b.clone()]);
    Div, div, |a, b| Entity::div(a.clone(), b.clone());
}

impl Neg for &Entity {
    type Output = Entity;

    fn neg(self) -> Entity {
        negate(self)
    }
}

impl Neg for Entity {
    type Output = Entity;

    fn neg(self) -> Entity {
        negate(&self)
    }
}

impl Entity {
    /// Creates `self ^ exp`.
    pub fn pow_to(&self, exp: Entity) -> Entity {
        Entity::pow(self.clone(), exp)
    }

    /// Creates the imaginary number `n·i`.
    pub fn imaginary(n: i64) -> Entity {
        Entity::number(Number::complex(Number::integer(0), Number::integer(n)))
    }
}
