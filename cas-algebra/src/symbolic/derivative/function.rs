//! Symbolic derivatives of the built-in functions.

use crate::symbolic::expr::{Entity, Func, ONE};

use super::derivative;
use super::nth_derivative;
use super::MultBuilder;
use super::SymbolicDerivativeError;

/// `1 / f`
fn reciprocal(f: Entity) -> Entity {
    Entity::div(ONE.clone(), f)
}

/// `f^2`
fn square(f: Entity) -> Entity {
    Entity::pow(f, Entity::integer(2))
}

/// `1 - x^2`
fn one_minus_square(x: &Entity) -> Entity {
    Entity::sum([ONE.clone(), Entity::product([Entity::integer(-1), square(x.clone())])])
}

/// `1 + x^2`
fn one_plus_square(x: &Entity) -> Entity {
    Entity::sum([ONE.clone(), square(x.clone())])
}

/// Computes the derivative of a supported function and performs the chain rule
pub(super) fn function_derivative(func: Func, args: &[Entity], with: &str) -> Result<Entity, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();

    let outer = match func {
        Func::Sin => Entity::cos(args[0].clone()),
        Func::Cos => Entity::product([Entity::integer(-1), Entity::sin(args[0].clone())]),
        Func::Tan => reciprocal(square(Entity::cos(args[0].clone()))),
        Func::Cotan => Entity::product([Entity::integer(-1), reciprocal(square(Entity::sin(args[0].clone())))]),
        Func::Sec => Entity::product([Entity::sec(args[0].clone()), Entity::tan(args[0].clone())]),
        Func::Cosec => Entity::product([
            Entity::integer(-1),
            Entity::cosec(args[0].clone()),
            Entity::cotan(args[0].clone()),
        ]),
        Func::Arcsin => reciprocal(Entity::sqrt(one_minus_square(&args[0]))),
        Func::Arccos => Entity::product([Entity::integer(-1), reciprocal(Entity::sqrt(one_minus_square(&args[0])))]),
        Func::Arctan => reciprocal(one_plus_square(&args[0])),
        Func::Arccotan => Entity::product([Entity::integer(-1), reciprocal(one_plus_square(&args[0]))]),
        Func::Abs => Entity::signum(args[0].clone()),
        Func::Signum => return Ok(Entity::integer(0)),
        Func::Log => {
            let (base, x) = (&args[0], &args[1]);
            if base.contains_variable(with) {
                // `log(b, x) = ln(x) / ln(b)`
                return derivative(&Entity::div(Entity::ln(x.clone()), Entity::ln(base.clone())), with);
            }
            // `log(b, x)' = x' / (x * ln(b))`
            mult_group.mult(derivative(x, with)?);
            mult_group.mult(reciprocal(Entity::product([x.clone(), Entity::ln(base.clone())])));
            return Ok(mult_group.into());
        },
        Func::Derivative => {
            // differentiate the inner derivative first, then once more
            let var = args[1].as_variable().ok_or(SymbolicDerivativeError::Unsupported)?;
            let order = args[2].as_number()
                .and_then(|n| n.to_i64())
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(SymbolicDerivativeError::Unsupported)?;
            return derivative(&nth_derivative(&args[0], var, order)?, with);
        },
        Func::Factorial | Func::Phi | Func::Integral | Func::Limit => {
            return Err(SymbolicDerivativeError::Unsupported);
        },
    };

    mult_group.mult(derivative(&args[0], with)?);
    mult_group.mult(outer);
    Ok(mult_group.into())
}
