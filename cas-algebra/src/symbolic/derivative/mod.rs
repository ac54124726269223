//! Symbolic differentiation.
//!
//! The derivative is built directly from the differentiation rules, with only light cleanup of
//! the trivially zero and unit factors; run the result through [`simplify`] for a tidy form.
//!
//! [`simplify`]: crate::symbolic::simplify()

use crate::numeric::Number;
use crate::symbolic::expr::{Entity, Node, ONE, ZERO};

mod function;

/// Returns `true` if the given [`Entity`] is "clearly" zero. This is intended to clean up trees
/// and is not mathematically rigorous.
fn is_trivially_zero(e: &Entity) -> bool {
    match e.node() {
        Node::Number(n) => n.is_zero(),
        Node::Sum(terms) => terms.iter().all(is_trivially_zero),
        Node::Product(factors) => factors.iter().any(is_trivially_zero),
        Node::Power(base, exp) => is_trivially_zero(base) && !is_trivially_zero(exp),
        _ => false,
    }
}

/// Returns `true` if the given [`Entity`] is "clearly" one. This is intended to clean up trees
/// and is not mathematically rigorous.
fn is_trivially_unity(e: &Entity) -> bool {
    match e.node() {
        Node::Number(n) => n.is_one(),
        Node::Product(factors) => factors.iter().all(is_trivially_unity),
        Node::Power(base, exp) => is_trivially_zero(exp) || is_trivially_unity(base),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Entity>);

impl From<MultBuilder> for Entity {
    fn from(value: MultBuilder) -> Self {
        Entity::product(value.0)
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Entity) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![ZERO.clone()];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Entity>);

impl From<SumBuilder> for Entity {
    fn from(value: SumBuilder) -> Self {
        Entity::sum(value.0)
    }
}

impl SumBuilder {
    fn add(&mut self, e: Entity) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Entity], with: &str) -> Result<Entity, SymbolicDerivativeError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, with)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[Entity], with: &str) -> Result<Entity, SymbolicDerivativeError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        // constant factors contribute nothing
        if !product[derivative_index].contains_variable(with) {
            continue;
        }

        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, with)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// `(f / g)' = (f' * g - f * g') / g^2`
fn quotient_rule(num: &Entity, den: &Entity, with: &str) -> Result<Entity, SymbolicDerivativeError> {
    if !den.contains_variable(with) {
        return Ok(Entity::div(derivative(num, with)?, den.clone()));
    }

    let mut left = MultBuilder::default();
    left.mult(derivative(num, with)?);
    left.mult(den.clone());

    let mut right = MultBuilder::default();
    right.mult(Entity::integer(-1));
    right.mult(num.clone());
    right.mult(derivative(den, with)?);

    let mut numerator = SumBuilder::default();
    numerator.add(left.into());
    numerator.add(right.into());
    Ok(Entity::div(numerator.into(), Entity::pow(den.clone(), Entity::integer(2))))
}

/// `(f^g)'`, with the power rule when the exponent is constant and the exponential rule when the
/// base is constant.
fn power_rule(base: &Entity, exp: &Entity, with: &str) -> Result<Entity, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();

    if !exp.contains_variable(with) {
        // `(f^n)' = n * f^(n - 1) * f'`
        let lowered = match exp.as_number() {
            Some(n) => Entity::number(n - &Number::integer(1)),
            None => Entity::sum([exp.clone(), Entity::integer(-1)]),
        };
        mult_group.mult(exp.clone());
        mult_group.mult(Entity::pow(base.clone(), lowered));
        mult_group.mult(derivative(base, with)?);
    } else if !base.contains_variable(with) {
        // `(a^g)' = a^g * ln(a) * g'`
        mult_group.mult(Entity::pow(base.clone(), exp.clone()));
        mult_group.mult(Entity::ln(base.clone()));
        mult_group.mult(derivative(exp, with)?);
    } else {
        // `(f^g)' = f^g * (g' * ln(f) + g * f' / f)`
        let mut inner = SumBuilder::default();
        let mut log_term = MultBuilder::default();
        log_term.mult(derivative(exp, with)?);
        log_term.mult(Entity::ln(base.clone()));
        inner.add(log_term.into());

        let mut base_term = MultBuilder::default();
        base_term.mult(exp.clone());
        base_term.mult(derivative(base, with)?);
        inner.add(Entity::div(base_term.into(), base.clone()));

        mult_group.mult(Entity::pow(base.clone(), exp.clone()));
        mult_group.mult(inner.into());
    }

    Ok(mult_group.into())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicDerivativeError {
    /// The function may be differentiable, but we do not support symbolically computing it yet
    Unsupported,

    /// The provided sub-expression is not differentiable
    Undifferentiable(Entity),
}

/// Computes the derivative of the given expression with respect to the variable `with`. Returns
/// [`Err`] if the derivative could not be symbolically computed.
pub fn derivative(f: &Entity, with: &str) -> Result<Entity, SymbolicDerivativeError> {
    if !f.contains_variable(with) {
        return match f.node() {
            Node::Boolean(_)
                | Node::Logic(..)
                | Node::Compare(..)
                | Node::FiniteSet(_)
                | Node::Interval { .. }
                | Node::ConditionalSet(..)
                | Node::Domain(_)
                | Node::SetOp(..)
                | Node::In(..) => Err(SymbolicDerivativeError::Undifferentiable(f.clone())),
            _ => Ok(ZERO.clone()),
        };
    }

    let expr = match f.node() {
        Node::Variable(_) => Ok(ONE.clone()),
        Node::Function(func, args) => function::function_derivative(*func, args, with),
        Node::Sum(terms) => sum_rule(terms, with),
        Node::Product(factors) => product_rule(factors, with),
        Node::Divide(num, den) => quotient_rule(num, den, with),
        Node::Power(base, exp) => power_rule(base, exp, with),
        Node::Provided(value, condition) => Ok(Entity::provided(derivative(value, with)?, condition.clone())),
        Node::Piecewise(cases) => {
            let cases = cases.iter()
                .map(|(value, condition)| Ok((derivative(value, with)?, condition.clone())))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Entity::piecewise(cases))
        },
        Node::Application(func, arg) => match func.node() {
            Node::Lambda(var, body) => derivative(&body.substitute(var, arg), with),
            _ => Err(SymbolicDerivativeError::Unsupported),
        },
        _ => Err(SymbolicDerivativeError::Undifferentiable(f.clone())),
    }?;

    if is_trivially_zero(&expr) {
        Ok(ZERO.clone())
    } else {
        Ok(expr)
    }
}

/// Computes the `order`-th derivative of the given expression.
pub fn nth_derivative(f: &Entity, with: &str, order: usize) -> Result<Entity, SymbolicDerivativeError> {
    (0..order).try_fold(f.clone(), |f, _| derivative(&f, with))
}

#[cfg(test)]
pub mod tests {
    use crate::symbolic::eval::evaluate_with;
    use std::collections::HashMap;
    use super::*;

    /// Boilerplate helper function for evaluating an expression and substituting in "x"
    fn eval_x(e: &Entity, x: f64) -> f64 {
        let vars = HashMap::from([("x".to_string(), Number::from_f64(x))]);
        evaluate_with(e, &vars).unwrap().to_f64()
    }

    // Performs finite difference to approximate the derivative of the provided expression
    fn finite_difference(e: &Entity, x: f64) -> f64 {
        const DX: f64 = 0.00001;
        (eval_x(e, x + DX) - eval_x(e, x)) / DX
    }

    fn test_for_function(function: &Entity, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 0.001;

        let symbolic = derivative(function, "x")
            .unwrap_or_else(|err| panic!("derivative of `{function}` failed: {err:?}"));

        for point in points.into_iter() {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = finite_difference(function, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For \"{function}\" at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    fn x() -> Entity {
        Entity::var("x")
    }

    #[test]
    fn power_rule() {
        let f = Entity::sum([Entity::pow(x(), Entity::integer(2)), x(), Entity::integer(1)]);
        test_for_function(&f, [0., 1., 2., 5., 8.]);
    }

    #[test]
    fn quotients_and_exponentials() {
        let f = Entity::div(Entity::sin(x()), Entity::sum([x(), Entity::integer(2)]));
        test_for_function(&f, [0., 0.5, 1., 3.]);

        let g = Entity::pow(Entity::integer(2), Entity::product([Entity::integer(3), x()]));
        test_for_function(&g, [-1., 0., 1.]);

        let h = Entity::pow(x(), x());
        test_for_function(&h, [0.5, 1., 2.]);
    }

    #[test]
    fn functions() {
        test_for_function(&Entity::cos(Entity::pow(x(), Entity::integer(2))), [0., 0.5, 1.]);
        test_for_function(&Entity::tan(x()), [0., 0.3, 1.]);
        test_for_function(&Entity::arctan(x()), [-2., 0., 2.]);
        test_for_function(&Entity::arcsin(Entity::div(x(), Entity::integer(2))), [-1., 0., 1.]);
        test_for_function(&Entity::ln(Entity::sum([x(), Entity::integer(3)])), [0., 1., 4.]);
        test_for_function(&Entity::abs(x()), [-2., 1.]);
    }

    #[test]
    fn constants() {
        assert_eq!(derivative(&Entity::var("y"), "x"), Ok(ZERO.clone()));
        assert_eq!(derivative(&x(), "x"), Ok(ONE.clone()));
        assert_eq!(
            nth_derivative(&Entity::pow(x(), Entity::integer(3)), "x", 3).map(|d| eval_x(&d, 10.0)),
            Ok(6.0),
        );
        assert!(derivative(&Entity::boolean(true), "x").is_err());
    }
}
