//! Numeric and boolean evaluation of expressions.
//!
//! Evaluation walks the tree once and computes its value with the numeric tower, without
//! simplifying anything. The constants `pi` and `e` are resolved at the active precision; any
//! other free variable must be given a value through [`evaluate_with`].
//!
//! Arithmetic indeterminacies such as `0/0` evaluate to NaN rather than failing. Evaluation only
//! fails with [`CannotEvaluate`] when the expression has no value of the requested kind: a free
//! variable, a set, a number used as a truth value, and so on.

use crate::consts;
use crate::error::{CannotEvaluate, EvalKind};
use crate::numeric::Number;
use crate::symbolic::{
    expr::{CompareOp, Entity, Func, LogicOp, Node},
    simplify::rules::{conditional::evaluate_derivative, set::member},
};
use cas_error::Error;
use std::collections::HashMap;

/// Applies a function to numeric arguments.
///
/// Returns [`None`] for the operators that have no numeric value (derivatives, integrals and
/// limits), and for arguments outside the domain of the factorial and Euler's totient function.
pub(crate) fn apply_function(func: Func, args: &[Number]) -> Option<Number> {
    let x = args.first()?;
    Some(match func {
        Func::Sin => x.sin(),
        Func::Cos => x.cos(),
        Func::Tan => x.tan(),
        Func::Cotan => x.cotan(),
        Func::Sec => x.sec(),
        Func::Cosec => x.cosec(),
        Func::Arcsin => x.arcsin(),
        Func::Arccos => x.arccos(),
        Func::Arctan => x.arctan(),
        Func::Arccotan => x.arccotan(),
        Func::Log => args.get(1)?.log(x),
        Func::Abs => x.abs(),
        Func::Signum => x.signum(),
        Func::Factorial => x.factorial()?,
        Func::Phi => x.phi()?,
        Func::Derivative | Func::Integral | Func::Limit => return None,
    })
}

fn cannot_evaluate(kind: EvalKind, expr: &Entity) -> Error {
    Error::from(CannotEvaluate { kind, expr: expr.to_string() })
}

/// Evaluates an expression to a number.
pub fn evaluate(expr: &Entity) -> Result<Number, Error> {
    evaluate_with(expr, &HashMap::new())
}

/// Evaluates an expression to a number, with the given values for its free variables.
pub fn evaluate_with(expr: &Entity, vars: &HashMap<String, Number>) -> Result<Number, Error> {
    let eval = |e: &Entity| evaluate_with(e, vars);

    match expr.node() {
        Node::Number(n) => Ok(n.clone()),
        Node::Variable(name) => vars.get(name)
            .cloned()
            .or_else(|| consts::named(name).map(Number::real))
            .ok_or_else(|| cannot_evaluate(EvalKind::Number, expr)),
        Node::Sum(terms) => terms.iter().try_fold(Number::integer(0), |acc, term| -> Result<_, Error> {
            Ok(&acc + &eval(term)?)
        }),
        Node::Product(factors) => factors.iter().try_fold(Number::integer(1), |acc, factor| -> Result<_, Error> {
            Ok(&acc * &eval(factor)?)
        }),
        Node::Power(base, exp) => Ok(eval(base)?.pow(&eval(exp)?)),
        Node::Divide(num, den) => Ok(&eval(num)? / &eval(den)?),
        Node::Function(Func::Derivative, _) => match evaluate_derivative(expr) {
            Some(derivative) => eval(&derivative),
            None => Err(cannot_evaluate(EvalKind::Number, expr)),
        },
        Node::Function(Func::Integral | Func::Limit, _) => Err(cannot_evaluate(EvalKind::Number, expr)),
        Node::Function(func, args) => {
            let args = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            Ok(apply_function(*func, &args).unwrap_or_else(Number::nan))
        },
        Node::Provided(value, condition) => {
            if evaluate_bool_with(condition, vars)? {
                eval(value)
            } else {
                Ok(Number::nan())
            }
        },
        Node::Piecewise(cases) => {
            for (value, condition) in cases {
                if evaluate_bool_with(condition, vars)? {
                    return eval(value);
                }
            }
            Ok(Number::nan())
        },
        Node::Application(func, arg) => match func.node() {
            Node::Lambda(var, body) => {
                let mut scope = vars.clone();
                scope.insert(var.clone(), eval(arg)?);
                evaluate_with(body, &scope)
            },
            _ => Err(cannot_evaluate(EvalKind::Number, expr)),
        },
        _ => Err(cannot_evaluate(EvalKind::Number, expr)),
    }
}

/// Evaluates an expression to a truth value.
pub fn evaluate_bool(expr: &Entity) -> Result<bool, Error> {
    evaluate_bool_with(expr, &HashMap::new())
}

/// Evaluates an expression to a truth value, with the given values for its free variables.
pub fn evaluate_bool_with(expr: &Entity, vars: &HashMap<String, Number>) -> Result<bool, Error> {
    let eval = |e: &Entity| evaluate_bool_with(e, vars);

    match expr.node() {
        Node::Boolean(value) => Ok(*value),
        Node::Logic(op, args) => match op {
            LogicOp::Not => Ok(!eval(&args[0])?),
            LogicOp::And => Ok(eval(&args[0])? && eval(&args[1])?),
            LogicOp::Or => Ok(eval(&args[0])? || eval(&args[1])?),
            LogicOp::Xor => Ok(eval(&args[0])? != eval(&args[1])?),
            LogicOp::Implies => Ok(!eval(&args[0])? || eval(&args[1])?),
        },
        Node::Compare(op, lhs, rhs) => {
            let (a, b) = (evaluate_with(lhs, vars)?, evaluate_with(rhs, vars)?);
            Ok(match op {
                CompareOp::Equal => a.approx_eq(&b),
                _ => a.compare(&b).is_some_and(|ordering| op.holds(ordering)),
            })
        },
        Node::In(element, set) => {
            let element = match element.as_boolean() {
                Some(_) => element.clone(),
                None => Entity::number(evaluate_with(element, vars)?),
            };
            member(&element, set).ok_or_else(|| cannot_evaluate(EvalKind::Boolean, expr))
        },
        Node::Provided(value, condition) => Ok(eval(condition)? && eval(value)?),
        Node::Piecewise(cases) => {
            for (value, condition) in cases {
                if eval(condition)? {
                    return eval(value);
                }
            }
            Ok(false)
        },
        _ => Err(cannot_evaluate(EvalKind::Boolean, expr)),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::symbolic::expr::{Domain, PI};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn exact_arithmetic() {
        let expr = Entity::rational(1, 3) + Entity::rational(1, 6);
        assert_eq!(evaluate(&expr).unwrap(), Number::rational(1, 2));

        let power = Entity::pow(Entity::rational(2, 3), Entity::integer(2));
        assert_eq!(evaluate(&power).unwrap(), Number::rational(4, 9));
    }

    #[test]
    fn constants_and_variables() {
        let expr = Entity::sin(Entity::div(PI.clone(), Entity::integer(2)));
        assert_float_absolute_eq!(evaluate(&expr).unwrap().to_f64(), 1.0, 1e-12);

        let x = Entity::var("x");
        let vars = HashMap::from([("x".to_string(), Number::integer(3))]);
        assert_eq!(evaluate_with(&(&x * &x), &vars).unwrap(), Number::integer(9));

        let err = evaluate(&x).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CannotEvaluate>(),
            Some(&CannotEvaluate { kind: EvalKind::Number, expr: "x".to_string() }),
        );
    }

    #[test]
    fn indeterminate_forms_are_nan() {
        let expr = Entity::div(Entity::integer(0), Entity::integer(0));
        assert!(evaluate(&expr).unwrap().is_nan());

        let unmet = Entity::provided(Entity::integer(1), Entity::boolean(false));
        assert!(evaluate(&unmet).unwrap().is_nan());
    }

    #[test]
    fn truth_values() {
        let less = Entity::compare(CompareOp::Less, Entity::integer(1), Entity::integer(2));
        assert!(evaluate_bool(&less).unwrap());
        assert!(!evaluate_bool(&Entity::not(less.clone())).unwrap());

        let member = Entity::in_set(Entity::rational(1, 2), Entity::domain(Domain::Integers));
        assert!(!evaluate_bool(&member).unwrap());

        let err = evaluate_bool(&Entity::integer(1)).unwrap_err();
        assert!(err.is::<CannotEvaluate>());
        assert!(evaluate(&less).is_err());
    }

    #[test]
    fn lambdas() {
        let square = Entity::lambda("t", Entity::pow(Entity::var("t"), Entity::integer(2)));
        let expr = Entity::apply(square, Entity::integer(4));
        assert_eq!(evaluate(&expr).unwrap(), Number::integer(16));
    }
}
