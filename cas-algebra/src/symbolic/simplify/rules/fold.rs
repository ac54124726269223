//! Numeric folding: sub-trees whose operands are all numbers are replaced by their value.

use crate::numeric::Number;
use crate::symbolic::{
    eval::apply_function,
    expr::{CompareOp, Entity, Func, Node},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};
use std::cmp::Ordering;
use super::{do_divide, do_power, do_product, do_sum};

/// Splits the leading numbers of a sorted sum or product from the rest. Returns [`None`] if there
/// are fewer than two numbers.
fn leading_numbers(children: &[Entity]) -> Option<(Vec<&Number>, &[Entity])> {
    let count = children.iter().take_while(|child| child.is_number()).count();
    if count < 2 {
        return None;
    }
    let numbers = children[..count].iter().filter_map(Entity::as_number).collect();
    Some((numbers, &children[count..]))
}

/// `2 + x + 3 = 5 + x`
pub fn fold_sum(expr: &Entity) -> Option<Entity> {
    do_sum(expr, |terms| {
        let (numbers, rest) = leading_numbers(terms)?;
        let total = numbers.into_iter().fold(Number::integer(0), |acc, n| &acc + n);
        Some(Entity::sum(std::iter::once(Entity::number(total)).chain(rest.iter().cloned())))
    })
}

/// `2 * x * 3 = 6x`
pub fn fold_product(expr: &Entity) -> Option<Entity> {
    do_product(expr, |factors| {
        let (numbers, rest) = leading_numbers(factors)?;
        let total = numbers.into_iter().fold(Number::integer(1), |acc, n| &acc * n);
        Some(Entity::product(std::iter::once(Entity::number(total)).chain(rest.iter().cloned())))
    })
}

/// `6 / 4 = 3/2`
pub fn fold_divide(expr: &Entity) -> Option<Entity> {
    do_divide(expr, |num, den| {
        Some(Entity::number(num.as_number()? / den.as_number()?))
    })
}

/// `2^10 = 1024`, `4^(1/2) = 2`; `2^(1/2)` stays as it is.
pub fn fold_power(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| {
        let (base, exp) = (base.as_number()?, exp.as_number()?);
        if base.is_exact() && exp.is_exact() {
            base.pow_exact(exp).map(Entity::number)
        } else {
            Some(Entity::number(base.pow(exp)))
        }
    })
}

/// Evaluates a function applied to numbers. With exact arguments, the result is only accepted if
/// it is exact too, so `sin(1)` stays symbolic but `abs(-3)` folds to `3`.
pub fn fold_function(expr: &Entity) -> Option<Entity> {
    let Node::Function(func, args) = expr.node() else {
        return None;
    };
    if matches!(func, Func::Derivative | Func::Integral | Func::Limit) {
        return None;
    }

    let numbers = args.iter().map(Entity::as_number).collect::<Option<Vec<_>>>()?;
    let numbers = numbers.into_iter().cloned().collect::<Vec<_>>();
    let result = apply_function(*func, &numbers)?;
    if numbers.iter().all(Number::is_exact) && !result.is_exact() {
        return None;
    }
    Some(Entity::number(result))
}

/// `1 < 2 = true`
pub fn fold_compare(expr: &Entity) -> Option<Entity> {
    let Node::Compare(op, lhs, rhs) = expr.node() else {
        return None;
    };
    let (lhs, rhs) = (lhs.as_number()?, rhs.as_number()?);
    let holds = match lhs.compare(rhs) {
        Some(ordering) => op.holds(ordering),
        None if *op == CompareOp::Equal => lhs.approx_eq(rhs),
        None => return None,
    };
    Some(Entity::boolean(holds))
}

/// Returns the numeric-folding rules.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("fold_sum", Tag::Sum, Step::FoldNumbers, fold_sum),
        Rule::new("fold_product", Tag::Product, Step::FoldNumbers, fold_product),
        Rule::new("fold_divide", Tag::Divide, Step::FoldNumbers, fold_divide)
            .children(vec![Pat::Num, Pat::Num]),
        Rule::new("fold_power", Tag::Power, Step::FoldNumbers, fold_power)
            .children(vec![Pat::Num, Pat::Num]),
        Rule::new("fold_function", Tag::Any, Step::FoldFunction, fold_function)
            .when(|e| matches!(e.node(), Node::Function(..))),
        Rule::new("fold_compare", Tag::Compare, Step::FoldComparison, fold_compare)
            .children(vec![Pat::Num, Pat::Num]),
    ]
}

/// Returns `true` if `a` and `b` are both real numbers and `a < b`.
pub(crate) fn real_less(a: &Number, b: &Number) -> bool {
    a.compare(b) == Some(Ordering::Less)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sums_and_products() {
        let x = Entity::var("x");
        let sum = Entity::sum([Entity::rational(1, 3), x.clone(), Entity::rational(1, 6)]);
        assert_eq!(fold_sum(&sum), Some(Entity::sum([Entity::rational(1, 2), x.clone()])));

        let product = Entity::product([Entity::integer(2), x.clone(), Entity::integer(3)]);
        assert_eq!(fold_product(&product), Some(Entity::product([Entity::integer(6), x.clone()])));
        assert_eq!(fold_sum(&Entity::sum([Entity::integer(1), x])), None);
    }

    #[test]
    fn exact_powers_only() {
        let exact = Entity::pow(Entity::integer(4), Entity::rational(1, 2));
        assert_eq!(fold_power(&exact), Some(Entity::integer(2)));
        assert_eq!(fold_power(&Entity::sqrt(Entity::integer(2))), None);
    }

    #[test]
    fn functions() {
        assert_eq!(fold_function(&Entity::abs(Entity::integer(-3))), Some(Entity::integer(3)));
        assert_eq!(fold_function(&Entity::sin(Entity::integer(0))), Some(Entity::integer(0)));
        assert_eq!(fold_function(&Entity::sin(Entity::integer(1))), None);
        assert_eq!(
            fold_function(&Entity::func(Func::Log, vec![Entity::integer(2), Entity::integer(8)])),
            Some(Entity::integer(3)),
        );
        assert_eq!(fold_function(&Entity::factorial(Entity::integer(4))), Some(Entity::integer(24)));
    }

    #[test]
    fn comparisons() {
        let less = Entity::compare(CompareOp::Less, Entity::integer(1), Entity::integer(2));
        assert_eq!(fold_compare(&less), Some(Entity::boolean(true)));
        let equal = Entity::equation(Entity::rational(1, 2), Entity::integer(1));
        assert_eq!(fold_compare(&equal), Some(Entity::boolean(false)));
        assert!(real_less(&Number::integer(1), &Number::integer(2)));
    }
}
