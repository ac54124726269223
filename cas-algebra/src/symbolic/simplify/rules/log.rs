//! Simplification rules for logarithms.

use crate::symbolic::{
    expr::{Entity, Func, Node, ONE, ZERO},
    simplify::{pattern::{Pat, Rule, Tag}, step::Step},
};
use super::{do_call, do_power};

/// `log(a, a) = 1`
pub fn log_self(_: &Entity) -> Option<Entity> {
    Some(ONE.clone())
}

/// `log(a, 1) = 0`
pub fn log_one(_: &Entity) -> Option<Entity> {
    Some(ZERO.clone())
}

/// `log(a, a^x) = x`
pub fn log_power(expr: &Entity) -> Option<Entity> {
    do_call(expr, Func::Log, |args| match args[1].node() {
        Node::Power(base, exp) if *base == args[0] => Some(exp.clone()),
        _ => None,
    })
}

/// `a^log(a, x) = x`
pub fn power_log(expr: &Entity) -> Option<Entity> {
    do_power(expr, |base, exp| match exp.node() {
        Node::Function(Func::Log, args) if args[0] == *base => Some(args[1].clone()),
        _ => None,
    })
}

/// Returns the rules for logarithms.
pub fn rules() -> Vec<Rule> {
    let log = Tag::Function(Func::Log);
    vec![
        Rule::new("log_self", log, Step::LogSelf, log_self)
            .children(vec![Pat::Any, Pat::Same(0)]),
        Rule::new("log_one", log, Step::LogOne, log_one)
            .children(vec![Pat::Any, Pat::Lit(ONE.clone())]),
        Rule::new("log_power", log, Step::LogPower, log_power),
        Rule::new("power_log", Tag::Power, Step::PowerLog, power_log),
    ]
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::E;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn identities() {
        let x = Entity::var("x");
        let rules = rules();
        let apply = |expr: &Entity| rules.iter().find_map(|rule| rule.apply(expr));

        assert_eq!(apply(&Entity::ln(E.clone())), Some(ONE.clone()));
        assert_eq!(apply(&Entity::log(Entity::integer(10), ONE.clone())), Some(ZERO.clone()));
        assert_eq!(apply(&Entity::ln(Entity::pow(E.clone(), x.clone()))), Some(x.clone()));
        assert_eq!(apply(&Entity::pow(Entity::integer(2), Entity::log(Entity::integer(2), x.clone()))), Some(x.clone()));
        assert_eq!(apply(&Entity::ln(x)), None);
    }
}
