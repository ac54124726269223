//! Diagnostic text rendering of entities. The output is meant to be read by people; it is not
//! used by any algorithm in the crate.

use crate::numeric::Number;
use std::fmt::{self, Display, Formatter};
use super::{CompareOp, Domain, Entity, LogicOp, Node, SetOp};

/// The binding strength of the outermost operator of an entity. Children that bind more loosely
/// than their position requires are wrapped in parentheses.
fn precedence(e: &Entity) -> u8 {
    match e.node() {
        Node::Number(n) => match n {
            Number::Complex(_) => 1,
            Number::Rational(_) => 2,
            n if n.is_negative() => 1,
            _ => 4,
        },
        Node::Sum(_) => 1,
        Node::Product(_) | Node::Divide(..) => 2,
        Node::Power(..) | Node::Logic(LogicOp::Not, _) => 3,
        Node::Logic(..)
            | Node::Compare(..)
            | Node::SetOp(..)
            | Node::In(..)
            | Node::Provided(..)
            | Node::Lambda(..) => 0,
        _ => 4,
    }
}

/// Writes `e`, wrapped in parentheses if it binds more loosely than `min`.
fn write_child(f: &mut Formatter<'_>, e: &Entity, min: u8) -> fmt::Result {
    if precedence(e) < min {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

/// Writes the entities separated by `sep`, each with the given minimum precedence.
fn write_joined<'a>(
    f: &mut Formatter<'_>,
    items: impl IntoIterator<Item = &'a Entity>,
    sep: &str,
    min: u8,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write_child(f, item, min)?;
    }
    Ok(())
}

/// If the term carries a negative real coefficient, returns the term with the coefficient negated
/// so that it can be written after a minus sign.
fn negated_term(term: &Entity) -> Option<Entity> {
    match term.node() {
        Node::Number(n) if n.is_negative() => Some(Entity::number(-n)),
        Node::Product(factors) => {
            let coefficient = factors.first()?.as_number().filter(|n| n.is_negative())?;
            let positive = -coefficient;
            let rest = factors[1..].iter().cloned();
            if positive.is_one() {
                Some(Entity::product(rest))
            } else {
                Some(Entity::product(std::iter::once(Entity::number(positive)).chain(rest)))
            }
        },
        _ => None,
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equal => "=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Booleans => "BB",
            Self::Integers => "ZZ",
            Self::Rationals => "QQ",
            Self::Reals => "RR",
            Self::Complexes => "CC",
        };
        write!(f, "{}", name)
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Number(n) => write!(f, "{}", n),
            Node::Variable(name) => write!(f, "{}", name),
            Node::Boolean(value) => write!(f, "{}", value),
            Node::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match negated_term(term) {
                        Some(positive) if i > 0 => {
                            write!(f, " - ")?;
                            write_child(f, &positive, 2)?;
                        },
                        _ => {
                            if i > 0 {
                                write!(f, " + ")?;
                            }
                            write_child(f, term, 1)?;
                        },
                    }
                }
                Ok(())
            },
            Node::Product(factors) => {
                match factors.split_first() {
                    Some((first, rest)) if first.as_number().is_some_and(Number::is_minus_one) => {
                        write!(f, "-")?;
                        write_joined(f, rest, " * ", 3)
                    },
                    _ => write_joined(f, factors, " * ", 2),
                }
            },
            Node::Power(base, exp) => {
                write_child(f, base, 4)?;
                write!(f, "^")?;
                write_child(f, exp, 4)
            },
            Node::Divide(num, den) => {
                write_child(f, num, 2)?;
                write!(f, " / ")?;
                write_child(f, den, 3)
            },
            Node::Function(func, args) => {
                write!(f, "{}(", func.name())?;
                write_joined(f, args, ", ", 0)?;
                write!(f, ")")
            },
            Node::Logic(LogicOp::Not, args) => {
                write!(f, "not ")?;
                write_joined(f, args, "", 4)
            },
            Node::Logic(op, args) => {
                let sep = match op {
                    LogicOp::And => " and ",
                    LogicOp::Or => " or ",
                    LogicOp::Xor => " xor ",
                    _ => " implies ",
                };
                write_joined(f, args, sep, 1)
            },
            Node::Compare(op, lhs, rhs) => {
                write_child(f, lhs, 1)?;
                write!(f, " {} ", op)?;
                write_child(f, rhs, 1)
            },
            Node::FiniteSet(elements) => {
                write!(f, "{{")?;
                write_joined(f, elements, ", ", 0)?;
                write!(f, "}}")
            },
            Node::Interval { left, left_closed, right, right_closed } => {
                write!(
                    f,
                    "{}{}; {}{}",
                    if *left_closed { '[' } else { '(' },
                    left,
                    right,
                    if *right_closed { ']' } else { ')' },
                )
            },
            Node::ConditionalSet(var, predicate) => write!(f, "{{ {} | {} }}", var, predicate),
            Node::Domain(domain) => write!(f, "{}", domain),
            Node::SetOp(op, a, b) => {
                let sep = match op {
                    SetOp::Union => r" \/ ",
                    SetOp::Intersection => r" /\ ",
                    SetOp::SetMinus => r" \ ",
                };
                write_child(f, a, 1)?;
                write!(f, "{}", sep)?;
                write_child(f, b, 1)
            },
            Node::In(element, set) => {
                write_child(f, element, 1)?;
                write!(f, " in ")?;
                write_child(f, set, 1)
            },
            Node::Provided(expr, cond) => {
                write_child(f, expr, 1)?;
                write!(f, " provided ")?;
                write_child(f, cond, 1)
            },
            Node::Piecewise(cases) => {
                write!(f, "piecewise(")?;
                for (i, (expr, cond)) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "({}, {})", expr, cond)?;
                }
                write!(f, ")")
            },
            Node::Lambda(var, body) => write!(f, "{} -> {}", var, body),
            Node::Application(func, arg) => {
                write_child(f, func, 4)?;
                write!(f, "({})", arg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn fmt_arithmetic() {
        let x = Entity::var("x");
        let y = Entity::var("y");
        let expr = Entity::sum([
            Entity::pow(x.clone(), Entity::integer(2)),
            Entity::product([Entity::integer(-3), x.clone()]),
            Entity::integer(-1),
        ]);
        assert_eq!(expr.to_string(), "-1 - 3 * x + x^2");

        let expr = Entity::div(Entity::sum([x.clone(), y.clone()]), Entity::product([Entity::integer(2), y.clone()]));
        assert_eq!(expr.to_string(), "(x + y) / (2 * y)");

        assert_eq!(Entity::sqrt(x.clone()).to_string(), "x^(1/2)");
        assert_eq!((-&x).to_string(), "-x");
    }

    #[test]
    fn fmt_sets_and_logic() {
        let x = Entity::var("x");
        let set = Entity::finite_set([Entity::integer(2), Entity::integer(1)]);
        assert_eq!(set.to_string(), "{1, 2}");
        assert_eq!(
            Entity::interval(Entity::integer(0), true, Entity::integer(1), false).to_string(),
            "[0; 1)",
        );
        let cond = Entity::equation(x.clone(), Entity::integer(0));
        assert_eq!(Entity::provided(x.clone(), Entity::not(cond)).to_string(), "x provided not (x = 0)");
    }
}
