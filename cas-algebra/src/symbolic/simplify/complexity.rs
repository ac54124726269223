//! The default complexity heuristic.

use crate::symbolic::expr::{Entity, Func, Node};

/// The default complexity heuristic function.
///
/// Complexity is a weighted count over every node of the tree:
///
/// | counted node                                            | weight |
/// | ------------------------------------------------------- | ------ |
/// | any node                                                | 2      |
/// | variable                                                | 2      |
/// | division                                                | 1      |
/// | rational `±1/n` that is not an integer                  | 2      |
/// | power with a negative real exponent                     | 8      |
/// | logarithm                                               | 0.5    |
/// | Euler's totient                                         | 12     |
/// | negative real number                                    | 4      |
/// | comparison with an exact `0` on the left                | 2      |
///
/// Lower is simpler. The weights make `x / 2` preferred over `1/2 * x`, `1 / x` preferred over
/// `x^(-1)`, and `x > 0` preferred over `0 < x`.
pub fn default_complexity(expr: &Entity) -> f64 {
    expr.nodes().map(node_complexity).sum()
}

/// The complexity contributed by a single node, ignoring its children.
fn node_complexity(expr: &Entity) -> f64 {
    let extra = match expr.node() {
        Node::Variable(_) => 2.0,
        Node::Divide(..) => 1.0,
        Node::Number(n) => {
            let unit_fraction = n.as_rational()
                .is_some_and(|r| !r.is_integer() && (*r.numer() == 1 || *r.numer() == -1));
            let negative = n.is_real() && n.is_negative();
            (if unit_fraction { 2.0 } else { 0.0 }) + (if negative { 4.0 } else { 0.0 })
        },
        Node::Power(_, exp) if exp.as_number().is_some_and(|n| n.is_real() && n.is_negative()) => 8.0,
        Node::Function(Func::Log, _) => 0.5,
        Node::Function(Func::Phi, _) => 12.0,
        Node::Compare(_, lhs, _) if lhs.is_zero() => 2.0,
        _ => 0.0,
    };
    2.0 + extra
}
