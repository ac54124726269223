//! The expression tree.
//!
//! An [`Entity`] is an immutable, reference-counted node of a mathematical expression. Every
//! entity caches its structural hash and its size when it is created, so comparing, hashing and
//! sharing entities is cheap: cloning an entity only bumps a reference count, and two entities
//! that are structurally different are almost always told apart by their hashes alone.
//!
//! # Canonical form
//!
//! The constructors are the only way to build an entity, and they maintain a few invariants that
//! the rest of the crate relies on:
//!
//! - [`Node::Sum`] and [`Node::Product`] are **flattened**: `x + (y + z)` is a single sum with
//!   three terms.
//! - The children of sums and products are kept **sorted** by [`canonical_cmp`]: numbers first
//!   (by value), then variables (by name), then everything else (by node kind, then by hash). Two
//!   sums with the same terms in any order are therefore structurally equal, and rules can look
//!   for a numeric coefficient at the first position of a product.
//! - Sums and products with zero or one child are **downgraded** to `0`, `1` or the single child.
//! - The elements of a [`Node::FiniteSet`] are sorted and free of structural duplicates.
//!
//! The constructors never evaluate anything: `2 + 3` stays a sum of two numbers until it is
//! simplified.
//!
//! # Strict equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Entity`] implement **strict**, structural
//! equality, not semantic equality. `x^2 + 2x + 1` and `(x + 1)^2` are semantically equal but not
//! strictly equal. Strict equality never reports false positives, and it is the only equality
//! used for pattern matching and fixpoint detection.

mod fmt;
mod iter;
mod ops;

use crate::consts::{E_NAME, PI_NAME};
use crate::numeric::Number;
use once_cell::sync::Lazy;
use std::{
    cmp::Ordering,
    collections::{hash_map::DefaultHasher, BTreeSet},
    hash::{Hash, Hasher},
    sync::Arc,
};

pub use iter::Nodes;

/// A named function with a fixed argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cotan,
    Sec,
    Cosec,
    Arcsin,
    Arccos,
    Arctan,
    Arccotan,

    /// `log(base, x)`.
    Log,
    Abs,
    Signum,
    Factorial,

    /// Euler's totient.
    Phi,

    /// `derivative(expr, var, order)`.
    Derivative,

    /// `integral(expr, var, order)`.
    Integral,

    /// `limit(expr, var, destination)`.
    Limit,
}

impl Func {
    /// The number of arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Log => 2,
            Self::Derivative | Self::Integral | Self::Limit => 3,
            _ => 1,
        }
    }

    /// The name of the function.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cotan => "cotan",
            Self::Sec => "sec",
            Self::Cosec => "cosec",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Arccotan => "arccotan",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Signum => "signum",
            Self::Factorial => "factorial",
            Self::Phi => "phi",
            Self::Derivative => "derivative",
            Self::Integral => "integral",
            Self::Limit => "limit",
        }
    }
}

/// A logical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogicOp {
    Not,
    And,
    Or,
    Xor,
    Implies,
}

impl LogicOp {
    /// The number of operands the operator takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompareOp {
    Equal,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CompareOp {
    /// The operator with its operands swapped, such that `a op b` is `b op.flip() a`.
    pub fn flip(&self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::Less => Self::Greater,
            Self::LessEq => Self::GreaterEq,
            Self::Greater => Self::Less,
            Self::GreaterEq => Self::LessEq,
        }
    }

    /// Returns `true` if `ordering` satisfies the operator.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::Less => ordering.is_lt(),
            Self::LessEq => ordering.is_le(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterEq => ordering.is_ge(),
        }
    }
}

/// A set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetOp {
    Union,
    Intersection,
    SetMinus,
}

/// One of the special number domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Booleans,
    Integers,
    Rationals,
    Reals,
    Complexes,
}

/// The payload of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A number, such as `2`, `1/3` or `2 + 3i`.
    Number(Number),

    /// A variable, such as `x`. The names `pi` and `e` stand for the constants.
    Variable(String),

    /// `true` or `false`.
    Boolean(bool),

    /// Multiple terms added together.
    Sum(Vec<Entity>),

    /// Multiple factors multiplied together.
    Product(Vec<Entity>),

    /// A base raised to an exponent.
    Power(Entity, Entity),

    /// A numerator divided by a denominator.
    Divide(Entity, Entity),

    /// A function applied to its arguments.
    Function(Func, Vec<Entity>),

    /// A logical operator applied to its operands.
    Logic(LogicOp, Vec<Entity>),

    /// A comparison between two expressions.
    Compare(CompareOp, Entity, Entity),

    /// A finite set of elements.
    FiniteSet(Vec<Entity>),

    /// An interval of reals between two bounds.
    Interval {
        left: Entity,
        left_closed: bool,
        right: Entity,
        right_closed: bool,
    },

    /// The set of values of a variable for which a predicate holds.
    ConditionalSet(String, Entity),

    /// One of the special domains.
    Domain(Domain),

    /// A set operator applied to two sets.
    SetOp(SetOp, Entity, Entity),

    /// Membership of an element in a set.
    In(Entity, Entity),

    /// An expression that is only defined when a condition holds, and NaN otherwise.
    Provided(Entity, Entity),

    /// A list of `(expression, condition)` cases. The value is the expression of the first case
    /// whose condition holds.
    Piecewise(Vec<(Entity, Entity)>),

    /// An anonymous function of one variable.
    Lambda(String, Entity),

    /// A function applied to an argument.
    Application(Entity, Entity),
}

impl Node {
    /// The position of the node kind in the canonical order of children.
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Variable(_) => 1,
            Self::Boolean(_) => 2,
            Self::Sum(_) => 3,
            Self::Product(_) => 4,
            Self::Power(..) => 5,
            Self::Divide(..) => 6,
            Self::Function(..) => 7,
            Self::Logic(..) => 8,
            Self::Compare(..) => 9,
            Self::FiniteSet(_) => 10,
            Self::Interval { .. } => 11,
            Self::ConditionalSet(..) => 12,
            Self::Domain(_) => 13,
            Self::SetOp(..) => 14,
            Self::In(..) => 15,
            Self::Provided(..) => 16,
            Self::Piecewise(_) => 17,
            Self::Lambda(..) => 18,
            Self::Application(..) => 19,
        }
    }
}

#[derive(Debug)]
struct Inner {
    node: Node,
    hash: u64,
    size: usize,
}

/// An immutable node of an expression tree.
///
/// For more information, see the [module-level documentation](self).
#[derive(Clone)]
pub struct Entity(Arc<Inner>);

/// Orders two entities in the canonical order of the children of commutative nodes.
pub fn canonical_cmp(a: &Entity, b: &Entity) -> Ordering {
    match (a.node(), b.node()) {
        (Node::Number(a), Node::Number(b)) => a.total_cmp(b),
        (Node::Variable(a), Node::Variable(b)) => a.cmp(b),
        (a_node, b_node) => a_node.rank().cmp(&b_node.rank())
            .then_with(|| a.0.hash.cmp(&b.0.hash)),
    }
}

pub static ZERO: Lazy<Entity> = Lazy::new(|| Entity::integer(0));

pub static ONE: Lazy<Entity> = Lazy::new(|| Entity::integer(1));

pub static MINUS_ONE: Lazy<Entity> = Lazy::new(|| Entity::integer(-1));

pub static TWO: Lazy<Entity> = Lazy::new(|| Entity::integer(2));

pub static ONE_HALF: Lazy<Entity> = Lazy::new(|| Entity::rational(1, 2));

pub static PI: Lazy<Entity> = Lazy::new(|| Entity::var(PI_NAME));

pub static E: Lazy<Entity> = Lazy::new(|| Entity::var(E_NAME));

pub static I: Lazy<Entity> = Lazy::new(|| Entity::number(Number::i()));

pub static NAN: Lazy<Entity> = Lazy::new(|| Entity::number(Number::nan()));

impl Entity {
    /// Wraps a node, computing its hash and size.
    fn new(node: Node) -> Self {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        let size = 1 + match &node {
            Node::Number(_) | Node::Variable(_) | Node::Boolean(_) | Node::Domain(_) => 0,
            _ => node_children(&node).iter().map(|child| child.size()).sum(),
        };
        Self(Arc::new(Inner { node, hash: hasher.finish(), size }))
    }

    /// The node of this entity.
    pub fn node(&self) -> &Node {
        &self.0.node
    }

    /// The number of nodes in the tree rooted at this entity.
    pub fn size(&self) -> usize {
        self.0.size
    }

    /// The direct children of this entity, in order.
    pub fn children(&self) -> Vec<&Entity> {
        node_children(self.node())
    }

    /// Rebuilds this entity with every direct child replaced by `f(child)`. The constructors are
    /// applied again, so a rebuilt sum is flattened and sorted.
    ///
    /// Returns a clone of `self` if no child changed.
    pub fn map_children(&self, mut f: impl FnMut(&Entity) -> Entity) -> Entity {
        let map_all = |children: &[Entity], f: &mut dyn FnMut(&Entity) -> Entity| {
            children.iter().map(|child| f(child)).collect::<Vec<_>>()
        };

        let rebuilt = match self.node() {
            Node::Number(_) | Node::Variable(_) | Node::Boolean(_) | Node::Domain(_) => {
                return self.clone();
            },
            Node::Sum(terms) => Self::sum(map_all(terms, &mut f)),
            Node::Product(factors) => Self::product(map_all(factors, &mut f)),
            Node::Power(base, exp) => Self::pow(f(base), f(exp)),
            Node::Divide(num, den) => Self::div(f(num), f(den)),
            Node::Function(func, args) => Self::func(*func, map_all(args, &mut f)),
            Node::Logic(op, args) => Self::logic(*op, map_all(args, &mut f)),
            Node::Compare(op, lhs, rhs) => Self::compare(*op, f(lhs), f(rhs)),
            Node::FiniteSet(elements) => Self::finite_set(map_all(elements, &mut f)),
            Node::Interval { left, left_closed, right, right_closed } => {
                Self::interval(f(left), *left_closed, f(right), *right_closed)
            },
            Node::ConditionalSet(var, predicate) => Self::conditional_set(var, f(predicate)),
            Node::SetOp(op, a, b) => Self::set_op(*op, f(a), f(b)),
            Node::In(element, set) => Self::in_set(f(element), f(set)),
            Node::Provided(expr, cond) => Self::provided(f(expr), f(cond)),
            Node::Piecewise(cases) => Self::piecewise(
                cases.iter().map(|(expr, cond)| (f(expr), f(cond))).collect(),
            ),
            Node::Lambda(var, body) => Self::lambda(var, f(body)),
            Node::Application(func, arg) => Self::apply(f(func), f(arg)),
        };

        if rebuilt == *self {
            self.clone()
        } else {
            rebuilt
        }
    }

    /// Creates a number, such as `Entity::number(Number::i())`.
    pub fn number(n: impl Into<Number>) -> Self {
        Self::new(Node::Number(n.into()))
    }

    /// Creates an integer.
    pub fn integer(n: i64) -> Self {
        Self::number(Number::integer(n))
    }

    /// Creates the rational `num / den`.
    pub fn rational(num: i64, den: i64) -> Self {
        Self::number(Number::rational(num, den))
    }

    /// Creates a variable.
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(Node::Variable(name.into()))
    }

    /// Creates `true` or `false`.
    pub fn boolean(value: bool) -> Self {
        Self::new(Node::Boolean(value))
    }

    /// Creates a sum of the given terms. Nested sums are flattened, the terms are sorted, and a
    /// sum of zero or one term is downgraded to `0` or the term itself.
    pub fn sum(terms: impl IntoIterator<Item = Entity>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            match term.node() {
                Node::Sum(inner) => flat.extend(inner.iter().cloned()),
                _ => flat.push(term),
            }
        }

        match flat.len() {
            0 => ZERO.clone(),
            1 => flat.remove(0),
            _ => {
                flat.sort_by(canonical_cmp);
                Self::new(Node::Sum(flat))
            },
        }
    }

    /// Creates a product of the given factors. Nested products are flattened, the factors are
    /// sorted, and a product of zero or one factor is downgraded to `1` or the factor itself.
    pub fn product(factors: impl IntoIterator<Item = Entity>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            match factor.node() {
                Node::Product(inner) => flat.extend(inner.iter().cloned()),
                _ => flat.push(factor),
            }
        }

        match flat.len() {
            0 => ONE.clone(),
            1 => flat.remove(0),
            _ => {
                flat.sort_by(canonical_cmp);
                Self::new(Node::Product(flat))
            },
        }
    }

    /// Creates `base ^ exp`.
    pub fn pow(base: Entity, exp: Entity) -> Self {
        Self::new(Node::Power(base, exp))
    }

    /// Creates `num / den`.
    pub fn div(num: Entity, den: Entity) -> Self {
        Self::new(Node::Divide(num, den))
    }

    /// Creates `sqrt(x)`, represented as `x ^ (1/2)`.
    pub fn sqrt(x: Entity) -> Self {
        Self::pow(x, ONE_HALF.clone())
    }

    /// Creates a function application.
    ///
    /// Panics if the number of arguments does not match the function's arity.
    pub fn func(func: Func, args: Vec<Entity>) -> Self {
        assert_eq!(args.len(), func.arity(), "{} takes {} argument(s)", func.name(), func.arity());
        Self::new(Node::Function(func, args))
    }

    /// Creates `log(base, x)`.
    pub fn log(base: Entity, x: Entity) -> Self {
        Self::func(Func::Log, vec![base, x])
    }

    /// Creates the natural logarithm `log(e, x)`.
    pub fn ln(x: Entity) -> Self {
        Self::log(E.clone(), x)
    }

    /// Creates `derivative(expr, var, order)`.
    pub fn derivative(expr: Entity, var: &str, order: i64) -> Self {
        Self::func(Func::Derivative, vec![expr, Self::var(var), Self::integer(order)])
    }

    /// Creates a logical operation.
    ///
    /// Panics if the number of operands does not match the operator's arity.
    pub fn logic(op: LogicOp, args: Vec<Entity>) -> Self {
        assert_eq!(args.len(), op.arity(), "{:?} takes {} operand(s)", op, op.arity());
        Self::new(Node::Logic(op, args))
    }

    /// Creates `not a`.
    pub fn not(a: Entity) -> Self {
        Self::logic(LogicOp::Not, vec![a])
    }

    /// Creates `a and b`.
    pub fn and(a: Entity, b: Entity) -> Self {
        Self::logic(LogicOp::And, vec![a, b])
    }

    /// Creates `a or b`.
    pub fn or(a: Entity, b: Entity) -> Self {
        Self::logic(LogicOp::Or, vec![a, b])
    }

    /// Creates a comparison.
    pub fn compare(op: CompareOp, lhs: Entity, rhs: Entity) -> Self {
        Self::new(Node::Compare(op, lhs, rhs))
    }

    /// Creates the equation `lhs = rhs`.
    pub fn equation(lhs: Entity, rhs: Entity) -> Self {
        Self::compare(CompareOp::Equal, lhs, rhs)
    }

    /// Creates a finite set. The elements are sorted and structural duplicates are removed.
    pub fn finite_set(elements: impl IntoIterator<Item = Entity>) -> Self {
        let mut elements = elements.into_iter().collect::<Vec<_>>();
        elements.sort_by(canonical_cmp);
        elements.dedup();
        Self::new(Node::FiniteSet(elements))
    }

    /// Creates the empty set.
    pub fn empty_set() -> Self {
        Self::finite_set(Vec::new())
    }

    /// Creates an interval.
    pub fn interval(left: Entity, left_closed: bool, right: Entity, right_closed: bool) -> Self {
        Self::new(Node::Interval { left, left_closed, right, right_closed })
    }

    /// Creates the set `{ var | predicate }`.
    pub fn conditional_set(var: &str, predicate: Entity) -> Self {
        Self::new(Node::ConditionalSet(var.to_string(), predicate))
    }

    /// Creates one of the special domains.
    pub fn domain(domain: Domain) -> Self {
        Self::new(Node::Domain(domain))
    }

    /// Applies a set operator.
    pub fn set_op(op: SetOp, a: Entity, b: Entity) -> Self {
        Self::new(Node::SetOp(op, a, b))
    }

    /// Creates `element in set`.
    pub fn in_set(element: Entity, set: Entity) -> Self {
        Self::new(Node::In(element, set))
    }

    /// Creates `expr provided cond`.
    pub fn provided(expr: Entity, cond: Entity) -> Self {
        Self::new(Node::Provided(expr, cond))
    }

    /// Creates a piecewise expression from `(expression, condition)` cases.
    pub fn piecewise(cases: Vec<(Entity, Entity)>) -> Self {
        Self::new(Node::Piecewise(cases))
    }

    /// Creates the function `var -> body`.
    pub fn lambda(var: &str, body: Entity) -> Self {
        Self::new(Node::Lambda(var.to_string(), body))
    }

    /// Applies a function to an argument.
    pub fn apply(func: Entity, arg: Entity) -> Self {
        Self::new(Node::Application(func, arg))
    }

    /// Returns the number held by this entity, if it is a number.
    pub fn as_number(&self) -> Option<&Number> {
        match self.node() {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the name of this variable, if it is a variable.
    pub fn as_variable(&self) -> Option<&str> {
        match self.node() {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the value of this boolean, if it is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self.node() {
            Node::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` if this entity is a number.
    pub fn is_number(&self) -> bool {
        matches!(self.node(), Node::Number(_))
    }

    /// Returns `true` if this entity is exactly the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_exact() && n.is_zero())
    }

    /// Returns `true` if this entity is exactly the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_exact() && n.is_one())
    }

    /// Returns an iterator over every node of the tree, in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// Returns `true` if the variable occurs anywhere in the tree.
    pub fn contains_variable(&self, name: &str) -> bool {
        self.nodes().any(|node| node.as_variable() == Some(name))
    }

    /// Returns `true` if `target` occurs anywhere in the tree.
    pub fn contains(&self, target: &Entity) -> bool {
        self.size() >= target.size() && self.nodes().any(|node| node == target)
    }

    /// The names of the variables in the tree, excluding the constants `pi` and `e`.
    pub fn variables(&self) -> BTreeSet<String> {
        self.nodes()
            .filter_map(Entity::as_variable)
            .filter(|name| !is_constant_name(name))
            .map(str::to_string)
            .collect()
    }

    /// Returns a variable named `{prefix}_{k}`, for the smallest `k >= 1` such that the variable
    /// does not occur in `self`.
    pub fn fresh_variable(&self, prefix: &str) -> Entity {
        let used = self.nodes()
            .filter_map(Entity::as_variable)
            .collect::<BTreeSet<_>>();
        let name = (1..)
            .map(|k| format!("{}_{}", prefix, k))
            .find(|name| !used.contains(name.as_str()))
            .unwrap_or_else(|| unreachable!("the range of suffixes is unbounded"));
        Entity::var(name)
    }

    /// Replaces every free occurrence of the variable `name` with `value`. Occurrences bound by a
    /// [`Node::Lambda`] or [`Node::ConditionalSet`] over the same name are left alone.
    pub fn substitute(&self, name: &str, value: &Entity) -> Entity {
        if !self.contains_variable(name) {
            return self.clone();
        }

        match self.node() {
            Node::Variable(var) if var == name => value.clone(),
            Node::Lambda(var, _) | Node::ConditionalSet(var, _) if var == name => self.clone(),
            _ => self.map_children(|child| child.substitute(name, value)),
        }
    }

    /// Replaces every occurrence of the subtree `target` with `value`.
    pub fn replace(&self, target: &Entity, value: &Entity) -> Entity {
        if self == target {
            value.clone()
        } else if self.size() <= target.size() {
            self.clone()
        } else {
            self.map_children(|child| child.replace(target, value))
        }
    }
}

/// Returns `true` if the name stands for a mathematical constant.
pub fn is_constant_name(name: &str) -> bool {
    name == PI_NAME || name == E_NAME
}

/// The direct children of a node, in order.
fn node_children(node: &Node) -> Vec<&Entity> {
    match node {
        Node::Number(_) | Node::Variable(_) | Node::Boolean(_) | Node::Domain(_) => Vec::new(),
        Node::Sum(children)
            | Node::Product(children)
            | Node::Function(_, children)
            | Node::Logic(_, children)
            | Node::FiniteSet(children) => children.iter().collect(),
        Node::Power(a, b)
            | Node::Divide(a, b)
            | Node::Compare(_, a, b)
            | Node::SetOp(_, a, b)
            | Node::In(a, b)
            | Node::Provided(a, b)
            | Node::Application(a, b) => vec![a, b],
        Node::Interval { left, right, .. } => vec![left, right],
        Node::ConditionalSet(_, child) | Node::Lambda(_, child) => vec![child],
        Node::Piecewise(cases) => cases.iter().flat_map(|(expr, cond)| [expr, cond]).collect(),
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.hash == other.0.hash
                && self.0.size == other.0.size
                && self.0.node == other.0.node)
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self)
    }
}

impl From<Number> for Entity {
    fn from(n: Number) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Entity {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<&str> for Entity {
    fn from(name: &str) -> Self {
        Self::var(name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Entity {
        Entity::var("x")
    }

    fn y() -> Entity {
        Entity::var("y")
    }

    #[test]
    fn strict_equality() {
        // terms in any order are sorted into the same tree
        let a = Entity::sum([x(), y(), Entity::integer(2)]);
        let b = Entity::sum([Entity::integer(2), y(), x()]);
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_is_not_semantic() {
        let a = Entity::pow(Entity::sum([x(), Entity::integer(1)]), Entity::integer(2));
        let b = Entity::sum([
            Entity::pow(x(), Entity::integer(2)),
            Entity::product([Entity::integer(2), x()]),
            Entity::integer(1),
        ]);
        assert_ne!(a, b);
    }

    #[test]
    fn flatten_and_downgrade() {
        let nested = Entity::sum([x(), Entity::sum([y(), Entity::integer(1)])]);
        let Node::Sum(terms) = nested.node() else {
            panic!("expected a sum");
        };
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0], Entity::integer(1));

        assert_eq!(Entity::sum([]), Entity::integer(0));
        assert_eq!(Entity::product([]), Entity::integer(1));
        assert_eq!(Entity::product([x()]), x());
    }

    #[test]
    fn numbers_sort_first() {
        let product = Entity::product([Entity::sin(x()), y(), Entity::rational(1, 2)]);
        assert_eq!(product.children()[0], &Entity::rational(1, 2));
        assert_eq!(product.children()[1], &y());
    }

    #[test]
    fn finite_sets_are_deduplicated() {
        let set = Entity::finite_set([x(), Entity::integer(1), x()]);
        assert_eq!(set, Entity::finite_set([Entity::integer(1), x()]));
        assert_eq!(set.children().len(), 2);
    }

    #[test]
    fn size_and_variables() {
        let expr = Entity::sum([Entity::product([Entity::integer(2), x()]), Entity::sin(PI.clone())]);
        assert_eq!(expr.size(), 6);
        assert_eq!(expr.variables(), BTreeSet::from(["x".to_string()]));
        assert!(expr.contains_variable("pi"));
    }

    #[test]
    fn fresh_variables() {
        let expr = Entity::sum([Entity::var("n_1"), x()]);
        assert_eq!(expr.fresh_variable("n"), Entity::var("n_2"));
        assert_eq!(x().fresh_variable("n"), Entity::var("n_1"));
    }

    #[test]
    fn substitution() {
        let expr = Entity::sum([x(), Entity::lambda("x", x())]);
        let substituted = expr.substitute("x", &Entity::integer(3));
        assert_eq!(substituted, Entity::sum([Entity::integer(3), Entity::lambda("x", x())]));

        let replaced = Entity::pow(Entity::sin(x()), Entity::integer(2))
            .replace(&Entity::sin(x()), &y());
        assert_eq!(replaced, Entity::pow(y(), Entity::integer(2)));
    }

    #[test]
    #[should_panic(expected = "log takes 2 argument(s)")]
    fn arity_is_checked() {
        Entity::func(Func::Log, vec![x()]);
    }
}
