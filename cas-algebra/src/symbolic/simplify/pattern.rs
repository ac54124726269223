//! Declarative matching of rewrite rules.
//!
//! A [`Rule`] pairs a pattern with a rewrite function. The pattern looks at one node: its kind
//! ([`Tag`]), optionally its direct children ([`Pat`]), and optionally an arbitrary predicate. The
//! rewrite function is only called on nodes that match the pattern, and is free to decline by
//! returning [`None`].

use crate::symbolic::expr::{Entity, Func, LogicOp, Node, SetOp};
use super::step::Step;

/// The kind of node a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Sum,
    Product,
    Power,
    Divide,
    Function(Func),
    Logic(LogicOp),
    Compare,
    FiniteSet,
    Interval,
    SetOp(SetOp),
    In,
    Provided,
    Piecewise,
    Application,

    /// Any node with at least one child.
    Any,
}

impl Tag {
    /// Returns `true` if the node is of this kind.
    pub fn matches(&self, node: &Node) -> bool {
        match (self, node) {
            (Self::Sum, Node::Sum(_))
                | (Self::Product, Node::Product(_))
                | (Self::Power, Node::Power(..))
                | (Self::Divide, Node::Divide(..))
                | (Self::Compare, Node::Compare(..))
                | (Self::FiniteSet, Node::FiniteSet(_))
                | (Self::Interval, Node::Interval { .. })
                | (Self::In, Node::In(..))
                | (Self::Provided, Node::Provided(..))
                | (Self::Piecewise, Node::Piecewise(_))
                | (Self::Application, Node::Application(..)) => true,
            (Self::Function(a), Node::Function(b, _)) => a == b,
            (Self::Logic(a), Node::Logic(b, _)) => a == b,
            (Self::SetOp(a), Node::SetOp(b, ..)) => a == b,
            (Self::Any, node) => !matches!(
                node,
                Node::Number(_) | Node::Variable(_) | Node::Boolean(_) | Node::Domain(_)
            ),
            _ => false,
        }
    }
}

/// A pattern for one child of the matched node.
#[derive(Debug, Clone)]
pub enum Pat {
    /// Matches anything.
    Any,

    /// Matches an entity strictly equal to the given one.
    Lit(Entity),

    /// Matches an entity strictly equal to the sibling at the given index.
    Same(usize),

    /// Matches any number.
    Num,
}

impl Pat {
    fn matches(&self, child: &Entity, siblings: &[&Entity]) -> bool {
        match self {
            Self::Any => true,
            Self::Lit(value) => child == value,
            Self::Same(index) => siblings.get(*index).is_some_and(|sibling| *sibling == child),
            Self::Num => child.is_number(),
        }
    }
}

/// A rewrite rule.
pub struct Rule {
    /// The name of the rule, used in logs.
    pub name: &'static str,

    /// The kind of node the rule applies to.
    pub tag: Tag,

    /// Patterns for the direct children. When present, the node must have exactly this many
    /// children.
    pub children: Option<Vec<Pat>>,

    /// An extra condition on the whole node.
    pub predicate: Option<fn(&Entity) -> bool>,

    /// Computes the replacement of a matching node.
    pub rewrite: fn(&Entity) -> Option<Entity>,

    /// The step recorded when the rule fires.
    pub step: Step,
}

impl Rule {
    /// Creates a rule matching every node of the given kind.
    pub fn new(name: &'static str, tag: Tag, step: Step, rewrite: fn(&Entity) -> Option<Entity>) -> Self {
        Self { name, tag, children: None, predicate: None, rewrite, step }
    }

    /// Restricts the rule to nodes whose children match the given patterns.
    pub fn children(mut self, children: Vec<Pat>) -> Self {
        self.children = Some(children);
        self
    }

    /// Restricts the rule to nodes satisfying the given predicate.
    pub fn when(mut self, predicate: fn(&Entity) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Returns `true` if the node matches the pattern of this rule.
    pub fn matches(&self, expr: &Entity) -> bool {
        if !self.tag.matches(expr.node()) {
            return false;
        }

        if let Some(patterns) = &self.children {
            let children = expr.children();
            if children.len() != patterns.len()
                || !patterns.iter().zip(&children).all(|(pat, child)| pat.matches(child, &children))
            {
                return false;
            }
        }

        self.predicate.map_or(true, |predicate| predicate(expr))
    }

    /// Applies the rule to the node. Returns [`None`] if the node does not match, or if the
    /// rewrite declined or left the node unchanged.
    pub fn apply(&self, expr: &Entity) -> Option<Entity> {
        if !self.matches(expr) {
            return None;
        }
        (self.rewrite)(expr).filter(|new| new != expr)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("step", &self.step)
            .finish()
    }
}
