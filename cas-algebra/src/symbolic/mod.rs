//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions are trees of [`Entity`] nodes. Entities are immutable and cheap to clone, and sums
//! and products **flatten** their children: `x + (y + z)` is a single [`Node::Sum`] with _three_
//! children, `x`, `y` and `z`. Their children are also kept sorted, so `y + x` and `x + y` are the
//! same tree.
//!
//! This is done to make it easier to perform algebraic manipulations on the expression. A common
//! step in simplifying an expression is to combine "like terms", that is, to combine terms that
//! share the same factors (e.g. `x + x = 2x`). This is much easier to do when the terms in
//! question are all at the same level in the tree.
//!
//! ```
//! use cas_algebra::symbolic::expr::{Entity, Node};
//!
//! let (x, y, z) = (Entity::var("x"), Entity::var("y"), Entity::var("z"));
//! let expr = &x + (&y + &z);
//! assert!(matches!(expr.node(), Node::Sum(terms) if terms.len() == 3));
//! assert_eq!(expr, &z + &y + &x);
//! ```
//!
//! # Simplification
//!
//! A primary use case for algebraic manipulation is to reduce expressions to some canonical form.
//! This is done with the [`simplify()`] function, which accepts an expression and returns a
//! "simplified" version of it.
//!
//! The definition of "simplified" is, of course, somewhat subjective. We define an expression to
//! be simplified if it has the lowest _complexity_ among the forms the simplifier can reach, where
//! complexity is measured by the function in the
//! [`COMPLEXITY_CRITERIA`](crate::settings::COMPLEXITY_CRITERIA) setting. For example, `x + x` is
//! not simplified, because it can be reduced to one term `2x`, which has lower complexity.
//!
//! Simplification is done by applying a set of rewrite rules to the expression in multiple
//! passes. The current set of rules is defined in [`simplify::rules`], and covers things like
//! numeric folding, combining like terms and factors, power and root identities, exact
//! trigonometric values, logic, comparisons and sets.
//!
//! ```
//! use cas_algebra::symbolic::{expr::Entity, simplify};
//!
//! let x = Entity::var("x");
//! let simplified = simplify(&(&x + &x + &x)).unwrap();
//!
//! // `x + x + x = 3x`
//! assert_eq!(simplified, Entity::product([Entity::integer(3), x]));
//! ```
//!
//! For more information, see the [`mod@simplify`] module.
//!
//! [`Node::Sum`]: expr::Node::Sum

pub mod derivative;
pub mod eval;
pub mod expand;
pub mod expr;
pub mod poly;
pub mod simplify;
pub mod step_collector;

pub use eval::{evaluate, evaluate_bool, evaluate_with};
pub use expr::Entity;
pub use poly::{try_poly_linear, try_poly_quadratic, try_polynomial};
pub use simplify::{simplify, simplify_with_level, simplify_with_steps};
pub use step_collector::StepCollector;
