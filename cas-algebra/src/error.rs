//! Error kinds raised by the engine.
//!
//! Expected "no result" outcomes (nothing to simplify, not a polynomial, no analytic solution) are
//! expressed with [`Option`] and empty sets. These kinds cover the remaining abort channel:
//! ill-typed evaluation, invalid operations and cancellation.

use cas_attrs::ErrorKind;
use cas_error::ErrorKind;
use std::fmt;

/// The kind of value an evaluation attempted to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalKind {
    Number,
    Boolean,
}

impl fmt::Display for EvalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// The computation was cancelled through its [`CancellationToken`](crate::cancel::CancellationToken).
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "the computation was cancelled before it finished")]
pub struct Cancelled;

/// An expression could not be evaluated to the requested kind of value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot evaluate `{}` as a {}", expr, kind),
    labels = ["this expression"],
    help = match kind {
        EvalKind::Number => "substitute every free variable with a number before evaluating",
        EvalKind::Boolean => "only logic, comparison and membership expressions have a truth value",
    }
)]
pub struct CannotEvaluate {
    /// The kind of value that was requested.
    pub kind: EvalKind,

    /// The sub-expression that blocked the evaluation.
    pub expr: String,
}

/// An operation was applied to operands with incompatible shapes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("invalid operation: {}", reason))]
pub struct InvalidOperation {
    /// What was wrong with the operands.
    pub reason: String,
}

impl InvalidOperation {
    /// Creates the error from a description of the problem.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}
