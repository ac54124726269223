//! Exact computer algebra: an arbitrary-precision numeric tower, an immutable expression tree, a
//! rule-based simplifier ranked by a pluggable complexity function, a polynomial extractor and an
//! equation solver with a Newton fallback.
//!
//! ```
//! use cas_algebra::symbolic::{expr::Entity, simplify};
//!
//! let x = Entity::var("x");
//! let expr = &x + &x + Entity::rational(1, 3) + Entity::rational(1, 6);
//! assert_eq!(simplify(&expr).unwrap().to_string(), "1/2 + 2 * x");
//! ```
//!
//! # Features
//!
//! - `parallel` (default): runs the seeds of the Newton fallback on the [`rayon`] thread pool.

pub mod approx;
pub mod cancel;
pub mod consts;
pub mod error;
pub mod matrix;
pub mod numeric;
pub mod primitive;
pub mod settings;
pub mod solve;
pub mod symbolic;

pub use cancel::CancellationToken;
pub use matrix::Matrix;
pub use numeric::Number;
pub use solve::{solve, solve_equation, SystemSolution};
pub use symbolic::{expr::Entity, simplify};
