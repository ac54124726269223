//! Simplification of expressions.
//!
//! Simplification proceeds in **rounds**. A round is made of:
//!
//! 1. A bottom-up **pass**: the children of every node are simplified first, then the rules in
//!    [`rules::RULES`] are applied to the node until none of them match. Every time a rule
//!    changes the node, the children of the new node are simplified again. Results are memoized
//!    for the duration of the pass, so shared subtrees are only simplified once.
//! 2. A choice between **whole-expression alternatives** of the pass result: the result itself,
//!    its presentation form (rational coefficients written as divisions), its full expansion and
//!    its common-factor form. The alternative with the lowest cost according to the
//!    [`COMPLEXITY_CRITERIA`] setting wins; on ties, the earliest of the list above wins.
//!
//! Rounds are repeated until the expression stops changing, an expression seen in an earlier
//! round comes back, or the maximum number of rounds is reached. The result is the cheapest
//! expression of the whole sequence (the input included), so simplifying never increases the
//! cost of an expression.
//!
//! The cancellation token of the current thread is polled between rounds.

pub mod complexity;
mod factor;
pub mod fraction;
pub mod pattern;
pub mod rules;
pub mod step;

use crate::cancel::check_cancelled;
use crate::settings::COMPLEXITY_CRITERIA;
use crate::symbolic::{expand::expand, expr::Entity, step_collector::StepCollector};
use cas_error::Error;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

pub use factor::factor_common;
use step::Step;

/// The number of rounds when no level is requested.
pub const DEFAULT_LEVEL: usize = 16;

/// The number of rule applications allowed in a single pass.
const PASS_BUDGET: usize = 10_000;

/// One bottom-up pass of rule applications.
struct Pass {
    memo: HashMap<Entity, Entity>,
    budget: usize,
    steps: Vec<Step>,
}

impl Pass {
    fn new() -> Self {
        Self {
            memo: HashMap::new(),
            budget: PASS_BUDGET,
            steps: Vec::new(),
        }
    }

    /// Simplifies the children of the expression, then applies rules to the expression itself
    /// until none apply.
    fn rewrite(&mut self, expr: &Entity) -> Entity {
        if let Some(done) = self.memo.get(expr) {
            return done.clone();
        }

        let mut current = expr.map_children(|child| self.rewrite(child));
        while self.budget > 0 {
            let Some((rule, new)) = rules::first_match(&current) else {
                break;
            };
            trace!(rule = rule.name, from = %current, to = %new, "rule applied");
            self.budget -= 1;
            self.steps.push(rule.step);
            current = new.map_children(|child| self.rewrite(child));
        }

        self.memo.insert(expr.clone(), current.clone());
        current
    }
}

/// Runs a single pass over the expression, returning the result and the steps taken.
fn pass(expr: &Entity) -> (Entity, Vec<Step>) {
    let mut pass = Pass::new();
    let result = pass.rewrite(expr);
    (result, pass.steps)
}

/// A whole-expression alternative produced during a round.
struct Candidate {
    expr: Entity,
    cost: f64,
    steps: Vec<Step>,
}

/// Produces the alternatives of a round, in priority order.
fn candidates(expr: &Entity, cost: &dyn Fn(&Entity) -> f64) -> Vec<Candidate> {
    let (passed, steps) = pass(expr);
    let mut candidates = Vec::with_capacity(4);

    if let Some(presented) = fraction::presentation(&passed) {
        let mut steps = steps.clone();
        steps.push(Step::RationalCoefficient);
        candidates.push((presented, steps));
    }

    let mut reshaped = |reshape: Option<Entity>, step: Step| {
        if let Some(reshaped) = reshape {
            let (result, more) = pass(&reshaped);
            let mut all = steps.clone();
            all.push(step);
            all.extend(more);
            candidates.push((result, all));
        }
    };
    reshaped(expand(&passed), Step::DistributiveProperty);
    reshaped(factor_common(&passed), Step::FactorCommon);

    std::iter::once((passed, steps.clone()))
        .chain(candidates)
        .map(|(expr, steps)| Candidate { cost: cost(&expr), expr, steps })
        .collect()
}

/// Runs one round, returning the cheapest alternative.
fn round(expr: &Entity, cost: &dyn Fn(&Entity) -> f64) -> Option<Candidate> {
    candidates(expr, cost)
        .into_iter()
        .reduce(|best, next| if next.cost < best.cost { next } else { best })
}

/// Simplifies the given expression, running at most `level` rounds ([`DEFAULT_LEVEL`] if
/// [`None`]), and pushes the steps that lead to the result into `step_collector`.
///
/// Returns an error only if the computation was cancelled.
pub fn simplify_with(
    expr: &Entity,
    level: Option<usize>,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Entity, Error> {
    let cost = COMPLEXITY_CRITERIA.get();
    let rounds = level.unwrap_or(DEFAULT_LEVEL);

    let mut path = vec![Candidate { expr: expr.clone(), cost: cost(expr), steps: Vec::new() }];
    let mut seen = HashSet::from([expr.clone()]);
    for level in 0..rounds {
        check_cancelled()?;

        let Some(last) = path.last() else {
            break;
        };
        let Some(next) = round(&last.expr, &*cost) else {
            break;
        };
        debug!(level, cost = next.cost, expr = %next.expr, "simplification round");

        if !seen.insert(next.expr.clone()) {
            break;
        }
        path.push(next);
    }

    let best = path.iter()
        .enumerate()
        .fold(0, |best, (i, candidate)| if candidate.cost < path[best].cost { i } else { best });
    path.truncate(best + 1);
    let mut simplified = expr.clone();
    for candidate in path {
        candidate.steps.into_iter().for_each(|step| step_collector.push(step));
        simplified = candidate.expr;
    }
    Ok(simplified)
}

/// Simplifies the given expression.
///
/// Returns an error only if the computation was cancelled.
pub fn simplify(expr: &Entity) -> Result<Entity, Error> {
    simplify_with(expr, None, &mut ())
}

/// Simplifies the given expression, running at most `level` rounds.
pub fn simplify_with_level(expr: &Entity, level: usize) -> Result<Entity, Error> {
    simplify_with(expr, Some(level), &mut ())
}

/// Simplifies the given expression, returning the steps that lead to the result.
pub fn simplify_with_steps(expr: &Entity) -> Result<(Entity, Vec<Step>), Error> {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, None, &mut steps)?;
    Ok((simplified, steps))
}

/// Simplifies the given expression, then returns the distinct whole-expression forms of the
/// result, cheapest first.
pub fn alternatives(expr: &Entity) -> Result<Vec<Entity>, Error> {
    let simplified = simplify(expr)?;
    let cost = COMPLEXITY_CRITERIA.get();

    let mut forms = candidates(&simplified, &*cost);
    forms.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    let mut seen = HashSet::new();
    Ok(forms.into_iter()
        .map(|candidate| candidate.expr)
        .filter(|form| seen.insert(form.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::cancel::CancellationToken;
    use crate::error::Cancelled;
    use crate::settings::{CANCELLATION, MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE};
    use crate::symbolic::{eval::evaluate, expr::{PI, ONE}};
    use rug::Integer;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::Arc;
    use super::*;

    #[test]
    fn like_terms() {
        let x = Entity::var("x");
        assert_eq!(
            simplify(&(&x + &x + &x)).unwrap(),
            Entity::product([Entity::integer(3), x.clone()]),
        );
        assert_eq!(simplify(&(&x - &x)).unwrap(), Entity::integer(0));
        assert_eq!(simplify(&(&x / &x)).unwrap(), ONE.clone());
    }

    #[test]
    fn exact_arithmetic() {
        let expr = Entity::rational(1, 3) + Entity::rational(1, 6);
        assert_eq!(simplify(&expr).unwrap(), Entity::rational(1, 2));

        let root = Entity::sqrt(Entity::integer(12));
        assert_eq!(
            simplify(&root).unwrap(),
            Entity::product([Entity::integer(2), Entity::sqrt(Entity::integer(3))]),
        );

        let sine = Entity::sin(Entity::div(PI.clone(), Entity::integer(6)));
        assert_eq!(simplify(&sine).unwrap(), Entity::rational(1, 2));
    }

    #[test]
    fn transcendental_values_stay_symbolic() {
        for expr in [Entity::sin(Entity::integer(2)), Entity::ln(Entity::integer(3)), Entity::cos(Entity::integer(8))] {
            assert_eq!(simplify(&expr).unwrap(), expr);
        }
    }

    #[test]
    fn rational_coefficients_are_presented_as_fractions() {
        let x = Entity::var("x");
        let expr = Entity::div(Entity::product([Entity::integer(2), x.clone()]), Entity::integer(4));
        assert_eq!(simplify(&expr).unwrap(), Entity::div(x, Entity::integer(2)));
    }

    #[test]
    fn steps_are_recorded() {
        let x = Entity::var("x");
        let (simplified, steps) = simplify_with_steps(&(&x + &x)).unwrap();
        assert_eq!(simplified, Entity::product([Entity::integer(2), x]));
        assert!(steps.contains(&Step::CombineLikeTerms));
    }

    #[test]
    fn level_zero_returns_input() {
        let x = Entity::var("x");
        let expr = &x + &x;
        assert_eq!(simplify_with_level(&expr, 0).unwrap(), expr);
    }

    #[test]
    fn custom_complexity_criteria() {
        let x = Entity::var("x");
        let expr = &x + &x;

        // every form costs the same, so the input wins
        let flat = COMPLEXITY_CRITERIA.run_with(Arc::new(|_: &Entity| 0.0), || simplify(&expr));
        assert_eq!(flat.unwrap(), expr);
    }

    #[test]
    fn alternative_forms() {
        let x = Entity::var("x");
        let expr = Entity::product([x.clone(), Entity::sum([x.clone(), ONE.clone()])]);
        let forms = alternatives(&expr).unwrap();
        assert!(forms.len() >= 2);
        assert!(forms.contains(&Entity::sum([x.clone(), Entity::pow(x, Entity::integer(2))])));
    }

    #[test]
    fn cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let x = Entity::var("x");
        let result = CANCELLATION.run_with(Some(token), || simplify(&(&x + &x)));
        assert!(result.unwrap_err().is::<Cancelled>());
    }

    /// Small polynomial-like expression trees over `x` and `y`.
    fn arb_entity() -> impl Strategy<Value = Entity> {
        let leaf = prop_oneof![
            (1i64..5).prop_map(Entity::integer),
            Just(Entity::var("x")),
            Just(Entity::var("y")),
        ];
        leaf.prop_recursive(3, 16, 2, |inner| prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a * b),
            (inner.clone(), 0i64..3).prop_map(|(a, n)| Entity::pow(a, Entity::integer(n))),
        ])
    }

    /// A nonzero rational.
    fn arb_rational() -> impl Strategy<Value = Entity> {
        (1i64..7, 1i64..4, any::<bool>()).prop_map(|(num, den, negative)| {
            Entity::rational(if negative { -num } else { num }, den)
        })
    }

    /// Variable-free arithmetic over nonzero rationals. Divisors are nonzero constants and powers
    /// have small integer exponents, negative ones included.
    fn arb_arithmetic() -> impl Strategy<Value = Entity> {
        let leaf = prop_oneof![
            arb_rational(),
            (arb_rational(), -2i64..4).prop_map(|(base, n)| Entity::pow(base, Entity::integer(n))),
        ];
        leaf.prop_recursive(3, 16, 2, |inner| prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a - b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a * b),
            (inner.clone(), arb_rational()).prop_map(|(a, b)| Entity::div(a, b)),
        ])
    }

    proptest! {
        #[test]
        fn idempotent(expr in arb_entity()) {
            let once = simplify(&expr).unwrap();
            prop_assert_eq!(simplify(&once).unwrap(), once);
        }

        #[test]
        fn cost_never_increases(expr in arb_entity()) {
            let cost = COMPLEXITY_CRITERIA.get();
            let simplified = simplify(&expr).unwrap();
            prop_assert!(cost(&simplified) <= cost(&expr));
        }

        #[test]
        fn exact_evaluation(expr in arb_arithmetic()) {
            // keep large fractions exact
            let _ceiling = MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE.set(Integer::from(Integer::u_pow_u(10, 60)));
            let value = evaluate(&expr).unwrap();
            prop_assert!(value.is_exact());
            prop_assert_eq!(simplify(&expr).unwrap(), Entity::number(value));
        }
    }
}
