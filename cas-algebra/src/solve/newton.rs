//! Numeric root finding with Newton's method.
//!
//! Newton's method is started from every point of a grid over the window of the
//! [`NEWTON_SOLVER`] setting, both corners included. The grid covers the complex plane, so
//! complex roots of real equations are found too. A converged point is only kept if it zeroes the
//! expression within [`PRECISION_ERROR_COMMON`], and points closer than that to each other are
//! merged.
//!
//! With the `parallel` feature, the seeds are searched on the [`rayon`] thread pool. Every worker
//! runs with a copy of the caller's settings, including its cancellation token.

use crate::approx::approximate_rational;
use crate::cancel::check_cancelled;
use crate::numeric::Number;
use crate::settings::{
    NewtonSetting,
    DOWNCASTING_ENABLED,
    NEWTON_SOLVER,
    PRECISION_ERROR_COMMON,
    PRECISION_ERROR_ZERO_RANGE,
};
use crate::symbolic::derivative::derivative;
use crate::symbolic::eval::evaluate_with;
use crate::symbolic::expr::Entity;
use cas_error::Error;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Step used for the finite difference when the expression has no symbolic derivative.
const FINITE_DIFFERENCE_STEP: f64 = 1e-10;

/// Number of continued-fraction terms tried when looking for an exact form of a root.
const EXACT_ROOT_TERMS: u32 = 8;

/// The function whose roots are searched.
struct Target<'a> {
    f: &'a Entity,
    derivative: Option<Entity>,
    var: &'a str,
}

impl Target<'_> {
    fn value_at(&self, expr: &Entity, z: &Number) -> Option<Number> {
        let vars = HashMap::from([(self.var.to_string(), z.clone())]);
        evaluate_with(expr, &vars).ok().filter(|value| !value.is_nan())
    }

    fn slope_at(&self, z: &Number, fz: &Number) -> Option<Number> {
        match &self.derivative {
            Some(derivative) => self.value_at(derivative, z),
            None => {
                let h = Number::from_f64(FINITE_DIFFERENCE_STEP).to_inexact();
                let shifted = self.value_at(self.f, &(z + &h))?;
                Some(&(&shifted - fz) / &h)
            },
        }
    }

    /// Runs Newton's method from the seed. Returns the point it converged to, if it zeroes the
    /// function.
    fn search(&self, seed: &Number, iterations: usize, tolerance: f64) -> Result<Option<Number>, Error> {
        check_cancelled()?;
        let _inexact = DOWNCASTING_ENABLED.set(false);

        let mut z = seed.to_inexact();
        for _ in 0..iterations {
            let Some(fz) = self.value_at(self.f, &z) else {
                return Ok(None);
            };
            if fz.is_zero() {
                break;
            }
            let Some(slope) = self.slope_at(&z, &fz).filter(|s| !s.is_zero()) else {
                return Ok(None);
            };

            let step = &fz / &slope;
            z = &z - &step;
            if step.abs().to_f64() < f64::EPSILON * tolerance {
                break;
            }
        }

        let residual = self.value_at(self.f, &z).map(|fz| fz.abs().to_f64());
        Ok(residual.filter(|r| *r < tolerance).map(|_| z))
    }

    /// Replaces the root by a nearby rational (or Gaussian rational) if that is an exact root.
    fn exact_form(&self, root: Number) -> Number {
        let zero_range = PRECISION_ERROR_ZERO_RANGE.get();
        let part = |n: Number| {
            approximate_rational(&n.to_float(), EXACT_ROOT_TERMS, zero_range.max(1e-9))
                .map(Number::from_rational)
        };
        let candidate = match (part(root.re()), part(root.im())) {
            (Some(re), Some(im)) => Number::complex(re, im),
            _ => return root.create(),
        };

        match self.value_at(self.f, &candidate) {
            Some(value) if value.abs().to_f64() < zero_range => candidate,
            _ => root.create(),
        }
    }
}

/// The seeds of the search, `(step_count.0 + 1) * (step_count.1 + 1)` points covering the window
/// with both corners included.
fn grid(setting: &NewtonSetting) -> Vec<Number> {
    let axis = |from: f64, to: f64, steps: usize| -> Vec<f64> {
        if steps == 0 {
            return vec![from];
        }
        (0..=steps).map(|i| from + (to - from) * i as f64 / steps as f64).collect()
    };

    let re = axis(setting.from.0, setting.to.0, setting.step_count.0);
    let im = axis(setting.from.1, setting.to.1, setting.step_count.1);
    re.iter()
        .flat_map(|re| im.iter().map(move |im| {
            Number::complex(Number::from_f64(*re), Number::from_f64(*im))
        }))
        .collect()
}

#[cfg(feature = "parallel")]
fn search_all(target: &Target<'_>, seeds: &[Number], setting: &NewtonSetting, tolerance: f64) -> Result<Vec<Number>, Error> {
    use crate::settings::Snapshot;
    use rayon::prelude::*;

    let snapshot = Snapshot::capture();
    let found = seeds.par_iter()
        .map(|seed| {
            let _settings = snapshot.install();
            target.search(seed, setting.precision, tolerance)
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(found.into_iter().flatten().collect())
}

#[cfg(not(feature = "parallel"))]
fn search_all(target: &Target<'_>, seeds: &[Number], setting: &NewtonSetting, tolerance: f64) -> Result<Vec<Number>, Error> {
    let mut found = Vec::new();
    for seed in seeds {
        found.extend(target.search(seed, setting.precision, tolerance)?);
    }
    Ok(found)
}

/// Finds numeric roots of `expr = 0`, where `x` is the only free variable of `expr`.
///
/// Returns an empty list if `expr` has other free variables.
pub(super) fn find_roots(expr: &Entity, x: &str) -> Result<Vec<Entity>, Error> {
    if !expr.contains_variable(x) || expr.variables().iter().any(|var| var != x) {
        return Ok(Vec::new());
    }

    let target = Target {
        f: expr,
        derivative: derivative(expr, x).ok(),
        var: x,
    };
    if target.derivative.is_none() {
        trace!(expr = %expr, "no symbolic derivative, using finite differences");
    }

    let setting = NEWTON_SOLVER.get();
    let tolerance = PRECISION_ERROR_COMMON.get();
    let seeds = grid(&setting);
    debug!(seeds = seeds.len(), expr = %expr, "searching roots with Newton's method");

    let mut roots: Vec<Number> = Vec::new();
    for root in search_all(&target, &seeds, &setting, tolerance)? {
        if !roots.iter().any(|kept| (kept - &root).abs().to_f64() < tolerance) {
            roots.push(root);
        }
    }

    debug!(count = roots.len(), "Newton's method converged");
    Ok(roots.into_iter()
        .map(|root| Entity::number(target.exact_form(root)))
        .collect())
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn grid_includes_both_corners() {
        let setting = NewtonSetting { from: (-1.0, 0.0), to: (1.0, 2.0), step_count: (2, 1), precision: 10 };
        let seeds = grid(&setting);
        assert_eq!(seeds.len(), 6);
        assert_eq!(seeds.first().map(Number::to_f64_pair), Some((-1.0, 0.0)));
        assert_eq!(seeds.last().map(Number::to_f64_pair), Some((1.0, 2.0)));
    }

    #[test]
    fn exact_roots_are_recovered() {
        // x^2 - 2x + 1 - 1/4 = (x - 1/2)(x - 3/2)
        let x = Entity::var("x");
        let expr = Entity::sum([
            Entity::pow(x.clone(), Entity::integer(2)),
            Entity::product([Entity::integer(-2), x]),
            Entity::rational(3, 4),
        ]);
        let mut roots = find_roots(&expr, "x").unwrap();
        roots.sort_by(|a, b| a.as_number().unwrap().total_cmp(b.as_number().unwrap()));
        assert_eq!(roots, vec![Entity::rational(1, 2), Entity::rational(3, 2)]);
    }

    #[test]
    fn irrational_and_complex_roots() {
        // x^3 - 2 has one real and two complex roots
        let expr = Entity::pow(Entity::var("x"), Entity::integer(3)) - Entity::integer(2);
        let roots = find_roots(&expr, "x").unwrap();
        assert_eq!(roots.len(), 3);

        let real = roots.iter()
            .filter_map(Entity::as_number)
            .find(|root| root.is_real())
            .unwrap();
        assert_float_absolute_eq!(real.to_f64(), 2f64.cbrt(), 1e-9);
    }

    #[test]
    fn other_variables() {
        let expr = Entity::var("x") + Entity::var("y");
        assert_eq!(find_roots(&expr, "x").unwrap(), vec![]);
    }
}
