//! Thread-local, stack-based configuration.
//!
//! Every setting is a [`Setting`] static backed by its own thread-local stack of overrides. The
//! effective value of a setting is the top of the stack, or the setting's default if nothing has
//! been pushed on the current thread. Overrides are pushed with [`Setting::set`], which returns a
//! [`SettingGuard`]; dropping the guard pops the override again, whether the scope is left
//! normally, through `?`, or by unwinding.
//!
//! ```
//! use cas_algebra::settings::DOWNCASTING_ENABLED;
//!
//! assert!(DOWNCASTING_ENABLED.get());
//! {
//!     let _guard = DOWNCASTING_ENABLED.set(false);
//!     assert!(!DOWNCASTING_ENABLED.get());
//! }
//! assert!(DOWNCASTING_ENABLED.get());
//!
//! let seen = DOWNCASTING_ENABLED.run_with(false, || DOWNCASTING_ENABLED.get());
//! assert!(!seen);
//! ```
//!
//! Since the stacks are thread-local, pushes on one thread are never visible on another. Work
//! that is split across threads (such as the Newton seeds of the solver) carries the caller's
//! configuration with a [`Snapshot`].

use crate::cancel::CancellationToken;
use crate::symbolic::{expr::Entity, simplify::complexity::default_complexity};
use rug::{float::Round, Integer};
use std::{cell::RefCell, fmt, marker::PhantomData, sync::Arc, thread::LocalKey};

/// A typed setting with a thread-local stack of overrides.
pub struct Setting<T: 'static> {
    name: &'static str,
    stack: &'static LocalKey<RefCell<Vec<T>>>,
    default: fn() -> T,
}

impl<T: Clone + 'static> Setting<T> {
    /// The name of the setting.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the effective value of the setting on the current thread.
    pub fn get(&self) -> T {
        self.stack
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(self.default)
    }

    /// Returns the default value of the setting, ignoring any override.
    pub fn default_value(&self) -> T {
        (self.default)()
    }

    /// Overrides the setting on the current thread until the returned guard is dropped.
    #[must_use = "the override is removed as soon as the guard is dropped"]
    pub fn set(&'static self, value: T) -> SettingGuard<T> {
        let depth = self.stack.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(value);
            stack.len() - 1
        });
        SettingGuard {
            setting: self,
            depth,
            _not_send: PhantomData,
        }
    }

    /// Runs `body` with the setting overridden to `value`.
    pub fn run_with<R>(&'static self, value: T, body: impl FnOnce() -> R) -> R {
        let _guard = self.set(value);
        body()
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("value", &self.get())
            .finish()
    }
}

/// Scoped-release handle returned by [`Setting::set`].
///
/// The guard is bound to the thread that created it. Dropping it restores the stack to the depth
/// it had before the override was pushed, which also discards any override leaked above it.
pub struct SettingGuard<T: 'static> {
    setting: &'static Setting<T>,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl<T: 'static> Drop for SettingGuard<T> {
    fn drop(&mut self) {
        // the stack is gone if the guard outlives thread-local destruction
        let _ = self.setting.stack.try_with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// The cost function used by the simplifier to rank candidate expressions.
pub type ComplexityCriteria = Arc<dyn Fn(&Entity) -> f64 + Send + Sync>;

/// The search window and iteration budget of the Newton fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSetting {
    /// Lower corner of the seed grid, as `(re, im)`.
    pub from: (f64, f64),

    /// Upper corner of the seed grid, as `(re, im)`.
    pub to: (f64, f64),

    /// Number of subdivisions along the real and imaginary axis.
    pub step_count: (usize, usize),

    /// Maximum number of Newton iterations per seed.
    pub precision: usize,
}

impl Default for NewtonSetting {
    fn default() -> Self {
        Self {
            from: (-10.0, -10.0),
            to: (10.0, 10.0),
            step_count: (10, 10),
            precision: 30,
        }
    }
}

/// Precision, rounding and exponent range of [`Real`](crate::numeric::Number::Real) arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalContext {
    /// Number of significant decimal digits.
    pub digits: u32,

    /// Rounding mode applied to every real result.
    pub rounding: Round,

    /// Smallest decimal exponent; smaller magnitudes flush to zero.
    pub min_exponent: i64,

    /// Largest decimal exponent; larger magnitudes overflow to infinity.
    pub max_exponent: i64,
}

impl DecimalContext {
    /// The number of bits of precision needed to hold [`DecimalContext::digits`] digits.
    pub fn precision_bits(&self) -> u32 {
        let bits = (self.digits as f64 * std::f64::consts::LOG2_10).ceil() as u32;
        bits.max(rug::float::prec_min())
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            digits: 100,
            rounding: Round::Nearest,
            min_exponent: -100,
            max_exponent: 1000,
        }
    }
}

macro_rules! settings {
    ($($(#[$meta:meta])* $field:ident => $name:ident: $ty:ty = $default:expr;)*) => {
        $(
            $(#[$meta])*
            pub static $name: Setting<$ty> = {
                fn default() -> $ty {
                    $default
                }

                thread_local! {
                    static STACK: RefCell<Vec<$ty>> = const { RefCell::new(Vec::new()) };
                }

                Setting { name: stringify!($name), stack: &STACK, default }
            };
        )*

        /// A copy of the effective value of every setting on the current thread.
        #[derive(Clone)]
        pub struct Snapshot {
            $($field: $ty,)*
        }

        impl Snapshot {
            /// Captures the effective settings of the current thread.
            pub fn capture() -> Self {
                Self {
                    $($field: $name.get(),)*
                }
            }

            /// Pushes every captured value onto the current thread's stacks.
            #[must_use = "the settings are restored as soon as the guard is dropped"]
            pub fn install(&self) -> SnapshotGuard {
                SnapshotGuard {
                    $($field: $name.set(self.$field.clone()),)*
                }
            }
        }

        /// Restores every setting installed by [`Snapshot::install`] when dropped.
        pub struct SnapshotGuard {
            $(#[allow(dead_code)] $field: SettingGuard<$ty>,)*
        }
    };
}

settings! {
    /// Whether numbers are stored with the most specific tag consistent with their value.
    downcasting_enabled => DOWNCASTING_ENABLED: bool = true;

    /// Number of continued-fraction terms tried when turning a real into a rational.
    float_to_rational_iter_count => FLOAT_TO_RATIONAL_ITER_COUNT: u32 = 15;

    /// Rationals whose numerator or denominator exceed this magnitude become reals.
    max_abs_numerator_or_denominator_value => MAX_ABS_NUMERATOR_OR_DENOMINATOR_VALUE: Integer =
        Integer::from(100_000_000);

    /// Absolute tolerance used when comparing inexact numbers.
    precision_error_common => PRECISION_ERROR_COMMON: f64 = 1e-6;

    /// Magnitude under which an inexact number counts as zero.
    precision_error_zero_range => PRECISION_ERROR_ZERO_RANGE: f64 = 1e-16;

    /// Whether the solver may fall back to Newton's method.
    allow_newton => ALLOW_NEWTON: bool = true;

    /// Search window and iteration budget of the Newton fallback.
    newton_solver => NEWTON_SOLVER: NewtonSetting = NewtonSetting::default();

    /// Maximum number of terms an expansion may produce.
    max_expansion_term_count => MAX_EXPANSION_TERM_COUNT: usize = 2000;

    /// Precision and rounding of real arithmetic.
    decimal_precision_context => DECIMAL_PRECISION_CONTEXT: DecimalContext = DecimalContext::default();

    /// The cost function used to rank simplification candidates.
    complexity_criteria => COMPLEXITY_CRITERIA: ComplexityCriteria = Arc::new(default_complexity);

    /// The cancellation token polled by long-running operations.
    cancellation => CANCELLATION: Option<CancellationToken> = None;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Barrier;
    use super::*;

    #[test]
    fn default_without_override() {
        assert_eq!(FLOAT_TO_RATIONAL_ITER_COUNT.get(), 15);
        assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 2000);
        assert_eq!(NEWTON_SOLVER.get(), NewtonSetting::default());
        assert_eq!(DECIMAL_PRECISION_CONTEXT.get().precision_bits(), 333);
        assert_eq!(DOWNCASTING_ENABLED.name(), "DOWNCASTING_ENABLED");
    }

    #[test]
    fn nested_overrides() {
        let outer = MAX_EXPANSION_TERM_COUNT.set(10);
        assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 10);
        {
            let _inner = MAX_EXPANSION_TERM_COUNT.set(3);
            assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 3);
        }
        assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 10);
        drop(outer);
        assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 2000);
    }

    #[test]
    fn early_return_restores() {
        fn fails() -> Result<(), ()> {
            let _guard = ALLOW_NEWTON.set(false);
            assert!(!ALLOW_NEWTON.get());
            Err::<(), ()>(())?;
            Ok(())
        }

        assert!(fails().is_err());
        assert!(ALLOW_NEWTON.get());
    }

    #[test]
    fn unwinding_restores() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            PRECISION_ERROR_COMMON.run_with(0.5, || {
                assert_eq!(PRECISION_ERROR_COMMON.get(), 0.5);
                panic!("abort");
            })
        }));
        assert!(result.is_err());
        assert_eq!(PRECISION_ERROR_COMMON.get(), 1e-6);
    }

    #[test]
    fn out_of_order_drop() {
        let first = FLOAT_TO_RATIONAL_ITER_COUNT.set(1);
        let second = FLOAT_TO_RATIONAL_ITER_COUNT.set(2);
        drop(first);
        assert_eq!(FLOAT_TO_RATIONAL_ITER_COUNT.get(), 15);
        drop(second);
        assert_eq!(FLOAT_TO_RATIONAL_ITER_COUNT.get(), 15);
    }

    #[test]
    fn threads_are_isolated() {
        let barrier = Barrier::new(2);
        std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = DOWNCASTING_ENABLED.set(false);
                barrier.wait();
                // the other thread checks its own view while this override is live
                barrier.wait();
                assert!(!DOWNCASTING_ENABLED.get());
            });
            s.spawn(|| {
                barrier.wait();
                assert!(DOWNCASTING_ENABLED.get());
                barrier.wait();
            });
        });
        assert!(DOWNCASTING_ENABLED.get());
    }

    #[test]
    fn snapshot_carries_overrides() {
        let _count = MAX_EXPANSION_TERM_COUNT.set(7);
        let _newton = ALLOW_NEWTON.set(false);
        let snapshot = Snapshot::capture();

        std::thread::scope(|s| {
            s.spawn(|| {
                assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 2000);
                {
                    let _installed = snapshot.install();
                    assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 7);
                    assert!(!ALLOW_NEWTON.get());
                }
                assert_eq!(MAX_EXPANSION_TERM_COUNT.get(), 2000);
                assert!(ALLOW_NEWTON.get());
            });
        });
    }
}
