//! Algorithm options — iteration caps, tolerances, and stochastic phases.
//!
//! Purpose
//! -------
//! Bundle the numerical knobs of one [`Algorithm`](crate::estimation::algo::Algorithm)
//! run in a validated value type, so strategies can hold several
//! differently-tuned runs (short exploration, long refinement) side by side.
//!
//! Key behaviors
//! -------------
//! - [`AlgoOptions::new`] validates every field and every cross-field
//!   constraint; `Default` and the [`short_run`](AlgoOptions::short_run) /
//!   [`long_run`](AlgoOptions::long_run) presets are valid by construction.
//! - Fields are public for struct-update syntax; [`AlgoOptions::validate`]
//!   re-checks a hand-built value and every algorithm run calls it first.
//! - `cap_is_failure` turns "iteration cap reached without meeting the
//!   tolerance" into an estimation failure; by default it counts as converged.
//!
//! Invariants & assumptions
//! ------------------------
//! - `epsilon` finite and `> 0`; `nb_iter_max > 0`; `burn_in < nb_iter_max`.
//! - `burn_in` and `nb_stabilization_iter` only affect stochastic algorithms.
use crate::mixture::{
    core::validation::{validate_burn_in, validate_epsilon, validate_nb_iter_max},
    errors::MixResult,
};

pub const DEFAULT_NB_ITER_MAX: usize = 200;
pub const DEFAULT_EPSILON: f64 = 1e-6;
pub const DEFAULT_BURN_IN: usize = 0;
pub const DEFAULT_NB_STABILIZATION_ITER: usize = 10;

/// Numerical settings of one algorithm run.
///
/// Fields:
/// - `nb_iter_max`: iteration cap (stochastic phase length for SEM/SemiSEM).
/// - `epsilon`: relative log-likelihood change below which a deterministic
///   run is converged.
/// - `burn_in`: leading stochastic iterations excluded from averaging.
/// - `nb_stabilization_iter`: deterministic EM iterations run by SemiSEM
///   after harvesting the averaged parameters.
/// - `cap_is_failure`: report an iteration-capped deterministic run as
///   `MixError::MaxIterReached` instead of success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgoOptions {
    pub nb_iter_max: usize,
    pub epsilon: f64,
    pub burn_in: usize,
    pub nb_stabilization_iter: usize,
    pub cap_is_failure: bool,
}

impl AlgoOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// Configuration-class `MixError` (`InvalidNbIterMax`, `InvalidEpsilon`,
    /// `InvalidBurnIn`) when a field or the burn-in constraint is violated.
    pub fn new(
        nb_iter_max: usize, epsilon: f64, burn_in: usize, nb_stabilization_iter: usize,
        cap_is_failure: bool,
    ) -> MixResult<Self> {
        let nb_iter_max = validate_nb_iter_max(nb_iter_max)?;
        let epsilon = validate_epsilon(epsilon)?;
        let burn_in = validate_burn_in(burn_in, nb_iter_max)?;
        Ok(Self { nb_iter_max, epsilon, burn_in, nb_stabilization_iter, cap_is_failure })
    }

    /// Re-check a value that may have been built as a struct literal.
    ///
    /// # Errors
    /// The same configuration-class errors as [`AlgoOptions::new`].
    pub fn validate(&self) -> MixResult<()> {
        let nb_iter_max = validate_nb_iter_max(self.nb_iter_max)?;
        validate_epsilon(self.epsilon)?;
        validate_burn_in(self.burn_in, nb_iter_max)?;
        Ok(())
    }

    /// Cheap exploratory run used by initializers and short runs.
    pub fn short_run() -> Self {
        Self { nb_iter_max: 20, epsilon: 1e-4, ..Self::default() }
    }

    /// Refinement run used after exploration.
    pub fn long_run() -> Self {
        Self { nb_iter_max: 1000, epsilon: 1e-8, ..Self::default() }
    }
}

impl Default for AlgoOptions {
    fn default() -> Self {
        Self {
            nb_iter_max: DEFAULT_NB_ITER_MAX,
            epsilon: DEFAULT_EPSILON,
            burn_in: DEFAULT_BURN_IN,
            nb_stabilization_iter: DEFAULT_NB_STABILIZATION_ITER,
            cap_is_failure: false,
        }
    }
}
