//! strategy — multi-try orchestration of initialization and convergence.
//!
//! Purpose
//! -------
//! Run independent tries (initialize, then converge) on copies of a model,
//! discard the tries that fail, and write the candidate with the highest
//! converged log-likelihood back into the caller's model.
//!
//! Key behaviors
//! -------------
//! - [`SimpleStrategy`]: one initializer run and one main algorithm run per
//!   try.
//! - [`FullStrategy`]: per try, several short runs from fresh starts, then a
//!   long run from the best short-run candidate.
//! - Each try owns a `StdRng` stream seeded from a master generator (the
//!   strategy's `seed`, or the OS when unset), so a seeded run is
//!   reproducible regardless of the order in which tries execute.
//! - Finished tries are folded into a running best as they complete; with
//!   the `parallel` feature each rayon worker keeps its own best and the
//!   worker bests are merged once.
//!
//! Invariants & assumptions
//! ------------------------
//! - Initialization and estimation failures discard a try (logged at warn
//!   level); configuration errors abort the whole run.
//! - If every try fails, the run returns `MixError::EstimationFailed` with
//!   the try count and the last cause; the caller's model is untouched.
//! - Ties on log-likelihood keep the lowest try index.

pub mod full;
pub mod outcome;
pub mod simple;

pub use self::full::{FullStrategy, FullStrategyParam};
pub use self::outcome::StrategyOutcome;
pub use self::simple::{SimpleStrategy, SimpleStrategyParam};

use crate::{
    estimation::algo::AlgoOutcome,
    mixture::{
        core::MixtureModel,
        errors::{MixError, MixResult},
    },
};
use log::{info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const DEFAULT_NB_TRY: usize = 5;

/// Master generator of a strategy run.
fn master_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Running reduction of finished tries.
///
/// Holds the per-try ledger and at most one candidate model: a losing
/// candidate is dropped as soon as it is compared.
struct Reduction<M> {
    tries: Vec<(usize, MixResult<f64>)>,
    best: Option<(usize, M, AlgoOutcome)>,
    last_err: Option<(usize, MixError)>,
}

impl<M> Reduction<M> {
    fn new() -> Self {
        Self { tries: Vec::new(), best: None, last_err: None }
    }

    /// Fold one finished try in. Configuration errors end the reduction.
    fn push(mut self, label: &str, (index, candidate, result): TryResult<M>) -> MixResult<Self> {
        match result {
            Ok(algo) => {
                self.tries.push((index, Ok(algo.log_likelihood)));
                self.offer(index, candidate, algo);
            }
            Err(err) if err.is_configuration() => return Err(err),
            Err(err) => {
                warn!("{label}: try {index} discarded: {err}");
                self.tries.push((index, Err(err.clone())));
                self.record_failure(index, err);
            }
        }
        Ok(self)
    }

    /// Merge the reductions of two disjoint sets of tries.
    #[cfg(feature = "parallel")]
    fn merge(mut self, other: Self) -> Self {
        self.tries.extend(other.tries);
        if let Some((index, candidate, algo)) = other.best {
            self.offer(index, candidate, algo);
        }
        if let Some((index, err)) = other.last_err {
            self.record_failure(index, err);
        }
        self
    }

    /// Keep the higher log-likelihood; ties go to the lower try index.
    fn offer(&mut self, index: usize, candidate: M, algo: AlgoOutcome) {
        let wins = match &self.best {
            None => true,
            Some((best_index, _, best)) => {
                algo.log_likelihood > best.log_likelihood
                    || (algo.log_likelihood == best.log_likelihood && index < *best_index)
            }
        };
        if wins {
            self.best = Some((index, candidate, algo));
        }
    }

    fn record_failure(&mut self, index: usize, err: MixError) {
        if self.last_err.as_ref().is_none_or(|(last, _)| index > *last) {
            self.last_err = Some((index, err));
        }
    }
}

type TryResult<M> = (usize, M, MixResult<AlgoOutcome>);

/// Run `nb_try` independent tries of `try_once` and keep the best.
///
/// Every try starts from a clone of `model` and its own generator. Results
/// are reduced as tries finish, so at most one running best per worker is
/// alive next to the tries in flight. On success the winning candidate
/// replaces `model`.
///
/// # Errors
/// - The first configuration-class error met, unchanged; remaining tries
///   are not started.
/// - `MixError::EstimationFailed { nb_try, source }` when no try succeeds.
pub(crate) fn run_tries<M, F>(
    label: &str, model: &mut M, nb_try: usize, seed: Option<u64>, try_once: F,
) -> MixResult<StrategyOutcome>
where
    M: MixtureModel + Send + Sync,
    F: Fn(&mut M, &mut StdRng) -> MixResult<AlgoOutcome> + Sync,
{
    let mut master = master_rng(seed);
    let seeds: Vec<u64> = (0..nb_try).map(|_| master.random()).collect();

    let template: &M = model;
    let run_one = |(index, seed): (usize, &u64)| -> TryResult<M> {
        let mut candidate = template.clone();
        let mut rng = StdRng::seed_from_u64(*seed);
        let result = try_once(&mut candidate, &mut rng);
        (index, candidate, result)
    };

    #[cfg(feature = "parallel")]
    let reduction = seeds
        .par_iter()
        .enumerate()
        .map(run_one)
        .try_fold(Reduction::new, |acc, item| acc.push(label, item))
        .try_reduce(Reduction::new, |left, right| Ok(left.merge(right)))?;
    #[cfg(not(feature = "parallel"))]
    let reduction = seeds
        .iter()
        .enumerate()
        .map(run_one)
        .try_fold(Reduction::new(), |acc, item| acc.push(label, item))?;

    let Reduction { mut tries, best, last_err } = reduction;
    let Some((best_try, candidate, algo)) = best else {
        return Err(match last_err {
            Some((_, source)) => MixError::EstimationFailed { nb_try, source: Box::new(source) },
            None => MixError::InvalidNbTry { value: nb_try, reason: "At least one try is required." },
        });
    };
    tries.sort_by_key(|(index, _)| *index);
    let tries = tries.into_iter().map(|(_, result)| result).collect();

    *model = candidate;
    let outcome = StrategyOutcome { best_try, log_likelihood: algo.log_likelihood, tries, algo };
    info!(
        "{label} finished: best try {} of {}, log-likelihood {:.6} ({} succeeded, {} failed)",
        outcome.best_try,
        nb_try,
        outcome.log_likelihood,
        outcome.nb_success(),
        outcome.nb_failure()
    );
    Ok(outcome)
}
