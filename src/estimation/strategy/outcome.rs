//! Strategy outcome — the record of a multi-try estimation.
use crate::{estimation::algo::AlgoOutcome, mixture::errors::MixError};

/// Result of a successful strategy run.
///
/// - `best_try`: index of the winning try (lowest index among ties).
/// - `log_likelihood`: log-likelihood of the candidate written back into
///   the model.
/// - `tries`: per-try converged log-likelihood, or the error that caused the
///   try to be discarded.
/// - `algo`: the winning try's final algorithm outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub best_try: usize,
    pub log_likelihood: f64,
    pub tries: Vec<Result<f64, MixError>>,
    pub algo: AlgoOutcome,
}

impl StrategyOutcome {
    pub fn nb_try(&self) -> usize {
        self.tries.len()
    }

    pub fn nb_success(&self) -> usize {
        self.tries.iter().filter(|t| t.is_ok()).count()
    }

    pub fn nb_failure(&self) -> usize {
        self.nb_try() - self.nb_success()
    }

    /// Discarded tries with their causes, in try order.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &MixError)> {
        self.tries.iter().enumerate().filter_map(|(i, t)| t.as_ref().err().map(|e| (i, e)))
    }
}
