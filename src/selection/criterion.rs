//! Criterion — penalized fit scores for comparing fitted mixtures.
//!
//! Purpose
//! -------
//! Convert a fitted model's log-likelihood and complexity into one scalar so
//! that candidates with different `K` or families can be ranked. Lower is
//! better for every criterion.
//!
//! Key behaviors
//! -------------
//! - **AIC** = `−2ℓ + 2p`.
//! - **BIC** = `−2ℓ + p·ln N`.
//! - **ICL** = BIC + `2·E`, with `E = −Σ t_ik ln t_ik` the posterior
//!   entropy; overlapping clusters are penalized.
//! - **ML** = `−2ℓ`, no penalty.
//! - [`select_model`] scores a list of fitted candidates and returns the
//!   index of the lowest score (first wins ties).
//!
//! Invariants & assumptions
//! ------------------------
//! - Scores are only defined for finite log-likelihoods and `N > 0`; other
//!   inputs are reported as errors, never as `NaN` scores.
use crate::mixture::{
    core::{CriterionKind, MixtureModel},
    errors::{MixError, MixResult},
};

/// Everything a criterion reads from a fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub log_likelihood: f64,
    pub nb_free_parameters: usize,
    pub nb_observations: usize,
    pub nb_cluster: usize,
    /// Posterior entropy; only ICL reads it.
    pub entropy: f64,
}

impl FitSummary {
    pub fn of<M: MixtureModel>(model: &M) -> Self {
        Self {
            log_likelihood: model.log_likelihood(),
            nb_free_parameters: model.nb_free_parameters(),
            nb_observations: model.nb_sample(),
            nb_cluster: model.nb_cluster(),
            entropy: model.entropy(),
        }
    }
}

/// Stateless scorer for one [`CriterionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Criterion {
    kind: CriterionKind,
}

impl Criterion {
    pub fn new(kind: CriterionKind) -> Self {
        Self { kind }
    }

    /// Build from a case-insensitive criterion name.
    ///
    /// # Errors
    /// `MixError::UnknownName` for unrecognized names.
    pub fn from_name(name: &str) -> MixResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn kind(&self) -> CriterionKind {
        self.kind
    }

    /// Score a fit summary; lower is better.
    ///
    /// # Errors
    /// - `MixError::NonFiniteLogLikelihood` for a non-finite `ℓ`.
    /// - `MixError::EmptyData` when `nb_observations == 0`.
    pub fn score(&self, fit: &FitSummary) -> MixResult<f64> {
        if !fit.log_likelihood.is_finite() {
            return Err(MixError::NonFiniteLogLikelihood { value: fit.log_likelihood });
        }
        if fit.nb_observations == 0 {
            return Err(MixError::EmptyData);
        }
        let deviance = -2.0 * fit.log_likelihood;
        let p = fit.nb_free_parameters as f64;
        let bic = || deviance + p * (fit.nb_observations as f64).ln();
        Ok(match self.kind {
            CriterionKind::Aic => deviance + 2.0 * p,
            CriterionKind::Bic => bic(),
            CriterionKind::Icl => bic() + 2.0 * fit.entropy.max(0.0),
            CriterionKind::Ml => deviance,
        })
    }

    /// Score a fitted model.
    ///
    /// # Errors
    /// As [`Criterion::score`].
    pub fn evaluate<M: MixtureModel>(&self, model: &M) -> MixResult<f64> {
        self.score(&FitSummary::of(model))
    }
}

/// Outcome of [`select_model`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub best: usize,
    pub scores: Vec<f64>,
}

/// Rank fitted candidates by `criterion`.
///
/// # Errors
/// - `MixError::NoCandidate` for an empty slice.
/// - Any scoring error of a candidate.
pub fn select_model<M: MixtureModel>(candidates: &[M], criterion: &Criterion) -> MixResult<Selection> {
    if candidates.is_empty() {
        return Err(MixError::NoCandidate);
    }
    let scores = candidates.iter().map(|m| criterion.evaluate(m)).collect::<MixResult<Vec<_>>>()?;
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s < scores[best] {
            best = i;
        }
    }
    Ok(Selection { best, scores })
}
