//! Parameter-averaging contract between a family's parameter struct and a
//! set of [`OnlineStatistic`](crate::mixture::core::statistics::OnlineStatistic)
//! accumulators.
//!
//! Each distribution family decomposes its parameters differently (shared
//! across clusters, free per cluster, free per cluster and variable). A
//! handler is a flat struct of accumulators mirroring that decomposition, so
//! stochastic algorithms can average simulated parameter draws without
//! knowing anything about the family.

/// Number of clusters and variables a parameter set is sized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub nb_cluster: usize,
    pub nb_variable: usize,
}

impl ParamShape {
    pub const fn new(nb_cluster: usize, nb_variable: usize) -> Self {
        Self { nb_cluster, nb_variable }
    }
}

/// Running-mean bridge for one family's parameter struct.
///
/// Lifecycle per stochastic run:
/// 1. `resize` to the live model's shape (before the first update).
/// 2. `update_statistics` once per post-burn-in iteration.
/// 3. Either `set_statistics` (harvest the means into the model, then
///    reset) or `release_statistics` (discard, e.g. after a failed step).
pub trait ParametersHandler {
    type Params;

    /// Re-shape every accumulator, discarding accumulated values.
    fn resize(&mut self, shape: ParamShape);

    /// Shape the accumulators are currently sized for.
    fn shape(&self) -> ParamShape;

    /// Fold the current parameter values into every accumulator, visiting
    /// each cluster / variable slot exactly once.
    fn update_statistics(&mut self, params: &Self::Params);

    /// Write every accumulated mean into `params`, then release all
    /// accumulators. Slots that were never updated are left untouched.
    fn set_statistics(&mut self, params: &mut Self::Params);

    /// Release every accumulator without writing anything.
    fn release_statistics(&mut self);

    /// Number of `update_statistics` calls since the last harvest/release.
    fn nb_updates(&self) -> usize;
}
