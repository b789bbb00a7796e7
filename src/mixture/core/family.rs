//! Distribution-family contract plugged into the generic
//! [`Mixture`](crate::mixture::core::composer::Mixture) composer.
//!
//! A family knows how to size, evaluate, re-estimate and randomly draw its
//! own parameters; the composer owns proportions, posteriors and the
//! step choreography.
use crate::mixture::{
    core::handler::{ParamShape, ParametersHandler},
    errors::MixResult,
};
use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

pub trait Family: Clone + std::fmt::Debug {
    type Params: Clone + std::fmt::Debug + PartialEq;
    type Handler: ParametersHandler<Params = Self::Params> + Default + Clone + std::fmt::Debug;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Reject data outside the family's support. Finiteness is already
    /// checked by the composer.
    fn validate_data(&self, data: ArrayView2<'_, f64>) -> MixResult<()>;

    /// Parameter struct sized for `shape`, filled with placeholder values.
    fn new_params(&self, shape: ParamShape) -> Self::Params;

    /// Free component parameters (proportions excluded).
    fn nb_free_parameters(&self, shape: ParamShape) -> usize;

    /// `ln f_k(x)` for one observation row `x` and cluster `k`.
    fn ln_component_density(
        &self, params: &Self::Params, x: ArrayView1<'_, f64>, k: usize,
    ) -> MixResult<f64>;

    /// Weighted maximum-likelihood update given posteriors `tik` (N × K) and
    /// their column sums `nk` (all above the empty-cluster floor).
    fn m_step(
        &self, params: &mut Self::Params, data: ArrayView2<'_, f64>, tik: ArrayView2<'_, f64>,
        nk: ArrayView1<'_, f64>,
    ) -> MixResult<()>;

    /// Draw admissible starting parameters from the data.
    fn random_params<R: Rng + ?Sized>(
        &self, params: &mut Self::Params, data: ArrayView2<'_, f64>, rng: &mut R,
    ) -> MixResult<()>;
}
