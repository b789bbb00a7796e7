//! The mixture-model contract driven by the estimation engine.
//!
//! Algorithms, initializers and strategies are written once against
//! [`MixtureModel`]; they never see a concrete distribution family.
//!
//! Step semantics
//! --------------
//! - `e_step`: recompute posteriors `t_ik`, the hard partition `z_i`, and the
//!   observed-data log-likelihood from the current parameters.
//! - `m_step`: recompute proportions and family parameters from the current
//!   posteriors (soft or hardened).
//! - `c_step`: harden posteriors to one-hot rows (argmax, lowest index wins).
//! - `s_step`: replace each posterior row by a one-hot draw from it.
//!
//! Steps that cannot produce a valid update return an estimation-class
//! [`MixError`](crate::mixture::errors::MixError); the model is then in an
//! undefined intermediate state and must be discarded or re-initialized.
use crate::mixture::{
    core::{
        handler::{ParamShape, ParametersHandler},
        numerics::entropy,
    },
    errors::MixResult,
};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// Mixture model estimated in place by the engine.
///
/// `Clone` is used by strategies to snapshot the best candidate of a try.
pub trait MixtureModel: Clone {
    /// Family-specific parameter struct.
    type Params: Clone + std::fmt::Debug;
    /// Matching accumulator bundle for stochastic averaging.
    type Handler: ParametersHandler<Params = Self::Params>;

    // ---- Dimensions ----
    fn nb_cluster(&self) -> usize;
    fn nb_sample(&self) -> usize;
    fn nb_variable(&self) -> usize;

    /// Number of free parameters, proportions included.
    fn nb_free_parameters(&self) -> usize;

    fn shape(&self) -> ParamShape {
        ParamShape::new(self.nb_cluster(), self.nb_variable())
    }

    // ---- Current state ----
    /// Observed-data log-likelihood at the last E-step (`-inf` before any).
    fn log_likelihood(&self) -> f64;
    fn proportions(&self) -> ArrayView1<'_, f64>;
    fn tik(&self) -> ArrayView2<'_, f64>;
    fn zi(&self) -> ArrayView1<'_, usize>;
    fn params(&self) -> &Self::Params;
    fn params_mut(&mut self) -> &mut Self::Params;

    /// Entropy `-Σ t_ik ln t_ik` of the current posteriors.
    fn entropy(&self) -> f64 {
        entropy(self.tik())
    }

    // ---- Mutation used by initializers and stochastic averaging ----
    /// Replace the mixing proportions (length K, non-negative, summing to 1).
    fn set_proportions(&mut self, proportions: ArrayView1<'_, f64>) -> MixResult<()>;

    /// Replace the posterior matrix (N × K, non-negative rows with positive
    /// mass; rows are renormalized).
    fn set_tik(&mut self, tik: Array2<f64>) -> MixResult<()>;

    /// Fresh accumulator bundle sized to the model's current shape.
    fn new_handler(&self) -> Self::Handler;

    // ---- Steps ----
    fn e_step(&mut self) -> MixResult<()>;
    fn m_step(&mut self) -> MixResult<()>;
    fn c_step(&mut self);
    fn s_step<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Draw family parameters from a data-driven prior range and reset the
    /// proportions to uniform. Posteriors are stale until the next `e_step`.
    fn random_init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MixResult<()>;
}
