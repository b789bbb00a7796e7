//! Generic mixture composer: proportions, posteriors and step choreography
//! around one distribution [`Family`].
//!
//! Purpose
//! -------
//! [`Mixture<F>`] is the concrete [`MixtureModel`] every reference family is
//! used through. It owns the data (shared behind an `Arc` so candidates for
//! several K can reuse one matrix), the mixing proportions `p_k`, the
//! posterior matrix `t_ik`, the hard partition `z_i`, and the family's
//! parameter struct. Everything family-specific is delegated to `F`.
//!
//! Key behaviors
//! -------------
//! - `e_step` evaluates `ln p_k + ln f_k(x_i)` per row and normalizes with a
//!   log-sum-exp, so posteriors rows sum to one even when every density
//!   underflows in linear scale.
//! - `m_step` rejects clusters whose summed posterior weight falls below
//!   [`MIN_CLUSTER_WEIGHT`] before delegating to the family.
//! - `c_step` hardens with ties resolved to the lowest cluster index.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 <= K <= N`, data finite and inside the family's support (checked at
//!   construction).
//! - K and N never change after construction.
use crate::mixture::{
    core::{
        family::Family,
        handler::{ParamShape, ParametersHandler},
        model::MixtureModel,
        numerics::{MIN_CLUSTER_WEIGHT, PROBABILITY_TOL, argmax_lowest, log_sum_exp, sample_categorical},
    },
    errors::{MixError, MixResult},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use std::sync::Arc;

/// Finite mixture of `K` components of family `F` over an `N × d` data set.
#[derive(Debug, Clone)]
pub struct Mixture<F: Family> {
    family: F,
    data: Arc<Array2<f64>>,
    params: F::Params,
    proportions: Array1<f64>,
    tik: Array2<f64>,
    zi: Array1<usize>,
    ln_likelihood: f64,
    ln_buf: Array1<f64>,
}

impl<F: Family> Mixture<F> {
    /// Build a `K`-component mixture over an owned data matrix.
    ///
    /// # Errors
    /// Configuration-class [`MixError`] when the data is empty, contains
    /// non-finite values or values outside the family's support, or when
    /// `nb_cluster` is outside `1..=N`.
    pub fn new(family: F, data: Array2<f64>, nb_cluster: usize) -> MixResult<Self> {
        Self::with_shared_data(family, Arc::new(data), nb_cluster)
    }

    /// Same as [`Mixture::new`] but reuses an already shared data matrix.
    pub fn with_shared_data(family: F, data: Arc<Array2<f64>>, nb_cluster: usize) -> MixResult<Self> {
        let (nb_sample, nb_variable) = data.dim();
        if nb_sample == 0 || nb_variable == 0 {
            return Err(MixError::EmptyData);
        }
        if let Some(((row, col), &value)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(MixError::NonFiniteData { row, col, value });
        }
        if nb_cluster == 0 {
            return Err(MixError::InvalidNbCluster {
                nb_cluster,
                nb_sample,
                reason: "At least one cluster is required.",
            });
        }
        if nb_cluster > nb_sample {
            return Err(MixError::InvalidNbCluster {
                nb_cluster,
                nb_sample,
                reason: "Number of clusters cannot exceed the number of observations.",
            });
        }
        family.validate_data(data.view())?;

        let shape = ParamShape::new(nb_cluster, nb_variable);
        let uniform = 1.0 / nb_cluster as f64;
        Ok(Self {
            params: family.new_params(shape),
            family,
            data,
            proportions: Array1::from_elem(nb_cluster, uniform),
            tik: Array2::from_elem((nb_sample, nb_cluster), uniform),
            zi: Array1::zeros(nb_sample),
            ln_likelihood: f64::NEG_INFINITY,
            ln_buf: Array1::zeros(nb_cluster),
        })
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Shared handle on the data matrix, for building sibling candidates.
    pub fn shared_data(&self) -> Arc<Array2<f64>> {
        Arc::clone(&self.data)
    }

    /// Hard partition `z_i` (MAP cluster of each observation).
    pub fn predict(&self) -> Array1<usize> {
        self.zi.clone()
    }

    fn harden_row(&mut self, i: usize, k: usize) {
        let mut row = self.tik.row_mut(i);
        row.fill(0.0);
        row[k] = 1.0;
        self.zi[i] = k;
    }
}

impl<F: Family> MixtureModel for Mixture<F> {
    type Params = F::Params;
    type Handler = F::Handler;

    fn nb_cluster(&self) -> usize {
        self.proportions.len()
    }

    fn nb_sample(&self) -> usize {
        self.data.nrows()
    }

    fn nb_variable(&self) -> usize {
        self.data.ncols()
    }

    fn nb_free_parameters(&self) -> usize {
        (self.nb_cluster() - 1) + self.family.nb_free_parameters(self.shape())
    }

    fn log_likelihood(&self) -> f64 {
        self.ln_likelihood
    }

    fn proportions(&self) -> ArrayView1<'_, f64> {
        self.proportions.view()
    }

    fn tik(&self) -> ArrayView2<'_, f64> {
        self.tik.view()
    }

    fn zi(&self) -> ArrayView1<'_, usize> {
        self.zi.view()
    }

    fn params(&self) -> &F::Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut F::Params {
        &mut self.params
    }

    fn set_proportions(&mut self, proportions: ArrayView1<'_, f64>) -> MixResult<()> {
        let len = proportions.len();
        let sum = proportions.sum();
        if len != self.nb_cluster() {
            return Err(MixError::InvalidProportions {
                len,
                sum,
                reason: "Proportions length must equal the number of clusters.",
            });
        }
        if proportions.iter().any(|&p| !p.is_finite() || p < 0.0) {
            return Err(MixError::InvalidProportions {
                len,
                sum,
                reason: "Proportions must be finite and non-negative.",
            });
        }
        if (sum - 1.0).abs() > PROBABILITY_TOL.sqrt() {
            return Err(MixError::InvalidProportions {
                len,
                sum,
                reason: "Proportions must sum to one.",
            });
        }
        self.proportions.assign(&proportions);
        self.proportions /= sum;
        Ok(())
    }

    fn set_tik(&mut self, mut tik: Array2<f64>) -> MixResult<()> {
        let expected = (self.nb_sample(), self.nb_cluster());
        if tik.dim() != expected {
            return Err(MixError::TikShapeMismatch { expected, found: tik.dim() });
        }
        let mut zi = Array1::zeros(expected.0);
        for (mut row, label) in tik.axis_iter_mut(Axis(0)).zip(zi.iter_mut()) {
            let total = row.sum();
            if row.iter().any(|&t| !t.is_finite() || t < 0.0) || total <= 0.0 {
                return Err(MixError::InvalidProportions {
                    len: row.len(),
                    sum: total,
                    reason: "Posterior rows must be non-negative with positive mass.",
                });
            }
            row /= total;
            *label = argmax_lowest(row.view());
        }
        self.tik = tik;
        self.zi = zi;
        Ok(())
    }

    fn new_handler(&self) -> F::Handler {
        let mut handler = F::Handler::default();
        handler.resize(self.shape());
        handler
    }

    fn e_step(&mut self) -> MixResult<()> {
        let ln_pk = self.proportions.mapv(f64::ln);
        let mut total = 0.0;
        for (i, x) in self.data.axis_iter(Axis(0)).enumerate() {
            for k in 0..ln_pk.len() {
                self.ln_buf[k] = ln_pk[k] + self.family.ln_component_density(&self.params, x, k)?;
            }
            let ln_row = log_sum_exp(self.ln_buf.view());
            if ln_row == f64::NEG_INFINITY {
                return Err(MixError::ZeroLikelihood { sample: i });
            }
            if !ln_row.is_finite() {
                return Err(MixError::NonFiniteLogLikelihood { value: ln_row });
            }
            let mut row = self.tik.row_mut(i);
            row.zip_mut_with(&self.ln_buf, |t, &l| *t = (l - ln_row).exp());
            self.zi[i] = argmax_lowest(row.view());
            total += ln_row;
        }
        if !total.is_finite() {
            return Err(MixError::NonFiniteLogLikelihood { value: total });
        }
        self.ln_likelihood = total;
        Ok(())
    }

    fn m_step(&mut self) -> MixResult<()> {
        let nk = self.tik.sum_axis(Axis(0));
        if let Some((cluster, &weight)) = nk.indexed_iter().find(|(_, w)| **w < MIN_CLUSTER_WEIGHT) {
            return Err(MixError::EmptyCluster { cluster, weight });
        }
        self.family.m_step(&mut self.params, self.data.view(), self.tik.view(), nk.view())?;
        self.proportions = nk / self.nb_sample() as f64;
        Ok(())
    }

    fn c_step(&mut self) {
        for i in 0..self.nb_sample() {
            let k = argmax_lowest(self.tik.row(i));
            self.harden_row(i, k);
        }
    }

    fn s_step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.nb_sample() {
            let k = sample_categorical(self.tik.row(i), rng);
            self.harden_row(i, k);
        }
    }

    fn random_init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MixResult<()> {
        self.proportions.fill(1.0 / self.nb_cluster() as f64);
        self.family.random_params(&mut self.params, self.data.view(), rng)
    }
}
