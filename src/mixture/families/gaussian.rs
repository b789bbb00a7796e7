//! Diagonal Gaussian family: mean and standard deviation free per cluster
//! and per variable.
//!
//! Component density
//! -----------------
//! `f_k(x) = Π_j N(x_j; μ_kj, σ_kj²)`, evaluated in log scale through
//! `statrs::distribution::Normal`.
//!
//! M-step
//! ------
//! Closed form: `μ_kj = Σ_i t_ik x_ij / n_k`,
//! `σ_kj² = Σ_i t_ik (x_ij − μ_kj)² / n_k`. A variance at or below the
//! family's `min_variance` floor is a degenerate update and aborts the step.
use crate::mixture::{
    core::{
        family::Family,
        handler::{ParamShape, ParametersHandler},
        statistics::VectorStatistic,
    },
    errors::{MixError, MixResult},
};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use statrs::distribution::{Continuous, Normal};

/// Default floor on per-cluster variances.
pub const DEFAULT_MIN_VARIANCE: f64 = 1e-10;

/// Diagonal Gaussian family configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagGaussian {
    pub min_variance: f64,
}

impl DiagGaussian {
    /// Create a family with a custom variance floor.
    ///
    /// # Errors
    /// Returns `MixError::InvalidFamilyOption` if `min_variance` is not
    /// finite and strictly positive.
    pub fn new(min_variance: f64) -> MixResult<Self> {
        if !min_variance.is_finite() || min_variance <= 0.0 {
            return Err(MixError::InvalidFamilyOption {
                name: "min_variance",
                value: min_variance,
                reason: "Variance floor must be finite and strictly positive.",
            });
        }
        Ok(Self { min_variance })
    }
}

impl Default for DiagGaussian {
    fn default() -> Self {
        Self { min_variance: DEFAULT_MIN_VARIANCE }
    }
}

/// Means and standard deviations, both `K × d`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianParams {
    pub mean: Array2<f64>,
    pub sigma: Array2<f64>,
}

impl Family for DiagGaussian {
    type Params = GaussianParams;
    type Handler = GaussianHandler;

    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn validate_data(&self, _data: ArrayView2<'_, f64>) -> MixResult<()> {
        Ok(())
    }

    fn new_params(&self, shape: ParamShape) -> GaussianParams {
        let dim = (shape.nb_cluster, shape.nb_variable);
        GaussianParams { mean: Array2::zeros(dim), sigma: Array2::ones(dim) }
    }

    fn nb_free_parameters(&self, shape: ParamShape) -> usize {
        2 * shape.nb_cluster * shape.nb_variable
    }

    fn ln_component_density(
        &self, params: &GaussianParams, x: ArrayView1<'_, f64>, k: usize,
    ) -> MixResult<f64> {
        let mut total = 0.0;
        for (j, &xj) in x.iter().enumerate() {
            let sigma = params.sigma[[k, j]];
            let normal = Normal::new(params.mean[[k, j]], sigma).map_err(|_| {
                MixError::DegenerateParameter {
                    cluster: k,
                    variable: j,
                    value: sigma,
                    reason: "Gaussian standard deviation must be finite and strictly positive.",
                }
            })?;
            total += normal.ln_pdf(xj);
        }
        Ok(total)
    }

    fn m_step(
        &self, params: &mut GaussianParams, data: ArrayView2<'_, f64>, tik: ArrayView2<'_, f64>,
        nk: ArrayView1<'_, f64>,
    ) -> MixResult<()> {
        for (k, weights) in tik.axis_iter(Axis(1)).enumerate() {
            let mean = weights.dot(&data) / nk[k];
            let centered = &data - &mean;
            let variance = weights.dot(&centered.mapv(|v| v * v)) / nk[k];
            if let Some((variable, &value)) =
                variance.indexed_iter().find(|(_, v)| !v.is_finite() || **v <= self.min_variance)
            {
                return Err(MixError::DegenerateParameter {
                    cluster: k,
                    variable,
                    value,
                    reason: "Gaussian variance collapsed below the admissible floor.",
                });
            }
            params.mean.row_mut(k).assign(&mean);
            params.sigma.row_mut(k).assign(&variance.mapv(f64::sqrt));
        }
        Ok(())
    }

    fn random_params<R: Rng + ?Sized>(
        &self, params: &mut GaussianParams, data: ArrayView2<'_, f64>, rng: &mut R,
    ) -> MixResult<()> {
        let floor = self.min_variance.sqrt();
        let spread = data.std_axis(Axis(0), 0.0).mapv(|s| s.max(floor));
        for k in 0..params.mean.nrows() {
            let i = rng.random_range(0..data.nrows());
            params.mean.row_mut(k).assign(&data.row(i));
            params.sigma.row_mut(k).assign(&spread);
        }
        Ok(())
    }
}

/// Running means of `μ_k` and `σ_k`, one vector accumulator per cluster each.
#[derive(Debug, Clone)]
pub struct GaussianHandler {
    shape: ParamShape,
    mean: Vec<VectorStatistic>,
    sigma: Vec<VectorStatistic>,
}

impl Default for GaussianHandler {
    fn default() -> Self {
        Self { shape: ParamShape::new(0, 0), mean: Vec::new(), sigma: Vec::new() }
    }
}

impl ParametersHandler for GaussianHandler {
    type Params = GaussianParams;

    fn resize(&mut self, shape: ParamShape) {
        self.shape = shape;
        self.mean = (0..shape.nb_cluster).map(|_| VectorStatistic::new(shape.nb_variable)).collect();
        self.sigma = self.mean.clone();
    }

    fn shape(&self) -> ParamShape {
        self.shape
    }

    fn update_statistics(&mut self, params: &GaussianParams) {
        for (k, (mean, sigma)) in self.mean.iter_mut().zip(self.sigma.iter_mut()).enumerate() {
            mean.update(&params.mean.row(k));
            sigma.update(&params.sigma.row(k));
        }
    }

    fn set_statistics(&mut self, params: &mut GaussianParams) {
        for (k, (mean, sigma)) in self.mean.iter_mut().zip(self.sigma.iter_mut()).enumerate() {
            if let Some(m) = mean.mean() {
                params.mean.row_mut(k).assign(m);
            }
            if let Some(s) = sigma.mean() {
                params.sigma.row_mut(k).assign(s);
            }
            mean.release();
            sigma.release();
        }
    }

    fn release_statistics(&mut self) {
        self.mean.iter_mut().chain(self.sigma.iter_mut()).for_each(VectorStatistic::release);
    }

    fn nb_updates(&self) -> usize {
        self.mean.first().map_or(0, VectorStatistic::count)
    }
}
