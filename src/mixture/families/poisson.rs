//! Poisson family: one rate per cluster and per variable.
//!
//! `f_k(x) = Π_j Poisson(x_j; λ_kj)` over non-negative integer counts, with
//! the closed-form M-step `λ_kj = Σ_i t_ik x_ij / n_k`. A cluster whose counts
//! on a variable are all zero has its rate floored at `min_rate` instead of
//! degenerating to an all-or-nothing density.
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
use statrs::distribution::{Discrete, Poisson};

pub const DEFAULT_MIN_RATE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonFamily {
    pub min_rate: f64,
}

impl PoissonFamily {
    /// # Errors
    /// Returns `MixError::InvalidFamilyOption` unless `min_rate` is finite
    /// and strictly positive.
    pub fn new(min_rate: f64) -> MixResult<Self> {
        if !min_rate.is_finite() || min_rate <= 0.0 {
            return Err(MixError::InvalidFamilyOption {
                name: "min_rate",
                value: min_rate,
                reason: "Rate floor must be finite and strictly positive.",
            });
        }
        Ok(Self { min_rate })
    }
}

impl Default for PoissonFamily {
    fn default() -> Self {
        Self { min_rate: DEFAULT_MIN_RATE }
    }
}

/// Rates `λ`, `K × d`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonParams {
    pub lambda: Array2<f64>,
}

impl Family for PoissonFamily {
    type Params = PoissonParams;
    type Handler = PoissonHandler;

    fn name(&self) -> &'static str {
        "poisson"
    }

    fn validate_data(&self, data: ArrayView2<'_, f64>) -> MixResult<()> {
        match data.indexed_iter().find(|(_, v)| **v < 0.0 || v.fract() != 0.0) {
            Some(((row, col), &value)) => Err(MixError::InvalidData {
                row,
                col,
                value,
                reason: "Poisson observations must be non-negative integers.",
            }),
            None => Ok(()),
        }
    }

    fn new_params(&self, shape: ParamShape) -> PoissonParams {
        PoissonParams { lambda: Array2::ones((shape.nb_cluster, shape.nb_variable)) }
    }

    fn nb_free_parameters(&self, shape: ParamShape) -> usize {
        shape.nb_cluster * shape.nb_variable
    }

    fn ln_component_density(
        &self, params: &PoissonParams, x: ArrayView1<'_, f64>, k: usize,
    ) -> MixResult<f64> {
        let mut total = 0.0;
        for (j, &xj) in x.iter().enumerate() {
            let lambda = params.lambda[[k, j]];
            let poisson = Poisson::new(lambda).map_err(|_| MixError::DegenerateParameter {
                cluster: k,
                variable: j,
                value: lambda,
                reason: "Poisson rate must be finite and strictly positive.",
            })?;
            total += poisson.ln_pmf(xj as u64);
        }
        Ok(total)
    }

    fn m_step(
        &self, params: &mut PoissonParams, data: ArrayView2<'_, f64>, tik: ArrayView2<'_, f64>,
        nk: ArrayView1<'_, f64>,
    ) -> MixResult<()> {
        for (k, weights) in tik.axis_iter(Axis(1)).enumerate() {
            let rates = weights.dot(&data) / nk[k];
            if let Some((variable, &value)) = rates.indexed_iter().find(|(_, v)| !v.is_finite()) {
                return Err(MixError::DegenerateParameter {
                    cluster: k,
                    variable,
                    value,
                    reason: "Poisson rate is not finite.",
                });
            }
            params.lambda.row_mut(k).assign(&rates.mapv(|r| r.max(self.min_rate)));
        }
        Ok(())
    }

    fn random_params<R: Rng + ?Sized>(
        &self, params: &mut PoissonParams, data: ArrayView2<'_, f64>, rng: &mut R,
    ) -> MixResult<()> {
        let mean = data.mean_axis(Axis(0)).ok_or(MixError::EmptyData)?;
        for k in 0..params.lambda.nrows() {
            let i = rng.random_range(0..data.nrows());
            // Halfway between a random observation and the pooled mean.
            let rates = (&data.row(i) + &mean).mapv(|v| (0.5 * v).max(self.min_rate));
            params.lambda.row_mut(k).assign(&rates);
        }
        Ok(())
    }
}

/// One vector accumulator of rates per cluster.
#[derive(Debug, Clone)]
pub struct PoissonHandler {
    shape: ParamShape,
    lambda: Vec<VectorStatistic>,
}

impl Default for PoissonHandler {
    fn default() -> Self {
        Self { shape: ParamShape::new(0, 0), lambda: Vec::new() }
    }
}

impl ParametersHandler for PoissonHandler {
    type Params = PoissonParams;

    fn resize(&mut self, shape: ParamShape) {
        self.shape = shape;
        self.lambda = (0..shape.nb_cluster).map(|_| VectorStatistic::new(shape.nb_variable)).collect();
    }

    fn shape(&self) -> ParamShape {
        self.shape
    }

    fn update_statistics(&mut self, params: &PoissonParams) {
        for (k, stat) in self.lambda.iter_mut().enumerate() {
            stat.update(&params.lambda.row(k));
        }
    }

    fn set_statistics(&mut self, params: &mut PoissonParams) {
        for (k, stat) in self.lambda.iter_mut().enumerate() {
            if let Some(m) = stat.mean() {
                params.lambda.row_mut(k).assign(m);
            }
            stat.release();
        }
    }

    fn release_statistics(&mut self) {
        self.lambda.iter_mut().for_each(VectorStatistic::release);
    }

    fn nb_updates(&self) -> usize {
        self.lambda.first().map_or(0, VectorStatistic::count)
    }
}
