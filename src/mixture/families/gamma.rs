//! Gamma family with a cluster-specific shape and a scale shared by all
//! clusters (per variable).
//!
//! Component density
//! -----------------
//! `f_k(x) = Π_j Gamma(x_j; a_kj, b_j)` with shape `a_kj > 0` and scale
//! `b_j > 0`, evaluated through `statrs::distribution::Gamma` (rate `1/b_j`).
//!
//! M-step
//! ------
//! For each variable `j`, with weighted moments `x̄_k = Σ t_ik x_ij / n_k`
//! and `ℓ̄_k = Σ t_ik ln x_ij / n_k`, the likelihood equations are
//!
//! ```text
//! ψ(a_kj) = ℓ̄_k − ln b_j               for every k
//! b_j Σ_k n_k a_kj = Σ_k n_k x̄_k
//! ```
//!
//! Substituting `a_kj(b) = ψ⁻¹(ℓ̄_k − ln b)` leaves the scalar equation
//! `H(b) = b Σ_k n_k a_kj(b) − Σ_k n_k x̄_k = 0`. `H` is strictly increasing
//! with `H(0+) <= 0` (arithmetic-geometric mean inequality), so its root is
//! unique. It is bracketed around the moment estimate and solved with Brent's
//! method; every evaluation of `H` inverts the digamma function with an inner
//! Brent solve.
//!
//! Invariants & assumptions
//! ------------------------
//! - Data are strictly positive.
//! - A cluster whose observations are all equal on a variable has no finite
//!   shape estimate; the step aborts with a degenerate-parameter error.
use crate::{
    mixture::{
        core::{
            family::Family,
            handler::{ParamShape, ParametersHandler},
            statistics::VectorStatistic,
        },
        errors::{MixError, MixResult},
    },
    optimization::{
        errors::OptResult,
        root_finding::{RootOptions, bracket_positive, expand_upper, find_root},
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use statrs::{
    distribution::{Continuous, Gamma},
    function::gamma::digamma,
};

/// Smallest admissible shape; lower end of every digamma bracket.
pub const MIN_SHAPE: f64 = 1e-8;

/// Gamma family configuration: tolerances of the inner and outer root solves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GammaFamily {
    pub root_options: RootOptions,
}

impl GammaFamily {
    pub const fn new(root_options: RootOptions) -> Self {
        Self { root_options }
    }

    /// Invert the digamma function: solve `ψ(a) = target` for `a >= MIN_SHAPE`.
    fn inverse_digamma(&self, target: f64) -> OptResult<f64> {
        let equation = |a: f64| digamma(a) - target;
        let upper = expand_upper(&equation, MIN_SHAPE, 1.0)?;
        Ok(find_root(equation, MIN_SHAPE, upper, &self.root_options)?.root)
    }

    /// Solve the shared scale of one variable and the matching shapes.
    fn fit_variable(
        &self, x: ArrayView1<'_, f64>, tik: ArrayView2<'_, f64>, nk: ArrayView1<'_, f64>,
        variable: usize,
    ) -> MixResult<(Array1<f64>, f64)> {
        let nb_cluster = nk.len();
        let ln_x = x.mapv(f64::ln);
        let mut mean = Array1::<f64>::zeros(nb_cluster);
        let mut mean_ln = Array1::<f64>::zeros(nb_cluster);
        let mut moment_shape = Array1::<f64>::zeros(nb_cluster);
        for (k, w) in tik.axis_iter(Axis(1)).enumerate() {
            mean[k] = w.dot(&x) / nk[k];
            mean_ln[k] = w.dot(&ln_x) / nk[k];
            let var = w.dot(&x.mapv(|v| (v - mean[k]) * (v - mean[k]))) / nk[k];
            if !(var.is_finite() && var > 0.0) {
                return Err(MixError::DegenerateParameter {
                    cluster: k,
                    variable,
                    value: var,
                    reason: "Gamma cluster has no spread; its shape is unbounded.",
                });
            }
            moment_shape[k] = mean[k] * mean[k] / var;
        }

        let total_mass = nk.dot(&mean);
        let excess = |b: f64| -> f64 {
            let mut weighted_shape = 0.0;
            for k in 0..nb_cluster {
                match self.inverse_digamma(mean_ln[k] - b.ln()) {
                    Ok(a) => weighted_shape += nk[k] * a,
                    Err(_) => return f64::NAN,
                }
            }
            b * weighted_shape - total_mass
        };
        let guess = total_mass / nk.dot(&moment_shape);
        let (lower, upper) = bracket_positive(&excess, guess)?;
        let scale = find_root(excess, lower, upper, &self.root_options)?.root;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MixError::DegenerateParameter {
                cluster: 0,
                variable,
                value: scale,
                reason: "Shared Gamma scale must be finite and strictly positive.",
            });
        }
        let mut shapes = Array1::<f64>::zeros(nb_cluster);
        for k in 0..nb_cluster {
            shapes[k] = self.inverse_digamma(mean_ln[k] - scale.ln())?;
        }
        Ok((shapes, scale))
    }
}

/// Shapes (`K × d`) and shared scales (`d`).
#[derive(Debug, Clone, PartialEq)]
pub struct GammaParams {
    pub shape: Array2<f64>,
    pub scale: Array1<f64>,
}

impl Family for GammaFamily {
    type Params = GammaParams;
    type Handler = GammaHandler;

    fn name(&self) -> &'static str {
        "gamma"
    }

    fn validate_data(&self, data: ArrayView2<'_, f64>) -> MixResult<()> {
        match data.indexed_iter().find(|(_, v)| **v <= 0.0) {
            Some(((row, col), &value)) => Err(MixError::InvalidData {
                row,
                col,
                value,
                reason: "Gamma observations must be strictly positive.",
            }),
            None => Ok(()),
        }
    }

    fn new_params(&self, shape: ParamShape) -> GammaParams {
        GammaParams {
            shape: Array2::ones((shape.nb_cluster, shape.nb_variable)),
            scale: Array1::ones(shape.nb_variable),
        }
    }

    fn nb_free_parameters(&self, shape: ParamShape) -> usize {
        shape.nb_cluster * shape.nb_variable + shape.nb_variable
    }

    fn ln_component_density(
        &self, params: &GammaParams, x: ArrayView1<'_, f64>, k: usize,
    ) -> MixResult<f64> {
        let mut total = 0.0;
        for (j, &xj) in x.iter().enumerate() {
            let a = params.shape[[k, j]];
            let b = params.scale[j];
            let gamma = Gamma::new(a, 1.0 / b).map_err(|_| MixError::DegenerateParameter {
                cluster: k,
                variable: j,
                value: if a.is_finite() && a > 0.0 { b } else { a },
                reason: "Gamma shape and scale must be finite and strictly positive.",
            })?;
            total += gamma.ln_pdf(xj);
        }
        Ok(total)
    }

    fn m_step(
        &self, params: &mut GammaParams, data: ArrayView2<'_, f64>, tik: ArrayView2<'_, f64>,
        nk: ArrayView1<'_, f64>,
    ) -> MixResult<()> {
        for (j, x) in data.axis_iter(Axis(1)).enumerate() {
            let (shapes, scale) = self.fit_variable(x, tik, nk, j)?;
            params.shape.column_mut(j).assign(&shapes);
            params.scale[j] = scale;
        }
        Ok(())
    }

    fn random_params<R: Rng + ?Sized>(
        &self, params: &mut GammaParams, data: ArrayView2<'_, f64>, rng: &mut R,
    ) -> MixResult<()> {
        let mean = data.mean_axis(Axis(0)).ok_or(MixError::EmptyData)?;
        let var = data.var_axis(Axis(0), 0.0);
        for j in 0..data.ncols() {
            // Moment scale of the pooled variable, then each cluster centred on
            // a random observation.
            let scale = if var[j] > 0.0 { var[j] / mean[j] } else { mean[j] };
            params.scale[j] = scale;
            for k in 0..params.shape.nrows() {
                let i = rng.random_range(0..data.nrows());
                params.shape[[k, j]] = (data[[i, j]] / scale).max(MIN_SHAPE.sqrt());
            }
        }
        Ok(())
    }
}

/// Running means of the per-cluster shapes and the shared scale.
#[derive(Debug, Clone)]
pub struct GammaHandler {
    shape_dims: ParamShape,
    shape: Vec<VectorStatistic>,
    scale: VectorStatistic,
}

impl Default for GammaHandler {
    fn default() -> Self {
        Self { shape_dims: ParamShape::new(0, 0), shape: Vec::new(), scale: VectorStatistic::new(0) }
    }
}

impl ParametersHandler for GammaHandler {
    type Params = GammaParams;

    fn resize(&mut self, shape: ParamShape) {
        self.shape_dims = shape;
        self.shape = (0..shape.nb_cluster).map(|_| VectorStatistic::new(shape.nb_variable)).collect();
        self.scale = VectorStatistic::new(shape.nb_variable);
    }

    fn shape(&self) -> ParamShape {
        self.shape_dims
    }

    fn update_statistics(&mut self, params: &GammaParams) {
        for (k, stat) in self.shape.iter_mut().enumerate() {
            stat.update(&params.shape.row(k));
        }
        self.scale.update(&params.scale);
    }

    fn set_statistics(&mut self, params: &mut GammaParams) {
        for (k, stat) in self.shape.iter_mut().enumerate() {
            if let Some(m) = stat.mean() {
                params.shape.row_mut(k).assign(m);
            }
            stat.release();
        }
        if let Some(m) = self.scale.mean() {
            params.scale.assign(m);
        }
        self.scale.release();
    }

    fn release_statistics(&mut self) {
        self.shape.iter_mut().for_each(VectorStatistic::release);
        self.scale.release();
    }

    fn nb_updates(&self) -> usize {
        self.scale.count()
    }
}
