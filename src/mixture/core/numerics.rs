//! Numerical helpers shared by the mixture composer and the algorithms.
//!
//! # Provided items
//! - [`log_sum_exp`]: stable `ln Σ exp(v_k)` for posterior normalization.
//! - [`argmax_lowest`]: argmax with ties broken by the lowest index.
//! - [`sample_categorical`]: draw an index from a probability row.
//! - [`entropy`]: `-Σ t ln t` over a posterior matrix.
//! - [`relative_change`]: convergence measure between consecutive
//!   log-likelihoods.
use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

/// Clusters whose summed posterior weight falls below this floor are
/// considered empty.
pub const MIN_CLUSTER_WEIGHT: f64 = 1e-8;

/// Tolerance on `|Σ_k t_ik − 1|` and `|Σ_k p_k − 1|`.
pub const PROBABILITY_TOL: f64 = 1e-8;

/// Stable log-sum-exp of a vector of log-values.
///
/// Returns `-inf` when every entry is `-inf` (or the slice is empty).
pub fn log_sum_exp(values: ArrayView1<'_, f64>) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|&v| (v - max).exp()).sum::<f64>().ln()
}

/// Index of the largest entry; on ties the lowest index wins.
///
/// NaN entries are never selected unless every entry is NaN, in which case
/// index 0 is returned.
pub fn argmax_lowest(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (k, &v) in row.iter().enumerate() {
        if v > best_value {
            best = k;
            best_value = v;
        }
    }
    best
}

/// Draw an index with probability proportional to `probs`.
///
/// `probs` is assumed non-negative; it does not need to be normalized.
/// Falls back to [`argmax_lowest`] if the total mass is not positive.
pub fn sample_categorical<R: Rng + ?Sized>(probs: ArrayView1<'_, f64>, rng: &mut R) -> usize {
    let total: f64 = probs.sum();
    if !total.is_finite() || total <= 0.0 {
        return argmax_lowest(probs);
    }
    let u = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (k, &p) in probs.iter().enumerate() {
        if p > 0.0 {
            last_positive = k;
        }
        cumulative += p;
        if u < cumulative {
            return k;
        }
    }
    last_positive
}

/// Shannon entropy `-Σ_i Σ_k t_ik ln t_ik` of a posterior matrix.
pub fn entropy(tik: ArrayView2<'_, f64>) -> f64 {
    tik.iter().filter(|&&t| t > 0.0).map(|&t| -t * t.ln()).sum()
}

/// Relative change `|current − previous| / |current|` between two
/// log-likelihood values.
///
/// Returns `+inf` when `previous` is not finite (first iteration).
pub fn relative_change(previous: f64, current: f64) -> f64 {
    if !previous.is_finite() {
        return f64::INFINITY;
    }
    (current - previous).abs() / current.abs().max(f64::MIN_POSITIVE)
}
