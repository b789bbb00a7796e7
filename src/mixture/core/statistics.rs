//! Online (single-pass) statistics over scalar, vector, or matrix draws.
//!
//! Purpose
//! -------
//! Accumulate the running mean of a stream of parameter values without
//! storing the stream. Stochastic algorithms feed one freshly simulated
//! parameter value per iteration and harvest the mean once at the end.
//!
//! Key behaviors
//! -------------
//! - [`OnlineStatistic::update`] folds one value in O(1) per element using
//!   the incremental rule `mean += (x - mean) / n`, never a raw running sum.
//! - A Welford second moment is carried alongside the mean so the spread of
//!   the stochastic draws can be inspected via [`OnlineStatistic::variance`].
//! - [`OnlineStatistic::release`] empties the accumulator but keeps its
//!   shape; [`OnlineStatistic::resize`] re-shapes and empties it.
//!
//! Invariants & assumptions
//! ------------------------
//! - `mean()` is `None` until at least one `update` has been applied.
//! - Every value passed to `update` has the accumulator's shape; a mismatch
//!   is a programming error and panics (ndarray `Zip` shape check).
//!
//! Conventions
//! -----------
//! - The dimension is generic: [`ScalarStatistic`] (`Ix0`),
//!   [`VectorStatistic`] (`Ix1`), and [`MatrixStatistic`] (`Ix2`).
//! - Variances are population variances (`m2 / n`).
use ndarray::{Array, ArrayBase, Data, Dimension, Ix0, Ix1, Ix2, ShapeBuilder, Zip, arr0};

/// Online mean (and Welford variance) accumulator for an array-valued quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct OnlineStatistic<D: Dimension> {
    mean: Array<f64, D>,
    m2: Array<f64, D>,
    count: usize,
}

/// Accumulator for a single real parameter.
pub type ScalarStatistic = OnlineStatistic<Ix0>;

/// Accumulator for a parameter indexed by variable (or by cluster).
pub type VectorStatistic = OnlineStatistic<Ix1>;

/// Accumulator for a parameter indexed by cluster and variable.
pub type MatrixStatistic = OnlineStatistic<Ix2>;

impl<D: Dimension> OnlineStatistic<D> {
    /// Create an empty accumulator of the given shape.
    pub fn new<Sh>(shape: Sh) -> Self
    where
        Sh: ShapeBuilder<Dim = D>,
    {
        let mean = Array::zeros(shape);
        let m2 = Array::zeros(mean.raw_dim());
        Self { mean, m2, count: 0 }
    }

    /// Fold one observation into the running mean and second moment.
    ///
    /// # Panics
    /// Panics if `value` does not have the accumulator's shape.
    pub fn update<S>(&mut self, value: &ArrayBase<S, D>)
    where
        S: Data<Elem = f64>,
    {
        self.count += 1;
        let n = self.count as f64;
        Zip::from(&mut self.mean).and(&mut self.m2).and(value).for_each(|mean, m2, &x| {
            let delta = x - *mean;
            *mean += delta / n;
            *m2 += delta * (x - *mean);
        });
    }

    /// Running mean, or `None` if nothing has been accumulated.
    pub fn mean(&self) -> Option<&Array<f64, D>> {
        if self.count == 0 { None } else { Some(&self.mean) }
    }

    /// Population variance of the accumulated values, or `None` if empty.
    pub fn variance(&self) -> Option<Array<f64, D>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.m2.mapv(|m2| m2 / n))
    }

    /// Number of values folded in since the last release.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Shape of the tracked quantity.
    pub fn shape(&self) -> &[usize] {
        self.mean.shape()
    }

    /// Forget all accumulated values, keeping the current shape.
    pub fn release(&mut self) {
        self.count = 0;
        self.mean.fill(0.0);
        self.m2.fill(0.0);
    }

    /// Re-shape the accumulator, discarding any accumulated values.
    pub fn resize<Sh>(&mut self, shape: Sh)
    where
        Sh: ShapeBuilder<Dim = D>,
    {
        *self = Self::new(shape);
    }
}

impl ScalarStatistic {
    /// Empty scalar accumulator.
    pub fn scalar() -> Self {
        Self::new(())
    }

    /// Fold one real value.
    pub fn update_scalar(&mut self, value: f64) {
        self.update(&arr0(value));
    }

    /// Running mean as a plain `f64`.
    pub fn scalar_mean(&self) -> Option<f64> {
        self.mean().map(|m| m[()])
    }
}

impl Default for ScalarStatistic {
    fn default() -> Self {
        Self::scalar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the running mean with the arithmetic mean.
    // - Order independence and stability over very long constant streams.
    // - `release` / `resize` semantics and the empty-accumulator contract.
    // - The Welford variance.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the running mean equals the arithmetic mean of the inputs.
    fn mean_matches_arithmetic_mean() {
        // Arrange
        let values = [1.5, -2.0, 4.25, 10.0, 0.0];
        let mut stat = ScalarStatistic::scalar();

        // Act
        for &v in &values {
            stat.update_scalar(v);
        }

        // Assert
        let expected = values.iter().sum::<f64>() / values.len() as f64;
        assert_abs_diff_eq!(stat.scalar_mean().unwrap(), expected, epsilon = 1e-12);
        assert_eq!(stat.count(), values.len());
    }

    #[test]
    // Purpose
    // -------
    // Verify that feeding order does not change the mean.
    //
    // Given
    // -----
    // - The same vector-valued draws fed forwards and backwards.
    //
    // Expect
    // ------
    // - Both accumulators report the same mean up to rounding.
    fn mean_is_order_independent() {
        // Arrange
        let draws: Vec<Array1<f64>> =
            (0..50).map(|i| array![i as f64 * 0.3, (i as f64).sin(), 1e3 - i as f64]).collect();
        let mut forward = VectorStatistic::new(3);
        let mut backward = VectorStatistic::new(3);

        // Act
        draws.iter().for_each(|d| forward.update(d));
        draws.iter().rev().for_each(|d| backward.update(d));

        // Assert
        let f = forward.mean().unwrap();
        let b = backward.mean().unwrap();
        for j in 0..3 {
            assert_abs_diff_eq!(f[j], b[j], epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify there is no drift over a million constant updates.
    fn long_constant_stream_keeps_exact_mean() {
        // Arrange
        let mut stat = ScalarStatistic::scalar();

        // Act
        for _ in 0..1_000_000 {
            stat.update_scalar(3.7);
        }

        // Assert
        assert_abs_diff_eq!(stat.scalar_mean().unwrap(), 3.7, epsilon = 1e-12);
        assert_abs_diff_eq!(stat.variance().unwrap()[()], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the empty contract and that `release` keeps the shape.
    fn release_empties_but_keeps_shape() {
        // Arrange
        let mut stat = MatrixStatistic::new((2, 3));
        assert!(stat.mean().is_none());
        stat.update(&Array::from_elem((2, 3), 1.0));

        // Act
        stat.release();

        // Assert
        assert!(stat.mean().is_none());
        assert_eq!(stat.count(), 0);
        assert_eq!(stat.shape(), &[2, 3]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `resize` changes the shape and discards accumulation.
    fn resize_discards_accumulation() {
        let mut stat = VectorStatistic::new(2);
        stat.update(&array![1.0, 2.0]);
        stat.resize(4);
        assert_eq!(stat.shape(), &[4]);
        assert!(stat.mean().is_none());
        stat.update(&array![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stat.mean().unwrap(), &array![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the Welford variance against the two-pass formula.
    fn variance_matches_two_pass_formula() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut stat = ScalarStatistic::scalar();
        values.iter().for_each(|&v| stat.update_scalar(v));
        assert_abs_diff_eq!(stat.variance().unwrap()[()], 4.0, epsilon = 1e-12);
    }
}
