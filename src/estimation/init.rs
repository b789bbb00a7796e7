//! Initializer — admissible starting points with an internal retry budget.
//!
//! Purpose
//! -------
//! Populate a [`MixtureModel`] with a starting parameter set from which the
//! main algorithm can run, optionally stabilized by a short
//! [`Algorithm`] run.
//!
//! Key behaviors
//! -------------
//! - **Random**: family parameters drawn from a data-driven range, uniform
//!   proportions, then an E-step.
//! - **Class**: every observation assigned to a uniformly drawn cluster; an
//!   M-step derives parameters from the groups, then an E-step.
//! - **Fuzzy**: every posterior row drawn from a flat Dirichlet
//!   (normalized `Exp(1)` draws); weighted M-step, then an E-step.
//! - Each failed attempt (empty cluster, degenerate parameter, failed short
//!   run) is logged at debug level and retried, up to `nb_try` attempts.
//!
//! Invariants & assumptions
//! ------------------------
//! - On success the model holds up-to-date posteriors and log-likelihood.
//! - Configuration-class errors are returned immediately, never retried.
use crate::{
    estimation::algo::Algorithm,
    mixture::{
        core::{InitKind, MixtureModel, validation::validate_nb_try},
        errors::{MixError, MixResult},
    },
};
use log::debug;
use ndarray::Array2;
use rand::Rng;
use rand_distr::Exp1;

pub const DEFAULT_INIT_NB_TRY: usize = 5;

/// Starting-point generator with an optional stabilizing short run.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    kind: InitKind,
    nb_try: usize,
    init_algo: Option<Algorithm>,
}

impl Initializer {
    pub fn new(kind: InitKind) -> Self {
        Self { kind, nb_try: DEFAULT_INIT_NB_TRY, init_algo: None }
    }

    /// Build from a case-insensitive initialization name.
    ///
    /// # Errors
    /// `MixError::UnknownName` for unrecognized names.
    pub fn from_name(name: &str) -> MixResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn kind(&self) -> InitKind {
        self.kind
    }

    pub fn nb_try(&self) -> usize {
        self.nb_try
    }

    pub fn init_algo(&self) -> Option<&Algorithm> {
        self.init_algo.as_ref()
    }

    /// Number of internal attempts before giving up.
    ///
    /// # Errors
    /// `MixError::InvalidNbTry` if `nb_try == 0`.
    pub fn set_nb_try(&mut self, nb_try: usize) -> MixResult<()> {
        self.nb_try = validate_nb_try(nb_try)?;
        Ok(())
    }

    /// Short algorithm run after every generated start.
    pub fn set_init_algo(&mut self, algo: Algorithm) {
        self.init_algo = Some(algo);
    }

    pub fn clear_init_algo(&mut self) {
        self.init_algo = None;
    }

    /// Produce an admissible, optionally stabilized, starting point.
    ///
    /// # Errors
    /// - Configuration-class errors from the model, immediately.
    /// - `MixError::InitializationFailed { attempts, source }` with the last
    ///   cause once every attempt has failed.
    pub fn run<M, R>(&mut self, model: &mut M, rng: &mut R) -> MixResult<()>
    where
        M: MixtureModel,
        R: Rng + ?Sized,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(model, rng) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_configuration() => return Err(err),
                Err(err) if attempts >= self.nb_try => {
                    return Err(MixError::InitializationFailed { attempts, source: Box::new(err) });
                }
                Err(err) => {
                    debug!("{} initialization attempt {attempts}/{} failed: {err}", self.kind, self.nb_try);
                }
            }
        }
    }

    fn attempt<M, R>(&mut self, model: &mut M, rng: &mut R) -> MixResult<()>
    where
        M: MixtureModel,
        R: Rng + ?Sized,
    {
        match self.kind {
            InitKind::Random => model.random_init(rng)?,
            InitKind::Class => {
                model.set_tik(random_partition(model.nb_sample(), model.nb_cluster(), rng))?;
                model.m_step()?;
            }
            InitKind::Fuzzy => {
                model.set_tik(random_soft_partition(model.nb_sample(), model.nb_cluster(), rng))?;
                model.m_step()?;
            }
        }
        model.e_step()?;
        if let Some(algo) = self.init_algo.as_mut() {
            algo.run(model, rng)?;
        }
        Ok(())
    }
}

impl Default for Initializer {
    fn default() -> Self {
        Self::new(InitKind::default())
    }
}

/// One-hot `N × K` matrix with uniformly drawn clusters.
fn random_partition<R: Rng + ?Sized>(nb_sample: usize, nb_cluster: usize, rng: &mut R) -> Array2<f64> {
    let mut tik = Array2::zeros((nb_sample, nb_cluster));
    for mut row in tik.rows_mut() {
        row[rng.random_range(0..nb_cluster)] = 1.0;
    }
    tik
}

/// Unnormalized flat-Dirichlet rows; the model renormalizes them.
fn random_soft_partition<R: Rng + ?Sized>(
    nb_sample: usize, nb_cluster: usize, rng: &mut R,
) -> Array2<f64> {
    Array2::from_shape_simple_fn((nb_sample, nb_cluster), || {
        let e: f64 = rng.sample(Exp1);
        e.max(f64::MIN_POSITIVE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        estimation::options::AlgoOptions,
        mixture::{
            core::Mixture,
            errors::ErrorKind,
            families::{DiagGaussian, GaussianMixture},
        },
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Each initialization kind producing admissible posteriors.
    // - Retry exhaustion surfacing as `InitializationFailed`.
    // - The optional stabilizing run.
    // -------------------------------------------------------------------------

    fn blobs() -> GaussianMixture {
        let data = array![
            [-4.1], [-3.9], [-4.3], [-3.7], [-4.0], [-4.2],
            [3.8], [4.1], [4.4], [3.6], [4.0], [4.2]
        ];
        Mixture::new(DiagGaussian::default(), data, 2).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that every kind leaves normalized posteriors and a finite
    // log-likelihood.
    fn every_kind_produces_admissible_start() {
        for kind in [InitKind::Random, InitKind::Class, InitKind::Fuzzy] {
            // Arrange
            let mut model = blobs();
            let mut init = Initializer::new(kind);
            init.set_nb_try(20).unwrap();
            let mut rng = StdRng::seed_from_u64(4);

            // Act
            init.run(&mut model, &mut rng).unwrap();

            // Assert
            assert!(model.log_likelihood().is_finite(), "{kind}");
            for row in model.tik().rows() {
                assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that exhausting the retry budget reports the attempt count.
    //
    // Given
    // -----
    // - Constant data, so every M-step collapses the Gaussian variance.
    //
    // Expect
    // ------
    // - `InitializationFailed { attempts: 3, .. }` wrapping a degenerate
    //   parameter error.
    fn exhausted_budget_reports_attempts() {
        // Arrange
        let mut model = Mixture::new(DiagGaussian::default(), Array2::from_elem((6, 1), 1.0), 2).unwrap();
        let mut init = Initializer::new(InitKind::Class);
        init.set_nb_try(3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let err = init.run(&mut model, &mut rng).unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::Initialization);
        match err {
            MixError::InitializationFailed { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    *source,
                    MixError::DegenerateParameter { .. } | MixError::EmptyCluster { .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a configured short run is applied after the start.
    //
    // Given
    // -----
    // - The same fuzzy start (same seed) with and without a stabilizing EM
    //   run.
    //
    // Expect
    // ------
    // - The stabilized log-likelihood is at least the raw start's, since EM
    //   never decreases it.
    fn init_algo_stabilizes_start() {
        for seed in [2, 9, 17] {
            // Arrange
            let mut raw = blobs();
            let mut stabilized = blobs();
            let mut plain = Initializer::new(InitKind::Fuzzy);
            let mut init = Initializer::new(InitKind::Fuzzy);
            let stabilize = AlgoOptions { nb_iter_max: 300, epsilon: 1e-10, ..AlgoOptions::short_run() };
            init.set_init_algo(Algorithm::em(stabilize));

            // Act
            plain.run(&mut raw, &mut StdRng::seed_from_u64(seed)).unwrap();
            init.run(&mut stabilized, &mut StdRng::seed_from_u64(seed)).unwrap();

            // Assert
            let (start, end) = (raw.log_likelihood(), stabilized.log_likelihood());
            assert!(end >= start - 1e-9 * start.abs(), "seed {seed}: {end} < {start}");
        }
        assert!(Initializer::new(InitKind::Class).init_algo().is_none());
        assert!(Initializer::new(InitKind::Class).set_nb_try(0).is_err());
    }
}
