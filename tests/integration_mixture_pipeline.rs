//! Integration tests for the mixture estimation pipeline.
//!
//! Purpose
//! -------
//! - Validate end-to-end estimation: model construction, initialization,
//!   algorithm runs inside a strategy, and criterion-based model choice.
//! - Exercise realistic synthetic data sets drawn with seeded generators
//!   rather than hand-built toy inputs only.
//!
//! Coverage
//! --------
//! - `estimation::strategy::SimpleStrategy` with EM on two Gaussian groups.
//! - `estimation::strategy::FullStrategy` with class initialization.
//! - SEM on Gamma data and SemiSEM on Poisson counts.
//! - `selection::select_model` choosing `K` by BIC.
//!
//! Exclusions
//! ----------
//! - Recovery from failing tries, covered in
//!   `integration_strategy_failures.rs`.
//! - Step-level numerics of each family, covered by unit tests.
use ndarray::{Array1, Array2};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Gamma, Normal, Poisson};
use rust_mixtures::{
    estimation::{
        AlgoOptions, Algorithm, FullStrategy, FullStrategyParam, Initializer, SimpleStrategy,
        SimpleStrategyParam,
    },
    mixture::{
        AlgoKind, CriterionKind, DiagGaussian, GammaFamily, GaussianMixture, InitKind, Mixture,
        MixtureModel, PoissonFamily,
    },
    selection::{Criterion, select_model},
};

/// Purpose
/// -------
/// Draw `n` one-dimensional points, the first half from `N(-gap, 1)` and
/// the second half from `N(gap, 1)`.
///
/// Returns
/// -------
/// - The `n × 1` data matrix and the ground-truth labels (0 then 1).
fn two_gaussians(n: usize, gap: f64, seed: u64) -> (Array2<f64>, Array1<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let left = Normal::new(-gap, 1.0).unwrap();
    let right = Normal::new(gap, 1.0).unwrap();
    let labels = Array1::from_shape_fn(n, |i| usize::from(i >= n / 2));
    let data = Array2::from_shape_fn((n, 1), |(i, _)| {
        if labels[i] == 0 { left.sample(&mut rng) } else { right.sample(&mut rng) }
    });
    (data, labels)
}

/// Share of points whose predicted label matches the truth, up to a swap of
/// the two cluster indices.
fn two_cluster_accuracy(predicted: &Array1<usize>, truth: &Array1<usize>) -> f64 {
    let same = predicted.iter().zip(truth).filter(|(p, t)| p == t).count() as f64;
    let share = same / truth.len() as f64;
    share.max(1.0 - share)
}

#[test]
// Purpose
// -------
// Verify end-to-end recovery of two well-separated Gaussian groups.
//
// Given
// -----
// - 200 points from N(-4, 1) and N(4, 1).
// - SimpleStrategy with nb_try = 10, EM, epsilon = 1e-8, nb_iter_max = 100.
//
// Expect
// ------
// - At least 95% of points labelled consistently with the ground truth.
// - Every try accounted for and the winning run within its cap.
fn simple_strategy_recovers_two_gaussians() {
    // Arrange
    let (data, truth) = two_gaussians(200, 4.0, 2024);
    let mut model = Mixture::new(DiagGaussian::default(), data, 2).unwrap();
    let options = AlgoOptions::new(100, 1e-8, 0, 0, false).unwrap();
    let mut strategy =
        SimpleStrategy::new(Initializer::new(InitKind::Random), SimpleStrategyParam::new(Algorithm::em(options)));
    strategy.set_nb_try(10).unwrap();
    strategy.set_seed(Some(99));

    // Act
    let outcome = strategy.run(&mut model).unwrap();

    // Assert
    let accuracy = two_cluster_accuracy(&model.predict(), &truth);
    assert!(accuracy >= 0.95, "accuracy {accuracy}");
    assert_eq!(outcome.nb_try(), 10);
    assert!(outcome.algo.nb_iter <= 100);
    assert_eq!(outcome.log_likelihood, model.log_likelihood());
    let mut means = model.params().mean.column(0).to_vec();
    means.sort_by(f64::total_cmp);
    assert!((means[0] + 4.0).abs() < 0.4 && (means[1] - 4.0).abs() < 0.4, "means {means:?}");
}

#[test]
// Purpose
// -------
// Verify that the full strategy reaches at least the likelihood of a single
// simple try on the same data.
//
// Given
// -----
// - 240 points in two groups; class initialization.
// - FullStrategy with 3 tries of 4 short CEM runs and an EM long run.
//
// Expect
// ------
// - A converged fit whose log-likelihood is no lower than a one-try EM fit
//   from the same initializer (up to tolerance).
fn full_strategy_matches_or_beats_single_try() {
    // Arrange
    let (data, truth) = two_gaussians(240, 3.0, 5);
    let template: GaussianMixture = Mixture::new(DiagGaussian::default(), data, 2).unwrap();
    let short = Algorithm::new(AlgoKind::Cem, AlgoOptions::short_run());
    let long = Algorithm::em(AlgoOptions::long_run());
    let mut full = FullStrategy::new(Initializer::new(InitKind::Class), FullStrategyParam::new(4, short, long).unwrap());
    full.set_nb_try(3).unwrap();
    full.set_seed(Some(11));
    let mut single = SimpleStrategy::new(
        Initializer::new(InitKind::Class),
        SimpleStrategyParam::new(Algorithm::em(AlgoOptions::long_run())),
    );
    single.set_nb_try(1).unwrap();
    single.set_seed(Some(11));

    // Act
    let mut full_model = template.clone();
    let full_out = full.run(&mut full_model).unwrap();
    let mut single_model = template.clone();
    let single_out = single.run(&mut single_model).unwrap();

    // Assert
    assert!(full_out.log_likelihood >= single_out.log_likelihood - 1e-6 * single_out.log_likelihood.abs());
    assert!(two_cluster_accuracy(&full_model.predict(), &truth) >= 0.9);
}

#[test]
// Purpose
// -------
// Verify SEM on a Gamma mixture with a shared scale.
//
// Given
// -----
// - 400 points from Gamma(shape 2, scale 1.5) and Gamma(shape 14, scale 1.5).
// - SimpleStrategy with SEM (nb_iter_max 150, burn_in 50), 3 tries.
//
// Expect
// ------
// - A finite log-likelihood, 100 averaged draws, a well-separated pair of
//   shapes, and a scale in the neighbourhood of the true one.
fn sem_fits_gamma_mixture() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(77);
    let low = Gamma::new(2.0, 1.5).unwrap();
    let high = Gamma::new(14.0, 1.5).unwrap();
    let data = Array2::from_shape_fn((400, 1), |(i, _)| {
        if i % 2 == 0 { low.sample(&mut rng) } else { high.sample(&mut rng) }
    });
    let mut model = Mixture::new(GammaFamily::default(), data, 2).unwrap();
    let options = AlgoOptions { nb_iter_max: 150, burn_in: 50, ..AlgoOptions::default() };
    let mut strategy = SimpleStrategy::new(
        Initializer::new(InitKind::Class),
        SimpleStrategyParam::new(Algorithm::new(AlgoKind::Sem, options)),
    );
    strategy.set_nb_try(3).unwrap();
    strategy.set_seed(Some(8));

    // Act
    let outcome = strategy.run(&mut model).unwrap();

    // Assert
    assert!(outcome.log_likelihood.is_finite());
    assert_eq!(outcome.algo.nb_averaged, 100);
    let mut shapes = model.params().shape.column(0).to_vec();
    shapes.sort_by(f64::total_cmp);
    assert!(shapes[0] < 4.0 && shapes[1] > 8.0, "shapes {shapes:?}");
    let scale = model.params().scale[0];
    assert!(scale > 0.8 && scale < 2.5, "scale {scale}");
    assert!((model.proportions().sum() - 1.0).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Verify SemiSEM on Poisson counts through the full strategy.
//
// Given
// -----
// - 300 counts, a third from rate 3 and two thirds from rate 20.
//
// Expect
// ------
// - Fitted rates and proportions near the generating ones.
fn semi_sem_fits_poisson_counts() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(4);
    let low = Poisson::new(3.0).unwrap();
    let high = Poisson::new(20.0).unwrap();
    let data = Array2::from_shape_fn((300, 1), |(i, _)| {
        if i % 3 == 0 { low.sample(&mut rng) } else { high.sample(&mut rng) }
    });
    let mut model = Mixture::new(PoissonFamily::default(), data, 2).unwrap();
    let semi = AlgoOptions { nb_iter_max: 60, burn_in: 20, nb_stabilization_iter: 20, ..AlgoOptions::default() };
    let param = FullStrategyParam::new(
        2,
        Algorithm::em(AlgoOptions::short_run()),
        Algorithm::new(AlgoKind::SemiSem, semi),
    )
    .unwrap();
    let mut strategy = FullStrategy::new(Initializer::new(InitKind::Fuzzy), param);
    strategy.set_nb_try(2).unwrap();
    strategy.set_seed(Some(1));

    // Act
    let outcome = strategy.run(&mut model).unwrap();

    // Assert
    assert_eq!(outcome.algo.kind, AlgoKind::SemiSem);
    let lambda = model.params().lambda.column(0).to_vec();
    let (lo, hi) = if lambda[0] < lambda[1] { (0, 1) } else { (1, 0) };
    assert!((lambda[lo] - 3.0).abs() < 1.0, "low rate {}", lambda[lo]);
    assert!((lambda[hi] - 20.0).abs() < 2.0, "high rate {}", lambda[hi]);
    assert!((model.proportions()[lo] - 1.0 / 3.0).abs() < 0.08);
}

#[test]
// Purpose
// -------
// Verify the caller-level loop over K with BIC.
//
// Given
// -----
// - 300 points from two groups at -5 and 5; candidates K = 1, 2, 3.
//
// Expect
// ------
// - BIC and ICL select K = 2; ML never prefers the smallest model.
fn bic_selects_number_of_clusters() {
    // Arrange
    let (data, _) = two_gaussians(300, 5.0, 13);
    let mut strategy = SimpleStrategy::default();
    strategy.set_nb_try(5).unwrap();
    strategy.set_seed(Some(21));

    // Act
    let candidates: Vec<GaussianMixture> = (1..=3)
        .map(|k| {
            let mut model = Mixture::new(DiagGaussian::default(), data.clone(), k).unwrap();
            strategy.run(&mut model).unwrap();
            model
        })
        .collect();
    let bic = select_model(&candidates, &Criterion::new(CriterionKind::Bic)).unwrap();
    let icl = select_model(&candidates, &Criterion::new(CriterionKind::Icl)).unwrap();
    let ml = select_model(&candidates, &Criterion::new(CriterionKind::Ml)).unwrap();

    // Assert
    assert_eq!(candidates[bic.best].nb_cluster(), 2, "BIC scores {:?}", bic.scores);
    assert_eq!(candidates[icl.best].nb_cluster(), 2, "ICL scores {:?}", icl.scores);
    assert_ne!(ml.best, 0);
    assert_eq!(bic.scores.len(), 3);
}
