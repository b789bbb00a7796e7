//! Simple strategy — initialize, converge, keep the best try.
use crate::{
    estimation::{
        algo::Algorithm,
        init::Initializer,
        options::AlgoOptions,
        strategy::{DEFAULT_NB_TRY, outcome::StrategyOutcome, run_tries},
    },
    mixture::{
        core::{MixtureModel, validation::validate_nb_try},
        errors::MixResult,
    },
};

/// Parameters of a [`SimpleStrategy`]: the main algorithm of every try.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleStrategyParam {
    pub algo: Algorithm,
}

impl SimpleStrategyParam {
    pub fn new(algo: Algorithm) -> Self {
        Self { algo }
    }
}

impl Default for SimpleStrategyParam {
    fn default() -> Self {
        Self::new(Algorithm::em(AlgoOptions::default()))
    }
}

/// `nb_try` independent runs of initializer then main algorithm.
///
/// The strategy owns its initializer and algorithm; each try works on
/// private copies of both.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleStrategy {
    nb_try: usize,
    init: Initializer,
    param: SimpleStrategyParam,
    seed: Option<u64>,
}

impl SimpleStrategy {
    pub fn new(init: Initializer, param: SimpleStrategyParam) -> Self {
        Self { nb_try: DEFAULT_NB_TRY, init, param, seed: None }
    }

    pub fn nb_try(&self) -> usize {
        self.nb_try
    }

    pub fn mixture_init(&self) -> &Initializer {
        &self.init
    }

    pub fn param(&self) -> &SimpleStrategyParam {
        &self.param
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// # Errors
    /// `MixError::InvalidNbTry` if `nb_try == 0`.
    pub fn set_nb_try(&mut self, nb_try: usize) -> MixResult<()> {
        self.nb_try = validate_nb_try(nb_try)?;
        Ok(())
    }

    pub fn set_mixture_init(&mut self, init: Initializer) {
        self.init = init;
    }

    pub fn set_param(&mut self, param: SimpleStrategyParam) {
        self.param = param;
    }

    /// Fix the master seed; `None` seeds from the operating system.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Estimate `model` in place.
    ///
    /// # Errors
    /// - Configuration-class errors, immediately.
    /// - `MixError::EstimationFailed` when every try fails; `model` is then
    ///   left as it was passed in.
    pub fn run<M>(&self, model: &mut M) -> MixResult<StrategyOutcome>
    where
        M: MixtureModel + Send + Sync,
    {
        run_tries("SimpleStrategy", model, self.nb_try, self.seed, |candidate, rng| {
            self.init.clone().run(candidate, rng)?;
            self.param.algo.clone().run(candidate, rng)
        })
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(Initializer::default(), SimpleStrategyParam::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::{
        core::{AlgoKind, InitKind, Mixture},
        families::PoissonFamily,
    };
    use ndarray::Array2;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, Poisson};

    #[test]
    // Purpose
    // -------
    // Verify configuration and a seeded CEM run on count data.
    //
    // Given
    // -----
    // - 120 counts from rates 1 and 15, class initialization, CEM, 4 tries.
    //
    // Expect
    // ------
    // - Fitted rates near the generating ones and all tries accounted for.
    fn cem_on_counts_recovers_rates() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(8);
        let low = Poisson::new(1.0).unwrap();
        let high = Poisson::new(15.0).unwrap();
        let data = Array2::from_shape_fn((120, 1), |(i, _)| {
            if i < 60 { low.sample(&mut rng) } else { high.sample(&mut rng) }
        });
        let mut model = Mixture::new(PoissonFamily::default(), data, 2).unwrap();
        let mut strategy = SimpleStrategy::default();
        assert!(strategy.set_nb_try(0).is_err());
        strategy.set_nb_try(4).unwrap();
        strategy.set_mixture_init(Initializer::new(InitKind::Class));
        strategy.set_param(SimpleStrategyParam::new(Algorithm::new(AlgoKind::Cem, AlgoOptions::default())));
        strategy.set_seed(Some(17));

        // Act
        let outcome = strategy.run(&mut model).unwrap();

        // Assert
        assert_eq!(outcome.nb_try(), 4);
        assert_eq!(outcome.algo.kind, AlgoKind::Cem);
        let mut rates = model.params().lambda.column(0).to_vec();
        rates.sort_by(f64::total_cmp);
        assert!((rates[0] - 1.0).abs() < 0.5, "low rate {}", rates[0]);
        assert!((rates[1] - 15.0).abs() < 2.0, "high rate {}", rates[1]);
    }
}
