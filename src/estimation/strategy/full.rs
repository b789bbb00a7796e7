//! Full strategy — short exploratory runs, then one long run per try.
//!
//! Per try:
//! 1. The initializer produces a start and short run 0 converges from it.
//! 2. Each further short run starts from a fresh initialization, which
//!    perturbs the search away from the previous local optimum.
//! 3. The short-run candidate with the highest log-likelihood is refined by
//!    the long algorithm; its outcome is the try's result.
//!
//! A failed short run only discards that short run. The try fails when the
//! first initialization, every short run, or the long run fails.
use crate::{
    estimation::{
        algo::{AlgoOutcome, Algorithm},
        init::Initializer,
        options::AlgoOptions,
        strategy::{DEFAULT_NB_TRY, outcome::StrategyOutcome, run_tries},
    },
    mixture::{
        core::{
            MixtureModel,
            validation::{validate_nb_short_run, validate_nb_try},
        },
        errors::MixResult,
    },
};
use log::debug;
use rand::rngs::StdRng;

pub const DEFAULT_NB_SHORT_RUN: usize = 5;

/// Parameters of a [`FullStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct FullStrategyParam {
    nb_short_run: usize,
    short_algo: Algorithm,
    long_algo: Algorithm,
}

impl FullStrategyParam {
    /// # Errors
    /// `MixError::InvalidNbShortRun` if `nb_short_run == 0`.
    pub fn new(nb_short_run: usize, short_algo: Algorithm, long_algo: Algorithm) -> MixResult<Self> {
        let nb_short_run = validate_nb_short_run(nb_short_run)?;
        Ok(Self { nb_short_run, short_algo, long_algo })
    }

    pub fn nb_short_run(&self) -> usize {
        self.nb_short_run
    }

    pub fn short_algo(&self) -> &Algorithm {
        &self.short_algo
    }

    pub fn long_algo(&self) -> &Algorithm {
        &self.long_algo
    }
}

impl Default for FullStrategyParam {
    fn default() -> Self {
        Self {
            nb_short_run: DEFAULT_NB_SHORT_RUN,
            short_algo: Algorithm::em(AlgoOptions::short_run()),
            long_algo: Algorithm::em(AlgoOptions::long_run()),
        }
    }
}

/// `nb_try` independent short-runs-then-long-run searches.
#[derive(Debug, Clone, PartialEq)]
pub struct FullStrategy {
    nb_try: usize,
    init: Initializer,
    param: FullStrategyParam,
    seed: Option<u64>,
}

impl FullStrategy {
    pub fn new(init: Initializer, param: FullStrategyParam) -> Self {
        Self { nb_try: DEFAULT_NB_TRY, init, param, seed: None }
    }

    pub fn nb_try(&self) -> usize {
        self.nb_try
    }

    pub fn mixture_init(&self) -> &Initializer {
        &self.init
    }

    pub fn param(&self) -> &FullStrategyParam {
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

    pub fn set_param(&mut self, param: FullStrategyParam) {
        self.param = param;
    }

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
        run_tries("FullStrategy", model, self.nb_try, self.seed, |candidate, rng| {
            self.run_try(candidate, rng)
        })
    }

    fn run_try<M: MixtureModel>(&self, candidate: &mut M, rng: &mut StdRng) -> MixResult<AlgoOutcome> {
        let mut init = self.init.clone();
        init.run(candidate, rng)?;

        let mut best = match self.short_run(0, candidate, &mut init, rng) {
            Err(err) if err.is_configuration() => return Err(err),
            first => first,
        };
        for short in 1..self.param.nb_short_run {
            best = match (best, self.short_run(short, candidate, &mut init, rng)) {
                (_, Err(err)) if err.is_configuration() => return Err(err),
                (Ok(kept), Ok(trial)) => Ok(if trial.1 > kept.1 { trial } else { kept }),
                (Ok(kept), Err(_)) => Ok(kept),
                (Err(_), trial) => trial,
            };
        }

        let (winner, _) = best?;
        *candidate = winner;
        self.param.long_algo.clone().run(candidate, rng)
    }

    /// One short run on a copy of `start`; every run after the first starts
    /// from a fresh initialization. Returns the run's model and
    /// log-likelihood.
    fn short_run<M: MixtureModel>(
        &self, short: usize, start: &M, init: &mut Initializer, rng: &mut StdRng,
    ) -> MixResult<(M, f64)> {
        let mut trial = start.clone();
        let reinit = if short > 0 { init.run(&mut trial, rng) } else { Ok(()) };
        match reinit.and_then(|()| self.param.short_algo.clone().run(&mut trial, rng)) {
            Ok(out) => Ok((trial, out.log_likelihood)),
            Err(err) => {
                debug!("short run {short} failed: {err}");
                Err(err)
            }
        }
    }
}

impl Default for FullStrategy {
    fn default() -> Self {
        Self::new(Initializer::default(), FullStrategyParam::default())
    }
}
