//! Algorithm — iterate-to-convergence loops of the EM family.
//!
//! Purpose
//! -------
//! Drive any [`MixtureModel`] from its current parameters to a (local)
//! maximum of the likelihood. One [`Algorithm`] value couples an
//! [`AlgoKind`] with validated [`AlgoOptions`]; it is written once against
//! the model contract and never sees a concrete family.
//!
//! Key behaviors
//! -------------
//! - **EM**: E-step, then repeat M-step / E-step until the relative change of
//!   the log-likelihood drops below `epsilon` or `nb_iter_max` is reached.
//! - **CEM**: as EM with a C-step (lowest-index argmax) before every M-step.
//! - **SEM**: `nb_iter_max` rounds of S-step / M-step / E-step. After
//!   `burn_in` rounds, every round's parameters and proportions are folded
//!   into a [`ParametersHandler`]; at the end the running means replace the
//!   last noisy draw and a final E-step refreshes posteriors.
//! - **SemiSEM**: the SEM phase and harvest above, followed by
//!   `nb_stabilization_iter` deterministic EM rounds from the averaged
//!   parameters.
//!
//! Invariants & assumptions
//! ------------------------
//! - Reaching the iteration cap is success unless `cap_is_failure` is set
//!   (deterministic algorithms only).
//! - Any step failure aborts `run`; accumulated statistics are released and
//!   the model is left in an undefined state the caller must discard.
//! - Stochastic steps draw from the caller-supplied generator only.
use crate::{
    estimation::options::AlgoOptions,
    mixture::{
        core::{
            AlgoKind, MixtureModel, ParametersHandler,
            numerics::relative_change,
            statistics::VectorStatistic,
            validation::{validate_burn_in, validate_epsilon, validate_nb_iter_max},
        },
        errors::{MixError, MixResult},
    },
};
use log::debug;
use rand::Rng;

/// Lifecycle of an [`Algorithm`]: `Idle → Iterating → Converged | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgoState {
    Idle,
    Iterating,
    Converged,
    Failed,
}

/// Why a successful run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Relative log-likelihood change fell below `epsilon`.
    Tolerance,
    /// Iteration cap reached (always the case for a pure SEM run).
    IterationCap,
}

/// Summary of a successful run.
///
/// - `path` holds the log-likelihood after the initial E-step and after
///   every iteration (plus the post-harvest value for stochastic runs).
/// - `nb_averaged` counts the parameter draws averaged by a stochastic run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoOutcome {
    pub kind: AlgoKind,
    pub state: AlgoState,
    pub termination: Termination,
    pub nb_iter: usize,
    pub log_likelihood: f64,
    pub path: Vec<f64>,
    pub nb_averaged: usize,
}

/// Configured EM-family algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    kind: AlgoKind,
    options: AlgoOptions,
    state: AlgoState,
}

impl Algorithm {
    pub fn new(kind: AlgoKind, options: AlgoOptions) -> Self {
        Self { kind, options, state: AlgoState::Idle }
    }

    /// Build from a case-insensitive algorithm name.
    ///
    /// # Errors
    /// `MixError::UnknownName` for unrecognized names.
    pub fn from_name(name: &str, options: AlgoOptions) -> MixResult<Self> {
        Ok(Self::new(name.parse()?, options))
    }

    pub fn em(options: AlgoOptions) -> Self {
        Self::new(AlgoKind::Em, options)
    }

    pub fn kind(&self) -> AlgoKind {
        self.kind
    }

    pub fn options(&self) -> &AlgoOptions {
        &self.options
    }

    pub fn state(&self) -> AlgoState {
        self.state
    }

    /// # Errors
    /// `InvalidNbIterMax` for zero, `InvalidBurnIn` if the current burn-in
    /// would no longer fit.
    pub fn set_nb_iter_max(&mut self, nb_iter_max: usize) -> MixResult<()> {
        let nb_iter_max = validate_nb_iter_max(nb_iter_max)?;
        validate_burn_in(self.options.burn_in, nb_iter_max)?;
        self.options.nb_iter_max = nb_iter_max;
        Ok(())
    }

    /// # Errors
    /// `InvalidEpsilon` unless `epsilon` is finite and `> 0`.
    pub fn set_epsilon(&mut self, epsilon: f64) -> MixResult<()> {
        self.options.epsilon = validate_epsilon(epsilon)?;
        Ok(())
    }

    /// # Errors
    /// `InvalidBurnIn` unless `burn_in < nb_iter_max`.
    pub fn set_burn_in(&mut self, burn_in: usize) -> MixResult<()> {
        self.options.burn_in = validate_burn_in(burn_in, self.options.nb_iter_max)?;
        Ok(())
    }

    /// # Errors
    /// Configuration-class `MixError` if `options` fails
    /// [`AlgoOptions::validate`]; the current options are kept.
    pub fn set_options(&mut self, options: AlgoOptions) -> MixResult<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Run the algorithm on `model` in place.
    ///
    /// # Errors
    /// - Configuration-class `MixError` if the options are invalid; the model
    ///   and the state are left untouched.
    /// - Any estimation-class `MixError` raised by a step, or
    ///   `MixError::MaxIterReached` when the cap is configured as a failure.
    pub fn run<M, R>(&mut self, model: &mut M, rng: &mut R) -> MixResult<AlgoOutcome>
    where
        M: MixtureModel,
        R: Rng + ?Sized,
    {
        self.options.validate()?;
        self.state = AlgoState::Iterating;
        let result = match self.kind {
            AlgoKind::Em | AlgoKind::Cem => self.run_deterministic(model),
            AlgoKind::Sem | AlgoKind::SemiSem => self.run_stochastic(model, rng),
        };
        match result {
            Ok(mut outcome) => {
                self.state = AlgoState::Converged;
                outcome.state = AlgoState::Converged;
                debug!(
                    "{} finished after {} iteration(s) ({:?}), log-likelihood {:.6}",
                    self.kind, outcome.nb_iter, outcome.termination, outcome.log_likelihood
                );
                Ok(outcome)
            }
            Err(err) => {
                self.state = AlgoState::Failed;
                debug!("{} failed: {err}", self.kind);
                Err(err)
            }
        }
    }

    fn run_deterministic<M: MixtureModel>(&self, model: &mut M) -> MixResult<AlgoOutcome> {
        let mut path = Vec::with_capacity(self.options.nb_iter_max + 1);
        model.e_step()?;
        path.push(model.log_likelihood());
        let harden = self.kind == AlgoKind::Cem;
        let (nb_iter, termination) =
            self.iterate(model, self.options.nb_iter_max, harden, &mut path)?;
        if termination == Termination::IterationCap && self.options.cap_is_failure {
            return Err(MixError::MaxIterReached { nb_iter });
        }
        Ok(self.outcome(model, termination, nb_iter, path, 0))
    }

    fn run_stochastic<M, R>(&self, model: &mut M, rng: &mut R) -> MixResult<AlgoOutcome>
    where
        M: MixtureModel,
        R: Rng + ?Sized,
    {
        let mut handler = model.new_handler();
        let mut proportions = VectorStatistic::new(model.nb_cluster());
        let mut path = Vec::with_capacity(self.options.nb_iter_max + 2);

        if let Err(err) = self.simulate(model, rng, &mut handler, &mut proportions, &mut path) {
            handler.release_statistics();
            return Err(err);
        }

        let nb_averaged = handler.nb_updates();
        handler.set_statistics(model.params_mut());
        if let Some(mean) = proportions.mean() {
            model.set_proportions(mean.view())?;
        }
        model.e_step()?;
        path.push(model.log_likelihood());

        let mut nb_iter = self.options.nb_iter_max;
        let mut termination = Termination::IterationCap;
        if self.kind == AlgoKind::SemiSem && self.options.nb_stabilization_iter > 0 {
            let (extra, stop) =
                self.iterate(model, self.options.nb_stabilization_iter, false, &mut path)?;
            nb_iter += extra;
            termination = stop;
        }
        Ok(self.outcome(model, termination, nb_iter, path, nb_averaged))
    }

    /// Stochastic phase: S-step / M-step / E-step, accumulating after burn-in.
    fn simulate<M, R>(
        &self, model: &mut M, rng: &mut R, handler: &mut M::Handler,
        proportions: &mut VectorStatistic, path: &mut Vec<f64>,
    ) -> MixResult<()>
    where
        M: MixtureModel,
        R: Rng + ?Sized,
    {
        model.e_step()?;
        path.push(model.log_likelihood());
        for iter in 1..=self.options.nb_iter_max {
            model.s_step(rng);
            model.m_step()?;
            model.e_step()?;
            path.push(model.log_likelihood());
            if iter > self.options.burn_in {
                handler.update_statistics(model.params());
                proportions.update(&model.proportions());
            }
        }
        Ok(())
    }

    /// Deterministic rounds from an up-to-date E-step. Returns the number of
    /// rounds performed and why they stopped.
    fn iterate<M: MixtureModel>(
        &self, model: &mut M, nb_iter_max: usize, harden: bool, path: &mut Vec<f64>,
    ) -> MixResult<(usize, Termination)> {
        let mut previous = model.log_likelihood();
        for iter in 1..=nb_iter_max {
            if harden {
                model.c_step();
            }
            model.m_step()?;
            model.e_step()?;
            let current = model.log_likelihood();
            path.push(current);
            if relative_change(previous, current) < self.options.epsilon {
                return Ok((iter, Termination::Tolerance));
            }
            previous = current;
        }
        Ok((nb_iter_max, Termination::IterationCap))
    }

    fn outcome<M: MixtureModel>(
        &self, model: &M, termination: Termination, nb_iter: usize, path: Vec<f64>,
        nb_averaged: usize,
    ) -> AlgoOutcome {
        AlgoOutcome {
            kind: self.kind,
            state: AlgoState::Iterating,
            termination,
            nb_iter,
            log_likelihood: model.log_likelihood(),
            path,
            nb_averaged,
        }
    }
}
