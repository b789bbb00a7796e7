//! Bracketed scalar root finding on top of argmin's Brent solver.
//!
//! Callers supply a continuous equation `g(x)` and a bracket `[lower, upper]`
//! over which `g` changes sign. [`find_root`] validates the bracket, wraps the
//! equation in [`EquationAdapter`] so argmin can drive it, runs
//! [`BrentRoot`] and returns a [`RootOutcome`].
//!
//! For monotone increasing equations whose upper end is not known up front,
//! [`expand_upper`] doubles the upper endpoint until the sign changes, and
//! [`bracket_positive`] grows a bracket in both directions around a guess.
//!
//! With the `obs_slog` feature and `RootOptions::verbose`, a terminal slog
//! observer is attached to every Brent run.
use crate::optimization::errors::{OptError, OptResult};
use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::brent::BrentRoot;

/// Default absolute tolerance on the root location.
pub const DEFAULT_ROOT_TOL: f64 = 1e-10;

/// Default cap on Brent iterations.
pub const DEFAULT_ROOT_MAX_ITER: usize = 200;

/// Cap on how many times [`expand_upper`] may double the bracket.
pub const MAX_BRACKET_EXPANSIONS: usize = 60;

/// Numerical settings for [`find_root`].
///
/// - `tol`: absolute tolerance on the root, finite and `> 0`.
/// - `max_iter`: Brent iteration cap, `> 0`.
/// - `verbose`: attach a terminal slog observer (only with the `obs_slog`
///   feature; ignored otherwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub tol: f64,
    pub max_iter: usize,
    pub verbose: bool,
}

impl RootOptions {
    /// Construct validated root-finding options.
    ///
    /// # Errors
    /// - [`OptError::InvalidTolerance`] if `tol` is non-finite or `<= 0`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol: f64, max_iter: usize) -> OptResult<Self> {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be positive." });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter, verbose: false })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for RootOptions {
    fn default() -> Self {
        Self { tol: DEFAULT_ROOT_TOL, max_iter: DEFAULT_ROOT_MAX_ITER, verbose: false }
    }
}

/// Result of a successful root search.
///
/// - `root`: abscissa with `|g(root)|` small.
/// - `residual`: `g(root)`.
/// - `iterations`: Brent iterations performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOutcome {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Exposes a scalar equation `g(x)` as an argmin cost function.
///
/// Non-finite evaluations are reported as [`OptError::NonFiniteObjective`]
/// so that they surface through the solver instead of poisoning the bracket.
pub struct EquationAdapter<'a, G: Fn(f64) -> f64> {
    pub g: &'a G,
}

impl<'a, G: Fn(f64) -> f64> EquationAdapter<'a, G> {
    pub fn new(g: &'a G) -> Self {
        Self { g }
    }

    /// Evaluate `g(x)`, rejecting non-finite values.
    pub fn eval(&self, x: f64) -> OptResult<f64> {
        let value = (self.g)(x);
        if !value.is_finite() {
            return Err(OptError::NonFiniteObjective { x, value });
        }
        Ok(value)
    }
}

impl<G: Fn(f64) -> f64> CostFunction for EquationAdapter<'_, G> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.eval(*x)?)
    }
}

/// Find a root of `g` inside `[lower, upper]` with Brent's method.
///
/// # Behavior
/// - Validates the bracket (finite, `lower < upper`).
/// - Returns immediately when either endpoint is already an exact root.
/// - Requires a sign change over the bracket.
/// - Runs argmin's [`BrentRoot`] capped at `opts.max_iter` iterations.
///
/// # Errors
/// - [`OptError::InvalidBracket`] for malformed brackets.
/// - [`OptError::NoSignChange`] when `g(lower)` and `g(upper)` share a sign.
/// - [`OptError::NonFiniteObjective`] when `g` is non-finite at an evaluation.
/// - Any argmin runtime error, mapped through `From<argmin::core::Error>`.
pub fn find_root<G>(g: G, lower: f64, upper: f64, opts: &RootOptions) -> OptResult<RootOutcome>
where
    G: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Bracket endpoints must be finite.",
        });
    }
    if lower >= upper {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Lower endpoint must be strictly below the upper endpoint.",
        });
    }
    let problem = EquationAdapter::new(&g);
    let f_lower = problem.eval(lower)?;
    let f_upper = problem.eval(upper)?;
    if f_lower == 0.0 {
        return Ok(RootOutcome { root: lower, residual: 0.0, iterations: 0 });
    }
    if f_upper == 0.0 {
        return Ok(RootOutcome { root: upper, residual: 0.0, iterations: 0 });
    }
    if f_lower.signum() == f_upper.signum() {
        return Err(OptError::NoSignChange { lower, upper, f_lower, f_upper });
    }

    let solver = BrentRoot::new(lower, upper, opts.tol);
    let max_iter = opts.max_iter as u64;
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.max_iters(max_iter));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    let result = executor.run()?;
    let state = result.state();
    let root = state.get_param().or(state.get_best_param()).copied().ok_or(OptError::MissingRoot)?;
    let iterations = state.get_iter() as usize;
    let residual = EquationAdapter::new(&g).eval(root)?;
    Ok(RootOutcome { root, residual, iterations })
}

/// Grow `upper` geometrically until an increasing equation turns positive.
///
/// Starting from `upper`, the endpoint is doubled at most
/// [`MAX_BRACKET_EXPANSIONS`] times. Returns the first endpoint with
/// `g(upper) >= 0`.
///
/// # Errors
/// - [`OptError::InvalidBracket`] if `upper` is non-finite or `<= 0`.
/// - [`OptError::NoSignChange`] if no positive value is reached.
/// - [`OptError::NonFiniteObjective`] if `g` is non-finite along the way.
pub fn expand_upper<G>(g: &G, lower: f64, upper: f64) -> OptResult<f64>
where
    G: Fn(f64) -> f64,
{
    if !upper.is_finite() || upper <= 0.0 {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Upper endpoint must be finite and positive to expand.",
        });
    }
    let mut candidate = upper;
    let mut value = g(candidate);
    for _ in 0..MAX_BRACKET_EXPANSIONS {
        if !value.is_finite() {
            return Err(OptError::NonFiniteObjective { x: candidate, value });
        }
        if value >= 0.0 {
            return Ok(candidate);
        }
        candidate *= 2.0;
        value = g(candidate);
    }
    Err(OptError::NoSignChange { lower, upper: candidate, f_lower: g(lower), f_upper: value })
}

/// Bracket the root of an increasing equation on `(0, ∞)` around a positive
/// guess, halving the lower endpoint and doubling the upper one.
///
/// Returns `(lower, upper)` with `g(lower) <= 0 <= g(upper)`.
///
/// # Errors
/// - [`OptError::InvalidBracket`] if `guess` is non-finite or `<= 0`.
/// - [`OptError::NoSignChange`] if either side keeps its sign after
///   [`MAX_BRACKET_EXPANSIONS`] steps.
/// - [`OptError::NonFiniteObjective`] if `g` is non-finite along the way.
pub fn bracket_positive<G>(g: &G, guess: f64) -> OptResult<(f64, f64)>
where
    G: Fn(f64) -> f64,
{
    if !guess.is_finite() || guess <= 0.0 {
        return Err(OptError::InvalidBracket {
            lower: guess,
            upper: guess,
            reason: "Initial guess must be finite and positive.",
        });
    }
    let problem = EquationAdapter::new(g);
    let mut lower = guess;
    let mut f_lower = problem.eval(lower)?;
    let mut steps = 0;
    while f_lower > 0.0 {
        if steps == MAX_BRACKET_EXPANSIONS {
            return Err(OptError::NoSignChange { lower, upper: guess, f_lower, f_upper: f_lower });
        }
        lower *= 0.5;
        f_lower = problem.eval(lower)?;
        steps += 1;
    }
    let upper = expand_upper(g, lower, guess)?;
    Ok((lower, upper))
}
