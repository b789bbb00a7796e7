//! Errors for mixture estimation (configuration checks, initialization
//! retries, estimation failures, and solver failures).
//!
//! This module defines the single error type [`MixError`] shared by the model
//! contract, the reference families, and the estimation engine, together with
//! [`ErrorKind`], the three-way classification every variant belongs to.
//!
//! ## Conventions
//! - **Indices are 0-based**: `row` / `sample` index observations, `col` /
//!   `variable` index data columns, `cluster` indexes mixture components.
//! - Configuration errors are raised before any iteration starts and are
//!   never retried.
//! - Step-level failures (empty cluster, degenerate parameter, zero density)
//!   are `Estimation` errors; the strategy layer recovers from them per try.
//! - [`MixError::InitializationFailed`] and [`MixError::EstimationFailed`]
//!   wrap the last underlying cause together with the number of attempts.
use crate::optimization::errors::OptError;

/// Crate-wide result alias for mixture operations that may produce [`MixError`].
pub type MixResult<T> = Result<T, MixError>;

/// Coarse classification of a [`MixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input or options supplied before `run`; fatal and immediate.
    Configuration,
    /// No admissible starting point could be produced.
    Initialization,
    /// A step could not update the model validly, or every try failed.
    Estimation,
}

/// Unified error type for mixture estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum MixError {
    // ---- Data / model configuration ----
    /// Data matrix has no rows or no columns.
    EmptyData,

    /// A data point is NaN/±inf.
    NonFiniteData { row: usize, col: usize, value: f64 },

    /// A data point lies outside the support of the chosen family.
    InvalidData { row: usize, col: usize, value: f64, reason: &'static str },

    /// Number of clusters must satisfy 1 <= K <= N.
    InvalidNbCluster { nb_cluster: usize, nb_sample: usize, reason: &'static str },

    /// A family option (variance floor, solver setting, ...) is invalid.
    InvalidFamilyOption { name: &'static str, value: f64, reason: &'static str },

    /// Proportions vector has the wrong length or does not sum to one.
    InvalidProportions { len: usize, sum: f64, reason: &'static str },

    /// Posterior matrix has the wrong shape.
    TikShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    // ---- Estimation options ----
    /// Convergence tolerance must be finite and > 0.
    InvalidEpsilon { value: f64, reason: &'static str },

    /// Iteration cap must be > 0.
    InvalidNbIterMax { value: usize, reason: &'static str },

    /// Burn-in must leave at least one accumulated iteration.
    InvalidBurnIn { burn_in: usize, nb_iter_max: usize },

    /// Number of tries must be > 0.
    InvalidNbTry { value: usize, reason: &'static str },

    /// Number of short runs must be > 0.
    InvalidNbShortRun { value: usize },

    /// Unknown algorithm / initialization / criterion name.
    UnknownName { name: String, expected: &'static str },

    /// Model selection was asked to rank an empty candidate list.
    NoCandidate,

    // ---- Step-level numerical failures ----
    /// A cluster's effective weight collapsed below the admissible floor.
    EmptyCluster { cluster: usize, weight: f64 },

    /// A component parameter left its admissible domain.
    DegenerateParameter { cluster: usize, variable: usize, value: f64, reason: &'static str },

    /// Every component assigns zero density to an observation.
    ZeroLikelihood { sample: usize },

    /// Log-likelihood evaluated to NaN/±inf.
    NonFiniteLogLikelihood { value: f64 },

    /// Iteration cap reached while the cap is configured as a failure.
    MaxIterReached { nb_iter: usize },

    /// Numerical solver used by an M-step failed.
    SolverFailed(OptError),

    // ---- Aggregated failures ----
    /// Initializer exhausted its retry budget.
    InitializationFailed { attempts: usize, source: Box<MixError> },

    /// Every try of a strategy failed.
    EstimationFailed { nb_try: usize, source: Box<MixError> },
}

impl MixError {
    /// Classify this error into the configuration / initialization /
    /// estimation taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MixError::EmptyData
            | MixError::NonFiniteData { .. }
            | MixError::InvalidData { .. }
            | MixError::InvalidNbCluster { .. }
            | MixError::InvalidFamilyOption { .. }
            | MixError::InvalidProportions { .. }
            | MixError::TikShapeMismatch { .. }
            | MixError::InvalidEpsilon { .. }
            | MixError::InvalidNbIterMax { .. }
            | MixError::InvalidBurnIn { .. }
            | MixError::InvalidNbTry { .. }
            | MixError::InvalidNbShortRun { .. }
            | MixError::UnknownName { .. }
            | MixError::NoCandidate => ErrorKind::Configuration,
            MixError::InitializationFailed { .. } => ErrorKind::Initialization,
            MixError::EmptyCluster { .. }
            | MixError::DegenerateParameter { .. }
            | MixError::ZeroLikelihood { .. }
            | MixError::NonFiniteLogLikelihood { .. }
            | MixError::MaxIterReached { .. }
            | MixError::SolverFailed(_)
            | MixError::EstimationFailed { .. } => ErrorKind::Estimation,
        }
    }

    /// `true` for errors that must abort immediately instead of being retried.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

impl std::error::Error for MixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MixError::SolverFailed(err) => Some(err),
            MixError::InitializationFailed { source, .. }
            | MixError::EstimationFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for MixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data / model configuration ----
            MixError::EmptyData => {
                write!(f, "Data matrix is empty.")
            }
            MixError::NonFiniteData { row, col, value } => {
                write!(f, "Data point at ({row}, {col}) is non-finite: {value}")
            }
            MixError::InvalidData { row, col, value, reason } => {
                write!(f, "Data point at ({row}, {col}) is invalid: {value}. {reason}")
            }
            MixError::InvalidNbCluster { nb_cluster, nb_sample, reason } => {
                write!(f, "Invalid number of clusters {nb_cluster} for {nb_sample} samples: {reason}")
            }
            MixError::InvalidFamilyOption { name, value, reason } => {
                write!(f, "Invalid family option '{name}' = {value}: {reason}")
            }
            MixError::InvalidProportions { len, sum, reason } => {
                write!(f, "Invalid proportions (len {len}, sum {sum}): {reason}")
            }
            MixError::TikShapeMismatch { expected, found } => {
                write!(f, "Posterior matrix shape mismatch: expected {expected:?}, found {found:?}")
            }

            // ---- Estimation options ----
            MixError::InvalidEpsilon { value, reason } => {
                write!(f, "Invalid convergence tolerance {value}: {reason}")
            }
            MixError::InvalidNbIterMax { value, reason } => {
                write!(f, "Invalid maximum iterations {value}: {reason}")
            }
            MixError::InvalidBurnIn { burn_in, nb_iter_max } => {
                write!(
                    f,
                    "Burn-in {burn_in} must be strictly less than the iteration cap {nb_iter_max}"
                )
            }
            MixError::InvalidNbTry { value, reason } => {
                write!(f, "Invalid number of tries {value}: {reason}")
            }
            MixError::InvalidNbShortRun { value } => {
                write!(f, "Invalid number of short runs {value}: must be greater than zero")
            }
            MixError::UnknownName { name, expected } => {
                write!(f, "Unknown name '{name}'. Valid options are {expected}.")
            }
            MixError::NoCandidate => {
                write!(f, "Model selection requires at least one candidate")
            }

            // ---- Step-level numerical failures ----
            MixError::EmptyCluster { cluster, weight } => {
                write!(f, "Cluster {cluster} collapsed: effective weight {weight}")
            }
            MixError::DegenerateParameter { cluster, variable, value, reason } => {
                write!(
                    f,
                    "Degenerate parameter for cluster {cluster}, variable {variable}: {value}. {reason}"
                )
            }
            MixError::ZeroLikelihood { sample } => {
                write!(f, "Observation {sample} has zero density under every component")
            }
            MixError::NonFiniteLogLikelihood { value } => {
                write!(f, "Non-finite log-likelihood: {value}")
            }
            MixError::MaxIterReached { nb_iter } => {
                write!(f, "Iteration cap reached after {nb_iter} iterations without convergence")
            }
            MixError::SolverFailed(err) => {
                write!(f, "M-step solver failed: {err}")
            }

            // ---- Aggregated failures ----
            MixError::InitializationFailed { attempts, source } => {
                write!(f, "Initialization failed after {attempts} attempt(s); last error: {source}")
            }
            MixError::EstimationFailed { nb_try, source } => {
                write!(f, "Estimation failed: all {nb_try} tries failed; last error: {source}")
            }
        }
    }
}

impl From<OptError> for MixError {
    fn from(err: OptError) -> MixError {
        MixError::SolverFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The taxonomy mapping exposed by `MixError::kind`.
    // - `Display` output for aggregated failures.
    // - Conversion from `OptError` and `source()` chaining.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that each family of variants lands in its taxonomy bucket.
    fn kind_classifies_variants() {
        assert_eq!(
            MixError::InvalidNbTry { value: 0, reason: "x" }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(MixError::EmptyCluster { cluster: 1, weight: 0.0 }.kind(), ErrorKind::Estimation);
        let init = MixError::InitializationFailed {
            attempts: 3,
            source: Box::new(MixError::EmptyCluster { cluster: 0, weight: 0.0 }),
        };
        assert_eq!(init.kind(), ErrorKind::Initialization);
        assert!(!init.is_configuration());
    }

    #[test]
    // Purpose
    // -------
    // Verify that aggregated failures report their attempt count and cause.
    //
    // Given
    // -----
    // - An `EstimationFailed` wrapping an `InitializationFailed`.
    //
    // Expect
    // ------
    // - The message names the number of tries and the nested cause.
    fn estimation_failed_display_mentions_tries_and_cause() {
        // Arrange
        let err = MixError::EstimationFailed {
            nb_try: 4,
            source: Box::new(MixError::InitializationFailed {
                attempts: 2,
                source: Box::new(MixError::ZeroLikelihood { sample: 7 }),
            }),
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("all 4 tries"));
        assert!(msg.contains("2 attempt(s)"));
        assert!(msg.contains("Observation 7"));
    }

    #[test]
    // Purpose
    // -------
    // Verify `From<OptError>` and the `source()` chain of wrapped errors.
    fn solver_errors_are_wrapped_and_chained() {
        use std::error::Error;

        let err: MixError = OptError::MissingRoot.into();
        assert_eq!(err, MixError::SolverFailed(OptError::MissingRoot));
        assert_eq!(err.kind(), ErrorKind::Estimation);
        assert!(err.source().is_some());
    }
}
