//! Validation helpers for estimation settings.
//!
//! Each helper returns the validated value or a configuration-class
//! [`MixError`], so option constructors can fail fast before any iteration
//! starts. None of them panic.
use crate::mixture::errors::{MixError, MixResult};

/// Validate a relative log-likelihood tolerance.
///
/// # Errors
/// `MixError::InvalidEpsilon` if `epsilon` is NaN, ±∞, or `<= 0`.
pub fn validate_epsilon(epsilon: f64) -> MixResult<f64> {
    if !epsilon.is_finite() {
        return Err(MixError::InvalidEpsilon {
            value: epsilon,
            reason: "Convergence tolerance must be finite.",
        });
    }
    if epsilon <= 0.0 {
        return Err(MixError::InvalidEpsilon {
            value: epsilon,
            reason: "Convergence tolerance must be strictly positive.",
        });
    }
    Ok(epsilon)
}

/// Validate an iteration cap.
///
/// # Errors
/// `MixError::InvalidNbIterMax` if `nb_iter_max == 0`.
pub fn validate_nb_iter_max(nb_iter_max: usize) -> MixResult<usize> {
    if nb_iter_max == 0 {
        return Err(MixError::InvalidNbIterMax {
            value: nb_iter_max,
            reason: "At least one iteration is required.",
        });
    }
    Ok(nb_iter_max)
}

/// Validate a stochastic burn-in against the iteration cap.
///
/// # Errors
/// `MixError::InvalidBurnIn` unless `burn_in < nb_iter_max`, which leaves at
/// least one iteration whose parameters are accumulated.
pub fn validate_burn_in(burn_in: usize, nb_iter_max: usize) -> MixResult<usize> {
    if burn_in >= nb_iter_max {
        return Err(MixError::InvalidBurnIn { burn_in, nb_iter_max });
    }
    Ok(burn_in)
}

/// Validate a number of tries (strategy or initializer).
///
/// # Errors
/// `MixError::InvalidNbTry` if `nb_try == 0`.
pub fn validate_nb_try(nb_try: usize) -> MixResult<usize> {
    if nb_try == 0 {
        return Err(MixError::InvalidNbTry { value: nb_try, reason: "At least one try is required." });
    }
    Ok(nb_try)
}

/// Validate the number of short runs of a full strategy.
///
/// # Errors
/// `MixError::InvalidNbShortRun` if `nb_short_run == 0`.
pub fn validate_nb_short_run(nb_short_run: usize) -> MixResult<usize> {
    if nb_short_run == 0 {
        return Err(MixError::InvalidNbShortRun { value: nb_short_run });
    }
    Ok(nb_short_run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify boundary values of every validator.
    fn validators_reject_boundary_values() {
        assert!(matches!(validate_epsilon(0.0), Err(MixError::InvalidEpsilon { .. })));
        assert!(matches!(validate_epsilon(-1e-6), Err(MixError::InvalidEpsilon { .. })));
        assert!(matches!(validate_epsilon(f64::INFINITY), Err(MixError::InvalidEpsilon { .. })));
        assert_eq!(validate_epsilon(1e-8).unwrap(), 1e-8);

        assert!(validate_nb_iter_max(0).is_err());
        assert_eq!(validate_nb_iter_max(1).unwrap(), 1);

        assert!(matches!(
            validate_burn_in(10, 10),
            Err(MixError::InvalidBurnIn { burn_in: 10, nb_iter_max: 10 })
        ));
        assert_eq!(validate_burn_in(9, 10).unwrap(), 9);

        assert!(validate_nb_try(0).unwrap_err().is_configuration());
        assert!(validate_nb_short_run(0).unwrap_err().is_configuration());
        assert_eq!(validate_nb_short_run(3).unwrap(), 3);
    }
}
