//! optimization — scalar root finding and its error surface.
//!
//! Purpose
//! -------
//! Provide the numerical solver layer used by distribution families whose
//! M-step has no closed form (the Gamma shape/scale equations). Callers
//! supply a continuous scalar equation and obtain a root without touching
//! argmin's executor or error types.
//!
//! Key behaviors
//! -------------
//! - [`root_finding::find_root`] runs argmin's Brent solver on a validated
//!   sign-changing bracket.
//! - [`root_finding::expand_upper`] and [`root_finding::bracket_positive`]
//!   build such brackets for monotone equations on `(0, ∞)`.
//! - Configuration issues, missing sign changes, and backend failures are
//!   normalized into [`errors::OptError`] with the alias `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Equations are assumed continuous on the bracket; a non-finite value is
//!   reported as `OptError::NonFiniteObjective`, not a panic.
//!
//! Conventions
//! -----------
//! - This module performs no logging. The optional `obs_slog` feature
//!   attaches argmin's terminal observer to verbose solver runs.
//! - `OptError` converts into `MixError::SolverFailed` at the mixture layer.

pub mod errors;
pub mod root_finding;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::root_finding::{RootOptions, RootOutcome, bracket_positive, expand_upper, find_root};
}
