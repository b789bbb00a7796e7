//! core — model contract, family contract, generic composer, and online
//! statistics shared by the estimation engine.
//!
//! Purpose
//! -------
//! Collect the building blocks the engine is written against: the
//! [`MixtureModel`] seam, the [`Family`] contract implemented by each
//! distribution family, the generic [`Mixture`] composer tying the two
//! together, and the [`OnlineStatistic`] / [`ParametersHandler`] pair used to
//! average stochastic parameter draws.
//!
//! Key behaviors
//! -------------
//! - [`Mixture<F>`] owns proportions, posteriors, and the hard partition, and
//!   implements the E/M/C/S steps once for every family.
//! - [`numerics`] provides log-sum-exp normalization, lowest-index argmax,
//!   categorical draws, entropy, and the relative convergence measure.
//! - [`validation`] and [`names`] cover option checks and case-insensitive
//!   name lookup for algorithms, initializers, and criteria.
//!
//! Invariants & assumptions
//! ------------------------
//! - After every successful E-step, each posterior row sums to one and
//!   proportions sum to one.
//! - `K` and `N` are fixed for the lifetime of a [`Mixture`]; a handler is
//!   resized to the model's [`ParamShape`] before its first update.
//!
//! Conventions
//! -----------
//! - Data matrices are `N × d` (`ndarray::Array2<f64>`), posteriors `N × K`,
//!   family parameters `K × d` unless shared across clusters.
//! - This module performs no logging; failures are reported as
//!   [`MixError`](crate::mixture::errors::MixError).

pub mod composer;
pub mod family;
pub mod handler;
pub mod model;
pub mod names;
pub mod numerics;
pub mod statistics;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::composer::Mixture;
pub use self::family::Family;
pub use self::handler::{ParamShape, ParametersHandler};
pub use self::model::MixtureModel;
pub use self::names::{AlgoKind, CriterionKind, InitKind};
pub use self::statistics::{MatrixStatistic, OnlineStatistic, ScalarStatistic, VectorStatistic};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::mixture::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::composer::Mixture;
    pub use super::family::Family;
    pub use super::handler::{ParamShape, ParametersHandler};
    pub use super::model::MixtureModel;
    pub use super::names::{AlgoKind, CriterionKind, InitKind};
    pub use super::statistics::{OnlineStatistic, ScalarStatistic, VectorStatistic};
}
