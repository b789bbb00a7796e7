//! mixture — finite mixture models: contracts, reference families, and errors.
//!
//! Purpose
//! -------
//! Provide everything the estimation engine needs to know about a mixture
//! model without tying it to one distribution family. [`core`] defines the
//! model and family contracts plus the generic composer; [`families`] ships
//! Gaussian, Gamma, and Poisson implementations; [`errors`] holds the single
//! error surface shared with the engine.
//!
//! Downstream usage
//! ----------------
//! 1. Build a model, e.g. `Mixture::new(DiagGaussian::default(), data, k)`.
//! 2. Hand it to a strategy from [`crate::estimation`].
//! 3. Read the fitted state through [`MixtureModel`] accessors and rank
//!    candidates with [`crate::selection`].

pub mod core;
pub mod errors;
pub mod families;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AlgoKind, CriterionKind, Family, InitKind, Mixture, MixtureModel, OnlineStatistic, ParamShape,
    ParametersHandler,
};
pub use self::errors::{ErrorKind, MixError, MixResult};
pub use self::families::{
    DiagGaussian, GammaFamily, GammaMixture, GaussianMixture, PoissonFamily, PoissonMixture,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::mixture::prelude::*;
//
// to import the main mixture surface in a single line.

pub mod prelude {
    pub use super::{
        AlgoKind, CriterionKind, DiagGaussian, ErrorKind, Family, GammaFamily, GammaMixture,
        GaussianMixture, InitKind, MixError, MixResult, Mixture, MixtureModel, OnlineStatistic,
        ParamShape, ParametersHandler, PoissonFamily, PoissonMixture,
    };
}
