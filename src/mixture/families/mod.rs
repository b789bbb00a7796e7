//! families — reference distribution families and their parameter handlers.
//!
//! - [`gaussian`]: diagonal Gaussian, mean and standard deviation per
//!   cluster and variable.
//! - [`gamma`]: Gamma with a cluster-specific shape and a shared scale.
//! - [`poisson`]: Poisson rate per cluster and variable.
//!
//! Each family implements [`Family`](crate::mixture::core::Family) and ships a
//! flat [`ParametersHandler`](crate::mixture::core::ParametersHandler) whose
//! accumulators mirror its parameter decomposition.

pub mod gamma;
pub mod gaussian;
pub mod poisson;

pub use self::gamma::{GammaFamily, GammaHandler, GammaParams};
pub use self::gaussian::{DiagGaussian, GaussianHandler, GaussianParams};
pub use self::poisson::{PoissonFamily, PoissonHandler, PoissonParams};

/// Diagonal Gaussian mixture.
pub type GaussianMixture = crate::mixture::core::Mixture<DiagGaussian>;
/// Gamma mixture with shared scale.
pub type GammaMixture = crate::mixture::core::Mixture<GammaFamily>;
/// Poisson mixture.
pub type PoissonMixture = crate::mixture::core::Mixture<PoissonFamily>;
