//! rust_mixtures — generic finite-mixture estimation engine.
//!
//! Purpose
//! -------
//! Fit finite mixture models of any distribution family by maximum
//! likelihood with EM-type algorithms, multiple independent tries, and
//! penalized model selection.
//!
//! Key behaviors
//! -------------
//! - [`mixture`]: the model and family contracts, the generic composer
//!   `Mixture<F>`, online statistics for stochastic averaging, reference
//!   Gaussian / Gamma / Poisson families, and the error surface.
//! - [`estimation`]: EM, CEM, SEM and SemiSEM algorithms, random / class /
//!   fuzzy initializers, and the simple and full multi-try strategies.
//! - [`selection`]: AIC, BIC, ICL and ML criteria for ranking fitted
//!   candidates across `K` or families.
//! - [`optimization`]: bracketed scalar root finding used by families
//!   without closed-form M-steps.
//!
//! Invariants & assumptions
//! ------------------------
//! - Posterior rows and proportions sum to one after every successful
//!   E-step; `K` and `N` never change during estimation.
//! - Public entrypoints that can fail return `MixResult<T>`; invalid input
//!   is a typed error, never a panic.
//!
//! Conventions
//! -----------
//! - Data are `N × d` `ndarray` matrices of `f64`.
//! - The crate logs through the `log` facade and never installs a logger.
//! - Randomness is injected: strategies take an optional seed and hand each
//!   try its own `StdRng`.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_mixtures::prelude::*;
//!
//! # fn main() -> MixResult<()> {
//! let data = array![[-2.1], [-1.9], [-2.0], [2.0], [2.2], [1.8]];
//! let mut model = Mixture::new(DiagGaussian::default(), data, 2)?;
//! let mut strategy = SimpleStrategy::default();
//! strategy.set_nb_try(10)?;
//! strategy.set_seed(Some(7));
//! let outcome = strategy.run(&mut model)?;
//! let bic = Criterion::new(CriterionKind::Bic).evaluate(&model)?;
//! println!("ll = {}, BIC = {bic}, labels = {}", outcome.log_likelihood, model.predict());
//! # Ok(())
//! # }
//! ```

pub mod estimation;
pub mod mixture;
pub mod optimization;
pub mod selection;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::prelude::*;
//
// to import the main surface in a single line.

pub mod prelude {
    pub use crate::estimation::prelude::*;
    pub use crate::mixture::prelude::*;
    pub use crate::selection::prelude::*;
}
