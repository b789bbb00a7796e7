//! estimation — algorithms, initializers, and multi-try strategies.
//!
//! Purpose
//! -------
//! Turn a sized, unfitted [`MixtureModel`](crate::mixture::MixtureModel) into
//! the best fit found over several independent tries, while containing the
//! failures that individual tries are expected to hit.
//!
//! Key behaviors
//! -------------
//! - [`algo`]: EM, CEM, SEM and SemiSEM loops with validated
//!   [`options::AlgoOptions`].
//! - [`init`]: random, class and fuzzy starting points with an internal
//!   retry budget and an optional stabilizing short run.
//! - [`strategy`]: simple and full multi-try orchestration, per-try random
//!   streams, and optional parallel tries (`parallel` feature).
//!
//! Invariants & assumptions
//! ------------------------
//! - Step and try failures never cross the strategy boundary; only a
//!   configuration error or the failure of every try does.
//! - Algorithms and initializers are exclusively owned by the strategy that
//!   runs them and cloned per try.
//!
//! Conventions
//! -----------
//! - Per-run summaries are logged at `debug`, discarded tries at `warn`, and
//!   the strategy result at `info` through the `log` facade.

pub mod algo;
pub mod init;
pub mod options;
pub mod strategy;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::algo::{AlgoOutcome, AlgoState, Algorithm, Termination};
pub use self::init::Initializer;
pub use self::options::AlgoOptions;
pub use self::strategy::{
    FullStrategy, FullStrategyParam, SimpleStrategy, SimpleStrategyParam, StrategyOutcome,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        AlgoOptions, AlgoOutcome, AlgoState, Algorithm, FullStrategy, FullStrategyParam,
        Initializer, SimpleStrategy, SimpleStrategyParam, StrategyOutcome, Termination,
    };
}
