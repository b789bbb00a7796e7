//! selection — information criteria and caller-level model choice.
//!
//! A strategy compares tries at fixed `K` by raw log-likelihood. Choosing
//! between fitted candidates with different `K` or families goes through a
//! [`Criterion`] here: fit each candidate, then call [`select_model`].

pub mod criterion;

pub use self::criterion::{Criterion, FitSummary, Selection, select_model};

pub mod prelude {
    pub use super::{Criterion, FitSummary, Selection, select_model};
}
