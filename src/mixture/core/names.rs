//! Name lookup for algorithm, initialization, and criterion variants.
//!
//! Every enum implements a strict, case-insensitive `FromStr` (unknown names
//! are configuration errors) and a lenient `from_name` that falls back to the
//! documented default.
use crate::mixture::errors::MixError;
use std::{fmt, str::FromStr};

/// Iteration algorithm of the EM family.
///
/// Parsing accepts `"em"`, `"cem"`, `"sem"`, `"semisem"` (any case, `_`/`-`
/// separators ignored). Default: `Em`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlgoKind {
    #[default]
    Em,
    Cem,
    Sem,
    SemiSem,
}

/// Starting-point generator.
///
/// Parsing accepts `"random"`, `"class"`, `"fuzzy"`. Default: `Class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InitKind {
    Random,
    #[default]
    Class,
    Fuzzy,
}

/// Information criterion used to rank fitted candidates.
///
/// Parsing accepts `"aic"`, `"bic"`, `"icl"`, `"ml"`. Default: `Bic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CriterionKind {
    Aic,
    #[default]
    Bic,
    Icl,
    Ml,
}

fn normalize(name: &str) -> String {
    name.trim().chars().filter(|c| *c != '_' && *c != '-').collect::<String>().to_lowercase()
}

impl FromStr for AlgoKind {
    type Err = MixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "em" => Ok(AlgoKind::Em),
            "cem" => Ok(AlgoKind::Cem),
            "sem" => Ok(AlgoKind::Sem),
            "semisem" => Ok(AlgoKind::SemiSem),
            _ => Err(MixError::UnknownName {
                name: s.to_string(),
                expected: "one of 'em', 'cem', 'sem', 'semiSem' (case insensitive)",
            }),
        }
    }
}

impl FromStr for InitKind {
    type Err = MixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "random" => Ok(InitKind::Random),
            "class" => Ok(InitKind::Class),
            "fuzzy" => Ok(InitKind::Fuzzy),
            _ => Err(MixError::UnknownName {
                name: s.to_string(),
                expected: "one of 'random', 'class', 'fuzzy' (case insensitive)",
            }),
        }
    }
}

impl FromStr for CriterionKind {
    type Err = MixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "aic" => Ok(CriterionKind::Aic),
            "bic" => Ok(CriterionKind::Bic),
            "icl" => Ok(CriterionKind::Icl),
            "ml" => Ok(CriterionKind::Ml),
            _ => Err(MixError::UnknownName {
                name: s.to_string(),
                expected: "one of 'AIC', 'BIC', 'ICL', 'ML' (case insensitive)",
            }),
        }
    }
}

macro_rules! lenient_lookup {
    ($($kind:ty),*) => {$(
        impl $kind {
            /// Parse `name`, falling back to the default variant when it is
            /// not recognized.
            pub fn from_name(name: &str) -> Self {
                name.parse().unwrap_or_default()
            }
        }
    )*};
}

lenient_lookup!(AlgoKind, InitKind, CriterionKind);

impl fmt::Display for AlgoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlgoKind::Em => "EM",
            AlgoKind::Cem => "CEM",
            AlgoKind::Sem => "SEM",
            AlgoKind::SemiSem => "SemiSEM",
        })
    }
}

impl fmt::Display for InitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitKind::Random => "random",
            InitKind::Class => "class",
            InitKind::Fuzzy => "fuzzy",
        })
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CriterionKind::Aic => "AIC",
            CriterionKind::Bic => "BIC",
            CriterionKind::Icl => "ICL",
            CriterionKind::Ml => "ML",
        })
    }
}
