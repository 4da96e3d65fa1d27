//! Scan polarity: the inclusion state every type starts from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::opinion::FilterMode;

/// Baseline inclusion before any opinion is applied.
///
/// A scan latches its polarity on the first directional filter and never
/// changes it afterwards:
/// - an include filter first makes the scan an allow-list
///   ([`Polarity::Exclusive`]: nothing is kept unless included);
/// - an exclude filter first makes it a deny-list
///   ([`Polarity::Inclusive`]: everything is kept unless excluded).
///
/// An unlatched scan behaves like an exclusive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// No directional filter registered yet.
    #[default]
    Unset,
    /// Types start included.
    Inclusive,
    /// Types start excluded.
    Exclusive,
}

impl Polarity {
    /// Whether a type is included before any opinion votes.
    #[must_use]
    pub const fn default_inclusion(self) -> bool {
        matches!(self, Self::Inclusive)
    }

    /// The polarity a first filter in `mode` establishes.
    #[must_use]
    pub const fn established_by(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Include => Self::Exclusive,
            FilterMode::Exclude => Self::Inclusive,
        }
    }

    /// Latch on `mode` if still unset; otherwise keep the current value.
    #[must_use]
    pub const fn latch(self, mode: FilterMode) -> Self {
        match self {
            Self::Unset => Self::established_by(mode),
            latched => latched,
        }
    }

    /// Returns true once a directional filter has been registered.
    #[must_use]
    pub const fn is_latched(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Inclusive => write!(f, "inclusive"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}
