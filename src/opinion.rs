//! Opinions: three-valued voters over type descriptors.
//!
//! An [`Opinion`] looks at one [`TypeDescriptor`] and answers
//! [`Advice::Include`], [`Advice::Exclude`] or [`Advice::Indifferent`].
//! The crate ships three variants (namespace prefix, predicate, explicit
//! type lists); any other component can plug in its own by implementing
//! the trait, or by passing a closure.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::error::{SieveResult, ValidationError};

/// A single vote on a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    /// Keep the type.
    Include,
    /// Drop the type.
    Exclude,
    /// No opinion.
    Indifferent,
}

/// Direction of a filter: what it votes when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Vote include on match.
    Include,
    /// Vote exclude on match.
    Exclude,
}

impl FilterMode {
    /// The advice given when the filter matches.
    #[must_use]
    pub const fn advice(self) -> Advice {
        match self {
            Self::Include => Advice::Include,
            Self::Exclude => Advice::Exclude,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => write!(f, "include"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// Something with a view on whether a type should be kept.
pub trait Opinion: Send + Sync {
    /// Vote on `ty`.
    ///
    /// An error aborts the whole resolution it is part of.
    fn advise(&self, ty: &TypeDescriptor) -> SieveResult<Advice>;

    /// The direction this opinion filters in, if it has one.
    ///
    /// Scans latch their polarity on the first directional filter.
    fn mode(&self) -> Option<FilterMode> {
        None
    }
}

impl<F> Opinion for F
where
    F: Fn(&TypeDescriptor) -> Advice + Send + Sync,
{
    fn advise(&self, ty: &TypeDescriptor) -> SieveResult<Advice> {
        Ok(self(ty))
    }
}

/// Matches types whose namespace path starts with a prefix.
///
/// The comparison is a plain string prefix: `App.Web` also matches
/// `App.WebHooks`. Use a trailing dot to stay within one subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePrefixOpinion {
    mode: FilterMode,
    prefix: String,
}

impl NamespacePrefixOpinion {
    /// Creates a namespace prefix filter.
    #[must_use]
    pub fn new(mode: FilterMode, prefix: impl Into<String>) -> Self {
        Self {
            mode,
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Opinion for NamespacePrefixOpinion {
    fn advise(&self, ty: &TypeDescriptor) -> SieveResult<Advice> {
        if ty.namespace.starts_with(&self.prefix) {
            Ok(self.mode.advice())
        } else {
            Ok(Advice::Indifferent)
        }
    }

    fn mode(&self) -> Option<FilterMode> {
        Some(self.mode)
    }
}

/// Shared, fallible type predicate.
pub type Predicate = Arc<dyn Fn(&TypeDescriptor) -> SieveResult<bool> + Send + Sync>;

/// Matches types accepted by a caller-supplied predicate.
#[derive(Clone)]
pub struct PredicateOpinion {
    mode: FilterMode,
    predicate: Predicate,
}

impl PredicateOpinion {
    /// Creates a predicate filter from an infallible test.
    pub fn new<F>(mode: FilterMode, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        Self {
            mode,
            predicate: Arc::new(move |ty: &TypeDescriptor| -> SieveResult<bool> { Ok(predicate(ty)) }),
        }
    }

    /// Creates a predicate filter whose test may fail. Failures propagate
    /// out of the resolution unchanged.
    pub fn fallible<F>(mode: FilterMode, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> SieveResult<bool> + Send + Sync + 'static,
    {
        Self {
            mode,
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a predicate filter from an optional shared predicate.
    ///
    /// # Errors
    /// `InvalidArgument` naming `predicate` when it is absent.
    pub fn try_new(mode: FilterMode, predicate: Option<Predicate>) -> Result<Self, ValidationError> {
        let predicate = predicate.ok_or_else(|| ValidationError::InvalidArgument {
            param: "predicate",
            reason: "a predicate filter requires a predicate".to_string(),
        })?;
        Ok(Self { mode, predicate })
    }
}

impl Opinion for PredicateOpinion {
    fn advise(&self, ty: &TypeDescriptor) -> SieveResult<Advice> {
        if (self.predicate)(ty)? {
            Ok(self.mode.advice())
        } else {
            Ok(Advice::Indifferent)
        }
    }

    fn mode(&self) -> Option<FilterMode> {
        Some(self.mode)
    }
}

impl fmt::Debug for PredicateOpinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateOpinion")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Explicit allow and deny lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeListOpinion {
    include: HashSet<TypeDescriptor>,
    exclude: HashSet<TypeDescriptor>,
}

impl TypeListOpinion {
    /// Creates a list opinion.
    ///
    /// # Errors
    /// `OverlappingTypeLists` if any type appears in both lists.
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = TypeDescriptor>,
        E: IntoIterator<Item = TypeDescriptor>,
    {
        let include: HashSet<TypeDescriptor> = include.into_iter().collect();
        let exclude: HashSet<TypeDescriptor> = exclude.into_iter().collect();

        let mut overlapping: Vec<String> = include
            .intersection(&exclude)
            .map(TypeDescriptor::full_name)
            .collect();
        if !overlapping.is_empty() {
            overlapping.sort();
            return Err(ValidationError::OverlappingTypeLists { overlapping });
        }

        Ok(Self { include, exclude })
    }

    /// Types voted in.
    #[must_use]
    pub fn included(&self) -> &HashSet<TypeDescriptor> {
        &self.include
    }

    /// Types voted out.
    #[must_use]
    pub fn excluded(&self) -> &HashSet<TypeDescriptor> {
        &self.exclude
    }
}

impl Opinion for TypeListOpinion {
    fn advise(&self, ty: &TypeDescriptor) -> SieveResult<Advice> {
        if self.include.contains(ty) {
            Ok(Advice::Include)
        } else if self.exclude.contains(ty) {
            Ok(Advice::Exclude)
        } else {
            Ok(Advice::Indifferent)
        }
    }
}
