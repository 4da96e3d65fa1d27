//! Named predicates for plan filters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::error::{SieveResult, ValidationError};
use crate::opinion::{FilterMode, Predicate, PredicateOpinion};

/// Predicates a [`ScanPlan`](super::ScanPlan) may refer to by name.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Predicate>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an infallible predicate, replacing any previous one with
    /// the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(
            name.into(),
            Arc::new(move |ty: &TypeDescriptor| -> SieveResult<bool> { Ok(predicate(ty)) }),
        );
    }

    /// Registers a predicate that may fail.
    pub fn register_fallible<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&TypeDescriptor) -> SieveResult<bool> + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    /// Looks up a predicate.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Predicate> {
        self.predicates.get(name).cloned()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Builds a predicate filter for `name`.
    ///
    /// # Errors
    /// `MissingPredicate` if `name` is not registered.
    pub fn opinion(&self, mode: FilterMode, name: &str) -> Result<PredicateOpinion, ValidationError> {
        PredicateOpinion::try_new(mode, self.get(name)).map_err(|_| ValidationError::MissingPredicate {
            name: name.to_string(),
        })
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("PredicateRegistry").field("names", &names).finish()
    }
}
