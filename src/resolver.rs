//! The opinion fold.
//!
//! Each candidate starts at its polarity's default inclusion and is walked
//! through the opinion chain in registration order. Only a vote that
//! changes the current state has any effect: an `Include` on an already
//! included type, or an `Exclude` on an already excluded one, is a no-op.
//! The last direction-changing vote therefore decides, regardless of how
//! specific the opinion that cast it was.

use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::descriptor::TypeDescriptor;
use crate::error::SieveResult;
use crate::introspect::Introspector;
use crate::opinion::{Advice, Opinion};
use crate::polarity::Polarity;

/// Applies one vote to the current inclusion state.
#[must_use]
pub const fn apply_advice(included: bool, advice: Advice) -> bool {
    match (included, advice) {
        (false, Advice::Include) => true,
        (true, Advice::Exclude) => false,
        (state, _) => state,
    }
}

/// Ordered opinion chain under a fixed polarity.
#[derive(Clone, Default)]
pub struct Resolver {
    polarity: Polarity,
    opinions: Vec<Arc<dyn Opinion>>,
}

impl Resolver {
    /// Creates a resolver with no opinions.
    #[must_use]
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            opinions: Vec::new(),
        }
    }

    /// Creates a resolver with an initial chain.
    #[must_use]
    pub fn with_opinions(polarity: Polarity, opinions: Vec<Arc<dyn Opinion>>) -> Self {
        Self { polarity, opinions }
    }

    /// Appends an opinion to the end of the chain.
    pub fn push(&mut self, opinion: Arc<dyn Opinion>) {
        self.opinions.push(opinion);
    }

    /// The polarity in effect.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Number of opinions in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    /// Decides one type. `leading` opinions are consulted before the chain.
    pub fn is_included(
        &self,
        ty: &TypeDescriptor,
        leading: &[Arc<dyn Opinion>],
    ) -> SieveResult<bool> {
        let mut included = self.polarity.default_inclusion();
        for (position, opinion) in leading.iter().chain(self.opinions.iter()).enumerate() {
            let advice = opinion.advise(ty)?;
            let next = apply_advice(included, advice);
            if next != included {
                tracing::trace!(
                    target: "resolver",
                    ty = %ty,
                    position,
                    included = next,
                    "direction_changed"
                );
            }
            included = next;
        }
        Ok(included)
    }

    /// Keeps the candidates the fold includes, in candidate order.
    ///
    /// The first failing opinion aborts the whole call.
    pub fn resolve<I>(
        &self,
        candidates: I,
        leading: &[Arc<dyn Opinion>],
    ) -> SieveResult<Vec<TypeDescriptor>>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut considered = 0usize;
        let mut kept = Vec::new();
        for ty in candidates {
            considered += 1;
            if self.is_included(&ty, leading)? {
                kept.push(ty);
            }
        }

        tracing::debug!(
            target: "resolver",
            polarity = %self.polarity,
            opinions = leading.len() + self.opinions.len(),
            considered,
            kept = kept.len(),
            "resolved"
        );
        Ok(kept)
    }

    /// Expands `catalog` and resolves its candidates.
    pub fn resolve_catalog(
        &self,
        catalog: &Catalog,
        introspector: &dyn Introspector,
        leading: &[Arc<dyn Opinion>],
    ) -> SieveResult<Vec<TypeDescriptor>> {
        self.resolve(catalog.candidates(introspector)?, leading)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("polarity", &self.polarity)
            .field("opinions", &self.opinions.len())
            .finish()
    }
}
