//! Namespace grouping and the memoizing namespace index.
//!
//! A [`Namespace`] is the set of types in one module sharing one namespace
//! path. [`NamespaceIndex`] builds it from a marker type on first use and
//! hands out the same `Arc` forever after.
//!
//! # Lifecycle
//! The cache starts empty, is filled lazily, and is never invalidated or
//! evicted. Share one index (behind an `Arc`) across every scan that should
//! observe the same namespace instances; tests can build isolated indexes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::{SieveError, SieveResult};
use crate::introspect::Introspector;

/// Types sharing one namespace path within one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    module: ModuleId,
    path: String,
    types: Vec<TypeDescriptor>,
}

impl Namespace {
    fn new(module: ModuleId, path: String, types: Vec<TypeDescriptor>) -> Self {
        Self {
            module,
            path,
            types,
        }
    }

    /// Owning module.
    #[must_use]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    /// Dotted namespace path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Member types, in the order the introspector enumerated them.
    #[must_use]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.module)
    }
}

fn lock_err() -> SieveError {
    SieveError::internal("poisoned lock: namespace index")
}

/// Memoizing marker → [`Namespace`] cache.
pub struct NamespaceIndex {
    introspector: Arc<dyn Introspector>,
    cache: RwLock<HashMap<TypeDescriptor, Arc<Namespace>>>,
}

impl NamespaceIndex {
    /// Creates an empty index backed by `introspector`.
    #[must_use]
    pub fn new(introspector: Arc<dyn Introspector>) -> Self {
        Self {
            introspector,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The introspector this index reads from.
    #[must_use]
    pub fn introspector(&self) -> &Arc<dyn Introspector> {
        &self.introspector
    }

    /// Returns the namespace containing `marker`.
    ///
    /// Hits are served under a shared read lock. Misses take the write
    /// lock, re-check, then compute and store, so concurrent first lookups
    /// of one marker all observe the same instance.
    ///
    /// Not reentrant: the introspector is called with the write lock held.
    pub fn of(&self, marker: &TypeDescriptor) -> SieveResult<Arc<Namespace>> {
        if let Some(hit) = self.cached(marker)? {
            return Ok(hit);
        }

        let mut cache = self.cache.write().map_err(|_| lock_err())?;
        if let Some(hit) = cache.get(marker) {
            return Ok(Arc::clone(hit));
        }

        let namespace = Arc::new(self.build(marker)?);
        tracing::debug!(
            target: "namespace_index",
            marker = %marker,
            namespace = %namespace.path(),
            types = namespace.types().len(),
            "namespace_cached"
        );
        cache.insert(marker.clone(), Arc::clone(&namespace));
        Ok(namespace)
    }

    /// Number of cached markers.
    pub fn len(&self) -> SieveResult<usize> {
        Ok(self.cache.read().map_err(|_| lock_err())?.len())
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> SieveResult<bool> {
        Ok(self.len()? == 0)
    }

    fn cached(&self, marker: &TypeDescriptor) -> SieveResult<Option<Arc<Namespace>>> {
        let cache = self.cache.read().map_err(|_| lock_err())?;
        Ok(cache.get(marker).cloned())
    }

    fn build(&self, marker: &TypeDescriptor) -> SieveResult<Namespace> {
        let module = self.introspector.owning_module(marker)?;
        let path = self.introspector.namespace_path_of(marker)?;
        let types = self
            .introspector
            .descriptors_of(module)?
            .into_iter()
            .filter(|ty| ty.namespace == path)
            .collect();
        Ok(Namespace::new(module, path, types))
    }
}

impl fmt::Debug for NamespaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.cache.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("NamespaceIndex")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}
