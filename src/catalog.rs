//! Candidate catalog: where types come from.
//!
//! A [`Catalog`] remembers registered sources (whole modules, namespaces,
//! explicit types) and expands them into one deduplicated candidate list
//! on demand. Nothing is cached here; every call to
//! [`Catalog::candidates`] re-reads the sources.

use std::collections::HashSet;
use std::sync::Arc;

use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::SieveResult;
use crate::introspect::Introspector;
use crate::namespace::Namespace;

/// Registered type sources.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<ModuleId>,
    namespaces: Vec<Arc<Namespace>>,
    types: Vec<TypeDescriptor>,
    // Membership sets mirroring the vectors above.
    module_keys: HashSet<ModuleId>,
    namespace_keys: HashSet<(ModuleId, String)>,
    type_keys: HashSet<TypeDescriptor>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every type of `module`. Registering a module twice is a no-op.
    pub fn register_module(&mut self, module: ModuleId) {
        if self.module_keys.insert(module) {
            self.modules.push(module);
        }
    }

    /// Adds every type of `namespace`. Namespaces with the same module and
    /// path are registered once.
    pub fn register_namespace(&mut self, namespace: Arc<Namespace>) {
        let key = (namespace.module(), namespace.path().to_string());
        if self.namespace_keys.insert(key) {
            self.namespaces.push(namespace);
        }
    }

    /// Adds explicit types. Already registered types keep their first
    /// position.
    pub fn register_types<I>(&mut self, types: I)
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        for ty in types {
            if !self.type_keys.contains(&ty) {
                self.type_keys.insert(ty.clone());
                self.types.push(ty);
            }
        }
    }

    /// Registered modules, in registration order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Registered namespaces, in registration order.
    #[must_use]
    pub fn namespaces(&self) -> &[Arc<Namespace>] {
        &self.namespaces
    }

    /// Explicitly registered types.
    #[must_use]
    pub fn explicit_types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Returns true if no source has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.namespaces.is_empty() && self.types.is_empty()
    }

    /// Union of all sources, deduplicated by identity.
    ///
    /// Order: module types (per module, in enumeration order), then
    /// namespace members, then explicit types; first occurrence wins.
    pub fn candidates(&self, introspector: &dyn Introspector) -> SieveResult<Vec<TypeDescriptor>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for module in &self.modules {
            for ty in introspector.descriptors_of(*module)? {
                if seen.insert(ty.clone()) {
                    out.push(ty);
                }
            }
        }

        let from_namespaces = self.namespaces.iter().flat_map(|ns| ns.types().iter());
        for ty in from_namespaces.chain(self.types.iter()) {
            if seen.insert(ty.clone()) {
                out.push(ty.clone());
            }
        }

        Ok(out)
    }
}
