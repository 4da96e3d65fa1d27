//! The introspection contract.
//!
//! Implementations wrap whatever metadata facility the host has (a plugin
//! registry, generated inventories, a compiler database). Keeping it behind
//! a trait lets the resolver run against synthetic descriptor sets.

use std::sync::Arc;

use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::SieveResult;
use crate::interfaces::TypeShape;

/// Source of type metadata.
///
/// # Contract
/// - `descriptors_of` must be side-effect free and return the same set for
///   the same module for the lifetime of the process.
/// - Implementations must be safe to share across threads.
/// - Implementations must not call back into a
///   [`NamespaceIndex`](crate::namespace::NamespaceIndex) that reads from
///   them. The index holds its write lock while it enumerates a module, so
///   a reentrant lookup deadlocks.
pub trait Introspector: Send + Sync {
    /// All descriptors owned by `module`.
    fn descriptors_of(&self, module: ModuleId) -> SieveResult<Vec<TypeDescriptor>>;

    /// The module that owns `marker`.
    fn owning_module(&self, marker: &TypeDescriptor) -> SieveResult<ModuleId>;

    /// The namespace path of `marker`.
    fn namespace_path_of(&self, marker: &TypeDescriptor) -> SieveResult<String>;

    /// Structural shape of `ty`, when the backend knows it.
    fn shape_of(&self, _ty: &TypeDescriptor) -> SieveResult<Option<Arc<TypeShape>>> {
        Ok(None)
    }
}
