//! Type descriptors and module identity.
//!
//! A [`TypeDescriptor`] is the key the whole crate works with: an
//! immutable identity for one discoverable type. Descriptors are produced
//! by an [`Introspector`](crate::introspect::Introspector) and compared by
//! value; nothing in the crate mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a module (a unit that owns a set of types).
///
/// # Examples
///
/// ```
/// use typesieve::ModuleId;
///
/// let a = ModuleId::from_name("app.core");
/// let b = ModuleId::from_name("app.core");
/// assert_eq!(a, b);
/// assert_ne!(a, ModuleId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Uuid);

impl ModuleId {
    /// Creates a new random module ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a deterministic module ID from a module name.
    ///
    /// The same name always maps to the same ID, across processes.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// Creates a module ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ModuleId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identity of one discoverable type.
///
/// Two descriptors are equal exactly when they name the same type in the
/// same module. The namespace path is part of the fully qualified name.
///
/// # Examples
///
/// ```
/// use typesieve::{ModuleId, TypeDescriptor};
///
/// let module = ModuleId::from_name("app.core");
/// let ty = TypeDescriptor::new(module, "App.Services", "Mailer");
/// assert_eq!(ty.full_name(), "App.Services.Mailer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Owning module.
    pub module: ModuleId,
    /// Dotted namespace path (may be empty for the root namespace).
    pub namespace: String,
    /// Simple type name.
    pub name: String,
}

impl TypeDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(module: ModuleId, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name (`namespace.name`).
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_random() {
        assert_ne!(ModuleId::new(), ModuleId::new());
    }

    #[test]
    fn test_module_id_from_name_is_stable() {
        assert_eq!(ModuleId::from_name("app.core"), ModuleId::from_name("app.core"));
        assert_ne!(ModuleId::from_name("app.core"), ModuleId::from_name("app.web"));
    }

    #[test]
    fn test_descriptor_identity() {
        let core = ModuleId::from_name("app.core");
        let web = ModuleId::from_name("app.web");

        let a = TypeDescriptor::new(core, "App.Services", "Mailer");
        let b = TypeDescriptor::new(core, "App.Services", "Mailer");
        let c = TypeDescriptor::new(web, "App.Services", "Mailer");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_full_name_root_namespace() {
        let ty = TypeDescriptor::new(ModuleId::from_name("m"), "", "Program");
        assert_eq!(ty.full_name(), "Program");
        assert_eq!(ty.to_string(), "Program");
    }

    #[test]
    fn test_descriptor_serialization() {
        let ty = TypeDescriptor::new(ModuleId::from_name("app.core"), "App.Jobs", "Nightly");
        let json = serde_json::to_string(&ty).unwrap();
        let decoded: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, decoded);
    }
}
