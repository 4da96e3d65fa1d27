//! In-memory introspection backend.
//!
//! Modules and types are registered up front; lookups are served from
//! thread-safe maps. Intended for embedded usage, tests, and as a reference
//! implementation of the [`Introspector`] contract.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::{IntrospectionError, SieveResult};
use crate::interfaces::TypeShape;
use crate::introspect::Introspector;

fn lock_err(context: &'static str) -> IntrospectionError {
    IntrospectionError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct ModuleState {
    name: String,
    types: Vec<TypeDescriptor>,
}

#[derive(Debug, Default)]
struct IntrospectorState {
    modules: HashMap<ModuleId, ModuleState>,
    known: HashSet<TypeDescriptor>,
    shapes: HashMap<TypeDescriptor, Arc<TypeShape>>,
}

/// Thread-safe in-memory introspector.
///
/// # Examples
///
/// ```
/// use typesieve::{InMemoryIntrospector, Introspector};
///
/// let introspector = InMemoryIntrospector::new();
/// let core = introspector.define_module("app.core").unwrap();
/// let mailer = introspector.define_type(core, "App.Services", "Mailer").unwrap();
///
/// assert_eq!(introspector.owning_module(&mailer).unwrap(), core);
/// assert_eq!(introspector.descriptors_of(core).unwrap(), vec![mailer]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryIntrospector {
    state: RwLock<IntrospectorState>,
    enumerations: AtomicUsize,
}

impl InMemoryIntrospector {
    /// Create a new empty introspector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module by name. Registering the same name twice returns
    /// the same ID.
    pub fn define_module(&self, name: &str) -> SieveResult<ModuleId> {
        let id = ModuleId::from_name(name);
        let mut state = self.state.write().map_err(|_| lock_err("define_module"))?;
        state.modules.entry(id).or_insert_with(|| ModuleState {
            name: name.to_string(),
            types: Vec::new(),
        });
        Ok(id)
    }

    /// Register a type inside an existing module.
    ///
    /// # Errors
    /// `UnknownModule` if `module` was never defined.
    pub fn define_type(
        &self,
        module: ModuleId,
        namespace: &str,
        name: &str,
    ) -> SieveResult<TypeDescriptor> {
        let descriptor = TypeDescriptor::new(module, namespace, name);
        let mut state = self.state.write().map_err(|_| lock_err("define_type"))?;
        insert_type(&mut state, &descriptor)?;
        Ok(descriptor)
    }

    /// Register a type together with its structural shape.
    pub fn define_type_with_shape(
        &self,
        module: ModuleId,
        namespace: &str,
        name: &str,
        shape: TypeShape,
    ) -> SieveResult<TypeDescriptor> {
        let descriptor = TypeDescriptor::new(module, namespace, name);
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("define_type_with_shape"))?;
        insert_type(&mut state, &descriptor)?;
        state.shapes.insert(descriptor.clone(), Arc::new(shape));
        Ok(descriptor)
    }

    /// Name a module was registered under.
    pub fn module_name(&self, module: ModuleId) -> SieveResult<String> {
        let state = self.state.read().map_err(|_| lock_err("module_name"))?;
        state
            .modules
            .get(&module)
            .map(|m| m.name.clone())
            .ok_or_else(|| IntrospectionError::UnknownModule { module }.into())
    }

    /// Number of `descriptors_of` calls served so far.
    #[must_use]
    pub fn enumeration_count(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    fn ensure_known(&self, marker: &TypeDescriptor, context: &'static str) -> SieveResult<()> {
        let state = self.state.read().map_err(|_| lock_err(context))?;
        if state.known.contains(marker) {
            Ok(())
        } else {
            Err(IntrospectionError::UnknownType {
                name: marker.full_name(),
            }
            .into())
        }
    }
}

fn insert_type(state: &mut IntrospectorState, descriptor: &TypeDescriptor) -> SieveResult<()> {
    let module = descriptor.module;
    let Some(module_state) = state.modules.get_mut(&module) else {
        return Err(IntrospectionError::UnknownModule { module }.into());
    };
    if state.known.insert(descriptor.clone()) {
        module_state.types.push(descriptor.clone());
    }
    Ok(())
}

impl Introspector for InMemoryIntrospector {
    fn descriptors_of(&self, module: ModuleId) -> SieveResult<Vec<TypeDescriptor>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().map_err(|_| lock_err("descriptors_of"))?;
        state
            .modules
            .get(&module)
            .map(|m| m.types.clone())
            .ok_or_else(|| IntrospectionError::UnknownModule { module }.into())
    }

    fn owning_module(&self, marker: &TypeDescriptor) -> SieveResult<ModuleId> {
        self.ensure_known(marker, "owning_module")?;
        Ok(marker.module)
    }

    fn namespace_path_of(&self, marker: &TypeDescriptor) -> SieveResult<String> {
        self.ensure_known(marker, "namespace_path_of")?;
        Ok(marker.namespace.clone())
    }

    fn shape_of(&self, ty: &TypeDescriptor) -> SieveResult<Option<Arc<TypeShape>>> {
        let state = self.state.read().map_err(|_| lock_err("shape_of"))?;
        Ok(state.shapes.get(ty).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_module_is_idempotent() {
        let introspector = InMemoryIntrospector::new();
        let a = introspector.define_module("app.core").unwrap();
        let b = introspector.define_module("app.core").unwrap();
        assert_eq!(a, b);
        assert_eq!(introspector.module_name(a).unwrap(), "app.core");
    }

    #[test]
    fn test_define_type_requires_module() {
        let introspector = InMemoryIntrospector::new();
        let err = introspector
            .define_type(ModuleId::from_name("missing"), "App", "Thing")
            .unwrap_err();
        assert!(err.is_introspection());
    }

    #[test]
    fn test_duplicate_type_not_listed_twice() {
        let introspector = InMemoryIntrospector::new();
        let core = introspector.define_module("app.core").unwrap();
        introspector.define_type(core, "App", "Thing").unwrap();
        introspector.define_type(core, "App", "Thing").unwrap();
        assert_eq!(introspector.descriptors_of(core).unwrap().len(), 1);
    }

    #[test]
    fn test_descriptors_preserve_definition_order() {
        let introspector = InMemoryIntrospector::new();
        let core = introspector.define_module("app.core").unwrap();
        let a = introspector.define_type(core, "App.B", "Second").unwrap();
        let b = introspector.define_type(core, "App.A", "First").unwrap();
        assert_eq!(introspector.descriptors_of(core).unwrap(), vec![a, b]);
        assert_eq!(introspector.enumeration_count(), 1);
    }

    #[test]
    fn test_unknown_marker() {
        let introspector = InMemoryIntrospector::new();
        let core = introspector.define_module("app.core").unwrap();
        let ghost = TypeDescriptor::new(core, "App", "Ghost");
        assert!(introspector.owning_module(&ghost).is_err());
        assert!(introspector.namespace_path_of(&ghost).is_err());
    }

    #[test]
    fn test_shapes() {
        let introspector = InMemoryIntrospector::new();
        let core = introspector.define_module("app.core").unwrap();
        let plain = introspector.define_type(core, "App", "Plain").unwrap();
        let shaped = introspector
            .define_type_with_shape(core, "App", "Shaped", TypeShape::class("Shaped"))
            .unwrap();

        assert!(introspector.shape_of(&plain).unwrap().is_none());
        assert_eq!(
            introspector.shape_of(&shaped).unwrap().unwrap().name(),
            "Shaped"
        );
    }
}
