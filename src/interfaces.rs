//! Interface queries over type shapes.
//!
//! A [`TypeShape`] is the structural view of a type that an introspector
//! may expose: its kind, generic form, base type and declared interfaces.
//! The helpers here answer "does this type implement that interface",
//! walking the whole inheritance hierarchy.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::ValidationError;

const INTERFACE_PARAM: &str = "interfaceType";

/// Kind of a type shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete or abstract class.
    Class,
    /// An interface.
    Interface,
}

/// Generic form of a type shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericForm {
    /// Not generic.
    NotGeneric,
    /// An unbound generic definition, e.g. `IList<>`.
    Open {
        /// Number of type parameters.
        arity: usize,
    },
    /// A generic definition bound to concrete arguments, e.g. `IList<int>`.
    Closed {
        /// Type argument names, in order.
        arguments: Vec<String>,
    },
}

/// Structural description of a type.
///
/// Identity is `(kind, name, generic form)`; base type and interfaces do
/// not participate in equality.
#[derive(Debug, Clone)]
pub struct TypeShape {
    kind: TypeKind,
    name: String,
    generic: GenericForm,
    base: Option<Arc<TypeShape>>,
    interfaces: Vec<Arc<TypeShape>>,
}

impl TypeShape {
    /// Creates a non-generic class shape.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Class, name)
    }

    /// Creates a non-generic interface shape.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Interface, name)
    }

    fn with_kind(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            generic: GenericForm::NotGeneric,
            base: None,
            interfaces: Vec::new(),
        }
    }

    /// Marks this shape as an open generic definition with `arity` parameters.
    #[must_use]
    pub fn open(mut self, arity: usize) -> Self {
        self.generic = GenericForm::Open { arity };
        self
    }

    /// Binds this shape to concrete type arguments.
    #[must_use]
    pub fn closed<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic = GenericForm::Closed {
            arguments: arguments.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_base(mut self, base: Arc<TypeShape>) -> Self {
        self.base = Some(base);
        self
    }

    /// Adds a directly declared interface.
    #[must_use]
    pub fn implementing(mut self, interface: Arc<TypeShape>) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns the bare name (without generic arguments).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the generic form.
    #[must_use]
    pub const fn generic(&self) -> &GenericForm {
        &self.generic
    }

    /// Returns the base type, if any.
    #[must_use]
    pub fn base(&self) -> Option<&Arc<TypeShape>> {
        self.base.as_ref()
    }

    /// Returns the directly declared interfaces.
    #[must_use]
    pub fn declared_interfaces(&self) -> &[Arc<TypeShape>] {
        &self.interfaces
    }

    /// Returns true for interfaces.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    /// Returns true for open or closed generics.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        !matches!(self.generic, GenericForm::NotGeneric)
    }

    /// Returns true for unbound generic definitions.
    #[must_use]
    pub const fn contains_generic_parameters(&self) -> bool {
        matches!(self.generic, GenericForm::Open { .. })
    }

    /// Returns the open generic definition of a generic shape.
    ///
    /// The definition carries no base type or interfaces; it is meant for
    /// identity comparisons.
    #[must_use]
    pub fn generic_definition(&self) -> Option<TypeShape> {
        let arity = match &self.generic {
            GenericForm::NotGeneric => return None,
            GenericForm::Open { arity } => *arity,
            GenericForm::Closed { arguments } => arguments.len(),
        };
        Some(Self::with_kind(self.kind, self.name.clone()).open(arity))
    }
}

impl PartialEq for TypeShape {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name && self.generic == other.generic
    }
}

impl Eq for TypeShape {}

impl Hash for TypeShape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.name.hash(state);
        self.generic.hash(state);
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.generic {
            GenericForm::NotGeneric => write!(f, "{}", self.name),
            GenericForm::Open { arity } => {
                write!(f, "{}<{}>", self.name, ",".repeat(arity.saturating_sub(1)))
            }
            GenericForm::Closed { arguments } => {
                write!(f, "{}<{}>", self.name, arguments.join(", "))
            }
        }
    }
}

pub(crate) fn ensure_interface(interface_type: &TypeShape) -> Result<(), ValidationError> {
    if interface_type.is_interface() {
        Ok(())
    } else {
        Err(ValidationError::InvalidArgument {
            param: INTERFACE_PARAM,
            reason: format!("Specified type {interface_type} is not an interface."),
        })
    }
}

fn ensure_open_generic_interface(interface_type: &TypeShape) -> Result<(), ValidationError> {
    ensure_interface(interface_type)?;
    if interface_type.contains_generic_parameters() {
        Ok(())
    } else {
        Err(ValidationError::InvalidArgument {
            param: INTERFACE_PARAM,
            reason: format!("Specified type {interface_type} is not an open generic type."),
        })
    }
}

/// Returns true if `ty` implements `interface_type` anywhere in its hierarchy.
///
/// # Errors
/// `InvalidArgument` naming `interfaceType` if it is not an interface.
pub fn has_interface(ty: &TypeShape, interface_type: &TypeShape) -> Result<bool, ValidationError> {
    ensure_interface(interface_type)?;
    Ok(all_interfaces(ty)
        .iter()
        .any(|available| available.as_ref() == interface_type))
}

/// Returns true if `ty` implements any closed form of the open generic
/// interface `interface_type`.
///
/// # Errors
/// `InvalidArgument` naming `interfaceType` if it is not an interface, or
/// is not an open generic definition.
pub fn has_open_generic_interface(
    ty: &TypeShape,
    interface_type: &TypeShape,
) -> Result<bool, ValidationError> {
    ensure_open_generic_interface(interface_type)?;
    Ok(all_open_generic_interfaces(ty)
        .iter()
        .any(|definition| definition.as_ref() == interface_type))
}

/// All interfaces implemented by `ty`: declared ones, the interfaces they
/// extend, and everything reachable through the base-type chain.
///
/// Deduplicated, in first-seen order.
#[must_use]
pub fn all_interfaces(ty: &TypeShape) -> Vec<Arc<TypeShape>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    collect_interfaces(ty, &mut seen, &mut out);
    out
}

fn collect_interfaces(
    ty: &TypeShape,
    seen: &mut HashSet<Arc<TypeShape>>,
    out: &mut Vec<Arc<TypeShape>>,
) {
    for interface in &ty.interfaces {
        if seen.insert(Arc::clone(interface)) {
            out.push(Arc::clone(interface));
            collect_interfaces(interface, seen, out);
        }
    }
    if let Some(base) = &ty.base {
        collect_interfaces(base, seen, out);
    }
}

/// Open generic definitions of every generic interface implemented by `ty`.
#[must_use]
pub fn all_open_generic_interfaces(ty: &TypeShape) -> Vec<Arc<TypeShape>> {
    let mut seen = HashSet::new();
    all_interfaces(ty)
        .iter()
        .filter_map(|interface| interface.generic_definition())
        .map(Arc::new)
        .filter(|definition| seen.insert(Arc::clone(definition)))
        .collect()
}
