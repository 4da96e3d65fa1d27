//! # typesieve - convention-based type selection
//!
//! typesieve answers "which types match this convention?" for registration
//! infrastructure such as dependency-injection containers. Candidate types
//! are gathered from modules, namespaces and explicit lists, then passed
//! through an ordered chain of include/exclude opinions.
//!
//! ## Core Concepts
//!
//! - **TypeDescriptor**: the identity of one discoverable type
//! - **Introspector**: the metadata source that enumerates a module's types
//! - **Namespace**: types sharing one namespace path, memoized per marker
//! - **Opinion**: a three-valued voter (include, exclude, indifferent)
//! - **Polarity**: the inclusion state every type starts from
//! - **Resolver**: the fold that turns votes into a final decision
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use typesieve::{InMemoryIntrospector, NamespaceIndex, TypeScan};
//!
//! let introspector = Arc::new(InMemoryIntrospector::new());
//! let core = introspector.define_module("app.core")?;
//! let mailer = introspector.define_type(core, "App.Services", "Mailer")?;
//! let _tests = introspector.define_type(core, "App.Services", "MailerTests")?;
//!
//! let index = Arc::new(NamespaceIndex::new(introspector));
//! let services = TypeScan::new(index)
//!     .from_module(core)
//!     .include_namespace("App.Services")
//!     .exclude_types_where(|t| t.name.ends_with("Tests"))
//!     .known_types()?;
//!
//! assert_eq!(services, vec![mailer]);
//! # Ok::<(), typesieve::SieveError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod interfaces;
pub mod introspect;
pub mod namespace;
pub mod opinion;
pub mod plan;
pub mod polarity;
pub mod resolver;
pub mod scan;

// Re-export primary types at crate root for convenience
pub use catalog::Catalog;
pub use descriptor::{ModuleId, TypeDescriptor};
pub use error::{IntrospectionError, SieveError, SieveResult, ValidationError};
pub use interfaces::{
    all_interfaces, all_open_generic_interfaces, has_interface, has_open_generic_interface,
    GenericForm, TypeKind, TypeShape,
};
pub use introspect::{InMemoryIntrospector, Introspector};
pub use namespace::{Namespace, NamespaceIndex};
pub use opinion::{
    Advice, FilterMode, NamespacePrefixOpinion, Opinion, Predicate, PredicateOpinion,
    TypeListOpinion,
};
pub use plan::{FilterSpec, PredicateRegistry, ScanPlan, SourceSpec, TypeRef};
pub use polarity::Polarity;
pub use resolver::{apply_advice, Resolver};
pub use scan::TypeScan;
