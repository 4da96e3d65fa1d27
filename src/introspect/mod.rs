//! Introspection collaborator for typesieve.
//!
//! The resolution engine never enumerates types itself. It asks an
//! [`Introspector`] which types a module owns and where a marker type
//! lives. [`InMemoryIntrospector`] is a synthetic backend for embedded
//! use and tests.

mod memory;
mod traits;

pub use memory::InMemoryIntrospector;
pub use traits::Introspector;
