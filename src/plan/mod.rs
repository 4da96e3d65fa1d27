//! Declarative scan plans.
//!
//! A [`ScanPlan`] describes sources and filters as data, so a scan can be
//! configured from a JSON file instead of code. Named predicates are
//! looked up in a [`PredicateRegistry`] when the plan is applied.

mod document;
mod registry;
mod serialization;
mod validation;

pub use document::{FilterSpec, ScanPlan, SourceSpec, TypeRef};
pub use registry::PredicateRegistry;
pub use serialization::{from_json, load, to_json_pretty};
pub use validation::MAX_TEXT_LEN;
