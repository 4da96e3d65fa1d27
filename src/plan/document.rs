//! Scan plan documents.

use serde::{Deserialize, Serialize};

use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::SieveResult;
use crate::opinion::{FilterMode, NamespacePrefixOpinion, TypeListOpinion};
use crate::scan::TypeScan;

use super::PredicateRegistry;

/// Reference to a type by module name, namespace and simple name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Module name (mapped through [`ModuleId::from_name`]).
    pub module: String,
    /// Namespace path.
    #[serde(default)]
    pub namespace: String,
    /// Simple type name.
    pub name: String,
}

impl TypeRef {
    /// Creates a type reference.
    #[must_use]
    pub fn new(module: impl Into<String>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The descriptor this reference names.
    #[must_use]
    pub fn to_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(
            ModuleId::from_name(&self.module),
            self.namespace.clone(),
            self.name.clone(),
        )
    }
}

/// Where candidate types come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Every type of a module.
    Module {
        /// Module name.
        module: String,
    },
    /// Every type sharing the marker's namespace.
    NamespaceOf {
        /// Marker type.
        marker: TypeRef,
    },
    /// Explicit types.
    Types {
        /// Types to add.
        types: Vec<TypeRef>,
    },
}

/// One entry of the filter chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Keep types under a namespace prefix.
    IncludeNamespace {
        /// Namespace prefix.
        prefix: String,
    },
    /// Drop types under a namespace prefix.
    ExcludeNamespace {
        /// Namespace prefix.
        prefix: String,
    },
    /// Keep types accepted by a registered predicate.
    IncludeWhere {
        /// Registered predicate name.
        predicate: String,
    },
    /// Drop types accepted by a registered predicate.
    ExcludeWhere {
        /// Registered predicate name.
        predicate: String,
    },
    /// Keep types whose full name matches a regex.
    IncludeMatching {
        /// Regular expression.
        pattern: String,
    },
    /// Drop types whose full name matches a regex.
    ExcludeMatching {
        /// Regular expression.
        pattern: String,
    },
    /// Explicit allow and deny lists. Does not latch the polarity.
    TypeList {
        /// Types voted in.
        #[serde(default)]
        include: Vec<TypeRef>,
        /// Types voted out.
        #[serde(default)]
        exclude: Vec<TypeRef>,
    },
}

/// A complete scan description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPlan {
    /// Plan format version.
    #[serde(default = "ScanPlan::current_version")]
    pub version: String,
    /// Candidate sources.
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    /// Filters, in evaluation order.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl Default for ScanPlan {
    fn default() -> Self {
        Self {
            version: Self::current_version(),
            sources: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl ScanPlan {
    /// Current plan format version.
    pub const CURRENT_VERSION: &'static str = "1.0";

    fn current_version() -> String {
        Self::CURRENT_VERSION.to_string()
    }

    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source.
    #[must_use]
    pub fn with_source(mut self, source: SourceSpec) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    /// Validates the plan, then registers its sources and filters on `scan`.
    ///
    /// # Errors
    /// Validation errors for malformed plans, unknown predicate names, bad
    /// patterns or overlapping type lists; introspection errors for unknown
    /// namespace markers.
    pub fn apply(&self, mut scan: TypeScan, predicates: &PredicateRegistry) -> SieveResult<TypeScan> {
        self.validate()?;

        for source in &self.sources {
            scan = match source {
                SourceSpec::Module { module } => scan.from_module(ModuleId::from_name(module)),
                SourceSpec::NamespaceOf { marker } => {
                    scan.from_namespace_containing(&marker.to_descriptor())?
                }
                SourceSpec::Types { types } => {
                    scan.from_types(types.iter().map(TypeRef::to_descriptor))
                }
            };
        }

        for filter in &self.filters {
            scan = match filter {
                FilterSpec::IncludeNamespace { prefix } => {
                    scan.with_filter(NamespacePrefixOpinion::new(FilterMode::Include, prefix.clone()))
                }
                FilterSpec::ExcludeNamespace { prefix } => {
                    scan.with_filter(NamespacePrefixOpinion::new(FilterMode::Exclude, prefix.clone()))
                }
                FilterSpec::IncludeWhere { predicate } => {
                    scan.with_filter(predicates.opinion(FilterMode::Include, predicate)?)
                }
                FilterSpec::ExcludeWhere { predicate } => {
                    scan.with_filter(predicates.opinion(FilterMode::Exclude, predicate)?)
                }
                FilterSpec::IncludeMatching { pattern } => scan.include_types_matching(pattern)?,
                FilterSpec::ExcludeMatching { pattern } => scan.exclude_types_matching(pattern)?,
                FilterSpec::TypeList { include, exclude } => scan.take_advice_from(TypeListOpinion::new(
                    include.iter().map(TypeRef::to_descriptor),
                    exclude.iter().map(TypeRef::to_descriptor),
                )?),
            };
        }

        tracing::debug!(
            target: "plan",
            sources = self.sources.len(),
            filters = self.filters.len(),
            polarity = %scan.polarity(),
            "plan_applied"
        );
        Ok(scan)
    }
}
