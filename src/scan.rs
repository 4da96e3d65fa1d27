//! Fluent scan builder.
//!
//! [`TypeScan`] ties the pieces together: it collects sources into a
//! [`Catalog`], latches a [`Polarity`], keeps the ordered filter chain,
//! and finally runs the [`Resolver`].
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use typesieve::{InMemoryIntrospector, NamespaceIndex, TypeScan};
//!
//! let introspector = Arc::new(InMemoryIntrospector::new());
//! let core = introspector.define_module("app.core")?;
//! let mailer = introspector.define_type(core, "App.Services", "Mailer")?;
//! introspector.define_type(core, "App.Jobs", "Nightly")?;
//!
//! let index = Arc::new(NamespaceIndex::new(introspector));
//! let found = TypeScan::new(index)
//!     .from_module_containing(&mailer)?
//!     .include_namespace_containing(&mailer)?
//!     .known_types()?;
//!
//! assert_eq!(found, vec![mailer]);
//! # Ok::<(), typesieve::SieveError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::catalog::Catalog;
use crate::descriptor::{ModuleId, TypeDescriptor};
use crate::error::{SieveResult, ValidationError};
use crate::interfaces::{ensure_interface, has_interface, has_open_generic_interface, TypeShape};
use crate::namespace::NamespaceIndex;
use crate::opinion::{FilterMode, NamespacePrefixOpinion, Opinion, PredicateOpinion};
use crate::polarity::Polarity;
use crate::resolver::Resolver;

/// Builder for a type scan.
#[derive(Clone)]
pub struct TypeScan {
    index: Arc<NamespaceIndex>,
    catalog: Catalog,
    polarity: Polarity,
    filters: Vec<Arc<dyn Opinion>>,
}

impl TypeScan {
    /// Creates an empty scan over `index`.
    #[must_use]
    pub fn new(index: Arc<NamespaceIndex>) -> Self {
        Self {
            index,
            catalog: Catalog::new(),
            polarity: Polarity::Unset,
            filters: Vec::new(),
        }
    }

    /// The namespace index this scan reads through.
    #[must_use]
    pub fn index(&self) -> &Arc<NamespaceIndex> {
        &self.index
    }

    /// Registered sources.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Modules registered as sources.
    #[must_use]
    pub fn source_modules(&self) -> &[ModuleId] {
        self.catalog.modules()
    }

    /// Current polarity.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Number of registered filters and opinions.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    // --- sources ---

    /// Scan every type of `module`.
    #[must_use]
    pub fn from_module(mut self, module: ModuleId) -> Self {
        self.catalog.register_module(module);
        self
    }

    /// Scan every type of the module that owns `marker`.
    pub fn from_module_containing(self, marker: &TypeDescriptor) -> SieveResult<Self> {
        let module = self.index.introspector().owning_module(marker)?;
        Ok(self.from_module(module))
    }

    /// Scan the types sharing `marker`'s namespace.
    pub fn from_namespace_containing(mut self, marker: &TypeDescriptor) -> SieveResult<Self> {
        let namespace = self.index.of(marker)?;
        self.catalog.register_namespace(namespace);
        Ok(self)
    }

    /// Scan an explicit list of types.
    #[must_use]
    pub fn from_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.catalog.register_types(types);
        self
    }

    // --- filters ---

    /// Append a filter. A directional filter latches the polarity if it is
    /// the first one.
    #[must_use]
    pub fn with_filter<O>(self, filter: O) -> Self
    where
        O: Opinion + 'static,
    {
        self.with_shared_filter(Arc::new(filter))
    }

    /// Append a shared filter; see [`TypeScan::with_filter`].
    #[must_use]
    pub fn with_shared_filter(mut self, filter: Arc<dyn Opinion>) -> Self {
        if let Some(mode) = filter.mode() {
            self.latch(mode);
        }
        self.filters.push(filter);
        self
    }

    /// Append an opinion without touching the polarity.
    #[must_use]
    pub fn take_advice_from<O>(self, opinion: O) -> Self
    where
        O: Opinion + 'static,
    {
        self.take_shared_advice(Arc::new(opinion))
    }

    /// Append a shared opinion without touching the polarity.
    #[must_use]
    pub fn take_shared_advice(mut self, opinion: Arc<dyn Opinion>) -> Self {
        self.filters.push(opinion);
        self
    }

    /// Append several shared opinions, in order, without touching the
    /// polarity.
    #[must_use]
    pub fn take_advice_from_all<I>(self, opinions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Opinion>>,
    {
        opinions
            .into_iter()
            .fold(self, |scan, opinion| scan.take_shared_advice(opinion))
    }

    /// Keep types whose namespace starts with `prefix`.
    #[must_use]
    pub fn include_namespace(self, prefix: impl Into<String>) -> Self {
        self.with_filter(NamespacePrefixOpinion::new(FilterMode::Include, prefix))
    }

    /// Drop types whose namespace starts with `prefix`.
    #[must_use]
    pub fn exclude_namespace(self, prefix: impl Into<String>) -> Self {
        self.with_filter(NamespacePrefixOpinion::new(FilterMode::Exclude, prefix))
    }

    /// Keep types under `marker`'s namespace.
    pub fn include_namespace_containing(self, marker: &TypeDescriptor) -> SieveResult<Self> {
        let prefix = self.index.introspector().namespace_path_of(marker)?;
        Ok(self.include_namespace(prefix))
    }

    /// Drop types under `marker`'s namespace.
    pub fn exclude_namespace_containing(self, marker: &TypeDescriptor) -> SieveResult<Self> {
        let prefix = self.index.introspector().namespace_path_of(marker)?;
        Ok(self.exclude_namespace(prefix))
    }

    /// Keep types under the namespace of any of `markers`.
    ///
    /// Every marker is looked up before anything is registered, so a
    /// failing marker leaves the scan unchanged. An empty slice is a no-op.
    pub fn include_namespaces_containing(self, markers: &[TypeDescriptor]) -> SieveResult<Self> {
        self.namespace_filters(FilterMode::Include, markers)
    }

    /// Drop types under the namespace of any of `markers`.
    pub fn exclude_namespaces_containing(self, markers: &[TypeDescriptor]) -> SieveResult<Self> {
        self.namespace_filters(FilterMode::Exclude, markers)
    }

    /// Keep types accepted by `predicate`.
    #[must_use]
    pub fn include_types_where<F>(self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.with_filter(PredicateOpinion::new(FilterMode::Include, predicate))
    }

    /// Drop types accepted by `predicate`.
    #[must_use]
    pub fn exclude_types_where<F>(self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.with_filter(PredicateOpinion::new(FilterMode::Exclude, predicate))
    }

    /// Keep types whose full name matches `pattern`.
    pub fn include_types_matching(self, pattern: &str) -> SieveResult<Self> {
        Ok(self.with_filter(name_filter(FilterMode::Include, pattern)?))
    }

    /// Drop types whose full name matches `pattern`.
    pub fn exclude_types_matching(self, pattern: &str) -> SieveResult<Self> {
        Ok(self.with_filter(name_filter(FilterMode::Exclude, pattern)?))
    }

    /// Keep types implementing `interface_type`. An open generic interface
    /// matches any of its closed forms.
    pub fn include_implementors_of(self, interface_type: &TypeShape) -> SieveResult<Self> {
        let filter = self.implementor_filter(FilterMode::Include, interface_type)?;
        Ok(self.with_filter(filter))
    }

    /// Drop types implementing `interface_type`.
    pub fn exclude_implementors_of(self, interface_type: &TypeShape) -> SieveResult<Self> {
        let filter = self.implementor_filter(FilterMode::Exclude, interface_type)?;
        Ok(self.with_filter(filter))
    }

    // --- resolution ---

    /// Snapshot of the filter chain as a resolver.
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::with_opinions(self.polarity, self.filters.clone())
    }

    /// Deduplicated candidates before filtering.
    pub fn candidates(&self) -> SieveResult<Vec<TypeDescriptor>> {
        self.catalog.candidates(self.index.introspector().as_ref())
    }

    /// Resolve the scan.
    pub fn known_types(&self) -> SieveResult<Vec<TypeDescriptor>> {
        self.known_types_with(&[])
    }

    /// Resolve the scan, consulting `leading` opinions before the
    /// registered filters.
    pub fn known_types_with(&self, leading: &[Arc<dyn Opinion>]) -> SieveResult<Vec<TypeDescriptor>> {
        self.resolver()
            .resolve_catalog(&self.catalog, self.index.introspector().as_ref(), leading)
    }

    fn latch(&mut self, mode: FilterMode) {
        if !self.polarity.is_latched() {
            self.polarity = self.polarity.latch(mode);
            tracing::debug!(target: "scan", polarity = %self.polarity, first = %mode, "polarity_latched");
        }
    }

    fn namespace_filters(self, mode: FilterMode, markers: &[TypeDescriptor]) -> SieveResult<Self> {
        let introspector = Arc::clone(self.index.introspector());
        let prefixes = markers
            .iter()
            .map(|marker| introspector.namespace_path_of(marker))
            .collect::<SieveResult<Vec<_>>>()?;
        Ok(prefixes.into_iter().fold(self, |scan, prefix| {
            scan.with_filter(NamespacePrefixOpinion::new(mode, prefix))
        }))
    }

    fn implementor_filter(
        &self,
        mode: FilterMode,
        interface_type: &TypeShape,
    ) -> SieveResult<PredicateOpinion> {
        ensure_interface(interface_type)?;
        let introspector = Arc::clone(self.index.introspector());
        let interface_type = interface_type.clone();
        let open = interface_type.contains_generic_parameters();

        Ok(PredicateOpinion::fallible(mode, move |ty| {
            let Some(shape) = introspector.shape_of(ty)? else {
                return Ok(false);
            };
            let implemented = if open {
                has_open_generic_interface(&shape, &interface_type)?
            } else {
                has_interface(&shape, &interface_type)?
            };
            Ok(implemented)
        }))
    }
}

fn name_filter(mode: FilterMode, pattern: &str) -> Result<PredicateOpinion, ValidationError> {
    let regex = Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PredicateOpinion::new(mode, move |ty| regex.is_match(&ty.full_name())))
}

impl fmt::Debug for TypeScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeScan")
            .field("catalog", &self.catalog)
            .field("polarity", &self.polarity)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::InMemoryIntrospector;
    use crate::opinion::{Advice, TypeListOpinion};

    struct Fixture {
        index: Arc<NamespaceIndex>,
        mailer: TypeDescriptor,
        clock: TypeDescriptor,
        relay: TypeDescriptor,
        nightly: TypeDescriptor,
    }

    fn fixture() -> Fixture {
        let introspector = Arc::new(InMemoryIntrospector::new());
        let core = introspector.define_module("app.core").unwrap();
        let mailer = introspector.define_type(core, "App.Services", "Mailer").unwrap();
        let clock = introspector.define_type(core, "App.Services", "Clock").unwrap();
        let relay = introspector.define_type(core, "App.Services.Smtp", "Relay").unwrap();
        let nightly = introspector.define_type(core, "App.Jobs", "Nightly").unwrap();
        Fixture {
            index: Arc::new(NamespaceIndex::new(introspector)),
            mailer,
            clock,
            relay,
            nightly,
        }
    }

    #[test]
    fn test_no_filters_yields_nothing() {
        let f = fixture();
        let scan = TypeScan::new(f.index).from_module_containing(&f.mailer).unwrap();
        assert_eq!(scan.polarity(), Polarity::Unset);
        assert_eq!(scan.candidates().unwrap().len(), 4);
        assert!(scan.known_types().unwrap().is_empty());
    }

    #[test]
    fn test_include_first_latches_exclusive() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .include_namespace("App.Jobs")
            .exclude_namespace("App.Services");
        assert_eq!(scan.polarity(), Polarity::Exclusive);
        assert_eq!(scan.known_types().unwrap(), vec![f.nightly]);
    }

    #[test]
    fn test_exclude_first_latches_inclusive() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .exclude_namespace_containing(&f.mailer)
            .unwrap()
            .include_namespace("App.Services.Smtp");
        assert_eq!(scan.polarity(), Polarity::Inclusive);
        assert_eq!(scan.known_types().unwrap(), vec![f.relay, f.nightly]);
    }

    #[test]
    fn test_take_advice_does_not_latch() {
        let f = fixture();
        let list = TypeListOpinion::new([f.clock.clone()], Vec::new()).unwrap();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .take_advice_from(list);
        assert_eq!(scan.polarity(), Polarity::Unset);
        assert_eq!(scan.known_types().unwrap(), vec![f.clock]);
    }

    #[test]
    fn test_from_namespace_containing() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_namespace_containing(&f.mailer)
            .unwrap()
            .exclude_types_where(|t| t.name == "Clock");
        assert_eq!(scan.known_types().unwrap(), vec![f.mailer]);
    }

    #[test]
    fn test_name_pattern_filters() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .include_types_matching(r"^App\.Services\.")
            .unwrap()
            .exclude_types_matching(r"Smtp")
            .unwrap();
        assert_eq!(scan.known_types().unwrap(), vec![f.mailer, f.clock]);
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let f = fixture();
        let err = TypeScan::new(f.index).include_types_matching("(unclosed").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_leading_opinions() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_types([f.mailer.clone(), f.clock.clone()])
            .include_types_where(|t| t.name == "Mailer");

        let veto_all: Arc<dyn Opinion> = Arc::new(|_: &TypeDescriptor| Advice::Exclude);
        let include_clock: Arc<dyn Opinion> =
            Arc::new(move |t: &TypeDescriptor| if t.name == "Clock" { Advice::Include } else { Advice::Indifferent });

        assert_eq!(scan.known_types_with(&[veto_all]).unwrap(), vec![f.mailer.clone()]);
        assert_eq!(
            scan.known_types_with(&[include_clock]).unwrap(),
            vec![f.mailer, f.clock]
        );
    }

    #[test]
    fn test_namespaces_containing_many_markers() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .exclude_namespaces_containing(&[f.nightly.clone(), f.relay.clone()])
            .unwrap()
            .include_namespaces_containing(&[f.relay.clone()])
            .unwrap();

        assert_eq!(scan.polarity(), Polarity::Inclusive);
        assert_eq!(scan.filter_count(), 3);
        assert_eq!(scan.known_types().unwrap(), vec![f.mailer, f.clock, f.relay]);
    }

    #[test]
    fn test_namespaces_containing_latches_on_first_marker() {
        let f = fixture();
        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .include_namespaces_containing(&[f.nightly.clone(), f.relay.clone()])
            .unwrap();
        assert_eq!(scan.polarity(), Polarity::Exclusive);
        assert_eq!(scan.known_types().unwrap(), vec![f.relay, f.nightly]);
    }

    #[test]
    fn test_namespaces_containing_unknown_marker_fails_whole_call() {
        let f = fixture();
        let ghost = TypeDescriptor::new(f.mailer.module, "App", "Ghost");
        let err = TypeScan::new(f.index)
            .include_namespaces_containing(&[f.nightly.clone(), ghost])
            .unwrap_err();
        assert!(err.is_introspection());
    }

    #[test]
    fn test_empty_marker_list_leaves_polarity_unset() {
        let f = fixture();
        let scan = TypeScan::new(f.index).exclude_namespaces_containing(&[]).unwrap();
        assert_eq!(scan.polarity(), Polarity::Unset);
        assert_eq!(scan.filter_count(), 0);
    }

    #[test]
    fn test_take_advice_from_all_keeps_order() {
        let f = fixture();
        let keep = TypeListOpinion::new([f.clock.clone(), f.nightly.clone()], Vec::new()).unwrap();
        let drop_clock: Arc<dyn Opinion> =
            Arc::new(|t: &TypeDescriptor| if t.name == "Clock" { Advice::Exclude } else { Advice::Indifferent });

        let scan = TypeScan::new(f.index)
            .from_module_containing(&f.mailer)
            .unwrap()
            .take_advice_from_all([Arc::new(keep) as Arc<dyn Opinion>, drop_clock]);

        assert_eq!(scan.polarity(), Polarity::Unset);
        assert_eq!(scan.filter_count(), 2);
        assert_eq!(scan.known_types().unwrap(), vec![f.nightly]);
    }

    #[test]
    fn test_implementors_of_rejects_class() {
        let f = fixture();
        let err = TypeScan::new(f.index)
            .include_implementors_of(&TypeShape::class("Object"))
            .unwrap_err();
        assert!(err.is_validation());
    }
}
