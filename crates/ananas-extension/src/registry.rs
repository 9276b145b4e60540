// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in registries and the bootstrap-time registrar.
//!
//! The [`Registrar`] collects identifier -> type mappings during startup.
//! [`Registrar::freeze`] consumes it and publishes an immutable
//! [`BuiltinRegistry`], so no resolution can observe a half-populated table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ananas_core::{PaginatorFactory, StepFactory};
use libloading::Library;
use tracing::debug;

use crate::catalog::{FirstPartyPaginator, FirstPartyStep};

/// A factory exported by an extension, together with where it came from.
///
/// Holds the library the factory's code lives in, so the library stays
/// mapped for as long as the type is reachable.
pub struct ExtensionType<F: ?Sized> {
    class_name: String,
    factory: Arc<F>,
    origin: Option<PathBuf>,
    // Must drop after `factory`.
    _library: Option<Arc<Library>>,
}

impl<F: ?Sized> ExtensionType<F> {
    pub(crate) fn new(
        class_name: impl Into<String>,
        factory: Arc<F>,
        origin: Option<PathBuf>,
        library: Option<Arc<Library>>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            factory,
            origin,
            _library: library,
        }
    }

    /// Conventional class name the factory was exported under.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    /// Library the factory was loaded from; `None` for host-linked exports.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl<F: ?Sized> Clone for ExtensionType<F> {
    fn clone(&self) -> Self {
        Self {
            class_name: self.class_name.clone(),
            factory: Arc::clone(&self.factory),
            origin: self.origin.clone(),
            _library: self._library.clone(),
        }
    }
}

impl<F: ?Sized> PartialEq for ExtensionType<F> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.factory, &other.factory)
    }
}

impl<F: ?Sized> std::fmt::Debug for ExtensionType<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionType")
            .field("class_name", &self.class_name)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Handle to a type satisfying the step capability.
#[derive(Debug, Clone, PartialEq)]
pub enum StepType {
    /// Compiled into the runner; the engine instantiates it directly.
    FirstParty(FirstPartyStep),
    /// Exported by an extension.
    Extension(ExtensionType<dyn StepFactory>),
}

impl StepType {
    /// Implementation name for listings and diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            StepType::FirstParty(step) => step.as_ref(),
            StepType::Extension(ext) => ext.factory().type_name(),
        }
    }
}

impl From<FirstPartyStep> for StepType {
    fn from(step: FirstPartyStep) -> Self {
        StepType::FirstParty(step)
    }
}

/// Handle to a type satisfying the paginator capability.
#[derive(Debug, Clone, PartialEq)]
pub enum PaginatorType {
    FirstParty(FirstPartyPaginator),
    Extension(ExtensionType<dyn PaginatorFactory>),
}

impl PaginatorType {
    pub fn type_name(&self) -> &str {
        match self {
            PaginatorType::FirstParty(paginator) => paginator.as_ref(),
            PaginatorType::Extension(ext) => ext.factory().type_name(),
        }
    }
}

impl From<FirstPartyPaginator> for PaginatorType {
    fn from(paginator: FirstPartyPaginator) -> Self {
        PaginatorType::FirstParty(paginator)
    }
}

/// Collects built-in registrations during bootstrap.
///
/// Every primitive overwrites an existing mapping for the same identifier.
#[derive(Debug, Default)]
pub struct Registrar {
    steps: HashMap<String, StepType>,
    paginators: HashMap<String, PaginatorType>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_step(&mut self, id: impl Into<String>, step: impl Into<StepType>) {
        let id = id.into();
        if let Some(previous) = self.steps.insert(id.clone(), step.into()) {
            debug!(id = %id, previous = previous.type_name(), "replaced step registration");
        }
    }

    pub fn register_paginator(
        &mut self,
        id: impl Into<String>,
        paginator: impl Into<PaginatorType>,
    ) {
        let id = id.into();
        if let Some(previous) = self.paginators.insert(id.clone(), paginator.into()) {
            debug!(id = %id, previous = previous.type_name(), "replaced paginator registration");
        }
    }

    /// Register a source that supports both execution and preview.
    pub fn register_connector(
        &mut self,
        id: impl Into<String>,
        step: impl Into<StepType>,
        paginator: impl Into<PaginatorType>,
    ) {
        let id = id.into();
        self.register_step(id.clone(), step);
        self.register_paginator(id, paginator);
    }

    /// Register a destination that supports both execution and preview.
    pub fn register_loader(
        &mut self,
        id: impl Into<String>,
        step: impl Into<StepType>,
        paginator: impl Into<PaginatorType>,
    ) {
        let id = id.into();
        self.register_step(id.clone(), step);
        self.register_paginator(id, paginator);
    }

    /// Register a transform. Transforms have no paginator of their own.
    pub fn register_transformer(&mut self, id: impl Into<String>, step: impl Into<StepType>) {
        self.register_step(id, step);
    }

    /// Register a visualization. Only the step map is populated.
    pub fn register_viewer(&mut self, id: impl Into<String>, step: impl Into<StepType>) {
        self.register_step(id, step);
    }

    /// Publish the collected registrations as an immutable registry.
    pub fn freeze(self) -> BuiltinRegistry {
        debug!(
            steps = self.steps.len(),
            paginators = self.paginators.len(),
            "built-in registry frozen"
        );
        BuiltinRegistry {
            steps: self.steps,
            paginators: self.paginators,
        }
    }
}

/// Immutable identifier -> type tables for built-in steps and paginators.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    steps: HashMap<String, StepType>,
    paginators: HashMap<String, PaginatorType>,
}

impl BuiltinRegistry {
    pub fn step(&self, id: &str) -> Option<&StepType> {
        self.steps.get(id)
    }

    pub fn paginator(&self, id: &str) -> Option<&PaginatorType> {
        self.paginators.get(id)
    }

    pub fn has_step(&self, id: &str) -> bool {
        self.steps.contains_key(id)
    }

    pub fn has_paginator(&self, id: &str) -> bool {
        self.paginators.contains_key(id)
    }

    /// All step identifiers, sorted.
    pub fn step_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.steps.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered step identifiers.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn register_and_get_roundtrip() {
        let mut registrar = Registrar::new();
        registrar.register_step("org.ananas.source.file.csv", FirstPartyStep::CsvConnector);
        let registry = registrar.freeze();

        assert!(registry.has_step("org.ananas.source.file.csv"));
        assert_eq!(
            registry.step("org.ananas.source.file.csv"),
            Some(&StepType::FirstParty(FirstPartyStep::CsvConnector))
        );
        assert!(!registry.has_paginator("org.ananas.source.file.csv"));
    }

    #[test]
    fn connector_and_loader_fill_both_maps() {
        let mut registrar = Registrar::new();
        registrar.register_connector(
            "com.acme.source",
            FirstPartyStep::JdbcConnector,
            FirstPartyPaginator::JdbcPaginator,
        );
        registrar.register_loader(
            "com.acme.destination",
            FirstPartyStep::JdbcLoader,
            FirstPartyPaginator::JdbcPaginator,
        );
        let registry = registrar.freeze();

        for id in ["com.acme.source", "com.acme.destination"] {
            assert!(registry.has_step(id));
            assert_eq!(
                registry.paginator(id),
                Some(&PaginatorType::FirstParty(FirstPartyPaginator::JdbcPaginator))
            );
        }
    }

    #[test]
    fn transformer_and_viewer_fill_only_step_map() {
        let mut registrar = Registrar::new();
        registrar.register_transformer("com.acme.transform", FirstPartyStep::SqlTransformer);
        registrar.register_viewer("com.acme.chart", FirstPartyStep::DefaultDataViewer);
        let registry = registrar.freeze();

        assert!(registry.has_step("com.acme.transform"));
        assert!(registry.has_step("com.acme.chart"));
        assert!(!registry.has_paginator("com.acme.transform"));
        assert!(!registry.has_paginator("com.acme.chart"));
    }

    #[test]
    fn step_ids_are_sorted() {
        let mut registrar = Registrar::new();
        registrar.register_step("z.step", FirstPartyStep::FileLoader);
        registrar.register_step("a.step", FirstPartyStep::FileLoader);
        registrar.register_step("m.step", FirstPartyStep::FileLoader);
        let registry = registrar.freeze();

        assert_eq!(registry.step_ids(), vec!["a.step", "m.step", "z.step"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert!(BuiltinRegistry::default().is_empty());
    }

    #[test]
    fn type_names_match_first_party_names() {
        assert_eq!(StepType::from(FirstPartyStep::CsvConnector).type_name(), "CSVConnector");
        assert_eq!(
            PaginatorType::from(FirstPartyPaginator::BigQueryPaginator).type_name(),
            "BigqueryPaginator"
        );
    }

    fn any_step() -> impl Strategy<Value = FirstPartyStep> {
        prop::sample::select(FirstPartyStep::iter().collect::<Vec<_>>())
    }

    proptest! {
        // Last write wins for any sequence of registrations of one identifier.
        #[test]
        fn last_registration_wins(steps in prop::collection::vec(any_step(), 1..8)) {
            let mut registrar = Registrar::new();
            for step in &steps {
                registrar.register_step("com.acme.step", *step);
            }
            let registry = registrar.freeze();
            let last = *steps.last().unwrap();
            prop_assert_eq!(registry.step("com.acme.step"), Some(&StepType::FirstParty(last)));
            prop_assert_eq!(registry.len(), 1);
        }
    }
}
