// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of metadata identifiers to step and paginator types.
//!
//! Lookup order is fixed: the built-in registry first, then the metadata
//! provider's descriptor, then the dynamic loader. A built-in hit never
//! touches the provider.

use std::path::PathBuf;
use std::sync::Arc;

use ananas_core::{AnanasError, Descriptor, MetadataProvider};
use tracing::debug;

use crate::export::{paginator_class, step_runner_class};
use crate::loader::DynamicLoader;
use crate::registry::{BuiltinRegistry, PaginatorType, StepType};

/// Resolves identifiers against the built-in registry and installed extensions.
pub struct ExtensionResolver {
    registry: Arc<BuiltinRegistry>,
    loader: DynamicLoader,
    metadata: Option<Arc<dyn MetadataProvider>>,
}

impl ExtensionResolver {
    /// A resolver without a metadata provider. Only built-ins and the
    /// loader's ambient search path are consulted.
    pub fn new(registry: Arc<BuiltinRegistry>, loader: DynamicLoader) -> Self {
        Self {
            registry,
            loader,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    /// Whether `id` names a built-in step or a step with known metadata.
    pub fn has_step(&self, id: &str) -> bool {
        self.registry.has_step(id)
            || self
                .metadata
                .as_ref()
                .is_some_and(|provider| provider.has_step_metadata(id))
    }

    /// Resolve the step type for `id`.
    ///
    /// With `prefer_local_classpath`, an extension is searched for in its
    /// descriptor's locations; otherwise in the ambient search path.
    pub fn get_step(&self, id: &str, prefer_local_classpath: bool) -> Result<StepType, AnanasError> {
        if let Some(step) = self.registry.step(id) {
            debug!(id, step = step.type_name(), "resolved built-in step");
            return Ok(step.clone());
        }

        let descriptor = self.descriptor(id)?;
        let search_path: &[PathBuf] = match &descriptor {
            Some(descriptor) if prefer_local_classpath => descriptor.classpath.as_slice(),
            _ => &[],
        };
        let class_name = step_runner_class(id);
        debug!(
            id,
            class_name = %class_name,
            prefer_local_classpath,
            search_path = ?search_path,
            "loading extension step"
        );

        match self.loader.load_step(&class_name, search_path)? {
            Some(step) => Ok(StepType::Extension(step)),
            None => Err(miss(id, &class_name, descriptor.is_some())),
        }
    }

    /// Whether `id` has a paginator.
    ///
    /// Extension steps have one unless their category is Transform.
    pub fn has_paginator(&self, id: &str) -> bool {
        if self.registry.has_paginator(id) {
            return true;
        }
        match &self.metadata {
            Some(provider) if provider.has_step_metadata(id) => provider
                .get_step_metadata(id)
                .is_ok_and(|descriptor| descriptor.category.is_paginated()),
            _ => false,
        }
    }

    /// Resolve the paginator type for `id`.
    ///
    /// Extension paginators are always searched for in the descriptor's
    /// locations when a descriptor exists.
    pub fn get_paginator(&self, id: &str) -> Result<PaginatorType, AnanasError> {
        if let Some(paginator) = self.registry.paginator(id) {
            debug!(id, paginator = paginator.type_name(), "resolved built-in paginator");
            return Ok(paginator.clone());
        }

        let descriptor = self.descriptor(id)?;
        let search_path: &[PathBuf] = match &descriptor {
            Some(descriptor) => descriptor.classpath.as_slice(),
            None => &[],
        };
        let class_name = paginator_class(id);
        debug!(id, class_name = %class_name, search_path = ?search_path, "loading extension paginator");

        match self.loader.load_paginator(&class_name, search_path)? {
            Some(paginator) => Ok(PaginatorType::Extension(paginator)),
            None => Err(miss(id, &class_name, descriptor.is_some())),
        }
    }

    fn descriptor(&self, id: &str) -> Result<Option<Arc<Descriptor>>, AnanasError> {
        match &self.metadata {
            Some(provider) if provider.has_step_metadata(id) => {
                provider.get_step_metadata(id).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl std::fmt::Debug for ExtensionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionResolver")
            .field("builtins", &self.registry.len())
            .field("loader", &self.loader)
            .field("metadata", &self.metadata.is_some())
            .finish()
    }
}

fn miss(id: &str, class_name: &str, has_descriptor: bool) -> AnanasError {
    if has_descriptor {
        AnanasError::load(
            class_name,
            format!("no library on the search path for `{id}` exports it"),
        )
    } else {
        AnanasError::ExtensionNotFound { id: id.to_string() }
    }
}
