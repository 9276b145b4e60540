// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory metadata provider for deterministic resolver tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ananas_core::{AnanasError, Category, Descriptor, MetadataProvider};

/// A metadata provider holding a fixed set of descriptors.
///
/// Counts every call so tests can assert when the provider was (or was not)
/// consulted.
#[derive(Debug, Default)]
pub struct MockMetadataProvider {
    descriptors: HashMap<String, Arc<Descriptor>>,
    has_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor for `id`.
    pub fn with_descriptor(
        mut self,
        id: &str,
        category: Category,
        classpath: Vec<PathBuf>,
    ) -> Self {
        self.descriptors.insert(
            id.to_string(),
            Arc::new(Descriptor {
                id: id.to_string(),
                category,
                classpath,
            }),
        );
        self
    }

    /// Number of `has_step_metadata` calls so far.
    pub fn has_calls(&self) -> usize {
        self.has_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_step_metadata` calls so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

impl MetadataProvider for MockMetadataProvider {
    fn has_step_metadata(&self, id: &str) -> bool {
        self.has_calls.fetch_add(1, Ordering::SeqCst);
        self.descriptors.contains_key(id)
    }

    fn get_step_metadata(&self, id: &str) -> Result<Arc<Descriptor>, AnanasError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.descriptors
            .get(id)
            .cloned()
            .ok_or_else(|| AnanasError::ExtensionNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_calls() {
        let provider =
            MockMetadataProvider::new().with_descriptor("com.acme.x", Category::Source, vec![]);
        assert!(provider.has_step_metadata("com.acme.x"));
        assert!(!provider.has_step_metadata("com.acme.y"));
        assert!(provider.get_step_metadata("com.acme.y").is_err());
        assert_eq!(provider.has_calls(), 2);
        assert_eq!(provider.get_calls(), 1);
    }
}
