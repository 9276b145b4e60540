// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-backed metadata provider.
//!
//! The extension home holds one directory per installed extension, each with
//! an `extension.toml` manifest. Scanning indexes every declared step by
//! identifier. An extension whose manifest cannot be read is skipped and
//! recorded as rejected. The result is immutable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ananas_core::{AnanasError, Descriptor, MetadataProvider};
use tracing::{debug, info, warn};

use crate::manifest::{ExtensionManifest, MANIFEST_FILE_NAME, load_extension_manifest};

/// An installed extension: its directory and parsed manifest.
#[derive(Debug, Clone)]
pub struct InstalledExtension {
    pub dir: PathBuf,
    pub manifest: ExtensionManifest,
}

/// An extension directory skipped during the scan.
#[derive(Debug)]
pub struct RejectedExtension {
    pub dir: PathBuf,
    pub error: AnanasError,
}

/// Metadata provider backed by an extension home directory.
#[derive(Debug, Default)]
pub struct ExtensionHome {
    root: PathBuf,
    extensions: Vec<InstalledExtension>,
    rejected: Vec<RejectedExtension>,
    descriptors: HashMap<String, Arc<Descriptor>>,
}

impl ExtensionHome {
    /// Scan `root` for `*/extension.toml`.
    ///
    /// A missing `root` yields an empty home. An unreadable or invalid
    /// manifest only rejects its own extension; failing to list `root`
    /// fails the scan.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, AnanasError> {
        let root = std::path::absolute(root.as_ref()).map_err(|source| AnanasError::Io {
            path: root.as_ref().to_path_buf(),
            source,
        })?;

        if !root.is_dir() {
            debug!(home = %root.display(), "extension home does not exist");
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let io_err = |source| AnanasError::Io {
            path: root.clone(),
            source,
        };
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&root).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.join(MANIFEST_FILE_NAME).is_file() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut extensions = Vec::with_capacity(dirs.len());
        let mut rejected = Vec::new();
        let mut descriptors: HashMap<String, Arc<Descriptor>> = HashMap::new();
        for dir in dirs {
            let manifest = match load_extension_manifest(&dir.join(MANIFEST_FILE_NAME)) {
                Ok(manifest) => manifest,
                Err(error) => {
                    warn!(extension = %dir.display(), %error, "skipping invalid extension");
                    rejected.push(RejectedExtension { dir, error });
                    continue;
                }
            };
            for descriptor in manifest.descriptors(&dir) {
                if let Some(previous) = descriptors.get(&descriptor.id) {
                    warn!(
                        id = %descriptor.id,
                        previous = ?previous.classpath,
                        extension = %manifest.name,
                        "step declared by more than one extension, later one wins"
                    );
                }
                descriptors.insert(descriptor.id.clone(), Arc::new(descriptor));
            }
            extensions.push(InstalledExtension { dir, manifest });
        }

        info!(
            home = %root.display(),
            extensions = extensions.len(),
            rejected = rejected.len(),
            steps = descriptors.len(),
            "scanned extension home"
        );

        Ok(Self {
            root,
            extensions,
            rejected,
            descriptors,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed extensions in directory order.
    pub fn extensions(&self) -> &[InstalledExtension] {
        &self.extensions
    }

    /// Extensions skipped because their manifest could not be loaded.
    pub fn rejected(&self) -> &[RejectedExtension] {
        &self.rejected
    }

    /// All indexed descriptors, sorted by identifier.
    pub fn descriptors(&self) -> Vec<Arc<Descriptor>> {
        let mut all: Vec<Arc<Descriptor>> = self.descriptors.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl MetadataProvider for ExtensionHome {
    fn has_step_metadata(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    fn get_step_metadata(&self, id: &str) -> Result<Arc<Descriptor>, AnanasError> {
        self.descriptors
            .get(id)
            .cloned()
            .ok_or_else(|| AnanasError::ExtensionNotFound { id: id.to_string() })
    }
}
