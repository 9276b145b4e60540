// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extension manifest parsing from `extension.toml` files.
//!
//! A manifest names an extension, lists where its libraries live, and
//! declares the step identifiers it provides together with their category.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ananas_core::{AnanasError, Category, Descriptor};
use serde::Deserialize;

/// File name of an extension manifest inside an extension directory.
pub const MANIFEST_FILE_NAME: &str = "extension.toml";

/// Parsed extension manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionManifest {
    /// Unique name of the extension (e.g. "acme-kafka").
    pub name: String,
    pub version: semver::Version,
    pub description: String,
    /// Search-path entries as written, relative to the extension directory
    /// unless absolute.
    pub classpath: Vec<PathBuf>,
    /// Steps provided by the extension.
    pub steps: Vec<StepDeclaration>,
}

/// A step identifier declared by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDeclaration {
    pub id: String,
    pub category: Category,
}

impl ExtensionManifest {
    /// Descriptors for every declared step, with the classpath resolved
    /// against `base_dir`.
    pub fn descriptors(&self, base_dir: &Path) -> Vec<Descriptor> {
        let classpath: Vec<PathBuf> = self
            .classpath
            .iter()
            .map(|entry| {
                if entry.is_absolute() {
                    entry.clone()
                } else {
                    base_dir.join(entry)
                }
            })
            .collect();

        self.steps
            .iter()
            .map(|step| Descriptor {
                id: step.id.clone(),
                category: step.category,
                classpath: classpath.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    extension: ExtensionSection,
    #[serde(default, rename = "step")]
    steps: Vec<StepSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExtensionSection {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    classpath: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepSection {
    id: String,
    #[serde(rename = "type")]
    category: String,
}

/// Check that `id` is a dot-separated identifier with non-empty segments.
///
/// Segments may hold ASCII letters, digits, `_` and `-`.
pub fn validate_identifier(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("identifier must not be empty".to_string());
    }
    for segment in id.split('.') {
        if segment.is_empty() {
            return Err(format!("identifier `{id}` has an empty segment"));
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!("identifier `{id}` contains invalid character {c:?}"));
        }
    }
    Ok(())
}

/// Parse an extension manifest. `origin` is only used in error messages.
pub fn parse_extension_manifest(
    origin: &Path,
    toml_content: &str,
) -> Result<ExtensionManifest, AnanasError> {
    let invalid = |message: String| AnanasError::Manifest {
        path: origin.to_path_buf(),
        message,
    };

    let file: ManifestFile = toml::from_str(toml_content).map_err(|e| invalid(e.to_string()))?;
    let section = file.extension;

    if section.name.trim().is_empty() {
        return Err(invalid("extension.name must not be empty".to_string()));
    }

    let version = semver::Version::parse(&section.version).map_err(|e| {
        invalid(format!(
            "extension.version `{}` is not a semantic version: {e}",
            section.version
        ))
    })?;

    if file.steps.is_empty() {
        return Err(invalid("at least one [[step]] must be declared".to_string()));
    }

    let mut steps = Vec::with_capacity(file.steps.len());
    for step in file.steps {
        validate_identifier(&step.id).map_err(&invalid)?;
        let category = Category::from_str(&step.category).map_err(|_| {
            invalid(format!(
                "step `{}` has invalid type `{}`. Expected one of: Source, Destination, Transform, Visualization",
                step.id, step.category
            ))
        })?;
        steps.push(StepDeclaration {
            id: step.id,
            category,
        });
    }

    Ok(ExtensionManifest {
        name: section.name,
        version,
        description: section.description,
        classpath: section.classpath,
        steps,
    })
}

/// Read and parse `path`.
pub fn load_extension_manifest(path: &Path) -> Result<ExtensionManifest, AnanasError> {
    let content = std::fs::read_to_string(path).map_err(|source| AnanasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_extension_manifest(path, &content)
}
