// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the resolver, the metadata providers, and extensions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of pipeline step an extension identifier describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Category {
    Source,
    Destination,
    Transform,
    Visualization,
}

impl Category {
    /// Whether steps of this category have an independent data view to page through.
    ///
    /// Transforms have none.
    pub fn is_paginated(self) -> bool {
        matches!(
            self,
            Category::Source | Category::Destination | Category::Visualization
        )
    }
}

/// Metadata describing an extension-supplied step.
///
/// Owned by a metadata provider; the resolver only borrows it for a single
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Namespaced identifier, e.g. `com.acme.source.kafka`.
    pub id: String,
    /// Step category.
    pub category: Category,
    /// Ordered search-path locations holding the extension's libraries.
    pub classpath: Vec<PathBuf>,
}

/// A configured step instance, handed to factories when the engine builds a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Unique id of the step inside its pipeline.
    pub id: String,
    /// Extension identifier the step was created from.
    pub metadata_id: String,
    /// Free-form step configuration.
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// One column of an auto-detected schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: String,
}

/// Ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

/// A page of preview data produced by a paginator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataframe {
    pub schema: Schema,
    pub data: Vec<Vec<serde_json::Value>>,
}
