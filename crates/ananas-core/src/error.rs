// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ananas pipeline runner.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across extension resolution and the capability traits.
#[derive(Debug, Error)]
pub enum AnanasError {
    /// The identifier is absent from the built-in registry, the metadata
    /// provider, and the dynamic search path.
    #[error("extension not found: {id}")]
    ExtensionNotFound { id: String },

    /// The identifier is known but the named type could not be located or
    /// loaded from the resolved search path.
    #[error("failed to load `{class_name}`: {message}")]
    ExtensionLoad {
        class_name: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A loaded export does not satisfy the capability it was requested as.
    #[error("`{class_name}` is exported as a {found}, expected a {expected}")]
    CapabilityMismatch {
        class_name: String,
        expected: Capability,
        found: Capability,
    },

    /// An extension manifest could not be parsed or failed validation.
    #[error("invalid extension manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Filesystem errors while scanning extension directories.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnanasError {
    /// Shorthand for an [`AnanasError::ExtensionLoad`] without an underlying source.
    pub fn load(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        AnanasError::ExtensionLoad {
            class_name: class_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for the two resolution failures: not found and load failure.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            AnanasError::ExtensionNotFound { .. } | AnanasError::ExtensionLoad { .. }
        )
    }
}

/// The two capabilities a resolved type can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Capability {
    #[strum(serialize = "step runner")]
    StepRunner,
    #[strum(serialize = "paginator")]
    Paginator,
}
