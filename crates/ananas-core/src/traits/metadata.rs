// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata provider contract.

use std::sync::Arc;

use crate::error::AnanasError;
use crate::types::Descriptor;

/// Source of descriptors for extension-supplied identifiers.
///
/// Implementations must tolerate concurrent calls from several resolutions.
pub trait MetadataProvider: Send + Sync {
    /// Whether a descriptor exists for `id`.
    fn has_step_metadata(&self, id: &str) -> bool;

    /// Returns the descriptor for `id`.
    ///
    /// Fails with [`AnanasError::ExtensionNotFound`] when
    /// [`has_step_metadata`](Self::has_step_metadata) is false.
    fn get_step_metadata(&self, id: &str) -> Result<Arc<Descriptor>, AnanasError>;
}
