// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Factories exported by extensions.
//!
//! An extension library never hands the host a runner directly. It exports
//! factories under conventional class names, and the engine asks the factory
//! for an instance once a step is configured.

use crate::error::AnanasError;
use crate::traits::paginator::Paginator;
use crate::traits::step::StepRunner;
use crate::types::StepSpec;

/// Creates [`StepRunner`] instances for one extension identifier.
pub trait StepFactory: Send + Sync {
    /// Name of the implementation, used in listings and diagnostics.
    fn type_name(&self) -> &str;

    /// Create a runner for the configured step.
    fn create(&self, spec: &StepSpec) -> Result<Box<dyn StepRunner>, AnanasError>;
}

/// Creates [`Paginator`] instances for one extension identifier.
pub trait PaginatorFactory: Send + Sync {
    /// Name of the implementation, used in listings and diagnostics.
    fn type_name(&self) -> &str;

    /// Create a paginator previewing the configured step.
    fn create(&self, spec: &StepSpec) -> Result<Box<dyn Paginator>, AnanasError>;
}
