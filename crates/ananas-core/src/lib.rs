// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ananas pipeline runner.
//!
//! This crate provides the capability traits every step implementation
//! satisfies, the factory traits extensions export, the metadata provider
//! contract, and the shared error type.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AnanasError, Capability};
pub use types::{Category, Dataframe, Descriptor, Field, Schema, StepSpec};

pub use traits::{MetadataProvider, Paginator, PaginatorFactory, StepFactory, StepRunner};
