// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contracts for resolved step types.
//!
//! A resolved type is either compiled into the runner or exported by an
//! extension library through one of the factory traits defined here.

pub mod factory;
pub mod metadata;
pub mod paginator;
pub mod step;

pub use factory::{PaginatorFactory, StepFactory};
pub use metadata::MetadataProvider;
pub use paginator::Paginator;
pub use step::StepRunner;
