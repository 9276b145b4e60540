// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ananas integration tests.
//!
//! # Components
//!
//! - [`MockMetadataProvider`] - In-memory metadata provider that counts calls
//! - [`MockStepFactory`] / [`MockPaginatorFactory`] - Factories for extension export tables

pub mod mock_factory;
pub mod mock_metadata;

pub use mock_factory::{MockPaginator, MockPaginatorFactory, MockStepFactory, MockStepRunner};
pub use mock_metadata::MockMetadataProvider;
