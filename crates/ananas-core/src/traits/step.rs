// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Step capability: executes one stage of a pipeline.

use async_trait::async_trait;

use crate::error::AnanasError;
use crate::types::Schema;

/// A runnable pipeline stage (connector, transformer, loader, or viewer).
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Id of the step instance this runner was built for.
    fn step_id(&self) -> &str;

    /// Builds the stage so the engine can wire it into the pipeline.
    async fn build(&mut self) -> Result<(), AnanasError>;

    /// Output schema, available once the step has been built.
    fn schema(&self) -> Option<&Schema>;
}
