// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginator capability: paged, schema-autodetected previews of a step's data.

use async_trait::async_trait;

use crate::error::AnanasError;
use crate::types::Dataframe;

#[async_trait]
pub trait Paginator: Send + Sync {
    /// Returns page `page` (zero based) holding at most `page_size` rows.
    async fn paginate(&self, page: u32, page_size: u32) -> Result<Dataframe, AnanasError>;
}
