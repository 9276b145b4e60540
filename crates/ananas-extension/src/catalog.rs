// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-party catalog.
//!
//! The connectors, loaders, transformer and viewers compiled into the runner,
//! and the bootstrap that loads them into a [`BuiltinRegistry`].

use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

use crate::registry::{BuiltinRegistry, Registrar};

/// Step implementations compiled into the runner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum FirstPartyStep {
    #[strum(serialize = "CSVConnector")]
    CsvConnector,
    JsonConnector,
    #[strum(serialize = "GCSConnector")]
    GcsConnector,
    BigQueryConnector,
    JdbcConnector,
    #[strum(serialize = "APIConnector")]
    ApiConnector,
    ExcelConnector,
    #[strum(serialize = "MongoDBConnector")]
    MongoDbConnector,
    #[strum(serialize = "SQLTransformer")]
    SqlTransformer,
    FileLoader,
    JdbcLoader,
    #[strum(serialize = "GCSLoader")]
    GcsLoader,
    BigQueryLoader,
    #[strum(serialize = "MongoDBLoader")]
    MongoDbLoader,
    DefaultDataViewer,
}

/// Paginator implementations compiled into the runner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum FirstPartyPaginator {
    #[strum(serialize = "CSVPaginator")]
    CsvPaginator,
    JsonPaginator,
    #[strum(serialize = "GCSPaginator")]
    GcsPaginator,
    #[strum(serialize = "BigqueryPaginator")]
    BigQueryPaginator,
    JdbcPaginator,
    #[strum(serialize = "APIPaginator")]
    ApiPaginator,
    ExcelPaginator,
    #[strum(serialize = "MongoDBPaginator")]
    MongoDbPaginator,
}

/// How a catalog entry is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Connector(FirstPartyPaginator),
    Loader(FirstPartyPaginator),
    Transformer,
    Viewer,
}

impl CatalogKind {
    pub fn paginator(self) -> Option<FirstPartyPaginator> {
        match self {
            CatalogKind::Connector(p) | CatalogKind::Loader(p) => Some(p),
            CatalogKind::Transformer | CatalogKind::Viewer => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Connector(_) => "connector",
            CatalogKind::Loader(_) => "loader",
            CatalogKind::Transformer => "transformer",
            CatalogKind::Viewer => "viewer",
        }
    }
}

/// One first-party identifier and the types that implement it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub kind: CatalogKind,
    pub step: FirstPartyStep,
}

impl CatalogEntry {
    const fn new(id: &'static str, kind: CatalogKind, step: FirstPartyStep) -> Self {
        Self { id, kind, step }
    }

    /// Register this entry with the primitive matching its kind.
    pub fn register(&self, registrar: &mut Registrar) {
        match self.kind {
            CatalogKind::Connector(paginator) => {
                registrar.register_connector(self.id, self.step, paginator)
            }
            CatalogKind::Loader(paginator) => {
                registrar.register_loader(self.id, self.step, paginator)
            }
            CatalogKind::Transformer => registrar.register_transformer(self.id, self.step),
            CatalogKind::Viewer => registrar.register_viewer(self.id, self.step),
        }
    }
}

/// Returns the complete first-party catalog.
pub fn builtin_catalog() -> Vec<CatalogEntry> {
    use CatalogKind::{Connector, Loader, Transformer, Viewer};
    use FirstPartyPaginator as P;
    use FirstPartyStep as S;

    vec![
        CatalogEntry::new("org.ananas.source.file.csv", Connector(P::CsvPaginator), S::CsvConnector),
        CatalogEntry::new("org.ananas.source.file.json", Connector(P::JsonPaginator), S::JsonConnector),
        CatalogEntry::new("org.ananas.source.file.gcs", Connector(P::GcsPaginator), S::GcsConnector),
        CatalogEntry::new(
            "org.ananas.source.gcp.bigquery",
            Connector(P::BigQueryPaginator),
            S::BigQueryConnector,
        ),
        CatalogEntry::new("org.ananas.source.jdbc.mysql", Connector(P::JdbcPaginator), S::JdbcConnector),
        CatalogEntry::new(
            "org.ananas.source.jdbc.postgres",
            Connector(P::JdbcPaginator),
            S::JdbcConnector,
        ),
        CatalogEntry::new("org.ananas.source.api", Connector(P::ApiPaginator), S::ApiConnector),
        CatalogEntry::new("org.ananas.source.file.excel", Connector(P::ExcelPaginator), S::ExcelConnector),
        CatalogEntry::new(
            "org.ananas.source.nosql.mongodb",
            Connector(P::MongoDbPaginator),
            S::MongoDbConnector,
        ),
        CatalogEntry::new("org.ananas.transform.sql", Transformer, S::SqlTransformer),
        CatalogEntry::new("org.ananas.destination.file.csv", Loader(P::CsvPaginator), S::FileLoader),
        CatalogEntry::new("org.ananas.destination.jdbc.mysql", Loader(P::JdbcPaginator), S::JdbcLoader),
        CatalogEntry::new("org.ananas.destination.jdbc.postgres", Loader(P::JdbcPaginator), S::JdbcLoader),
        CatalogEntry::new("org.ananas.destination.gcp.gcs", Loader(P::GcsPaginator), S::GcsLoader),
        CatalogEntry::new(
            "org.ananas.destination.gcp.bigquery",
            Loader(P::BigQueryPaginator),
            S::BigQueryLoader,
        ),
        CatalogEntry::new(
            "org.ananas.destination.nosql.mongodb",
            Loader(P::MongoDbPaginator),
            S::MongoDbLoader,
        ),
        CatalogEntry::new("org.ananas.visualization.barchart", Viewer, S::DefaultDataViewer),
        CatalogEntry::new("org.ananas.visualization.piechart", Viewer, S::DefaultDataViewer),
        CatalogEntry::new("org.ananas.visualization.linechart", Viewer, S::DefaultDataViewer),
        CatalogEntry::new("org.ananas.visualization.bignumber", Viewer, S::DefaultDataViewer),
    ]
}

/// Search the catalog by identifier or implementation name (case-insensitive).
///
/// An empty query returns every entry.
pub fn search_catalog(query: &str) -> Vec<CatalogEntry> {
    if query.is_empty() {
        return builtin_catalog();
    }
    let query_lower = query.to_lowercase();
    builtin_catalog()
        .into_iter()
        .filter(|entry| {
            entry.id.to_lowercase().contains(&query_lower)
                || entry.step.as_ref().to_lowercase().contains(&query_lower)
                || entry
                    .kind
                    .paginator()
                    .is_some_and(|p| p.as_ref().to_lowercase().contains(&query_lower))
        })
        .collect()
}

/// Register the first-party catalog and freeze the result.
pub fn bootstrap() -> BuiltinRegistry {
    bootstrap_with(|_| {})
}

/// Register the first-party catalog, then let `extra` add or override
/// registrations before the registry is frozen.
pub fn bootstrap_with(extra: impl FnOnce(&mut Registrar)) -> BuiltinRegistry {
    let mut registrar = Registrar::new();
    let catalog = builtin_catalog();
    for entry in &catalog {
        entry.register(&mut registrar);
    }
    extra(&mut registrar);

    let registry = registrar.freeze();
    info!(
        first_party = catalog.len(),
        steps = registry.len(),
        "extension registry bootstrapped"
    );
    registry
}
