// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extension resolution for the Ananas pipeline runner.
//!
//! Maps a step's metadata identifier to the type that runs it and the type
//! that paginates its preview data. First-party types come from a registry
//! populated once at bootstrap. Everything else is described by a metadata
//! provider (such as an [`ExtensionHome`]) and loaded from extension
//! libraries by the [`DynamicLoader`].

pub mod catalog;
pub mod export;
pub mod home;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod resolver;

pub use catalog::{
    CatalogEntry, CatalogKind, FirstPartyPaginator, FirstPartyStep, bootstrap, bootstrap_with,
    builtin_catalog, search_catalog,
};
pub use export::{ANANAS_EXTENSION_ABI_VERSION, Export, ExportTable};
pub use home::{ExtensionHome, InstalledExtension, RejectedExtension};
pub use loader::{DynamicLoader, ModuleOpener, NativeOpener, OpenError, StaticModules};
pub use manifest::{ExtensionManifest, StepDeclaration, parse_extension_manifest};
pub use registry::{BuiltinRegistry, ExtensionType, PaginatorType, Registrar, StepType};
pub use resolver::ExtensionResolver;
