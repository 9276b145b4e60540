// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic loading of extension types by class name.
//!
//! A [`DynamicLoader`] searches an ordered list of locations for a library
//! exporting a given class name. Every call builds a fresh loading context
//! from its own search path, so two resolutions never share discovered
//! libraries unless the optional cache is enabled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ananas_core::{AnanasError, Capability, PaginatorFactory, StepFactory};
use dashmap::DashMap;
use libloading::Library;
use thiserror::Error;
use tracing::{debug, warn};

use crate::export::{
    ABI_VERSION_SYMBOL, ANANAS_EXTENSION_ABI_VERSION, Export, ExportTable, REGISTER_SYMBOL,
    RegisterFn,
};
use crate::registry::ExtensionType;

/// Failure to open a single library.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot open library: {0}")]
    Library(#[from] libloading::Error),

    #[error("missing export `{symbol}`: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("extension ABI version mismatch: host {expected}, library {found}")]
    AbiMismatch { expected: u32, found: u32 },

    #[error("no module is linked at this path")]
    NotLinked,
}

/// An opened library and the factories it exported.
pub struct ExtensionModule {
    path: PathBuf,
    exports: ExportTable,
    // Must drop after `exports`.
    library: Option<Arc<Library>>,
}

impl ExtensionModule {
    pub fn new(path: impl Into<PathBuf>, exports: ExportTable, library: Option<Library>) -> Self {
        Self {
            path: path.into(),
            exports,
            library: library.map(Arc::new),
        }
    }
}

/// Opens the library at a path and collects its exports.
pub trait ModuleOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<ExtensionModule, OpenError>;
}

/// Opens native shared libraries with `libloading`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeOpener;

impl ModuleOpener for NativeOpener {
    fn open(&self, path: &Path) -> Result<ExtensionModule, OpenError> {
        // SAFETY: opening a library runs its initialisers. Libraries on the
        // search path are trusted extension code.
        let library = unsafe { Library::new(path) }?;

        // SAFETY: the symbol is declared by `declare_extension!` as a `u32` static.
        let found = unsafe {
            let abi = library
                .get::<*const u32>(ABI_VERSION_SYMBOL.as_bytes())
                .map_err(|source| OpenError::MissingSymbol {
                    symbol: ABI_VERSION_SYMBOL,
                    source,
                })?;
            **abi
        };
        if found != ANANAS_EXTENSION_ABI_VERSION {
            return Err(OpenError::AbiMismatch {
                expected: ANANAS_EXTENSION_ABI_VERSION,
                found,
            });
        }

        // SAFETY: the ABI revision matched, so the entrypoint has the
        // `RegisterFn` signature declared by `declare_extension!`.
        let register: RegisterFn = unsafe {
            *library
                .get::<RegisterFn>(REGISTER_SYMBOL.as_bytes())
                .map_err(|source| OpenError::MissingSymbol {
                    symbol: REGISTER_SYMBOL,
                    source,
                })?
        };

        let mut exports = ExportTable::new();
        register(&mut exports);
        debug!(
            path = %path.display(),
            exports = exports.len(),
            "opened extension library"
        );

        Ok(ExtensionModule::new(path, exports, Some(library)))
    }
}

/// Export tables linked into the process, keyed by the path they stand in for.
///
/// Useful for extensions compiled into the host binary and for tests.
#[derive(Debug, Default)]
pub struct StaticModules {
    modules: HashMap<PathBuf, ExportTable>,
    opened: AtomicUsize,
}

impl StaticModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, path: impl Into<PathBuf>, exports: ExportTable) -> Self {
        self.modules.insert(path.into(), exports);
        self
    }

    /// Number of successful and failed `open` calls so far.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl ModuleOpener for StaticModules {
    fn open(&self, path: &Path) -> Result<ExtensionModule, OpenError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let exports = self.modules.get(path).ok_or(OpenError::NotLinked)?;
        Ok(ExtensionModule::new(path, exports.clone(), None))
    }
}

impl<T: ModuleOpener + ?Sized> ModuleOpener for Arc<T> {
    fn open(&self, path: &Path) -> Result<ExtensionModule, OpenError> {
        (**self).open(path)
    }
}

/// An export found by the loader, before capability narrowing.
#[derive(Debug, Clone)]
pub struct LoadedExport {
    class_name: String,
    export: Export,
    origin: Option<PathBuf>,
    library: Option<Arc<Library>>,
}

impl LoadedExport {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn export(&self) -> &Export {
        &self.export
    }

    /// Library the export was found in; `None` for host-linked exports.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    fn into_step(self) -> Result<ExtensionType<dyn StepFactory>, AnanasError> {
        match self.export {
            Export::Step(factory) => Ok(ExtensionType::new(
                self.class_name,
                factory,
                self.origin,
                self.library,
            )),
            Export::Paginator(_) => Err(AnanasError::CapabilityMismatch {
                class_name: self.class_name,
                expected: Capability::StepRunner,
                found: Capability::Paginator,
            }),
        }
    }

    fn into_paginator(self) -> Result<ExtensionType<dyn PaginatorFactory>, AnanasError> {
        match self.export {
            Export::Paginator(factory) => Ok(ExtensionType::new(
                self.class_name,
                factory,
                self.origin,
                self.library,
            )),
            Export::Step(_) => Err(AnanasError::CapabilityMismatch {
                class_name: self.class_name,
                expected: Capability::Paginator,
                found: Capability::StepRunner,
            }),
        }
    }
}

type CacheKey = (String, Vec<PathBuf>);

/// Loads extension types by class name from search-path locations.
pub struct DynamicLoader {
    opener: Arc<dyn ModuleOpener>,
    ambient: Vec<PathBuf>,
    linked: ExportTable,
    cache: Option<DashMap<CacheKey, LoadedExport>>,
}

impl DynamicLoader {
    /// A loader opening native libraries, searching `ambient` when a
    /// resolution supplies no locations of its own.
    pub fn new(ambient: Vec<PathBuf>) -> Self {
        Self {
            opener: Arc::new(NativeOpener),
            ambient,
            linked: ExportTable::new(),
            cache: None,
        }
    }

    pub fn with_opener(mut self, opener: impl ModuleOpener + 'static) -> Self {
        self.opener = Arc::new(opener);
        self
    }

    /// Exports linked into the host. They are visible to every resolution and
    /// take precedence over libraries on the search path.
    pub fn with_linked_exports(mut self, exports: ExportTable) -> Self {
        self.linked = exports;
        self
    }

    /// Cache successful loads keyed by class name and search path.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    pub fn ambient(&self) -> &[PathBuf] {
        &self.ambient
    }

    /// Look up `class_name` among host-linked exports, then in `search_path`
    /// (or the ambient search path when `search_path` is empty).
    ///
    /// Returns `Ok(None)` when no location exports the class. A library that
    /// cannot be opened fails the whole lookup.
    pub fn load(
        &self,
        class_name: &str,
        search_path: &[PathBuf],
    ) -> Result<Option<LoadedExport>, AnanasError> {
        if let Some(export) = self.linked.get(class_name) {
            debug!(class_name, "found host-linked export");
            return Ok(Some(LoadedExport {
                class_name: class_name.to_string(),
                export: export.clone(),
                origin: None,
                library: None,
            }));
        }

        let key = self
            .cache
            .as_ref()
            .map(|_| (class_name.to_string(), search_path.to_vec()));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                debug!(class_name, "loaded type cache hit");
                return Ok(Some(hit.clone()));
            }
        }

        let locations = if search_path.is_empty() {
            self.ambient.as_slice()
        } else {
            search_path
        };
        let context = LoadingContext::new(self.opener.as_ref(), locations)?;
        let found = context.find(class_name)?;

        if let (Some(cache), Some(key), Some(loaded)) = (&self.cache, key, &found) {
            cache.insert(key, loaded.clone());
        }
        Ok(found)
    }

    /// Load `class_name` and check that it is a step factory.
    pub fn load_step(
        &self,
        class_name: &str,
        search_path: &[PathBuf],
    ) -> Result<Option<ExtensionType<dyn StepFactory>>, AnanasError> {
        self.load(class_name, search_path)?
            .map(LoadedExport::into_step)
            .transpose()
    }

    /// Load `class_name` and check that it is a paginator factory.
    pub fn load_paginator(
        &self,
        class_name: &str,
        search_path: &[PathBuf],
    ) -> Result<Option<ExtensionType<dyn PaginatorFactory>>, AnanasError> {
        self.load(class_name, search_path)?
            .map(LoadedExport::into_paginator)
            .transpose()
    }
}

impl std::fmt::Debug for DynamicLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLoader")
            .field("ambient", &self.ambient)
            .field("linked", &self.linked.class_names())
            .field("cache", &self.cache.as_ref().map(DashMap::len))
            .finish()
    }
}

/// The libraries visible to a single load call.
struct LoadingContext<'a> {
    opener: &'a dyn ModuleOpener,
    libraries: Vec<PathBuf>,
}

impl<'a> LoadingContext<'a> {
    fn new(opener: &'a dyn ModuleOpener, locations: &[PathBuf]) -> Result<Self, AnanasError> {
        let mut libraries = Vec::new();
        for location in locations {
            if location.is_dir() {
                libraries.extend(scan_directory(location)?);
            } else if location.is_file() {
                libraries.push(location.clone());
            } else {
                warn!(location = %location.display(), "skipping missing search-path location");
            }
        }
        Ok(Self { opener, libraries })
    }

    fn find(&self, class_name: &str) -> Result<Option<LoadedExport>, AnanasError> {
        for path in &self.libraries {
            let module = self
                .opener
                .open(path)
                .map_err(|e| AnanasError::ExtensionLoad {
                    class_name: class_name.to_string(),
                    message: format!("cannot open {}", path.display()),
                    source: Some(Box::new(e)),
                })?;
            if let Some(export) = module.exports.get(class_name) {
                debug!(class_name, library = %path.display(), "found export");
                return Ok(Some(LoadedExport {
                    class_name: class_name.to_string(),
                    export: export.clone(),
                    origin: Some(module.path.clone()),
                    library: module.library.clone(),
                }));
            }
        }
        debug!(
            class_name,
            searched = self.libraries.len(),
            "no library exports class"
        );
        Ok(None)
    }
}

/// Library files directly inside `dir`, sorted by path.
fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, AnanasError> {
    let io_err = |source| AnanasError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut libraries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_library = path
            .extension()
            .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION);
        if is_library && path.is_file() {
            libraries.push(path);
        }
    }
    libraries.sort();
    Ok(libraries)
}
