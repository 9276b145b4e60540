// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The extension-side contract: export tables and the registration entrypoint.
//!
//! An extension library exports two symbols, generated by
//! [`declare_extension!`](crate::declare_extension):
//!
//! - `ANANAS_EXTENSION_ABI_VERSION`: a `u32` that must equal
//!   [`ANANAS_EXTENSION_ABI_VERSION`] of the host.
//! - `ananas_extension_register`: a `fn(&mut ExportTable)` that exports the
//!   library's factories under their class names.
//!
//! Class names follow a fixed convention: the step for identifier `X` is
//! exported as `X.StepRunner`, its paginator as `X.Paginator`.
//!
//! ```ignore
//! use ananas_extension::{declare_extension, ExportTable};
//!
//! fn register(exports: &mut ExportTable) {
//!     exports.step_runner("com.acme.source.kafka", KafkaConnectorFactory);
//!     exports.paginator("com.acme.source.kafka", KafkaPaginatorFactory);
//! }
//!
//! declare_extension!(register);
//! ```
//!
//! Both sides exchange Rust types, so an extension must be built with the same
//! compiler and the same `ananas-core` as the host.

use std::collections::HashMap;
use std::sync::Arc;

use ananas_core::{Capability, PaginatorFactory, StepFactory};

/// ABI revision of the export contract. Bumped on any incompatible change.
pub const ANANAS_EXTENSION_ABI_VERSION: u32 = 1;

/// Symbol holding the extension's ABI revision.
pub const ABI_VERSION_SYMBOL: &str = "ANANAS_EXTENSION_ABI_VERSION";

/// Symbol of the registration entrypoint.
pub const REGISTER_SYMBOL: &str = "ananas_extension_register";

/// Class-name suffix of step factories.
pub const STEP_RUNNER_CLASS_NAME: &str = "StepRunner";

/// Class-name suffix of paginator factories.
pub const PAGINATOR_CLASS_NAME: &str = "Paginator";

/// Signature of the registration entrypoint.
pub type RegisterFn = fn(&mut ExportTable);

/// Class name a step factory for `id` is exported under.
pub fn step_runner_class(id: &str) -> String {
    format!("{id}.{STEP_RUNNER_CLASS_NAME}")
}

/// Class name a paginator factory for `id` is exported under.
pub fn paginator_class(id: &str) -> String {
    format!("{id}.{PAGINATOR_CLASS_NAME}")
}

/// A single exported factory.
#[derive(Clone)]
pub enum Export {
    Step(Arc<dyn StepFactory>),
    Paginator(Arc<dyn PaginatorFactory>),
}

impl Export {
    /// The capability this export provides.
    pub fn capability(&self) -> Capability {
        match self {
            Export::Step(_) => Capability::StepRunner,
            Export::Paginator(_) => Capability::Paginator,
        }
    }

    /// Implementation name reported by the factory.
    pub fn type_name(&self) -> &str {
        match self {
            Export::Step(factory) => factory.type_name(),
            Export::Paginator(factory) => factory.type_name(),
        }
    }
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Export")
            .field("capability", &self.capability())
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// Factories exported by one extension library (or linked into the host).
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    exports: HashMap<String, Export>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a step factory for `id` under `<id>.StepRunner`.
    pub fn step_runner(&mut self, id: &str, factory: impl StepFactory + 'static) {
        self.export(step_runner_class(id), Export::Step(Arc::new(factory)));
    }

    /// Export a paginator factory for `id` under `<id>.Paginator`.
    pub fn paginator(&mut self, id: &str, factory: impl PaginatorFactory + 'static) {
        self.export(paginator_class(id), Export::Paginator(Arc::new(factory)));
    }

    /// Export under an explicit class name. A later export replaces an earlier one.
    pub fn export(&mut self, class_name: impl Into<String>, export: Export) {
        self.exports.insert(class_name.into(), export);
    }

    pub fn get(&self, class_name: &str) -> Option<&Export> {
        self.exports.get(class_name)
    }

    /// Exported class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

/// Generates the symbols the host looks up in an extension library.
///
/// Takes the path of a `fn(&mut ExportTable)` that performs the registration.
#[macro_export]
macro_rules! declare_extension {
    ($register:path) => {
        #[unsafe(no_mangle)]
        pub static ANANAS_EXTENSION_ABI_VERSION: u32 =
            $crate::export::ANANAS_EXTENSION_ABI_VERSION;

        #[unsafe(no_mangle)]
        pub fn ananas_extension_register(exports: &mut $crate::export::ExportTable) {
            $register(exports)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ananas_test_utils::{MockPaginatorFactory, MockStepFactory};

    #[test]
    fn class_names_follow_convention() {
        assert_eq!(
            step_runner_class("org.example.source.kafka"),
            "org.example.source.kafka.StepRunner"
        );
        assert_eq!(
            paginator_class("org.example.source.kafka"),
            "org.example.source.kafka.Paginator"
        );
    }

    #[test]
    fn helpers_export_under_conventional_names() {
        let mut table = ExportTable::new();
        table.step_runner("com.acme.kafka", MockStepFactory::new("KafkaConnector"));
        table.paginator("com.acme.kafka", MockPaginatorFactory::new("KafkaPaginator"));

        assert_eq!(
            table.class_names(),
            vec!["com.acme.kafka.Paginator", "com.acme.kafka.StepRunner"]
        );
        let step = table.get("com.acme.kafka.StepRunner").unwrap();
        assert_eq!(step.capability(), Capability::StepRunner);
        assert_eq!(step.type_name(), "KafkaConnector");
        assert!(table.get("com.acme.kafka").is_none());
    }

    #[test]
    fn later_export_replaces_earlier() {
        let mut table = ExportTable::new();
        table.step_runner("com.acme.kafka", MockStepFactory::new("V1"));
        table.step_runner("com.acme.kafka", MockStepFactory::new("V2"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("com.acme.kafka.StepRunner").unwrap().type_name(), "V2");
    }

    // The macro must expand to a registration entrypoint with the expected signature.
    mod declared {
        use super::*;

        fn register(exports: &mut ExportTable) {
            exports.step_runner("com.acme.macro", MockStepFactory::new("MacroStep"));
        }

        crate::declare_extension!(register);

        #[test]
        fn declared_entrypoint_registers_exports() {
            let entry: RegisterFn = ananas_extension_register;
            let mut table = ExportTable::new();
            entry(&mut table);
            assert!(table.get("com.acme.macro.StepRunner").is_some());
            assert_eq!(ANANAS_EXTENSION_ABI_VERSION, super::ANANAS_EXTENSION_ABI_VERSION);
        }
    }
}
