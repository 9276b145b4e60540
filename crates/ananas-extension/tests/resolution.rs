// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end resolution: registrar, metadata providers and the loader together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ananas_core::{AnanasError, Category, MetadataProvider};
use ananas_extension::{
    BuiltinRegistry, DynamicLoader, ExportTable, ExtensionHome, ExtensionResolver,
    FirstPartyPaginator, FirstPartyStep, PaginatorType, Registrar, StaticModules, StepType,
    bootstrap, builtin_catalog,
};
use ananas_test_utils::{MockMetadataProvider, MockPaginatorFactory, MockStepFactory};
use tempfile::TempDir;

fn resolver_with(
    registry: BuiltinRegistry,
    provider: Arc<dyn MetadataProvider>,
) -> ExtensionResolver {
    ExtensionResolver::new(Arc::new(registry), DynamicLoader::new(vec![])).with_metadata(provider)
}

fn library_file(dir: &Path, stem: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{stem}.{}", std::env::consts::DLL_EXTENSION));
    std::fs::write(&path, b"").unwrap();
    path
}

#[test]
fn every_catalog_entry_resolves_without_metadata_calls() {
    let provider = Arc::new(MockMetadataProvider::new());
    let resolver = resolver_with(bootstrap(), provider.clone());

    for entry in builtin_catalog() {
        assert!(resolver.has_step(entry.id), "{}", entry.id);
        assert_eq!(
            resolver.get_step(entry.id, true).unwrap(),
            StepType::FirstParty(entry.step)
        );
        match entry.kind.paginator() {
            Some(paginator) => {
                assert!(resolver.has_paginator(entry.id));
                assert_eq!(
                    resolver.get_paginator(entry.id).unwrap(),
                    PaginatorType::FirstParty(paginator)
                );
            }
            None => assert!(!resolver.has_paginator(entry.id)),
        }
    }

    assert_eq!(provider.get_calls(), 0);
}

#[test]
fn connector_registers_both_maps() {
    let mut registrar = Registrar::new();
    registrar.register_connector(
        "com.acme.source.demo",
        FirstPartyStep::JsonConnector,
        FirstPartyPaginator::JsonPaginator,
    );
    let provider = Arc::new(MockMetadataProvider::new());
    let resolver = resolver_with(registrar.freeze(), provider.clone());

    assert!(resolver.has_step("com.acme.source.demo"));
    assert!(resolver.has_paginator("com.acme.source.demo"));
    assert_eq!(
        resolver.get_step("com.acme.source.demo", false).unwrap(),
        StepType::FirstParty(FirstPartyStep::JsonConnector)
    );
    assert_eq!(
        resolver.get_paginator("com.acme.source.demo").unwrap(),
        PaginatorType::FirstParty(FirstPartyPaginator::JsonPaginator)
    );
    assert_eq!(provider.has_calls(), 0);
    assert_eq!(provider.get_calls(), 0);
}

#[test]
fn transformer_has_no_paginator_without_metadata() {
    let mut registrar = Registrar::new();
    registrar.register_transformer("com.acme.transform.demo", FirstPartyStep::SqlTransformer);
    let resolver = resolver_with(registrar.freeze(), Arc::new(MockMetadataProvider::new()));

    assert!(resolver.has_step("com.acme.transform.demo"));
    assert_eq!(
        resolver.get_step("com.acme.transform.demo", true).unwrap(),
        StepType::FirstParty(FirstPartyStep::SqlTransformer)
    );
    assert!(!resolver.has_paginator("com.acme.transform.demo"));
}

#[test]
fn paginator_existence_follows_descriptor_category() {
    let provider = MockMetadataProvider::new()
        .with_descriptor("com.acme.source", Category::Source, vec![])
        .with_descriptor("com.acme.destination", Category::Destination, vec![])
        .with_descriptor("com.acme.visualization", Category::Visualization, vec![])
        .with_descriptor("com.acme.transform", Category::Transform, vec![]);
    let resolver = resolver_with(BuiltinRegistry::default(), Arc::new(provider));

    assert!(resolver.has_paginator("com.acme.source"));
    assert!(resolver.has_paginator("com.acme.destination"));
    assert!(resolver.has_paginator("com.acme.visualization"));
    assert!(!resolver.has_paginator("com.acme.transform"));
    assert!(resolver.has_step("com.acme.transform"));
}

#[test]
fn unknown_identifier_fails_everywhere() {
    let resolver = resolver_with(bootstrap(), Arc::new(MockMetadataProvider::new()));
    let id = "com.acme.unknown";

    assert!(!resolver.has_step(id));
    assert!(!resolver.has_paginator(id));
    assert!(resolver.get_step(id, true).unwrap_err().is_resolution_failure());
    assert!(resolver.get_step(id, false).unwrap_err().is_resolution_failure());
    assert!(resolver.get_paginator(id).unwrap_err().is_resolution_failure());
}

#[test]
fn reregistration_overwrites() {
    let mut registrar = Registrar::new();
    registrar.register_step("com.acme.step", FirstPartyStep::FileLoader);
    registrar.register_step("com.acme.step", FirstPartyStep::JdbcLoader);
    let resolver = resolver_with(registrar.freeze(), Arc::new(MockMetadataProvider::new()));

    assert_eq!(
        resolver.get_step("com.acme.step", true).unwrap(),
        StepType::FirstParty(FirstPartyStep::JdbcLoader)
    );
}

/// Installs `acme-kafka` into `home` with one library under `lib/`.
fn install_kafka(home: &Path) -> PathBuf {
    let ext_dir = home.join("acme-kafka");
    std::fs::create_dir_all(&ext_dir).unwrap();
    std::fs::write(
        ext_dir.join("extension.toml"),
        r#"
[extension]
name = "acme-kafka"
version = "0.3.1"
classpath = ["lib"]

[[step]]
id = "com.acme.source.kafka"
type = "Source"
"#,
    )
    .unwrap();
    library_file(&ext_dir.join("lib"), "libacme_kafka")
}

fn kafka_exports() -> ExportTable {
    let mut exports = ExportTable::new();
    exports.step_runner("com.acme.source.kafka", MockStepFactory::new("KafkaConnector"));
    exports.paginator("com.acme.source.kafka", MockPaginatorFactory::new("KafkaPaginator"));
    exports
}

#[test]
fn extension_step_loads_from_descriptor_classpath() {
    let home_dir = TempDir::new().unwrap();
    let library = install_kafka(home_dir.path());
    let home = ExtensionHome::scan(home_dir.path()).unwrap();
    let loader = DynamicLoader::new(vec![])
        .with_opener(StaticModules::new().with_module(&library, kafka_exports()));
    let resolver = ExtensionResolver::new(Arc::new(bootstrap()), loader).with_metadata(Arc::new(home));

    let StepType::Extension(step) = resolver.get_step("com.acme.source.kafka", true).unwrap() else {
        panic!("expected an extension step");
    };
    assert_eq!(step.class_name(), "com.acme.source.kafka.StepRunner");
    assert_eq!(step.factory().type_name(), "KafkaConnector");
    assert_eq!(step.origin(), Some(library.as_path()));

    let paginator = resolver.get_paginator("com.acme.source.kafka").unwrap();
    assert_eq!(paginator.type_name(), "KafkaPaginator");
}

#[test]
fn remote_step_resolution_ignores_descriptor_classpath() {
    let home_dir = TempDir::new().unwrap();
    let library = install_kafka(home_dir.path());
    let home = ExtensionHome::scan(home_dir.path()).unwrap();
    let loader = DynamicLoader::new(vec![])
        .with_opener(StaticModules::new().with_module(&library, kafka_exports()));
    let resolver = ExtensionResolver::new(Arc::new(bootstrap()), loader).with_metadata(Arc::new(home));

    let err = resolver.get_step("com.acme.source.kafka", false).unwrap_err();
    assert!(
        matches!(err, AnanasError::ExtensionLoad { .. }),
        "got: {err:?}"
    );

    // Paginators always search the descriptor's classpath.
    assert!(resolver.get_paginator("com.acme.source.kafka").is_ok());
}

#[test]
fn remote_step_resolution_uses_ambient_search_path() {
    let home_dir = TempDir::new().unwrap();
    let library = install_kafka(home_dir.path());
    let home = ExtensionHome::scan(home_dir.path()).unwrap();
    let ambient = library.parent().unwrap().to_path_buf();
    let loader = DynamicLoader::new(vec![ambient])
        .with_opener(StaticModules::new().with_module(&library, kafka_exports()));
    let resolver = ExtensionResolver::new(Arc::new(bootstrap()), loader).with_metadata(Arc::new(home));

    let step = resolver.get_step("com.acme.source.kafka", false).unwrap();
    assert_eq!(step.type_name(), "KafkaConnector");
}

#[test]
fn resolver_is_shareable_across_threads() {
    let home_dir = TempDir::new().unwrap();
    let library = install_kafka(home_dir.path());
    let home = ExtensionHome::scan(home_dir.path()).unwrap();
    let loader = DynamicLoader::new(vec![])
        .with_opener(StaticModules::new().with_module(&library, kafka_exports()))
        .with_cache(true);
    let resolver = Arc::new(
        ExtensionResolver::new(Arc::new(bootstrap()), loader).with_metadata(Arc::new(home)),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                resolver
                    .get_step("com.acme.source.kafka", true)
                    .map(|step| step.type_name().to_string())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "KafkaConnector");
    }
}
