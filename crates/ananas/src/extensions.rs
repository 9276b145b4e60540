// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ananas extensions` command implementations.

use std::path::Path;
use std::sync::Arc;

use ananas_config::AnanasConfig;
use ananas_core::{AnanasError, Category};
use ananas_extension::{
    DynamicLoader, ExtensionHome, ExtensionResolver, PaginatorType, StepType, bootstrap,
    search_catalog,
};
use colored::Colorize;
use tracing::info;

/// Wire the resolver from configuration: first-party catalog, extension home
/// and a loader over the ambient search path.
pub fn build_resolver(
    config: &AnanasConfig,
) -> Result<(ExtensionResolver, Arc<ExtensionHome>), AnanasError> {
    let home = Arc::new(ExtensionHome::scan(config.extension.home_path())?);
    let loader = DynamicLoader::new(config.extension.ambient_paths())
        .with_cache(config.extension.cache_loaded_types);
    let resolver = ExtensionResolver::new(Arc::new(bootstrap()), loader)
        .with_metadata(home.clone());
    Ok((resolver, home))
}

/// Run `ananas extensions list [QUERY]`.
pub fn run_list(
    config: &AnanasConfig,
    query: Option<&str>,
    use_color: bool,
) -> Result<(), AnanasError> {
    let query = query.unwrap_or("");
    let home = ExtensionHome::scan(config.extension.home_path())?;

    println!();
    println!("  Built-in steps");
    println!("  {}", "-".repeat(35));
    let entries = search_catalog(query);
    if entries.is_empty() {
        println!("    (none match)");
    }
    for entry in &entries {
        println!("    {:<42} {:<12} {}", entry.id, entry.kind.label(), entry.step);
    }

    println!();
    println!("  Installed extensions ({})", home.root().display());
    println!("  {}", "-".repeat(35));
    let query_lower = query.to_lowercase();
    let installed: Vec<_> = home
        .extensions()
        .iter()
        .flat_map(|ext| ext.manifest.steps.iter().map(move |step| (ext, step)))
        .filter(|(_, step)| step.id.to_lowercase().contains(&query_lower))
        .collect();
    if installed.is_empty() {
        println!("    (none)");
    }
    for (ext, step) in installed {
        let origin = format!("{} {}", ext.manifest.name, ext.manifest.version);
        let origin = if use_color {
            origin.dimmed().to_string()
        } else {
            origin
        };
        println!("    {:<42} {:<12} {origin}", step.id, step.category.to_string());
    }
    for rejected in home.rejected() {
        let marker = if use_color {
            "invalid".red().to_string()
        } else {
            "[invalid]".to_string()
        };
        println!("    {marker} {}: {}", rejected.dir.display(), rejected.error);
    }
    println!();
    Ok(())
}

/// Run `ananas extensions resolve <ID>`.
pub fn run_resolve(
    config: &AnanasConfig,
    id: &str,
    remote: bool,
    use_color: bool,
) -> Result<(), AnanasError> {
    let (resolver, _home) = build_resolver(config)?;
    let prefer_local = config.runner.local && !remote;

    let step = resolver.get_step(id, prefer_local)?;
    let paginator = if resolver.has_paginator(id) {
        Some(resolver.get_paginator(id)?)
    } else {
        None
    };

    println!();
    println!("  {id}");
    println!("  {}", "-".repeat(35));
    println!("    Step:      {}", describe_step(&step));
    let paginator = match &paginator {
        Some(paginator) => describe_paginator(paginator),
        None if use_color => "none".dimmed().to_string(),
        None => "none".to_string(),
    };
    println!("    Paginator: {paginator}");
    println!();
    Ok(())
}

/// Outcome of checking one installed step, or one rejected extension.
#[derive(Debug)]
pub struct Verification {
    /// Step identifier, or the directory of a rejected extension.
    pub id: String,
    /// `None` for a rejected extension.
    pub category: Option<Category>,
    /// Why the check failed.
    pub failure: Option<String>,
}

/// Report every rejected extension, then resolve every installed step and
/// its paginator.
pub fn verify(
    resolver: &ExtensionResolver,
    home: &ExtensionHome,
    prefer_local: bool,
) -> Vec<Verification> {
    let rejected = home.rejected().iter().map(|rejected| Verification {
        id: rejected.dir.display().to_string(),
        category: None,
        failure: Some(rejected.error.to_string()),
    });

    let resolved = home.descriptors().into_iter().map(|descriptor| {
        let id = descriptor.id.as_str();
        let step = resolver.get_step(id, prefer_local).map(|_| ());
        let failure = match step {
            Err(e) => Some(e),
            Ok(()) if resolver.has_paginator(id) => resolver.get_paginator(id).err(),
            Ok(()) => None,
        };
        Verification {
            id: descriptor.id.clone(),
            category: Some(descriptor.category),
            failure: failure.map(|e| e.to_string()),
        }
    });

    rejected.chain(resolved).collect()
}

/// Run `ananas extensions verify`. Fails when any step does not resolve.
pub fn run_verify(config: &AnanasConfig, use_color: bool) -> Result<(), AnanasError> {
    let (resolver, home) = build_resolver(config)?;
    let results = verify(&resolver, &home, config.runner.local);

    println!();
    println!("  ananas extensions verify");
    println!("  {}", "-".repeat(35));
    if results.is_empty() {
        println!("    No extensions installed in {}", home.root().display());
    }
    for result in &results {
        match (&result.failure, use_color) {
            (None, true) => println!("    {} {}", "✓".green(), label(result)),
            (None, false) => println!("    [OK] {}", label(result)),
            (Some(e), true) => println!("    {} {}: {e}", "✗".red(), result.id),
            (Some(e), false) => println!("    [FAIL] {}: {e}", result.id),
        }
    }
    println!();

    let failed = results.iter().filter(|r| r.failure.is_some()).count();
    info!(checked = results.len(), failed, "verified installed extensions");
    if failed > 0 {
        return Err(AnanasError::Internal(format!(
            "{failed} of {} extension steps failed to resolve",
            results.len()
        )));
    }
    Ok(())
}

fn label(result: &Verification) -> String {
    match result.category {
        Some(category) => format!("{} ({category})", result.id),
        None => result.id.clone(),
    }
}

fn describe_step(step: &StepType) -> String {
    match step {
        StepType::FirstParty(step) => format!("{step} (built-in)"),
        StepType::Extension(ext) => describe_extension(ext.factory().type_name(), ext.origin()),
    }
}

fn describe_paginator(paginator: &PaginatorType) -> String {
    match paginator {
        PaginatorType::FirstParty(paginator) => format!("{paginator} (built-in)"),
        PaginatorType::Extension(ext) => {
            describe_extension(ext.factory().type_name(), ext.origin())
        }
    }
}

fn describe_extension(type_name: &str, origin: Option<&Path>) -> String {
    match origin {
        Some(path) => format!("{type_name} ({})", path.display()),
        None => format!("{type_name} (linked)"),
    }
}
