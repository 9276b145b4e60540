// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner configuration: where extensions are installed, which locations the
//! loader searches when an extension brings none of its own, and whether
//! loaded types are cached.
//!
//! Unknown keys are rejected. Errors come back as [`ConfigError`]
//! diagnostics that point into the offending file.
//!
//! ```no_run
//! use ananas_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Extension home: {}", config.extension.home);
//! ```

use std::path::{Path, PathBuf};

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::AnanasConfig;

/// Load the layered configuration and validate it.
pub fn load_and_validate() -> Result<AnanasConfig, Vec<ConfigError>> {
    finish(loader::load_config(), &layered_sources())
}

/// Load an explicit `--config` file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<AnanasConfig, Vec<ConfigError>> {
    let sources: Vec<(String, String)> = std::fs::read_to_string(path)
        .map(|content| vec![(path.display().to_string(), content)])
        .unwrap_or_default();
    finish(loader::load_config_from_path(path), &sources)
}

/// Parse and validate inline TOML.
pub fn load_and_validate_str(toml_content: &str) -> Result<AnanasConfig, Vec<ConfigError>> {
    let sources = vec![("<inline>".to_string(), toml_content.to_string())];
    finish(loader::load_config_from_str(toml_content), &sources)
}

/// Validate an extracted config, or turn the extraction error into
/// diagnostics spanned against `sources`.
fn finish(
    loaded: Result<AnanasConfig, figment::Error>,
    sources: &[(String, String)],
) -> Result<AnanasConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, sources)),
    }
}

/// `(path, content)` of every layered config file that exists.
fn layered_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_FILE));
    let user = dirs::config_dir().map(|d| d.join("ananas").join(loader::LOCAL_CONFIG_FILE));

    [Some(local), user, Some(PathBuf::from(loader::SYSTEM_CONFIG_PATH))]
        .into_iter()
        .flatten()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
