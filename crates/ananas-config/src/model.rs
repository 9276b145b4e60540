// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ananas runner.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Ananas configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnanasConfig {
    /// Runner behavior settings.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Extension discovery and loading settings.
    #[serde(default)]
    pub extension: ExtensionConfig,
}

/// Runner behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Run pipelines in-process. Step resolution then adds the extension's
    /// own search path; distributed workers rely on pre-staged libraries.
    #[serde(default = "default_local")]
    pub local: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            local: default_local(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local() -> bool {
    true
}

/// Extension discovery and loading configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Directory holding one sub-directory per installed extension.
    #[serde(default = "default_extension_home")]
    pub home: String,

    /// Locations searched when a resolution has no descriptor-supplied path.
    #[serde(default)]
    pub ambient_classpath: Vec<String>,

    /// Cache loaded types keyed by class name and search path.
    #[serde(default = "default_cache_loaded_types")]
    pub cache_loaded_types: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            home: default_extension_home(),
            ambient_classpath: Vec::new(),
            cache_loaded_types: default_cache_loaded_types(),
        }
    }
}

impl ExtensionConfig {
    /// The extension home with a leading `~/` expanded.
    pub fn home_path(&self) -> PathBuf {
        expand_home(&self.home)
    }

    /// Ambient search-path entries with a leading `~/` expanded.
    pub fn ambient_paths(&self) -> Vec<PathBuf> {
        self.ambient_classpath.iter().map(|p| expand_home(p)).collect()
    }
}

fn default_extension_home() -> String {
    dirs::home_dir()
        .map(|p| p.join(".ananas").join("extensions"))
        .unwrap_or_else(|| PathBuf::from(".ananas/extensions"))
        .to_string_lossy()
        .into_owned()
}

fn default_cache_loaded_types() -> bool {
    true
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prefer_local_and_cache() {
        let config = AnanasConfig::default();
        assert!(config.runner.local);
        assert_eq!(config.runner.log_level, "info");
        assert!(config.extension.cache_loaded_types);
        assert!(config.extension.ambient_classpath.is_empty());
        assert!(config.extension.home.ends_with("extensions"));
    }

    #[test]
    fn tilde_is_expanded_against_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = ExtensionConfig {
            home: "~/plugins".to_string(),
            ambient_classpath: vec!["~/lib".to_string(), "/opt/ananas/lib".to_string()],
            cache_loaded_types: true,
        };
        assert_eq!(config.home_path(), home.join("plugins"));
        assert_eq!(
            config.ambient_paths(),
            vec![home.join("lib"), PathBuf::from("/opt/ananas/lib")]
        );
    }

    #[test]
    fn extension_section_denies_unknown_fields() {
        let toml_str = r#"
[extension]
home = "/srv/ext"
classpath = ["lib"]
"#;
        assert!(toml::from_str::<AnanasConfig>(toml_str).is_err());
    }
}
