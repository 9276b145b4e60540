// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Defaults are overlaid by the system file, the user file, `./ananas.toml`
//! and finally `ANANAS_*` environment variables. The `ananas` binary can
//! replace the three files with one explicit `--config` file.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::AnanasConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ananas/ananas.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ananas.toml";

/// Load the runner configuration from the standard file locations and the
/// environment.
///
/// Later layers win:
/// 1. Compiled defaults
/// 2. `/etc/ananas/ananas.toml`
/// 3. `<config dir>/ananas/ananas.toml`
/// 4. `./ananas.toml`
/// 5. `ANANAS_*` environment variables
pub fn load_config() -> Result<AnanasConfig, figment::Error> {
    build_figment().extract()
}

/// Parse configuration from a TOML string over the defaults. The environment
/// is not consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<AnanasConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnanasConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load an explicitly named configuration file, then apply `ANANAS_*`
/// overrides. The file must exist.
pub fn load_config_from_path(path: &Path) -> Result<AnanasConfig, figment::Error> {
    if !path.is_file() {
        return Err(figment::Error::from(format!(
            "configuration file {} does not exist",
            path.display()
        )));
    }
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(AnanasConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The layered figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AnanasConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ananas").join(LOCAL_CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Maps `ANANAS_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Keys such as `cache_loaded_types` contain underscores, so only the section
/// prefix is split off. Figment hands over the key in its original case.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("ANANAS_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    key.to_ascii_lowercase()
        .replacen("runner_", "runner.", 1)
        .replacen("extension_", "extension.", 1)
}
