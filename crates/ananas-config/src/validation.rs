// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::AnanasConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &AnanasConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.runner.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "runner.log_level `{}` is not one of: {}",
                config.runner.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.extension.home.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "extension.home must not be empty".to_string(),
        });
    }

    for (i, entry) in config.extension.ambient_classpath.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("extension.ambient_classpath[{i}] must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
