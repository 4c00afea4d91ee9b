// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{
    RediscliConfig, KDF_MAX_ITERATIONS, KDF_MAX_MEMORY_COST, KDF_MAX_PARALLELISM,
};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &RediscliConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.cli.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "cli.log_level `{}` is not one of {}",
            config.cli.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.vault.path.trim().is_empty() {
        fail("vault.path must not be empty".to_string());
    }

    let vault = &config.vault;
    if !(32768..=KDF_MAX_MEMORY_COST).contains(&vault.kdf_memory_cost) {
        fail(format!(
            "vault.kdf_memory_cost must be between 32768 (32 MiB) and {}, got {}",
            KDF_MAX_MEMORY_COST, vault.kdf_memory_cost
        ));
    }

    if !(2..=KDF_MAX_ITERATIONS).contains(&vault.kdf_iterations) {
        fail(format!(
            "vault.kdf_iterations must be between 2 and {KDF_MAX_ITERATIONS}, got {}",
            vault.kdf_iterations
        ));
    }

    if !(1..=KDF_MAX_PARALLELISM).contains(&vault.kdf_parallelism) {
        fail(format!(
            "vault.kdf_parallelism must be between 1 and {KDF_MAX_PARALLELISM}, got {}",
            vault.kdf_parallelism
        ));
    }

    if config.vault.max_unlock_attempts == Some(0) {
        fail("vault.max_unlock_attempts must be at least 1 when set".to_string());
    }

    if config.shell.database_count == 0 {
        fail("shell.database_count must be at least 1".to_string());
    }

    if config.shell.key_preview_limit == 0 {
        fail("shell.key_preview_limit must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
