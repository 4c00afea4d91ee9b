// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for rediscli.
//!
//! TOML files in the usual system/user/local hierarchy plus `REDISCLI_*`
//! environment overrides, strict key checking (`deny_unknown_fields`), and
//! miette diagnostics with typo suggestions.
//!
//! ```no_run
//! let config = rediscli_config::load_and_validate(None).expect("config errors");
//! println!("vault file: {}", config.vault.path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    CliConfig, RediscliConfig, ShellConfig, VaultConfig, VaultFormat, KDF_MAX_ITERATIONS,
    KDF_MAX_MEMORY_COST, KDF_MAX_PARALLELISM,
};

/// Load and validate configuration.
///
/// With `explicit` set, only that file (plus env overrides) is read;
/// otherwise the standard hierarchy is used.
pub fn load_and_validate(explicit: Option<&Path>) -> Result<RediscliConfig, Vec<ConfigError>> {
    let loaded = match explicit {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };

    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(vault = %config.vault.path, "configuration loaded");
            Ok(config)
        }
        Err(err) => {
            let sources = collect_toml_sources(explicit);
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load and validate configuration from a TOML string.
pub fn load_and_validate_str(toml_content: &str) -> Result<RediscliConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Contents of every TOML file that may have contributed, for error spans.
fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut paths = vec![loader::system_config_path()];
            paths.extend(loader::user_config_path());
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd.join(loader::CONFIG_FILE_NAME));
            }
            paths
        }
    };

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
