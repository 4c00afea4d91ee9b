// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order, later entries overriding earlier ones: compiled defaults,
//! `/etc/rediscli/rediscli.toml`, `$XDG_CONFIG_HOME/rediscli/rediscli.toml`,
//! `./rediscli.toml`, then `REDISCLI_*` environment variables.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RediscliConfig;

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "rediscli.toml";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "REDISCLI_";

/// System-wide configuration file.
pub fn system_config_path() -> PathBuf {
    Path::new("/etc/rediscli").join(CONFIG_FILE_NAME)
}

/// Per-user configuration file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rediscli").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<RediscliConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<RediscliConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RediscliConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
///
/// Unlike the hierarchy lookup, a missing file here is an error.
pub fn load_config_from_path(path: &Path) -> Result<RediscliConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RediscliConfig::default()))
        .merge(Toml::file_exact(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(RediscliConfig::default()))
        .merge(Toml::file(system_config_path()));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Environment provider mapping `REDISCLI_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `REDISCLI_VAULT_KDF_MEMORY_COST` maps to `vault.kdf_memory_cost`.
/// `REDISCLI_VAULT_KEY` carries the vault passphrase and is never config.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["vault_key"])
        .map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ["cli", "vault", "shell"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
