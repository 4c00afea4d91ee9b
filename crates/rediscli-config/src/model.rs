// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for rediscli.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level rediscli configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RediscliConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub cli: CliConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// On-disk format written by `store`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultFormat {
    /// Unversioned SHA-256 + AES-256-CBC blob, readable by older releases.
    V0,
    /// Versioned Argon2id + AES-256-GCM envelope.
    #[default]
    V1,
}

/// Largest Argon2id memory cost (KiB) a vault may be written or read with.
pub const KDF_MAX_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Largest Argon2id iteration count a vault may be written or read with.
pub const KDF_MAX_ITERATIONS: u32 = 64;

/// Largest Argon2id lane count a vault may be written or read with.
pub const KDF_MAX_PARALLELISM: u32 = 64;

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Path of the vault file, relative to the working directory unless absolute.
    #[serde(default = "default_vault_path")]
    pub path: String,

    /// Format used when writing the vault. Reading always accepts both.
    #[serde(default)]
    pub format: VaultFormat,

    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,

    /// Passphrase attempts before giving up. Unset means keep asking.
    #[serde(default)]
    pub max_unlock_attempts: Option<u32>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
            format: VaultFormat::default(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
            max_unlock_attempts: None,
        }
    }
}

fn default_vault_path() -> String {
    ".rediscli".to_string()
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Number of logical databases scanned for keys (Redis ships with 16).
    #[serde(default = "default_database_count")]
    pub database_count: u32,

    /// Keys shown per database in the overview before `...`.
    #[serde(default = "default_key_preview_limit")]
    pub key_preview_limit: usize,

    /// Colored output. Also disabled by the `NO_COLOR` environment variable.
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            database_count: default_database_count(),
            key_preview_limit: default_key_preview_limit(),
            color: default_color(),
        }
    }
}

fn default_database_count() -> u32 {
    16
}

fn default_key_preview_limit() -> usize {
    5
}

fn default_color() -> bool {
    true
}
