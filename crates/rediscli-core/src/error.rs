// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rediscli.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the credential vault.
///
/// [`VaultError::Decrypt`] and [`VaultError::Parse`] both mean "wrong
/// passphrase or corrupted vault" and are the only variants the unlock loop
/// retries. Everything else is fatal for the current operation.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Base64, length, padding or authentication tag failure during decryption.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// Decryption produced bytes that are not a valid credential record.
    #[error("vault contents are not a valid credential record: {0}")]
    Parse(String),

    /// The vault file could not be read, written, or renamed into place.
    #[error("vault file {} could not be accessed: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `load` was called while no vault file exists.
    #[error("no vault file at {}", .0.display())]
    NotFound(PathBuf),

    /// The file carries a version marker this build does not understand.
    #[error("unsupported vault format version {0}")]
    UnsupportedVersion(String),

    /// Key derivation rejected its parameters.
    #[error("key derivation failed: {0}")]
    Kdf(String),

    /// Random number generation or cipher setup failed.
    #[error("cryptographic failure: {0}")]
    Crypto(String),
}

impl VaultError {
    /// Whether re-prompting for the passphrase could fix this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaultError::Decrypt(_) | VaultError::Parse(_))
    }
}

/// The application-level error type used by the shell, the store adapters,
/// and the binary.
#[derive(Debug, Error)]
pub enum RediscliError {
    /// Configuration errors that survive loading (bad values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Vault failures.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Malformed user input, e.g. a non-numeric port.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Key-value store failures (connection refused, protocol errors, auth).
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The interactive prompt could not read input.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
