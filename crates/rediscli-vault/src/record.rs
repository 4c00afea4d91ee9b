// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential record stored inside a vault.

use rediscli_core::VaultError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Connection parameters for one key-value store.
///
/// Serialized as JSON with the keys `host`, `port`, `password` and `tls`
/// (`useTLS` is accepted on read). Debug output redacts the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub host: String,
    pub port: u16,
    pub password: String,
    #[serde(rename = "tls", alias = "useTLS")]
    pub use_tls: bool,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"[REDACTED]")
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

impl CredentialRecord {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
        use_tls: bool,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            use_tls,
        }
    }

    /// JSON encoding of the record, zeroed when dropped.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::Crypto(format!("failed to serialize credential record: {e}")))
    }

    /// Parse decrypted vault plaintext.
    ///
    /// Anything other than UTF-8 JSON with all four fields and a port in
    /// 1..=65535 is a [`VaultError::Parse`].
    pub fn from_json(bytes: &[u8]) -> Result<Self, VaultError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| VaultError::Parse(format!("plaintext is not UTF-8: {e}")))?;
        let record: CredentialRecord =
            serde_json::from_str(text).map_err(|e| VaultError::Parse(e.to_string()))?;
        if record.port == 0 {
            return Err(VaultError::Parse("port must be between 1 and 65535".to_string()));
        }
        Ok(record)
    }

    /// One-line summary with the password masked, for display.
    pub fn summary(&self) -> String {
        format!(
            "{}:{} (password: {}, tls: {})",
            self.host,
            self.port,
            mask_secret(&self.password),
            if self.use_tls { "yes" } else { "no" }
        )
    }
}

/// Mask a secret for display: `"sk-a...mnop"`.
///
/// Shows up to 4 leading and 4 trailing characters. Values shorter than 10
/// characters are fully masked as `"****"`, the empty string as `"(none)"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return "(none)".to_string();
    }
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
