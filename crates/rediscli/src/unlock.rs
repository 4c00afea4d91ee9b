// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase retry loop for opening an existing vault.

use rediscli_core::{RediscliError, VaultError};
use rediscli_vault::{CredentialRecord, VaultFile};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::prompt::Prompter;

pub const PASSPHRASE_PROMPT: &str = "Enter your passkey: ";

/// A successfully opened vault and the passphrase that opened it.
pub struct Unlocked {
    pub record: CredentialRecord,
    pub passphrase: SecretString,
}

/// Load `vault`, asking for the passphrase until it works.
///
/// Only [`VaultError::is_retryable`] failures lead to another prompt, and at
/// most `max_attempts` times when set; I/O and format errors return at once.
/// A passphrase from the environment is tried exactly once. `Ok(None)` means
/// the user ended input.
pub fn unlock<P: Prompter + ?Sized>(
    vault: &VaultFile,
    prompter: &mut P,
    env_passphrase: Option<SecretString>,
    max_attempts: Option<u32>,
    on_failure: &mut dyn FnMut(u32, &VaultError) -> Result<(), RediscliError>,
) -> Result<Option<Unlocked>, RediscliError> {
    if let Some(passphrase) = env_passphrase {
        let record = vault.load(&passphrase)?;
        info!("vault unlocked with passphrase from environment");
        return Ok(Some(Unlocked { record, passphrase }));
    }

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let Some(passphrase) = prompter.read_secret(PASSPHRASE_PROMPT)? else {
            return Ok(None);
        };

        match vault.load(&passphrase) {
            Ok(record) => {
                info!(attempt, "vault unlocked");
                return Ok(Some(Unlocked { record, passphrase }));
            }
            Err(err) if err.is_retryable() => {
                warn!(attempt, error = %err, "vault unlock failed");
                if max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(err.into());
                }
                on_failure(attempt, &err)?;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
