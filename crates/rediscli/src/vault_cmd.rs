// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rediscli vault` subcommands.

use std::io::Write;

use rediscli_config::RediscliConfig;
use rediscli_core::RediscliError;
use rediscli_vault::{FormatVersion, VaultFile, VaultState};
use secrecy::SecretString;

use crate::prompt::{ask, parse_yes_no, Prompter};
use crate::render::{Console, Tone};
use crate::setup;
use crate::unlock;

/// Shared context of the vault subcommands.
pub struct VaultCommand<'a, P: Prompter + ?Sized, W: Write> {
    pub config: &'a RediscliConfig,
    pub vault: VaultFile,
    pub env_passphrase: Option<SecretString>,
    pub prompter: &'a mut P,
    pub console: Console<W>,
}

impl<P: Prompter + ?Sized, W: Write> VaultCommand<'_, P, W> {
    /// Collect credentials and write a new vault, asking before overwriting.
    pub fn init(&mut self) -> Result<(), RediscliError> {
        if self.vault.state() == VaultState::Present
            && !self.confirm(&format!(
                "A vault already exists at {}. Overwrite? (y/n): ",
                self.vault.path().display()
            ))?
        {
            self.console.line(Tone::Notice, "Aborted.")?;
            return Ok(());
        }

        let console = &mut self.console;
        let mut report = |err: &RediscliError| console.line(Tone::Error, err.to_string());
        let Some(record) = setup::collect_credentials(&mut *self.prompter, &mut report)? else {
            return Ok(());
        };
        let Some(passphrase) = setup::choose_passphrase(
            &mut *self.prompter,
            self.env_passphrase.take(),
            &mut report,
        )?
        else {
            return Ok(());
        };

        self.vault.store(&record, &passphrase)?;
        self.console.line(
            Tone::Heading,
            format!(
                "Vault written to {} (format {}).",
                self.vault.path().display(),
                self.vault.write_format()
            ),
        )
    }

    /// Unlock and print the record with the password masked.
    pub fn show(&mut self) -> Result<(), RediscliError> {
        self.require_present()?;
        let Some(unlocked) = self.unlock()? else {
            return Ok(());
        };
        self.console.line(Tone::Item, unlocked.record.summary())
    }

    /// Path, state, format and KDF parameters. Needs no passphrase.
    pub fn status(&mut self) -> Result<(), RediscliError> {
        let path = self.vault.path().display().to_string();
        self.console.line(Tone::Plain, format!("path:         {path}"))?;

        if self.vault.state() == VaultState::Absent {
            self.console.line(Tone::Plain, "state:        absent")?;
            return self
                .console
                .line(Tone::Notice, "Run `rediscli vault init` to create it.");
        }

        let info = self.vault.inspect()?;
        self.console.line(Tone::Plain, "state:        present")?;
        self.console
            .line(Tone::Plain, format!("format:       {}", info.version))?;
        if let Some(kdf) = info.kdf {
            self.console.line(
                Tone::Plain,
                format!(
                    "kdf:          argon2id m={} KiB, t={}, p={}",
                    kdf.memory_cost, kdf.iterations, kdf.parallelism
                ),
            )?;
        }
        if info.version == FormatVersion::V0 {
            self.console.line(
                Tone::Notice,
                "This vault uses the legacy format. Run `rediscli vault rekey` to upgrade it.",
            )?;
        }
        Ok(())
    }

    /// Change the passphrase; also upgrades legacy files.
    pub fn rekey(&mut self) -> Result<(), RediscliError> {
        self.require_present()?;
        let Some(unlocked) = self.unlock()? else {
            return Ok(());
        };

        let console = &mut self.console;
        let Some(new_passphrase) = setup::choose_passphrase(
            &mut *self.prompter,
            None,
            &mut |err| console.line(Tone::Error, err.to_string()),
        )?
        else {
            return Ok(());
        };

        self.vault.rekey(&unlocked.passphrase, &new_passphrase)?;
        self.console.line(Tone::Heading, "Vault passphrase changed.")
    }

    /// Delete the vault file after confirmation.
    pub fn forget(&mut self) -> Result<(), RediscliError> {
        self.require_present()?;
        let question = format!("Delete vault file {}? (y/n): ", self.vault.path().display());
        if !self.confirm(&question)? {
            return self.console.line(Tone::Notice, "Aborted.");
        }
        self.vault.remove()?;
        self.console.line(Tone::Heading, "Vault deleted.")
    }

    fn require_present(&self) -> Result<(), RediscliError> {
        if self.vault.state() == VaultState::Absent {
            return Err(rediscli_core::VaultError::NotFound(self.vault.path().to_path_buf()).into());
        }
        Ok(())
    }

    fn unlock(&mut self) -> Result<Option<unlock::Unlocked>, RediscliError> {
        let console = &mut self.console;
        unlock::unlock(
            &self.vault,
            &mut *self.prompter,
            self.env_passphrase.take(),
            self.config.vault.max_unlock_attempts,
            &mut |_, _| console.line(Tone::Error, "Invalid passkey. Please try again."),
        )
    }

    fn confirm(&mut self, question: &str) -> Result<bool, RediscliError> {
        let console = &mut self.console;
        let answer = ask(&mut *self.prompter, question, parse_yes_no, &mut |err| {
            console.line(Tone::Error, err.to_string())
        })?;
        Ok(answer.unwrap_or(false))
    }
}
