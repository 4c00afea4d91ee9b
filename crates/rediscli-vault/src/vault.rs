// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault file lifecycle: store, load, inspect, rekey, and remove.
//!
//! A vault is a single file holding one encrypted [`CredentialRecord`]. The
//! file is either absent or present; a present file is always complete,
//! because every write goes through a temporary file in the same directory
//! that is synced and then renamed over the target.

use std::io::Write;
use std::path::{Path, PathBuf};

use rediscli_config::VaultConfig;
use rediscli_core::VaultError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::envelope::{self, EnvelopeInfo, FormatVersion};
use crate::kdf::KdfParams;
use crate::record::CredentialRecord;

/// Whether a vault file exists at the configured path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Absent,
    Present,
}

/// Handle to a vault file on disk. Holds no key material.
#[derive(Debug, Clone)]
pub struct VaultFile {
    path: PathBuf,
    format: FormatVersion,
    kdf: KdfParams,
}

impl VaultFile {
    /// A vault at `path` that writes with the format and cost parameters
    /// from `config`.
    pub fn new(path: impl Into<PathBuf>, config: &VaultConfig) -> Self {
        Self {
            path: path.into(),
            format: config.format.into(),
            kdf: KdfParams::from_config(config),
        }
    }

    /// A vault at `config.path`.
    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(&config.path, config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format version used by [`VaultFile::store`].
    pub fn write_format(&self) -> FormatVersion {
        self.format
    }

    pub fn state(&self) -> VaultState {
        if self.path.is_file() {
            VaultState::Present
        } else {
            VaultState::Absent
        }
    }

    /// Encrypt `record` under `passphrase` and replace the file contents.
    pub fn store(
        &self,
        record: &CredentialRecord,
        passphrase: &SecretString,
    ) -> Result<(), VaultError> {
        self.store_as(record, passphrase, self.format)
    }

    /// Decrypt the file with `passphrase` and parse the record.
    ///
    /// [`VaultError::Decrypt`] and [`VaultError::Parse`] mean the passphrase
    /// is wrong or the file is corrupted; the caller may ask again.
    pub fn load(&self, passphrase: &SecretString) -> Result<CredentialRecord, VaultError> {
        let contents = self.read()?;
        let version = envelope::detect(&contents)?;
        debug!(path = %self.path.display(), version = ?version, "decrypting vault");

        let plaintext = envelope::open(&contents, passphrase.expose_secret().as_bytes())?;
        let record = CredentialRecord::from_json(&plaintext)?;
        debug!(path = %self.path.display(), "vault unlocked");
        Ok(record)
    }

    /// Format version and KDF parameters of the file, no passphrase needed.
    pub fn inspect(&self) -> Result<EnvelopeInfo, VaultError> {
        envelope::inspect(&self.read()?)
    }

    /// Re-encrypt the stored record under a new passphrase.
    ///
    /// Always writes format version 1, so this also upgrades legacy files.
    pub fn rekey(&self, old: &SecretString, new: &SecretString) -> Result<(), VaultError> {
        let record = self.load(old)?;
        self.store_as(&record, new, FormatVersion::V1)?;
        info!(path = %self.path.display(), "vault passphrase changed");
        Ok(())
    }

    /// Delete the vault file. Returns `false` if there was nothing to delete.
    pub fn remove(&self) -> Result<bool, VaultError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "vault removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn store_as(
        &self,
        record: &CredentialRecord,
        passphrase: &SecretString,
        format: FormatVersion,
    ) -> Result<(), VaultError> {
        // A header outside these bounds is rejected on read, so never write one.
        if format == FormatVersion::V1 && !self.kdf.is_plausible() {
            return Err(VaultError::Kdf(format!(
                "refusing to write a vault with out-of-range parameters {:?}",
                self.kdf
            )));
        }
        let plaintext = record.to_json()?;
        let contents = envelope::seal(
            &plaintext,
            passphrase.expose_secret().as_bytes(),
            format,
            &self.kdf,
        )?;
        self.write_atomic(contents.as_bytes())?;
        info!(path = %self.path.display(), version = ?format, "vault stored");
        Ok(())
    }

    fn read(&self) -> Result<String, VaultError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(self.io_error(e)),
        };
        // Vault files are ASCII; anything else is corruption, not an I/O fault.
        String::from_utf8(bytes)
            .map_err(|_| VaultError::Decrypt("vault file is not valid text".to_string()))
    }

    fn write_atomic(&self, contents: &[u8]) -> Result<(), VaultError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(contents).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        debug!(path = %self.path.display(), bytes = contents.len(), "vault file written");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> VaultError {
        VaultError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rediscli_config::VaultFormat;

    fn test_config(format: VaultFormat) -> VaultConfig {
        VaultConfig {
            format,
            kdf_memory_cost: 1024,
            kdf_iterations: 1,
            kdf_parallelism: 1,
            ..VaultConfig::default()
        }
    }

    fn vault_in(dir: &tempfile::TempDir, format: VaultFormat) -> VaultFile {
        VaultFile::new(dir.path().join(".rediscli"), &test_config(format))
    }

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn local_record() -> CredentialRecord {
        CredentialRecord::new("localhost", 6379, "", false)
    }

    #[test]
    fn state_follows_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        assert_eq!(vault.state(), VaultState::Absent);

        vault.store(&local_record(), &pass("correct")).unwrap();
        assert_eq!(vault.state(), VaultState::Present);

        assert!(vault.remove().unwrap());
        assert_eq!(vault.state(), VaultState::Absent);
        assert!(!vault.remove().unwrap());
    }

    #[test]
    fn load_when_absent_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        let err = vault.load(&pass("x")).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn correct_and_wrong_passphrase_scenario() {
        for format in [VaultFormat::V0, VaultFormat::V1] {
            let dir = tempfile::tempdir().unwrap();
            let vault = vault_in(&dir, format);
            vault.store(&local_record(), &pass("correct")).unwrap();

            assert_eq!(vault.load(&pass("correct")).unwrap(), local_record());
            let err = vault.load(&pass("wrong")).unwrap_err();
            assert!(err.is_retryable(), "{format:?}: {err}");
        }
    }

    #[test]
    fn two_stores_of_the_same_record_differ() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V0);
        vault.store(&local_record(), &pass("correct")).unwrap();
        let first = std::fs::read_to_string(vault.path()).unwrap();
        vault.store(&local_record(), &pass("correct")).unwrap();
        let second = std::fs::read_to_string(vault.path()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn overwrite_leaves_only_the_second_record() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        let second = CredentialRecord::new("cache.internal", 6380, "s3cret", true);
        vault.store(&local_record(), &pass("one")).unwrap();
        vault.store(&second, &pass("two")).unwrap();

        assert_eq!(vault.load(&pass("two")).unwrap(), second);
        assert!(vault.load(&pass("one")).is_err());
    }

    #[test]
    fn short_file_is_a_decrypt_error() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V0);
        // "AAAAAAAAAAAA" decodes to 9 bytes.
        std::fs::write(vault.path(), "AAAAAAAAAAAA").unwrap();
        let err = vault.load(&pass("correct")).unwrap_err();
        assert!(matches!(err, VaultError::Decrypt(_)));
    }

    #[test]
    fn flipped_byte_in_current_format_is_a_decrypt_error() {
        use base64::{engine::general_purpose::STANDARD, Engine};

        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        vault.store(&local_record(), &pass("correct")).unwrap();

        let contents = std::fs::read_to_string(vault.path()).unwrap();
        let encoded = contents.strip_prefix("rediscli$1$").unwrap();
        let mut payload = STANDARD.decode(encoded).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        std::fs::write(
            vault.path(),
            format!("rediscli$1${}", STANDARD.encode(&payload)),
        )
        .unwrap();

        let err = vault.load(&pass("correct")).unwrap_err();
        assert!(matches!(err, VaultError::Decrypt(_)));
    }

    #[test]
    fn binary_garbage_is_a_decrypt_error() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        std::fs::write(vault.path(), [0xffu8, 0x00, 0x80]).unwrap();
        let err = vault.load(&pass("x")).unwrap_err();
        assert!(matches!(err, VaultError::Decrypt(_)));
    }

    #[test]
    fn unknown_version_is_not_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        std::fs::write(vault.path(), "rediscli$2$AAAA").unwrap();
        let err = vault.load(&pass("x")).unwrap_err();
        assert!(matches!(err, VaultError::UnsupportedVersion(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn rekey_upgrades_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = vault_in(&dir, VaultFormat::V0);
        legacy.store(&local_record(), &pass("old")).unwrap();
        assert_eq!(legacy.inspect().unwrap().version, FormatVersion::V0);

        legacy.rekey(&pass("old"), &pass("new")).unwrap();
        let info = legacy.inspect().unwrap();
        assert_eq!(info.version, FormatVersion::V1);
        assert_eq!(info.kdf.map(|k| k.memory_cost), Some(1024));
        assert_eq!(legacy.load(&pass("new")).unwrap(), local_record());
        assert!(legacy.load(&pass("old")).is_err());
    }

    #[test]
    fn rekey_with_wrong_old_passphrase_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        vault.store(&local_record(), &pass("old")).unwrap();
        let before = std::fs::read_to_string(vault.path()).unwrap();

        assert!(vault.rekey(&pass("nope"), &pass("new")).is_err());
        assert_eq!(std::fs::read_to_string(vault.path()).unwrap(), before);
    }

    #[test]
    fn out_of_range_kdf_parameters_are_refused_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".rediscli");
        vault_in(&dir, VaultFormat::V1)
            .store(&local_record(), &pass("correct"))
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let config = VaultConfig {
            kdf_iterations: rediscli_config::KDF_MAX_ITERATIONS + 1,
            ..test_config(VaultFormat::V1)
        };
        let vault = VaultFile::new(&path, &config);
        let err = vault.store(&local_record(), &pass("correct")).unwrap_err();
        assert!(matches!(err, VaultError::Kdf(_)));
        assert!(!err.is_retryable());
        assert_eq!(std::fs::read(&path).unwrap(), before);

        let err = vault.rekey(&pass("correct"), &pass("other")).unwrap_err();
        assert!(matches!(err, VaultError::Kdf(_)));
        assert_eq!(std::fs::read(&path).unwrap(), before);

        // The legacy format has no KDF header, so the bounds do not apply.
        let legacy = VaultFile::new(
            &path,
            &VaultConfig {
                format: VaultFormat::V0,
                ..config
            },
        );
        legacy.store(&local_record(), &pass("correct")).unwrap();
        assert_eq!(legacy.load(&pass("correct")).unwrap(), local_record());
    }

    #[test]
    fn store_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let vault = VaultFile::new(
            dir.path().join("missing").join(".rediscli"),
            &test_config(VaultFormat::V1),
        );
        let err = vault.store(&local_record(), &pass("x")).unwrap_err();
        assert!(matches!(err, VaultError::Io { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn no_temporary_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        vault.store(&local_record(), &pass("x")).unwrap();
        vault.store(&local_record(), &pass("y")).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let vault = vault_in(&dir, VaultFormat::V1);
        vault.store(&local_record(), &pass("x")).unwrap();
        let mode = std::fs::metadata(vault.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
