// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase to key derivation.
//!
//! Current vaults use Argon2id (Version::V0x13) with a random per-file salt
//! and the cost parameters stored next to the ciphertext. Legacy vaults used
//! a single unsalted SHA-256 pass, kept here only so those files stay
//! readable.

use rediscli_config::{
    VaultConfig, KDF_MAX_ITERATIONS, KDF_MAX_MEMORY_COST, KDF_MAX_PARALLELISM,
};
use rediscli_core::VaultError;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::crypto;

/// Length of every derived key (AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the Argon2id salt.
pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl KdfParams {
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }

    /// Whether these parameters are within the bounds a vault may be written
    /// or read with. A corrupted header must not make us allocate gigabytes
    /// or spin for minutes.
    pub fn is_plausible(&self) -> bool {
        (1..=KDF_MAX_MEMORY_COST).contains(&self.memory_cost)
            && (1..=KDF_MAX_ITERATIONS).contains(&self.iterations)
            && (1..=KDF_MAX_PARALLELISM).contains(&self.parallelism)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::from_config(&VaultConfig::default())
    }
}

/// Derive a 32-byte key from `passphrase` using Argon2id.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::Kdf(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| VaultError::Kdf(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Legacy derivation: one SHA-256 pass over the passphrase bytes.
///
/// Any input, including the empty passphrase, yields a key.
pub fn derive_legacy_key(passphrase: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut hasher = Sha256::new();
    hasher.update(passphrase);
    Zeroizing::new(hasher.finalize().into())
}

/// Random salt for a new vault.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    crypto::random_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const FAST: KdfParams = KdfParams {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn derive_key_produces_consistent_output() {
        let salt = [1u8; SALT_LEN];
        let key1 = derive_key(b"test passphrase", &salt, &FAST).unwrap();
        let key2 = derive_key(b"test passphrase", &salt, &FAST).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_passphrase_produces_different_key() {
        let salt = [2u8; SALT_LEN];
        let key1 = derive_key(b"passphrase one", &salt, &FAST).unwrap();
        let key2 = derive_key(b"passphrase two", &salt, &FAST).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_produces_different_key() {
        let key1 = derive_key(b"same passphrase", &[1u8; SALT_LEN], &FAST).unwrap();
        let key2 = derive_key(b"same passphrase", &[2u8; SALT_LEN], &FAST).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_cost_produces_different_key() {
        let salt = [3u8; SALT_LEN];
        let slower = KdfParams {
            iterations: 2,
            ..FAST
        };
        let key1 = derive_key(b"same", &salt, &FAST).unwrap();
        let key2 = derive_key(b"same", &salt, &slower).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn empty_passphrase_still_derives() {
        let key = derive_key(b"", &[0u8; SALT_LEN], &FAST).unwrap();
        assert_eq!(key.len(), KEY_LEN);
    }

    #[test]
    fn zero_parallelism_is_a_kdf_error() {
        let bad = KdfParams {
            parallelism: 0,
            ..FAST
        };
        let err = derive_key(b"x", &[0u8; SALT_LEN], &bad).unwrap_err();
        assert!(matches!(err, VaultError::Kdf(_)));
    }

    #[test]
    fn legacy_key_is_sha256_of_passphrase() {
        let key = derive_legacy_key(b"correct");
        assert_eq!(
            hex::encode(*key),
            "15a596e3c98c407e043751ff3b21ff0358a1bdfdf3fe948b1523893a8e5de2e8"
        );
    }

    #[test]
    fn legacy_key_accepts_empty_passphrase() {
        let key = derive_legacy_key(b"");
        assert_eq!(
            hex::encode(*key),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[test]
    fn plausibility_bounds() {
        assert!(KdfParams::default().is_plausible());
        assert!(FAST.is_plausible());
        assert!(!KdfParams {
            memory_cost: u32::MAX,
            ..FAST
        }
        .is_plausible());
        assert!(!KdfParams {
            iterations: 0,
            ..FAST
        }
        .is_plausible());
    }
}
