// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open and system randomness.
//!
//! Every call to [`seal`] draws a fresh 96-bit nonce from the system CSPRNG.

use rediscli_core::VaultError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

/// GCM nonce length.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Fill an `N`-byte array from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], VaultError> {
    let mut out = [0u8; N];
    SystemRandom::new()
        .fill(&mut out)
        .map_err(|_| VaultError::Crypto("system random number generator failed".to_string()))?;
    Ok(out)
}

fn gcm_key(key: &[u8; 32]) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| VaultError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, authenticating `aad` alongside it.
///
/// Returns `(ciphertext_with_tag, nonce)`.
pub fn seal(
    key: &[u8; 32],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), VaultError> {
    let key = gcm_key(key)?;
    let nonce_bytes: [u8; NONCE_LEN] = random_bytes()?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::from(aad),
        &mut in_out,
    )
    .map_err(|_| VaultError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt and verify `ciphertext` (tag appended) against `aad`.
///
/// A wrong key, a modified byte anywhere, or mismatched `aad` all fail with
/// [`VaultError::Decrypt`].
pub fn open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, VaultError> {
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::Decrypt(
            "ciphertext shorter than authentication tag".to_string(),
        ));
    }

    let key = gcm_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(*nonce), Aad::from(aad), &mut in_out)
        .map_err(|_| {
            VaultError::Decrypt(
                "authentication failed: wrong passphrase or corrupted data".to_string(),
            )
        })?;

    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key: [u8; 32] = random_bytes().unwrap();
        let (ciphertext, nonce) = seal(&key, b"header", b"credential json").unwrap();
        let plaintext = open(&key, &nonce, b"header", &ciphertext).unwrap();
        assert_eq!(plaintext, b"credential json");
    }

    #[test]
    fn seal_uses_fresh_nonces() {
        let key: [u8; 32] = random_bytes().unwrap();
        let (ct1, nonce1) = seal(&key, b"", b"same input twice").unwrap();
        let (ct2, nonce2) = seal(&key, b"", b"same input twice").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn ciphertext_carries_tag() {
        let key: [u8; 32] = random_bytes().unwrap();
        let (ciphertext, _) = seal(&key, b"", b"hello").unwrap();
        assert_eq!(ciphertext.len(), 5 + TAG_LEN);
    }

    #[test]
    fn wrong_key_fails() {
        let key1: [u8; 32] = random_bytes().unwrap();
        let key2: [u8; 32] = random_bytes().unwrap();
        let (ciphertext, nonce) = seal(&key1, b"", b"secret").unwrap();
        let err = open(&key2, &nonce, b"", &ciphertext).unwrap_err();
        assert!(matches!(err, VaultError::Decrypt(_)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key: [u8; 32] = random_bytes().unwrap();
        let (mut ciphertext, nonce) = seal(&key, b"", b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&key, &nonce, b"", &ciphertext).is_err());
    }

    #[test]
    fn mismatched_aad_fails() {
        let key: [u8; 32] = random_bytes().unwrap();
        let (ciphertext, nonce) = seal(&key, b"header-a", b"payload").unwrap();
        assert!(open(&key, &nonce, b"header-b", &ciphertext).is_err());
    }

    #[test]
    fn short_ciphertext_is_a_decrypt_error() {
        let key = [0u8; 32];
        let err = open(&key, &[0u8; NONCE_LEN], b"", &[0u8; 5]).unwrap_err();
        assert!(matches!(err, VaultError::Decrypt(_)));
    }
}
