// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format version 0: `base64(IV || AES-256-CBC-PKCS7(plaintext))`.
//!
//! There is no authentication tag. A wrong key is only noticed when the
//! PKCS#7 padding check fails (it passes by chance for roughly 1 in 256
//! keys) or when the plaintext later fails to parse as a record.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rediscli_core::VaultError;

use crate::crypto;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// IV length, one AES block.
pub const IV_LEN: usize = 16;

/// AES block size.
pub const BLOCK_LEN: usize = 16;

/// Encrypt `plaintext` under a fresh random IV and return the printable blob.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<String, VaultError> {
    let iv: [u8; IV_LEN] = crypto::random_bytes()?;
    let cipher = Aes256CbcEnc::new_from_slices(key, &iv)
        .map_err(|e| VaultError::Crypto(format!("failed to create AES-256-CBC cipher: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(blob))
}

/// Reverse [`encrypt`].
///
/// Fails with [`VaultError::Decrypt`] on invalid base64, a blob shorter than
/// the IV, a ciphertext that is empty or not a whole number of blocks, or
/// invalid padding.
pub fn decrypt(blob: &str, key: &[u8; 32]) -> Result<Vec<u8>, VaultError> {
    let decoded = STANDARD
        .decode(blob.trim())
        .map_err(|e| VaultError::Decrypt(format!("vault blob is not valid base64: {e}")))?;

    if decoded.len() < IV_LEN {
        return Err(VaultError::Decrypt(format!(
            "vault blob is {} bytes, shorter than the {IV_LEN}-byte IV",
            decoded.len()
        )));
    }

    let (iv, ciphertext) = decoded.split_at(IV_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(VaultError::Decrypt(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| VaultError::Crypto(format!("failed to create AES-256-CBC cipher: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            VaultError::Decrypt("invalid padding: wrong passphrase or corrupted data".to_string())
        })
}
