// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault file envelope: version detection, sealing, and opening.
//!
//! ```text
//! v0 := base64( iv(16) || aes-256-cbc-pkcs7(json) )            key = sha256(passphrase)
//! v1 := "rediscli$1$" base64( header || nonce(12) || aes-256-gcm(json) || tag(16) )
//! header := salt(16) || memory_cost(u32 BE) || iterations(u32 BE) || parallelism(u32 BE)
//! ```
//!
//! The header is the GCM associated data, so edits to the salt or the cost
//! parameters fail authentication like any other corruption. `$` is outside
//! the base64 alphabet, which makes unmarked contents unambiguously v0.

use base64::{engine::general_purpose::STANDARD, Engine};
use rediscli_config::VaultFormat;
use rediscli_core::VaultError;
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN, TAG_LEN};
use crate::kdf::{self, KdfParams, SALT_LEN};
use crate::legacy;

/// Prefix of every versioned vault file.
pub const MARKER: &str = "rediscli$";

const HEADER_LEN: usize = SALT_LEN + 12;

/// Format version of a vault file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    V0,
    V1,
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatVersion::V0 => f.write_str("0 (SHA-256, AES-256-CBC)"),
            FormatVersion::V1 => f.write_str("1 (Argon2id, AES-256-GCM)"),
        }
    }
}

impl From<VaultFormat> for FormatVersion {
    fn from(format: VaultFormat) -> Self {
        match format {
            VaultFormat::V0 => FormatVersion::V0,
            VaultFormat::V1 => FormatVersion::V1,
        }
    }
}

/// What can be learned about a vault file without the passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeInfo {
    pub version: FormatVersion,
    /// Argon2id parameters; `None` for v0.
    pub kdf: Option<KdfParams>,
}

/// Determine the format version of raw file contents.
pub fn detect(contents: &str) -> Result<FormatVersion, VaultError> {
    let Some(rest) = contents.trim().strip_prefix(MARKER) else {
        return Ok(FormatVersion::V0);
    };
    let (version, _) = rest
        .split_once('$')
        .ok_or_else(|| VaultError::Decrypt("truncated version marker".to_string()))?;
    match version {
        "1" => Ok(FormatVersion::V1),
        other => Err(VaultError::UnsupportedVersion(other.to_string())),
    }
}

/// Encrypt `plaintext` into file contents of the given version.
pub fn seal(
    plaintext: &[u8],
    passphrase: &[u8],
    version: FormatVersion,
    params: &KdfParams,
) -> Result<String, VaultError> {
    match version {
        FormatVersion::V0 => legacy::encrypt(plaintext, &kdf::derive_legacy_key(passphrase)),
        FormatVersion::V1 => {
            let salt = kdf::generate_salt()?;
            let header = encode_header(&salt, params);
            let key = kdf::derive_key(passphrase, &salt, params)?;
            let (ciphertext, nonce) = crypto::seal(&key, &header, plaintext)?;

            let mut payload = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
            payload.extend_from_slice(&header);
            payload.extend_from_slice(&nonce);
            payload.extend_from_slice(&ciphertext);
            Ok(format!("{MARKER}1${}", STANDARD.encode(payload)))
        }
    }
}

/// Decrypt file contents of any supported version.
pub fn open(contents: &str, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    match detect(contents)? {
        FormatVersion::V0 => {
            let key = kdf::derive_legacy_key(passphrase);
            legacy::decrypt(contents, &key).map(Zeroizing::new)
        }
        FormatVersion::V1 => {
            let payload = decode_v1_payload(contents)?;
            let (salt, params) = decode_header(&payload)?;
            let (header, rest) = payload.split_at(HEADER_LEN);
            let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
            let nonce: [u8; NONCE_LEN] = nonce
                .try_into()
                .map_err(|_| VaultError::Decrypt("corrupted nonce".to_string()))?;

            let key = kdf::derive_key(passphrase, &salt, &params)?;
            crypto::open(&key, &nonce, header, ciphertext).map(Zeroizing::new)
        }
    }
}

/// Version and KDF parameters of file contents, without decrypting.
pub fn inspect(contents: &str) -> Result<EnvelopeInfo, VaultError> {
    match detect(contents)? {
        FormatVersion::V0 => Ok(EnvelopeInfo {
            version: FormatVersion::V0,
            kdf: None,
        }),
        FormatVersion::V1 => {
            let payload = decode_v1_payload(contents)?;
            let (_, params) = decode_header(&payload)?;
            Ok(EnvelopeInfo {
                version: FormatVersion::V1,
                kdf: Some(params),
            })
        }
    }
}

fn encode_header(salt: &[u8; SALT_LEN], params: &KdfParams) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..SALT_LEN].copy_from_slice(salt);
    header[SALT_LEN..SALT_LEN + 4].copy_from_slice(&params.memory_cost.to_be_bytes());
    header[SALT_LEN + 4..SALT_LEN + 8].copy_from_slice(&params.iterations.to_be_bytes());
    header[SALT_LEN + 8..].copy_from_slice(&params.parallelism.to_be_bytes());
    header
}

/// Base64 payload after the `rediscli$1$` marker, length-checked.
fn decode_v1_payload(contents: &str) -> Result<Vec<u8>, VaultError> {
    let encoded = contents
        .trim()
        .strip_prefix(MARKER)
        .and_then(|rest| rest.strip_prefix("1$"))
        .ok_or_else(|| VaultError::Decrypt("missing version 1 marker".to_string()))?;
    let payload = STANDARD
        .decode(encoded)
        .map_err(|e| VaultError::Decrypt(format!("vault payload is not valid base64: {e}")))?;

    let minimum = HEADER_LEN + NONCE_LEN + TAG_LEN;
    if payload.len() < minimum {
        return Err(VaultError::Decrypt(format!(
            "vault payload is {} bytes, expected at least {minimum}",
            payload.len()
        )));
    }
    Ok(payload)
}

fn decode_header(payload: &[u8]) -> Result<([u8; SALT_LEN], KdfParams), VaultError> {
    let word = |at: usize| -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&payload[at..at + 4]);
        u32::from_be_bytes(bytes)
    };

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&payload[..SALT_LEN]);
    let params = KdfParams {
        memory_cost: word(SALT_LEN),
        iterations: word(SALT_LEN + 4),
        parallelism: word(SALT_LEN + 8),
    };

    if !params.is_plausible() {
        return Err(VaultError::Decrypt(format!(
            "implausible key derivation parameters in header: {params:?}"
        )));
    }
    Ok((salt, params))
}
