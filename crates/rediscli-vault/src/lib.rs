// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-encrypted credential vault for rediscli.
//!
//! A vault is one file holding one [`CredentialRecord`]. New files use an
//! Argon2id-derived key with AES-256-GCM inside a versioned envelope; the
//! unversioned SHA-256/AES-256-CBC files written by earlier releases are still
//! read, and [`VaultFile::rekey`] upgrades them.

pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod legacy;
pub mod prompt;
pub mod record;
pub mod vault;

pub use envelope::{EnvelopeInfo, FormatVersion};
pub use kdf::KdfParams;
pub use prompt::passphrase_from_env;
pub use record::{mask_secret, CredentialRecord};
pub use vault::{VaultFile, VaultState};
