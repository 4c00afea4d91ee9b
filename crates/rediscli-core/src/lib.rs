// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for rediscli.
//!
//! Holds the error taxonomy shared by the vault, the store adapters and the
//! interactive shell, the small value types passed between them, and the
//! [`KeyValueStore`] trait that separates the shell from the store client.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{RediscliError, VaultError};
pub use traits::KeyValueStore;
pub use types::{Operation, Ttl};
