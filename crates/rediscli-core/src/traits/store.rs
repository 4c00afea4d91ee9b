// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait used by the interactive shell.

use crate::error::RediscliError;
use crate::types::Ttl;

/// A connection to a key-value store with numbered logical databases.
///
/// Calls are blocking. Keys and values are raw bytes; the shell decides how
/// to display them.
pub trait KeyValueStore {
    /// Switches the connection to database `index`.
    fn select(&mut self, index: u32) -> Result<(), RediscliError>;

    /// Number of keys in the selected database.
    fn db_size(&mut self) -> Result<u64, RediscliError>;

    /// All keys in the selected database.
    fn keys(&mut self) -> Result<Vec<Vec<u8>>, RediscliError>;

    /// Value stored at `key`, or `None` when the key does not exist.
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, RediscliError>;

    /// Stores `value` at `key`, replacing any previous value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), RediscliError>;

    /// Removes `key`. Returns whether it existed.
    fn delete(&mut self, key: &[u8]) -> Result<bool, RediscliError>;

    /// Remaining time to live of `key`.
    fn ttl(&mut self, key: &[u8]) -> Result<Ttl, RediscliError>;

    /// Type name of the value at `key` (`string`, `list`, ..., or `none`).
    fn key_type(&mut self, key: &[u8]) -> Result<String, RediscliError>;
}
