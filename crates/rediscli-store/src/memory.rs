// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory KeyValueStore for deterministic testing.
//!
//! `MemoryStore` mimics the Redis replies the shell depends on: numbered
//! databases, `WRONGTYPE` errors for non-string values, and the `-1`/`-2`
//! TTL conventions. Nothing expires; TTLs are fixed at insertion.

use std::collections::BTreeMap;

use rediscli_core::{KeyValueStore, RediscliError, Ttl};

/// Number of databases a Redis server has by default.
pub const DEFAULT_DATABASES: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    String(Vec<u8>),
    /// A non-string value; only its type name is modelled.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: Value,
    ttl: Option<u64>,
}

/// A store holding every database in process memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    databases: Vec<BTreeMap<Vec<u8>, Entry>>,
    selected: usize,
}

impl MemoryStore {
    /// An empty store with [`DEFAULT_DATABASES`] databases.
    pub fn new() -> Self {
        Self::with_databases(DEFAULT_DATABASES)
    }

    /// An empty store with `count` databases.
    pub fn with_databases(count: u32) -> Self {
        Self {
            databases: vec![BTreeMap::new(); count as usize],
            selected: 0,
        }
    }

    /// Add a string value to database `db`. Panics if `db` is out of range.
    pub fn insert(
        &mut self,
        db: u32,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.put(db, key.into(), Value::String(value.into()), None)
    }

    /// Add a string value that reports `seconds` as its TTL.
    pub fn insert_with_ttl(
        &mut self,
        db: u32,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        seconds: u64,
    ) -> &mut Self {
        self.put(db, key.into(), Value::String(value.into()), Some(seconds))
    }

    /// Add a non-string value such as a `list` or `hash`.
    pub fn insert_typed(&mut self, db: u32, key: impl Into<Vec<u8>>, type_name: &str) -> &mut Self {
        self.put(db, key.into(), Value::Other(type_name.to_string()), None)
    }

    /// String value of `key` in database `db`, bypassing the selection.
    pub fn peek(&self, db: u32, key: &[u8]) -> Option<&[u8]> {
        match self.databases.get(db as usize)?.get(key)?.value {
            Value::String(ref bytes) => Some(bytes.as_slice()),
            Value::Other(_) => None,
        }
    }

    /// Index of the selected database.
    pub fn selected(&self) -> u32 {
        self.selected as u32
    }

    fn put(&mut self, db: u32, key: Vec<u8>, value: Value, ttl: Option<u64>) -> &mut Self {
        self.databases[db as usize].insert(key, Entry { value, ttl });
        self
    }

    fn current(&mut self) -> &mut BTreeMap<Vec<u8>, Entry> {
        &mut self.databases[self.selected]
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn select(&mut self, index: u32) -> Result<(), RediscliError> {
        if index as usize >= self.databases.len() {
            return Err(RediscliError::Store {
                message: "ERR DB index is out of range".to_string(),
                source: None,
            });
        }
        self.selected = index as usize;
        Ok(())
    }

    fn db_size(&mut self) -> Result<u64, RediscliError> {
        Ok(self.current().len() as u64)
    }

    fn keys(&mut self) -> Result<Vec<Vec<u8>>, RediscliError> {
        Ok(self.current().keys().cloned().collect())
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, RediscliError> {
        match self.current().get(key) {
            None => Ok(None),
            Some(Entry {
                value: Value::String(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(RediscliError::Store {
                message: "WRONGTYPE Operation against a key holding the wrong kind of value"
                    .to_string(),
                source: None,
            }),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), RediscliError> {
        // SET replaces any value and clears its TTL.
        self.current().insert(
            key.to_vec(),
            Entry {
                value: Value::String(value.to_vec()),
                ttl: None,
            },
        );
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool, RediscliError> {
        Ok(self.current().remove(key).is_some())
    }

    fn ttl(&mut self, key: &[u8]) -> Result<Ttl, RediscliError> {
        Ok(match self.current().get(key) {
            None => Ttl::Missing,
            Some(Entry { ttl: None, .. }) => Ttl::NoExpiry,
            Some(Entry {
                ttl: Some(seconds), ..
            }) => Ttl::Seconds(*seconds),
        })
    }

    fn key_type(&mut self, key: &[u8]) -> Result<String, RediscliError> {
        Ok(match self.current().get(key) {
            None => "none".to_string(),
            Some(Entry {
                value: Value::String(_),
                ..
            }) => "string".to_string(),
            Some(Entry {
                value: Value::Other(name),
                ..
            }) => name.clone(),
        })
    }
}
