// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store adapters for rediscli.
//!
//! [`RedisStore`] talks to a real server over the blocking `redis` client;
//! [`MemoryStore`] keeps everything in process for tests.

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::{connection_url, RedisStore};
