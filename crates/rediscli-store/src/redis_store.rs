// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis implementation of the KeyValueStore trait, over the blocking `redis` client.

use std::time::Duration;

use redis::IntoConnectionInfo;
use tracing::debug;

use rediscli_core::{KeyValueStore, RediscliError, Ttl};

/// How long to wait for the TCP (and TLS) handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A blocking connection to a Redis server.
pub struct RedisStore {
    conn: redis::Connection,
    target: String,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("target", &self.target)
            .finish()
    }
}

impl RedisStore {
    /// Connect and authenticate. An empty `password` skips `AUTH`.
    pub fn connect(
        host: &str,
        port: u16,
        password: &str,
        use_tls: bool,
    ) -> Result<Self, RediscliError> {
        let target = connection_url(host, port, use_tls);
        let mut info = target
            .as_str()
            .into_connection_info()
            .map_err(|e| store_error(format!("invalid server address {target}"), e))?;
        if !password.is_empty() {
            info.redis.password = Some(password.to_string());
        }

        let client = redis::Client::open(info)
            .map_err(|e| store_error(format!("invalid server address {target}"), e))?;
        let mut conn = client
            .get_connection_with_timeout(CONNECT_TIMEOUT)
            .map_err(|e| store_error(format!("failed to connect to {target}"), e))?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| store_error(format!("{target} did not answer PING"), e))?;

        debug!(server = %target, "connected to redis");
        Ok(Self { conn, target })
    }

    fn query<T: redis::FromRedisValue>(
        &mut self,
        cmd: &mut redis::Cmd,
        what: &str,
    ) -> Result<T, RediscliError> {
        cmd.query(&mut self.conn)
            .map_err(|e| store_error(format!("{what} failed"), e))
    }
}

impl KeyValueStore for RedisStore {
    fn select(&mut self, index: u32) -> Result<(), RediscliError> {
        self.query(redis::cmd("SELECT").arg(index), "SELECT")
    }

    fn db_size(&mut self) -> Result<u64, RediscliError> {
        self.query(&mut redis::cmd("DBSIZE"), "DBSIZE")
    }

    fn keys(&mut self) -> Result<Vec<Vec<u8>>, RediscliError> {
        self.query(redis::cmd("KEYS").arg("*"), "KEYS")
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, RediscliError> {
        self.query(redis::cmd("GET").arg(key), "GET")
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), RediscliError> {
        self.query(redis::cmd("SET").arg(key).arg(value), "SET")
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool, RediscliError> {
        let removed: i64 = self.query(redis::cmd("DEL").arg(key), "DEL")?;
        Ok(removed > 0)
    }

    fn ttl(&mut self, key: &[u8]) -> Result<Ttl, RediscliError> {
        let reply: i64 = self.query(redis::cmd("TTL").arg(key), "TTL")?;
        Ok(Ttl::from_reply(reply))
    }

    fn key_type(&mut self, key: &[u8]) -> Result<String, RediscliError> {
        self.query(redis::cmd("TYPE").arg(key), "TYPE")
    }
}

/// `redis://host:port/`, or `rediss://` with TLS. IPv6 literals are bracketed.
pub fn connection_url(host: &str, port: u16, use_tls: bool) -> String {
    let scheme = if use_tls { "rediss" } else { "redis" };
    if host.contains(':') && !host.starts_with('[') {
        format!("{scheme}://[{host}]:{port}/")
    } else {
        format!("{scheme}://{host}:{port}/")
    }
}

fn store_error(message: String, source: redis::RedisError) -> RediscliError {
    RediscliError::Store {
        message: format!("{message}: {source}"),
        source: Some(Box::new(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_url() {
        assert_eq!(connection_url("localhost", 6379, false), "redis://localhost:6379/");
    }

    #[test]
    fn tls_url() {
        assert_eq!(
            connection_url("cache.example.com", 6380, true),
            "rediss://cache.example.com:6380/"
        );
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        assert_eq!(connection_url("::1", 6379, false), "redis://[::1]:6379/");
        assert_eq!(connection_url("[::1]", 6379, false), "redis://[::1]:6379/");
    }

    #[test]
    fn urls_parse_as_connection_info() {
        let info = connection_url("localhost", 6379, false)
            .as_str()
            .into_connection_info()
            .unwrap();
        assert_eq!(info.redis.db, 0);
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn connection_refused_is_a_store_error() {
        // Port 1 on loopback is closed on any sane test host.
        let err = RedisStore::connect("127.0.0.1", 1, "", false).unwrap_err();
        match err {
            RediscliError::Store { message, source } => {
                assert!(message.contains("127.0.0.1:1"));
                assert!(source.is_some());
            }
            other => panic!("expected a store error, got {other:?}"),
        }
    }
}
