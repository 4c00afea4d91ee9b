// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the shell and the store adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// An operation on the selected key, chosen by its single-letter code.
///
/// Parsing accepts the letter code or the full name, case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Operation {
    #[strum(to_string = "GET", serialize = "g")]
    Get,
    #[strum(to_string = "SET", serialize = "s")]
    Set,
    #[strum(to_string = "DELETE", serialize = "d")]
    Delete,
    #[strum(to_string = "TTL", serialize = "t")]
    Ttl,
    #[strum(to_string = "TYPE", serialize = "y")]
    Type,
    #[strum(to_string = "QUIT", serialize = "q")]
    Quit,
}

impl Operation {
    /// The letter typed at the operation prompt.
    pub fn code(self) -> char {
        match self {
            Operation::Get => 'g',
            Operation::Set => 's',
            Operation::Delete => 'd',
            Operation::Ttl => 't',
            Operation::Type => 'y',
            Operation::Quit => 'q',
        }
    }

    /// Menu line listing every operation, e.g. `g: GET, s: SET, ...`.
    pub fn menu() -> String {
        use strum::IntoEnumIterator;

        Operation::iter()
            .map(|op| format!("{}: {op}", op.code()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Remaining time to live of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key exists and has no expiry.
    NoExpiry,
    /// The key does not exist.
    Missing,
    /// Seconds until the key expires.
    Seconds(u64),
}

impl Ttl {
    /// Interpret the raw integer reply of the `TTL` command.
    pub fn from_reply(reply: i64) -> Self {
        match reply {
            -2 => Ttl::Missing,
            r if r < 0 => Ttl::NoExpiry,
            r => Ttl::Seconds(r as u64),
        }
    }
}
