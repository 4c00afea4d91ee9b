// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive Redis client with an encrypted credential vault.
//!
//! The binary in `main.rs` only parses arguments, loads configuration and
//! dispatches here; everything interactive goes through [`prompt::Prompter`]
//! so it can be driven by a script in tests.

pub mod prompt;
pub mod render;
pub mod setup;
pub mod shell;
pub mod unlock;
pub mod vault_cmd;

pub use shell::{run_shell, Session, State};
