// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rediscli shell` command implementation.
//!
//! The session is a small state machine over a [`Session`] context:
//!
//! ```text
//! Unlock -> Connect -> SelectDatabase -> SelectKey -> Commands -> Done
//! ```
//!
//! `Unlock` either opens the existing vault or collects and stores new
//! credentials. End of input in any state moves straight to `Done`.

use std::io::Write;
use std::str::FromStr;

use rediscli_config::RediscliConfig;
use rediscli_core::{KeyValueStore, Operation, RediscliError, Ttl};
use rediscli_store::RedisStore;
use rediscli_vault::{CredentialRecord, VaultFile, VaultState};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::prompt::{ask, Prompter, TerminalPrompter};
use crate::render::{display_bytes, Console, Painter, Tone, BANNER};
use crate::setup;
use crate::unlock;

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unlock,
    Connect,
    SelectDatabase,
    SelectKey,
    Commands,
    Done,
}

/// Everything the interactive session needs, threaded through every state.
pub struct Session<'a, P, W, S, C>
where
    P: Prompter + ?Sized,
    W: Write,
    S: KeyValueStore,
    C: FnMut(&CredentialRecord) -> Result<S, RediscliError>,
{
    config: &'a RediscliConfig,
    vault: VaultFile,
    env_passphrase: Option<SecretString>,
    prompter: &'a mut P,
    console: Console<W>,
    connect: C,
    credentials: Option<CredentialRecord>,
    store: Option<S>,
    database: u32,
    key: Option<Vec<u8>>,
}

impl<'a, P, W, S, C> Session<'a, P, W, S, C>
where
    P: Prompter + ?Sized,
    W: Write,
    S: KeyValueStore,
    C: FnMut(&CredentialRecord) -> Result<S, RediscliError>,
{
    pub fn new(
        config: &'a RediscliConfig,
        vault: VaultFile,
        env_passphrase: Option<SecretString>,
        prompter: &'a mut P,
        console: Console<W>,
        connect: C,
    ) -> Self {
        Self {
            config,
            vault,
            env_passphrase,
            prompter,
            console,
            connect,
            credentials: None,
            store: None,
            database: 0,
            key: None,
        }
    }

    /// Drive the state machine from `Unlock` until `Done`.
    pub fn run(&mut self) -> Result<(), RediscliError> {
        self.console.line(Tone::Banner, BANNER)?;
        let mut state = State::Unlock;
        while state != State::Done {
            debug!(state = ?state, "shell state");
            state = self.step(state)?;
        }
        Ok(())
    }

    /// Run one state and return the next.
    pub fn step(&mut self, state: State) -> Result<State, RediscliError> {
        match state {
            State::Unlock => self.unlock(),
            State::Connect => self.connect(),
            State::SelectDatabase => self.select_database(),
            State::SelectKey => self.select_key(),
            State::Commands => self.commands(),
            State::Done => Ok(State::Done),
        }
    }

    /// The output written so far.
    pub fn into_console(self) -> Console<W> {
        self.console
    }

    fn unlock(&mut self) -> Result<State, RediscliError> {
        let env_passphrase = self.env_passphrase.take();
        match self.vault.state() {
            VaultState::Present => {
                let console = &mut self.console;
                let unlocked = unlock::unlock(
                    &self.vault,
                    &mut *self.prompter,
                    env_passphrase,
                    self.config.vault.max_unlock_attempts,
                    &mut |_, _| console.line(Tone::Error, "Invalid passkey. Please try again."),
                )?;
                let Some(unlocked) = unlocked else {
                    return Ok(State::Done);
                };
                self.console.outline(
                    Tone::Notice,
                    "Redis connection details have been read from file",
                )?;
                self.credentials = Some(unlocked.record);
            }
            VaultState::Absent => {
                self.console.outline(Tone::Notice, "Enter Redis server details")?;
                let console = &mut self.console;
                let mut report = |err: &RediscliError| console.line(Tone::Error, err.to_string());
                let Some(record) = setup::collect_credentials(&mut *self.prompter, &mut report)?
                else {
                    return Ok(State::Done);
                };
                let Some(passphrase) =
                    setup::choose_passphrase(&mut *self.prompter, env_passphrase, &mut report)?
                else {
                    return Ok(State::Done);
                };
                self.vault.store(&record, &passphrase)?;
                info!(path = %self.vault.path().display(), "credentials saved");
                self.credentials = Some(record);
            }
        }
        Ok(State::Connect)
    }

    fn connect(&mut self) -> Result<State, RediscliError> {
        let Some(record) = self.credentials.as_ref() else {
            return Err(RediscliError::Internal(
                "connect reached without credentials".to_string(),
            ));
        };
        self.console.line(Tone::Info, "Connecting to Redis server...")?;
        self.console.blank()?;
        self.store = Some((self.connect)(record)?);
        info!(host = %record.host, port = record.port, tls = record.use_tls, "connected");
        Ok(State::SelectDatabase)
    }

    fn store(&mut self) -> Result<&mut S, RediscliError> {
        self.store
            .as_mut()
            .ok_or_else(|| RediscliError::Internal("no store connection".to_string()))
    }

    fn select_database(&mut self) -> Result<State, RediscliError> {
        let count = self.config.shell.database_count;
        let limit = self.config.shell.key_preview_limit;

        let mut populated = Vec::new();
        for db in 0..count {
            let store = self.store()?;
            store.select(db)?;
            if store.db_size()? > 0 {
                populated.push((db, sorted_keys(store)?));
            }
        }

        if populated.is_empty() {
            self.console.line(Tone::Notice, "No populated databases.")?;
            return Ok(State::Done);
        }

        self.console.line(Tone::Heading, "Populated databases:")?;
        for (db, keys) in &populated {
            self.console.line(Tone::Subheading, format!("db#{db}:"))?;
            for key in keys.iter().take(limit) {
                self.console.line(Tone::Item, format!("   {}", display_bytes(key)))?;
            }
            if keys.len() > limit {
                self.console.line(Tone::Item, "   ...")?;
            }
        }

        self.console.blank()?;
        let console = &mut self.console;
        let Some(db) = ask(
            &mut *self.prompter,
            "Enter db index to select: ",
            |answer| parse_index(answer, count as usize).map(|i| i as u32),
            &mut |err| console.line(Tone::Error, err.to_string()),
        )?
        else {
            return Ok(State::Done);
        };

        self.store()?.select(db)?;
        self.database = db;
        debug!(db, "database selected");
        Ok(State::SelectKey)
    }

    fn select_key(&mut self) -> Result<State, RediscliError> {
        let keys = sorted_keys(self.store()?)?;
        if keys.is_empty() {
            self.console
                .line(Tone::Notice, format!("db#{} has no keys.", self.database))?;
            return Ok(State::SelectDatabase);
        }

        self.console.blank()?;
        self.console.line(Tone::Subheading, "Keys and their values:")?;
        for (i, key) in keys.iter().enumerate() {
            let value = describe_value(self.store()?, key);
            self.console
                .line(Tone::Item, format!("{i}: {}: {value}", display_bytes(key)))?;
        }

        self.console.blank()?;
        let console = &mut self.console;
        let Some(index) = ask(
            &mut *self.prompter,
            "Enter key index to select: ",
            |answer| parse_index(answer, keys.len()),
            &mut |err| console.line(Tone::Error, err.to_string()),
        )?
        else {
            return Ok(State::Done);
        };

        let key = keys[index].clone();
        let value = describe_value(self.store()?, &key);
        self.console.blank()?;
        self.console.line(Tone::Heading, "Selected key and its value:")?;
        self.console
            .line(Tone::Item, format!("   {}: {value}", display_bytes(&key)))?;
        self.key = Some(key);
        Ok(State::Commands)
    }

    fn commands(&mut self) -> Result<State, RediscliError> {
        let Some(key) = self.key.clone() else {
            return Err(RediscliError::Internal(
                "command loop reached without a key".to_string(),
            ));
        };
        let name = display_bytes(&key);

        self.console.blank()?;
        self.console.line(Tone::Subheading, "Available operations:")?;
        self.console.line(Tone::Item, Operation::menu())?;

        loop {
            self.console.blank()?;
            let Some(answer) = self.prompter.read_line("> ")? else {
                return Ok(State::Done);
            };
            let Ok(op) = Operation::from_str(answer.trim()) else {
                self.console.line(Tone::Error, "Invalid operation. Try again.")?;
                continue;
            };
            if op == Operation::Quit {
                return Ok(State::Done);
            }

            match self.execute(op, &key, &name) {
                Ok(Some(message)) => self.console.line(Tone::Item, message)?,
                Ok(None) => return Ok(State::Done),
                // Server-side failures (e.g. WRONGTYPE) leave the session usable.
                Err(err @ RediscliError::Store { .. }) => self.console.error(&err)?,
                Err(err) => return Err(err),
            }
        }
    }

    /// Run one operation on the selected key. `Ok(None)` if input ended.
    fn execute(
        &mut self,
        op: Operation,
        key: &[u8],
        name: &str,
    ) -> Result<Option<String>, RediscliError> {
        debug!(operation = %op, "executing");
        let message = match op {
            Operation::Get => match self.store()?.get(key)? {
                Some(value) => format!("Value: {}", display_bytes(&value)),
                None => format!("Key {name} does not exist."),
            },
            Operation::Set => {
                let Some(value) = self.prompter.read_line("Enter new value for the key: ")? else {
                    return Ok(None);
                };
                self.store()?.set(key, value.as_bytes())?;
                format!("Key {name} has been set to {value}.")
            }
            Operation::Delete => {
                if self.store()?.delete(key)? {
                    format!("Key {name} has been deleted.")
                } else {
                    format!("Key {name} does not exist.")
                }
            }
            Operation::Ttl => match self.store()?.ttl(key)? {
                Ttl::NoExpiry => format!("Key {name} does not have an expire set."),
                Ttl::Missing => format!("Key {name} does not exist."),
                Ttl::Seconds(seconds) => {
                    format!("Time to live for key {name}: {seconds} seconds.")
                }
            },
            Operation::Type => {
                let key_type = self.store()?.key_type(key)?;
                format!("Type of key {name}: {key_type}")
            }
            Operation::Quit => return Ok(None),
        };
        Ok(Some(message))
    }
}

/// Keys of the selected database in byte order.
fn sorted_keys<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<Vec<Vec<u8>>, RediscliError> {
    let mut keys = store.keys()?;
    keys.sort();
    Ok(keys)
}

/// Value for listings: the string value, `(nil)`, or `<type>` for values
/// `GET` cannot read.
fn describe_value<S: KeyValueStore + ?Sized>(store: &mut S, key: &[u8]) -> String {
    match store.get(key) {
        Ok(Some(value)) => display_bytes(&value),
        Ok(None) => "(nil)".to_string(),
        Err(_) => match store.key_type(key) {
            Ok(key_type) => format!("<{key_type}>"),
            Err(_) => "<unreadable>".to_string(),
        },
    }
}

/// A zero-based index below `len`.
pub fn parse_index(answer: &str, len: usize) -> Result<usize, RediscliError> {
    match answer.parse::<usize>() {
        Ok(index) if index < len => Ok(index),
        _ => Err(RediscliError::Validation(format!(
            "enter a number from 0 to {}",
            len.saturating_sub(1)
        ))),
    }
}

/// Runs the `rediscli shell` interactive session against a Redis server.
pub fn run_shell(config: &RediscliConfig) -> Result<(), RediscliError> {
    let mut prompter = TerminalPrompter::new()?;
    let console = Console::new(std::io::stdout(), Painter::from_config(&config.shell));
    let vault = VaultFile::from_config(&config.vault);

    let mut session = Session::new(
        config,
        vault,
        rediscli_vault::passphrase_from_env(),
        &mut prompter,
        console,
        |record: &CredentialRecord| {
            RedisStore::connect(&record.host, record.port, &record.password, record.use_tls)
        },
    );
    session.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_parsing() {
        assert_eq!(parse_index("0", 3).unwrap(), 0);
        assert_eq!(parse_index("2", 3).unwrap(), 2);
        assert!(parse_index("3", 3).is_err());
        assert!(parse_index("-1", 3).is_err());
        assert!(parse_index("one", 3).is_err());
        let err = parse_index("9", 16).unwrap_err();
        assert!(err.to_string().contains("0 to 15"));
    }
}
