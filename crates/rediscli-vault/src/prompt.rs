// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or the REDISCLI_VAULT_KEY environment variable.

use rediscli_core::RediscliError;
use secrecy::SecretString;

/// The environment variable name for providing the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "REDISCLI_VAULT_KEY";

/// The passphrase from `REDISCLI_VAULT_KEY`, if set and non-empty.
pub fn passphrase_from_env() -> Option<SecretString> {
    match std::env::var(VAULT_KEY_ENV_VAR) {
        Ok(key) if !key.is_empty() => Some(SecretString::from(key)),
        _ => None,
    }
}

/// Read one line with echo disabled. Requires a terminal on stdin.
pub fn read_hidden(label: &str) -> Result<SecretString, RediscliError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(RediscliError::Prompt(format!(
            "No passphrase provided. Set {VAULT_KEY_ENV_VAR} or run interactively."
        )));
    }
    eprint!("{label}");
    rpassword::read_password()
        .map(SecretString::from)
        .map_err(|e| RediscliError::Prompt(format!("failed to read passphrase: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn passphrase_is_read_from_env_var() {
        // SAFETY: test-only env mutation, serialized.
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "test-passphrase") };
        let from_env = passphrase_from_env();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert_eq!(from_env.unwrap().expose_secret(), "test-passphrase");
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "") };
        let from_env = passphrase_from_env();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(from_env.is_none());
    }

    #[test]
    #[serial]
    fn unset_env_var_is_none() {
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };
        assert!(passphrase_from_env().is_none());
    }
}
