// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run credential entry and new-passphrase selection.

use rediscli_core::RediscliError;
use rediscli_vault::CredentialRecord;
use secrecy::{ExposeSecret, SecretString};

use crate::prompt::{ask, parse_yes_no, Prompter};

pub fn parse_host(answer: &str) -> Result<String, RediscliError> {
    if answer.is_empty() {
        return Err(RediscliError::Validation("hostname must not be empty".to_string()));
    }
    if answer.chars().any(char::is_whitespace) {
        return Err(RediscliError::Validation(
            "hostname must not contain whitespace".to_string(),
        ));
    }
    Ok(answer.to_string())
}

pub fn parse_port(answer: &str) -> Result<u16, RediscliError> {
    match answer.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(RediscliError::Validation(format!(
            "port must be a number between 1 and 65535, got {answer:?}"
        ))),
    }
}

/// Ask for host, port, password and TLS. `Ok(None)` if input ends early.
pub fn collect_credentials<P: Prompter + ?Sized>(
    prompter: &mut P,
    on_invalid: &mut dyn FnMut(&RediscliError) -> Result<(), RediscliError>,
) -> Result<Option<CredentialRecord>, RediscliError> {
    let Some(host) = ask(
        &mut *prompter,
        "Enter Redis server hostname: ",
        parse_host,
        on_invalid,
    )?
    else {
        return Ok(None);
    };
    let Some(port) = ask(
        &mut *prompter,
        "Enter Redis server port: ",
        parse_port,
        on_invalid,
    )?
    else {
        return Ok(None);
    };
    let Some(password) = prompter.read_secret("Enter Redis server password: ")? else {
        return Ok(None);
    };
    let Some(use_tls) = ask(&mut *prompter, "Use TLS? (y/n): ", parse_yes_no, on_invalid)? else {
        return Ok(None);
    };

    Ok(Some(CredentialRecord::new(
        host,
        port,
        password.expose_secret(),
        use_tls,
    )))
}

/// Choose the passphrase for a new vault: the environment value if given,
/// otherwise a non-empty passphrase entered twice.
pub fn choose_passphrase<P: Prompter + ?Sized>(
    prompter: &mut P,
    env_passphrase: Option<SecretString>,
    on_invalid: &mut dyn FnMut(&RediscliError) -> Result<(), RediscliError>,
) -> Result<Option<SecretString>, RediscliError> {
    if env_passphrase.is_some() {
        return Ok(env_passphrase);
    }

    loop {
        let Some(first) = prompter.read_secret("Enter your passkey: ")? else {
            return Ok(None);
        };
        if first.expose_secret().is_empty() {
            on_invalid(&RediscliError::Validation(
                "empty passphrase not allowed".to_string(),
            ))?;
            continue;
        }
        let Some(second) = prompter.read_secret("Confirm your passkey: ")? else {
            return Ok(None);
        };
        if first.expose_secret() != second.expose_secret() {
            on_invalid(&RediscliError::Validation(
                "passphrases do not match".to_string(),
            ))?;
            continue;
        }
        return Ok(Some(first));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;

    #[test]
    fn port_validation() {
        assert_eq!(parse_port("6379").unwrap(), 6379);
        assert_eq!(parse_port("65535").unwrap(), 65535);
        for bad in ["", "0", "65536", "-1", "redis", "63 79"] {
            assert!(
                matches!(parse_port(bad), Err(RediscliError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn host_validation() {
        assert_eq!(parse_host("cache.internal").unwrap(), "cache.internal");
        assert!(parse_host("").is_err());
        assert!(parse_host("two words").is_err());
    }

    #[test]
    fn collects_credentials_with_reprompts() {
        let mut prompter = ScriptedPrompter::new(["", "localhost", "port", "0", "6379", "", "n"]);
        let mut errors = Vec::new();
        let record = collect_credentials(&mut prompter, &mut |e| {
            errors.push(e.to_string());
            Ok(())
        })
        .unwrap()
        .unwrap();

        assert_eq!(record, CredentialRecord::new("localhost", 6379, "", false));
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.starts_with("invalid input")));
    }

    #[test]
    fn collects_password_and_tls() {
        let mut prompter = ScriptedPrompter::new(["db.example.com", "6380", "s3cret", "Y"]);
        let record = collect_credentials(&mut prompter, &mut |_| Ok(()))
            .unwrap()
            .unwrap();
        assert_eq!(record, CredentialRecord::new("db.example.com", 6380, "s3cret", true));
        assert_eq!(prompter.prompts()[2], "Enter Redis server password: ");
    }

    #[test]
    fn early_end_of_input() {
        let mut prompter = ScriptedPrompter::new(["localhost"]);
        assert!(collect_credentials(&mut prompter, &mut |_| Ok(()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn new_passphrase_needs_matching_confirmation() {
        let mut prompter = ScriptedPrompter::new(["", "one", "two", "three", "three"]);
        let mut errors = 0;
        let passphrase = choose_passphrase(&mut prompter, None, &mut |_| {
            errors += 1;
            Ok(())
        })
        .unwrap()
        .unwrap();
        assert_eq!(passphrase.expose_secret(), "three");
        assert_eq!(errors, 2);
    }

    #[test]
    fn env_passphrase_skips_prompts() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let passphrase = choose_passphrase(
            &mut prompter,
            Some(SecretString::from("from-env".to_string())),
            &mut |_| Ok(()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(passphrase.expose_secret(), "from-env");
        assert!(prompter.prompts().is_empty());
    }
}
