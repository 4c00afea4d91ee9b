// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! rediscli - browse and edit Redis databases with locally encrypted credentials.
//!
//! This is the binary entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rediscli::prompt::TerminalPrompter;
use rediscli::render::{Console, Painter};
use rediscli::vault_cmd::VaultCommand;
use rediscli_config::RediscliConfig;
use rediscli_core::RediscliError;
use rediscli_vault::VaultFile;

/// rediscli - browse and edit Redis databases with locally encrypted credentials.
#[derive(Parser, Debug)]
#[command(name = "rediscli", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Vault file to use, overriding `vault.path`.
    #[arg(long, global = true, value_name = "PATH")]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive session (the default).
    Shell,
    /// Manage the credential vault.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

/// Vault management actions.
#[derive(Subcommand, Debug)]
enum VaultAction {
    /// Enter connection details and write a new vault.
    Init,
    /// Unlock the vault and print its contents, password masked.
    Show,
    /// Show the vault path, format and key derivation parameters.
    Status,
    /// Change the vault passphrase (upgrades legacy vaults).
    Rekey,
    /// Delete the vault file.
    Forget,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match rediscli_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            rediscli_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    if let Some(path) = &cli.vault {
        config.vault.path = path.display().to_string();
    }

    init_tracing(&config.cli.log_level);

    if let Err(e) = run(cli.command, &config) {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn run(command: Option<Commands>, config: &RediscliConfig) -> Result<(), RediscliError> {
    match command {
        None | Some(Commands::Shell) => rediscli::run_shell(config),
        Some(Commands::Vault { action }) => {
            let mut prompter = TerminalPrompter::new()?;
            let mut cmd = VaultCommand {
                config,
                vault: VaultFile::from_config(&config.vault),
                env_passphrase: rediscli_vault::passphrase_from_env(),
                prompter: &mut prompter,
                console: Console::new(std::io::stdout(), Painter::from_config(&config.shell)),
            };
            match action {
                VaultAction::Init => cmd.init(),
                VaultAction::Show => cmd.show(),
                VaultAction::Status => cmd.status(),
                VaultAction::Rekey => cmd.rekey(),
                VaultAction::Forget => cmd.forget(),
            }
        }
    }
}

/// Initialize the tracing subscriber. Logs go to stderr so they never mix
/// with the session output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rediscli={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["rediscli"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rediscli", "vault", "status", "--vault", "/tmp/x.vault"])
            .unwrap();
        assert_eq!(cli.vault, Some(PathBuf::from("/tmp/x.vault")));
        assert!(matches!(
            cli.command,
            Some(Commands::Vault {
                action: VaultAction::Status
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            rediscli_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.vault.path, ".rediscli");
    }
}
