use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::domain::Chain;
use crate::core::session::Action;

/// GNP Wallet CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "gnp-wallet", about = "Demonstration HD wallet for Ethereum and Solana")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "CONFIG_PATH", default_value = "config.toml")]
    pub config: PathBuf,

    /// Skip the Ethereum balance lookup
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print the session as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create a new wallet and print it
    Create {
        /// Mnemonic length (12 or 24); defaults to the configured value
        #[arg(long)]
        words: Option<usize>,
    },
    /// Load a wallet from a mnemonic phrase and print it
    Load {
        #[arg(long)]
        phrase: String,
    },
    /// Load a wallet and derive `count` further addresses on one chain
    Derive {
        #[arg(long)]
        phrase: String,
        #[arg(long, default_value = "eth")]
        chain: Chain,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Interactive session (default)
    Shell,
}

/// One line typed into the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Action(Action),
    Balance,
    Show,
    Help,
    Quit,
}

pub const SHELL_HELP: &str = "\
Commands:
  create              create a new wallet
  load <phrase...>    load a wallet from a mnemonic phrase
  tab eth|sol         switch the active chain
  derive              derive the next address on the active chain
  balance             refresh the Ethereum balance
  show                print the wallet again
  help                show this help
  quit                exit";

/// Parse a shell line. Errors are user-facing messages.
pub fn parse_shell_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "create" | "new" => Ok(ShellCommand::Action(Action::Create)),
        "load" => Ok(ShellCommand::Action(Action::Load(rest.to_string()))),
        "derive" => Ok(ShellCommand::Action(Action::DeriveNext)),
        "tab" | "chain" => rest
            .parse::<Chain>()
            .map(|c| ShellCommand::Action(Action::SwitchChain(c)))
            .map_err(|e| e.to_string()),
        "balance" => Ok(ShellCommand::Balance),
        "show" | "" => Ok(ShellCommand::Show),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command '{}'. Type `help` for a list.", other)),
    }
}
