// src/main.rs
//! GNP Wallet terminal front end
//! Dispatches user actions into a wallet session and prints the result.
use anyhow::Result;
use clap::Parser;
use gnp_wallet::blockchain::EthereumClient;
use gnp_wallet::cli::{parse_shell_command, Cli, Commands, ShellCommand, SHELL_HELP};
use gnp_wallet::core::config::{DerivationConfig, WalletConfig};
use gnp_wallet::core::session::{Action, WalletSession};
use gnp_wallet::service::WalletController;
use gnp_wallet::view::{render, SessionSnapshot};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;

    info!("Starting GNP Wallet v{}", env!("CARGO_PKG_VERSION"));

    let config = WalletConfig::load(&cli.config)?;

    match cli.command.clone().unwrap_or(Commands::Shell) {
        Commands::Create { words } => {
            let mut derivation = config.derivation.clone();
            if let Some(words) = words {
                derivation.word_count = words;
            }
            run_once(&cli, &config, derivation, vec![Action::Create]).await
        }
        Commands::Load { phrase } => {
            run_once(&cli, &config, config.derivation.clone(), vec![Action::Load(phrase)]).await
        }
        Commands::Derive { phrase, chain, count } => {
            let mut actions = vec![Action::Load(phrase), Action::SwitchChain(chain)];
            actions.extend((0..count).map(|_| Action::DeriveNext));
            run_once(&cli, &config, config.derivation.clone(), actions).await
        }
        Commands::Shell => run_shell(&cli, &config).await,
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // The wallet view goes to stdout; keep logs on stderr.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_controller(
    cli: &Cli,
    config: &WalletConfig,
    derivation: DerivationConfig,
) -> Result<WalletController> {
    let session = WalletSession::new(derivation);
    if cli.offline {
        return Ok(WalletController::offline(session));
    }
    let client = EthereumClient::from_config(config)?;
    Ok(WalletController::new(session, Arc::new(client)))
}

fn print_session(cli: &Cli, session: &WalletSession) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&SessionSnapshot::of(session))?);
    } else {
        print!("{}", render(session));
    }
    Ok(())
}

/// Run a fixed list of actions, print the session, and fail if the last
/// action left an error behind.
async fn run_once(
    cli: &Cli,
    config: &WalletConfig,
    derivation: DerivationConfig,
    actions: Vec<Action>,
) -> Result<()> {
    let controller = build_controller(cli, config, derivation)?;
    for action in actions {
        controller.dispatch(action)?;
        if controller.with_session(|s| s.error().is_some()) {
            break;
        }
    }
    controller.settle().await;
    controller.with_session(|s| print_session(cli, s))?;

    let error = controller.with_session(|s| s.error().map(str::to_string));
    match error {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(()),
    }
}

async fn run_shell(cli: &Cli, config: &WalletConfig) -> Result<()> {
    let controller = build_controller(cli, config, config.derivation.clone())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", SHELL_HELP);
    controller.with_session(|s| print_session(cli, s))?;

    while let Some(line) = lines.next_line().await? {
        match parse_shell_command(&line) {
            Ok(ShellCommand::Action(action)) => {
                controller.dispatch_and_settle(action).await?;
            }
            Ok(ShellCommand::Balance) => {
                controller.refresh_balance();
                controller.settle().await;
            }
            Ok(ShellCommand::Show) => {}
            Ok(ShellCommand::Help) => {
                println!("{}", SHELL_HELP);
                continue;
            }
            Ok(ShellCommand::Quit) => break,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        }
        controller.with_session(|s| print_session(cli, s))?;
    }

    info!("Shell closed");
    Ok(())
}
