//! Stonewire client entry point.
//!
//! Loads the configuration, picks a move strategy by name, connects to the
//! game server and plays one session to completion.
//!
//! # Usage
//!
//! ```text
//! stonewire [OPTIONS]
//!
//! Options:
//!   --config   <PATH>   Config file [default: platform config dir]
//!   --host     <HOST>   Game server host
//!   --port     <PORT>   Game server port
//!   --username <NAME>   Name sent in the `authenticate:` line
//!   --secret   <TEXT>   Secret used to answer the nonce challenge
//!   --strategy <NAME>   Move strategy (see --list-strategies)
//!   --list-strategies   Print the available strategies and exit
//! ```
//!
//! # Precedence
//!
//! Command-line flag (or its `STONEWIRE_*` environment variable) > config
//! file > built-in default.  The log level comes from `RUST_LOG` when set,
//! otherwise from `[logging] level` in the config file.
//!
//! # Exit status
//!
//! `0` when the server sends `quit:` or closes the connection, non-zero on
//! any fatal session error.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stonewire_client::application::session::SessionHandler;
use stonewire_client::application::strategy::StrategyRegistry;
use stonewire_client::infrastructure::network::{connect_and_play, SessionEnd};
use stonewire_client::infrastructure::scoreboard::Scoreboard;
use stonewire_client::infrastructure::storage::config::{load_config, ConfigOverrides};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Networked stone-placement game client.
#[derive(Debug, Parser)]
#[command(name = "stonewire", about = "Plays one stone-placement game against a server", version)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "STONEWIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Hostname or IP address of the game server.
    #[arg(long, env = "STONEWIRE_HOST")]
    host: Option<String>,

    /// TCP port of the game server.
    #[arg(long, env = "STONEWIRE_PORT")]
    port: Option<u16>,

    /// Name to authenticate as.
    #[arg(long, env = "STONEWIRE_USERNAME")]
    username: Option<String>,

    /// Secret used to answer the server's nonce challenge.
    #[arg(long, env = "STONEWIRE_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Registry name of the move strategy.
    #[arg(long, env = "STONEWIRE_STRATEGY")]
    strategy: Option<String>,

    /// Print the available strategies and exit.
    #[arg(long)]
    list_strategies: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            secret: self.secret.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = StrategyRegistry::with_builtins().context("failed to register strategies")?;

    if cli.list_strategies {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.overrides().apply(&mut config);

    // `RUST_LOG` wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let strategy = registry
        .create(&config.player.strategy)
        .context("invalid --strategy")?;
    let addr = config.server_addr();
    info!(
        "Stonewire client starting: server={addr}, player={}, strategy={}",
        config.player.username,
        strategy.name()
    );

    let observer = Box::new(Scoreboard::new(config.player.username.clone()));
    let mut handler = SessionHandler::new(config.session_config(), strategy, observer);

    match connect_and_play(&addr, &mut handler).await {
        Ok(SessionEnd::Quit) => {
            info!("session closed by server");
            Ok(())
        }
        Ok(SessionEnd::Disconnected) => Ok(()),
        Err(e) => {
            error!("session ended with an error: {e}");
            Err(e).with_context(|| format!("game session with {addr} failed"))
        }
    }
}
