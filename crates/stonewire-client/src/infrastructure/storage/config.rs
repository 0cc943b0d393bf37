//! TOML-based configuration for the client application.
//!
//! Reads `ClientConfig` from an explicit path (`--config`) or from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\Stonewire\config.toml`
//! - Linux:    `~/.config/stonewire/config.toml`
//! - macOS:    `~/Library/Application Support/Stonewire/config.toml`
//!
//! # File layout (for beginners)
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 4000
//!
//! [player]
//! username = "alice"
//! secret = "s3cret"
//! strategy = "first-open"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field is optional.  Fields annotated with
//! `#[serde(default = "some_fn")]` take the value of `some_fn()` when absent,
//! and whole sections fall back to their `Default` impl, so an empty file is
//! a valid config.
//!
//! Command-line flags are layered on top with [`ConfigOverrides::apply`]; a
//! flag always wins over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::application::session::SessionConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the game server listens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Who this client plays as, and how it picks moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Name sent in the `authenticate:` line.
    #[serde(default = "default_username")]
    pub username: String,
    /// Local secret used to answer the nonce challenge.  Never sent as-is.
    #[serde(default)]
    pub secret: String,
    /// Registry name of the move strategy.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}
fn default_username() -> String {
    "player".to_string()
}
fn default_strategy() -> String {
    "first-open".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            secret: String::new(),
            strategy: default_strategy(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// `host:port` string for `TcpStream::connect`.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Builds the identity/credential pair handed to the session handler.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            identity: self.player.username.clone(),
            credential: self.player.secret.clone(),
        }
    }
}

// ── Overrides ─────────────────────────────────────────────────────────────────

/// Values given on the command line.  `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub strategy: Option<String>,
}

impl ConfigOverrides {
    /// Writes every `Some` field into `config`.
    pub fn apply(self, config: &mut ClientConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(username) = self.username {
            config.player.username = username;
        }
        if let Some(secret) = self.secret {
            config.player.secret = secret;
        }
        if let Some(strategy) = self.strategy {
            config.player.strategy = strategy;
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the default config file path, if the platform has a config directory.
pub fn config_file_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads `ClientConfig` from `path`, or from [`config_file_path`] when `path`
/// is `None`.
///
/// A missing file at the default location yields `ClientConfig::default()`.
/// A missing file at an explicit path is an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_file_path() {
            Some(p) => (p, false),
            None => return Ok(ClientConfig::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            debug!("loading config from {}", path.display());
            Ok(toml::from_str(&content)?)
        }
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}, using defaults", path.display());
            Ok(ClientConfig::default())
        }
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Resolves the platform config directory including the `Stonewire` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Stonewire"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Stonewire")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("stonewire"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
