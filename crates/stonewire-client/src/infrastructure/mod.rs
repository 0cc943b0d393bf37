//! Infrastructure layer for the client application.
//!
//! Contains the adapters that touch the outside world: the TCP transport,
//! the TOML config file and the log-based scoreboard.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `stonewire_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – connects to the server and pumps protocol lines through
//!   the `SessionHandler` until quit, disconnect or a fatal error.
//!
//! - **`scoreboard`** – a `GameObserver` that mirrors the game and reports it
//!   through `tracing`.
//!
//! - **`storage`** – loads `ClientConfig` from `config.toml`.

pub mod network;
pub mod scoreboard;
pub mod storage;
