//! Application layer use cases for the client application.
//!
//! # What use cases does the client have?
//!
//! - **`session`** – The protocol state machine.  Decodes each line from the
//!   server, drives authentication and the per-turn move exchange, and decides
//!   what to send back.  It owns the [`stonewire_core::Board`] for one game.
//!
//! - **`strategy`** – The move-selection capability supplied by the player,
//!   plus the registry that maps strategy names to factories.
//!
//! - **`observer`** – The notification interface used by renderers and
//!   scoreboards.  The session pushes events to it and never reads back.
//!
//! - **`credentials`** – The nonce challenge response.

pub mod credentials;
pub mod observer;
pub mod session;
pub mod strategy;
