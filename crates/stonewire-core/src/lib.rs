//! # stonewire-core
//!
//! Shared library for the stonewire game client containing the board rules
//! and the line-protocol codec.
//!
//! It has zero dependencies on sockets, async runtimes, or rendering toolkits.
//!
//! # Architecture overview (for beginners)
//!
//! Two remote players take turns placing stones on a square board.  A server
//! referees the game; each player runs a client that talks to the server over
//! a plain-text, one-line-per-message protocol.
//!
//! This crate is the foundation of that client.  It defines:
//!
//! - **`domain`** – The [`Board`]: who owns which cell, the bottom-left
//!   coordinate frame, and the adjacency rule that decides whether a move is
//!   legal.
//!
//! - **`protocol`** – How lines travel over the network.  Inbound lines are
//!   decoded into [`ServerMessage`] values and outbound [`ClientMessage`]
//!   values are encoded back into lines.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `stonewire_core::Board` instead of `stonewire_core::domain::board::Board`.
pub use domain::board::{Board, BoardError, MoveRejection, Point, Stone, SymbolMap, MAX_BOARD_SIZE};
pub use protocol::codec::{encode_line, parse_line, ProtocolError};
pub use protocol::messages::{ClientMessage, Command, GameOutcome, Opponents, ServerMessage};
