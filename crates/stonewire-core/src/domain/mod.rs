//! Domain entities for stonewire.
//!
//! This module contains pure game rules with no infrastructure dependencies:
//! no sockets, no async runtime, no rendering.  Everything here can be
//! compiled and tested on any platform without external setup.
//!
//! The client application owns one [`board::Board`] per game and mutates it
//! exactly twice per turn: once to record the opponent's stone and once to
//! place its own.

/// The game board and its move rules.
///
/// See [`board::Board`] for the main type.
pub mod board;
