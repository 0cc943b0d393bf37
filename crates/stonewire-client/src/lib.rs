//! stonewire-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does stonewire-client do? (for beginners)
//!
//! The *client* is one player in a networked game of stone placement.  A
//! server hosts the game; each player connects over TCP and exchanges short
//! text lines such as `move: 3,4`.
//!
//! The client application:
//!
//! 1. Connects to the server and announces its username.
//! 2. Answers the server's nonce challenge with a digest of its secret.
//! 3. Waits for the `board:` line that assigns its colour and board size.
//! 4. On every `move:` line, records the opponent's stone, asks the
//!    configured [`Strategy`](application::strategy::Strategy) for a reply,
//!    checks it against the board rules and sends it back.
//! 5. Stops on `quit:`, on disconnect, or on the first fatal error.

/// Application layer: session state machine, strategies, observers.
pub mod application;

/// Infrastructure layer: TCP transport, config file, text scoreboard.
pub mod infrastructure;
