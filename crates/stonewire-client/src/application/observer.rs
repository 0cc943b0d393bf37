//! Observer sink for game events.
//!
//! The session handler pushes a notification after each state transition.
//! Observers are fire-and-forget: they return nothing, and the handler never
//! reads from them.  Renderers and scoreboards live in the infrastructure
//! layer and depend only on this trait.

use stonewire_core::{GameOutcome, Opponents, Point, Stone};

/// Receives move, score, message and game-over notifications.
///
/// Every method has an empty default body so an implementation only needs to
/// override the events it cares about.
#[cfg_attr(test, mockall::automock)]
pub trait GameObserver: Send {
    /// A board was created for a new game.
    fn game_started(&mut self, _player: Stone, _size: usize) {}

    /// The server announced the opponent (or both players, when spectating).
    fn opponent_announced(&mut self, _opponents: &Opponents) {}

    /// A stone was placed on the board.
    fn move_applied(&mut self, _stone: Stone, _at: Point) {}

    /// The running score changed.
    fn score(&mut self, _white: u32, _black: u32) {}

    /// The server sent chat or status text.
    fn message(&mut self, _text: &str) {}

    /// The game is over.
    fn game_over(&mut self, _outcome: &GameOutcome) {}
}

/// Observer that ignores every event; used for headless play.
#[derive(Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}
