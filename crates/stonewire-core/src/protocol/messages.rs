//! All stonewire line-protocol message types.
//!
//! Every frame on the wire is one ASCII line of the form `keyword: payload`
//! terminated by `\n`.  Inbound frames (server → client) decode into
//! [`ServerMessage`]; outbound frames (client → server) are built from
//! [`ClientMessage`].

use std::fmt;

use crate::domain::board::{Point, Stone};

// ── Command keywords ──────────────────────────────────────────────────────────

/// Every keyword defined by the protocol, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Authenticate,
    Nonce,
    NonceReply,
    NotAuthorized,
    Opponent,
    Board,
    Score,
    Move,
    Message,
    Game,
    Quit,
}

impl Command {
    /// All keywords, in handshake-then-game order.
    pub const ALL: [Command; 11] = [
        Command::Authenticate,
        Command::Nonce,
        Command::NonceReply,
        Command::NotAuthorized,
        Command::Opponent,
        Command::Board,
        Command::Score,
        Command::Move,
        Command::Message,
        Command::Game,
        Command::Quit,
    ];

    /// The keyword exactly as it appears on the wire.
    pub fn keyword(self) -> &'static str {
        match self {
            Command::Authenticate => "authenticate",
            Command::Nonce => "nonce",
            Command::NonceReply => "nonce-reply",
            Command::NotAuthorized => "not-authorized",
            Command::Opponent => "opponent",
            Command::Board => "board",
            Command::Score => "score",
            Command::Move => "move",
            Command::Message => "message",
            Command::Game => "game",
            Command::Quit => "quit",
        }
    }

    /// Looks up a keyword.  Matching is exact and case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.keyword() == keyword)
    }

    /// Returns `true` for keywords the server may send to a client.
    pub fn is_inbound(self) -> bool {
        !matches!(self, Command::Authenticate | Command::NonceReply)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ── Payload types ─────────────────────────────────────────────────────────────

/// Payload of an `opponent:` line.
///
/// Players receive a single name; spectators receive the `white,black` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opponents {
    Single(String),
    Pair { white: String, black: String },
}

/// Final result carried by a `game:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// Winner as reported by the server (a colour, a name, or a draw marker).
    pub winner: String,
    /// White stones still alive at the end of the game.
    pub white_live: Vec<Point>,
    /// Black stones still alive at the end of the game.
    pub black_live: Vec<Point>,
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A decoded server → client frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Authentication challenge.
    Nonce(String),
    /// Authentication was refused; the session is over.
    NotAuthorized(String),
    /// Informational opponent announcement.
    Opponent(Opponents),
    /// Game start: the local colour and the board size.
    Board { color: Stone, size: usize },
    /// Running score.
    Score { white: u32, black: u32 },
    /// The opponent's last move, or `None` when the local player moves first.
    Move(Option<Point>),
    /// Free-form chat or status text.
    Message(String),
    /// Game over.
    Game(GameOutcome),
    /// Graceful termination.
    Quit(String),
}

impl ServerMessage {
    /// The keyword this message was decoded from.
    pub fn command(&self) -> Command {
        match self {
            ServerMessage::Nonce(_) => Command::Nonce,
            ServerMessage::NotAuthorized(_) => Command::NotAuthorized,
            ServerMessage::Opponent(_) => Command::Opponent,
            ServerMessage::Board { .. } => Command::Board,
            ServerMessage::Score { .. } => Command::Score,
            ServerMessage::Move(_) => Command::Move,
            ServerMessage::Message(_) => Command::Message,
            ServerMessage::Game(_) => Command::Game,
            ServerMessage::Quit(_) => Command::Quit,
        }
    }
}

/// A client → server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Opens the handshake with the player's identity.
    Authenticate(String),
    /// Answer to a [`ServerMessage::Nonce`] challenge.
    NonceReply(String),
    /// The local player's move for this turn.
    Move(Point),
    /// Outgoing chat or status text.
    Message(String),
}

impl ClientMessage {
    /// The keyword used when this message is encoded.
    pub fn command(&self) -> Command {
        match self {
            ClientMessage::Authenticate(_) => Command::Authenticate,
            ClientMessage::NonceReply(_) => Command::NonceReply,
            ClientMessage::Move(_) => Command::Move,
            ClientMessage::Message(_) => Command::Message,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
