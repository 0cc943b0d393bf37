//! SessionHandler: the per-connection protocol state machine.
//!
//! The handler owns the board, the strategy and the observer for exactly one
//! game.  The network layer feeds it one inbound line at a time and writes
//! back whatever [`Step`] it returns; the handler itself never touches a socket.
//!
//! ```text
//! Connecting ──start()──► Authenticating ──nonce──► AwaitingOpponent
//!                               │                          │
//!                               └──────────board───────────┴──► InGame ──game──► Finished
//!
//! quit (any state) ──► Finished      fatal error (any state) ──► Finished
//! ```
//!
//! Every error is fatal: the handler moves to `Finished` and the caller is
//! expected to drop the connection.  There is exactly one attempt per turn.

use std::fmt;

use stonewire_core::{
    parse_line, Board, BoardError, ClientMessage, Command, GameOutcome, Opponents, Point,
    ProtocolError, ServerMessage, Stone,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::credentials::nonce_reply;
use crate::application::observer::GameObserver;
use crate::application::strategy::Strategy;

/// Error type for a session.  Every variant ends the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The board refused a coordinate or a move.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The server sent something the protocol does not allow.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The strategy returned something other than `[x, y]`; the game is forfeited.
    #[error("strategy `{strategy}` did not return a 2-element coordinate (got {got:?})")]
    StrategyContract { strategy: String, got: Vec<i64> },

    /// The server refused the credentials.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The transport failed.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity and credential for one connection.
///
/// Built once at startup and handed to [`SessionHandler::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name sent in the `authenticate:` line.
    pub identity: String,
    /// Local secret used to answer the nonce challenge.
    pub credential: String,
}

/// Protocol state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticating,
    AwaitingOpponent,
    InGame,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Connecting => "connecting",
            SessionState::Authenticating => "authenticating",
            SessionState::AwaitingOpponent => "awaiting an opponent",
            SessionState::InGame => "in game",
            SessionState::Finished => "finished",
        })
    }
}

/// What the network layer should do after a line has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing to send; keep reading.
    Idle,
    /// Send this line, then keep reading.
    Reply(ClientMessage),
    /// The server asked us to quit; close the connection.
    Stop,
}

/// The Session Protocol Handler.
pub struct SessionHandler {
    config: SessionConfig,
    strategy: Box<dyn Strategy>,
    observer: Box<dyn GameObserver>,
    state: SessionState,
    board: Option<Board>,
    opponents: Option<Opponents>,
}

impl SessionHandler {
    /// Creates a handler in the `Connecting` state.
    pub fn new(
        config: SessionConfig,
        strategy: Box<dyn Strategy>,
        observer: Box<dyn GameObserver>,
    ) -> Self {
        Self {
            config,
            strategy,
            observer,
            state: SessionState::Connecting,
            board: None,
            opponents: None,
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The board, once the server has announced one.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// The most recent opponent announcement.
    pub fn opponents(&self) -> Option<&Opponents> {
        self.opponents.as_ref()
    }

    /// Called once the transport is ready.  Returns the `authenticate:` line.
    pub fn start(&mut self) -> ClientMessage {
        info!("connected to server, initiating authentication as {}", self.config.identity);
        self.state = SessionState::Authenticating;
        ClientMessage::Authenticate(self.config.identity.clone())
    }

    /// Decodes and handles one inbound line.
    ///
    /// # Errors
    ///
    /// Any [`SessionError`] is fatal; the handler is left in `Finished`.
    pub fn handle_line(&mut self, line: &str) -> Result<Step, SessionError> {
        debug!("<- {line}");
        let result = parse_line(line)
            .map_err(SessionError::from)
            .and_then(|msg| self.dispatch(msg));
        if result.is_err() {
            self.state = SessionState::Finished;
        }
        result
    }

    fn dispatch(&mut self, msg: ServerMessage) -> Result<Step, SessionError> {
        match msg {
            ServerMessage::Nonce(nonce) => self.on_nonce(&nonce),
            ServerMessage::NotAuthorized(reason) => self.on_not_authorized(reason),
            ServerMessage::Opponent(opponents) => self.on_opponent(opponents),
            ServerMessage::Board { color, size } => self.on_board(color, size),
            ServerMessage::Score { white, black } => self.on_score(white, black),
            ServerMessage::Move(last) => self.on_move(last),
            ServerMessage::Message(text) => self.on_message(&text),
            ServerMessage::Game(outcome) => self.on_game(&outcome),
            ServerMessage::Quit(reason) => Ok(self.on_quit(&reason)),
        }
    }

    // ── Command handlers ──────────────────────────────────────────────────────

    fn on_nonce(&mut self, nonce: &str) -> Result<Step, SessionError> {
        self.require(Command::Nonce, &[SessionState::Authenticating])?;
        info!("answering authentication challenge");
        self.state = SessionState::AwaitingOpponent;
        Ok(Step::Reply(ClientMessage::NonceReply(nonce_reply(
            &self.config.credential,
            nonce,
        ))))
    }

    fn on_not_authorized(&mut self, reason: String) -> Result<Step, SessionError> {
        self.require(
            Command::NotAuthorized,
            &[SessionState::Authenticating, SessionState::AwaitingOpponent],
        )?;
        warn!("server refused authentication: {reason}");
        Err(SessionError::NotAuthorized(reason))
    }

    fn on_opponent(&mut self, opponents: Opponents) -> Result<Step, SessionError> {
        self.require_active(Command::Opponent)?;
        match &opponents {
            Opponents::Single(name) => info!("your opponent is {name}"),
            Opponents::Pair { white, black } => info!("white is {white}, black is {black}"),
        }
        self.observer.opponent_announced(&opponents);
        self.opponents = Some(opponents);
        Ok(Step::Idle)
    }

    fn on_board(&mut self, color: Stone, size: usize) -> Result<Step, SessionError> {
        self.require(
            Command::Board,
            &[SessionState::Authenticating, SessionState::AwaitingOpponent],
        )?;
        let board = Board::new(color, size)?;
        info!(
            "game started: playing {color} on a {size}x{size} board with strategy `{}`",
            self.strategy.name()
        );
        self.board = Some(board);
        self.state = SessionState::InGame;
        self.observer.game_started(color, size);
        Ok(Step::Idle)
    }

    fn on_score(&mut self, white: u32, black: u32) -> Result<Step, SessionError> {
        self.require_active(Command::Score)?;
        debug!("score: white {white}, black {black}");
        self.observer.score(white, black);
        Ok(Step::Idle)
    }

    fn on_move(&mut self, last: Option<Point>) -> Result<Step, SessionError> {
        self.require(Command::Move, &[SessionState::InGame])?;
        let Some(board) = self.board.as_mut() else {
            return Err(self.unexpected(Command::Move).into());
        };
        info!("it's your move");

        if let Some(p) = last {
            board.record_opponent_move(p.x, p.y)?;
            info!("opponent's last move was {p}");
            self.observer.move_applied(board.opponent(), p);
        }

        let proposal = self.strategy.select_move(board);
        let [x, y] = proposal[..] else {
            return Err(SessionError::StrategyContract {
                strategy: self.strategy.name().to_string(),
                got: proposal,
            });
        };

        board.apply_player_move(x, y)?;
        let mine = Point::new(x, y);
        info!("your move is {mine}");
        self.observer.move_applied(board.player(), mine);
        Ok(Step::Reply(ClientMessage::Move(mine)))
    }

    fn on_message(&mut self, text: &str) -> Result<Step, SessionError> {
        info!("server says: {text}");
        self.observer.message(text);
        Ok(Step::Idle)
    }

    fn on_game(&mut self, outcome: &GameOutcome) -> Result<Step, SessionError> {
        self.require(Command::Game, &[SessionState::InGame])?;
        info!(
            "game over, winner: {} ({} white and {} black stones alive)",
            outcome.winner,
            outcome.white_live.len(),
            outcome.black_live.len()
        );
        self.state = SessionState::Finished;
        self.observer.game_over(outcome);
        Ok(Step::Idle)
    }

    fn on_quit(&mut self, reason: &str) -> Step {
        info!("quitting: {reason}");
        self.state = SessionState::Finished;
        Step::Stop
    }

    // ── State guards ──────────────────────────────────────────────────────────

    fn unexpected(&self, command: Command) -> ProtocolError {
        ProtocolError::UnexpectedInState {
            command,
            state: self.state.to_string(),
        }
    }

    fn require(&self, command: Command, allowed: &[SessionState]) -> Result<(), ProtocolError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.unexpected(command))
        }
    }

    /// Informational commands are accepted from authentication until game over.
    fn require_active(&self, command: Command) -> Result<(), ProtocolError> {
        self.require(
            command,
            &[
                SessionState::Authenticating,
                SessionState::AwaitingOpponent,
                SessionState::InGame,
            ],
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
