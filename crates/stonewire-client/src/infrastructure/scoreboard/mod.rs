//! Text scoreboard: a [`GameObserver`] that reports the game through `tracing`.
//!
//! The scoreboard keeps its own mirror of the board, fed only by observer
//! notifications, so it never reaches into the session handler.  At game over
//! it logs the final position with the live stones of each side marked in
//! lower case:
//!
//! ```text
//! E E E
//! w W E
//! b B E
//! ```

use stonewire_core::{Board, GameOutcome, Opponents, Point, Stone, SymbolMap};
use tracing::{info, warn};

use crate::application::observer::GameObserver;

const DEFAULT_WHITE_NAME: &str = "White Stones";
const DEFAULT_BLACK_NAME: &str = "Black Stones";

/// Observer that tracks names, score and moves and logs them.
#[derive(Debug)]
pub struct Scoreboard {
    identity: String,
    symbols: SymbolMap,
    own_color: Option<Stone>,
    opponent: Option<String>,
    spectated: Option<(String, String)>,
    white_score: u32,
    black_score: u32,
    moves: u32,
    board: Option<Board>,
    winner: Option<String>,
}

impl Scoreboard {
    /// Creates a scoreboard for a client playing as `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            symbols: SymbolMap::default(),
            own_color: None,
            opponent: None,
            spectated: None,
            white_score: 0,
            black_score: 0,
            moves: 0,
            board: None,
            winner: None,
        }
    }

    /// Display name of whoever holds `color` stones.
    pub fn player_name(&self, color: Stone) -> &str {
        if let Some((white, black)) = &self.spectated {
            return match color {
                Stone::Black => black.as_str(),
                _ => white.as_str(),
            };
        }
        match self.own_color {
            Some(own) if own == color => self.identity.as_str(),
            Some(own) if own.opponent() == color => self
                .opponent
                .as_deref()
                .unwrap_or_else(|| default_name(color)),
            _ => default_name(color),
        }
    }

    /// Last reported `(white, black)` score.
    pub fn score_line(&self) -> (u32, u32) {
        (self.white_score, self.black_score)
    }

    /// Number of stones placed so far, by either side.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// The mirrored board, once a game has started.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Winner announced by the server, once the game is over.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Renders the mirror board with the outcome's live stones in lower case.
    ///
    /// Live points outside the board are ignored.
    pub fn render(&self, outcome: &GameOutcome) -> Option<String> {
        let board = self.board.as_ref()?;
        let size = board.size() as i64;
        let mut rows: Vec<Vec<char>> = board
            .dump(&self.symbols)
            .lines()
            .map(|line| line.chars().collect())
            .collect();

        for p in outcome.white_live.iter().chain(&outcome.black_live) {
            if !(0..size).contains(&p.x) || !(0..size).contains(&p.y) {
                continue;
            }
            // dump puts the top row (highest y) first and a space between cells
            let cell = &mut rows[(size - 1 - p.y) as usize][(p.x * 2) as usize];
            *cell = cell.to_ascii_lowercase();
        }

        let mut out = String::new();
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        Some(out)
    }
}

fn default_name(color: Stone) -> &'static str {
    match color {
        Stone::Black => DEFAULT_BLACK_NAME,
        _ => DEFAULT_WHITE_NAME,
    }
}

impl GameObserver for Scoreboard {
    fn game_started(&mut self, player: Stone, size: usize) {
        self.own_color = Some(player);
        self.moves = 0;
        self.winner = None;
        self.board = match Board::new(player, size) {
            Ok(board) => Some(board),
            Err(e) => {
                warn!("scoreboard cannot mirror the board: {e}");
                None
            }
        };
        info!(
            "new {size}x{size} game: {} (white) vs {} (black)",
            self.player_name(Stone::White),
            self.player_name(Stone::Black)
        );
    }

    fn opponent_announced(&mut self, opponents: &Opponents) {
        match opponents {
            Opponents::Single(name) => self.opponent = Some(name.clone()),
            Opponents::Pair { white, black } => {
                self.spectated = Some((white.clone(), black.clone()));
            }
        }
    }

    fn move_applied(&mut self, stone: Stone, at: Point) {
        self.moves += 1;
        info!("move {}: {} plays {at}", self.moves, self.player_name(stone));

        let Some(board) = self.board.as_mut() else {
            return;
        };
        let result = if stone == board.player() {
            board.apply_player_move(at.x, at.y)
        } else {
            board.record_opponent_move(at.x, at.y)
        };
        if let Err(e) = result {
            warn!("scoreboard mirror out of sync: {e}");
        }
    }

    fn score(&mut self, white: u32, black: u32) {
        self.white_score = white;
        self.black_score = black;
        info!(
            "score: {} {white}, {} {black}",
            self.player_name(Stone::White),
            self.player_name(Stone::Black)
        );
    }

    fn message(&mut self, text: &str) {
        info!("server says: {text}");
    }

    fn game_over(&mut self, outcome: &GameOutcome) {
        self.winner = Some(outcome.winner.clone());
        info!(
            "game over after {} moves, winner: {} (live stones: {} white, {} black)",
            self.moves,
            outcome.winner,
            outcome.white_live.len(),
            outcome.black_live.len()
        );
        if let Some(dump) = self.render(outcome) {
            info!("final position:\n{dump}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
