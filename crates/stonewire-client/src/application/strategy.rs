//! Move-selection strategies and the registry that names them.
//!
//! A [`Strategy`] is supplied by the game participant.  The session handler
//! calls it once per turn with read access to the board and validates what it
//! returns: exactly two components `[x, y]`.  Anything else forfeits the game.
//!
//! Strategies are made available by name through a [`StrategyRegistry`]
//! populated with explicit `register` calls at startup.

use std::collections::BTreeMap;

use stonewire_core::{Board, Point};
use thiserror::Error;
use tracing::debug;

/// Error type for registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("unknown strategy `{name}`, available: {available}")]
    Unknown { name: String, available: String },
    #[error("strategy `{0}` is already registered")]
    Duplicate(String),
}

/// Capability that picks the local player's next move.
///
/// `select_move` must be a bounded computation: it runs inside the turn
/// handler and nothing interrupts it.
pub trait Strategy: Send {
    /// Registry name, used in log lines.
    fn name(&self) -> &str;

    /// Returns the chosen coordinate as `[x, y]`.
    ///
    /// Returning any other number of components is a contract violation.
    fn select_move(&mut self, board: &Board) -> Vec<i64>;
}

/// Builds a fresh strategy instance for one game.
pub type StrategyFactory = fn() -> Box<dyn Strategy>;

/// Name → factory mapping.
#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in strategies.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Duplicate`] if two built-ins share a name.
    pub fn with_builtins() -> Result<Self, StrategyError> {
        let mut registry = Self::new();
        registry.register(FirstOpen::NAME, first_open)?;
        registry.register(CenterOut::NAME, center_out)?;
        Ok(registry)
    }

    /// Adds a strategy under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Duplicate`] if `name` is taken.
    pub fn register(&mut self, name: &str, factory: StrategyFactory) -> Result<(), StrategyError> {
        if self.factories.contains_key(name) {
            return Err(StrategyError::Duplicate(name.to_string()));
        }
        debug!("registered strategy `{name}`");
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiates the strategy registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Unknown`] listing the available names.
    pub fn create(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| StrategyError::Unknown {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

fn first_open() -> Box<dyn Strategy> {
    Box::new(FirstOpen)
}

fn center_out() -> Box<dyn Strategy> {
    Box::new(CenterOut)
}

fn components(p: Point) -> Vec<i64> {
    vec![p.x, p.y]
}

// ── Built-in strategies ───────────────────────────────────────────────────────

/// Takes the first empty neighbour of the opponent's last move, otherwise
/// the first empty cell on the board.
///
/// On a full board there is nothing to return, so it returns no components
/// and the game is forfeited.
#[derive(Debug, Default)]
pub struct FirstOpen;

impl FirstOpen {
    pub const NAME: &'static str = "first-open";
}

impl Strategy for FirstOpen {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn select_move(&mut self, board: &Board) -> Vec<i64> {
        board
            .allowed_moves()
            .first()
            .copied()
            .or_else(|| board.first_empty())
            .map(components)
            .unwrap_or_default()
    }
}

/// Prefers the candidate closest to the centre of the board.
///
/// Candidates are the allowed moves when the adjacency rule is in force,
/// otherwise every empty cell.  Ties keep the earlier candidate.
#[derive(Debug, Default)]
pub struct CenterOut;

impl CenterOut {
    pub const NAME: &'static str = "center-out";
}

impl Strategy for CenterOut {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn select_move(&mut self, board: &Board) -> Vec<i64> {
        // Doubled coordinates keep the centre integral on even boards.
        let centre = board.size() as i64 - 1;
        let distance = |p: &Point| (2 * p.x - centre).pow(2) + (2 * p.y - centre).pow(2);

        let allowed = board.allowed_moves();
        let best = if allowed.is_empty() {
            board.empty_cells().min_by_key(distance)
        } else {
            allowed.into_iter().min_by_key(distance)
        };
        best.map(components).unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
