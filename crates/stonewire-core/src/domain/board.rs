//! Game board domain entity.
//!
//! The board is a square grid addressed with Cartesian coordinates: `(0, 0)`
//! is the bottom-left corner and `(size - 1, size - 1)` is the top-right.
//! Internally cells are stored row-major with the top row first, so every
//! public operation goes through [`Board::transform`] before touching storage.
//!
//! # The adjacency rule (for beginners)
//!
//! Once the opponent has moved, the local player must place a stone on one of
//! the (up to eight) cells surrounding the opponent's most recent stone.  If
//! every one of those cells is already taken, the constraint is lifted and any
//! empty cell is acceptable.  The opponent's moves are never validated here:
//! the server is the referee for those.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::trace;

/// Largest accepted board width.  Bigger boards are refused before any
/// storage is allocated.
pub const MAX_BOARD_SIZE: usize = 1024;

/// Compass offsets in the order N, NE, E, SE, S, SW, W, NW.
const COMPASS: [(i64, i64); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// The state of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    White,
    Black,
}

impl Stone {
    /// Returns the complementary colour.  `Empty` has no opponent and maps to itself.
    pub fn opponent(self) -> Stone {
        match self {
            Stone::White => Stone::Black,
            Stone::Black => Stone::White,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Returns `true` for `White` and `Black`.
    pub fn is_color(self) -> bool {
        !matches!(self, Stone::Empty)
    }

    /// Lower-case wire name (`"white"`, `"black"`, `"empty"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Stone::Empty => "empty",
            Stone::White => "white",
            Stone::Black => "black",
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stone {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Stone::White),
            "black" => Ok(Stone::Black),
            "empty" => Ok(Stone::Empty),
            other => Err(BoardError::InvalidStone(format!(
                "`{other}` must be one of: white, black"
            ))),
        }
    }
}

/// A coordinate in the public bottom-left-origin frame.
///
/// Components are signed so that callers can express (and be told about)
/// off-board positions such as `(-1, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    /// The target cell already holds a stone.
    Occupied(Stone),
    /// The target is not next to the opponent's last move while empty
    /// neighbours of that move still exist.
    NotAdjacent { last: Point, allowed: Vec<Point> },
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::Occupied(stone) => write!(f, "space already taken with {stone}"),
            MoveRejection::NotAdjacent { last, allowed } => {
                write!(f, "must be adjacent to {last}, allowed moves: ")?;
                for (i, p) in allowed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
        }
    }
}

/// Errors raised by [`Board`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A coordinate lies outside `[0, size)`.
    #[error("{point} is out of bounds, board is {size}x{size}")]
    OutOfBounds { point: Point, size: usize },

    /// A stone value that is not white or black was used where a colour is required.
    #[error("invalid stone or player {0}")]
    InvalidStone(String),

    /// The placement breaks the occupancy or adjacency rule.
    #[error("move {point} rejected: {reason}")]
    InvalidMove { point: Point, reason: MoveRejection },

    /// The board must be between 1x1 and `MAX_BOARD_SIZE` square.
    #[error("invalid board size {0}, must be between 1 and {max}", max = MAX_BOARD_SIZE)]
    InvalidSize(usize),
}

impl BoardError {
    /// The adjacency-constrained set carried by a `NotAdjacent` rejection, if any.
    pub fn allowed_moves(&self) -> Option<&[Point]> {
        match self {
            BoardError::InvalidMove {
                reason: MoveRejection::NotAdjacent { allowed, .. },
                ..
            } => Some(allowed),
            _ => None,
        }
    }
}

/// Characters used by [`Board::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolMap {
    pub empty: char,
    pub white: char,
    pub black: char,
}

impl SymbolMap {
    fn symbol(&self, stone: Stone) -> char {
        match stone {
            Stone::Empty => self.empty,
            Stone::White => self.white,
            Stone::Black => self.black,
        }
    }
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self {
            empty: 'E',
            white: 'W',
            black: 'B',
        }
    }
}

/// The square game board for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    player: Stone,
    /// Row-major, top row first.
    grid: Vec<Stone>,
    last_opponent_move: Option<Point>,
}

impl Board {
    /// Creates an empty `size`×`size` board for a player holding `player` stones.
    ///
    /// # Errors
    ///
    /// - [`BoardError::InvalidStone`] if `player` is `Stone::Empty`.
    /// - [`BoardError::InvalidSize`] if `size` is zero or above [`MAX_BOARD_SIZE`].
    pub fn new(player: Stone, size: usize) -> Result<Self, BoardError> {
        if !player.is_color() {
            return Err(BoardError::InvalidStone(format!(
                "`{player}` must be one of: white, black"
            )));
        }
        let cells = match size.checked_mul(size) {
            Some(cells) if (1..=MAX_BOARD_SIZE).contains(&size) => cells,
            _ => return Err(BoardError::InvalidSize(size)),
        };
        Ok(Self {
            size,
            player,
            grid: vec![Stone::Empty; cells],
            last_opponent_move: None,
        })
    }

    /// Width (and height) of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The local player's colour.
    pub fn player(&self) -> Stone {
        self.player
    }

    /// The opponent's colour.
    pub fn opponent(&self) -> Stone {
        self.player.opponent()
    }

    /// The opponent's most recent move, or `None` before the opponent has moved.
    pub fn last_opponent_move(&self) -> Option<Point> {
        self.last_opponent_move
    }

    /// Returns the stone at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if either coordinate is outside the board.
    pub fn get(&self, x: i64, y: i64) -> Result<Stone, BoardError> {
        let idx = self.index(Point::new(x, y))?;
        Ok(self.grid[idx])
    }

    /// Records the opponent's move.  Only bounds are checked.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if the move is off the board.
    pub fn record_opponent_move(&mut self, x: i64, y: i64) -> Result<(), BoardError> {
        let point = Point::new(x, y);
        let idx = self.index(point)?;
        self.grid[idx] = self.opponent();
        self.last_opponent_move = Some(point);
        trace!("opponent stone recorded at {point}");
        Ok(())
    }

    /// Places one of the local player's stones after enforcing the move rules.
    ///
    /// # Errors
    ///
    /// - [`BoardError::OutOfBounds`] if the move is off the board.
    /// - [`BoardError::InvalidMove`] if the cell is taken or the adjacency rule is broken.
    pub fn apply_player_move(&mut self, x: i64, y: i64) -> Result<(), BoardError> {
        self.set(x, y, self.player)
    }

    /// Places `stone` at `(x, y)` under the same rules as [`Board::apply_player_move`].
    ///
    /// # Errors
    ///
    /// As [`Board::apply_player_move`], plus [`BoardError::InvalidStone`] if
    /// `stone` is `Stone::Empty`.
    pub fn set(&mut self, x: i64, y: i64, stone: Stone) -> Result<(), BoardError> {
        let point = Point::new(x, y);
        let idx = self.index(point)?;
        if !stone.is_color() {
            return Err(BoardError::InvalidStone(format!(
                "`{stone}` must be one of: white, black"
            )));
        }
        self.check_move(point, idx)?;
        self.grid[idx] = stone;
        trace!("{stone} stone placed at {point}");
        Ok(())
    }

    /// Returns the in-bounds neighbours of `(x, y)` in N, NE, E, SE, S, SW, W, NW order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if `(x, y)` itself is off the board.
    pub fn adjacent(&self, x: i64, y: i64) -> Result<Vec<Point>, BoardError> {
        self.index(Point::new(x, y))?;
        Ok(self.neighbours(Point::new(x, y)))
    }

    /// The cells the next local move is restricted to.
    ///
    /// Empty when no restriction is in force, i.e. before the opponent's first
    /// move or when every neighbour of the opponent's last move is occupied.
    pub fn allowed_moves(&self) -> Vec<Point> {
        match self.last_opponent_move {
            Some(last) => self
                .neighbours(last)
                .into_iter()
                .filter(|p| self.stone_at(*p) == Stone::Empty)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Iterates over every empty cell, x ascending then y ascending.
    pub fn empty_cells(&self) -> impl Iterator<Item = Point> + '_ {
        let n = self.size;
        // Columns left to right, each walked from the bottom row up.
        (0..n)
            .flat_map(move |col| (0..n).rev().map(move |row| (row, col)))
            .filter(move |&(row, col)| self.grid[row * n + col] == Stone::Empty)
            .map(move |(row, col)| self.untransform(row, col))
    }

    /// The first empty cell in scan order, or `None` on a full board.
    pub fn first_empty(&self) -> Option<Point> {
        self.empty_cells().next()
    }

    /// Returns `true` when no empty cell is left.
    pub fn is_full(&self) -> bool {
        self.grid.iter().all(|s| s.is_color())
    }

    /// Renders the grid top row first, one symbol per cell separated by spaces.
    pub fn dump(&self, symbols: &SymbolMap) -> String {
        let mut out = String::with_capacity(self.size * self.size * 2);
        for row in self.grid.chunks(self.size) {
            let line: Vec<String> = row.iter().map(|s| symbols.symbol(*s).to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    // ── Private helpers ──────────────────────────────────────────────────────

    fn in_bounds(&self, p: Point) -> bool {
        let n = self.size as i64;
        (0..n).contains(&p.x) && (0..n).contains(&p.y)
    }

    /// Maps a public point to `(row, col)` in storage.
    fn transform(&self, p: Point) -> (usize, usize) {
        (self.size - 1 - p.y as usize, p.x as usize)
    }

    /// Inverse of [`Board::transform`].
    fn untransform(&self, row: usize, col: usize) -> Point {
        Point::new(col as i64, (self.size - 1 - row) as i64)
    }

    fn index(&self, p: Point) -> Result<usize, BoardError> {
        if !self.in_bounds(p) {
            return Err(BoardError::OutOfBounds {
                point: p,
                size: self.size,
            });
        }
        let (row, col) = self.transform(p);
        Ok(row * self.size + col)
    }

    /// Caller guarantees `p` is in bounds.
    fn stone_at(&self, p: Point) -> Stone {
        let (row, col) = self.transform(p);
        self.grid[row * self.size + col]
    }

    fn neighbours(&self, p: Point) -> Vec<Point> {
        COMPASS
            .iter()
            .map(|(dx, dy)| Point::new(p.x + dx, p.y + dy))
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    fn check_move(&self, point: Point, idx: usize) -> Result<(), BoardError> {
        let current = self.grid[idx];
        if current != Stone::Empty {
            return Err(BoardError::InvalidMove {
                point,
                reason: MoveRejection::Occupied(current),
            });
        }

        if let Some(last) = self.last_opponent_move {
            let allowed = self.allowed_moves();
            if !allowed.is_empty() && !allowed.contains(&point) {
                return Err(BoardError::InvalidMove {
                    point,
                    reason: MoveRejection::NotAdjacent { last, allowed },
                });
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: usize) -> Board {
        Board::new(Stone::White, size).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_board_is_empty_for_every_size() {
        for size in 1..=12 {
            let b = board(size);
            for x in 0..size as i64 {
                for y in 0..size as i64 {
                    assert_eq!(b.get(x, y).unwrap(), Stone::Empty, "({x},{y}) on {size}");
                }
            }
        }
    }

    #[test]
    fn test_new_rejects_empty_player_color() {
        let err = Board::new(Stone::Empty, 10).unwrap_err();
        assert!(matches!(err, BoardError::InvalidStone(_)));
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(Board::new(Stone::Black, 0).unwrap_err(), BoardError::InvalidSize(0));
    }

    #[test]
    fn test_new_accepts_largest_size() {
        let b = board(MAX_BOARD_SIZE);
        assert_eq!(b.size(), MAX_BOARD_SIZE);
        assert_eq!(b.first_empty(), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_new_rejects_oversized_boards_without_allocating() {
        for size in [MAX_BOARD_SIZE + 1, 100_000, u32::MAX as usize, usize::MAX] {
            assert_eq!(
                Board::new(Stone::White, size).unwrap_err(),
                BoardError::InvalidSize(size),
                "{size}"
            );
        }
    }

    #[test]
    fn test_opponent_is_complementary() {
        assert_eq!(Board::new(Stone::White, 3).unwrap().opponent(), Stone::Black);
        assert_eq!(Board::new(Stone::Black, 3).unwrap().opponent(), Stone::White);
    }

    #[test]
    fn test_stone_from_str_rejects_unknown_color() {
        assert_eq!("white".parse::<Stone>().unwrap(), Stone::White);
        assert_eq!("black".parse::<Stone>().unwrap(), Stone::Black);
        assert!(matches!("red".parse::<Stone>(), Err(BoardError::InvalidStone(_))));
    }

    // ── bounds ────────────────────────────────────────────────────────────────

    #[test]
    fn test_every_accessor_rejects_out_of_bounds() {
        let mut b = board(20);
        for (x, y) in [(-1, 0), (0, -1), (20, 0), (0, 20), (20, 21), (-5, -5)] {
            assert!(matches!(b.get(x, y), Err(BoardError::OutOfBounds { .. })));
            assert!(matches!(b.adjacent(x, y), Err(BoardError::OutOfBounds { .. })));
            assert!(matches!(
                b.apply_player_move(x, y),
                Err(BoardError::OutOfBounds { .. })
            ));
            assert!(matches!(
                b.record_opponent_move(x, y),
                Err(BoardError::OutOfBounds { .. })
            ));
            assert!(matches!(
                b.set(x, y, Stone::Black),
                Err(BoardError::OutOfBounds { .. })
            ));
        }
        assert_eq!(b.last_opponent_move(), None, "failed records must not update state");
    }

    #[test]
    fn test_out_of_bounds_message_names_board_size() {
        let err = board(20).get(20, 21).unwrap_err();
        assert_eq!(err.to_string(), "(20,21) is out of bounds, board is 20x20");
    }

    // ── placement ─────────────────────────────────────────────────────────────

    #[test]
    fn test_player_move_sets_player_color() {
        let mut b = board(20);
        b.apply_player_move(0, 0).unwrap();
        assert_eq!(b.get(0, 0).unwrap(), Stone::White);
    }

    #[test]
    fn test_opponent_move_sets_opponent_color_and_last_move() {
        let mut b = board(10);
        b.record_opponent_move(3, 4).unwrap();
        assert_eq!(b.get(3, 4).unwrap(), Stone::Black);
        assert_eq!(b.last_opponent_move(), Some(Point::new(3, 4)));
    }

    #[test]
    fn test_second_placement_on_same_cell_is_invalid() {
        let mut b = board(10);
        b.apply_player_move(2, 2).unwrap();
        let err = b.apply_player_move(2, 2).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidMove {
                point: Point::new(2, 2),
                reason: MoveRejection::Occupied(Stone::White),
            }
        );
    }

    #[test]
    fn test_player_move_on_opponent_stone_is_invalid() {
        let mut b = board(10);
        b.record_opponent_move(5, 5).unwrap();
        assert!(matches!(
            b.apply_player_move(5, 5),
            Err(BoardError::InvalidMove {
                reason: MoveRejection::Occupied(Stone::Black),
                ..
            })
        ));
    }

    #[test]
    fn test_set_rejects_empty_stone() {
        let mut b = board(5);
        assert!(matches!(b.set(1, 1, Stone::Empty), Err(BoardError::InvalidStone(_))));
        assert_eq!(b.get(1, 1).unwrap(), Stone::Empty);
    }

    #[test]
    fn test_set_accepts_either_color() {
        let mut b = board(5);
        b.set(0, 0, Stone::Black).unwrap();
        b.set(4, 4, Stone::White).unwrap();
        assert_eq!(b.get(0, 0).unwrap(), Stone::Black);
        assert_eq!(b.get(4, 4).unwrap(), Stone::White);
    }

    // ── coordinate frame ──────────────────────────────────────────────────────

    #[test]
    fn test_origin_is_bottom_left_in_dump() {
        let mut b = board(3);
        b.apply_player_move(0, 0).unwrap();
        b.set(2, 2, Stone::Black).unwrap();
        assert_eq!(b.dump(&SymbolMap::default()), "E E B\nE E E\nW E E\n");
    }

    #[test]
    fn test_dump_uses_caller_symbols() {
        let mut b = board(2);
        b.record_opponent_move(1, 0).unwrap();
        let symbols = SymbolMap {
            empty: '.',
            white: 'o',
            black: 'x',
        };
        assert_eq!(b.dump(&symbols), ". .\n. x\n");
    }

    #[test]
    fn test_transform_and_untransform_are_inverse_bijections() {
        for size in 1..=7usize {
            let b = board(size);
            let mut seen = std::collections::HashSet::new();
            for x in 0..size as i64 {
                for y in 0..size as i64 {
                    let p = Point::new(x, y);
                    let (row, col) = b.transform(p);
                    assert!(row < size && col < size);
                    assert!(seen.insert((row, col)), "transform must be injective");
                    assert_eq!(b.untransform(row, col), p);
                }
            }
            assert_eq!(seen.len(), size * size);
        }
    }

    // ── adjacency ─────────────────────────────────────────────────────────────

    #[test]
    fn test_adjacent_of_interior_cell_in_compass_order() {
        let b = board(10);
        let expected: Vec<Point> = [(5, 6), (6, 6), (6, 5), (6, 4), (5, 4), (4, 4), (4, 5), (4, 6)]
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(b.adjacent(5, 5).unwrap(), expected);
    }

    #[test]
    fn test_adjacent_counts_on_corner_edge_and_interior() {
        let b = board(10);
        assert_eq!(b.adjacent(0, 0).unwrap().len(), 3);
        assert_eq!(b.adjacent(9, 9).unwrap().len(), 3);
        assert_eq!(b.adjacent(0, 5).unwrap().len(), 5);
        assert_eq!(b.adjacent(5, 9).unwrap().len(), 5);
        assert_eq!(b.adjacent(4, 4).unwrap().len(), 8);
    }

    #[test]
    fn test_adjacent_is_in_bounds_and_unique() {
        let b = board(4);
        for x in 0..4 {
            for y in 0..4 {
                let adj = b.adjacent(x, y).unwrap();
                let unique: std::collections::HashSet<_> = adj.iter().collect();
                assert_eq!(unique.len(), adj.len());
                assert!(adj.iter().all(|p| b.get(p.x, p.y).is_ok()));
            }
        }
    }

    #[test]
    fn test_adjacent_on_single_cell_board_is_empty() {
        assert!(board(1).adjacent(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_move_far_from_opponent_is_rejected_with_allowed_set() {
        let mut b = board(10);
        b.record_opponent_move(0, 0).unwrap();

        let err = b.apply_player_move(5, 5).unwrap_err();

        assert_eq!(
            err.allowed_moves().unwrap(),
            &[Point::new(0, 1), Point::new(1, 1), Point::new(1, 0)]
        );
        assert_eq!(b.get(5, 5).unwrap(), Stone::Empty);
    }

    #[test]
    fn test_move_adjacent_to_opponent_is_accepted() {
        let mut b = board(10);
        b.record_opponent_move(0, 0).unwrap();
        b.apply_player_move(1, 1).unwrap();
        assert_eq!(b.get(1, 1).unwrap(), Stone::White);
    }

    #[test]
    fn test_filling_all_neighbours_lifts_the_constraint() {
        let mut b = board(10);
        b.record_opponent_move(0, 0).unwrap();
        b.apply_player_move(0, 1).unwrap();
        b.apply_player_move(1, 1).unwrap();
        b.apply_player_move(1, 0).unwrap();

        assert!(b.allowed_moves().is_empty());
        b.apply_player_move(1, 2).unwrap();
        assert_eq!(b.get(1, 2).unwrap(), Stone::White);
    }

    #[test]
    fn test_constraint_follows_latest_opponent_move() {
        let mut b = board(10);
        b.record_opponent_move(0, 0).unwrap();
        b.apply_player_move(1, 1).unwrap();
        b.record_opponent_move(8, 8).unwrap();

        assert!(b.apply_player_move(0, 1).is_err());
        b.apply_player_move(9, 9).unwrap();
    }

    #[test]
    fn test_first_move_may_go_anywhere() {
        let mut b = board(10);
        assert!(b.allowed_moves().is_empty());
        b.apply_player_move(7, 3).unwrap();
    }

    // ── scanning ──────────────────────────────────────────────────────────────

    #[test]
    fn test_first_empty_scans_columns_from_origin() {
        let mut b = board(3);
        assert_eq!(b.first_empty(), Some(Point::new(0, 0)));
        b.set(0, 0, Stone::White).unwrap();
        b.set(0, 1, Stone::White).unwrap();
        assert_eq!(b.first_empty(), Some(Point::new(0, 2)));
    }

    #[test]
    fn test_first_empty_on_full_board_is_none() {
        let mut b = board(2);
        for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            b.set(x, y, Stone::Black).unwrap();
        }
        assert!(b.is_full());
        assert_eq!(b.first_empty(), None);
    }
}
