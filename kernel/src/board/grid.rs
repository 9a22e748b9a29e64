//! `Grid`: the immutable 4×4 sliding-tile arrangement.
//!
//! # Layout
//!
//! Sixteen cells stored row-major as `u8` tile values. Value `0` is the blank.
//! Every value in `0..=15` appears exactly once; the only way to obtain a
//! `Grid` is through a validating constructor ([`Grid::from_tiles`],
//! [`Grid::from_rows`], [`Grid::parse_csv`]) or through [`Grid::apply_move`]
//! on an existing grid, so the permutation invariant always holds.
//!
//! # Moves
//!
//! A [`Direction`] names the way the **blank** travels. Moving the blank
//! `Right` swaps it with the tile to its right, which visually slides that
//! tile left.

use std::fmt;

/// Side length of the board.
pub const SIDE: usize = 4;

/// Number of cells on the board.
pub const CELLS: usize = SIDE * SIDE;

/// Largest tile value (the blank is `0`).
pub const MAX_TILE: u8 = 15;

/// A cell coordinate. Both components are in `[0, 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Construct a position. Returns `None` if either component is off the board.
    #[must_use]
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if usize::from(row) < SIDE && usize::from(col) < SIDE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row-major cell index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.row) * SIDE + usize::from(self.col)
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELLS {
            return None;
        }
        let row = u8::try_from(index / SIDE).ok()?;
        let col = u8::try_from(index % SIDE).ok()?;
        Some(Self { row, col })
    }

    /// The neighboring position one step in `direction`, if it stays on the board.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction the blank travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed expansion order. This order is part of the trace contract:
    /// changing it changes state ids and tie-breaks.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// `(row, col)` offset of one step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Stable lowercase name (used in traces and CLI output).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a name produced by [`Direction::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legal blank move: the direction and the cell the blank moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborMove {
    pub direction: Direction,
    pub target: Position,
}

/// Legal blank moves from `blank`, in the fixed order up, down, left, right.
pub fn neighbor_moves(blank: Position) -> impl Iterator<Item = NeighborMove> {
    Direction::ALL.into_iter().filter_map(move |direction| {
        blank
            .step(direction)
            .map(|target| NeighborMove { direction, target })
    })
}

/// Collision-free, order-preserving grid encoding for visited-set membership.
///
/// Sixteen 4-bit tile values packed row-major, first cell in the most
/// significant nibble. Two grids have equal keys iff their cells are equal,
/// and key order equals lexicographic order of the row-major tile sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey(u64);

impl GridKey {
    /// The packed integer.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Lowercase 16-character hex form (one digit per cell).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

/// Typed failure for grid construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Input did not contain exactly 16 cells.
    WrongCellCount { expected: usize, actual: usize },
    /// A cell value was outside `0..=15`.
    OutOfRange { index: usize, value: i64 },
    /// A tile value appeared more than once.
    Duplicate { value: u8 },
    /// Text input could not be parsed as integers.
    Parse { detail: String },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongCellCount { expected, actual } => {
                write!(f, "expected exactly {expected} cells, got {actual}")
            }
            Self::OutOfRange { index, value } => {
                write!(f, "cell {index} has value {value}, must be between 0 and {MAX_TILE}")
            }
            Self::Duplicate { value } => write!(f, "tile {value} appears more than once"),
            Self::Parse { detail } => write!(f, "invalid grid input: {detail}"),
        }
    }
}

impl std::error::Error for GridError {}

/// Immutable 4×4 tile arrangement.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    tiles: [u8; CELLS],
}

impl Grid {
    /// The solved configuration: 1..=15 row-major, blank last.
    #[must_use]
    pub const fn goal() -> Self {
        Self {
            tiles: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0],
        }
    }

    /// Build from a row-major cell list.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the list is not a permutation of `0..=15`.
    pub fn from_tiles(cells: &[i64]) -> Result<Self, GridError> {
        if cells.len() != CELLS {
            return Err(GridError::WrongCellCount {
                expected: CELLS,
                actual: cells.len(),
            });
        }
        let mut tiles = [0u8; CELLS];
        let mut seen = [false; CELLS];
        for (index, &value) in cells.iter().enumerate() {
            let tile = u8::try_from(value)
                .ok()
                .filter(|t| *t <= MAX_TILE)
                .ok_or(GridError::OutOfRange { index, value })?;
            if std::mem::replace(&mut seen[usize::from(tile)], true) {
                return Err(GridError::Duplicate { value: tile });
            }
            tiles[index] = tile;
        }
        Ok(Self { tiles })
    }

    /// Build from four rows of four cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the rows are not a permutation of `0..=15`.
    pub fn from_rows(rows: [[u8; SIDE]; SIDE]) -> Result<Self, GridError> {
        let cells: Vec<i64> = rows.iter().flatten().map(|&t| i64::from(t)).collect();
        Self::from_tiles(&cells)
    }

    /// Parse 16 comma-separated integers. Whitespace anywhere is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Parse`] for non-integer fields, or any
    /// validation error from [`Grid::from_tiles`].
    pub fn parse_csv(input: &str) -> Result<Self, GridError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let cells = compact
            .split(',')
            .map(|field| {
                field.parse::<i64>().map_err(|e| GridError::Parse {
                    detail: format!("{field:?}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tiles(&cells)
    }

    /// Row-major tile values.
    #[must_use]
    pub const fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    /// The grid as four rows.
    #[must_use]
    pub fn rows(&self) -> [[u8; SIDE]; SIDE] {
        let mut rows = [[0u8; SIDE]; SIDE];
        for (i, &tile) in self.tiles.iter().enumerate() {
            rows[i / SIDE][i % SIDE] = tile;
        }
        rows
    }

    /// Tile value at `pos`.
    #[must_use]
    pub fn tile_at(&self, pos: Position) -> u8 {
        self.tiles[pos.index()]
    }

    /// Cell-wise equality with the goal grid.
    #[must_use]
    pub fn is_goal(&self) -> bool {
        *self == Self::goal()
    }

    /// Locate the blank. `None` means the permutation invariant was broken.
    #[must_use]
    pub fn find_blank(&self) -> Option<Position> {
        self.tiles
            .iter()
            .position(|&t| t == 0)
            .and_then(Position::from_index)
    }

    /// Swap the blank at `blank` with the tile at `target`.
    ///
    /// Returns the new grid and the value of the tile that moved. `self` is
    /// left untouched. Callers must pass the actual blank position and an
    /// orthogonally adjacent `target` (as produced by [`neighbor_moves`]).
    #[must_use]
    pub fn apply_move(&self, blank: Position, target: Position) -> (Self, u8) {
        debug_assert_eq!(self.tile_at(blank), 0, "apply_move: {blank} is not the blank");
        debug_assert_eq!(blank.distance(target), 1, "apply_move: {target} not adjacent");
        let mut tiles = self.tiles;
        let moved = tiles[target.index()];
        tiles.swap(blank.index(), target.index());
        (Self { tiles }, moved)
    }

    /// Canonical visited-set key.
    #[must_use]
    pub fn canonical_key(&self) -> GridKey {
        GridKey(
            self.tiles
                .iter()
                .fold(0u64, |acc, &t| (acc << 4) | u64::from(t)),
        )
    }

    /// Canonical JSON form: four arrays of four integers.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.rows()
                .iter()
                .map(|row| serde_json::json!(row))
                .collect(),
        )
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|&t| if t == 0 { " .".to_string() } else { format!("{t:>2}") })
                .collect();
            f.write_str(&line.join(" "))?;
        }
        Ok(())
    }
}
