use crate::error::{LineupError, Result};
use crate::logic::lines::{enumerate_lines, Line};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const MIN_SIZE: u8 = 3;
pub const MAX_SIZE: u8 = 10;
pub const MAX_CELLS: usize = MAX_SIZE as usize * MAX_SIZE as usize;

/// One bit per cell, indexed like the grid (`y * size + x`).
pub type Bitboard = u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// O maximizes the score, X minimizes it.
    pub const fn is_maximizer(self) -> bool {
        matches!(self, Self::O)
    }

    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
    Blocked,
}

impl Cell {
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::X => Some(Symbol::X),
            Self::O => Some(Symbol::O),
            Self::Empty | Self::Blocked => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::X => 'X',
            Self::O => 'O',
            Self::Blocked => '*',
        }
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Self::X,
            Symbol::O => Self::O,
        }
    }
}

/// Board coordinate: `x` is the column (rendered as a letter), `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Parses a column letter followed by a row digit, e.g. `"B2"` is `(1, 2)`.
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = || LineupError::InvalidCoordinate(label.to_string());
        let mut chars = label.trim().chars();
        let (Some(col), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let col = col.to_ascii_uppercase();
        if !('A'..='J').contains(&col) {
            return Err(invalid());
        }
        let y = row.to_digit(10).ok_or_else(invalid)?;

        #[allow(clippy::cast_possible_truncation)]
        let pos = Self::new(col as u8 - b'A', y as u8);
        Ok(pos)
    }
}

impl FromStr for Pos {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'A' + self.x), self.y)
    }
}

/// Fixed parameters of one game: board size, winning run length and the
/// pre-blocked cells. Only constructible through [`BoardParams::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardParams {
    size: u8,
    win_length: u8,
    blocked: Vec<Pos>,
}

impl BoardParams {
    pub fn new(size: u8, win_length: u8, blocked: impl IntoIterator<Item = Pos>) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(LineupError::InvalidBoardSize(size));
        }
        if !(MIN_SIZE..=size).contains(&win_length) {
            return Err(LineupError::InvalidWinLength { size, win_length });
        }

        let mut cells: Vec<Pos> = Vec::new();
        for pos in blocked {
            if pos.x >= size || pos.y >= size {
                return Err(LineupError::OutOfBounds { x: pos.x, y: pos.y });
            }
            if !cells.contains(&pos) {
                cells.push(pos);
            }
        }

        let max = 2 * size as usize;
        if cells.len() > max {
            return Err(LineupError::TooManyBlocks {
                count: cells.len(),
                max,
            });
        }

        Ok(Self {
            size,
            win_length,
            blocked: cells,
        })
    }

    /// Classic 3x3 tic-tac-toe.
    #[must_use]
    pub const fn tic_tac_toe() -> Self {
        Self {
            size: 3,
            win_length: 3,
            blocked: Vec::new(),
        }
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    pub const fn win_length(&self) -> u8 {
        self.win_length
    }

    pub fn blocked(&self) -> &[Pos] {
        &self.blocked
    }

    pub const fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Diagonals per direction that are long enough to hold a winning run.
    pub const fn max_diagonals(&self) -> usize {
        2 * self.size as usize - 1 - 2 * (self.win_length as usize - 1)
    }

    pub const fn contains(&self, pos: Pos) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    pub const fn index_of(&self, pos: Pos) -> usize {
        pos.y as usize * self.size as usize + pos.x as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn pos_of(&self, index: usize) -> Pos {
        let size = self.size as usize;
        Pos::new((index % size) as u8, (index / size) as u8)
    }
}

/// Canonical, hashable encoding of the full board contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardKey {
    size: u8,
    win_length: u8,
    x: Bitboard,
    o: Bitboard,
    blocked: Bitboard,
}

#[derive(Debug, Clone)]
pub struct Board {
    params: Arc<BoardParams>,
    // Geometry never changes once params are fixed; clones share it.
    lines: Arc<[Line]>,
    // Mailbox, only the first `size * size` entries are used.
    grid: [Cell; MAX_CELLS],
    x_stones: Bitboard,
    o_stones: Bitboard,
    blocked: Bitboard,
    empty: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardParams::tic_tac_toe())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.grid == other.grid
    }
}

impl Eq for Board {}

impl Board {
    #[must_use]
    pub fn new(params: BoardParams) -> Self {
        let lines: Arc<[Line]> = enumerate_lines(&params).into();
        let mut board = Self {
            params: Arc::new(params),
            lines,
            grid: [Cell::Empty; MAX_CELLS],
            x_stones: 0,
            o_stones: 0,
            blocked: 0,
            empty: 0,
        };
        board.reset();
        board
    }

    /// Removes every stone and re-applies the blocked cells.
    pub fn reset(&mut self) {
        self.grid = [Cell::Empty; MAX_CELLS];
        self.x_stones = 0;
        self.o_stones = 0;
        self.blocked = 0;
        self.empty = self.params.cell_count();

        let params = Arc::clone(&self.params);
        for &pos in params.blocked() {
            let idx = params.index_of(pos);
            self.grid[idx] = Cell::Blocked;
            self.blocked |= 1u128 << idx;
            self.empty -= 1;
        }
    }

    pub fn params(&self) -> &BoardParams {
        &self.params
    }

    pub fn size(&self) -> u8 {
        self.params.size
    }

    pub fn win_length(&self) -> u8 {
        self.params.win_length
    }

    pub fn cell_count(&self) -> usize {
        self.params.cell_count()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.params.contains(pos)
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.in_bounds(pos)
            .then(|| self.grid[self.params.index_of(pos)])
    }

    /// Cell at a grid index as stored in [`Line::indices`].
    pub fn cell_at(&self, index: usize) -> Cell {
        self.grid[index]
    }

    pub fn line_cells<'a>(&'a self, line: &'a Line) -> impl Iterator<Item = Cell> + 'a {
        line.indices().iter().map(move |&idx| self.grid[idx])
    }

    /// True iff `pos` is on the board and Empty.
    pub fn is_valid(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    pub fn place(&mut self, pos: Pos, symbol: Symbol) -> Result<()> {
        match self.get(pos) {
            None => Err(LineupError::OutOfBounds { x: pos.x, y: pos.y }),
            Some(Cell::Empty) => {
                self.place_index(self.params.index_of(pos), symbol);
                Ok(())
            }
            Some(_) => Err(LineupError::CellOccupied(pos)),
        }
    }

    /// Removes a stone. Empty and blocked cells are left untouched.
    pub fn clear(&mut self, pos: Pos) -> Result<()> {
        if !self.in_bounds(pos) {
            return Err(LineupError::OutOfBounds { x: pos.x, y: pos.y });
        }
        self.clear_index(self.params.index_of(pos));
        Ok(())
    }

    pub(crate) fn place_index(&mut self, idx: usize, symbol: Symbol) {
        debug_assert_eq!(self.grid[idx], Cell::Empty, "placing on a non-empty cell");
        let bit = 1u128 << idx;
        match symbol {
            Symbol::X => self.x_stones |= bit,
            Symbol::O => self.o_stones |= bit,
        }
        self.grid[idx] = Cell::from(symbol);
        self.empty -= 1;
    }

    pub(crate) fn clear_index(&mut self, idx: usize) {
        let bit = 1u128 << idx;
        match self.grid[idx] {
            Cell::X => self.x_stones &= !bit,
            Cell::O => self.o_stones &= !bit,
            Cell::Empty | Cell::Blocked => return,
        }
        self.grid[idx] = Cell::Empty;
        self.empty += 1;
    }

    pub const fn is_full(&self) -> bool {
        self.empty == 0
    }

    pub const fn empty_count(&self) -> usize {
        self.empty
    }

    pub const fn stone_count(&self) -> u32 {
        self.x_stones.count_ones() + self.o_stones.count_ones()
    }

    /// Empty cells in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cell_count())
            .filter(|&idx| self.grid[idx] == Cell::Empty)
            .map(|idx| self.params.pos_of(idx))
    }

    pub fn key(&self) -> BoardKey {
        BoardKey {
            size: self.params.size,
            win_length: self.params.win_length,
            x: self.x_stones,
            o: self.o_stones,
            blocked: self.blocked,
        }
    }

    /// Same board with every X turned into O and vice versa.
    #[must_use]
    pub fn with_symbols_swapped(&self) -> Self {
        let mut swapped = self.clone();
        for cell in &mut swapped.grid {
            *cell = match *cell {
                Cell::X => Cell::O,
                Cell::O => Cell::X,
                other => other,
            };
        }
        std::mem::swap(&mut swapped.x_stones, &mut swapped.o_stones);
        swapped
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.params.size;
        let letters: String = (0..size).map(|x| char::from(b'A' + x)).collect();
        writeln!(f, "  {letters}")?;
        writeln!(f, " +{}", "-".repeat(size as usize))?;
        for y in 0..size {
            write!(f, "{y}|")?;
            for x in 0..size {
                write!(f, "{}", self.grid[self.params.index_of(Pos::new(x, y))].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
