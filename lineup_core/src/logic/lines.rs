use crate::logic::board::{BoardParams, Cell};
use std::iter::Peekable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Row,
    Column,
    /// Top-left to bottom-right (x and y both increase).
    MainDiagonal,
    /// Bottom-left to top-right (x increases, y decreases).
    AntiDiagonal,
}

/// A maximal straight segment of the board long enough to hold a win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: usize,
    orientation: Orientation,
    cells: Vec<usize>,
}

impl Line {
    /// Stable index of this line within [`enumerate_lines`] output.
    pub const fn id(&self) -> usize {
        self.id
    }

    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Grid indices (`y * size + x`) in walking order.
    pub fn indices(&self) -> &[usize] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Every row, column and diagonal of the board that can contain a winning run.
///
/// Rows and columns always span the board. For each diagonal direction only the
/// `params.max_diagonals()` diagonals with at least `win_length` cells are
/// produced, shorter ones can never be won on.
pub fn enumerate_lines(params: &BoardParams) -> Vec<Line> {
    let n = params.size() as usize;
    let s = params.win_length() as usize;
    let diagonals = params.max_diagonals();

    let mut lines = Vec::with_capacity(2 * n + 2 * diagonals);
    let mut push = |orientation, cells: Vec<usize>| {
        debug_assert!(cells.len() >= s);
        let id = lines.len();
        lines.push(Line {
            id,
            orientation,
            cells,
        });
    };

    for y in 0..n {
        push(Orientation::Row, (0..n).map(|x| y * n + x).collect());
    }
    for x in 0..n {
        push(Orientation::Column, (0..n).map(|y| y * n + x).collect());
    }

    // x - y ranges over -(n - s)..=(n - s)
    let reach = n - s;
    for offset in 0..diagonals {
        let (mut x, mut y) = if offset >= reach {
            (offset - reach, 0)
        } else {
            (0, reach - offset)
        };
        let mut cells = Vec::with_capacity(n);
        while x < n && y < n {
            cells.push(y * n + x);
            x += 1;
            y += 1;
        }
        push(Orientation::MainDiagonal, cells);
    }

    // x + y ranges over (s - 1)..=(2n - 1 - s)
    for offset in 0..diagonals {
        let sum = s - 1 + offset;
        let (mut x, mut y) = if sum < n { (0, sum) } else { (sum - (n - 1), n - 1) };
        let mut cells = Vec::with_capacity(n);
        loop {
            cells.push(y * n + x);
            if y == 0 || x + 1 == n {
                break;
            }
            x += 1;
            y -= 1;
        }
        push(Orientation::AntiDiagonal, cells);
    }

    lines
}

/// Maximal runs of identical cells, as `(cell, run length)`.
pub struct Runs<I: Iterator<Item = Cell>> {
    cells: Peekable<I>,
}

impl<I: Iterator<Item = Cell>> Iterator for Runs<I> {
    type Item = (Cell, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cells.next()?;
        let mut len = 1;
        while self.cells.next_if_eq(&cell).is_some() {
            len += 1;
        }
        Some((cell, len))
    }
}

pub fn runs<I: IntoIterator<Item = Cell>>(cells: I) -> Runs<I::IntoIter> {
    Runs {
        cells: cells.into_iter().peekable(),
    }
}
