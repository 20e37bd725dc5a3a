use crate::logic::board::{Board, Symbol};
use crate::logic::lines::{runs, Line};
use serde::{Deserialize, Serialize};

/// Verdict of the terminal detector for one board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Symbol),
    Tie,
    Ongoing,
}

impl Outcome {
    /// Exact score of a finished game: -1 for X, 1 for O, 0 for a tie.
    pub const fn score(self) -> Option<f64> {
        match self {
            Self::Win(Symbol::X) => Some(-1.0),
            Self::Win(Symbol::O) => Some(1.0),
            Self::Tie => Some(0.0),
            Self::Ongoing => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::Win(symbol) => Self::Win(symbol.opposite()),
            other => other,
        }
    }
}

/// Symbol owning `win_length` contiguous cells on `line`, if any.
///
/// A run is broken by an empty cell, a blocked cell or the other symbol.
pub fn winner_on_line(board: &Board, line: &Line) -> Option<Symbol> {
    let needed = board.win_length() as usize;
    if line.len() < needed {
        return None;
    }
    runs(board.line_cells(line))
        .find(|&(cell, len)| len >= needed && cell.symbol().is_some())
        .and_then(|(cell, _)| cell.symbol())
}

/// Scans every line of the board, stopping at the first win.
pub fn evaluate_terminal(board: &Board) -> Outcome {
    match board
        .lines()
        .iter()
        .find_map(|line| winner_on_line(board, line))
    {
        Some(symbol) => Outcome::Win(symbol),
        None if board.is_full() => Outcome::Tie,
        None => Outcome::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{BoardParams, Pos};

    fn play(size: u8, win_length: u8, blocked: &[&str], moves: &[(&str, Symbol)]) -> Board {
        let blocked = blocked.iter().map(|b| Pos::parse(b).unwrap());
        let mut board = Board::new(BoardParams::new(size, win_length, blocked).unwrap());
        for (label, symbol) in moves {
            board.place(Pos::parse(label).unwrap(), *symbol).unwrap();
        }
        board
    }

    use Symbol::{O, X};

    #[test]
    fn test_empty_board_is_ongoing() {
        assert_eq!(evaluate_terminal(&Board::default()), Outcome::Ongoing);
    }

    #[test]
    fn test_single_center_stone_is_ongoing() {
        let board = play(3, 3, &[], &[("B1", X)]);
        assert_eq!(evaluate_terminal(&board), Outcome::Ongoing);
    }

    #[test]
    fn test_row_column_and_diagonal_wins() {
        let row = play(3, 3, &[], &[("A1", X), ("B1", X), ("C1", X)]);
        assert_eq!(evaluate_terminal(&row), Outcome::Win(X));

        let col = play(3, 3, &[], &[("C0", O), ("C1", O), ("C2", O)]);
        assert_eq!(evaluate_terminal(&col), Outcome::Win(O));

        let main = play(3, 3, &[], &[("A0", O), ("B1", O), ("C2", O)]);
        assert_eq!(evaluate_terminal(&main), Outcome::Win(O));

        let anti = play(3, 3, &[], &[("A2", X), ("B1", X), ("C0", X)]);
        assert_eq!(evaluate_terminal(&anti), Outcome::Win(X));
    }

    #[test]
    fn test_short_diagonal_win_on_large_board() {
        let board = play(6, 3, &[], &[("D0", O), ("E1", O), ("F2", O)]);
        assert_eq!(evaluate_terminal(&board), Outcome::Win(O));

        let board = play(6, 3, &[], &[("A2", X), ("B1", X), ("C0", X)]);
        assert_eq!(evaluate_terminal(&board), Outcome::Win(X));
    }

    #[test]
    fn test_run_must_be_contiguous() {
        // X . X X on a row of four needs three in a row: not a win.
        let gap = play(4, 3, &[], &[("A0", X), ("C0", X), ("D0", X)]);
        assert_eq!(evaluate_terminal(&gap), Outcome::Ongoing);

        let blocked = play(4, 3, &["B0"], &[("A0", X), ("C0", X), ("D0", X)]);
        assert_eq!(evaluate_terminal(&blocked), Outcome::Ongoing);

        let mixed = play(4, 3, &[], &[("A0", X), ("B0", O), ("C0", X), ("D0", X)]);
        assert_eq!(evaluate_terminal(&mixed), Outcome::Ongoing);

        let win = play(4, 3, &["A0"], &[("B0", X), ("C0", X), ("D0", X)]);
        assert_eq!(evaluate_terminal(&win), Outcome::Win(X));
    }

    #[test]
    fn test_full_board_tie() {
        // X O X
        // X O O
        // O X X
        let board = play(
            3,
            3,
            &[],
            &[
                ("A0", X),
                ("B0", O),
                ("C0", X),
                ("A1", X),
                ("B1", O),
                ("C1", O),
                ("A2", O),
                ("B2", X),
                ("C2", X),
            ],
        );
        assert!(board.is_full());
        assert_eq!(evaluate_terminal(&board), Outcome::Tie);
    }

    #[test]
    fn test_full_board_with_win_is_win() {
        let board = play(
            3,
            3,
            &["C2"],
            &[
                ("A0", X),
                ("B0", O),
                ("C0", X),
                ("A1", O),
                ("B1", X),
                ("C1", O),
                ("A2", X),
                ("B2", O),
            ],
        );
        assert!(board.is_full());
        assert_eq!(evaluate_terminal(&board), Outcome::Win(X));
    }

    #[test]
    fn test_outcome_scores() {
        assert_eq!(Outcome::Win(X).score(), Some(-1.0));
        assert_eq!(Outcome::Win(O).score(), Some(1.0));
        assert_eq!(Outcome::Tie.score(), Some(0.0));
        assert_eq!(Outcome::Ongoing.score(), None);
        assert_eq!(Outcome::Win(X).swapped(), Outcome::Win(O));
        assert_eq!(Outcome::Tie.swapped(), Outcome::Tie);
    }
}
