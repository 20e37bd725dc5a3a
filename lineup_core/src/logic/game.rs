use crate::error::{LineupError, Result};
use crate::logic::board::{Board, BoardParams, Pos, Symbol};
use crate::logic::rules::{evaluate_terminal, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(Symbol),
    Tie,
    /// The player ran out of time and lost.
    Forfeit { loser: Symbol },
}

impl GameStatus {
    pub const fn winner(self) -> Option<Symbol> {
        match self {
            Self::Won(symbol) => Some(symbol),
            Self::Forfeit { loser } => Some(loser.opposite()),
            Self::Playing | Self::Tie => None,
        }
    }

    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub pos: Pos,
    pub symbol: Symbol,
}

/// Turn bookkeeping for one game. X always moves first.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub turn: Symbol,
    pub status: GameStatus,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(BoardParams::tic_tac_toe())
    }
}

impl GameState {
    #[must_use]
    pub fn new(params: BoardParams) -> Self {
        Self {
            board: Board::new(params),
            turn: Symbol::X,
            status: GameStatus::Playing,
            history: Vec::new(),
        }
    }

    pub fn make_move(&mut self, pos: Pos) -> Result<()> {
        if self.status.is_over() {
            return Err(LineupError::GameOver);
        }

        self.board.place(pos, self.turn)?;
        self.history.push(MoveRecord {
            pos,
            symbol: self.turn,
        });
        self.turn = self.turn.opposite();
        self.update_status();

        Ok(())
    }

    fn update_status(&mut self) {
        self.status = match evaluate_terminal(&self.board) {
            Outcome::Win(symbol) => GameStatus::Won(symbol),
            Outcome::Tie => GameStatus::Tie,
            Outcome::Ongoing => GameStatus::Playing,
        };
    }

    /// The side to move loses on time.
    pub fn forfeit(&mut self) {
        if !self.status.is_over() {
            self.status = GameStatus::Forfeit { loser: self.turn };
        }
    }

    pub fn undo_move(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };
        // Recorded moves were placed in bounds.
        let idx = self.board.params().index_of(record.pos);
        self.board.clear_index(idx);
        self.turn = record.symbol;
        self.update_status();
        true
    }

    /// Clears the board (blocks are re-applied) and starts over with X.
    pub fn reset(&mut self) {
        self.board.reset();
        self.turn = Symbol::X;
        self.status = GameStatus::Playing;
        self.history.clear();
    }

    pub fn last_move(&self) -> Option<Pos> {
        self.history.last().map(|r| r.pos)
    }
}
