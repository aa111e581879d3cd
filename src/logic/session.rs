//! Single-game state machine: InProgress --place--> InProgress | Won | Drawn.

use crate::logic::board::outcome;
use crate::models::{Board, GameOutcome, GameResult, GameWinner, Mark, MoveError, Player, CELL_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One game in progress. X always moves first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    to_move: Mark,
    started_at: DateTime<Utc>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            started_at: Utc::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move next.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn outcome(&self) -> GameOutcome {
        outcome(&self.board)
    }

    /// Place the side-to-move's mark at `index`.
    ///
    /// Out-of-range indices, occupied cells and moves after the game ended
    /// are rejected and leave the session untouched.
    pub fn place(&mut self, index: usize) -> Result<GameOutcome, MoveError> {
        if self.outcome().is_over() {
            return Err(MoveError::GameOver);
        }
        if index >= CELL_COUNT {
            return Err(MoveError::OutOfBounds(index));
        }
        if !self.board[index].is_empty() {
            return Err(MoveError::Occupied(index));
        }
        self.board = self.board.with_mark(index, self.to_move);
        let result = self.outcome();
        if !result.is_over() {
            self.to_move = self.to_move.opponent();
        }
        Ok(result)
    }

    /// Back to an empty board with X to move.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Result of the finished game, `None` while it is still in progress.
    pub fn finish(&self, player_x: &Player, player_o: &Player) -> Option<GameResult> {
        self.finish_at(player_x, player_o, Utc::now())
    }

    /// As [`GameSession::finish`], with an explicit end time.
    pub fn finish_at(
        &self,
        player_x: &Player,
        player_o: &Player,
        ended_at: DateTime<Utc>,
    ) -> Option<GameResult> {
        let winner = match self.outcome() {
            GameOutcome::InProgress => return None,
            GameOutcome::Won(mark) => GameWinner::from(Some(mark)),
            GameOutcome::Drawn => GameWinner::Draw,
        };
        let duration_secs = (ended_at - self.started_at).num_seconds().max(0) as u64;
        Some(GameResult {
            player_x: player_x.clone(),
            player_o: player_o.clone(),
            winner,
            moves: self.board.occupied() as u32,
            duration_secs,
            timestamp: ended_at,
        })
    }
}
