//! Board engine: win/draw detection and move selection (minimax and random).
//!
//! Everything here is a pure function of the board it is given. No state is
//! kept between calls, so a caller may abandon a pending AI move at any time.

use crate::models::{Board, Cell, GameOutcome, Mark, WinLine, WIN_LINES};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the AI picks its moves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Uniformly random legal move.
    Easy,
    /// Full minimax.
    #[default]
    Hard,
}

/// First complete line of identical marks, in `WIN_LINES` order.
pub fn winning_line(board: &Board) -> Option<WinLine> {
    WIN_LINES.iter().copied().find(|WinLine([a, b, c])| {
        let cell = board[*a];
        cell != Cell::Empty && cell == board[*b] && cell == board[*c]
    })
}

/// The mark owning the first complete line, if any.
pub fn winner(board: &Board) -> Option<Mark> {
    winning_line(board).and_then(|WinLine([a, _, _])| board[a].mark())
}

/// Every cell occupied and nobody has a line.
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && winner(board).is_none()
}

pub fn outcome(board: &Board) -> GameOutcome {
    match winner(board) {
        Some(mark) => GameOutcome::Won(mark),
        None if board.is_full() => GameOutcome::Drawn,
        None => GameOutcome::InProgress,
    }
}

/// Indices of empty cells, ascending. This order is the tie-break order for
/// move selection.
pub fn empty_cells(board: &Board) -> Vec<usize> {
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_empty())
        .map(|(i, _)| i)
        .collect()
}

/// Score of every legal move for `mark`, in `empty_cells` order.
///
/// Terminal positions score `10 - depth` for a win by `mark`, `depth - 10`
/// for a loss and 0 for a draw, with depth counted in plies after the move
/// being scored. Quick wins therefore beat slow ones and slow losses beat
/// quick ones.
pub fn move_scores(board: &Board, mark: Mark) -> Vec<(usize, i32)> {
    let mut scratch = *board;
    empty_cells(board)
        .into_iter()
        .map(|index| {
            scratch.set(index, mark.cell());
            let score = minimax(&mut scratch, 0, false, mark);
            scratch.set(index, Cell::Empty);
            (index, score)
        })
        .collect()
}

/// Optimal move for `mark`: the first move with the strictly greatest score.
/// `None` when the board has no empty cell.
pub fn best_move(board: &Board, mark: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (index, score) in move_scores(board, mark) {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    if let Some((index, score)) = best {
        log::debug!("Best move for {:?}: cell {} (score {})", mark, index, score);
    }
    best.map(|(index, _)| index)
}

/// Uniformly random empty cell. `None` when the board is full.
pub fn random_move(board: &Board) -> Option<usize> {
    random_move_with_rng(board, &mut rand::thread_rng())
}

pub fn random_move_with_rng<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    empty_cells(board).choose(rng).copied()
}

/// Move for the AI playing `mark` at the given difficulty.
pub fn ai_move(board: &Board, mark: Mark, difficulty: Difficulty) -> Option<usize> {
    match difficulty {
        Difficulty::Easy => random_move(board),
        Difficulty::Hard => best_move(board, mark),
    }
}

/// Exhaustive minimax, no pruning. `board` is restored before returning.
fn minimax(board: &mut Board, depth: i32, maximizing: bool, me: Mark) -> i32 {
    match winner(board) {
        Some(mark) if mark == me => return 10 - depth,
        Some(_) => return depth - 10,
        None if board.is_full() => return 0,
        None => {}
    }

    let to_move = if maximizing { me } else { me.opponent() };
    let scores = empty_cells(board).into_iter().map(|index| {
        board.set(index, to_move.cell());
        let score = minimax(board, depth + 1, !maximizing, me);
        board.set(index, Cell::Empty);
        score
    });

    let best = if maximizing { scores.max() } else { scores.min() };
    best.unwrap_or(0)
}
