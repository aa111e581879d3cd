//! Data structures: board and cells, players, games, series, matches, tournaments.

mod board;
mod game;
mod player;
mod tournament;

pub use board::{Board, Cell, GameOutcome, Mark, MoveError, WinLine, CELL_COUNT, WIN_LINES};
pub use game::{
    BracketPosition, GameResult, GameWinner, Match, MatchId, MatchStatus, SeriesLength, SeriesResult,
};
pub use player::{BestPerformance, Player, PlayerId, PlayerStats};
pub use tournament::{
    total_rounds_for, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus, MAX_PLAYERS, MIN_PLAYERS,
};
