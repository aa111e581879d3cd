//! Tic-tac-toe web app: library with the board engine, AI, series and
//! bracket tournament logic, and stats storage.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    ai_move, best_move, bracket_position, complete_match, create_tournament, empty_cells, is_draw,
    mark_match_in_progress, move_scores, outcome, progress, random_move, random_move_with_rng,
    read_player_names, start_tournament, start_tournament_with_rng, tournament_from_roster, winner,
    winning_line, Difficulty, GameSession, LeaderboardEntry, RosterError, Series, SeriesError,
    SeriesScore, StatsError, StatsFile, StatsRepository, TournamentProgress,
};
pub use models::{
    total_rounds_for, BestPerformance, Board, BracketPosition, Cell, GameOutcome, GameResult,
    GameWinner, Mark, Match, MatchId, MatchStatus, MoveError, Player, PlayerId, PlayerStats,
    SeriesLength, SeriesResult, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus, WinLine, CELL_COUNT, MAX_PLAYERS, MIN_PLAYERS, WIN_LINES,
};
