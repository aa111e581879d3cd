//! Engine logic: board evaluation and AI, game sessions, series, bracket
//! seeding and advancement, rosters, stats and the stats file.

mod board;
mod bracket;
mod roster;
mod series;
mod session;
mod setup;
mod stats;
mod storage;

pub use board::{
    ai_move, best_move, empty_cells, is_draw, move_scores, outcome, random_move,
    random_move_with_rng, winner, winning_line, Difficulty,
};
pub use bracket::{bracket_position, complete_match, mark_match_in_progress, progress, TournamentProgress};
pub use roster::{read_player_names, tournament_from_roster, RosterError};
pub use series::{Series, SeriesError, SeriesScore};
pub use session::GameSession;
pub use setup::{create_tournament, start_tournament, start_tournament_with_rng};
pub use stats::{LeaderboardEntry, StatsError, StatsRepository};
pub use storage::StatsFile;
