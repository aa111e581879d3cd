//! Player and PlayerStats data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A tournament entrant. `wins`/`losses` are display aggregates kept by the
/// stats side; bracket logic never touches them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

impl Player {
    /// Create a new player with the given name and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wins: 0,
            losses: 0,
        }
    }
}

/// Tournament with the best game win rate for one player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BestPerformance {
    pub tournament: String,
    pub games_won: u32,
    pub games_played: u32,
}

/// Aggregated history of one player across all recorded tournaments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_tournaments: u32,
    pub tournaments_won: u32,
    pub total_games_played: u32,
    pub total_games_won: u32,
    pub longest_win_streak: u32,
    pub current_win_streak: u32,
    /// Mean game duration in seconds.
    pub average_game_duration: f64,
}

impl PlayerStats {
    /// Fraction of games won, 0 when nothing was played.
    pub fn win_rate(&self) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            f64::from(self.total_games_won) / f64::from(self.total_games_played)
        }
    }

    /// Fold one finished game into the aggregates.
    pub fn record_game(&mut self, won: bool, duration_secs: u64) {
        self.total_games_played += 1;
        if won {
            self.total_games_won += 1;
            self.current_win_streak += 1;
            self.longest_win_streak = self.longest_win_streak.max(self.current_win_streak);
        } else {
            self.current_win_streak = 0;
        }
        let n = f64::from(self.total_games_played);
        self.average_game_duration += (duration_secs as f64 - self.average_game_duration) / n;
    }
}
