//! Best-of-N series: fold finished games until a player reaches the win
//! threshold or the game cap is hit, then produce the SeriesResult.

use crate::models::{GameResult, Match, Player, SeriesLength, SeriesResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Errors when recording a game into a series.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SeriesError {
    /// The series already has a result.
    SeriesComplete,
    /// The game was not played between this series' two players.
    PlayerMismatch,
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::SeriesComplete => write!(f, "The series is already decided"),
            SeriesError::PlayerMismatch => write!(f, "Game players do not match the series"),
        }
    }
}

impl std::error::Error for SeriesError {}

/// Score so far, from player1's side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesScore {
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub draws: usize,
    pub wins_needed: usize,
}

/// A series being played. player1 is X and player2 is O in every game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub player1: Player,
    pub player2: Player,
    pub length: SeriesLength,
    pub games: Vec<GameResult>,
}

impl Series {
    pub fn new(player1: Player, player2: Player, length: SeriesLength) -> Self {
        Self {
            player1,
            player2,
            length,
            games: Vec::new(),
        }
    }

    /// Start the series for a bracket match.
    pub fn for_match(m: &Match, length: SeriesLength) -> Self {
        Self::new(m.player1.clone(), m.player2.clone(), length)
    }

    pub fn score(&self) -> SeriesScore {
        let player1_wins = self.games.iter().filter(|g| g.won_by(self.player1.id)).count();
        let player2_wins = self.games.iter().filter(|g| g.won_by(self.player2.id)).count();
        SeriesScore {
            player1_wins,
            player2_wins,
            draws: self.games.len() - player1_wins - player2_wins,
            wins_needed: usize::from(self.length.wins_needed()),
        }
    }

    /// 1-based number of the game to be played next.
    pub fn current_game(&self) -> usize {
        self.games.len() + 1
    }

    pub fn is_complete(&self) -> bool {
        let score = self.score();
        score.player1_wins >= score.wins_needed
            || score.player2_wins >= score.wins_needed
            || self.games.len() >= usize::from(self.length.games())
    }

    /// Record a finished game. Returns the series result when this game
    /// decides the series.
    pub fn record(&mut self, game: GameResult) -> Result<Option<SeriesResult>, SeriesError> {
        if self.is_complete() {
            return Err(SeriesError::SeriesComplete);
        }
        let same_players = game.involves(self.player1.id)
            && game.involves(self.player2.id)
            && game.player_x.id != game.player_o.id;
        if !same_players {
            return Err(SeriesError::PlayerMismatch);
        }
        self.games.push(game);
        Ok(self.result())
    }

    /// The result once complete; winner is whoever won more games, none on a tie.
    pub fn result(&self) -> Option<SeriesResult> {
        if !self.is_complete() {
            return None;
        }
        let score = self.score();
        let winner = if score.player1_wins > score.player2_wins {
            Some(self.player1.clone())
        } else if score.player2_wins > score.player1_wins {
            Some(self.player2.clone())
        } else {
            None
        };
        let completed_at = self.games.last().map(|g| g.timestamp).unwrap_or_else(Utc::now);
        Some(SeriesResult {
            player_x: self.player1.clone(),
            player_o: self.player2.clone(),
            games: self.games.clone(),
            winner,
            series_length: self.length,
            completed_at,
        })
    }
}
