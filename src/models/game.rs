//! Game and series results, and the bracket Match.

use crate::models::player::{Player, PlayerId};
use crate::models::board::Mark;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Result of one finished game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum GameWinner {
    X,
    O,
    Draw,
}

impl From<Option<Mark>> for GameWinner {
    fn from(mark: Option<Mark>) -> Self {
        match mark {
            Some(Mark::X) => GameWinner::X,
            Some(Mark::O) => GameWinner::O,
            None => GameWinner::Draw,
        }
    }
}

/// Number of games in a series. Serialized as the plain number 3 or 5.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeriesLength {
    #[default]
    BestOf3,
    BestOf5,
}

impl SeriesLength {
    pub fn games(self) -> u8 {
        match self {
            SeriesLength::BestOf3 => 3,
            SeriesLength::BestOf5 => 5,
        }
    }

    /// Wins needed to take the series: ceil(games / 2).
    pub fn wins_needed(self) -> u8 {
        self.games().div_ceil(2)
    }
}

impl TryFrom<u8> for SeriesLength {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            3 => Ok(SeriesLength::BestOf3),
            5 => Ok(SeriesLength::BestOf5),
            other => Err(format!("series length must be 3 or 5, got {}", other)),
        }
    }
}

impl From<SeriesLength> for u8 {
    fn from(len: SeriesLength) -> u8 {
        len.games()
    }
}

/// One completed game within a series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub player_x: Player,
    pub player_o: Player,
    pub winner: GameWinner,
    pub moves: u32,
    pub duration_secs: u64,
    pub timestamp: DateTime<Utc>,
}

impl GameResult {
    /// The player who won this game, `None` for a draw.
    pub fn winning_player(&self) -> Option<&Player> {
        match self.winner {
            GameWinner::X => Some(&self.player_x),
            GameWinner::O => Some(&self.player_o),
            GameWinner::Draw => None,
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player_x.id == player_id || self.player_o.id == player_id
    }

    /// The other side of the game from `player_id`'s point of view.
    pub fn opponent_of(&self, player_id: PlayerId) -> Option<&Player> {
        if self.player_x.id == player_id {
            Some(&self.player_o)
        } else if self.player_o.id == player_id {
            Some(&self.player_x)
        } else {
            None
        }
    }

    pub fn won_by(&self, player_id: PlayerId) -> bool {
        self.winning_player().is_some_and(|p| p.id == player_id)
    }
}

/// Outcome of a best-of-N set between two players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub player_x: Player,
    pub player_o: Player,
    pub games: Vec<GameResult>,
    /// `None` when the game cap was reached with equal wins.
    pub winner: Option<Player>,
    pub series_length: SeriesLength,
    pub completed_at: DateTime<Utc>,
}

impl SeriesResult {
    /// Degenerate series for a bye: no games, the lone player wins.
    pub fn bye(player: &Player, series_length: SeriesLength) -> Self {
        Self {
            player_x: player.clone(),
            player_o: player.clone(),
            games: Vec::new(),
            winner: Some(player.clone()),
            series_length,
            completed_at: Utc::now(),
        }
    }

    /// Games won by `player_id` in this series.
    pub fn wins_for(&self, player_id: PlayerId) -> usize {
        self.games.iter().filter(|g| g.won_by(player_id)).count()
    }
}

/// Lifecycle of a bracket slot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    /// Set by the UI when a player opens the match; logic treats it as Pending.
    InProgress,
    Completed,
}

/// Layout hint for drawing the bracket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketPosition {
    pub x: f64,
    pub y: f64,
}

/// One bracket slot. A bye has `player1 == player2` and is born completed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    pub player1: Player,
    pub player2: Player,
    /// None until the series is played.
    pub series: Option<SeriesResult>,
    pub status: MatchStatus,
    pub bracket_position: BracketPosition,
}

impl Match {
    pub fn new(round: u32, player1: Player, player2: Player, bracket_position: BracketPosition) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            player1,
            player2,
            series: None,
            status: MatchStatus::Pending,
            bracket_position,
        }
    }

    /// A completed match that advances `player` without playing.
    pub fn bye(
        round: u32,
        player: Player,
        series_length: SeriesLength,
        bracket_position: BracketPosition,
    ) -> Self {
        let series = SeriesResult::bye(&player, series_length);
        Self {
            series: Some(series),
            status: MatchStatus::Completed,
            ..Self::new(round, player.clone(), player, bracket_position)
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player1.id == self.player2.id
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Series winner, `None` while unplayed or after a tied series.
    pub fn winner(&self) -> Option<&Player> {
        self.series.as_ref().and_then(|s| s.winner.as_ref())
    }
}
