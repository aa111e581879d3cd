//! Tournament, TournamentStatus and TournamentError.

use crate::models::game::{Match, MatchId, SeriesLength};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Fewest entrants a bracket accepts.
pub const MIN_PLAYERS: usize = 2;
/// Most entrants a bracket accepts.
pub const MAX_PLAYERS: usize = 16;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Fewer entrants than a bracket needs.
    NotEnoughPlayers { min: usize },
    /// More entrants than a bracket supports.
    TooManyPlayers { max: usize },
    /// A player name is blank after trimming.
    EmptyPlayerName,
    /// The tournament name is blank after trimming.
    EmptyTournamentName,
    /// Two players share a name (case-insensitive).
    DuplicatePlayerName(String),
    /// Format string names a bracket type that is not implemented.
    UnsupportedFormat(String),
    /// Series must be best of 3 or best of 5.
    InvalidSeriesLength(u8),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::NotEnoughPlayers { min } => {
                write!(f, "Need at least {} players", min)
            }
            TournamentError::TooManyPlayers { max } => {
                write!(f, "At most {} players can enter", max)
            }
            TournamentError::EmptyPlayerName => write!(f, "Player names cannot be empty"),
            TournamentError::EmptyTournamentName => write!(f, "Tournament name cannot be empty"),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named '{}' already exists", name)
            }
            TournamentError::UnsupportedFormat(format) => {
                write!(f, "Tournament format '{}' is not supported", format)
            }
            TournamentError::InvalidSeriesLength(n) => {
                write!(f, "Series length must be 3 or 5 (got {})", n)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Players entered, bracket not seeded.
    #[default]
    Pending,
    /// Bracket seeded; rounds being played.
    InProgress,
    /// A champion emerged (or the final series was tied).
    Completed,
}

/// Bracket type. Only single elimination is implemented; anything else is
/// refused when parsed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
}

impl FromStr for TournamentFormat {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-elimination" | "single_elimination" => Ok(TournamentFormat::SingleElimination),
            other => Err(TournamentError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Rounds needed to reduce `player_count` entrants to one: ceil(log2(n)).
pub fn total_rounds_for(player_count: usize) -> u32 {
    if player_count <= 1 {
        return 0;
    }
    usize::BITS - (player_count - 1).leading_zeros()
}

/// Full tournament snapshot. Logic functions take a snapshot by reference
/// and return a new one; `matches` only ever grows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub format: TournamentFormat,
    pub series_length: SeriesLength,
    /// Entrants in the order they were given.
    pub players: Vec<Player>,
    /// Every match of every round, in creation order.
    pub matches: Vec<Match>,
    pub winner: Option<Player>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub current_round: u32,
    pub total_rounds: u32,
}

impl Tournament {
    /// Create a Pending tournament with the given players and no matches.
    pub fn with_players(
        name: impl Into<String>,
        players: Vec<Player>,
        format: TournamentFormat,
        series_length: SeriesLength,
    ) -> Self {
        let total_rounds = total_rounds_for(players.len());
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: TournamentStatus::Pending,
            format,
            series_length,
            players,
            matches: Vec::new(),
            winner: None,
            created_at: Utc::now(),
            completed_at: None,
            current_round: 1,
            total_rounds,
        }
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Matches recorded for `round`, in bracket order.
    pub fn round_matches(&self, round: u32) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    pub fn current_round_matches(&self) -> Vec<&Match> {
        self.round_matches(self.current_round)
    }

    pub fn next_round_matches(&self) -> Vec<&Match> {
        self.round_matches(self.current_round + 1)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }
}
