//! Tournament history and per-player statistics, with explicit load/save.
//!
//! The repository is a plain value owned by whoever drives the engine; it
//! never reaches into engine state and the engine never reaches into it.

use crate::models::{
    BestPerformance, GameResult, Player, PlayerId, PlayerStats, Tournament, TournamentId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors while reading or writing stored stats.
#[derive(Debug)]
pub enum StatsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "Stats storage error: {}", e),
            StatsError::Json(e) => write!(f, "Stats data is not valid: {}", e),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Io(e) => Some(e),
            StatsError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(e: std::io::Error) -> Self {
        StatsError::Io(e)
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(e: serde_json::Error) -> Self {
        StatsError::Json(e)
    }
}

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: Player,
    pub stats: PlayerStats,
}

/// Export envelope: the stored data plus when it was exported.
#[derive(Serialize)]
struct ExportRef<'a> {
    tournaments: &'a [Tournament],
    player_stats: &'a BTreeMap<PlayerId, PlayerStats>,
    exported_at: DateTime<Utc>,
}

/// All recorded tournaments and the per-player aggregates derived from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRepository {
    #[serde(default)]
    tournaments: Vec<Tournament>,
    #[serde(default)]
    player_stats: BTreeMap<PlayerId, PlayerStats>,
}

impl StatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a repository from `path`. A missing file is an empty repository.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(data) => Self::from_json(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`StatsRepository::load`], falling back to an empty repository
    /// when the file cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(repo) => {
                log::info!(
                    "Loaded {} tournament(s) from {}",
                    repo.tournaments.len(),
                    path.display()
                );
                repo
            }
            Err(e) => {
                log::warn!("Failed to load stats from {}: {}; starting empty", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StatsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, StatsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, StatsError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Snapshot of everything plus an `exported_at` timestamp.
    pub fn export_json(&self) -> Result<String, StatsError> {
        let export = ExportRef {
            tournaments: &self.tournaments,
            player_stats: &self.player_stats,
            exported_at: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Replace the contents with previously exported data. On error the
    /// repository is left as it was.
    pub fn import_json(&mut self, data: &str) -> Result<(), StatsError> {
        let imported = Self::from_json(data)?;
        log::info!("Imported {} tournament(s)", imported.tournaments.len());
        *self = imported;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tournaments.clear();
        self.player_stats.clear();
    }

    pub fn add_tournament(&mut self, tournament: Tournament) {
        self.tournaments.push(tournament);
    }

    /// Replace the stored snapshot with the same id. The first time a
    /// snapshot arrives completed, its games are folded into player stats.
    /// Returns false when no tournament with that id is stored.
    pub fn update_tournament(&mut self, tournament: Tournament) -> bool {
        let Some(index) = self.tournaments.iter().position(|t| t.id == tournament.id) else {
            return false;
        };
        let newly_completed = !self.tournaments[index].is_completed() && tournament.is_completed();
        if newly_completed {
            self.record_tournament(&tournament);
        }
        self.tournaments[index] = tournament;
        true
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }

    /// All tournaments, newest first.
    pub fn history(&self) -> Vec<&Tournament> {
        let mut all: Vec<&Tournament> = self.tournaments.iter().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn recent(&self, limit: usize) -> Vec<&Tournament> {
        let mut all = self.history();
        all.truncate(limit);
        all
    }

    /// Stats for a player; zeroed when the player has no history.
    pub fn player_stats(&self, player_id: PlayerId) -> PlayerStats {
        self.player_stats.get(&player_id).cloned().unwrap_or_default()
    }

    /// Fold one finished game into `player_id`'s stats.
    pub fn record_game(&mut self, player_id: PlayerId, game: &GameResult) {
        self.player_stats
            .entry(player_id)
            .or_default()
            .record_game(game.won_by(player_id), game.duration_secs);
    }

    /// Participation for every entrant, a title for the winner and every
    /// game played. Ignored unless the tournament is completed.
    pub fn record_tournament(&mut self, tournament: &Tournament) {
        if !tournament.is_completed() {
            return;
        }
        for player in &tournament.players {
            self.player_stats.entry(player.id).or_default().total_tournaments += 1;
        }
        if let Some(winner) = &tournament.winner {
            self.player_stats.entry(winner.id).or_default().tournaments_won += 1;
        }
        let games = tournament
            .matches
            .iter()
            .filter_map(|m| m.series.as_ref())
            .flat_map(|s| s.games.iter());
        for game in games {
            self.record_game(game.player_x.id, game);
            self.record_game(game.player_o.id, game);
        }
        log::debug!("Recorded stats for tournament '{}'", tournament.name);
    }

    fn games_of(&self, player_id: PlayerId) -> impl Iterator<Item = &GameResult> {
        self.tournaments
            .iter()
            .flat_map(|t| t.matches.iter())
            .filter_map(|m| m.series.as_ref())
            .flat_map(|s| s.games.iter())
            .filter(move |g| g.involves(player_id))
    }

    /// Name of the opponent faced in the most games. The first one reached
    /// wins a tie.
    pub fn favorite_opponent(&self, player_id: PlayerId) -> Option<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for game in self.games_of(player_id) {
            let Some(opponent) = game.opponent_of(player_id) else {
                continue;
            };
            match counts.iter_mut().find(|(name, _)| *name == opponent.name) {
                Some((_, count)) => *count += 1,
                None => counts.push((opponent.name.as_str(), 1)),
            }
        }
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name.to_string())
    }

    /// Tournament where the player had the best game win rate.
    pub fn best_performance(&self, player_id: PlayerId) -> Option<BestPerformance> {
        let mut best: Option<(f64, BestPerformance)> = None;
        for tournament in &self.tournaments {
            let games: Vec<&GameResult> = tournament
                .matches
                .iter()
                .filter_map(|m| m.series.as_ref())
                .flat_map(|s| s.games.iter())
                .filter(|g| g.involves(player_id))
                .collect();
            if games.is_empty() {
                continue;
            }
            let games_won = games.iter().filter(|g| g.won_by(player_id)).count() as u32;
            let games_played = games.len() as u32;
            let rate = f64::from(games_won) / f64::from(games_played);
            if rate > 0.0 && best.as_ref().map_or(true, |(r, _)| rate > *r) {
                best = Some((
                    rate,
                    BestPerformance {
                        tournament: tournament.name.clone(),
                        games_won,
                        games_played,
                    },
                ));
            }
        }
        best.map(|(_, perf)| perf)
    }

    /// Every player in the history, by titles won, then game win rate.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut seen: BTreeMap<PlayerId, Player> = BTreeMap::new();
        for tournament in &self.tournaments {
            for player in &tournament.players {
                seen.insert(player.id, player.clone());
            }
        }
        let mut board: Vec<LeaderboardEntry> = seen
            .into_values()
            .map(|player| LeaderboardEntry {
                stats: self.player_stats(player.id),
                player,
            })
            .collect();
        board.sort_by(|a, b| {
            b.stats
                .tournaments_won
                .cmp(&a.stats.tournaments_won)
                .then(b.stats.win_rate().total_cmp(&a.stats.win_rate()))
        });
        board
    }
}
