//! Setup phase: create a tournament from a list of names and seed round 1.

use crate::logic::bracket::pair_round;
use crate::models::{
    Player, SeriesLength, Tournament, TournamentError, TournamentFormat, TournamentStatus,
    MAX_PLAYERS, MIN_PLAYERS,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Create a Pending tournament. Players keep the input order and get fresh ids.
///
/// Requires a non-blank name and 2..=16 non-blank player names that are
/// unique ignoring case. Names are trimmed.
pub fn create_tournament<S: AsRef<str>>(
    name: &str,
    player_names: &[S],
    format: TournamentFormat,
    series_length: SeriesLength,
) -> Result<Tournament, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyTournamentName);
    }
    if player_names.len() < MIN_PLAYERS {
        return Err(TournamentError::NotEnoughPlayers { min: MIN_PLAYERS });
    }
    if player_names.len() > MAX_PLAYERS {
        return Err(TournamentError::TooManyPlayers { max: MAX_PLAYERS });
    }

    let mut players: Vec<Player> = Vec::with_capacity(player_names.len());
    for raw in player_names {
        let player_name = raw.as_ref().trim();
        if player_name.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        if players.iter().any(|p| p.name.eq_ignore_ascii_case(player_name)) {
            return Err(TournamentError::DuplicatePlayerName(player_name.to_string()));
        }
        players.push(Player::new(player_name));
    }

    let tournament = Tournament::with_players(name, players, format, series_length);
    log::info!(
        "Created tournament '{}' ({} players, {} rounds, best of {})",
        tournament.name,
        tournament.players.len(),
        tournament.total_rounds,
        tournament.series_length.games()
    );
    Ok(tournament)
}

/// Seed the bracket: shuffle, pair consecutively into round-1 matches and
/// move to InProgress. Only valid once, from Pending.
pub fn start_tournament(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    start_tournament_with_rng(tournament, &mut rand::thread_rng())
}

/// As [`start_tournament`], drawing the seeding shuffle from `rng`.
pub fn start_tournament_with_rng<R: Rng + ?Sized>(
    tournament: &Tournament,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    if tournament.status != TournamentStatus::Pending {
        return Err(TournamentError::InvalidState);
    }
    if tournament.players.len() < MIN_PLAYERS {
        return Err(TournamentError::NotEnoughPlayers { min: MIN_PLAYERS });
    }

    let mut seeded = tournament.players.clone();
    seeded.shuffle(rng);

    let mut next = tournament.clone();
    next.matches = pair_round(1, &seeded, next.series_length, next.total_rounds);
    next.status = TournamentStatus::InProgress;
    next.current_round = 1;

    log::info!(
        "Started tournament '{}': {} round-1 matches",
        next.name,
        next.matches.len()
    );
    Ok(next)
}
