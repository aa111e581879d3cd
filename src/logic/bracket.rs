//! Single-elimination rounds: completing matches and advancing the bracket.

use crate::models::{
    BracketPosition, Match, MatchId, MatchStatus, Player, SeriesLength, SeriesResult, Tournament,
    TournamentStatus,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Summary of how far a tournament has got.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentProgress {
    pub total_matches: usize,
    pub completed_matches: usize,
    /// Completed matches as a percentage of recorded matches.
    pub percent: f64,
    pub current_round_complete: bool,
    pub is_complete: bool,
}

/// Layout position for slot `slot` of `round`. Each round is a column twice
/// as wide as the next one.
pub fn bracket_position(total_rounds: u32, round: u32, slot: usize) -> BracketPosition {
    let total_rounds = total_rounds.max(1);
    let width = 2f64.powi((total_rounds + 1).saturating_sub(round) as i32);
    let height = 2f64.powi(total_rounds as i32);
    let rounds = f64::from(total_rounds);
    BracketPosition {
        x: slot as f64 * width + width / 2.0,
        y: f64::from(round.saturating_sub(1)) * (height / rounds) + height / (rounds * 2.0),
    }
}

/// Pair players consecutively: (p0, p1), (p2, p3), ... A trailing odd player
/// gets a bye match that is already completed.
pub(crate) fn pair_round(
    round: u32,
    players: &[Player],
    series_length: SeriesLength,
    total_rounds: u32,
) -> Vec<Match> {
    players
        .chunks(2)
        .enumerate()
        .map(|(slot, pair)| {
            let position = bracket_position(total_rounds, round, slot);
            match pair {
                [p1, p2] => Match::new(round, p1.clone(), p2.clone(), position),
                [lone] => {
                    log::debug!("Round {}: bye for '{}'", round, lone.name);
                    Match::bye(round, lone.clone(), series_length, position)
                }
                _ => unreachable!("chunks(2) yields one or two players"),
            }
        })
        .collect()
}

/// Attach `series` to the match, mark it completed and advance the bracket
/// when the round is done.
///
/// Returns an unchanged copy when the match id is unknown, the match is
/// already completed, the tournament is not in progress, or the series was
/// not played between the match's two players or names a winner from
/// outside it. Calling this twice with the same arguments therefore yields
/// the same snapshot.
pub fn complete_match(tournament: &Tournament, match_id: MatchId, series: SeriesResult) -> Tournament {
    let mut next = tournament.clone();
    if next.status != TournamentStatus::InProgress {
        log::debug!("Ignoring result for match {}: tournament not in progress", match_id);
        return next;
    }
    let Some(m) = next.matches.iter_mut().find(|m| m.id == match_id) else {
        log::warn!("Ignoring result for unknown match {}", match_id);
        return next;
    };
    if m.is_completed() {
        log::debug!("Match {} already completed", match_id);
        return next;
    }
    let (x, o) = (series.player_x.id, series.player_o.id);
    let (p1, p2) = (m.player1.id, m.player2.id);
    if !((x == p1 && o == p2) || (x == p2 && o == p1)) {
        log::warn!(
            "Ignoring result for match {}: series between '{}' and '{}'",
            match_id,
            series.player_x.name,
            series.player_o.name
        );
        return next;
    }
    if let Some(w) = &series.winner {
        if w.id != m.player1.id && w.id != m.player2.id {
            log::warn!("Ignoring result for match {}: winner '{}' did not play", match_id, w.name);
            return next;
        }
    }

    m.series = Some(series);
    m.status = MatchStatus::Completed;
    advance_round(next)
}

/// UI-only transition Pending -> InProgress for display. Any other state is
/// left alone.
pub fn mark_match_in_progress(tournament: &Tournament, match_id: MatchId) -> Tournament {
    let mut next = tournament.clone();
    if let Some(m) = next.matches.iter_mut().find(|m| m.id == match_id) {
        if m.status == MatchStatus::Pending {
            m.status = MatchStatus::InProgress;
        }
    }
    next
}

/// Advance when every match of the current round is completed.
///
/// Winners are taken in match order (a tied series sends nobody through).
/// One winner ends the tournament; otherwise winners are paired for the
/// next round, which is appended to `matches`.
fn advance_round(mut tournament: Tournament) -> Tournament {
    let round = tournament.current_round;
    let Some(winners) = round_winners(&tournament, round) else {
        return tournament;
    };

    if winners.len() <= 1 {
        tournament.winner = winners.into_iter().next();
        tournament.status = TournamentStatus::Completed;
        tournament.completed_at = Some(Utc::now());
        match &tournament.winner {
            Some(w) => log::info!("Tournament '{}' won by '{}'", tournament.name, w.name),
            None => log::info!("Tournament '{}' ended without a winner", tournament.name),
        }
        return tournament;
    }

    let next_round = round + 1;
    let next_matches = pair_round(
        next_round,
        &winners,
        tournament.series_length,
        tournament.total_rounds,
    );
    log::debug!(
        "Tournament '{}': round {} complete, {} matches in round {}",
        tournament.name,
        round,
        next_matches.len(),
        next_round
    );
    tournament.matches.extend(next_matches);
    tournament.current_round = next_round;
    tournament
}

/// Winners of `round` in match order, or None while the round is unfinished.
fn round_winners(tournament: &Tournament, round: u32) -> Option<Vec<Player>> {
    let matches = tournament.round_matches(round);
    if matches.is_empty() || matches.iter().any(|m| !m.is_completed()) {
        return None;
    }
    Some(matches.iter().filter_map(|m| m.winner().cloned()).collect())
}

pub fn progress(tournament: &Tournament) -> TournamentProgress {
    let total_matches = tournament.matches.len();
    let completed_matches = tournament.matches.iter().filter(|m| m.is_completed()).count();
    let percent = if total_matches > 0 {
        completed_matches as f64 / total_matches as f64 * 100.0
    } else {
        0.0
    };
    TournamentProgress {
        total_matches,
        completed_matches,
        percent,
        current_round_complete: tournament
            .current_round_matches()
            .iter()
            .all(|m| m.is_completed()),
        is_complete: tournament.is_completed(),
    }
}
