//! Integration tests for tournament creation, seeding and round advancement.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tictactoe_tournament::{
    bracket_position, complete_match, create_tournament, mark_match_in_progress, progress,
    start_tournament, start_tournament_with_rng, GameResult, GameWinner, Match, MatchStatus,
    Player, PlayerId, SeriesLength, SeriesResult, Tournament, TournamentError, TournamentFormat,
    TournamentStatus,
};
use uuid::Uuid;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{i}")).collect()
}

fn started(n: usize, seed: u64) -> Tournament {
    let t = create_tournament(
        "Cup",
        &names(n),
        TournamentFormat::SingleElimination,
        SeriesLength::BestOf3,
    )
    .unwrap();
    start_tournament_with_rng(&t, &mut StdRng::seed_from_u64(seed)).unwrap()
}

/// A series between the match's players where each entry says whether
/// player1 (X) won that game.
fn series(m: &Match, player1_wins: &[bool], length: SeriesLength) -> SeriesResult {
    let games: Vec<GameResult> = player1_wins
        .iter()
        .map(|&p1| GameResult {
            player_x: m.player1.clone(),
            player_o: m.player2.clone(),
            winner: if p1 { GameWinner::X } else { GameWinner::O },
            moves: 7,
            duration_secs: 20,
            timestamp: Utc::now(),
        })
        .collect();
    let p1 = player1_wins.iter().filter(|w| **w).count();
    let p2 = player1_wins.len() - p1;
    let winner = match p1.cmp(&p2) {
        std::cmp::Ordering::Greater => Some(m.player1.clone()),
        std::cmp::Ordering::Less => Some(m.player2.clone()),
        std::cmp::Ordering::Equal => None,
    };
    SeriesResult {
        player_x: m.player1.clone(),
        player_o: m.player2.clone(),
        games,
        winner,
        series_length: length,
        completed_at: Utc::now(),
    }
}

/// Player1 takes the series 2-0.
fn player1_sweeps(m: &Match) -> SeriesResult {
    series(m, &[true, true], SeriesLength::BestOf3)
}

fn pending_ids(t: &Tournament) -> Vec<Uuid> {
    t.matches
        .iter()
        .filter(|m| !m.is_completed())
        .map(|m| m.id)
        .collect()
}

fn play_out(mut t: Tournament) -> Tournament {
    while t.status == TournamentStatus::InProgress {
        let ids = pending_ids(&t);
        assert!(!ids.is_empty(), "in-progress tournament must have a pending match");
        for id in ids {
            let m = t.get_match(id).unwrap().clone();
            t = complete_match(&t, id, player1_sweeps(&m));
        }
    }
    t
}

fn player(t: &Tournament, name: &str) -> Player {
    t.players.iter().find(|p| p.name == name).unwrap().clone()
}

#[test]
fn create_keeps_input_order_and_computes_rounds() {
    let t = create_tournament("Cup", &["Ann", "Bob", "Cy"], TournamentFormat::SingleElimination, SeriesLength::BestOf5).unwrap();
    let order: Vec<&str> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, ["Ann", "Bob", "Cy"]);
    assert!(t.players.iter().all(|p| p.wins == 0 && p.losses == 0));
    assert_eq!(t.status, TournamentStatus::Pending);
    assert!(t.matches.is_empty());
    assert_eq!(t.total_rounds, 2);
    assert_eq!(t.series_length.games(), 5);
    assert!(t.winner.is_none());
}

#[test]
fn create_validates_configuration() {
    let fmt = TournamentFormat::SingleElimination;
    let len = SeriesLength::BestOf3;
    assert_eq!(
        create_tournament("Cup", &names(1), fmt, len).unwrap_err(),
        TournamentError::NotEnoughPlayers { min: 2 }
    );
    assert_eq!(
        create_tournament("Cup", &names(17), fmt, len).unwrap_err(),
        TournamentError::TooManyPlayers { max: 16 }
    );
    assert_eq!(
        create_tournament("Cup", &["Ann", "ann"], fmt, len).unwrap_err(),
        TournamentError::DuplicatePlayerName("ann".to_string())
    );
    assert_eq!(
        create_tournament("Cup", &["Ann", "  "], fmt, len).unwrap_err(),
        TournamentError::EmptyPlayerName
    );
    assert_eq!(
        create_tournament(" ", &names(2), fmt, len).unwrap_err(),
        TournamentError::EmptyTournamentName
    );
}

#[test]
fn double_elimination_is_rejected() {
    assert!(matches!(
        "double-elimination".parse::<TournamentFormat>(),
        Err(TournamentError::UnsupportedFormat(_))
    ));
    assert_eq!(
        "single-elimination".parse::<TournamentFormat>(),
        Ok(TournamentFormat::SingleElimination)
    );
    assert!(serde_json::from_str::<TournamentFormat>("\"double-elimination\"").is_err());
    assert!(serde_json::from_str::<SeriesLength>("4").is_err());
    assert_eq!(serde_json::from_str::<SeriesLength>("5").unwrap(), SeriesLength::BestOf5);
}

#[test]
fn start_seeds_round_one_for_power_of_two() {
    let t = started(4, 1);
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.total_rounds, 2);
    assert_eq!(t.matches.len(), 2);
    assert!(t.matches.iter().all(|m| m.round == 1 && m.status == MatchStatus::Pending));

    let mut seen: Vec<PlayerId> = t
        .matches
        .iter()
        .flat_map(|m| [m.player1.id, m.player2.id])
        .collect();
    seen.sort();
    let mut all: Vec<PlayerId> = t.players.iter().map(|p| p.id).collect();
    all.sort();
    assert_eq!(seen, all);
}

#[test]
fn start_returns_new_snapshot_and_only_runs_once() {
    let pending = create_tournament("Cup", &names(4), TournamentFormat::SingleElimination, SeriesLength::BestOf3).unwrap();
    let before = pending.clone();
    let running = start_tournament(&pending).unwrap();
    assert_eq!(pending, before);
    assert_eq!(start_tournament(&running).unwrap_err(), TournamentError::InvalidState);
}

#[test]
fn odd_count_gets_one_bye_that_reaches_round_two() {
    let t = started(5, 3);
    let round_one = t.round_matches(1);
    assert_eq!(round_one.len(), 3);
    let byes: Vec<&&Match> = round_one.iter().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    let bye = byes[0];
    assert!(bye.is_completed());
    assert_eq!(bye.winner().map(|p| p.id), Some(bye.player1.id));
    let bye_player = bye.player1.clone();

    let mut t2 = t.clone();
    for id in pending_ids(&t) {
        let m = t2.get_match(id).unwrap().clone();
        t2 = complete_match(&t2, id, player1_sweeps(&m));
    }
    assert_eq!(t2.current_round, 2);
    let in_round_two = t2
        .round_matches(2)
        .iter()
        .any(|m| m.player1 == bye_player || m.player2 == bye_player);
    assert!(in_round_two);
}

#[test]
fn later_round_bye_is_created_completed_with_no_games() {
    let t = started(5, 7);
    let mut t2 = t.clone();
    for id in pending_ids(&t) {
        let m = t2.get_match(id).unwrap().clone();
        t2 = complete_match(&t2, id, player1_sweeps(&m));
    }
    assert_eq!(t2.current_round, 2);

    let round_two = t2.round_matches(2);
    assert_eq!(round_two.len(), 2);
    let byes: Vec<&&Match> = round_two.iter().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    let bye = byes[0];
    assert_eq!(bye.status, MatchStatus::Completed);
    assert!(bye.series.as_ref().unwrap().games.is_empty());
    assert_eq!(bye.winner().map(|p| p.id), Some(bye.player1.id));

    let real = round_two.iter().find(|m| !m.is_bye()).unwrap();
    assert_eq!(real.status, MatchStatus::Pending);
    assert!(real.series.is_none());
}

#[test]
fn every_player_count_plays_out_to_one_champion() {
    for n in 2..=16 {
        let t = play_out(started(n, n as u64));
        assert_eq!(t.status, TournamentStatus::Completed, "n = {}", n);
        assert!(t.winner.is_some());
        assert!(t.completed_at.is_some());
        assert_eq!(t.current_round, t.total_rounds, "n = {}", n);
        let real = t.matches.iter().filter(|m| !m.is_bye()).count();
        assert_eq!(real, n - 1, "n = {}", n);
    }
}

#[test]
fn power_of_two_bracket_has_half_matches_per_round() {
    let t = play_out(started(8, 11));
    assert_eq!(t.round_matches(1).len(), 4);
    assert_eq!(t.round_matches(2).len(), 2);
    assert_eq!(t.round_matches(3).len(), 1);
    assert_eq!(t.matches.len(), 7);
}

#[test]
fn four_player_best_of_three_scenario() {
    let mut t = create_tournament("Cup", &["A", "B", "C", "D"], TournamentFormat::SingleElimination, SeriesLength::BestOf3).unwrap();
    let (a, b, c, d) = (player(&t, "A"), player(&t, "B"), player(&t, "C"), player(&t, "D"));
    t.status = TournamentStatus::InProgress;
    t.matches = vec![
        Match::new(1, a.clone(), b.clone(), bracket_position(2, 1, 0)),
        Match::new(1, c.clone(), d.clone(), bracket_position(2, 1, 1)),
    ];
    let (ab, cd) = (t.matches[0].clone(), t.matches[1].clone());

    let t = complete_match(&t, ab.id, series(&ab, &[true, true], SeriesLength::BestOf3));
    assert_eq!(t.current_round, 1);
    let t = complete_match(&t, cd.id, series(&cd, &[true, false, true], SeriesLength::BestOf3));
    assert_eq!(t.current_round, 2);

    let final_match = t.round_matches(2)[0].clone();
    assert_eq!(final_match.player1.id, a.id);
    assert_eq!(final_match.player2.id, c.id);
    let t = complete_match(
        &t,
        final_match.id,
        series(&final_match, &[false, true, false], SeriesLength::BestOf3),
    );

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_ref().map(|p| p.id), Some(c.id));
    assert_eq!(t.matches.len(), 3);
    assert_eq!(t.current_round, 2);
}

#[test]
fn completing_twice_does_not_advance_twice() {
    let t = started(4, 5);
    let first = t.matches[0].clone();
    let result = player1_sweeps(&first);
    let once = complete_match(&t, first.id, result.clone());
    let twice = complete_match(&once, first.id, result);
    assert_eq!(once, twice);

    let second = once.matches[1].clone();
    let advanced = complete_match(&once, second.id, player1_sweeps(&second));
    let again = complete_match(&advanced, second.id, player1_sweeps(&second));
    assert_eq!(advanced.matches.len(), 3);
    assert_eq!(again, advanced);
}

#[test]
fn unknown_match_id_leaves_tournament_unchanged() {
    let t = started(4, 9);
    let m = t.matches[0].clone();
    let next = complete_match(&t, Uuid::new_v4(), player1_sweeps(&m));
    assert_eq!(next, t);
}

#[test]
fn winner_outside_the_match_is_ignored() {
    let t = started(4, 2);
    let m = t.matches[0].clone();
    let mut result = player1_sweeps(&m);
    result.winner = Some(t.matches[1].player1.clone());
    assert_eq!(complete_match(&t, m.id, result), t);
}

#[test]
fn earlier_rounds_are_never_rewritten() {
    let t = started(8, 4);
    let round_one = t.matches.clone();
    let done = play_out(t);
    let first_four: Vec<_> = done.matches[..4].iter().map(|m| (m.id, m.player1.id, m.player2.id)).collect();
    let original: Vec<_> = round_one.iter().map(|m| (m.id, m.player1.id, m.player2.id)).collect();
    assert_eq!(first_four, original);
}

#[test]
fn series_between_other_players_is_ignored() {
    let t = started(4, 2);
    let m = t.matches[0].clone();
    let other = t.matches[1].clone();
    let tied_elsewhere = series(&other, &[true, false], SeriesLength::BestOf3);
    assert_eq!(complete_match(&t, m.id, tied_elsewhere), t);

    let mut half_right = player1_sweeps(&m);
    half_right.player_o = other.player1.clone();
    assert_eq!(complete_match(&t, m.id, half_right), t);
}

#[test]
fn series_with_colors_swapped_is_accepted() {
    let t = started(4, 2);
    let m = t.matches[0].clone();
    let mut result = player1_sweeps(&m);
    std::mem::swap(&mut result.player_x, &mut result.player_o);
    let next = complete_match(&t, m.id, result);
    let done = next.get_match(m.id).unwrap();
    assert!(done.is_completed());
    assert_eq!(done.winner().map(|p| p.id), Some(m.player1.id));
}

#[test]
fn tied_series_leaves_lone_winner_as_champion_early() {
    let t = started(4, 10);
    let (tied, decided) = (t.matches[0].clone(), t.matches[1].clone());
    let t = complete_match(&t, tied.id, series(&tied, &[true, false], SeriesLength::BestOf3));
    assert_eq!(t.status, TournamentStatus::InProgress);
    let t = complete_match(&t, decided.id, player1_sweeps(&decided));

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.matches.len(), 2);
    assert_eq!(t.winner.as_ref().map(|p| p.id), Some(decided.player1.id));
    assert!(t.completed_at.is_some());
}

#[test]
fn tied_final_ends_without_champion() {
    let t = started(2, 0);
    let m = t.matches[0].clone();
    let t = complete_match(&t, m.id, series(&m, &[true, false], SeriesLength::BestOf3));
    assert_eq!(t.status, TournamentStatus::Completed);
    assert!(t.winner.is_none());
    assert_eq!(t.matches.len(), 1);
}

#[test]
fn opened_match_still_completes() {
    let t = started(2, 6);
    let id = t.matches[0].id;
    let opened = mark_match_in_progress(&t, id);
    assert_eq!(opened.matches[0].status, MatchStatus::InProgress);
    assert_eq!(t.matches[0].status, MatchStatus::Pending);

    let m = opened.matches[0].clone();
    let done = complete_match(&opened, id, player1_sweeps(&m));
    assert_eq!(done.status, TournamentStatus::Completed);
    assert_eq!(done.winner.as_ref().map(|p| p.id), Some(m.player1.id));
    assert_eq!(mark_match_in_progress(&done, id).matches[0].status, MatchStatus::Completed);
}

#[test]
fn progress_tracks_completed_matches() {
    let t = started(4, 8);
    let p = progress(&t);
    assert_eq!((p.total_matches, p.completed_matches), (2, 0));
    assert!(!p.current_round_complete);

    let m = t.matches[0].clone();
    let t = complete_match(&t, m.id, player1_sweeps(&m));
    let p = progress(&t);
    assert_eq!(p.completed_matches, 1);
    assert!((p.percent - 50.0).abs() < f64::EPSILON);

    let done = progress(&play_out(t));
    assert!(done.is_complete);
    assert_eq!(done.completed_matches, done.total_matches);
}

#[test]
fn snapshot_survives_json_round_trip() {
    let t = play_out(started(4, 12));
    let json = serde_json::to_string(&t).unwrap();
    let back: Tournament = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
