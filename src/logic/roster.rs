//! Player rosters from CSV: one player per line, name in the first column.

use crate::logic::setup::create_tournament;
use crate::models::{SeriesLength, Tournament, TournamentError, TournamentFormat};
use std::io::Read;

/// Errors while turning a roster into a tournament.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    Tournament(TournamentError),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Could not read roster: {}", e),
            RosterError::Tournament(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

impl From<TournamentError> for RosterError {
    fn from(e: TournamentError) -> Self {
        RosterError::Tournament(e)
    }
}

/// Read player names. An optional `name` header line is skipped, as are
/// blank lines; extra columns are ignored.
pub fn read_player_names<R: Read>(reader: R) -> Result<Vec<String>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let Some(name) = record.get(0).filter(|n| !n.is_empty()) else {
            continue;
        };
        if line == 0 && name.eq_ignore_ascii_case("name") {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Create a Pending tournament from a CSV roster.
pub fn tournament_from_roster<R: Read>(
    name: &str,
    reader: R,
    format: TournamentFormat,
    series_length: SeriesLength,
) -> Result<Tournament, RosterError> {
    let names = read_player_names(reader)?;
    Ok(create_tournament(name, &names, format, series_length)?)
}
