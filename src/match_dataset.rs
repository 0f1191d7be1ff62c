use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::load::{csv_error, lenient_f64, resolve_column, DatasetError, LoadSummary};

/// Column contract for club results exports.
const COL_CLUB: &str = "Club";
const COL_DATE: &str = "Date";
const COL_ROUND: &str = "Round";
const COL_POINTS: &str = "Points";
const COL_GF: &str = "GF";
const COL_GA: &str = "GA";
const COL_VENUE: &str = "Venue";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    fn parse(raw: &str) -> Option<Venue> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" | "h" => Some(Venue::Home),
            "away" | "a" => Some(Venue::Away),
            _ => None,
        }
    }
}

/// One finished match from a club's point of view. Immutable once loaded.
///
/// `round_label` is the nominal schedule label ("Matchweek 12"). It is kept
/// for display only: catch-up fixtures make it unreliable for ordering, so
/// the standings engine derives its own chronological index from `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub club: String,
    pub date: NaiveDate,
    pub round_label: Option<String>,
    pub points: u8,
    pub goals_for: i32,
    pub goals_against: i32,
    pub venue: Venue,
}

#[derive(Debug, Clone)]
pub struct LoadedMatches {
    pub matches: Vec<MatchResult>,
    pub summary: LoadSummary,
}

pub fn load_match_results(path: &Path) -> Result<LoadedMatches, DatasetError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        source_name: source_name.clone(),
        source,
    })?;
    read_match_results(file, &source_name)
}

/// Reader-based loader so tests can feed CSV text directly.
pub fn read_match_results<R: Read>(
    rdr: R,
    source_name: &str,
) -> Result<LoadedMatches, DatasetError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();

    let club_idx = resolve_column(&headers, COL_CLUB, source_name)?;
    let date_idx = resolve_column(&headers, COL_DATE, source_name)?;
    let round_idx = resolve_column(&headers, COL_ROUND, source_name)?;
    let points_idx = resolve_column(&headers, COL_POINTS, source_name)?;
    let gf_idx = resolve_column(&headers, COL_GF, source_name)?;
    let ga_idx = resolve_column(&headers, COL_GA, source_name)?;
    let venue_idx = resolve_column(&headers, COL_VENUE, source_name)?;

    let mut matches = Vec::new();
    let mut summary = LoadSummary::default();

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| csv_error(source_name, e))?;
        summary.rows_read += 1;

        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let club = cell(club_idx);
        if club.is_empty() {
            summary.skip_row(source_name, row, "empty club");
            continue;
        }

        let Some(date) = parse_date(cell(date_idx)) else {
            summary.skip_row(source_name, row, "unparsable date");
            continue;
        };

        let Some(venue) = Venue::parse(cell(venue_idx)) else {
            summary.skip_row(source_name, row, "unknown venue");
            continue;
        };

        let points = match lenient_f64(cell(points_idx)) {
            Some(v) => v.round().clamp(0.0, u8::MAX as f64) as u8,
            None => {
                summary.substitute_zero(source_name, row, COL_POINTS, cell(points_idx));
                0
            }
        };

        // Missing goal data degrades the whole score to 0-0 rather than
        // inventing a one-sided result.
        let gf = lenient_f64(cell(gf_idx));
        let ga = lenient_f64(cell(ga_idx));
        let (goals_for, goals_against) = match (gf, ga) {
            (Some(gf), Some(ga)) => (gf.round() as i32, ga.round() as i32),
            _ => {
                if gf.is_none() {
                    summary.substitute_zero(source_name, row, COL_GF, cell(gf_idx));
                }
                if ga.is_none() {
                    summary.substitute_zero(source_name, row, COL_GA, cell(ga_idx));
                }
                (0, 0)
            }
        };

        let round_label = match cell(round_idx) {
            "" => None,
            label => Some(label.to_string()),
        };

        matches.push(MatchResult {
            club: club.to_string(),
            date,
            round_label,
            points,
            goals_for,
            goals_against,
            venue,
        });
    }

    Ok(LoadedMatches { matches, summary })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
