use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::load::{csv_error, leading_u32, lenient_f64, resolve_column, DatasetError, LoadSummary};

const COL_PLAYER: &str = "Player";
const COL_CLUB: &str = "Club";
const COL_NATION: &str = "Nation";
const COL_POS: &str = "Pos";
const COL_AGE: &str = "Age";
const COL_MIN: &str = "Min";

/// One player's season totals plus the raw stat columns a view consumes.
///
/// Raw input may contain the same player more than once (mid-season
/// transfers merged from different source tables); see
/// [`dedup_first_occurrence`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonStat {
    pub player: String,
    pub club: String,
    pub nation: String,
    pub position: String,
    pub age: Option<u32>,
    pub minutes: u32,
    pub stats: HashMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct LoadedPlayers {
    pub players: Vec<PlayerSeasonStat>,
    pub summary: LoadSummary,
}

/// Load a player stats export. `stat_columns` lists the numeric columns the
/// caller's view needs; each is required and its absence is fatal.
pub fn load_player_stats(
    path: &Path,
    stat_columns: &[&str],
) -> Result<LoadedPlayers, DatasetError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        source_name: source_name.clone(),
        source,
    })?;
    read_player_stats(file, stat_columns, &source_name)
}

pub fn read_player_stats<R: Read>(
    rdr: R,
    stat_columns: &[&str],
    source_name: &str,
) -> Result<LoadedPlayers, DatasetError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();

    let player_idx = resolve_column(&headers, COL_PLAYER, source_name)?;
    let club_idx = resolve_column(&headers, COL_CLUB, source_name)?;
    let nation_idx = resolve_column(&headers, COL_NATION, source_name)?;
    let pos_idx = resolve_column(&headers, COL_POS, source_name)?;
    let age_idx = resolve_column(&headers, COL_AGE, source_name)?;
    let min_idx = resolve_column(&headers, COL_MIN, source_name)?;

    let mut stat_idx = Vec::with_capacity(stat_columns.len());
    for column in stat_columns {
        stat_idx.push((column.to_string(), resolve_column(&headers, column, source_name)?));
    }

    let mut players = Vec::new();
    let mut summary = LoadSummary::default();

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| csv_error(source_name, e))?;
        summary.rows_read += 1;

        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let player = cell(player_idx);
        if player.is_empty() {
            summary.skip_row(source_name, row, "empty player name");
            continue;
        }

        let minutes = match lenient_f64(cell(min_idx)) {
            Some(v) => v.round().max(0.0) as u32,
            None => {
                summary.substitute_zero(source_name, row, COL_MIN, cell(min_idx));
                0
            }
        };

        let mut stats = HashMap::with_capacity(stat_idx.len());
        for (column, idx) in &stat_idx {
            let value = match lenient_f64(cell(*idx)) {
                Some(v) => v,
                None => {
                    summary.substitute_zero(source_name, row, column, cell(*idx));
                    0.0
                }
            };
            stats.insert(column.clone(), value);
        }

        players.push(PlayerSeasonStat {
            player: player.to_string(),
            club: cell(club_idx).to_string(),
            nation: cell(nation_idx).to_string(),
            position: cell(pos_idx).to_string(),
            age: leading_u32(cell(age_idx)),
            minutes,
            stats,
        });
    }

    Ok(LoadedPlayers { players, summary })
}

/// Collapse duplicate rows sharing (player, nation, position), keeping the
/// first occurrence in file order. Which duplicate is authoritative is a
/// policy decision (the source data gives none); first-in-file is the
/// deterministic choice this crate commits to.
pub fn dedup_first_occurrence(players: &[PlayerSeasonStat]) -> Vec<&PlayerSeasonStat> {
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::with_capacity(players.len());
    let mut out = Vec::with_capacity(players.len());
    for p in players {
        if seen.insert((p.player.as_str(), p.nation.as_str(), p.position.as_str())) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{dedup_first_occurrence, PlayerSeasonStat};
    use std::collections::HashMap;

    fn player(name: &str, club: &str, pos: &str, minutes: u32) -> PlayerSeasonStat {
        PlayerSeasonStat {
            player: name.to_string(),
            club: club.to_string(),
            nation: "eng ENG".to_string(),
            position: pos.to_string(),
            age: Some(25),
            minutes,
            stats: HashMap::new(),
        }
    }

    #[test]
    fn dedup_keeps_first_row() {
        let rows = vec![
            player("A", "Arsenal", "FW", 900),
            player("A", "Chelsea", "FW", 300),
            player("A", "Arsenal", "MF", 200),
            player("B", "Leeds", "FW", 500),
        ];
        let deduped = dedup_first_occurrence(&rows);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].club, "Arsenal");
        assert_eq!(deduped[0].minutes, 900);
        // Same player under a different position is a distinct entry.
        assert_eq!(deduped[1].position, "MF");
    }
}
