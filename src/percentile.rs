use std::collections::HashMap;

use rayon::prelude::*;

use crate::player_dataset::{dedup_first_occurrence, PlayerSeasonStat};
use crate::view_config::{StatSpec, StatTransform, ViewConfig};

/// The reference population a percentile is computed against: one position,
/// minimum minutes played. Percentiles are never computed across positions
/// or against unfiltered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortFilter {
    pub position: String,
    pub min_minutes: u32,
}

impl CohortFilter {
    pub fn new(position: &str, min_minutes: u32) -> CohortFilter {
        CohortFilter {
            position: position.to_string(),
            min_minutes,
        }
    }
}

impl From<&ViewConfig> for CohortFilter {
    fn from(view: &ViewConfig) -> CohortFilter {
        CohortFilter::new(&view.position, view.min_minutes)
    }
}

/// One qualifying player's normalized rates and percentile ranks, keyed by
/// stat column.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPercentiles {
    pub player: String,
    pub club: String,
    pub nation: String,
    pub position: String,
    pub age: Option<u32>,
    pub minutes: u32,
    pub rates: HashMap<String, f64>,
    pub percentiles: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PercentileTable {
    rows: Vec<PlayerPercentiles>,
}

impl PercentileTable {
    /// Cohort members in input order.
    pub fn rows(&self) -> &[PlayerPercentiles] {
        &self.rows
    }

    pub fn get(&self, player: &str) -> Option<&PlayerPercentiles> {
        self.rows.iter().find(|r| r.player == player)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalize raw season stats to comparable rates and rank each cohort
/// member against the others.
///
/// Duplicated input rows collapse to their first occurrence before anything
/// is counted, so a player transferred mid-season enters the cohort once.
/// Percentile is the strict less-than count over the cohort, scaled to
/// 0-100: ties are not split, all tied players get the percentile of the
/// count strictly below them. An empty cohort yields an empty table.
pub fn normalize_and_rank(
    players: &[PlayerSeasonStat],
    stats: &[StatSpec],
    filter: &CohortFilter,
) -> PercentileTable {
    let deduped = dedup_first_occurrence(players);
    let cohort: Vec<&PlayerSeasonStat> = deduped
        .into_iter()
        .filter(|p| {
            p.position.eq_ignore_ascii_case(&filter.position) && p.minutes >= filter.min_minutes
        })
        .collect();

    if cohort.is_empty() {
        return PercentileTable::default();
    }

    // Stats are independent of each other; rank them in parallel. Each
    // result slot lines up with the cohort index.
    let per_stat: Vec<(&str, Vec<Option<(f64, f64)>>)> = stats
        .par_iter()
        .map(|spec| (spec.column.as_str(), rank_stat(&cohort, spec)))
        .collect();

    let mut rows: Vec<PlayerPercentiles> = cohort
        .iter()
        .map(|p| PlayerPercentiles {
            player: p.player.clone(),
            club: p.club.clone(),
            nation: p.nation.clone(),
            position: p.position.clone(),
            age: p.age,
            minutes: p.minutes,
            rates: HashMap::with_capacity(stats.len()),
            percentiles: HashMap::with_capacity(stats.len()),
        })
        .collect();

    for (column, ranked) in per_stat {
        for (row, slot) in rows.iter_mut().zip(ranked) {
            if let Some((rate, percentile)) = slot {
                row.rates.insert(column.to_string(), rate);
                row.percentiles.insert(column.to_string(), percentile);
            }
        }
    }

    PercentileTable { rows }
}

fn rank_stat(cohort: &[&PlayerSeasonStat], spec: &StatSpec) -> Vec<Option<(f64, f64)>> {
    let rates: Vec<Option<f64>> = cohort.iter().map(|p| stat_rate(p, spec)).collect();

    let mut sorted: Vec<f64> = rates.iter().filter_map(|r| *r).collect();
    sorted.sort_unstable_by(f64::total_cmp);
    let population = sorted.len();

    rates
        .into_iter()
        .map(|rate| {
            let rate = rate?;
            let below = sorted.partition_point(|v| *v < rate);
            let percentile = below as f64 / population as f64 * 100.0;
            Some((rate, percentile))
        })
        .collect()
}

fn stat_rate(player: &PlayerSeasonStat, spec: &StatSpec) -> Option<f64> {
    let raw = player.stats.get(&spec.column).copied()?;
    if !raw.is_finite() {
        return None;
    }
    match spec.transform {
        StatTransform::Passthrough => Some(raw),
        StatTransform::Per90 => {
            // Minutes can only be 0 here when min_minutes is configured 0;
            // no rate exists for such a player.
            if player.minutes == 0 {
                None
            } else {
                Some(raw / player.minutes as f64 * 90.0)
            }
        }
    }
}
