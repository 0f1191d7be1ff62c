use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::match_dataset::{MatchResult, Venue};

/// Accumulated league state for one club after its r-th played match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsEntry {
    pub club: String,
    pub chronological_round: u32,
    pub points: u32,
    pub goal_difference: i32,
    pub rank: u32,
}

/// The reconstructed season: one [`StandingsEntry`] per
/// (club, chronological round). A club that has played fewer than r matches
/// contributes nothing at round r; callers must treat that as data absent,
/// never as "rank unchanged".
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    entries: HashMap<(String, u32), StandingsEntry>,
    clubs: Vec<String>,
    played: HashMap<String, u32>,
    rounds: u32,
}

/// Rebuild running points, goal difference and rank per club per round.
///
/// Matches are ordered per club strictly by date; the nominal round label is
/// ignored. Sorting by the label connects league positions that were never
/// adjacent in time when a catch-up fixture is played out of sequence.
pub fn build_standings(matches: &[MatchResult]) -> SeasonTable {
    let mut by_club: BTreeMap<&str, Vec<&MatchResult>> = BTreeMap::new();
    for m in matches {
        by_club.entry(m.club.as_str()).or_default().push(m);
    }
    let grouped: Vec<(&str, Vec<&MatchResult>)> = by_club.into_iter().collect();

    // Per-club prefix sums are independent; fold them in parallel.
    let folded: Vec<(String, Vec<StandingsEntry>)> = grouped
        .into_par_iter()
        .map(|(club, mut club_matches)| {
            // Stable sort keeps input order for same-date matches.
            club_matches.sort_by_key(|m| m.date);
            let mut points = 0u32;
            let mut goal_difference = 0i32;
            let entries = club_matches
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    points += u32::from(m.points);
                    goal_difference += m.goals_for - m.goals_against;
                    StandingsEntry {
                        club: club.to_string(),
                        chronological_round: (i + 1) as u32,
                        points,
                        goal_difference,
                        rank: 0,
                    }
                })
                .collect();
            (club.to_string(), entries)
        })
        .collect();

    let rounds = folded.iter().map(|(_, e)| e.len() as u32).max().unwrap_or(0);

    let mut table = SeasonTable {
        entries: HashMap::new(),
        clubs: folded.iter().map(|(club, _)| club.clone()).collect(),
        played: folded
            .iter()
            .map(|(club, e)| (club.clone(), e.len() as u32))
            .collect(),
        rounds,
    };

    // Rank each round over the clubs that have actually played that many
    // matches. Tie on points and goal difference breaks by club name so the
    // output is reproducible.
    for r in 1..=rounds {
        let mut round_entries: Vec<StandingsEntry> = folded
            .iter()
            .filter_map(|(_, entries)| entries.get((r - 1) as usize).cloned())
            .collect();
        round_entries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.goal_difference.cmp(&a.goal_difference))
                .then(a.club.cmp(&b.club))
        });
        for (pos, mut entry) in round_entries.into_iter().enumerate() {
            entry.rank = (pos + 1) as u32;
            table.entries.insert((entry.club.clone(), r), entry);
        }
    }

    table
}

impl SeasonTable {
    pub fn entry(&self, club: &str, round: u32) -> Option<&StandingsEntry> {
        self.entries.get(&(club.to_string(), round))
    }

    /// Clubs in name order. Clubs with zero matches never appear.
    pub fn clubs(&self) -> &[String] {
        &self.clubs
    }

    /// Highest chronological round any club has reached.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn matches_played(&self, club: &str) -> u32 {
        self.played.get(club).copied().unwrap_or(0)
    }

    /// The club's state after its last played match.
    pub fn final_entry(&self, club: &str) -> Option<&StandingsEntry> {
        let played = self.played.get(club)?;
        self.entry(club, *played)
    }

    /// All entries for one round, in rank order.
    pub fn round_table(&self, round: u32) -> Vec<&StandingsEntry> {
        let mut entries: Vec<&StandingsEntry> = self
            .clubs
            .iter()
            .filter_map(|club| self.entries.get(&(club.clone(), round)))
            .collect();
        entries.sort_by_key(|e| e.rank);
        entries
    }

    /// League position per round, `None` where the club has not yet played
    /// that many matches (e.g. a postponed fixture).
    pub fn position_trace(&self, club: &str) -> Vec<Option<u32>> {
        (1..=self.rounds)
            .map(|r| self.entry(club, r).map(|e| e.rank))
            .collect()
    }

    /// Like [`position_trace`](Self::position_trace) but `None` whenever the
    /// club sits below position `n`. Plotting the gaps as line breaks keeps
    /// a club's re-entry into the top n from being drawn as a straight
    /// connection across the rounds it spent outside it.
    pub fn top_n_trace(&self, club: &str, n: u32) -> Vec<Option<u32>> {
        (1..=self.rounds)
            .map(|r| {
                self.entry(club, r)
                    .map(|e| e.rank)
                    .filter(|rank| *rank <= n)
            })
            .collect()
    }
}

/// Points and goal difference per club split by venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueTotals {
    pub matches: u32,
    pub points: u32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueSplit {
    pub home: VenueTotals,
    pub away: VenueTotals,
}

pub fn venue_split(matches: &[MatchResult]) -> BTreeMap<String, VenueSplit> {
    let mut out: BTreeMap<String, VenueSplit> = BTreeMap::new();
    for m in matches {
        let split = out.entry(m.club.clone()).or_default();
        let totals = match m.venue {
            Venue::Home => &mut split.home,
            Venue::Away => &mut split.away,
        };
        totals.matches += 1;
        totals.points += u32::from(m.points);
        totals.goal_difference += m.goals_for - m.goals_against;
    }
    out
}
