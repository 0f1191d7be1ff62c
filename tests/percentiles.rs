use std::collections::HashMap;

use season_engine::percentile::{normalize_and_rank, CohortFilter};
use season_engine::player_dataset::PlayerSeasonStat;
use season_engine::view_config::{builtin_view, StatSpec};

fn defender(name: &str, minutes: u32, tackles: f64) -> PlayerSeasonStat {
    PlayerSeasonStat {
        player: name.to_string(),
        club: "Club".to_string(),
        nation: "eng ENG".to_string(),
        position: "DF".to_string(),
        age: Some(25),
        minutes,
        stats: HashMap::from([("Tkl".to_string(), tackles)]),
    }
}

fn tackle_stats() -> [StatSpec; 1] {
    [StatSpec::per90("Tkl", "Tackles")]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn five_defender_cohort_matches_hand_computed_percentiles() {
    // 900 minutes each, so per-90 tackle rates are raw / 10:
    // [1.0, 2.0, 2.0, 3.0, 4.0].
    let players = vec![
        defender("P1", 900, 10.0),
        defender("P2", 900, 20.0),
        defender("P3", 900, 20.0),
        defender("P4", 900, 30.0),
        defender("P5", 900, 40.0),
    ];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("DF", 300));
    assert_eq!(table.len(), 5);

    let expected = [0.0, 20.0, 20.0, 60.0, 80.0];
    for (i, want) in expected.iter().enumerate() {
        let row = table.get(&format!("P{}", i + 1)).expect("ranked");
        assert!(
            close(row.percentiles["Tkl"], *want),
            "P{}: got {}, want {want}",
            i + 1,
            row.percentiles["Tkl"]
        );
    }
    assert!(close(table.get("P1").unwrap().rates["Tkl"], 1.0));
    assert!(close(table.get("P5").unwrap().rates["Tkl"], 4.0));
}

#[test]
fn percentiles_stay_below_one_hundred_and_floor_at_zero() {
    let players = vec![
        defender("Low A", 900, 9.0),
        defender("Low B", 900, 9.0),
        defender("High", 900, 18.0),
    ];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("DF", 300));

    // Tied minimum values both sit at percentile 0.
    assert!(close(table.get("Low A").unwrap().percentiles["Tkl"], 0.0));
    assert!(close(table.get("Low B").unwrap().percentiles["Tkl"], 0.0));

    // The best player's percentile is (n-1)/n * 100, never 100.
    let top = table.get("High").unwrap().percentiles["Tkl"];
    assert!(close(top, 200.0 / 3.0));
    for row in table.rows() {
        let p = row.percentiles["Tkl"];
        assert!((0.0..100.0).contains(&p), "percentile out of range: {p}");
    }
}

#[test]
fn duplicate_rows_collapse_to_first_occurrence() {
    let mut transferred = defender("Mover", 400, 8.0);
    transferred.club = "Second Club".to_string();
    transferred.stats.insert("Tkl".to_string(), 99.0);

    let players = vec![
        defender("Mover", 900, 30.0),
        transferred,
        defender("Other", 900, 10.0),
    ];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("DF", 300));

    assert_eq!(table.len(), 2);
    let mover = table.get("Mover").expect("one entry for the mover");
    assert_eq!(mover.club, "Club");
    assert!(close(mover.rates["Tkl"], 3.0));
}

#[test]
fn cohort_is_position_and_minutes_filtered() {
    let mut midfielder = defender("Mid", 900, 50.0);
    midfielder.position = "MF".to_string();

    let players = vec![
        defender("Starter", 900, 20.0),
        defender("Benchwarmer", 120, 5.0),
        midfielder,
    ];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("DF", 300));

    assert_eq!(table.len(), 1);
    assert!(table.get("Benchwarmer").is_none());
    assert!(table.get("Mid").is_none());
    // A cohort of one ranks at 0 by the strict less-than rule.
    assert!(close(table.get("Starter").unwrap().percentiles["Tkl"], 0.0));
}

#[test]
fn empty_cohort_is_empty_not_an_error() {
    let players = vec![defender("Only", 900, 20.0)];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("GK", 300));
    assert!(table.is_empty());
    assert!(table.get("Only").is_none());
}

#[test]
fn passthrough_stats_are_not_per_90_scaled() {
    let mut a = defender("A", 450, 0.0);
    a.stats.insert("Tkl%".to_string(), 62.5);
    let mut b = defender("B", 1800, 0.0);
    b.stats.insert("Tkl%".to_string(), 48.0);

    let stats = [StatSpec::passthrough("Tkl%", "% of tackles won")];
    let table = normalize_and_rank(&[a, b], &stats, &CohortFilter::new("DF", 300));

    // Different minutes, identical treatment: the raw value is the rate.
    assert!(close(table.get("A").unwrap().rates["Tkl%"], 62.5));
    assert!(close(table.get("B").unwrap().rates["Tkl%"], 48.0));
    assert!(close(table.get("A").unwrap().percentiles["Tkl%"], 50.0));
}

#[test]
fn zero_minutes_player_gets_no_per_90_rate() {
    // Only reachable when the minutes floor is configured to 0.
    let players = vec![defender("Unused", 0, 0.0), defender("Played", 900, 20.0)];
    let table = normalize_and_rank(&players, &tackle_stats(), &CohortFilter::new("DF", 0));

    assert_eq!(table.len(), 2);
    let unused = table.get("Unused").unwrap();
    assert!(!unused.rates.contains_key("Tkl"));
    assert!(!unused.percentiles.contains_key("Tkl"));

    // The zero-minutes player is excluded from the stat's population, so
    // the only rated player is alone in it.
    assert!(close(table.get("Played").unwrap().percentiles["Tkl"], 0.0));
}

#[test]
fn builtin_view_drives_the_cohort_filter() {
    let view = builtin_view("defenders").expect("builtin defenders view");
    let filter = CohortFilter::from(view);
    assert_eq!(filter.position, "DF");
    assert_eq!(filter.min_minutes, 300);

    let mut player = defender("Full", 900, 0.0);
    for column in view.stat_columns() {
        player.stats.insert(column.to_string(), 9.0);
    }
    let players = vec![player];
    let table = normalize_and_rank(&players, &view.stats, &filter);
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.rates.len(), view.stats.len());
    // Per-90 column scaled, passthrough column untouched.
    assert!(close(row.rates["Int"], 0.9));
    assert!(close(row.rates["Tkl%"], 9.0));
}
