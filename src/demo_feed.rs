use std::collections::HashMap;

use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{ClubEntry, SeasonDatabase, Snapshot};

const CORE_CLUBS: &[&str] = &[
    "Paris SG",
    "Marseille",
    "Monaco",
    "Lille",
    "Lyon",
    "Nice",
    "Lens",
    "Rennes",
    "Brest",
    "Reims",
    "Strasbourg",
    "Toulouse",
    "Montpellier",
    "Nantes",
    "Le Havre",
];
// Three of these rotate in and out between seasons.
const ROTATING_CLUBS: &[&str] = &["Lorient", "Metz", "Clermont", "Auxerre", "Angers", "Saint-Étienne"];

const NOISE_NAMES: &[&str] = &["Sélectionner un club", "Journée 12", "Pts"];

struct DemoSeason {
    key: &'static str,
    start: (i32, u32, u32),
    rounds: u32,
    /// Older scrapes carried dates only.
    with_rounds: bool,
}

const SEASONS: &[DemoSeason] = &[
    DemoSeason {
        key: "2022-2023",
        start: (2022, 8, 6),
        rounds: 38,
        with_rounds: false,
    },
    DemoSeason {
        key: "2023-2024",
        start: (2023, 8, 12),
        rounds: 34,
        with_rounds: true,
    },
    DemoSeason {
        key: "2024-2025",
        start: (2024, 8, 17),
        rounds: 12,
        with_rounds: true,
    },
];

#[derive(Debug, Clone, Default)]
struct Tally {
    points: i64,
    played: i64,
    wins: i64,
    draws: i64,
    losses: i64,
    goals_for: i64,
    goals_against: i64,
}

/// A synthetic season database shaped like the scraper output, noise included.
pub fn demo_database(seed: Option<u64>) -> SeasonDatabase {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut db = SeasonDatabase::new();
    for (season_idx, season) in SEASONS.iter().enumerate() {
        let mut clubs: Vec<&str> = CORE_CLUBS.to_vec();
        clubs.extend(ROTATING_CLUBS.iter().skip(season_idx).take(3));
        let strength: HashMap<&str, f64> = clubs
            .iter()
            .map(|c| (*c, rng.gen_range(0.25..0.75)))
            .collect();

        let mut general: HashMap<&str, Tally> = HashMap::new();
        let mut home: HashMap<&str, Tally> = HashMap::new();
        let mut away: HashMap<&str, Tally> = HashMap::new();
        let mut snapshots = Vec::new();

        let (y, m, d) = season.start;
        let start = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

        for round in 1..=season.rounds {
            for (idx, club) in clubs.iter().enumerate() {
                let at_home = (idx as u32 + round) % 2 == 0;
                let mut edge = strength[club];
                if at_home {
                    edge += 0.08;
                }
                let scored = rng.gen_range(0..=3_i64) + i64::from(rng.gen_bool(edge.clamp(0.05, 0.95)));
                let conceded = rng.gen_range(0..=3);
                let bucket = if at_home { &mut home } else { &mut away };
                for tally in [general.entry(*club).or_default(), bucket.entry(*club).or_default()] {
                    record(tally, scored, conceded);
                }
            }

            let date = (start + ChronoDuration::days(7 * i64::from(round - 1)))
                .format("%Y-%m-%dT20:45:00")
                .to_string();
            let round_field = season.with_rounds.then_some(round);
            for (kind, tallies) in [("general", &general), ("home", &home), ("away", &away)] {
                let mut clubs = table_from(tallies);
                if rng.gen_bool(0.3) {
                    let noise = NOISE_NAMES[rng.gen_range(0..NOISE_NAMES.len())];
                    clubs.insert(
                        0,
                        ClubEntry {
                            name: noise.to_string(),
                            position: None,
                            ..ClubEntry::default()
                        },
                    );
                }
                let mut snap = Snapshot::new(&date, round_field, clubs);
                snap.standings_type = kind.to_string();
                snapshots.push(snap);
            }
        }

        // Re-scrapes land out of order; only rounds can put them back.
        if season.with_rounds {
            let len = snapshots.len();
            let tail = len.min(9);
            snapshots[len - tail..].shuffle(&mut rng);
        }
        db.insert(season.key.to_string(), snapshots);
    }
    db
}

fn record(tally: &mut Tally, scored: i64, conceded: i64) {
    tally.played += 1;
    tally.goals_for += scored;
    tally.goals_against += conceded;
    if scored > conceded {
        tally.wins += 1;
        tally.points += 3;
    } else if scored == conceded {
        tally.draws += 1;
        tally.points += 1;
    } else {
        tally.losses += 1;
    }
}

fn table_from(tallies: &HashMap<&str, Tally>) -> Vec<ClubEntry> {
    let mut rows: Vec<(&str, &Tally)> = tallies.iter().map(|(k, v)| (*k, v)).collect();
    rows.sort_by(|(a_name, a), (b_name, b)| {
        b.points
            .cmp(&a.points)
            .then((b.goals_for - b.goals_against).cmp(&(a.goals_for - a.goals_against)))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a_name.cmp(b_name))
    });
    rows.into_iter()
        .enumerate()
        .map(|(idx, (name, t))| ClubEntry {
            name: name.to_string(),
            position: Some(idx as i64 + 1),
            points: Some(t.points),
            played: Some(t.played),
            goal_difference: Some(t.goals_for - t.goals_against),
            wins: Some(t.wins),
            draws: Some(t.draws),
            losses: Some(t.losses),
            goals_for: Some(t.goals_for),
            goals_against: Some(t.goals_against),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot_filter::filter_snapshots;

    #[test]
    fn seeded_demo_is_deterministic() {
        assert_eq!(demo_database(Some(11)), demo_database(Some(11)));
    }

    #[test]
    fn demo_tables_have_eighteen_valid_clubs() {
        let db = demo_database(Some(3));
        assert_eq!(db.len(), 3);
        let filtered = filter_snapshots(&db["2024-2025"], "general");
        assert_eq!(filtered.len(), 12);
        assert!(filtered.iter().all(|s| s.clubs.len() == 18));
        assert_eq!(filtered.last().and_then(|s| s.round), Some(12));
    }
}
