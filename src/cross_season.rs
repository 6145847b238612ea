use crate::model::{SeasonDatabase, Snapshot, seasons_desc};
use crate::validate::valid_clubs;

/// One representative snapshot per season (its last matchday), most recent season first.
///
/// Seasons without a single valid snapshot are skipped. Fewer than two
/// representatives make a cross-season chart meaningless; callers fall back to
/// the latest season's own evolution in that case.
pub fn build_cross_season_snapshots(db: &SeasonDatabase) -> Vec<Snapshot> {
    collect_representatives(db, None)
}

/// Same as [`build_cross_season_snapshots`], considering only one standings type.
pub fn build_cross_season_snapshots_of_type(
    db: &SeasonDatabase,
    standings_type: &str,
) -> Vec<Snapshot> {
    collect_representatives(db, Some(standings_type))
}

fn collect_representatives(db: &SeasonDatabase, standings_type: Option<&str>) -> Vec<Snapshot> {
    let mut out = Vec::new();
    for season in seasons_desc(db) {
        let Some(snapshots) = db.get(&season) else {
            continue;
        };
        let last = snapshots
            .iter()
            .filter(|snap| standings_type.is_none_or(|kind| snap.standings_type == kind))
            .filter_map(|snap| {
                let clubs = valid_clubs(&snap.clubs);
                if clubs.is_empty() {
                    None
                } else {
                    Some(Snapshot {
                        clubs,
                        ..snap.clone()
                    })
                }
            })
            // max_by_key keeps the last of equal keys, i.e. the latest scrape.
            .max_by_key(|snap| (snap.round_key(), snap.timestamp()));
        if let Some(mut rep) = last {
            rep.season = Some(season);
            rep.cross_season = true;
            out.push(rep);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClubEntry;

    #[test]
    fn picks_latest_round_even_when_scraped_early() {
        let mut db = SeasonDatabase::new();
        db.insert(
            "2023-2024".to_string(),
            vec![
                Snapshot::new("2024-05-19", Some(34), vec![ClubEntry::new("Brest", 3)]),
                Snapshot::new("2024-03-01", Some(25), vec![ClubEntry::new("Brest", 4)]),
            ],
        );
        let reps = build_cross_season_snapshots(&db);
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].round, Some(34));
        assert!(reps[0].cross_season);
    }

    #[test]
    fn date_breaks_round_ties() {
        let mut db = SeasonDatabase::new();
        db.insert(
            "2021-2022".to_string(),
            vec![
                Snapshot::new("2022-05-21T22:00:00", None, vec![ClubEntry::new("Nice", 5)]),
                Snapshot::new("2022-01-10T22:00:00", None, vec![ClubEntry::new("Nice", 2)]),
            ],
        );
        let reps = build_cross_season_snapshots(&db);
        assert_eq!(reps[0].clubs[0].position, Some(5));
    }
}
