use crate::model::{DEFAULT_STANDINGS_TYPE, Snapshot};
use crate::validate::valid_clubs;

/// Snapshots of one standings type with noise rows removed, in matchday order.
///
/// Snapshots left without a single valid club are dropped. The sort is stable,
/// so snapshots sharing a round (or lacking one) keep their scrape order.
pub fn filter_snapshots(snapshots: &[Snapshot], standings_type: &str) -> Vec<Snapshot> {
    let mut out: Vec<Snapshot> = snapshots
        .iter()
        .filter(|snap| snap.standings_type == standings_type)
        .filter_map(|snap| {
            let clubs = valid_clubs(&snap.clubs);
            if clubs.is_empty() {
                return None;
            }
            Some(Snapshot {
                clubs,
                ..snap.clone()
            })
        })
        .collect();
    out.sort_by_key(Snapshot::round_key);
    out
}

/// Distinct standings types present, "general" first and always listed.
pub fn standings_types(snapshots: &[Snapshot]) -> Vec<String> {
    collect_standings_types(snapshots)
}

/// Same as [`standings_types`] over any borrowed snapshot source, e.g. every
/// season of a database at once.
pub fn collect_standings_types<'a, I>(snapshots: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Snapshot>,
{
    let mut types = vec![DEFAULT_STANDINGS_TYPE.to_string()];
    for snap in snapshots {
        if !types.contains(&snap.standings_type) {
            types.push(snap.standings_type.clone());
        }
    }
    types[1..].sort();
    types
}

pub fn has_standings_type(snapshots: &[Snapshot], standings_type: &str) -> bool {
    snapshots
        .iter()
        .any(|snap| snap.standings_type == standings_type)
}
