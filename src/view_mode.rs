use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Snapshot, format_snapshot_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewMode {
    Single,
    Evolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisStrategy {
    Season,
    Round,
    Index,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSelection {
    pub mode: ViewMode,
    pub strategy: AxisStrategy,
    pub labels: Vec<String>,
}

pub fn select_view(filtered: &[Snapshot]) -> ViewSelection {
    let mode = if filtered.len() <= 1 {
        ViewMode::Single
    } else {
        ViewMode::Evolution
    };
    let strategy = pick_strategy(filtered);
    ViewSelection {
        mode,
        strategy,
        labels: axis_labels(filtered, strategy),
    }
}

// Data from different scrape eras carries different fields; take the most
// meaningful axis the whole sequence supports.
fn pick_strategy(snapshots: &[Snapshot]) -> AxisStrategy {
    let all_seasons = !snapshots.is_empty() && snapshots.iter().all(|s| s.season.is_some());
    if all_seasons {
        let distinct: BTreeSet<&str> = snapshots
            .iter()
            .filter_map(|s| s.season.as_deref())
            .collect();
        if distinct.len() > 1 {
            return AxisStrategy::Season;
        }
    }
    if snapshots.iter().any(|s| s.round.is_some()) {
        return AxisStrategy::Round;
    }
    if snapshots.len() > 1 {
        return AxisStrategy::Index;
    }
    AxisStrategy::Date
}

pub fn axis_labels(snapshots: &[Snapshot], strategy: AxisStrategy) -> Vec<String> {
    snapshots
        .iter()
        .enumerate()
        .map(|(idx, snap)| match strategy {
            AxisStrategy::Season => snap.season.clone().unwrap_or_default(),
            AxisStrategy::Round => match snap.round {
                Some(round) => format!("Journée {round}"),
                None => format!("Snapshot {}", idx + 1),
            },
            AxisStrategy::Index => format!("Journée {}", idx + 1),
            AxisStrategy::Date => format_snapshot_date(&snap.date),
        })
        .collect()
}
