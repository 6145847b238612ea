//! One render pass: control state + event in, next state + view model out.
//!
//! Nothing here touches the terminal or the network. The caller owns the
//! database and the [`RenderState`] between events.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::cross_season::build_cross_season_snapshots_of_type;
use crate::model::{
    ClubEntry, DEFAULT_STANDINGS_TYPE, SeasonDatabase, Snapshot, format_snapshot_date,
    seasons_desc,
};
use crate::selection::{SelectionState, apply_selection, club_matches_filter};
use crate::snapshot_filter::{
    collect_standings_types, filter_snapshots, has_standings_type, standings_types,
};
use crate::time_series::{TimeSeries, build_series};
use crate::view_mode::{AxisStrategy, ViewMode, select_view};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    /// `None` selects the cross-season view.
    pub season: Option<String>,
    pub standings_type: String,
    pub selection: SelectionState,
    pub filter: String,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(DEFAULT_STANDINGS_TYPE)
    }
}

impl RenderState {
    pub fn new(standings_type: &str) -> Self {
        Self {
            season: None,
            standings_type: normalize_type(standings_type),
            selection: SelectionState::new(),
            filter: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Load,
    SelectSeason(Option<String>),
    SelectStandingsType(String),
    ToggleClub(String),
    SetFilter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewScope {
    Season(String),
    CrossSeason,
    /// Cross-season was requested but fewer than two seasons have data.
    LatestSeasonFallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NoDataReason {
    EmptyDatabase,
    UnknownSeason(String),
    NoSnapshotsForType(String),
    NoValidClubs,
}

impl NoDataReason {
    pub fn message(&self) -> String {
        match self {
            NoDataReason::EmptyDatabase => "No standings data available".to_string(),
            NoDataReason::UnknownSeason(key) => format!("No standings recorded for season {key}"),
            NoDataReason::NoSnapshotsForType(kind) => {
                format!("No \"{kind}\" standings for this selection")
            }
            NoDataReason::NoValidClubs => "No valid club rows for this selection".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub caption: String,
    pub rows: Vec<ClubEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    pub strategy: AxisStrategy,
    pub labels: Vec<String>,
    pub series: Vec<TimeSeries>,
    pub latest: TableView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewBody {
    NoData(NoDataReason),
    Table(TableView),
    Chart(ChartView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubChoice {
    pub name: String,
    pub checked: bool,
    /// Matches the filter box.
    pub visible: bool,
    pub color_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub scope: Option<ViewScope>,
    pub standings_type: String,
    pub standings_types: Vec<String>,
    pub mode: Option<ViewMode>,
    pub body: ViewBody,
    pub clubs: Vec<ClubChoice>,
    pub note: Option<String>,
}

impl ViewModel {
    fn no_data(state: &RenderState, scope: Option<ViewScope>, reason: NoDataReason) -> Self {
        Self {
            scope,
            standings_type: state.standings_type.clone(),
            standings_types: vec![DEFAULT_STANDINGS_TYPE.to_string()],
            mode: None,
            body: ViewBody::NoData(reason),
            clubs: Vec::new(),
            note: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, ViewBody::NoData(_))
    }
}

struct Scoped {
    scope: ViewScope,
    source: Vec<Snapshot>,
    standings_types: Vec<String>,
    note: Option<String>,
}

pub fn render(
    state: &RenderState,
    event: RenderEvent,
    db: &SeasonDatabase,
    defaults: &[String],
) -> (RenderState, ViewModel) {
    let mut next = state.clone();
    let mut toggle = None;
    match event {
        RenderEvent::Load => {}
        RenderEvent::SelectSeason(season) => next.season = season,
        RenderEvent::SelectStandingsType(kind) => next.standings_type = normalize_type(&kind),
        RenderEvent::ToggleClub(name) => toggle = Some(name),
        RenderEvent::SetFilter(filter) => next.filter = filter,
    }

    let scoped = match resolve_scope(&next, db) {
        Ok(scoped) => scoped,
        Err(reason) => {
            let view = ViewModel::no_data(&next, None, reason);
            return (next, view);
        }
    };

    let mut filtered = filter_snapshots(&scoped.source, &next.standings_type);
    if filtered.is_empty() {
        let reason = if has_standings_type(&scoped.source, &next.standings_type) {
            NoDataReason::NoValidClubs
        } else {
            NoDataReason::NoSnapshotsForType(next.standings_type.clone())
        };
        let mut view = ViewModel::no_data(&next, Some(scoped.scope), reason);
        view.standings_types = scoped.standings_types;
        view.note = scoped.note;
        return (next, view);
    }
    if scoped.scope == ViewScope::CrossSeason {
        // One snapshot per season: season order replaces the matchday order
        // filter_snapshots leaves behind, oldest season on the left.
        filtered.sort_by(|a, b| a.season.cmp(&b.season));
    }

    let selection = select_view(&filtered);
    let mut view = ViewModel {
        scope: Some(scoped.scope),
        standings_type: next.standings_type.clone(),
        standings_types: scoped.standings_types,
        mode: Some(selection.mode),
        body: ViewBody::NoData(NoDataReason::NoValidClubs),
        clubs: Vec::new(),
        note: scoped.note,
    };

    if selection.mode == ViewMode::Single {
        view.body = ViewBody::Table(table_for(&filtered[0]));
        if view.note.is_none() {
            view.note = Some("Only one standings snapshot here, nothing to chart".to_string());
        }
        return (next, view);
    }

    let candidates = candidate_clubs(&filtered);
    if let Some(name) = toggle {
        next.selection.toggle(&name, &candidates);
    }
    let effective = apply_selection(
        &candidates,
        &next.selection.checked,
        next.selection.first_load,
        defaults,
    );
    next.selection.commit(&candidates, &effective);

    let series = build_series(&selection.labels, &filtered, &effective);
    view.clubs = candidates
        .into_iter()
        .map(|name| {
            let color_index = series
                .iter()
                .find(|s| s.club == name)
                .map(|s| s.color_index);
            ClubChoice {
                checked: effective.contains(&name),
                visible: club_matches_filter(&name, &next.filter),
                color_index,
                name,
            }
        })
        .collect();

    let latest = filtered
        .last()
        .map(table_for)
        .unwrap_or_else(|| TableView {
            caption: String::new(),
            rows: Vec::new(),
        });
    view.body = ViewBody::Chart(ChartView {
        strategy: selection.strategy,
        labels: selection.labels,
        series,
        latest,
    });
    (next, view)
}

fn resolve_scope(state: &RenderState, db: &SeasonDatabase) -> Result<Scoped, NoDataReason> {
    if db.is_empty() {
        return Err(NoDataReason::EmptyDatabase);
    }

    if let Some(key) = &state.season {
        let source = match db.get(key) {
            Some(snapshots) if !snapshots.is_empty() => snapshots.clone(),
            _ => return Err(NoDataReason::UnknownSeason(key.clone())),
        };
        return Ok(Scoped {
            scope: ViewScope::Season(key.clone()),
            standings_types: standings_types(&source),
            source,
            note: None,
        });
    }

    let types = collect_standings_types(db.values().flatten());
    let reps = build_cross_season_snapshots_of_type(db, &state.standings_type);
    if reps.len() >= 2 {
        return Ok(Scoped {
            scope: ViewScope::CrossSeason,
            source: reps,
            standings_types: types,
            note: None,
        });
    }

    let latest = match reps.first().and_then(|rep| rep.season.clone()) {
        Some(season) => season,
        None => fallback_season(db, &state.standings_type)?,
    };
    let source = db.get(&latest).cloned().unwrap_or_default();
    Ok(Scoped {
        note: Some(format!(
            "Fewer than two seasons with data, showing {latest}"
        )),
        scope: ViewScope::LatestSeasonFallback(latest),
        standings_types: standings_types(&source),
        source,
    })
}

/// Newest season with a renderable table of the wanted type. Without one, the
/// newest non-empty season, so the empty state can name what is missing.
fn fallback_season(db: &SeasonDatabase, standings_type: &str) -> Result<String, NoDataReason> {
    let seasons = seasons_desc(db);
    seasons
        .iter()
        .find(|key| {
            db.get(*key)
                .is_some_and(|snaps| !filter_snapshots(snaps, standings_type).is_empty())
        })
        .or_else(|| {
            seasons
                .iter()
                .find(|key| db.get(*key).is_some_and(|snaps| !snaps.is_empty()))
        })
        .cloned()
        .ok_or(NoDataReason::EmptyDatabase)
}

/// Sorted, deduplicated club names across the rendered snapshots.
pub fn candidate_clubs(filtered: &[Snapshot]) -> Vec<String> {
    let names: BTreeSet<&str> = filtered
        .iter()
        .flat_map(|snap| snap.clubs.iter().map(|c| c.name.as_str()))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

fn table_for(snap: &Snapshot) -> TableView {
    let mut rows = snap.clubs.clone();
    rows.sort_by_key(|c| c.position.unwrap_or(i64::MAX));
    TableView {
        caption: snapshot_caption(snap),
        rows,
    }
}

pub fn snapshot_caption(snap: &Snapshot) -> String {
    let mut parts = Vec::new();
    if let Some(season) = &snap.season {
        parts.push(season.clone());
    }
    if let Some(round) = snap.round {
        parts.push(format!("Journée {round}"));
    }
    let date = format_snapshot_date(&snap.date);
    if !date.is_empty() {
        parts.push(date);
    }
    parts.join(" | ")
}

fn normalize_type(kind: &str) -> String {
    let kind = kind.trim();
    if kind.is_empty() {
        DEFAULT_STANDINGS_TYPE.to_string()
    } else {
        kind.to_lowercase()
    }
}
