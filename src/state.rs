use std::collections::VecDeque;

use crate::model::{SeasonDatabase, seasons_desc};
use crate::render::{ClubChoice, RenderEvent, RenderState, ViewModel, render};

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub struct AppState {
    pub database: Option<SeasonDatabase>,
    pub source: Option<String>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub render: RenderState,
    pub view: Option<ViewModel>,
    pub default_clubs: Vec<String>,
    /// Index into the visible (filter-matching) clubs.
    pub club_cursor: usize,
    pub filter_active: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetDatabase {
        source: String,
        database: SeasonDatabase,
    },
    LoadFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Reload,
}

impl AppState {
    pub fn new(default_clubs: Vec<String>, standings_type: &str) -> Self {
        Self {
            database: None,
            source: None,
            loading: true,
            load_error: None,
            render: RenderState::new(standings_type),
            view: None,
            default_clubs,
            club_cursor: 0,
            filter_active: false,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    /// Run one render pass. A no-op until a database has loaded.
    pub fn dispatch(&mut self, event: RenderEvent) {
        let Some(db) = &self.database else {
            return;
        };
        let (next, view) = render(&self.render, event, db, &self.default_clubs);
        self.render = next;
        self.view = Some(view);
        let visible = self.visible_clubs().len();
        if self.club_cursor >= visible {
            self.club_cursor = visible.saturating_sub(1);
        }
    }

    /// `None` (all seasons) first, then seasons most recent first.
    pub fn season_options(&self) -> Vec<Option<String>> {
        let mut out = vec![None];
        if let Some(db) = &self.database {
            out.extend(seasons_desc(db).into_iter().map(Some));
        }
        out
    }

    pub fn cycle_season(&mut self, forward: bool) {
        let options = self.season_options();
        let current = options
            .iter()
            .position(|s| *s == self.render.season)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        let season = options[next].clone();
        self.push_log(format!("[INFO] Season: {}", season_label(season.as_deref())));
        self.club_cursor = 0;
        self.dispatch(RenderEvent::SelectSeason(season));
    }

    pub fn cycle_standings_type(&mut self) {
        let types = self
            .view
            .as_ref()
            .map(|v| v.standings_types.clone())
            .unwrap_or_default();
        if types.is_empty() {
            return;
        }
        let current = types
            .iter()
            .position(|t| *t == self.render.standings_type)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let kind = types[current % types.len()].clone();
        self.push_log(format!("[INFO] Standings type: {kind}"));
        self.dispatch(RenderEvent::SelectStandingsType(kind));
    }

    pub fn visible_clubs(&self) -> Vec<&ClubChoice> {
        self.view
            .as_ref()
            .map(|v| v.clubs.iter().filter(|c| c.visible).collect())
            .unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        let total = self.visible_clubs().len();
        if total > 0 {
            self.club_cursor = (self.club_cursor + 1).min(total - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.club_cursor = self.club_cursor.saturating_sub(1);
    }

    pub fn toggle_selected_club(&mut self) {
        let Some(name) = self
            .visible_clubs()
            .get(self.club_cursor)
            .map(|c| c.name.clone())
        else {
            return;
        };
        self.dispatch(RenderEvent::ToggleClub(name));
    }

    pub fn push_filter_char(&mut self, ch: char) {
        let mut filter = self.render.filter.clone();
        filter.push(ch);
        self.club_cursor = 0;
        self.dispatch(RenderEvent::SetFilter(filter));
    }

    pub fn pop_filter_char(&mut self) {
        let mut filter = self.render.filter.clone();
        filter.pop();
        self.dispatch(RenderEvent::SetFilter(filter));
    }

    pub fn clear_filter(&mut self) {
        self.dispatch(RenderEvent::SetFilter(String::new()));
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetDatabase { source, database } => {
            state.push_log(format!(
                "[INFO] Loaded {} season(s) from {source}",
                database.len()
            ));
            if database.is_empty() {
                state.push_log("[WARN] Standings source holds no seasons");
            }
            state.database = Some(database);
            state.source = Some(source);
            state.loading = false;
            state.load_error = None;
            state.dispatch(RenderEvent::Load);
        }
        Delta::LoadFailed(err) => {
            state.loading = false;
            state.push_log(format!("[ERROR] Load failed: {err}"));
            state.load_error = Some(err);
        }
        Delta::Log(line) => state.push_log(line),
    }
}

pub fn season_label(season: Option<&str>) -> String {
    match season {
        Some(key) => key.to_string(),
        None => "All seasons".to_string(),
    }
}
