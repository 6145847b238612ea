use std::fs;
use std::path::PathBuf;

use standings_terminal::model::SeasonDatabase;
use standings_terminal::render::{ViewBody, ViewScope};
use standings_terminal::standings_fetch::parse_standings_json;
use standings_terminal::state::{AppState, Delta, apply_delta, season_label};

fn fixture_db() -> SeasonDatabase {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("standings.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_standings_json(&raw).expect("fixture should parse")
}

fn loaded_state() -> AppState {
    let mut state = AppState::new(
        vec!["Paris SG".to_string(), "Marseille".to_string()],
        "general",
    );
    apply_delta(
        &mut state,
        Delta::SetDatabase {
            source: "fixture".to_string(),
            database: fixture_db(),
        },
    );
    state
}

fn checked(state: &AppState) -> Vec<String> {
    state
        .view
        .as_ref()
        .map(|v| {
            v.clubs
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn set_database_renders_cross_season_view() {
    let state = loaded_state();
    assert!(!state.loading);
    assert!(state.load_error.is_none());
    assert_eq!(state.source.as_deref(), Some("fixture"));
    let view = state.view.as_ref().expect("view after load");
    assert_eq!(view.scope, Some(ViewScope::CrossSeason));
    assert!(matches!(view.body, ViewBody::Chart(_)));
    assert!(
        state
            .logs
            .iter()
            .any(|l| l == "[INFO] Loaded 2 season(s) from fixture")
    );
}

#[test]
fn load_failure_keeps_previous_view() {
    let mut state = loaded_state();
    apply_delta(&mut state, Delta::LoadFailed("timeout".to_string()));
    assert_eq!(state.load_error.as_deref(), Some("timeout"));
    assert!(state.view.is_some());
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[ERROR] Load failed: timeout")
    );

    apply_delta(
        &mut state,
        Delta::SetDatabase {
            source: "fixture".to_string(),
            database: fixture_db(),
        },
    );
    assert!(state.load_error.is_none());
}

#[test]
fn empty_database_is_logged_as_warning() {
    let mut state = AppState::new(Vec::new(), "general");
    apply_delta(
        &mut state,
        Delta::SetDatabase {
            source: "empty".to_string(),
            database: SeasonDatabase::new(),
        },
    );
    assert!(state.logs.iter().any(|l| l.starts_with("[WARN]")));
    assert!(state.view.as_ref().is_some_and(|v| v.is_empty()));
}

#[test]
fn events_before_load_are_ignored() {
    let mut state = AppState::new(Vec::new(), "general");
    state.toggle_selected_club();
    state.cycle_standings_type();
    state.push_filter_char('a');
    assert!(state.view.is_none());
    assert!(state.loading);
}

#[test]
fn season_cycle_wraps_both_ways() {
    let mut state = loaded_state();
    state.cycle_season(true);
    assert_eq!(state.render.season.as_deref(), Some("2023-2024"));
    state.cycle_season(true);
    assert_eq!(state.render.season.as_deref(), Some("2022-2023"));
    state.cycle_season(true);
    assert_eq!(state.render.season, None);
    state.cycle_season(false);
    assert_eq!(state.render.season.as_deref(), Some("2022-2023"));
}

#[test]
fn cursor_toggle_and_filter_work_on_visible_clubs() {
    let mut state = loaded_state();
    state.select_next();
    state.select_next();
    state.select_next();
    assert_eq!(state.club_cursor, 2);
    state.select_prev();
    state.toggle_selected_club();
    assert_eq!(checked(&state), ["Paris SG"]);

    for ch in "len".chars() {
        state.push_filter_char(ch);
    }
    assert_eq!(state.render.filter, "len");
    let visible: Vec<&str> = state.visible_clubs().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(visible, ["Lens"]);
    assert_eq!(state.club_cursor, 0);
    state.toggle_selected_club();
    assert_eq!(checked(&state), ["Lens", "Paris SG"]);

    state.pop_filter_char();
    assert_eq!(state.render.filter, "le");
    state.clear_filter();
    assert_eq!(state.visible_clubs().len(), 3);
    assert_eq!(checked(&state), ["Lens", "Paris SG"]);
}

#[test]
fn standings_type_cycles_through_available_tables() {
    let mut state = loaded_state();
    state.cycle_standings_type();
    assert_eq!(state.render.standings_type, "home");
    state.cycle_standings_type();
    assert_eq!(state.render.standings_type, "general");
}

#[test]
fn console_is_bounded() {
    let mut state = AppState::new(Vec::new(), "general");
    for idx in 0..250 {
        state.push_log(format!("[INFO] line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

#[test]
fn season_labels() {
    assert_eq!(season_label(None), "All seasons");
    assert_eq!(season_label(Some("2023-2024")), "2023-2024");
}
