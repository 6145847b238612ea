use std::path::PathBuf;

use anyhow::{Context, Result};

use standings_terminal::config::{DashboardConfig, StandingsSource, parse_names};
use standings_terminal::model::ClubEntry;
use standings_terminal::render::{RenderEvent, RenderState, ViewBody, ViewModel, render};
use standings_terminal::standings_fetch::load_database;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let mut config = DashboardConfig::from_env();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Some(path) = positional_path(&args) {
        config.source = StandingsSource::File(path);
    }

    let db = load_database(&config.source)
        .with_context(|| format!("loading standings from {}", config.source.describe()))?;

    let mut state = RenderState::new(
        flag_value(&args, "--type")
            .as_deref()
            .unwrap_or(&config.standings_type),
    );
    state.season = flag_value(&args, "--season");
    if let Some(raw) = flag_value(&args, "--clubs") {
        state.selection.checked = parse_names(&raw).into_iter().collect();
        state.selection.first_load = false;
    }

    let (_, view) = render(&state, RenderEvent::Load, &db, &config.default_clubs);
    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&view).context("serialize view")?;
        println!("{json}");
    } else {
        print_view(&view);
    }
    if view.is_empty() {
        eprintln!("[WARN] nothing to show for this selection");
    }
    Ok(())
}

fn print_view(view: &ViewModel) {
    println!("Scope: {:?}", view.scope);
    println!("Standings type: {}", view.standings_type);
    if let Some(note) = &view.note {
        println!("Note: {note}");
    }
    match &view.body {
        ViewBody::NoData(reason) => println!("{}", reason.message()),
        ViewBody::Table(table) => {
            println!("{}", table.caption);
            print_rows(&table.rows);
        }
        ViewBody::Chart(chart) => {
            println!("Axis ({:?}): {}", chart.strategy, chart.labels.join(", "));
            for series in &chart.series {
                let points = series
                    .positions
                    .iter()
                    .map(|p| p.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("  {:<22} {points}", series.club);
            }
            println!("Latest: {}", chart.latest.caption);
            print_rows(&chart.latest.rows);
        }
    }
}

fn print_rows(rows: &[ClubEntry]) {
    for club in rows {
        println!(
            "  {:>2}. {:<22} {:>3} pts  {:>2} played  {:+} gd",
            club.position.unwrap_or_default(),
            club.name,
            club.points.unwrap_or_default(),
            club.played.unwrap_or_default(),
            club.goal_difference.unwrap_or_default()
        );
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn positional_path(args: &[String]) -> Option<PathBuf> {
    const VALUE_FLAGS: [&str; 3] = ["--season", "--type", "--clubs"];
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(PathBuf::from(arg));
    }
    None
}
