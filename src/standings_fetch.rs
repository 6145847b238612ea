use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};

use crate::config::StandingsSource;
use crate::demo_feed;
use crate::http_client::http_client;
use crate::model::{ClubEntry, DEFAULT_STANDINGS_TYPE, SeasonDatabase, Snapshot};

/// Structural problems in the standings document. Unlike noisy club rows,
/// these mean the producer broke the contract and must be surfaced.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("standings json is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: &'static str },
    #[error("{path}: expected {expected}")]
    WrongType { path: String, expected: &'static str },
    #[error("{path}: season `{season}` appears more than once")]
    DuplicateSeason { path: String, season: String },
}

pub fn load_database(source: &StandingsSource) -> Result<SeasonDatabase> {
    match source {
        StandingsSource::Url(url) => fetch_standings_from_url(url),
        StandingsSource::File(path) => read_standings_file(path),
        StandingsSource::Demo { seed } => Ok(demo_feed::demo_database(*seed)),
    }
}

pub fn fetch_standings_from_url(url: &str) -> Result<SeasonDatabase> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("failed to fetch standings: http {status}"));
    }
    let body = resp.text().context("failed reading body")?;
    parse_standings_json(&body).with_context(|| format!("malformed standings from {url}"))
}

pub fn read_standings_file(path: &Path) -> Result<SeasonDatabase> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_standings_json(&raw).with_context(|| format!("malformed standings in {}", path.display()))
}

/// Shape-check and normalize a standings document.
///
/// Structural violations (a snapshot without `clubs` or `date`, a season that is
/// not an array, a club row that is not an object) are errors. Field-level
/// noise is normalized: names are trimmed, non-integral positions become
/// `None`, a missing standings type becomes "general", null club rows vanish.
pub fn parse_standings_json(raw: &str) -> Result<SeasonDatabase, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(SeasonDatabase::new());
    }

    let root: Value = serde_json::from_str(trimmed)?;
    let Value::Object(seasons) = root else {
        return Err(InputError::WrongType {
            path: "$".to_string(),
            expected: "an object keyed by season",
        });
    };

    let mut db = SeasonDatabase::new();
    for (key, value) in seasons {
        let path = format!("$[{key:?}]");
        let Value::Array(items) = value else {
            return Err(InputError::WrongType {
                path,
                expected: "an array of snapshots",
            });
        };
        let snapshots = items
            .iter()
            .enumerate()
            .map(|(idx, item)| parse_snapshot(item, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()?;
        let season = key.trim().to_string();
        if db.contains_key(&season) {
            return Err(InputError::DuplicateSeason { path, season });
        }
        db.insert(season, snapshots);
    }
    Ok(db)
}

fn parse_snapshot(value: &Value, path: &str) -> Result<Snapshot, InputError> {
    let Value::Object(obj) = value else {
        return Err(InputError::WrongType {
            path: path.to_string(),
            expected: "a snapshot object",
        });
    };

    let date = match obj.get("date") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Null) | None => {
            return Err(InputError::MissingField {
                path: path.to_string(),
                field: "date",
            });
        }
        Some(_) => {
            return Err(InputError::WrongType {
                path: format!("{path}.date"),
                expected: "a timestamp string",
            });
        }
    };

    let clubs = match obj.get("clubs") {
        Some(Value::Array(items)) => {
            let mut clubs = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                if let Some(club) = parse_club(item, &format!("{path}.clubs[{idx}]"))? {
                    clubs.push(club);
                }
            }
            clubs
        }
        Some(Value::Null) | None => {
            return Err(InputError::MissingField {
                path: path.to_string(),
                field: "clubs",
            });
        }
        Some(_) => {
            return Err(InputError::WrongType {
                path: format!("{path}.clubs"),
                expected: "an array of clubs",
            });
        }
    };

    let standings_type = pick_string(obj, "standings_type")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| DEFAULT_STANDINGS_TYPE.to_string());

    Ok(Snapshot {
        date,
        round: obj
            .get("round")
            .and_then(lenient_int)
            .and_then(|r| u32::try_from(r).ok()),
        season: pick_string(obj, "season"),
        standings_type,
        cross_season: false,
        clubs,
    })
}

fn parse_club(value: &Value, path: &str) -> Result<Option<ClubEntry>, InputError> {
    let obj = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        _ => {
            return Err(InputError::WrongType {
                path: path.to_string(),
                expected: "a club object",
            });
        }
    };
    let stat = |key: &str| obj.get(key).and_then(lenient_int);
    Ok(Some(ClubEntry {
        name: pick_string(obj, "name").unwrap_or_default(),
        position: obj.get("position").and_then(strict_int),
        points: stat("points"),
        played: stat("played"),
        goal_difference: stat("goal_difference"),
        wins: stat("wins"),
        draws: stat("draws"),
        losses: stat("losses"),
        goals_for: stat("goals_for"),
        goals_against: stat("goals_against"),
    }))
}

fn pick_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integral JSON numbers only; "3" or 3.5 are not positions.
fn strict_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// Stats scraped as text ("+12", "45") still parse.
fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().trim_start_matches('+').parse::<i64>().ok(),
        other => strict_int(other),
    }
}
