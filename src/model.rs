use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STANDINGS_TYPE: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClubEntry {
    /// Trimmed club name; empty when the record carried none.
    pub name: String,
    /// `None` when the record had no position or a non-integral one.
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_difference: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draws: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_for: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_against: Option<i64>,
}

impl ClubEntry {
    pub fn new(name: &str, position: i64) -> Self {
        Self {
            name: name.to_string(),
            position: Some(position),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: String,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default = "default_standings_type")]
    pub standings_type: String,
    #[serde(default)]
    pub cross_season: bool,
    pub clubs: Vec<ClubEntry>,
}

impl Snapshot {
    pub fn new(date: &str, round: Option<u32>, clubs: Vec<ClubEntry>) -> Self {
        Self {
            date: date.to_string(),
            round,
            season: None,
            standings_type: DEFAULT_STANDINGS_TYPE.to_string(),
            cross_season: false,
            clubs,
        }
    }

    /// Ordering key for matchdays: a snapshot without a round sorts as round 0.
    pub fn round_key(&self) -> u32 {
        self.round.unwrap_or(0)
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_snapshot_date(&self.date)
    }

    pub fn club(&self, name: &str) -> Option<&ClubEntry> {
        self.clubs.iter().find(|c| c.name == name)
    }
}

fn default_standings_type() -> String {
    DEFAULT_STANDINGS_TYPE.to_string()
}

pub type SeasonDatabase = BTreeMap<String, Vec<Snapshot>>;

/// Season keys, most recent first ("2024-2025" before "2023-2024").
pub fn seasons_desc(db: &SeasonDatabase) -> Vec<String> {
    db.keys().rev().cloned().collect()
}

pub fn parse_snapshot_date(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.naive_local());
    }
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// French-locale style timestamp, e.g. `19/05/2024 20:33:11`. Unparseable input is shown as-is.
pub fn format_snapshot_date(raw: &str) -> String {
    match parse_snapshot_date(raw) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M:%S").to_string(),
        None => raw.trim().to_string(),
    }
}
