use std::env;
use std::path::PathBuf;

use crate::model::DEFAULT_STANDINGS_TYPE;

pub const DEFAULT_STANDINGS_PATH: &str = "../bf_foot_scraper/data/standings.json";
pub const DEFAULT_CLUBS: &[&str] = &["Paris SG", "Marseille"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandingsSource {
    Url(String),
    File(PathBuf),
    Demo { seed: Option<u64> },
}

impl StandingsSource {
    pub fn describe(&self) -> String {
        match self {
            StandingsSource::Url(url) => url.clone(),
            StandingsSource::File(path) => path.display().to_string(),
            StandingsSource::Demo { .. } => "demo data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: StandingsSource,
    /// Clubs ticked on first load when present in the data.
    pub default_clubs: Vec<String>,
    pub standings_type: String,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let demo_seed = lookup("STANDINGS_DEMO_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        let source = match lookup("STANDINGS_SOURCE").map(|v| v.trim().to_lowercase()) {
            Some(kind) if kind == "demo" => StandingsSource::Demo { seed: demo_seed },
            _ => {
                if let Some(url) = non_empty(lookup("STANDINGS_URL")) {
                    StandingsSource::Url(url)
                } else {
                    let path = non_empty(lookup("STANDINGS_PATH"))
                        .unwrap_or_else(|| DEFAULT_STANDINGS_PATH.to_string());
                    StandingsSource::File(PathBuf::from(path))
                }
            }
        };

        let default_clubs = match lookup("STANDINGS_DEFAULT_CLUBS") {
            Some(raw) => parse_names(&raw),
            None => DEFAULT_CLUBS.iter().map(|s| s.to_string()).collect(),
        };

        let standings_type = non_empty(lookup("STANDINGS_TYPE"))
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| DEFAULT_STANDINGS_TYPE.to_string());

        Self {
            source,
            default_clubs,
            standings_type,
        }
    }
}

pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
