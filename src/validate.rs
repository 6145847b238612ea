use crate::model::ClubEntry;

pub const MIN_POSITION: i64 = 1;
pub const MAX_POSITION: i64 = 20;
pub const MIN_NAME_CHARS: usize = 3;

/// Substrings that only show up in rows scraped from page chrome (club pickers,
/// matchday selectors, table headers), never in a real club name.
pub const NOISE_TOKENS: &[&str] = &[
    "Sélectionner",
    "Selectionner",
    "Choisir",
    "Journée",
    "Journee",
    "Classement",
    "Toutes les",
];

pub fn is_valid_club(entry: Option<&ClubEntry>) -> bool {
    let Some(entry) = entry else {
        return false;
    };
    let name = entry.name.trim();
    if name.is_empty() || name.chars().count() < MIN_NAME_CHARS {
        return false;
    }
    if NOISE_TOKENS.iter().any(|token| name.contains(token)) {
        return false;
    }
    matches!(entry.position, Some(pos) if (MIN_POSITION..=MAX_POSITION).contains(&pos))
}

pub fn valid_clubs(clubs: &[ClubEntry]) -> Vec<ClubEntry> {
    clubs
        .iter()
        .filter(|c| is_valid_club(Some(c)))
        .cloned()
        .collect()
}
