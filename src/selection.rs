use std::collections::BTreeSet;

use serde::Serialize;

/// Clubs ticked for charting. Survives season and standings-type switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub checked: BTreeSet<String>,
    /// True until the first render that shows a club list has seeded the defaults.
    pub first_load: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            checked: BTreeSet::new(),
            first_load: true,
        }
    }

    /// Flip one club. Names outside the current candidate list are ignored.
    pub fn toggle(&mut self, name: &str, candidates: &[String]) -> bool {
        if !candidates.iter().any(|c| c == name) {
            return false;
        }
        if !self.checked.remove(name) {
            self.checked.insert(name.to_string());
        }
        true
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.contains(name)
    }

    /// Store the effective set for the current candidates. Checked clubs that
    /// are not candidates here stay checked for views where they play again.
    pub fn commit(&mut self, candidates: &[String], effective: &BTreeSet<String>) {
        self.checked
            .retain(|name| candidates.binary_search(name).is_err());
        self.checked.extend(effective.iter().cloned());
        self.first_load = false;
    }
}

/// Effective checked set for a render.
///
/// A non-empty prior wins. Defaults apply only on the very first load, and only
/// those present among the candidates.
pub fn apply_selection(
    candidates: &[String],
    prior: &BTreeSet<String>,
    is_first_load: bool,
    defaults: &[String],
) -> BTreeSet<String> {
    if !prior.is_empty() {
        return candidates
            .iter()
            .filter(|name| prior.contains(*name))
            .cloned()
            .collect();
    }
    if is_first_load {
        return candidates
            .iter()
            .filter(|name| defaults.contains(*name))
            .cloned()
            .collect();
    }
    BTreeSet::new()
}

/// Case-insensitive substring match used by the club filter box.
pub fn club_matches_filter(name: &str, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_ignores_unknown_names() {
        let mut state = SelectionState::new();
        assert!(!state.toggle("Ghost FC", &names(&["Lyon"])));
        assert!(state.checked.is_empty());
        assert!(state.toggle("Lyon", &names(&["Lyon"])));
        assert!(state.is_checked("Lyon"));
        assert!(state.toggle("Lyon", &names(&["Lyon"])));
        assert!(!state.is_checked("Lyon"));
    }

    #[test]
    fn commit_keeps_clubs_missing_from_this_view() {
        let mut state = SelectionState::new();
        state.checked = ["Lens", "Lyon", "Metz"].iter().map(|s| s.to_string()).collect();
        let candidates = names(&["Lens", "Lyon", "Nice"]);
        let mut effective = apply_selection(&candidates, &state.checked, false, &[]);
        effective.remove("Lyon");
        state.commit(&candidates, &effective);
        assert_eq!(
            state.checked,
            ["Lens", "Metz"].iter().map(|s| s.to_string()).collect()
        );
        assert!(!state.first_load);
    }

    #[test]
    fn filter_handles_accents() {
        assert!(club_matches_filter("Saint-Étienne", "étienne"));
        assert!(club_matches_filter("Saint-Étienne", "ÉTI"));
        assert!(!club_matches_filter("Lorient", "lens"));
        assert!(club_matches_filter("Lorient", "  "));
    }
}
