use standings_terminal::model::{ClubEntry, Snapshot};
use standings_terminal::snapshot_filter::{filter_snapshots, standings_types};

fn snap(round: Option<u32>, clubs: Vec<ClubEntry>) -> Snapshot {
    Snapshot::new("2024-01-01T20:00:00", round, clubs)
}

fn typed(kind: &str, round: Option<u32>, clubs: Vec<ClubEntry>) -> Snapshot {
    let mut s = snap(round, clubs);
    s.standings_type = kind.to_string();
    s
}

#[test]
fn out_of_order_rounds_are_resorted() {
    let input = vec![
        snap(
            Some(5),
            vec![ClubEntry::new("Paris SG", 1), ClubEntry::new("Marseille", 2)],
        ),
        snap(Some(1), vec![ClubEntry::new("Paris SG", 3)]),
    ];
    let out = filter_snapshots(&input, "general");
    let rounds: Vec<Option<u32>> = out.iter().map(|s| s.round).collect();
    assert_eq!(rounds, [Some(1), Some(5)]);
    // The source is untouched.
    assert_eq!(input[0].round, Some(5));
}

#[test]
fn missing_round_sorts_first() {
    let input = vec![
        snap(Some(2), vec![ClubEntry::new("Lens", 1)]),
        snap(None, vec![ClubEntry::new("Lens", 4)]),
    ];
    let out = filter_snapshots(&input, "general");
    assert_eq!(out[0].round, None);
    assert_eq!(out[1].round, Some(2));
}

#[test]
fn filters_by_standings_type() {
    let input = vec![
        typed("general", Some(1), vec![ClubEntry::new("Lens", 1)]),
        typed("home", Some(1), vec![ClubEntry::new("Lens", 2)]),
        typed("away", Some(1), vec![ClubEntry::new("Lens", 3)]),
    ];
    let home = filter_snapshots(&input, "home");
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].clubs[0].position, Some(2));
    assert!(filter_snapshots(&input, "neutral").is_empty());
}

#[test]
fn drops_snapshots_without_valid_clubs() {
    let noise = ClubEntry {
        name: "Sélectionner un club".to_string(),
        position: None,
        ..ClubEntry::default()
    };
    let input = vec![
        snap(Some(1), vec![noise.clone()]),
        snap(Some(2), vec![noise, ClubEntry::new("Nantes", 14)]),
    ];
    let out = filter_snapshots(&input, "general");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].clubs, vec![ClubEntry::new("Nantes", 14)]);
}

#[test]
fn empty_input_is_empty_output() {
    assert!(filter_snapshots(&[], "general").is_empty());
}

#[test]
fn filtering_twice_changes_nothing() {
    let input = vec![
        snap(Some(3), vec![ClubEntry::new("Brest", 3), ClubEntry::new("X", 1)]),
        snap(None, vec![ClubEntry::new("Brest", 9)]),
        typed("home", Some(1), vec![ClubEntry::new("Brest", 2)]),
    ];
    let once = filter_snapshots(&input, "general");
    assert_eq!(filter_snapshots(&once, "general"), once);
}

#[test]
fn lists_types_with_general_first() {
    let input = vec![
        typed("home", Some(1), Vec::new()),
        typed("away", Some(1), Vec::new()),
    ];
    assert_eq!(standings_types(&input), ["general", "away", "home"]);
}
