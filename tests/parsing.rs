use std::fs;
use std::path::PathBuf;

use standings_terminal::standings_fetch::{InputError, parse_standings_json, read_standings_file};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_standings_fixture() {
    let db = parse_standings_json(&read_fixture("standings.json")).expect("fixture should parse");
    assert_eq!(db.len(), 2);

    let season = &db["2023-2024"];
    assert_eq!(season.len(), 3);
    // The null row disappears; the picker label survives until validation.
    assert_eq!(season[0].clubs.len(), 3);
    assert_eq!(season[0].standings_type, "general");
    assert_eq!(season[0].round, Some(5));
    assert_eq!(season[0].clubs[0].goal_difference, Some(9));
    assert_eq!(season[0].clubs[2].position, None);
    assert_eq!(season[1].clubs[0].name, "Paris SG");
    assert_eq!(season[2].standings_type, "home");
}

#[test]
fn null_document_is_empty() {
    assert!(parse_standings_json("null").expect("null should parse").is_empty());
    assert!(parse_standings_json("  ").expect("blank should parse").is_empty());
}

#[test]
fn missing_clubs_is_malformed() {
    let raw = r#"{"2023-2024": [{"date": "2023-08-13", "round": 1}]}"#;
    match parse_standings_json(raw) {
        Err(InputError::MissingField { path, field }) => {
            assert_eq!(field, "clubs");
            assert_eq!(path, r#"$["2023-2024"][0]"#);
        }
        other => panic!("expected missing clubs, got {other:?}"),
    }
}

#[test]
fn missing_date_is_malformed() {
    let raw = r#"{"2023-2024": [{"round": 1, "clubs": []}]}"#;
    assert!(matches!(
        parse_standings_json(raw),
        Err(InputError::MissingField { field: "date", .. })
    ));
}

#[test]
fn non_object_club_row_is_malformed() {
    let raw = r#"{"2023-2024": [{"date": "2023-08-13", "clubs": ["Paris SG"]}]}"#;
    match parse_standings_json(raw) {
        Err(InputError::WrongType { path, .. }) => assert_eq!(path, r#"$["2023-2024"][0].clubs[0]"#),
        other => panic!("expected wrong type, got {other:?}"),
    }
}

#[test]
fn season_must_be_an_array() {
    let raw = r#"{"2023-2024": {"date": "2023-08-13"}}"#;
    assert!(matches!(
        parse_standings_json(raw),
        Err(InputError::WrongType { .. })
    ));
    assert!(matches!(
        parse_standings_json("[1, 2]"),
        Err(InputError::WrongType { .. })
    ));
}

#[test]
fn seasons_equal_after_trim_are_rejected() {
    let raw = r#"{
        "2023-2024": [{"date": "2023-08-13", "clubs": [{"name": "Lens", "position": 1}]}],
        " 2023-2024 ": [{"date": "2023-09-17", "clubs": [{"name": "Lille", "position": 1}]}]
    }"#;
    match parse_standings_json(raw) {
        Err(InputError::DuplicateSeason { season, .. }) => assert_eq!(season, "2023-2024"),
        other => panic!("expected duplicate season, got {other:?}"),
    }
}

#[test]
fn invalid_json_is_reported() {
    assert!(matches!(
        parse_standings_json("{\"2023-2024\": ["),
        Err(InputError::Json(_))
    ));
}

#[test]
fn file_errors_carry_the_path() {
    let db = read_standings_file(&fixture_path("standings.json")).expect("fixture should load");
    assert_eq!(db.len(), 2);

    let err = read_standings_file(&fixture_path("does_not_exist.json")).expect_err("missing file");
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}
