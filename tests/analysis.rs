use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};

use nba_matchup::analysis::UNEXPECTED_MESSAGE;
use nba_matchup::dataset::Dataset;
use nba_matchup::handler::{ApiResponse, handle_analysis};
use nba_matchup::source::DatasetSource;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_dataset(name: &str) -> Dataset {
    Dataset::from_json(&read_fixture(name)).expect("fixture should parse")
}

fn request(source: &dyn DatasetSource, body: Value) -> ApiResponse {
    handle_analysis(Some(&body.to_string()), source)
}

struct FailingSource;

impl DatasetSource for FailingSource {
    fn load_dataset(&self) -> anyhow::Result<Dataset> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

#[test]
fn clear_favourite_wins_every_stat() {
    let ds = fixture_dataset("legacy_data.json");
    let resp = request(&ds, json!({ "team1": "A", "team2": "B" }));

    assert_eq!(resp.status, 200);
    let analysis = &resp.body["analysis"];
    assert_eq!(analysis["winProbabilities"]["A"], 1.0);
    assert_eq!(analysis["winProbabilities"]["B"], 0.0);
    assert_eq!(analysis["statDifferences"]["PTS"], 10.0);
    assert_eq!(analysis["statDifferences"]["TO"], -2.0);
    assert!(analysis["analysisTimestamp"].as_str().unwrap().ends_with('Z'));
    assert!(resp.headers.contains(&("Access-Control-Allow-Origin", "*")));
}

#[test]
fn unknown_team_is_404_with_name() {
    let ds = fixture_dataset("legacy_data.json");
    let resp = request(&ds, json!({ "team1": "A", "team2": "Seattle SuperSonics" }));

    assert_eq!(resp.status, 404);
    assert_eq!(resp.body["error"], "TeamNotFound");
    let message = resp.body["message"].as_str().unwrap();
    assert!(message.contains("Seattle SuperSonics"));
    assert!(!message.contains("A,"));
}

#[test]
fn omitted_team_is_400() {
    let ds = fixture_dataset("legacy_data.json");
    for body in [json!({ "team1": "A" }), json!({ "team1": "A", "team2": "" }), json!({})] {
        let resp = request(&ds, body);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["error"], "MissingParameters");
        assert!(resp.body["message"].is_string());
    }
    assert_eq!(handle_analysis(None, &ds).status, 400);
}

#[test]
fn team_without_numeric_stats_is_422() {
    let ds = fixture_dataset("team_stats_adage.json");
    let resp = request(
        &ds,
        json!({ "team1": "Boston Celtics", "team2": "stat feed placeholder" }),
    );
    assert_eq!(resp.status, 422);
    assert_eq!(resp.body["error"], "InvalidDataFormat");
}

#[test]
fn zero_and_turnover_rules_split_quarters() {
    let ds = Dataset::new(vec![
        [("Team", "Home"), ("PTS", "105"), ("AST", "24"), ("REB", "44"), ("TO", "15")]
            .into_iter()
            .collect(),
        [("Team", "Away"), ("PTS", "100"), ("AST", "25"), ("REB", "44"), ("TO", "12")]
            .into_iter()
            .collect(),
    ]);
    let resp = request(&ds, json!({ "team1": "home", "team2": "AWAY" }));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["analysis"]["winProbabilities"]["Home"], 0.25);
    assert_eq!(resp.body["analysis"]["winProbabilities"]["Away"], 0.75);
}

#[test]
fn one_favourable_stat_of_five_is_a_fifth() {
    let ds = Dataset::new(vec![
        [("Team", "X"), ("PTS", "110"), ("AST", "20"), ("REB", "40"), ("STL", "6"), ("TO", "16")]
            .into_iter()
            .collect(),
        [("Team", "Y"), ("PTS", "100"), ("AST", "22"), ("REB", "43"), ("STL", "8"), ("TO", "12")]
            .into_iter()
            .collect(),
    ]);
    let resp = request(&ds, json!({ "team1": "X", "team2": "Y" }));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["analysis"]["winProbabilities"]["X"], 0.2);
    assert_eq!(resp.body["analysis"]["winProbabilities"]["Y"], 0.8);
}

#[test]
fn fixture_matchup_uses_display_names() {
    let ds = fixture_dataset("team_stats_adage.json");
    let resp = request(&ds, json!({ "team1": "BOSTON CELTICS", "team2": "los angeles lakers" }));
    assert_eq!(resp.status, 200);

    let probs = &resp.body["analysis"]["winProbabilities"];
    let p1 = probs["Boston Celtics"].as_f64().unwrap();
    let p2 = probs["Los Angeles Lakers"].as_f64().unwrap();
    assert_eq!(p1, 6.0 / 9.0);
    assert_eq!(p2, 3.0 / 9.0);
    assert_eq!(p1 + p2, 1.0);
}

#[test]
fn equal_points_do_not_favour_team1() {
    let ds = fixture_dataset("team_stats_adage.json");
    let resp = request(
        &ds,
        json!({ "team1": "Los Angeles Lakers", "team2": "Golden State Warriors" }),
    );
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["analysis"]["statDifferences"]["Pts"], 0.0);
}

#[test]
fn source_failure_is_500() {
    let resp = request(&FailingSource, json!({ "team1": "A", "team2": "B" }));
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body["error"], "Unexpected");
    assert_eq!(resp.body["message"], UNEXPECTED_MESSAGE);
    assert!(!resp.body.to_string().contains("connection refused"));
}

#[test]
fn malformed_body_is_500() {
    let ds = fixture_dataset("legacy_data.json");
    let resp = handle_analysis(Some("{ team1: "), &ds);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body["error"], "Unexpected");
}

#[test]
fn missing_params_checked_before_loading() {
    let resp = request(&FailingSource, json!({ "team2": "B" }));
    assert_eq!(resp.status, 400);
}
