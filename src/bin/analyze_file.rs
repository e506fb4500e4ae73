use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::json;

use nba_matchup::dataset::Dataset;
use nba_matchup::handler::handle_analysis;
use nba_matchup::logging::init_logging;

// Offline variant of `nba_matchup analyze`: reads a snapshot file instead of the store.
fn main() -> anyhow::Result<()> {
    init_logging();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/team_stats_adage.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let dataset = Dataset::from_json(&raw).context("parse dataset")?;

    let body = json!({ "team1": args.get(1), "team2": args.get(2) }).to_string();
    let resp = handle_analysis(Some(&body), &dataset);

    println!("Status: {}", resp.status);
    println!("{}", serde_json::to_string_pretty(&resp.body)?);
    Ok(())
}
