use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use serde_json::json;

use nba_matchup::config::Config;
use nba_matchup::logging::init_logging;
use nba_matchup::pipeline::{analyze_with_config, collect, retrieve, snapshot_store};

const USAGE: &str = "usage: nba_matchup <collect | retrieve [--date YYYY-MM-DD] | analyze <team1> <team2>>";

fn main() -> Result<ExitCode> {
    init_logging();
    let cfg = Config::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    match args.first().map(String::as_str) {
        Some("collect") => {
            let summary = collect(&cfg, &snapshot_store(&cfg))?;
            println!("Stored {} team rows at {}", summary.rows, summary.key);
            Ok(ExitCode::SUCCESS)
        }
        Some("retrieve") => {
            let date = parse_date_arg(&args[1..])?.unwrap_or_else(|| Utc::now().date_naive());
            let dataset = retrieve(&snapshot_store(&cfg), date)?;
            let json = serde_json::to_string_pretty(&dataset.to_adage_value())
                .context("serialize snapshot")?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Some("analyze") => {
            let body = json!({ "team1": args.get(1), "team2": args.get(2) }).to_string();
            let resp = analyze_with_config(&cfg, Some(&body));
            println!("{}", serde_json::to_string_pretty(&resp.body)?);
            if resp.status == 200 {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("status {}", resp.status);
                Ok(ExitCode::FAILURE)
            }
        }
        _ => {
            eprintln!("{USAGE}");
            Ok(ExitCode::from(2))
        }
    }
}

fn parse_date_arg(args: &[String]) -> Result<Option<NaiveDate>> {
    for (idx, arg) in args.iter().enumerate() {
        let value = if let Some(v) = arg.strip_prefix("--date=") {
            v
        } else if arg == "--date" {
            args.get(idx + 1)
                .map(String::as_str)
                .ok_or_else(|| anyhow!("--date needs a value"))?
        } else {
            continue;
        };
        let date = value
            .trim()
            .parse::<NaiveDate>()
            .with_context(|| format!("invalid date: {value}"))?;
        return Ok(Some(date));
    }
    Ok(None)
}
