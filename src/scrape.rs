use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info};

use crate::dataset::TeamRecord;
use crate::html::{cell_text, inner_after_open_tag, slice_between_ci, tag_blocks_ci};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

pub fn fetch_stats_page(client: &Client, url: &str) -> Result<String> {
    info!(url, "fetching team stats page");
    let resp = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {} from {}", status, url));
    }
    debug!(bytes = body.len(), "stats page received");
    Ok(body)
}

/// One record per body row of the first table on the page, keyed by the header cells.
pub fn parse_stats_table(html: &str) -> Result<Vec<TeamRecord>> {
    let table = slice_between_ci(html, "<table", "</table>")
        .ok_or_else(|| anyhow!("no table found on the page"))?;

    // Multi-row headers: the last row names the columns.
    let headers = slice_between_ci(table, "<thead", "</thead>")
        .and_then(|thead| tag_blocks_ci(thead, "tr").into_iter().last())
        .map(|row| cells(row, "th"))
        .unwrap_or_default();

    let Some(tbody) = slice_between_ci(table, "<tbody", "</tbody>") else {
        return Ok(Vec::new());
    };

    let records = tag_blocks_ci(tbody, "tr")
        .into_iter()
        .map(|row| cells(row, "td"))
        .filter(|row| !row.is_empty())
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect::<TeamRecord>()
        })
        .collect::<Vec<_>>();

    debug!(columns = headers.len(), rows = records.len(), "parsed stats table");
    Ok(records)
}

fn cells(row: &str, tag: &str) -> Vec<String> {
    tag_blocks_ci(inner_after_open_tag(row), tag)
        .into_iter()
        .map(|cell| cell_text(inner_after_open_tag(cell)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_keyed_by_last_header_row() {
        let html = r#"
            <table>
              <thead>
                <tr><th colspan="3">Season</th></tr>
                <tr><th>Team</th><th>Pts</th><th>TO</th></tr>
              </thead>
              <tbody>
                <tr><td><a href="/t/bos">Boston</a></td><td> 117.1 </td><td>12.0</td></tr>
                <tr></tr>
                <tr><td>Denver</td><td>115.0</td></tr>
              </tbody>
            </table>"#;
        let records = parse_stats_table(html).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team(), Some("Boston"));
        assert_eq!(records[0].get("Pts").and_then(|v| v.as_str()), Some("117.1"));
        assert_eq!(records[1].get("TO").and_then(|v| v.as_str()), Some(""));
    }

    #[test]
    fn page_without_table_is_an_error() {
        let err = parse_stats_table("<html><body>maintenance</body></html>").unwrap_err();
        assert!(err.to_string().contains("no table"));
    }
}
