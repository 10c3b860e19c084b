//! `imgharvest issues <page>` – issues listed on a saved series page.

use anyhow::{Context, Result};
use imgharvest_core::comic::ComicIssue;
use imgharvest_core::series;
use std::path::Path;

pub fn run_issues(page: &Path, base_url: &str, json: bool) -> Result<()> {
    let html = std::fs::read_to_string(page)
        .with_context(|| format!("read series page: {}", page.display()))?;
    let issues = series::parse_issue_listing(&html, base_url)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        print!("{}", format_issues(&issues));
    }
    Ok(())
}

/// One `title<TAB>url` line per issue.
fn format_issues(issues: &[ComicIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}\t{}\n", i.title, i.url))
        .collect()
}
