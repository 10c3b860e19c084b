//! Series pages: building series URLs and listing their issues.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use url::Url;

use crate::comic::ComicIssue;

/// Characters that never appear in a series slug.
const SLUG_FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// URL of a series page: forbidden characters removed, spaces become `-`.
///
/// `series_url("https://site.test", "Rick and Morty")` → `https://site.test/Comic/Rick-and-Morty`
pub fn series_url(base_url: &str, series_name: &str) -> String {
    let slug: String = series_name
        .chars()
        .filter(|c| !SLUG_FORBIDDEN.contains(c))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();
    format!("{base_url}/Comic/{slug}")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css:?}: {e}"))
}

/// Issues linked from the `table.listing` of a series page, in table order.
///
/// Relative links are resolved against `base_url`. A page without a listing
/// table yields no issues.
pub fn parse_issue_listing(html: &str, base_url: &str) -> Result<Vec<ComicIssue>> {
    let base = Url::parse(base_url).with_context(|| format!("parse base URL: {base_url}"))?;
    let document = Html::parse_document(html);
    let table_sel = selector("table.listing")?;
    let link_sel = selector("tr td a[href]")?;

    let Some(table) = document.select(&table_sel).next() else {
        tracing::warn!("couldn't find a listing table");
        return Ok(Vec::new());
    };

    let mut issues = Vec::new();
    for link in table.select(&link_sel) {
        let href = link.value().attr("href").unwrap_or_default().trim();
        let url = base
            .join(href)
            .with_context(|| format!("resolve issue link: {href}"))?;
        let title = link.text().collect::<String>().trim().to_string();
        issues.push(ComicIssue {
            title,
            url: url.to_string(),
        });
    }

    tracing::info!("found {} issues", issues.len());
    Ok(issues)
}
