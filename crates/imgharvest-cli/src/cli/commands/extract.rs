//! `imgharvest extract <page>` – ordered image URLs of a saved reader page.

use anyhow::{Context, Result};
use imgharvest_core::comic::{ComicImages, ComicIssue};
use imgharvest_core::config::HarvestConfig;
use imgharvest_core::decoder::{CommandDecoder, Decoder, JsonTokenSource};
use imgharvest_core::ImageUrlExtractor;
use std::path::Path;

pub struct ExtractOptions<'a> {
    pub tokens: Option<&'a Path>,
    pub decoder_cmd: Option<&'a str>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub json: bool,
}

pub fn run_extract(cfg: &HarvestConfig, page: &Path, opts: ExtractOptions<'_>) -> Result<()> {
    let html = std::fs::read_to_string(page)
        .with_context(|| format!("read reader page: {}", page.display()))?;

    let decoder = match opts.decoder_cmd {
        Some(line) => Some(
            CommandDecoder::from_command_line(line)
                .with_context(|| format!("empty decoder command: {line:?}"))?,
        ),
        None => None,
    };
    let decoder = decoder.as_ref().map(|d| d as &dyn Decoder);

    let extractor = ImageUrlExtractor::new(cfg.extract.clone());
    let image_urls = match opts.tokens {
        Some(path) => extractor.extract(&html, &JsonTokenSource::from_path(path)?, decoder),
        None => extractor.extract_from_page(&html, decoder),
    };
    tracing::info!(
        "extracted {} image URLs from {}",
        image_urls.len(),
        page.display()
    );

    if opts.json {
        let title = opts.title.unwrap_or_else(|| default_title(page));
        let images = ComicImages {
            issue: ComicIssue {
                title,
                url: opts.url.unwrap_or_default(),
            },
            image_urls,
        };
        println!("{}", serde_json::to_string_pretty(&images)?);
    } else {
        for url in &image_urls {
            println!("{url}");
        }
    }
    Ok(())
}

/// Page file name without extension, e.g. `issue-1.html` → `issue-1`.
fn default_title(page: &Path) -> String {
    page.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
