//! Ordered image URL extraction from a lazy-loading reader page.

use scraper::Html;

use crate::collector::collect_rendered;
use crate::config::ExtractConfig;
use crate::decoder::{
    decode_tokens, DecodeSettings, Decoder, DiagnosticSink, ScriptArraySource, TokenSource,
    TracingSink,
};
use crate::merge::merge_and_dedupe;

/// Combines the rendered images of a page with its lazy-load tokens into the
/// ordered, de-duplicated list of page image URLs.
///
/// Never fails: a broken page, a missing token collection or a misbehaving
/// decoder only shrink the result.
#[derive(Debug, Clone, Default)]
pub struct ImageUrlExtractor {
    config: ExtractConfig,
}

impl ImageUrlExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts with an explicit token source and decoder; failures go to a [`TracingSink`].
    pub fn extract(
        &self,
        html: &str,
        tokens: &dyn TokenSource,
        decoder: Option<&dyn Decoder>,
    ) -> Vec<String> {
        self.extract_with_sink(html, tokens, decoder, &mut TracingSink)
    }

    /// Extracts using the token array found in the page's own scripts.
    pub fn extract_from_page(&self, html: &str, decoder: Option<&dyn Decoder>) -> Vec<String> {
        let document = Html::parse_document(html);
        let tokens = ScriptArraySource::from_document(&document, &self.config.token_variable);
        self.extract_document(&document, &tokens, decoder, &mut TracingSink)
    }

    pub fn extract_with_sink(
        &self,
        html: &str,
        tokens: &dyn TokenSource,
        decoder: Option<&dyn Decoder>,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<String> {
        let document = Html::parse_document(html);
        self.extract_document(&document, tokens, decoder, sink)
    }

    /// Runs all three phases over an already parsed document.
    pub fn extract_document(
        &self,
        document: &Html,
        tokens: &dyn TokenSource,
        decoder: Option<&dyn Decoder>,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<String> {
        let rendered = collect_rendered(document, &self.config);
        let decoded = decode_tokens(
            tokens.collect_encoded_tokens(),
            decoder,
            DecodeSettings::from_config(&self.config),
            sink,
        );
        let urls = merge_and_dedupe(&rendered, decoded);
        tracing::info!("found {} unique URLs in reading order", urls.len());
        urls
    }
}
