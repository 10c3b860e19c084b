//! Lazy-source decoder: turns the page's encoded token array into URLs.
//!
//! Every token is decoded on its own. A failure is reported to the
//! diagnostic sink and the token skipped; a result that does not look like a
//! URL is dropped without a report. Without a decoder, tokens are appended to
//! the configured fallback base URL.

mod decode;
mod sink;
mod source;
mod token;

pub use decode::{CommandDecoder, DecodeError, Decoder};
pub use sink::{CollectingSink, DecodeFailure, DiagnosticSink, TracingSink};
pub use source::{JsonTokenSource, NoTokens, ScriptArraySource, TokenSource};
pub use token::EncodedToken;

/// Decoding settings taken from `[extract]`.
#[derive(Debug, Clone, Copy)]
pub struct DecodeSettings<'a> {
    pub mode: u32,
    pub fallback_base_url: &'a str,
}

impl<'a> DecodeSettings<'a> {
    pub fn from_config(cfg: &'a crate::config::ExtractConfig) -> Self {
        Self {
            mode: cfg.decode_mode,
            fallback_base_url: &cfg.fallback_base_url,
        }
    }
}

/// Result of decoding one token.
#[derive(Debug)]
pub enum TokenOutcome {
    Accepted(String),
    /// Decoder returned something that is not a usable URL.
    Rejected(String),
    Failed(DecodeError),
}

/// A decoded value is usable if it is non-empty and mentions `http`.
pub fn looks_like_url(value: &str) -> bool {
    !value.is_empty() && value.contains("http")
}

/// Decodes a single token.
pub fn decode_token(
    token: &EncodedToken,
    decoder: Option<&dyn Decoder>,
    settings: DecodeSettings<'_>,
) -> TokenOutcome {
    match decoder {
        Some(decoder) => match decoder.decode(settings.mode, token) {
            Ok(value) if looks_like_url(&value) => TokenOutcome::Accepted(value),
            Ok(value) => TokenOutcome::Rejected(value),
            Err(e) => TokenOutcome::Failed(e),
        },
        None => TokenOutcome::Accepted(format!("{}{}", settings.fallback_base_url, token)),
    }
}

/// Decodes every token in order, keeping only accepted URLs.
///
/// `None` tokens (absent or non-list collection) yield an empty list.
pub fn decode_tokens(
    tokens: Option<Vec<EncodedToken>>,
    decoder: Option<&dyn Decoder>,
    settings: DecodeSettings<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<String> {
    let Some(tokens) = tokens else {
        tracing::debug!("no token collection available");
        return Vec::new();
    };

    let mut urls = Vec::with_capacity(tokens.len());
    let mut rejected = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match decode_token(token, decoder, settings) {
            TokenOutcome::Accepted(url) => urls.push(url),
            TokenOutcome::Rejected(_) => rejected += 1,
            TokenOutcome::Failed(e) => sink.decode_failed(index, token, &e),
        }
    }
    tracing::debug!(
        tokens = tokens.len(),
        decoded = urls.len(),
        rejected,
        with_decoder = decoder.is_some(),
        "decoded lazy-load tokens"
    );
    urls
}
