//! Where per-token decode failures are reported.

use super::decode::DecodeError;
use super::token::EncodedToken;

/// Receives decode failures; rejections (non-URL results) are never reported.
pub trait DiagnosticSink {
    fn decode_failed(&mut self, index: usize, token: &EncodedToken, error: &DecodeError);
}

/// Default sink: a `tracing` warning per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn decode_failed(&mut self, index: usize, token: &EncodedToken, error: &DecodeError) {
        tracing::warn!(index, token = %token, "error decoding URL: {error}");
    }
}

/// A failure kept by [`CollectingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    pub index: usize,
    pub token: EncodedToken,
    pub message: String,
}

/// Keeps every failure in memory, for callers that want to report them themselves.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub failures: Vec<DecodeFailure>,
}

impl DiagnosticSink for CollectingSink {
    fn decode_failed(&mut self, index: usize, token: &EncodedToken, error: &DecodeError) {
        self.failures.push(DecodeFailure {
            index,
            token: token.clone(),
            message: error.to_string(),
        });
    }
}
