//! Decoding capabilities for lazy-load tokens.

use std::process::Command;
use thiserror::Error;

use super::token::EncodedToken;

/// Why a single token could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The decoder itself reported a failure.
    #[error("decoder failed: {0}")]
    Failed(String),
    /// The external decoder program could not be started.
    #[error("decoder program `{program}` could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The external decoder program exited unsuccessfully.
    #[error("decoder program `{program}` exited with {code:?}: {stderr}")]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("decoder program `{program}` wrote non-UTF-8 output")]
    NonUtf8Output { program: String },
}

/// Turns one encoded token into a URL candidate.
///
/// `mode` is the selector the page passes as the first decoder argument.
pub trait Decoder {
    fn decode(&self, mode: u32, token: &EncodedToken) -> Result<String, DecodeError>;
}

impl<F> Decoder for F
where
    F: Fn(u32, &EncodedToken) -> Result<String, DecodeError>,
{
    fn decode(&self, mode: u32, token: &EncodedToken) -> Result<String, DecodeError> {
        self(mode, token)
    }
}

/// Decoder backed by an external program, invoked as `<program> [args..] <mode> <token>`.
///
/// Stdout (trimmed) is the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDecoder {
    program: String,
    args: Vec<String>,
}

impl CommandDecoder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a decoder from a whitespace-separated command line, e.g. `node decode.js`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Decoder for CommandDecoder {
    fn decode(&self, mode: u32, token: &EncodedToken) -> Result<String, DecodeError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(mode.to_string())
            .arg(token.to_string())
            .output()
            .map_err(|source| DecodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DecodeError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| DecodeError::NonUtf8Output {
            program: self.program.clone(),
        })?;
        Ok(stdout.trim().to_string())
    }
}
