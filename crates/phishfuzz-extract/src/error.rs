// crates/phishfuzz-extract/src/error.rs

use thiserror::Error;

/// Errors raised while turning a URL into a Feature Record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL parsed but has no host to inspect (e.g. `mailto:`).
    #[error("URL has no host: {0}")]
    MissingHost(String),

    /// A built-in pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<url::ParseError> for ExtractError {
    fn from(e: url::ParseError) -> Self {
        ExtractError::InvalidUrl(e.to_string())
    }
}
