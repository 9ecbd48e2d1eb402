//! Error types for hackmeck

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "Rate limit exceeded{}",
        .retry_after_secs.map_or_else(String::new, |s| format!(", retry after {s} seconds"))
    )]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Breach lookup failed: {0}")]
    Lookup(String),

    #[error("Malformed breach response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
