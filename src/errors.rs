//! Crate-wide error hierarchy for editor-reviewer.
//!
//! Goals:
//! - Single root `Error` for all public fallible functions.
//! - Status-aware mapping for the model endpoint (401→Unauthorized,
//!   429→RateLimited, 5xx→Server, etc.).
//! - Ergonomic `?` via `From` impls, no dynamic dispatch.
//!
//! The extraction/resolution/store core never returns these: model noise
//! degrades to fewer findings, not failures.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewResult<T> = Result<T, Error>;

/// Root error type for the editor-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Model endpoint (HTTP transport / status) failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Generic catch-all error when nothing else fits.
    #[error("other error: {0}")]
    Other(String),
}

/// Detailed model-endpoint error used inside the LLM layer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404) — usually a missing model name.
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (4xx/3xx) not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Llm(LlmError::from(e))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return LlmError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => LlmError::Unauthorized,
                403 => LlmError::Forbidden,
                404 => LlmError::NotFound,
                429 => LlmError::RateLimited,
                500..=599 => LlmError::Server(code),
                _ => LlmError::HttpStatus(code),
            };
        }
        LlmError::Network(e.to_string())
    }
}
