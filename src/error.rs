//! Error types shared across the token manager, the timer registry, and the
//! front ends.
//!
//! Every fallible operation in the crate returns [`crate::Res`], which wraps
//! this enum. The front ends translate the variants into their own surface:
//! the CLI prints and exits, the MCP server returns an `isError` tool result,
//! and the HTTP bridge maps them onto status codes.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No token record is loaded. The user has to complete the authorization
    /// flow before any playback or search call can be made.
    #[error("not authenticated with Spotify; run `spotibridge auth` to authorize")]
    NotAuthenticated,

    /// The authorization-code exchange with the accounts service failed.
    /// Never retried; the caller must restart the authorization flow.
    #[error("authorization code exchange failed: {0}")]
    AuthExchange(String),

    /// The refresh-token exchange failed. Terminal for the current operation;
    /// the user must re-run `spotibridge auth`.
    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// Sleep timer durations must be strictly positive.
    #[error("sleep timer duration must be greater than zero, got {0}")]
    InvalidDuration(f64),

    /// A lookup by name or id came up empty. Carries the term that was
    /// searched for so the caller can report it verbatim.
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    /// Input that fails validation before any request is made, such as a
    /// volume outside 0-100 or an unknown playback action.
    #[error("{0}")]
    InvalidArgument(String),

    /// The Spotify Web API rejected a request. Carries whatever detail the
    /// response body contained.
    #[error("Spotify API request failed with status {status}: {detail}")]
    Upstream { status: StatusCode, detail: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Builds an [`Error::Upstream`] from a non-success response, trimming
    /// the body so a huge HTML error page does not flood the logs.
    pub fn upstream(status: StatusCode, body: String) -> Self {
        let mut detail = body.trim().to_string();
        if detail.len() > 512 {
            detail.truncate(512);
            detail.push_str("...");
        }
        if detail.is_empty() {
            detail = "(empty response body)".to_string();
        }
        Error::Upstream { status, detail }
    }
}
