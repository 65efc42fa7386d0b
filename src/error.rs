//! Error taxonomy shared by the Spotify client, the resolvers and the MCP layer.
//!
//! "Not found" is never represented here: lookups that can legitimately come
//! back empty return `Option::None`, `false` or [`crate::playback::PlayOutcome`].
//! Everything in [`SpotifyError`] is a genuine fault that callers must see.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, SpotifyError>;

#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Transport level failure (DNS, TLS, connection reset, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Missing, expired or rejected credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Spotify asked us to back off for longer than we are willing to wait.
    #[error("rate limited by Spotify (retry after {retry_after:?} seconds)")]
    RateLimited { retry_after: Option<u64> },

    /// Any other non-success status returned by the Web API.
    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A player command was issued while no device is active.
    #[error("no active playback device")]
    NoActiveDevice,

    /// The response body could not be decoded at all.
    #[error("unexpected response from Spotify: {0}")]
    Decode(#[from] serde_json::Error),

    /// Spotify answered with something outside its own contract, such as a
    /// pagination link to another host.
    #[error("Spotify protocol violation: {0}")]
    Protocol(String),

    /// The paginated listing did not terminate within the configured cap.
    #[error("listing did not finish within {limit} pages")]
    PageLimitExceeded { limit: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpotifyError {
    /// True for faults that originate at the remote boundary.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SpotifyError::Network(_)
                | SpotifyError::Auth(_)
                | SpotifyError::RateLimited { .. }
                | SpotifyError::Api { .. }
                | SpotifyError::NoActiveDevice
                | SpotifyError::Decode(_)
                | SpotifyError::Protocol(_)
                | SpotifyError::PageLimitExceeded { .. }
        )
    }
}
