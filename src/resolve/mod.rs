//! Name resolution: turning what a person typed into Spotify identifiers.
//!
//! - [`pagination`] drains cursor-paginated listings
//! - [`similarity`] scores names against each other
//! - [`PlaylistResolver`] picks one playlist by approximate name
//! - [`TrackResolver`] picks one track by artist and title

use crate::{
    config::{Config, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_PAGES},
    error::{Result, SpotifyError},
};

pub mod pagination;
pub mod playlist;
pub mod similarity;
pub mod track;

pub use playlist::PlaylistResolver;
pub use track::TrackResolver;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    /// Default minimum similarity for a playlist match.
    pub threshold: f64,
    /// Safety cap on pages fetched per listing.
    pub max_pages: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&Config> for ResolverSettings {
    fn from(config: &Config) -> Self {
        Self {
            threshold: config.match_threshold,
            max_pages: config.max_pages,
        }
    }
}

/// Thresholds must lie in `(0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(SpotifyError::InvalidArgument(format!(
            "threshold must be in (0, 1], got {}",
            threshold
        )))
    }
}

pub(crate) fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SpotifyError::InvalidArgument(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}
