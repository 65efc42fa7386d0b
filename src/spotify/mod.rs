//! # Spotify Integration Module
//!
//! This module is the boundary to the Spotify Web API. The resolvers, the
//! playback controller and the MCP layer reach Spotify only through the
//! [`CatalogClient`] trait, so they can be tested with in-memory doubles.
//!
//! ## Architecture
//!
//! ```text
//! MCP tools / CLI
//!          ↓
//! Resolvers, PlaybackController
//!          ↓
//! CatalogClient (trait)
//!          ↓
//! SpotifyClient (reqwest, bearer auth, TokenManager)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 PKCE login and token refresh
//! - [`client`] - [`SpotifyClient`], the HTTP implementation of [`CatalogClient`]
//!
//! ## Error Handling
//!
//! All operations return [`crate::error::Result`]. Transport policy lives in the
//! HTTP client: a `502 Bad Gateway` is retried a bounded number of times and a
//! `429 Too Many Requests` honours a reasonable `Retry-After`. Everything else
//! surfaces as a [`crate::error::SpotifyError`] for the caller to handle.
//! A `404` carrying the `NO_ACTIVE_DEVICE` reason is reported as
//! [`crate::error::SpotifyError::NoActiveDevice`] so that player commands can
//! decide on a fallback.
//!
//! ## API Coverage
//!
//! - `GET /search`
//! - `GET /me/playlists`
//! - `GET /me/tracks`
//! - `GET /me/top/tracks`
//! - `GET /me/player/currently-playing`, `GET /me/player/recently-played`
//! - `GET /me/player/devices`
//! - `PUT /me/player/play`, `PUT /me/player/pause`, `PUT /me/player/shuffle`
//! - `POST /me/player/next`, `POST /me/player/previous`, `POST /me/player/queue`

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{
        CurrentlyPlaying, Device, Page, PlayHistory, PlaybackRequest, Playlist, SavedTrack,
        SearchKind, SearchResults, TimeRange, Track,
    },
};

pub mod auth;
pub mod client;

pub use client::SpotifyClient;

/// Authenticated access to the remote catalog and player.
///
/// Cursors are the opaque `next` values of a previous [`Page`]; `None` requests
/// the first page.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults>;

    async fn list_playlists(&self, cursor: Option<String>) -> Result<Page<Playlist>>;

    async fn saved_tracks(&self, cursor: Option<String>) -> Result<Page<SavedTrack>>;

    async fn top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<Vec<Track>>;

    async fn recently_played(&self, limit: u32) -> Result<Vec<PlayHistory>>;

    /// `None` when nothing is playing.
    async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>>;

    async fn devices(&self) -> Result<Vec<Device>>;

    async fn start_playback(&self, request: &PlaybackRequest) -> Result<()>;

    async fn pause_playback(&self) -> Result<()>;

    async fn skip_next(&self) -> Result<()>;

    async fn skip_previous(&self) -> Result<()>;

    async fn set_shuffle(&self, state: bool) -> Result<()>;

    async fn add_to_queue(&self, uri: &str) -> Result<()>;
}
