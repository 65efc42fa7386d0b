//! # CLI Module
//!
//! User-facing commands of the `spotmcp` binary. Each command loads what it
//! needs, reports progress with spinners and the colored status macros, and
//! prints results as tables.
//!
//! - [`auth`] - OAuth 2.0 PKCE login, token stored in the data directory
//! - [`serve`] - MCP server on stdio
//! - [`list_playlists`] - every playlist of the account
//! - [`find_playlist`] - fuzzy playlist lookup with optional candidate ranking
//! - [`track_uri`] - track URI lookup by artist and song
//! - [`list_devices`] - devices available for playback
//!
//! Commands never print to stdout except for tables and plain results;
//! status lines go to stderr.

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::Config, error, spotify::SpotifyClient};

mod auth;
mod devices;
mod playlists;
mod serve;
mod tracks;

pub use auth::auth;
pub use devices::list_devices;
pub use playlists::{find_playlist, list_playlists};
pub use serve::serve;
pub use tracks::track_uri;

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Client from the cached token, or exit with a hint to log in first.
async fn connect(config: &Config) -> Arc<SpotifyClient> {
    match SpotifyClient::connect(config).await {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Cannot connect to Spotify. Err: {}", e),
    }
}
