//! Configuration management for spotmcp.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. All settings are collected once at process start
//! into a [`Config`] value that is then handed to the components that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then one in the working directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::{Result, SpotifyError};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MAX_PAGES: usize = 200;

/// Scopes required by every tool the server exposes.
pub const DEFAULT_SCOPES: [&str; 7] = [
    "user-library-read",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-read-recently-played",
];

/// Name of the directory below the platform data dir that holds `.env` and caches.
pub const APP_DIR: &str = "spotmcp";

/// Loads environment variables from `.env` files.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spotmcp/.env`, followed by a `.env` in the
/// current working directory. Missing files are not an error; variables that
/// are already set in the process environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotmcp/.env`
/// - macOS: `~/Library/Application Support/spotmcp/.env`
/// - Windows: `%LOCALAPPDATA%/spotmcp/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| SpotifyError::Config(format!("{}: {}", path.display(), e)))?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(SpotifyError::Config(e.to_string())),
    }
}

/// Returns the application data directory (`<data_local_dir>/spotmcp`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Typed runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client id of the registered Spotify application.
    pub client_id: String,
    /// OAuth redirect URI; must match the one registered with Spotify.
    pub redirect_uri: String,
    /// Space separated OAuth scopes.
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    /// Base URL of the Web API, without trailing slash.
    pub api_url: String,
    /// Bind address of the local OAuth callback server.
    pub server_address: String,
    /// Default similarity threshold for playlist name resolution.
    pub match_threshold: f64,
    /// Safety cap for cursor pagination.
    pub max_pages: usize,
    /// Where the token cache lives.
    pub data_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The `SPOTIFY_API_*` names are preferred; the `SPOTIPY_*` names used by
    /// spotipy-based setups are accepted as fallbacks.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let client_id = get(&["SPOTIFY_API_AUTH_CLIENT_ID", "SPOTIPY_CLIENT_ID"]).ok_or_else(
            || SpotifyError::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()),
        )?;

        let match_threshold = match get(&["SPOTMCP_MATCH_THRESHOLD"]) {
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| {
                    SpotifyError::Config(format!("SPOTMCP_MATCH_THRESHOLD is not a number: {raw}"))
                })?;
                if !(value > 0.0 && value <= 1.0) {
                    return Err(SpotifyError::Config(format!(
                        "SPOTMCP_MATCH_THRESHOLD must be in (0, 1], got {value}"
                    )));
                }
                value
            }
            None => DEFAULT_MATCH_THRESHOLD,
        };

        let max_pages = match get(&["SPOTMCP_MAX_PAGES"]) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(SpotifyError::Config(format!(
                        "SPOTMCP_MAX_PAGES must be a positive integer, got {raw}"
                    )));
                }
            },
            None => DEFAULT_MAX_PAGES,
        };

        Ok(Self {
            client_id,
            redirect_uri: get(&["SPOTIFY_API_REDIRECT_URI", "SPOTIPY_REDIRECT_URI"])
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: get(&["SPOTIFY_API_AUTH_SCOPE"]).unwrap_or_else(|| DEFAULT_SCOPES.join(" ")),
            auth_url: get(&["SPOTIFY_API_AUTH_URL"]).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get(&["SPOTIFY_API_TOKEN_URL"])
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get(&["SPOTIFY_API_URL"])
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_address: get(&["SERVER_ADDRESS"])
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            match_threshold,
            max_pages,
            data_dir: get(&["SPOTMCP_DATA_DIR"])
                .map(PathBuf::from)
                .unwrap_or_else(data_dir),
        })
    }

    /// Path of the persisted OAuth token.
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("cache").join("token.json")
    }
}
