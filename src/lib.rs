//! Spotify remote control over the Model Context Protocol.
//!
//! The library resolves loosely spoken names (playlists, songs) to Spotify
//! identifiers and drives playback through the Spotify Web API. The binary
//! exposes it as an MCP stdio server plus a few CLI helpers.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Environment loading and typed configuration
//! - `error` - Error taxonomy shared by all layers
//! - `logging` - tracing subscriber setup
//! - `management` - Token persistence and refresh
//! - `mcp` - MCP tools and resources
//! - `playback` - Player commands built on the resolvers
//! - `resolve` - Pagination, similarity and name resolution
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and OAuth flow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod mcp;
pub mod playback;
pub mod resolve;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

// The macros below write to stderr: stdout belongs to the MCP transport.

/// Prints an informational message with a blue bullet point.
///
/// ```text
/// [o] Fetching playlists...
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits with code 1.
///
/// Only for fatal errors in the CLI; library code returns `SpotifyError`.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
