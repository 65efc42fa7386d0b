//! # API Module
//!
//! HTTP endpoints served by the temporary local server that runs during
//! `spotmcp auth`.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server and
//!   completes the PKCE flow by exchanging the authorization code for tokens.
//! - [`health`] - Returns status and version; handy to check that the redirect
//!   URI actually reaches this process.
//!
//! The server is only alive for the duration of the login flow; the MCP server
//! itself never listens on a socket.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotmcp::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
