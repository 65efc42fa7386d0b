use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric, seq::SliceRandom};
use sha2::{Digest, Sha256};

use crate::error::{Result, SpotifyError};

/// Upper bound the Web API accepts for `limit` on most listing endpoints.
pub const MAX_PAGE_LIMIT: u32 = 50;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts the bare id from a `spotify:<kind>:<id>` URI or an
/// `open.spotify.com/<kind>/<id>` link. Anything else is returned trimmed.
fn strip_uri(uri: &str, kind: &str) -> String {
    let uri = uri.trim();

    if let Some(id) = uri.strip_prefix(&format!("spotify:{kind}:")) {
        return id.to_string();
    }

    if uri.contains("open.spotify.com") {
        let marker = format!("/{kind}/");
        if let Some(pos) = uri.find(&marker) {
            let rest = &uri[pos + marker.len()..];
            return rest
                .split(['?', '#', '/'])
                .next()
                .unwrap_or_default()
                .to_string();
        }
    }

    uri.to_string()
}

pub fn strip_track_uri(uri: &str) -> String {
    strip_uri(uri, "track")
}

pub fn strip_playlist_uri(uri: &str) -> String {
    strip_uri(uri, "playlist")
}

/// Bare `kind` id from user input, rejecting empty input and URIs or links
/// that name another kind (`spotify:album:x` is not a track).
pub fn expect_id(input: &str, kind: &str) -> Result<String> {
    let id = strip_uri(input, kind);
    if id.is_empty() {
        return Err(SpotifyError::InvalidArgument(format!("{} id must not be empty", kind)));
    }
    if id.starts_with("spotify:") || id.contains("open.spotify.com") {
        return Err(SpotifyError::InvalidArgument(format!(
            "expected a Spotify {} but got {}",
            kind, id
        )));
    }
    Ok(id)
}

pub fn track_uri(uri_or_id: &str) -> String {
    format!("spotify:track:{}", strip_track_uri(uri_or_id))
}

pub fn playlist_uri(uri_or_id: &str) -> String {
    format!("spotify:playlist:{}", strip_playlist_uri(uri_or_id))
}

/// Uniformly random permutation, independent of the player's own shuffle.
pub fn true_shuffle<T>(mut items: Vec<T>) -> Vec<T> {
    items.shuffle(&mut rand::rng());
    items
}

/// Clamps a requested page size into the range the Web API accepts.
pub fn clamp_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
}
