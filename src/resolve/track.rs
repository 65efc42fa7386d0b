use std::sync::Arc;

use crate::{
    error::Result,
    resolve::require_text,
    spotify::CatalogClient,
    types::{SearchKind, Track},
};

/// Looks up a single track from artist and title.
///
/// Ranking is left entirely to Spotify's search: the first hit wins and no
/// local fuzzy matching is applied.
pub struct TrackResolver {
    catalog: Arc<dyn CatalogClient>,
}

impl TrackResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    pub async fn resolve(&self, artist: &str, song: &str) -> Result<Option<Track>> {
        let artist = require_text(artist, "artist")?;
        let song = require_text(song, "song")?;

        let results = self
            .catalog
            .search(&search_query(artist, song), SearchKind::Track, 1)
            .await?;
        let track = results.track_items().first().cloned();

        if track.is_none() {
            tracing::info!(artist, song, "no track found");
        }
        Ok(track)
    }

    /// The top result's `spotify:track:` URI, or `None` when the search came
    /// back empty or without a URI.
    pub async fn resolve_uri(&self, artist: &str, song: &str) -> Result<Option<String>> {
        Ok(self.resolve(artist, song).await?.and_then(|t| t.uri))
    }
}

pub fn search_query(artist: &str, song: &str) -> String {
    format!("artist:{} track:{}", artist, song)
}
