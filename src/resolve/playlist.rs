use std::sync::Arc;

use crate::{
    error::Result,
    resolve::{ResolverSettings, pagination, require_text, similarity, validate_threshold},
    spotify::CatalogClient,
    types::{MatchCandidate, Playlist},
};

/// Maps a free-text playlist name onto one playlist id of the current account.
///
/// The whole collection is fetched on every call; nothing is cached between
/// calls, so a resolution always sees the account as it is right now.
pub struct PlaylistResolver {
    catalog: Arc<dyn CatalogClient>,
    settings: ResolverSettings,
}

impl PlaylistResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>, settings: ResolverSettings) -> Self {
        Self { catalog, settings }
    }

    /// Every playlist of the account in server order.
    pub async fn all_playlists(&self) -> Result<Vec<Playlist>> {
        pagination::collect_all(self.settings.max_pages, |cursor| {
            self.catalog.list_playlists(cursor)
        })
        .await
    }

    /// Resolves `name` to the best matching playlist whose similarity is at
    /// least `threshold` (the configured default when `None`).
    ///
    /// `Ok(None)` means nothing qualified, including an empty collection.
    pub async fn resolve(&self, name: &str, threshold: Option<f64>) -> Result<Option<MatchCandidate>> {
        let threshold = validate_threshold(threshold.unwrap_or(self.settings.threshold))?;
        let name = require_text(name, "playlist name")?;

        let playlists = self.all_playlists().await?;
        let found = best_match(name, &playlists, threshold);

        match &found {
            Some(m) => tracing::debug!(name, id = %m.id, similarity = m.similarity, "playlist resolved"),
            None => tracing::info!(
                name,
                threshold,
                candidates = playlists.len(),
                "no playlist matched"
            ),
        }

        Ok(found)
    }

    /// Top `limit` candidates for `name`, best first, regardless of threshold.
    pub async fn candidates(&self, name: &str, limit: usize) -> Result<Vec<MatchCandidate>> {
        let name = require_text(name, "playlist name")?;
        let playlists = self.all_playlists().await?;
        let mut ranked = rank(name, &playlists);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// [`resolve`](Self::resolve) and [`candidates`](Self::candidates) over a
    /// single fetch of the collection.
    pub async fn resolve_with_candidates(
        &self,
        name: &str,
        threshold: Option<f64>,
        limit: usize,
    ) -> Result<(Option<MatchCandidate>, Vec<MatchCandidate>)> {
        let threshold = validate_threshold(threshold.unwrap_or(self.settings.threshold))?;
        let name = require_text(name, "playlist name")?;

        let playlists = self.all_playlists().await?;
        let found = best_match(name, &playlists, threshold);
        let mut ranked = rank(name, &playlists);
        ranked.truncate(limit);

        Ok((found, ranked))
    }
}

/// Picks the highest scoring playlist at or above `threshold`.
///
/// Ties go to the earliest playlist in collection order.
pub fn best_match(name: &str, playlists: &[Playlist], threshold: f64) -> Option<MatchCandidate> {
    let mut best: Option<(&Playlist, f64)> = None;

    for playlist in playlists {
        let score = similarity::ratio(name, &playlist.name);
        if score < threshold {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((playlist, score));
        }
    }

    best.map(|(playlist, similarity)| MatchCandidate {
        id: playlist.id.clone(),
        name: playlist.name.clone(),
        similarity,
    })
}

/// All playlists scored against `name`, best first; ties keep collection order.
pub fn rank(name: &str, playlists: &[Playlist]) -> Vec<MatchCandidate> {
    let mut ranked: Vec<MatchCandidate> = playlists
        .iter()
        .map(|p| MatchCandidate {
            id: p.id.clone(),
            name: p.name.clone(),
            similarity: similarity::ratio(name, &p.name),
        })
        .collect();
    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    ranked
}
