//! Player commands composed from the resolvers and single client calls.
//!
//! "No active device" is an expected condition for a remote-control server,
//! so it is turned into a value wherever a fallback exists:
//!
//! - starting playback retries once on the first available device and
//!   reports [`PlayOutcome::NoDevice`] when the account has none;
//! - transport commands (pause, resume, skip, shuffle, queue) return `false`.
//!
//! Every other failure is returned unchanged.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{Result, SpotifyError},
    resolve::{PlaylistResolver, ResolverSettings, TrackResolver, pagination},
    spotify::CatalogClient,
    types::{
        CurrentlyPlaying, Device, PlayHistory, PlaybackRequest, Playlist, SearchHit, SearchKind,
        TimeRange, Track,
    },
    utils,
};

/// Most track URIs sent in a single play request.
pub const MAX_PLAYBACK_URIS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayOutcome {
    /// Playback was started (or the item was queued).
    Playing,
    /// Nothing matched the request.
    NotFound,
    /// The account has no device to play on.
    NoDevice,
}

pub struct PlaybackController {
    catalog: Arc<dyn CatalogClient>,
    playlists: PlaylistResolver,
    tracks: TrackResolver,
    settings: ResolverSettings,
}

impl PlaybackController {
    pub fn new(catalog: Arc<dyn CatalogClient>, settings: ResolverSettings) -> Self {
        Self {
            playlists: PlaylistResolver::new(Arc::clone(&catalog), settings),
            tracks: TrackResolver::new(Arc::clone(&catalog)),
            catalog,
            settings,
        }
    }

    pub fn playlist_resolver(&self) -> &PlaylistResolver {
        &self.playlists
    }

    pub fn track_resolver(&self) -> &TrackResolver {
        &self.tracks
    }

    /// Starts playback, moving it to the first available device when Spotify
    /// reports that none is active.
    async fn start(&self, request: PlaybackRequest) -> Result<PlayOutcome> {
        match self.catalog.start_playback(&request).await {
            Ok(()) => Ok(PlayOutcome::Playing),
            Err(SpotifyError::NoActiveDevice) => {
                let devices = self.catalog.devices().await?;
                let Some(device_id) = devices.iter().find_map(|d| d.id.clone()) else {
                    tracing::info!("no playback device available");
                    return Ok(PlayOutcome::NoDevice);
                };

                tracing::info!(%device_id, "no active device, starting playback on first available");
                match self.catalog.start_playback(&request.on_device(device_id)).await {
                    Ok(()) => Ok(PlayOutcome::Playing),
                    Err(SpotifyError::NoActiveDevice) => Ok(PlayOutcome::NoDevice),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Runs a transport command, mapping "no active device" to `false`.
    async fn transport<F>(&self, what: &str, command: F) -> Result<bool>
    where
        F: std::future::Future<Output = Result<()>>,
    {
        match command.await {
            Ok(()) => Ok(true),
            Err(SpotifyError::NoActiveDevice) => {
                tracing::info!(command = what, "no active device");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn play_uri(&self, uri: &str) -> Result<PlayOutcome> {
        let id = utils::expect_id(uri, "track")?;
        self.start(PlaybackRequest::tracks(vec![utils::track_uri(&id)]))
            .await
    }

    pub async fn play_song(&self, artist: &str, song: &str) -> Result<PlayOutcome> {
        match self.tracks.resolve_uri(artist, song).await? {
            Some(uri) => self.start(PlaybackRequest::tracks(vec![uri])).await,
            None => Ok(PlayOutcome::NotFound),
        }
    }

    pub async fn play_playlist_by_id(&self, playlist: &str) -> Result<PlayOutcome> {
        let id = utils::expect_id(playlist, "playlist")?;
        self.start(PlaybackRequest::context(utils::playlist_uri(&id)))
            .await
    }

    pub async fn play_playlist_by_name(
        &self,
        name: &str,
        threshold: Option<f64>,
    ) -> Result<PlayOutcome> {
        match self.playlists.resolve(name, threshold).await? {
            Some(found) => self.play_playlist_by_id(&found.id).await,
            None => Ok(PlayOutcome::NotFound),
        }
    }

    /// Plays the saved tracks, optionally in a fresh random order.
    ///
    /// Without shuffle only the first [`MAX_PLAYBACK_URIS`] saved tracks are
    /// read. With shuffle the sample is drawn from as much of the library as
    /// the page cap allows; a larger library is sampled, not rejected.
    pub async fn play_liked_songs(&self, shuffle: bool) -> Result<PlayOutcome> {
        let wanted = if shuffle { usize::MAX } else { MAX_PLAYBACK_URIS };
        let saved = pagination::collect_up_to(self.settings.max_pages, wanted, |cursor| {
            self.catalog.saved_tracks(cursor)
        })
        .await?;

        let mut uris: Vec<String> = saved.into_iter().filter_map(|s| s.track.uri).collect();
        if uris.is_empty() {
            return Ok(PlayOutcome::NotFound);
        }
        if shuffle {
            uris = utils::true_shuffle(uris);
        }
        uris.truncate(MAX_PLAYBACK_URIS);

        self.start(PlaybackRequest::tracks(uris)).await
    }

    pub async fn play_top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<PlayOutcome> {
        let uris: Vec<String> = self
            .catalog
            .top_tracks(limit, time_range)
            .await?
            .into_iter()
            .filter_map(|t| t.uri)
            .collect();
        if uris.is_empty() {
            return Ok(PlayOutcome::NotFound);
        }
        self.start(PlaybackRequest::tracks(uris)).await
    }

    pub async fn resume(&self) -> Result<bool> {
        self.transport("resume", self.catalog.start_playback(&PlaybackRequest::resume()))
            .await
    }

    pub async fn pause(&self) -> Result<bool> {
        self.transport("pause", self.catalog.pause_playback()).await
    }

    pub async fn skip_next(&self) -> Result<bool> {
        self.transport("next", self.catalog.skip_next()).await
    }

    pub async fn skip_previous(&self) -> Result<bool> {
        self.transport("previous", self.catalog.skip_previous())
            .await
    }

    pub async fn set_shuffle(&self, state: bool) -> Result<bool> {
        self.transport("shuffle", self.catalog.set_shuffle(state))
            .await
    }

    pub async fn add_to_queue(&self, uri: &str) -> Result<bool> {
        let uri = utils::track_uri(&utils::expect_id(uri, "track")?);
        self.transport("queue", self.catalog.add_to_queue(&uri))
            .await
    }

    pub async fn queue_song(&self, artist: &str, song: &str) -> Result<PlayOutcome> {
        let Some(uri) = self.tracks.resolve_uri(artist, song).await? else {
            return Ok(PlayOutcome::NotFound);
        };
        if self.add_to_queue(&uri).await? {
            Ok(PlayOutcome::Playing)
        } else {
            Ok(PlayOutcome::NoDevice)
        }
    }

    pub async fn current_track(&self) -> Result<Option<CurrentlyPlaying>> {
        self.catalog.currently_playing().await
    }

    pub async fn recently_played(&self, limit: u32) -> Result<Vec<PlayHistory>> {
        self.catalog.recently_played(limit).await
    }

    pub async fn top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<Vec<Track>> {
        self.catalog.top_tracks(limit, time_range).await
    }

    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.catalog.devices().await
    }

    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        self.playlists.all_playlists().await
    }

    pub async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SpotifyError::InvalidArgument("query must not be empty".to_string()));
        }
        Ok(self.catalog.search(query, kind, limit).await?.hits())
    }
}
