#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use spotmcp::{
    error::{Result, SpotifyError},
    spotify::CatalogClient,
    types::{
        ArtistRef, CurrentlyPlaying, Device, Page, PlayHistory, PlaybackRequest, Playlist,
        SavedTrack, SearchKind, SearchResults, TimeRange, Track,
    },
};

/// In-memory catalog with scripted pages and a simulated player.
///
/// Cursors are `"page:<n>"`. Player commands fail with `NoActiveDevice`
/// unless `active` is set or the request targets a device explicitly.
#[derive(Default)]
pub struct FakeCatalog {
    pub playlist_pages: Vec<Page<Playlist>>,
    pub saved_pages: Vec<Page<SavedTrack>>,
    pub fail_on_page: Option<usize>,
    pub search_hits: Vec<Track>,
    pub top: Vec<Track>,
    pub history: Vec<PlayHistory>,
    pub current: Option<CurrentlyPlaying>,
    pub devices: Vec<Device>,
    pub active: bool,

    pub playlist_fetches: AtomicUsize,
    pub saved_fetches: AtomicUsize,
    pub searches: Mutex<Vec<String>>,
    pub plays: Mutex<Vec<PlaybackRequest>>,
    pub commands: Mutex<Vec<String>>,
    pub queued: Mutex<Vec<String>>,
}

pub fn cursor(index: usize) -> String {
    format!("page:{}", index)
}

fn page_index(cursor: Option<String>) -> usize {
    cursor
        .and_then(|c| c.strip_prefix("page:").and_then(|n| n.parse().ok()))
        .unwrap_or(0)
}

fn chain<T>(pages: Vec<Vec<T>>) -> Vec<Page<T>> {
    let count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, items)| {
            let next = (i + 1 < count).then(|| cursor(i + 1));
            Page::new(items, next)
        })
        .collect()
}

pub fn track(name: &str, artist: &str, id: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        name: name.to_string(),
        uri: Some(format!("spotify:track:{}", id)),
        artists: vec![ArtistRef {
            id: None,
            name: artist.to_string(),
            uri: None,
        }],
        album: None,
        duration_ms: None,
    }
}

pub fn device(id: &str, name: &str, active: bool) -> Device {
    Device {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: "Computer".to_string(),
        is_active: active,
        volume_percent: None,
    }
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One page per inner slice, ids `"1"`, `"2"`, ... in listing order.
    pub fn with_playlists(mut self, pages: &[&[&str]]) -> Self {
        let mut id = 0;
        let pages = pages
            .iter()
            .map(|names| {
                names
                    .iter()
                    .map(|name| {
                        id += 1;
                        Playlist::new(id.to_string(), *name)
                    })
                    .collect()
            })
            .collect();
        self.playlist_pages = chain(pages);
        self
    }

    /// Pages of generated playlists with the given sizes.
    pub fn with_playlist_page_sizes(mut self, sizes: &[usize]) -> Self {
        let mut id = 0;
        let pages = sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        id += 1;
                        Playlist::new(format!("pl{}", id), format!("Playlist {}", id))
                    })
                    .collect()
            })
            .collect();
        self.playlist_pages = chain(pages);
        self
    }

    pub fn with_saved_tracks(mut self, pages: Vec<Vec<Track>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|tracks| {
                tracks
                    .into_iter()
                    .map(|track| SavedTrack {
                        track,
                        added_at: None,
                    })
                    .collect()
            })
            .collect();
        self.saved_pages = chain(pages);
        self
    }

    pub fn failing_on_page(mut self, index: usize) -> Self {
        self.fail_on_page = Some(index);
        self
    }

    pub fn with_search_hits(mut self, hits: Vec<Track>) -> Self {
        self.search_hits = hits;
        self
    }

    pub fn with_top_tracks(mut self, top: Vec<Track>) -> Self {
        self.top = top;
        self
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_current(mut self, current: CurrentlyPlaying) -> Self {
        self.current = Some(current);
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn playlist_fetch_count(&self) -> usize {
        self.playlist_fetches.load(Ordering::SeqCst)
    }

    pub fn played(&self) -> Vec<PlaybackRequest> {
        self.plays.lock().unwrap().clone()
    }

    pub fn command_log(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn player_command(&self, name: &str) -> Result<()> {
        self.commands.lock().unwrap().push(name.to_string());
        if self.active {
            Ok(())
        } else {
            Err(SpotifyError::NoActiveDevice)
        }
    }

    fn page<T: Clone>(&self, pages: &[Page<T>], cursor: Option<String>) -> Result<Page<T>> {
        let index = page_index(cursor);
        if self.fail_on_page == Some(index) {
            return Err(SpotifyError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(pages.get(index).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults> {
        self.searches.lock().unwrap().push(query.to_string());
        let mut results = SearchResults::default();
        if kind == SearchKind::Track {
            let hits = self
                .search_hits
                .iter()
                .take(limit as usize)
                .cloned()
                .collect();
            results.tracks = Some(Page::last(hits));
        }
        Ok(results)
    }

    async fn list_playlists(&self, cursor: Option<String>) -> Result<Page<Playlist>> {
        self.playlist_fetches.fetch_add(1, Ordering::SeqCst);
        self.page(&self.playlist_pages, cursor)
    }

    async fn saved_tracks(&self, cursor: Option<String>) -> Result<Page<SavedTrack>> {
        self.saved_fetches.fetch_add(1, Ordering::SeqCst);
        self.page(&self.saved_pages, cursor)
    }

    async fn top_tracks(&self, limit: u32, _time_range: TimeRange) -> Result<Vec<Track>> {
        Ok(self.top.iter().take(limit as usize).cloned().collect())
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<PlayHistory>> {
        Ok(self.history.iter().take(limit as usize).cloned().collect())
    }

    async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        Ok(self.current.clone())
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        Ok(self.devices.clone())
    }

    async fn start_playback(&self, request: &PlaybackRequest) -> Result<()> {
        self.plays.lock().unwrap().push(request.clone());
        if self.active || request.device_id.is_some() {
            Ok(())
        } else {
            Err(SpotifyError::NoActiveDevice)
        }
    }

    async fn pause_playback(&self) -> Result<()> {
        self.player_command("pause")
    }

    async fn skip_next(&self) -> Result<()> {
        self.player_command("next")
    }

    async fn skip_previous(&self) -> Result<()> {
        self.player_command("previous")
    }

    async fn set_shuffle(&self, state: bool) -> Result<()> {
        self.player_command(&format!("shuffle:{}", state))
    }

    async fn add_to_queue(&self, uri: &str) -> Result<()> {
        self.player_command("queue")?;
        self.queued.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}
