use schemars::JsonSchema;
use serde::Deserialize;

use crate::types::{SearchKind, TimeRange};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Free-text search query")]
    pub query: String,
    #[schemars(description = "What to search for: track (default), artist, album or playlist")]
    pub kind: Option<SearchKind>,
    #[schemars(description = "Maximum results (1-50, default 10)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SongParams {
    #[schemars(description = "Artist name")]
    pub artist: String,
    #[schemars(description = "Song title")]
    pub song: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UriParams {
    #[schemars(description = "Track URI (spotify:track:...), open.spotify.com link or bare track id")]
    pub uri: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShuffleParams {
    #[schemars(description = "true to enable shuffle, false to disable it")]
    pub state: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LikedSongsParams {
    #[schemars(description = "Shuffle the saved tracks before playing (default true)")]
    pub shuffle: Option<bool>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TopTracksParams {
    #[schemars(description = "Number of tracks (1-50, default 20)")]
    pub limit: Option<u32>,
    #[schemars(description = "short_term (~4 weeks), medium_term (~6 months, default) or long_term")]
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlaylistNameParams {
    #[schemars(description = "Playlist name as the user said it; matching is fuzzy")]
    pub name: String,
    #[schemars(description = "Minimum similarity in (0, 1]; defaults to the server setting")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlaylistIdParams {
    #[schemars(description = "Playlist id, spotify:playlist:... URI or open.spotify.com link")]
    pub playlist_id: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LimitParams {
    #[schemars(description = "Maximum results (1-50, default 20)")]
    pub limit: Option<u32>,
}
