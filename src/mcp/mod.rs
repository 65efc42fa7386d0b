//! MCP surface: tools and resources served over stdio.
//!
//! Every handler is a thin wrapper over [`PlaybackController`]; results are
//! small JSON documents. Faults are logged here and turned into MCP errors.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolResult, Content, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, RawResource, RawResourceTemplate, ReadResourceRequestParams,
        ReadResourceResult, ResourceContents, ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::SpotifyError,
    playback::{PlayOutcome, PlaybackController},
    resolve::ResolverSettings,
    spotify::CatalogClient,
    types::{PlaylistSummary, SearchKind, TrackSummary},
    utils,
};

mod params;

pub use params::*;

pub const PLAYLISTS_URI: &str = "spotify://playlists";
pub const DEVICES_URI: &str = "spotify://devices";
pub const CURRENT_TRACK_URI: &str = "spotify://player/current";
pub const TRACK_URI_TEMPLATE: &str = "play://{artist}_{song}";

const DEFAULT_SEARCH_LIMIT: u32 = 10;
const DEFAULT_LIST_LIMIT: u32 = 20;

fn fault(operation: &str, e: SpotifyError) -> McpError {
    tracing::error!(operation, remote = e.is_remote(), error = %e, "tool call failed");
    match e {
        SpotifyError::InvalidArgument(msg) => McpError::invalid_params(msg, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(to_json(value)?)]))
}

fn outcome_result(outcome: PlayOutcome) -> Result<CallToolResult, McpError> {
    json_result(&json!({ "status": outcome }))
}

fn command_result(done: bool) -> Result<CallToolResult, McpError> {
    let status = if done { "ok" } else { "no_active_device" };
    json_result(&json!({ "ok": done, "status": status }))
}

/// Splits `play://{artist}_{song}` at the last underscore and percent-decodes
/// both halves.
pub fn parse_track_resource(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("play://")?;
    let (artist, song) = rest.rsplit_once('_')?;
    let artist = urlencoding::decode(artist).ok()?.trim().to_string();
    let song = urlencoding::decode(song).ok()?.trim().to_string();
    if artist.is_empty() || song.is_empty() {
        return None;
    }
    Some((artist, song))
}

#[derive(Clone)]
pub struct SpotifyMcp {
    player: Arc<PlaybackController>,
    tool_router: ToolRouter<Self>,
}

impl SpotifyMcp {
    pub fn from_catalog(catalog: Arc<dyn CatalogClient>, settings: ResolverSettings) -> Self {
        Self::new(Arc::new(PlaybackController::new(catalog, settings)))
    }

    /// Text of a readable resource, or `None` for an unknown URI.
    pub async fn read(&self, uri: &str) -> Result<Option<String>, McpError> {
        let text = match uri {
            PLAYLISTS_URI => {
                let playlists = self
                    .player
                    .playlists()
                    .await
                    .map_err(|e| fault("read playlists", e))?;
                let summaries: Vec<PlaylistSummary> =
                    playlists.iter().map(PlaylistSummary::from).collect();
                to_json(&summaries)?
            }
            DEVICES_URI => {
                let devices = self
                    .player
                    .devices()
                    .await
                    .map_err(|e| fault("read devices", e))?;
                to_json(&devices)?
            }
            CURRENT_TRACK_URI => {
                let current = self
                    .player
                    .current_track()
                    .await
                    .map_err(|e| fault("read current track", e))?;
                to_json(&current.and_then(|c| c.summary()))?
            }
            other => {
                let Some((artist, song)) = parse_track_resource(other) else {
                    return Ok(None);
                };
                let uri = self
                    .player
                    .track_resolver()
                    .resolve_uri(&artist, &song)
                    .await
                    .map_err(|e| fault("read track uri", e))?;
                to_json(&uri)?
            }
        };
        Ok(Some(text))
    }
}

#[tool_router]
impl SpotifyMcp {
    pub fn new(player: Arc<PlaybackController>) -> Self {
        Self {
            player,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Search Spotify for tracks, artists, albums or playlists")]
    pub async fn search_tracks(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = p.kind.unwrap_or(SearchKind::Track);
        let limit = utils::clamp_limit(p.limit, DEFAULT_SEARCH_LIMIT);
        let hits = self
            .player
            .search(&p.query, kind, limit)
            .await
            .map_err(|e| fault("search_tracks", e))?;
        json_result(&hits)
    }

    #[tool(description = "Find the Spotify URI of a song by artist and title; null when nothing matches")]
    pub async fn get_track_uri(
        &self,
        params: Parameters<SongParams>,
    ) -> Result<CallToolResult, McpError> {
        let uri = self
            .player
            .track_resolver()
            .resolve_uri(&params.0.artist, &params.0.song)
            .await
            .map_err(|e| fault("get_track_uri", e))?;
        json_result(&json!({ "uri": uri }))
    }

    #[tool(description = "Play a single track by its Spotify URI")]
    pub async fn play_song_by_uri(
        &self,
        params: Parameters<UriParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .play_uri(&params.0.uri)
            .await
            .map_err(|e| fault("play_song_by_uri", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "Play a song by artist and title")]
    pub async fn play_song(&self, params: Parameters<SongParams>) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .play_song(&params.0.artist, &params.0.song)
            .await
            .map_err(|e| fault("play_song", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "Pause playback on the active device")]
    pub async fn pause_playback(&self) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .pause()
            .await
            .map_err(|e| fault("pause_playback", e))?;
        command_result(done)
    }

    #[tool(description = "Resume playback on the active device")]
    pub async fn resume_playback(&self) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .resume()
            .await
            .map_err(|e| fault("resume_playback", e))?;
        command_result(done)
    }

    #[tool(description = "Skip to the next track")]
    pub async fn next_track(&self) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .skip_next()
            .await
            .map_err(|e| fault("next_track", e))?;
        command_result(done)
    }

    #[tool(description = "Go back to the previous track")]
    pub async fn previous_track(&self) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .skip_previous()
            .await
            .map_err(|e| fault("previous_track", e))?;
        command_result(done)
    }

    #[tool(description = "Turn the player's shuffle mode on or off")]
    pub async fn set_shuffle(
        &self,
        params: Parameters<ShuffleParams>,
    ) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .set_shuffle(params.0.state)
            .await
            .map_err(|e| fault("set_shuffle", e))?;
        command_result(done)
    }

    #[tool(description = "Play the user's liked songs, shuffled by default")]
    pub async fn play_liked_songs(
        &self,
        params: Parameters<LikedSongsParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .play_liked_songs(params.0.shuffle.unwrap_or(true))
            .await
            .map_err(|e| fault("play_liked_songs", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "Play the user's most listened tracks")]
    pub async fn play_top_tracks(
        &self,
        params: Parameters<TopTracksParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let outcome = self
            .player
            .play_top_tracks(
                utils::clamp_limit(p.limit, DEFAULT_LIST_LIMIT),
                p.time_range.unwrap_or_default(),
            )
            .await
            .map_err(|e| fault("play_top_tracks", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "Add a track to the playback queue by URI")]
    pub async fn add_to_queue(
        &self,
        params: Parameters<UriParams>,
    ) -> Result<CallToolResult, McpError> {
        let done = self
            .player
            .add_to_queue(&params.0.uri)
            .await
            .map_err(|e| fault("add_to_queue", e))?;
        command_result(done)
    }

    #[tool(description = "Add a song to the playback queue by artist and title")]
    pub async fn queue_song(&self, params: Parameters<SongParams>) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .queue_song(&params.0.artist, &params.0.song)
            .await
            .map_err(|e| fault("queue_song", e))?;
        let status = match outcome {
            PlayOutcome::Playing => json!("queued"),
            other => json!(other),
        };
        json_result(&json!({ "status": status }))
    }

    #[tool(
        description = "Resolve a spoken playlist name to one of the user's playlists. Returns the best match above the similarity threshold, or null"
    )]
    pub async fn find_playlist(
        &self,
        params: Parameters<PlaylistNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let found = self
            .player
            .playlist_resolver()
            .resolve(&params.0.name, params.0.threshold)
            .await
            .map_err(|e| fault("find_playlist", e))?;
        json_result(&json!({
            "playlist_id": found.as_ref().map(|m| m.id.as_str()),
            "match": found,
        }))
    }

    #[tool(description = "Play a playlist by id or URI")]
    pub async fn play_playlist_by_id(
        &self,
        params: Parameters<PlaylistIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .play_playlist_by_id(&params.0.playlist_id)
            .await
            .map_err(|e| fault("play_playlist_by_id", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "Play one of the user's playlists by approximate name")]
    pub async fn play_playlist_by_name(
        &self,
        params: Parameters<PlaylistNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .player
            .play_playlist_by_name(&params.0.name, params.0.threshold)
            .await
            .map_err(|e| fault("play_playlist_by_name", e))?;
        outcome_result(outcome)
    }

    #[tool(description = "List every playlist of the user")]
    pub async fn list_playlists(&self) -> Result<CallToolResult, McpError> {
        let playlists = self
            .player
            .playlists()
            .await
            .map_err(|e| fault("list_playlists", e))?;
        let summaries: Vec<PlaylistSummary> = playlists.iter().map(PlaylistSummary::from).collect();
        json_result(&summaries)
    }

    #[tool(description = "Show the track that is playing right now; null when idle")]
    pub async fn get_current_track(&self) -> Result<CallToolResult, McpError> {
        let current = self
            .player
            .current_track()
            .await
            .map_err(|e| fault("get_current_track", e))?;
        json_result(&current.and_then(|c| c.summary()))
    }

    #[tool(description = "List recently played tracks, newest first")]
    pub async fn get_recently_played(
        &self,
        params: Parameters<LimitParams>,
    ) -> Result<CallToolResult, McpError> {
        let history = self
            .player
            .recently_played(utils::clamp_limit(params.0.limit, DEFAULT_LIST_LIMIT))
            .await
            .map_err(|e| fault("get_recently_played", e))?;
        let tracks: Vec<TrackSummary> = history.iter().map(|h| TrackSummary::from(&h.track)).collect();
        json_result(&tracks)
    }

    #[tool(description = "List the user's top tracks for a time range")]
    pub async fn get_top_tracks(
        &self,
        params: Parameters<TopTracksParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let top = self
            .player
            .top_tracks(
                utils::clamp_limit(p.limit, DEFAULT_LIST_LIMIT),
                p.time_range.unwrap_or_default(),
            )
            .await
            .map_err(|e| fault("get_top_tracks", e))?;
        let tracks: Vec<TrackSummary> = top.iter().map(TrackSummary::from).collect();
        json_result(&tracks)
    }

    #[tool(description = "List the devices Spotify can play on")]
    pub async fn list_devices(&self) -> Result<CallToolResult, McpError> {
        let devices = self
            .player
            .devices()
            .await
            .map_err(|e| fault("list_devices", e))?;
        json_result(&devices)
    }
}

fn resource(uri: &str, name: &str, title: &str, description: &str) -> rmcp::model::Resource {
    RawResource {
        uri: uri.to_owned(),
        name: name.to_owned(),
        title: Some(title.to_owned()),
        description: Some(description.to_owned()),
        mime_type: Some("application/json".to_owned()),
        size: None,
        icons: None,
        meta: None,
    }
    .no_annotation()
}

#[tool_handler]
impl ServerHandler for SpotifyMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Control Spotify playback. Playlists can be named loosely: use find_playlist \
                 or play_playlist_by_name and the closest playlist name is picked. Playback \
                 commands report no_device when no Spotify client is open."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
                resource(
                    PLAYLISTS_URI,
                    "playlists",
                    "Playlists",
                    "Every playlist of the user with id, owner and track count.",
                ),
                resource(
                    DEVICES_URI,
                    "devices",
                    "Devices",
                    "Devices available for playback.",
                ),
                resource(
                    CURRENT_TRACK_URI,
                    "current_track",
                    "Current Track",
                    "The track playing right now, or null.",
                ),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![ResourceTemplate::new(
                RawResourceTemplate {
                    uri_template: TRACK_URI_TEMPLATE.to_owned(),
                    name: "track_uri".to_owned(),
                    title: Some("Track URI by Artist and Song".to_owned()),
                    description: Some(
                        "Spotify URI of the top search hit for artist and song, or null. \
                         Percent-encode underscores inside the artist name."
                            .to_owned(),
                    ),
                    mime_type: Some("application/json".to_owned()),
                    icons: None,
                },
                None,
            )],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        match self.read(&uri).await? {
            Some(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            }),
            None => Err(McpError::resource_not_found(
                "resource_not_found",
                Some(json!({ "uri": uri.as_str() })),
            )),
        }
    }
}
