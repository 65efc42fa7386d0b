use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, header::RETRY_AFTER};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Config,
    error::{Result, SpotifyError},
    management::TokenManager,
    spotify::CatalogClient,
    types::{
        CurrentlyPlaying, Device, DevicesResponse, Page, PlayHistory, PlaybackRequest, Playlist,
        SavedTrack, SearchKind, SearchResults, TimeRange, Track,
    },
    utils::MAX_PAGE_LIMIT,
};

/// Attempts per request when Spotify answers 502 or a short 429.
const MAX_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_BACKOFF: Duration = Duration::from_secs(2);
/// Longest `Retry-After` we are willing to sit out.
const MAX_RETRY_AFTER_SECS: u64 = 120;

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// reqwest implementation of [`CatalogClient`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: &Config, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Loads the cached token and builds a client around it.
    pub async fn connect(config: &Config) -> Result<Self> {
        let tokens = TokenManager::load(config).await?;
        Ok(Self::new(config, tokens))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Only follow pagination links that point back at the configured API.
    ///
    /// The link must continue the base URL with a path or query separator, so
    /// `https://api.spotify.com/v1.example.net/` does not qualify.
    fn cursor_url(&self, cursor: &str) -> Result<String> {
        let continues_base = cursor
            .strip_prefix(self.api_url.as_str())
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'));

        if continues_base {
            Ok(cursor.to_string())
        } else {
            Err(SpotifyError::Protocol(format!(
                "refusing to follow pagination link outside {}: {}",
                self.api_url, cursor
            )))
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.tokens.lock().await.get_valid_token().await?;

            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(token)
                .query(query);
            request = match &body {
                Some(json) => request.json(json),
                // Spotify rejects body-less PUT/POST without a Content-Length.
                None if method != Method::GET => request.body(""),
                None => request,
            };

            tracing::debug!(%method, url, attempt, "spotify request");
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS {
                tracing::warn!(url, attempt, "bad gateway from Spotify, retrying");
                sleep(BAD_GATEWAY_BACKOFF).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                match retry_after {
                    Some(secs) if secs <= MAX_RETRY_AFTER_SECS && attempt < MAX_ATTEMPTS => {
                        tracing::warn!(url, secs, "rate limited by Spotify, waiting");
                        sleep(Duration::from_secs(secs)).await;
                        continue;
                    }
                    _ => return Err(SpotifyError::RateLimited { retry_after }),
                }
            }

            return Err(error_from_response(response).await);
        }
    }

    /// GET returning `None` for `204 No Content` or an empty body.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let response = self.send(Method::GET, url, query, None).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn get<T: DeserializeOwned + Default>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        Ok(self.get_optional(url, query).await?.unwrap_or_default())
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        first_page_path: &str,
        cursor: Option<String>,
    ) -> Result<Page<T>> {
        let page = match cursor {
            Some(cursor) => {
                let url = self.cursor_url(&cursor)?;
                self.get_optional::<Page<T>>(&url, &[]).await?
            }
            None => {
                let url = self.endpoint(first_page_path);
                self.get_optional::<Page<T>>(&url, &[("limit", MAX_PAGE_LIMIT.to_string())])
                    .await?
            }
        };
        Ok(page.unwrap_or_default())
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<()> {
        self.send(method, &self.endpoint(path), query, body).await?;
        Ok(())
    }
}

async fn error_from_response(response: Response) -> SpotifyError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorEnvelope>(&text)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_default();
    let message = body
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    let no_device = body.reason.as_deref() == Some("NO_ACTIVE_DEVICE")
        || message.to_lowercase().contains("no active device");

    match status {
        StatusCode::UNAUTHORIZED => SpotifyError::Auth(message),
        StatusCode::NOT_FOUND if no_device => SpotifyError::NoActiveDevice,
        _ => SpotifyError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults> {
        self.get(
            &self.endpoint("/search"),
            &[
                ("q", query.to_string()),
                ("type", kind.to_string()),
                ("limit", limit.clamp(1, MAX_PAGE_LIMIT).to_string()),
            ],
        )
        .await
    }

    async fn list_playlists(&self, cursor: Option<String>) -> Result<Page<Playlist>> {
        self.get_page("/me/playlists", cursor).await
    }

    async fn saved_tracks(&self, cursor: Option<String>) -> Result<Page<SavedTrack>> {
        self.get_page("/me/tracks", cursor).await
    }

    async fn top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<Vec<Track>> {
        let page: Page<Track> = self
            .get(
                &self.endpoint("/me/top/tracks"),
                &[
                    ("limit", limit.clamp(1, MAX_PAGE_LIMIT).to_string()),
                    ("time_range", time_range.to_string()),
                ],
            )
            .await?;
        Ok(page.items)
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<PlayHistory>> {
        let page: Page<PlayHistory> = self
            .get(
                &self.endpoint("/me/player/recently-played"),
                &[("limit", limit.clamp(1, MAX_PAGE_LIMIT).to_string())],
            )
            .await?;
        Ok(page.items)
    }

    async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        let playing: Option<CurrentlyPlaying> = self
            .get_optional(&self.endpoint("/me/player/currently-playing"), &[])
            .await?;
        Ok(playing.filter(|p| p.item.is_some()))
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        let res: DevicesResponse = self.get(&self.endpoint("/me/player/devices"), &[]).await?;
        Ok(res.devices)
    }

    async fn start_playback(&self, request: &PlaybackRequest) -> Result<()> {
        let query: Vec<(&str, String)> = request
            .device_id
            .iter()
            .map(|id| ("device_id", id.clone()))
            .collect();
        let body = if request.is_resume() {
            None
        } else {
            Some(serde_json::to_value(request)?)
        };
        self.command(Method::PUT, "/me/player/play", &query, body).await
    }

    async fn pause_playback(&self) -> Result<()> {
        self.command(Method::PUT, "/me/player/pause", &[], None).await
    }

    async fn skip_next(&self) -> Result<()> {
        self.command(Method::POST, "/me/player/next", &[], None).await
    }

    async fn skip_previous(&self) -> Result<()> {
        self.command(Method::POST, "/me/player/previous", &[], None)
            .await
    }

    async fn set_shuffle(&self, state: bool) -> Result<()> {
        self.command(
            Method::PUT,
            "/me/player/shuffle",
            &[("state", state.to_string())],
            None,
        )
        .await
    }

    async fn add_to_queue(&self, uri: &str) -> Result<()> {
        self.command(
            Method::POST,
            "/me/player/queue",
            &[("uri", uri.to_string())],
            None,
        )
        .await
    }
}
