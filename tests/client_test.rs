use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use spotmcp::{
    config::Config,
    error::SpotifyError,
    management::TokenManager,
    playback::PlaybackController,
    resolve::{ResolverSettings, TrackResolver, pagination::collect_all},
    spotify::{CatalogClient, SpotifyClient},
    types::{PlaybackRequest, Token},
};
use tokio::net::TcpListener;

#[derive(Default)]
struct Recorded {
    plays: Vec<(HashMap<String, String>, String)>,
    searches: Vec<String>,
    bearer: Vec<String>,
    previous_calls: usize,
    refreshes: usize,
}

struct Mock {
    base: String,
    recorded: Mutex<Recorded>,
}

type Shared = State<Arc<Mock>>;

async fn playlists(State(mock): Shared, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    match q.get("offset").map(String::as_str) {
        None => Json(json!({
            "items": [
                {"id": "a", "name": "Alpha", "owner": {"display_name": "me"}, "tracks": {"total": 3}},
                {"id": "b", "name": "Beta"}
            ],
            "next": format!("{}/v1/me/playlists?offset=2&limit=50", mock.base),
            "total": 3
        })),
        Some(_) => Json(json!({
            "items": [null, {"id": "c", "name": "Gamma", "unknown_field": true}],
            "next": null,
            "total": 3
        })),
    }
}

async fn currently_playing() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn devices(State(mock): Shared, headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.recorded.lock().unwrap().bearer.push(auth);
    Json(json!({}))
}

async fn search(State(mock): Shared, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let query = q.get("q").cloned().unwrap_or_default();
    mock.recorded.lock().unwrap().searches.push(query.clone());
    if query.contains("Radiohead") {
        Json(json!({
            "tracks": {
                "items": [{
                    "id": "k1",
                    "name": "Karma Police",
                    "uri": "spotify:track:k1",
                    "artists": [{"name": "Radiohead"}],
                    "album": {"name": "OK Computer"}
                }],
                "next": null
            }
        }))
    } else {
        Json(json!({}))
    }
}

async fn pause() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {
            "status": 404,
            "message": "Player command failed: No active device found",
            "reason": "NO_ACTIVE_DEVICE"
        }})),
    )
        .into_response()
}

async fn play(State(mock): Shared, Query(q): Query<HashMap<String, String>>, body: String) -> StatusCode {
    mock.recorded.lock().unwrap().plays.push((q, body));
    StatusCode::NO_CONTENT
}

async fn previous(State(mock): Shared) -> Response {
    let mut recorded = mock.recorded.lock().unwrap();
    recorded.previous_calls += 1;
    if recorded.previous_calls == 1 {
        (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "0")]).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn next() -> Response {
    (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "3600")]).into_response()
}

async fn top_tracks() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
    )
        .into_response()
}

async fn token_endpoint(State(mock): Shared) -> Json<Value> {
    mock.recorded.lock().unwrap().refreshes += 1;
    Json(json!({
        "access_token": "fresh-token",
        "token_type": "Bearer",
        "expires_in": 3600
    }))
}

async fn start_mock() -> Arc<Mock> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let mock = Arc::new(Mock {
        base,
        recorded: Mutex::new(Recorded::default()),
    });

    let app = Router::new()
        .route("/v1/me/playlists", get(playlists))
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .route("/v1/me/player/devices", get(devices))
        .route("/v1/search", get(search))
        .route("/v1/me/player/pause", put(pause))
        .route("/v1/me/player/play", put(play))
        .route("/v1/me/player/previous", post(previous))
        .route("/v1/me/player/next", post(next))
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/api/token", post(token_endpoint))
        .with_state(mock.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    mock
}

fn test_config(mock: &Mock, name: &str) -> Config {
    let data_dir: PathBuf =
        std::env::temp_dir().join(format!("spotmcp-test-{}-{}", std::process::id(), name));
    let env: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client".to_string()),
        ("SPOTIFY_API_URL", format!("{}/v1", mock.base)),
        ("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", mock.base)),
        ("SPOTMCP_DATA_DIR", data_dir.display().to_string()),
    ]);
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

fn token(obtained_at: u64) -> Token {
    Token {
        access_token: "cached-token".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "user-read-playback-state".to_string(),
        expires_in: 3600,
        obtained_at,
    }
}

async fn client(name: &str) -> (Arc<Mock>, Config, Arc<SpotifyClient>) {
    let mock = start_mock().await;
    let config = test_config(&mock, name);
    let tokens = TokenManager::new(token(Utc::now().timestamp() as u64), &config);
    let client = Arc::new(SpotifyClient::new(&config, tokens));
    (mock, config, client)
}

#[tokio::test]
async fn test_playlists_follow_next_links() {
    let (_, _, client) = client("pages").await;

    let playlists = collect_all(10, |cursor| client.list_playlists(cursor))
        .await
        .unwrap();

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(playlists[0].tracks.as_ref().map(|t| t.total), Some(3));
}

#[tokio::test]
async fn test_foreign_pagination_link_is_refused() {
    let (mock, _, client) = client("foreign").await;

    let foreign = vec![
        "http://example.com/v1/me/playlists?offset=2".to_string(),
        format!("{}/v1.example.net/me/playlists?offset=2", mock.base),
    ];
    for link in foreign {
        let err = client.list_playlists(Some(link)).await.unwrap_err();
        assert!(matches!(err, SpotifyError::Protocol(_)));
        assert!(err.is_remote());
    }
}

#[tokio::test]
async fn test_nothing_playing_is_none() {
    let (_, _, client) = client("idle").await;

    assert!(client.currently_playing().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_keys_mean_empty() {
    let (mock, _, client) = client("empty").await;

    assert!(client.devices().await.unwrap().is_empty());
    assert_eq!(
        mock.recorded.lock().unwrap().bearer,
        vec!["Bearer cached-token".to_string()]
    );

    let resolver = TrackResolver::new(client.clone());
    assert!(resolver.resolve_uri("Nobody", "Nothing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_resolves_track_uri() {
    let (mock, _, client) = client("search").await;

    let uri = TrackResolver::new(client)
        .resolve_uri("Radiohead", "Karma Police")
        .await
        .unwrap();

    assert_eq!(uri.as_deref(), Some("spotify:track:k1"));
    assert_eq!(
        mock.recorded.lock().unwrap().searches,
        vec!["artist:Radiohead track:Karma Police".to_string()]
    );
}

#[tokio::test]
async fn test_no_active_device_is_mapped() {
    let (_, _, client) = client("nodevice").await;

    assert!(matches!(
        client.pause_playback().await,
        Err(SpotifyError::NoActiveDevice)
    ));

    let player = PlaybackController::new(client, ResolverSettings::default());
    assert!(!player.pause().await.unwrap());
}

#[tokio::test]
async fn test_start_playback_sends_device_and_body() {
    let (mock, _, client) = client("play").await;

    client
        .start_playback(
            &PlaybackRequest::tracks(vec!["spotify:track:k1".to_string()]).on_device("desk"),
        )
        .await
        .unwrap();
    client.start_playback(&PlaybackRequest::resume()).await.unwrap();

    let recorded = mock.recorded.lock().unwrap();
    assert_eq!(recorded.plays.len(), 2);

    let (query, body) = &recorded.plays[0];
    assert_eq!(query.get("device_id").map(String::as_str), Some("desk"));
    let body: Value = serde_json::from_str(body).unwrap();
    assert_eq!(body, json!({"uris": ["spotify:track:k1"]}));

    let (query, body) = &recorded.plays[1];
    assert!(query.is_empty());
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let (_, _, client) = client("unauthorized").await;

    let result = client.top_tracks(10, Default::default()).await;

    assert!(matches!(result, Err(SpotifyError::Auth(msg)) if msg.contains("expired")));
}

#[tokio::test]
async fn test_short_rate_limit_is_retried() {
    let (mock, _, client) = client("retry").await;

    client.skip_previous().await.unwrap();

    assert_eq!(mock.recorded.lock().unwrap().previous_calls, 2);
}

#[tokio::test]
async fn test_long_rate_limit_is_reported() {
    let (_, _, client) = client("ratelimit").await;

    assert!(matches!(
        client.skip_next().await,
        Err(SpotifyError::RateLimited {
            retry_after: Some(3600)
        })
    ));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let mock = start_mock().await;
    let config = test_config(&mock, "refresh");
    let client = SpotifyClient::new(&config, TokenManager::new(token(0), &config));

    client.devices().await.unwrap();

    {
        let recorded = mock.recorded.lock().unwrap();
        assert_eq!(recorded.refreshes, 1);
        assert_eq!(recorded.bearer, vec!["Bearer fresh-token".to_string()]);
    }

    let stored = TokenManager::load(&config).await.unwrap();
    assert_eq!(stored.current_token().access_token, "fresh-token");
    // Spotify did not rotate the refresh token, so the old one is kept.
    assert_eq!(stored.current_token().refresh_token, "refresh");

    let _ = std::fs::remove_dir_all(&config.data_dir);
}
