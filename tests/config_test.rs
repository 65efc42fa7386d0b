use std::{collections::HashMap, path::PathBuf};

use spotmcp::{
    config::{Config, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_PAGES, DEFAULT_REDIRECT_URI},
    error::SpotifyError,
    resolve::ResolverSettings,
};

fn config_from(pairs: &[(&str, &str)]) -> Result<Config, SpotifyError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_client_id_is_required() {
    assert!(matches!(config_from(&[]), Err(SpotifyError::Config(_))));
    assert!(matches!(
        config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "   ")]),
        Err(SpotifyError::Config(_))
    ));
}

#[test]
fn test_defaults() {
    let config = config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "client")]).unwrap();

    assert_eq!(config.client_id, "client");
    assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
    assert_eq!(config.api_url, "https://api.spotify.com/v1");
    assert_eq!(config.server_address, "127.0.0.1:8888");
    assert_eq!(config.match_threshold, DEFAULT_MATCH_THRESHOLD);
    assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    assert!(config.scope.contains("user-modify-playback-state"));
    assert!(config.scope.contains("playlist-read-private"));
}

#[test]
fn test_spotipy_names_are_fallbacks() {
    let config = config_from(&[
        ("SPOTIPY_CLIENT_ID", "legacy"),
        ("SPOTIPY_REDIRECT_URI", "http://localhost:9999/cb"),
    ])
    .unwrap();
    assert_eq!(config.client_id, "legacy");
    assert_eq!(config.redirect_uri, "http://localhost:9999/cb");

    let config = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "preferred"),
        ("SPOTIPY_CLIENT_ID", "legacy"),
    ])
    .unwrap();
    assert_eq!(config.client_id, "preferred");
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
        ("SPOTIFY_API_URL", "http://127.0.0.1:4000/v1/"),
        ("SPOTMCP_MATCH_THRESHOLD", "0.75"),
        ("SPOTMCP_MAX_PAGES", "5"),
        ("SPOTMCP_DATA_DIR", "/tmp/spotmcp-test"),
    ])
    .unwrap();

    assert_eq!(config.api_url, "http://127.0.0.1:4000/v1");
    assert_eq!(config.match_threshold, 0.75);
    assert_eq!(config.max_pages, 5);
    assert_eq!(
        config.token_path(),
        PathBuf::from("/tmp/spotmcp-test/cache/token.json")
    );

    let settings = ResolverSettings::from(&config);
    assert_eq!(settings.threshold, 0.75);
    assert_eq!(settings.max_pages, 5);
}

#[test]
fn test_invalid_numbers_are_rejected() {
    for (key, value) in [
        ("SPOTMCP_MATCH_THRESHOLD", "high"),
        ("SPOTMCP_MATCH_THRESHOLD", "0"),
        ("SPOTMCP_MATCH_THRESHOLD", "1.2"),
        ("SPOTMCP_MAX_PAGES", "0"),
        ("SPOTMCP_MAX_PAGES", "-3"),
    ] {
        let result = config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "client"), (key, value)]);
        assert!(
            matches!(result, Err(SpotifyError::Config(_))),
            "{}={} should be rejected",
            key,
            value
        );
    }
}
