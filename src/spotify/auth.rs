use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{Result, SpotifyError},
    server::{CallbackState, start_api_server},
    types::{PkceToken, Token},
    utils, warning,
};

/// How long the login flow waits for the browser round trip.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Token endpoint response. Refresh responses may omit `refresh_token` and `scope`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
            scope: res.scope.unwrap_or_default(),
            expires_in: res.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the complete OAuth 2.0 PKCE authorization flow.
///
/// 1. Generates a code verifier and the matching SHA256 challenge
/// 2. Starts the local callback server on `config.server_address`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to exchange the code for a token
///
/// The callback server is shut down before returning. Persisting the token is
/// left to the caller.
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] when no token arrives within the timeout and
/// [`SpotifyError::Config`] when the callback server cannot bind.
pub async fn authorize(config: &Config) -> Result<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let state = Arc::new(CallbackState {
        config: config.clone(),
        pkce: Mutex::new(Some(PkceToken {
            code_verifier,
            token: None,
        })),
    });

    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .map_err(|e| {
            SpotifyError::Config(format!(
                "cannot bind callback server on {}: {}",
                config.server_address, e
            ))
        })?;
    let server = tokio::spawn(start_api_server(listener, Arc::clone(&state)));

    let auth_url = authorization_url(config, &code_challenge);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(&state.pkce, LOGIN_TIMEOUT).await;
    server.abort();

    token.ok_or_else(|| SpotifyError::Auth("authentication failed or timed out".to_string()))
}

/// Builds the Spotify authorization URL for the PKCE flow.
pub fn authorization_url(config: &Config, code_challenge: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = config.auth_url,
        client_id = urlencoding::encode(&config.client_id),
        redirect_uri = urlencoding::encode(&config.redirect_uri),
        code_challenge = code_challenge,
        scope = urlencoding::encode(&config.scope),
    )
}

/// Polls the shared PKCE state until the callback stored a token or the
/// timeout elapses.
async fn wait_for_token(state: &Mutex<Option<PkceToken>>, max_wait: Duration) -> Option<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
                return Some(token.clone());
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

/// Exchanges an authorization code for an access token using PKCE.
pub async fn exchange_code_pkce(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token> {
    let res = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

/// Refreshes an expired access token using a refresh token.
///
/// The returned token may carry an empty `refresh_token`/`scope` when Spotify
/// does not rotate them; callers merge it with the previous token.
pub async fn refresh_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    refresh_token: &str,
) -> Result<Token> {
    if refresh_token.is_empty() {
        return Err(SpotifyError::Auth(
            "token expired and no refresh token is cached. Please run spotmcp auth".to_string(),
        ));
    }

    let res = http
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

async fn token_from_response(res: reqwest::Response) -> Result<Token> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(SpotifyError::Auth(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&body)?;
    Ok(parsed.into())
}
