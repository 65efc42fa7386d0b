use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::Config,
    error::{Result, SpotifyError},
    spotify,
    types::Token,
};

/// Seconds before expiry at which a token is refreshed proactively.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
    client_id: String,
    token_url: String,
    http: Client,
}

impl TokenManager {
    pub fn new(token: Token, config: &Config) -> Self {
        TokenManager {
            token,
            path: config.token_path(),
            client_id: config.client_id.clone(),
            token_url: config.token_url.clone(),
            http: Client::new(),
        }
    }

    pub async fn load(config: &Config) -> Result<Self> {
        let path = config.token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            SpotifyError::Auth(format!(
                "no cached token at {} ({}). Please run spotmcp auth",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self::new(token, config))
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least a few more minutes,
    /// refreshing and persisting it first when necessary.
    pub async fn get_valid_token(&mut self) -> Result<String> {
        if self.is_expired() {
            let refreshed = spotify::auth::refresh_token(
                &self.http,
                &self.token_url,
                &self.client_id,
                &self.token.refresh_token,
            )
            .await?;
            self.token = merge_refreshed(&self.token, refreshed);
            if let Err(e) = self.persist().await {
                tracing::warn!(error = %e, "failed to persist refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

// Spotify may omit the refresh token and scope on refresh; keep the old ones then.
fn merge_refreshed(old: &Token, new: Token) -> Token {
    Token {
        refresh_token: if new.refresh_token.is_empty() {
            old.refresh_token.clone()
        } else {
            new.refresh_token
        },
        scope: if new.scope.is_empty() {
            old.scope.clone()
        } else {
            new.scope
        },
        ..new
    }
}
