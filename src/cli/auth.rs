use crate::{config::Config, error, info, management::TokenManager, spotify, success};

pub async fn auth(config: &Config) {
    info!("Opening Spotify login in your browser...");

    let token = match spotify::auth::authorize(config).await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };

    let manager = TokenManager::new(token, config);
    if let Err(e) = manager.persist().await {
        error!("Cannot store token. Err: {}", e);
    }

    success!(
        "Authentication successful, token stored at {}",
        config.token_path().display()
    );
}
