use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::Config, types::PkceToken};

/// State shared between the login flow and the `/callback` handler.
pub struct CallbackState {
    pub config: Config,
    pub pkce: Mutex<Option<PkceToken>>,
}

pub fn router(state: Arc<CallbackState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

pub async fn start_api_server(listener: TcpListener, state: Arc<CallbackState>) {
    if let Err(e) = axum::serve(listener, router(state)).await {
        tracing::error!(error = %e, "OAuth callback server stopped");
    }
}
