use rmcp::{ServiceExt, transport::stdio};

use crate::{
    cli::connect,
    config::Config,
    error,
    mcp::SpotifyMcp,
    resolve::ResolverSettings,
};

/// Runs the MCP server on stdin/stdout until the client disconnects.
pub async fn serve(config: &Config) {
    let client = connect(config).await;
    let server = SpotifyMcp::from_catalog(client, ResolverSettings::from(config));

    tracing::info!(
        threshold = config.match_threshold,
        max_pages = config.max_pages,
        "starting MCP server on stdio"
    );

    let service = match server.serve(stdio()).await {
        Ok(service) => service,
        Err(e) => error!("Cannot start MCP server. Err: {}", e),
    };

    if let Err(e) = service.waiting().await {
        error!("MCP server stopped. Err: {}", e);
    }
    tracing::info!("MCP client disconnected");
}
