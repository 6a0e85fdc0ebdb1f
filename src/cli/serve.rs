use std::sync::Arc;

use crate::{
    error, info,
    management::{CredentialStore, SleepTimerManager, TokenManager},
    mcp,
    spotify::client::SpotifyClient,
};

/// Runs the MCP tool server on stdio until the client disconnects.
///
/// The token record loads lazily on the first tool call, so starting the
/// server does not require being authenticated yet.
pub async fn serve() {
    let manager = Arc::new(TokenManager::from_env(CredentialStore::default_path()));
    let client = Arc::new(SpotifyClient::new(Arc::clone(&manager)));
    let timers = Arc::new(SleepTimerManager::new());

    info!("Spotify MCP server running on stdio");

    if let Err(e) = mcp::serve_stdio(manager, client, timers).await {
        error!("MCP server terminated: {}", e);
    }
}
