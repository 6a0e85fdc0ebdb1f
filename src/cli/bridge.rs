use std::sync::Arc;

use crate::{
    bridge::{self, BridgeState},
    config, error, info,
    management::{CredentialStore, SleepTimerManager, TokenManager},
    spotify::client::SpotifyClient,
    warning,
};

/// Runs the HTTP bridge. `port` overrides the configured port when given.
pub async fn bridge(port: Option<u16>) {
    let manager = Arc::new(TokenManager::from_env(CredentialStore::default_path()));
    match manager.load_persisted().await {
        Ok(Some(_)) => {}
        _ => warning!(
            "No stored credentials found. Run `spotibridge auth` before issuing playback calls."
        ),
    }

    let client = Arc::new(SpotifyClient::new(Arc::clone(&manager)));
    let timers = Arc::new(SleepTimerManager::new());
    let api_key = config::bridge_api_key();
    let port = port.unwrap_or_else(config::bridge_port);

    info!("HTTP bridge server running on port {}", port);
    info!(
        "API key authentication: {}",
        if api_key.is_some() { "enabled" } else { "disabled" }
    );

    let state = BridgeState {
        auth: manager,
        client,
        timers,
        api_key,
    };

    if let Err(e) = bridge::serve(state, port).await {
        error!("Failed to start server: {}", e);
    }
}
