use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::{
    error, info,
    management::{CredentialStore, TokenManager},
    server, spotify, success,
    types::{PendingAuthorization, TokenRecord},
    warning,
};

/// Runs the complete OAuth authorization-code flow.
///
/// 1. Short-circuits when a stored token record is still usable.
/// 2. Starts the local callback server on the redirect URI's authority.
/// 3. Opens the authorization URL in the browser (manual fallback).
/// 4. Waits for the callback handler to deposit the exchanged token.
///
/// The token record is persisted by the manager as part of the exchange, so
/// a successful flow leaves nothing else to do.
pub async fn auth() {
    let manager = Arc::new(TokenManager::from_env(CredentialStore::default_path()));

    if let Ok(Some(_)) = manager.load_persisted().await {
        success!("Already authenticated! Tokens are valid.");
        return;
    }

    let state_nonce = spotify::auth::generate_state_nonce();
    let pending = Arc::new(Mutex::new(PendingAuthorization {
        state_nonce: state_nonce.clone(),
        record: None,
    }));

    let server_pending = Arc::clone(&pending);
    let server_manager = Arc::clone(&manager);
    tokio::spawn(async move {
        server::start_callback_server(server_pending, server_manager).await;
    });

    let auth_url = spotify::auth::authorize_url(&state_nonce);
    info!("Please authorize this application:\n{}", auth_url);

    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    match wait_for_record(pending).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the shared state until the callback handler deposits a token
/// record, showing a spinner meanwhile. Gives up after two minutes.
async fn wait_for_record(
    pending: Arc<Mutex<PendingAuthorization>>,
) -> Option<TokenRecord> {
    use std::time::Instant;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization callback...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = pending.lock().await;
        if let Some(record) = &lock.record {
            let record = record.clone();
            drop(lock);
            pb.finish_and_clear();
            return Some(record);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    pb.finish_and_clear();
    None
}
