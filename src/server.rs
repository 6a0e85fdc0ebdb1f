use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{api, config, management::TokenManager, types::PendingAuthorization};

/// Serves the OAuth callback endpoint on the authority of the configured
/// redirect URI until the process exits.
pub async fn start_callback_server(
    pending: Arc<Mutex<PendingAuthorization>>,
    manager: Arc<TokenManager>,
) {
    let app = Router::new().route("/health", get(api::health)).route(
        "/callback",
        get(api::callback)
            .layer(Extension(pending))
            .layer(Extension(manager)),
    );

    let addr = config::callback_bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
