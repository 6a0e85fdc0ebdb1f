//! HTTP bridge exposing the tool operations as plain JSON endpoints.
//!
//! Same dispatch layer as the MCP server, reachable for non-agent callers
//! (shortcuts, home automation, curl). Optionally protected by a static API
//! key compared by exact match, supplied either as a bearer token or an
//! `apiKey` query parameter.

mod handlers;

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    Res,
    error::Error,
    management::{SleepTimerManager, TokenManager},
    spotify::client::SpotifyClient,
};

#[derive(Clone)]
pub struct BridgeState {
    pub auth: Arc<TokenManager>,
    pub client: Arc<SpotifyClient>,
    pub timers: Arc<SleepTimerManager>,
    pub api_key: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidDuration(_) | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Rejects requests whose key does not match the configured one. A bridge
/// without a configured key accepts everything.
async fn require_api_key(
    State(state): State<BridgeState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_start_matches("Bearer ").to_string())
            .or_else(|| query.get("apiKey").cloned());

        if provided.as_deref() != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized: Invalid API key" })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

pub fn router(state: BridgeState) -> Router {
    Router::new()
        .route("/play/playlist", post(handlers::play_playlist))
        .route("/play/album", post(handlers::play_album))
        .route("/play/track", post(handlers::play_track))
        .route("/search", get(handlers::search))
        .route("/control", post(handlers::control))
        .route("/now-playing", get(handlers::now_playing))
        .route("/timer/set", post(handlers::timer_set))
        .route("/timer/cancel", post(handlers::timer_cancel))
        .route("/timer/list", get(handlers::timer_list))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .with_state(state)
}

/// Binds the bridge and serves it until the process exits.
pub async fn serve(state: BridgeState, port: u16) -> Res<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
