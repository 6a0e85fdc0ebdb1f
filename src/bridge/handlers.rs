use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::BridgeState;
use crate::{error::Error, tools};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayPlaylistBody {
    playlist_name: String,
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayAlbumBody {
    album_name: String,
    artist_name: Option<String>,
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTrackBody {
    track_name: String,
    artist_name: Option<String>,
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBody {
    action: String,
    value: Option<i64>,
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSetBody {
    duration_minutes: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerCancelBody {
    timer_id: Option<String>,
}

pub async fn play_playlist(
    State(state): State<BridgeState>,
    Json(body): Json<PlayPlaylistBody>,
) -> Result<Json<Value>, Error> {
    let result = tools::play::play_playlist(
        &state.client,
        &body.playlist_name,
        body.device_id.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

pub async fn play_album(
    State(state): State<BridgeState>,
    Json(body): Json<PlayAlbumBody>,
) -> Result<Json<Value>, Error> {
    let result = tools::play::play_album(
        &state.client,
        &body.album_name,
        body.artist_name.as_deref(),
        body.device_id.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

pub async fn play_track(
    State(state): State<BridgeState>,
    Json(body): Json<PlayTrackBody>,
) -> Result<Json<Value>, Error> {
    let result = tools::play::play_track(
        &state.client,
        &body.track_name,
        body.artist_name.as_deref(),
        body.device_id.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

pub async fn search(
    State(state): State<BridgeState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, Error> {
    let result = tools::search::search_music(&state.client, &query.q, query.limit).await?;
    Ok(Json(result))
}

pub async fn control(
    State(state): State<BridgeState>,
    Json(body): Json<ControlBody>,
) -> Result<Json<Value>, Error> {
    let result = tools::playback::control_playback(
        &state.client,
        &body.action,
        body.value,
        body.device_id.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

pub async fn now_playing(State(state): State<BridgeState>) -> Result<Json<Value>, Error> {
    let result = tools::playback::get_current_playing(&state.client).await?;
    Ok(Json(result))
}

pub async fn timer_set(
    State(state): State<BridgeState>,
    Json(body): Json<TimerSetBody>,
) -> Result<Json<Value>, Error> {
    let result =
        tools::timer::set_sleep_timer(&state.timers, &state.client, body.duration_minutes).await?;
    Ok(Json(result))
}

pub async fn timer_cancel(
    State(state): State<BridgeState>,
    body: Option<Json<TimerCancelBody>>,
) -> Result<Json<Value>, Error> {
    let timer_id = body.and_then(|Json(b)| b.timer_id);
    let result = tools::timer::cancel_sleep_timer(&state.timers, timer_id.as_deref()).await?;
    Ok(Json(result))
}

pub async fn timer_list(State(state): State<BridgeState>) -> Result<Json<Value>, Error> {
    let result = tools::timer::get_active_timers(&state.timers).await?;
    Ok(Json(result))
}

pub async fn health(State(state): State<BridgeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "authenticated": state.auth.is_authenticated().await,
    }))
}
