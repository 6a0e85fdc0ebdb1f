//! MCP server exposing the playback, search, and sleep-timer tools.
//!
//! Runs over stdio; one tool per operation of the dispatch layer. Every call
//! first makes sure a token record is loaded (loading the persisted one on
//! demand), mirroring how an agent session usually starts long after the
//! user authorized.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
    transport::stdio,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Res,
    management::{SleepTimerManager, TokenManager},
    spotify::client::SpotifyClient,
    tools,
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayPlaylistParams {
    /// Name of the playlist to play
    pub playlist_name: String,
    /// Optional device ID to play on
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayAlbumParams {
    /// Name of the album to play
    pub album_name: String,
    /// Optional artist name to help find the album
    pub artist_name: Option<String>,
    /// Optional device ID to play on
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayTrackParams {
    /// Name of the track to play
    pub track_name: String,
    /// Optional artist name to help find the track
    pub artist_name: Option<String>,
    /// Optional device ID to play on
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchMusicParams {
    /// Search query
    pub query: String,
    /// Maximum number of results per type (default: 10)
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaybackParams {
    /// Action to perform: play, pause, skip-next, skip-previous, or volume
    pub action: String,
    /// Volume percentage (0-100) for the volume action
    pub value: Option<i64>,
    /// Optional device ID
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSleepTimerParams {
    /// Duration in minutes before pausing playback
    pub duration_minutes: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelSleepTimerParams {
    /// Timer ID to cancel a specific timer; omit to cancel all timers
    pub timer_id: Option<String>,
}

#[derive(Clone)]
pub struct SpotifyMcpServer {
    auth: Arc<TokenManager>,
    client: Arc<SpotifyClient>,
    timers: Arc<SleepTimerManager>,
    tool_router: ToolRouter<Self>,
}

impl SpotifyMcpServer {
    pub fn new(
        auth: Arc<TokenManager>,
        client: Arc<SpotifyClient>,
        timers: Arc<SleepTimerManager>,
    ) -> Self {
        Self {
            auth,
            client,
            timers,
            tool_router: Self::tool_router(),
        }
    }

    /// Loads the persisted token record on first use. Returns the error
    /// result the tool should answer with while unauthenticated.
    async fn ensure_authorized(&self) -> Option<CallToolResult> {
        if !self.auth.is_authenticated().await {
            let _ = self.auth.load_persisted().await;
        }

        if self.auth.is_authenticated().await {
            return None;
        }

        Some(CallToolResult::error(vec![Content::text(
            "Not authenticated with Spotify. Run `spotibridge auth` in a terminal to \
             authorize, then call this tool again.",
        )]))
    }
}

/// Renders a dispatch-layer outcome as a tool result; failures become
/// `isError` results with the error text, matching how agents expect tool
/// failures to surface.
fn tool_result(outcome: Res<Value>) -> CallToolResult {
    match outcome {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => CallToolResult::error(vec![Content::text(format!("Error: {}", e))]),
    }
}

#[tool_router]
impl SpotifyMcpServer {
    #[tool(description = "Play a Spotify playlist by name")]
    async fn play_playlist(
        &self,
        Parameters(params): Parameters<PlayPlaylistParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::play::play_playlist(
                &self.client,
                &params.playlist_name,
                params.device_id.as_deref(),
            )
            .await,
        ))
    }

    #[tool(description = "Play a Spotify album by name and optional artist")]
    async fn play_album(
        &self,
        Parameters(params): Parameters<PlayAlbumParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::play::play_album(
                &self.client,
                &params.album_name,
                params.artist_name.as_deref(),
                params.device_id.as_deref(),
            )
            .await,
        ))
    }

    #[tool(description = "Play a specific track by name and optional artist")]
    async fn play_track(
        &self,
        Parameters(params): Parameters<PlayTrackParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::play::play_track(
                &self.client,
                &params.track_name,
                params.artist_name.as_deref(),
                params.device_id.as_deref(),
            )
            .await,
        ))
    }

    #[tool(description = "Search for music (tracks, albums, artists) on Spotify")]
    async fn search_music(
        &self,
        Parameters(params): Parameters<SearchMusicParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::search::search_music(&self.client, &params.query, params.limit).await,
        ))
    }

    #[tool(description = "Control Spotify playback (play, pause, skip, volume)")]
    async fn control_playback(
        &self,
        Parameters(params): Parameters<ControlPlaybackParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::playback::control_playback(
                &self.client,
                &params.action,
                params.value,
                params.device_id.as_deref(),
            )
            .await,
        ))
    }

    #[tool(description = "Get information about the currently playing track")]
    async fn get_current_playing(&self) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::playback::get_current_playing(&self.client).await,
        ))
    }

    #[tool(
        description = "Set a sleep timer to automatically pause playback after specified minutes"
    )]
    async fn set_sleep_timer(
        &self,
        Parameters(params): Parameters<SetSleepTimerParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::timer::set_sleep_timer(&self.timers, &self.client, params.duration_minutes)
                .await,
        ))
    }

    #[tool(description = "Cancel an active sleep timer")]
    async fn cancel_sleep_timer(
        &self,
        Parameters(params): Parameters<CancelSleepTimerParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(
            tools::timer::cancel_sleep_timer(&self.timers, params.timer_id.as_deref()).await,
        ))
    }

    #[tool(description = "Get list of active sleep timers")]
    async fn get_active_timers(&self) -> Result<CallToolResult, McpError> {
        if let Some(unauthorized) = self.ensure_authorized().await {
            return Ok(unauthorized);
        }
        Ok(tool_result(tools::timer::get_active_timers(&self.timers).await))
    }
}

#[tool_handler]
impl ServerHandler for SpotifyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Control Spotify playback: play playlists, albums, and tracks by name, \
                 search the catalog, adjust playback, and manage sleep timers that pause \
                 playback after a delay."
                    .to_string(),
            ),
        }
    }
}

/// Serves the tool server over stdio until the client disconnects.
pub async fn serve_stdio(
    auth: Arc<TokenManager>,
    client: Arc<SpotifyClient>,
    timers: Arc<SleepTimerManager>,
) -> Res<()> {
    let server = SpotifyMcpServer::new(auth, client, timers);
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(())
}
