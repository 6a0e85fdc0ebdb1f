use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Persisted access/refresh token pair.
///
/// Mirrored 1:1 between the in-memory token manager and the credential store
/// on disk. `expires_at` is an absolute unix timestamp in milliseconds,
/// derived from `expires_in` at the moment the grant was issued; it is never
/// edited by hand. Field names serialize in camelCase so the stored
/// `token.json` stays compatible with other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// One armed sleep timer as reported by the registry.
///
/// The delayed task itself is owned by the registry and never leaves it;
/// this record is the externally visible part.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepTimer {
    pub id: String,
    pub duration_minutes: f64,
    /// Unix timestamp in milliseconds at creation time.
    pub scheduled_at: i64,
}

impl SleepTimer {
    /// RFC 3339 rendering of `scheduled_at` for human-facing output.
    pub fn scheduled_at_rfc3339(&self) -> String {
        Utc.timestamp_millis_opt(self.scheduled_at)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    }
}

/// Shared state between the authorization flow and the callback handler.
///
/// The flow stores the `state` nonce before opening the browser; the callback
/// handler verifies it, performs the code exchange, and deposits the token
/// record for the waiting flow to pick up.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state_nonce: String,
    pub record: Option<TokenRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistInfo {
    pub id: String,
    pub name: String,
    pub uri: String,
}

/// Combined result of the three search requests.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub tracks: Vec<TrackInfo>,
    pub albums: Vec<AlbumInfo>,
    pub artists: Vec<ArtistInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub uri: String,
    pub is_playing: bool,
    pub progress_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Restricted devices may not expose an id.
    pub id: Option<String>,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
    pub volume_percent: u8,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    pub kind: String,
    pub active: String,
    pub volume: String,
    pub id: String,
}

// Wire types for Spotify Web API responses. Deserialization only; the client
// maps them onto the info types above before anything leaves the module.

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsResponse {
    pub items: Vec<PlaylistObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<TrackObject>>,
    pub albums: Option<Paging<AlbumObject>>,
    pub artists: Option<Paging<ArtistObject>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SimpleArtist>,
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumObject {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub item: Option<TrackObject>,
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<DeviceObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceObject {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub volume_percent: Option<u8>,
}

/// Token endpoint response for both the authorization-code and the
/// refresh-token grant. The refresh grant usually omits `refresh_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrantResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}
