use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::{
    Res, config,
    error::Error,
    management::TokenManager,
    types::{
        AlbumInfo, ArtistInfo, CurrentlyPlayingResponse, DeviceInfo, DevicesResponse, NowPlaying,
        PlaylistInfo, PlaylistsResponse, SearchResponse, SearchResults, TrackInfo, TrackObject,
    },
};

/// Spotify Web API client.
///
/// Every call obtains a valid bearer token from the token manager first, so
/// expiry handling stays invisible to callers. Requests without an explicit
/// device id fall back to the configured default device, when one is set.
pub struct SpotifyClient {
    http: Client,
    auth: Arc<TokenManager>,
    api_url: String,
    default_device_id: Option<String>,
}

impl SpotifyClient {
    pub fn new(auth: Arc<TokenManager>) -> Self {
        SpotifyClient {
            http: Client::new(),
            auth,
            api_url: config::api_url(),
            default_device_id: config::default_device_id(),
        }
    }

    pub async fn current_user_playlists(&self) -> Res<Vec<PlaylistInfo>> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/me/playlists", self.api_url);

        let res = self.http.get(&url).bearer_auth(&token).send().await?;
        let res = check_status(res).await?;

        let page = res.json::<PlaylistsResponse>().await?;
        Ok(page
            .items
            .into_iter()
            .map(|p| PlaylistInfo {
                id: p.id,
                name: p.name,
                uri: p.uri,
            })
            .collect())
    }

    /// Case-insensitive lookup among the user's playlists. Matches when
    /// either name contains the other, so "chill" finds "Chill Vibes" and
    /// "my chill vibes playlist" finds "Chill Vibes" too.
    pub async fn find_playlist_by_name(&self, name: &str) -> Res<Option<PlaylistInfo>> {
        let playlists = self.current_user_playlists().await?;
        let needle = name.to_lowercase().trim().to_string();

        Ok(playlists.into_iter().find(|p| {
            let candidate = p.name.to_lowercase();
            candidate.contains(&needle) || needle.contains(&candidate)
        }))
    }

    pub async fn search_tracks(&self, query: &str, limit: u32) -> Res<Vec<TrackInfo>> {
        let res = self.search_typed(query, "track", limit).await?;
        Ok(res
            .tracks
            .map(|page| page.items.into_iter().map(track_info).collect())
            .unwrap_or_default())
    }

    pub async fn search_albums(&self, query: &str, limit: u32) -> Res<Vec<AlbumInfo>> {
        let res = self.search_typed(query, "album", limit).await?;
        Ok(res
            .albums
            .map(|page| {
                page.items
                    .into_iter()
                    .map(|a| AlbumInfo {
                        id: a.id,
                        name: a.name,
                        artist: primary_artist(&a.artists),
                        uri: a.uri,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn search_artists(&self, query: &str, limit: u32) -> Res<Vec<ArtistInfo>> {
        let res = self.search_typed(query, "artist", limit).await?;
        Ok(res
            .artists
            .map(|page| {
                page.items
                    .into_iter()
                    .map(|a| ArtistInfo {
                        id: a.id,
                        name: a.name,
                        uri: a.uri,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Searches tracks, albums, and artists concurrently.
    pub async fn search(&self, query: &str, limit: u32) -> Res<SearchResults> {
        let (tracks, albums, artists) = tokio::try_join!(
            self.search_tracks(query, limit),
            self.search_albums(query, limit),
            self.search_artists(query, limit),
        )?;

        Ok(SearchResults {
            tracks,
            albums,
            artists,
        })
    }

    async fn search_typed(&self, query: &str, kind: &str, limit: u32) -> Res<SearchResponse> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/search", self.api_url);
        let limit = limit.to_string();

        let res = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("q", query), ("type", kind), ("limit", limit.as_str())])
            .send()
            .await?;
        let res = check_status(res).await?;

        Ok(res.json::<SearchResponse>().await?)
    }

    /// Starts playback of a playlist or album by context URI.
    pub async fn play_context(&self, context_uri: &str, device_id: Option<&str>) -> Res<()> {
        self.play_body(json!({ "context_uri": context_uri }), device_id)
            .await
    }

    /// Starts playback of an explicit list of track URIs.
    pub async fn play_uris(&self, uris: &[String], device_id: Option<&str>) -> Res<()> {
        self.play_body(json!({ "uris": uris }), device_id).await
    }

    /// Resumes playback where it left off.
    pub async fn resume(&self, device_id: Option<&str>) -> Res<()> {
        self.play_body(json!({}), device_id).await
    }

    async fn play_body(&self, body: serde_json::Value, device_id: Option<&str>) -> Res<()> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/me/player/play", self.api_url);

        let mut req = self.http.put(&url).bearer_auth(&token).json(&body);
        if let Some(device) = self.device_or_default(device_id) {
            req = req.query(&[("device_id", device)]);
        }

        check_status(req.send().await?).await?;
        Ok(())
    }

    pub async fn pause(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(reqwest::Method::PUT, "me/player/pause", device_id)
            .await
    }

    pub async fn skip_next(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(reqwest::Method::POST, "me/player/next", device_id)
            .await
    }

    pub async fn skip_previous(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(reqwest::Method::POST, "me/player/previous", device_id)
            .await
    }

    pub async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> Res<()> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/me/player/volume", self.api_url);

        let mut req = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .query(&[("volume_percent", volume_percent.to_string())]);
        if let Some(device) = self.device_or_default(device_id) {
            req = req.query(&[("device_id", device)]);
        }

        check_status(req.send().await?).await?;
        Ok(())
    }

    /// The currently playing track, or `None` when nothing is playing
    /// (the API signals that with an empty 204 response).
    pub async fn currently_playing(&self) -> Res<Option<NowPlaying>> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/me/player/currently-playing", self.api_url);

        let res = self.http.get(&url).bearer_auth(&token).send().await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let res = check_status(res).await?;

        let playing = res.json::<CurrentlyPlayingResponse>().await?;
        let Some(item) = playing.item else {
            return Ok(None);
        };

        Ok(Some(NowPlaying {
            artist: primary_artist(&item.artists),
            album: item
                .album
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            name: item.name,
            uri: item.uri,
            is_playing: playing.is_playing,
            progress_ms: playing.progress_ms.unwrap_or(0),
        }))
    }

    pub async fn devices(&self) -> Res<Vec<DeviceInfo>> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/me/player/devices", self.api_url);

        let res = self.http.get(&url).bearer_auth(&token).send().await?;
        let res = check_status(res).await?;

        let devices = res.json::<DevicesResponse>().await?;
        Ok(devices
            .devices
            .into_iter()
            .map(|d| DeviceInfo {
                id: d.id,
                name: d.name,
                kind: d.kind,
                is_active: d.is_active,
                volume_percent: d.volume_percent.unwrap_or(0),
            })
            .collect())
    }

    async fn player_command(
        &self,
        method: reqwest::Method,
        path: &str,
        device_id: Option<&str>,
    ) -> Res<()> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}/{}", self.api_url, path);

        let mut req = self.http.request(method, &url).bearer_auth(&token);
        if let Some(device) = self.device_or_default(device_id) {
            req = req.query(&[("device_id", device)]);
        }

        check_status(req.send().await?).await?;
        Ok(())
    }

    fn device_or_default(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.default_device_id.clone())
    }
}

/// Maps non-success responses onto [`Error::Upstream`], keeping whatever
/// detail the body carried.
async fn check_status(res: reqwest::Response) -> Res<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        let body = res.text().await.unwrap_or_default();
        Err(Error::upstream(status, body))
    }
}

fn primary_artist(artists: &[crate::types::SimpleArtist]) -> String {
    artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn track_info(track: TrackObject) -> TrackInfo {
    TrackInfo {
        artist: primary_artist(&track.artists),
        album: track.album.map(|a| a.name),
        id: track.id,
        name: track.name,
        uri: track.uri,
    }
}
