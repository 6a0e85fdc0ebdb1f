use serde_json::{Value, json};

use crate::{Res, error::Error, spotify::client::SpotifyClient};

/// Finds a playlist by name and starts playing it.
pub async fn play_playlist(
    client: &SpotifyClient,
    playlist_name: &str,
    device_id: Option<&str>,
) -> Res<Value> {
    let playlist = client
        .find_playlist_by_name(playlist_name)
        .await?
        .ok_or_else(|| Error::not_found("playlist", playlist_name))?;

    client.play_context(&playlist.uri, device_id).await?;

    Ok(json!({
        "success": true,
        "message": format!("Playing playlist: {}", playlist.name),
        "playlist": {
            "id": playlist.id,
            "name": playlist.name,
        },
    }))
}

/// Searches for an album (optionally qualified by artist) and plays the
/// first hit.
pub async fn play_album(
    client: &SpotifyClient,
    album_name: &str,
    artist_name: Option<&str>,
    device_id: Option<&str>,
) -> Res<Value> {
    let query = match artist_name {
        Some(artist) => format!("{} artist:{}", album_name, artist),
        None => album_name.to_string(),
    };

    let results = client.search_albums(&query, 1).await?;
    let album = results
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("album", album_name))?;

    client.play_context(&album.uri, device_id).await?;

    Ok(json!({
        "success": true,
        "message": format!("Playing album: {} by {}", album.name, album.artist),
        "album": {
            "id": album.id,
            "name": album.name,
            "artist": album.artist,
        },
    }))
}

/// Searches for a track (optionally qualified by artist) and plays the
/// first hit.
pub async fn play_track(
    client: &SpotifyClient,
    track_name: &str,
    artist_name: Option<&str>,
    device_id: Option<&str>,
) -> Res<Value> {
    let query = match artist_name {
        Some(artist) => format!("track:{} artist:{}", track_name, artist),
        None => track_name.to_string(),
    };

    let results = client.search_tracks(&query, 1).await?;
    let track = results
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("track", track_name))?;

    client.play_uris(&[track.uri.clone()], device_id).await?;

    Ok(json!({
        "success": true,
        "message": format!("Playing track: {} by {}", track.name, track.artist),
        "track": {
            "id": track.id,
            "name": track.name,
            "artist": track.artist,
        },
    }))
}
