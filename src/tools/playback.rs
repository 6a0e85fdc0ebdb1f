use serde_json::{Value, json};

use crate::{Res, error::Error, spotify::client::SpotifyClient};

/// Single playback control entry point: play, pause, skip-next,
/// skip-previous, volume. `value` is only meaningful for `volume` and must
/// be within 0-100; validation happens before any request is made.
pub async fn control_playback(
    client: &SpotifyClient,
    action: &str,
    value: Option<i64>,
    device_id: Option<&str>,
) -> Res<Value> {
    match action {
        "play" => {
            client.resume(device_id).await?;
            Ok(json!({ "success": true, "message": "Playback resumed" }))
        }
        "pause" => {
            client.pause(device_id).await?;
            Ok(json!({ "success": true, "message": "Playback paused" }))
        }
        "skip-next" => {
            client.skip_next(device_id).await?;
            Ok(json!({ "success": true, "message": "Skipped to next track" }))
        }
        "skip-previous" => {
            client.skip_previous(device_id).await?;
            Ok(json!({ "success": true, "message": "Skipped to previous track" }))
        }
        "volume" => {
            let volume = match value {
                Some(v) if (0..=100).contains(&v) => v as u8,
                _ => {
                    return Err(Error::InvalidArgument(
                        "Volume must be between 0 and 100".to_string(),
                    ));
                }
            };
            client.set_volume(volume, device_id).await?;
            Ok(json!({
                "success": true,
                "message": format!("Volume set to {}%", volume),
            }))
        }
        other => Err(Error::InvalidArgument(format!("Unknown action: {}", other))),
    }
}

/// Information about the currently playing track, if any.
pub async fn get_current_playing(client: &SpotifyClient) -> Res<Value> {
    match client.currently_playing().await? {
        None => Ok(json!({
            "success": true,
            "playing": false,
            "message": "No track currently playing",
        })),
        Some(track) => Ok(json!({
            "success": true,
            "playing": track.is_playing,
            "track": {
                "name": track.name,
                "artist": track.artist,
                "album": track.album,
                "uri": track.uri,
                "progressMs": track.progress_ms,
            },
        })),
    }
}
