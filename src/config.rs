//! Configuration management for the Spotify agent bridge.
//!
//! All configuration is environment-sourced. Values are read lazily at the
//! call site; a `.env` file in the application's local data directory (and,
//! as a fallback, in the working directory) is loaded once at startup via
//! [`load_env`]. Required credentials panic with a descriptive message when
//! missing; everything else carries a default so the binary runs with just
//! the client id and secret set.

use std::{env, path::PathBuf};

use crate::Res;

/// Loads environment variables from a `.env` file.
///
/// Looks for `<data dir>/spotibridge/.env` first (creating the directory if
/// needed so users have a place to put it), then falls back to a `.env` in
/// the current working directory. A missing file is not an error; missing
/// required variables surface later when their accessor runs.
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotibridge/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        let _ = dotenv::from_path(&path);
    }
    let _ = dotenv::dotenv();
    Ok(())
}

/// Returns the Spotify application client id.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify application client secret.
///
/// Required by the authorization-code and refresh-token grants. Keep it out
/// of logs and version control.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
pub fn client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI registered for the application.
///
/// Must match the redirect URI configured in the Spotify developer dashboard.
/// The callback server binds to the authority part of this URI.
pub fn redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/callback".to_string())
}

/// Bind address for the local OAuth callback server, derived from the
/// redirect URI. A URI without an explicit port defaults to 3000.
pub fn callback_bind_addr() -> String {
    let uri = redirect_uri();
    let authority = uri
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("127.0.0.1:3000")
        .to_string();

    if authority.contains(':') {
        authority
    } else {
        format!("{}:3000", authority)
    }
}

/// Device to target when a request does not name one. Optional.
pub fn default_device_id() -> Option<String> {
    env::var("SPOTIFY_DEFAULT_DEVICE_ID")
        .ok()
        .filter(|v| !v.is_empty())
}

/// Port for the HTTP bridge. Defaults to 3001.
pub fn bridge_port() -> u16 {
    env::var("HTTP_BRIDGE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

/// Static API key protecting the HTTP bridge. When unset or empty, the
/// bridge accepts unauthenticated requests.
pub fn bridge_api_key() -> Option<String> {
    env::var("HTTP_BRIDGE_API_KEY")
        .ok()
        .filter(|v| !v.is_empty())
}

/// OAuth scopes requested during authorization.
pub fn scope() -> String {
    env::var("SPOTIFY_SCOPE").unwrap_or_else(|_| {
        [
            "user-read-playback-state",
            "user-modify-playback-state",
            "user-read-currently-playing",
            "playlist-read-private",
            "user-library-read",
        ]
        .join(" ")
    })
}

/// Base URL of the Spotify Web API. Overridable for testing.
pub fn api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Authorization endpoint of the accounts service.
pub fn auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Token exchange endpoint of the accounts service. Overridable for testing.
pub fn token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}
