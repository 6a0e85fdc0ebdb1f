//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API and the accounts service. It handles the
//! OAuth grants and every catalog/playback operation the bridge exposes,
//! keeping all HTTP details behind a small typed surface.
//!
//! ## Core Modules
//!
//! [`auth`] - OAuth 2.0 authorization-code flow pieces: the authorization
//! URL, the `state` nonce, and the two token-endpoint grants (code exchange
//! and refresh). The token lifecycle itself - deciding *when* to refresh and
//! persisting the result - lives in [`crate::management`]; this module only
//! speaks the wire protocol.
//!
//! [`client`] - [`client::SpotifyClient`], the Web API client used by every
//! front end: playlist lookup, free-text search across tracks/albums/artists,
//! playback control (play, pause, skip, volume), the currently-playing track,
//! and device enumeration. Each call fetches a valid bearer token from the
//! token manager first, so callers never see token expiry.
//!
//! ## Error Handling
//!
//! Grant failures map to [`crate::Error::AuthExchange`] and
//! [`crate::Error::Refresh`]; they are surfaced verbatim and never retried
//! here. Non-success Web API responses map to [`crate::Error::Upstream`]
//! with the response detail attached. There is no retry or backoff layer.
//!
//! ## API Coverage
//!
//! - `GET /me/playlists` - current user's playlists
//! - `GET /search` - track/album/artist search with a result limit
//! - `PUT /me/player/play` - start or resume playback
//! - `PUT /me/player/pause` - pause playback
//! - `POST /me/player/next`, `POST /me/player/previous` - skip
//! - `PUT /me/player/volume` - set volume
//! - `GET /me/player/currently-playing` - now playing
//! - `GET /me/player/devices` - available devices
//! - `POST /api/token` - code and refresh grants

pub mod auth;
pub mod client;
