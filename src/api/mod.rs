//! # API Module
//!
//! HTTP endpoints for the local OAuth callback server that runs during the
//! `spotibridge auth` flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization
//!   server, verifies the `state` nonce, exchanges the authorization code
//!   for a token pair through the token manager, and hands the resulting
//!   record to the waiting auth flow.
//! - [`health`] - Minimal health check returning status and version.
//!
//! The server only lives for the duration of one authorization flow; it is
//! started by [`crate::server::start_callback_server`] and the process exits
//! once the flow completes or times out.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
