//! # CLI Module
//!
//! Command implementations behind the clap subcommands. Each function is the
//! body of one subcommand and is responsible for user interaction: progress
//! feedback, success confirmation, and translating failures into messages
//! and exit codes. The actual work happens in [`crate::management`],
//! [`crate::spotify`], [`crate::mcp`], and [`crate::bridge`].
//!
//! ## Commands
//!
//! - [`auth`] - Interactive OAuth authorization-code flow. Starts the local
//!   callback server, opens the browser, waits for the callback, persists
//!   the token record.
//! - [`serve`] - Runs the MCP tool server on stdio until the client
//!   disconnects.
//! - [`bridge`] - Runs the HTTP bridge.
//! - [`devices`] - Prints the available playback devices as a table, handy
//!   for picking a `SPOTIFY_DEFAULT_DEVICE_ID`.

mod auth;
mod bridge;
mod devices;
mod serve;

pub use auth::auth;
pub use bridge::bridge;
pub use devices::devices;
pub use serve::serve;
