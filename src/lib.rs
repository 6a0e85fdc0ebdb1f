//! Spotify Agent Bridge Library
//!
//! This library exposes Spotify search, playback control, and playlist lookup
//! to AI agents over the Model Context Protocol and to plain HTTP callers
//! over a small REST-ish bridge. It owns the OAuth token lifecycle (acquire,
//! persist, refresh-on-expiry) and an in-process sleep-timer registry that
//! pauses playback after a delay.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `bridge` - HTTP bridge exposing the tool operations as JSON endpoints
//! - `cli` - Command implementations behind the clap subcommands
//! - `config` - Environment-sourced configuration
//! - `error` - Error taxonomy shared by all components
//! - `management` - Token lifecycle manager and sleep-timer registry
//! - `mcp` - MCP tool server over stdio
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `tools` - Dispatch layer shared by the MCP server and the HTTP bridge
//! - `types` - Data structures and type definitions

pub mod api;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod mcp;
pub mod server;
pub mod spotify;
pub mod tools;
pub mod types;

pub use error::Error;

/// Result type used throughout the crate.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// All of the status macros write to stderr: stdout belongs to the MCP
/// transport when the tool server is running, and keeping diagnostics on
/// stderr everywhere means the macros are safe to use from any code path.
///
/// # Example
///
/// ```
/// info!("HTTP bridge listening on port {}", port);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with exit code 1.
///
/// Only for unrecoverable CLI-level failures; library code propagates
/// [`crate::Error`] instead.
///
/// # Example
///
/// ```
/// error!("Missing SPOTIFY_CLIENT_ID or SPOTIFY_CLIENT_SECRET");
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark. Recoverable
/// issues only; the program keeps running.
///
/// # Example
///
/// ```
/// warning!("sleep timer action failed: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
