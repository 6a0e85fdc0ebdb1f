//! Dispatch layer shared by the MCP server and the HTTP bridge.
//!
//! Each function resolves names to URIs where needed, performs exactly one
//! playback or registry operation, and returns a JSON payload ready for
//! either front end to serialize. Failures are the crate's error taxonomy;
//! translating them into protocol responses is the front ends' job.

pub mod play;
pub mod playback;
pub mod search;
pub mod timer;
