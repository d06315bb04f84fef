// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive session.
//
// Module responsibilities:
// - `hash`: SHA-256 digest of a path string, the file's CDN identity.
// - `log`: the on-disk JSON transfer log with duplicate-hash rehashing.
// - `api`: the blocking HTTP client that publishes files to the remote
//   object store and returns the public URL.
// - `ui`: the interactive state machine tying the above together.
//
// Keeping this separation makes the log and API logic testable without
// touching the terminal-driven UI.
pub mod api;
pub mod hash;
pub mod log;
pub mod ui;
