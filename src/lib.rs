//! Butler - chat, summary and dashboard client
//!
//! This library provides the client-side core of Butler: the optimistic
//! message list of an open conversation, the summary selection flow, and the
//! HTTP client for the Butler backend. The terminal front-end in
//! `src/bin/tui.rs` is a thin rendering layer over it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod chat;
pub mod message;
pub mod session;
pub mod settings;
pub mod store;
pub mod summary;
pub mod tui;

#[cfg(test)]
mod tests;

/// Result type alias for Butler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Butler operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backend answered with a non-success HTTP status
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Request never produced a response (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered 2xx but the body is not what the contract promises
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// No user identity available in the session
    #[error("No signed-in user")]
    MissingIdentity,

    /// Settings could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Initialize logging to stdout
pub fn init() {
    tracing_subscriber::fmt::init();
}

/// Initialize logging into a file
///
/// The terminal front-end owns stdout, so its diagnostics go to a file
/// instead. Calling this twice is harmless; the second call is ignored.
pub fn init_with_log_file<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let _ = tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
