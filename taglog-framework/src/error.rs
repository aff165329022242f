use std::io;
use thiserror::Error;

/// errors surfaced by destinations and the live renderer
#[derive(Debug, Error)]
pub enum Error {
    /// spinner frame set name not present in the registry
    #[error("unknown spinner frame set: {0:?}")]
    UnknownFrameSet(String),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize log line: {0}")]
    Json(#[from] serde_json::Error),

    /// a custom destination rejected the message
    #[error("destination failed: {0}")]
    Sink(#[from] anyhow::Error),

    /// several destinations of one fan-out failed on the same print
    #[error("{} destinations failed, first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Delivery(Vec<Error>),
}

pub type Result<T> = std::result::Result<T, Error>;
