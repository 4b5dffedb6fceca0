use thiserror::Error;

/// User-facing failure classes. Every variant renders as the message shown
/// in the status banner.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Please enter a YouTube URL")]
    EmptyUrl,

    #[error("Please enter a valid YouTube URL")]
    NotYoutube,

    /// Network failure or non-2xx response; the message is surfaced as-is.
    #[error("{0}")]
    Transport(String),

    #[error("Failed to save file: {0}")]
    Save(String),
}
