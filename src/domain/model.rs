use std::path::PathBuf;

/// One user-submitted download attempt.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub target_url: String,
    pub is_playlist: bool,
}

/// What a finished attempt reports back.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub filename: String,
    pub path: PathBuf,
}

/// Lifecycle of the form. Exactly one variant is active; transitions are
/// linear: Idle -> Loading -> Success | Error -> Idle after the display
/// window elapses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl DownloadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, DownloadStatus::Loading)
    }

    /// Settled outcomes are the ones that auto-revert to Idle.
    pub fn is_settled(&self) -> bool {
        matches!(self, DownloadStatus::Success(_) | DownloadStatus::Error(_))
    }
}
