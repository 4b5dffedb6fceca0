use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Response from the /status endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let base_url = std::env::var("MP3IFY_SERVER")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        Self { base_url }
    }
}

/// A converted media payload handed back by the backend: the filename hint
/// from Content-Disposition (raw header value), the advertised length, and
/// the body as a byte stream.
pub struct MediaDownload {
    pub filename_hint: Option<String>,
    pub total_size: Option<u64>,
    pub stream: BoxStream<'static, super::client::Result<bytes::Bytes>>,
}

impl std::fmt::Debug for MediaDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDownload")
            .field("filename_hint", &self.filename_hint)
            .field("total_size", &self.total_size)
            .field("stream", &"<stream>")
            .finish()
    }
}
