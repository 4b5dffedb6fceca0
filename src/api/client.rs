use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::domain::DownloadRequest;

use super::models::{ApiConfig, MediaDownload, StatusResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-2xx response; carries the message exactly as shown to the user.
    #[error("{0}")]
    ServerError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid server address: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.config.base_url)?;
        Ok(base.join(path)?)
    }

    /// Health probe against /status.
    pub async fn server_status(&self) -> Result<StatusResponse> {
        let url = self.endpoint("/status")?;
        let response = self.http.get(url).send().await?.error_for_status()?;

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        Ok(status)
    }

    /// Fetches the converted media for `request`.
    ///
    /// Picks /download or /download/playlist from the request kind and
    /// carries the target as a percent-encoded `url` query parameter. Any
    /// non-2xx status becomes a `ServerError` whose message is the body
    /// text when present, else a generic status line.
    pub async fn fetch_media(&self, request: &DownloadRequest) -> Result<MediaDownload> {
        let path = if request.is_playlist {
            "/download/playlist"
        } else {
            "/download"
        };
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().append_pair("url", &request.target_url);

        tracing::info!(
            target = %request.target_url,
            playlist = request.is_playlist,
            "requesting conversion"
        );

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            tracing::warn!(code = status.as_u16(), "conversion request failed: {}", message);
            return Err(ApiError::ServerError(message));
        }

        let filename_hint = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let total_size = response.content_length();

        let stream = response
            .bytes_stream()
            .map_err(ApiError::RequestError)
            .boxed();

        Ok(MediaDownload {
            filename_hint,
            total_size,
            stream,
        })
    }
}

/// Message for a failed response: the body text when non-empty (unwrapping
/// a JSON `{"detail": ...}` envelope first), else "Server returned code:
/// reason".
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!(
            "Server returned {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Error")
        );
    }

    if let Ok(Value::Object(map)) = serde_json::from_str(body) {
        if let Some(detail) = map.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
    }

    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: server.url(),
        })
    }

    fn single_request(target: &str) -> DownloadRequest {
        DownloadRequest {
            target_url: target.to_string(),
            is_playlist: false,
        }
    }

    #[tokio::test]
    async fn test_fetch_media_returns_hint_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://www.youtube.com/watch?v=abc123".into(),
            ))
            .with_status(200)
            .with_header("content-disposition", "attachment; filename=\"song.mp3\"")
            .with_body(b"ID3\x03fake-audio".to_vec())
            .create_async()
            .await;

        let client = client_for(&server);
        let download = client
            .fetch_media(&single_request("https://www.youtube.com/watch?v=abc123"))
            .await
            .unwrap();

        assert_eq!(
            download.filename_hint.as_deref(),
            Some("attachment; filename=\"song.mp3\"")
        );

        let mut body = Vec::new();
        let mut stream = download.stream;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"ID3\x03fake-audio");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_playlist_requests_hit_playlist_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/playlist")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(b"PK\x03\x04".to_vec())
            .create_async()
            .await;

        let client = client_for(&server);
        let request = DownloadRequest {
            target_url: "https://www.youtube.com/playlist?list=PL123".to_string(),
            is_playlist: true,
        };
        let download = client.fetch_media(&request).await.unwrap();
        assert!(download.filename_hint.is_none());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_text_is_surfaced_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("video unavailable")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .fetch_media(&single_request("https://youtu.be/abc123"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "video unavailable");
    }

    #[tokio::test]
    async fn test_json_detail_body_is_unwrapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("{\"detail\": \"Use playlist endpoint\"}")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .fetch_media(&single_request("https://youtu.be/abc123"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Use playlist endpoint");
    }

    #[tokio::test]
    async fn test_empty_error_body_falls_back_to_status_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .fetch_media(&single_request("https://youtu.be/abc123"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Server returned 404: Not Found");
    }

    #[tokio::test]
    async fn test_server_status_parses_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/status")
            .with_status(200)
            .with_body("{\"status\": \"running\"}")
            .create_async()
            .await;

        let client = client_for(&server);
        let status = client.server_status().await.unwrap();
        assert_eq!(status.status, "running");
    }
}
