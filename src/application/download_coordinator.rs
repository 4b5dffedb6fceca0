use std::path::{Path, PathBuf};

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::{
    api::ApiClient,
    domain::{AppError, DownloadOutcome, DownloadRequest},
    utils,
};

/// Coordinates one download attempt end to end: validate the target URL,
/// fetch the converted media, resolve the filename, save the payload into
/// the destination directory. Exactly one of Ok/Err per invocation.
#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
    destination: PathBuf,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient, destination: PathBuf) -> Self {
        Self {
            api_client,
            destination,
        }
    }

    /// The platform download directory, like a browser would use.
    pub fn default_destination() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: PathBuf) {
        self.destination = destination;
    }

    pub async fn pick_destination() -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .pick_folder()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub async fn execute(&self, request: DownloadRequest) -> Result<DownloadOutcome, AppError> {
        let target_url = utils::validate_target_url(&request.target_url)?.to_string();
        let request = DownloadRequest {
            target_url,
            is_playlist: request.is_playlist,
        };

        let download = self
            .api_client
            .fetch_media(&request)
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let filename =
            utils::resolve_filename(download.filename_hint.as_deref(), request.is_playlist);
        tracing::debug!(file = %filename, bytes = ?download.total_size, "saving payload");

        let path = self.save_stream(&filename, download.stream).await?;

        tracing::info!(file = %path.display(), "download finished");

        Ok(DownloadOutcome { filename, path })
    }

    /// Streams the payload into `<name>.part`, then renames it into place.
    /// The part file never survives a failed attempt.
    async fn save_stream(
        &self,
        filename: &str,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
    ) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.destination)
            .await
            .map_err(|e| AppError::Save(e.to_string()))?;

        let final_path = utils::unique_destination(&self.destination, filename);
        let part_path = {
            let mut raw = final_path.clone().into_os_string();
            raw.push(".part");
            PathBuf::from(raw)
        };

        if let Err(e) = write_stream_to(&part_path, stream).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(AppError::Save(e.to_string()));
        }

        Ok(final_path)
    }
}

async fn write_stream_to(
    path: &Path,
    mut stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
) -> Result<(), AppError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::Save(format!("Failed to create file: {}", e)))?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Transport(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Save(format!("Write error: {}", e)))?;
    }

    file.sync_all()
        .await
        .map_err(|e| AppError::Save(format!("Failed to sync file: {}", e)))?;

    Ok(())
}
