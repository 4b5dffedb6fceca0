use std::path::PathBuf;
use std::time::Duration;

use iced::Task;

use crate::api::{ApiClient, ApiConfig};
use crate::application::DownloadCoordinator;
use crate::domain::{AppError, DownloadOutcome, DownloadRequest, DownloadStatus};
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils;

/// How long a settled outcome stays on screen before reverting to Idle.
const STATUS_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    // Bumped on every status change; revert timers carry the epoch they
    // were armed with, so a superseded timer is ignored.
    status_epoch: u64,
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Outcome of one download attempt
    DownloadSettled(Result<DownloadOutcome, AppError>),
    /// The display window for the status armed at this epoch elapsed
    StatusDisplayElapsed(u64),
    /// Folder chosen in the destination picker (None when dismissed)
    DestinationPicked(Option<PathBuf>),
    /// Result of the startup health probe
    ServerProbed(bool),
}

pub fn boot() -> (DownloadApp, Task<Message>) {
    let api_client = ApiClient::new(ApiConfig::default());
    let coordinator = DownloadCoordinator::new(
        api_client.clone(),
        DownloadCoordinator::default_destination(),
    );

    let view = DownloadView {
        destination: coordinator.destination().display().to_string(),
        ..DownloadView::default()
    };

    let app = DownloadApp {
        view,
        coordinator,
        status_epoch: 0,
    };

    let probe = Task::perform(
        async move { api_client.server_status().await.is_ok() },
        Message::ServerProbed,
    );

    (app, probe)
}

impl DownloadApp {
    fn set_status(&mut self, status: DownloadStatus) {
        self.status_epoch += 1;
        self.view.status = status;
    }

    /// Applies a settled outcome and arms its revert-to-Idle timer.
    fn settle(&mut self, status: DownloadStatus) -> Task<Message> {
        self.set_status(status);
        let epoch = self.status_epoch;
        Task::perform(tokio::time::sleep(STATUS_DISPLAY_WINDOW), move |_| {
            Message::StatusDisplayElapsed(epoch)
        })
    }
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::SubmitPressed => {
                    if app.view.status.is_loading() {
                        return Task::none();
                    }

                    if let Err(e) = utils::validate_target_url(&app.view.target_url) {
                        return app.settle(DownloadStatus::Error(e.to_string()));
                    }

                    let request = DownloadRequest {
                        target_url: app.view.target_url.clone(),
                        is_playlist: app.view.is_playlist,
                    };
                    let coordinator = app.coordinator.clone();

                    app.set_status(DownloadStatus::Loading);

                    return Task::perform(
                        async move { coordinator.execute(request).await },
                        Message::DownloadSettled,
                    );
                }
                DownloadMessage::ChangeDestinationPressed => {
                    if app.view.status.is_loading() {
                        return Task::none();
                    }
                    return Task::perform(
                        DownloadCoordinator::pick_destination(),
                        Message::DestinationPicked,
                    );
                }
                _ => {}
            }
        }
        Message::DownloadSettled(result) => {
            let status = match result {
                Ok(outcome) => DownloadStatus::Success(outcome.filename),
                Err(e) => DownloadStatus::Error(e.to_string()),
            };
            return app.settle(status);
        }
        Message::StatusDisplayElapsed(epoch) => {
            if epoch == app.status_epoch && app.view.status.is_settled() {
                app.set_status(DownloadStatus::Idle);
            }
        }
        Message::DestinationPicked(Some(path)) => {
            app.view.destination = path.display().to_string();
            app.coordinator.set_destination(path);
        }
        Message::DestinationPicked(None) => {}
        Message::ServerProbed(online) => {
            app.view.server_online = Some(online);
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> DownloadApp {
        let (app, _task) = boot();
        app
    }

    #[tokio::test]
    async fn test_empty_submit_yields_validation_error() {
        let mut app = app();
        let _ = update(&mut app, Message::UiMessage(DownloadMessage::SubmitPressed));
        assert_eq!(
            app.view.status,
            DownloadStatus::Error("Please enter a YouTube URL".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_youtube_submit_yields_validation_error() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::UiMessage(DownloadMessage::UrlChanged(
                "https://vimeo.com/123".to_string(),
            )),
        );
        let _ = update(&mut app, Message::UiMessage(DownloadMessage::SubmitPressed));
        assert_eq!(
            app.view.status,
            DownloadStatus::Error("Please enter a valid YouTube URL".to_string())
        );
    }

    #[test]
    fn test_submit_is_inert_while_loading() {
        let mut app = app();
        app.set_status(DownloadStatus::Loading);
        let epoch = app.status_epoch;

        let _ = update(&mut app, Message::UiMessage(DownloadMessage::SubmitPressed));

        assert_eq!(app.view.status, DownloadStatus::Loading);
        assert_eq!(app.status_epoch, epoch);
    }

    #[tokio::test]
    async fn test_settled_status_reverts_to_idle_on_timer() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::DownloadSettled(Ok(DownloadOutcome {
                filename: "song.mp3".to_string(),
                path: PathBuf::from("song.mp3"),
            })),
        );
        assert_eq!(
            app.view.status,
            DownloadStatus::Success("song.mp3".to_string())
        );

        let epoch = app.status_epoch;
        let _ = update(&mut app, Message::StatusDisplayElapsed(epoch));
        assert_eq!(app.view.status, DownloadStatus::Idle);
    }

    #[tokio::test]
    async fn test_stale_timer_does_not_clear_newer_status() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::DownloadSettled(Err(AppError::Transport("video unavailable".to_string()))),
        );
        let stale_epoch = app.status_epoch;

        // A newer outcome supersedes the first before its window elapses.
        let _ = update(
            &mut app,
            Message::DownloadSettled(Ok(DownloadOutcome {
                filename: "other.mp3".to_string(),
                path: PathBuf::from("other.mp3"),
            })),
        );

        let _ = update(&mut app, Message::StatusDisplayElapsed(stale_epoch));
        assert_eq!(
            app.view.status,
            DownloadStatus::Success("other.mp3".to_string())
        );
    }

    #[tokio::test]
    async fn test_error_message_comes_from_transport_error() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::DownloadSettled(Err(AppError::Transport("video unavailable".to_string()))),
        );
        assert_eq!(
            app.view.status,
            DownloadStatus::Error("video unavailable".to_string())
        );
    }
}
