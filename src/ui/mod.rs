use iced::{
    widget::{button, checkbox, column, row, text, text_input, Space},
    Element, Length,
};

use crate::domain::DownloadStatus;

/// Main view state
#[derive(Default)]
pub struct DownloadView {
    pub target_url: String,
    pub is_playlist: bool,
    pub status: DownloadStatus,
    pub destination: String,
    pub server_online: Option<bool>,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    PlaylistToggled(bool),
    SubmitPressed,
    ChangeDestinationPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.target_url = url;
            }
            DownloadMessage::PlaylistToggled(checked) => {
                self.is_playlist = checked;
            }
            DownloadMessage::SubmitPressed | DownloadMessage::ChangeDestinationPressed => {
                // Handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let loading = self.status.is_loading();

        // Widgets without handlers render inert, which keeps the form to
        // one in-flight request.
        let url_input = {
            let input =
                text_input("https://www.youtube.com/watch?v=...", &self.target_url).padding(10);
            if loading {
                input
            } else {
                input.on_input(DownloadMessage::UrlChanged)
            }
        };

        let playlist_checkbox = {
            let cb = checkbox(self.is_playlist).label("This is a playlist");
            if loading {
                cb
            } else {
                cb.on_toggle(DownloadMessage::PlaylistToggled)
            }
        };

        let submit_button = {
            let label = if loading {
                "Processing..."
            } else {
                "Convert & Download"
            };
            let btn = button(label).padding([10, 20]);
            if loading {
                btn
            } else {
                btn.on_press(DownloadMessage::SubmitPressed)
            }
        };

        let change_button = {
            let btn = button("Change...").padding([4, 10]);
            if loading {
                btn
            } else {
                btn.on_press(DownloadMessage::ChangeDestinationPressed)
            }
        };

        let server_line = match self.server_online {
            Some(true) => "Server: online",
            Some(false) => "Server: offline",
            None => "Server: checking...",
        };

        column![
            text("MP3ify").size(32),
            text("Convert YouTube videos to high-quality MP3 files with just a few clicks")
                .size(14),
            Space::new().height(Length::Fixed(16.0)),
            text("YouTube URL").size(14),
            url_input,
            text("Enter a YouTube video or playlist URL").size(12),
            playlist_checkbox,
            submit_button,
            self.status_banner(),
            Space::new().height(Length::Fixed(8.0)),
            row![
                text(format!("Save to: {}", self.destination)).size(13),
                change_button,
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(16.0)),
            text("YouTube Videos").size(15),
            text(
                "Paste any YouTube video URL and convert it to MP3 format. \
                 Perfect for creating your offline music collection."
            )
            .size(13),
            text("YouTube Playlists").size(15),
            text(
                "Convert entire YouTube playlists and download them as a ZIP file \
                 containing all tracks, ready for your music library."
            )
            .size(13),
            Space::new().height(Length::Fixed(16.0)),
            text(server_line).size(12),
            text("For personal use only. Not affiliated with YouTube.").size(12),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }

    fn status_banner(&self) -> Element<'_, DownloadMessage> {
        match &self.status {
            DownloadStatus::Idle => Space::new().into(),
            DownloadStatus::Loading => column![
                text("Downloading...").size(16),
                text("Please wait while we process your request").size(13),
            ]
            .spacing(4)
            .into(),
            DownloadStatus::Success(filename) => column![
                text("Download Complete").size(16),
                text(format!("Successfully downloaded {}", filename)).size(13),
            ]
            .spacing(4)
            .into(),
            DownloadStatus::Error(message) => column![
                text("Download Failed").size(16),
                text(message.clone()).size(13),
            ]
            .spacing(4)
            .into(),
        }
    }
}
