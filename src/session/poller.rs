use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::Shared;

impl Shared {
    /// Current track on the selected channel: every 5s while playback is
    /// desired, every 20s otherwise.
    pub(crate) async fn metadata_loop(self: Arc<Self>) {
        loop {
            self.poll_current_once().await;
            self.poll_art_once().await;

            let interval = if self.lock().controller.is_desired() {
                self.config.playing_metadata_interval
            } else {
                self.config.idle_metadata_interval
            };
            sleep(interval).await;
        }
    }

    pub(crate) async fn health_loop(self: Arc<Self>) {
        loop {
            self.poll_health_once().await;
            sleep(self.config.health_interval).await;
        }
    }

    pub(crate) async fn channel_loop(self: Arc<Self>) {
        loop {
            self.refresh_channels().await;
            sleep(self.config.channel_refresh_interval).await;
        }
    }

    pub(crate) async fn poll_current_once(&self) {
        let channel = self.selected_channel();
        let result = self.api.fetch_current(&channel).await;

        if self.selected_channel() != channel {
            debug!(channel = channel.as_str(), "current_track_dropped");
            return;
        }
        match result {
            Ok(response) => {
                debug!(
                    channel = channel.as_str(),
                    track_id = response.data.track_id.as_str(),
                    "current_track"
                );
                self.published.set_current_track(Some(response.data));
            }
            Err(failure) => {
                warn!(channel = channel.as_str(), error = %failure, "current_track_failed");
                self.published.set_last_error(Some(failure.to_string()));
            }
        }
    }

    pub(crate) async fn poll_art_once(&self) {
        let channel = self.selected_channel();
        self.refresh_selected_and_adjacent_art(&channel, true).await;
    }

    pub(crate) async fn poll_health_once(&self) {
        match self.api.fetch_health().await {
            Ok(response) => {
                debug!(status = response.data.status.as_str(), "radio_health");
                self.published.set_health(Some(response.data));
            }
            Err(failure) => {
                warn!(error = %failure, "radio_health_failed");
                self.published.set_last_error(Some(failure.to_string()));
            }
        }
    }

    /// Fetches the catalog, republishes the list and trims the art cache to it.
    ///
    /// On failure the previous list stays in place.
    pub(crate) async fn refresh_channels(&self) {
        self.published.set_channels_loading(true);
        self.published.set_channels_error(None);

        match self.api.fetch_channels().await {
            Ok(response) => {
                let names: Vec<String> = response
                    .data
                    .channels
                    .into_iter()
                    .map(|entry| entry.name)
                    .collect();
                debug!(count = names.len(), "radio_channels");
                self.lock()
                    .channels
                    .apply_fetched(names.iter().map(String::as_str));
            }
            Err(failure) => {
                warn!(error = %failure, "radio_channels_failed");
                self.published.set_channels_error(Some(failure.to_string()));
            }
        }

        self.published.set_channels_loading(false);
        self.publish_channel_list();

        let selected = self.selected_channel();
        self.publish_cached_art(&selected);
        self.refresh_selected_and_adjacent_art(&selected, false)
            .await;
    }
}
