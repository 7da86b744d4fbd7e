use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::Shared;
use crate::api::util::{Quality, channel_label, normalize_persisted_channel};
use crate::audio::state::PlaybackState;
use crate::util::task::{CHANNEL_SWITCH_TASK, RECONNECT_TASK};

impl Shared {
    pub(crate) async fn watch_channel(self: Arc<Self>, mut rx: watch::Receiver<String>) {
        loop {
            let channel = normalize_persisted_channel(&rx.borrow_and_update());
            self.on_selected_channel(channel);
            if rx.changed().await.is_err() {
                debug!("channel_watch_closed");
                return;
            }
        }
    }

    pub(crate) async fn watch_quality(self: Arc<Self>, mut rx: watch::Receiver<Quality>) {
        loop {
            let quality = *rx.borrow_and_update();
            {
                let mut state = self.lock();
                state.controller.observe_quality(quality);
                self.published.set_quality(
                    state.controller.active_quality(),
                    state.controller.pending_quality(),
                );
            }
            debug!(quality = quality.as_str(), "radio_quality_observed");
            if rx.changed().await.is_err() {
                debug!("quality_watch_closed");
                return;
            }
        }
    }

    /// Reacts to a selection emitted by the settings store.
    ///
    /// The first emission and any change while stopped only refresh the
    /// current track and art.
    /// A change while playback is desired runs the switch sequence, replacing
    /// any switch still in progress and any pending reconnect.
    fn on_selected_channel(self: &Arc<Self>, channel: String) {
        let (first, desired) = {
            let mut state = self.lock();
            if state.observed_channel.as_deref() == Some(channel.as_str()) {
                return;
            }
            let first = state.observed_channel.replace(channel.clone()).is_none();
            (first, state.controller.is_desired())
        };

        self.publish_channel_list();
        self.publish_cached_art(&channel);

        if first || !desired {
            debug!(channel = channel.as_str(), first, "radio_channel_selected");
            let shared = Arc::clone(self);
            self.spawn_detached(async move {
                shared.poll_current_once().await;
                shared.refresh_selected_and_adjacent_art(&channel, true).await;
            });
            return;
        }

        info!(channel = channel.as_str(), "radio_channel_switch");
        let shared = Arc::clone(self);
        self.spawn_keyed(CHANNEL_SWITCH_TASK, async move {
            shared.run_channel_switch(channel).await;
        });
    }

    async fn run_channel_switch(&self, channel: String) {
        {
            let mut state = self.lock();
            if !state.controller.is_desired() {
                return;
            }
            state.controller.reset_attempts();
            state.tasks.abort(RECONNECT_TASK);
            self.published
                .set_state(PlaybackState::SwitchingChannel(channel_label(&channel)));
        }

        self.fade_volume(0.0, self.config.channel_switch_fade).await;

        {
            let mut state = self.lock();
            if !state.controller.is_desired() {
                return;
            }
            self.connect(&mut state, PlaybackState::Connecting, Some(&channel), false);
        }

        self.fade_volume(self.config.normal_volume, self.config.channel_switch_fade)
            .await;

        self.poll_current_once().await;
        self.poll_art_once().await;
        debug!(channel = channel.as_str(), "radio_channel_switch_done");
    }
}
