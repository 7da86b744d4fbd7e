use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{SessionState, Shared};
use crate::api::util::{build_stream_url, normalize_persisted_channel};
use crate::audio::controller::ReconnectPlan;
use crate::audio::error::RadioError;
use crate::audio::fade::VolumeFade;
use crate::audio::state::PlaybackState;
use crate::event::events::MediaEvent;
use crate::util::task::{CHANNEL_SWITCH_TASK, RECONNECT_TASK};

impl Shared {
    pub(crate) fn play(&self) {
        let mut state = self.lock();
        if !state.controller.request_play() {
            debug!("radio_play_ignored");
            return;
        }
        info!("radio_play");
        self.connect(&mut state, PlaybackState::Connecting, None, true);
    }

    pub(crate) fn retry(&self) {
        let mut state = self.lock();
        state.controller.request_retry();
        info!("radio_retry");
        self.connect(&mut state, PlaybackState::Connecting, None, true);
    }

    pub(crate) fn pause(&self) {
        let mut state = self.lock();
        state.controller.request_pause();
        state.tasks.abort(RECONNECT_TASK);
        state.tasks.abort(CHANNEL_SWITCH_TASK);

        self.backend.pause();
        self.apply_volume(&mut state, self.config.normal_volume);
        self.published.set_state(PlaybackState::Stopped);
        info!("radio_pause");
    }

    pub(crate) fn apply_volume(&self, state: &mut SessionState, volume: f32) {
        state.controller.set_volume(volume);
        self.backend.set_volume(state.controller.volume());
    }

    /// Starts a fresh stream. Any scheduled reconnect is superseded.
    ///
    /// `restore_volume` is false only inside the channel-switch sequence,
    /// which fades back in from silence itself.
    pub(crate) fn connect(
        &self,
        state: &mut SessionState,
        target: PlaybackState,
        channel_override: Option<&str>,
        restore_volume: bool,
    ) {
        if state.closed {
            return;
        }
        let generation = state.controller.next_generation();
        state.tasks.abort(RECONNECT_TASK);

        let channel = match channel_override {
            Some(channel) => normalize_persisted_channel(channel),
            None => self.selected_channel(),
        };
        let quality = state.controller.resolve_quality();
        self.published.set_quality(
            state.controller.active_quality(),
            state.controller.pending_quality(),
        );

        let url = match build_stream_url(&self.config.base_url, &channel, quality.as_str()) {
            Ok(url) => url,
            Err(e) => {
                warn!(generation, error = %e, "radio_connect_unavailable");
                self.published.set_last_error(Some(e.to_string()));
                self.published.set_state(PlaybackState::Unavailable(e.to_string()));
                return;
            }
        };

        info!(
            generation,
            channel = channel.as_str(),
            quality = quality.as_str(),
            url = url.as_str(),
            "radio_connect"
        );

        self.published.set_last_error(None);
        if restore_volume {
            self.apply_volume(state, self.config.normal_volume);
        }
        self.backend.set_source(&url);
        self.backend.play();
        self.published.set_state(target);
    }

    pub(crate) fn schedule_reconnect(self: &Arc<Self>, failure: RadioError) {
        let reason = failure.to_string();
        let mut state = self.lock();
        if state.closed {
            return;
        }
        let Some(plan) = state.controller.plan_reconnect() else {
            debug!(reason = reason.as_str(), "radio_reconnect_ignored");
            return;
        };

        warn!(
            attempt = plan.attempt,
            delay_ms = plan.delay.as_millis() as u64,
            generation = plan.generation,
            reason = reason.as_str(),
            "radio_reconnect_scheduled"
        );
        self.published.set_state(PlaybackState::Reconnecting {
            attempt: plan.attempt,
            next_delay: plan.delay,
        });
        self.published.set_last_error(Some(reason));

        let shared = Arc::clone(self);
        state.tasks.spawn(
            RECONNECT_TASK,
            tokio::spawn(async move {
                tokio::time::sleep(plan.delay).await;
                shared.fire_reconnect(plan);
            }),
        );
    }

    /// Reconnects unless playback was stopped or a newer connect happened.
    pub(crate) fn fire_reconnect(&self, plan: ReconnectPlan) {
        let mut state = self.lock();
        if !state.controller.reconnect_is_current(&plan) {
            debug!(
                generation = plan.generation,
                current = state.controller.generation(),
                "radio_reconnect_stale"
            );
            return;
        }
        self.connect(&mut state, PlaybackState::Connecting, None, true);
    }

    pub(crate) fn on_media_event(self: &Arc<Self>, event: MediaEvent) {
        debug!(?event, "media_event");
        match event {
            MediaEvent::BecamePlaying => {
                let mut state = self.lock();
                if !state.controller.on_became_playing() {
                    return;
                }
                self.published.set_state(PlaybackState::Playing);
                self.published.set_last_error(None);
                self.apply_volume(&mut state, self.config.normal_volume);
            }
            MediaEvent::PlaybackEnded | MediaEvent::Error(_) => {
                if let Some(failure) = event.failure() {
                    self.schedule_reconnect(failure);
                }
            }
            MediaEvent::PlayWhenReadyChanged(ready) => {
                let state = self.lock();
                if !state.controller.is_desired() && !ready {
                    self.published.set_state(PlaybackState::Stopped);
                }
            }
        }
    }

    /// Linear fade from the current volume, never holding the lock while sleeping.
    pub(crate) async fn fade_volume(&self, target: f32, duration: Duration) {
        let start = self.lock().controller.volume();
        let fade = VolumeFade::new(start, target, duration, self.config.fade_steps);
        let target = fade.target();
        let step = fade.step_duration();

        for level in fade {
            {
                let mut state = self.lock();
                self.apply_volume(&mut state, level);
            }
            tokio::time::sleep(step).await;
        }

        let mut state = self.lock();
        self.apply_volume(&mut state, target);
    }
}
