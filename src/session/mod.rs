//! The orchestration instance behind a listening session.
//!
//! One [`RadioSession`] owns every background task (media event pump,
//! settings watchers, metadata/health/catalog polling, the reconnect timer and
//! the channel-switch sequence) plus the state they share. Shared state sits
//! behind a single mutex that is only held for map and field updates and for
//! non-blocking backend calls, never across an `.await`. Observers read a
//! [`RadioSnapshot`] through a `watch` channel.

pub mod art;
pub mod channels;
mod playback;
mod poller;
pub mod publisher;
mod switch;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::info;

use crate::api::RadioApi;
use crate::api::util::normalize_persisted_channel;
use crate::audio::backoff::ReconnectBackoff;
use crate::audio::config::RadioConfig;
use crate::audio::controller::ControllerState;
use crate::audio::error::RadioError;
use crate::audio::traits::MediaBackend;
use crate::event::events::MediaEvent;
use crate::settings::SettingsStore;
use crate::util::task::{
    CHANNEL_POLL_TASK, CHANNEL_WATCH_TASK, EVENTS_TASK, HEALTH_POLL_TASK, METADATA_POLL_TASK,
    QUALITY_WATCH_TASK, TaskManager,
};

use art::ArtCache;
use channels::{ChannelList, adjacent_channel};
pub use publisher::RadioSnapshot;
use publisher::Published;

pub(crate) struct SessionState {
    pub(crate) controller: ControllerState,
    pub(crate) art: ArtCache,
    pub(crate) channels: ChannelList,
    pub(crate) observed_channel: Option<String>,
    pub(crate) tasks: TaskManager,
    pub(crate) closed: bool,
}

pub(crate) struct Shared {
    pub(crate) config: RadioConfig,
    pub(crate) api: Arc<dyn RadioApi>,
    pub(crate) backend: Arc<dyn MediaBackend>,
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) published: Published,
    selected: watch::Receiver<String>,
    state: Mutex<SessionState>,
}

impl Shared {
    pub(crate) fn new(
        config: RadioConfig,
        api: Arc<dyn RadioApi>,
        backend: Arc<dyn MediaBackend>,
        settings: Arc<dyn SettingsStore>,
    ) -> Arc<Self> {
        let selected = settings.channel();

        let mut controller = ControllerState::new(
            ReconnectBackoff::new(config.reconnect_delays.clone()),
            config.normal_volume,
        );
        controller.observe_quality(*settings.quality().borrow());

        let channels = ChannelList::default();
        let selected_channel = normalize_persisted_channel(&selected.borrow());
        let published = Published::new(RadioSnapshot {
            channel_list: channels.entries(&selected_channel),
            selected_channel,
            active_quality: controller.active_quality(),
            ..Default::default()
        });

        Arc::new(Self {
            config,
            api,
            backend,
            settings,
            published,
            selected,
            state: Mutex::new(SessionState {
                controller,
                art: ArtCache::default(),
                channels,
                observed_channel: None,
                tasks: TaskManager::new(),
                closed: false,
            }),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currently selected channel in persisted form (`"all"` for the sentinel).
    pub(crate) fn selected_channel(&self) -> String {
        normalize_persisted_channel(&self.selected.borrow())
    }

    pub(crate) fn spawn_keyed<F>(&self, key: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.tasks.spawn(key, tokio::spawn(task));
    }

    pub(crate) fn spawn_detached<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.tasks.spawn_detached(tokio::spawn(task));
    }

    /// Republishes the list for the current selection and drops cached art
    /// for channels that fell out of it.
    pub(crate) fn publish_channel_list(&self) {
        let selected = self.selected_channel();
        let mut state = self.lock();
        let entries = state.channels.entries(&selected);
        state.art.prune(&entries);
        self.published.set_channel_list(entries);
        self.published.set_selected_channel(selected);
    }

    fn start_background(self: &Arc<Self>, events: flume::Receiver<MediaEvent>) {
        self.spawn_keyed(EVENTS_TASK, Arc::clone(self).pump_media_events(events));
        self.spawn_keyed(
            QUALITY_WATCH_TASK,
            Arc::clone(self).watch_quality(self.settings.quality()),
        );
        self.spawn_keyed(
            CHANNEL_WATCH_TASK,
            Arc::clone(self).watch_channel(self.settings.channel()),
        );
        self.spawn_keyed(METADATA_POLL_TASK, Arc::clone(self).metadata_loop());
        self.spawn_keyed(HEALTH_POLL_TASK, Arc::clone(self).health_loop());
        self.spawn_keyed(CHANNEL_POLL_TASK, Arc::clone(self).channel_loop());
    }

    async fn pump_media_events(self: Arc<Self>, events: flume::Receiver<MediaEvent>) {
        while let Ok(event) = events.recv_async().await {
            self.on_media_event(event);
        }
    }

    fn shutdown(&self) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.tasks.abort_all();
        }
        self.backend.release();
        info!("radio_session_closed");
    }
}

/// Handle to a running session. Dropping it tears the session down.
pub struct RadioSession {
    pub(crate) shared: Arc<Shared>,
}

impl RadioSession {
    /// Starts every background loop. Must be called inside a tokio runtime.
    pub fn start(
        config: RadioConfig,
        api: Arc<dyn RadioApi>,
        backend: Arc<dyn MediaBackend>,
        settings: Arc<dyn SettingsStore>,
        events: flume::Receiver<MediaEvent>,
    ) -> Self {
        let shared = Shared::new(config, api, backend, settings);
        info!(base_url = shared.config.base_url.as_str(), "radio_session_started");
        shared.start_background(events);
        Self { shared }
    }

    pub fn subscribe(&self) -> watch::Receiver<RadioSnapshot> {
        self.shared.published.subscribe()
    }

    pub fn snapshot(&self) -> RadioSnapshot {
        self.shared.published.snapshot()
    }

    pub fn play(&self) {
        self.shared.play();
    }

    pub fn pause(&self) {
        self.shared.pause();
    }

    pub fn retry(&self) {
        self.shared.retry();
    }

    pub fn is_playback_desired(&self) -> bool {
        self.shared.lock().controller.is_desired()
    }

    /// Selects the channel `direction` steps away in the channel list, wrapping around.
    pub async fn select_adjacent_channel(&self, direction: i32) -> Result<(), RadioError> {
        let next = {
            let selected = self.shared.selected_channel();
            let state = self.shared.lock();
            adjacent_channel(&state.channels.entries(&selected), &selected, direction)
        };
        match next {
            Some(channel) => self.shared.settings.set_channel(&channel).await,
            None => Ok(()),
        }
    }

    pub async fn set_channel(&self, channel: &str) -> Result<(), RadioError> {
        self.shared.settings.set_channel(channel).await
    }

    pub async fn set_quality(&self, quality: &str) -> Result<(), RadioError> {
        self.shared.settings.set_quality(quality).await
    }

    /// Cancels all background work and releases the media backend. Idempotent.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }
}

impl Drop for RadioSession {
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}
