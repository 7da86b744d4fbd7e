//! Scripted collaborators for orchestration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::{
    ApiFailure, ApiResponse, ApiResult, ArtEntry, ChannelEntry, ChannelsPayload, CurrentTrack,
    HealthPayload, RadioApi,
};
use crate::audio::config::RadioConfig;
use crate::audio::traits::MediaBackend;
use crate::event::events::MediaEvent;
use crate::session::{RadioSession, Shared};
use crate::settings::MemorySettings;

const NOW: &str = "2026-01-01T00:00:00Z";

#[derive(Default)]
struct Calls {
    health: usize,
    channels: usize,
    current: HashMap<String, usize>,
    art: HashMap<String, usize>,
    art_in_flight: HashMap<String, usize>,
    art_max_in_flight: HashMap<String, usize>,
}

#[derive(Default)]
struct Script {
    channels: Vec<String>,
    channels_failure: Option<ApiFailure>,
    current_tracks: HashMap<String, String>,
    current_failures: HashMap<String, ApiFailure>,
    art_tracks: HashMap<String, String>,
    art_failures: HashMap<String, ApiFailure>,
}

pub(crate) struct FakeApi {
    script: Mutex<Script>,
    calls: Mutex<Calls>,
    gate: Option<Semaphore>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            script: Mutex::new(Script {
                channels: vec!["chill".into(), "focus".into()],
                ..Default::default()
            }),
            calls: Mutex::new(Calls::default()),
            gate: None,
        }
    }
}

impl FakeApi {
    /// Art fetches block until [`FakeApi::open_gate`].
    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub(crate) fn with_channels(self, channels: &[&str]) -> Self {
        self.set_channels(channels);
        self
    }

    pub(crate) fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.close();
        }
    }

    pub(crate) fn set_channels(&self, channels: &[&str]) {
        let mut script = self.script.lock().unwrap();
        script.channels = channels.iter().map(|c| c.to_string()).collect();
        script.channels_failure = None;
    }

    pub(crate) fn fail_channels(&self, failure: ApiFailure) {
        self.script.lock().unwrap().channels_failure = Some(failure);
    }

    pub(crate) fn set_current(&self, channel: &str, track_id: &str) {
        let mut script = self.script.lock().unwrap();
        script.current_failures.remove(channel);
        script
            .current_tracks
            .insert(channel.to_string(), track_id.to_string());
    }

    pub(crate) fn fail_current(&self, channel: &str, failure: ApiFailure) {
        self.script
            .lock()
            .unwrap()
            .current_failures
            .insert(channel.to_string(), failure);
    }

    pub(crate) fn set_art_track(&self, channel: &str, track_id: &str) {
        let mut script = self.script.lock().unwrap();
        script.art_failures.remove(channel);
        script
            .art_tracks
            .insert(channel.to_string(), track_id.to_string());
    }

    pub(crate) fn fail_art(&self, channel: &str, failure: ApiFailure) {
        self.script
            .lock()
            .unwrap()
            .art_failures
            .insert(channel.to_string(), failure);
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.calls.lock().unwrap().health
    }

    pub(crate) fn channel_calls(&self) -> usize {
        self.calls.lock().unwrap().channels
    }

    pub(crate) fn current_calls(&self, channel: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .current
            .get(channel)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn art_calls(&self, channel: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .art
            .get(channel)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn max_art_in_flight(&self, channel: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .art_max_in_flight
            .get(channel)
            .copied()
            .unwrap_or(0)
    }

    fn enter_art(&self, channel: &str) {
        let mut calls = self.calls.lock().unwrap();
        *calls.art.entry(channel.to_string()).or_default() += 1;
        let in_flight = calls.art_in_flight.entry(channel.to_string()).or_default();
        *in_flight += 1;
        let current = *in_flight;
        let max = calls
            .art_max_in_flight
            .entry(channel.to_string())
            .or_default();
        *max = (*max).max(current);
    }

    fn leave_art(&self, channel: &str) {
        let mut calls = self.calls.lock().unwrap();
        if let Some(in_flight) = calls.art_in_flight.get_mut(channel) {
            *in_flight = in_flight.saturating_sub(1);
        }
    }
}

#[async_trait]
impl RadioApi for FakeApi {
    async fn fetch_health(&self) -> ApiResult<HealthPayload> {
        self.calls.lock().unwrap().health += 1;
        Ok(ApiResponse::new(
            HealthPayload {
                status: "ok".into(),
                track_count: 42,
                ..Default::default()
            },
            NOW,
        ))
    }

    async fn fetch_channels(&self) -> ApiResult<ChannelsPayload> {
        self.calls.lock().unwrap().channels += 1;
        let script = self.script.lock().unwrap();
        if let Some(failure) = &script.channels_failure {
            return Err(failure.clone());
        }
        let channels = script
            .channels
            .iter()
            .map(|name| ChannelEntry {
                name: name.clone(),
                track_count: 10,
            })
            .collect();
        Ok(ApiResponse::new(ChannelsPayload { channels }, NOW))
    }

    async fn fetch_current(&self, channel: &str) -> ApiResult<CurrentTrack> {
        *self
            .calls
            .lock()
            .unwrap()
            .current
            .entry(channel.to_string())
            .or_default() += 1;

        let script = self.script.lock().unwrap();
        if let Some(failure) = script.current_failures.get(channel) {
            return Err(failure.clone());
        }
        let track_id = script
            .current_tracks
            .get(channel)
            .cloned()
            .unwrap_or_else(|| "t0".into());
        Ok(ApiResponse::new(
            CurrentTrack {
                station_label: "Midori AI Radio".into(),
                channel: channel.to_string(),
                title: format!("Track {track_id}"),
                track_id,
                duration_ms: 180_000,
                ..Default::default()
            },
            NOW,
        ))
    }

    async fn fetch_art(&self, channel: &str) -> ApiResult<ArtEntry> {
        self.enter_art(channel);
        if let Some(gate) = &self.gate {
            let _ = gate.acquire().await;
        }
        self.leave_art(channel);

        let script = self.script.lock().unwrap();
        if let Some(failure) = script.art_failures.get(channel) {
            return Err(failure.clone());
        }
        let track_id = script
            .art_tracks
            .get(channel)
            .cloned()
            .unwrap_or_else(|| "t0".into());
        Ok(ApiResponse::new(
            ArtEntry {
                channel: channel.to_string(),
                track_id,
                has_art: true,
                art_url: Some(format!("/radio/v1/art/image?channel={channel}")),
                mime: Some("image/png".into()),
            },
            NOW,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    SetSource(String),
    Play,
    Pause,
    SetVolume(f32),
    Release,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: Mutex<Vec<BackendCall>>,
}

impl FakeBackend {
    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sources(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::SetSource(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn volumes(&self) -> Vec<f32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::SetVolume(volume) => Some(volume),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaBackend for FakeBackend {
    fn set_source(&self, url: &str) {
        self.record(BackendCall::SetSource(url.to_string()));
    }

    fn play(&self) {
        self.record(BackendCall::Play);
    }

    fn pause(&self) {
        self.record(BackendCall::Pause);
    }

    fn set_volume(&self, volume: f32) {
        self.record(BackendCall::SetVolume(volume));
    }

    fn release(&self) {
        self.record(BackendCall::Release);
    }
}

/// Lets spawned tasks run up to their next timer.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Session state without any background loop running.
pub(crate) fn shared_with(
    api: Arc<FakeApi>,
    selected: &str,
) -> (Arc<Shared>, Arc<FakeBackend>, Arc<MemorySettings>) {
    let backend = Arc::new(FakeBackend::default());
    let settings = Arc::new(MemorySettings::new(selected, "medium"));
    let shared = Shared::new(
        RadioConfig::default(),
        api,
        backend.clone(),
        settings.clone(),
    );
    (shared, backend, settings)
}

pub(crate) struct Harness {
    pub(crate) session: RadioSession,
    pub(crate) api: Arc<FakeApi>,
    pub(crate) backend: Arc<FakeBackend>,
    pub(crate) settings: Arc<MemorySettings>,
    pub(crate) events: flume::Sender<MediaEvent>,
}

pub(crate) fn harness(api: FakeApi, channel: &str, quality: &str) -> Harness {
    harness_with_config(api, channel, quality, RadioConfig::default())
}

pub(crate) fn harness_with_config(
    api: FakeApi,
    channel: &str,
    quality: &str,
    config: RadioConfig,
) -> Harness {
    let api = Arc::new(api);
    let backend = Arc::new(FakeBackend::default());
    let settings = Arc::new(MemorySettings::new(channel, quality));
    let (events, rx) = flume::unbounded();

    let session = RadioSession::start(config, api.clone(), backend.clone(), settings.clone(), rx);
    Harness {
        session,
        api,
        backend,
        settings,
        events,
    }
}
