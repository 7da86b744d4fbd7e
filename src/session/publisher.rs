use tokio::sync::watch;

use crate::api::util::{ALL_CHANNEL, Quality, normalize_persisted_channel};
use crate::api::{ArtEntry, CurrentTrack, HealthPayload};
use crate::audio::state::PlaybackState;

/// Everything the presentation layer renders, pushed as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioSnapshot {
    pub playback_state: PlaybackState,
    pub selected_channel: String,
    pub current_track: Option<CurrentTrack>,
    pub art: Option<ArtEntry>,
    pub health: Option<HealthPayload>,
    pub channel_list: Vec<String>,
    pub channels_loading: bool,
    pub channels_error: Option<String>,
    pub last_error: Option<String>,
    pub active_quality: Quality,
    pub pending_quality: Option<Quality>,
}

impl Default for RadioSnapshot {
    fn default() -> Self {
        Self {
            playback_state: PlaybackState::Idle,
            selected_channel: ALL_CHANNEL.to_string(),
            current_track: None,
            art: None,
            health: None,
            channel_list: vec![ALL_CHANNEL.to_string()],
            channels_loading: false,
            channels_error: None,
            last_error: None,
            active_quality: Quality::default(),
            pending_quality: None,
        }
    }
}

impl RadioSnapshot {
    /// Art that may be shown right now.
    ///
    /// Cached art belongs to a specific track on a specific channel; it is
    /// hidden until both it and the current track belong to the selected
    /// channel and their `track_id`s agree.
    pub fn display_art(&self) -> Option<&ArtEntry> {
        let art = self.art.as_ref()?;
        let track = self.current_track.as_ref()?;
        let selected = normalize_persisted_channel(&self.selected_channel);
        let on_selected = normalize_persisted_channel(&art.channel) == selected
            && normalize_persisted_channel(&track.channel) == selected;
        (on_selected && art.track_id == track.track_id).then_some(art)
    }
}

/// Write side of the snapshot. Subscribers joining late get the latest value.
pub struct Published {
    tx: watch::Sender<RadioSnapshot>,
}

impl Published {
    pub fn new(initial: RadioSnapshot) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<RadioSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> RadioSnapshot {
        self.tx.borrow().clone()
    }

    fn set<T, F>(&self, field: F, value: T)
    where
        T: PartialEq,
        F: FnOnce(&mut RadioSnapshot) -> &mut T,
    {
        self.tx.send_if_modified(|snapshot| {
            let slot = field(snapshot);
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        });
    }

    pub fn set_state(&self, state: PlaybackState) {
        self.set(|s| &mut s.playback_state, state);
    }

    pub fn set_last_error(&self, error: Option<String>) {
        self.set(|s| &mut s.last_error, error);
    }

    pub fn set_selected_channel(&self, channel: String) {
        self.set(|s| &mut s.selected_channel, channel);
    }

    pub fn set_current_track(&self, track: Option<CurrentTrack>) {
        self.set(|s| &mut s.current_track, track);
    }

    pub fn set_art(&self, art: Option<ArtEntry>) {
        self.set(|s| &mut s.art, art);
    }

    pub fn set_health(&self, health: Option<HealthPayload>) {
        self.set(|s| &mut s.health, health);
    }

    pub fn set_channel_list(&self, channels: Vec<String>) {
        self.set(|s| &mut s.channel_list, channels);
    }

    pub fn set_channels_loading(&self, loading: bool) {
        self.set(|s| &mut s.channels_loading, loading);
    }

    pub fn set_channels_error(&self, error: Option<String>) {
        self.set(|s| &mut s.channels_error, error);
    }

    pub fn set_quality(&self, active: Quality, pending: Option<Quality>) {
        self.set(|s| &mut s.active_quality, active);
        self.set(|s| &mut s.pending_quality, pending);
    }
}
