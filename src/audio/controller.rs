use std::time::Duration;

use crate::api::util::Quality;
use crate::audio::backoff::ReconnectBackoff;

/// Deferred reconnect captured at failure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPlan {
    pub attempt: u32,
    pub delay: Duration,
    pub generation: u64,
}

/// Playback intent, reconnect bookkeeping and quality selection.
///
/// Pure state: the session applies the side effects (backend calls, timers,
/// publishing) around these transitions.
#[derive(Debug, Clone)]
pub struct ControllerState {
    desired: bool,
    backoff: ReconnectBackoff,
    generation: u64,
    volume: f32,
    active_quality: Quality,
    pending_quality: Option<Quality>,
    observed_quality: Option<Quality>,
}

impl ControllerState {
    pub fn new(backoff: ReconnectBackoff, volume: f32) -> Self {
        Self {
            desired: false,
            backoff,
            generation: 0,
            volume,
            active_quality: Quality::default(),
            pending_quality: None,
            observed_quality: None,
        }
    }

    pub fn is_desired(&self) -> bool {
        self.desired
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reconnect_attempt(&self) -> u32 {
        self.backoff.attempt()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn active_quality(&self) -> Quality {
        self.active_quality
    }

    pub fn pending_quality(&self) -> Option<Quality> {
        self.pending_quality
    }

    /// Returns `false` when playback was already desired (no-op play).
    pub fn request_play(&mut self) -> bool {
        if self.desired {
            return false;
        }
        self.request_retry();
        true
    }

    pub fn request_retry(&mut self) {
        self.desired = true;
        self.backoff.reset();
    }

    pub fn request_pause(&mut self) {
        self.desired = false;
    }

    pub fn reset_attempts(&mut self) {
        self.backoff.reset();
    }

    /// Bumps the connection generation for a new connect.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// A pending override wins once and is cleared; otherwise the active quality.
    pub fn resolve_quality(&mut self) -> Quality {
        if let Some(pending) = self.pending_quality.take() {
            self.active_quality = pending;
        }
        self.active_quality
    }

    /// Returns `true` when the event is honoured (playback still desired).
    pub fn on_became_playing(&mut self) -> bool {
        if !self.desired {
            return false;
        }
        self.backoff.reset();
        true
    }

    /// Plans the next reconnect, or `None` when playback is not desired.
    pub fn plan_reconnect(&mut self) -> Option<ReconnectPlan> {
        if !self.desired {
            return None;
        }
        let (attempt, delay) = self.backoff.next_failure();
        Some(ReconnectPlan {
            attempt,
            delay,
            generation: self.generation,
        })
    }

    /// A reconnect fires only if still desired and no newer connect happened.
    pub fn reconnect_is_current(&self, plan: &ReconnectPlan) -> bool {
        self.desired && plan.generation == self.generation
    }

    /// Applies a quality emitted by the settings store.
    ///
    /// The first observation sets the active quality. Later changes are
    /// deferred to the next connect while playing; repeats are ignored.
    pub fn observe_quality(&mut self, quality: Quality) {
        if self.observed_quality == Some(quality) {
            return;
        }
        let first = self.observed_quality.replace(quality).is_none();
        if first {
            self.active_quality = quality;
            return;
        }

        if self.desired {
            self.pending_quality = Some(quality);
        } else {
            self.active_quality = quality;
            self.pending_quality = None;
        }
    }
}
