//! Playback orchestration for the Midori AI Radio live stream.
//!
//! The crate drives a [`MediaBackend`] against the radio's stream endpoint,
//! reconnecting with backoff, sequencing channel switches with a volume fade,
//! and polling track metadata, server health, the channel catalog and cover
//! art. HTTP transport, settings persistence and rendering are supplied by the
//! embedding application through [`RadioApi`], [`SettingsStore`] and the
//! [`RadioSnapshot`] stream.

pub mod api;
pub mod audio;
pub mod event;
pub mod session;
pub mod settings;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use api::util::Quality;
pub use api::{ApiFailure, RadioApi};
pub use audio::config::RadioConfig;
pub use audio::error::RadioError;
pub use audio::state::PlaybackState;
pub use audio::traits::MediaBackend;
pub use event::events::MediaEvent;
pub use session::{RadioSession, RadioSnapshot};
pub use settings::{MemorySettings, SettingsStore};
