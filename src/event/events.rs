use crate::audio::error::RadioError;

/// Lifecycle notifications emitted by a [`MediaBackend`](crate::audio::traits::MediaBackend).
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    BecamePlaying,
    PlaybackEnded,
    Error(String),
    PlayWhenReadyChanged(bool),
}

impl MediaEvent {
    /// The playback failure carried by an ended or errored stream.
    pub fn failure(&self) -> Option<RadioError> {
        let reason = match self {
            MediaEvent::PlaybackEnded => "Stream ended",
            MediaEvent::Error(message) if message.trim().is_empty() => "Playback error",
            MediaEvent::Error(message) => message.trim(),
            _ => return None,
        };
        Some(RadioError::Playback(reason.to_string()))
    }
}
