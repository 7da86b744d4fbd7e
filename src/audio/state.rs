use std::time::Duration;

/// Connection lifecycle as published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Connecting,
    SwitchingChannel(String),
    Playing,
    Reconnecting { attempt: u32, next_delay: Duration },
    Unavailable(String),
    Stopped,
}
