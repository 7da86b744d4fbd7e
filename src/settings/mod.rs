use async_trait::async_trait;
use tokio::sync::watch;

use crate::api::util::{Quality, normalize_persisted_channel, normalize_quality};
use crate::audio::error::RadioError;

/// Persisted listener preferences, observable for changes.
///
/// Receivers must replay the current value to new subscribers, which
/// `tokio::sync::watch` does.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    fn channel(&self) -> watch::Receiver<String>;

    fn quality(&self) -> watch::Receiver<Quality>;

    async fn set_channel(&self, value: &str) -> Result<(), RadioError>;

    async fn set_quality(&self, value: &str) -> Result<(), RadioError>;
}

/// Non-persistent store, used headless and in tests.
pub struct MemorySettings {
    channel: watch::Sender<String>,
    quality: watch::Sender<Quality>,
}

impl MemorySettings {
    pub fn new(channel: &str, quality: &str) -> Self {
        let (channel, _) = watch::channel(normalize_persisted_channel(channel));
        let (quality, _) = watch::channel(normalize_quality(Some(quality)));
        Self { channel, quality }
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new("all", "medium")
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    fn channel(&self) -> watch::Receiver<String> {
        self.channel.subscribe()
    }

    fn quality(&self) -> watch::Receiver<Quality> {
        self.quality.subscribe()
    }

    async fn set_channel(&self, value: &str) -> Result<(), RadioError> {
        let normalized = normalize_persisted_channel(value);
        self.channel.send_if_modified(|current| {
            if *current == normalized {
                return false;
            }
            *current = normalized;
            true
        });
        Ok(())
    }

    async fn set_quality(&self, value: &str) -> Result<(), RadioError> {
        let normalized = normalize_quality(Some(value));
        self.quality.send_if_modified(|current| {
            if *current == normalized {
                return false;
            }
            *current = normalized;
            true
        });
        Ok(())
    }
}
