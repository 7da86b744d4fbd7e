use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://radio.midori-ai.xyz";
pub const BASE_URL_ENV: &str = "MIDORI_RADIO_BASE_URL";

pub const DEFAULT_RECONNECT_DELAYS: [Duration; 6] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
    Duration::from_secs(16),
    Duration::from_secs(30),
];

#[derive(Debug, Clone)]
pub struct RadioConfig {
    pub base_url: String,
    pub reconnect_delays: Vec<Duration>,
    pub playing_metadata_interval: Duration,
    pub idle_metadata_interval: Duration,
    pub health_interval: Duration,
    pub channel_refresh_interval: Duration,
    pub channel_switch_fade: Duration,
    pub fade_steps: u32,
    pub art_prefetch_cooldown: Duration,
    pub normal_volume: f32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reconnect_delays: DEFAULT_RECONNECT_DELAYS.to_vec(),
            playing_metadata_interval: Duration::from_secs(5),
            idle_metadata_interval: Duration::from_secs(20),
            health_interval: Duration::from_secs(30),
            channel_refresh_interval: Duration::from_secs(60),
            channel_switch_fade: Duration::from_millis(220),
            fade_steps: 8,
            art_prefetch_cooldown: Duration::from_secs(15),
            normal_volume: 1.0,
        }
    }
}

impl RadioConfig {
    /// Defaults, with the base URL taken from the environment (or `.env`) when set.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV)
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url.trim().to_string();
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
