/// Server health, as reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthPayload {
    pub status: String,
    pub warmup_active: bool,
    pub track_count: u32,
    pub cached_tracks: u32,
    pub cached_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub name: String,
    pub track_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelsPayload {
    pub channels: Vec<ChannelEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityLevel {
    pub name: String,
    pub bitrate_kbps: u32,
}

/// Snapshot of the track currently airing on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentTrack {
    pub station_label: String,
    pub channel: String,
    pub track_id: String,
    pub title: String,
    pub duration_ms: u64,
    pub position_ms: u64,
    pub started_at: String,
    pub warmup_active: bool,
    pub quality_levels: Vec<QualityLevel>,
}

/// Cover art for the track currently airing on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtEntry {
    pub channel: String,
    pub track_id: String,
    pub has_art: bool,
    pub art_url: Option<String>,
    pub mime: Option<String>,
}

/// Successful API call: payload plus the server timestamp of the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub now: String,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, now: impl Into<String>) -> Self {
        Self {
            data,
            now: now.into(),
        }
    }
}
