pub mod error;
pub mod models;
pub mod util;

use async_trait::async_trait;

pub use error::ApiFailure;
pub use models::{
    ApiResponse, ArtEntry, ChannelEntry, ChannelsPayload, CurrentTrack, HealthPayload,
    QualityLevel,
};

pub type ApiResult<T> = Result<ApiResponse<T>, ApiFailure>;

/// Read side of the radio HTTP API.
///
/// Implementations own transport, JSON envelopes and timeouts. Channel
/// arguments arrive in persisted form (`"all"` for the sentinel) and are
/// expected to be normalized with [`util::normalize_channel`] before they
/// hit the wire.
#[async_trait]
pub trait RadioApi: Send + Sync {
    async fn fetch_health(&self) -> ApiResult<HealthPayload>;

    async fn fetch_channels(&self) -> ApiResult<ChannelsPayload>;

    async fn fetch_current(&self, channel: &str) -> ApiResult<CurrentTrack>;

    async fn fetch_art(&self, channel: &str) -> ApiResult<ArtEntry>;
}
