use thiserror::Error;

use crate::api::ApiFailure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RadioError {
    #[error(transparent)]
    Api(#[from] ApiFailure),

    /// Backend failure; the message is surfaced as-is.
    #[error("{0}")]
    Playback(String),

    #[error("Invalid radio base URL: {0}")]
    InvalidBaseUrl(String),
}
