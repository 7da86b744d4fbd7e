use thiserror::Error;

/// Tagged failure returned by a [`RadioApi`](super::RadioApi) call.
///
/// The `Display` output is what gets surfaced as `last_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    #[error("{0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    InvalidEnvelope(String),

    #[error("Unsupported API version: {0}")]
    UnsupportedVersion(String),

    #[error("{code}: {message}")]
    Upstream {
        status: u16,
        code: String,
        message: String,
        now: Option<String>,
    },

    #[error("{0}")]
    EmptyPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_text_matches_surface_format() {
        let http = ApiFailure::Http {
            status: 503,
            message: "Empty response body".into(),
        };
        assert_eq!(http.to_string(), "HTTP 503: Empty response body");

        let upstream = ApiFailure::Upstream {
            status: 500,
            code: "RADIO_ERROR".into(),
            message: "Radio request failed".into(),
            now: None,
        };
        assert_eq!(upstream.to_string(), "RADIO_ERROR: Radio request failed");

        assert_eq!(
            ApiFailure::UnsupportedVersion("radio.v2".into()).to_string(),
            "Unsupported API version: radio.v2"
        );
        assert_eq!(
            ApiFailure::Network("connection reset".into()).to_string(),
            "connection reset"
        );
    }
}
