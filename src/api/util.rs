use std::fmt;

use url::{Url, form_urlencoded};

use crate::audio::error::RadioError;

pub const ALL_CHANNEL: &str = "all";

const STREAM_PATH: &[&str] = &["radio", "v1", "stream"];

/// Stream quality accepted by the radio endpoints.
///
/// Anything outside `low|medium|high` snaps to [`Quality::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Quality {
    fn from(value: &str) -> Self {
        normalize_quality(Some(value))
    }
}

/// Channel as sent in query parameters: the `all` sentinel becomes `""`.
pub fn normalize_channel(value: Option<&str>) -> String {
    let raw = value.map(|v| v.trim().to_lowercase()).unwrap_or_default();
    if raw.is_empty() || raw == ALL_CHANNEL {
        return String::new();
    }
    raw
}

/// Channel as persisted and displayed: blank becomes the `all` sentinel.
pub fn normalize_persisted_channel(value: &str) -> String {
    let raw = value.trim().to_lowercase();
    if raw.is_empty() {
        ALL_CHANNEL.to_string()
    } else {
        raw
    }
}

pub fn normalize_quality(value: Option<&str>) -> Quality {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("low") => Quality::Low,
        Some("high") => Quality::High,
        _ => Quality::Medium,
    }
}

pub fn channel_label(channel: &str) -> String {
    if channel == ALL_CHANNEL {
        "All".to_string()
    } else {
        channel.to_string()
    }
}

fn parse_base(base_url: &str) -> Result<Url, RadioError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| RadioError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(RadioError::InvalidBaseUrl(trimmed.to_string()));
    }
    Ok(url)
}

/// Query value with spaces as `%20` rather than the form-encoded `+`.
fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn with_path(mut url: Url, segments: &[&str]) -> Url {
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// `{base}/radio/v1/stream?channel={channel}&q={quality}`
pub fn build_stream_url(base_url: &str, channel: &str, quality: &str) -> Result<String, RadioError> {
    let mut url = with_path(parse_base(base_url)?, STREAM_PATH);
    url.set_query(Some(&format!(
        "channel={}&q={}",
        encode_query_value(&normalize_channel(Some(channel))),
        normalize_quality(Some(quality)),
    )));
    Ok(url.to_string())
}

/// Builds `{base}{path}?channel={channel}` for the metadata endpoints.
pub fn build_channel_query_url(
    base_url: &str,
    path: &str,
    channel: Option<&str>,
) -> Result<String, RadioError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut url = with_path(parse_base(base_url)?, &segments);
    url.set_query(Some(&format!(
        "channel={}",
        encode_query_value(&normalize_channel(channel))
    )));
    Ok(url.to_string())
}

/// Resolves a possibly relative art URL against the radio base URL.
pub fn to_absolute_url(raw_url: &str, base_url: &str) -> String {
    let trimmed = raw_url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return trimmed.to_string();
    }

    let base = base_url.trim().trim_end_matches('/');
    match Url::parse(base).and_then(|b| b.join(trimmed)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) if trimmed.starts_with('/') => format!("{base}{trimmed}"),
        Err(_) => format!("{base}/{trimmed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_becomes_empty_query_value() {
        assert_eq!(normalize_channel(Some("all")), "");
        assert_eq!(normalize_channel(Some(" ALL ")), "");
        assert_eq!(normalize_channel(Some("   ")), "");
        assert_eq!(normalize_channel(None), "");
        assert_eq!(normalize_channel(Some(" Chill ")), "chill");
    }

    #[test]
    fn persisted_channel_defaults_to_all() {
        assert_eq!(normalize_persisted_channel(""), "all");
        assert_eq!(normalize_persisted_channel("  "), "all");
        assert_eq!(normalize_persisted_channel(" Focus"), "focus");
    }

    #[test]
    fn unknown_quality_snaps_to_medium() {
        assert_eq!(normalize_quality(None), Quality::Medium);
        assert_eq!(normalize_quality(Some("LOW")), Quality::Low);
        assert_eq!(normalize_quality(Some(" high ")), Quality::High);
        assert_eq!(normalize_quality(Some("ultra")), Quality::Medium);
        assert_eq!(Quality::from("Medium"), Quality::Medium);
    }

    #[test]
    fn stream_url_carries_channel_and_quality() {
        let url = build_stream_url("https://radio.midori-ai.xyz", "all", "high").unwrap();
        assert_eq!(url, "https://radio.midori-ai.xyz/radio/v1/stream?channel=&q=high");

        let url = build_stream_url("https://radio.midori-ai.xyz/", " Chill ", "bogus").unwrap();
        assert_eq!(url, "https://radio.midori-ai.xyz/radio/v1/stream?channel=chill&q=medium");
    }

    #[test]
    fn spaces_in_channel_are_percent_encoded() {
        let url = build_stream_url("https://radio.midori-ai.xyz", "Late Night+Jazz", "low").unwrap();
        assert_eq!(
            url,
            "https://radio.midori-ai.xyz/radio/v1/stream?channel=late%20night%2Bjazz&q=low"
        );

        let url = build_channel_query_url("https://radio.midori-ai.xyz", "/radio/v1/current", Some("late night"))
            .unwrap();
        assert_eq!(url, "https://radio.midori-ai.xyz/radio/v1/current?channel=late%20night");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(matches!(
            build_stream_url("not a url", "all", "low"),
            Err(RadioError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn channel_query_url_uses_path() {
        let url = build_channel_query_url("https://radio.midori-ai.xyz", "/radio/v1/art", Some("focus"))
            .unwrap();
        assert_eq!(url, "https://radio.midori-ai.xyz/radio/v1/art?channel=focus");
    }

    #[test]
    fn relative_art_urls_are_resolved() {
        let base = "https://radio.midori-ai.xyz";
        assert_eq!(
            to_absolute_url("/radio/v1/art/image?channel=focus", base),
            "https://radio.midori-ai.xyz/radio/v1/art/image?channel=focus"
        );
        assert_eq!(
            to_absolute_url(" HTTPS://cdn.example.com/a.png ", base),
            "HTTPS://cdn.example.com/a.png"
        );
    }
}
