use crate::api::util::{ALL_CHANNEL, normalize_persisted_channel};

/// Last fetched channel catalog.
///
/// The published list is derived from it: `all` first, then the fetched
/// channels and the current selection, normalized and deduplicated.
#[derive(Debug, Clone, Default)]
pub struct ChannelList {
    fetched: Vec<String>,
}

impl ChannelList {
    pub fn fetched(&self) -> &[String] {
        &self.fetched
    }

    /// Replaces the fetched set. Blank names and the sentinel are dropped.
    pub fn apply_fetched<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.fetched = ensure_all_channel(names).split_off(1);
    }

    pub fn entries(&self, selected: &str) -> Vec<String> {
        ensure_all_channel(
            self.fetched
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(selected)),
        )
    }
}

/// `all` followed by the normalized, deduplicated values.
pub fn ensure_all_channel<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut list = vec![ALL_CHANNEL.to_string()];
    for value in values {
        let normalized = normalize_persisted_channel(value);
        if !list.contains(&normalized) {
            list.push(normalized);
        }
    }
    list
}

/// Non-negative remainder, `0` for an empty modulus.
pub fn floor_mod(value: i64, modulus: usize) -> usize {
    if modulus == 0 {
        return 0;
    }
    value.rem_euclid(modulus as i64) as usize
}

fn index_of(list: &[String], channel: &str) -> usize {
    let channel = normalize_persisted_channel(channel);
    list.iter().position(|c| *c == channel).unwrap_or(0)
}

/// Circular step from `selected`; an unknown selection counts as index 0.
pub fn adjacent_channel(list: &[String], selected: &str, direction: i32) -> Option<String> {
    if list.is_empty() {
        return None;
    }
    let index = index_of(list, selected) as i64 + i64::from(direction);
    list.get(floor_mod(index, list.len())).cloned()
}

/// Previous and next channels around `selected`, excluding `selected` itself.
pub fn neighbor_channels(list: &[String], selected: &str) -> Vec<String> {
    if list.len() <= 1 {
        return Vec::new();
    }

    let selected = normalize_persisted_channel(selected);
    let index = index_of(list, &selected) as i64;
    let mut neighbors = Vec::with_capacity(2);
    for candidate in [
        &list[floor_mod(index - 1, list.len())],
        &list[floor_mod(index + 1, list.len())],
    ] {
        if *candidate != selected && !neighbors.contains(candidate) {
            neighbors.push(candidate.clone());
        }
    }
    neighbors
}
