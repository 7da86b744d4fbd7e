use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::Shared;
use super::channels::neighbor_channels;
use crate::api::ArtEntry;
use crate::api::util::{normalize_persisted_channel, to_absolute_url};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Cooldown,
    Cached,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    Skip(SkipReason),
    Fetch(u64),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: u64,
    surface_errors: bool,
}

/// Per-channel art, the in-flight fetch locks and last fetch times.
#[derive(Debug, Default)]
pub struct ArtCache {
    entries: HashMap<String, ArtEntry>,
    in_flight: HashMap<String, InFlight>,
    fetched_at: HashMap<String, Instant>,
    next_token: u64,
}

impl ArtCache {
    pub fn get(&self, channel: &str) -> Option<&ArtEntry> {
        self.entries.get(channel)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_in_flight(&self, channel: &str) -> bool {
        self.in_flight.contains_key(channel)
    }

    fn within_cooldown(&self, channel: &str, now: Instant, cooldown: Duration) -> bool {
        self.fetched_at
            .get(channel)
            .is_some_and(|at| now.saturating_duration_since(*at) < cooldown)
    }

    /// Decides whether a fetch may start and takes the channel's lock if so.
    ///
    /// A user-facing call that finds a prefetch already running marks that
    /// flight as user-facing so its failure is surfaced.
    pub fn begin_fetch(
        &mut self,
        channel: &str,
        force: bool,
        prefetch: bool,
        now: Instant,
        cooldown: Duration,
    ) -> FetchDecision {
        let cached = self.entries.contains_key(channel);
        if prefetch && cached && self.within_cooldown(channel, now, cooldown) {
            return FetchDecision::Skip(SkipReason::Cooldown);
        }
        if !prefetch && !force && cached {
            return FetchDecision::Skip(SkipReason::Cached);
        }
        if let Some(flight) = self.in_flight.get_mut(channel) {
            flight.surface_errors |= !prefetch;
            return FetchDecision::Skip(SkipReason::InFlight);
        }

        self.next_token += 1;
        self.in_flight.insert(
            channel.to_string(),
            InFlight {
                token: self.next_token,
                surface_errors: !prefetch,
            },
        );
        FetchDecision::Fetch(self.next_token)
    }

    pub fn complete(&mut self, channel: &str, entry: ArtEntry, now: Instant) {
        self.entries.insert(channel.to_string(), entry);
        self.fetched_at.insert(channel.to_string(), now);
    }

    pub fn surfaces_errors(&self, channel: &str, token: u64) -> bool {
        self.in_flight
            .get(channel)
            .is_some_and(|flight| flight.token == token && flight.surface_errors)
    }

    /// Drops the lock only if it still belongs to the fetch holding `token`.
    pub fn release(&mut self, channel: &str, token: u64) {
        if self
            .in_flight
            .get(channel)
            .is_some_and(|flight| flight.token == token)
        {
            self.in_flight.remove(channel);
        }
    }

    pub fn prune(&mut self, allowed: &[String]) {
        let keep = |channel: &String| allowed.contains(channel);
        self.entries.retain(|channel, _| keep(channel));
        self.in_flight.retain(|channel, _| keep(channel));
        self.fetched_at.retain(|channel, _| keep(channel));
    }
}

/// Releases the channel's in-flight lock on every exit path, cancellation included.
struct InFlightGuard<'a> {
    shared: &'a Shared,
    channel: &'a str,
    token: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.shared.lock().art.release(self.channel, self.token);
    }
}

impl Shared {
    pub(crate) fn publish_cached_art(&self, channel: &str) {
        let channel = normalize_persisted_channel(channel);
        let state = self.lock();
        if let Some(cached) = state.art.get(&channel) {
            self.published.set_art(Some(cached.clone()));
        }
    }

    pub(crate) async fn fetch_art_for_channel(&self, channel: &str, force: bool, prefetch: bool) {
        let channel = normalize_persisted_channel(channel);
        let token = {
            let mut state = self.lock();
            if channel == self.selected_channel()
                && let Some(cached) = state.art.get(&channel)
            {
                self.published.set_art(Some(cached.clone()));
            }

            let decision = state.art.begin_fetch(
                &channel,
                force,
                prefetch,
                Instant::now(),
                self.config.art_prefetch_cooldown,
            );
            match decision {
                FetchDecision::Fetch(token) => token,
                FetchDecision::Skip(reason) => {
                    debug!(channel = channel.as_str(), ?reason, prefetch, "art_fetch_skipped");
                    return;
                }
            }
        };

        let _guard = InFlightGuard {
            shared: self,
            channel: &channel,
            token,
        };

        let result = self.api.fetch_art(&channel).await;
        let still_selected = channel == self.selected_channel();

        match result {
            Ok(response) => {
                let mut entry = response.data;
                entry.art_url = entry
                    .art_url
                    .map(|url| to_absolute_url(&url, &self.config.base_url));
                debug!(
                    channel = channel.as_str(),
                    track_id = entry.track_id.as_str(),
                    prefetch,
                    "art_fetched"
                );

                let mut state = self.lock();
                state.art.complete(&channel, entry.clone(), Instant::now());
                if still_selected {
                    self.published.set_art(Some(entry));
                }
            }
            Err(failure) => {
                let surface = self.lock().art.surfaces_errors(&channel, token);
                if surface && still_selected {
                    warn!(channel = channel.as_str(), error = %failure, "art_fetch_failed");
                    self.published.set_last_error(Some(failure.to_string()));
                } else {
                    debug!(channel = channel.as_str(), error = %failure, "art_prefetch_failed");
                }
            }
        }
    }

    pub(crate) async fn refresh_selected_and_adjacent_art(&self, selected: &str, force_selected: bool) {
        let selected = normalize_persisted_channel(selected);
        self.fetch_art_for_channel(&selected, force_selected, false)
            .await;

        let neighbors = {
            let state = self.lock();
            let list = state.channels.entries(&self.selected_channel());
            neighbor_channels(&list, &selected)
        };
        for channel in neighbors {
            self.fetch_art_for_channel(&channel, false, true).await;
        }
    }
}
