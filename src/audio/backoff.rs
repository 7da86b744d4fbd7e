use std::time::Duration;

use super::config::DEFAULT_RECONNECT_DELAYS;

/// Reconnect attempt counter over a fixed, ascending delay table.
///
/// Attempts are 1-based; the table index saturates at its last entry.
#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    delays: Vec<Duration>,
    attempt: u32,
}

impl ReconnectBackoff {
    pub fn new(delays: Vec<Duration>) -> Self {
        let delays = if delays.is_empty() {
            DEFAULT_RECONNECT_DELAYS.to_vec()
        } else {
            delays
        };
        Self { delays, attempt: 0 }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Records a failure and returns `(attempt, delay)` for the next reconnect.
    pub fn next_failure(&mut self) -> (u32, Duration) {
        self.attempt = self.attempt.saturating_add(1);
        (self.attempt, self.delay_for(self.attempt))
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let last = self.delays.len() - 1;
        let index = (attempt.saturating_sub(1) as usize).min(last);
        self.delays[index]
    }
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAYS.to_vec())
    }
}
