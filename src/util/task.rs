use std::collections::HashMap;
use tokio::task::JoinHandle;

pub const EVENTS_TASK: &str = "media_events";
pub const CHANNEL_WATCH_TASK: &str = "channel_watch";
pub const QUALITY_WATCH_TASK: &str = "quality_watch";
pub const METADATA_POLL_TASK: &str = "metadata_poll";
pub const HEALTH_POLL_TASK: &str = "health_poll";
pub const CHANNEL_POLL_TASK: &str = "channel_poll";
pub const RECONNECT_TASK: &str = "reconnect";
pub const CHANNEL_SWITCH_TASK: &str = "channel_switch";

/// Owns the session's spawned tasks.
///
/// Keyed tasks are single-flight: spawning under a key aborts the previous
/// holder. Detached tasks only share the session lifetime.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<&'static str, JoinHandle<()>>,
    detached: Vec<JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            detached: Vec::new(),
        }
    }

    pub fn spawn(&mut self, key: &'static str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key, task) {
            handle.abort();
        }
    }

    pub fn spawn_detached(&mut self, task: JoinHandle<()>) {
        self.detached.retain(|handle| !handle.is_finished());
        self.detached.push(task);
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();

        for handle in self.detached.drain(..) {
            handle.abort();
        }
    }
}
