use std::collections::HashSet;
use std::sync::Mutex;

/// Set of topics (symbols) the session wants streamed
///
/// Lives in the session object and outlives individual connect/disconnect
/// cycles: after every successful (re)connect the full set is replayed to
/// the backend as subscribe frames. Set semantics throughout, so duplicate
/// adds and absent removes are no-ops.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    topics: Mutex<HashSet<String>>,
}

impl SubscriptionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a topic; returns `false` when it was already tracked
    pub fn add(&self, topic: &str) -> bool {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.insert(topic.to_string())
    }

    /// Stop tracking a topic; returns `false` when it was not tracked
    pub fn remove(&self, topic: &str) -> bool {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.remove(topic)
    }

    /// Whether a topic is currently tracked
    pub fn contains(&self, topic: &str) -> bool {
        let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.contains(topic)
    }

    /// Snapshot of the current topic set, in arbitrary order
    pub fn snapshot(&self) -> Vec<String> {
        let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
