use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use tracing::error;

use crate::types::FeedEvent;

type Callback = dyn Fn(&FeedEvent) + Send + Sync + 'static;

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    listeners: HashMap<String, Vec<(u64, Arc<Callback>)>>,
}

/// Event-name to callback fan-out
///
/// Callbacks registered under an event name are invoked synchronously, in
/// registration order, on the emitting task. A callback that panics is
/// caught and logged without affecting the remaining callbacks or the
/// connection.
///
/// `emit` operates on a snapshot taken when it starts: callbacks registered
/// or removed while an emit is running take effect from the next emit.
///
/// Cloning the registry is cheap and shares the underlying listener table,
/// so it can be handed to the session's reader task while the caller keeps
/// registering listeners.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    state: Arc<Mutex<RegistryState>>,
}

/// Handle returned by [`ListenerRegistry::on`]
///
/// Identifies exactly the callback registered by that call, so it can later
/// be removed with [`ListenerHandle::unsubscribe`] or
/// [`ListenerRegistry::off`] regardless of how many other callbacks share
/// the event name.
pub struct ListenerHandle {
    registry: Weak<Mutex<RegistryState>>,
    event: String,
    id: u64,
}

impl ListenerHandle {
    /// Remove the callback this handle refers to
    ///
    /// A no-op when the callback was already removed or the registry is
    /// gone.
    pub fn unsubscribe(self) {
        if let Some(state) = self.registry.upgrade() {
            remove_listener(&state, &self.event, self.id);
        }
    }

    /// Event name this handle was registered under
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}

fn remove_listener(state: &Mutex<RegistryState>, event: &str, id: u64) {
    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(entries) = state.listeners.get_mut(event) {
        entries.retain(|(entry_id, _)| *entry_id != id);
        if entries.is_empty() {
            state.listeners.remove(event);
        }
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event name
    ///
    /// Returns a [`ListenerHandle`] that removes exactly this callback.
    pub fn on(
        &self,
        event: impl Into<String>,
        callback: impl Fn(&FeedEvent) + Send + Sync + 'static,
    ) -> ListenerHandle {
        let event = event.into();
        let id = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let id = state.next_id;
            state.next_id += 1;
            state
                .listeners
                .entry(event.clone())
                .or_default()
                .push((id, Arc::new(callback)));
            id
        };
        ListenerHandle {
            registry: Arc::downgrade(&self.state),
            event,
            id,
        }
    }

    /// Remove the callback a handle refers to, keeping the handle around
    ///
    /// Direct form of [`ListenerHandle::unsubscribe`].
    pub fn off(&self, handle: &ListenerHandle) {
        remove_listener(&self.state, &handle.event, handle.id);
    }

    /// Invoke every callback registered for `event`, in registration order
    ///
    /// Returns the number of callbacks invoked. Panicking callbacks are
    /// caught and logged; delivery to the rest continues.
    pub fn emit(&self, event: &str, payload: &FeedEvent) -> usize {
        let snapshot: Vec<Arc<Callback>> = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match state.listeners.get(event) {
                Some(entries) => entries.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
                None => return 0,
            }
        };

        for callback in &snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(payload))).is_err() {
                error!("listener for '{}' panicked; continuing delivery", event);
            }
        }
        snapshot.len()
    }

    /// Number of callbacks currently registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.listeners.get(event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("ListenerRegistry")
            .field("events", &state.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload() -> FeedEvent {
        FeedEvent::new(None, json!({"n": 1}))
    }

    #[test]
    fn test_emit_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            registry.on("tick", move |_| order.lock().unwrap().push(tag));
        }

        assert_eq!(registry.emit("tick", &payload()), 3);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_each_listener_invoked_exactly_once_per_emit() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        registry.on("tick", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.emit("tick", &payload());
        registry.emit("tick", &payload());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_callback() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h1 = {
            let hits = Arc::clone(&hits);
            registry.on("tick", move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        {
            let hits = Arc::clone(&hits);
            registry.on("tick", move |_| {
                hits.fetch_add(10, Ordering::SeqCst);
            });
        }

        h1.unsubscribe();
        registry.emit("tick", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(registry.listener_count("tick"), 1);
    }

    #[test]
    fn test_off_is_idempotent() {
        let registry = ListenerRegistry::new();
        let handle = registry.on("tick", |_| {});
        registry.off(&handle);
        registry.off(&handle);
        assert_eq!(registry.listener_count("tick"), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let registry = ListenerRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));

        registry.on("tick", |_| panic!("listener bug"));
        {
            let delivered = Arc::clone(&delivered);
            registry.on("tick", move |_| {
                delivered.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.emit("tick", &payload());
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_during_emit_not_seen_by_that_emit() {
        let registry = ListenerRegistry::new();
        let late_hits = Arc::new(AtomicUsize::new(0));

        let reg = registry.clone();
        let late = Arc::clone(&late_hits);
        registry.on("tick", move |_| {
            let late = Arc::clone(&late);
            reg.on("tick", move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            });
        });

        assert_eq!(registry.emit("tick", &payload()), 1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        // the next emit sees everything registered so far
        registry.emit("tick", &payload());
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_with_no_listeners_returns_zero() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.emit("nobody_home", &payload()), 0);
    }
}
