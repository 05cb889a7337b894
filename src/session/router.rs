use std::sync::Mutex;

use tracing::{debug, warn};

use crate::session::listeners::ListenerRegistry;
use crate::types::{FeedEvent, RawFrame};

type UnhandledHook = Box<dyn Fn(&str, &FeedEvent) + Send + Sync + 'static>;

/// Parses inbound text frames and dispatches them to listeners by `type`
///
/// Malformed frames are logged and dropped; they never surface as errors
/// and never reach a listener. Frames whose `type` has no registered
/// listener are dropped too, observable through the optional
/// unhandled-message hook.
pub struct MessageRouter {
    listeners: ListenerRegistry,
    unhandled: Mutex<Option<UnhandledHook>>,
}

impl MessageRouter {
    pub fn new(listeners: ListenerRegistry) -> Self {
        Self {
            listeners,
            unhandled: Mutex::new(None),
        }
    }

    /// Install a diagnostic hook for frames nobody listens to
    ///
    /// The hook receives the frame's `type` and its payload. Replaces any
    /// previously installed hook.
    pub fn set_unhandled_hook(
        &self,
        hook: impl Fn(&str, &FeedEvent) + Send + Sync + 'static,
    ) {
        let mut slot = self.unhandled.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Box::new(hook));
    }

    /// Route one raw text frame
    pub fn route(&self, raw: &str) {
        let frame: RawFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("dropping malformed frame: {}", e);
                return;
            }
        };

        let event = FeedEvent::new(frame.symbol, frame.data);
        let delivered = self.listeners.emit(&frame.kind, &event);
        if delivered == 0 {
            debug!("no listener for '{}' frame", frame.kind);
            let slot = self.unhandled.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hook) = slot.as_ref() {
                hook(&frame.kind, &event);
            }
        }
    }
}

impl std::fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("listeners", &self.listeners)
            .finish()
    }
}
