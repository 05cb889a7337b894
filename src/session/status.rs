use serde::Serialize;

/// Connection status of a [`FeedSession`](crate::session::FeedSession)
///
/// Exactly one value is active at a time; the session's lifecycle
/// transitions are the only mutator. Every transition is also pushed to
/// listeners as a
/// [`connection_status`](crate::types::event::CONNECTION_STATUS) event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No transport; initial state and the result of `disconnect()`
    Disconnected,
    /// Transport handshake in flight
    Connecting,
    /// Transport open and streaming
    Connected,
    /// Waiting out the retry delay before attempt `attempt`
    Reconnecting { attempt: u32 },
    /// Reconnection attempts exhausted; absorbing until `connect()` is
    /// called again
    Failed,
}

impl ConnectionStatus {
    /// Whether the session currently has (or is establishing) a transport
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting { attempt } => write!(f, "reconnecting (attempt {})", attempt),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(ConnectionStatus::Connected).unwrap(),
            json!({"state": "connected"})
        );
        assert_eq!(
            serde_json::to_value(ConnectionStatus::Reconnecting { attempt: 2 }).unwrap(),
            json!({"state": "reconnecting", "attempt": 2})
        );
    }

    #[test]
    fn test_is_active() {
        assert!(ConnectionStatus::Connecting.is_active());
        assert!(ConnectionStatus::Connected.is_active());
        assert!(!ConnectionStatus::Reconnecting { attempt: 1 }.is_active());
        assert!(!ConnectionStatus::Failed.is_active());
        assert!(!ConnectionStatus::Disconnected.is_active());
    }
}
