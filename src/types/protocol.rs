use serde::{Deserialize, Serialize};

/// Command sent from the client to the feed backend
///
/// Serializes to the backend's `{"action": ..., "symbol": ...}` wire shape:
///
/// ```
/// use tradefeed_rs::types::ClientCommand;
///
/// let cmd = ClientCommand::Subscribe { symbol: "EURUSD".to_string() };
/// let json = serde_json::to_string(&cmd).unwrap();
/// assert_eq!(json, r#"{"action":"subscribe","symbol":"EURUSD"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Subscribe to price updates for a symbol
    Subscribe { symbol: String },
    /// Unsubscribe from price updates for a symbol
    Unsubscribe { symbol: String },
    /// Request the current trading signals
    GetSignals,
    /// Request a portfolio snapshot
    GetPortfolio,
}

/// Auth frame sent immediately after the connection opens
///
/// The backend expects `{"type": "auth", "token": ...}` before any other
/// client traffic on authenticated feeds.
#[derive(Debug, Clone, Serialize)]
pub struct AuthFrame {
    #[serde(rename = "type")]
    kind: &'static str,
    token: String,
}

impl AuthFrame {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            kind: "auth",
            token: token.into(),
        }
    }
}

/// Raw inbound frame from the feed backend
///
/// Every server frame is a tagged object `{"type": string, "symbol"?:
/// string, "data": value}`. The `data` payload stays untyped here; listeners
/// decode it on demand via
/// [`FeedEvent::decode`](crate::types::FeedEvent::decode).
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    /// Event type used as the dispatch key
    #[serde(rename = "type")]
    pub kind: String,
    /// Symbol the frame refers to, when applicable
    #[serde(default)]
    pub symbol: Option<String>,
    /// Untyped event payload
    #[serde(default)]
    pub data: serde_json::Value,
}
