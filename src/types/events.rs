use serde::de::DeserializeOwned;

use crate::error::Result;

/// Event names emitted by the feed backend
///
/// Listeners register under these exact strings. The router dispatches on
/// whatever `type` the server sends, so the constants are a convenience,
/// not a closed set.
pub mod event {
    /// Per-symbol price tick
    pub const PRICE_UPDATE: &str = "price_update";
    /// Snapshot of all streamed symbols
    pub const MARKET_OVERVIEW: &str = "market_overview";
    /// Batch of AI trading signals (response to `get_signals`)
    pub const TRADING_SIGNALS: &str = "trading_signals";
    /// Portfolio performance snapshot
    pub const PORTFOLIO_UPDATE: &str = "portfolio_update";
    /// Status change for an active signal
    pub const SIGNAL_UPDATE: &str = "signal_update";
    /// Account balance/equity change
    pub const ACCOUNT_UPDATE: &str = "account_update";
    /// Trading-bot state change
    pub const BOT_STATUS: &str = "bot_status";
    /// Newly generated live signal
    pub const REALTIME_SIGNAL: &str = "realtime_signal";
    /// Currently active signals (sent on connect)
    pub const ACTIVE_SIGNALS: &str = "active_signals";
    /// Signal generation statistics (sent on connect)
    pub const SIGNAL_STATISTICS: &str = "signal_statistics";

    /// Emitted locally on every connection status transition
    pub const CONNECTION_STATUS: &str = "connection_status";
    /// Emitted locally once when reconnection attempts are exhausted
    pub const CONNECTION_FAILED: &str = "connection_failed";
}

/// Payload delivered to listeners
///
/// Carries the frame's `symbol` (when present) and its untyped `data`
/// value. Constructed per inbound frame and consumed synchronously by
/// dispatch; nothing is retained after the listeners return.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    /// Symbol the event refers to, when applicable
    pub symbol: Option<String>,
    /// Untyped event payload
    pub data: serde_json::Value,
}

impl FeedEvent {
    pub fn new(symbol: Option<String>, data: serde_json::Value) -> Self {
        Self { symbol, data }
    }

    /// Decode the payload into a typed struct
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use tradefeed_rs::types::{FeedEvent, PriceQuote};
    ///
    /// let event = FeedEvent::new(
    ///     Some("EURUSD".to_string()),
    ///     json!({
    ///         "bid": 1.0890,
    ///         "ask": 1.0892,
    ///         "spread": 0.0002,
    ///         "timestamp": "2024-06-01T12:00:00.000000",
    ///         "volume": 250
    ///     }),
    /// );
    /// let quote: PriceQuote = event.decode().unwrap();
    /// assert_eq!(quote.volume, 250);
    /// ```
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(Into::into)
    }
}
