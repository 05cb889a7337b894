//! # tradefeed-rs
//!
//! A Rust client library for the real-time channel of a trading-signal
//! dashboard backend: live prices, market overviews, AI trading signals,
//! and portfolio updates over a single WebSocket session.
//!
//! The library provides:
//! - **Explicit session lifecycle**: construct a [`FeedSession`], call
//!   `connect()`/`disconnect()`; no global singletons, so independent
//!   sessions coexist (and are easy to test)
//! - **Bounded reconnection**: abnormal closes trigger fixed-interval
//!   retries up to a configured bound, then a single terminal
//!   `connection_failed` event
//! - **Listener fan-out**: register callbacks per event type; delivery is
//!   synchronous, in registration order, with per-callback panic isolation
//! - **Subscription replay**: tracked symbols are re-sent automatically
//!   after every successful (re)connect
//! - **Typed payloads on demand**: frames carry untyped JSON; decode into
//!   [`PriceQuote`](types::PriceQuote),
//!   [`TradingSignal`](types::TradingSignal), etc. when you want structure
//!
//! ## Quick start
//!
//! ```no_run
//! use tradefeed_rs::{event, FeedConfig, FeedSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = FeedSession::new(FeedConfig::from_env()?);
//!
//!     session.on(event::PRICE_UPDATE, |evt| {
//!         println!("{:?} -> {}", evt.symbol, evt.data);
//!     });
//!
//!     session.connect().await?;
//!     session.subscribe("EURUSD").await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     session.disconnect().await;
//!     Ok(())
//! }
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::FeedConfig;
pub use error::{Error, Result};
pub use session::{
    ConnectionStatus, FeedSession, ListenerHandle, ListenerRegistry, MessageRouter,
    ReconnectPolicy, RetryDecision, SubscriptionTracker,
};
pub use types::event;
pub use types::{ClientCommand, FeedEvent};
