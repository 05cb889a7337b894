//! Real-time feed session: connection lifecycle, bounded reconnection,
//! listener fan-out, message-type routing, and subscription replay.
//!
//! The entry point is [`FeedSession`]. The supporting pieces are exposed so
//! they can be used on their own: [`ListenerRegistry`] for callback
//! fan-out, [`MessageRouter`] for frame dispatch, [`SubscriptionTracker`]
//! for the replayed topic set, and [`ReconnectPolicy`] for the retry
//! decision logic.

mod feed;
mod listeners;
mod reconnect;
mod router;
mod status;
mod subscriptions;

pub use feed::FeedSession;
pub use listeners::{ListenerHandle, ListenerRegistry};
pub use reconnect::{ReconnectPolicy, RetryDecision};
pub use router::MessageRouter;
pub use status::ConnectionStatus;
pub use subscriptions::SubscriptionTracker;
