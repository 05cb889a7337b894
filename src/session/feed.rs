use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::session::listeners::{ListenerHandle, ListenerRegistry};
use crate::session::reconnect::{ReconnectPolicy, RetryDecision};
use crate::session::router::MessageRouter;
use crate::session::status::ConnectionStatus;
use crate::session::subscriptions::SubscriptionTracker;
use crate::types::{event, AuthFrame, ClientCommand, FeedEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Client session for the real-time trading feed
///
/// Owns the WebSocket transport and everything that outlives it: registered
/// listeners and tracked subscriptions survive disconnects and are
/// replayed/retained across reconnects. Construct one explicitly and pass
/// it to whatever layer consumes the feed; independent sessions do not
/// share state.
///
/// On an abnormal close the session retries `connect` up to the configured
/// bound with a fixed delay between attempts, then emits a single
/// [`connection_failed`](crate::types::event::CONNECTION_FAILED) event and
/// stays [`Failed`](ConnectionStatus::Failed) until [`connect`] is called
/// again. [`disconnect`] cancels any pending retry.
///
/// [`connect`]: FeedSession::connect
/// [`disconnect`]: FeedSession::disconnect
///
/// # Example
///
/// ```no_run
/// use tradefeed_rs::{event, FeedConfig, FeedSession};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let session = FeedSession::new(FeedConfig::default());
///
///     session.on(event::PRICE_UPDATE, |evt| {
///         println!("{:?}: {}", evt.symbol, evt.data);
///     });
///
///     session.connect().await?;
///     session.subscribe("EURUSD").await?;
///
///     tokio::signal::ctrl_c().await?;
///     session.disconnect().await;
///     Ok(())
/// }
/// ```
pub struct FeedSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: FeedConfig,
    status: StdMutex<ConnectionStatus>,
    listeners: ListenerRegistry,
    router: MessageRouter,
    subscriptions: SubscriptionTracker,
    writer: AsyncMutex<Option<WsSink>>,
    reader_task: StdMutex<Option<JoinHandle<()>>>,
    retry_task: StdMutex<Option<JoinHandle<()>>>,
    /// Bumped by `disconnect()`; tasks from an older epoch stand down
    epoch: AtomicU64,
}

impl FeedSession {
    /// Create a session with the given configuration
    ///
    /// No connection is made until [`connect`](Self::connect) is called.
    pub fn new(config: FeedConfig) -> Self {
        let listeners = ListenerRegistry::new();
        let router = MessageRouter::new(listeners.clone());
        Self {
            inner: Arc::new(SessionInner {
                config,
                status: StdMutex::new(ConnectionStatus::Disconnected),
                listeners,
                router,
                subscriptions: SubscriptionTracker::new(),
                writer: AsyncMutex::new(None),
                reader_task: StdMutex::new(None),
                retry_task: StdMutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Create a session configured from environment variables
    ///
    /// See [`FeedConfig::from_env`] for the recognized variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(FeedConfig::from_env()?))
    }

    /// Current connection status
    pub fn status(&self) -> ConnectionStatus {
        self.inner.status()
    }

    /// Register a listener for an event type
    ///
    /// Event types are the server frame `type` strings (see
    /// [`event`](crate::types::event)) plus the locally emitted
    /// [`connection_status`](crate::types::event::CONNECTION_STATUS) and
    /// [`connection_failed`](crate::types::event::CONNECTION_FAILED).
    /// Listeners persist across reconnects until removed.
    pub fn on(
        &self,
        event: impl Into<String>,
        callback: impl Fn(&FeedEvent) + Send + Sync + 'static,
    ) -> ListenerHandle {
        self.inner.listeners.on(event, callback)
    }

    /// Remove a previously registered listener
    pub fn off(&self, handle: &ListenerHandle) {
        self.inner.listeners.off(handle);
    }

    /// Install a diagnostic hook for frames no listener is registered for
    pub fn set_unhandled_hook(
        &self,
        hook: impl Fn(&str, &FeedEvent) + Send + Sync + 'static,
    ) {
        self.inner.router.set_unhandled_hook(hook);
    }

    /// Connect to the feed backend
    ///
    /// Resolves once the transport is open, the auth frame (if configured)
    /// is sent, and tracked subscriptions have been replayed. A no-op
    /// returning `Ok(())` while already connecting or connected, so
    /// overlapping calls cannot leak a second transport. Calling this while
    /// a retry timer is pending cancels the timer and connects immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`] when the transport cannot be
    /// established; status is then [`Failed`](ConnectionStatus::Failed) and
    /// no automatic retry is scheduled.
    pub async fn connect(&self) -> Result<()> {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        if !self.inner.try_begin_connect() {
            return Ok(());
        }
        self.inner.cancel_retry();

        match SessionInner::establish(&self.inner, epoch).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // a disconnect() that landed mid-handshake wins over the
                // failure state
                if self.inner.epoch.load(Ordering::SeqCst) == epoch {
                    self.inner.set_status(ConnectionStatus::Failed);
                } else {
                    self.inner.set_status(ConnectionStatus::Disconnected);
                }
                Err(e)
            }
        }
    }

    /// Tear down the session
    ///
    /// Cancels any pending reconnection timer, stops the reader, closes the
    /// transport, and sets status to
    /// [`Disconnected`](ConnectionStatus::Disconnected). Listeners and
    /// tracked subscriptions are kept; a later [`connect`](Self::connect)
    /// replays them.
    pub async fn disconnect(&self) {
        let inner = &self.inner;
        inner.epoch.fetch_add(1, Ordering::SeqCst);
        inner.cancel_retry();
        if let Some(task) = take_task(&inner.reader_task) {
            task.abort();
        }
        inner.set_status(ConnectionStatus::Disconnected);
        if let Some(mut sink) = inner.writer.lock().await.take() {
            let _ = sink.send(Message::Close(None)).await;
        }
        info!("disconnected from {}", inner.config.url);
    }

    /// Subscribe to price updates for a symbol
    ///
    /// Always updates the tracked set; sends a subscribe frame only when a
    /// transport is up. Subscribing to an already tracked symbol is a no-op
    /// and sends nothing. Tracked symbols are replayed after every
    /// successful (re)connect.
    pub async fn subscribe(&self, symbol: &str) -> Result<()> {
        if !self.inner.subscriptions.add(symbol) {
            return Ok(());
        }
        self.inner
            .try_send(&ClientCommand::Subscribe {
                symbol: symbol.to_string(),
            })
            .await
            .map(|_| ())
    }

    /// Unsubscribe from price updates for a symbol
    ///
    /// Removing a symbol that is not tracked is a no-op and sends nothing.
    pub async fn unsubscribe(&self, symbol: &str) -> Result<()> {
        if !self.inner.subscriptions.remove(symbol) {
            return Ok(());
        }
        self.inner
            .try_send(&ClientCommand::Unsubscribe {
                symbol: symbol.to_string(),
            })
            .await
            .map(|_| ())
    }

    /// Ask the backend for the current trading signals
    ///
    /// The response arrives as a
    /// [`trading_signals`](crate::types::event::TRADING_SIGNALS) event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] when no transport is up.
    pub async fn request_signals(&self) -> Result<()> {
        if self.inner.try_send(&ClientCommand::GetSignals).await? {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// Ask the backend for a portfolio snapshot
    ///
    /// The response arrives as a
    /// [`portfolio_update`](crate::types::event::PORTFOLIO_UPDATE) event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] when no transport is up.
    pub async fn request_portfolio(&self) -> Result<()> {
        if self.inner.try_send(&ClientCommand::GetPortfolio).await? {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// Currently tracked subscriptions, in arbitrary order
    pub fn subscriptions(&self) -> Vec<String> {
        self.inner.subscriptions.snapshot()
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.cancel_retry();
        if let Some(task) = take_task(&self.inner.reader_task) {
            task.abort();
        }
    }
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession")
            .field("url", &self.inner.config.url)
            .field("status", &self.inner.status())
            .finish()
    }
}

fn take_task(slot: &StdMutex<Option<JoinHandle<()>>>) -> Option<JoinHandle<()>> {
    slot.lock().unwrap_or_else(|e| e.into_inner()).take()
}

impl SessionInner {
    fn status(&self) -> ConnectionStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a status transition and push it to listeners
    fn set_status(&self, next: ConnectionStatus) {
        {
            let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if *status == next {
                return;
            }
            *status = next;
        }
        self.emit_status(next);
    }

    /// Claim the right to establish a transport
    ///
    /// Checks for an active connection and moves to
    /// [`ConnectionStatus::Connecting`] under a single lock acquisition, so
    /// overlapping `connect()` calls cannot both pass the guard and open two
    /// transports. Returns `false` when another caller already holds the
    /// claim or the session is connected.
    fn try_begin_connect(&self) -> bool {
        {
            let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if status.is_active() {
                return false;
            }
            *status = ConnectionStatus::Connecting;
        }
        self.emit_status(ConnectionStatus::Connecting);
        true
    }

    fn emit_status(&self, status: ConnectionStatus) {
        let data = serde_json::to_value(status).unwrap_or(serde_json::Value::Null);
        self.listeners
            .emit(event::CONNECTION_STATUS, &FeedEvent::new(None, data));
    }

    fn cancel_retry(&self) {
        if let Some(task) = take_task(&self.retry_task) {
            task.abort();
        }
    }

    async fn try_send(&self, command: &ClientCommand) -> Result<bool> {
        let mut writer = self.writer.lock().await;
        match writer.as_mut() {
            Some(sink) => {
                let frame = serde_json::to_string(command)?;
                sink.send(Message::Text(frame)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Open the transport, authenticate, replay subscriptions, start reading
    ///
    /// The caller must hold the `Connecting` claim from
    /// [`try_begin_connect`](Self::try_begin_connect).
    async fn establish(inner: &Arc<SessionInner>, epoch: u64) -> Result<()> {
        info!("connecting to {}", inner.config.url);

        let (ws_stream, _) = connect_async(&inner.config.url).await?;
        let (mut sink, source) = ws_stream.split();

        if let Some(token) = &inner.config.auth_token {
            let frame = serde_json::to_string(&AuthFrame::new(token.clone()))?;
            sink.send(Message::Text(frame)).await?;
        }

        for symbol in inner.subscriptions.snapshot() {
            let frame = serde_json::to_string(&ClientCommand::Subscribe { symbol })?;
            sink.send(Message::Text(frame)).await?;
        }

        if inner.epoch.load(Ordering::SeqCst) != epoch {
            // disconnect() won the race while the handshake was in flight
            let _ = sink.send(Message::Close(None)).await;
            return Err(Error::ConnectionClosed);
        }

        *inner.writer.lock().await = Some(sink);
        inner.set_status(ConnectionStatus::Connected);
        info!("connected to {}", inner.config.url);

        let task = tokio::spawn(Self::read_loop(Arc::clone(inner), source, epoch));
        *inner.reader_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
        Ok(())
    }

    /// Deliver frames in arrival order until the transport goes away
    async fn read_loop(inner: Arc<SessionInner>, mut source: WsSource, epoch: u64) {
        loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => inner.router.route(&text),
                Some(Ok(Message::Close(_))) => {
                    info!("connection closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("transport error: {}", e);
                    break;
                }
                None => {
                    info!("stream ended");
                    break;
                }
            }
        }

        // only an abnormal close of the current connection starts the retry
        // cycle; disconnect() bumps the epoch before aborting this task
        if inner.epoch.load(Ordering::SeqCst) != epoch
            || inner.status() != ConnectionStatus::Connected
        {
            return;
        }

        inner.writer.lock().await.take();
        Self::schedule_reconnect(inner, epoch);
    }

    /// Spawn the retry task: fixed-interval attempts up to the bound, then
    /// a single terminal `connection_failed` event
    fn schedule_reconnect(inner: Arc<SessionInner>, epoch: u64) {
        let policy = ReconnectPolicy::new(
            inner.config.max_reconnect_attempts,
            inner.config.reconnect_interval,
        );
        let task_inner = Arc::clone(&inner);
        let task = tokio::spawn(async move {
            let inner = task_inner;
            let mut attempt = 1u32;
            let mut last_error = Error::ConnectionClosed.to_string();
            loop {
                if inner.epoch.load(Ordering::SeqCst) != epoch {
                    return;
                }
                match policy.decide(attempt) {
                    RetryDecision::GiveUp => {
                        let reason = Error::ReconnectFailed {
                            attempts: policy.max_attempts(),
                            last_error,
                        }
                        .to_string();
                        error!("{}", reason);
                        inner.set_status(ConnectionStatus::Failed);
                        inner.listeners.emit(
                            event::CONNECTION_FAILED,
                            &FeedEvent::new(None, json!({ "reason": reason })),
                        );
                        return;
                    }
                    RetryDecision::RetryAfter(delay) => {
                        inner.set_status(ConnectionStatus::Reconnecting { attempt });
                        info!(
                            "reconnecting in {:?} (attempt {} of {})",
                            delay,
                            attempt,
                            policy.max_attempts()
                        );
                        tokio::time::sleep(delay).await;
                        if inner.epoch.load(Ordering::SeqCst) != epoch {
                            return;
                        }
                        if !inner.try_begin_connect() {
                            // an explicit connect() superseded this retry
                            return;
                        }
                        match SessionInner::establish(&inner, epoch).await {
                            Ok(()) => return,
                            Err(e) => {
                                if inner.epoch.load(Ordering::SeqCst) != epoch {
                                    inner.set_status(ConnectionStatus::Disconnected);
                                    return;
                                }
                                warn!("reconnect attempt {} failed: {}", attempt, e);
                                last_error = e.to_string();
                                attempt += 1;
                            }
                        }
                    }
                }
            }
        });
        *inner.retry_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }
}
