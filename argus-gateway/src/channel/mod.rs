//! Event channel: one upstream connection fanned out to named subscribers.
//!
//! [`EventChannel`] is a cheap, clonable handle. Clones share the same
//! registry, connection state and driver task, so a process normally builds
//! one channel at start-up and passes clones to every consumer.
//!
//! Fan-out is serialised by a reentrant dispatch lock: each event reaches
//! every subscriber registered when its fan-out started before the next
//! event is delivered. Callbacks may call back into the channel.

mod driver;
mod registry;

use crate::config::ChannelConfig;
use crate::event::Event;
use crate::state::{ChannelStats, ConnectionState, Counters, InternalState};
use crate::transport::{Frame, Transport, transport_from_config};
use argus_telemetry::spans::dispatch_span;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use registry::SubscriberRegistry;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Callback invoked for every event fanned out by the channel.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handles owned by the running driver task.
struct Session {
    token: CancellationToken,
    wake: Arc<Notify>,
}

pub(crate) struct Inner {
    config: ChannelConfig,
    transport: Arc<dyn Transport>,
    registry: SubscriberRegistry,
    state: RwLock<InternalState>,
    dispatch_lock: ReentrantMutex<()>,
    session: Mutex<Option<Session>>,
    counters: Counters,
}

/// Shared pub/sub channel for feed events.
///
/// # Example
///
/// ```no_run
/// use argus_gateway::{ChannelConfig, Event, EventChannel};
///
/// # async fn run() {
/// let channel = EventChannel::new(ChannelConfig::builder().url("ws://localhost:8000/ws/alerts").build());
/// let handle = channel.subscribe("audit", |event: &Event| {
///     println!("{}", event.kind());
/// });
/// channel.connect();
/// // ...
/// handle.unsubscribe();
/// channel.disconnect();
/// # }
/// ```
#[derive(Clone)]
pub struct EventChannel {
    inner: Arc<Inner>,
}

impl EventChannel {
    /// Creates a channel using the transport selected by `config.mode`.
    #[must_use]
    pub fn new(config: ChannelConfig) -> Self {
        let transport = transport_from_config(&config);
        Self::with_transport(config, transport)
    }

    /// Creates a channel over an explicit transport.
    #[must_use]
    pub fn with_transport(config: ChannelConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                registry: SubscriberRegistry::new(),
                state: RwLock::new(InternalState::new()),
                dispatch_lock: ReentrantMutex::new(()),
                session: Mutex::new(None),
                counters: Counters::default(),
            }),
        }
    }

    /// Returns the channel configuration.
    #[must_use]
    pub fn config(&self) -> &ChannelConfig {
        &self.inner.config
    }

    /// Registers `callback` under `id`, replacing any callback already
    /// registered under that id.
    ///
    /// The callback receives every event fanned out after this call returns.
    pub fn subscribe<F>(&self, id: impl Into<String>, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = id.into();
        let (token, replaced) = self.inner.registry.insert(&id, Arc::new(callback));
        if replaced {
            debug!(subscriber = %id, "Subscriber replaced");
        } else {
            debug!(subscriber = %id, "Subscriber registered");
        }

        SubscriptionHandle {
            id,
            token,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Like [`subscribe`](Self::subscribe), then hands the current state to
    /// `init` while still holding the dispatch lock.
    ///
    /// No event is fanned out between the registration and `init`, so state
    /// seeded by `init` is never newer than the events the callback sees next.
    pub fn subscribe_with_state<F, I>(
        &self,
        id: impl Into<String>,
        callback: F,
        init: I,
    ) -> SubscriptionHandle
    where
        F: Fn(&Event) + Send + Sync + 'static,
        I: FnOnce(ConnectionState),
    {
        let _guard = self.inner.dispatch_lock.lock();
        let handle = self.subscribe(id, callback);
        init(self.state());
        handle
    }

    /// Starts the connection if it is not already up or in progress.
    ///
    /// Returns immediately; the transport is opened by a background task.
    /// While a reconnect is pending the wait is cut short instead of a second
    /// attempt being scheduled. Must be called from within a tokio runtime.
    pub fn connect(&self) {
        let inner = &self.inner;
        let _guard = inner.dispatch_lock.lock();

        let current = inner.state.read().state;
        match current {
            ConnectionState::Connecting | ConnectionState::Connected => {
                debug!(state = %current, "Connect ignored, session already active");
            }
            ConnectionState::Reconnecting => {
                if let Some(session) = inner.session.lock().as_ref() {
                    session.wake.notify_waiters();
                }
                debug!("Pending reconnect started early");
            }
            ConnectionState::Disconnected | ConnectionState::Closed => {
                let runtime = match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!(error = %e, "Connect called outside a tokio runtime");
                        return;
                    }
                };

                inner.state.write().mark_connecting();
                let token = CancellationToken::new();
                let wake = Arc::new(Notify::new());
                *inner.session.lock() = Some(Session {
                    token: token.clone(),
                    wake: Arc::clone(&wake),
                });

                info!(
                    transport = inner.transport.name(),
                    "Event channel connecting"
                );
                runtime.spawn(driver::run_session(Arc::clone(inner), token, wake));
            }
        }
    }

    /// Closes the connection and cancels any pending reconnect.
    ///
    /// Emits `connection_status(false)` once; further calls are no-ops until
    /// the next [`connect`](Self::connect).
    pub fn disconnect(&self) {
        let inner = &self.inner;
        let _guard = inner.dispatch_lock.lock();

        let previous = inner.state.read().state;
        if previous.is_inactive() {
            debug!(state = %previous, "Disconnect ignored, no active session");
            return;
        }

        inner.state.write().mark_closed();
        if let Some(session) = inner.session.lock().take() {
            session.token.cancel();
        }

        info!(previous = %previous, "Event channel disconnected");
        inner.dispatch(&Event::connection_status(false));
    }

    /// Returns true while the transport is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.state.read().state.is_connected()
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state.read().state
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Fans `event` out to all subscribers as if it came from the transport.
    pub fn publish(&self, event: &Event) {
        self.inner.dispatch(event);
    }

    /// Returns a snapshot of channel activity.
    #[must_use]
    pub fn stats(&self) -> ChannelStats {
        let state = self.inner.state.read();
        let counters = &self.inner.counters;
        ChannelStats {
            state: state.state,
            subscribers: self.inner.registry.len(),
            connections_opened: state.connections_opened,
            reconnect_attempts: state.reconnect_attempts,
            events_dispatched: Counters::get(&counters.events_dispatched),
            frames_dropped: Counters::get(&counters.frames_dropped),
            subscriber_panics: Counters::get(&counters.subscriber_panics),
        }
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("transport", &self.inner.transport.name())
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Inner {
    /// Applies a state change for the session owning `token` and emits the
    /// matching status event.
    ///
    /// Returns false without touching state once the session is cancelled.
    fn transition(
        &self,
        token: &CancellationToken,
        apply: impl FnOnce(&mut InternalState),
        status: Option<bool>,
    ) -> bool {
        let _guard = self.dispatch_lock.lock();
        if token.is_cancelled() {
            return false;
        }

        apply(&mut *self.state.write());
        if let Some(connected) = status {
            self.dispatch(&Event::connection_status(connected));
        }
        true
    }

    fn handle_frame(&self, token: &CancellationToken, frame: &Frame) {
        let event = match frame.decode() {
            Ok(event) => event,
            Err(e) => {
                Counters::incr(&self.counters.frames_dropped);
                warn!(error = %e, "Dropping malformed frame");
                return;
            }
        };

        let _guard = self.dispatch_lock.lock();
        if token.is_cancelled() {
            return;
        }
        self.dispatch(&event);
    }

    fn dispatch(&self, event: &Event) {
        let _guard = self.dispatch_lock.lock();
        let subscribers = self.registry.snapshot();
        let span = dispatch_span(event.kind(), subscribers.len());
        let _entered = span.enter();

        for (id, callback) in &subscribers {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Counters::incr(&self.counters.subscriber_panics);
                error!(
                    subscriber = %id,
                    event_type = event.kind(),
                    panic = %panic_message(payload.as_ref()),
                    "Subscriber panicked"
                );
            }
        }

        Counters::incr(&self.counters.events_dispatched);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Registration returned by [`EventChannel::subscribe`].
///
/// Dropping the handle leaves the subscription in place; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug, Clone)]
#[must_use = "dropping the handle makes the subscription impossible to remove"]
pub struct SubscriptionHandle {
    id: String,
    token: u64,
    inner: Weak<Inner>,
}

impl SubscriptionHandle {
    /// Returns the subscriber id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Removes this registration.
    ///
    /// Safe to call repeatedly. A newer registration under the same id is
    /// left untouched.
    pub fn unsubscribe(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if inner.registry.remove(&self.id, self.token) {
            debug!(subscriber = %self.id, "Subscriber removed");
        }
    }
}
