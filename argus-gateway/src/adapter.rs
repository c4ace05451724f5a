//! Subscription adapter binding one consumer's lifecycle to the channel.

use crate::channel::{EventChannel, SubscriptionHandle};
use crate::event::Event;
use argus_core::types::AlertRecord;
use argus_telemetry::spans::adapter_span;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// Callback invoked once per new alert.
pub type AlertCallback = Arc<dyn Fn(&AlertRecord) + Send + Sync>;

/// Options for [`RealtimeAlerts::activate`].
#[derive(Clone)]
pub struct AdapterOptions {
    /// Subscribe and connect on activation. Defaults to true.
    pub auto_connect: bool,
    /// Subscriber id; a unique id is generated when unset.
    pub subscriber_id: Option<String>,
    /// Called with every new alert, after it is buffered.
    pub on_new_alert: Option<AlertCallback>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            auto_connect: true,
            subscriber_id: None,
            on_new_alert: None,
        }
    }
}

impl std::fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("auto_connect", &self.auto_connect)
            .field("subscriber_id", &self.subscriber_id)
            .field("on_new_alert", &self.on_new_alert.is_some())
            .finish()
    }
}

impl AdapterOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether activation subscribes and connects.
    #[must_use]
    pub fn auto_connect(mut self, auto_connect: bool) -> Self {
        self.auto_connect = auto_connect;
        self
    }

    /// Uses a fixed subscriber id.
    #[must_use]
    pub fn subscriber_id(mut self, id: impl Into<String>) -> Self {
        self.subscriber_id = Some(id.into());
        self
    }

    /// Sets the per-alert callback.
    #[must_use]
    pub fn on_new_alert<F>(mut self, callback: F) -> Self
    where
        F: Fn(&AlertRecord) + Send + Sync + 'static,
    {
        self.on_new_alert = Some(Arc::new(callback));
        self
    }
}

#[derive(Default)]
struct AdapterState {
    alerts: RwLock<VecDeque<AlertRecord>>,
    connected: AtomicBool,
}

/// Per-consumer view of the alert feed.
///
/// While active, every `alert_created` event is prepended to a private
/// buffer (newest first) and handed to the optional callback. Status events
/// drive [`is_connected`](Self::is_connected). `alert_updated` events are
/// received but deliberately leave the buffer untouched.
///
/// Dropping an active adapter deactivates it.
pub struct RealtimeAlerts {
    channel: EventChannel,
    shared: Arc<AdapterState>,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

impl RealtimeAlerts {
    /// Creates an inactive adapter over `channel`.
    #[must_use]
    pub fn new(channel: EventChannel) -> Self {
        Self {
            channel,
            shared: Arc::new(AdapterState::default()),
            subscription: Mutex::new(None),
        }
    }

    /// Subscribes to the channel and connects it.
    ///
    /// Does nothing when `auto_connect` is false or the adapter is already
    /// active. The subscription is in place before `connect` runs, so no
    /// event of the new session can be missed.
    pub fn activate(&self, options: AdapterOptions) {
        if !options.auto_connect {
            debug!("Auto-connect disabled, adapter left inactive");
            return;
        }

        {
            let mut subscription = self.subscription.lock();
            if let Some(handle) = subscription.as_ref() {
                debug!(subscriber = %handle.id(), "Adapter already active");
                return;
            }

            let id = options
                .subscriber_id
                .unwrap_or_else(|| format!("realtime-alerts-{}", Uuid::new_v4()));
            let _span = adapter_span(&id).entered();

            let shared = Arc::clone(&self.shared);
            let on_new_alert = options.on_new_alert;
            let on_event = move |event: &Event| match event {
                Event::AlertCreated(alert) => {
                    shared.alerts.write().push_front(alert.clone());
                    if let Some(callback) = &on_new_alert {
                        callback(alert);
                    }
                }
                Event::AlertUpdated(_) => {}
                Event::ConnectionStatus(status) => {
                    shared.connected.store(status.connected, Ordering::SeqCst);
                }
            };

            // A channel connected by another consumer sends no fresh status.
            let handle = self.channel.subscribe_with_state(id, on_event, |state| {
                self.shared
                    .connected
                    .store(state.is_connected(), Ordering::SeqCst);
            });
            info!("Realtime alerts activated");
            *subscription = Some(handle);
        }

        self.channel.connect();
    }

    /// Unsubscribes and disconnects the channel.
    ///
    /// No-op when the adapter is not active.
    pub fn deactivate(&self) {
        let Some(handle) = self.subscription.lock().take() else {
            debug!("Adapter not active, nothing to deactivate");
            return;
        };

        let _span = adapter_span(handle.id()).entered();
        handle.unsubscribe();
        self.channel.disconnect();
        self.shared.connected.store(false, Ordering::SeqCst);
        info!("Realtime alerts deactivated");
    }

    /// Returns true between a subscribing `activate` and `deactivate`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Returns the id this adapter is subscribed under, if active.
    #[must_use]
    pub fn subscriber_id(&self) -> Option<String> {
        self.subscription
            .lock()
            .as_ref()
            .map(|handle| handle.id().to_string())
    }

    /// Connects the underlying channel.
    pub fn connect(&self) {
        self.channel.connect();
    }

    /// Disconnects the underlying channel without unsubscribing.
    pub fn disconnect(&self) {
        self.channel.disconnect();
    }

    /// Returns the connected flag as last reported by the channel.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Returns the buffered alerts, newest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<AlertRecord> {
        self.shared.alerts.read().iter().cloned().collect()
    }

    /// Returns the number of buffered alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.alerts.read().len()
    }

    /// Returns true if no alerts are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.alerts.read().is_empty()
    }

    /// Empties the buffer. Subscription and connection are unaffected.
    pub fn clear(&self) {
        self.shared.alerts.write().clear();
    }
}

impl Drop for RealtimeAlerts {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for RealtimeAlerts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeAlerts")
            .field("active", &self.is_active())
            .field("connected", &self.is_connected())
            .field("buffered", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;
    use crate::state::ConnectionState;
    use crate::testing::{ScriptedTransport, alert, settle};
    use argus_core::types::Priority;
    use std::sync::atomic::AtomicUsize;

    fn channel() -> (EventChannel, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        (
            EventChannel::with_transport(ChannelConfig::default(), transport.as_transport()),
            transport,
        )
    }

    fn ids(adapter: &RealtimeAlerts) -> Vec<String> {
        adapter.alerts().into_iter().map(|alert| alert.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_buffer_is_newest_first() {
        let (channel, _transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new());

        for id in ["A", "B", "C"] {
            channel.publish(&Event::AlertCreated(alert(id, Priority::Medium)));
        }

        assert_eq!(ids(&adapter), vec!["C", "B", "A"]);
        assert_eq!(adapter.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_updated_leaves_buffer_unchanged() {
        let (channel, _transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new());

        channel.publish(&Event::AlertCreated(alert("A", Priority::Low)));
        let mut updated = alert("A", Priority::Critical);
        updated.notes = Some("escalated by analyst".to_string());
        channel.publish(&Event::AlertUpdated(updated));
        channel.publish(&Event::AlertUpdated(alert("Z", Priority::High)));

        let alerts = adapter.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, Priority::Low);
        assert!(alerts[0].notes.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_lifecycle() {
        let (channel, transport) = channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new().on_new_alert(move |alert: &AlertRecord| {
            sink.lock().push(alert.id.clone());
        }));
        assert!(adapter.is_active());
        settle().await;

        assert!(channel.is_connected());
        assert!(adapter.is_connected());

        transport.send_event(&Event::AlertCreated(alert("ALT-crit", Priority::Critical)));
        settle().await;
        assert_eq!(*received.lock(), vec!["ALT-crit"]);
        assert_eq!(adapter.alerts()[0].priority, Priority::Critical);

        adapter.deactivate();
        assert_eq!(channel.state(), ConnectionState::Closed);
        assert!(!adapter.is_connected());
        assert_eq!(channel.subscriber_count(), 0);

        transport.send_event(&Event::AlertCreated(alert("ALT-late", Priority::Critical)));
        channel.publish(&Event::AlertCreated(alert("ALT-later", Priority::Critical)));
        settle().await;
        assert_eq!(*received.lock(), vec!["ALT-crit"]);
        assert_eq!(adapter.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_flag_follows_status_events() {
        let (channel, transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new());
        settle().await;
        assert!(adapter.is_connected());

        transport.drop_connection();
        settle().await;
        assert!(!adapter.is_connected());
        assert!(adapter.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_without_activate() {
        let (channel, _transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());

        adapter.deactivate();
        adapter.deactivate();
        assert!(!adapter.is_active());
        assert_eq!(channel.state(), ConnectionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_activate_keeps_one_subscription() {
        let (channel, transport) = channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(
            AdapterOptions::new()
                .subscriber_id("dashboard")
                .on_new_alert(move |_: &AlertRecord| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        adapter.activate(AdapterOptions::new().subscriber_id("other"));
        settle().await;

        assert_eq!(adapter.subscriber_id().as_deref(), Some("dashboard"));
        assert_eq!(channel.subscriber_count(), 1);
        assert_eq!(transport.opens(), 1);

        channel.publish(&Event::AlertCreated(alert("A", Priority::High)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_connect_disabled() {
        let (channel, transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new().auto_connect(false));
        settle().await;

        assert!(!adapter.is_active());
        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(transport.opens(), 0);

        adapter.connect();
        settle().await;
        assert!(channel.is_connected());
        adapter.disconnect();
        assert!(!channel.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generated_subscriber_ids_are_unique() {
        let (channel, _transport) = channel();
        let first = RealtimeAlerts::new(channel.clone());
        let second = RealtimeAlerts::new(channel.clone());
        first.activate(AdapterOptions::new());
        second.activate(AdapterOptions::new());

        let id = first.subscriber_id().unwrap();
        assert!(id.starts_with("realtime-alerts-"));
        assert_ne!(first.subscriber_id(), second.subscriber_id());
        assert_eq!(channel.subscriber_count(), 2);

        channel.publish(&Event::AlertCreated(alert("A", Priority::Low)));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_keeps_subscription() {
        let (channel, _transport) = channel();
        let adapter = RealtimeAlerts::new(channel.clone());
        adapter.activate(AdapterOptions::new());

        channel.publish(&Event::AlertCreated(alert("A", Priority::Low)));
        adapter.clear();
        assert!(adapter.is_empty());

        channel.publish(&Event::AlertCreated(alert("B", Priority::Low)));
        assert_eq!(ids(&adapter), vec!["B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_deactivates() {
        let (channel, _transport) = channel();
        {
            let adapter = RealtimeAlerts::new(channel.clone());
            adapter.activate(AdapterOptions::new());
            settle().await;
            assert!(channel.is_connected());
        }
        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(channel.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_options_defaults() {
        let options = AdapterOptions::default();
        assert!(options.auto_connect);
        assert!(options.subscriber_id.is_none());
        assert!(format!("{options:?}").contains("on_new_alert: false"));
    }
}
