//! Shared fixtures for the gateway tests.

use crate::event::Event;
use crate::transport::{Frame, Transport, TransportSession};
use argus_core::error::NetworkError;
use argus_core::types::{
    AlertRecord, AlertStatus, Amount, Priority, ShapValue, TransactionDetails, TransactionType,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) fn alert(id: &str, priority: Priority) -> AlertRecord {
    let ts = Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap();
    AlertRecord {
        id: id.to_string(),
        transaction_id: format!("TXN-{id}"),
        status: AlertStatus::New,
        priority,
        transaction: TransactionDetails {
            kind: TransactionType::Transfer,
            amount: Amount::from_units(250_000),
            step: 7,
            timestamp: ts,
            name_orig: "C1231006815".to_string(),
            name_dest: "C1666544295".to_string(),
        },
        ml_score: 0.95,
        ml_risk_band: priority.risk_band(),
        ml_reason_codes: vec!["HIGH_VALUE_TRANSFER".to_string()],
        shap_values: vec![ShapValue::new("amount_zscore", 0.35)],
        rules_triggered: vec![],
        created_at: ts,
        updated_at: ts,
        assigned_to: None,
        notes: None,
    }
}

/// Lets every ready task run under a paused clock.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Advances the paused clock, then lets woken tasks run.
pub(crate) async fn elapse(duration: Duration) {
    tokio::time::sleep(duration).await;
    settle().await;
}

enum SessionInput {
    Frame(Frame),
    Fail(String),
    Close,
}

#[derive(Default)]
struct Shared {
    opens: AtomicUsize,
    closes: AtomicUsize,
    refusals: AtomicUsize,
    current: Mutex<Option<mpsc::UnboundedSender<SessionInput>>>,
}

/// In-memory transport driven by the test body.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    shared: Arc<Shared>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn as_transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Open attempts, refused ones included.
    pub(crate) fn opens(&self) -> usize {
        self.shared.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn refuse_next(&self, attempts: usize) {
        self.shared.refusals.store(attempts, Ordering::SeqCst);
    }

    pub(crate) fn send_text(&self, text: &str) {
        self.push(SessionInput::Frame(Frame::Text(text.to_string())));
    }

    pub(crate) fn send_event(&self, event: &Event) {
        self.send_text(&event.encode().unwrap());
    }

    pub(crate) fn drop_connection(&self) {
        self.push(SessionInput::Close);
    }

    pub(crate) fn fail_connection(&self, reason: &str) {
        self.push(SessionInput::Fail(reason.to_string()));
    }

    fn push(&self, input: SessionInput) {
        if let Some(tx) = self.shared.current.lock().as_ref() {
            let _ = tx.send(input);
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn endpoint(&self) -> &str {
        "scripted://test"
    }

    async fn open(&self) -> Result<Box<dyn TransportSession>, NetworkError> {
        self.shared.opens.fetch_add(1, Ordering::SeqCst);

        let refused = self
            .shared
            .refusals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(NetworkError::ConnectionFailed {
                reason: "refused".to_string(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.shared.current.lock() = Some(tx);
        Ok(Box::new(ScriptedSession {
            rx,
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct ScriptedSession {
    rx: mpsc::UnboundedReceiver<SessionInput>,
    shared: Arc<Shared>,
}

#[async_trait]
impl TransportSession for ScriptedSession {
    async fn next_frame(&mut self) -> Option<Result<Frame, NetworkError>> {
        match self.rx.recv().await? {
            SessionInput::Frame(frame) => Some(Ok(frame)),
            SessionInput::Fail(reason) => Some(Err(NetworkError::ConnectionClosed { reason })),
            SessionInput::Close => None,
        }
    }

    async fn close(&mut self) {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
    }
}
