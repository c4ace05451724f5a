//! Connection driver: one task per session, owning open, read and
//! reconnect.

use super::Inner;
use crate::state::InternalState;
use crate::transport::TransportSession;
use argus_core::error::NetworkError;
use argus_telemetry::spans::connection_span;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

enum SessionEnd {
    Cancelled,
    Closed,
    Failed(NetworkError),
}

/// Runs until `token` is cancelled, reconnecting at the fixed interval.
pub(super) async fn run_session(inner: Arc<Inner>, token: CancellationToken, wake: Arc<Notify>) {
    let span = connection_span(inner.transport.endpoint(), inner.transport.name());
    drive(&inner, &token, &wake).instrument(span).await;
    debug!("Connection driver stopped");
}

async fn drive(inner: &Inner, token: &CancellationToken, wake: &Notify) {
    let delay = inner.config.reconnect_interval();

    loop {
        let opened = tokio::select! {
            biased;
            () = token.cancelled() => return,
            opened = inner.transport.open() => opened,
        };

        match opened {
            Ok(mut session) => {
                if !inner.transition(token, InternalState::mark_connected, Some(true)) {
                    session.close().await;
                    return;
                }
                info!("Event channel connected");

                let end = read_frames(inner, token, session.as_mut()).await;
                session.close().await;
                match end {
                    SessionEnd::Cancelled => return,
                    SessionEnd::Closed => warn!("Connection closed by peer"),
                    SessionEnd::Failed(e) => {
                        warn!(error = %e, severity = e.severity().as_str(), "Connection lost");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, severity = e.severity().as_str(), "Connection attempt failed");
            }
        }

        // Registered before the state flips so a connect() racing the
        // transition still wakes this wait.
        let notified = wake.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if !inner.transition(token, InternalState::mark_reconnecting, Some(false)) {
            return;
        }

        let attempt = inner.state.read().reconnect_attempts;
        #[allow(clippy::cast_possible_truncation)]
        let delay_ms = delay.as_millis() as u64;
        info!(attempt, delay_ms, "Reconnect scheduled");

        tokio::select! {
            biased;
            () = token.cancelled() => return,
            () = &mut notified => debug!("Reconnect requested early"),
            () = sleep(delay) => {}
        }

        if !inner.transition(token, InternalState::mark_connecting, None) {
            return;
        }
    }
}

async fn read_frames(
    inner: &Inner,
    token: &CancellationToken,
    session: &mut dyn TransportSession,
) -> SessionEnd {
    loop {
        let next = tokio::select! {
            biased;
            () = token.cancelled() => return SessionEnd::Cancelled,
            next = session.next_frame() => next,
        };

        match next {
            None => return SessionEnd::Closed,
            Some(Err(e)) => return SessionEnd::Failed(e),
            Some(Ok(frame)) => inner.handle_frame(token, &frame),
        }
    }
}
