use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::session::AttendanceSession;

/// Committed session change, fanned out to dashboards and the
/// notification dispatcher. `seq` is monotonic across all commits, so
/// observers keying off session id + seq can deduplicate redeliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChanged {
    pub seq: u64,
    pub session: AttendanceSession,
}

/// Broadcast hub for committed changes. Fire-and-forget for the caller:
/// a publish with no live subscribers, or a lagging subscriber, never
/// affects store state.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<SessionChanged>,
    seq: Arc<AtomicU64>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publishes the snapshot to all current subscribers. Returns the
    /// sequence number stamped on the event.
    pub fn publish(&self, session: AttendanceSession) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let user_id = session.user_id;
        let event = SessionChanged { seq, session };
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(seq, user_id, receivers, "session change published");
            }
            Err(_) => {
                // nobody listening yet; observers resync on subscribe
                tracing::debug!(seq, user_id, "session change published with no subscribers");
            }
        }
        seq
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionChanged> {
        self.tx.subscribe()
    }
}

/// In-process stand-in for the external notification transport: drains
/// the feed and logs each dispatch. Delivery failures are logged and
/// dropped; they never roll back the store.
pub async fn run_dispatcher(notifier: ChangeNotifier) {
    let mut rx = notifier.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::info!(
                    seq = event.seq,
                    user_id = event.session.user_id,
                    session_id = %event.session.id,
                    open = event.session.is_open(),
                    status = %event.session.status,
                    "dispatching attendance notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "notification dispatcher lagged; continuing");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
