// Toast queue with self-expiring entries

use crate::models::{Toast, ToastKind, new_id};
use crate::store::StoreEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long a toast stays visible unless dismissed
pub const TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct Inner {
    toasts: Vec<Toast>,
    /// Pending expiry timer per toast id
    timers: HashMap<String, JoinHandle<()>>,
}

/// Ordered queue of toasts, shared with the expiry timers
///
/// Cloning yields another handle onto the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<StoreEvent>,
}

impl ToastQueue {
    pub fn new(events: broadcast::Sender<StoreEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a toast and schedule its removal `TOAST_TTL` from now
    ///
    /// Needs a Tokio runtime to schedule expiry. Without one the toast is
    /// kept until removed by hand.
    pub fn add(&self, message: impl Into<String>, kind: ToastKind) -> String {
        let toast = Toast {
            id: new_id(),
            message: message.into(),
            kind,
        };
        let id = toast.id.clone();
        let deadline = Instant::now() + TOAST_TTL;

        {
            // Timer is registered under the same lock so expiry can't run first
            let mut inner = self.lock();
            inner.toasts.push(toast);

            match Handle::try_current() {
                Ok(handle) => {
                    let queue = self.clone();
                    let timer_id = id.clone();
                    let timer = handle.spawn(async move {
                        tokio::time::sleep_until(deadline).await;
                        queue.expire(&timer_id);
                    });
                    inner.timers.insert(id.clone(), timer);
                }
                Err(_) => {
                    warn!(id = %id, "No async runtime, toast will not expire on its own");
                }
            }
        }

        debug!(id = %id, %kind, "Toast added");
        let _ = self.events.send(StoreEvent::ToastAdded { id: id.clone() });
        id
    }

    /// Dismiss a toast and cancel its timer; returns whether it was present
    pub fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut inner = self.lock();
            if let Some(timer) = inner.timers.remove(id) {
                timer.abort();
            }
            Self::take(&mut inner.toasts, id)
        };

        if removed {
            debug!(id, "Toast removed");
            let _ = self.events.send(StoreEvent::ToastRemoved { id: id.to_string() });
        }
        removed
    }

    /// Timer callback; a no-op when the toast was already dismissed
    fn expire(&self, id: &str) {
        let removed = {
            let mut inner = self.lock();
            inner.timers.remove(id);
            Self::take(&mut inner.toasts, id)
        };

        if removed {
            debug!(id, "Toast expired");
            let _ = self.events.send(StoreEvent::ToastRemoved { id: id.to_string() });
        }
    }

    fn take(toasts: &mut Vec<Toast>, id: &str) -> bool {
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Current toasts, oldest first
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    #[cfg(test)]
    fn contains(&self, id: &str) -> bool {
        self.lock().toasts.iter().any(|t| t.id == id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.lock().toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> (ToastQueue, broadcast::Receiver<StoreEvent>) {
        let (tx, rx) = broadcast::channel(64);
        (ToastQueue::new(tx), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_ttl() {
        let (queue, _rx) = queue();
        let id = queue.add("Task created successfully", ToastKind::Success);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(queue.contains(&id));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!queue.contains(&id));
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_remove_cancels_expiry() {
        let (queue, mut rx) = queue();
        let id = queue.add("Task deleted", ToastKind::Info);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(queue.remove(&id));
        assert!(!queue.remove(&id));

        // Past the original deadline nothing else happens
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(queue.is_empty());

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                StoreEvent::ToastAdded { id: id.clone() },
                StoreEvent::ToastRemoved { id },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_toast_has_its_own_deadline() {
        let (queue, _rx) = queue();
        let first = queue.add("first", ToastKind::Info);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let second = queue.add("second", ToastKind::Error);
        assert_eq!(queue.len(), 2);

        tokio::time::sleep(Duration::from_millis(1501)).await;
        assert!(!queue.contains(&first));
        assert!(queue.contains(&second));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_keeps_insertion_order() {
        let (queue, _rx) = queue();
        queue.add("a", ToastKind::Success);
        queue.add("b", ToastKind::Info);

        let messages: Vec<String> = queue.snapshot().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_without_runtime_toast_stays_until_removed() {
        let (queue, _rx) = queue();
        let id = queue.add("no timer", ToastKind::Info);

        assert!(queue.contains(&id));
        assert!(queue.remove(&id));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (queue, mut rx) = queue();
        assert!(!queue.remove("missing"));
        assert!(drain(&mut rx).is_empty());
    }
}
