//! Subscriber registry keyed by subscriber id.

use super::EventCallback;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    token: u64,
    callback: EventCallback,
}

/// Id to callback map with at most one callback per id.
///
/// Every registration gets a fresh token, so a handle from an older
/// registration cannot remove a newer one under the same id.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    next_token: AtomicU64,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `id`, replacing any previous one.
    ///
    /// Returns the registration token and whether a callback was replaced.
    pub(crate) fn insert(&self, id: &str, callback: EventCallback) -> (u64, bool) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let replaced = self
            .entries
            .write()
            .insert(id.to_string(), Entry { token, callback })
            .is_some();
        (token, replaced)
    }

    /// Removes `id` if it is still held by the registration `token`.
    pub(crate) fn remove(&self, id: &str, token: u64) -> bool {
        let mut entries = self.entries.write();
        match entries.get(id) {
            Some(entry) if entry.token == token => {
                entries.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Copies the current callbacks so they can run without the lock held.
    pub(crate) fn snapshot(&self) -> Vec<(String, EventCallback)> {
        self.entries
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), EventCallback::clone(&entry.callback)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn counting(hits: &Arc<AtomicUsize>) -> EventCallback {
        let hits = Arc::clone(hits);
        Arc::new(move |_: &crate::event::Event| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let registry = SubscriberRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let (a, replaced) = registry.insert("ui", counting(&first));
        assert!(!replaced);
        let (b, replaced) = registry.insert("ui", counting(&second));
        assert!(replaced);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 1);

        let event = crate::event::Event::connection_status(true);
        for (_, callback) in registry.snapshot() {
            callback(&event);
        }
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_token_does_not_remove() {
        let registry = SubscriberRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let (old, _) = registry.insert("ui", counting(&hits));
        let (new, _) = registry.insert("ui", counting(&hits));

        assert!(!registry.remove("ui", old));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("ui", new));
        assert!(!registry.remove("ui", new));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_remove_unknown_id() {
        let registry = SubscriberRegistry::new();
        assert!(!registry.remove("missing", 0));
        assert!(registry.snapshot().is_empty());
    }
}
